//! Fmt command implementation.

use anyhow::Result;

use super::common::{load_program, write_output};

/// Execute the fmt command.
pub fn execute(input: &str, output: Option<&str>) -> Result<()> {
    let program = load_program(input)?;
    write_output(&(program.qasm() + "\n"), output)
}
