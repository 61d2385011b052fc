//! Unroll command implementation.

use anyhow::Result;
use console::style;

use qunroll_unroller::Unroller;
use qunroll_unroller::backends::{QasmPrinter, Recorder};

use super::common::{load_config, load_program, write_output};

/// Execute the unroll command.
pub fn execute(
    input: &str,
    output: Option<&str>,
    format: &str,
    config: Option<&str>,
    basis: Option<&str>,
) -> Result<()> {
    eprintln!(
        "{} Unrolling {}",
        style("→").cyan().bold(),
        style(input).green()
    );

    let program = load_program(input)?;
    let unroller = Unroller::new(load_config(config, basis)?);

    let (text, stats) = match format.to_lowercase().as_str() {
        "qasm" => {
            let mut printer = program
                .includes
                .iter()
                .fold(QasmPrinter::new(), |printer, file| printer.with_include(file));
            let stats = unroller.execute(&program, &mut printer)?;
            (printer.into_string(), stats)
        }
        "json" => {
            let mut recorder = Recorder::new();
            let stats = unroller.execute(&program, &mut recorder)?;
            (recorder.to_json(true)? + "\n", stats)
        }
        other => anyhow::bail!("Unknown output format: '{other}'. Available: qasm, json"),
    };

    write_output(&text, output)?;

    eprintln!(
        "{} {} statements → {} backend calls ({} gate expansions)",
        style("✓").green().bold(),
        stats.statements,
        stats.backend_calls,
        stats.gates_expanded
    );
    if let Some(path) = output {
        eprintln!("  Output: {}", style(path).green());
    }

    Ok(())
}
