//! Check command implementation.

use std::collections::BTreeMap;

use anyhow::Result;
use console::style;

use qunroll_unroller::Unroller;
use qunroll_unroller::backends::{BackendCall, Recorder};

use super::common::{load_config, load_program};

/// Execute the check command.
pub fn execute(input: &str, config: Option<&str>, basis: Option<&str>, format: &str) -> Result<()> {
    let program = load_program(input)?;
    let unroller = Unroller::new(load_config(config, basis)?);

    let mut recorder = Recorder::new();
    let stats = unroller.execute(&program, &mut recorder)?;

    let mut gates: BTreeMap<&str, usize> = BTreeMap::new();
    for call in &recorder.calls {
        let name = match call {
            BackendCall::Unitary { name, .. } | BackendCall::Opaque { name, .. } => name.as_str(),
            BackendCall::Measure { .. } => "measure",
            BackendCall::Reset { .. } => "reset",
            BackendCall::Barrier { .. } => "barrier",
            _ => continue,
        };
        *gates.entry(name).or_default() += 1;
    }

    match format.to_lowercase().as_str() {
        "json" => {
            let report = serde_json::json!({
                "file": input,
                "stats": stats,
                "operations": gates,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "table" => {
            println!(
                "{} {} unrolls cleanly",
                style("✓").green().bold(),
                style(input).green()
            );
            println!("  Statements:      {}", stats.statements);
            println!("  Backend calls:   {}", stats.backend_calls);
            println!("  Gate expansions: {}", stats.gates_expanded);
            println!();
            println!("  {:<12} {:>8}", style("Operation").bold(), style("Count").bold());
            for (name, count) in &gates {
                println!("  {:<12} {:>8}", name, count);
            }
        }
        other => anyhow::bail!("Unknown report format: '{other}'. Available: table, json"),
    }

    Ok(())
}
