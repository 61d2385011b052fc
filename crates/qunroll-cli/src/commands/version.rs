//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - OpenQASM 2.0 gate unroller",
        style("qunroll").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qunroll-qasm2     OpenQASM 2.0 syntax tree and parser");
    println!("  qunroll-unroller  Gate expansion and backends");
    println!("  qunroll-cli       Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
