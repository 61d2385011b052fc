//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use qunroll_qasm2::ast::Program;
use qunroll_qasm2::parse_with_file;
use qunroll_unroller::{Basis, UnrollerConfig};

/// Load and parse an OpenQASM 2.0 file.
pub fn load_program(path: &str) -> Result<Program> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    parse_with_file(&source, path).with_context(|| format!("Failed to parse {path}"))
}

/// Build the unroller configuration.
///
/// `basis` replaces the basis of the configuration file, if both are given.
pub fn load_config(config: Option<&str>, basis: Option<&str>) -> Result<UnrollerConfig> {
    let mut loaded = match config {
        Some(path) => UnrollerConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {path}"))?,
        None => UnrollerConfig::default(),
    };

    if let Some(list) = basis {
        loaded.basis = Basis::restricted(list.split(',')).context("Invalid --basis")?;
    }

    debug!(
        "Basis: {}",
        loaded.basis.names().collect::<Vec<_>>().join(",")
    );
    Ok(loaded)
}

/// Write `text` to `output`, or to stdout.
pub fn write_output(text: &str, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write file: {path}"))
        }
        None => {
            print!("{text}");
            Ok(())
        }
    }
}
