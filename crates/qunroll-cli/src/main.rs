//! qunroll command-line interface
//!
//! Parses OpenQASM 2.0 files and unrolls them down to a gate basis.
//!
//! ```text
//! qunroll unroll -i adder.qasm --basis u3,cx
//! qunroll check -i adder.qasm --format json
//! qunroll fmt -i adder.qasm
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{check, fmt, unroll, version};

/// qunroll - OpenQASM 2.0 gate unroller
#[derive(Parser)]
#[command(name = "qunroll")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unroll a program into basis gates
    Unroll {
        /// Input file (OpenQASM 2.0)
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Output format (qasm, json)
        #[arg(short, long, default_value = "qasm")]
        format: String,

        /// Unroller configuration file (YAML)
        #[arg(short, long, env = "QUNROLL_CONFIG")]
        config: Option<String>,

        /// Comma-separated basis gates, in addition to U and CX
        #[arg(short, long)]
        basis: Option<String>,
    },

    /// Check that a program unrolls, and report statistics
    Check {
        /// Input file (OpenQASM 2.0)
        #[arg(short, long)]
        input: String,

        /// Unroller configuration file (YAML)
        #[arg(short, long, env = "QUNROLL_CONFIG")]
        config: Option<String>,

        /// Comma-separated basis gates, in addition to U and CX
        #[arg(short, long)]
        basis: Option<String>,

        /// Report format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Print a program in canonical form
    Fmt {
        /// Input file (OpenQASM 2.0)
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Unroll {
            input,
            output,
            format,
            config,
            basis,
        } => unroll::execute(
            &input,
            output.as_deref(),
            &format,
            config.as_deref(),
            basis.as_deref(),
        ),

        Commands::Check {
            input,
            config,
            basis,
            format,
        } => check::execute(&input, config.as_deref(), basis.as_deref(), &format),

        Commands::Fmt { input, output } => fmt::execute(&input, output.as_deref()),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
