mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::prepayment::PrepaymentArgs;

/// Loan tenure and prepayment calculations
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Loan tenure and prepayment calculations",
    long_about = "Computes how a single lump-sum prepayment changes the payoff date of a \
                  fixed-rate installment loan, using closed-form annuity math in decimal \
                  precision. Set RUST_LOG=debug to trace the intermediate balances."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// New closure date and tenure saved after a one-time prepayment
    Prepayment(PrepaymentArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
    Report,
}

fn main() {
    // Logs go to stderr; stdout carries the result.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Prepayment(args) => commands::prepayment::run_prepayment(args),
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
