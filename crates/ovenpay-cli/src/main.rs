//! ovenpay - per-cycle reward payouts for a baking operation.
//!
//! Command-line front end wiring snapshot files and configuration into the
//! resolution engine, and the resulting reports into the report sink.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Compute delegator reward payouts, one cycle at a time.
#[derive(Parser)]
#[command(name = "ovenpay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter configuration file
    Init {
        /// Output directory for the configuration
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Resolve a cycle and print the payment table (no reports written)
    Preview {
        /// Configuration file path
        #[arg(short, long, default_value = "config.json", env = "OVENPAY_CONFIG")]
        config: PathBuf,

        /// Cycle to resolve
        #[arg(long)]
        cycle: u64,

        /// Directory of per-cycle snapshot files (<cycle>.json)
        #[arg(short, long, default_value = "snapshots")]
        data_dir: PathBuf,
    },

    /// Resolve a cycle and record the outcome under the reports directory
    Pay {
        /// Configuration file path
        #[arg(short, long, default_value = "config.json", env = "OVENPAY_CONFIG")]
        config: PathBuf,

        /// Cycle to resolve
        #[arg(long)]
        cycle: u64,

        /// Directory of per-cycle snapshot files (<cycle>.json)
        #[arg(short, long, default_value = "snapshots")]
        data_dir: PathBuf,

        /// Base directory for success/failure records
        #[arg(short, long, default_value = "reports")]
        reports_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { output } => commands::init::run(output),
        Commands::Preview {
            config,
            cycle,
            data_dir,
        } => commands::preview::run(config, cycle, data_dir),
        Commands::Pay {
            config,
            cycle,
            data_dir,
            reports_dir,
        } => commands::pay::run(config, cycle, data_dir, reports_dir),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
