//! Trace Cost Studio CLI
//!
//! Aggregates kernel execution traces into per-operation cost tables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use trace_cost_studio::commands::{
    display_version, execute_analyze, validate_trace_file, AnalyzeArgs,
};

/// Trace Cost Studio - cost attribution for kernel execution traces
#[derive(Parser, Debug)]
#[command(name = "trace-cost")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate a directory of trace files into cost tables
    Analyze {
        /// Directory of trace files (or a single trace file)
        #[arg(short, long, env = "TRACE_COST_INPUT")]
        input: PathBuf,

        /// Analysis config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Coefficient multiplier (overrides the config file)
        #[arg(short, long)]
        multiplier: Option<u32>,

        /// Directory for table and CSV files (prints to stdout if omitted)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also render the detailed statistics table
        #[arg(long)]
        detailed: bool,

        /// Print the summary as CSV
        #[arg(long)]
        csv: bool,

        /// Output path for the JSON report
        #[arg(long)]
        json: Option<PathBuf>,

        /// Number of parser threads
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Check that a trace file parses and count its samples
    Validate {
        /// Path to trace file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            input,
            config,
            multiplier,
            output_dir,
            detailed,
            csv,
            json,
            jobs,
        } => {
            let args = AnalyzeArgs {
                input,
                config,
                multiplier,
                output_dir,
                detailed,
                csv,
                json,
                jobs,
            };

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_trace_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
