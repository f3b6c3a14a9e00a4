//! Strata CLI: run simulations, inspect restart files, validate setups.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "strata")]
#[command(version, about = "Strata: material point method simulation core")]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "info", "strata_mpm=debug").
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a setup file (descriptor or .toml).
    Run {
        /// Path to the setup file.
        setup: PathBuf,

        /// Spatial dimension (2 or 3).
        #[arg(short, long, default_value_t = 3)]
        dim: usize,

        /// Resume from this restart file before stepping.
        #[arg(short, long)]
        restart: Option<PathBuf>,

        /// Publish telemetry events to the log.
        #[arg(long)]
        telemetry: bool,
    },

    /// Print the header and summary of a restart file.
    Inspect {
        /// Path to the restart file.
        path: PathBuf,
    },

    /// Load and validate a setup file without running it.
    Validate {
        /// Path to the setup file.
        setup: PathBuf,

        /// Spatial dimension (2 or 3).
        #[arg(short, long, default_value_t = 3)]
        dim: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Run {
            setup,
            dim,
            restart,
            telemetry,
        } => commands::run(&setup, dim, restart.as_deref(), telemetry),
        Commands::Inspect { path } => commands::inspect(&path),
        Commands::Validate { setup, dim } => commands::validate(&setup, dim),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
