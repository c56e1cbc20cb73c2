//! # RecordSchema CLI
//!
//! Command-line interface for validating Patient / Encounter documents.
//!
//! Exit codes: `0` success, `1` validation failure, `2` configuration error.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{
    CheckResourcesCommand, CoerceCommand, CompletionCommand, ValidateCommand,
};

/// Exit code for a document that failed validation
pub const EXIT_VALIDATION_FAILED: i32 = 1;
/// Exit code for configuration errors
pub const EXIT_CONFIGURATION_ERROR: i32 = 2;

#[derive(Parser)]
#[command(name = "recordschema")]
#[command(about = "Validate healthcare JSON records against RecordSchema schemas")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a document against a validation profile
    Validate(ValidateCommand),
    /// Check which configured resource types a document contains
    CheckResources(CheckResourcesCommand),
    /// Print a schema file in its coerced, canonical form
    Coerce(CoerceCommand),
    /// Generate shell completion scripts
    Completion(CompletionCommand),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Validate(cmd) => cmd.execute(),
        Commands::CheckResources(cmd) => cmd.execute(),
        Commands::Coerce(cmd) => cmd.execute(),
        Commands::Completion(cmd) => cmd.execute(),
    }
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    debug!("Starting RecordSchema CLI");

    if let Err(err) = run(cli) {
        error!("{:#}", err);
        eprintln!("Error: {:#}", err);
        std::process::exit(EXIT_CONFIGURATION_ERROR);
    }
}
