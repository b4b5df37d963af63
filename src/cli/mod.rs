//! CLI command implementations

pub mod error;
pub mod run;
pub mod status;

pub use error::CliError;
pub use run::RunArgs;
pub use status::StatusArgs;

use crate::config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Procurement export harvester CLI
#[derive(Parser, Debug)]
#[command(name = "zakupki-harvester")]
#[command(about = "Harvest procurement notice CSV exports with durable resume", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Checkpoint file location
    #[arg(long, global = true, default_value = config::DEFAULT_STATE_FILE)]
    pub state_file: PathBuf,
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drain the backlog, then follow the daily trigger
    Run(RunArgs),

    /// Show the persisted cursor without touching the network
    Status(StatusArgs),
}
