//! Status command implementation

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::clock::{Clock, SystemClock};
use crate::config::{self, HarvestConfig};
use crate::Window;
use chrono::NaiveDate;
use clap::Parser;
use std::str::FromStr;

use super::{Cli, CliError};

/// Output format options
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable output
    Human,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!("invalid output format: {s}")),
        }
    }
}

/// Arguments for the status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Output format (json or human)
    #[arg(long, default_value = "human")]
    pub output_format: OutputFormat,
}

impl StatusArgs {
    /// Report the persisted cursor and what the next run would do.
    pub fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let store = CheckpointStore::new(cli.state_file.clone());
        let stored = store.load();
        let today = SystemClock.today();

        let effective = stored.unwrap_or_else(|| {
            Checkpoint::new(HarvestConfig::default().start_date, config::FIRST_OFFSET)
        });
        let mode = describe_mode(&effective, today);
        let next_window = Window::spanning(
            effective.cursor_date,
            effective.block_offset,
            config::WINDOW_SIZE,
        );

        match self.output_format {
            OutputFormat::Json => {
                let doc = serde_json::json!({
                    "state_file": store.path().display().to_string(),
                    "present": stored.is_some(),
                    "cursor_date": effective.cursor_date.to_string(),
                    "block_offset": effective.block_offset,
                    "next_window": {
                        "from": next_window.offset_from,
                        "to": next_window.offset_to,
                    },
                    "mode": mode,
                });
                println!("{doc:#}");
            }
            OutputFormat::Human => {
                println!("state file:  {}", store.path().display());
                if stored.is_some() {
                    println!("cursor:      {effective}");
                } else {
                    println!("cursor:      absent (first run starts at {effective})");
                }
                println!("next window: {next_window}");
                println!("mode:        {mode}");
            }
        }

        Ok(())
    }
}

fn describe_mode(checkpoint: &Checkpoint, today: NaiveDate) -> String {
    if checkpoint.cursor_date < today {
        let days_behind = (today - checkpoint.cursor_date).num_days();
        format!("backfill, {days_behind} day(s) behind")
    } else if checkpoint.cursor_date == today {
        format!("live, waiting for the {}:00 trigger", config::TRIGGER_HOUR)
    } else {
        "live, today already harvested".to_string()
    }
}
