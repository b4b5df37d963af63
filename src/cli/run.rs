//! Run command implementation

use crate::checkpoint::{CheckpointStore, StateLock};
use crate::config::{self, HarvestConfig};
use crate::fetcher::{ExportFetcher, HttpTransport};
use crate::harvest::{Harvester, RunOutcome};
use crate::output;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use super::{Cli, CliError};

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Directory receiving one CSV file per fetched window
    #[arg(long, default_value = config::DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Export endpoint URL
    #[arg(long, default_value = config::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// First day of the backlog when no checkpoint exists (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Local hour at which the live pass fires
    #[arg(long, default_value_t = config::TRIGGER_HOUR, value_parser = clap::value_parser!(u32).range(0..=23))]
    pub trigger_hour: u32,
}

impl RunArgs {
    /// Execute the run command.
    ///
    /// Holds the instance lock for the whole process lifetime so a
    /// second copy pointed at the same state file refuses to start.
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let config = self.build_config(cli)?;

        output::ensure_output_dir(&config.output_dir)?;

        let mut lock = StateLock::open(&config.state_file)?;
        let _guard = lock.try_exclusive()?;
        info!(state_file = %config.state_file.display(), "instance lock acquired");

        let config = Arc::new(config);
        let transport = Arc::new(HttpTransport::new(&config)?);
        let fetcher = Arc::new(ExportFetcher::new(transport, config.clone()));
        let store = CheckpointStore::new(config.state_file.clone());
        let harvester = Arc::new(Harvester::new(config, store, fetcher));

        supervise(harvester).await;
        Ok(())
    }

    fn build_config(&self, cli: &Cli) -> Result<HarvestConfig, CliError> {
        let mut config = HarvestConfig::default();
        config.state_file = cli.state_file.clone();
        config.output_dir = self.output_dir.clone();
        config.base_url = self.base_url.clone();
        config.trigger_hour = self.trigger_hour;

        if let Some(raw) = &self.start_date {
            config.start_date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
                CliError::InvalidArgument(format!("invalid start date {raw:?}: {e}"))
            })?;
        }

        Ok(config)
    }
}

/// Keep the engine running until shutdown.
///
/// A pass that caught up is restarted immediately so the day that
/// arrived while it ran gets picked up. A panicked pass is logged and
/// restarted after a pacing delay; the checkpoint already on disk
/// makes the restart resume where the crash left off.
async fn supervise(harvester: Arc<Harvester>) {
    loop {
        let task = tokio::spawn({
            let harvester = harvester.clone();
            async move { harvester.run().await }
        });

        match task.await {
            Ok(RunOutcome::Shutdown) => {
                info!("shutdown requested, exiting");
                return;
            }
            Ok(RunOutcome::CaughtUp) => {
                info!("caught up, starting next pass");
            }
            Err(e) => {
                error!(error = %e, "harvest pass aborted, restarting");
                tokio::time::sleep(config::RESTART_DELAY).await;
            }
        }
    }
}
