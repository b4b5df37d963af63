//! # Zakupki Harvester Library
//!
//! A crawl-and-checkpoint engine for the public procurement notice CSV
//! export. The export endpoint serves at most one window of rows per
//! request, scoped to a single publish date, so a full harvest is a
//! long sequence of small downloads: this library walks that sequence
//! day by day, persists a durable cursor after every window, and keeps
//! following new days as they are published.
//!
//! ## Features
//!
//! - **Durable resume**: the cursor is written atomically after every
//!   window, so a crash or restart refetches at most one window
//! - **Backlog catch-up**: days between the cursor and today are
//!   drained continuously, then the engine switches to live mode
//! - **Daily trigger**: in live mode, today's data is harvested once
//!   per day after the configured local hour
//! - **Raw artifacts**: every response body lands on disk unmodified
//!   before inspection, one CSV file per window
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use zakupki_harvester::fetcher::{ExportFetcher, HttpTransport};
//! use zakupki_harvester::{CheckpointStore, HarvestConfig, Harvester};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(HarvestConfig::default());
//! let transport = Arc::new(HttpTransport::new(&config)?);
//! let fetcher = Arc::new(ExportFetcher::new(transport, config.clone()));
//! let store = CheckpointStore::new(config.state_file.clone());
//!
//! let harvester = Harvester::new(config, store, fetcher);
//! harvester.run().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`checkpoint`] - Durable cursor persistence and the instance lock
//! - [`fetcher`] - Query construction, HTTP transport, retry, artifact storage
//! - [`harvest`] - Day pagination, backlog catch-up, and the daily trigger
//! - [`output`] - Artifact naming and row-count inspection
//! - [`clock`] - Wall clock seam for day rollover and the trigger hour
//! - [`config`] - Deployment constants and the injected configuration
//! - [`shutdown`] - Graceful shutdown coordination shared across modules

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::NaiveDate;

/// Durable cursor persistence
pub mod checkpoint;

/// CLI command implementations
pub mod cli;

/// Wall clock seam
pub mod clock;

/// Deployment constants and configuration
pub mod config;

/// Window fetching against the export endpoint
pub mod fetcher;

/// Harvest orchestration
pub mod harvest;

/// Export artifact storage
pub mod output;

/// Graceful shutdown coordination shared across modules
pub mod shutdown;

// Re-export commonly used types
pub use checkpoint::{Checkpoint, CheckpointStore};
pub use config::HarvestConfig;
pub use harvest::Harvester;

/// One fetchable block of a day's export: a publish date plus an
/// inclusive row-offset range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Publish date the search is scoped to
    pub day: NaiveDate,
    /// First row offset (1-based, inclusive)
    pub offset_from: u32,
    /// Last row offset (inclusive)
    pub offset_to: u32,
}

impl Window {
    /// Window covering `window_size` rows starting at `offset_from`.
    pub fn spanning(day: NaiveDate, offset_from: u32, window_size: u32) -> Self {
        Self {
            day,
            offset_from,
            offset_to: offset_from + window_size - 1,
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}-{}]", self.day, self.offset_from, self.offset_to)
    }
}
