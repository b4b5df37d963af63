//! Window fetching against the export endpoint
//!
//! The export service hands out one window of rows per request, keyed
//! by a publish-date range and a row-offset span. This module builds
//! the request, retries transient non-success statuses, stores the raw
//! payload as an artifact, and reports how many data rows it held.

use crate::Window;
use async_trait::async_trait;

pub mod export;
pub mod query;
pub mod transport;

pub use export::ExportFetcher;
pub use transport::{ExportTransport, HttpTransport, RawResponse};

/// Fetch errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Service answered every attempt with a non-success status
    #[error("service returned status {status} after {attempts} attempts")]
    Status {
        /// Status code of the final attempt
        status: u16,
        /// Attempts spent before giving up
        attempts: u32,
    },

    /// Request did not complete at the transport level
    #[error("transport error: {0}")]
    Transport(String),

    /// Payload arrived but could not be written to disk
    #[error("store error: {0}")]
    Store(String),

    /// Artifact is on disk but its row count could not be read
    #[error("inspect error: {0}")]
    Inspect(String),
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Seam between pagination and the export endpoint.
///
/// Implementations fetch exactly one window, persist whatever payload
/// came back, and return the number of data rows it contained. The
/// count drives the caller's decision to keep paging or move on.
#[async_trait]
pub trait WindowFetcher: Send + Sync {
    /// Fetch one window and report its data-row count.
    async fn fetch_window(&self, window: &Window) -> FetchResult<u64>;
}
