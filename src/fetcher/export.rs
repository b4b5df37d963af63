//! Window fetch pipeline
//!
//! One fetch is: build the query, request with a bounded retry on
//! non-success statuses, write whatever body came back to the artifact
//! path, then count its rows. The artifact always lands on disk before
//! inspection so a malformed payload is still kept for debugging.

use super::query::build_window_query;
use super::transport::{ExportTransport, RawResponse};
use super::{FetchError, FetchResult, WindowFetcher};
use crate::config::HarvestConfig;
use crate::output;
use crate::Window;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetches windows from the export endpoint and stores their artifacts.
pub struct ExportFetcher {
    transport: Arc<dyn ExportTransport>,
    config: Arc<HarvestConfig>,
}

impl ExportFetcher {
    /// Create a fetcher over the given transport.
    pub fn new(transport: Arc<dyn ExportTransport>, config: Arc<HarvestConfig>) -> Self {
        Self { transport, config }
    }

    /// Request one window, retrying while the service answers with a
    /// non-success status.
    ///
    /// Transport failures are not retried: a request that never
    /// completed gives no status to react to, and the caller already
    /// treats the whole window as failed.
    async fn request_with_retry(&self, query: &[(String, String)]) -> FetchResult<RawResponse> {
        let attempts = self.config.attempts_per_window();
        let mut last_status = 0;

        for attempt in 1..=attempts {
            if attempt > 1 {
                tokio::time::sleep(self.config.retry_delay).await;
            }

            let response = self.transport.get(query).await?;
            if response.is_success() {
                if attempt > 1 {
                    debug!(attempt, "request succeeded after retry");
                }
                return Ok(response);
            }

            last_status = response.status;
            warn!(
                status = response.status,
                attempt, attempts, "export request returned non-success status"
            );
        }

        Err(FetchError::Status {
            status: last_status,
            attempts,
        })
    }
}

#[async_trait]
impl WindowFetcher for ExportFetcher {
    async fn fetch_window(&self, window: &Window) -> FetchResult<u64> {
        let query = build_window_query(window);
        let response = self.request_with_retry(&query).await?;

        let path = output::window_path(&self.config.output_dir, window);
        std::fs::write(&path, &response.body)
            .map_err(|e| FetchError::Store(format!("failed to write {}: {e}", path.display())))?;
        debug!(path = %path.display(), bytes = response.body.len(), "stored artifact");

        let rows = output::count_data_rows(&path).map_err(|e| FetchError::Inspect(e.to_string()))?;

        Ok(rows)
    }
}
