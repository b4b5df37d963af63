//! HTTP transport for the export endpoint
//!
//! A thin seam over the actual HTTP round trip so the retry and
//! storage logic above it can be exercised against scripted responses.
//! The body is kept as raw bytes: payloads are `windows-1251` encoded
//! and are written to disk untouched.

use super::{FetchError, FetchResult};
use crate::config::HarvestConfig;
use async_trait::async_trait;
use bytes::Bytes;

/// One raw response from the export endpoint.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, untouched
    pub body: Bytes,
}

impl RawResponse {
    /// Whether the status falls in the success class.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport seam below [`ExportFetcher`](super::ExportFetcher).
#[async_trait]
pub trait ExportTransport: Send + Sync {
    /// Issue one GET with the given query and return the raw outcome.
    ///
    /// Completed requests are `Ok` whatever their status code; `Err`
    /// means the exchange itself failed (connect, timeout, read).
    async fn get(&self, query: &[(String, String)]) -> FetchResult<RawResponse>;
}

/// reqwest-backed transport used in production.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// Build a transport from the harvest configuration.
    ///
    /// The configured user agent and request timeout apply to every
    /// request issued through the shared client.
    pub fn new(config: &HarvestConfig) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl ExportTransport for HttpTransport {
    async fn get(&self, query: &[(String, String)]) -> FetchResult<RawResponse> {
        let response = self
            .client
            .get(&self.url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("request failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(format!("failed to read response body: {e}")))?;

        Ok(RawResponse { status, body })
    }
}
