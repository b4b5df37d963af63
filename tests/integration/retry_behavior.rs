//! Integration tests for retry behavior across the full fetch stack
//!
//! These wire a scripted transport under the real [`ExportFetcher`] and
//! the day session, so the retry budget, the skip-on-exhaustion rule,
//! and artifact storage are exercised together.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::TempDir;
use zakupki_harvester::fetcher::{
    ExportFetcher, ExportTransport, FetchError, FetchResult, RawResponse, WindowFetcher,
};
use zakupki_harvester::harvest::DayOutcome;
use zakupki_harvester::{Checkpoint, CheckpointStore, Harvester, Window};

use super::support::{day, test_config};

const SHORT_BODY: &str = "number;name;price\n1;notice one;100.00\n";

/// Transport double that replays scripted outcomes, then keeps
/// answering the fallback status with an empty body.
struct ScriptedTransport {
    script: Mutex<VecDeque<FetchResult<RawResponse>>>,
    fallback: u16,
    calls: AtomicU32,
}

impl ScriptedTransport {
    fn new(script: Vec<FetchResult<RawResponse>>, fallback: u16) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback,
            calls: AtomicU32::new(0),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

fn ok(status: u16, body: &str) -> FetchResult<RawResponse> {
    Ok(RawResponse {
        status,
        body: Bytes::copy_from_slice(body.as_bytes()),
    })
}

#[async_trait]
impl ExportTransport for ScriptedTransport {
    async fn get(&self, _query: &[(String, String)]) -> FetchResult<RawResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(outcome) => outcome,
            None => ok(self.fallback, ""),
        }
    }
}

fn fetcher(tmp: &TempDir, transport: Arc<ScriptedTransport>) -> ExportFetcher {
    ExportFetcher::new(transport, Arc::new(test_config(tmp)))
}

fn store_path(tmp: &TempDir) -> std::path::PathBuf {
    tmp.path().join("settings").join("state.json")
}

#[tokio::test]
async fn non_success_status_exhausts_three_attempts() {
    let tmp = TempDir::new().unwrap();
    let transport = ScriptedTransport::new(Vec::new(), 500);
    let export = fetcher(&tmp, transport.clone());
    let window = Window::spanning(day(2012, 10, 10), 1, 500);

    let result = export.fetch_window(&window).await;

    assert_eq!(transport.calls(), 3);
    match result {
        Err(FetchError::Status { status, attempts }) => {
            assert_eq!(status, 500);
            assert_eq!(attempts, 3);
        }
        other => panic!("expected status failure, got {other:?}"),
    }
}

#[tokio::test]
async fn retry_recovers_and_stores_the_artifact() {
    let tmp = TempDir::new().unwrap();
    let transport = ScriptedTransport::new(vec![ok(502, ""), ok(200, SHORT_BODY)], 500);
    let export = fetcher(&tmp, transport.clone());
    let window = Window::spanning(day(2012, 10, 10), 1, 500);

    let rows = export.fetch_window(&window).await.unwrap();

    assert_eq!(rows, 1);
    assert_eq!(transport.calls(), 2);
    let artifact = tmp
        .path()
        .join("data")
        .join("10.10.2012_OrderSearch(1-500).csv");
    assert!(artifact.is_file());
}

#[tokio::test]
async fn transport_failure_cuts_the_attempt_sequence_short() {
    let tmp = TempDir::new().unwrap();
    let transport = ScriptedTransport::new(
        vec![
            ok(503, ""),
            Err(FetchError::Transport("connection timed out".to_string())),
        ],
        500,
    );
    let export = fetcher(&tmp, transport.clone());
    let window = Window::spanning(day(2012, 10, 10), 1, 500);

    let result = export.fetch_window(&window).await;

    // No third attempt after the transport itself gives up.
    assert_eq!(transport.calls(), 2);
    assert!(matches!(result, Err(FetchError::Transport(_))));
}

#[tokio::test]
async fn day_session_continues_past_an_exhausted_window() {
    let tmp = TempDir::new().unwrap();
    // First window burns its whole retry budget, second comes back short.
    let transport = ScriptedTransport::new(
        vec![ok(500, ""), ok(500, ""), ok(500, ""), ok(200, SHORT_BODY)],
        500,
    );
    let config = Arc::new(test_config(&tmp));
    let export: Arc<dyn WindowFetcher> =
        Arc::new(ExportFetcher::new(transport.clone(), config.clone()));
    let engine = Harvester::new(config, CheckpointStore::new(store_path(&tmp)), export);

    let outcome = engine.process_day(day(2012, 10, 10), 1).await;

    assert_eq!(outcome, DayOutcome::Exhausted);
    assert_eq!(transport.calls(), 4);
    let store = CheckpointStore::new(store_path(&tmp));
    assert_eq!(store.load(), Some(Checkpoint::new(day(2012, 10, 10), 1001)));
    // Only the recovered window left an artifact behind.
    let first = tmp
        .path()
        .join("data")
        .join("10.10.2012_OrderSearch(1-500).csv");
    let second = tmp
        .path()
        .join("data")
        .join("10.10.2012_OrderSearch(501-1000).csv");
    assert!(!first.exists());
    assert!(second.is_file());
}

#[tokio::test]
async fn every_window_failing_spends_the_full_retry_budget() {
    let tmp = TempDir::new().unwrap();
    let transport = ScriptedTransport::new(Vec::new(), 500);
    let config = Arc::new(test_config(&tmp));
    let export: Arc<dyn WindowFetcher> =
        Arc::new(ExportFetcher::new(transport.clone(), config.clone()));
    let engine = Harvester::new(config, CheckpointStore::new(store_path(&tmp)), export);

    let outcome = engine.process_day(day(2012, 10, 10), 1).await;

    // Ten windows, three attempts each.
    assert_eq!(outcome, DayOutcome::Capped);
    assert_eq!(transport.calls(), 30);
}
