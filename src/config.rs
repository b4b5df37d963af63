//! Engine configuration constants and the injected [`HarvestConfig`].

use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

/// Number of records requested per window.
/// The export endpoint serves at most 500 records per request; a response
/// with fewer rows than this marks the day as exhausted.
pub const WINDOW_SIZE: u32 = 500;

/// Upper bound on the record offset within one day.
/// The endpoint never exposes more than 5000 records per day, so a day is
/// finished once the next offset would reach this cap even without a short
/// window (10 windows maximum).
pub const MAX_OFFSET: u32 = 5000;

/// Offset of the first record of a day (the endpoint counts from 1).
pub const FIRST_OFFSET: u32 = 1;

/// Earliest day with data on the endpoint; backfill starts here when no
/// checkpoint exists.
pub const DEFAULT_START_DATE: (i32, u32, u32) = (2012, 10, 10);

/// Additional attempts after a non-success status (3 requests total).
pub const RETRY_LIMIT: u32 = 2;

/// Fixed wait between retry attempts for one window.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Fixed wait between consecutive windows. Together with the retry delay
/// this is the only politeness mechanism toward the endpoint.
pub const POLITENESS_DELAY: Duration = Duration::from_secs(5);

/// Per-request timeout. The export endpoint can take tens of seconds to
/// materialize a CSV, so this is deliberately generous.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Local hour (0-23) at which the live daily pass fires.
pub const TRIGGER_HOUR: u32 = 18;

/// Wall-clock poll interval of the live scheduler loop. Trigger granularity
/// is daily, so one second of latency is immaterial.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Wait between supervised passes after a fault, so a persistent startup
/// failure cannot hot-loop.
pub const RESTART_DELAY: Duration = Duration::from_secs(5);

/// Export endpoint serving the CSV download.
pub const DEFAULT_BASE_URL: &str =
    "https://zakupki.gov.ru/epz/order/orderCsvSettings/download.html";

/// Identifying header sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows; U; Windows NT 5.1; en-US; \
rv:1.9.0.7) Gecko/2009021910 Firefox/3.0.7";

/// Default directory for window payload files.
pub const DEFAULT_OUTPUT_DIR: &str = "zakupki_data";

/// Default checkpoint file location.
pub const DEFAULT_STATE_FILE: &str = "settings/state.json";

/// Immutable configuration injected into the engine at construction.
///
/// All pacing knobs live here rather than in ambient globals so tests can
/// zero the delays and point the fetcher at a scripted transport.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Export endpoint URL.
    pub base_url: String,
    /// `User-Agent` header value sent with every request.
    pub user_agent: String,
    /// Directory receiving one CSV file per fetched window.
    pub output_dir: PathBuf,
    /// Path of the persisted checkpoint record.
    pub state_file: PathBuf,
    /// First day of the backlog when no checkpoint exists.
    pub start_date: NaiveDate,
    /// Records per window.
    pub window_size: u32,
    /// Offset cap per day.
    pub max_offset: u32,
    /// Extra attempts after a non-success status.
    pub retry_limit: u32,
    /// Wait between retry attempts.
    pub retry_delay: Duration,
    /// Wait between consecutive windows.
    pub politeness_delay: Duration,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Local hour at which the live pass fires.
    pub trigger_hour: u32,
    /// Scheduler poll interval.
    pub poll_interval: Duration,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        let (year, month, day) = DEFAULT_START_DATE;
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            start_date: NaiveDate::from_ymd_opt(year, month, day)
                .expect("default start date is a valid calendar date"),
            window_size: WINDOW_SIZE,
            max_offset: MAX_OFFSET,
            retry_limit: RETRY_LIMIT,
            retry_delay: RETRY_DELAY,
            politeness_delay: POLITENESS_DELAY,
            request_timeout: REQUEST_TIMEOUT,
            trigger_hour: TRIGGER_HOUR,
            poll_interval: POLL_INTERVAL,
        }
    }
}

impl HarvestConfig {
    /// Total request attempts per window (initial request plus retries).
    pub fn attempts_per_window(&self) -> u32 {
        self.retry_limit + 1
    }
}
