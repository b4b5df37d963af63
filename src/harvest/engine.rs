//! Harvest engine
//!
//! The engine owns the checkpoint roll-forward discipline: the cursor
//! on disk always points at the next window to fetch, never at one
//! already in flight. Every window, successful or not, advances the
//! offset and persists before the next request goes out, so a crash at
//! any point resumes without refetching more than the window that was
//! interrupted.

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::clock::{Clock, SystemClock};
use crate::config::{HarvestConfig, FIRST_OFFSET};
use crate::fetcher::WindowFetcher;
use crate::harvest::{DayOutcome, GateOutcome, RunOutcome};
use crate::shutdown::{self, SharedShutdown};
use crate::Window;
use chrono::{NaiveDate, Timelike};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Drives pagination, backlog catch-up, and the daily trigger.
pub struct Harvester {
    config: Arc<HarvestConfig>,
    store: CheckpointStore,
    fetcher: Arc<dyn WindowFetcher>,
    clock: Arc<dyn Clock>,
    shutdown: Option<SharedShutdown>,
}

impl Harvester {
    /// Create a harvester over the given fetcher and checkpoint store.
    pub fn new(
        config: Arc<HarvestConfig>,
        store: CheckpointStore,
        fetcher: Arc<dyn WindowFetcher>,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
            clock: Arc::new(SystemClock),
            shutdown: shutdown::global(),
        }
    }

    /// Replace the wall clock used for day rollover and the trigger hour.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attach a shared shutdown handle for graceful cancellation.
    pub fn with_shutdown(mut self, shutdown: SharedShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Run one harvest pass.
    ///
    /// A cursor behind today means there is backlog to drain; the pass
    /// returns [`RunOutcome::CaughtUp`] once the cursor reaches today
    /// and the caller decides whether to start another pass. A cursor
    /// at (or past) today hands control to the live scheduler, which
    /// only returns on shutdown.
    pub async fn run(&self) -> RunOutcome {
        let today = self.clock.today();
        let checkpoint = self.load_or_default();
        info!(cursor = %checkpoint, today = %today, "harvest pass starting");

        if checkpoint.cursor_date < today {
            self.run_backfill(checkpoint, today).await
        } else {
            self.run_live(today).await
        }
    }

    /// Paginate one day in window-size steps starting at `start_offset`.
    ///
    /// The cursor is persisted after every window, including failed
    /// ones: a window that could not be fetched or inspected leaves an
    /// unknown row count behind, and the session moves on rather than
    /// wedging the whole harvest on one bad block.
    pub async fn process_day(&self, day: NaiveDate, start_offset: u32) -> DayOutcome {
        let mut block_from = start_offset.max(FIRST_OFFSET);
        info!(day = %day, block_from, "processing day");

        while block_from < self.config.max_offset {
            if self.shutdown_requested() {
                info!(day = %day, block_from, "shutdown requested, leaving day session");
                return DayOutcome::Interrupted;
            }

            let window = Window::spanning(day, block_from, self.config.window_size);
            debug!(window = %window, "fetching window");

            let rows = match self.fetcher.fetch_window(&window).await {
                Ok(rows) => {
                    info!(window = %window, rows, "window fetched");
                    Some(rows)
                }
                Err(e) => {
                    error!(window = %window, error = %e, "window failed, row count unknown");
                    None
                }
            };

            block_from += self.config.window_size;
            self.persist(&Checkpoint::new(day, block_from));

            if let Some(rows) = rows {
                if rows < u64::from(self.config.window_size) {
                    info!(day = %day, rows, "short window, day exhausted");
                    return DayOutcome::Exhausted;
                }
            }

            if !self.pause(self.config.politeness_delay).await {
                return DayOutcome::Interrupted;
            }
        }

        info!(day = %day, "offset cap reached, day treated as complete");
        DayOutcome::Capped
    }

    /// Replay whole days from the checkpoint until the cursor reaches
    /// `today`.
    ///
    /// Only the first day resumes from the stored offset; day rollover
    /// persists a fresh cursor at the first offset of the next day.
    async fn run_backfill(&self, mut checkpoint: Checkpoint, today: NaiveDate) -> RunOutcome {
        info!(cursor = %checkpoint, "draining backlog");

        let mut start_offset = checkpoint.block_offset;
        while checkpoint.cursor_date < today {
            let outcome = self.process_day(checkpoint.cursor_date, start_offset).await;
            if outcome == DayOutcome::Interrupted {
                return RunOutcome::Shutdown;
            }
            checkpoint = checkpoint.next_day();
            self.persist(&checkpoint);
            start_offset = FIRST_OFFSET;
        }

        info!(cursor = %checkpoint, "backlog drained");
        RunOutcome::CaughtUp
    }

    /// Poll the clock and run today's session once the trigger hour
    /// passes, at most once per calendar day.
    async fn run_live(&self, today: NaiveDate) -> RunOutcome {
        // A cursor already past today means today's session completed in
        // an earlier run; the next trigger belongs to tomorrow.
        let mut last_fired = match self.store.load() {
            Some(checkpoint) if checkpoint.cursor_date > today => Some(today),
            _ => None,
        };
        info!(
            trigger_hour = self.config.trigger_hour,
            already_done_today = last_fired.is_some(),
            "live mode, waiting for the daily trigger"
        );

        loop {
            if self.shutdown_requested() {
                return RunOutcome::Shutdown;
            }

            let now = self.clock.now();
            if now.hour() >= self.config.trigger_hour && last_fired != Some(now.date()) {
                match self.run_daily_trigger().await {
                    GateOutcome::Interrupted => return RunOutcome::Shutdown,
                    GateOutcome::Completed => last_fired = Some(now.date()),
                    GateOutcome::NotDue => {}
                }
            }

            if !self.pause(self.config.poll_interval).await {
                return RunOutcome::Shutdown;
            }
        }
    }

    /// Run today's session if the trigger hour has been reached.
    ///
    /// The stored offset is honored so a session interrupted after the
    /// trigger resumes mid-day, but the stored date is not consulted:
    /// the session always targets today. Completion pushes the cursor
    /// to tomorrow's first window.
    pub async fn run_daily_trigger(&self) -> GateOutcome {
        let now = self.clock.now();
        if now.hour() < self.config.trigger_hour {
            info!(
                hour = now.hour(),
                trigger_hour = self.config.trigger_hour,
                "trigger hour not reached yet"
            );
            return GateOutcome::NotDue;
        }

        let today = now.date();
        let block_offset = self
            .store
            .load()
            .map(|checkpoint| checkpoint.block_offset)
            .unwrap_or(FIRST_OFFSET);
        info!(day = %today, block_offset, "running today's session");

        if self.process_day(today, block_offset).await == DayOutcome::Interrupted {
            return GateOutcome::Interrupted;
        }

        self.persist(&Checkpoint::new(today, FIRST_OFFSET).next_day());
        GateOutcome::Completed
    }

    fn load_or_default(&self) -> Checkpoint {
        self.store.load().unwrap_or_else(|| {
            info!(start = %self.config.start_date, "no usable checkpoint, starting from the beginning");
            Checkpoint::new(self.config.start_date, FIRST_OFFSET)
        })
    }

    /// Persist failures are logged and swallowed: losing one cursor
    /// write costs at most a refetch of already-stored windows.
    fn persist(&self, checkpoint: &Checkpoint) {
        if let Err(e) = self.store.save(checkpoint) {
            warn!(error = %e, cursor = %checkpoint, "failed to persist checkpoint");
        }
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .map(|s| s.is_requested())
            .unwrap_or(false)
    }

    /// Sleep for `duration`, waking early on shutdown. Returns `false`
    /// when shutdown cut the wait short.
    async fn pause(&self, duration: Duration) -> bool {
        if self.shutdown_requested() {
            return false;
        }
        if let Some(shutdown) = &self.shutdown {
            tokio::select! {
                _ = tokio::time::sleep(duration) => true,
                _ = shutdown.wait() => false,
            }
        } else {
            tokio::time::sleep(duration).await;
            true
        }
    }
}
