//! Wall-clock abstraction for the scheduler and the day-rollover logic.
//!
//! "Today" decides whether the engine backfills or waits for the daily
//! trigger, and the trigger compares against the current local hour.
//! Both go through [`Clock`] so tests can pin time.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of the current local date and time.
pub trait Clock: Send + Sync {
    /// Current local date and time (naive; the engine never crosses zones).
    fn now(&self) -> NaiveDateTime;

    /// Current local calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The system clock in the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
