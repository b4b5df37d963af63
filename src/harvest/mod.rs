//! Harvest orchestration
//!
//! Three layers sit on top of the window fetcher. Day pagination walks
//! one calendar day in fixed-size offset windows and persists the
//! cursor after every window. The backlog driver replays whole days
//! from the checkpoint up to today. Once the cursor reaches today the
//! engine switches to a scheduler gate that runs today's session once
//! per day after the trigger hour.

pub mod engine;

pub use engine::Harvester;

/// How one day session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOutcome {
    /// A short window showed the day has no more rows
    Exhausted,
    /// The offset cap was reached without a short window
    Capped,
    /// Shutdown was requested mid-session
    Interrupted,
}

/// How one harvest pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The backlog is drained up to today
    CaughtUp,
    /// Shutdown was requested
    Shutdown,
}

/// Outcome of one daily trigger invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// The trigger hour has not been reached yet
    NotDue,
    /// Today's session ran to completion
    Completed,
    /// Shutdown was requested mid-session
    Interrupted,
}
