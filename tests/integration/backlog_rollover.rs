//! Integration tests for multi-day backlog catch-up
//!
//! When the stored cursor is behind today, a harvest pass drains one
//! day at a time, rolling the cursor forward after each finished day
//! until it reaches today.

use std::sync::Arc;

use tempfile::TempDir;
use zakupki_harvester::harvest::RunOutcome;
use zakupki_harvester::{Checkpoint, CheckpointStore, Harvester};

use super::support::{day, test_config, FixedClock, ScriptedFetcher};

fn harvester(
    tmp: &TempDir,
    fetcher: Arc<ScriptedFetcher>,
    clock: Arc<FixedClock>,
) -> (Harvester, CheckpointStore) {
    let config = Arc::new(test_config(tmp));
    let store = CheckpointStore::new(&config.state_file);
    let engine =
        Harvester::new(config.clone(), CheckpointStore::new(&config.state_file), fetcher)
            .with_clock(clock);
    (engine, store)
}

#[tokio::test]
async fn backlog_drains_day_by_day_until_today() {
    let tmp = TempDir::new().unwrap();
    let fetcher = ScriptedFetcher::constant(137);
    let clock = FixedClock::at(day(2012, 10, 12), 12);
    let (engine, store) = harvester(&tmp, fetcher.clone(), clock);
    store
        .save(&Checkpoint::new(day(2012, 10, 10), 1))
        .unwrap();

    let outcome = engine.run().await;

    assert_eq!(outcome, RunOutcome::CaughtUp);
    // One short window per pending day, today itself untouched.
    let windows = fetcher.windows();
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].day, day(2012, 10, 10));
    assert_eq!(windows[1].day, day(2012, 10, 11));
    assert_eq!(store.load(), Some(Checkpoint::new(day(2012, 10, 12), 1)));
}

#[tokio::test]
async fn first_backlog_day_resumes_from_stored_offset() {
    let tmp = TempDir::new().unwrap();
    let fetcher = ScriptedFetcher::constant(9);
    let clock = FixedClock::at(day(2012, 10, 11), 12);
    let (engine, store) = harvester(&tmp, fetcher.clone(), clock);
    store
        .save(&Checkpoint::new(day(2012, 10, 10), 1501))
        .unwrap();

    let outcome = engine.run().await;

    assert_eq!(outcome, RunOutcome::CaughtUp);
    let windows = fetcher.windows();
    assert_eq!(windows[0].day, day(2012, 10, 10));
    assert_eq!(windows[0].offset_from, 1501);
    assert_eq!(store.load(), Some(Checkpoint::new(day(2012, 10, 11), 1)));
}

#[tokio::test]
async fn later_backlog_days_start_from_the_first_window() {
    let tmp = TempDir::new().unwrap();
    let fetcher = ScriptedFetcher::constant(42);
    let clock = FixedClock::at(day(2012, 10, 12), 12);
    let (engine, store) = harvester(&tmp, fetcher.clone(), clock);
    // Mid-day offset on the first pending day must not leak into the next.
    store
        .save(&Checkpoint::new(day(2012, 10, 10), 3001))
        .unwrap();

    engine.run().await;

    let windows = fetcher.windows();
    assert_eq!(windows[0].offset_from, 3001);
    assert_eq!(windows[1].day, day(2012, 10, 11));
    assert_eq!(windows[1].offset_from, 1);
}

#[tokio::test]
async fn missing_checkpoint_starts_at_the_default_start_date() {
    let tmp = TempDir::new().unwrap();
    let fetcher = ScriptedFetcher::constant(7);
    let clock = FixedClock::at(day(2012, 10, 11), 12);
    let (engine, store) = harvester(&tmp, fetcher.clone(), clock);

    let outcome = engine.run().await;

    assert_eq!(outcome, RunOutcome::CaughtUp);
    assert_eq!(fetcher.windows()[0].day, day(2012, 10, 10));
    assert_eq!(store.load(), Some(Checkpoint::new(day(2012, 10, 11), 1)));
}

#[tokio::test]
async fn corrupt_checkpoint_restarts_from_the_beginning() {
    let tmp = TempDir::new().unwrap();
    let fetcher = ScriptedFetcher::constant(7);
    let clock = FixedClock::at(day(2012, 10, 11), 12);
    let (engine, store) = harvester(&tmp, fetcher.clone(), clock);
    let state_file = tmp.path().join("settings").join("state.json");
    std::fs::create_dir_all(state_file.parent().unwrap()).unwrap();
    std::fs::write(&state_file, "{not json").unwrap();

    let outcome = engine.run().await;

    assert_eq!(outcome, RunOutcome::CaughtUp);
    assert_eq!(fetcher.windows()[0].day, day(2012, 10, 10));
    assert_eq!(store.load(), Some(Checkpoint::new(day(2012, 10, 11), 1)));
}
