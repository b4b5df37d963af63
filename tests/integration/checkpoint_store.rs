//! Integration tests for checkpoint durability
//!
//! The checkpoint file is the only thing standing between a crash and
//! a full re-harvest, so these exercise atomic replacement, lenient
//! parsing of older records, and the single-instance lock.

use std::path::Path;

use chrono::NaiveDate;
use tempfile::TempDir;
use zakupki_harvester::checkpoint::{Checkpoint, CheckpointStore, StateLock};

use super::support::day;

fn list_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

// Save then load round-trips the record.

#[test]
fn saved_checkpoint_loads_back() {
    let tmp = TempDir::new().unwrap();
    let store = CheckpointStore::new(tmp.path().join("state.json"));
    let checkpoint = Checkpoint::new(day(2023, 5, 1), 2501);

    store.save(&checkpoint).unwrap();

    assert_eq!(store.load(), Some(checkpoint));
}

#[test]
fn save_creates_missing_parent_directories() {
    let tmp = TempDir::new().unwrap();
    let store = CheckpointStore::new(tmp.path().join("settings").join("state.json"));

    store.save(&Checkpoint::new(day(2012, 10, 10), 1)).unwrap();

    assert!(tmp.path().join("settings").join("state.json").is_file());
}

// Replacement is atomic: after any number of saves the directory holds
// exactly the state file, never a half-written temp.

#[test]
fn repeated_saves_leave_no_temp_files() {
    let tmp = TempDir::new().unwrap();
    let store = CheckpointStore::new(tmp.path().join("state.json"));

    for offset in (1..5001).step_by(500) {
        store
            .save(&Checkpoint::new(day(2012, 10, 10), offset))
            .unwrap();
    }

    let files = list_files(tmp.path());
    assert_eq!(files, vec!["state.json".to_string()]);
    assert_eq!(
        store.load(),
        Some(Checkpoint::new(day(2012, 10, 10), 4501))
    );
}

#[test]
fn concurrent_saves_never_corrupt_the_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("state.json");

    let handles: Vec<_> = (0..8u32)
        .map(|i| {
            let path = path.clone();
            std::thread::spawn(move || {
                let store = CheckpointStore::new(path);
                for offset in 1..50 {
                    store
                        .save(&Checkpoint::new(day(2023, 5, 1 + i), offset))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Whichever writer won, the record must parse.
    let store = CheckpointStore::new(&path);
    assert!(store.load().is_some());
}

// Unreadable records fall back to "no checkpoint".

#[test]
fn missing_file_loads_as_none() {
    let tmp = TempDir::new().unwrap();
    let store = CheckpointStore::new(tmp.path().join("state.json"));

    assert_eq!(store.load(), None);
}

#[test]
fn corrupt_json_loads_as_none() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("state.json");
    std::fs::write(&path, "not json at all {{{").unwrap();

    assert_eq!(CheckpointStore::new(&path).load(), None);
}

#[test]
fn unparseable_date_loads_as_none() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("state.json");
    std::fs::write(
        &path,
        r#"{"cursor_date": "10.10.2012", "block_offset": 501}"#,
    )
    .unwrap();

    assert_eq!(CheckpointStore::new(&path).load(), None);
}

// Records written before the offset field existed load with the offset
// defaulted, so an old deployment's state file still resumes.

#[test]
fn record_without_offset_defaults_to_the_first_window() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("state.json");
    std::fs::write(&path, r#"{"cursor_date": "2023-05-01"}"#).unwrap();

    let checkpoint = CheckpointStore::new(&path).load().unwrap();

    assert_eq!(
        checkpoint.cursor_date,
        NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()
    );
    assert_eq!(checkpoint.block_offset, 1);
}

// One harvester per state file.

#[test]
fn state_lock_rejects_a_second_instance() {
    let tmp = TempDir::new().unwrap();
    let state = tmp.path().join("state.json");

    let mut first = StateLock::open(&state).unwrap();
    let _running = first.try_exclusive().unwrap();

    let mut second = StateLock::open(&state).unwrap();
    assert!(second.try_exclusive().is_err());
}

#[test]
fn state_lock_releases_on_drop() {
    let tmp = TempDir::new().unwrap();
    let state = tmp.path().join("state.json");

    {
        let mut lock = StateLock::open(&state).unwrap();
        let _guard = lock.try_exclusive().unwrap();
    }

    let mut next = StateLock::open(&state).unwrap();
    assert!(next.try_exclusive().is_ok());
}
