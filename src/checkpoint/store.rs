//! Checkpoint record and its durable store.
//!
//! The record is overwritten wholesale on every update; a crash mid-write
//! must leave either the old or the new value on disk, never a torn file.

use crate::config::FIRST_OFFSET;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Checkpoint store errors.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    /// Filesystem failure while reading or replacing the record.
    #[error("IO error: {0}")]
    Io(String),

    /// The record could not be encoded.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// The instance lock could not be opened or acquired.
    #[error("lock error: {0}")]
    Lock(String),
}

/// Durable resumption cursor: the next day and offset window to fetch.
///
/// `block_offset` always names work that has *not* been done yet. A missing
/// offset field in a persisted record falls back to the first offset; a
/// missing or unparseable date makes the whole record corrupt (handled by
/// [`CheckpointStore::load`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Day the next window belongs to.
    pub cursor_date: NaiveDate,
    /// 1-based offset of the next window to fetch within that day.
    #[serde(default = "first_offset")]
    pub block_offset: u32,
}

fn first_offset() -> u32 {
    FIRST_OFFSET
}

impl Checkpoint {
    /// Cursor pointing at `block_offset` within `cursor_date`.
    pub fn new(cursor_date: NaiveDate, block_offset: u32) -> Self {
        Self {
            cursor_date,
            block_offset,
        }
    }

    /// Cursor at the first offset of the day after this one.
    pub fn next_day(&self) -> Self {
        Self {
            cursor_date: self
                .cursor_date
                .succ_opt()
                .expect("calendar date within chrono range"),
            block_offset: FIRST_OFFSET,
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} offset {}", self.cursor_date, self.block_offset)
    }
}

/// Reads and atomically replaces the persisted [`Checkpoint`].
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    /// Store backed by the record file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted cursor.
    ///
    /// A missing file is normal (first run). Anything unreadable or
    /// unparseable is logged and treated as absent: corruption must never
    /// stop the engine, it just restarts the backlog from defaults.
    pub fn load(&self) -> Option<Checkpoint> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no checkpoint on disk");
                return None;
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "checkpoint unreadable, treating as absent"
                );
                return None;
            }
        };

        match serde_json::from_str::<Checkpoint>(&raw) {
            Ok(checkpoint) => {
                debug!(%checkpoint, "checkpoint loaded");
                Some(checkpoint)
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "checkpoint corrupt, treating as absent"
                );
                None
            }
        }
    }

    /// Atomically replace the persisted cursor.
    ///
    /// Writes to a temp file in the same directory, fsyncs, then renames
    /// over the target; the parent directory is fsynced afterwards so the
    /// rename itself survives a crash.
    pub fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CheckpointError::Io(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(checkpoint)
            .map_err(|e| CheckpointError::Serialize(e.to_string()))?;

        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| CheckpointError::Io(format!("create temp file: {e}")))?;

        temp.write_all(json.as_bytes())
            .map_err(|e| CheckpointError::Io(format!("write temp file: {e}")))?;
        temp.flush()
            .map_err(|e| CheckpointError::Io(format!("flush temp file: {e}")))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| CheckpointError::Io(format!("sync temp file: {e}")))?;

        temp.persist(&self.path)
            .map_err(|e| CheckpointError::Io(format!("replace {}: {e}", self.path.display())))?;

        // Rename durability is best-effort; the data itself is already synced.
        if let Some(parent) = self.path.parent() {
            if let Ok(dir) = std::fs::File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        debug!(%checkpoint, path = %self.path.display(), "checkpoint saved");
        Ok(())
    }
}
