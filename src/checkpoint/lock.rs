//! Process-exclusive advisory lock on the checkpoint state.
//!
//! Two harvester processes sharing one state file would interleave cursor
//! writes; the lock makes the second instance fail fast at startup instead.

use super::store::CheckpointError;
use fd_lock::{RwLock, RwLockWriteGuard};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Advisory lock file next to the checkpoint record.
///
/// Open once, then hold the guard from [`StateLock::try_exclusive`] for the
/// process lifetime; the lock releases when the guard (or the `StateLock`)
/// is dropped.
pub struct StateLock {
    lock: RwLock<File>,
}

impl StateLock {
    /// Open (creating if needed) the lock file guarding `state_file`.
    pub fn open(state_file: &Path) -> Result<Self, CheckpointError> {
        if let Some(parent) = state_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CheckpointError::Io(e.to_string()))?;
        }

        let lock_path = state_file.with_extension("lock");
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                CheckpointError::Lock(format!("open {}: {e}", lock_path.display()))
            })?;

        Ok(Self {
            lock: RwLock::new(file),
        })
    }

    /// Take the exclusive lock without blocking.
    ///
    /// Fails immediately when another process holds it, which is the signal
    /// that a second harvester instance is already running on this state.
    pub fn try_exclusive(&mut self) -> Result<RwLockWriteGuard<'_, File>, CheckpointError> {
        self.lock.try_write().map_err(|e| {
            CheckpointError::Lock(format!(
                "state already locked by another instance: {e}"
            ))
        })
    }
}
