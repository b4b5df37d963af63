//! Durable resumption cursor.
//!
//! Persists the `{cursor_date, block_offset}` record the whole engine
//! resumes from, with atomic replace-on-write and a process-exclusive lock.

pub mod lock;
pub mod store;

pub use lock::StateLock;
pub use store::{Checkpoint, CheckpointError, CheckpointStore};
