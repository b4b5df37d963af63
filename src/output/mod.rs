//! Export artifact storage
//!
//! Every fetched window lands on disk as a raw CSV file before any
//! inspection happens, so a payload that later turns out to be
//! malformed is still available for offline debugging. This module
//! owns the artifact naming scheme and the row-count inspection that
//! drives pagination.

use std::path::Path;

pub mod csv;
pub mod path;

pub use csv::count_data_rows;
pub use path::{window_file_name, window_path};

/// Artifact storage and inspection errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error while preparing directories or writing an artifact
    #[error("IO error: {0}")]
    Io(String),

    /// CSV payload could not be parsed during inspection
    #[error("CSV error: {0}")]
    Csv(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Create the artifact directory if it does not exist yet.
pub fn ensure_output_dir(dir: &Path) -> OutputResult<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| OutputError::Io(format!("failed to create directory {}: {e}", dir.display())))
}
