//! Row-count inspection of fetched artifacts
//!
//! The export service caps every response at one window of rows, so
//! the number of data rows in an artifact is the pagination signal: a
//! full window means more blocks may follow, a short one means the day
//! is exhausted. Payloads arrive as `windows-1251` encoded CSV, so the
//! reader walks byte records and never transcodes.

use csv::ReaderBuilder;
use std::path::Path;
use tracing::debug;

use super::{OutputError, OutputResult};

/// Field delimiter used by the export service.
const EXPORT_DELIMITER: u8 = b';';

/// Count the data rows in a window artifact.
///
/// The first record is the column header and is not counted. A payload
/// with no header row at all is rejected: the service returned
/// something that is not a CSV export, and the caller should treat the
/// window's row count as unknown.
pub fn count_data_rows(path: &Path) -> OutputResult<u64> {
    let mut reader = ReaderBuilder::new()
        .delimiter(EXPORT_DELIMITER)
        .from_path(path)
        .map_err(|e| OutputError::Io(format!("failed to open {}: {e}", path.display())))?;

    let headers = reader
        .byte_headers()
        .map_err(|e| OutputError::Csv(format!("failed to read header row: {e}")))?;
    if headers.is_empty() {
        return Err(OutputError::Csv(
            "empty payload: missing header row".to_string(),
        ));
    }

    let mut rows: u64 = 0;
    for record in reader.byte_records() {
        record.map_err(|e| OutputError::Csv(format!("malformed record: {e}")))?;
        rows += 1;
    }

    debug!(path = %path.display(), rows, "inspected artifact");
    Ok(rows)
}
