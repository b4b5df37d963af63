//! Artifact file naming
//!
//! Window artifacts use a flat layout inside the output directory with
//! one file per fetched window:
//!
//! `{DD.MM.YYYY}_OrderSearch({from}-{to}).csv`
//!
//! The day is rendered in the export service's own date format so the
//! on-disk name matches the `publishDateFrom`/`publishDateTo` query
//! parameters that produced it, and the offset range pins down which
//! block of the day the file holds.

use crate::Window;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Render a day in the export service's `DD.MM.YYYY` form.
pub fn format_export_date(day: NaiveDate) -> String {
    day.format("%d.%m.%Y").to_string()
}

/// File name for one window's artifact.
pub fn window_file_name(day: NaiveDate, offset_from: u32, offset_to: u32) -> String {
    format!(
        "{}_OrderSearch({}-{}).csv",
        format_export_date(day),
        offset_from,
        offset_to
    )
}

/// Full artifact path for a window inside the output directory.
pub fn window_path(output_dir: &Path, window: &Window) -> PathBuf {
    output_dir.join(window_file_name(
        window.day,
        window.offset_from,
        window.offset_to,
    ))
}
