//! Writes journal snapshots to disk.

use chrono::{DateTime, TimeZone, Utc};
use journal_core::JournalSnapshot;
use std::io;
use std::path::Path;

/// `bullet-journal-export-YYYY-MM-DD.json`, dated by the UTC day of `now`.
pub fn default_export_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    let day = now.with_timezone(&Utc).date_naive();
    format!("bullet-journal-export-{}.json", day.format("%Y-%m-%d"))
}

/// Serializes `snapshot` as JSON with 2-space indentation and writes it.
pub fn write_snapshot(snapshot: &JournalSnapshot, path: &Path) -> io::Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json)
}
