//! Tracker repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/create APIs over `trackers`.
//! - Upsert and list per-day values in `tracker_values`.
//!
//! # Invariants
//! - `(tracker_id, date)` is unique; logging an existing day overwrites it.
//! - Values are persisted as text.

use crate::model::tracker::{
    LogValue, LoggedValue, NewTracker, Tracker, TrackerId, TrackerType, TrackerValue,
};
use crate::repo::{ensure_tables, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Ordering used when listing trackers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerOrder {
    /// Alphabetical, for pickers and lists.
    #[default]
    Name,
    /// Creation order, for exports.
    Id,
}

/// Repository interface for tracker operations.
pub trait TrackerRepository {
    /// Lists trackers in the requested order.
    fn list_trackers(&self, order: TrackerOrder) -> RepoResult<Vec<Tracker>>;
    /// Validates and inserts one tracker.
    fn create_tracker(&self, tracker: &NewTracker) -> RepoResult<Tracker>;
    /// Stores the value for one tracker day, replacing any previous value.
    fn log_value(
        &self,
        tracker_id: TrackerId,
        date: &str,
        value: &LogValue,
    ) -> RepoResult<LoggedValue>;
    /// Lists logged values ordered by date ascending.
    fn list_values(&self, tracker_id: TrackerId) -> RepoResult<Vec<TrackerValue>>;
}

/// SQLite-backed tracker repository.
pub struct SqliteTrackerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTrackerRepository<'conn> {
    /// Constructs a repository from an initialized connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["trackers", "tracker_values"])?;
        Ok(Self { conn })
    }
}

impl TrackerRepository for SqliteTrackerRepository<'_> {
    fn list_trackers(&self, order: TrackerOrder) -> RepoResult<Vec<Tracker>> {
        let sql = match order {
            TrackerOrder::Name => "SELECT id, name, type, unit FROM trackers ORDER BY name ASC, id ASC;",
            TrackerOrder::Id => "SELECT id, name, type, unit FROM trackers ORDER BY id ASC;",
        };
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut trackers = Vec::new();
        while let Some(row) = rows.next()? {
            trackers.push(parse_tracker_row(row)?);
        }
        Ok(trackers)
    }

    fn create_tracker(&self, tracker: &NewTracker) -> RepoResult<Tracker> {
        let valid = tracker.validate()?;

        self.conn.execute(
            "INSERT INTO trackers (name, type, unit) VALUES (?1, ?2, ?3);",
            params![valid.name, valid.kind.as_str(), valid.unit],
        )?;

        Ok(Tracker {
            id: self.conn.last_insert_rowid(),
            name: valid.name.to_string(),
            kind: valid.kind,
            unit: valid.unit.map(str::to_string),
        })
    }

    fn log_value(
        &self,
        tracker_id: TrackerId,
        date: &str,
        value: &LogValue,
    ) -> RepoResult<LoggedValue> {
        let stored = value.to_storage_string();
        self.conn.execute(
            "INSERT INTO tracker_values (tracker_id, date, value)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(tracker_id, date) DO UPDATE SET value = excluded.value;",
            params![tracker_id, date, stored.as_str()],
        )?;

        Ok(LoggedValue {
            tracker_id,
            date: date.to_string(),
            value: stored,
        })
    }

    fn list_values(&self, tracker_id: TrackerId) -> RepoResult<Vec<TrackerValue>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, value
             FROM tracker_values
             WHERE tracker_id = ?1
             ORDER BY date ASC;",
        )?;
        let values = stmt
            .query_map([tracker_id], |row| {
                Ok(TrackerValue {
                    date: row.get("date")?,
                    value: row.get("value")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }
}

fn parse_tracker_row(row: &Row<'_>) -> RepoResult<Tracker> {
    let type_text: String = row.get("type")?;
    let kind = TrackerType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid tracker type `{type_text}` in trackers.type"))
    })?;

    Ok(Tracker {
        id: row.get("id")?,
        name: row.get("name")?,
        kind,
        unit: row.get("unit")?,
    })
}
