//! Full-data export use-case.
//!
//! # Responsibility
//! - Assemble entries, collections with members and trackers with values
//!   into one serializable snapshot.
//!
//! # Invariants
//! - Export is read-only.
//! - All reads share one transaction, so the snapshot is point-in-time.

use crate::model::collection::Collection;
use crate::model::entry::Entry;
use crate::model::tracker::{Tracker, TrackerValue};
use crate::repo::collection_repo::{CollectionRepository, SqliteCollectionRepository};
use crate::repo::entry_repo::{EntryFilter, EntryRepository, SqliteEntryRepository};
use crate::repo::tracker_repo::{SqliteTrackerRepository, TrackerOrder, TrackerRepository};
use crate::repo::RepoResult;
use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Point-in-time serialization of all persisted journal data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalSnapshot {
    /// RFC 3339 UTC timestamp with millisecond precision.
    #[serde(rename = "exportedAt")]
    pub exported_at: String,
    pub entries: Vec<Entry>,
    pub collections: Vec<CollectionSnapshot>,
    pub trackers: Vec<TrackerSnapshot>,
}

/// Collection with its member entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    #[serde(flatten)]
    pub collection: Collection,
    pub entries: Vec<Entry>,
}

/// Tracker with its value history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    #[serde(flatten)]
    pub tracker: Tracker,
    pub values: Vec<TrackerValue>,
}

/// Exports all journal data stamped with the current time.
pub fn export_snapshot(conn: &Connection) -> RepoResult<JournalSnapshot> {
    export_snapshot_at(conn, Utc::now())
}

/// Exports all journal data stamped with `exported_at`.
pub fn export_snapshot_at(
    conn: &Connection,
    exported_at: DateTime<Utc>,
) -> RepoResult<JournalSnapshot> {
    let started_at = Instant::now();
    let tx = conn.unchecked_transaction()?;

    let entry_repo = SqliteEntryRepository::try_new(&tx)?;
    let collection_repo = SqliteCollectionRepository::try_new(&tx)?;
    let tracker_repo = SqliteTrackerRepository::try_new(&tx)?;

    let entries = entry_repo.list_entries(&EntryFilter::default())?;

    let mut collections = Vec::new();
    for collection in collection_repo.list_collections()? {
        let members = collection_repo.list_collection_entries(collection.id)?;
        collections.push(CollectionSnapshot {
            collection,
            entries: members,
        });
    }

    let mut trackers = Vec::new();
    for tracker in tracker_repo.list_trackers(TrackerOrder::Id)? {
        let values = tracker_repo.list_values(tracker.id)?;
        trackers.push(TrackerSnapshot { tracker, values });
    }

    tx.commit()?;

    info!(
        "event=export_snapshot module=service status=ok entries={} collections={} trackers={} duration_ms={}",
        entries.len(),
        collections.len(),
        trackers.len(),
        started_at.elapsed().as_millis()
    );

    Ok(JournalSnapshot {
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        entries,
        collections,
        trackers,
    })
}
