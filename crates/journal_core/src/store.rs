//! Journal store facade.
//!
//! # Responsibility
//! - Own the single SQLite connection for the process lifetime.
//! - Expose every journal operation as one method over the repositories.
//!
//! # Invariants
//! - The connection is schema-initialized before a store exists.
//! - Logs carry ids and counts only, never entry content.

use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use crate::model::collection::{Collection, CollectionId, Membership};
use crate::model::entry::{Entry, EntryId, NewEntry};
use crate::model::tracker::{LogValue, LoggedValue, NewTracker, Tracker, TrackerId, TrackerValue};
use crate::repo::collection_repo::{CollectionRepository, SqliteCollectionRepository};
use crate::repo::entry_repo::{EntryFilter, EntryRepository, SqliteEntryRepository};
use crate::repo::tracker_repo::{SqliteTrackerRepository, TrackerOrder, TrackerRepository};
use crate::repo::RepoResult;
use crate::service::export_service::{export_snapshot, JournalSnapshot};
use crate::service::migration_service::{MigrationDirection, MigrationService};
use log::{debug, info, warn};
use rusqlite::Connection;
use std::path::Path;

/// File name of the journal database inside the app-data directory.
pub const JOURNAL_DB_FILE_NAME: &str = "journal.db";

/// Explicitly opened handle to the journal database.
pub struct JournalStore {
    conn: Connection,
}

impl JournalStore {
    /// Opens (creating when needed) the journal file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a throwaway in-memory journal.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the connection, surfacing errors a plain drop would swallow.
    pub fn close(self) -> DbResult<()> {
        self.conn.close().map_err(|(_, err)| {
            warn!("event=db_close module=store status=error error={err}");
            DbError::Sqlite(err)
        })
    }

    pub fn list_entries(&self, filter: &EntryFilter) -> RepoResult<Vec<Entry>> {
        let entries = self.entries()?.list_entries(filter)?;
        debug!(
            "event=entries_list module=store status=ok count={}",
            entries.len()
        );
        Ok(entries)
    }

    pub fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        self.entries()?.get_entry(id)
    }

    pub fn create_entry(&self, entry: &NewEntry) -> RepoResult<Entry> {
        let created = self.entries()?.create_entry(entry)?;
        info!(
            "event=entry_create module=store status=ok entry_id={} type={}",
            created.id,
            created.kind.as_str()
        );
        Ok(created)
    }

    pub fn update_entry_status(
        &self,
        id: EntryId,
        status: &str,
        date: Option<&str>,
    ) -> RepoResult<Entry> {
        let updated = self.entries()?.update_entry_status(id, status, date)?;
        info!(
            "event=entry_update_status module=store status=ok entry_id={} entry_status={}",
            id,
            updated.status.as_str()
        );
        Ok(updated)
    }

    /// Migrates an entry one calendar day forward or backward.
    pub fn migrate_entry(&self, id: EntryId, direction: MigrationDirection) -> RepoResult<Entry> {
        MigrationService::new(self.entries()?).migrate_entry(id, direction)
    }

    pub fn list_tags(&self) -> RepoResult<Vec<String>> {
        self.entries()?.list_tags()
    }

    pub fn list_collections(&self) -> RepoResult<Vec<Collection>> {
        self.collections()?.list_collections()
    }

    pub fn create_collection(&self, name: &str) -> RepoResult<Collection> {
        let created = self.collections()?.create_collection(name)?;
        info!(
            "event=collection_create module=store status=ok collection_id={}",
            created.id
        );
        Ok(created)
    }

    pub fn delete_collection(&self, id: CollectionId) -> RepoResult<()> {
        self.collections()?.delete_collection(id)?;
        info!("event=collection_delete module=store status=ok collection_id={id}");
        Ok(())
    }

    pub fn assign_entry_to_collection(
        &self,
        entry_id: EntryId,
        collection_id: CollectionId,
    ) -> RepoResult<Membership> {
        self.collections()?.assign_entry(entry_id, collection_id)
    }

    pub fn collection_entries(&self, collection_id: CollectionId) -> RepoResult<Vec<Entry>> {
        self.collections()?.list_collection_entries(collection_id)
    }

    pub fn list_trackers(&self) -> RepoResult<Vec<Tracker>> {
        self.trackers()?.list_trackers(TrackerOrder::Name)
    }

    pub fn create_tracker(&self, tracker: &NewTracker) -> RepoResult<Tracker> {
        let created = self.trackers()?.create_tracker(tracker)?;
        info!(
            "event=tracker_create module=store status=ok tracker_id={} type={}",
            created.id,
            created.kind.as_str()
        );
        Ok(created)
    }

    pub fn log_tracker_value(
        &self,
        tracker_id: TrackerId,
        date: &str,
        value: &LogValue,
    ) -> RepoResult<LoggedValue> {
        self.trackers()?.log_value(tracker_id, date, value)
    }

    pub fn tracker_values(&self, tracker_id: TrackerId) -> RepoResult<Vec<TrackerValue>> {
        self.trackers()?.list_values(tracker_id)
    }

    /// Builds a point-in-time snapshot of all journal data.
    pub fn export_data(&self) -> RepoResult<JournalSnapshot> {
        export_snapshot(&self.conn)
    }

    fn entries(&self) -> RepoResult<SqliteEntryRepository<'_>> {
        SqliteEntryRepository::try_new(&self.conn)
    }

    fn collections(&self) -> RepoResult<SqliteCollectionRepository<'_>> {
        SqliteCollectionRepository::try_new(&self.conn)
    }

    fn trackers(&self) -> RepoResult<SqliteTrackerRepository<'_>> {
        SqliteTrackerRepository::try_new(&self.conn)
    }
}
