//! Core of the bullet journal: schema, models, repositories and services.
//! This crate is the single source of truth for journal invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::collection::{Collection, CollectionId, Membership};
pub use model::entry::{Entry, EntryId, EntryStatus, EntryType, NewEntry};
pub use model::tracker::{
    LogValue, LoggedValue, NewTracker, Tracker, TrackerId, TrackerType, TrackerValue,
};
pub use model::ValidationError;
pub use repo::collection_repo::{CollectionRepository, SqliteCollectionRepository};
pub use repo::entry_repo::{EntryFilter, EntryRepository, SqliteEntryRepository};
pub use repo::tracker_repo::{SqliteTrackerRepository, TrackerOrder, TrackerRepository};
pub use repo::{RepoError, RepoResult};
pub use service::export_service::{
    export_snapshot, export_snapshot_at, CollectionSnapshot, JournalSnapshot, TrackerSnapshot,
};
pub use service::migration_service::{MigrationDirection, MigrationService};
pub use store::{JournalStore, JOURNAL_DB_FILE_NAME};
