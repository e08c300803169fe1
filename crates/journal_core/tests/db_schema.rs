use journal_core::db::schema::SCHEMA_VERSION;
use journal_core::db::{open_db, open_db_in_memory, DbError};
use journal_core::{JournalStore, LogValue, NewEntry, NewTracker, RepoError, SqliteEntryRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_all_tables() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    for table in [
        "entries",
        "collections",
        "collection_entries",
        "trackers",
        "tracker_values",
    ] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn open_db_enables_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn reopening_same_file_keeps_schema_and_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.db");

    let store = JournalStore::open(&path).unwrap();
    store
        .create_entry(&NewEntry::new("note", "2024-01-01", "kept"))
        .unwrap();
    store.close().unwrap();

    let store = JournalStore::open(&path).unwrap();
    assert_eq!(schema_version(store.connection()), SCHEMA_VERSION);
    let entries = store.list_entries(&Default::default()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].content, "kept");
}

#[test]
fn unversioned_file_with_existing_tables_is_adopted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type TEXT NOT NULL,
            date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'open',
            tags TEXT,
            content TEXT NOT NULL
        );
        INSERT INTO entries (type, date, content) VALUES ('task', '2023-05-05', 'legacy row');",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert_table_exists(&conn, "tracker_values");
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).err().unwrap();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_on_bare_connection_reports_missing_table() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteEntryRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("entries")));
}

#[test]
fn deleting_entry_cascades_to_membership() {
    let store = JournalStore::open_in_memory().unwrap();
    let entry = store
        .create_entry(&NewEntry::new("task", "2024-01-01", "Gym"))
        .unwrap();
    let collection = store.create_collection("Health").unwrap();
    store
        .assign_entry_to_collection(entry.id, collection.id)
        .unwrap();
    assert_eq!(row_count(store.connection(), "collection_entries"), 1);

    store
        .connection()
        .execute("DELETE FROM entries WHERE id = ?1;", [entry.id])
        .unwrap();

    assert_eq!(row_count(store.connection(), "collection_entries"), 0);
    assert_eq!(row_count(store.connection(), "collections"), 1);
}

#[test]
fn deleting_tracker_cascades_to_values() {
    let store = JournalStore::open_in_memory().unwrap();
    let tracker = store
        .create_tracker(&NewTracker::new("Water", "numeric"))
        .unwrap();
    store
        .log_tracker_value(tracker.id, "2024-01-01", &LogValue::from(5_i64))
        .unwrap();
    store
        .log_tracker_value(tracker.id, "2024-01-02", &LogValue::from(6_i64))
        .unwrap();
    assert_eq!(row_count(store.connection(), "tracker_values"), 2);

    store
        .connection()
        .execute("DELETE FROM trackers WHERE id = ?1;", [tracker.id])
        .unwrap();

    assert_eq!(row_count(store.connection(), "tracker_values"), 0);
}

fn row_count(conn: &Connection, table_name: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table_name};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
