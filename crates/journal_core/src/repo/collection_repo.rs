//! Collection repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/create/delete APIs over `collections`.
//! - Own membership assignment and per-collection entry listing.
//!
//! # Invariants
//! - Collection names are trimmed before insert; duplicates fail with
//!   `UniqueConstraint`.
//! - Membership insert is idempotent (`INSERT OR IGNORE`).
//! - Deleting a collection removes its membership rows, never entries.

use crate::model::collection::{normalize_collection_name, Collection, CollectionId, Membership};
use crate::model::entry::{Entry, EntryId};
use crate::repo::entry_repo::parse_entry_row;
use crate::repo::{ensure_tables, RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for collection operations.
pub trait CollectionRepository {
    /// Lists all collections ordered by name.
    fn list_collections(&self) -> RepoResult<Vec<Collection>>;
    /// Creates one collection with a trimmed, unique name.
    fn create_collection(&self, name: &str) -> RepoResult<Collection>;
    /// Deletes one collection and its membership rows.
    fn delete_collection(&self, id: CollectionId) -> RepoResult<()>;
    /// Links an entry to a collection; repeated links are a no-op.
    fn assign_entry(&self, entry_id: EntryId, collection_id: CollectionId)
        -> RepoResult<Membership>;
    /// Lists member entries ordered by `date DESC, id DESC`.
    fn list_collection_entries(&self, collection_id: CollectionId) -> RepoResult<Vec<Entry>>;
}

/// SQLite-backed collection repository.
pub struct SqliteCollectionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCollectionRepository<'conn> {
    /// Constructs a repository from an initialized connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["collections", "collection_entries", "entries"])?;
        Ok(Self { conn })
    }
}

impl CollectionRepository for SqliteCollectionRepository<'_> {
    fn list_collections(&self) -> RepoResult<Vec<Collection>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM collections ORDER BY name ASC;")?;
        let collections = stmt
            .query_map([], |row| {
                Ok(Collection {
                    id: row.get("id")?,
                    name: row.get("name")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(collections)
    }

    fn create_collection(&self, name: &str) -> RepoResult<Collection> {
        let name = normalize_collection_name(name)?;
        self.conn
            .execute("INSERT INTO collections (name) VALUES (?1);", [name])?;

        Ok(Collection {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn delete_collection(&self, id: CollectionId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM collections WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: "collection",
                id,
            });
        }
        Ok(())
    }

    fn assign_entry(
        &self,
        entry_id: EntryId,
        collection_id: CollectionId,
    ) -> RepoResult<Membership> {
        self.conn.execute(
            "INSERT OR IGNORE INTO collection_entries (collection_id, entry_id)
             VALUES (?1, ?2);",
            params![collection_id, entry_id],
        )?;

        Ok(Membership {
            entry_id,
            collection_id,
        })
    }

    fn list_collection_entries(&self, collection_id: CollectionId) -> RepoResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.id, e.type, e.date, e.status, e.tags, e.content
             FROM entries e
             INNER JOIN collection_entries ce ON ce.entry_id = e.id
             WHERE ce.collection_id = ?1
             ORDER BY e.date DESC, e.id DESC;",
        )?;
        let mut rows = stmt.query([collection_id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }
}
