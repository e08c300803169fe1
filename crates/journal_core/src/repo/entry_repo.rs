//! Entry repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/get/create/status-update APIs over `entries`.
//! - Translate `EntryFilter` into a parameterized WHERE clause.
//!
//! # Invariants
//! - Listing order is always `date DESC, id DESC`.
//! - Filter values are bound, never spliced into SQL text.
//! - Status updates never compute dates; they only store what is passed.

use crate::model::entry::{normalize_tags, Entry, EntryId, EntryStatus, EntryType, NewEntry};
use crate::model::non_blank;
use crate::repo::{ensure_tables, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};

pub(crate) const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    type,
    date,
    status,
    tags,
    content
FROM entries";

/// Optional, conjunctive filter for entry listing.
///
/// Empty strings are treated the same as absent fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryFilter {
    /// Exact calendar day, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Year-month, `YYYY-MM`.
    pub month: Option<String>,
    /// Exact status value.
    pub status: Option<String>,
    /// Exact entry type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Substring matched against content or tags.
    pub query: Option<String>,
}

/// One WHERE condition with its bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub clause: &'static str,
    pub params: Vec<Value>,
}

impl Predicate {
    fn text(clause: &'static str, value: &str) -> Self {
        Self {
            clause,
            params: vec![Value::Text(value.to_string())],
        }
    }
}

impl EntryFilter {
    /// Filter matching one calendar day.
    pub fn for_date(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Self::default()
        }
    }

    /// Builds the ordered predicate list for the present fields.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(date) = present(self.date.as_deref()) {
            predicates.push(Predicate::text("date = ?", date));
        }
        if let Some(month) = present(self.month.as_deref()) {
            predicates.push(Predicate::text("strftime('%Y-%m', date) = ?", month));
        }
        if let Some(status) = present(self.status.as_deref()) {
            predicates.push(Predicate::text("status = ?", status));
        }
        if let Some(kind) = present(self.kind.as_deref()) {
            predicates.push(Predicate::text("type = ?", kind));
        }
        if let Some(query) = present(self.query.as_deref()) {
            let pattern = format!("%{}%", escape_like(query));
            predicates.push(Predicate {
                clause: "(content LIKE ? ESCAPE '\\' OR tags LIKE ? ESCAPE '\\')",
                params: vec![Value::Text(pattern.clone()), Value::Text(pattern)],
            });
        }

        predicates
    }

    /// Renders the WHERE clause (empty when no predicates) and its parameters.
    pub fn where_clause(&self) -> (String, Vec<Value>) {
        let predicates = self.predicates();
        if predicates.is_empty() {
            return (String::new(), Vec::new());
        }

        let clauses = predicates
            .iter()
            .map(|predicate| predicate.clause)
            .collect::<Vec<_>>();
        let params = predicates
            .into_iter()
            .flat_map(|predicate| predicate.params)
            .collect();
        (format!(" WHERE {}", clauses.join(" AND ")), params)
    }
}

/// Repository interface for entry operations.
pub trait EntryRepository {
    /// Lists entries matching every present filter field.
    fn list_entries(&self, filter: &EntryFilter) -> RepoResult<Vec<Entry>>;
    /// Gets one entry by id.
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>>;
    /// Validates and inserts one entry, returning the stored record.
    fn create_entry(&self, entry: &NewEntry) -> RepoResult<Entry>;
    /// Sets status and, when given, replaces the date.
    fn update_entry_status(
        &self,
        id: EntryId,
        status: &str,
        date: Option<&str>,
    ) -> RepoResult<Entry>;
    /// Returns distinct lowercased tags across all entries.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository from an initialized connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["entries"])?;
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn list_entries(&self, filter: &EntryFilter) -> RepoResult<Vec<Entry>> {
        let (where_sql, bind_values) = filter.where_clause();
        let sql = format!("{ENTRY_SELECT_SQL}{where_sql} ORDER BY date DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }
        Ok(None)
    }

    fn create_entry(&self, entry: &NewEntry) -> RepoResult<Entry> {
        let valid = entry.validate()?;

        self.conn.execute(
            "INSERT INTO entries (type, date, status, tags, content)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                valid.kind.as_str(),
                valid.date,
                valid.status.as_str(),
                valid.tags,
                valid.content,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_entry(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("created entry {id} missing in read-back")))
    }

    fn update_entry_status(
        &self,
        id: EntryId,
        status: &str,
        date: Option<&str>,
    ) -> RepoResult<Entry> {
        let status = EntryStatus::parse_strict(status)?;

        let changed = self.conn.execute(
            "UPDATE entries
             SET
                status = ?1,
                date = COALESCE(?2, date)
             WHERE id = ?3;",
            params![status.as_str(), non_blank(date), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound { kind: "entry", id });
        }

        self.get_entry(id)?
            .ok_or(RepoError::NotFound { kind: "entry", id })
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tags FROM entries WHERE tags IS NOT NULL;")?;
        let raw = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(normalize_tags(raw.iter().map(String::as_str)))
    }
}

pub(crate) fn parse_entry_row(row: &Row<'_>) -> RepoResult<Entry> {
    let id: EntryId = row.get("id")?;

    let type_text: String = row.get("type")?;
    let kind = EntryType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid entry type `{type_text}` in entries.type"))
    })?;

    let status_text: String = row.get("status")?;
    let status = EntryStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid entry status `{status_text}` in entries.status"
        ))
    })?;

    Ok(Entry {
        id,
        kind,
        date: row.get("date")?,
        status,
        tags: row.get("tags")?,
        content: row.get("content")?,
    })
}

/// Only a missing or empty field removes its condition; whitespace is a value.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
