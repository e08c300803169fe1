//! Journal entry model.
//!
//! # Responsibility
//! - Define the entry record, its type/status enums and write input.
//! - Keep the lenient status coercion used on create.
//!
//! # Invariants
//! - `status` defaults to `open` on create; unknown values coerce to `open`.
//! - Status updates reject unknown values instead of coercing.

use super::{non_blank, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

static TAG_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*").expect("valid tag separator regex"));

/// SQLite rowid of an entry.
pub type EntryId = i64;

/// Bullet kind of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Task,
    Event,
    Note,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Event => "event",
            Self::Note => "note",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "task" => Some(Self::Task),
            "event" => Some(Self::Event),
            "note" => Some(Self::Note),
            _ => None,
        }
    }
}

/// Lifecycle state of an entry.
///
/// The two migrated states record bullet-journal migration to the next or
/// previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Open,
    Done,
    MigratedForward,
    MigratedBackward,
    Canceled,
}

impl EntryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Done => "done",
            Self::MigratedForward => "migrated_forward",
            Self::MigratedBackward => "migrated_backward",
            Self::Canceled => "canceled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "done" => Some(Self::Done),
            "migrated_forward" => Some(Self::MigratedForward),
            "migrated_backward" => Some(Self::MigratedBackward),
            "canceled" => Some(Self::Canceled),
            _ => None,
        }
    }

    /// Parses a status for an update, where unknown values are an error.
    pub fn parse_strict(value: &str) -> Result<Self, ValidationError> {
        Self::parse(value).ok_or_else(|| ValidationError::InvalidEntryStatus(value.to_string()))
    }

    /// Parses a status for a create, where absent or unknown values mean `open`.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or(Self::Open)
    }
}

/// Stored journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// Serialized as `type` to match the stored column name.
    #[serde(rename = "type")]
    pub kind: EntryType,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    pub status: EntryStatus,
    /// Comma-delimited free text.
    pub tags: Option<String>,
    pub content: String,
}

impl Entry {
    /// Splits `tags` into trimmed, non-empty values in written order.
    pub fn tag_list(&self) -> Vec<String> {
        self.tags.as_deref().map(split_tags).unwrap_or_default()
    }
}

/// Create input for an entry, as received from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    pub content: String,
}

/// Create input after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEntry<'a> {
    pub kind: EntryType,
    pub date: &'a str,
    pub status: EntryStatus,
    pub tags: Option<&'a str>,
    pub content: &'a str,
}

impl NewEntry {
    pub fn new(kind: impl Into<String>, date: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            date: date.into(),
            status: None,
            tags: None,
            content: content.into(),
        }
    }

    /// Checks type and content, and resolves the effective status.
    ///
    /// # Errors
    /// - `InvalidEntryType` when `kind` is not `task|event|note`.
    /// - `EmptyContent` when `content` is blank.
    pub fn validate(&self) -> Result<ValidEntry<'_>, ValidationError> {
        let kind = EntryType::parse(&self.kind)
            .ok_or_else(|| ValidationError::InvalidEntryType(self.kind.clone()))?;
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyContent);
        }

        Ok(ValidEntry {
            kind,
            date: self.date.as_str(),
            status: EntryStatus::parse_lenient(self.status.as_deref()),
            tags: non_blank(self.tags.as_deref()),
            content: self.content.as_str(),
        })
    }
}

/// Splits one comma-delimited tag string.
pub fn split_tags(raw: &str) -> Vec<String> {
    TAG_SEPARATOR_RE
        .split(raw.trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lowercases and deduplicates tags across many tag strings.
pub fn normalize_tags<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for value in raw {
        for tag in split_tags(value) {
            unique.insert(tag.to_lowercase());
        }
    }
    unique.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::{normalize_tags, split_tags, Entry, EntryStatus, EntryType, NewEntry};
    use crate::model::ValidationError;

    #[test]
    fn lenient_status_falls_back_to_open() {
        assert_eq!(EntryStatus::parse_lenient(None), EntryStatus::Open);
        assert_eq!(EntryStatus::parse_lenient(Some("archived")), EntryStatus::Open);
        assert_eq!(EntryStatus::parse_lenient(Some("done")), EntryStatus::Done);
    }

    #[test]
    fn strict_status_rejects_unknown_value() {
        let err = EntryStatus::parse_strict("archived").unwrap_err();
        assert_eq!(err, ValidationError::InvalidEntryStatus("archived".to_string()));
    }

    #[test]
    fn validate_rejects_unknown_type_and_blank_content() {
        let err = NewEntry::new("todo", "2024-01-01", "x").validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEntryType(value) if value == "todo"));

        let err = NewEntry::new("note", "2024-01-01", "   ").validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptyContent);
    }

    #[test]
    fn validate_drops_blank_tags() {
        let mut entry = NewEntry::new("task", "2024-01-01", "x");
        entry.tags = Some("  ".to_string());
        assert_eq!(entry.validate().unwrap().tags, None);
    }

    #[test]
    fn split_tags_trims_and_skips_empty_items() {
        assert_eq!(split_tags(" work , home,,urgent "), vec!["work", "home", "urgent"]);
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn tag_list_splits_stored_tags() {
        let mut entry = Entry {
            id: 1,
            kind: EntryType::Note,
            date: "2024-01-01".to_string(),
            status: EntryStatus::Open,
            tags: Some("Work, gym ,".to_string()),
            content: "c".to_string(),
        };
        assert_eq!(entry.tag_list(), vec!["Work", "gym"]);

        entry.tags = None;
        assert!(entry.tag_list().is_empty());
    }

    #[test]
    fn normalize_tags_lowercases_and_dedupes() {
        let tags = normalize_tags(["Work, home", "work,Errands"]);
        assert_eq!(tags, vec!["errands", "home", "work"]);
    }
}
