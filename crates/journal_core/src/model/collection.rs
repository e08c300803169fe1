//! Collection model.
//!
//! # Invariants
//! - Names are stored trimmed and are unique.

use super::ValidationError;
use crate::model::entry::EntryId;
use serde::{Deserialize, Serialize};

/// SQLite rowid of a collection.
pub type CollectionId = i64;

/// Named, user-defined grouping of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
}

/// One membership link between an entry and a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub entry_id: EntryId,
    pub collection_id: CollectionId,
}

/// Trims a collection name and rejects empty results.
pub fn normalize_collection_name(name: &str) -> Result<&str, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName("collection"));
    }
    Ok(trimmed)
}
