//! Journal domain model.
//!
//! # Responsibility
//! - Define entries, collections and trackers as stored and returned.
//! - Own enumerated-value parsing and input validation.
//!
//! # Invariants
//! - Read models only ever hold recognized enum values.
//! - Write inputs carry raw strings; validation happens before SQL.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod collection;
pub mod entry;
pub mod tracker;

/// Rejected input for a store write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Entry type outside `task|event|note`.
    InvalidEntryType(String),
    /// Entry status outside the five recognized values.
    InvalidEntryStatus(String),
    /// Tracker type outside `boolean|numeric`.
    InvalidTrackerType(String),
    /// Entry content is empty after trimming.
    EmptyContent,
    /// A required name is empty after trimming.
    EmptyName(&'static str),
    /// Date is not a `YYYY-MM-DD` calendar day.
    InvalidDate(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEntryType(value) => write!(
                f,
                "invalid entry type `{value}`; expected task|event|note"
            ),
            Self::InvalidEntryStatus(value) => write!(
                f,
                "invalid entry status `{value}`; expected open|done|migrated_forward|migrated_backward|canceled"
            ),
            Self::InvalidTrackerType(value) => write!(
                f,
                "invalid tracker type `{value}`; expected boolean|numeric"
            ),
            Self::EmptyContent => write!(f, "entry content cannot be empty"),
            Self::EmptyName(what) => write!(f, "{what} name cannot be empty"),
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for ValidationError {}

/// Treats empty or whitespace-only optional text as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
