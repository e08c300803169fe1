//! Journal database file handling.
//!
//! Every connection handed to the repositories comes from [`open_db`] or
//! [`open_db_in_memory`], so foreign keys are on and the five journal tables
//! exist. A file written by a newer build is refused with
//! [`DbError::UnsupportedSchemaVersion`] rather than opened.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or preparing the journal file.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected a pragma, the schema script or the file itself.
    Sqlite(rusqlite::Error),
    /// `user_version` is above [`schema::SCHEMA_VERSION`].
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "journal database error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "journal schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
