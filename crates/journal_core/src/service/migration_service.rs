//! Bullet-journal migration use-case.
//!
//! # Responsibility
//! - Compute the target day for forward/backward migration.
//! - Record the migration through the plain status-update contract.
//!
//! # Invariants
//! - Forward moves exactly one calendar day later, backward one day earlier.
//! - The repository only ever stores the explicit date computed here.

use crate::model::entry::{Entry, EntryId, EntryStatus};
use crate::model::ValidationError;
use crate::repo::entry_repo::EntryRepository;
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Direction of a bullet-journal migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationDirection {
    Forward,
    Backward,
}

impl MigrationDirection {
    /// Status recorded on the migrated entry.
    pub fn status(self) -> EntryStatus {
        match self {
            Self::Forward => EntryStatus::MigratedForward,
            Self::Backward => EntryStatus::MigratedBackward,
        }
    }

    /// Returns the day after (forward) or before (backward) `date`.
    pub fn target_date(self, date: &str) -> Result<String, ValidationError> {
        let day = NaiveDate::parse_from_str(date, DAY_FORMAT)
            .map_err(|_| ValidationError::InvalidDate(date.to_string()))?;
        let shifted = match self {
            Self::Forward => day.succ_opt(),
            Self::Backward => day.pred_opt(),
        }
        .ok_or_else(|| ValidationError::InvalidDate(date.to_string()))?;
        Ok(shifted.format(DAY_FORMAT).to_string())
    }
}

/// Migration service over an entry repository.
pub struct MigrationService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> MigrationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Moves an entry one day in `direction` from its stored date.
    ///
    /// # Errors
    /// - `NotFound` when the entry does not exist.
    /// - `Validation(InvalidDate)` when the stored date is not `YYYY-MM-DD`.
    pub fn migrate_entry(&self, id: EntryId, direction: MigrationDirection) -> RepoResult<Entry> {
        let entry = self
            .repo
            .get_entry(id)?
            .ok_or(RepoError::NotFound { kind: "entry", id })?;
        let target = direction.target_date(&entry.date)?;
        self.repo
            .update_entry_status(id, direction.status().as_str(), Some(target.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::MigrationDirection;
    use crate::model::ValidationError;

    #[test]
    fn forward_crosses_month_and_year_boundaries() {
        let forward = MigrationDirection::Forward;
        assert_eq!(forward.target_date("2024-01-31").unwrap(), "2024-02-01");
        assert_eq!(forward.target_date("2024-12-31").unwrap(), "2025-01-01");
    }

    #[test]
    fn backward_handles_leap_day() {
        let backward = MigrationDirection::Backward;
        assert_eq!(backward.target_date("2024-03-01").unwrap(), "2024-02-29");
        assert_eq!(backward.target_date("2023-03-01").unwrap(), "2023-02-28");
    }

    #[test]
    fn malformed_date_is_rejected() {
        let err = MigrationDirection::Forward
            .target_date("01/02/2024")
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidDate("01/02/2024".to_string()));
    }
}
