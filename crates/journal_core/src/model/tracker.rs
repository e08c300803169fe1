//! Habit/metric tracker model.
//!
//! # Responsibility
//! - Define trackers, their logged values and value coercion.
//!
//! # Invariants
//! - `type` is always `boolean` or `numeric`.
//! - Values are stored as text regardless of tracker type.

use super::{non_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// SQLite rowid of a tracker.
pub type TrackerId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerType {
    /// Habit logged as done/skipped.
    Boolean,
    /// Measurement with an optional unit.
    Numeric,
}

impl TrackerType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Numeric => "numeric",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "boolean" => Some(Self::Boolean),
            "numeric" => Some(Self::Numeric),
            _ => None,
        }
    }
}

/// Stored tracker definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    pub id: TrackerId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TrackerType,
    pub unit: Option<String>,
}

/// Create input for a tracker, as received from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTracker {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Tracker create input after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTracker<'a> {
    pub name: &'a str,
    pub kind: TrackerType,
    pub unit: Option<&'a str>,
}

impl NewTracker {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            unit: None,
        }
    }

    /// Checks the type and trims the name; a blank unit becomes absent.
    pub fn validate(&self) -> Result<ValidTracker<'_>, ValidationError> {
        let kind = TrackerType::parse(&self.kind)
            .ok_or_else(|| ValidationError::InvalidTrackerType(self.kind.clone()))?;
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName("tracker"));
        }

        Ok(ValidTracker {
            name,
            kind,
            unit: non_blank(self.unit.as_deref()).map(str::trim),
        })
    }
}

/// Value passed to a tracker log call before text coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl LogValue {
    /// Renders the value the way it is persisted.
    ///
    /// Flags become `Yes`/`No`; numbers use their shortest decimal form, so
    /// `5.0` is stored as `5`.
    pub fn to_storage_string(&self) -> String {
        match self {
            Self::Flag(true) => "Yes".to_string(),
            Self::Flag(false) => "No".to_string(),
            // Negative zero is stored as `0`.
            Self::Number(value) if *value == 0.0 => "0".to_string(),
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }
}

impl From<bool> for LogValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<f64> for LogValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for LogValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One logged day for a tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerValue {
    pub date: String,
    pub value: String,
}

/// Result of a log call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedValue {
    pub tracker_id: TrackerId,
    pub date: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::{LogValue, NewTracker, TrackerType};
    use crate::model::ValidationError;

    #[test]
    fn log_value_coerces_to_text() {
        assert_eq!(LogValue::from(true).to_storage_string(), "Yes");
        assert_eq!(LogValue::from(false).to_storage_string(), "No");
        assert_eq!(LogValue::from(5_i64).to_storage_string(), "5");
        assert_eq!(LogValue::from(7.5).to_storage_string(), "7.5");
        assert_eq!(LogValue::from(-0.0).to_storage_string(), "0");
        assert_eq!(LogValue::from(-2.5).to_storage_string(), "-2.5");
        assert_eq!(LogValue::from("Yes").to_storage_string(), "Yes");
    }

    #[test]
    fn validate_rejects_unknown_type() {
        let err = NewTracker::new("Sleep", "text").validate().unwrap_err();
        assert_eq!(err, ValidationError::InvalidTrackerType("text".to_string()));
    }

    #[test]
    fn validate_trims_name_and_drops_blank_unit() {
        let mut tracker = NewTracker::new("  Sleep ", "numeric");
        tracker.unit = Some(" ".to_string());
        let valid = tracker.validate().unwrap();
        assert_eq!(valid.name, "Sleep");
        assert_eq!(valid.kind, TrackerType::Numeric);
        assert_eq!(valid.unit, None);
    }
}
