//! Named-procedure dispatch over the journal store.
//!
//! # Responsibility
//! - Route `entries.*`, `collections.*`, `trackers.*` and `export.*` calls
//!   to `JournalStore` methods.
//! - Decode JSON payloads and convert every failure into an `ApiResponse`
//!   a front end can display.
//!
//! # Invariants
//! - `handle` never panics and always returns an envelope.
//! - Error `kind` values are stable identifiers.

use journal_core::{
    CollectionId, EntryFilter, EntryId, JournalStore, LogValue, MigrationDirection, NewEntry,
    NewTracker, RepoError, TrackerId,
};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Every procedure name accepted by [`dispatch`].
pub const PROCEDURES: &[&str] = &[
    "entries.list",
    "entries.create",
    "entries.updateStatus",
    "entries.migrate",
    "entries.tags",
    "collections.list",
    "collections.create",
    "collections.delete",
    "collections.assignEntry",
    "collections.entries",
    "trackers.list",
    "trackers.create",
    "trackers.log",
    "trackers.values",
    "export.data",
];

/// Dispatch-layer failure.
#[derive(Debug)]
pub enum ApiError {
    /// Payload is missing or has the wrong shape.
    InvalidRequest(String),
    UnknownProcedure(String),
    Store(RepoError),
    /// Result could not be encoded as JSON.
    Encode(String),
}

impl ApiError {
    /// Stable identifier shown to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::UnknownProcedure(_) => "unknown_procedure",
            Self::Store(RepoError::Validation(_)) => "validation",
            Self::Store(RepoError::UniqueConstraint(_)) => "unique_constraint",
            Self::Store(RepoError::ForeignKey(_)) => "foreign_key",
            Self::Store(RepoError::NotFound { .. }) => "not_found",
            Self::Store(_) => "storage",
            Self::Encode(_) => "internal",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest(message) => write!(f, "invalid request: {message}"),
            Self::UnknownProcedure(name) => write!(f, "unknown procedure `{name}`"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Encode(message) => write!(f, "failed to encode result: {message}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

/// Response envelope for one procedure call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub kind: String,
    pub message: String,
}

impl ApiResponse {
    fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(err: &ApiError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(ApiErrorBody {
                kind: err.kind().to_string(),
                message: err.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    id: EntryId,
    status: String,
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MigrateRequest {
    id: EntryId,
    direction: MigrationDirection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignEntryRequest {
    entry_id: EntryId,
    collection_id: CollectionId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogValueRequest {
    tracker_id: TrackerId,
    date: String,
    value: LogValue,
}

/// Runs one procedure and wraps the outcome in an envelope.
pub fn handle(store: &JournalStore, procedure: &str, payload: Value) -> ApiResponse {
    match dispatch(store, procedure, payload) {
        Ok(data) => ApiResponse::success(data),
        Err(err) => {
            warn!(
                "event=api_call module=api status=error procedure={} kind={}",
                procedure,
                err.kind()
            );
            ApiResponse::failure(&err)
        }
    }
}

/// Runs one procedure and returns its JSON result.
///
/// `payload` is `null` for procedures without parameters.
pub fn dispatch(store: &JournalStore, procedure: &str, payload: Value) -> Result<Value, ApiError> {
    match procedure {
        "entries.list" => {
            let filter: EntryFilter = decode_or_default(payload)?;
            encode(store.list_entries(&filter)?)
        }
        "entries.create" => {
            let entry: NewEntry = decode(payload)?;
            encode(store.create_entry(&entry)?)
        }
        "entries.updateStatus" => {
            let request: UpdateStatusRequest = decode(payload)?;
            encode(store.update_entry_status(
                request.id,
                &request.status,
                request.date.as_deref(),
            )?)
        }
        "entries.migrate" => {
            let request: MigrateRequest = decode(payload)?;
            encode(store.migrate_entry(request.id, request.direction)?)
        }
        "entries.tags" => encode(store.list_tags()?),
        "collections.list" => encode(store.list_collections()?),
        "collections.create" => {
            let name: String = decode(payload)?;
            encode(store.create_collection(&name)?)
        }
        "collections.delete" => {
            let id: CollectionId = decode(payload)?;
            store.delete_collection(id)?;
            Ok(Value::Null)
        }
        "collections.assignEntry" => {
            let request: AssignEntryRequest = decode(payload)?;
            encode(store.assign_entry_to_collection(request.entry_id, request.collection_id)?)
        }
        "collections.entries" => {
            let id: CollectionId = decode(payload)?;
            encode(store.collection_entries(id)?)
        }
        "trackers.list" => encode(store.list_trackers()?),
        "trackers.create" => {
            let tracker: NewTracker = decode(payload)?;
            encode(store.create_tracker(&tracker)?)
        }
        "trackers.log" => {
            let request: LogValueRequest = decode(payload)?;
            encode(store.log_tracker_value(request.tracker_id, &request.date, &request.value)?)
        }
        "trackers.values" => {
            let id: TrackerId = decode(payload)?;
            encode(store.tracker_values(id)?)
        }
        "export.data" => encode(store.export_data()?),
        other => Err(ApiError::UnknownProcedure(other.to_string())),
    }
}

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload).map_err(|err| ApiError::InvalidRequest(err.to_string()))
}

fn decode_or_default<T: DeserializeOwned + Default>(payload: Value) -> Result<T, ApiError> {
    if payload.is_null() {
        return Ok(T::default());
    }
    decode(payload)
}

fn encode(value: impl Serialize) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|err| ApiError::Encode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{dispatch, handle, ApiError, PROCEDURES};
    use journal_core::JournalStore;
    use serde_json::{json, Value};

    fn setup() -> JournalStore {
        JournalStore::open_in_memory().unwrap()
    }

    #[test]
    fn entry_flow_round_trips_through_procedures() {
        let store = setup();

        let created = dispatch(
            &store,
            "entries.create",
            json!({"type": "task", "date": "2024-01-01", "content": "X"}),
        )
        .unwrap();
        assert_eq!(created["status"], "open");
        let id = created["id"].as_i64().unwrap();

        let listed = dispatch(&store, "entries.list", json!({"date": "2024-01-01"})).unwrap();
        assert_eq!(listed, json!([created]));

        let updated = dispatch(
            &store,
            "entries.updateStatus",
            json!({"id": id, "status": "migrated_forward", "date": "2024-01-02"}),
        )
        .unwrap();
        assert_eq!(updated["status"], "migrated_forward");
        assert_eq!(updated["date"], "2024-01-02");

        let migrated = dispatch(
            &store,
            "entries.migrate",
            json!({"id": id, "direction": "backward"}),
        )
        .unwrap();
        assert_eq!(migrated["date"], "2024-01-01");
        assert_eq!(migrated["status"], "migrated_backward");

        let all = dispatch(&store, "entries.list", Value::Null).unwrap();
        assert_eq!(all.as_array().unwrap().len(), 1);
    }

    #[test]
    fn collection_and_tracker_procedures_accept_camel_case_payloads() {
        let store = setup();
        let entry = dispatch(
            &store,
            "entries.create",
            json!({"type": "note", "date": "2024-01-01", "content": "idea", "tags": "work"}),
        )
        .unwrap();
        let collection = dispatch(&store, "collections.create", json!(" Ideas ")).unwrap();
        assert_eq!(collection["name"], "Ideas");

        let assigned = dispatch(
            &store,
            "collections.assignEntry",
            json!({"entryId": entry["id"], "collectionId": collection["id"]}),
        )
        .unwrap();
        assert_eq!(assigned["entryId"], entry["id"]);

        let members = dispatch(&store, "collections.entries", collection["id"].clone()).unwrap();
        assert_eq!(members, json!([entry]));

        let tracker = dispatch(
            &store,
            "trackers.create",
            json!({"name": "Water", "type": "numeric", "unit": "glasses"}),
        )
        .unwrap();
        dispatch(
            &store,
            "trackers.log",
            json!({"trackerId": tracker["id"], "date": "2024-01-01", "value": 5}),
        )
        .unwrap();
        dispatch(
            &store,
            "trackers.log",
            json!({"trackerId": tracker["id"], "date": "2024-01-01", "value": 7}),
        )
        .unwrap();
        let values = dispatch(&store, "trackers.values", tracker["id"].clone()).unwrap();
        assert_eq!(values, json!([{"date": "2024-01-01", "value": "7"}]));

        let snapshot = dispatch(&store, "export.data", Value::Null).unwrap();
        assert_eq!(snapshot["collections"][0]["entries"][0]["content"], "idea");
        assert_eq!(snapshot["trackers"][0]["values"][0]["value"], "7");
        assert!(snapshot["exportedAt"].is_string());
    }

    #[test]
    fn failures_become_typed_envelopes() {
        let store = setup();

        let invalid = handle(
            &store,
            "entries.create",
            json!({"type": "todo", "date": "2024-01-01", "content": "X"}),
        );
        assert!(!invalid.ok);
        assert_eq!(invalid.error.unwrap().kind, "validation");

        handle(&store, "collections.create", json!("Dup"));
        let duplicate = handle(&store, "collections.create", json!("Dup"));
        assert_eq!(duplicate.error.unwrap().kind, "unique_constraint");

        let dangling = handle(
            &store,
            "collections.assignEntry",
            json!({"entryId": 41, "collectionId": 1}),
        );
        assert_eq!(dangling.error.unwrap().kind, "foreign_key");

        let malformed = handle(&store, "entries.updateStatus", json!({"status": "done"}));
        assert_eq!(malformed.error.unwrap().kind, "invalid_request");

        let unknown = handle(&store, "entries.delete", Value::Null);
        assert_eq!(unknown.error.unwrap().kind, "unknown_procedure");
    }

    #[test]
    fn every_listed_procedure_is_routed() {
        let store = setup();
        for procedure in PROCEDURES {
            let response = handle(&store, procedure, Value::Null);
            let kind = response.error.map(|error| error.kind);
            assert_ne!(kind.as_deref(), Some("unknown_procedure"), "{procedure}");
        }
    }

    #[test]
    fn encode_failures_report_internal_kind() {
        let err = ApiError::Encode("not representable".to_string());
        assert_eq!(err.kind(), "internal");
    }
}
