//! Snapshot reconciliation for partial-update requests.
//!
//! Records travel as `serde_json` object graphs: [`diff`] computes the sparse
//! change-set between a snapshot and a working copy, [`strip_empty`] removes
//! null and empty noise, and [`prepare_update`] chains both together with the
//! [`ReconcileConfig`] rules. The [`sequencer`] and [`session`] modules cover
//! the async side: ordered blob cleanup and the save flow around an
//! [`hospital_core::EditSession`].

mod diff;
mod equal;
pub mod sequencer;
pub mod session;
mod strip;

use hospital_core::{DocumentAttachment, ReconcileConfig, ReconcileError};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

pub use diff::diff;
pub use equal::deep_equal;
pub use strip::{strip_empty, strip_empty_value};

/// A JSON object: string keys mapped to arbitrary JSON values.
pub type RecordGraph = Map<String, Value>;

/// Build the payload for a PATCH request from two JSON strings.
pub fn prepare_update_str(
    original_json: &str,
    updated_json: &str,
    config: &ReconcileConfig,
) -> Result<RecordGraph, ReconcileError> {
    let original = parse_record(original_json)?;
    let updated = parse_record(updated_json)?;
    Ok(prepare_update(&original, &updated, config))
}

/// Build the payload for a PATCH request from typed records.
pub fn prepare_typed_update<T: Serialize>(
    original: &T,
    updated: &T,
    config: &ReconcileConfig,
) -> Result<RecordGraph, ReconcileError> {
    let original = to_record(original)?;
    let updated = to_record(updated)?;
    Ok(prepare_update(&original, &updated, config))
}

/// Diff, drop server-managed keys, then strip empties when enabled.
pub fn prepare_update(
    original: &RecordGraph,
    updated: &RecordGraph,
    config: &ReconcileConfig,
) -> RecordGraph {
    let mut changes = diff(original, updated);
    let raw_len = changes.len();
    drop_ignored_keys(&mut changes, config);

    let payload = if config.strip_empty {
        strip_empty(&changes)
    } else {
        changes
    };

    debug!(
        changed = raw_len,
        sent = payload.len(),
        "prepared update payload"
    );
    payload
}

/// Attachments listed in `original.documents` whose key is gone from
/// `updated.documents`, in snapshot order.
///
/// Entries that do not parse as attachments are skipped.
pub fn removed_documents(
    original: &RecordGraph,
    updated: &RecordGraph,
) -> Vec<DocumentAttachment> {
    let kept = documents_of(updated);
    documents_of(original)
        .into_iter()
        .filter(|doc| !kept.iter().any(|other| other.key == doc.key))
        .collect()
}

/// Parse a JSON document whose root must be an object.
pub fn parse_record(json: &str) -> Result<RecordGraph, ReconcileError> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| ReconcileError::Parse(err.to_string()))?;
    into_record(value)
}

pub fn into_record(value: Value) -> Result<RecordGraph, ReconcileError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ReconcileError::NotAnObject(value_kind(&other).to_string())),
    }
}

/// Serialize a typed record into its object graph.
pub fn to_record<T: Serialize>(record: &T) -> Result<RecordGraph, ReconcileError> {
    let value =
        serde_json::to_value(record).map_err(|err| ReconcileError::Parse(err.to_string()))?;
    into_record(value)
}

fn drop_ignored_keys(graph: &mut RecordGraph, config: &ReconcileConfig) {
    if config.ignored_keys.is_empty() {
        return;
    }
    graph.retain(|key, value| {
        if config.is_ignored(key) {
            return false;
        }
        match value {
            // Only prune objects that emptied because of ignored keys.
            Value::Object(nested) if !nested.is_empty() => {
                drop_ignored_keys(nested, config);
                !nested.is_empty()
            }
            _ => true,
        }
    });
}

fn documents_of(record: &RecordGraph) -> Vec<DocumentAttachment> {
    record
        .get("documents")
        .and_then(Value::as_array)
        .map(|docs| {
            docs.iter()
                .filter_map(|doc| serde_json::from_value(doc.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
