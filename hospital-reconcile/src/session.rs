//! Save and cleanup flows shared by every editable-record screen.

use async_trait::async_trait;
use hospital_core::{
    CleanupFailure, CleanupPolicy, CleanupReport, DocumentAttachment, EditSession, ReconcileConfig,
    ReconcileError, RecordKind,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::sequencer::{for_each_best_effort, for_each_sequential};
use crate::{prepare_typed_update, RecordGraph};

/// Checks a sanitized payload before it leaves the client.
pub trait SchemaValidator {
    fn validate(&self, kind: RecordKind, payload: &RecordGraph) -> Result<(), ReconcileError>;
}

/// Partial-update (PATCH) endpoint of the backend.
#[async_trait]
pub trait RecordApi: Send + Sync {
    async fn patch(
        &self,
        kind: RecordKind,
        id: &str,
        payload: &RecordGraph,
    ) -> Result<Value, ReconcileError>;
}

/// Blob storage holding uploaded documents.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn delete(&self, key: &str) -> Result<(), ReconcileError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The working copy matches the snapshot; nothing was sent.
    NoChanges,
    Saved {
        payload: RecordGraph,
        response: Value,
    },
}

/// Diff the session's working copy against its snapshot and PATCH the result.
///
/// On success the working copy becomes the new snapshot. On any error the
/// session is left exactly as it was, so pending edits survive a failed save.
/// When nothing changed the API is not called and the edit stays open.
pub async fn save_changes<T, V, A>(
    session: &mut EditSession<T>,
    kind: RecordKind,
    id: &str,
    validator: &V,
    api: &A,
    config: &ReconcileConfig,
) -> Result<SaveOutcome, ReconcileError>
where
    T: Clone + Serialize,
    V: SchemaValidator + ?Sized,
    A: RecordApi + ?Sized,
{
    let working = session.working()?.clone();
    let payload = prepare_typed_update(session.snapshot(), &working, config)?;

    if payload.is_empty() {
        debug!(collection = kind.collection(), id, "no changes to save");
        return Ok(SaveOutcome::NoChanges);
    }

    validator.validate(kind, &payload)?;

    let response = match api.patch(kind, id, &payload).await {
        Ok(response) => response,
        Err(err) => {
            warn!(collection = kind.collection(), id, error = %err, "save failed");
            return Err(err);
        }
    };

    session.commit(working);
    info!(
        collection = kind.collection(),
        id,
        fields = payload.len(),
        "record saved"
    );

    Ok(SaveOutcome::Saved { payload, response })
}

/// Delete the blobs behind `documents`, one at a time, in the given order.
///
/// `config.cleanup_policy` decides what happens on failure. With
/// [`CleanupPolicy::FailFast`] the first storage error is returned and the
/// remaining documents are left alone. With [`CleanupPolicy::BestEffort`]
/// every document is attempted and failures are listed in the report.
pub async fn cleanup_documents<S>(
    store: &S,
    documents: &[DocumentAttachment],
    config: &ReconcileConfig,
) -> Result<CleanupReport, ReconcileError>
where
    S: BlobStore + ?Sized,
{
    match config.cleanup_policy {
        CleanupPolicy::FailFast => {
            for_each_sequential(documents, move |doc| store.delete(&doc.key)).await?;
            Ok(CleanupReport {
                deleted: documents.iter().map(|doc| doc.key.clone()).collect(),
                failed: Vec::new(),
            })
        }
        CleanupPolicy::BestEffort => {
            let failures =
                for_each_best_effort(documents, move |doc| store.delete(&doc.key)).await;

            let mut report = CleanupReport::default();
            let mut failures = failures.into_iter().peekable();
            for (index, doc) in documents.iter().enumerate() {
                match failures.next_if(|(failed_at, _)| *failed_at == index) {
                    Some((_, err)) => {
                        warn!(key = %doc.key, error = %err, "document cleanup failed");
                        report.failed.push(CleanupFailure {
                            key: doc.key.clone(),
                            message: failure_message(err),
                        });
                    }
                    None => report.deleted.push(doc.key.clone()),
                }
            }
            Ok(report)
        }
    }
}

fn failure_message(err: ReconcileError) -> String {
    match err {
        ReconcileError::Storage { message, .. } => message,
        other => other.to_string(),
    }
}
