//! Document handlers - writes, reads and the snapshot fan-out after writes.

use listy_engine::{validate_document_id, Document, Fields, QuerySnapshot};

use crate::db;
use crate::error::{AppError, Result};
use crate::websocket::ServerMessage;
use crate::AppState;

/// Read the full snapshot of a collection.
pub async fn handle_list(state: &AppState, collection: &str) -> Result<QuerySnapshot> {
    validate_document_id(collection)?;
    db::load_snapshot(&state.pool, collection).await
}

/// Read one document.
pub async fn handle_get(state: &AppState, collection: &str, doc_id: &str) -> Result<Document> {
    validate_document_id(collection)?;
    validate_document_id(doc_id)?;

    let stored = db::get_document(&state.pool, collection, doc_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("document {}/{}", collection, doc_id)))?;

    Ok(stored.to_document()?)
}

/// Create a document or overwrite all of its fields, then notify listeners.
pub async fn handle_set(
    state: &AppState,
    collection: &str,
    doc_id: &str,
    fields: Fields,
) -> Result<Document> {
    validate_document_id(collection)?;
    validate_document_id(doc_id)?;

    // Commit and fan-out under one lock so listeners see snapshots in commit order.
    let _guard = state.write_lock.lock().await;
    db::upsert_document(&state.pool, collection, doc_id, &fields).await?;
    tracing::info!(collection = %collection, doc_id = %doc_id, "Document set");

    publish_snapshot(state, collection).await;

    Ok(Document::new(doc_id, fields))
}

/// Delete a document, then notify listeners if anything was removed.
///
/// Deleting a missing document succeeds.
pub async fn handle_delete(state: &AppState, collection: &str, doc_id: &str) -> Result<()> {
    validate_document_id(collection)?;
    validate_document_id(doc_id)?;

    let _guard = state.write_lock.lock().await;
    let removed = db::delete_document(&state.pool, collection, doc_id).await?;

    if removed {
        tracing::info!(collection = %collection, doc_id = %doc_id, "Document deleted");
        publish_snapshot(state, collection).await;
    } else {
        tracing::debug!(collection = %collection, doc_id = %doc_id, "Delete of missing document");
    }

    Ok(())
}

/// Load the current snapshot of `collection` as a listener message.
pub async fn snapshot_message(state: &AppState, collection: &str) -> ServerMessage {
    match db::load_snapshot(&state.pool, collection).await {
        Ok(snapshot) => ServerMessage::snapshot(snapshot),
        Err(e) => {
            tracing::error!(collection = %collection, "Failed to load snapshot: {}", e);
            ServerMessage::error(format!("failed to load snapshot: {}", e))
        }
    }
}

/// Push the current snapshot to every listener of `collection`.
///
/// Callers hold the write lock.
async fn publish_snapshot(state: &AppState, collection: &str) {
    if state.conn_manager.listener_count(collection) == 0 {
        return;
    }

    let message = snapshot_message(state, collection).await;
    let sent = state
        .conn_manager
        .broadcast_to_collection(collection, message);

    tracing::debug!(collection = %collection, sent_to = sent, "Published snapshot");
}
