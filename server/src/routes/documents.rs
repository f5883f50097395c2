//! Document collection routes.

use axum::{
    extract::{Path, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use listy_engine::{validate_document_id, Document, Fields, QuerySnapshot};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::{
    handle_delete, handle_get, handle_list, handle_listen_connection, handle_set,
};
use crate::AppState;

/// Create document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/collections/{collection}/documents", get(list_handler))
        .route(
            "/collections/{collection}/documents/{id}",
            get(get_handler).put(set_handler).delete(delete_handler),
        )
        .route("/collections/{collection}/listen", get(listen_handler))
}

/// GET /collections/{collection}/documents - Full collection snapshot.
async fn list_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(collection): Path<String>,
) -> Result<Json<QuerySnapshot>> {
    let snapshot = handle_list(&state, &collection).await?;
    Ok(Json(snapshot))
}

/// GET /collections/{collection}/documents/{id} - One document.
async fn get_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Document>> {
    let document = handle_get(&state, &collection, &id).await?;
    Ok(Json(document))
}

/// PUT /collections/{collection}/documents/{id} - Create or overwrite.
async fn set_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((collection, id)): Path<(String, String)>,
    Json(fields): Json<Fields>,
) -> Result<Json<Document>> {
    let document = handle_set(&state, &collection, &id, fields).await?;
    Ok(Json(document))
}

/// DELETE /collections/{collection}/documents/{id} - Remove.
async fn delete_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((collection, id)): Path<(String, String)>,
) -> Result<StatusCode> {
    handle_delete(&state, &collection, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /collections/{collection}/listen - Upgrade to a snapshot listener.
async fn listen_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(collection): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<Response> {
    validate_document_id(&collection)?;
    Ok(ws
        .on_upgrade(move |socket| handle_listen_connection(socket, state, collection))
        .into_response())
}
