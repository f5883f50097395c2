//! WebSocket handler for realtime collection listeners.
//!
//! A listener receives the current snapshot of its collection right after
//! connecting and a fresh snapshot after every committed write.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::websocket::{ClientMessage, ServerMessage};
use crate::AppState;

use super::snapshot_message;

/// Handle an established listener connection.
///
/// This function:
/// 1. Registers the listener and queues the initial snapshot
/// 2. Spawns a task to forward outgoing messages
/// 3. Answers pings until the client goes away
/// 4. Cleans up on disconnect
pub async fn handle_listen_connection(socket: WebSocket, state: AppState, collection: String) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Holding the write lock keeps a concurrent write from slipping a newer
    // snapshot in ahead of the initial one.
    let conn_id = {
        let _guard = state.write_lock.lock().await;
        let conn_id = state.conn_manager.register(collection.clone(), tx);
        let initial = snapshot_message(&state, &collection).await;
        state.conn_manager.send_to(&conn_id, initial);
        conn_id
    };

    tracing::info!(
        conn_id = %conn_id,
        collection = %collection,
        "Listener connected"
    );

    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(text) => {
                    if let Err(e) = ws_sender.send(Message::Text(text.into())).await {
                        tracing::warn!("Failed to send WebSocket message: {}", e);
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize WebSocket message: {}", e);
                }
            }
        }
    });

    // Process incoming messages
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let response = process_message(&text);
                state.conn_manager.send_to(&conn_id, response);
            }
            Ok(Message::Binary(_)) => {
                tracing::warn!("Binary messages not supported");
            }
            Ok(Message::Ping(data)) => {
                tracing::trace!("Received ping: {} bytes", data.len());
            }
            Ok(Message::Pong(_)) => {
                tracing::trace!("Received pong");
            }
            Ok(Message::Close(_)) => {
                tracing::info!(conn_id = %conn_id, "WebSocket close frame received");
                break;
            }
            Err(e) => {
                tracing::warn!(conn_id = %conn_id, "WebSocket error: {}", e);
                break;
            }
        }
    }

    // Clean up
    state.conn_manager.unregister(&conn_id);
    send_task.abort();

    tracing::info!(
        conn_id = %conn_id,
        collection = %collection,
        active_connections = state.conn_manager.connection_count(),
        "Listener disconnected"
    );
}

/// Process a client message and return a server response.
fn process_message(text: &str) -> ServerMessage {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Ping) => ServerMessage::Pong,
        Err(e) => ServerMessage::error(format!("Invalid message format: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_gets_pong() {
        assert!(matches!(
            process_message(r#"{"type":"ping"}"#),
            ServerMessage::Pong
        ));
    }

    #[test]
    fn garbage_gets_error() {
        match process_message("not json") {
            ServerMessage::Error { message } => {
                assert!(message.starts_with("Invalid message format"))
            }
            other => panic!("Expected Error, got {:?}", other),
        }
    }
}
