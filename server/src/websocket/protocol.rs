//! WebSocket message protocol definitions.
//!
//! All messages are JSON-encoded and use snake_case for field names.

use listy_engine::QuerySnapshot;
use serde::{Deserialize, Serialize};

/// Messages sent from client to server.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Keep-alive ping.
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full contents of the listened collection. Sent on connect and after
    /// every committed write to it.
    Snapshot { snapshot: QuerySnapshot },

    /// Response to ping.
    Pong,

    /// The listener could not be served a snapshot. The connection stays open.
    Error { message: String },
}

impl ServerMessage {
    /// Create an error message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// Create a snapshot push.
    pub fn snapshot(snapshot: QuerySnapshot) -> Self {
        ServerMessage::Snapshot { snapshot }
    }
}
