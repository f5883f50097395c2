//! WebSocket listener registry.
//!
//! Tracks active listeners per collection and fans out snapshots to
//! everyone listening on the collection that changed.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

use super::ServerMessage;

/// Sender for WebSocket messages.
pub type MessageSender = mpsc::UnboundedSender<ServerMessage>;

/// A single listening WebSocket connection.
#[derive(Debug)]
pub struct Connection {
    /// Unique identifier for this connection
    pub id: String,
    /// Collection the connection listens to
    pub collection: String,
    /// Channel to send messages to this connection
    pub sender: MessageSender,
}

/// Manages active listener connections.
///
/// Thread-safe and can be shared across handlers via `Arc`.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    /// All active connections, keyed by connection ID.
    connections: DashMap<String, Connection>,
    /// Index of connection IDs by collection.
    by_collection: DashMap<String, Vec<String>>,
}

impl ConnectionManager {
    /// Create a new connection manager.
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            by_collection: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a listener on `collection`.
    ///
    /// Returns the connection ID.
    pub fn register(&self, collection: String, sender: MessageSender) -> String {
        let conn_id = uuid::Uuid::new_v4().to_string();

        let connection = Connection {
            id: conn_id.clone(),
            collection: collection.clone(),
            sender,
        };

        self.connections.insert(conn_id.clone(), connection);
        self.by_collection
            .entry(collection.clone())
            .or_default()
            .push(conn_id.clone());

        tracing::info!(conn_id = %conn_id, collection = %collection, "Listener registered");

        conn_id
    }

    /// Unregister a listener.
    pub fn unregister(&self, conn_id: &str) {
        if let Some((_, conn)) = self.connections.remove(conn_id) {
            if let Some(mut conn_ids) = self.by_collection.get_mut(&conn.collection) {
                conn_ids.retain(|id| id != conn_id);
                // Clean up empty entries
                if conn_ids.is_empty() {
                    drop(conn_ids);
                    self.by_collection.remove(&conn.collection);
                }
            }

            tracing::info!(conn_id = %conn_id, collection = %conn.collection, "Listener unregistered");
        }
    }

    /// Send a message to every listener of `collection`.
    ///
    /// Returns the number of connections that received the message.
    pub fn broadcast_to_collection(&self, collection: &str, message: ServerMessage) -> usize {
        let conn_ids = match self.by_collection.get(collection) {
            Some(ids) => ids.clone(),
            None => return 0,
        };

        let mut sent_count = 0;
        for conn_id in conn_ids {
            if self.send_to(&conn_id, message.clone()) {
                sent_count += 1;
            }
        }

        tracing::debug!(
            collection = %collection,
            recipients = sent_count,
            "Broadcast message to listeners"
        );

        sent_count
    }

    /// Send a message to a specific connection.
    pub fn send_to(&self, conn_id: &str, message: ServerMessage) -> bool {
        if let Some(conn) = self.connections.get(conn_id) {
            conn.sender.send(message).is_ok()
        } else {
            false
        }
    }

    /// Get the number of active connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the number of listeners on one collection.
    pub fn listener_count(&self, collection: &str) -> usize {
        self.by_collection
            .get(collection)
            .map(|ids| ids.len())
            .unwrap_or(0)
    }
}
