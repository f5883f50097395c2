//! WebSocket support for realtime listeners.
//!
//! Clients open a listener on a collection and receive the full collection
//! snapshot on connect and again after every write to that collection.

mod manager;
mod protocol;

pub use manager::ConnectionManager;
pub use protocol::*;
