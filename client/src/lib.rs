//! # Listy Client
//!
//! The host side of the City screen. It owns the local list mirror, turns
//! dialog intents into remote writes and rebuilds the list whenever the
//! remote collection pushes a new snapshot.
//!
//! ## Pieces
//!
//! - [`RemoteCollection`] - the seam to the document backend, with an
//!   HTTP/WebSocket implementation ([`HttpCollection`]) and an in-process one
//!   ([`MemoryCollection`])
//! - [`CitySync`] - the remote sync adapter: add, update, delete, subscribe
//! - [`Host`] - the single-threaded event loop tying dialog intents, write
//!   completions and snapshots to the [`Mirror`](listy_engine::Mirror)
//! - [`ListView`] - what a list rendering layer implements
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use listy_client::{ClientConfig, Host, HttpCollection, RenderedList};
//!
//! # async fn run() -> Result<(), listy_client::RemoteError> {
//! let config = ClientConfig::default();
//! let remote = Arc::new(HttpCollection::new(&config)?);
//!
//! let mut host = Host::new(remote);
//! let rows = RenderedList::default();
//! host.attach_view(rows.clone());
//!
//! let (intents, receiver) = tokio::sync::mpsc::unbounded_channel();
//! drop(intents);
//! host.run(receiver).await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod http;
pub mod memory;
pub mod remote;
pub mod sync;
pub mod view;

pub use config::{ClientConfig, ConfigError};
pub use error::{RemoteError, Result};
pub use host::Host;
pub use http::HttpCollection;
pub use memory::MemoryCollection;
pub use remote::{RemoteCollection, SnapshotEvent, SnapshotReceiver, SnapshotSender};
pub use sync::{CitySync, PendingWrites, WriteOutcome};
pub use view::{ListView, RenderedList};
