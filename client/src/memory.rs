//! In-process remote collection.
//!
//! Behaves like the document server without a network: writes land in an
//! engine [`Collection`], every listener gets the current snapshot when it
//! opens and a new one after each write that changed something.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use listy_engine::{City, Collection, Fields, QuerySnapshot, Write};
use tokio::sync::mpsc;

use crate::error::{RemoteError, Result};
use crate::remote::{RemoteCollection, SnapshotReceiver, SnapshotSender};

#[derive(Debug)]
struct MemoryState {
    collection: Collection,
    listeners: Vec<SnapshotSender>,
    write_log: Vec<Write>,
    failing_writes: Option<String>,
}

/// A remote collection living in this process.
#[derive(Debug)]
pub struct MemoryCollection {
    name: String,
    state: Mutex<MemoryState>,
}

impl MemoryCollection {
    /// Create an empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            state: Mutex::new(MemoryState {
                collection: Collection::new(name.clone()),
                listeners: Vec::new(),
                write_log: Vec::new(),
                failing_writes: None,
            }),
            name,
        }
    }

    /// Create a collection already holding `cities`.
    pub fn with_cities(name: impl Into<String>, cities: &[City]) -> Self {
        let remote = Self::new(name);
        {
            let mut state = remote.state();
            for city in cities {
                state.collection.apply(&Write::set_city(city));
            }
        }
        remote
    }

    /// Current contents.
    pub fn snapshot(&self) -> QuerySnapshot {
        self.state().collection.snapshot()
    }

    /// Every write attempted so far, in the order it reached the collection.
    pub fn write_log(&self) -> Vec<Write> {
        self.state().write_log.clone()
    }

    /// Make subsequent writes fail with `message`, or succeed again with `None`.
    pub fn fail_writes(&self, message: Option<&str>) {
        self.state().failing_writes = message.map(str::to_string);
    }

    /// Push a listener error to every open listener.
    ///
    /// Returns the number of listeners reached.
    pub fn emit_listener_error(&self, message: &str) -> usize {
        let mut state = self.state();
        state.listeners.retain(|listener| {
            listener
                .send(Err(RemoteError::Listen(message.to_string())))
                .is_ok()
        });
        state.listeners.len()
    }

    /// Number of open listeners.
    pub fn listener_count(&self) -> usize {
        let mut state = self.state();
        state.listeners.retain(|listener| !listener.is_closed());
        state.listeners.len()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, write: Write) -> Result<()> {
        let mut state = self.state();
        state.write_log.push(write.clone());

        if let Some(message) = &state.failing_writes {
            return Err(RemoteError::Api {
                status: 503,
                message: message.clone(),
            });
        }

        if state.collection.apply(&write) {
            let snapshot = state.collection.snapshot();
            state
                .listeners
                .retain(|listener| listener.send(Ok(snapshot.clone())).is_ok());
        }

        Ok(())
    }
}

#[async_trait]
impl RemoteCollection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn set_document(&self, id: &str, fields: Fields) -> Result<()> {
        listy_engine::validate_document_id(id)?;
        self.write(Write::Set {
            id: id.to_string(),
            fields,
        })
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        listy_engine::validate_document_id(id)?;
        self.write(Write::delete(id))
    }

    fn listen(&self) -> SnapshotReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state();

        // The receiver is still in hand, so this send cannot fail.
        let _ = tx.send(Ok(state.collection.snapshot()));
        state.listeners.push(tx);

        rx
    }
}
