//! CitySync - the remote sync adapter.
//!
//! Turns add, update and delete intents into writes against the remote
//! collection. It never edits the local list: the list only changes when the
//! standing listener delivers the next snapshot.
//!
//! Every write failure ends in the log. Nothing is retried or rolled back.

use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use listy_engine::{plan_add, plan_delete, plan_update, City, Write};

use crate::error::RemoteError;
use crate::remote::{RemoteCollection, SnapshotReceiver};

/// Result of one write sent to the remote collection.
#[derive(Debug)]
pub struct WriteOutcome {
    pub write: Write,
    pub result: Result<(), RemoteError>,
}

impl WriteOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Writes for one intent, in flight together.
///
/// Nothing is sent until the future is polled.
pub type PendingWrites = BoxFuture<'static, Vec<WriteOutcome>>;

/// Adapter between city intents and a remote collection.
#[derive(Debug)]
pub struct CitySync<R> {
    remote: Arc<R>,
}

impl<R> Clone for CitySync<R> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
        }
    }
}

impl<R: RemoteCollection> CitySync<R> {
    pub fn new(remote: Arc<R>) -> Self {
        Self { remote }
    }

    pub fn remote(&self) -> &Arc<R> {
        &self.remote
    }

    /// Open the standing listener on the collection.
    pub fn subscribe(&self) -> SnapshotReceiver {
        tracing::info!(collection = %self.remote.name(), "Subscribing to collection");
        self.remote.listen()
    }

    /// Write `city` under its name.
    pub fn add(&self, city: &City) -> PendingWrites {
        tracing::debug!(name = %city.name, province = %city.province, "Adding city");
        self.issue("add", plan_add(city).map_err(RemoteError::from))
    }

    /// Apply an edit to `city`.
    ///
    /// `city` takes the new values immediately, before any write is sent and
    /// whether or not the writes later succeed. A changed name becomes a
    /// delete at the old key and a set at the new key, sent concurrently.
    pub fn update(&self, city: &mut City, new_name: &str, new_province: &str) -> PendingWrites {
        tracing::debug!(from = %city.name, to = %new_name, "Updating city");
        let planned = plan_update(city, new_name, new_province);
        self.issue("update", planned.map_err(RemoteError::from))
    }

    /// Remove the document keyed by the city's name.
    pub fn delete(&self, city: &City) -> PendingWrites {
        tracing::debug!(name = %city.name, "Deleting city");
        self.issue("delete", plan_delete(city).map_err(RemoteError::from))
    }

    fn issue(
        &self,
        intent: &'static str,
        planned: Result<Vec<Write>, RemoteError>,
    ) -> PendingWrites {
        let writes = match planned {
            Ok(writes) => writes,
            Err(e) => {
                tracing::error!(intent, "Rejected city {}: {}", intent, e);
                return async { Vec::new() }.boxed();
            }
        };

        let remote = Arc::clone(&self.remote);
        async move {
            let sends = writes.into_iter().map(|write| {
                let remote = Arc::clone(&remote);
                async move {
                    let result = remote.apply(&write).await;
                    log_outcome(intent, remote.name(), &write, &result);
                    WriteOutcome { write, result }
                }
            });
            join_all(sends).await
        }
        .boxed()
    }
}

fn log_outcome(intent: &str, collection: &str, write: &Write, result: &Result<(), RemoteError>) {
    match result {
        Ok(()) => tracing::debug!(
            intent,
            collection,
            kind = write.kind(),
            doc_id = %write.document_id(),
            "Write succeeded"
        ),
        Err(e) => tracing::error!(
            intent,
            collection,
            kind = write.kind(),
            doc_id = %write.document_id(),
            "Write failed: {}",
            e
        ),
    }
}
