//! The seam between the host and a document backend.

use async_trait::async_trait;
use listy_engine::{Fields, QuerySnapshot, Write};
use tokio::sync::mpsc;

use crate::error::{RemoteError, Result};

/// One notification from a standing listener.
pub type SnapshotEvent = std::result::Result<QuerySnapshot, RemoteError>;

/// Sending half of a listener channel.
pub type SnapshotSender = mpsc::UnboundedSender<SnapshotEvent>;

/// Receiving half of a listener channel.
pub type SnapshotReceiver = mpsc::UnboundedReceiver<SnapshotEvent>;

/// A remote, keyed document collection with realtime listeners.
#[async_trait]
pub trait RemoteCollection: Send + Sync + 'static {
    /// Name of the collection.
    fn name(&self) -> &str;

    /// Create the document or overwrite all of its fields.
    async fn set_document(&self, id: &str, fields: Fields) -> Result<()>;

    /// Delete the document. Deleting a missing document succeeds.
    async fn delete_document(&self, id: &str) -> Result<()>;

    /// Open a standing listener.
    ///
    /// The first event carries the current contents. After that an event
    /// arrives for every change, or an error when the listener fails; an
    /// error does not end the listener.
    fn listen(&self) -> SnapshotReceiver;

    /// Perform one planned write.
    async fn apply(&self, write: &Write) -> Result<()> {
        match write {
            Write::Set { id, fields } => self.set_document(id, fields.clone()).await,
            Write::Delete { id } => self.delete_document(id).await,
        }
    }
}
