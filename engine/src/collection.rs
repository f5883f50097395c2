//! Collection - an authoritative, in-memory document collection.
//!
//! Used wherever a remote collection has to live in-process: tests, local
//! demos and the in-memory remote in `listy-client`.

use crate::{CollectionName, Document, DocumentId, Fields, QuerySnapshot, Write};
use std::collections::BTreeMap;

/// A named collection of documents, ordered by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    name: CollectionName,
    documents: BTreeMap<DocumentId, Fields>,
}

impl Collection {
    /// Create an empty collection.
    pub fn new(name: impl Into<CollectionName>) -> Self {
        Self {
            name: name.into(),
            documents: BTreeMap::new(),
        }
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a document's fields by ID.
    pub fn get(&self, id: &str) -> Option<&Fields> {
        self.documents.get(id)
    }

    /// Check if a document exists.
    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the collection has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Apply a write.
    ///
    /// Returns `true` if the collection changed. Setting identical fields or
    /// deleting a missing document leaves it as it was.
    pub fn apply(&mut self, write: &Write) -> bool {
        match write {
            Write::Set { id, fields } => {
                let previous = self.documents.insert(id.clone(), fields.clone());
                previous.as_ref() != Some(fields)
            }
            Write::Delete { id } => self.documents.remove(id).is_some(),
        }
    }

    /// Full contents of the collection, ordered by document id.
    pub fn snapshot(&self) -> QuerySnapshot {
        QuerySnapshot {
            collection: self.name.clone(),
            documents: self
                .documents
                .iter()
                .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                .collect(),
        }
    }
}
