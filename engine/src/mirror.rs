//! Mirror - the local, ordered copy of a remote city collection.
//!
//! The mirror has exactly one write path: [`Mirror::rebuild`], which throws
//! away the current list and replaces it with the cities found in a snapshot.
//! After every rebuild each observer receives the new list as an immutable
//! `Arc<[City]>`.

use crate::{City, DocumentId, Error, QuerySnapshot};
use std::sync::Arc;

/// Handle returned by [`Mirror::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&Arc<[City]>)>;

/// A document that could not be turned into a city during a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub id: DocumentId,
    pub error: Error,
}

/// What a rebuild did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RebuildReport {
    /// Cities now in the mirror
    pub loaded: usize,
    /// Documents left out because they did not hold a city
    pub skipped: Vec<SkippedDocument>,
    /// Observers notified
    pub notified: usize,
}

/// Ordered list of cities mirrored from the remote collection.
pub struct Mirror {
    items: Arc<[City]>,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
    generation: u64,
}

impl Mirror {
    /// Create an empty mirror with no observers.
    pub fn new() -> Self {
        Self {
            items: Arc::from(Vec::new()),
            observers: Vec::new(),
            next_observer: 1,
            generation: 0,
        }
    }

    /// Register an observer called after every rebuild.
    ///
    /// The observer is not called for the current contents.
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&Arc<[City]>) + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Replace the whole list with the cities in `snapshot`.
    ///
    /// Previous contents are discarded, snapshot order is kept, and documents
    /// without string `name` and `province` fields are skipped. Observers are
    /// notified once the new list is in place.
    pub fn rebuild(&mut self, snapshot: &QuerySnapshot) -> RebuildReport {
        let mut cities = Vec::with_capacity(snapshot.len());
        let mut skipped = Vec::new();

        for doc in snapshot.iter() {
            match City::from_document(doc) {
                Ok(city) => cities.push(city),
                Err(error) => skipped.push(SkippedDocument {
                    id: doc.id.clone(),
                    error,
                }),
            }
        }

        self.items = Arc::from(cities);
        self.generation += 1;

        for (_, observer) in self.observers.iter_mut() {
            observer(&self.items);
        }

        RebuildReport {
            loaded: self.items.len(),
            skipped,
            notified: self.observers.len(),
        }
    }

    /// Current list, shared.
    pub fn items(&self) -> Arc<[City]> {
        Arc::clone(&self.items)
    }

    /// City at a list position.
    pub fn get(&self, position: usize) -> Option<&City> {
        self.items.get(position)
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of rebuilds so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl Default for Mirror {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Mirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mirror")
            .field("items", &self.items)
            .field("observers", &self.observers.len())
            .field("generation", &self.generation)
            .finish()
    }
}
