//! Host - the event loop behind the City screen.
//!
//! One task owns the mirror. Dialog intents become pending writes, write
//! completions are logged, and snapshots from the standing listener rebuild
//! the mirror, which redraws every attached view. Nothing else writes to the
//! mirror, so views only ever show what the remote collection last reported.

use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use listy_engine::{CityDialog, DialogOutcome, Mirror, ObserverId};
use tokio::sync::mpsc;

use crate::remote::{RemoteCollection, SnapshotEvent, SnapshotReceiver};
use crate::sync::{CitySync, PendingWrites, WriteOutcome};
use crate::view::ListView;

/// Owner of the city list and its remote subscription.
pub struct Host<R> {
    sync: CitySync<R>,
    mirror: Mirror,
    snapshots: Option<SnapshotReceiver>,
    in_flight: FuturesUnordered<PendingWrites>,
}

impl<R: RemoteCollection> Host<R> {
    /// Host for `remote`, not yet subscribed.
    pub fn new(remote: Arc<R>) -> Self {
        Self {
            sync: CitySync::new(remote),
            mirror: Mirror::new(),
            snapshots: None,
            in_flight: FuturesUnordered::new(),
        }
    }

    /// Redraw `view` after every rebuild.
    pub fn attach_view<V>(&mut self, mut view: V) -> ObserverId
    where
        V: ListView + 'static,
    {
        self.mirror.subscribe(move |items| view.data_changed(items))
    }

    /// Open the standing listener.
    ///
    /// Only the first call subscribes; the listener stays open for the life
    /// of the host.
    pub fn subscribe(&mut self) {
        if self.snapshots.is_some() {
            tracing::warn!(collection = %self.sync.remote().name(), "Already subscribed");
            return;
        }
        self.snapshots = Some(self.sync.subscribe());
    }

    pub fn is_subscribed(&self) -> bool {
        self.snapshots.is_some()
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    pub fn sync(&self) -> &CitySync<R> {
        &self.sync
    }

    /// Dialog for adding a new city.
    pub fn open_create_dialog(&self) -> CityDialog {
        CityDialog::create()
    }

    /// Dialog for the city at `position` in the list.
    ///
    /// Returns `None` when the position is outside the current list.
    pub fn activate(&self, position: usize) -> Option<CityDialog> {
        match self.mirror.get(position) {
            Some(city) => Some(CityDialog::edit(city.clone())),
            None => {
                tracing::debug!(position, len = self.mirror.len(), "No city at position");
                None
            }
        }
    }

    /// Turn a dialog intent into remote writes.
    ///
    /// The mirror is left alone; it changes when the resulting snapshot
    /// arrives.
    pub fn dispatch(&mut self, outcome: DialogOutcome) {
        let pending = match outcome {
            DialogOutcome::Add(city) => self.sync.add(&city),
            DialogOutcome::Update {
                mut city,
                new_name,
                new_province,
            } => self.sync.update(&mut city, &new_name, &new_province),
            DialogOutcome::Delete(city) => self.sync.delete(&city),
        };
        self.in_flight.push(pending);
    }

    /// Apply one listener event to the mirror.
    ///
    /// A listener error is logged and the mirror keeps its current contents.
    pub fn handle_snapshot(&mut self, event: SnapshotEvent) {
        let snapshot = match event {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(collection = %self.sync.remote().name(), "Listen failed: {}", e);
                return;
            }
        };

        let report = self.mirror.rebuild(&snapshot);
        for city in self.mirror.items().iter() {
            tracing::debug!(name = %city.name, province = %city.province, "City loaded");
        }
        for skipped in &report.skipped {
            tracing::warn!(doc_id = %skipped.id, "Skipped document: {}", skipped.error);
        }
        tracing::info!(
            collection = %snapshot.collection,
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "Snapshot applied"
        );
    }

    /// Apply every snapshot event already delivered, without waiting.
    ///
    /// Returns the number of events handled.
    pub fn pump_snapshots(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.snapshots.as_mut().and_then(|rx| rx.try_recv().ok()) {
            self.handle_snapshot(event);
            handled += 1;
        }
        handled
    }

    /// Wait for every pending write to finish.
    pub async fn flush_writes(&mut self) -> Vec<WriteOutcome> {
        let mut outcomes = Vec::new();
        while let Some(batch) = self.in_flight.next().await {
            outcomes.extend(batch);
        }
        outcomes
    }

    /// Number of intents whose writes have not finished.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Run until `intents` is closed and every write has finished.
    ///
    /// Subscribes first if needed. Snapshots that are already delivered when
    /// the loop ends are applied before returning.
    pub async fn run(&mut self, mut intents: mpsc::UnboundedReceiver<DialogOutcome>) {
        self.subscribe();
        let mut intents_open = true;

        loop {
            tokio::select! {
                event = next_snapshot(&mut self.snapshots) => match event {
                    Some(event) => self.handle_snapshot(event),
                    None => {
                        tracing::warn!(
                            collection = %self.sync.remote().name(),
                            "Listener closed"
                        );
                        self.snapshots = None;
                    }
                },
                intent = intents.recv(), if intents_open => match intent {
                    Some(outcome) => self.dispatch(outcome),
                    None => intents_open = false,
                },
                Some(_) = self.in_flight.next(), if !self.in_flight.is_empty() => {}
            }

            if !intents_open && self.in_flight.is_empty() {
                self.pump_snapshots();
                break;
            }
        }

        tracing::debug!(generation = self.mirror.generation(), "Host stopped");
    }
}

/// Next listener event; never resolves once the listener is gone.
async fn next_snapshot(snapshots: &mut Option<SnapshotReceiver>) -> Option<SnapshotEvent> {
    match snapshots {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
