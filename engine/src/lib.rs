//! # Listy Engine
//!
//! The pure core of Listy: a list of cities mirrored from a remote document
//! collection.
//!
//! This crate holds everything that can be decided without talking to the
//! network. It knows how a [`City`] maps onto a document, which writes an
//! add, update or delete intent turns into, and how the local list is rebuilt
//! from a full collection snapshot.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine never touches files, sockets or clocks
//! - **Remote is authoritative**: the local list is only ever rebuilt from a
//!   [`QuerySnapshot`], never patched by an intent
//! - **Single writer**: only [`Mirror::rebuild`] mutates the list, and it
//!   needs `&mut` access
//!
//! ## Core Concepts
//!
//! ### Documents
//!
//! A [`Document`] is a keyed JSON object in a named collection. A city is
//! stored under its own name with the fields `name` and `province`.
//!
//! ### Writes
//!
//! Intents are planned into [`Write`]s:
//! - [`plan_add`] - one `Set` keyed by the city name
//! - [`plan_update`] - one `Set` in place, or `Delete` + `Set` on rename
//! - [`plan_delete`] - one `Delete` keyed by the city name
//!
//! ### Mirror
//!
//! The [`Mirror`] owns the ordered cities shown to the user and broadcasts
//! an immutable `Arc<[City]>` to its observers after every rebuild.
//!
//! ## Quick Start
//!
//! ```rust
//! use listy_engine::{plan_update, City, Collection, Mirror};
//!
//! let mut remote = Collection::new("Cities");
//! let mut mirror = Mirror::new();
//!
//! let mut calgary = City::new("Calgary", "AB");
//! for write in listy_engine::plan_add(&calgary).unwrap() {
//!     remote.apply(&write);
//! }
//! mirror.rebuild(&remote.snapshot());
//! assert_eq!(mirror.items()[0].name, "Calgary");
//!
//! let writes = plan_update(&mut calgary, "Edmonton", "AB").unwrap();
//! assert_eq!(writes.len(), 2);
//! assert_eq!(calgary.name, "Edmonton");
//! ```

pub mod city;
pub mod collection;
pub mod dialog;
pub mod document;
pub mod error;
pub mod mirror;
pub mod write;

// Re-export main types at crate root
pub use city::City;
pub use collection::Collection;
pub use dialog::{CityDialog, DialogMode, DialogOutcome};
pub use document::{validate_document_id, Document, Fields, QuerySnapshot};
pub use error::Error;
pub use mirror::{Mirror, ObserverId, RebuildReport, SkippedDocument};
pub use write::{plan_add, plan_delete, plan_update, Write};

/// Type aliases for clarity
pub type DocumentId = String;
pub type CollectionName = String;

/// Collection the City screen reads and writes.
pub const CITIES_COLLECTION: &str = "Cities";
