//! Database module for SQLite persistence.

mod documents;
mod pool;

pub use documents::*;
pub use pool::*;
