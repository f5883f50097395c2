//! Request handlers for document writes and listeners.

mod documents;
mod listen;

pub use documents::*;
pub use listen::*;
