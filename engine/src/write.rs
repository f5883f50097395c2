//! Document writes and the planning of city intents into writes.
//!
//! Intents never touch the local list. They only produce writes against the
//! remote collection; the list catches up when the next snapshot arrives.

use crate::{error::Result, validate_document_id, City, DocumentId, Fields};
use serde::{Deserialize, Serialize};

/// A single write against a remote collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Write {
    /// Create the document or overwrite all of its fields.
    Set { id: DocumentId, fields: Fields },
    /// Remove the document. Removing a missing document is not an error.
    Delete { id: DocumentId },
}

impl Write {
    /// Set a city's full field set under its own name.
    pub fn set_city(city: &City) -> Self {
        Write::Set {
            id: city.document_id(),
            fields: city.to_fields(),
        }
    }

    /// Delete the document at `id`.
    pub fn delete(id: impl Into<DocumentId>) -> Self {
        Write::Delete { id: id.into() }
    }

    /// Get the document ID this write targets.
    pub fn document_id(&self) -> &DocumentId {
        match self {
            Write::Set { id, .. } => id,
            Write::Delete { id } => id,
        }
    }

    /// Short label used when logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Write::Set { .. } => "set",
            Write::Delete { .. } => "delete",
        }
    }
}

/// Writes for adding a city: one `Set` keyed by its name.
pub fn plan_add(city: &City) -> Result<Vec<Write>> {
    validate_document_id(&city.name)?;
    Ok(vec![Write::set_city(city)])
}

/// Writes for editing a city.
///
/// `city` is overwritten with the new values before the writes are returned,
/// so the caller's copy reflects the edit whatever happens to the writes.
///
/// Keeping the name yields a single `Set` at the same key. Changing it is a
/// rename: a `Delete` at the old key followed by a `Set` at the new one. The
/// two writes are independent; nothing makes them atomic.
///
/// An invalid new name still lands in `city`; only the writes are refused.
pub fn plan_update(city: &mut City, new_name: &str, new_province: &str) -> Result<Vec<Write>> {
    let old_name = std::mem::replace(&mut city.name, new_name.to_string());
    city.province = new_province.to_string();

    validate_document_id(&city.name)?;

    if old_name == city.name {
        Ok(vec![Write::set_city(city)])
    } else {
        Ok(vec![Write::delete(old_name), Write::set_city(city)])
    }
}

/// Writes for deleting a city: one `Delete` keyed by its name.
pub fn plan_delete(city: &City) -> Result<Vec<Write>> {
    validate_document_id(&city.name)?;
    Ok(vec![Write::delete(city.document_id())])
}
