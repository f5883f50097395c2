//! Documents and collection snapshots.
//!
//! A document is a JSON object stored under a string key inside a named
//! collection. Snapshots carry the whole collection, ordered by key.

use crate::{error::Result, CollectionName, DocumentId, Error};
use serde::{Deserialize, Serialize};

/// Field set of a document.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Longest document id the backend accepts, in bytes.
pub const MAX_DOCUMENT_ID_BYTES: usize = 1500;

/// Check that `id` can be used as a document key.
///
/// Ids must be non-empty, at most [`MAX_DOCUMENT_ID_BYTES`] long, must not
/// contain `/` and must not be `.` or `..`.
pub fn validate_document_id(id: &str) -> Result<()> {
    let reason = if id.is_empty() {
        Some("must not be empty")
    } else if id.len() > MAX_DOCUMENT_ID_BYTES {
        Some("must be at most 1500 bytes")
    } else if id.contains('/') {
        Some("must not contain '/'")
    } else if id == "." || id == ".." {
        Some("must not be '.' or '..'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidDocumentId {
            id: id.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// A single document in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document key, unique within its collection
    pub id: DocumentId,
    /// Document contents
    pub fields: Fields,
}

impl Document {
    /// Create a new document.
    pub fn new(id: impl Into<DocumentId>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Read a string field, `None` if it is absent or not a string.
    pub fn get_string(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|value| value.as_str())
    }
}

/// The full, ordered contents of a collection at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySnapshot {
    /// Collection the documents belong to
    pub collection: CollectionName,
    /// Documents in ascending id order
    pub documents: Vec<Document>,
}

impl QuerySnapshot {
    /// Create an empty snapshot for a collection.
    pub fn empty(collection: impl Into<CollectionName>) -> Self {
        Self {
            collection: collection.into(),
            documents: Vec::new(),
        }
    }

    /// Number of documents in the snapshot.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the collection was empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterate over the documents in snapshot order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_ids() {
        assert!(validate_document_id("Calgary").is_ok());
        assert!(validate_document_id("St. John's").is_ok());
        assert!(validate_document_id("Trois-Rivières").is_ok());
        assert!(validate_document_id(&"a".repeat(MAX_DOCUMENT_ID_BYTES)).is_ok());
    }

    #[test]
    fn invalid_ids() {
        for id in ["", ".", "..", "Calgary/AB"] {
            assert!(
                matches!(
                    validate_document_id(id),
                    Err(Error::InvalidDocumentId { .. })
                ),
                "expected '{}' to be rejected",
                id
            );
        }
        assert!(validate_document_id(&"a".repeat(MAX_DOCUMENT_ID_BYTES + 1)).is_err());
    }

    #[test]
    fn get_string_ignores_non_strings() {
        let fields = json!({"name": "Calgary", "population": 1_300_000})
            .as_object()
            .cloned()
            .unwrap();
        let doc = Document::new("Calgary", fields);

        assert_eq!(doc.get_string("name"), Some("Calgary"));
        assert_eq!(doc.get_string("population"), None);
        assert_eq!(doc.get_string("province"), None);
    }

    #[test]
    fn snapshot_serialization() {
        let snapshot = QuerySnapshot {
            collection: "Cities".into(),
            documents: vec![Document::new(
                "Calgary",
                json!({"name": "Calgary", "province": "AB"})
                    .as_object()
                    .cloned()
                    .unwrap(),
            )],
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json,
            json!({
                "collection": "Cities",
                "documents": [
                    {"id": "Calgary", "fields": {"name": "Calgary", "province": "AB"}}
                ]
            })
        );
    }
}
