//! Error types for the Listy engine.

use crate::DocumentId;
use thiserror::Error;

/// All possible errors from the Listy engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Document errors
    #[error("invalid document id '{id}': {reason}")]
    InvalidDocumentId { id: DocumentId, reason: String },

    #[error("document '{id}' is missing string field '{field}'")]
    MissingField { id: DocumentId, field: String },

    // Dialog errors
    #[error("dialog already dismissed")]
    DialogDismissed,

    #[error("delete is only available when editing a city")]
    DeleteInCreateMode,
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::InvalidDocumentId {
            id: "a/b".into(),
            reason: "must not contain '/'".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid document id 'a/b': must not contain '/'"
        );

        let err = Error::MissingField {
            id: "Calgary".into(),
            field: "province".into(),
        };
        assert_eq!(
            err.to_string(),
            "document 'Calgary' is missing string field 'province'"
        );

        assert_eq!(Error::DialogDismissed.to_string(), "dialog already dismissed");
    }
}
