//! The City record.

use crate::{error::Result, Document, DocumentId, Error, Fields};
use serde::{Deserialize, Serialize};

/// A city shown in the list.
///
/// The name doubles as the document key, so two cities in the same
/// collection can never share a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct City {
    /// City name, also the document id
    pub name: String,
    /// Province or territory
    pub province: String,
}

impl City {
    /// Field holding the city name.
    pub const NAME_FIELD: &'static str = "name";
    /// Field holding the province.
    pub const PROVINCE_FIELD: &'static str = "province";

    /// Create a new city.
    pub fn new(name: impl Into<String>, province: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            province: province.into(),
        }
    }

    /// Document id this city is stored under.
    pub fn document_id(&self) -> DocumentId {
        self.name.clone()
    }

    /// Full field set written for this city.
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(Self::NAME_FIELD.into(), self.name.clone().into());
        fields.insert(Self::PROVINCE_FIELD.into(), self.province.clone().into());
        fields
    }

    /// Reconstruct a city from a document's `name` and `province` fields.
    pub fn from_document(doc: &Document) -> Result<Self> {
        let field = |name: &str| {
            doc.get_string(name)
                .map(str::to_string)
                .ok_or_else(|| Error::MissingField {
                    id: doc.id.clone(),
                    field: name.to_string(),
                })
        };

        Ok(Self {
            name: field(Self::NAME_FIELD)?,
            province: field(Self::PROVINCE_FIELD)?,
        })
    }
}

impl TryFrom<&Document> for City {
    type Error = Error;

    fn try_from(doc: &Document) -> Result<Self> {
        Self::from_document(doc)
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.province)
    }
}
