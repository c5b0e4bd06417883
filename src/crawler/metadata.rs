//! Per-edition metadata documents

use crate::HarvestError;
use serde_json::Value;

/// A decoded metadata document for one edition
///
/// The document is kept as a generic JSON value so it can be stored exactly
/// as received; only `name` and `image` are interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct EditionMetadata {
    edition: u64,
    doc: Value,
}

impl EditionMetadata {
    /// Parses the text of a metadata document
    pub fn parse(edition: u64, text: &str) -> Result<Self, HarvestError> {
        let doc = serde_json::from_str(text)
            .map_err(|source| HarvestError::MetadataParse { edition, source })?;
        Ok(Self { edition, doc })
    }

    pub fn edition(&self) -> u64 {
        self.edition
    }

    pub fn document(&self) -> &Value {
        &self.doc
    }

    /// The declared name, used as the image's base file name
    ///
    /// Numeric names are accepted and rendered in decimal.
    pub fn name(&self) -> Option<String> {
        match self.doc.get("name")? {
            Value::String(name) if !name.is_empty() => Some(name.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    /// The image locator, if the document has one
    pub fn image(&self) -> Option<&str> {
        self.doc
            .get("image")
            .and_then(Value::as_str)
            .filter(|locator| !locator.is_empty())
    }
}
