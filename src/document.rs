//! JSON documents handed in by callers.

use std::fmt;

use crate::error::NljqError;

/// The forms a caller may supply a document in.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// JSON text, parsed on entry
    Text(String),
    /// An already parsed value, used as-is
    Value(serde_json::Value),
    /// Raw bytes, typically read from a file or stdin; must be UTF-8 JSON text
    Bytes(Vec<u8>),
}

impl From<&str> for DocumentSource {
    fn from(s: &str) -> Self {
        DocumentSource::Text(s.to_string())
    }
}

impl From<String> for DocumentSource {
    fn from(s: String) -> Self {
        DocumentSource::Text(s)
    }
}

impl From<serde_json::Value> for DocumentSource {
    fn from(v: serde_json::Value) -> Self {
        DocumentSource::Value(v)
    }
}

impl From<Vec<u8>> for DocumentSource {
    fn from(bytes: Vec<u8>) -> Self {
        DocumentSource::Bytes(bytes)
    }
}

/// A parsed JSON document, owned for the duration of one call.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    value: serde_json::Value,
}

impl Document {
    /// Parses a document from any supported source.
    ///
    /// # Errors
    ///
    /// - [`NljqError::InvalidJson`] when text does not parse as JSON
    /// - [`NljqError::InvalidInputType`] when bytes are not UTF-8 text
    ///
    /// # Examples
    ///
    /// ```
    /// use nljq::{Document, NljqError};
    ///
    /// let doc = Document::parse(r#"{"name": "Alice"}"#).unwrap();
    /// assert_eq!(doc.as_json()["name"], "Alice");
    ///
    /// assert!(matches!(Document::parse("{not json"), Err(NljqError::InvalidJson(_))));
    /// ```
    pub fn parse(source: impl Into<DocumentSource>) -> Result<Self, NljqError> {
        let value = match source.into() {
            DocumentSource::Text(text) => {
                serde_json::from_str(&text).map_err(NljqError::InvalidJson)?
            }
            DocumentSource::Value(value) => value,
            DocumentSource::Bytes(bytes) => {
                let text = String::from_utf8(bytes).map_err(|e| {
                    NljqError::InvalidInputType(format!(
                        "document bytes are not UTF-8 text ({})",
                        e.utf8_error()
                    ))
                })?;
                serde_json::from_str(&text).map_err(NljqError::InvalidJson)?
            }
        };
        Ok(Document { value })
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.value
    }

    pub fn into_json(self) -> serde_json::Value {
        self.value
    }

    /// Two-space indented JSON text.
    pub fn to_pretty_string(&self) -> String {
        // Serializing a Value into a String cannot fail
        serde_json::to_string_pretty(&self.value).unwrap_or_default()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
