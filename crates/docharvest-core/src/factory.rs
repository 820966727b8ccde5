//! Conversion from exporter output to typed documents.
//!
//! Exporters emit records shaped `{ text, metadata, id? }`. This module
//! adapts them to the registry's input shape and resolves the concrete
//! representation for a store. An exporter-supplied `id` always overrides
//! the identity the representation would derive.
//!
//! Two parsing modes are offered:
//!
//! - [`ExternalRecord::from_json`] is permissive: wrong shapes are coerced
//!   (non-string text is stringified, non-object metadata is dropped).
//! - [`ExternalRecord::from_json_strict`] rejects wrong shapes with a
//!   [`MalformedRecordError`] the caller can log per record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::document::{value_to_text, Attributes, Document, DocumentRecord};
use crate::registry::DocumentRegistry;

/// An exporter record failed strict validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecordError {
    #[error("record must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("`text` must be a string, got {0}")]
    InvalidText(&'static str),
    #[error("`metadata` must be an object, got {0}")]
    InvalidMetadata(&'static str),
    #[error("`id` must be a string or number, got {0}")]
    InvalidId(&'static str),
}

/// Raw record produced by a source exporter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl ExternalRecord {
    pub fn new(text: impl Into<String>, metadata: Attributes) -> Self {
        Self {
            text: text.into(),
            metadata,
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Parse leniently. Never fails: missing text becomes `""`, missing or
    /// non-object metadata becomes empty, and a non-object record is
    /// treated as bare text.
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::new(value_to_text(value), Attributes::new());
        };

        let text = obj.get("text").map(value_to_text).unwrap_or_default();
        let metadata = obj
            .get("metadata")
            .and_then(|m| m.as_object())
            .cloned()
            .unwrap_or_default();
        let id = obj
            .get("id")
            .map(value_to_text)
            .filter(|id| !id.is_empty());

        Self { text, metadata, id }
    }

    /// Parse strictly, rejecting records whose fields have the wrong shape.
    /// Absent fields still default.
    pub fn from_json_strict(value: &Value) -> Result<Self, MalformedRecordError> {
        let obj = value
            .as_object()
            .ok_or(MalformedRecordError::NotAnObject(json_type(value)))?;

        let text = match obj.get("text") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => return Err(MalformedRecordError::InvalidText(json_type(other))),
        };

        let metadata = match obj.get("metadata") {
            None | Some(Value::Null) => Attributes::new(),
            Some(Value::Object(m)) => m.clone(),
            Some(other) => return Err(MalformedRecordError::InvalidMetadata(json_type(other))),
        };

        let id = match obj.get("id") {
            None | Some(Value::Null) => None,
            Some(v @ (Value::String(_) | Value::Number(_))) => {
                Some(value_to_text(v)).filter(|id| !id.is_empty())
            }
            Some(other) => return Err(MalformedRecordError::InvalidId(json_type(other))),
        };

        Ok(Self { text, metadata, id })
    }

    fn into_document_record(self) -> DocumentRecord {
        DocumentRecord {
            identity: self.id.unwrap_or_default(),
            text: self.text,
            attributes: self.metadata,
            ..Default::default()
        }
    }
}

/// Build the representation registered for `store_name` from one
/// exporter record.
pub fn from_external_record(
    registry: &DocumentRegistry,
    record: ExternalRecord,
    store_name: &str,
) -> Box<dyn Document> {
    let explicit_id = record.id.clone().filter(|id| !id.is_empty());
    let mut doc = registry.create(record.into_document_record(), store_name);
    if let Some(id) = explicit_id {
        doc.set_identity(id);
    }
    doc
}

/// Lazily convert a sequence of exporter records, preserving order.
pub fn from_external_records<'a, I>(
    registry: &'a DocumentRegistry,
    records: I,
    store_name: &'a str,
) -> impl Iterator<Item = Box<dyn Document>> + 'a
where
    I: IntoIterator<Item = ExternalRecord>,
    I::IntoIter: 'a,
{
    records
        .into_iter()
        .map(move |record| from_external_record(registry, record, store_name))
}
