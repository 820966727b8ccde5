//! Base document model shared by every source representation.
//!
//! A document is page text plus a freeform attribute bag supplied by an
//! upstream exporter. Concrete source types (Jira issues, Slack messages,
//! Slab pages, …) implement [`Representation`] to add a natural key and a
//! set of labeled fields; every such type automatically gets the
//! object-safe [`Document`] capability used by the registry and the
//! storage layer.
//!
//! # Identity resolution
//!
//! ```text
//! explicit identity (exporter / storage)  ──▶ wins if non-empty
//!            │ none
//!            ▼
//! Representation::natural_identity()      ──▶ wins if non-empty
//!            │ none
//!            ▼
//!        "Unknown"
//! ```
//!
//! # Example
//!
//! ```rust
//! use docharvest_core::document::{Document, DocumentCore, GenericDocument, Representation};
//!
//! let doc = GenericDocument::from_core(DocumentCore::new("hello", None));
//! assert_eq!(doc.kind(), "Document");
//! assert_eq!(doc.identity(), "Unknown");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Freeform attribute bag carried by every document.
pub type Attributes = Map<String, Value>;

/// Identity reported when neither an explicit nor a natural key exists.
pub const UNKNOWN_IDENTITY: &str = "Unknown";

/// Kind tag of the fallback representation.
pub const BASE_KIND: &str = "Document";

const FENCE: &str = ">>>>>>>>>>>>";

/// Storage/wire shape of a document.
///
/// Produced by [`Document::serialize`] and consumed by
/// [`Representation::deserialize`]. Every field defaults when absent so
/// that partially-populated records from storage still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default)]
    pub identity: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

/// State shared by all representations: text, attributes, explicit
/// identity, and the optional search score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentCore {
    text: String,
    attributes: Attributes,
    identity: Option<String>,
    relevance_score: Option<f64>,
}

impl DocumentCore {
    /// Build a core from text and an optional attribute bag. Missing
    /// attributes become an empty map.
    pub fn new(text: impl Into<String>, attributes: Option<Attributes>) -> Self {
        Self {
            text: text.into(),
            attributes: attributes.unwrap_or_default(),
            identity: None,
            relevance_score: None,
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.set_identity(identity);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Explicitly assigned identity, ignoring empty strings.
    pub fn explicit_identity(&self) -> Option<&str> {
        self.identity.as_deref().filter(|id| !id.is_empty())
    }

    pub fn set_identity(&mut self, identity: impl Into<String>) {
        self.identity = Some(identity.into());
    }

    /// Enrich the attribute bag before storage.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    pub fn relevance_score(&self) -> Option<f64> {
        self.relevance_score
    }

    pub fn set_relevance_score(&mut self, score: Option<f64>) {
        self.relevance_score = score;
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Attribute coerced to a string, `""` when absent or null.
    pub fn get_str(&self, key: &str) -> String {
        self.get(key).map(value_to_text).unwrap_or_default()
    }

    /// Attribute coerced to a string, `default` when absent, null, or empty.
    pub fn get_str_or(&self, key: &str, default: &str) -> String {
        let value = self.get_str(key);
        if value.is_empty() {
            default.to_string()
        } else {
            value
        }
    }
}

/// Render a JSON value as display text.
///
/// Strings are returned verbatim, null is empty, numbers and booleans use
/// their JSON spelling, arrays are joined with `", "`, and objects fall
/// back to compact JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// A concrete, source-specific document type.
///
/// Implementors supply their constant kind tag, how to wrap a
/// [`DocumentCore`], and optionally a natural key and labeled fields for
/// [`Document::describe`]. Everything else comes from the blanket
/// [`Document`] implementation.
pub trait Representation: fmt::Debug + Send + Sync + 'static {
    /// The representation's own name, used as its `kind`.
    const KIND: &'static str;

    fn from_core(core: DocumentCore) -> Self
    where
        Self: Sized;

    fn core(&self) -> &DocumentCore;

    fn core_mut(&mut self) -> &mut DocumentCore;

    /// Source-specific natural key, if derivable from the attributes.
    fn natural_identity(&self) -> Option<String> {
        None
    }

    /// Ordered `(label, value)` pairs rendered by [`Document::describe`].
    fn labeled_fields(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Rebuild a representation from its storage shape.
    ///
    /// The record's identity is pinned as the explicit identity only when
    /// the attributes do not already derive it; derived identities stay
    /// derived. Empty and `"Unknown"` identities are never pinned.
    fn deserialize(record: DocumentRecord) -> Self
    where
        Self: Sized,
    {
        let stored = record.identity;
        let mut core = DocumentCore::new(record.text, Some(record.attributes));
        core.set_relevance_score(record.relevance_score);
        let mut doc = Self::from_core(core);
        if !stored.is_empty()
            && stored != UNKNOWN_IDENTITY
            && doc.natural_identity().as_deref() != Some(stored.as_str())
        {
            doc.core_mut().set_identity(stored);
        }
        doc
    }
}

/// Object-safe document capability consumed by the registry, factory,
/// and storage code.
pub trait Document: fmt::Debug + Send + Sync {
    fn kind(&self) -> &'static str;

    fn text(&self) -> &str;

    fn attributes(&self) -> &Attributes;

    /// Resolved identity; never empty.
    fn identity(&self) -> String;

    fn relevance_score(&self) -> Option<f64>;

    fn set_relevance_score(&mut self, score: Option<f64>);

    /// Override the derived identity with an explicit one.
    fn set_identity(&mut self, identity: String);

    fn set_attribute(&mut self, key: String, value: Value);

    /// Human-oriented rendering for debugging and reports.
    fn describe(&self) -> String;

    fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes().get(key)
    }

    fn attribute_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.attribute(key).unwrap_or(default)
    }

    fn attribute_str(&self, key: &str) -> String {
        self.attribute(key).map(value_to_text).unwrap_or_default()
    }

    fn serialize(&self) -> DocumentRecord {
        DocumentRecord {
            identity: self.identity(),
            text: self.text().to_string(),
            attributes: self.attributes().clone(),
            kind: self.kind().to_string(),
            relevance_score: self.relevance_score(),
        }
    }
}

impl<T: Representation> Document for T {
    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn text(&self) -> &str {
        self.core().text()
    }

    fn attributes(&self) -> &Attributes {
        self.core().attributes()
    }

    fn identity(&self) -> String {
        if let Some(id) = self.core().explicit_identity() {
            return id.to_string();
        }
        self.natural_identity()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| UNKNOWN_IDENTITY.to_string())
    }

    fn relevance_score(&self) -> Option<f64> {
        self.core().relevance_score()
    }

    fn set_relevance_score(&mut self, score: Option<f64>) {
        self.core_mut().set_relevance_score(score);
    }

    fn set_identity(&mut self, identity: String) {
        self.core_mut().set_identity(identity);
    }

    fn set_attribute(&mut self, key: String, value: Value) {
        self.core_mut().set_attribute(key, value);
    }

    fn describe(&self) -> String {
        render_description(T::KIND, &self.labeled_fields(), self.core(), &self.identity())
    }
}

/// Shared renderer behind [`Document::describe`].
///
/// Order: kind, non-empty labeled fields, content block, optional context
/// block, full attribute dump, identity marker.
fn render_description(
    kind: &str,
    fields: &[(&'static str, String)],
    core: &DocumentCore,
    identity: &str,
) -> String {
    let mut lines = vec![format!("Document Type: {}", kind)];

    for (label, value) in fields {
        if !value.is_empty() {
            lines.push(format!("{}: {}", label, value));
        }
    }

    lines.push("Content:".to_string());
    lines.push(FENCE.to_string());
    lines.push(core.text().to_string());
    lines.push(FENCE.to_string());

    let context = core.get_str("context");
    if !context.is_empty() {
        lines.push("Context:".to_string());
        lines.push(FENCE.to_string());
        lines.push(context);
        lines.push(FENCE.to_string());
    }

    lines.push("Additional Metadata:".to_string());
    lines.push(
        serde_json::to_string_pretty(core.attributes()).unwrap_or_else(|_| "{}".to_string()),
    );
    lines.push(format!("END: {}", identity));
    lines.push(FENCE.to_string());

    lines.join("\n")
}

/// Fallback representation used for store names with no registered type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericDocument {
    core: DocumentCore,
}

impl Representation for GenericDocument {
    const KIND: &'static str = BASE_KIND;

    fn from_core(core: DocumentCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DocumentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DocumentCore {
        &mut self.core
    }
}

impl fmt::Display for GenericDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JiraDocument;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_missing_attributes_become_empty() {
        let doc = GenericDocument::from_core(DocumentCore::new("body", None));
        assert!(doc.attributes().is_empty());
        assert_eq!(doc.text(), "body");
        assert_eq!(doc.relevance_score(), None);
    }

    #[test]
    fn test_identity_defaults_to_sentinel() {
        let doc = GenericDocument::from_core(DocumentCore::new("", None));
        assert_eq!(doc.identity(), UNKNOWN_IDENTITY);
    }

    #[test]
    fn test_explicit_identity_wins() {
        let doc = GenericDocument::from_core(DocumentCore::new("", None).with_identity("abc"));
        assert_eq!(doc.identity(), "abc");
    }

    #[test]
    fn test_empty_explicit_identity_ignored() {
        let doc = GenericDocument::from_core(DocumentCore::new("", None).with_identity(""));
        assert_eq!(doc.identity(), UNKNOWN_IDENTITY);
    }

    #[test]
    fn test_attribute_lookup_defaults() {
        let doc = GenericDocument::from_core(DocumentCore::new(
            "",
            Some(attrs(json!({"present": "yes"}))),
        ));
        let fallback = json!("fallback");
        assert_eq!(doc.attribute("present"), Some(&json!("yes")));
        assert_eq!(doc.attribute("missing"), None);
        assert_eq!(doc.attribute_or("missing", &fallback), &fallback);
        assert_eq!(doc.attribute_str("missing"), "");
    }

    #[test]
    fn test_value_to_text_coercions() {
        assert_eq!(value_to_text(&json!(null)), "");
        assert_eq!(value_to_text(&json!(42)), "42");
        assert_eq!(value_to_text(&json!(true)), "true");
        assert_eq!(value_to_text(&json!(["a", "b"])), "a, b");
        assert_eq!(value_to_text(&json!({"k": 1})), r#"{"k":1}"#);
    }

    #[test]
    fn test_serialize_shape() {
        let doc = GenericDocument::from_core(DocumentCore::new(
            "text",
            Some(attrs(json!({"a": 1}))),
        ));
        let record = doc.serialize();
        assert_eq!(record.identity, UNKNOWN_IDENTITY);
        assert_eq!(record.kind, "Document");
        assert_eq!(record.text, "text");
        assert_eq!(record.attributes, attrs(json!({"a": 1})));

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("relevance_score").is_none());
    }

    #[test]
    fn test_deserialize_round_trip() {
        let original = GenericDocument::from_core(DocumentCore::new(
            "round trip",
            Some(attrs(json!({"nested": {"x": [1, 2]}, "s": "v"}))),
        ));
        let restored = GenericDocument::deserialize(original.serialize());
        assert_eq!(restored.text(), original.text());
        assert_eq!(restored.attributes(), original.attributes());
        assert_eq!(restored.kind(), original.kind());
    }

    #[test]
    fn test_deserialize_keeps_derived_identity_derived() {
        let issue = JiraDocument::from_core(DocumentCore::new(
            "body",
            Some(attrs(json!({"key": "PROJ-1"}))),
        ));
        let mut restored = JiraDocument::deserialize(issue.serialize());
        assert_eq!(restored.identity(), "PROJ-1");
        assert_eq!(restored.core().explicit_identity(), None);

        restored.set_attribute("key".into(), json!("PROJ-2"));
        assert_eq!(restored.identity(), "PROJ-2");
    }

    #[test]
    fn test_deserialize_pins_identity_attributes_cannot_derive() {
        let issue = JiraDocument::from_core(
            DocumentCore::new("body", Some(attrs(json!({"key": "PROJ-1"})))).with_identity("LEGACY-9"),
        );
        let restored = JiraDocument::deserialize(issue.serialize());
        assert_eq!(restored.identity(), "LEGACY-9");
        assert_eq!(restored.core().explicit_identity(), Some("LEGACY-9"));
    }

    #[test]
    fn test_deserialize_does_not_promote_sentinel() {
        let record = DocumentRecord {
            identity: UNKNOWN_IDENTITY.to_string(),
            ..Default::default()
        };
        let doc = GenericDocument::deserialize(record);
        assert_eq!(doc.core().explicit_identity(), None);
    }

    #[test]
    fn test_describe_layout() {
        let doc = GenericDocument::from_core(
            DocumentCore::new("the body", Some(attrs(json!({"context": "thread summary"}))))
                .with_identity("doc-1"),
        );
        let text = doc.describe();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Document Type: Document");
        assert_eq!(lines[1], "Content:");
        assert_eq!(lines[3], "the body");
        assert!(text.contains("Context:\n>>>>>>>>>>>>\nthread summary"));
        assert!(text.contains("Additional Metadata:"));
        assert!(text.ends_with("END: doc-1\n>>>>>>>>>>>>"));
    }

    #[test]
    fn test_describe_does_not_mutate_attributes() {
        let doc = GenericDocument::from_core(DocumentCore::new(
            "x",
            Some(attrs(json!({"k": "v"}))),
        ));
        let before = doc.attributes().clone();
        let _ = doc.describe();
        let _ = doc.serialize();
        assert_eq!(doc.attributes(), &before);
    }
}
