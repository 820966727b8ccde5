//! Document type registry: store name → representation.
//!
//! The registry maps each store name (e.g. `"jira_issues"`) to the
//! [`DocumentClass`] that knows how to interpret that store's attributes.
//! Lookups for unknown names never fail: they log a warning and fall back
//! to the base [`GenericDocument`] so a missing registration degrades to
//! generic storage instead of dropping records.
//!
//! # Lifecycle
//!
//! ```text
//!  new() ──▶ uninitialized ──(first lookup)──▶ initialized
//!                 ▲                                  │
//!                 └──────────── reset() ─────────────┘
//! ```
//!
//! Initialization registers [`BUILTIN_TYPES`] with insert-if-absent
//! semantics, so registrations made before the first lookup (e.g. test
//! overrides) are kept.
//!
//! # Example
//!
//! ```rust
//! use docharvest_core::document::{Document, DocumentRecord};
//! use docharvest_core::registry::DocumentRegistry;
//!
//! let registry = DocumentRegistry::new();
//! assert!(registry.is_registered("jira_issues"));
//! let doc = registry.create(DocumentRecord::default(), "not_a_store");
//! assert_eq!(doc.kind(), "Document");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::document::{Attributes, Document, DocumentRecord, GenericDocument, Representation};
use crate::stores;
use crate::types::{
    BitbucketPullRequest, CalendarDocument, EmailDocument, JiraDocument, SlabChunkDocument,
    SlabDocument, SlackMessageDocument,
};

// ═══════════════════════════════════════════════════════════════════════
// Document Classes
// ═══════════════════════════════════════════════════════════════════════

/// A first-class handle to a [`Representation`] type.
///
/// Carries the type's kind tag and a constructor, so the registry can
/// build boxed documents without knowing the concrete type.
#[derive(Clone, Copy)]
pub struct DocumentClass {
    kind: &'static str,
    build: fn(DocumentRecord) -> Box<dyn Document>,
}

fn build_boxed<T: Representation>(record: DocumentRecord) -> Box<dyn Document> {
    Box::new(T::deserialize(record))
}

impl DocumentClass {
    pub const fn of<T: Representation>() -> Self {
        Self {
            kind: T::KIND,
            build: build_boxed::<T>,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Rebuild a document of this class from its storage shape.
    pub fn deserialize(&self, record: DocumentRecord) -> Box<dyn Document> {
        (self.build)(record)
    }

    /// Construct a fresh document of this class.
    pub fn construct(
        &self,
        text: impl Into<String>,
        attributes: Option<Attributes>,
    ) -> Box<dyn Document> {
        self.deserialize(DocumentRecord {
            text: text.into(),
            attributes: attributes.unwrap_or_default(),
            ..Default::default()
        })
    }
}

impl PartialEq for DocumentClass {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for DocumentClass {}

impl fmt::Debug for DocumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DocumentClass").field(&self.kind).finish()
    }
}

/// Built-in store registrations, applied on first registry access.
pub const BUILTIN_TYPES: &[(&str, DocumentClass)] = &[
    (stores::JIRA_ISSUES, DocumentClass::of::<JiraDocument>()),
    (stores::EMAIL_MESSAGES, DocumentClass::of::<EmailDocument>()),
    (stores::SLACK_MESSAGES, DocumentClass::of::<SlackMessageDocument>()),
    (stores::SLAB_DOCUMENTS, DocumentClass::of::<SlabDocument>()),
    (stores::SLAB_DOCUMENT_CHUNKS, DocumentClass::of::<SlabChunkDocument>()),
    (stores::BITBUCKET_PULL_REQUESTS, DocumentClass::of::<BitbucketPullRequest>()),
    (stores::GOOGLE_CALENDAR_EVENTS, DocumentClass::of::<CalendarDocument>()),
];

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct RegistryState {
    types: HashMap<String, DocumentClass>,
    initialized: bool,
}

/// Maps store names to document classes.
///
/// One lock guards the whole map. Registration is expected at startup,
/// before ingestion starts reading; lookups only take the read lock once
/// the registry is initialized.
pub struct DocumentRegistry {
    state: RwLock<RegistryState>,
}

impl DocumentRegistry {
    /// Create an uninitialized registry. Built-in types load lazily on
    /// first lookup.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Create a registry with the built-in types already loaded.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.ensure_initialized();
        registry
    }

    /// Register `class` for `store_name`. Re-registering a name replaces
    /// the previous class.
    pub fn register(&self, store_name: impl Into<String>, class: DocumentClass) {
        let store_name = store_name.into();
        debug!(store = %store_name, kind = class.kind(), "registered document type");
        self.write().types.insert(store_name, class);
    }

    /// Register representation `T` for `store_name`.
    pub fn register_type<T: Representation>(&self, store_name: impl Into<String>) {
        self.register(store_name, DocumentClass::of::<T>());
    }

    /// Build the document for `store_name` from `record`, falling back to
    /// the base [`GenericDocument`] for unknown names.
    pub fn create(&self, record: DocumentRecord, store_name: &str) -> Box<dyn Document> {
        self.class_for(store_name).deserialize(record)
    }

    /// The class registered for `store_name`, or the base class.
    pub fn class_for(&self, store_name: &str) -> DocumentClass {
        match self.lookup(store_name) {
            Some(class) => class,
            None => {
                warn!(
                    store = store_name,
                    "no document type registered for store, using base Document"
                );
                DocumentClass::of::<GenericDocument>()
            }
        }
    }

    pub fn is_registered(&self, store_name: &str) -> bool {
        self.lookup(store_name).is_some()
    }

    /// Store name → kind for every registration, sorted by store name.
    pub fn list_registered(&self) -> BTreeMap<String, &'static str> {
        self.ensure_initialized();
        self.read()
            .types
            .iter()
            .map(|(name, class)| (name.clone(), class.kind()))
            .collect()
    }

    /// Drop every registration and return to the uninitialized state.
    pub fn reset(&self) {
        let mut state = self.write();
        state.types.clear();
        state.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.read().initialized
    }

    fn lookup(&self, store_name: &str) -> Option<DocumentClass> {
        self.ensure_initialized();
        self.read().types.get(store_name).copied()
    }

    fn ensure_initialized(&self) {
        if self.read().initialized {
            return;
        }
        let mut state = self.write();
        if state.initialized {
            return;
        }
        for (store_name, class) in BUILTIN_TYPES {
            state
                .types
                .entry((*store_name).to_string())
                .or_insert(*class);
        }
        state.initialized = true;
        debug!(count = state.types.len(), "document registry initialized");
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for DocumentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DocumentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("DocumentRegistry")
            .field("types", &state.types)
            .field("initialized", &state.initialized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentCore;
    use serde_json::json;

    #[derive(Debug)]
    struct A {
        core: DocumentCore,
    }

    impl Representation for A {
        const KIND: &'static str = "A";
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

    #[derive(Debug)]
    struct B {
        core: DocumentCore,
    }

    impl Representation for B {
        const KIND: &'static str = "B";
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

    fn record(text: &str, metadata: serde_json::Value) -> DocumentRecord {
        DocumentRecord {
            text: text.to_string(),
            attributes: metadata.as_object().cloned().unwrap_or_default(),
            ..Default::default()
        }
    }

    #[test]
    fn test_lazy_initialization() {
        let registry = DocumentRegistry::new();
        assert!(!registry.is_initialized());
        assert!(registry.is_registered("jira_issues"));
        assert!(registry.is_initialized());
    }

    #[test]
    fn test_create_jira_issue() {
        let registry = DocumentRegistry::new();
        let doc = registry.create(
            record("Fix bug", json!({"key": "PROJ-9", "status_name": "Open"})),
            "jira_issues",
        );
        assert_eq!(doc.kind(), "JiraDocument");
        assert_eq!(doc.identity(), "PROJ-9");
        assert_eq!(doc.attribute_str("status_name"), "Open");
    }

    #[test]
    fn test_unknown_store_falls_back() {
        let registry = DocumentRegistry::new();
        let doc = registry.create(record("hello", json!({})), "unregistered_store");
        assert_eq!(doc.kind(), "Document");
        assert_eq!(doc.identity(), "Unknown");
        assert_eq!(registry.class_for("unregistered_store").kind(), "Document");
        assert!(!registry.is_registered("unregistered_store"));
    }

    #[test]
    fn test_last_write_wins() {
        let registry = DocumentRegistry::new();
        registry.register_type::<A>("test_store");
        registry.register_type::<B>("test_store");
        assert_eq!(registry.class_for("test_store"), DocumentClass::of::<B>());
    }

    #[test]
    fn test_same_type_under_two_names() {
        let registry = DocumentRegistry::new();
        registry.register_type::<A>("first");
        registry.register_type::<A>("second");
        assert_eq!(registry.class_for("first").kind(), "A");
        assert_eq!(registry.class_for("second").kind(), "A");
    }

    #[test]
    fn test_override_before_init_survives_builtins() {
        let registry = DocumentRegistry::new();
        registry.register_type::<A>("jira_issues");
        assert_eq!(registry.class_for("jira_issues").kind(), "A");
        assert!(registry.is_registered("slack_messages"));
    }

    #[test]
    fn test_list_registered() {
        let registry = DocumentRegistry::with_builtins();
        let listed = registry.list_registered();
        assert_eq!(listed.len(), BUILTIN_TYPES.len());
        assert_eq!(listed.get("slab_document_chunks"), Some(&"SlabChunkDocument"));
        assert_eq!(listed.get("bitbucket_pull_requests"), Some(&"BitbucketPullRequest"));
    }

    #[test]
    fn test_reset_clears_and_reinitializes() {
        let registry = DocumentRegistry::with_builtins();
        registry.register_type::<A>("custom");
        registry.reset();
        assert!(!registry.is_initialized());
        assert!(!registry.is_registered("custom"));
        assert!(registry.is_registered("email_messages"));
    }

    #[test]
    fn test_every_builtin_round_trips() {
        let registry = DocumentRegistry::with_builtins();
        let attributes = json!({"title": "t", "nested": {"a": [1, 2, 3]}});
        for (store, class) in BUILTIN_TYPES {
            let doc = registry.create(record("body text", attributes.clone()), store);
            assert_eq!(doc.kind(), class.kind());
            let restored = class.deserialize(doc.serialize());
            assert_eq!(restored.text(), doc.text());
            assert_eq!(restored.attributes(), doc.attributes());
            assert_eq!(restored.kind(), doc.kind());
        }
    }

    #[test]
    fn test_identity_never_empty_without_natural_key() {
        let registry = DocumentRegistry::with_builtins();
        for (store, _) in BUILTIN_TYPES {
            let doc = registry.create(record("", json!({})), store);
            assert!(!doc.identity().is_empty(), "empty identity for {}", store);
        }
    }

    #[test]
    fn test_construct_through_class() {
        let class = DocumentClass::of::<SlabDocument>();
        let doc = class.construct("page", json!({"document_id": "s-1"}).as_object().cloned());
        assert_eq!(doc.identity(), "s-1");
        assert_eq!(doc.relevance_score(), None);
    }
}
