use uuid::Uuid;

use crate::document::{DocumentCore, Representation};

/// Slab page fields shared by whole documents and their chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabFields {
    core: DocumentCore,
}

impl SlabFields {
    fn new(core: DocumentCore) -> Self {
        Self { core }
    }

    pub fn document_id(&self) -> String {
        self.core.get_str("document_id")
    }

    pub fn title(&self) -> String {
        self.core.get_str("title")
    }

    pub fn owner(&self) -> String {
        self.core.get_str("owner")
    }

    pub fn contributors(&self) -> String {
        self.core.get_str("contributors")
    }

    pub fn topics(&self) -> String {
        self.core.get_str("topics")
    }

    fn doc_type_or(&self, default: &str) -> String {
        self.core.get_str_or("type", default)
    }
}

/// A complete Slab page, keyed by its Slab document id.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabDocument {
    fields: SlabFields,
}

impl SlabDocument {
    pub fn fields(&self) -> &SlabFields {
        &self.fields
    }

    pub fn document_id(&self) -> String {
        self.fields.document_id()
    }

    pub fn title(&self) -> String {
        self.fields.title()
    }

    pub fn owner(&self) -> String {
        self.fields.owner()
    }

    pub fn contributors(&self) -> String {
        self.fields.contributors()
    }

    pub fn topics(&self) -> String {
        self.fields.topics()
    }

    pub fn doc_type(&self) -> String {
        self.fields.doc_type_or("slab_document")
    }
}

impl Representation for SlabDocument {
    const KIND: &'static str = "SlabDocument";

    fn from_core(core: DocumentCore) -> Self {
        Self {
            fields: SlabFields::new(core),
        }
    }

    fn core(&self) -> &DocumentCore {
        &self.fields.core
    }

    fn core_mut(&mut self) -> &mut DocumentCore {
        &mut self.fields.core
    }

    fn natural_identity(&self) -> Option<String> {
        Some(self.document_id())
    }

    fn labeled_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Document ID", self.document_id()),
            ("Title", self.title()),
            ("Type", self.doc_type()),
            ("Owner", self.owner()),
            ("Contributors", self.contributors()),
            ("Topics", self.topics()),
        ]
    }
}

/// One chunk of a Slab page.
///
/// Chunks of the same page share `document_id`, so each chunk carries its
/// own identity: the explicit one it was built with, or a fresh UUID v4
/// assigned at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabChunkDocument {
    fields: SlabFields,
}

impl SlabChunkDocument {
    pub fn fields(&self) -> &SlabFields {
        &self.fields
    }

    pub fn chunk_id(&self) -> String {
        self.fields
            .core
            .explicit_identity()
            .unwrap_or_default()
            .to_string()
    }

    /// Owning page; falls back to `document_id` for chunks exported
    /// without an explicit parent reference.
    pub fn parent_document_id(&self) -> String {
        self.fields
            .core
            .get_str_or("parent_document_id", &self.fields.document_id())
    }

    pub fn chunk_index(&self) -> Option<i64> {
        self.fields.core.get("chunk_index").and_then(|v| v.as_i64())
    }

    pub fn title(&self) -> String {
        self.fields.title()
    }

    pub fn owner(&self) -> String {
        self.fields.owner()
    }

    pub fn contributors(&self) -> String {
        self.fields.contributors()
    }

    pub fn topics(&self) -> String {
        self.fields.topics()
    }

    pub fn doc_type(&self) -> String {
        self.fields.doc_type_or("slab_chunk")
    }
}

impl Representation for SlabChunkDocument {
    const KIND: &'static str = "SlabChunkDocument";

    fn from_core(mut core: DocumentCore) -> Self {
        if core.explicit_identity().is_none() {
            core.set_identity(Uuid::new_v4().to_string());
        }
        Self {
            fields: SlabFields::new(core),
        }
    }

    fn core(&self) -> &DocumentCore {
        &self.fields.core
    }

    fn core_mut(&mut self) -> &mut DocumentCore {
        &mut self.fields.core
    }

    fn labeled_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Chunk ID", self.chunk_id()),
            ("Parent Document ID", self.parent_document_id()),
            ("Title", self.title()),
            ("Type", self.doc_type()),
            ("Owner", self.owner()),
            ("Contributors", self.contributors()),
            ("Topics", self.topics()),
        ]
    }
}
