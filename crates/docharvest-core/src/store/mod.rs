//! Storage abstraction for docharvest.
//!
//! The [`DocumentStore`] trait persists serialized documents under a
//! store name and reconstructs them through a [`DocumentRegistry`], so the
//! concrete representation of a loaded document is always the one
//! registered for its store at load time.
//!
//! Implementations provide the record-level primitives; persistence of
//! typed documents, batch tallying, and cross-store search are provided
//! methods built on top of them.
//!
//! # Operations
//!
//! | Method | Purpose |
//! |--------|---------|
//! | [`upsert_record`](DocumentStore::upsert_record) | Insert or replace a serialized document |
//! | [`load_record`](DocumentStore::load_record) | Fetch a serialized document by identity |
//! | [`delete_document`](DocumentStore::delete_document) | Remove a document by identity |
//! | [`delete_children`](DocumentStore::delete_children) | Remove every document derived from a parent |
//! | [`keyword_search`](DocumentStore::keyword_search) | Full-text search within one store |
//! | [`upsert_document`](DocumentStore::upsert_document) | Serialize and persist one document |
//! | [`upsert_documents`](DocumentStore::upsert_documents) | Persist a batch, tallying failures |
//! | [`load_document`](DocumentStore::load_document) | Fetch and rebuild a typed document |
//! | [`search`](DocumentStore::search) | Merge keyword hits across stores |

pub mod memory;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::document::{Document, DocumentRecord, UNKNOWN_IDENTITY};

/// Attribute linking a derived document to the document it came from.
pub const PARENT_ATTRIBUTE: &str = "parent_document_id";
use crate::registry::DocumentRegistry;

/// Failure reported by a [`DocumentStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document in store `{store}` has no identity")]
    MissingIdentity { store: String },
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Outcome of a batch upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreReport {
    pub success: usize,
    pub failed: usize,
}

/// A stored record matched by a keyword search, with its raw score.
///
/// Higher is better; scores are only comparable within one backend.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: DocumentRecord,
    pub score: f64,
}

/// Abstract storage backend.
///
/// Records are keyed by `(store_name, identity)`; upserting an existing
/// key replaces it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert or replace a serialized document.
    async fn upsert_record(&self, store_name: &str, record: &DocumentRecord)
        -> Result<(), StoreError>;

    /// Fetch a serialized document by identity.
    async fn load_record(
        &self,
        store_name: &str,
        identity: &str,
    ) -> Result<Option<DocumentRecord>, StoreError>;

    /// Remove a document. Returns whether anything was deleted.
    async fn delete_document(&self, store_name: &str, identity: &str) -> Result<bool, StoreError>;

    /// Remove every document in `store_name` whose `parent_document_id`
    /// attribute equals `parent_id`. Returns how many were deleted.
    async fn delete_children(&self, store_name: &str, parent_id: &str)
        -> Result<usize, StoreError>;

    /// Keyword search within one store, best first, at most `limit` hits.
    async fn keyword_search(
        &self,
        store_name: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>, StoreError>;

    /// Serialize and persist one document under its resolved identity.
    ///
    /// Documents that resolve to the `"Unknown"` sentinel are rejected:
    /// they would all collapse onto one key.
    async fn upsert_document(
        &self,
        store_name: &str,
        doc: &dyn Document,
    ) -> Result<(), StoreError> {
        let record = doc.serialize();
        if record.identity.is_empty() || record.identity == UNKNOWN_IDENTITY {
            return Err(StoreError::MissingIdentity {
                store: store_name.to_string(),
            });
        }
        self.upsert_record(store_name, &record).await
    }

    /// Persist a batch. Failures are logged and counted, never fatal.
    async fn upsert_documents(
        &self,
        store_name: &str,
        docs: &[Box<dyn Document>],
    ) -> StoreReport {
        let mut report = StoreReport::default();
        for doc in docs {
            match self.upsert_document(store_name, doc.as_ref()).await {
                Ok(()) => report.success += 1,
                Err(e) => {
                    warn!(store = store_name, kind = doc.kind(), error = %e, "upsert failed");
                    report.failed += 1;
                }
            }
        }
        debug!(
            store = store_name,
            success = report.success,
            failed = report.failed,
            "batch upsert finished"
        );
        report
    }

    /// Fetch a document and rebuild it with the representation registered
    /// for `store_name`.
    async fn load_document(
        &self,
        store_name: &str,
        identity: &str,
        registry: &DocumentRegistry,
    ) -> Result<Option<Box<dyn Document>>, StoreError> {
        let record = self.load_record(store_name, identity).await?;
        Ok(record.map(|r| registry.create(r, store_name)))
    }

    /// Search several stores and merge the hits.
    ///
    /// 1. A blank query returns nothing.
    /// 2. Each store contributes up to `top_k` keyword hits.
    /// 3. Hits are rebuilt through `registry` and carry their score in
    ///    `relevance_score`.
    /// 4. Duplicates by `(kind, identity)` keep the highest score.
    /// 5. Results sort by descending score, then identity ascending, and
    ///    are truncated to `top_k`.
    async fn search(
        &self,
        query: &str,
        store_names: &[String],
        top_k: usize,
        registry: &DocumentRegistry,
    ) -> Result<Vec<Box<dyn Document>>, StoreError> {
        if query.trim().is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let mut best: HashMap<(&'static str, String), Box<dyn Document>> = HashMap::new();
        for store_name in store_names {
            for hit in self.keyword_search(store_name, query, top_k).await? {
                let mut doc = registry.create(hit.record, store_name);
                doc.set_relevance_score(Some(hit.score));
                let key = (doc.kind(), doc.identity());
                let keep = best
                    .get(&key)
                    .and_then(|existing| existing.relevance_score())
                    .map_or(true, |existing| hit.score > existing);
                if keep {
                    best.insert(key, doc);
                }
            }
        }

        let mut results: Vec<(String, Box<dyn Document>)> = best
            .into_iter()
            .map(|((_, identity), doc)| (identity, doc))
            .collect();
        results.sort_by(|(a_id, a), (b_id, b)| {
            let a_score = a.relevance_score().unwrap_or(f64::NEG_INFINITY);
            let b_score = b.relevance_score().unwrap_or(f64::NEG_INFINITY);
            b_score
                .partial_cmp(&a_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a_id.cmp(b_id))
        });
        results.truncate(top_k);

        Ok(results.into_iter().map(|(_, doc)| doc).collect())
    }
}
