//! In-memory [`DocumentStore`] implementation for tests and embedding.
//!
//! Uses a `HashMap` keyed by `(store_name, identity)` behind
//! `std::sync::RwLock`. Keyword search counts how many query terms occur
//! (case-insensitively) in each document's text; there is no index.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::document::DocumentRecord;

use super::{DocumentStore, ScoredRecord, StoreError, PARENT_ATTRIBUTE};

type Key = (String, String);

/// In-memory store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<Key, DocumentRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents held in `store_name`.
    pub fn len(&self, store_name: &str) -> usize {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .filter(|(store, _)| store == store_name)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn upsert_record(
        &self,
        store_name: &str,
        record: &DocumentRecord,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        records.insert(
            (store_name.to_string(), record.identity.clone()),
            record.clone(),
        );
        Ok(())
    }

    async fn load_record(
        &self,
        store_name: &str,
        identity: &str,
    ) -> Result<Option<DocumentRecord>, StoreError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records
            .get(&(store_name.to_string(), identity.to_string()))
            .cloned())
    }

    async fn delete_document(&self, store_name: &str, identity: &str) -> Result<bool, StoreError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        Ok(records
            .remove(&(store_name.to_string(), identity.to_string()))
            .is_some())
    }

    async fn delete_children(
        &self,
        store_name: &str,
        parent_id: &str,
    ) -> Result<usize, StoreError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        let before = records.len();
        records.retain(|(store, _), record| {
            store != store_name
                || record.attributes.get(PARENT_ATTRIBUTE).and_then(|v| v.as_str())
                    != Some(parent_id)
        });
        Ok(before - records.len())
    }

    async fn keyword_search(
        &self,
        store_name: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>, StoreError> {
        let query_lower = query.to_lowercase();
        let terms: Vec<&str> = query_lower.split_whitespace().collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        let mut hits: Vec<ScoredRecord> = records
            .iter()
            .filter(|((store, _), _)| store == store_name)
            .filter_map(|(_, record)| {
                let text_lower = record.text.to_lowercase();
                let matches = terms.iter().filter(|t| text_lower.contains(*t)).count();
                (matches > 0).then(|| ScoredRecord {
                    record: record.clone(),
                    score: matches as f64,
                })
            })
            .collect();
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.record.identity.cmp(&b.record.identity))
        });
        hits.truncate(limit);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Attributes, Document, DocumentCore, Representation};
    use crate::registry::DocumentRegistry;
    use crate::store::StoreReport;
    use crate::types::{JiraDocument, SlackMessageDocument};
    use serde_json::{json, Value};

    fn attrs(value: Value) -> Option<Attributes> {
        value.as_object().cloned()
    }

    fn issue(key: &str, text: &str) -> Box<dyn Document> {
        Box::new(JiraDocument::from_core(DocumentCore::new(
            text,
            attrs(json!({"key": key, "status_name": "Open"})),
        )))
    }

    fn stores(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_upsert_and_load_round_trip() {
        let store = InMemoryStore::new();
        let registry = DocumentRegistry::with_builtins();
        store
            .upsert_document("jira_issues", issue("PROJ-1", "Login fails").as_ref())
            .await
            .unwrap();

        let loaded = store
            .load_document("jira_issues", "PROJ-1", &registry)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.kind(), "JiraDocument");
        assert_eq!(loaded.identity(), "PROJ-1");
        assert_eq!(loaded.text(), "Login fails");
        assert_eq!(loaded.attribute_str("status_name"), "Open");
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_identity() {
        let store = InMemoryStore::new();
        store
            .upsert_document("jira_issues", issue("PROJ-1", "old").as_ref())
            .await
            .unwrap();
        store
            .upsert_document("jira_issues", issue("PROJ-1", "new").as_ref())
            .await
            .unwrap();
        assert_eq!(store.len("jira_issues"), 1);
        let record = store.load_record("jira_issues", "PROJ-1").await.unwrap().unwrap();
        assert_eq!(record.text, "new");
    }

    #[tokio::test]
    async fn test_unknown_identity_rejected() {
        let store = InMemoryStore::new();
        let doc = SlackMessageDocument::from_core(DocumentCore::new("hi", None));
        let err = store.upsert_document("slack_messages", &doc).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingIdentity { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_batch_report_counts_failures() {
        let store = InMemoryStore::new();
        let docs: Vec<Box<dyn Document>> = vec![
            issue("PROJ-1", "a"),
            Box::new(JiraDocument::from_core(DocumentCore::new("no key", None))),
            issue("PROJ-2", "b"),
        ];
        let report = store.upsert_documents("jira_issues", &docs).await;
        assert_eq!(report, StoreReport { success: 2, failed: 1 });
        assert_eq!(store.len("jira_issues"), 2);
    }

    #[tokio::test]
    async fn test_delete_document() {
        let store = InMemoryStore::new();
        store
            .upsert_document("jira_issues", issue("PROJ-1", "a").as_ref())
            .await
            .unwrap();
        assert!(store.delete_document("jira_issues", "PROJ-1").await.unwrap());
        assert!(!store.delete_document("jira_issues", "PROJ-1").await.unwrap());
        assert!(store.load_record("jira_issues", "PROJ-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_children_only_touches_matching_parent() {
        let store = InMemoryStore::new();
        let chunk = |id: &str, parent: &str| DocumentRecord {
            identity: id.to_string(),
            text: "chunk".to_string(),
            attributes: attrs(json!({"parent_document_id": parent})).unwrap_or_default(),
            kind: "SlabChunkDocument".to_string(),
            relevance_score: None,
        };
        for (id, parent) in [("s1_0", "s1"), ("s1_1", "s1"), ("s2_0", "s2")] {
            store
                .upsert_record("slab_document_chunks", &chunk(id, parent))
                .await
                .unwrap();
        }
        store
            .upsert_record("other_chunks", &chunk("s1_0", "s1"))
            .await
            .unwrap();

        assert_eq!(store.delete_children("slab_document_chunks", "s1").await.unwrap(), 2);
        assert_eq!(store.len("slab_document_chunks"), 1);
        assert_eq!(store.len("other_chunks"), 1);
        assert_eq!(store.delete_children("slab_document_chunks", "s1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stores_are_isolated() {
        let store = InMemoryStore::new();
        store
            .upsert_document("jira_issues", issue("PROJ-1", "deploy").as_ref())
            .await
            .unwrap();
        assert!(store.load_record("email_messages", "PROJ-1").await.unwrap().is_none());
        let hits = store.keyword_search("email_messages", "deploy", 10).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_scores_and_orders() {
        let store = InMemoryStore::new();
        let registry = DocumentRegistry::with_builtins();
        for (key, text) in [
            ("PROJ-1", "deploy pipeline broken"),
            ("PROJ-2", "deploy docs"),
            ("PROJ-3", "unrelated"),
            ("PROJ-0", "pipeline deploy retry"),
        ] {
            store
                .upsert_document("jira_issues", issue(key, text).as_ref())
                .await
                .unwrap();
        }

        let results = store
            .search("deploy pipeline", &stores(&["jira_issues"]), 10, &registry)
            .await
            .unwrap();
        let ids: Vec<String> = results.iter().map(|d| d.identity()).collect();
        assert_eq!(ids, vec!["PROJ-0", "PROJ-1", "PROJ-2"]);
        assert_eq!(results[0].relevance_score(), Some(2.0));
        assert_eq!(results[2].relevance_score(), Some(1.0));
    }

    #[tokio::test]
    async fn test_search_merges_stores_and_truncates() {
        let store = InMemoryStore::new();
        let registry = DocumentRegistry::with_builtins();
        store
            .upsert_document("jira_issues", issue("PROJ-1", "db outage").as_ref())
            .await
            .unwrap();
        let msg = SlackMessageDocument::from_core(DocumentCore::new(
            "outage outage",
            attrs(json!({"channel": "C1", "ts": "1700000000.1"})),
        ));
        store.upsert_document("slack_messages", &msg).await.unwrap();

        let results = store
            .search(
                "outage db",
                &stores(&["jira_issues", "slack_messages"]),
                1,
                &registry,
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind(), "JiraDocument");
    }

    #[tokio::test]
    async fn test_search_dedups_by_kind_and_identity() {
        let store = InMemoryStore::new();
        let registry = DocumentRegistry::with_builtins();
        store
            .upsert_document("jira_issues", issue("PROJ-1", "cache miss").as_ref())
            .await
            .unwrap();
        registry.register_type::<JiraDocument>("jira_archive");
        store
            .upsert_document("jira_archive", issue("PROJ-1", "cache").as_ref())
            .await
            .unwrap();

        let results = store
            .search(
                "cache miss",
                &stores(&["jira_archive", "jira_issues"]),
                10,
                &registry,
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].relevance_score(), Some(2.0));
        assert_eq!(results[0].text(), "cache miss");
    }

    #[tokio::test]
    async fn test_blank_query_returns_nothing() {
        let store = InMemoryStore::new();
        let registry = DocumentRegistry::with_builtins();
        store
            .upsert_document("jira_issues", issue("PROJ-1", "anything").as_ref())
            .await
            .unwrap();
        let results = store
            .search("   ", &stores(&["jira_issues"]), 10, &registry)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_loaded_kind_follows_current_registration() {
        let store = InMemoryStore::new();
        let registry = DocumentRegistry::with_builtins();
        store
            .upsert_document("custom_store", issue("PROJ-7", "x").as_ref())
            .await
            .unwrap();
        let loaded = store
            .load_document("custom_store", "PROJ-7", &registry)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.kind(), "Document");
        assert_eq!(loaded.identity(), "PROJ-7");
    }
}
