//! `dh search`: keyword search across stores.

use std::collections::BTreeSet;

use anyhow::Result;

use docharvest_core::document::Document;
use docharvest_core::registry::DocumentRegistry;
use docharvest_core::store::DocumentStore;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;

const EXCERPT_CHARS: usize = 160;

/// Search `store_names` and return the merged hits.
///
/// With no names given, every registered store is searched along with any
/// store that holds documents, so records ingested under an unregistered
/// name are still found.
pub async fn search_documents(
    store: &SqliteStore,
    registry: &DocumentRegistry,
    query: &str,
    store_names: &[String],
    top_k: usize,
) -> Result<Vec<Box<dyn Document>>> {
    let all_stores: Vec<String>;
    let names = if store_names.is_empty() {
        let mut known: BTreeSet<String> = registry.list_registered().into_keys().collect();
        known.extend(store.counts().await?.into_iter().map(|(name, _)| name));
        all_stores = known.into_iter().collect();
        &all_stores
    } else {
        store_names
    };
    Ok(store.search(query, names, top_k, registry).await?)
}

pub fn excerpt(text: &str) -> String {
    let flat = text.replace('\n', " ");
    let trimmed = flat.trim();
    if trimmed.chars().count() > EXCERPT_CHARS {
        let cut: String = trimmed.chars().take(EXCERPT_CHARS).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}

/// CLI entry point.
pub async fn run_search(
    config: &Config,
    query: &str,
    store_names: &[String],
    limit: Option<usize>,
) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);
    let registry = DocumentRegistry::with_builtins();
    let top_k = limit.unwrap_or(config.search.top_k);

    let results = search_documents(&store, &registry, query, store_names, top_k).await?;
    store.pool().close().await;

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, doc) in results.iter().enumerate() {
        println!(
            "{}. [{:.2}] {} / {}",
            i + 1,
            doc.relevance_score().unwrap_or_default(),
            doc.kind(),
            doc.identity()
        );
        println!("    excerpt: \"{}\"", excerpt(doc.text()));
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate;
    use docharvest_core::document::{DocumentCore, Representation};
    use docharvest_core::types::JiraDocument;
    use serde_json::json;
    use tempfile::TempDir;

    async fn open_store(tmp: &TempDir) -> SqliteStore {
        let pool = db::connect_path(&tmp.path().join("dh.sqlite")).await.unwrap();
        migrate::migrate_pool(&pool).await.unwrap();
        SqliteStore::new(pool)
    }

    #[tokio::test]
    async fn test_default_search_covers_unregistered_stores() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp).await;
        let registry = DocumentRegistry::with_builtins();

        let page = JiraDocument::from_core(
            DocumentCore::new("quarterly roadmap", json!({}).as_object().cloned())
                .with_identity("LEGACY-9"),
        );
        store.upsert_document("notion_pages", &page).await.unwrap();
        let issue = JiraDocument::from_core(DocumentCore::new(
            "roadmap review",
            json!({"key": "PROJ-1"}).as_object().cloned(),
        ));
        store.upsert_document("jira_issues", &issue).await.unwrap();

        let hits = search_documents(&store, &registry, "roadmap", &[], 10)
            .await
            .unwrap();
        let mut found: Vec<(&str, String)> =
            hits.iter().map(|d| (d.kind(), d.identity())).collect();
        found.sort();
        assert_eq!(
            found,
            vec![
                ("Document", "LEGACY-9".to_string()),
                ("JiraDocument", "PROJ-1".to_string()),
            ]
        );

        let only_jira = search_documents(
            &store,
            &registry,
            "roadmap",
            &["jira_issues".to_string()],
            10,
        )
        .await
        .unwrap();
        assert_eq!(only_jira.len(), 1);
    }

    #[test]
    fn test_excerpt_flattens_and_truncates() {
        assert_eq!(excerpt("  a\nb  "), "a b");
        let long = "x".repeat(200);
        let e = excerpt(&long);
        assert!(e.ends_with("..."));
        assert_eq!(e.chars().count(), EXCERPT_CHARS + 3);
    }
}
