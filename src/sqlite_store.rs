//! SQLite-backed [`DocumentStore`] implementation.
//!
//! Documents live in the `documents` table keyed by
//! `(store_name, identity)`; their text is mirrored into the
//! `documents_fts` FTS5 table for keyword search. Scores are negated BM25
//! ranks, so higher is better.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use docharvest_core::document::{Attributes, DocumentRecord};
use docharvest_core::store::{DocumentStore, ScoredRecord, StoreError, PARENT_ATTRIBUTE};

/// SQLite implementation of [`DocumentStore`].
///
/// Expects the schema created by [`crate::migrate`].
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Document count per store name, ordered by name.
    pub async fn counts(&self) -> Result<Vec<(String, i64)>, StoreError> {
        let rows = sqlx::query(
            "SELECT store_name, COUNT(*) AS n FROM documents GROUP BY store_name ORDER BY store_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows
            .iter()
            .map(|row| (row.get("store_name"), row.get("n")))
            .collect())
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// Turn free text into an FTS5 expression: each alphanumeric term is
/// quoted and the terms are OR-ed. Returns `None` when nothing is left.
pub fn fts_query(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| format!("\"{}\"", t))
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn upsert_record(
        &self,
        store_name: &str,
        record: &DocumentRecord,
    ) -> Result<(), StoreError> {
        let attributes_json =
            serde_json::to_string(&record.attributes).map_err(|e| StoreError::Backend(e.to_string()))?;
        let now = chrono::Utc::now().timestamp();

        let mut tx = self.pool.begin().await.map_err(backend)?;

        sqlx::query(
            r#"
            INSERT INTO documents (store_name, identity, kind, text, attributes_json, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(store_name, identity) DO UPDATE SET
                kind = excluded.kind,
                text = excluded.text,
                attributes_json = excluded.attributes_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(store_name)
        .bind(&record.identity)
        .bind(&record.kind)
        .bind(&record.text)
        .bind(&attributes_json)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        sqlx::query("DELETE FROM documents_fts WHERE store_name = ? AND identity = ?")
            .bind(store_name)
            .bind(&record.identity)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        sqlx::query("INSERT INTO documents_fts (store_name, identity, text) VALUES (?, ?, ?)")
            .bind(store_name)
            .bind(&record.identity)
            .bind(&record.text)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        tx.commit().await.map_err(backend)?;
        Ok(())
    }

    async fn load_record(
        &self,
        store_name: &str,
        identity: &str,
    ) -> Result<Option<DocumentRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT identity, kind, text, attributes_json FROM documents WHERE store_name = ? AND identity = ?",
        )
        .bind(store_name)
        .bind(identity)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(|r| record_from_row(&r)))
    }

    async fn delete_document(&self, store_name: &str, identity: &str) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        sqlx::query("DELETE FROM documents_fts WHERE store_name = ? AND identity = ?")
            .bind(store_name)
            .bind(identity)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        let result = sqlx::query("DELETE FROM documents WHERE store_name = ? AND identity = ?")
            .bind(store_name)
            .bind(identity)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        tx.commit().await.map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_children(
        &self,
        store_name: &str,
        parent_id: &str,
    ) -> Result<usize, StoreError> {
        let path = format!("$.{}", PARENT_ATTRIBUTE);
        let mut tx = self.pool.begin().await.map_err(backend)?;

        sqlx::query(
            r#"
            DELETE FROM documents_fts
            WHERE store_name = ?
              AND identity IN (
                SELECT identity FROM documents
                WHERE store_name = ? AND json_extract(attributes_json, ?) = ?
              )
            "#,
        )
        .bind(store_name)
        .bind(store_name)
        .bind(&path)
        .bind(parent_id)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        let result = sqlx::query(
            "DELETE FROM documents WHERE store_name = ? AND json_extract(attributes_json, ?) = ?",
        )
        .bind(store_name)
        .bind(&path)
        .bind(parent_id)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)?;
        Ok(result.rows_affected() as usize)
    }

    async fn keyword_search(
        &self,
        store_name: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>, StoreError> {
        let Some(fts) = fts_query(query) else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(
            r#"
            SELECT d.identity, d.kind, d.text, d.attributes_json, documents_fts.rank AS rank
            FROM documents_fts
            JOIN documents d
              ON d.store_name = documents_fts.store_name
             AND d.identity = documents_fts.identity
            WHERE documents_fts MATCH ?
              AND documents_fts.store_name = ?
            ORDER BY rank
            LIMIT ?
            "#,
        )
        .bind(&fts)
        .bind(store_name)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows
            .iter()
            .map(|row| {
                let rank: f64 = row.get("rank");
                ScoredRecord {
                    record: record_from_row(row),
                    score: -rank,
                }
            })
            .collect())
    }
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> DocumentRecord {
    let attributes_json: String = row.get("attributes_json");
    let attributes: Attributes = serde_json::from_str(&attributes_json).unwrap_or_default();
    DocumentRecord {
        identity: row.get("identity"),
        text: row.get("text"),
        attributes,
        kind: row.get("kind"),
        relevance_score: None,
    }
}
