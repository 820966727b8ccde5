//! Ingestion of exporter output.
//!
//! Reads a JSON Lines file of `{text, metadata, id?}` records, converts
//! each through the registry into the representation registered for the
//! target store, and upserts them in batches. Slab pages can additionally
//! be split into `slab_document_chunks`; a page's previous chunks are
//! removed before its new ones are queued.
//!
//! Malformed lines are logged and skipped; they never abort a run.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use docharvest_core::chunk::{chunk_parent_id, chunk_slab_document};
use docharvest_core::document::{Document, Representation};
use docharvest_core::factory::{from_external_record, ExternalRecord};
use docharvest_core::registry::DocumentRegistry;
use docharvest_core::store::{DocumentStore, StoreReport, PARENT_ATTRIBUTE};
use docharvest_core::stores::SLAB_DOCUMENT_CHUNKS;
use docharvest_core::types::SlabDocument;

use crate::config::{Config, IngestConfig};
use crate::db;
use crate::sqlite_store::SqliteStore;

/// Per-run switches from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    pub dry_run: bool,
    pub limit: Option<usize>,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub records: usize,
    pub skipped: usize,
    pub documents: StoreReport,
    pub chunks: StoreReport,
    /// Previously stored chunks removed before re-chunking their page.
    pub cleared_chunks: usize,
    /// Chunks a dry run would have written.
    pub estimated_chunks: usize,
}

/// Parse one JSON Lines entry.
pub fn parse_record(line: &str, strict: bool) -> Result<ExternalRecord> {
    let value: Value = serde_json::from_str(line).context("invalid JSON")?;
    if strict {
        Ok(ExternalRecord::from_json_strict(&value)?)
    } else {
        Ok(ExternalRecord::from_json(&value))
    }
}

struct Batch<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    store_name: &'a str,
    size: usize,
    pending: Vec<Box<dyn Document>>,
    report: StoreReport,
}

impl<'a, S: DocumentStore + ?Sized> Batch<'a, S> {
    fn new(store: &'a S, store_name: &'a str, size: usize) -> Self {
        Self {
            store,
            store_name,
            size,
            pending: Vec::with_capacity(size),
            report: StoreReport::default(),
        }
    }

    async fn push(&mut self, doc: Box<dyn Document>) {
        self.pending.push(doc);
        if self.pending.len() >= self.size {
            self.flush().await;
        }
    }

    /// Drop queued documents derived from `parent_id`.
    fn discard_children(&mut self, parent_id: &str) {
        self.pending
            .retain(|doc| doc.attribute_str(PARENT_ATTRIBUTE) != parent_id);
    }

    async fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let docs = std::mem::take(&mut self.pending);
        let report = self.store.upsert_documents(self.store_name, &docs).await;
        self.report.success += report.success;
        self.report.failed += report.failed;
    }
}

/// Ingest `path` into `store_name`.
pub async fn ingest_file<S: DocumentStore + ?Sized>(
    settings: &IngestConfig,
    store: &S,
    registry: &DocumentRegistry,
    store_name: &str,
    path: &Path,
    options: IngestOptions,
) -> Result<IngestSummary> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let chunk_pages = settings.chunk_slab
        && registry.class_for(store_name).kind() == SlabDocument::KIND;

    let mut summary = IngestSummary::default();
    let mut documents = Batch::new(store, store_name, settings.batch_size);
    let mut chunks = Batch::new(store, SLAB_DOCUMENT_CHUNKS, settings.batch_size);

    for (line_no, line) in reader.lines().enumerate() {
        if options.limit.is_some_and(|limit| summary.records >= limit) {
            break;
        }
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }

        let record = match parse_record(&line, settings.strict) {
            Ok(record) => record,
            Err(e) => {
                let reason = format!("{:#}", e);
                warn!(line = line_no + 1, error = %reason, "skipping malformed record");
                summary.skipped += 1;
                continue;
            }
        };
        summary.records += 1;

        let doc = from_external_record(registry, record, store_name);
        let (parent_id, chunk_records) = if chunk_pages {
            (
                chunk_parent_id(doc.as_ref()),
                chunk_slab_document(doc.as_ref(), settings.chunk_max_tokens),
            )
        } else {
            (String::new(), Vec::new())
        };

        if options.dry_run {
            summary.estimated_chunks += chunk_records.len();
            continue;
        }

        documents.push(doc).await;
        if !parent_id.is_empty() {
            chunks.discard_children(&parent_id);
            match store.delete_children(SLAB_DOCUMENT_CHUNKS, &parent_id).await {
                Ok(removed) => summary.cleared_chunks += removed,
                Err(e) => {
                    warn!(parent = %parent_id, error = %e, "failed to clear previous chunks")
                }
            }
        }
        for chunk in chunk_records {
            chunks
                .push(from_external_record(registry, chunk, SLAB_DOCUMENT_CHUNKS))
                .await;
        }
    }

    documents.flush().await;
    chunks.flush().await;
    summary.documents = documents.report;
    summary.chunks = chunks.report;

    info!(
        store = store_name,
        records = summary.records,
        skipped = summary.skipped,
        upserted = summary.documents.success,
        failed = summary.documents.failed,
        chunks = summary.chunks.success,
        cleared_chunks = summary.cleared_chunks,
        estimated_chunks = summary.estimated_chunks,
        dry_run = options.dry_run,
        "ingest finished"
    );
    Ok(summary)
}

/// CLI entry point.
pub async fn run_ingest(
    config: &Config,
    store_name: &str,
    path: &Path,
    options: IngestOptions,
) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);
    let registry = DocumentRegistry::with_builtins();

    let summary = ingest_file(&config.ingest, &store, &registry, store_name, path, options).await?;

    if options.dry_run {
        println!("ingest {} (dry-run)", store_name);
        println!("  records: {}", summary.records);
        println!("  skipped: {}", summary.skipped);
        println!("  estimated chunks: {}", summary.estimated_chunks);
    } else {
        println!("ingest {}", store_name);
        println!("  records: {}", summary.records);
        println!("  skipped: {}", summary.skipped);
        println!("  upserted documents: {}", summary.documents.success);
        println!("  failed documents: {}", summary.documents.failed);
        if summary.chunks != StoreReport::default() {
            println!("  chunks written: {}", summary.chunks.success);
            println!("  chunks failed: {}", summary.chunks.failed);
        }
        println!("ok");
    }

    store.pool().close().await;
    Ok(())
}
