//! `dh get` and `dh delete`: single-document access by store and identity.

use anyhow::{bail, Result};

use docharvest_core::document::Document;
use docharvest_core::registry::DocumentRegistry;
use docharvest_core::store::DocumentStore;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;

/// Load a document, failing when it does not exist.
pub async fn get_document(
    store: &SqliteStore,
    registry: &DocumentRegistry,
    store_name: &str,
    identity: &str,
) -> Result<Box<dyn Document>> {
    match store.load_document(store_name, identity, registry).await? {
        Some(doc) => Ok(doc),
        None => bail!("document not found: {}/{}", store_name, identity),
    }
}

/// CLI entry point: print the document's description block.
pub async fn run_get(config: &Config, store_name: &str, identity: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);
    let registry = DocumentRegistry::with_builtins();

    let doc = get_document(&store, &registry, store_name, identity).await;
    store.pool().close().await;

    println!("{}", doc?.describe());
    Ok(())
}

/// CLI entry point: delete one document.
pub async fn run_delete(config: &Config, store_name: &str, identity: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);

    let deleted = store.delete_document(store_name, identity).await;
    store.pool().close().await;

    if !deleted? {
        bail!("document not found: {}/{}", store_name, identity);
    }
    println!("deleted {}/{}", store_name, identity);
    Ok(())
}
