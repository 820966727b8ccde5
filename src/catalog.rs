//! `dh types` and `dh stores`: what the registry knows and what the
//! database holds.

use std::collections::HashMap;

use anyhow::Result;

use docharvest_core::registry::DocumentRegistry;
use docharvest_core::stores::{describe_store, ALL_STORES};

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;

/// Print every registered store name with its document kind.
pub fn list_types(registry: &DocumentRegistry) {
    println!("{:<26} KIND", "STORE");
    for (store_name, kind) in registry.list_registered() {
        println!("{:<26} {}", store_name, kind);
    }
}

/// Print the store vocabulary with descriptions and, when the database
/// exists, how many documents each store holds.
pub async fn list_stores(config: &Config) -> Result<()> {
    let counts: HashMap<String, i64> = if config.db.path.exists() {
        let pool = db::connect(config).await?;
        let store = SqliteStore::new(pool);
        let counts = store.counts().await?;
        store.pool().close().await;
        counts.into_iter().collect()
    } else {
        HashMap::new()
    };

    println!("{:<26} {:>6}  DESCRIPTION", "STORE", "DOCS");
    for descriptor in ALL_STORES {
        let n = counts.get(descriptor.name).copied().unwrap_or(0);
        println!("{:<26} {:>6}  {}", descriptor.name, n, descriptor.description);
    }

    let mut extra: Vec<_> = counts
        .iter()
        .filter(|(name, _)| describe_store(name).is_none())
        .collect();
    extra.sort();
    for (name, n) in extra {
        println!("{:<26} {:>6}  (unregistered)", name, n);
    }
    Ok(())
}
