//! # docharvest core
//!
//! Runtime-free building blocks for docharvest: the document model,
//! per-source representations, the store-name → representation registry,
//! the exporter record factory, Slab chunking, and the store abstraction.
//!
//! This crate contains no tokio, sqlx, or filesystem I/O. The `dh`
//! binary in the root package wires it to SQLite and the command line.
//!
//! ```
//! use docharvest_core::document::Document;
//! use docharvest_core::factory::{from_external_record, ExternalRecord};
//! use docharvest_core::registry::DocumentRegistry;
//! use serde_json::json;
//!
//! let registry = DocumentRegistry::with_builtins();
//! let record = ExternalRecord::from_json(&json!({
//!     "text": "Fix bug",
//!     "metadata": {"key": "PROJ-1", "status_name": "Open"}
//! }));
//! let doc = from_external_record(&registry, record, "jira_issues");
//! assert_eq!(doc.kind(), "JiraDocument");
//! assert_eq!(doc.identity(), "PROJ-1");
//! ```

pub mod chunk;
pub mod document;
pub mod factory;
pub mod registry;
pub mod store;
pub mod stores;
pub mod types;
