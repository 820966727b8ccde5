//! # docharvest
//!
//! Local store for SaaS exports. Exporter records (`{text, metadata, id?}`)
//! become typed documents through the registry in
//! [`docharvest_core`], are persisted in SQLite with an FTS5 index, and
//! can be searched or retrieved from the `dh` command line.
//!
//! ```text
//! ┌────────────┐   ┌─────────────────┐   ┌──────────────┐
//! │ JSONL from │──▶│ registry +      │──▶│ SQLite       │
//! │ exporters  │   │ representations │   │ docs + FTS5  │
//! └────────────┘   └─────────────────┘   └──────┬───────┘
//!                                               ▼
//!                                        ┌─────────────┐
//!                                        │ dh search / │
//!                                        │ get/delete  │
//!                                        └─────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite [`DocumentStore`](docharvest_core::store::DocumentStore) |
//! | [`ingest`] | JSONL ingestion with Slab chunking |
//! | [`search`] | Cross-store keyword search |
//! | [`get`] | Single-document retrieval and deletion |
//! | [`catalog`] | Registered types and store listing |

pub mod catalog;
pub mod config;
pub mod db;
pub mod get;
pub mod ingest;
pub mod logging;
pub mod migrate;
pub mod search;
pub mod sqlite_store;
