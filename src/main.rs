//! # docharvest CLI (`dh`)
//!
//! Ingest exporter output into a local SQLite store, then search or
//! retrieve typed documents.
//!
//! ## Usage
//!
//! ```bash
//! dh --config ./config/dh.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dh init` | Create the SQLite database and run schema migrations |
//! | `dh types` | List store names and the document kind registered for each |
//! | `dh stores` | List known stores, their descriptions, and document counts |
//! | `dh ingest <store> <file>` | Ingest a JSON Lines export into a store |
//! | `dh search "<query>"` | Keyword search across stores |
//! | `dh get <store> <identity>` | Print a document's description block |
//! | `dh delete <store> <identity>` | Remove a document |
//!
//! ## Examples
//!
//! ```bash
//! dh init
//! dh ingest jira_issues ./exports/jira.jsonl
//! dh ingest slab_documents ./exports/slab.jsonl --dry-run
//! dh search "login timeout" --store jira_issues --store slack_messages
//! dh get jira_issues PROJ-123
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use docharvest::ingest::IngestOptions;
use docharvest::{catalog, config, get, ingest, logging, migrate, search};
use docharvest_core::registry::DocumentRegistry;

/// docharvest CLI: typed storage and search for SaaS exports.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/dh.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "dh",
    about = "docharvest: typed storage and search for SaaS exports",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/dh.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Safe to run repeatedly.
    Init,

    /// List store names and their registered document kinds.
    Types,

    /// List known stores with descriptions and document counts.
    Stores,

    /// Ingest a JSON Lines file of `{text, metadata, id?}` records.
    ///
    /// Each record becomes the document kind registered for the store.
    /// Pages ingested into `slab_documents` are also chunked into
    /// `slab_document_chunks` unless `[ingest].chunk_slab = false`.
    Ingest {
        /// Target store name (e.g. `jira_issues`).
        store: String,

        /// Path to the `.jsonl` export.
        file: PathBuf,

        /// Parse and count without writing to the database.
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of records to process.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Keyword search across stores.
    Search {
        /// The search query string.
        query: String,

        /// Restrict to these stores (repeatable). Defaults to every
        /// registered store plus any store holding documents.
        #[arg(long = "store")]
        stores: Vec<String>,

        /// Maximum number of results to return.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print a stored document.
    Get {
        store: String,
        identity: String,
    },

    /// Delete a stored document.
    Delete {
        store: String,
        identity: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Listing commands work without a config file
    if let Commands::Types | Commands::Stores = cli.command {
        let cfg = config::load_config(&cli.config).unwrap_or_else(|_| config::Config::minimal());
        logging::init(&cfg.logging.level);
        match cli.command {
            Commands::Types => catalog::list_types(&DocumentRegistry::with_builtins()),
            _ => catalog::list_stores(&cfg).await?,
        }
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;
    logging::init(&cfg.logging.level);

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Ingest {
            store,
            file,
            dry_run,
            limit,
        } => {
            ingest::run_ingest(&cfg, &store, &file, IngestOptions { dry_run, limit }).await?;
        }
        Commands::Search {
            query,
            stores,
            limit,
        } => {
            search::run_search(&cfg, &query, &stores, limit).await?;
        }
        Commands::Get { store, identity } => {
            get::run_get(&cfg, &store, &identity).await?;
        }
        Commands::Delete { store, identity } => {
            get::run_delete(&cfg, &store, &identity).await?;
        }
        Commands::Types | Commands::Stores => {}
    }

    Ok(())
}
