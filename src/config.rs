//! TOML configuration for the `dh` binary.
//!
//! ```toml
//! [db]
//! path = "./data/dh.sqlite"
//!
//! [ingest]
//! strict = false
//! chunk_slab = true
//! chunk_max_tokens = 700
//! batch_size = 100
//!
//! [search]
//! top_k = 10
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Only `[db]` is required; every other section has defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    /// Reject malformed exporter records instead of coercing them.
    #[serde(default)]
    pub strict: bool,
    /// Also split `slab_documents` into `slab_document_chunks`.
    #[serde(default = "default_chunk_slab")]
    pub chunk_slab: bool,
    #[serde(default = "default_chunk_max_tokens")]
    pub chunk_max_tokens: usize,
    /// Documents per upsert batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            strict: false,
            chunk_slab: default_chunk_slab(),
            chunk_max_tokens: default_chunk_max_tokens(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_chunk_slab() -> bool {
    true
}
fn default_chunk_max_tokens() -> usize {
    700
}
fn default_batch_size() -> usize {
    100
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl Config {
    /// Defaults for commands that run without a config file.
    pub fn minimal() -> Self {
        Self {
            db: DbConfig {
                path: PathBuf::from("./data/dh.sqlite"),
            },
            ingest: IngestConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    if config.search.top_k < 1 {
        anyhow::bail!("search.top_k must be >= 1");
    }
    if config.ingest.chunk_max_tokens == 0 {
        anyhow::bail!("ingest.chunk_max_tokens must be > 0");
    }
    if config.ingest.batch_size == 0 {
        anyhow::bail!("ingest.batch_size must be > 0");
    }
    Ok(config)
}
