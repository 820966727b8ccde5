//! `tracing` subscriber setup for the `dh` binary.
//!
//! `RUST_LOG` wins when set; otherwise the `[logging].level` from config
//! applies to both crates. Output goes to stderr so stdout stays clean
//! for command output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(level: &str) -> String {
    format!("docharvest={level},docharvest_core={level},sqlx=warn")
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(level)));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
