//! Structured logging initialization via `tracing`.

use tracing_subscriber::EnvFilter;

use crate::config::SyncConfig;

/// Initialize the tracing subscriber from the sync configuration.
///
/// `RUST_LOG` overrides the configured level when set. An unrecognized
/// `log_format` falls back to the human-readable formatter.
pub fn init_tracing(config: &SyncConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
