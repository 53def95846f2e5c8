//! Sync configuration with TOML file support.

use serde::{Deserialize, Serialize};

use crate::SyncError;

/// Configuration for the sync orchestrator.
///
/// Can be loaded from a TOML file via [`SyncConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Transactions requested per history page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Upper bound on pagination iterations per account, guarding against
    /// a provider that never returns an empty cursor.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Feature gate for the rebase-history backfill.
    #[serde(default)]
    pub enable_rebase_history: bool,

    /// Base URL of the indexer endpoint the HTTP adapters talk to.
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_page_size() -> usize {
    100
}

fn default_max_pages() -> usize {
    1000
}

fn default_endpoint_url() -> String {
    "http://127.0.0.1:8332".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl SyncConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, SyncError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SyncError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SyncError> {
        toml::from_str(s).map_err(|e| SyncError::Config(e.to_string()))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            enable_rebase_history: false,
            endpoint_url: default_endpoint_url(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
