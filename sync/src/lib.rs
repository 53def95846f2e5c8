//! Sync orchestration for the transaction & rebase ledger.
//!
//! Coordinates two asynchronous ingestion pipelines against external data
//! providers: a cursor-paginated full-history backfill per account, and a
//! rebase-history fetch gated by asset holdings. Distinct accounts'
//! backfills and the rebase backfill are independent and may run fully in
//! parallel; the ledger's own write lock is the only shared mutable state.

pub mod cancel;
pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;

pub use cancel::{CancelController, CancelToken};
pub use config::SyncConfig;
pub use error::SyncError;
pub use orchestrator::SyncOrchestrator;

use std::sync::Arc;

use tokio::sync::RwLock;

use txledger_store::LedgerStore;

/// The ledger behind a single global write lock. Reads are snapshots;
/// every mutating store operation holds the write guard for its whole
/// duration, so no interleaved partial states are visible.
pub type SharedLedger = Arc<RwLock<LedgerStore>>;

/// Construct an empty shared ledger.
pub fn shared_ledger() -> SharedLedger {
    Arc::new(RwLock::new(LedgerStore::default()))
}
