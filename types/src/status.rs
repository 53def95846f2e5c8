//! Overall sync status of the ledger.

use serde::{Deserialize, Serialize};

/// Where the ledger is in its sync lifecycle.
///
/// - `Idle` before any backfill has started (e.g. wallet not connected)
/// - `Loading` once a backfill is in flight
/// - `Loaded` after a backfill completes — "attempted", not "error-free";
///   a loaded-but-empty account is a legitimate terminal state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
}
