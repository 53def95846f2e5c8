//! Rebase event record.

use serde::{Deserialize, Serialize};

use crate::BlockTime;

/// One rebase event for a rebasing token: a balance adjustment that is not
/// driven by a transfer. Asset and account scoping is applied at upsert
/// time; the entry itself only carries what the rebase provider reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebaseEntry {
    pub block_time: BlockTime,
    /// Balance in base units before the rebase applied.
    pub balance_prior: String,
    /// Balance in base units after the rebase applied.
    pub balance_post: String,
}
