//! Composite key derivation and asset-relation extraction.
//!
//! The same provider tx id can have multiple representations depending on
//! the owning account's perspective — a UTXO send has a send component plus
//! a receive component for the change, under the same txid. Records are
//! therefore keyed by a composite of account id, provider txid, and the
//! observed address, which is a total function of its inputs so that
//! re-ingesting the same event is idempotent.

use serde::{Deserialize, Serialize};
use std::fmt;

use txledger_types::{AccountId, AssetId, BlockTime, Transaction};

/// Composite key uniquely addressing one stored transaction record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxKey(String);

impl TxKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite key uniquely addressing one stored rebase record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RebaseKey(String);

impl RebaseKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RebaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derive the composite key for a transaction observed under an account.
pub fn tx_key(tx: &Transaction, account_id: &AccountId) -> TxKey {
    TxKey(format!("{}-{}-{}", account_id, tx.txid, tx.address))
}

/// Derive the composite key for a rebase event.
pub fn rebase_key(account_id: &AccountId, asset_id: &AssetId, block_time: BlockTime) -> RebaseKey {
    RebaseKey(format!("{}-{}-{}", account_id, asset_id, block_time.as_secs()))
}

/// All asset ids a transaction relates to: every transfer's asset plus the
/// fee asset if present, de-duplicated, first appearance order.
///
/// A trade of FOX for USDC paying an ETH fee relates to all three assets,
/// so the trade shows up under each of their buckets.
pub fn related_asset_ids(tx: &Transaction) -> Vec<AssetId> {
    let mut assets: Vec<AssetId> = Vec::new();
    for transfer in &tx.transfers {
        if !assets.contains(&transfer.asset_id) {
            assets.push(transfer.asset_id.clone());
        }
    }
    if let Some(fee) = &tx.fee {
        if !assets.contains(&fee.asset_id) {
            assets.push(fee.asset_id.clone());
        }
    }
    assets
}
