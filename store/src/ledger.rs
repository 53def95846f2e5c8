//! The normalized ledger container.
//!
//! Four parallel structures per entity kind (transactions, rebases):
//!
//! - `by_id`: composite key → record
//! - `ids`: composite keys ordered newest-block-time-first (the canonical
//!   ordering exposed to consumers)
//! - `by_asset_id`: asset → ordered subsequence of `ids`
//! - `by_account_id`: account → ordered subsequence of `ids`
//!
//! Buckets are order-preserving filtered views of `ids`, never re-sorted
//! independently. All operations are synchronous and total: malformed
//! input such as a transaction with zero transfers is accepted and simply
//! contributes an empty asset-relation set.

use std::collections::HashMap;

use txledger_types::{AccountId, AssetId, BlockTime, RebaseEntry, SyncStatus, Transaction};

use crate::identity::{rebase_key, related_asset_ids, tx_key, RebaseKey, TxKey};
use crate::index::add_to_index;

/// Normalized transaction records and their secondary indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TxRecords {
    by_id: HashMap<TxKey, Transaction>,
    ids: Vec<TxKey>,
    by_asset_id: HashMap<AssetId, Vec<TxKey>>,
    by_account_id: HashMap<AccountId, Vec<TxKey>>,
}

/// Normalized rebase records and their secondary indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RebaseRecords {
    by_id: HashMap<RebaseKey, RebaseEntry>,
    ids: Vec<RebaseKey>,
    by_asset_id: HashMap<AssetId, Vec<RebaseKey>>,
    by_account_id: HashMap<AccountId, Vec<RebaseKey>>,
}

/// The in-memory transaction & rebase ledger.
///
/// Construct with `LedgerStore::default()`; the initial and post-[`clear`]
/// states are the same value.
///
/// [`clear`]: LedgerStore::clear
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LedgerStore {
    txs: TxRecords,
    rebases: RebaseRecords,
    status: SyncStatus,
}

/// Sort rank for the descending-block-time ordering. Pending transactions
/// (no block time yet) rank as newest.
fn rank(block_time: Option<BlockTime>) -> u64 {
    block_time.map_or(u64::MAX, |t| t.as_secs())
}

/// Position in `ids` at which a record with `block_time` belongs:
/// descending block time, ties broken first-seen-wins (the new key goes
/// after existing equals).
fn ordered_insert_position(ids: &[TxKey], by_id: &HashMap<TxKey, Transaction>, block_time: Option<BlockTime>) -> usize {
    let new_rank = rank(block_time);
    ids.partition_point(|existing| {
        by_id
            .get(existing)
            .map_or(u64::MAX, |tx| rank(tx.block_time))
            >= new_rank
    })
}

fn rebase_insert_position(
    ids: &[RebaseKey],
    by_id: &HashMap<RebaseKey, RebaseEntry>,
    block_time: BlockTime,
) -> usize {
    let new_rank = block_time.as_secs();
    ids.partition_point(|existing| {
        by_id
            .get(existing)
            .map_or(u64::MAX, |r| r.block_time.as_secs())
            >= new_rank
    })
}

impl LedgerStore {
    // ── Mutations ──────────────────────────────────────────────────────

    /// Insert a new transaction record, or replace the value of an
    /// existing one with the same composite key.
    ///
    /// On update the record keeps its position in `ids` even if its block
    /// time changed on confirmation — positional stability is deliberate;
    /// downstream consumers may depend on it.
    pub fn upsert_one(&mut self, tx: Transaction, account_id: &AccountId) {
        let key = tx_key(&tx, account_id);
        let assets = related_asset_ids(&tx);

        if !self.txs.by_id.contains_key(&key) {
            let pos = ordered_insert_position(&self.txs.ids, &self.txs.by_id, tx.block_time);
            self.txs.ids.insert(pos, key.clone());
        }
        self.txs.by_id.insert(key.clone(), tx);

        for asset in assets {
            let bucket = self.txs.by_asset_id.entry(asset).or_default();
            add_to_index(&self.txs.ids, bucket, &key);
        }
        let bucket = self.txs.by_account_id.entry(account_id.clone()).or_default();
        add_to_index(&self.txs.ids, bucket, &key);
    }

    /// Apply [`upsert_one`] for each transaction, in order.
    ///
    /// [`upsert_one`]: LedgerStore::upsert_one
    pub fn upsert_many(&mut self, txs: Vec<Transaction>, account_id: &AccountId) {
        for tx in txs {
            self.upsert_one(tx, account_id);
        }
    }

    /// Insert or update rebase records for one asset under one account.
    pub fn upsert_rebase(
        &mut self,
        account_id: &AccountId,
        asset_id: &AssetId,
        entries: Vec<RebaseEntry>,
    ) {
        for entry in entries {
            let key = rebase_key(account_id, asset_id, entry.block_time);

            if !self.rebases.by_id.contains_key(&key) {
                let pos =
                    rebase_insert_position(&self.rebases.ids, &self.rebases.by_id, entry.block_time);
                self.rebases.ids.insert(pos, key.clone());
            }
            self.rebases.by_id.insert(key.clone(), entry);

            let bucket = self.rebases.by_asset_id.entry(asset_id.clone()).or_default();
            add_to_index(&self.rebases.ids, bucket, &key);
            let bucket = self
                .rebases
                .by_account_id
                .entry(account_id.clone())
                .or_default();
            add_to_index(&self.rebases.ids, bucket, &key);
        }
    }

    /// Set the overall sync status. Pure transition, no effect on data.
    pub fn set_status(&mut self, status: SyncStatus) {
        self.status = status;
    }

    /// Reset to the empty initial state (e.g. on wallet disconnect).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // ── Selectors ──────────────────────────────────────────────────────

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    /// Record by composite key.
    pub fn tx(&self, key: &TxKey) -> Option<&Transaction> {
        self.txs.by_id.get(key)
    }

    /// All transaction keys, newest block time first.
    pub fn tx_ids(&self) -> &[TxKey] {
        &self.txs.ids
    }

    /// Transaction keys related to an asset, newest first.
    pub fn tx_ids_by_asset(&self, asset_id: &AssetId) -> &[TxKey] {
        self.txs
            .by_asset_id
            .get(asset_id)
            .map_or(&[], Vec::as_slice)
    }

    /// Transaction keys belonging to an account, newest first.
    pub fn tx_ids_by_account(&self, account_id: &AccountId) -> &[TxKey] {
        self.txs
            .by_account_id
            .get(account_id)
            .map_or(&[], Vec::as_slice)
    }

    pub fn rebase(&self, key: &RebaseKey) -> Option<&RebaseEntry> {
        self.rebases.by_id.get(key)
    }

    pub fn rebase_ids(&self) -> &[RebaseKey] {
        &self.rebases.ids
    }

    pub fn rebase_ids_by_asset(&self, asset_id: &AssetId) -> &[RebaseKey] {
        self.rebases
            .by_asset_id
            .get(asset_id)
            .map_or(&[], Vec::as_slice)
    }

    pub fn rebase_ids_by_account(&self, account_id: &AccountId) -> &[RebaseKey] {
        self.rebases
            .by_account_id
            .get(account_id)
            .map_or(&[], Vec::as_slice)
    }

    /// Summary counts across the ledger.
    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            transactions: self.txs.by_id.len(),
            rebases: self.rebases.by_id.len(),
            assets: self.txs.by_asset_id.len(),
            accounts: self.txs.by_account_id.len(),
        }
    }
}

/// Summary statistics for the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerSummary {
    pub transactions: usize,
    pub rebases: usize,
    pub assets: usize,
    pub accounts: usize,
}
