//! The sync orchestrator.
//!
//! Two independent, externally-triggered fetch flows per logical account:
//!
//! - **Full-history backfill**: cursor-paginated loop against the chain's
//!   history provider. Pages are accumulated and dispatched to the store
//!   as a single batched upsert, so index maintenance runs once instead of
//!   once per page — and a mid-pagination failure leaves the store
//!   untouched.
//! - **Rebase backfill**: gated by holdings of known rebasing tokens. Each
//!   matching contract address is fetched independently and upserted as it
//!   completes; a failure for one address never aborts its siblings.
//!
//! No two pages of the same account's backfill are ever in flight at once
//! (strict sequential dependency via the cursor); distinct accounts and
//! the rebase flow may run fully in parallel.

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use txledger_providers::{
    ChainAdapter, ChainResolver, HistoryProvider, RebaseProvider, RebasingAssets,
    TxHistoryRequest,
};
use txledger_types::{AccountSpecifier, AssetId, SyncStatus, Transaction};

use crate::cancel::CancelToken;
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::SharedLedger;

/// Coordinates backfills against an explicitly owned ledger instance.
pub struct SyncOrchestrator<R: ChainResolver> {
    resolver: R,
    ledger: SharedLedger,
    config: SyncConfig,
    rebasing_assets: RebasingAssets,
}

impl<R: ChainResolver> SyncOrchestrator<R> {
    pub fn new(
        resolver: R,
        ledger: SharedLedger,
        config: SyncConfig,
        rebasing_assets: RebasingAssets,
    ) -> Self {
        Self {
            resolver,
            ledger,
            config,
            rebasing_assets,
        }
    }

    /// The ledger this orchestrator feeds. Consumers read through this
    /// handle; a read guard is a consistent snapshot.
    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Parse a raw `chain:pubkey` specifier and run [`fetch_all_history`].
    ///
    /// A malformed specifier is rejected before any I/O or store mutation.
    ///
    /// [`fetch_all_history`]: SyncOrchestrator::fetch_all_history
    pub async fn fetch_all_history_raw(
        &self,
        raw_specifier: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<Transaction>, SyncError> {
        let specifier = AccountSpecifier::parse(raw_specifier)?;
        self.fetch_all_history(&specifier, cancel).await
    }

    /// Fetch an account's entire transaction history and upsert it as one
    /// batch. Returns the flattened transaction list; the authoritative
    /// effect is the store mutation.
    ///
    /// Any provider error mid-pagination, cancellation between pages, or
    /// exceeding the configured page ceiling fails the whole operation
    /// with the store unchanged.
    pub async fn fetch_all_history(
        &self,
        specifier: &AccountSpecifier,
        cancel: &CancelToken,
    ) -> Result<Vec<Transaction>, SyncError> {
        let adapter = self.resolver.resolve(specifier.chain_id())?;
        let provider = adapter.history_provider();
        let account_id = specifier.account_id();

        let mut txs: Vec<Transaction> = Vec::new();
        let mut cursor = String::new();
        let mut pages = 0usize;
        loop {
            if cancel.is_cancelled() {
                debug!(account = %account_id, pages, "history backfill cancelled");
                return Err(SyncError::Cancelled);
            }
            if pages >= self.config.max_pages {
                return Err(SyncError::PageLimitExceeded {
                    account: account_id,
                });
            }

            let page = provider
                .tx_history(&TxHistoryRequest {
                    cursor: cursor.clone(),
                    pubkey: specifier.pubkey().to_string(),
                    page_size: self.config.page_size,
                })
                .await?;
            pages += 1;

            cursor = page.cursor;
            txs.extend(page.transactions);
            if cursor.is_empty() {
                break;
            }
        }

        info!(account = %account_id, txs = txs.len(), pages, "fetched full tx history");
        self.ledger.write().await.upsert_many(txs.clone(), &account_id);
        Ok(txs)
    }

    /// Full-history backfill with status bookkeeping: `loading` while in
    /// flight, `loaded` on completion whether or not the fetch succeeded.
    /// Re-entrant calls are safe since upserts are idempotent.
    pub async fn sync_account(
        &self,
        specifier: &AccountSpecifier,
        cancel: &CancelToken,
    ) -> Result<Vec<Transaction>, SyncError> {
        self.ledger.write().await.set_status(SyncStatus::Loading);
        let result = self.fetch_all_history(specifier, cancel).await;
        // Loaded means "attempted", not "error-free"; loaded-but-empty is
        // a legitimate terminal state for an account.
        self.ledger.write().await.set_status(SyncStatus::Loaded);
        result
    }

    /// Fetch rebase history for every held rebasing token and upsert each
    /// asset's entries independently.
    ///
    /// No-op (empty result, no store mutation) when the feature gate is
    /// off, no held asset matches a known rebasing contract, or the
    /// specifier's chain differs from the token's home chain. Per-address
    /// failures are logged and skipped. Returns `(asset id, entry count)`
    /// per upserted asset.
    pub async fn fetch_rebase_history(
        &self,
        specifier: &AccountSpecifier,
        held_asset_ids: &[AssetId],
    ) -> Result<Vec<(AssetId, usize)>, SyncError> {
        if !self.config.enable_rebase_history {
            return Ok(Vec::new());
        }

        let matching = self.rebasing_assets.matching_held(held_asset_ids);
        if matching.is_empty() {
            return Ok(Vec::new());
        }

        // Rebasing tokens live on a single fixed chain each.
        let on_chain: Vec<_> = matching
            .into_iter()
            .filter(|asset| asset.chain_id == *specifier.chain_id())
            .collect();
        if on_chain.is_empty() {
            return Ok(Vec::new());
        }

        let adapter = self.resolver.resolve(specifier.chain_id())?;
        let provider = adapter.rebase_provider();
        let account_id = specifier.account_id();
        let owner = specifier.pubkey();

        let fetches = on_chain.into_iter().map(|asset| {
            let account_id = account_id.clone();
            async move {
                match provider.rebase_history(owner, &asset.contract_address).await {
                    Ok(entries) if entries.is_empty() => None,
                    Ok(entries) => {
                        let count = entries.len();
                        let asset_id = asset.asset_id();
                        self.ledger
                            .write()
                            .await
                            .upsert_rebase(&account_id, &asset_id, entries);
                        Some((asset_id, count))
                    }
                    Err(err) => {
                        warn!(
                            contract = %asset.contract_address,
                            error = %err,
                            "rebase history fetch failed; skipping asset"
                        );
                        None
                    }
                }
            }
        });

        let upserted: Vec<(AssetId, usize)> =
            join_all(fetches).await.into_iter().flatten().collect();
        info!(account = %account_id, assets = upserted.len(), "rebase history backfill complete");
        Ok(upserted)
    }
}
