//! Rebase history provider and the registry of known rebasing tokens.

use serde::{Deserialize, Serialize};

use txledger_types::{AssetId, ChainId, RebaseEntry};

use crate::ProviderError;

/// Source of rebase events for one (owner, token contract) pair.
pub trait RebaseProvider {
    fn rebase_history(
        &self,
        owner_address: &str,
        contract_address: &str,
    ) -> impl std::future::Future<Output = Result<Vec<RebaseEntry>, ProviderError>> + Send;
}

/// A known rebasing token: its contract address and the single chain it
/// lives on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebasingAsset {
    pub contract_address: String,
    pub chain_id: ChainId,
}

impl RebasingAsset {
    /// The asset id rebase entries for this token are indexed under.
    pub fn asset_id(&self) -> AssetId {
        AssetId::new(format!(
            "{}/erc20:{}",
            self.chain_id,
            self.contract_address.to_lowercase()
        ))
    }
}

/// Registry of rebasing token contract addresses.
///
/// The rebase backfill only runs for tokens the portfolio actually holds —
/// [`matching_held`] filters the registry down to contracts whose address
/// appears in one of the held asset ids.
///
/// [`matching_held`]: RebasingAssets::matching_held
#[derive(Clone, Debug, Default)]
pub struct RebasingAssets {
    assets: Vec<RebasingAsset>,
}

impl RebasingAssets {
    pub fn new(assets: Vec<RebasingAsset>) -> Self {
        Self { assets }
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Registry entries whose contract address appears in a held asset id.
    pub fn matching_held<'a>(&'a self, held_asset_ids: &[AssetId]) -> Vec<&'a RebasingAsset> {
        self.assets
            .iter()
            .filter(|asset| {
                held_asset_ids
                    .iter()
                    .any(|held| held.contains_reference(&asset.contract_address))
            })
            .collect()
    }
}
