//! Chain resolution — mapping an opaque chain id to a concrete adapter.

use std::collections::HashMap;

use txledger_types::ChainId;

use crate::history::HistoryProvider;
use crate::rebase::RebaseProvider;
use crate::ProviderError;

/// A concrete adapter for one chain, exposing its data providers.
pub trait ChainAdapter {
    type History: HistoryProvider;
    type Rebase: RebaseProvider;

    fn chain_id(&self) -> &ChainId;
    fn history_provider(&self) -> &Self::History;
    fn rebase_provider(&self) -> &Self::Rebase;
}

/// Maps a chain id to its adapter; fails when the chain is unsupported.
pub trait ChainResolver {
    type Adapter: ChainAdapter;

    fn resolve(&self, chain_id: &ChainId) -> Result<&Self::Adapter, ProviderError>;
}

/// Map-backed resolver over homogeneous adapters.
#[derive(Debug)]
pub struct AdapterRegistry<A> {
    adapters: HashMap<ChainId, A>,
}

impl<A: ChainAdapter> AdapterRegistry<A> {
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    pub fn register(&mut self, adapter: A) {
        self.adapters.insert(adapter.chain_id().clone(), adapter);
    }

    pub fn supported_chains(&self) -> impl Iterator<Item = &ChainId> {
        self.adapters.keys()
    }
}

impl<A: ChainAdapter> ChainResolver for AdapterRegistry<A> {
    type Adapter = A;

    fn resolve(&self, chain_id: &ChainId) -> Result<&A, ProviderError> {
        self.adapters
            .get(chain_id)
            .ok_or_else(|| ProviderError::UnsupportedChain(chain_id.clone()))
    }
}
