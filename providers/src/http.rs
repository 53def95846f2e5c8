//! HTTP-backed provider implementations.
//!
//! Thin typed clients over a chain indexer's REST endpoints. Each wraps a
//! `reqwest::Client` with the endpoint base URL and explicit timeouts.

use std::time::Duration;

use serde::Deserialize;

use txledger_types::{ChainId, RebaseEntry, Transaction};

use crate::history::{HistoryProvider, TxHistoryPage, TxHistoryRequest};
use crate::rebase::RebaseProvider;
use crate::resolver::ChainAdapter;
use crate::ProviderError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

fn build_client() -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|e| ProviderError::Http(format!("failed to create HTTP client: {e}")))
}

async fn get_json<T: serde::de::DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, ProviderError> {
    let response = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| ProviderError::Http(format!("request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(ProviderError::Http(format!(
            "endpoint returned HTTP {}",
            response.status()
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::Decode(format!("invalid JSON response: {e}")))
}

// ── History ────────────────────────────────────────────────────────────

/// History provider over an indexer's `/api/v1/txs` endpoint.
#[derive(Clone, Debug)]
pub struct HttpHistoryProvider {
    http: reqwest::Client,
    base_url: String,
}

/// Raw history page as the indexer returns it.
#[derive(Debug, Deserialize)]
struct TxHistoryResponse {
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    cursor: String,
}

impl HttpHistoryProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_client()?,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl HistoryProvider for HttpHistoryProvider {
    async fn tx_history(&self, req: &TxHistoryRequest) -> Result<TxHistoryPage, ProviderError> {
        let url = format!("{}/api/v1/txs", self.base_url);
        let page_size = req.page_size.to_string();
        let query = [
            ("pubkey", req.pubkey.as_str()),
            ("cursor", req.cursor.as_str()),
            ("pageSize", page_size.as_str()),
        ];
        let resp: TxHistoryResponse = get_json(&self.http, &url, &query).await?;
        Ok(TxHistoryPage {
            transactions: resp.transactions,
            cursor: resp.cursor,
        })
    }
}

// ── Rebase ─────────────────────────────────────────────────────────────

/// Rebase provider over an indexer's `/api/v1/rebases` endpoint.
#[derive(Clone, Debug)]
pub struct HttpRebaseProvider {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RebaseHistoryResponse {
    #[serde(default)]
    rebases: Vec<RebaseEntry>,
}

impl HttpRebaseProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_client()?,
            base_url: base_url.into(),
        })
    }
}

impl RebaseProvider for HttpRebaseProvider {
    async fn rebase_history(
        &self,
        owner_address: &str,
        contract_address: &str,
    ) -> Result<Vec<RebaseEntry>, ProviderError> {
        let url = format!("{}/api/v1/rebases", self.base_url);
        let query = [
            ("ownerAddress", owner_address),
            ("tokenContractAddress", contract_address),
        ];
        let resp: RebaseHistoryResponse = get_json(&self.http, &url, &query).await?;
        Ok(resp.rebases)
    }
}

// ── Adapter ────────────────────────────────────────────────────────────

/// One chain's HTTP adapter: both providers against the same endpoint.
#[derive(Clone, Debug)]
pub struct HttpChainAdapter {
    chain_id: ChainId,
    history: HttpHistoryProvider,
    rebase: HttpRebaseProvider,
}

impl HttpChainAdapter {
    pub fn new(chain_id: ChainId, endpoint_url: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            chain_id,
            history: HttpHistoryProvider::new(endpoint_url)?,
            rebase: HttpRebaseProvider::new(endpoint_url)?,
        })
    }
}

impl ChainAdapter for HttpChainAdapter {
    type History = HttpHistoryProvider;
    type Rebase = HttpRebaseProvider;

    fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    fn history_provider(&self) -> &HttpHistoryProvider {
        &self.history
    }

    fn rebase_provider(&self) -> &HttpRebaseProvider {
        &self.rebase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{AdapterRegistry, ChainResolver};

    #[test]
    fn history_page_decodes_with_defaults() {
        let page: TxHistoryResponse = serde_json::from_str("{}").unwrap();
        assert!(page.transactions.is_empty());
        assert!(page.cursor.is_empty());
    }

    #[test]
    fn history_page_decodes_transactions() {
        let json = r#"{
            "transactions": [{
                "txid": "0xabc",
                "address": "0xme",
                "block_time": 1650000000,
                "transfers": [{
                    "direction": "send",
                    "asset_id": "eip155:1/slip44:60",
                    "from": "0xme",
                    "to": "0xyou",
                    "value": "1000"
                }]
            }],
            "cursor": "page2"
        }"#;
        let page: TxHistoryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.transactions.len(), 1);
        assert_eq!(page.transactions[0].txid, "0xabc");
        assert_eq!(page.cursor, "page2");
    }

    #[test]
    fn registry_resolves_registered_chain() {
        let chain = ChainId::new("eip155:1");
        let adapter = HttpChainAdapter::new(chain.clone(), "http://localhost:1234").unwrap();
        let mut registry = AdapterRegistry::new();
        registry.register(adapter);

        assert!(registry.resolve(&chain).is_ok());
    }

    #[test]
    fn registry_rejects_unknown_chain() {
        let registry: AdapterRegistry<HttpChainAdapter> = AdapterRegistry::new();
        let err = registry.resolve(&ChainId::new("eip155:999")).unwrap_err();
        assert!(matches!(err, ProviderError::UnsupportedChain(_)));
    }
}
