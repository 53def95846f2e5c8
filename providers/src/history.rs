//! Cursor-paginated transaction history.

use serde::{Deserialize, Serialize};

use txledger_types::Transaction;

use crate::ProviderError;

/// One page request against a history provider.
#[derive(Clone, Debug, Serialize)]
pub struct TxHistoryRequest {
    /// Continuation token from the previous page; empty for the first page.
    pub cursor: String,
    /// The account's pubkey or xpub.
    pub pubkey: String,
    pub page_size: usize,
}

/// One page of transaction history.
#[derive(Clone, Debug, Deserialize)]
pub struct TxHistoryPage {
    pub transactions: Vec<Transaction>,
    /// Cursor for the next page; empty denotes end-of-history.
    #[serde(default)]
    pub cursor: String,
}

impl TxHistoryPage {
    /// Whether this is the final page.
    pub fn is_last(&self) -> bool {
        self.cursor.is_empty()
    }
}

/// A chain's transaction history source.
pub trait HistoryProvider {
    fn tx_history(
        &self,
        req: &TxHistoryRequest,
    ) -> impl std::future::Future<Output = Result<TxHistoryPage, ProviderError>> + Send;
}
