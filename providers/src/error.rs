use thiserror::Error;

use txledger_types::ChainId;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Http(String),

    #[error("provider response could not be decoded: {0}")]
    Decode(String),

    #[error("unsupported chain: {0}")]
    UnsupportedChain(ChainId),
}
