use thiserror::Error;

use txledger_providers::ProviderError;
use txledger_types::{AccountId, SpecifierError};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid account specifier: {0}")]
    Validation(#[from] SpecifierError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("history provider never returned a final cursor for {account}")]
    PageLimitExceeded { account: AccountId },

    #[error("history fetch cancelled")]
    Cancelled,

    #[error("config error: {0}")]
    Config(String),
}
