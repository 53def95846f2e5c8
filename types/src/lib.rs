//! Fundamental types for the transaction & rebase ledger.
//!
//! This crate defines the domain types shared across every other crate in
//! the workspace: chain/account/asset identifiers, block timestamps,
//! transaction and rebase records, and the sync status enum.

pub mod account;
pub mod asset;
pub mod chain;
pub mod rebase;
pub mod status;
pub mod time;
pub mod transaction;

pub use account::{AccountId, AccountSpecifier, SpecifierError};
pub use asset::AssetId;
pub use chain::ChainId;
pub use rebase::RebaseEntry;
pub use status::SyncStatus;
pub use time::BlockTime;
pub use transaction::{
    ContractCall, Fee, TradeDetails, TradeType, Transaction, Transfer, TransferDirection, TxKind,
    TxStatus,
};
