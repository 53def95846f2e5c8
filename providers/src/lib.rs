//! External collaborator interfaces for the ledger.
//!
//! Three capabilities are consumed, never owned:
//! - **History provider**: cursor-paginated transaction history per pubkey
//! - **Rebase provider**: rebase event history per (owner, token contract)
//! - **Chain resolver**: maps an opaque chain id to a concrete adapter
//!   exposing the two providers above
//!
//! The sync crate is generic over these traits; HTTP-backed
//! implementations live in [`http`].

pub mod error;
pub mod history;
pub mod http;
pub mod rebase;
pub mod resolver;

pub use error::ProviderError;
pub use history::{HistoryProvider, TxHistoryPage, TxHistoryRequest};
pub use http::{HttpChainAdapter, HttpHistoryProvider, HttpRebaseProvider};
pub use rebase::{RebaseProvider, RebasingAsset, RebasingAssets};
pub use resolver::{AdapterRegistry, ChainAdapter, ChainResolver};
