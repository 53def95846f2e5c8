//! Normalized in-memory ledger for transaction and rebase history.
//!
//! Events arrive out of order, duplicated, and once per owning account
//! perspective; this crate reconciles them into a single de-duplicated,
//! chronologically ordered ledger with per-asset and per-account secondary
//! indices.
//!
//! Every mutating operation needs exclusive access to the four parallel
//! structures for its whole duration. The store itself is a plain value;
//! the sync crate wraps it in a single global write lock so readers never
//! observe `ids` without the matching bucket updates.

pub mod identity;
pub mod index;
pub mod ledger;

pub use identity::{rebase_key, related_asset_ids, tx_key, RebaseKey, TxKey};
pub use index::add_to_index;
pub use ledger::{LedgerStore, LedgerSummary};
