//! Chain identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque chain identifier, e.g. `eip155:1` for Ethereum mainnet.
///
/// The ledger never interprets the contents; it only uses the identifier
/// to route fetches to the right chain adapter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(String);

impl ChainId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChainId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
