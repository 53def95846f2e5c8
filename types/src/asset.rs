//! Asset identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque asset identifier, e.g. `eip155:1/erc20:0xc770...` for an
/// ERC-20 token on Ethereum mainnet.
///
/// Token asset ids embed the contract address as their reference part,
/// which is what the rebase gate matches held assets against.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this asset id embeds the given reference (e.g. a token
    /// contract address). Comparison is case-insensitive since EVM
    /// addresses are checksummed inconsistently across providers.
    pub fn contains_reference(&self, reference: &str) -> bool {
        self.0.to_lowercase().contains(&reference.to_lowercase())
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
