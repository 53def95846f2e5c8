//! Account specifier and account identifier types.
//!
//! An [`AccountSpecifier`] names one logical account on one chain: the
//! chain identifier plus the account's public key or xpub. The derived
//! [`AccountId`] (`chain:pubkey`) is the string form used to key the
//! store's per-account index.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::ChainId;

/// Error produced when parsing or validating an account specifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecifierError {
    #[error("account specifier has an empty chain id")]
    EmptyChain,

    #[error("account specifier has an empty pubkey")]
    EmptyPubkey,

    #[error("malformed account specifier: {0}")]
    Malformed(String),
}

/// One logical account on one chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountSpecifier {
    chain_id: ChainId,
    pubkey: String,
}

impl AccountSpecifier {
    /// Build a specifier, rejecting empty components.
    pub fn new(chain_id: ChainId, pubkey: impl Into<String>) -> Result<Self, SpecifierError> {
        let pubkey = pubkey.into();
        if chain_id.is_empty() {
            return Err(SpecifierError::EmptyChain);
        }
        if pubkey.is_empty() {
            return Err(SpecifierError::EmptyPubkey);
        }
        Ok(Self { chain_id, pubkey })
    }

    /// Parse a `chain:pubkey` string. The chain part may itself contain
    /// colons (e.g. `eip155:1`); the pubkey is everything after the last one.
    pub fn parse(raw: &str) -> Result<Self, SpecifierError> {
        let (chain, pubkey) = raw
            .rsplit_once(':')
            .ok_or_else(|| SpecifierError::Malformed(raw.to_string()))?;
        Self::new(ChainId::new(chain), pubkey)
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    pub fn pubkey(&self) -> &str {
        &self.pubkey
    }

    /// The account id this specifier resolves to.
    pub fn account_id(&self) -> AccountId {
        AccountId::new(format!("{}:{}", self.chain_id, self.pubkey))
    }
}

impl fmt::Display for AccountSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.pubkey)
    }
}

/// String form of an account specifier, used as an index key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
