//! Transaction record and its classification.
//!
//! A [`Transaction`] represents one observed on-chain transaction from the
//! perspective of one owning account. The same provider-level transaction
//! can be observed more than once under one account (e.g. a UTXO send plus
//! its change output), each time with a different address component — the
//! store disambiguates with a composite key, not the provider tx id alone.

use serde::{Deserialize, Serialize};

use crate::{AssetId, BlockTime};

/// Direction of a single value transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    Send,
    Receive,
}

/// One value transfer leg of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub direction: TransferDirection,
    pub asset_id: AssetId,
    pub from: String,
    pub to: String,
    /// Amount in the asset's base units, as delivered by the provider.
    pub value: String,
}

/// Contract-call descriptor attached to a transaction, when the provider
/// decoded one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCall {
    pub method: String,
    /// Raw call data, hex-encoded.
    #[serde(default)]
    pub data: String,
}

/// Fee paid for a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub asset_id: AssetId,
    pub value: String,
}

/// Kind of trade a trade descriptor represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Trade,
    Refund,
}

/// Trade descriptor attached by providers that recognize DEX trades.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeDetails {
    pub trade_type: TradeType,
    #[serde(default)]
    pub dex_name: Option<String>,
}

/// Confirmation status reported by the provider. A record may be upserted
/// again with the same composite key as its status advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    #[default]
    Pending,
    Confirmed,
    Failed,
}

/// One observed on-chain transaction, from one account's perspective.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Provider-assigned transaction id. Not globally unique on its own —
    /// see the composite key derivation in the store crate.
    pub txid: String,
    /// The owned address this observation was made under. Disambiguates
    /// multiple legs of the same provider-level transaction.
    pub address: String,
    /// Block timestamp; `None` while the transaction is still pending.
    pub block_time: Option<BlockTime>,
    /// Ordered value transfers.
    pub transfers: Vec<Transfer>,
    #[serde(default)]
    pub contract_call: Option<ContractCall>,
    #[serde(default)]
    pub fee: Option<Fee>,
    #[serde(default)]
    pub trade_details: Option<TradeDetails>,
    #[serde(default)]
    pub status: TxStatus,
}

/// Contract methods the ledger knows how to classify.
const SUPPORTED_CONTRACT_METHODS: &[&str] = &[
    "deposit",
    "approve",
    "withdraw",
    "addLiquidityETH",
    "removeLiquidityETH",
    "transferOut",
];

/// Explicit classification of a transaction, decided once at read time by
/// [`Transaction::classify`]. Replaces ad-hoc optional-field sniffing with
/// an enumerated, exhaustive set of cases.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxKind {
    /// Plain single-transfer send or receive.
    Standard(TransferDirection),
    /// Recognized contract interaction, carrying the method name.
    Contract(String),
    /// A trade: either the provider said so, or the buy/sell legs form
    /// the generalized shape of one.
    Trade(TradeType),
    /// None of the above.
    Unclassified,
}

impl Transaction {
    /// The single transfer, when this is a plain one-transfer transaction.
    pub fn standard_transfer(&self) -> Option<&Transfer> {
        match self.transfers.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// First transfer received by the account (the "buy" leg of a trade).
    pub fn buy_transfer(&self) -> Option<&Transfer> {
        self.transfers
            .iter()
            .find(|t| t.direction == TransferDirection::Receive)
    }

    /// First transfer sent by the account (the "sell" leg of a trade).
    pub fn sell_transfer(&self) -> Option<&Transfer> {
        self.transfers
            .iter()
            .find(|t| t.direction == TransferDirection::Send)
    }

    /// Pure classification into an explicit [`TxKind`].
    ///
    /// Order of precedence: recognized contract method, single standard
    /// transfer, explicit trade details, trade-shaped transfer pair,
    /// otherwise unclassified. A lone transfer wins over trade details
    /// attached to it — a trade refund observed as a single receive is
    /// still a receive from the account's perspective.
    pub fn classify(&self) -> TxKind {
        if let Some(call) = &self.contract_call {
            if SUPPORTED_CONTRACT_METHODS.contains(&call.method.as_str()) {
                return TxKind::Contract(call.method.clone());
            }
        }
        if let Some(only) = self.standard_transfer() {
            return TxKind::Standard(only.direction);
        }
        if let Some(details) = &self.trade_details {
            return TxKind::Trade(details.trade_type);
        }
        if let (Some(buy), Some(sell)) = (self.buy_transfer(), self.sell_transfer()) {
            if is_trade_shaped(buy, sell) {
                return TxKind::Trade(TradeType::Trade);
            }
        }
        TxKind::Unclassified
    }
}

impl TxKind {
    /// Value-flow direction this classification implies, when one exists.
    ///
    /// Contract methods map to the direction of the value they move:
    /// deposits and liquidity adds send value out, withdrawals and
    /// liquidity removals bring it back, and an approval moves nothing.
    pub fn direction(&self) -> Option<TransferDirection> {
        match self {
            TxKind::Standard(direction) => Some(*direction),
            TxKind::Contract(method) => match method.as_str() {
                "deposit" | "addLiquidityETH" | "transferOut" => Some(TransferDirection::Send),
                "withdraw" | "removeLiquidityETH" => Some(TransferDirection::Receive),
                _ => None,
            },
            TxKind::Trade(_) | TxKind::Unclassified => None,
        }
    }
}

/// True when a buy/sell transfer pair matches the generalized idea of a
/// trade: the account sells to pool A and buys from pool B.
fn is_trade_shaped(buy: &Transfer, sell: &Transfer) -> bool {
    sell.from == buy.to && sell.to != buy.from
}
