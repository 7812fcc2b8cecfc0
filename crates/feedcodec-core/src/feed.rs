//! Raw oracle transactions and normalized price observations.

use serde::{Deserialize, Serialize};

use crate::word::Word;

/// A raw invoke transaction as returned by `starknet_getBlockWithTxs`,
/// stamped with the block it came from. This is the input to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    /// Invoked contract (`sender_address` on account-abstracted invokes)
    #[serde(default, alias = "sender_address", skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    /// Hex selector of the invoked entry point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point_selector: Option<String>,
    #[serde(default)]
    pub calldata: Vec<Word>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Block timestamp (Unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// One submitted price data point, normalized from its felt encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Feed name, e.g. "eth/usd"
    pub feed: String,
    /// Raw integer price as submitted (publisher-specific decimals).
    /// Prices are 128 bits wide; an entry whose value felt does not fit is
    /// malformed and drops its call.
    pub price: u128,
    /// Unix timestamp (seconds) the publisher attached to the entry
    pub timestamp: u64,
    pub publisher: String,
}
