//! Node connection settings.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where and how to reach a Starknet node, and which contract to follow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// JSON-RPC endpoint, e.g. `https://starknet-mainnet.example/rpc/v0_4`
    pub url: String,
    /// Oracle contract whose transactions are collected
    pub contract_address: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Extra HTTP headers (API keys and the like)
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl NodeConfig {
    pub fn new(url: impl Into<String>, contract_address: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            contract_address: contract_address.into(),
            request_timeout_ms: default_request_timeout_ms(),
            headers: HashMap::new(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
