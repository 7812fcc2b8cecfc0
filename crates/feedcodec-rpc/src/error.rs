//! Node access error types.

use feedcodec_core::error::WordError;
use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors that can occur while talking to a Starknet node.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, non-2xx status, etc.).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC protocol-level error returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Response could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The configured contract address is not a felt.
    #[error("invalid contract address: {0}")]
    InvalidAddress(#[from] WordError),

    /// A block in a range request failed; the range stops there.
    #[error("block {block_number}: {source}")]
    Block {
        block_number: u64,
        #[source]
        source: Box<TransportError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_error_names_the_block() {
        let wrapped = TransportError::Block {
            block_number: 3,
            source: Box::new(TransportError::Http("HTTP 502".into())),
        };
        assert_eq!(wrapped.to_string(), "block 3: HTTP error: HTTP 502");
        let rpc = TransportError::Rpc(JsonRpcError {
            code: 24,
            message: "Block not found".into(),
            data: None,
        });
        assert!(rpc.to_string().contains("Block not found"));
    }
}
