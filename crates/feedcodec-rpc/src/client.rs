//! Starknet node client: blocks, oracle transactions and block ranges.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use feedcodec_core::{feed::RawTransaction, word::Word};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::NodeConfig;
use crate::error::TransportError;
use crate::request::JsonRpcRequest;
use crate::transport::{HttpTransport, RpcTransport};

/// The subset of a `starknet_getBlockWithTxs` result the pipeline needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockWithTxs {
    /// Absent on pending blocks
    #[serde(default)]
    pub block_number: Option<u64>,
    pub timestamp: u64,
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
}

/// Keep the transactions sent to `contract` and stamp them with the block's
/// number and timestamp. Addresses compare as integers, so zero padding and
/// hex case do not matter. Transactions with an unparseable address are
/// skipped.
pub fn filter_block(block: BlockWithTxs, contract: &Word) -> Vec<RawTransaction> {
    let Ok(target) = contract.to_u256() else {
        return Vec::new();
    };
    let BlockWithTxs {
        block_number,
        timestamp,
        transactions,
    } = block;

    transactions
        .into_iter()
        .filter(|tx| {
            tx.contract_address
                .as_deref()
                .and_then(|addr| Word::new(addr).to_u256().ok())
                .map_or(false, |addr| addr == target)
        })
        .map(|mut tx| {
            tx.block_number = block_number;
            tx.timestamp = Some(timestamp);
            tx
        })
        .collect()
}

/// Client for one node and one oracle contract.
pub struct StarknetNodeClient {
    transport: Arc<dyn RpcTransport>,
    contract: Word,
    next_id: AtomicU64,
}

impl StarknetNodeClient {
    /// Connect over HTTP using `config`.
    pub fn connect(config: &NodeConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(config)?;
        Self::with_transport(Arc::new(transport), &config.contract_address)
    }

    /// Use an existing transport.
    pub fn with_transport(
        transport: Arc<dyn RpcTransport>,
        contract_address: &str,
    ) -> Result<Self, TransportError> {
        let contract = Word::new(contract_address);
        contract.to_u256()?;
        Ok(Self {
            transport,
            contract,
            next_id: AtomicU64::new(1),
        })
    }

    /// Fetch one block with its transactions.
    pub async fn get_block_with_txs(&self, block_number: u64) -> Result<BlockWithTxs, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::get_block_with_txs(id, block_number);
        let result = self
            .transport
            .send(req)
            .await?
            .into_result()
            .map_err(TransportError::Rpc)?;
        Ok(serde_json::from_value(result)?)
    }

    /// Oracle transactions in one block, stamped with block number and time.
    pub async fn fetch_contract_transactions(
        &self,
        block_number: u64,
    ) -> Result<Vec<RawTransaction>, TransportError> {
        let block = self.get_block_with_txs(block_number).await?;
        let total = block.transactions.len();
        let txs = filter_block(block, &self.contract);
        debug!(block_number, total, matched = txs.len(), "scanned block");
        Ok(txs)
    }

    /// Oracle transactions in blocks `start..end`, in block order. Stops at
    /// the first failing block.
    pub async fn fetch_range(
        &self,
        start: u64,
        end: u64,
    ) -> Result<Vec<RawTransaction>, TransportError> {
        let mut all = Vec::new();
        for block_number in start..end {
            let mut txs = self
                .fetch_contract_transactions(block_number)
                .await
                .map_err(|e| TransportError::Block {
                    block_number,
                    source: Box::new(e),
                })?;
            all.append(&mut txs);
        }
        info!(
            start,
            end,
            url = %self.transport.url(),
            transactions = all.len(),
            "fetched block range"
        );
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{JsonRpcError, JsonRpcResponse};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    const ORACLE: &str = "0x12fadd18ec1a23a160cc46981400160fbf4a7a5eed156c4669e39807265bcd4";

    fn block_json(number: u64) -> Value {
        json!({
            "block_number": number,
            "timestamp": 1_657_108_000 + number,
            "transactions": [
                {"transaction_hash": "0xa", "contract_address": ORACLE,
                 "entry_point_selector": "0x1", "calldata": ["0x0"]},
                {"transaction_hash": "0xb", "contract_address": "0x49d3",
                 "entry_point_selector": "0x2", "calldata": []},
                // same oracle, different padding and case
                {"transaction_hash": "0xc",
                 "sender_address": "0x012FADD18EC1A23A160CC46981400160FBF4A7A5EED156C4669E39807265BCD4",
                 "entry_point_selector": "0x1", "calldata": []},
                {"transaction_hash": "0xd", "type": "DECLARE"}
            ]
        })
    }

    /// Serves canned blocks; block numbers listed in `missing` return an RPC error.
    struct CannedNode {
        missing: Vec<u64>,
        seen: Mutex<Vec<JsonRpcRequest>>,
    }

    #[async_trait]
    impl RpcTransport for CannedNode {
        async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
            let number = req.params[0]["block_number"].as_u64().unwrap();
            self.seen.lock().unwrap().push(req.clone());
            if self.missing.contains(&number) {
                return Ok(JsonRpcResponse {
                    jsonrpc: "2.0".into(),
                    id: Some(req.id),
                    result: None,
                    error: Some(JsonRpcError {
                        code: 24,
                        message: "Block not found".into(),
                        data: None,
                    }),
                });
            }
            Ok(JsonRpcResponse::success(req.id, block_json(number)))
        }

        fn url(&self) -> &str {
            "canned://node"
        }
    }

    fn client(missing: Vec<u64>) -> (Arc<CannedNode>, StarknetNodeClient) {
        let node = Arc::new(CannedNode {
            missing,
            seen: Mutex::new(Vec::new()),
        });
        let client = StarknetNodeClient::with_transport(node.clone(), ORACLE).unwrap();
        (node, client)
    }

    #[test]
    fn filter_block_matches_numerically() {
        let block: BlockWithTxs = serde_json::from_value(block_json(5)).unwrap();
        let txs = filter_block(block, &Word::new(ORACLE));
        let hashes: Vec<_> = txs.iter().map(|t| t.transaction_hash.as_deref().unwrap()).collect();
        assert_eq!(hashes, vec!["0xa", "0xc"]);
        assert!(txs.iter().all(|t| t.block_number == Some(5)));
        assert!(txs.iter().all(|t| t.timestamp == Some(1_657_108_005)));
    }

    #[test]
    fn rejects_bad_contract_address() {
        let node = Arc::new(CannedNode {
            missing: vec![],
            seen: Mutex::new(Vec::new()),
        });
        assert!(matches!(
            StarknetNodeClient::with_transport(node, "oracle"),
            Err(TransportError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn fetch_range_is_half_open() {
        let (node, client) = client(vec![]);
        let txs = client.fetch_range(10, 13).await.unwrap();
        assert_eq!(txs.len(), 6);
        let blocks: Vec<_> = txs.iter().map(|t| t.block_number.unwrap()).collect();
        assert_eq!(blocks, vec![10, 10, 11, 11, 12, 12]);

        let seen = node.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|r| r.method == "starknet_getBlockWithTxs"));
        let ids: Vec<_> = seen.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn failing_block_stops_the_range() {
        let (node, client) = client(vec![11]);
        let err = client.fetch_range(10, 13).await.unwrap_err();
        match err {
            TransportError::Block {
                block_number,
                source,
            } => {
                assert_eq!(block_number, 11);
                assert!(matches!(*source, TransportError::Rpc(ref e) if e.code == 24));
            }
            other => panic!("unexpected error: {other}"),
        }
        // no retry, no further blocks
        assert_eq!(node.seen.lock().unwrap().len(), 2);
    }
}
