//! Rayon-powered batch pipeline: decode and normalize many oracle
//! transactions in parallel.
//!
//! Transactions are independent, so each one gets its own decoder pass over
//! its own calldata. Results keep input order regardless of scheduling.

use std::sync::Arc;

use feedcodec_core::{
    error::{BatchDecodeError, CombineError, DecodeError},
    feed::{PriceObservation, RawTransaction},
    schema::SchemaRegistry,
};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::combiner::combine_median;
use crate::decoder::CalldataDecoder;
use crate::normalizer::{normalize_submit_many_entries, FeedOutcome};

/// Controls how the batch pipeline reacts to individual decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Skip transactions that fail to decode. Suitable for best-effort analytics.
    #[default]
    Skip,
    /// Collect decode errors alongside successes and return both at the end.
    Collect,
    /// Abort the entire batch on the first failing transaction (by index).
    Throw,
}

/// One transaction's decoded price feed.
#[derive(Debug, Serialize)]
pub struct TransactionFeed {
    /// Position of the transaction in the input batch
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    pub function_name: String,
    #[serde(rename = "observations")]
    pub outcome: FeedOutcome,
}

/// Cross rate of one transaction's submissions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossRate {
    /// Position of the transaction in the input batch
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    pub rate: f64,
}

/// The output of a batch run.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Successfully decoded transactions, in input order
    pub feeds: Vec<TransactionFeed>,
    /// Populated only when `ErrorMode::Collect` is used.
    pub errors: Vec<(usize, DecodeError)>,
    pub total_input: usize,
}

impl BatchResult {
    /// All observations across the batch, in input order.
    pub fn observations(&self) -> Vec<PriceObservation> {
        self.feeds
            .iter()
            .flat_map(|f| f.outcome.observations().iter().cloned())
            .collect()
    }

    /// Median cross rate `base / quote` of each transaction, in input order.
    ///
    /// Feeds are paired within a transaction only. Transactions that do not
    /// submit both feeds contribute no point.
    pub fn pair_series(&self, base: &str, quote: &str) -> Vec<Result<CrossRate, CombineError>> {
        self.feeds
            .iter()
            .filter_map(|feed| {
                combine_median(feed.outcome.observations(), base, quote)
                    .map(|rate| {
                        rate.map(|rate| CrossRate {
                            index: feed.index,
                            timestamp: feed.timestamp,
                            rate,
                        })
                    })
                    .transpose()
            })
            .collect()
    }

    /// Number of decoded transactions that carried no price data.
    pub fn empty_count(&self) -> usize {
        self.feeds.iter().filter(|f| f.outcome.is_no_data()).count()
    }
}

/// Decode + normalize pipeline over a shared schema registry.
#[derive(Clone)]
pub struct FeedPipeline {
    registry: Arc<dyn SchemaRegistry>,
}

impl FeedPipeline {
    pub fn new(registry: Arc<dyn SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Decode and normalize one transaction.
    pub fn process(&self, index: usize, tx: &RawTransaction) -> Result<TransactionFeed, DecodeError> {
        let decoder = CalldataDecoder::new(self.registry.as_ref());
        let call = decoder.decode_transaction(tx)?;
        let outcome = normalize_submit_many_entries(&call.inputs);
        debug!(
            index,
            function = %call.function_name,
            observations = outcome.observations().len(),
            "decoded transaction"
        );
        Ok(TransactionFeed {
            index,
            transaction_hash: tx.transaction_hash.clone(),
            block_number: tx.block_number,
            timestamp: tx.timestamp,
            function_name: call.function_name,
            outcome,
        })
    }

    /// Decode a batch of transactions in parallel.
    pub fn process_batch(
        &self,
        txs: &[RawTransaction],
        mode: ErrorMode,
    ) -> Result<BatchResult, BatchDecodeError> {
        let results: Vec<(usize, Result<TransactionFeed, DecodeError>)> = txs
            .par_iter()
            .enumerate()
            .map(|(idx, tx)| (idx, self.process(idx, tx)))
            .collect();

        let mut feeds = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for (idx, result) in results {
            match result {
                Ok(feed) => feeds.push(feed),
                Err(err) => {
                    warn!(
                        index = idx,
                        hash = txs[idx].transaction_hash.as_deref().unwrap_or("-"),
                        error = %err,
                        "failed to decode transaction"
                    );
                    match mode {
                        ErrorMode::Skip => {}
                        ErrorMode::Collect => errors.push((idx, err)),
                        ErrorMode::Throw => {
                            return Err(BatchDecodeError::ItemFailed {
                                index: idx,
                                source: err,
                            });
                        }
                    }
                }
            }
        }

        let result = BatchResult {
            feeds,
            errors,
            total_input: txs.len(),
        };
        info!(
            total = result.total_input,
            decoded = result.feeds.len(),
            empty = result.empty_count(),
            "batch complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedcodec_core::{abi::Abi, word::Word};
    use feedcodec_registry::MemoryRegistry;

    const ABI: &str = r#"[
        {"type": "struct", "name": "Entry", "size": 4, "members": [
            {"name": "key", "type": "felt", "offset": 0},
            {"name": "value", "type": "felt", "offset": 1},
            {"name": "timestamp", "type": "felt", "offset": 2},
            {"name": "publisher", "type": "felt", "offset": 3}
        ]},
        {"type": "function", "name": "submit_many_entries", "inputs": [
            {"name": "new_entries_len", "type": "felt"},
            {"name": "new_entries", "type": "Entry*"}
        ], "outputs": []},
        {"type": "function", "name": "set_decimals", "inputs": [
            {"name": "decimals", "type": "felt"}
        ], "outputs": []}
    ]"#;

    fn pipeline() -> FeedPipeline {
        let reg = MemoryRegistry::from_abi(Abi::from_json(ABI).unwrap()).unwrap();
        FeedPipeline::new(Arc::new(reg))
    }

    fn entries_tx(timestamp: u64, entries: &[(&str, &str)]) -> RawTransaction {
        let mut calldata = vec![format!("{:#x}", entries.len())];
        for (key, price) in entries {
            calldata.extend([key.to_string(), price.to_string(), "0x1".into(), "0x41".into()]);
        }
        let refs: Vec<&str> = calldata.iter().map(String::as_str).collect();
        RawTransaction {
            timestamp: Some(timestamp),
            ..tx("submit_many_entries", &refs)
        }
    }

    fn tx(function: &str, calldata: &[&str]) -> RawTransaction {
        RawTransaction {
            transaction_hash: Some(format!("0x{}", calldata.len())),
            entry_point_selector: Some(
                feedcodec_core::selector::Selector::from_name(function).to_string(),
            ),
            calldata: calldata.iter().map(|w| Word::new(*w)).collect(),
            ..Default::default()
        }
    }

    fn batch() -> Vec<RawTransaction> {
        vec![
            // eth/usd = 100, btc/usd = 50
            tx(
                "submit_many_entries",
                &["0x2", "0x6574682f757364", "0x64", "0x1", "0x41", "0x6274632f757364", "0x32", "0x1", "0x41"],
            ),
            // truncated calldata
            tx("submit_many_entries", &["0x1", "0x6574682f757364"]),
            tx("set_decimals", &["0x12"]),
            tx("submit_many_entries", &["0x1", "0x6574682f757364", "0x66", "0x2", "0x41"]),
        ]
    }

    #[test]
    fn skip_mode_keeps_order() {
        let result = pipeline().process_batch(&batch(), ErrorMode::Skip).unwrap();
        assert_eq!(result.total_input, 4);
        assert_eq!(result.feeds.len(), 3);
        assert!(result.errors.is_empty());
        let indices: Vec<_> = result.feeds.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 2, 3]);
        assert_eq!(result.empty_count(), 1);

        let prices: Vec<_> = result.observations().iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![100, 50, 102]);
    }

    #[test]
    fn collect_mode_records_errors() {
        let result = pipeline().process_batch(&batch(), ErrorMode::Collect).unwrap();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].0, 1);
        assert!(matches!(result.errors[0].1, DecodeError::ExhaustedStream { .. }));
    }

    #[test]
    fn throw_mode_aborts() {
        let err = pipeline().process_batch(&batch(), ErrorMode::Throw).unwrap_err();
        assert!(matches!(err, BatchDecodeError::ItemFailed { index: 1, .. }));
    }

    #[test]
    fn pair_series_pairs_within_each_transaction() {
        // "a/usd" and "b/usd"
        let a = "0x612f757364";
        let b = "0x622f757364";
        let txs = vec![
            entries_tx(10, &[(a, "0x64"), (b, "0x32")]),
            entries_tx(20, &[(a, "0x12c")]),
            tx("set_decimals", &["0x12"]),
            entries_tx(30, &[(a, "0x66"), (b, "0x33")]),
        ];
        let result = pipeline().process_batch(&txs, ErrorMode::Throw).unwrap();

        let series: Vec<CrossRate> = result
            .pair_series("a/usd", "b/usd")
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            series,
            vec![
                CrossRate { index: 0, timestamp: Some(10), rate: 2.0 },
                CrossRate { index: 3, timestamp: Some(30), rate: 2.0 },
            ]
        );
    }

    #[test]
    fn pair_series_reports_zero_quote_per_transaction() {
        let a = "0x612f757364";
        let b = "0x622f757364";
        let txs = vec![
            entries_tx(10, &[(a, "0x64"), (b, "0x0")]),
            entries_tx(20, &[(a, "0x64"), (b, "0x19")]),
        ];
        let result = pipeline().process_batch(&txs, ErrorMode::Throw).unwrap();
        let series = result.pair_series("a/usd", "b/usd");
        assert_eq!(series.len(), 2);
        assert!(matches!(
            &series[0],
            Err(CombineError::DivisionByZero { index: 0, .. })
        ));
        assert_eq!(series[1].as_ref().unwrap().rate, 4.0);
    }

    #[test]
    fn empty_batch() {
        let result = pipeline().process_batch(&[], ErrorMode::default()).unwrap();
        assert_eq!(result.total_input, 0);
        assert!(result.observations().is_empty());
    }
}
