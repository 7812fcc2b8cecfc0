//! FeedCodec metrics definitions.
//!
//! All metrics use OpenTelemetry conventions. Without an installed meter
//! provider they are no-ops.

use feedcodec_starknet::{BatchResult, FeedOutcome, NoDataReason};
use opentelemetry::{
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Central metrics handle for the decode pipeline.
#[derive(Clone)]
pub struct FeedMetrics {
    pub transactions_decoded: Counter<u64>,
    pub transactions_empty: Counter<u64>,
    pub decode_errors: Counter<u64>,
    pub observations_per_tx: Histogram<u64>,
}

impl FeedMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            transactions_decoded: meter
                .u64_counter("feedcodec.transactions_decoded")
                .with_description("Oracle transactions whose calldata decoded")
                .build(),
            transactions_empty: meter
                .u64_counter("feedcodec.transactions_empty")
                .with_description("Decoded transactions that carried no price entries")
                .build(),
            decode_errors: meter
                .u64_counter("feedcodec.decode_errors")
                .with_description("Transactions that failed to decode")
                .build(),
            observations_per_tx: meter
                .u64_histogram("feedcodec.observations_per_tx")
                .with_description("Price observations extracted from one transaction")
                .build(),
        }
    }

    /// Metrics on the global meter provider.
    pub fn global() -> Self {
        Self::new(&opentelemetry::global::meter("feedcodec"))
    }

    pub fn record_decoded(&self, function: &str, observations: usize) {
        self.transactions_decoded
            .add(1, &[KeyValue::new("function", function.to_string())]);
        self.observations_per_tx.record(observations as u64, &[]);
    }

    pub fn record_empty(&self, reason: &NoDataReason) {
        let reason = match reason {
            NoDataReason::MissingEntries => "missing_entries",
            NoDataReason::Malformed(_) => "malformed",
        };
        self.transactions_empty
            .add(1, &[KeyValue::new("reason", reason)]);
    }

    pub fn record_error(&self, error_type: &'static str) {
        self.decode_errors
            .add(1, &[KeyValue::new("error_type", error_type)]);
    }

    /// Record every transaction of a finished batch.
    pub fn record_batch(&self, result: &BatchResult) {
        for feed in &result.feeds {
            match &feed.outcome {
                FeedOutcome::Observations(obs) => self.record_decoded(&feed.function_name, obs.len()),
                FeedOutcome::NoData(reason) => {
                    self.record_decoded(&feed.function_name, 0);
                    self.record_empty(reason);
                }
            }
        }
        for (_, err) in &result.errors {
            self.record_error(err.kind());
        }
    }
}
