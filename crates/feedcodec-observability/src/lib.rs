//! # feedcodec-observability
//!
//! OpenTelemetry-based observability for FeedCodec.
//!
//! ## Built-in metrics
//! - `feedcodec.transactions_decoded`: counter, tagged with function
//! - `feedcodec.transactions_empty`  : counter, tagged with reason
//! - `feedcodec.decode_errors`       : counter, tagged with error_type
//! - `feedcodec.observations_per_tx` : histogram
//!
//! ## Structured logging
//! JSON or text logs via `tracing-subscriber`, with per-crate level overrides.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::FeedMetrics;
pub use tracing_setup::{init_tracing, LogConfig};
