//! # feedcodec-starknet
//!
//! Cairo 0 calldata decoder and price-feed pipeline.
//!
//! ## Implementation notes
//! - Calldata is a flat sequence of felt words, consumed left to right by a
//!   [`cursor::WordCursor`]
//! - A `felt` takes one word; a `T*` array takes one length word followed by
//!   its elements; a struct takes its members back to back
//! - The `*_len` member preceding an array is folded into that array's
//!   length prefix by the [`layout`] pass
//! - Decoded `new_entries` are normalized into `PriceObservation`s and can be
//!   combined into cross rates

pub mod batch;
pub mod combiner;
pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod layout;
pub mod normalizer;

pub use batch::{BatchResult, CrossRate, ErrorMode, FeedPipeline, TransactionFeed};
pub use combiner::{combine_median, combine_pair, filter_feed, median};
pub use cursor::WordCursor;
pub use decoder::CalldataDecoder;
pub use encoder::CalldataEncoder;
pub use normalizer::{normalize_submit_many_entries, FeedOutcome, NoDataReason};
