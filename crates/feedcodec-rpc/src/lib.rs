//! # feedcodec-rpc
//!
//! Starknet node access for FeedCodec.
//!
//! - [`request`]: JSON-RPC 2.0 wire types
//! - [`transport`]: the `RpcTransport` trait and its `reqwest` implementation
//! - [`client`]: `StarknetNodeClient`: blocks, oracle transactions, block ranges
//!
//! Requests are sent once. Retrying a failed block is left to the caller.

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod transport;

pub use client::{filter_block, BlockWithTxs, StarknetNodeClient};
pub use config::NodeConfig;
pub use error::TransportError;
pub use transport::{HttpTransport, RpcTransport};
