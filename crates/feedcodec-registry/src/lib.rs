//! # feedcodec-registry
//!
//! Schema Registry for FeedCodec.
//!
//! The registry is built once from a Cairo ABI (JSON text or a file on
//! disk) and is immutable afterwards. Struct lookup is by exact name;
//! duplicate struct names and colliding function selectors are rejected at
//! construction time.
//!
//! The public-facing API is the `SchemaRegistry` trait from `feedcodec-core`.

pub mod memory;

pub use memory::MemoryRegistry;
