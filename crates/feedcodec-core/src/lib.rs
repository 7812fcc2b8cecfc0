//! # feedcodec-core
//!
//! Core types shared across all FeedCodec crates: felt words, Cairo ABI
//! descriptors, entry point selectors, the decoded value tree, price
//! observations and the error taxonomy. The decoder, registry and node
//! client are all built on the types defined here.

pub mod abi;
pub mod call;
pub mod error;
pub mod feed;
pub mod schema;
pub mod selector;
pub mod value;
pub mod word;

pub use abi::{Abi, FunctionDef, MemberDef, StructDef};
pub use call::DecodedCall;
pub use error::{
    BatchDecodeError, CombineError, DecodeError, EncodeError, NormalizeError, RegistryError,
    WordError,
};
pub use feed::{PriceObservation, RawTransaction};
pub use schema::SchemaRegistry;
pub use selector::Selector;
pub use value::{DecodedNode, DecodedStruct, DecodedValue};
pub use word::Word;
