//! Error types for the FeedCodec decode pipeline.

use thiserror::Error;

/// A single felt word could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("'{word}' is not a hexadecimal integer")]
    InvalidHex { word: String },

    #[error("'{word}' does not fit in {target}")]
    Overflow { word: String, target: &'static str },

    #[error("'{word}' does not hold UTF-8 text")]
    NotUtf8 { word: String },

    #[error("text '{text}' is longer than 31 bytes and cannot be packed into a felt")]
    TextTooLong { text: String },
}

/// Errors that abort decoding of a single transaction.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("calldata exhausted: needed {needed} word(s), {remaining} remaining")]
    ExhaustedStream { needed: usize, remaining: usize },

    #[error("struct '{name}' is not defined in the ABI")]
    UnknownStruct { name: String },

    #[error("invalid word: {0}")]
    InvalidWord(#[from] WordError),

    #[error("struct nesting exceeds {limit} levels at type '{ty}'")]
    NestingTooDeep { ty: String, limit: usize },

    #[error("array of '{ty}' has length {len}, above the limit of {limit}")]
    ArrayTooLong { ty: String, len: usize, limit: usize },

    #[error("no function matches entry point selector {selector}")]
    UnknownSelector { selector: String },

    #[error("Invalid raw transaction: {reason}")]
    InvalidTransaction { reason: String },
}

impl DecodeError {
    /// Short stable label for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ExhaustedStream { .. } => "exhausted_stream",
            Self::UnknownStruct { .. } => "unknown_struct",
            Self::InvalidWord(_) => "invalid_word",
            Self::NestingTooDeep { .. } => "nesting_too_deep",
            Self::ArrayTooLong { .. } => "array_too_long",
            Self::UnknownSelector { .. } => "unknown_selector",
            Self::InvalidTransaction { .. } => "invalid_transaction",
        }
    }
}

/// A submitted price entry could not be converted to a price observation.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("entry {index}: missing field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("entry {index}: field '{field}': {source}")]
    MalformedEntry {
        index: usize,
        field: &'static str,
        #[source]
        source: WordError,
    },

    #[error("member '{member}' has unexpected shape: expected {expected}")]
    UnexpectedShape {
        member: String,
        expected: &'static str,
    },
}

/// Errors from combining two single-asset feeds into a cross rate.
#[derive(Debug, Error, PartialEq)]
pub enum CombineError {
    #[error("division by zero: '{feed}' price at position {index} is zero")]
    DivisionByZero { index: usize, feed: String },
}

/// Errors from building the schema registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("struct '{name}' is defined more than once")]
    DuplicateStruct { name: String },

    #[error("function '{name}' collides with an existing selector {selector}")]
    DuplicateFunction { name: String, selector: String },

    #[error("ABI parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from encoding a value tree back into calldata words.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("no value supplied for member '{name}'")]
    MissingValue { name: String },

    #[error("member '{name}': expected {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },

    #[error("struct '{name}' is not defined in the ABI")]
    UnknownStruct { name: String },
}

/// Errors that can occur during batch processing.
#[derive(Debug, Error)]
pub enum BatchDecodeError {
    #[error("Decode error at index {index}: {source}")]
    ItemFailed {
        index: usize,
        #[source]
        source: DecodeError,
    },
}
