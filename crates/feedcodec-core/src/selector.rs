//! Starknet entry point selectors.
//!
//! The selector of a function is `starknet_keccak(name)`: keccak256 of the
//! ASCII name truncated to its low 250 bits. The default entry points map
//! to selector zero.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use tiny_keccak::{Hasher, Keccak};

use crate::error::WordError;
use crate::word::Word;

const DEFAULT_ENTRY_POINT_NAME: &str = "__default__";
const DEFAULT_L1_ENTRY_POINT_NAME: &str = "__l1_default__";

/// A 250-bit entry point selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Selector(U256);

impl Selector {
    /// Derive the selector for a function name.
    pub fn from_name(name: &str) -> Self {
        if name == DEFAULT_ENTRY_POINT_NAME || name == DEFAULT_L1_ENTRY_POINT_NAME {
            return Self(U256::ZERO);
        }
        Self(starknet_keccak(name.as_bytes()))
    }

    /// Parse a selector from its hex form, e.g. a transaction's
    /// `entry_point_selector`.
    pub fn from_hex(hex: &str) -> Result<Self, WordError> {
        Word::new(hex).to_u256().map(Self)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// keccak256 masked to 250 bits.
pub fn starknet_keccak(data: &[u8]) -> U256 {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output[0] &= 0x03;
    U256::from_be_bytes(output)
}
