//! Felt words: the atomic unit of Starknet calldata.
//!
//! A word is kept exactly as it arrived from the node (hex text) so decoded
//! trees can be written back out unchanged. Numeric and textual views are
//! computed on demand.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WordError;

/// Largest number of ASCII bytes a single felt can carry (252-bit field).
pub const MAX_SHORT_STRING_LEN: usize = 31;

/// A single hex-encoded felt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Encode an integer as a `0x`-prefixed lowercase hex word.
    pub fn from_u256(value: U256) -> Self {
        Self(format!("0x{value:x}"))
    }

    pub fn from_u128(value: u128) -> Self {
        Self(format!("0x{value:x}"))
    }

    /// Pack ASCII text big-endian into a felt, e.g. `"ETH"` → `0x455448`.
    pub fn from_text(text: &str) -> Result<Self, WordError> {
        if text.len() > MAX_SHORT_STRING_LEN {
            return Err(WordError::TextTooLong {
                text: text.to_string(),
            });
        }
        if text.is_empty() {
            return Ok(Self("0x0".into()));
        }
        Ok(Self(format!("0x{}", hex::encode(text.as_bytes()))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the word as a base-16 integer. Accepts an optional `0x` prefix.
    pub fn to_u256(&self) -> Result<U256, WordError> {
        let digits = self
            .0
            .strip_prefix("0x")
            .or_else(|| self.0.strip_prefix("0X"))
            .unwrap_or(&self.0);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.invalid_hex());
        }
        U256::from_str_radix(digits, 16).map_err(|_| WordError::Overflow {
            word: self.0.clone(),
            target: "u256",
        })
    }

    pub fn to_u128(&self) -> Result<u128, WordError> {
        u128::try_from(self.to_u256()?).map_err(|_| self.overflow("u128"))
    }

    pub fn to_u64(&self) -> Result<u64, WordError> {
        u64::try_from(self.to_u256()?).map_err(|_| self.overflow("u64"))
    }

    /// Interpret the word as an array length.
    pub fn to_usize(&self) -> Result<usize, WordError> {
        usize::try_from(self.to_u64()?).map_err(|_| self.overflow("usize"))
    }

    pub fn is_zero(&self) -> Result<bool, WordError> {
        Ok(self.to_u256()?.is_zero())
    }

    /// Unpack big-endian ASCII bytes from the felt, e.g. `0x455448` → `"ETH"`.
    /// Leading zero bytes are padding; zero decodes to the empty string.
    pub fn to_text(&self) -> Result<String, WordError> {
        let bytes = self.to_u256()?.to_be_bytes::<32>();
        let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        String::from_utf8(bytes[start..].to_vec()).map_err(|_| WordError::NotUtf8 {
            word: self.0.clone(),
        })
    }

    fn invalid_hex(&self) -> WordError {
        WordError::InvalidHex {
            word: self.0.clone(),
        }
    }

    fn overflow(&self, target: &'static str) -> WordError {
        WordError::Overflow {
            word: self.0.clone(),
            target,
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Word {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Word {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_word_decodes_to_text() {
        assert_eq!(Word::new("0x455448").to_text().unwrap(), "ETH");
        assert_eq!(
            Word::new("0x6c756e612f757364").to_text().unwrap(),
            "luna/usd"
        );
    }

    #[test]
    fn text_packs_into_word() {
        let w = Word::from_text("ETH").unwrap();
        assert_eq!(w.as_str(), "0x455448");
        assert_eq!(w.to_text().unwrap(), "ETH");
        assert!(Word::from_text(&"x".repeat(32)).is_err());
    }

    #[test]
    fn zero_word_is_empty_text() {
        assert_eq!(Word::new("0x0").to_text().unwrap(), "");
        assert!(Word::new("0x0").is_zero().unwrap());
        assert!(Word::new("0").is_zero().unwrap());
    }

    #[test]
    fn numeric_views() {
        assert_eq!(Word::new("0x1bf143e2b80").to_u128().unwrap(), 1_920_190_000_000);
        assert_eq!(Word::new("0x63474dcd").to_u64().unwrap(), 1_665_617_357);
        assert_eq!(Word::new("a").to_usize().unwrap(), 10);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Word::new("0xzz").to_u256(),
            Err(WordError::InvalidHex { .. })
        ));
        assert!(matches!(
            Word::new("0x").to_u256(),
            Err(WordError::InvalidHex { .. })
        ));
        assert!(matches!(
            Word::new("0x1ffffffffffffffffffffffffffffffff").to_u128(),
            Err(WordError::Overflow { target: "u128", .. })
        ));
    }

    #[test]
    fn invalid_utf8_rejected() {
        assert!(matches!(
            Word::new("0xff").to_text(),
            Err(WordError::NotUtf8 { .. })
        ));
    }

    #[test]
    fn word_serde_is_transparent() {
        let w: Word = serde_json::from_str("\"0x2a\"").unwrap();
        assert_eq!(w, Word::new("0x2a"));
        assert_eq!(serde_json::to_string(&w).unwrap(), "\"0x2a\"");
    }
}
