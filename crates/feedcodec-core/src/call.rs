//! Decoded function calls.
//!
//! This is the output of decoding a transaction's calldata against the
//! function its entry point selector names.

use serde::{Deserialize, Serialize};

use crate::selector::Selector;
use crate::value::{find_node, DecodedNode, DecodedValue};

/// Result of decoding a transaction's calldata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedCall {
    /// Function name, e.g. "submit_many_entries"
    pub function_name: String,
    pub selector: Selector,
    /// Decoded inputs in declaration order. Length-prefix members that
    /// belong to the following array do not appear here.
    pub inputs: Vec<DecodedNode>,
    /// Words left over after the schema was satisfied
    pub trailing_words: usize,
}

impl DecodedCall {
    /// Look up a decoded input by name.
    pub fn input(&self, name: &str) -> Option<&DecodedValue> {
        find_node(&self.inputs, name).map(|n| &n.value)
    }

    /// Whether the schema consumed the calldata exactly.
    pub fn is_exact(&self) -> bool {
        self.trailing_words == 0
    }
}
