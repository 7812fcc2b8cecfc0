//! The decoded value tree produced by the calldata decoder.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::word::Word;

/// A decoded struct instance: member name → value, in declaration order.
pub type DecodedStruct = IndexMap<String, DecodedValue>;

/// A decoded member value.
///
/// Serializes untagged, so a decoded call reads like the raw JSON a node
/// would return: words stay hex strings, structs become objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecodedValue {
    /// A single `felt`
    Felt(Word),
    /// A `felt*`
    FeltArray(Vec<Word>),
    /// A struct instance
    Struct(DecodedStruct),
    /// A `Struct*`
    StructArray(Vec<DecodedStruct>),
}

impl DecodedValue {
    pub fn as_felt(&self) -> Option<&Word> {
        match self {
            DecodedValue::Felt(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_felt_array(&self) -> Option<&[Word]> {
        match self {
            DecodedValue::FeltArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&DecodedStruct> {
        match self {
            DecodedValue::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements of a struct array. An empty array decoded from a
    /// zero-length sentinel is reported as an empty struct array as well.
    pub fn as_struct_array(&self) -> Option<&[DecodedStruct]> {
        match self {
            DecodedValue::StructArray(v) => Some(v),
            DecodedValue::FeltArray(v) if v.is_empty() => Some(&[]),
            _ => None,
        }
    }
}

/// One decoded function input (or struct member) with its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedNode {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub value: DecodedValue,
}

impl DecodedNode {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, value: DecodedValue) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            value,
        }
    }
}

/// Look up a decoded node by member name.
pub fn find_node<'a>(nodes: &'a [DecodedNode], name: &str) -> Option<&'a DecodedNode> {
    nodes.iter().find(|n| n.name == name)
}
