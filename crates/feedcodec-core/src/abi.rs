//! Cairo ABI descriptors.
//!
//! A Cairo 0 ABI is a JSON array of entries tagged by `type`. Only `struct`
//! and `function` entries matter to the decoder; events, constructors and
//! L1 handlers are accepted and skipped.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::selector::Selector;

/// Suffix marking a variable-length array type, e.g. `felt*`, `Entry*`.
pub const ARRAY_SUFFIX: char = '*';

/// The only primitive type in a Cairo 0 ABI.
pub const FELT: &str = "felt";

/// A named, typed slot in a function's inputs or a struct's members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Word offset within the enclosing struct (struct members only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl MemberDef {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            offset: None,
        }
    }

    /// Whether this member is a variable-length array.
    pub fn is_array(&self) -> bool {
        self.ty.ends_with(ARRAY_SUFFIX)
    }

    /// The type with any array suffix stripped: `Entry*` → `Entry`.
    pub fn element_type(&self) -> &str {
        strip_array_suffix(&self.ty)
    }
}

/// Strip a trailing array suffix from a type name.
pub fn strip_array_suffix(ty: &str) -> &str {
    ty.strip_suffix(ARRAY_SUFFIX).unwrap_or(ty)
}

/// A struct definition with ordered members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub members: Vec<MemberDef>,
}

/// An external function with ordered inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub inputs: Vec<MemberDef>,
    #[serde(default)]
    pub outputs: Vec<MemberDef>,
}

impl FunctionDef {
    /// The Starknet entry point selector derived from the function name.
    pub fn selector(&self) -> Selector {
        Selector::from_name(&self.name)
    }
}

/// Loose view of an ABI entry used while parsing.
#[derive(Debug, Deserialize)]
struct RawAbiEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    members: Vec<MemberDef>,
    #[serde(default)]
    inputs: Vec<MemberDef>,
    #[serde(default)]
    outputs: Vec<MemberDef>,
}

/// A parsed ABI: its struct and function entries in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abi {
    pub structs: Vec<StructDef>,
    pub functions: Vec<FunctionDef>,
}

impl Abi {
    /// Parse a Cairo ABI JSON document.
    ///
    /// # Errors
    /// Returns `RegistryError::ParseError` if the JSON is malformed or a
    /// struct/function entry has no name.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let entries: Vec<RawAbiEntry> = serde_json::from_str(json)
            .map_err(|e| RegistryError::ParseError(format!("invalid ABI JSON: {e}")))?;

        let mut abi = Abi::default();
        for (idx, entry) in entries.into_iter().enumerate() {
            match entry.kind.as_str() {
                "struct" => abi.structs.push(StructDef {
                    name: required_name(entry.name, idx)?,
                    size: entry.size,
                    members: entry.members,
                }),
                "function" => abi.functions.push(FunctionDef {
                    name: required_name(entry.name, idx)?,
                    inputs: entry.inputs,
                    outputs: entry.outputs,
                }),
                _ => {}
            }
        }
        Ok(abi)
    }
}

fn required_name(name: Option<String>, idx: usize) -> Result<String, RegistryError> {
    name.ok_or_else(|| RegistryError::ParseError(format!("ABI entry {idx} has no name")))
}
