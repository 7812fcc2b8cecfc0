//! The read-only schema registry interface used by the decoder.
//! Concrete implementations live in `feedcodec-registry`.

use crate::abi::{strip_array_suffix, FunctionDef, StructDef};
use crate::error::DecodeError;
use crate::selector::Selector;

/// A thread-safe, immutable view of an ABI's structs and functions.
pub trait SchemaRegistry: Send + Sync {
    /// Look up a struct by exact name.
    fn struct_by_name(&self, name: &str) -> Option<&StructDef>;

    /// Look up a function by its entry point selector.
    fn function_by_selector(&self, selector: &Selector) -> Option<&FunctionDef>;

    /// Resolve a member type to its struct definition. Any array suffix is
    /// stripped first, so `Entry*` resolves to `Entry`.
    fn get_struct(&self, type_name: &str) -> Result<&StructDef, DecodeError> {
        let name = strip_array_suffix(type_name);
        self.struct_by_name(name)
            .ok_or_else(|| DecodeError::UnknownStruct {
                name: name.to_string(),
            })
    }
}
