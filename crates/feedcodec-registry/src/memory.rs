//! In-memory `SchemaRegistry` implementation.
//!
//! Built once from a parsed ABI and shared read-only afterwards. Cloning is
//! cheap (`Arc<Inner>`), so one registry can back many decoder threads.

use feedcodec_core::{
    abi::{Abi, FunctionDef, StructDef},
    error::RegistryError,
    schema::SchemaRegistry,
    selector::Selector,
};
use std::{collections::HashMap, path::Path, sync::Arc};
use tracing::debug;

struct Inner {
    /// struct name → definition
    structs: HashMap<String, StructDef>,
    /// selector → function
    functions: HashMap<Selector, FunctionDef>,
    /// function names in ABI order
    function_order: Vec<String>,
}

/// Immutable in-memory ABI registry.
#[derive(Clone)]
pub struct MemoryRegistry {
    inner: Arc<Inner>,
}

impl MemoryRegistry {
    /// Build a registry from a parsed ABI.
    ///
    /// # Errors
    /// `DuplicateStruct` if two structs share a name, `DuplicateFunction` if
    /// two functions derive the same selector.
    pub fn from_abi(abi: Abi) -> Result<Self, RegistryError> {
        let mut structs = HashMap::with_capacity(abi.structs.len());
        for def in abi.structs {
            if structs.contains_key(&def.name) {
                return Err(RegistryError::DuplicateStruct { name: def.name });
            }
            structs.insert(def.name.clone(), def);
        }

        let mut functions = HashMap::with_capacity(abi.functions.len());
        let mut function_order = Vec::with_capacity(abi.functions.len());
        for func in abi.functions {
            let selector = func.selector();
            if functions.contains_key(&selector) {
                return Err(RegistryError::DuplicateFunction {
                    name: func.name,
                    selector: selector.to_string(),
                });
            }
            function_order.push(func.name.clone());
            functions.insert(selector, func);
        }

        debug!(
            structs = structs.len(),
            functions = functions.len(),
            "registry built"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                structs,
                functions,
                function_order,
            }),
        })
    }

    /// Parse ABI JSON text and build a registry from it.
    pub fn from_abi_json(json: &str) -> Result<Self, RegistryError> {
        Self::from_abi(Abi::from_json(json)?)
    }

    /// Load an ABI JSON file.
    pub fn load_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path).map_err(RegistryError::Io)?;
        Self::from_abi_json(&content)
    }

    /// Returns all function names in ABI order.
    pub fn function_names(&self) -> Vec<&str> {
        self.inner.function_order.iter().map(String::as_str).collect()
    }

    /// Returns the selector of a named function.
    pub fn selector_for(&self, name: &str) -> Option<Selector> {
        self.inner
            .functions
            .iter()
            .find(|(_, f)| f.name == name)
            .map(|(s, _)| *s)
    }

    pub fn struct_count(&self) -> usize {
        self.inner.structs.len()
    }

    pub fn function_count(&self) -> usize {
        self.inner.functions.len()
    }
}

impl SchemaRegistry for MemoryRegistry {
    fn struct_by_name(&self, name: &str) -> Option<&StructDef> {
        self.inner.structs.get(name)
    }

    fn function_by_selector(&self, selector: &Selector) -> Option<&FunctionDef> {
        self.inner.functions.get(selector)
    }
}
