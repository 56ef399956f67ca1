//! The construction bundle for a target.
//!
//! A [`TargetConfig`] is assembled by the caller (in code with the builder
//! methods, or loaded from JSON) and handed whole to the reader. It performs
//! no validation itself; duplicate keys and out-of-range indices are rejected
//! when the target is constructed.

use crate::{Architecture, DataType, GlobalDescriptor, TypeEntry, TypeInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything a target publishes about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub architecture: Architecture,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    #[serde(default)]
    pub globals: Vec<GlobalDescriptor>,
    /// Raw 64-bit slots addressed by indirect globals.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indirection_table: Vec<u64>,
    /// Contract names the target claims to support. Opaque to the reader.
    #[serde(default)]
    pub contracts: BTreeSet<String>,
}

impl TargetConfig {
    /// An empty bundle for the given architecture.
    pub fn new(architecture: Architecture) -> Self {
        Self {
            architecture,
            types: Vec::new(),
            globals: Vec::new(),
            indirection_table: Vec::new(),
            contracts: BTreeSet::new(),
        }
    }

    /// Register a layout under a well-known id.
    pub fn with_type(self, data_type: DataType, info: TypeInfo) -> Self {
        self.with_named_type(data_type.as_str(), info)
    }

    /// Register a layout under a free-form name.
    pub fn with_named_type(mut self, name: impl Into<String>, info: TypeInfo) -> Self {
        self.types.push(TypeEntry {
            name: name.into(),
            info,
        });
        self
    }

    /// Add a global whose value is embedded literally.
    pub fn with_global(
        mut self,
        name: impl Into<String>,
        type_name: Option<&str>,
        value: u64,
    ) -> Self {
        self.globals.push(GlobalDescriptor::direct(name, type_name, value));
        self
    }

    /// Add a global resolved through the indirection table.
    pub fn with_indirect_global(
        mut self,
        name: impl Into<String>,
        type_name: Option<&str>,
        index: u32,
    ) -> Self {
        self.globals.push(GlobalDescriptor::indirect(name, type_name, index));
        self
    }

    pub fn with_indirection_table(mut self, table: Vec<u64>) -> Self {
        self.indirection_table = table;
        self
    }

    pub fn with_contract(mut self, name: impl Into<String>) -> Self {
        self.contracts.insert(name.into());
        self
    }

    /// Parse a bundle from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
