//! Global value descriptors.

use serde::{Deserialize, Serialize};

/// Where a global's value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalStorage {
    /// Literal value, already sized and sign-extended by the producer.
    Direct(u64),
    /// Index into the indirection table of pointer-sized slots.
    Indirect(u32),
}

/// A named global published by the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalDescriptor {
    pub name: String,
    /// Declared scalar type (`"int8"`, `"pointer"`, ...). Advisory only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub storage: GlobalStorage,
}

impl GlobalDescriptor {
    pub fn direct(name: impl Into<String>, type_name: Option<&str>, value: u64) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.map(str::to_string),
            storage: GlobalStorage::Direct(value),
        }
    }

    pub fn indirect(name: impl Into<String>, type_name: Option<&str>, index: u32) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.map(str::to_string),
            storage: GlobalStorage::Indirect(index),
        }
    }

    pub fn is_indirect(&self) -> bool {
        matches!(self.storage, GlobalStorage::Indirect(_))
    }
}
