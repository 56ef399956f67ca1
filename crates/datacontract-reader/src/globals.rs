//! Global catalog and raw value resolution.

use datacontract_types::{Architecture, GlobalDescriptor, GlobalStorage, ReadError, Result};
use std::collections::HashMap;
use tracing::trace;

/// A global resolved to its 64-bit carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawGlobal<'a> {
    pub raw: u64,
    pub type_name: Option<&'a str>,
}

/// The globals of a target together with the indirection table they index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalCatalog {
    globals: HashMap<String, GlobalDescriptor>,
    indirection_table: Vec<u64>,
}

impl GlobalCatalog {
    /// Build the catalog.
    ///
    /// Validation is eager: a duplicate name or an indirect index past the
    /// end of `indirection_table` fails construction.
    pub fn new(descriptors: Vec<GlobalDescriptor>, indirection_table: Vec<u64>) -> Result<Self> {
        let mut globals = HashMap::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if let GlobalStorage::Indirect(index) = descriptor.storage {
                if index as usize >= indirection_table.len() {
                    return Err(ReadError::CorruptContract(format!(
                        "global {} references indirection slot {index}, table has {} entries",
                        descriptor.name,
                        indirection_table.len()
                    )));
                }
            }
            if globals.contains_key(&descriptor.name) {
                return Err(ReadError::CorruptContract(format!(
                    "global {} is registered more than once",
                    descriptor.name
                )));
            }
            globals.insert(descriptor.name.clone(), descriptor);
        }
        Ok(Self {
            globals,
            indirection_table,
        })
    }

    pub fn descriptor(&self, name: &str) -> Result<&GlobalDescriptor> {
        self.globals
            .get(name)
            .ok_or_else(|| ReadError::UnknownGlobal(name.to_string()))
    }

    /// Resolve a global to its carrier value.
    ///
    /// Indirect slots are truncated to the target pointer width; direct
    /// values are returned as stored.
    pub fn resolve(&self, name: &str, arch: &Architecture) -> Result<RawGlobal<'_>> {
        let descriptor = self.descriptor(name)?;
        let raw = match descriptor.storage {
            GlobalStorage::Direct(value) => value,
            GlobalStorage::Indirect(index) => {
                let slot = self
                    .indirection_table
                    .get(index as usize)
                    .copied()
                    .ok_or_else(|| {
                        ReadError::CorruptContract(format!(
                            "global {name} references missing indirection slot {index}"
                        ))
                    })?;
                arch.pointer_width.truncate(slot)
            }
        };
        trace!(global = name, raw, storage = ?descriptor.storage, "resolved global");
        Ok(RawGlobal {
            raw,
            type_name: descriptor.type_name.as_deref(),
        })
    }

    /// Global names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.globals.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.globals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.globals.is_empty()
    }

    pub fn indirection_table(&self) -> &[u64] {
        &self.indirection_table
    }
}
