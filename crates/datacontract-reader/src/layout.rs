//! Layout catalog: type selector → [`TypeInfo`].

use datacontract_types::{ReadError, Result, TypeEntry, TypeInfo, TypeSelector};
use std::collections::BTreeMap;

/// The resolved type layouts of a target.
///
/// There is a single table keyed by canonical name. Lookups by
/// [`DataType`](datacontract_types::DataType) go through the id's name, so id
/// and name views can never diverge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutCatalog {
    types: BTreeMap<String, TypeInfo>,
}

impl LayoutCatalog {
    /// Build the catalog, rejecting a name registered twice.
    pub fn new(entries: Vec<TypeEntry>) -> Result<Self> {
        let mut types = BTreeMap::new();
        for entry in entries {
            if types.contains_key(&entry.name) {
                return Err(ReadError::CorruptContract(format!(
                    "type {} is registered more than once",
                    entry.name
                )));
            }
            types.insert(entry.name, entry.info);
        }
        Ok(Self { types })
    }

    /// Look up a type by id or name.
    pub fn get(&self, selector: TypeSelector<'_>) -> Result<&TypeInfo> {
        self.types
            .get(selector.name())
            .ok_or_else(|| ReadError::TypeNotFound(selector.name().to_string()))
    }

    pub fn contains(&self, selector: TypeSelector<'_>) -> bool {
        self.types.contains_key(selector.name())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
