//! Type layout descriptors: sizes and field offsets.

use crate::DataType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single field of a described type.
///
/// The type annotation is descriptive only; some contracts publish bare
/// offsets for pointer arithmetic. A well-known `type_name` always carries
/// its `data_type`, whether built in code or loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFieldInfo")]
pub struct FieldInfo {
    /// Byte offset from the start of the containing type.
    pub offset: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl FieldInfo {
    /// A field with an offset and no type annotation.
    pub fn new(offset: u32) -> Self {
        Self {
            offset,
            data_type: None,
            type_name: None,
        }
    }

    /// A field declared with a well-known type; the name follows the id.
    pub fn typed(offset: u32, data_type: DataType) -> Self {
        Self {
            offset,
            data_type: Some(data_type),
            type_name: Some(data_type.as_str().to_string()),
        }
    }

    /// A field declared with a free-form type name.
    pub fn named(offset: u32, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            offset,
            data_type: type_name.parse().ok(),
            type_name: Some(type_name),
        }
    }
}

/// Wire form of [`FieldInfo`] before the id and name are reconciled.
#[derive(Deserialize)]
struct RawFieldInfo {
    offset: u32,
    #[serde(default)]
    data_type: Option<DataType>,
    #[serde(default)]
    type_name: Option<String>,
}

impl From<RawFieldInfo> for FieldInfo {
    fn from(raw: RawFieldInfo) -> Self {
        match (raw.data_type, raw.type_name) {
            (Some(data_type), None) => Self::typed(raw.offset, data_type),
            (None, Some(type_name)) => Self::named(raw.offset, type_name),
            (data_type, type_name) => Self {
                offset: raw.offset,
                data_type,
                type_name,
            },
        }
    }
}

/// Size and field layout of a described type.
///
/// Either part may be absent: opaque handles carry only a size, and some
/// types publish fields without an overall size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldInfo>,
}

impl TypeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// A type with a size and no fields.
    pub fn sized(size: u32) -> Self {
        Self {
            size: Some(size),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field.
    pub fn with_field(mut self, name: impl Into<String>, field: FieldInfo) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.get(name)
    }
}

/// A type registration: canonical name plus layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub name: String,
    #[serde(flatten)]
    pub info: TypeInfo,
}
