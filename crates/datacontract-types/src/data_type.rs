//! Well-known type identifiers and type selectors.

use crate::{Architecture, ReadError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A well-known type identifier.
///
/// Primitive members name the scalar kinds globals and fields are declared
/// with. The rest are runtime types whose layouts targets publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    // ── Primitives ──
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    NInt,
    NUInt,
    Pointer,

    // ── Runtime types ──
    Thread,
    ThreadStore,
    GCHandle,
    GCAllocContext,
    ExceptionInfo,
    RuntimeThreadLocals,
    Module,
    MethodTable,
    EEClass,
}

impl DataType {
    /// Every member, in declaration order.
    pub const ALL: [DataType; 20] = [
        Self::Int8,
        Self::UInt8,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::NInt,
        Self::NUInt,
        Self::Pointer,
        Self::Thread,
        Self::ThreadStore,
        Self::GCHandle,
        Self::GCAllocContext,
        Self::ExceptionInfo,
        Self::RuntimeThreadLocals,
        Self::Module,
        Self::MethodTable,
        Self::EEClass,
    ];

    /// Canonical name, as used in contract data.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::NInt => "nint",
            Self::NUInt => "nuint",
            Self::Pointer => "pointer",
            Self::Thread => "Thread",
            Self::ThreadStore => "ThreadStore",
            Self::GCHandle => "GCHandle",
            Self::GCAllocContext => "GCAllocContext",
            Self::ExceptionInfo => "ExceptionInfo",
            Self::RuntimeThreadLocals => "RuntimeThreadLocals",
            Self::Module => "Module",
            Self::MethodTable => "MethodTable",
            Self::EEClass => "EEClass",
        }
    }

    pub fn is_primitive(self) -> bool {
        self.primitive_size(&Architecture::LE64).is_some()
    }

    /// Decode width in bytes for primitive members; `None` for runtime types.
    ///
    /// `nint`, `nuint` and `pointer` follow the architecture pointer width.
    pub fn primitive_size(self, arch: &Architecture) -> Option<u32> {
        match self {
            Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 => Some(4),
            Self::Int64 | Self::UInt64 => Some(8),
            Self::NInt | Self::NUInt | Self::Pointer => Some(arch.pointer_size()),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = ReadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ReadError::TypeNotFound(s.to_string()))
    }
}

impl TryFrom<String> for DataType {
    type Error = ReadError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DataType> for String {
    fn from(t: DataType) -> Self {
        t.as_str().to_string()
    }
}

/// Selects a type either by well-known id or by free-form name.
///
/// Both forms address the same layout table: an id selects the entry
/// registered under its canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSelector<'a> {
    Id(DataType),
    Name(&'a str),
}

impl<'a> TypeSelector<'a> {
    /// The table key this selector resolves to.
    pub fn name(&self) -> &'a str {
        match *self {
            Self::Id(t) => t.as_str(),
            Self::Name(name) => name,
        }
    }
}

impl From<DataType> for TypeSelector<'_> {
    fn from(t: DataType) -> Self {
        Self::Id(t)
    }
}

impl<'a> From<&'a str> for TypeSelector<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for TypeSelector<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name.as_str())
    }
}

impl fmt::Display for TypeSelector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
