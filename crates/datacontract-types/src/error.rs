use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error category, derived from the error variant.
///
/// Tools report `NotFound` as "target does not support X" and `Memory` as
/// "cannot read target memory". The two classes must stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// A type, field or global is not published by the target.
    NotFound,
    /// The contract data is internally inconsistent, or target data read
    /// through it is malformed.
    Contract,
    /// The memory reader could not satisfy a read.
    Memory,
    /// The memory reader gave up (cancellation or timeout).
    Interrupted,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "notfound"),
            Self::Contract => write!(f, "contract"),
            Self::Memory => write!(f, "memory"),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Failure reported by a memory reader.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The address range is not backed by target memory.
    #[error("address 0x{address:x} is not mapped")]
    Unmapped { address: u64 },

    /// The reader returned fewer bytes than requested.
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: u32, actual: usize },

    /// Underlying I/O failure (dump file, transport, permissions).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("read cancelled")]
    Cancelled,

    #[error("read timed out")]
    TimedOut,
}

/// Errors produced while constructing or querying a target.
#[derive(Debug, Error)]
pub enum ReadError {
    /// No type is registered under this id or name.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// The type exists but does not declare this field.
    #[error("type {type_name} has no field {field}")]
    FieldNotFound { type_name: String, field: String },

    /// No global is registered under this name.
    #[error("unknown global: {0}")]
    UnknownGlobal(String),

    /// Inconsistent contract data (duplicate keys, out-of-range table index).
    #[error("corrupt contract: {0}")]
    CorruptContract(String),

    /// Pointer size other than 4 or 8 bytes.
    #[error("invalid architecture: pointer size {0} is not 4 or 8")]
    InvalidArchitecture(u8),

    /// A strict read found a declared type other than the requested one.
    #[error("global {global} is declared as {declared}, requested {requested}")]
    TypeMismatch {
        global: String,
        declared: String,
        requested: String,
    },

    #[error("cannot read {length} bytes at 0x{address:x}: {source}")]
    MemoryUnavailable {
        address: u64,
        length: u32,
        #[source]
        source: ReaderError,
    },

    /// Target memory does not hold a NUL-terminated UTF-8 string here.
    #[error("invalid string at 0x{address:x}")]
    InvalidString { address: u64 },

    #[error("memory read cancelled")]
    Cancelled,

    #[error("memory read timed out")]
    TimedOut,
}

impl ReadError {
    /// Translate a memory reader failure for the given request.
    ///
    /// Cancellation and timeouts are passed through as their own variants;
    /// everything else becomes `MemoryUnavailable`.
    pub fn from_reader(address: u64, length: u32, source: ReaderError) -> Self {
        match source {
            ReaderError::Cancelled => Self::Cancelled,
            ReaderError::TimedOut => Self::TimedOut,
            source => Self::MemoryUnavailable {
                address,
                length,
                source,
            },
        }
    }

    /// Get the category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TypeNotFound(_) | Self::FieldNotFound { .. } | Self::UnknownGlobal(_) => {
                ErrorCategory::NotFound
            }
            Self::CorruptContract(_)
            | Self::InvalidArchitecture(_)
            | Self::TypeMismatch { .. }
            | Self::InvalidString { .. } => ErrorCategory::Contract,
            Self::MemoryUnavailable { .. } => ErrorCategory::Memory,
            Self::Cancelled | Self::TimedOut => ErrorCategory::Interrupted,
        }
    }
}
