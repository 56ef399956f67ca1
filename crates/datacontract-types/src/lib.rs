//! Shared types for the data-contract reader.
//!
//! This crate defines the data model a target publishes about itself:
//! architecture facts, type layouts, global descriptors, target-sized
//! values, the construction bundle, and the error types used by the reader.

mod architecture;
mod config;
mod data_type;
mod error;
mod global;
mod layout;
mod pointer;

pub use architecture::{Architecture, Endianness, PointerWidth};
pub use config::TargetConfig;
pub use data_type::{DataType, TypeSelector};
pub use error::{ErrorCategory, ReadError, ReaderError};
pub use global::{GlobalDescriptor, GlobalStorage};
pub use layout::{FieldInfo, TypeEntry, TypeInfo};
pub use pointer::{TargetNInt, TargetNUInt, TargetPointer};

/// Result type used throughout the data-contract reader.
pub type Result<T> = std::result::Result<T, ReadError>;
