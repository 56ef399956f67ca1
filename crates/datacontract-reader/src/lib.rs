//! Data-contract reader: decodes a target's memory layout from the
//! contracts it publishes.
//!
//! # Architecture
//!
//! ```text
//! TargetConfig ──► Target ─┬─ LayoutCatalog   (type id / name → TypeInfo)
//!                          ├─ GlobalCatalog   (name → direct value | indirection slot)
//!                          ├─ Architecture    (pointer width, byte order)
//!                          └─ MemoryReader    (external capability)
//! ```
//!
//! Every value is produced from a 64-bit carrier and narrowed to the
//! requested [`Scalar`] width. `nint`, `nuint` and `pointer` follow the
//! target's pointer width, never the host's.

pub mod globals;
pub mod layout;
pub mod memory;
pub mod scalar;
pub mod target;

pub use datacontract_types::{
    Architecture, DataType, Endianness, ErrorCategory, FieldInfo, GlobalDescriptor, GlobalStorage,
    PointerWidth, ReadError, ReaderError, Result, TargetConfig, TargetNInt, TargetNUInt,
    TargetPointer, TypeEntry, TypeInfo, TypeSelector,
};
pub use globals::GlobalCatalog;
pub use layout::LayoutCatalog;
pub use memory::{MemoryReader, SnapshotMemory};
pub use scalar::Scalar;
pub use target::Target;
