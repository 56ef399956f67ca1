//! Immutable facts about the target: pointer width and byte order.

use crate::ReadError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of a target pointer.
///
/// Serialized as the byte count (`4` or `8`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    /// Pointer size in bytes.
    pub fn bytes(self) -> u32 {
        match self {
            Self::Bits32 => 4,
            Self::Bits64 => 8,
        }
    }

    /// Keep only the bits a pointer of this width can hold.
    pub fn truncate(self, raw: u64) -> u64 {
        match self {
            Self::Bits32 => raw & 0xffff_ffff,
            Self::Bits64 => raw,
        }
    }
}

impl TryFrom<u8> for PointerWidth {
    type Error = ReadError;

    fn try_from(bytes: u8) -> Result<Self, Self::Error> {
        match bytes {
            4 => Ok(Self::Bits32),
            8 => Ok(Self::Bits64),
            other => Err(ReadError::InvalidArchitecture(other)),
        }
    }
}

impl From<PointerWidth> for u8 {
    fn from(width: PointerWidth) -> Self {
        match width {
            PointerWidth::Bits32 => 4,
            PointerWidth::Bits64 => 8,
        }
    }
}

/// Byte order of multi-byte values in target memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

/// Target architecture descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Architecture {
    pub pointer_width: PointerWidth,
    #[serde(default)]
    pub endianness: Endianness,
}

impl Architecture {
    /// 64-bit little-endian (x86_64, aarch64).
    pub const LE64: Self = Self {
        pointer_width: PointerWidth::Bits64,
        endianness: Endianness::Little,
    };
    /// 32-bit little-endian (x86, arm).
    pub const LE32: Self = Self {
        pointer_width: PointerWidth::Bits32,
        endianness: Endianness::Little,
    };
    pub const BE64: Self = Self {
        pointer_width: PointerWidth::Bits64,
        endianness: Endianness::Big,
    };
    pub const BE32: Self = Self {
        pointer_width: PointerWidth::Bits32,
        endianness: Endianness::Big,
    };

    /// Create an architecture from a pointer size in bytes.
    ///
    /// Fails with [`ReadError::InvalidArchitecture`] unless `pointer_size`
    /// is 4 or 8.
    pub fn new(pointer_size: u8, is_big_endian: bool) -> crate::Result<Self> {
        Ok(Self {
            pointer_width: PointerWidth::try_from(pointer_size)?,
            endianness: if is_big_endian {
                Endianness::Big
            } else {
                Endianness::Little
            },
        })
    }

    /// Pointer size in bytes.
    pub fn pointer_size(&self) -> u32 {
        self.pointer_width.bytes()
    }

    pub fn is_big_endian(&self) -> bool {
        self.endianness == Endianness::Big
    }

    /// Assemble up to eight bytes of target memory into a 64-bit carrier.
    pub fn assemble(&self, bytes: &[u8]) -> u64 {
        let fold = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);
        match self.endianness {
            Endianness::Big => bytes.iter().fold(0, fold),
            Endianness::Little => bytes.iter().rev().fold(0, fold),
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = match self.endianness {
            Endianness::Little => "le",
            Endianness::Big => "be",
        };
        write!(f, "{}-bit {}", self.pointer_size() * 8, order)
    }
}
