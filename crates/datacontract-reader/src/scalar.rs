//! Fixed-width scalar decoding.
//!
//! Every value the reader produces starts life as a 64-bit carrier: either a
//! literal from contract data, an indirection-table slot, or bytes assembled
//! from target memory. [`Scalar::decode`] narrows the carrier to the
//! requested width. No range checks are made; signed types reinterpret the
//! low bytes as two's complement.

use datacontract_types::{Architecture, DataType, TargetNInt, TargetNUInt, TargetPointer};
use std::fmt;

/// A scalar type a global or memory cell can be read as.
pub trait Scalar: Copy + fmt::Debug + Send + Sync + 'static {
    /// The primitive this type decodes as.
    const DATA_TYPE: DataType;

    /// Decode width in bytes on `arch`.
    fn width(arch: &Architecture) -> u32;

    /// Narrow a 64-bit carrier to this type.
    fn decode(raw: u64, arch: &Architecture) -> Self;
}

macro_rules! fixed_width_scalar {
    ($($ty:ty => $data_type:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const DATA_TYPE: DataType = DataType::$data_type;

                fn width(_arch: &Architecture) -> u32 {
                    std::mem::size_of::<$ty>() as u32
                }

                fn decode(raw: u64, _arch: &Architecture) -> Self {
                    raw as $ty
                }
            }
        )*
    };
}

fixed_width_scalar! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
}

impl Scalar for TargetNUInt {
    const DATA_TYPE: DataType = DataType::NUInt;

    fn width(arch: &Architecture) -> u32 {
        arch.pointer_size()
    }

    fn decode(raw: u64, arch: &Architecture) -> Self {
        TargetNUInt(arch.pointer_width.truncate(raw))
    }
}

impl Scalar for TargetNInt {
    const DATA_TYPE: DataType = DataType::NInt;

    fn width(arch: &Architecture) -> u32 {
        arch.pointer_size()
    }

    fn decode(raw: u64, arch: &Architecture) -> Self {
        match arch.pointer_size() {
            4 => TargetNInt(i64::from(raw as u32 as i32)),
            _ => TargetNInt(raw as i64),
        }
    }
}

impl Scalar for TargetPointer {
    const DATA_TYPE: DataType = DataType::Pointer;

    fn width(arch: &Architecture) -> u32 {
        arch.pointer_size()
    }

    fn decode(raw: u64, arch: &Architecture) -> Self {
        TargetPointer::new(arch.pointer_width.truncate(raw))
    }
}
