//! The [`Target`] facade.

use crate::globals::GlobalCatalog;
use crate::layout::LayoutCatalog;
use crate::memory::MemoryReader;
use crate::scalar::Scalar;
use datacontract_types::{
    Architecture, FieldInfo, ReadError, ReaderError, Result, TargetConfig, TargetNInt,
    TargetNUInt, TargetPointer, TypeInfo, TypeSelector,
};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, trace, warn};

/// Upper bound on a single string read.
const STRING_CHUNK: u64 = 256;
const STRING_PAGE: u64 = 0x1000;

/// A constructed, immutable view of a target's published contracts.
///
/// All lookups read state fixed at construction, so a `Target` can be
/// shared across threads without locking. Only [`MemoryReader`] calls may
/// block.
pub struct Target {
    architecture: Architecture,
    layouts: LayoutCatalog,
    globals: GlobalCatalog,
    contracts: BTreeSet<String>,
    reader: Box<dyn MemoryReader>,
}

impl Target {
    /// Construct a target from a contract bundle.
    ///
    /// Either the whole bundle is accepted or construction fails with
    /// [`ReadError::CorruptContract`]; there is no partially built target.
    pub fn new(config: TargetConfig, reader: impl MemoryReader + 'static) -> Result<Self> {
        let TargetConfig {
            architecture,
            types,
            globals,
            indirection_table,
            contracts,
        } = config;

        let layouts = LayoutCatalog::new(types)?;
        let globals = GlobalCatalog::new(globals, indirection_table)?;

        debug!(
            %architecture,
            types = layouts.len(),
            globals = globals.len(),
            contracts = contracts.len(),
            "target constructed"
        );

        Ok(Self {
            architecture,
            layouts,
            globals,
            contracts,
            reader: Box::new(reader),
        })
    }

    pub fn architecture(&self) -> &Architecture {
        &self.architecture
    }

    pub fn pointer_size(&self) -> u32 {
        self.architecture.pointer_size()
    }

    pub fn layouts(&self) -> &LayoutCatalog {
        &self.layouts
    }

    pub fn globals(&self) -> &GlobalCatalog {
        &self.globals
    }

    // ── Contracts ──

    /// Contract names the target claims to support, sorted.
    pub fn contracts(&self) -> impl Iterator<Item = &str> {
        self.contracts.iter().map(String::as_str)
    }

    pub fn supports_contract(&self, name: &str) -> bool {
        self.contracts.contains(name)
    }

    // ── Type layouts ──

    /// Look up a type layout by [`DataType`](datacontract_types::DataType)
    /// or by name.
    pub fn get_type_info<'a>(&self, selector: impl Into<TypeSelector<'a>>) -> Result<&TypeInfo> {
        self.layouts.get(selector.into())
    }

    /// Look up one field of a type.
    pub fn get_field_info<'a>(
        &self,
        selector: impl Into<TypeSelector<'a>>,
        field: &str,
    ) -> Result<&FieldInfo> {
        let selector = selector.into();
        self.layouts
            .get(selector)?
            .field(field)
            .ok_or_else(|| ReadError::FieldNotFound {
                type_name: selector.name().to_string(),
                field: field.to_string(),
            })
    }

    /// Address of `field` within an instance of the type at `base`.
    pub fn field_address<'a>(
        &self,
        base: TargetPointer,
        selector: impl Into<TypeSelector<'a>>,
        field: &str,
    ) -> Result<TargetPointer> {
        let offset = self.get_field_info(selector, field)?.offset;
        let address = base.value().wrapping_add(u64::from(offset));
        Ok(TargetPointer::new(
            self.architecture.pointer_width.truncate(address),
        ))
    }

    /// Read `field` of the instance at `base` as `T`.
    pub fn read_field<'a, T: Scalar>(
        &self,
        base: TargetPointer,
        selector: impl Into<TypeSelector<'a>>,
        field: &str,
    ) -> Result<T> {
        let address = self.field_address(base, selector, field)?;
        self.read(address)
    }

    // ── Globals ──

    /// Read a global as `T`, returning it with its declared type name.
    ///
    /// The declared type is advisory: the value is narrowed to `T`'s width
    /// whatever the global was declared as.
    pub fn read_global<T: Scalar>(&self, name: &str) -> Result<(T, Option<&str>)> {
        let global = self.globals.resolve(name, &self.architecture)?;
        Ok((T::decode(global.raw, &self.architecture), global.type_name))
    }

    /// Read a global at the target pointer width.
    pub fn read_global_pointer(&self, name: &str) -> Result<(TargetPointer, Option<&str>)> {
        self.read_global::<TargetPointer>(name)
    }

    /// Like [`read_global`](Self::read_global), but a declared type other
    /// than `T`'s is an error. Untyped globals are accepted.
    pub fn read_global_strict<T: Scalar>(&self, name: &str) -> Result<T> {
        let (value, declared) = self.read_global::<T>(name)?;
        match declared {
            Some(declared) if declared != T::DATA_TYPE.as_str() => {
                warn!(global = name, declared, requested = %T::DATA_TYPE, "declared type mismatch");
                Err(ReadError::TypeMismatch {
                    global: name.to_string(),
                    declared: declared.to_string(),
                    requested: T::DATA_TYPE.as_str().to_string(),
                })
            }
            _ => Ok(value),
        }
    }

    // ── Memory ──

    /// Read raw bytes from target memory.
    pub fn read_memory(&self, address: TargetPointer, length: u32) -> Result<Vec<u8>> {
        trace!(address = %address, length, "memory read");
        let bytes = self
            .reader
            .read(address.value(), length)
            .map_err(|source| {
                warn!(address = %address, length, error = %source, "memory read failed");
                ReadError::from_reader(address.value(), length, source)
            })?;
        if bytes.len() != length as usize {
            return Err(ReadError::from_reader(
                address.value(),
                length,
                ReaderError::ShortRead {
                    expected: length,
                    actual: bytes.len(),
                },
            ));
        }
        Ok(bytes)
    }

    /// Read a scalar from target memory in target byte order.
    pub fn read<T: Scalar>(&self, address: TargetPointer) -> Result<T> {
        let bytes = self.read_memory(address, T::width(&self.architecture))?;
        Ok(T::decode(self.architecture.assemble(&bytes), &self.architecture))
    }

    pub fn read_pointer(&self, address: TargetPointer) -> Result<TargetPointer> {
        self.read(address)
    }

    pub fn read_nuint(&self, address: TargetPointer) -> Result<TargetNUInt> {
        self.read(address)
    }

    pub fn read_nint(&self, address: TargetPointer) -> Result<TargetNInt> {
        self.read(address)
    }

    /// Read a NUL-terminated UTF-8 string of at most `max_length` bytes
    /// (terminator excluded).
    ///
    /// Bytes are fetched in chunks that never cross a page boundary. A chunk
    /// the reader cannot serve whole is retried one byte at a time, so
    /// strings ending near the edge of mapped memory still read.
    pub fn read_utf8_string(&self, address: TargetPointer, max_length: u32) -> Result<String> {
        let invalid = || ReadError::InvalidString {
            address: address.value(),
        };
        let limit = u64::from(max_length) + 1;
        let mut bytes = Vec::new();
        let mut cursor = address.value();
        while (bytes.len() as u64) < limit {
            let remaining = limit - bytes.len() as u64;
            let to_page = STRING_PAGE - cursor % STRING_PAGE;
            // bounded by STRING_CHUNK, fits in u32
            let length = remaining.min(to_page).min(STRING_CHUNK) as u32;
            let chunk = self.read_string_chunk(TargetPointer::new(cursor), length)?;
            if let Some(nul) = chunk.iter().position(|&b| b == 0) {
                bytes.extend_from_slice(&chunk[..nul]);
                return String::from_utf8(bytes).map_err(|_| invalid());
            }
            bytes.extend_from_slice(&chunk);
            cursor = self
                .architecture
                .pointer_width
                .truncate(cursor.wrapping_add(chunk.len() as u64));
        }
        Err(invalid())
    }

    fn read_string_chunk(&self, address: TargetPointer, length: u32) -> Result<Vec<u8>> {
        if length > 1 {
            match self.reader.read(address.value(), length) {
                Ok(bytes) if bytes.len() == length as usize => return Ok(bytes),
                Err(source @ (ReaderError::Cancelled | ReaderError::TimedOut)) => {
                    return Err(ReadError::from_reader(address.value(), length, source));
                }
                _ => trace!(
                    address = %address,
                    length,
                    "string chunk unavailable, reading bytewise"
                ),
            }
        }
        self.read_memory(address, 1)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("architecture", &self.architecture)
            .field("layouts", &self.layouts)
            .field("globals", &self.globals)
            .field("contracts", &self.contracts)
            .finish_non_exhaustive()
    }
}
