//! Memory-read capability.
//!
//! Acquiring target memory (live process, core file, remote transport) is
//! the embedder's job. The reader only needs [`MemoryReader::read`].

use datacontract_types::ReaderError;
use std::collections::BTreeMap;

/// Reads raw bytes from the target's address space.
///
/// Implementations may block. They own their own locking, retry and
/// cancellation policy; failures are passed to callers unchanged.
pub trait MemoryReader: Send + Sync {
    /// Read exactly `length` bytes at `address`.
    fn read(&self, address: u64, length: u32) -> Result<Vec<u8>, ReaderError>;
}

impl<F> MemoryReader for F
where
    F: Fn(u64, u32) -> Result<Vec<u8>, ReaderError> + Send + Sync,
{
    fn read(&self, address: u64, length: u32) -> Result<Vec<u8>, ReaderError> {
        self(address, length)
    }
}

/// A reader over captured memory regions, such as the contents of a dump.
///
/// Each read must fall entirely inside one region.
#[derive(Debug, Clone, Default)]
pub struct SnapshotMemory {
    /// Region base address → region bytes.
    regions: BTreeMap<u64, Vec<u8>>,
}

impl SnapshotMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `bytes` at `base`. A region at the same base is replaced.
    pub fn with_region(mut self, base: u64, bytes: impl Into<Vec<u8>>) -> Self {
        self.add_region(base, bytes);
        self
    }

    pub fn add_region(&mut self, base: u64, bytes: impl Into<Vec<u8>>) {
        self.regions.insert(base, bytes.into());
    }

    /// Number of mapped regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

impl MemoryReader for SnapshotMemory {
    fn read(&self, address: u64, length: u32) -> Result<Vec<u8>, ReaderError> {
        // The candidate is the last region starting at or below `address`.
        let (base, bytes) = self
            .regions
            .range(..=address)
            .next_back()
            .ok_or(ReaderError::Unmapped { address })?;
        let start =
            usize::try_from(address - base).map_err(|_| ReaderError::Unmapped { address })?;
        let end = start
            .checked_add(length as usize)
            .filter(|&end| end <= bytes.len())
            .ok_or(ReaderError::Unmapped { address })?;
        Ok(bytes[start..end].to_vec())
    }
}
