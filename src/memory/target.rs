//! The seam between the memory layer and a concrete target process

use super::protection::ProtectionFlags;
use crate::core::types::{Address, MemoryResult};
use std::io;

/// Primitive access to another process's address space.
///
/// Implemented by the Windows `ProcessHandle` and by `SimulatedProcess`.
/// The memory layer only borrows an implementor; it never owns or closes it.
pub trait ProcessMemory {
    /// Copies bytes out of the target into `buffer`.
    ///
    /// Returns the byte count the OS reports as copied, which may be short.
    fn read_memory(&self, address: Address, buffer: &mut [u8]) -> io::Result<usize>;

    /// Copies `data` into the target at `address`.
    ///
    /// Returns the byte count the OS reports as copied, which may be short.
    fn write_memory(&self, address: Address, data: &[u8]) -> io::Result<usize>;

    /// Sets the protection of `[address, address + size)` and returns the previous mode.
    fn protect_memory(
        &self,
        address: Address,
        size: usize,
        protection: ProtectionFlags,
    ) -> MemoryResult<ProtectionFlags>;
}
