//! Protected memory access: relax, transfer, always restore
//!
//! `SafeAccess` is the only surface the rest of the crate uses to touch
//! target memory. Each call relaxes the region's protection for exactly the
//! duration of one raw transfer and restores it before returning. A transfer
//! error takes precedence over a failed restore; otherwise the restore error
//! is returned.

use super::protection::ProtectionGuard;
use super::target::ProcessMemory;
use super::transfer;
use crate::core::codec;
use crate::core::types::{Address, MemoryError, MemoryResult, TransferDirection};
use tracing::debug;

/// Protected reads and writes against a target process
pub trait SafeAccess {
    /// Read `length` bytes at `address`
    fn safe_read(&self, address: Address, length: usize) -> MemoryResult<Vec<u8>>;

    /// Write every byte of `data` at `address`
    fn safe_write(&self, address: Address, data: &[u8]) -> MemoryResult<()>;

    /// Read a 4-byte little-endian field
    fn read_u32(&self, address: Address) -> MemoryResult<u32> {
        let bytes = self.safe_read(address, 4)?;
        Ok(codec::decode_fixed(&bytes)? as u32)
    }

    /// Read an 8-byte little-endian field
    fn read_u64(&self, address: Address) -> MemoryResult<u64> {
        let bytes = self.safe_read(address, 8)?;
        codec::decode_fixed(&bytes)
    }

    /// Write a 4-byte little-endian field
    fn write_u32(&self, address: Address, value: u32) -> MemoryResult<()> {
        let payload = codec::encode_fixed(u64::from(value), 4)?;
        self.safe_write(address, &payload)
    }
}

impl<T: SafeAccess + ?Sized> SafeAccess for &T {
    fn safe_read(&self, address: Address, length: usize) -> MemoryResult<Vec<u8>> {
        (**self).safe_read(address, length)
    }

    fn safe_write(&self, address: Address, data: &[u8]) -> MemoryResult<()> {
        (**self).safe_write(address, data)
    }
}

/// `SafeAccess` over a borrowed process
pub struct SafeMemoryAccess<'a, P: ProcessMemory + ?Sized> {
    process: &'a P,
}

impl<'a, P: ProcessMemory + ?Sized> SafeMemoryAccess<'a, P> {
    /// Create a new safe accessor borrowing `process`
    pub fn new(process: &'a P) -> Self {
        SafeMemoryAccess { process }
    }

    /// Get the borrowed process
    pub fn process(&self) -> &P {
        self.process
    }
}

impl<P: ProcessMemory + ?Sized> SafeAccess for SafeMemoryAccess<'_, P> {
    fn safe_read(&self, address: Address, length: usize) -> MemoryResult<Vec<u8>> {
        if length == 0 {
            return Err(MemoryError::EmptyTransfer(TransferDirection::Read));
        }
        address.checked_offset(length)?;

        let relaxed = ProtectionGuard::relax(self.process, address, length)?;
        let read = transfer::read_raw(self.process, address, length);
        let restored = relaxed.restore();
        let (buffer, _) = read?;
        restored?;
        Ok(buffer)
    }

    fn safe_write(&self, address: Address, data: &[u8]) -> MemoryResult<()> {
        if data.is_empty() {
            return Err(MemoryError::EmptyTransfer(TransferDirection::Write));
        }
        address.checked_offset(data.len())?;

        let relaxed = ProtectionGuard::relax(self.process, address, data.len())?;
        debug!(%address, len = data.len(), previous = %relaxed.previous(), "safe_write");
        let written = transfer::write_raw(self.process, address, data);
        let restored = relaxed.restore();
        written?;
        restored
    }
}
