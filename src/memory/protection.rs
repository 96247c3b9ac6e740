//! Memory protection flags and the scoped relax/restore guard

use super::target::ProcessMemory;
use crate::core::types::{Address, MemoryResult};
use std::fmt;
use tracing::{trace, warn};

/// Memory protection flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectionFlags {
    value: u32,
}

impl ProtectionFlags {
    pub const PAGE_NOACCESS: u32 = 0x01;
    pub const PAGE_READONLY: u32 = 0x02;
    pub const PAGE_READWRITE: u32 = 0x04;
    pub const PAGE_WRITECOPY: u32 = 0x08;
    pub const PAGE_EXECUTE: u32 = 0x10;
    pub const PAGE_EXECUTE_READ: u32 = 0x20;
    pub const PAGE_EXECUTE_READWRITE: u32 = 0x40;
    pub const PAGE_EXECUTE_WRITECOPY: u32 = 0x80;
    pub const PAGE_GUARD: u32 = 0x100;

    /// Create new protection flags
    pub const fn new(value: u32) -> Self {
        ProtectionFlags { value }
    }

    /// No access protection
    pub const fn no_access() -> Self {
        ProtectionFlags::new(Self::PAGE_NOACCESS)
    }

    /// Read-only protection
    pub const fn read_only() -> Self {
        ProtectionFlags::new(Self::PAGE_READONLY)
    }

    /// Read-write protection
    pub const fn read_write() -> Self {
        ProtectionFlags::new(Self::PAGE_READWRITE)
    }

    /// Execute-read protection
    pub const fn execute_read() -> Self {
        ProtectionFlags::new(Self::PAGE_EXECUTE_READ)
    }

    /// Fully permissive protection used while a transfer is in flight
    pub const fn execute_read_write() -> Self {
        ProtectionFlags::new(Self::PAGE_EXECUTE_READWRITE)
    }

    /// Check if protection allows reading
    pub fn is_readable(&self) -> bool {
        let base = self.value & 0xFF;
        base != Self::PAGE_NOACCESS && base != Self::PAGE_EXECUTE && !self.is_guard()
    }

    /// Check if protection allows writing
    pub fn is_writable(&self) -> bool {
        (self.value
            & (Self::PAGE_READWRITE
                | Self::PAGE_WRITECOPY
                | Self::PAGE_EXECUTE_READWRITE
                | Self::PAGE_EXECUTE_WRITECOPY))
            != 0
            && !self.is_guard()
    }

    /// Check if guard page flag is set
    pub fn is_guard(&self) -> bool {
        (self.value & Self::PAGE_GUARD) != 0
    }

    /// Get the raw protection value
    pub const fn raw(&self) -> u32 {
        self.value
    }
}

impl fmt::Display for ProtectionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.value & 0xFF {
            Self::PAGE_NOACCESS => "NOACCESS",
            Self::PAGE_READONLY => "R",
            Self::PAGE_READWRITE => "RW",
            Self::PAGE_WRITECOPY => "WC",
            Self::PAGE_EXECUTE => "X",
            Self::PAGE_EXECUTE_READ => "RX",
            Self::PAGE_EXECUTE_READWRITE => "RWX",
            Self::PAGE_EXECUTE_WRITECOPY => "WCX",
            _ => "UNKNOWN",
        };
        write!(f, "{}", base)?;
        if self.is_guard() {
            write!(f, "+G")?;
        }
        Ok(())
    }
}

/// Protection mode a region had before it was relaxed.
///
/// Not `Clone`: it is handed back to the OS exactly once, by the guard that made it.
#[derive(Debug)]
pub(crate) struct ProtectionToken(ProtectionFlags);

impl ProtectionToken {
    pub(crate) fn flags(&self) -> ProtectionFlags {
        self.0
    }
}

/// A region relaxed to `PAGE_EXECUTE_READWRITE` for the lifetime of the guard.
///
/// `restore` hands the token back explicitly and reports the outcome.
/// Otherwise dropping the guard restores the previous protection, on normal
/// return, on `?` early return, and while unwinding from a panic.
pub(crate) struct ProtectionGuard<'a, P: ProcessMemory + ?Sized> {
    process: &'a P,
    address: Address,
    size: usize,
    token: Option<ProtectionToken>,
}

impl<'a, P: ProcessMemory + ?Sized> ProtectionGuard<'a, P> {
    /// Relax `[address, address + size)` and remember what it was
    pub(crate) fn relax(process: &'a P, address: Address, size: usize) -> MemoryResult<Self> {
        let previous =
            process.protect_memory(address, size, ProtectionFlags::execute_read_write())?;
        trace!(%address, size, previous = %previous, "relaxed protection");

        Ok(ProtectionGuard {
            process,
            address,
            size,
            token: Some(ProtectionToken(previous)),
        })
    }

    /// Protection the region will be returned to
    pub(crate) fn previous(&self) -> ProtectionFlags {
        self.token
            .as_ref()
            .map_or(ProtectionFlags::execute_read_write(), ProtectionToken::flags)
    }

    /// Restore now instead of on drop
    pub(crate) fn restore(mut self) -> MemoryResult<()> {
        match self.token.take() {
            Some(token) => self.put_back(token),
            None => Ok(()),
        }
    }

    fn put_back(&self, token: ProtectionToken) -> MemoryResult<()> {
        let previous = token.flags();
        self.process
            .protect_memory(self.address, self.size, previous)?;
        trace!(address = %self.address, size = self.size, restored = %previous, "restored protection");
        Ok(())
    }
}

impl<P: ProcessMemory + ?Sized> Drop for ProtectionGuard<'_, P> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            let previous = token.flags();
            if let Err(e) = self.put_back(token) {
                warn!(
                    address = %self.address,
                    size = self.size,
                    "failed to restore protection to {}: {}",
                    previous,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::simulated::SimulatedProcess;
    use std::panic::{self, AssertUnwindSafe};

    const BASE: Address = Address::new(0x10000);

    fn target(protection: ProtectionFlags) -> SimulatedProcess {
        let target = SimulatedProcess::new();
        target.map_region(BASE, 0x1000, protection);
        target
    }

    #[test]
    fn test_protection_flags() {
        let flags = ProtectionFlags::read_write();
        assert!(flags.is_readable());
        assert!(flags.is_writable());
        assert!(!flags.is_guard());

        let rwx = ProtectionFlags::execute_read_write();
        assert!(rwx.is_readable());
        assert!(rwx.is_writable());

        assert!(!ProtectionFlags::no_access().is_readable());
        assert!(!ProtectionFlags::read_only().is_writable());
        assert!(!ProtectionFlags::new(ProtectionFlags::PAGE_READWRITE | ProtectionFlags::PAGE_GUARD).is_readable());
    }

    #[test]
    fn test_protection_display() {
        assert_eq!(ProtectionFlags::read_only().to_string(), "R");
        assert_eq!(ProtectionFlags::execute_read_write().to_string(), "RWX");
        assert_eq!(
            ProtectionFlags::new(ProtectionFlags::PAGE_READWRITE | ProtectionFlags::PAGE_GUARD)
                .to_string(),
            "RW+G"
        );
    }

    #[test]
    fn test_guard_relaxes_then_restores() {
        let target = target(ProtectionFlags::read_only());

        {
            let guard = ProtectionGuard::relax(&target, BASE, 4).unwrap();
            assert_eq!(guard.previous(), ProtectionFlags::read_only());
            assert_eq!(
                target.protection_at(BASE),
                Some(ProtectionFlags::execute_read_write())
            );
        }

        assert_eq!(target.protection_at(BASE), Some(ProtectionFlags::read_only()));
        let log = target.protection_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].protection, ProtectionFlags::read_only());
    }

    #[test]
    fn test_explicit_restore_happens_once() {
        let target = target(ProtectionFlags::read_write());

        let guard = ProtectionGuard::relax(&target, BASE, 8).unwrap();
        guard.restore().unwrap();

        assert_eq!(target.protection_at(BASE), Some(ProtectionFlags::read_write()));
        assert_eq!(target.protection_log().len(), 2);
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        fn failing(target: &SimulatedProcess) -> MemoryResult<()> {
            let _relaxed = ProtectionGuard::relax(target, BASE, 4)?;
            Err(crate::core::types::MemoryError::ProtectionError(
                "simulated".to_string(),
            ))
        }

        let target = target(ProtectionFlags::execute_read());
        assert!(failing(&target).is_err());
        assert_eq!(
            target.protection_at(BASE),
            Some(ProtectionFlags::execute_read())
        );
    }

    #[test]
    fn test_guard_restores_while_unwinding() {
        let target = target(ProtectionFlags::read_only());

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _relaxed = ProtectionGuard::relax(&target, BASE, 4).unwrap();
            panic!("transfer blew up");
        }));

        assert!(result.is_err());
        assert_eq!(target.protection_at(BASE), Some(ProtectionFlags::read_only()));
    }

    #[test]
    fn test_relax_unmapped_region_fails() {
        let target = SimulatedProcess::new();
        let result = ProtectionGuard::relax(&target, BASE, 4);
        assert!(result.is_err());
        assert!(target.protection_log().is_empty());
    }
}
