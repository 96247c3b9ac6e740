//! Process handle wrapper implementing `ProcessMemory`

use crate::core::types::{Address, MemoryResult, ProcessId};
use crate::memory::{ProcessMemory, ProtectionFlags};
use crate::windows::bindings::kernel32;
use crate::windows::types::Handle;
use std::fmt;
use std::io;

/// Access rights for process handles
#[derive(Debug, Clone, Copy)]
pub struct ProcessAccess {
    value: u32,
}

impl ProcessAccess {
    /// Query information access
    pub const QUERY_INFORMATION: Self = Self { value: 0x0400 };
    /// Read memory access
    pub const VM_READ: Self = Self { value: 0x0010 };
    /// Write memory access
    pub const VM_WRITE: Self = Self { value: 0x0020 };
    /// Protection changes and other VM operations
    pub const VM_OPERATION: Self = Self { value: 0x0008 };

    /// Combine access rights
    pub fn combine(rights: &[Self]) -> Self {
        let value = rights.iter().fold(0, |acc, right| acc | right.value);
        Self { value }
    }

    /// Get raw value
    pub fn value(&self) -> u32 {
        self.value
    }
}

/// Owned handle to the target process
pub struct ProcessHandle {
    handle: Handle,
    pid: ProcessId,
    access: ProcessAccess,
}

impl ProcessHandle {
    /// Open a process with specified access rights
    pub fn open(pid: ProcessId, access: ProcessAccess) -> MemoryResult<Self> {
        let raw_handle = kernel32::open_process(pid, access.value())?;
        Ok(ProcessHandle {
            handle: Handle::new(raw_handle),
            pid,
            access,
        })
    }

    /// Open a process for protected reads and writes
    pub fn open_for_read_write(pid: ProcessId) -> MemoryResult<Self> {
        Self::open(
            pid,
            ProcessAccess::combine(&[
                ProcessAccess::QUERY_INFORMATION,
                ProcessAccess::VM_READ,
                ProcessAccess::VM_WRITE,
                ProcessAccess::VM_OPERATION,
            ]),
        )
    }

    /// Get the process ID
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Get the raw handle
    ///
    /// # Safety
    /// The returned handle is only valid as long as this ProcessHandle exists
    pub unsafe fn raw(&self) -> winapi::um::winnt::HANDLE {
        self.handle.raw()
    }

    /// Check if handle is valid
    pub fn is_valid(&self) -> bool {
        !self.handle.is_null()
    }

    fn ensure_valid(&self) -> io::Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Process handle is null",
            ))
        }
    }
}

impl ProcessMemory for ProcessHandle {
    fn read_memory(&self, address: Address, buffer: &mut [u8]) -> io::Result<usize> {
        self.ensure_valid()?;
        unsafe { kernel32::read_process_memory(self.handle.raw(), address.as_usize(), buffer) }
    }

    fn write_memory(&self, address: Address, data: &[u8]) -> io::Result<usize> {
        self.ensure_valid()?;
        unsafe { kernel32::write_process_memory(self.handle.raw(), address.as_usize(), data) }
    }

    fn protect_memory(
        &self,
        address: Address,
        size: usize,
        protection: ProtectionFlags,
    ) -> MemoryResult<ProtectionFlags> {
        self.ensure_valid()?;
        let previous = unsafe {
            kernel32::virtual_protect_ex(
                self.handle.raw(),
                address.as_usize(),
                size,
                protection.raw(),
            )?
        };
        Ok(ProtectionFlags::new(previous))
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("valid", &self.is_valid())
            .field("access", &format!("0x{:X}", self.access.value()))
            .finish()
    }
}
