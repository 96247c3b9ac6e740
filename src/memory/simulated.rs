//! In-memory stand-in for a target process
//!
//! Each mapped region carries its own protection and the read/write paths
//! enforce it, so a transfer only succeeds while the region is relaxed.
//! Faults can be injected to exercise short and failed transfers.

use super::protection::ProtectionFlags;
use super::target::ProcessMemory;
use crate::core::types::{Address, MemoryError, MemoryResult};
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A recorded protection change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectionEvent {
    pub address: Address,
    pub size: usize,
    pub protection: ProtectionFlags,
}

struct Region {
    base: Address,
    bytes: Vec<u8>,
    protection: ProtectionFlags,
}

impl Region {
    fn contains(&self, address: Address, len: usize) -> bool {
        let start = self.base.as_usize();
        let end = start + self.bytes.len();
        match address.as_usize().checked_add(len) {
            Some(last) => address.as_usize() >= start && last <= end,
            None => false,
        }
    }

    fn range(&self, address: Address, len: usize) -> std::ops::Range<usize> {
        let start = address.as_usize() - self.base.as_usize();
        start..start + len
    }
}

#[derive(Default)]
struct Faults {
    read_limit: Option<usize>,
    write_limit: Option<usize>,
    failing_reads: usize,
    failing_writes: usize,
}

#[derive(Default)]
struct SimState {
    regions: Vec<Region>,
    faults: Faults,
    protection_log: Vec<ProtectionEvent>,
    writes: usize,
}

impl SimState {
    fn region(&self, address: Address, len: usize) -> Option<&Region> {
        self.regions.iter().find(|r| r.contains(address, len))
    }

    fn region_mut(&mut self, address: Address, len: usize) -> Option<&mut Region> {
        self.regions.iter_mut().find(|r| r.contains(address, len))
    }
}

/// Simulated target process
#[derive(Default)]
pub struct SimulatedProcess {
    state: Mutex<SimState>,
}

impl SimulatedProcess {
    /// Windows `ERROR_PARTIAL_COPY`, reported for injected OS failures
    pub const ERROR_PARTIAL_COPY: i32 = 299;
    /// Windows `ERROR_NOACCESS`, reported for unmapped or protected memory
    pub const ERROR_NOACCESS: i32 = 998;

    /// Create an empty target with nothing mapped
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Map a zero-filled region
    pub fn map_region(&self, base: Address, size: usize, protection: ProtectionFlags) {
        self.state().regions.push(Region {
            base,
            bytes: vec![0; size],
            protection,
        });
    }

    /// Store bytes directly, ignoring protection. Returns false if unmapped.
    pub fn poke(&self, address: Address, data: &[u8]) -> bool {
        let mut state = self.state();
        match state.region_mut(address, data.len()) {
            Some(region) => {
                let range = region.range(address, data.len());
                region.bytes[range].copy_from_slice(data);
                true
            }
            None => false,
        }
    }

    /// Load bytes directly, ignoring protection
    pub fn peek(&self, address: Address, len: usize) -> Option<Vec<u8>> {
        let state = self.state();
        state
            .region(address, len)
            .map(|region| region.bytes[region.range(address, len)].to_vec())
    }

    /// Current protection of the region containing `address`
    pub fn protection_at(&self, address: Address) -> Option<ProtectionFlags> {
        self.state().region(address, 1).map(|r| r.protection)
    }

    /// Every protection change so far, in order
    pub fn protection_log(&self) -> Vec<ProtectionEvent> {
        self.state().protection_log.clone()
    }

    /// Number of writes that reached memory, complete or short
    pub fn write_count(&self) -> usize {
        self.state().writes
    }

    /// Cap every read at `limit` bytes while still reporting success
    pub fn set_short_reads(&self, limit: Option<usize>) {
        self.state().faults.read_limit = limit;
    }

    /// Cap every write at `limit` bytes while still reporting success
    pub fn set_short_writes(&self, limit: Option<usize>) {
        self.state().faults.write_limit = limit;
    }

    /// Make the next `count` reads fail at the OS level
    pub fn fail_next_reads(&self, count: usize) {
        self.state().faults.failing_reads = count;
    }

    /// Make the next `count` writes fail at the OS level
    pub fn fail_next_writes(&self, count: usize) {
        self.state().faults.failing_writes = count;
    }
}

impl ProcessMemory for SimulatedProcess {
    fn read_memory(&self, address: Address, buffer: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state();
        if state.faults.failing_reads > 0 {
            state.faults.failing_reads -= 1;
            return Err(io::Error::from_raw_os_error(Self::ERROR_PARTIAL_COPY));
        }

        let limit = state.faults.read_limit;
        let region = state
            .region(address, buffer.len())
            .filter(|r| r.protection.is_readable())
            .ok_or_else(|| io::Error::from_raw_os_error(Self::ERROR_NOACCESS))?;

        let count = limit.map_or(buffer.len(), |l| l.min(buffer.len()));
        let range = region.range(address, count);
        buffer[..count].copy_from_slice(&region.bytes[range]);
        Ok(count)
    }

    fn write_memory(&self, address: Address, data: &[u8]) -> io::Result<usize> {
        let mut state = self.state();
        if state.faults.failing_writes > 0 {
            state.faults.failing_writes -= 1;
            return Err(io::Error::from_raw_os_error(Self::ERROR_PARTIAL_COPY));
        }

        let limit = state.faults.write_limit;
        let region = state
            .region_mut(address, data.len())
            .filter(|r| r.protection.is_writable())
            .ok_or_else(|| io::Error::from_raw_os_error(Self::ERROR_NOACCESS))?;

        let count = limit.map_or(data.len(), |l| l.min(data.len()));
        let range = region.range(address, count);
        region.bytes[range].copy_from_slice(&data[..count]);
        state.writes += 1;
        Ok(count)
    }

    fn protect_memory(
        &self,
        address: Address,
        size: usize,
        protection: ProtectionFlags,
    ) -> MemoryResult<ProtectionFlags> {
        let mut state = self.state();
        let region = state.region_mut(address, size).ok_or_else(|| {
            MemoryError::ProtectionError(format!("{} (+{}) is not mapped", address, size))
        })?;

        let previous = region.protection;
        region.protection = protection;
        state.protection_log.push(ProtectionEvent {
            address,
            size,
            protection,
        });
        Ok(previous)
    }
}
