//! Raw cross-process copies with short-transfer detection
//!
//! These primitives do not touch page protection. Outside this module tree
//! they are only reachable through `SafeAccess`.

use super::target::ProcessMemory;
use crate::core::types::{Address, MemoryError, MemoryResult, TransferDirection};
use tracing::trace;

/// Outcome of a single cross-process copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferResult {
    /// Bytes the caller asked to move
    pub requested: usize,
    /// Bytes the OS reports as moved
    pub transferred: usize,
}

impl TransferResult {
    pub fn new(requested: usize, transferred: usize) -> Self {
        TransferResult {
            requested,
            transferred,
        }
    }

    /// A transfer only counts when every requested byte moved
    pub fn is_complete(&self) -> bool {
        self.transferred == self.requested
    }

    fn check(self, direction: TransferDirection, address: Address) -> MemoryResult<Self> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(MemoryError::partial_transfer(
                direction,
                address,
                self.requested,
                self.transferred,
            ))
        }
    }
}

/// Copy `data` into the target at `address`
pub(crate) fn write_raw<P: ProcessMemory + ?Sized>(
    process: &P,
    address: Address,
    data: &[u8],
) -> MemoryResult<TransferResult> {
    if data.is_empty() {
        return Err(MemoryError::EmptyTransfer(TransferDirection::Write));
    }

    let written = process
        .write_memory(address, data)
        .map_err(|e| MemoryError::transfer_failed(TransferDirection::Write, address, e))?;

    trace!(%address, requested = data.len(), written, payload = %hex::encode(data), "write_raw");
    TransferResult::new(data.len(), written).check(TransferDirection::Write, address)
}

/// Copy `length` bytes out of the target at `address` into a fresh buffer
pub(crate) fn read_raw<P: ProcessMemory + ?Sized>(
    process: &P,
    address: Address,
    length: usize,
) -> MemoryResult<(Vec<u8>, TransferResult)> {
    if length == 0 {
        return Err(MemoryError::EmptyTransfer(TransferDirection::Read));
    }

    let mut buffer = vec![0u8; length];
    let read = process
        .read_memory(address, &mut buffer)
        .map_err(|e| MemoryError::transfer_failed(TransferDirection::Read, address, e))?;

    let result = TransferResult::new(length, read).check(TransferDirection::Read, address)?;
    trace!(%address, length, payload = %hex::encode(&buffer), "read_raw");
    Ok((buffer, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::protection::ProtectionFlags;
    use crate::memory::simulated::SimulatedProcess;

    const BASE: Address = Address::new(0x4000);

    fn writable_target() -> SimulatedProcess {
        let target = SimulatedProcess::new();
        target.map_region(BASE, 0x100, ProtectionFlags::read_write());
        target
    }

    #[test]
    fn test_transfer_result_completeness() {
        assert!(TransferResult::new(4, 4).is_complete());
        assert!(!TransferResult::new(4, 3).is_complete());
    }

    #[test]
    fn test_write_then_read_raw() {
        let target = writable_target();

        let written = write_raw(&target, BASE, &[1, 2, 3, 4]).unwrap();
        assert_eq!(written, TransferResult::new(4, 4));

        let (bytes, read) = read_raw(&target, BASE, 4).unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 4]);
        assert!(read.is_complete());
    }

    #[test]
    fn test_short_write_is_failure() {
        let target = writable_target();
        target.set_short_writes(Some(2));

        let err = write_raw(&target, BASE, &[9, 9, 9, 9]).unwrap_err();
        assert!(matches!(
            err,
            MemoryError::PartialTransfer {
                direction: TransferDirection::Write,
                requested: 4,
                transferred: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_short_read_is_failure() {
        let target = writable_target();
        target.set_short_reads(Some(7));

        let err = read_raw(&target, BASE, 8).unwrap_err();
        assert!(matches!(
            err,
            MemoryError::PartialTransfer {
                direction: TransferDirection::Read,
                requested: 8,
                transferred: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_os_error_surfaces_unmodified() {
        let target = writable_target();
        target.fail_next_reads(1);

        match read_raw(&target, BASE, 4).unwrap_err() {
            MemoryError::TransferFailed {
                direction, source, ..
            } => {
                assert_eq!(direction, TransferDirection::Read);
                assert_eq!(
                    source.raw_os_error(),
                    Some(SimulatedProcess::ERROR_PARTIAL_COPY)
                );
            }
            other => panic!("Expected TransferFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_length_rejected() {
        let target = writable_target();
        assert!(matches!(
            write_raw(&target, BASE, &[]),
            Err(MemoryError::EmptyTransfer(TransferDirection::Write))
        ));
        assert!(matches!(
            read_raw(&target, BASE, 0),
            Err(MemoryError::EmptyTransfer(TransferDirection::Read))
        ));
    }
}
