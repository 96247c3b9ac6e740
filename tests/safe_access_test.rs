//! Protected access against a simulated target

use autohop::core::types::{Address, MemoryError, TransferDirection};
use autohop::memory::{ProtectionFlags, SafeAccess, SafeMemoryAccess, SimulatedProcess};
use pretty_assertions::assert_eq;

const CODE: Address = Address::new(0x0040_0000);

fn read_only_target() -> SimulatedProcess {
    let target = SimulatedProcess::new();
    target.map_region(CODE, 0x1000, ProtectionFlags::read_only());
    target
}

#[test]
fn test_write_into_read_only_page() {
    let target = read_only_target();
    let access = SafeMemoryAccess::new(&target);

    access.safe_write(CODE.offset(0x10), &[0xDE, 0xAD]).unwrap();

    assert_eq!(target.peek(CODE.offset(0x10), 2), Some(vec![0xDE, 0xAD]));
    assert_eq!(target.protection_at(CODE), Some(ProtectionFlags::read_only()));

    let log = target.protection_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].protection, ProtectionFlags::execute_read_write());
    assert_eq!(log[1].protection, ProtectionFlags::read_only());
    assert_eq!(log[0].address, CODE.offset(0x10));
    assert_eq!(log[0].size, 2);
}

#[test]
fn test_unmapped_address_fails_before_any_transfer() {
    let target = read_only_target();
    let access = SafeMemoryAccess::new(&target);

    let err = access.safe_write(Address::new(0x10), &[1]).unwrap_err();
    assert!(matches!(err, MemoryError::ProtectionError(_)));
    assert_eq!(target.write_count(), 0);
    assert!(target.protection_log().is_empty());
}

#[test]
fn test_short_write_is_reported_with_counts() {
    let target = read_only_target();
    target.set_short_writes(Some(3));
    let access = SafeMemoryAccess::new(&target);

    let err = access.write_u32(CODE, 5).unwrap_err();
    match err {
        MemoryError::PartialTransfer {
            direction,
            requested,
            transferred,
            ..
        } => {
            assert_eq!(direction, TransferDirection::Write);
            assert_eq!(requested, 4);
            assert_eq!(transferred, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(target.protection_at(CODE), Some(ProtectionFlags::read_only()));
}

#[test]
fn test_os_failure_keeps_error_code() {
    let target = read_only_target();
    target.fail_next_reads(1);
    let access = SafeMemoryAccess::new(&target);

    let err = access.read_u32(CODE).unwrap_err();
    match err {
        MemoryError::TransferFailed { source, .. } => {
            assert_eq!(source.raw_os_error(), Some(SimulatedProcess::ERROR_PARTIAL_COPY));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(target.protection_at(CODE), Some(ProtectionFlags::read_only()));

    // The fault was consumed
    assert_eq!(access.read_u32(CODE).unwrap(), 0);
}

#[test]
fn test_pointer_then_field() {
    let target = read_only_target();
    let heap = Address::new(0x0200_0000);
    target.map_region(heap, 0x200, ProtectionFlags::read_write());
    target.poke(CODE.offset(0x8), &(heap.as_usize() as u64).to_le_bytes());
    target.poke(heap.offset(0x104), &0x0000_8000u32.to_le_bytes());

    let access = SafeMemoryAccess::new(&target);
    let player = Address::try_from(access.read_u64(CODE.offset(0x8)).unwrap()).unwrap();
    assert_eq!(player, heap);
    assert_eq!(access.read_u32(player.offset(0x104)).unwrap(), 0x8000);
}
