//! Byte codec edge cases seen at the process boundary

use autohop::core::codec::{decode_fixed, encode_fixed, encode_minimal, pad_to_width};
use autohop::core::types::MemoryError;
use pretty_assertions::assert_eq;

#[test]
fn test_control_values_fit_one_byte() {
    assert_eq!(encode_minimal(5), vec![5]);
    assert_eq!(encode_minimal(4), vec![4]);
    assert_eq!(encode_minimal(0), vec![0]);
}

#[test]
fn test_control_write_is_padded_to_field_width() {
    assert_eq!(encode_fixed(5, 4).unwrap(), vec![5, 0, 0, 0]);
    assert_eq!(pad_to_width(&[0x4C, 0xBF], 4).unwrap(), vec![0x4C, 0xBF, 0, 0]);
}

#[test]
fn test_flag_words_decode() {
    assert_eq!(decode_fixed(&[0x00, 0x80, 0x00, 0x00]).unwrap(), 0x8000);
    assert_eq!(decode_fixed(&[0xFF; 4]).unwrap(), 0xFFFF_FFFF);
}

#[test]
fn test_oversized_input_is_rejected() {
    assert!(matches!(
        pad_to_width(&[1, 2, 3, 4, 5], 4),
        Err(MemoryError::BufferTooSmall { .. })
    ));
    assert!(decode_fixed(&[0; 9]).is_err());
    assert!(decode_fixed(&[]).is_err());
}
