//! Little-endian integer codec for cross-process payloads
//!
//! Target fields are fixed-width (4 or 8 bytes) while the values written
//! into them are arbitrary constants. `encode_minimal` produces the shortest
//! exact encoding; callers size it for the destination with `pad_to_width`
//! before handing it to the transfer layer, which never pads on its own.

use crate::core::types::{MemoryError, MemoryResult};

/// Widest integer the codec decodes
pub const MAX_WIDTH: usize = std::mem::size_of::<u64>();

/// Encodes `value` as the shortest little-endian byte sequence.
///
/// Zero encodes as a single `0x00` byte, never as an empty buffer.
pub fn encode_minimal(value: u64) -> Vec<u8> {
    let bits = u64::BITS - value.leading_zeros();
    let len = (bits as usize).div_ceil(8).max(1);
    value.to_le_bytes()[..len].to_vec()
}

/// Zero-extends a little-endian encoding to exactly `width` bytes.
pub fn pad_to_width(bytes: &[u8], width: usize) -> MemoryResult<Vec<u8>> {
    if bytes.len() > width {
        return Err(MemoryError::buffer_too_small(width, bytes.len()));
    }

    let mut padded = Vec::with_capacity(width);
    padded.extend_from_slice(bytes);
    padded.resize(width, 0);
    Ok(padded)
}

/// Encodes `value` into exactly `width` bytes, failing if it does not fit.
pub fn encode_fixed(value: u64, width: usize) -> MemoryResult<Vec<u8>> {
    pad_to_width(&encode_minimal(value), width)
}

/// Decodes a little-endian buffer of 1 to 8 bytes.
pub fn decode_fixed(buffer: &[u8]) -> MemoryResult<u64> {
    if buffer.is_empty() || buffer.len() > MAX_WIDTH {
        return Err(MemoryError::UnsupportedWidth(buffer.len()));
    }

    let mut raw = [0u8; MAX_WIDTH];
    raw[..buffer.len()].copy_from_slice(buffer);
    Ok(u64::from_le_bytes(raw))
}
