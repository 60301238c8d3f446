//! Variable-length unsigned integer codec.
//!
//! Lengths are written most-significant 7-bit group first, with the
//! continuation bit (0x80) set on every byte except the last. This mirrors
//! the length prefix used by the original control-channel framing, which
//! reads a length by accumulating `(len << 7) | (byte & 0x7f)` until it sees
//! a byte with the high bit clear.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::error::WireError;

const CONTINUATION_BIT: u8 = 0x80;
const DATA_MASK: u8 = 0x7f;
const DATA_BITS: u32 = 7;

/// Maximum number of bytes a `u32` varint can occupy (`ceil(32 / 7)`).
pub const VARINT_MAX_BYTES: usize = 5;

/// Returns the number of bytes `encode_varint` would write for `value`.
pub fn varint_len(value: u32) -> usize {
    if value == 0 {
        return 1;
    }
    let bits = 32 - value.leading_zeros();
    (bits as usize).div_ceil(DATA_BITS as usize)
}

/// Writes `value` to `dst` as a most-significant-group-first varint.
pub fn encode_varint(value: u32, dst: &mut BytesMut) {
    let len = varint_len(value);
    for i in (0..len).rev() {
        let group = ((value >> (DATA_BITS * i as u32)) & DATA_MASK as u32) as u8;
        let byte = if i > 0 { group | CONTINUATION_BIT } else { group };
        dst.put_u8(byte);
    }
}

/// Reads a varint from the front of `src`, advancing its cursor past the
/// bytes consumed.
pub fn decode_varint(src: &mut Bytes) -> Result<u32, WireError> {
    let mut value: u32 = 0;
    for consumed in 0..VARINT_MAX_BYTES {
        if !src.has_remaining() {
            return Err(WireError::BufferTooShort { expected: consumed + 1, actual: consumed });
        }
        let byte = src.get_u8();
        value = (value << DATA_BITS) | (byte & DATA_MASK) as u32;
        if byte & CONTINUATION_BIT == 0 {
            trace!(value, bytes = consumed + 1, "decoded varint");
            return Ok(value);
        }
    }
    Err(WireError::VarintOverflow { max: VARINT_MAX_BYTES })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: u32) -> (u32, usize) {
        let mut buf = BytesMut::new();
        encode_varint(value, &mut buf);
        let len = buf.len();
        let mut bytes = buf.freeze();
        (decode_varint(&mut bytes).unwrap(), len)
    }

    #[test]
    fn zero_encodes_as_single_byte() {
        let mut buf = BytesMut::new();
        encode_varint(0, &mut buf);
        assert_eq!(buf.as_ref(), &[0x00]);
    }

    #[test]
    fn small_value_roundtrip() {
        assert_eq!(roundtrip(4), (4, 1));
    }

    #[test]
    fn seven_bit_boundary_roundtrip() {
        assert_eq!(roundtrip(127), (127, 1));
        assert_eq!(roundtrip(128), (128, 2));
    }

    #[test]
    fn byte_length_grows_at_each_threshold() {
        let thresholds = [(0u32, 1usize), (127, 1), (128, 2), (16_383, 2), (16_384, 3)];
        for (value, expected_len) in thresholds {
            assert_eq!(varint_len(value), expected_len, "value {value}");
        }
    }

    #[test]
    fn large_value_roundtrip() {
        assert_eq!(roundtrip(0xFFFF), (0xFFFF, 3));
        assert_eq!(roundtrip(u32::MAX), (u32::MAX, 5));
    }

    #[test]
    fn decode_fails_on_truncated_source() {
        let mut bytes = Bytes::from_static(&[0x80]);
        assert!(matches!(decode_varint(&mut bytes), Err(WireError::BufferTooShort { .. })));
    }

    #[test]
    fn decode_fails_when_continuation_never_terminates() {
        let mut bytes = Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert!(matches!(decode_varint(&mut bytes), Err(WireError::VarintOverflow { .. })));
    }
}
