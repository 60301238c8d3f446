//! Host-native fixed-size field encoding, used by command payloads that are
//! a bare `H_K` struct (no POD framing at all) and by the offset-bearing
//! headers that point at POD or raw sub-objects placed after them.
//!
//! Every field here is a plain `u32` in host-native byte order; offsets are
//! byte displacements from the start of the payload a header was decoded
//! from, matching the on-wire layout in `control.c`'s `builder_add_cmd` /
//! `iter_parse_*`.

use bytes::BytesMut;

use crate::error::ControlError;

pub(crate) fn put_u32(buf: &mut BytesMut, value: u32) {
    buf.extend_from_slice(&value.to_ne_bytes());
}

pub(crate) fn get_u32(payload: &[u8], offset: usize) -> Result<u32, ControlError> {
    let end = offset + 4;
    let raw = payload
        .get(offset..end)
        .ok_or(ControlError::BodyTruncated { needed: end, available: payload.len() })?;
    Ok(u32::from_ne_bytes(raw.try_into().expect("slice is exactly 4 bytes")))
}

/// Resolves a non-zero offset field to the sub-slice of `payload` starting
/// there. Rejects an offset that does not land strictly inside `payload`.
/// Callers handle `0` ("absent") themselves before reaching this.
pub(crate) fn slice_from(payload: &[u8], offset: u32) -> Result<&[u8], ControlError> {
    let start = offset as usize;
    if start >= payload.len() {
        return Err(ControlError::OffsetOutOfRange { offset: start, len: payload.len() });
    }
    Ok(&payload[start..])
}

/// Resolves an offset + length pair to the exact sub-slice of `payload`
/// they span, for fixed-size tails whose length is carried separately
/// (rather than self-described, the way a POD value is).
pub(crate) fn slice_at(payload: &[u8], offset: u32, len: u32) -> Result<&[u8], ControlError> {
    let start = offset as usize;
    let end = start + len as usize;
    payload
        .get(start..end)
        .ok_or(ControlError::OffsetOutOfRange { offset: start, len: payload.len() })
}
