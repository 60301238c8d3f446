use bytes::{Bytes, BytesMut};

use crate::error::ControlError;
use crate::message::port::Direction;
use crate::raw::{get_u32, put_u32};

/// Registers a block of shared memory (identified by an fd table index) for
/// use by a port's buffers. Fixed-size payload: six `u32` fields, no
/// sub-objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddMem {
    pub port_id: u32,
    pub mem_id: u32,
    pub fd_index: u32,
    pub flags: u32,
    pub offset: u32,
    pub size: u32,
}

impl AddMem {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(24);
        for field in [self.port_id, self.mem_id, self.fd_index, self.flags, self.offset, self.size] {
            put_u32(&mut buf, field);
        }
        buf.freeze()
    }

    pub fn decode(body: &[u8]) -> Result<Self, ControlError> {
        Ok(Self {
            port_id: get_u32(body, 0)?,
            mem_id: get_u32(body, 4)?,
            fd_index: get_u32(body, 8)?,
            flags: get_u32(body, 12)?,
            offset: get_u32(body, 16)?,
            size: get_u32(body, 20)?,
        })
    }
}

/// Releases a previously registered memory block. Fixed-size payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveMem {
    pub port_id: u32,
    pub mem_id: u32,
}

impl RemoveMem {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(8);
        put_u32(&mut buf, self.port_id);
        put_u32(&mut buf, self.mem_id);
        buf.freeze()
    }

    pub fn decode(body: &[u8]) -> Result<Self, ControlError> {
        Ok(Self { port_id: get_u32(body, 0)?, mem_id: get_u32(body, 4)? })
    }
}

/// One buffer's worth of memory: which registered memory block backs it,
/// and the offset/size slice of that block it occupies. Packed as a fixed
/// 12-byte record inside [`UseBuffers`]'s array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSpec {
    pub mem_id: u32,
    pub offset: u32,
    pub size: u32,
}

const BUFFER_SPEC_LEN: usize = 12;

impl BufferSpec {
    fn to_bytes(self) -> [u8; BUFFER_SPEC_LEN] {
        let mut out = [0u8; BUFFER_SPEC_LEN];
        out[0..4].copy_from_slice(&self.mem_id.to_ne_bytes());
        out[4..8].copy_from_slice(&self.offset.to_ne_bytes());
        out[8..12].copy_from_slice(&self.size.to_ne_bytes());
        out
    }

    fn from_bytes(raw: &[u8]) -> Result<Self, ControlError> {
        if raw.len() < BUFFER_SPEC_LEN {
            return Err(ControlError::BodyTruncated { needed: BUFFER_SPEC_LEN, available: raw.len() });
        }
        let read = |o: usize| u32::from_ne_bytes(raw[o..o + 4].try_into().expect("checked length"));
        Ok(Self { mem_id: read(0), offset: read(4), size: read(8) })
    }
}

const USE_BUFFERS_HEADER_LEN: usize = 16;

/// Hands a port the set of buffers it should use, each backed by a slice of
/// a previously registered memory block.
///
/// Wire layout: `{port_id, direction, n_buffers, buffers_offset}` followed
/// immediately by `n_buffers` packed [`BufferSpec`] records (`buffers_offset`
/// is always `sizeof(header)`, since the array — possibly empty — is the
/// only thing that ever follows the header).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseBuffers {
    pub port_id: u32,
    pub direction: Direction,
    pub buffers: Vec<BufferSpec>,
}

impl UseBuffers {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(USE_BUFFERS_HEADER_LEN + self.buffers.len() * BUFFER_SPEC_LEN);
        put_u32(&mut buf, self.port_id);
        put_u32(&mut buf, self.direction.as_u32());
        put_u32(&mut buf, self.buffers.len() as u32);
        put_u32(&mut buf, USE_BUFFERS_HEADER_LEN as u32);
        for buffer in &self.buffers {
            buf.extend_from_slice(&buffer.to_bytes());
        }
        buf.freeze()
    }

    pub fn decode(body: &[u8]) -> Result<Self, ControlError> {
        let port_id = get_u32(body, 0)?;
        let direction = Direction::from_u32(get_u32(body, 4)?)?;
        let n_buffers = get_u32(body, 8)? as usize;
        let buffers_offset = get_u32(body, 12)? as usize;
        let mut buffers = Vec::with_capacity(n_buffers);
        for i in 0..n_buffers {
            let start = buffers_offset + i * BUFFER_SPEC_LEN;
            let record = body
                .get(start..start + BUFFER_SPEC_LEN)
                .ok_or(ControlError::OffsetOutOfRange { offset: start, len: body.len() })?;
            buffers.push(BufferSpec::from_bytes(record)?);
        }
        Ok(Self { port_id, direction, buffers })
    }
}

/// Marks a buffer as ready for processing (queued for playback/capture).
/// Fixed-size payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessBuffer {
    pub port_id: u32,
    pub buffer_id: u32,
}

impl ProcessBuffer {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(8);
        put_u32(&mut buf, self.port_id);
        put_u32(&mut buf, self.buffer_id);
        buf.freeze()
    }

    pub fn decode(body: &[u8]) -> Result<Self, ControlError> {
        Ok(Self { port_id: get_u32(body, 0)?, buffer_id: get_u32(body, 4)? })
    }
}
