use std::os::fd::RawFd;

use bytes::{Bytes, BytesMut};

use crate::fd_table::FdTable;
use crate::header::FixedHeader;
use crate::message::MessageBody;

/// Assembles a batch of control messages and the fd table they reference
/// into one buffer ready to hand to the transport layer.
///
/// Each [`add_message`](Self::add_message) call encodes its header and body
/// into a scratch buffer before appending it, so a message is either fully
/// present in the output or not appended at all — there is no way to observe
/// a partially written frame.
#[derive(Debug, Default)]
pub struct ControlBuilder {
    buf: BytesMut,
    fds: FdTable,
}

impl ControlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `fd` in the shared fd table, returning the index messages
    /// in this batch should reference.
    pub fn add_fd(&mut self, fd: RawFd, owned: bool) -> u32 {
        self.fds.add_fd(fd, owned)
    }

    pub fn add_message(&mut self, body: &MessageBody) -> &mut Self {
        let encoded = body.encode();
        let header = FixedHeader { command: body.command(), body_len: encoded.len() as u32 };
        let mut frame = BytesMut::with_capacity(encoded.len() + 6);
        header.encode(&mut frame);
        frame.extend_from_slice(&encoded);
        self.buf.extend_from_slice(&frame);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Consumes the builder, returning the encoded frame stream and the fd
    /// table its messages reference by index.
    pub fn finish(self) -> (Bytes, FdTable) {
        (self.buf.freeze(), self.fds)
    }
}
