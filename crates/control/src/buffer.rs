use bytes::{Bytes, BytesMut};

use crate::error::ControlError;
use crate::fd_table::FdTable;

/// The byte region and fd table backing one control-channel exchange.
///
/// Mirrors the original's reusable `SpaStackControl`: rather than allocating
/// a fresh buffer for every read or write, a `Buffer` is cleared and refilled
/// across calls. Refilling with a payload smaller than what is already
/// buffered is rejected outright, since a caller that received a short read
/// almost certainly handed us a truncated message rather than an
/// intentionally shorter one.
#[derive(Debug, Default)]
pub struct Buffer {
    data: BytesMut,
    fds: FdTable,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves room for at least `min_bytes` additional bytes without
    /// growing the buffer's logical length.
    pub fn reserve(&mut self, min_bytes: usize) {
        self.data.reserve(min_bytes);
    }

    /// Replaces the buffered payload. Rejects shrinking a non-empty buffer,
    /// matching `spa_control_iter_set_data`'s refusal to accept a smaller
    /// size than what is already recorded.
    pub fn set_payload(&mut self, data: &[u8]) -> Result<(), ControlError> {
        if !self.data.is_empty() && data.len() < self.data.len() {
            return Err(ControlError::BufferShrink { current: self.data.len(), requested: data.len() });
        }
        self.data.clear();
        self.data.extend_from_slice(data);
        Ok(())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn fds(&self) -> &FdTable {
        &self.fds
    }

    pub fn fds_mut(&mut self) -> &mut FdTable {
        &mut self.fds
    }

    /// Empties the byte region and closes every owned fd.
    pub fn clear(&mut self) {
        self.data.clear();
        self.fds.clear();
    }

    pub fn freeze(self) -> (Bytes, FdTable) {
        (self.data.freeze(), self.fds)
    }
}
