use std::os::fd::RawFd;

use tracing::trace;

/// One entry in an [`FdTable`]: a raw file descriptor plus whether this
/// table owns it (and so must close it when cleared or dropped).
///
/// The original control channel packs this ownership bit into the sign of
/// the stored fd (`fds[i] = close ? fd : -fd`) and recovers the magnitude
/// with `abs()` on read. We use an explicit struct field instead — it reads
/// the same either way and does not break on an fd numbered 0.
#[derive(Debug, Clone, Copy)]
struct FdEntry {
    fd: RawFd,
    owned: bool,
}

/// A control message's table of file descriptors, transported alongside its
/// byte payload via `SCM_RIGHTS` ancillary data. Pointer-sized indices into
/// this table (not raw fd numbers) are what appear inside the POD-encoded
/// message body.
#[derive(Debug, Default)]
pub struct FdTable {
    entries: Vec<FdEntry>,
}

impl FdTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `fd` to the table, returning its index. A previously added fd
    /// with the same raw number is reused rather than duplicated; if either
    /// the existing or the new registration claims ownership, the entry is
    /// marked owned.
    pub fn add_fd(&mut self, fd: RawFd, owned: bool) -> u32 {
        if let Some((index, entry)) = self.entries.iter_mut().enumerate().find(|(_, e)| e.fd == fd) {
            entry.owned |= owned;
            return index as u32;
        }
        self.entries.push(FdEntry { fd, owned });
        (self.entries.len() - 1) as u32
    }

    /// Returns the raw fd at `index`. `take_close` tells the table who is
    /// now responsible for closing it: `true` means the caller is taking
    /// over that responsibility, so this table's own close-on-clear flag is
    /// cleared (the entry becomes borrowed); `false` means this table keeps
    /// owning it.
    pub fn get_fd(&mut self, index: u32, take_close: bool) -> Option<RawFd> {
        let entry = self.entries.get_mut(index as usize)?;
        entry.owned = !take_close;
        Some(entry.fd)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw fds in table order, for handing to the transport layer's
    /// `SCM_RIGHTS` ancillary message.
    pub fn raw_fds(&self) -> Vec<RawFd> {
        self.entries.iter().map(|e| e.fd).collect()
    }

    /// Appends fds received over the wire, all initially owned by this
    /// table (the transport layer received them via `SCM_RIGHTS` and they
    /// have no other owner yet).
    pub fn extend_received(&mut self, fds: impl IntoIterator<Item = RawFd>) {
        for fd in fds {
            self.entries.push(FdEntry { fd, owned: true });
        }
    }

    /// Closes every owned fd and empties the table.
    pub fn clear(&mut self) {
        for entry in self.entries.drain(..) {
            if entry.owned {
                close_fd(entry.fd);
            }
        }
    }
}

impl Drop for FdTable {
    fn drop(&mut self) {
        self.clear();
    }
}

fn close_fd(fd: RawFd) {
    if let Err(err) = nix::unistd::close(fd) {
        trace!(fd, %err, "failed to close fd owned by control message");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_same_fd_twice_dedups_and_unions_ownership() {
        let mut table = FdTable::new();
        let a = table.add_fd(11, false);
        let b = table.add_fd(11, true);
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn distinct_fds_get_distinct_indices() {
        let mut table = FdTable::new();
        let a = table.add_fd(3, false);
        let b = table.add_fd(4, false);
        assert_ne!(a, b);
        assert_eq!(table.raw_fds(), vec![3, 4]);
    }

    #[test]
    fn get_fd_updates_ownership_flag() {
        let mut table = FdTable::new();
        let idx = table.add_fd(5, true);
        assert_eq!(table.get_fd(idx, true), Some(5));
        // Ownership released (take_close = true); clearing now must not
        // attempt to close fd 5 (which is not a real descriptor in this
        // test and would error).
        table.clear();
        assert!(table.is_empty());
    }

    #[test]
    fn get_fd_with_take_close_false_keeps_ownership() {
        let mut table = FdTable::new();
        let idx = table.add_fd(9, false);
        assert_eq!(table.get_fd(idx, false), Some(9));
        // Ownership retained (take_close = false); the entry is still
        // owned, as if it had been added with transfer_close = true.
        assert_eq!(table.get_fd(idx, true), Some(9));
    }
}
