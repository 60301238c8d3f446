use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::path::Path;

use nix::sys::socket::{AddressFamily, Backlog, SockFlag, SockType, UnixAddr, accept, bind, connect, listen, socket};

use crate::error::TransportError;

const LISTEN_BACKLOG: i32 = 16;

/// Connects to the `SOCK_SEQPACKET` Unix socket at `path`, used by a client
/// library to reach the media server's control endpoint.
pub fn connect_seqpacket(path: &Path) -> Result<OwnedFd, TransportError> {
    let fd = socket(AddressFamily::Unix, SockType::SeqPacket, SockFlag::SOCK_CLOEXEC, None)?;
    let addr = UnixAddr::new(path)?;
    connect(fd.as_raw_fd(), &addr)?;
    Ok(fd)
}

/// Binds and listens on a `SOCK_SEQPACKET` Unix socket at `path`, used by
/// the media server to accept client connections. Removes any stale socket
/// file left behind by a previous, uncleanly terminated server.
pub fn listen_seqpacket(path: &Path) -> Result<OwnedFd, TransportError> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    let fd = socket(AddressFamily::Unix, SockType::SeqPacket, SockFlag::SOCK_CLOEXEC, None)?;
    let addr = UnixAddr::new(path)?;
    bind(fd.as_raw_fd(), &addr)?;
    listen(&fd, Backlog::new(LISTEN_BACKLOG)?)?;
    Ok(fd)
}

/// Accepts one client connection on a listening socket created by
/// [`listen_seqpacket`].
pub fn accept_client(listener: &OwnedFd) -> Result<OwnedFd, TransportError> {
    let raw: RawFd = accept(listener.as_raw_fd())?;
    // SAFETY: `accept` returns a freshly opened, uniquely owned descriptor.
    Ok(unsafe { OwnedFd::from_raw_fd(raw) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::fd::AsRawFd;

    #[test]
    fn connect_fails_cleanly_when_nothing_is_listening() {
        let path = std::env::temp_dir().join(format!("control-codec-test-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let result = connect_seqpacket(&path);
        assert!(result.is_err());
    }

    #[test]
    fn listen_then_connect_round_trips_a_client() {
        let path = std::env::temp_dir().join(format!("control-codec-test-listen-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let listener = listen_seqpacket(&path).unwrap();

        let client = connect_seqpacket(&path).unwrap();
        let server_side = accept_client(&listener).unwrap();
        assert!(client.as_raw_fd() >= 0);
        assert!(server_side.as_raw_fd() >= 0);

        let _ = std::fs::remove_file(&path);
    }
}
