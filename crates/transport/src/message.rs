use std::io::{IoSlice, IoSliceMut};
use std::os::fd::{AsRawFd, BorrowedFd, RawFd};

use nix::cmsg_space;
use nix::errno::Errno;
use nix::sys::socket::{ControlMessage, ControlMessageOwned, MsgFlags, recvmsg, sendmsg};
use tracing::trace;

use crate::error::TransportError;

/// Upper bound on file descriptors accepted in a single `recvmsg` call; also
/// sizes the ancillary-data buffer we allocate per read.
pub const MAX_FDS_PER_MESSAGE: usize = 28;

/// Writes `data` to `socket` in a single datagram, passing `fds` alongside
/// it as `SCM_RIGHTS` ancillary data. Retries on `EINTR`, matching
/// `spa_control_write`'s retry loop.
pub fn write_message(socket: BorrowedFd<'_>, data: &[u8], fds: &[RawFd]) -> Result<usize, TransportError> {
    let iov = [IoSlice::new(data)];
    let cmsgs = if fds.is_empty() { Vec::new() } else { vec![ControlMessage::ScmRights(fds)] };
    loop {
        match sendmsg::<()>(socket.as_raw_fd(), &iov, &cmsgs, MsgFlags::empty(), None) {
            Ok(written) => {
                trace!(written, fds = fds.len(), "wrote control message");
                return Ok(written);
            }
            Err(Errno::EINTR) => continue,
            Err(err) => return Err(err.into()),
        }
    }
}

/// Reads one datagram from `socket` into `buf`, collecting any fds passed
/// alongside it via `SCM_RIGHTS`. Requests `MSG_CMSG_CLOEXEC` so received
/// descriptors never leak across an `exec`. Retries on `EINTR`.
pub fn read_message(socket: BorrowedFd<'_>, buf: &mut [u8]) -> Result<(usize, Vec<RawFd>), TransportError> {
    let mut iov = [IoSliceMut::new(buf)];
    let mut cmsg_buffer = cmsg_space!([RawFd; MAX_FDS_PER_MESSAGE]);
    loop {
        match recvmsg::<()>(
            socket.as_raw_fd(),
            &mut iov,
            Some(&mut cmsg_buffer),
            MsgFlags::MSG_CMSG_CLOEXEC,
        ) {
            Ok(msg) => {
                let mut fds = Vec::new();
                for cmsg in msg.cmsgs()? {
                    if let ControlMessageOwned::ScmRights(received) = cmsg {
                        fds.extend(received);
                    }
                }
                if fds.len() > MAX_FDS_PER_MESSAGE {
                    return Err(TransportError::TooManyFds { found: fds.len(), max: MAX_FDS_PER_MESSAGE });
                }
                let n = msg.bytes;
                if n == 0 {
                    // Peer closed the connection; a zero-length SEQPACKET
                    // read is how that shows up here, not an io::Error.
                    return Ok((0, Vec::new()));
                }
                if n < 4 {
                    return Err(TransportError::ShortRead(n));
                }
                trace!(bytes = n, fds = fds.len(), "read control message");
                return Ok((n, fds));
            }
            Err(Errno::EINTR) => continue,
            Err(err) => return Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::socket::{accept_client, connect_seqpacket, listen_seqpacket};
    use std::os::fd::AsFd;

    #[test]
    fn message_with_no_fds_round_trips() {
        let path = std::env::temp_dir().join(format!("control-codec-test-msg-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let listener = listen_seqpacket(&path).unwrap();
        let client = connect_seqpacket(&path).unwrap();
        let server = accept_client(&listener).unwrap();

        write_message(client.as_fd(), b"hello", &[]).unwrap();
        let mut buf = [0u8; 64];
        let (n, fds) = read_message(server.as_fd(), &mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");
        assert!(fds.is_empty());

        let _ = std::fs::remove_file(&path);
    }
}
