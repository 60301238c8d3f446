use std::os::fd::{AsFd, AsRawFd, OwnedFd};

use control::{Command, MessageIterator};
use tracing::{debug, info, instrument, warn};
use transport::TransportError;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Errors that can end a client session early.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Services one accepted client connection until it disconnects or sends a
/// malformed frame. Malformed frames are logged and end the session rather
/// than being skipped, since a framing error leaves no reliable way to find
/// the start of the next message.
#[instrument(skip_all, fields(fd = client.as_fd().as_raw_fd()))]
pub fn run_session(client: OwnedFd) -> Result<(), SessionError> {
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let (n, fds) = transport::read_message(client.as_fd(), &mut buf)?;
        if n == 0 {
            info!("client disconnected");
            return Ok(());
        }
        debug!(bytes = n, fds = fds.len(), "received control batch");

        let batch = bytes::Bytes::copy_from_slice(&buf[..n]);
        for message in MessageIterator::new(batch) {
            match message {
                Ok((command, body)) => handle_message(command, &body),
                Err(err) => {
                    warn!(%err, "malformed control message, ending session");
                    return Ok(());
                }
            }
        }
    }
}

fn handle_message(command: Command, body: &control::MessageBody) {
    debug!(?command, ?body, "handled control message");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_wraps_transport_error() {
        let err: SessionError = TransportError::ShortRead(1).into();
        assert!(matches!(err, SessionError::Transport(_)));
    }
}
