/// Error produced by the Unix-socket transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("read returned {0} bytes, shorter than the 4-byte minimum frame size")]
    ShortRead(usize),

    #[error("message carried {found} file descriptors, more than the {max} this table accepts")]
    TooManyFds { found: usize, max: usize },
}

impl From<nix::errno::Errno> for TransportError {
    fn from(errno: nix::errno::Errno) -> Self {
        Self::Io(errno.into())
    }
}
