//! Unix-domain socket transport for the control channel: connection setup
//! over `SOCK_SEQPACKET`, and datagram read/write with `SCM_RIGHTS` fd
//! passing.

pub mod error;
pub mod message;
pub mod socket;

pub use error::TransportError;
pub use message::{MAX_FDS_PER_MESSAGE, read_message, write_message};
pub use socket::{accept_client, connect_seqpacket, listen_seqpacket};
