//! Low-level wire primitives shared by the control-message codec.
//!
//! This crate owns the varint length codec used to frame commands. Host byte
//! order and pointer width are assumed throughout the codec stack; this is an
//! intra-host IPC format and makes no attempt at cross-machine portability.

pub mod error;
pub mod varint;

pub use error::WireError;
pub use varint::{decode_varint, encode_varint, varint_len};
