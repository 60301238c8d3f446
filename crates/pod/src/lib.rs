//! POD (Plain Old Data) sub-codec.
//!
//! POD is the self-describing typed value format used to carry property
//! bags and format descriptors inside control messages. Every value starts
//! with an 8-byte-aligned `{size, type}` prefix; compound values (struct,
//! object, array, prop) nest further values in their body. See
//! [`builder::PodBuilder`] for encoding and [`value::decode_pod`] for
//! zero-copy decoding.

pub mod builder;
pub mod error;
pub mod format;
pub mod props;
pub mod types;
pub mod value;

pub use builder::{FrameToken, PodBuilder};
pub use error::PodError;
pub use types::PodType;
pub use value::{PodArray, PodObject, PodProp, PodStruct, PodValue, decode_pod, decode_value};
