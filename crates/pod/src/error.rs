/// Error produced while decoding a POD region.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PodError {
    #[error("pod prefix truncated: need {needed} bytes, have {available}")]
    TruncatedPrefix { needed: usize, available: usize },

    #[error("pod body truncated: need {needed} bytes, have {available}")]
    TruncatedBody { needed: usize, available: usize },

    #[error("unknown pod type tag {0}")]
    UnknownType(u32),

    #[error("pod type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch { expected: crate::types::PodType, found: crate::types::PodType },

    #[error("pod string body is not nul-terminated")]
    StringNotTerminated,

    #[error("pod string body is not valid utf-8")]
    StringNotUtf8,

    #[error("pod cursor is not 8-byte aligned at offset {0}")]
    Unaligned(usize),

    #[error("pod frame stack underflow: pop without a matching push")]
    FrameStackUnderflow,

    #[error("array child size {child_size} does not evenly divide body length {body_len}")]
    ArrayChildSizeMismatch { child_size: usize, body_len: usize },
}
