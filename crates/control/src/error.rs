use wire::WireError;

/// Error produced while decoding a framed control message.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("frame header truncated")]
    HeaderTruncated,

    #[error(transparent)]
    Length(#[from] WireError),

    #[error("unknown command tag {0}")]
    UnknownCommand(u8),

    #[error("message body truncated: need {needed} bytes, have {available}")]
    BodyTruncated { needed: usize, available: usize },

    #[error(transparent)]
    Pod(#[from] pod::PodError),

    #[error("fd index {0} is out of range")]
    FdIndexOutOfRange(u32),

    #[error("shrinking a live buffer from {current} to {requested} bytes is not allowed")]
    BufferShrink { current: usize, requested: usize },

    #[error("invalid port direction tag {0}")]
    InvalidDirection(u32),

    #[error("offset {offset} is out of range for a payload of {len} bytes")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("unknown property value tag {0}")]
    InvalidValueTag(u32),
}

/// Error produced while building a control message.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("a frame was finalized while {open} compound frame(s) remained open")]
    UnclosedFrame { open: usize },

    #[error(transparent)]
    Pod(#[from] pod::PodError),
}
