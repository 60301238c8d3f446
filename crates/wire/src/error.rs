/// Error returned when reading or writing a primitive wire field fails.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WireError {
    #[error("buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("varint exceeds the maximum of {max} bytes")]
    VarintOverflow { max: usize },

    #[error("varint length {length} exceeds the {remaining} bytes remaining in the source")]
    VarintLengthExceedsSource { length: u32, remaining: usize },
}
