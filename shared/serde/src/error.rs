use thiserror::Error;

/// Errors produced by the wire codec.
///
/// Both variants are fatal to the message being decoded: a failed decode
/// never yields a partial value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Malformed, truncated, or corrupt-compressed bytes.
    #[error("malformed wire data: {0}")]
    FormatError(&'static str),

    /// A declared field length exceeds the caller-specified cap.
    ///
    /// Truncating instead would risk a silent desync, so this is treated as
    /// a protocol violation.
    #[error("declared field length of {declared} bytes exceeds cap of {cap} bytes")]
    OversizedField { declared: usize, cap: usize },
}
