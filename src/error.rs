use serde::{de, ser};
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding or decoding XDR.
///
/// Every variant is fatal to the encode/decode call that produced it. Nothing
/// is retried and no partially decoded value is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Raised through `serde::ser::Error::custom` / `de::Error::custom`
    #[error("{0}")]
    Message(String),

    /// The source was exhausted before a required field could be read
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A variable length or element count exceeded the declared maximum
    #[error("length {len} exceeds maximum {max}")]
    LengthExceedsBound { len: usize, max: u32 },

    /// Padding bytes were non-zero
    #[error("non-zero padding bytes")]
    MalformedPadding,

    /// An optional-value presence flag was neither 0 nor 1
    #[error("invalid optional flag: {0} (must be 0 or 1)")]
    InvalidOptionFlag(u32),

    /// A union or enum discriminant did not match any declared case
    #[error("unknown discriminant value: {0}")]
    UnknownDiscriminant(i32),

    /// An unsigned magnitude fell outside its declared bit width
    #[error("value {value} out of range for {bits}-bit unsigned integer")]
    RangeError { value: i128, bits: u32 },

    /// A bool word other than 0 or 1
    #[error("invalid boolean encoding: {0} (must be 0 or 1)")]
    InvalidBool(u32),

    /// A serde sequence or map did not report its length up front
    #[error("sequence length must be known before serialization (XDR requires a length prefix)")]
    LengthRequired,

    /// Text was requested from bytes that are not valid UTF-8
    #[error("string contains invalid bytes")]
    InvalidString,

    /// Decoding nested deeper than the configured limit
    #[error("maximum decoding depth reached")]
    DepthLimitExceeded,

    /// The reader consumed more bytes than the configured limit
    #[error("input exceeds configured limit of {0} bytes")]
    LimitExceeded(usize),

    /// Bytes remained after a complete value was decoded
    #[error("{0} trailing bytes after decoded value")]
    TrailingBytes(usize),

    /// The textual form was not valid base64
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A serde data model call with no XDR counterpart
    #[error("XDR does not support type: {0}")]
    Unsupported(&'static str),

    /// An I/O error occurred on the underlying sink or source
    #[error("I/O error: {0}")]
    Io(String),
}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}
