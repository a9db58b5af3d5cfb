use messgen_buffers::BufferError;
use thiserror::Error;

use crate::arena::AllocError;

/// Failure of an encode or decode call.
///
/// Decoding never panics on malformed input; every structural problem is
/// reported through one of these variants and the partially decoded value
/// is dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("buffer too short: need {needed} bytes, {remaining} remaining")]
    BufferTooShort { needed: usize, remaining: usize },
    #[error(transparent)]
    AllocationExhausted(#[from] AllocError),
    #[error("count {count} of zero-size elements exceeds {limit}")]
    CountTooLarge { count: usize, limit: usize },
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,
    #[error("invalid value {value} for enum {name}")]
    InvalidEnumValue { name: &'static str, value: i64 },
    #[error("value cannot be encoded: a length exceeds its u32 prefix or the size estimate was wrong")]
    Unencodable,
    #[error("message {message_id} left {remaining} unread payload bytes")]
    TrailingBytes { message_id: u8, remaining: usize },
    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },
}

impl From<BufferError> for CodecError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer { needed, remaining } => {
                CodecError::BufferTooShort { needed, remaining }
            }
            BufferError::InvalidUtf8 => CodecError::InvalidUtf8,
        }
    }
}
