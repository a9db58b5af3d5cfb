//! Binary buffer primitives for the messgen runtime.
//!
//! # Overview
//!
//! - [`Reader`] - bounds-checked little-endian cursor over a borrowed slice
//! - [`Writer`] - little-endian cursor over a caller-provided slice
//! - [`print_octets`] - hex dump helper for diagnostics
//!
//! # Example
//!
//! ```
//! use messgen_buffers::{Reader, Writer};
//!
//! let mut data = [0u8; 9];
//! let mut writer = Writer::new(&mut data);
//! writer.u8(0x01);
//! writer.u32(5);
//! writer.utf8("abcd");
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8().unwrap(), 0x01);
//! let len = reader.u32().unwrap() as usize;
//! assert!(reader.utf8(len).is_err()); // only 4 bytes left
//! ```

mod print_octets;
mod reader;
mod writer;

pub use print_octets::{print_octets, print_octets_default};
pub use reader::Reader;
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer { needed: usize, remaining: usize },
    /// Invalid UTF-8 sequence.
    InvalidUtf8,
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer { needed, remaining } => write!(
                f,
                "end of buffer: need {needed} bytes, {remaining} remaining"
            ),
            BufferError::InvalidUtf8 => write!(f, "invalid UTF-8 sequence"),
        }
    }
}

impl std::error::Error for BufferError {}
