//! Bounds-checked little-endian reader over a borrowed byte slice.

use std::str;

use crate::BufferError;

/// A cursor over a byte slice that never reads past its end.
///
/// Every read checks the remaining length first and reports
/// [`BufferError::EndOfBuffer`] instead of panicking, so it is safe to run
/// over untrusted input. Borrowed reads ([`Reader::buf`], [`Reader::utf8`])
/// return slices tied to the lifetime of the underlying buffer, not to the
/// reader.
///
/// # Example
///
/// ```
/// use messgen_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8().unwrap(), 0x01);
/// assert_eq!(reader.u32().unwrap(), 0x0504_0302);
/// assert!(reader.u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub data: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

macro_rules! read_le {
    ($($(#[$meta:meta])* $name:ident => $ty:ty),* $(,)?) => {
        $(
            $(#[$meta])*
            #[inline]
            pub fn $name(&mut self) -> Result<$ty, BufferError> {
                const N: usize = std::mem::size_of::<$ty>();
                let bytes = self.buf(N)?;
                let mut raw = [0u8; N];
                raw.copy_from_slice(bytes);
                Ok(<$ty>::from_le_bytes(raw))
            }
        )*
    };
}

impl<'a> Reader<'a> {
    /// Creates a new reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, x: 0 }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.x
    }

    /// Number of bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.x
    }

    /// Fails unless at least `needed` bytes remain.
    #[inline]
    pub fn ensure(&self, needed: usize) -> Result<(), BufferError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(BufferError::EndOfBuffer { needed, remaining });
        }
        Ok(())
    }

    /// Returns the next `size` bytes and advances past them.
    #[inline]
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.ensure(size)?;
        let start = self.x;
        self.x += size;
        Ok(&self.data[start..self.x])
    }

    /// Reads `size` bytes and validates them as UTF-8.
    pub fn utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        let bytes = self.buf(size)?;
        str::from_utf8(bytes).map_err(|_| BufferError::InvalidUtf8)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.ensure(1)?;
        let val = self.data[self.x];
        self.x += 1;
        Ok(val)
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8, BufferError> {
        self.u8().map(|v| v as i8)
    }

    /// Reads a single byte as a boolean; any non-zero byte is `true`.
    #[inline]
    pub fn bool(&mut self) -> Result<bool, BufferError> {
        self.u8().map(|v| v != 0)
    }

    read_le! {
        /// Reads an unsigned 16-bit integer (little-endian).
        u16 => u16,
        /// Reads a signed 16-bit integer (little-endian).
        i16 => i16,
        /// Reads an unsigned 32-bit integer (little-endian).
        u32 => u32,
        /// Reads a signed 32-bit integer (little-endian).
        i32 => i32,
        /// Reads an unsigned 64-bit integer (little-endian).
        u64 => u64,
        /// Reads a signed 64-bit integer (little-endian).
        i64 => i64,
        /// Reads a 32-bit IEEE-754 float (little-endian).
        f32 => f32,
        /// Reads a 64-bit IEEE-754 float (little-endian).
        f64 => f64,
    }
}
