//! Little-endian writer into a caller-provided byte slice.

/// Writes binary data into a fixed, caller-owned buffer.
///
/// Encoders size their output up front, so writes are expected to fit.
/// A write that does not fit is dropped and latches [`Writer::overflowed`];
/// the caller checks it once at the end instead of after every field.
///
/// # Example
///
/// ```
/// use messgen_buffers::Writer;
///
/// let mut buf = [0u8; 6];
/// let mut writer = Writer::new(&mut buf);
/// writer.u8(0xff);
/// writer.u32(1);
/// writer.u8(7);
/// assert_eq!(writer.position(), 6);
/// assert!(!writer.overflowed());
/// assert_eq!(buf, [0xff, 1, 0, 0, 0, 7]);
/// ```
#[derive(Debug)]
pub struct Writer<'a> {
    /// The destination buffer.
    pub data: &'a mut [u8],
    /// Current cursor position.
    pub x: usize,
    overflow: bool,
}

macro_rules! write_le {
    ($($(#[$meta:meta])* $name:ident => $ty:ty),* $(,)?) => {
        $(
            $(#[$meta])*
            #[inline]
            pub fn $name(&mut self, val: $ty) {
                self.buf(&val.to_le_bytes());
            }
        )*
    };
}

impl<'a> Writer<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self {
            data,
            x: 0,
            overflow: false,
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.x
    }

    /// Bytes still available.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.x
    }

    /// `true` once any write did not fit into the buffer or the writer was
    /// poisoned.
    #[inline]
    pub fn overflowed(&self) -> bool {
        self.overflow
    }

    /// Marks the output as unusable, e.g. when a length does not fit its
    /// prefix. Later writes still advance normally.
    #[inline]
    pub fn poison(&mut self) {
        self.overflow = true;
    }

    /// Copies raw bytes at the cursor.
    #[inline]
    pub fn buf(&mut self, bytes: &[u8]) {
        if bytes.len() > self.remaining() {
            self.overflow = true;
            return;
        }
        let end = self.x + bytes.len();
        self.data[self.x..end].copy_from_slice(bytes);
        self.x = end;
    }

    /// Writes the UTF-8 bytes of `s` without any prefix.
    #[inline]
    pub fn utf8(&mut self, s: &str) {
        self.buf(s.as_bytes());
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.buf(&[val]);
    }

    #[inline]
    pub fn i8(&mut self, val: i8) {
        self.buf(&[val as u8]);
    }

    #[inline]
    pub fn bool(&mut self, val: bool) {
        self.buf(&[val as u8]);
    }

    write_le! {
        /// Writes an unsigned 16-bit integer (little-endian).
        u16 => u16,
        /// Writes a signed 16-bit integer (little-endian).
        i16 => i16,
        /// Writes an unsigned 32-bit integer (little-endian).
        u32 => u32,
        /// Writes a signed 32-bit integer (little-endian).
        i32 => i32,
        /// Writes an unsigned 64-bit integer (little-endian).
        u64 => u64,
        /// Writes a signed 64-bit integer (little-endian).
        i64 => i64,
        /// Writes a 32-bit IEEE-754 float (little-endian).
        f32 => f32,
        /// Writes a 64-bit IEEE-754 float (little-endian).
        f64 => f64,
    }
}
