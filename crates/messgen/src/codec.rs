//! Encoding engine traits.
//!
//! Every wire type implements [`Encode`] plus one or both decode flavours:
//!
//! - [`Decode`] reads a value out of a byte slice. Borrowing types
//!   (`&str`, [`ByteView`](crate::ByteView), [`ListView`](crate::ListView))
//!   alias the input buffer; owning types (`Vec`, `String`) copy to the heap.
//! - [`DecodeIn`] reads a value whose dynamic parts are copied into an
//!   [`Arena`]. The decoded value borrows the arena, never the input.
//!
//! Layout rules shared by all implementations: fields in declaration order
//! without padding, fixed-width values little-endian, variable-size values
//! prefixed by a `u32` little-endian count of elements (bytes for strings
//! and blobs).

use messgen_buffers::{Reader, Writer};

use crate::arena::Arena;
use crate::error::CodecError;

/// Size of the element count that precedes every variable-size value.
pub const COUNT_SIZE: usize = 4;

/// Serialization half of the codec.
///
/// Object safe, so heterogeneous payloads can travel as `&dyn Encode`.
pub trait Encode {
    /// Exact number of bytes [`Encode::encode`] will write.
    fn serialized_size(&self) -> usize;

    /// Writes the value at the writer's cursor.
    ///
    /// The writer must have at least [`Encode::serialized_size`] bytes left;
    /// writes that do not fit latch the writer's overflow flag.
    fn encode(&self, w: &mut Writer<'_>);

    /// Serializes into `buf` and returns the number of bytes written.
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, CodecError> {
        let size = self.serialized_size();
        if buf.len() < size {
            return Err(CodecError::BufferTooShort {
                needed: size,
                remaining: buf.len(),
            });
        }
        let mut w = Writer::new(&mut buf[..size]);
        self.encode(&mut w);
        if w.overflowed() || w.position() != size {
            return Err(CodecError::Unencodable);
        }
        Ok(size)
    }

    /// Serializes into a freshly allocated vector.
    fn to_vec(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = vec![0u8; self.serialized_size()];
        self.serialize(&mut out)?;
        Ok(out)
    }
}

/// View / owned deserialization.
pub trait Decode<'de>: Sized {
    fn decode(r: &mut Reader<'de>) -> Result<Self, CodecError>;

    /// Decodes a value from the front of `buf`, returning it with the number
    /// of bytes consumed.
    fn deserialize(buf: &'de [u8]) -> Result<(Self, usize), CodecError> {
        let mut r = Reader::new(buf);
        let value = Self::decode(&mut r)?;
        Ok((value, r.position()))
    }
}

/// Arena-mode deserialization.
pub trait DecodeIn<'a>: Sized {
    fn decode_in(r: &mut Reader<'_>, arena: &'a Arena) -> Result<Self, CodecError>;

    /// Decodes a value from the front of `buf`, copying dynamic parts into
    /// `arena`.
    fn deserialize_in(buf: &[u8], arena: &'a Arena) -> Result<(Self, usize), CodecError> {
        let mut r = Reader::new(buf);
        let value = Self::decode_in(&mut r, arena)?;
        Ok((value, r.position()))
    }
}

/// Writes a `u32` count prefix. Counts that do not fit poison the writer.
#[inline]
pub fn write_count(w: &mut Writer<'_>, count: usize) {
    match u32::try_from(count) {
        Ok(count) => w.u32(count),
        Err(_) => {
            w.poison();
            w.u32(u32::MAX);
        }
    }
}

#[inline]
pub fn read_count(r: &mut Reader<'_>) -> Result<usize, CodecError> {
    Ok(r.u32()? as usize)
}

/// Largest count accepted for elements that occupy no bytes on the wire.
/// Such counts are not bounded by the input length.
pub const MAX_ZERO_SIZE_COUNT: usize = 1 << 16;

/// Reads a count of elements that each occupy at least `min_element_size`
/// bytes, rejecting counts the remaining input cannot possibly hold.
///
/// Runs before any allocation so a corrupt prefix cannot trigger a huge
/// reservation or a long decode loop.
pub fn read_bounded_count(
    r: &mut Reader<'_>,
    min_element_size: usize,
) -> Result<usize, CodecError> {
    let count = read_count(r)?;
    if min_element_size == 0 {
        if count > MAX_ZERO_SIZE_COUNT {
            return Err(CodecError::CountTooLarge {
                count,
                limit: MAX_ZERO_SIZE_COUNT,
            });
        }
    } else {
        r.ensure(count.saturating_mul(min_element_size))?;
    }
    Ok(count)
}
