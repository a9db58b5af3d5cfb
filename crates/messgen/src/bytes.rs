//! Byte blobs: borrowed views and deferred payloads.

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

use messgen_buffers::{print_octets_default, Reader, Writer};
use serde_json::Value;

use crate::arena::Arena;
use crate::codec::{read_count, write_count, Decode, DecodeIn, Encode, COUNT_SIZE};
use crate::error::CodecError;
use crate::reflect::Reflect;
use crate::types::{Type, TypeRef};

/// Non-owning view over a contiguous byte region.
///
/// Equality and ordering compare the referenced bytes, not addresses.
/// On the wire a `ByteView` is a `bytes` field: a `u32` length followed by
/// the raw bytes.
///
/// ```
/// use messgen::{ByteView, Decode, Encode};
///
/// let owned = vec![1u8, 2, 3];
/// let view = ByteView::from(&owned);
/// assert_eq!(view, ByteView::new(&[1, 2, 3]));
///
/// let wire = view.to_vec().unwrap();
/// let (decoded, _) = ByteView::deserialize(&wire).unwrap();
/// assert_eq!(decoded.as_slice(), &[1, 2, 3]);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteView<'a>(&'a [u8]);

impl<'a> ByteView<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn as_slice(&self) -> &'a [u8] {
        self.0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for ByteView<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.0
    }
}

impl AsRef<[u8]> for ByteView<'_> {
    fn as_ref(&self) -> &[u8] {
        self.0
    }
}

impl<'a> From<&'a [u8]> for ByteView<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for ByteView<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for ByteView<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl<'a> From<&'a str> for ByteView<'a> {
    fn from(s: &'a str) -> Self {
        Self(s.as_bytes())
    }
}

impl fmt::Debug for ByteView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteView({})", print_octets_default(self.0))
    }
}

impl Type for ByteView<'_> {
    const TYPE: &'static TypeRef = &TypeRef::Bytes;
    const FIXED_SIZE: Option<usize> = None;
    const IS_FLAT: bool = false;
}

impl Encode for ByteView<'_> {
    #[inline]
    fn serialized_size(&self) -> usize {
        COUNT_SIZE + self.0.len()
    }

    fn encode(&self, w: &mut Writer<'_>) {
        write_count(w, self.0.len());
        w.buf(self.0);
    }
}

/// Zero-copy: the view aliases the input buffer.
impl<'a> Decode<'a> for ByteView<'a> {
    fn decode(r: &mut Reader<'a>) -> Result<Self, CodecError> {
        let len = read_count(r)?;
        Ok(Self(r.buf(len)?))
    }
}

impl<'a> DecodeIn<'a> for ByteView<'a> {
    fn decode_in(r: &mut Reader<'_>, arena: &'a Arena) -> Result<Self, CodecError> {
        let len = read_count(r)?;
        let src = r.buf(len)?;
        Ok(Self(arena.alloc_slice_copy(src)?))
    }
}

impl Reflect for ByteView<'_> {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_text(f)
    }

    fn to_json(&self) -> Value {
        self.0.to_json()
    }
}

/// A `bytes` field whose content is either already encoded or produced on
/// demand from another value.
///
/// `Deferred` serializes its source straight into the output at encode
/// time, so a message can carry another message's payload without an
/// intermediate buffer:
///
/// ```
/// use messgen::{Bytes, Encode};
///
/// let inner = vec![1u16, 2];
/// let wrapped = Bytes::deferred(&inner);
/// assert_eq!(wrapped.len(), inner.serialized_size());
/// assert_eq!(
///     wrapped.to_vec().unwrap(),
///     [8, 0, 0, 0, 2, 0, 0, 0, 1, 0, 2, 0],
/// );
/// assert_eq!(wrapped, Bytes::Direct(&[2, 0, 0, 0, 1, 0, 2, 0]));
/// ```
#[derive(Clone, Copy)]
pub enum Bytes<'a> {
    Direct(&'a [u8]),
    Deferred(&'a dyn Encode),
}

impl<'a> Bytes<'a> {
    pub fn deferred(source: &'a dyn Encode) -> Self {
        Bytes::Deferred(source)
    }

    /// Number of payload bytes, without the length prefix.
    pub fn len(&self) -> usize {
        match self {
            Bytes::Direct(bytes) => bytes.len(),
            Bytes::Deferred(source) => source.serialized_size(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The payload bytes; deferred sources are serialized into a new buffer.
    pub fn materialize(&self) -> Result<Cow<'a, [u8]>, CodecError> {
        match *self {
            Bytes::Direct(bytes) => Ok(Cow::Borrowed(bytes)),
            Bytes::Deferred(source) => source.to_vec().map(Cow::Owned),
        }
    }
}

impl Default for Bytes<'_> {
    fn default() -> Self {
        Bytes::Direct(&[])
    }
}

impl<'a> From<ByteView<'a>> for Bytes<'a> {
    fn from(view: ByteView<'a>) -> Self {
        Bytes::Direct(view.as_slice())
    }
}

impl<'a> From<&'a [u8]> for Bytes<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Bytes::Direct(bytes)
    }
}

/// Compares materialized content; a source that fails to serialize is
/// unequal to everything.
impl PartialEq for Bytes<'_> {
    fn eq(&self, other: &Self) -> bool {
        if let (Bytes::Direct(a), Bytes::Direct(b)) = (self, other) {
            return a == b;
        }
        match (self.materialize(), other.materialize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bytes::Direct(bytes) => write!(f, "Direct({})", print_octets_default(bytes)),
            Bytes::Deferred(source) => write!(f, "Deferred({} bytes)", source.serialized_size()),
        }
    }
}

impl Type for Bytes<'_> {
    const TYPE: &'static TypeRef = &TypeRef::Bytes;
    const FIXED_SIZE: Option<usize> = None;
    const IS_FLAT: bool = false;
}

impl Encode for Bytes<'_> {
    fn serialized_size(&self) -> usize {
        COUNT_SIZE + self.len()
    }

    fn encode(&self, w: &mut Writer<'_>) {
        match self {
            Bytes::Direct(bytes) => {
                write_count(w, bytes.len());
                w.buf(bytes);
            }
            Bytes::Deferred(source) => {
                write_count(w, source.serialized_size());
                source.encode(w);
            }
        }
    }
}

impl<'a> Decode<'a> for Bytes<'a> {
    fn decode(r: &mut Reader<'a>) -> Result<Self, CodecError> {
        Ok(ByteView::decode(r)?.into())
    }
}

impl<'a> DecodeIn<'a> for Bytes<'a> {
    fn decode_in(r: &mut Reader<'_>, arena: &'a Arena) -> Result<Self, CodecError> {
        Ok(ByteView::decode_in(r, arena)?.into())
    }
}

impl Reflect for Bytes<'_> {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.materialize() {
            Ok(bytes) => bytes.as_ref().fmt_text(f),
            Err(_) => f.write_str("<unencodable>"),
        }
    }

    fn to_json(&self) -> Value {
        self.materialize()
            .map_or(Value::Null, |bytes| bytes.as_ref().to_json())
    }
}
