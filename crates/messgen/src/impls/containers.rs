//! Strings, sequences, fixed arrays and maps.
//!
//! Owned containers (`String`, `Vec`, `BTreeMap`, `HashMap`) decode onto the
//! heap in both modes. Arena-mode containers (`&'a str`, `&'a [T]`,
//! [`MapRef`]) copy into the [`Arena`] and borrow it.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash};

use messgen_buffers::{Reader, Writer};
use serde_json::Value;

use crate::arena::Arena;
use crate::codec::{read_bounded_count, read_count, write_count, Decode, DecodeIn, Encode, COUNT_SIZE};
use crate::error::CodecError;
use crate::reflect::{fmt_map, fmt_quoted, fmt_seq, map_to_json, seq_to_json, Reflect};
use crate::types::{Type, TypeRef};

/// Payload size of a run of elements, without any prefix.
#[inline]
pub(crate) fn elements_size<T: Encode + Type>(items: &[T]) -> usize {
    match T::FIXED_SIZE {
        Some(size) => size * items.len(),
        None => items.iter().map(Encode::serialized_size).sum(),
    }
}

/// Reads a counted sequence into arena storage.
pub(crate) fn decode_seq_in<'a, T>(
    r: &mut Reader<'_>,
    arena: &'a Arena,
    min_element_size: usize,
    mut decode: impl FnMut(&mut Reader<'_>) -> Result<T, CodecError>,
) -> Result<&'a [T], CodecError> {
    let count = read_bounded_count(r, min_element_size)?;
    let mut out = arena.alloc::<T>(count)?;
    for _ in 0..count {
        out.push(decode(r)?);
    }
    Ok(out.into_bump_slice())
}

fn read_str<'de>(r: &mut Reader<'de>) -> Result<&'de str, CodecError> {
    let len = read_count(r)?;
    Ok(r.utf8(len)?)
}

// ----- references -----

impl<T: Encode + ?Sized> Encode for &T {
    #[inline]
    fn serialized_size(&self) -> usize {
        (**self).serialized_size()
    }

    #[inline]
    fn encode(&self, w: &mut Writer<'_>) {
        (**self).encode(w)
    }
}

impl<T: Type + ?Sized> Type for &T {
    const TYPE: &'static TypeRef = T::TYPE;
    const FIXED_SIZE: Option<usize> = T::FIXED_SIZE;
    const IS_FLAT: bool = false;
    const MIN_SIZE: usize = T::MIN_SIZE;
    const HASH: u64 = T::HASH;
}

impl<T: Reflect + ?Sized> Reflect for &T {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt_text(f)
    }

    fn to_json(&self) -> Value {
        (**self).to_json()
    }
}

// ----- strings -----

impl Type for str {
    const TYPE: &'static TypeRef = &TypeRef::String;
    const FIXED_SIZE: Option<usize> = None;
    const IS_FLAT: bool = false;
}

impl Encode for str {
    #[inline]
    fn serialized_size(&self) -> usize {
        COUNT_SIZE + self.len()
    }

    fn encode(&self, w: &mut Writer<'_>) {
        write_count(w, self.len());
        w.utf8(self);
    }
}

impl Reflect for str {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_quoted(self, f)
    }

    fn to_json(&self) -> Value {
        Value::String(self.to_owned())
    }
}

impl Type for String {
    const TYPE: &'static TypeRef = &TypeRef::String;
    const FIXED_SIZE: Option<usize> = None;
    const IS_FLAT: bool = false;
}

impl Encode for String {
    #[inline]
    fn serialized_size(&self) -> usize {
        self.as_str().serialized_size()
    }

    fn encode(&self, w: &mut Writer<'_>) {
        self.as_str().encode(w)
    }
}

impl<'de> Decode<'de> for String {
    fn decode(r: &mut Reader<'de>) -> Result<Self, CodecError> {
        Ok(read_str(r)?.to_owned())
    }
}

impl<'a> DecodeIn<'a> for String {
    fn decode_in(r: &mut Reader<'_>, _arena: &'a Arena) -> Result<Self, CodecError> {
        Ok(read_str(r)?.to_owned())
    }
}

impl Reflect for String {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_quoted(self, f)
    }

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }
}

/// Zero-copy: the string aliases the input buffer.
impl<'a> Decode<'a> for &'a str {
    fn decode(r: &mut Reader<'a>) -> Result<Self, CodecError> {
        read_str(r)
    }
}

impl<'a> DecodeIn<'a> for &'a str {
    fn decode_in(r: &mut Reader<'_>, arena: &'a Arena) -> Result<Self, CodecError> {
        let s = read_str(r)?;
        Ok(arena.alloc_str(s)?)
    }
}

// ----- vectors -----

impl<T: Type> Type for [T] {
    const TYPE: &'static TypeRef = &TypeRef::Vector { element: T::TYPE };
    const FIXED_SIZE: Option<usize> = None;
    const IS_FLAT: bool = false;
}

impl<T: Encode + Type> Encode for [T] {
    #[inline]
    fn serialized_size(&self) -> usize {
        COUNT_SIZE + elements_size(self)
    }

    fn encode(&self, w: &mut Writer<'_>) {
        write_count(w, self.len());
        for item in self {
            item.encode(w);
        }
    }
}

impl<T: Reflect> Reflect for [T] {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_seq(self.iter().map(|item| item as &dyn Reflect), f)
    }

    fn to_json(&self) -> Value {
        seq_to_json(self.iter().map(|item| item as &dyn Reflect))
    }
}

impl<T: Type> Type for Vec<T> {
    const TYPE: &'static TypeRef = &TypeRef::Vector { element: T::TYPE };
    const FIXED_SIZE: Option<usize> = None;
    const IS_FLAT: bool = false;
}

impl<T: Encode + Type> Encode for Vec<T> {
    #[inline]
    fn serialized_size(&self) -> usize {
        self.as_slice().serialized_size()
    }

    fn encode(&self, w: &mut Writer<'_>) {
        self.as_slice().encode(w)
    }
}

impl<'de, T: Decode<'de> + Type> Decode<'de> for Vec<T> {
    fn decode(r: &mut Reader<'de>) -> Result<Self, CodecError> {
        let count = read_bounded_count(r, T::MIN_SIZE)?;
        let mut out = Vec::with_capacity(count.min(r.remaining()));
        for _ in 0..count {
            out.push(T::decode(r)?);
        }
        Ok(out)
    }
}

impl<'a, T: DecodeIn<'a> + Type> DecodeIn<'a> for Vec<T> {
    fn decode_in(r: &mut Reader<'_>, arena: &'a Arena) -> Result<Self, CodecError> {
        let count = read_bounded_count(r, T::MIN_SIZE)?;
        let mut out = Vec::with_capacity(count.min(r.remaining()));
        for _ in 0..count {
            out.push(T::decode_in(r, arena)?);
        }
        Ok(out)
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt_text(f)
    }

    fn to_json(&self) -> Value {
        self.as_slice().to_json()
    }
}

impl<'a, T: DecodeIn<'a> + Type> DecodeIn<'a> for &'a [T] {
    fn decode_in(r: &mut Reader<'_>, arena: &'a Arena) -> Result<Self, CodecError> {
        decode_seq_in(r, arena, T::MIN_SIZE, |r| T::decode_in(r, arena))
    }
}

// ----- fixed arrays -----

impl<T: Type, const N: usize> Type for [T; N] {
    const TYPE: &'static TypeRef = &TypeRef::Array {
        element: T::TYPE,
        size: N,
    };
    const FIXED_SIZE: Option<usize> = match T::FIXED_SIZE {
        Some(size) => Some(size * N),
        None => None,
    };
    const IS_FLAT: bool = T::IS_FLAT;
    const MIN_SIZE: usize = T::MIN_SIZE * N;
}

impl<T: Encode + Type, const N: usize> Encode for [T; N] {
    #[inline]
    fn serialized_size(&self) -> usize {
        elements_size(self.as_slice())
    }

    fn encode(&self, w: &mut Writer<'_>) {
        for item in self {
            item.encode(w);
        }
    }
}

impl<'de, T: Decode<'de> + Type + Default, const N: usize> Decode<'de> for [T; N] {
    fn decode(r: &mut Reader<'de>) -> Result<Self, CodecError> {
        r.ensure(<Self as Type>::MIN_SIZE)?;
        let mut out: [T; N] = std::array::from_fn(|_| T::default());
        for slot in out.iter_mut() {
            *slot = T::decode(r)?;
        }
        Ok(out)
    }
}

impl<'a, T: DecodeIn<'a> + Type + Default, const N: usize> DecodeIn<'a> for [T; N] {
    fn decode_in(r: &mut Reader<'_>, arena: &'a Arena) -> Result<Self, CodecError> {
        r.ensure(<Self as Type>::MIN_SIZE)?;
        let mut out: [T; N] = std::array::from_fn(|_| T::default());
        for slot in out.iter_mut() {
            *slot = T::decode_in(r, arena)?;
        }
        Ok(out)
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt_text(f)
    }

    fn to_json(&self) -> Value {
        self.as_slice().to_json()
    }
}

// ----- maps -----

/// Minimum wire size of one map entry.
#[inline]
fn entry_min_size<K: Type, V: Type>() -> usize {
    K::MIN_SIZE + V::MIN_SIZE
}

fn entries_size<'m, K, V>(entries: impl Iterator<Item = (&'m K, &'m V)>) -> usize
where
    K: Encode + 'm,
    V: Encode + 'm,
{
    entries
        .map(|(k, v)| k.serialized_size() + v.serialized_size())
        .sum()
}

fn encode_entries<'m, K, V>(
    w: &mut Writer<'_>,
    len: usize,
    entries: impl Iterator<Item = (&'m K, &'m V)>,
) where
    K: Encode + 'm,
    V: Encode + 'm,
{
    write_count(w, len);
    for (k, v) in entries {
        k.encode(w);
        v.encode(w);
    }
}

impl<K: Encode, V: Encode> Encode for (K, V) {
    #[inline]
    fn serialized_size(&self) -> usize {
        self.0.serialized_size() + self.1.serialized_size()
    }

    fn encode(&self, w: &mut Writer<'_>) {
        self.0.encode(w);
        self.1.encode(w);
    }
}

impl<'de, K: Decode<'de>, V: Decode<'de>> Decode<'de> for (K, V) {
    fn decode(r: &mut Reader<'de>) -> Result<Self, CodecError> {
        Ok((K::decode(r)?, V::decode(r)?))
    }
}

impl<'a, K: DecodeIn<'a>, V: DecodeIn<'a>> DecodeIn<'a> for (K, V) {
    fn decode_in(r: &mut Reader<'_>, arena: &'a Arena) -> Result<Self, CodecError> {
        Ok((K::decode_in(r, arena)?, V::decode_in(r, arena)?))
    }
}

impl<K: Type, V: Type> Type for BTreeMap<K, V> {
    const TYPE: &'static TypeRef = &TypeRef::Map {
        key: K::TYPE,
        value: V::TYPE,
    };
    const FIXED_SIZE: Option<usize> = None;
    const IS_FLAT: bool = false;
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn serialized_size(&self) -> usize {
        COUNT_SIZE + entries_size(self.iter())
    }

    fn encode(&self, w: &mut Writer<'_>) {
        encode_entries(w, self.len(), self.iter());
    }
}

impl<'de, K, V> Decode<'de> for BTreeMap<K, V>
where
    K: Decode<'de> + Type + Ord,
    V: Decode<'de> + Type,
{
    fn decode(r: &mut Reader<'de>) -> Result<Self, CodecError> {
        let count = read_bounded_count(r, entry_min_size::<K, V>())?;
        let mut out = BTreeMap::new();
        for _ in 0..count {
            let k = K::decode(r)?;
            let v = V::decode(r)?;
            out.insert(k, v);
        }
        Ok(out)
    }
}

impl<'a, K, V> DecodeIn<'a> for BTreeMap<K, V>
where
    K: DecodeIn<'a> + Type + Ord,
    V: DecodeIn<'a> + Type,
{
    fn decode_in(r: &mut Reader<'_>, arena: &'a Arena) -> Result<Self, CodecError> {
        let count = read_bounded_count(r, entry_min_size::<K, V>())?;
        let mut out = BTreeMap::new();
        for _ in 0..count {
            let k = K::decode_in(r, arena)?;
            let v = V::decode_in(r, arena)?;
            out.insert(k, v);
        }
        Ok(out)
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_map(
            self.iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
            f,
        )
    }

    fn to_json(&self) -> Value {
        map_to_json(
            self.iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
        )
    }
}

impl<K: Type, V: Type, S> Type for HashMap<K, V, S> {
    const TYPE: &'static TypeRef = &TypeRef::Map {
        key: K::TYPE,
        value: V::TYPE,
    };
    const FIXED_SIZE: Option<usize> = None;
    const IS_FLAT: bool = false;
}

/// Entries are written in iteration order.
impl<K: Encode, V: Encode, S> Encode for HashMap<K, V, S> {
    fn serialized_size(&self) -> usize {
        COUNT_SIZE + entries_size(self.iter())
    }

    fn encode(&self, w: &mut Writer<'_>) {
        encode_entries(w, self.len(), self.iter());
    }
}

impl<'de, K, V, S> Decode<'de> for HashMap<K, V, S>
where
    K: Decode<'de> + Type + Eq + Hash,
    V: Decode<'de> + Type,
    S: BuildHasher + Default,
{
    fn decode(r: &mut Reader<'de>) -> Result<Self, CodecError> {
        let count = read_bounded_count(r, entry_min_size::<K, V>())?;
        let mut out = HashMap::with_capacity_and_hasher(count.min(r.remaining()), S::default());
        for _ in 0..count {
            let k = K::decode(r)?;
            let v = V::decode(r)?;
            out.insert(k, v);
        }
        Ok(out)
    }
}

impl<'a, K, V, S> DecodeIn<'a> for HashMap<K, V, S>
where
    K: DecodeIn<'a> + Type + Eq + Hash,
    V: DecodeIn<'a> + Type,
    S: BuildHasher + Default,
{
    fn decode_in(r: &mut Reader<'_>, arena: &'a Arena) -> Result<Self, CodecError> {
        let count = read_bounded_count(r, entry_min_size::<K, V>())?;
        let mut out = HashMap::with_capacity_and_hasher(count.min(r.remaining()), S::default());
        for _ in 0..count {
            let k = K::decode_in(r, arena)?;
            let v = V::decode_in(r, arena)?;
            out.insert(k, v);
        }
        Ok(out)
    }
}

impl<K: Reflect, V: Reflect, S> Reflect for HashMap<K, V, S> {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_map(
            self.iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
            f,
        )
    }

    fn to_json(&self) -> Value {
        map_to_json(
            self.iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
        )
    }
}

/// Arena-mode map: entries in wire order, stored in arena memory.
///
/// Lookups are linear; generated arena structs use this where the owned
/// representation would be a `BTreeMap`.
pub struct MapRef<'a, K, V> {
    entries: &'a [(K, V)],
}

impl<'a, K, V> MapRef<'a, K, V> {
    pub fn new(entries: &'a [(K, V)]) -> Self {
        Self { entries }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &'a [(K, V)] {
        self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a K, &'a V)> + 'a {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Value of the first entry whose key equals `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&'a V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }
}

impl<K, V> Clone for MapRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for MapRef<'_, K, V> {}

impl<K, V> Default for MapRef<'_, K, V> {
    fn default() -> Self {
        Self { entries: &[] }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for MapRef<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for MapRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Type, V: Type> Type for MapRef<'_, K, V> {
    const TYPE: &'static TypeRef = &TypeRef::Map {
        key: K::TYPE,
        value: V::TYPE,
    };
    const FIXED_SIZE: Option<usize> = None;
    const IS_FLAT: bool = false;
}

impl<K: Encode, V: Encode> Encode for MapRef<'_, K, V> {
    fn serialized_size(&self) -> usize {
        COUNT_SIZE + entries_size(self.iter())
    }

    fn encode(&self, w: &mut Writer<'_>) {
        encode_entries(w, self.len(), self.iter());
    }
}

impl<'a, K, V> DecodeIn<'a> for MapRef<'a, K, V>
where
    K: DecodeIn<'a> + Type,
    V: DecodeIn<'a> + Type,
{
    fn decode_in(r: &mut Reader<'_>, arena: &'a Arena) -> Result<Self, CodecError> {
        let entries = decode_seq_in(r, arena, entry_min_size::<K, V>(), |r| {
            Ok((K::decode_in(r, arena)?, V::decode_in(r, arena)?))
        })?;
        Ok(Self { entries })
    }
}

impl<K: Reflect, V: Reflect> Reflect for MapRef<'_, K, V> {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_map(
            self.iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
            f,
        )
    }

    fn to_json(&self) -> Value {
        map_to_json(
            self.iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
        )
    }
}
