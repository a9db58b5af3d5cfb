//! Zero-copy sequence and map views.
//!
//! A view keeps the encoded bytes of its elements and decodes them on
//! access. Every element is validated once when the view itself is
//! decoded, so later accesses cannot fail and never allocate.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;

use messgen_buffers::{Reader, Writer};
use serde_json::Value;

use crate::codec::{read_bounded_count, write_count, Decode, Encode, COUNT_SIZE};
use crate::error::CodecError;
use crate::reflect::{fmt_map, fmt_seq, map_to_json, seq_to_json, Reflect};
use crate::types::{Type, TypeRef};

/// Reads a count prefix and walks `count` elements with `each`, returning
/// the count and the bytes they span.
fn decode_extent<'a>(
    r: &mut Reader<'a>,
    min_element_size: usize,
    mut each: impl FnMut(&mut Reader<'a>) -> Result<(), CodecError>,
) -> Result<(usize, &'a [u8]), CodecError> {
    let len = read_bounded_count(r, min_element_size)?;
    let data = r.data;
    let start = r.position();
    for _ in 0..len {
        each(r)?;
    }
    Ok((len, &data[start..r.position()]))
}

/// Borrowed view of an encoded vector.
///
/// Fixed-size elements support O(1) [`ListView::get`]; variable-size
/// elements are reached by walking from the front.
///
/// ```
/// use messgen::{Decode, Encode, ListView};
///
/// let bytes = vec![10u32, 20, 30].to_vec().unwrap();
/// let (view, _) = ListView::<u32>::deserialize(&bytes).unwrap();
/// assert_eq!(view.len(), 3);
/// assert_eq!(view.get(1), Some(20));
/// assert_eq!(view.iter().sum::<u32>(), 60);
/// ```
pub struct ListView<'a, T> {
    bytes: &'a [u8],
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T> ListView<'a, T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Encoded element bytes, without the count prefix.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a, T: Decode<'a> + Type> ListView<'a, T> {
    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        match T::FIXED_SIZE {
            Some(size) => {
                let start = index * size;
                T::decode(&mut Reader::new(&self.bytes[start..start + size])).ok()
            }
            None => self.iter().nth(index),
        }
    }

    pub fn iter(&self) -> ListIter<'a, T> {
        ListIter {
            reader: Reader::new(self.bytes),
            remaining: self.len,
            _marker: PhantomData,
        }
    }
}

/// Iterator over the elements of a [`ListView`].
pub struct ListIter<'a, T> {
    reader: Reader<'a>,
    remaining: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: Decode<'a>> Iterator for ListIter<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        match T::decode(&mut self.reader) {
            Ok(item) => Some(item),
            Err(_) => {
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: Decode<'a> + Type> IntoIterator for &ListView<'a, T> {
    type Item = T;
    type IntoIter = ListIter<'a, T>;

    fn into_iter(self) -> ListIter<'a, T> {
        self.iter()
    }
}

impl<T> Clone for ListView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListView<'_, T> {}

impl<T> Default for ListView<'_, T> {
    fn default() -> Self {
        Self {
            bytes: &[],
            len: 0,
            _marker: PhantomData,
        }
    }
}

/// Views compare by their encoded bytes.
impl<T> PartialEq for ListView<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.bytes == other.bytes
    }
}

impl<'a, T: Decode<'a> + Type + fmt::Debug> fmt::Debug for ListView<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Type> Type for ListView<'_, T> {
    const TYPE: &'static TypeRef = &TypeRef::Vector { element: T::TYPE };
    const FIXED_SIZE: Option<usize> = None;
    const IS_FLAT: bool = false;
}

impl<T> Encode for ListView<'_, T> {
    #[inline]
    fn serialized_size(&self) -> usize {
        COUNT_SIZE + self.bytes.len()
    }

    fn encode(&self, w: &mut Writer<'_>) {
        write_count(w, self.len);
        w.buf(self.bytes);
    }
}

impl<'a, T: Decode<'a> + Type> Decode<'a> for ListView<'a, T> {
    fn decode(r: &mut Reader<'a>) -> Result<Self, CodecError> {
        let (len, bytes) = decode_extent(r, T::MIN_SIZE, |r| {
            T::decode(r).map(drop)
        })?;
        Ok(Self {
            bytes,
            len,
            _marker: PhantomData,
        })
    }
}

impl<'a, T: Decode<'a> + Type + Reflect> Reflect for ListView<'a, T> {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<T> = self.iter().collect();
        fmt_seq(items.iter().map(|item| item as &dyn Reflect), f)
    }

    fn to_json(&self) -> Value {
        let items: Vec<T> = self.iter().collect();
        seq_to_json(items.iter().map(|item| item as &dyn Reflect))
    }
}

/// Borrowed view of an encoded map, entries in wire order.
pub struct MapView<'a, K, V> {
    bytes: &'a [u8],
    len: usize,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<'a, K, V> MapView<'a, K, V> {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a, K: Decode<'a>, V: Decode<'a>> MapView<'a, K, V> {
    pub fn iter(&self) -> MapIter<'a, K, V> {
        MapIter {
            reader: Reader::new(self.bytes),
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Value of the first entry whose key equals `key`. Linear.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }
}

/// Iterator over the entries of a [`MapView`].
pub struct MapIter<'a, K, V> {
    reader: Reader<'a>,
    remaining: usize,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<'a, K: Decode<'a>, V: Decode<'a>> Iterator for MapIter<'a, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        match <(K, V)>::decode(&mut self.reader) {
            Ok(entry) => Some(entry),
            Err(_) => {
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> Clone for MapView<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for MapView<'_, K, V> {}

impl<K, V> Default for MapView<'_, K, V> {
    fn default() -> Self {
        Self {
            bytes: &[],
            len: 0,
            _marker: PhantomData,
        }
    }
}

impl<K, V> PartialEq for MapView<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.bytes == other.bytes
    }
}

impl<'a, K, V> fmt::Debug for MapView<'a, K, V>
where
    K: Decode<'a> + fmt::Debug,
    V: Decode<'a> + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Type, V: Type> Type for MapView<'_, K, V> {
    const TYPE: &'static TypeRef = &TypeRef::Map {
        key: K::TYPE,
        value: V::TYPE,
    };
    const FIXED_SIZE: Option<usize> = None;
    const IS_FLAT: bool = false;
}

impl<K, V> Encode for MapView<'_, K, V> {
    #[inline]
    fn serialized_size(&self) -> usize {
        COUNT_SIZE + self.bytes.len()
    }

    fn encode(&self, w: &mut Writer<'_>) {
        write_count(w, self.len);
        w.buf(self.bytes);
    }
}

impl<'a, K, V> Decode<'a> for MapView<'a, K, V>
where
    K: Decode<'a> + Type,
    V: Decode<'a> + Type,
{
    fn decode(r: &mut Reader<'a>) -> Result<Self, CodecError> {
        let min = K::MIN_SIZE + V::MIN_SIZE;
        let (len, bytes) = decode_extent(r, min, |r| <(K, V)>::decode(r).map(drop))?;
        Ok(Self {
            bytes,
            len,
            _marker: PhantomData,
        })
    }
}

impl<'a, K, V> Reflect for MapView<'a, K, V>
where
    K: Decode<'a> + Reflect,
    V: Decode<'a> + Reflect,
{
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<(K, V)> = self.iter().collect();
        fmt_map(
            entries
                .iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
            f,
        )
    }

    fn to_json(&self) -> Value {
        let entries: Vec<(K, V)> = self.iter().collect();
        map_to_json(
            entries
                .iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_fixed_list_view_random_access() {
        let values: Vec<i64> = (0..10).map(|i| i * i - 7).collect();
        let bytes = values.to_vec().unwrap();
        let (view, used) = ListView::<i64>::deserialize(&bytes).unwrap();
        assert_eq!(used, bytes.len());
        assert_eq!(view.get(3), Some(2));
        assert_eq!(view.get(10), None);
        assert_eq!(view.iter().collect::<Vec<_>>(), values);
        assert_eq!(view.to_vec().unwrap(), bytes);
    }

    #[test]
    fn test_variable_list_view() {
        let values = vec![String::from("a"), String::from("bcd"), String::new()];
        let bytes = values.to_vec().unwrap();
        let (view, _) = ListView::<&str>::deserialize(&bytes).unwrap();
        assert_eq!(view.get(1), Some("bcd"));
        assert_eq!(view.iter().collect::<Vec<_>>(), ["a", "bcd", ""]);
        assert_eq!(format!("{view:?}"), r#"["a", "bcd", ""]"#);
    }

    #[test]
    fn test_list_view_validates_elements() {
        let mut bytes = vec![String::from("ab")].to_vec().unwrap();
        bytes[4] = 0xff;
        assert_eq!(
            ListView::<&str>::deserialize(&bytes),
            Err(CodecError::InvalidUtf8)
        );
        let truncated = &vec![1u32, 2].to_vec().unwrap()[..10];
        assert!(matches!(
            ListView::<u32>::deserialize(truncated),
            Err(CodecError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_map_view() {
        let mut map = BTreeMap::new();
        map.insert(1i32, String::from("one"));
        map.insert(2i32, String::from("two"));
        let bytes = map.to_vec().unwrap();
        let (view, _) = MapView::<i32, &str>::deserialize(&bytes).unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(view.get(&2), Some("two"));
        assert_eq!(view.get(&3), None);
        assert_eq!(crate::reflect::display(&view).to_string(), r#"{1:"one", 2:"two"}"#);
        assert_eq!(view.to_vec().unwrap(), bytes);
    }
}
