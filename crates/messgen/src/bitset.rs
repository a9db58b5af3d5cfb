//! Typed bitsets over an unsigned integer.
//!
//! A schema bitset is a set of named bit offsets stored in an unsigned
//! integer. [`Bitset`] wraps the integer and is tagged with the generated
//! flag enum `F`. Set-with-set and set-with-flag operations use distinct
//! method names instead of overloaded operators:
//!
//! | operands      | methods                                                        |
//! |---------------|----------------------------------------------------------------|
//! | set, set      | `union`, `intersect`, `toggle`, `difference`, `contains_all`, `intersects` |
//! | set, flag     | `with`, `without`, `toggled`, `contains`                       |
//! | set           | `complement`, `is_empty`, `iter`                               |

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use messgen_buffers::{Reader, Writer};
use num_traits::{One, PrimInt, Unsigned, Zero};
use serde_json::Value;

use crate::arena::Arena;
use crate::codec::{Decode, DecodeIn, Encode};
use crate::error::CodecError;
use crate::hash;
use crate::reflect::Reflect;
use crate::types::{Schema, Type, TypeClass, TypeRef};

/// Flag enum of a generated bitset.
pub trait BitFlag: Copy + Eq + 'static {
    /// Underlying unsigned storage.
    type Bits: PrimInt
        + Unsigned
        + Encode
        + for<'de> Decode<'de>
        + Type
        + Into<u64>
        + fmt::Debug
        + Hash;

    const NAME: &'static str;
    const SCHEMA: &'static str;

    /// `(name, offset)` of every declared bit.
    const BITS: &'static [(&'static str, u32)];

    fn offset(self) -> u32;

    fn from_offset(offset: u32) -> Option<Self>;

    fn name(self) -> &'static str {
        let offset = self.offset();
        Self::BITS
            .iter()
            .find(|&&(_, o)| o == offset)
            .map_or("", |&(name, _)| name)
    }

    #[inline]
    fn mask(self) -> Self::Bits {
        Self::Bits::one() << self.offset() as usize
    }
}

/// Set of flags `F`, stored as `F::Bits`.
///
/// Undeclared bits are preserved by every operation except
/// [`Bitset::from_bits_truncate`], so values round-trip untouched.
#[repr(transparent)]
pub struct Bitset<F: BitFlag> {
    bits: F::Bits,
    _flag: PhantomData<F>,
}

impl<F: BitFlag> Bitset<F> {
    pub fn empty() -> Self {
        Self::from_bits(F::Bits::zero())
    }

    /// Every declared flag.
    pub fn all() -> Self {
        let bits = F::BITS.iter().fold(F::Bits::zero(), |acc, &(_, offset)| {
            acc | (F::Bits::one() << offset as usize)
        });
        Self::from_bits(bits)
    }

    #[inline]
    pub fn from_bits(bits: F::Bits) -> Self {
        Self {
            bits,
            _flag: PhantomData,
        }
    }

    /// Keeps only declared bits.
    pub fn from_bits_truncate(bits: F::Bits) -> Self {
        Self::from_bits(bits & Self::all().bits)
    }

    #[inline]
    pub fn bits(self) -> F::Bits {
        self.bits
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.bits.is_zero()
    }

    pub fn union(self, other: Self) -> Self {
        Self::from_bits(self.bits | other.bits)
    }

    pub fn intersect(self, other: Self) -> Self {
        Self::from_bits(self.bits & other.bits)
    }

    /// Symmetric difference.
    pub fn toggle(self, other: Self) -> Self {
        Self::from_bits(self.bits ^ other.bits)
    }

    pub fn difference(self, other: Self) -> Self {
        Self::from_bits(self.bits & !other.bits)
    }

    /// Flips every bit of the underlying integer, declared or not.
    pub fn complement(self) -> Self {
        Self::from_bits(!self.bits)
    }

    pub fn contains_all(self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    pub fn intersects(self, other: Self) -> bool {
        !(self.bits & other.bits).is_zero()
    }

    pub fn with(self, flag: F) -> Self {
        Self::from_bits(self.bits | flag.mask())
    }

    pub fn without(self, flag: F) -> Self {
        Self::from_bits(self.bits & !flag.mask())
    }

    pub fn toggled(self, flag: F) -> Self {
        Self::from_bits(self.bits ^ flag.mask())
    }

    pub fn contains(self, flag: F) -> bool {
        !(self.bits & flag.mask()).is_zero()
    }

    /// Declared flags that are set, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = F> {
        F::BITS
            .iter()
            .filter_map(|&(_, offset)| F::from_offset(offset))
            .filter(move |&flag| self.contains(flag))
    }

    /// Set bits that no flag declares.
    fn undeclared(self) -> F::Bits {
        self.bits & !Self::all().bits
    }
}

impl<F: BitFlag> From<F> for Bitset<F> {
    fn from(flag: F) -> Self {
        Self::from_bits(flag.mask())
    }
}

impl<F: BitFlag> FromIterator<F> for Bitset<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl<F: BitFlag> Clone for Bitset<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: BitFlag> Copy for Bitset<F> {}

impl<F: BitFlag> Default for Bitset<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F: BitFlag> PartialEq for Bitset<F> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<F: BitFlag> Eq for Bitset<F> {}

impl<F: BitFlag> Hash for Bitset<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<F: BitFlag> fmt::Display for Bitset<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for flag in self.iter() {
            if !first {
                f.write_str("|")?;
            }
            first = false;
            f.write_str(flag.name())?;
        }
        let rest = self.undeclared();
        if !rest.is_zero() {
            if !first {
                f.write_str("|")?;
            }
            first = false;
            write!(f, "{:#x}", Into::<u64>::into(rest))?;
        }
        if first {
            f.write_str("0")?;
        }
        Ok(())
    }
}

impl<F: BitFlag> fmt::Debug for Bitset<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", F::NAME, self)
    }
}

impl<F: BitFlag> Type for Bitset<F> {
    const TYPE: &'static TypeRef = &TypeRef::Named {
        name: F::NAME,
        class: TypeClass::Bitset,
        hash: hash::bitset_hash(F::NAME, <F::Bits as Type>::TYPE, F::BITS),
    };
    const FIXED_SIZE: Option<usize> = <F::Bits as Type>::FIXED_SIZE;
    const IS_FLAT: bool = <F::Bits as Type>::IS_FLAT;
}

impl<F: BitFlag> Schema for Bitset<F> {
    const NAME: &'static str = F::NAME;
    const SCHEMA: &'static str = F::SCHEMA;
}

impl<F: BitFlag> Encode for Bitset<F> {
    #[inline]
    fn serialized_size(&self) -> usize {
        self.bits.serialized_size()
    }

    #[inline]
    fn encode(&self, w: &mut Writer<'_>) {
        self.bits.encode(w)
    }
}

impl<'de, F: BitFlag> Decode<'de> for Bitset<F> {
    #[inline]
    fn decode(r: &mut Reader<'de>) -> Result<Self, CodecError> {
        Ok(Self::from_bits(F::Bits::decode(r)?))
    }
}

impl<'a, F: BitFlag> DecodeIn<'a> for Bitset<F> {
    #[inline]
    fn decode_in(r: &mut Reader<'_>, _arena: &'a Arena) -> Result<Self, CodecError> {
        Ok(Self::from_bits(F::Bits::decode(r)?))
    }
}

impl<F: BitFlag> Reflect for Bitset<F> {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }

    fn to_json(&self) -> Value {
        Value::from(Into::<u64>::into(self.bits))
    }
}
