//! Fixed-width scalars and `Decimal64`.

use std::fmt;
use std::mem::size_of;

use messgen_buffers::{Reader, Writer};
use messgen_decimal::Decimal64;
use serde_json::Value;

use crate::arena::Arena;
use crate::codec::{Decode, DecodeIn, Encode};
use crate::error::CodecError;
use crate::reflect::Reflect;
use crate::types::{Type, TypeRef};

macro_rules! impl_scalar {
    ($($ty:ty => $name:literal, $method:ident;)*) => {
        $(
            impl Type for $ty {
                const TYPE: &'static TypeRef = &TypeRef::Scalar {
                    name: $name,
                    size: size_of::<$ty>(),
                };
                const FIXED_SIZE: Option<usize> = Some(size_of::<$ty>());
                const IS_FLAT: bool = cfg!(target_endian = "little");
            }

            impl Encode for $ty {
                #[inline]
                fn serialized_size(&self) -> usize {
                    size_of::<$ty>()
                }

                #[inline]
                fn encode(&self, w: &mut Writer<'_>) {
                    w.$method(*self);
                }
            }

            impl<'de> Decode<'de> for $ty {
                #[inline]
                fn decode(r: &mut Reader<'de>) -> Result<Self, CodecError> {
                    Ok(r.$method()?)
                }
            }

            impl<'a> DecodeIn<'a> for $ty {
                #[inline]
                fn decode_in(r: &mut Reader<'_>, _arena: &'a Arena) -> Result<Self, CodecError> {
                    Ok(r.$method()?)
                }
            }

            impl Reflect for $ty {
                fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self)
                }

                fn to_json(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

impl_scalar! {
    u8 => "uint8", u8;
    i8 => "int8", i8;
    u16 => "uint16", u16;
    i16 => "int16", i16;
    u32 => "uint32", u32;
    i32 => "int32", i32;
    u64 => "uint64", u64;
    i64 => "int64", i64;
    f32 => "float32", f32;
    f64 => "float64", f64;
    bool => "bool", bool;
}

impl Type for Decimal64 {
    const TYPE: &'static TypeRef = &TypeRef::Decimal;
    const FIXED_SIZE: Option<usize> = Some(8);
    const IS_FLAT: bool = cfg!(target_endian = "little");
}

impl Encode for Decimal64 {
    #[inline]
    fn serialized_size(&self) -> usize {
        8
    }

    #[inline]
    fn encode(&self, w: &mut Writer<'_>) {
        w.u64(self.to_bits());
    }
}

impl<'de> Decode<'de> for Decimal64 {
    #[inline]
    fn decode(r: &mut Reader<'de>) -> Result<Self, CodecError> {
        Ok(Decimal64::from_bits(r.u64()?))
    }
}

impl<'a> DecodeIn<'a> for Decimal64 {
    #[inline]
    fn decode_in(r: &mut Reader<'_>, _arena: &'a Arena) -> Result<Self, CodecError> {
        Ok(Decimal64::from_bits(r.u64()?))
    }
}

impl Reflect for Decimal64 {
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }

    fn to_json(&self) -> Value {
        Value::String(self.to_string())
    }
}
