//! # Type declaration macros
//!
//! Declarative macros that expand a schema type declaration into the Rust
//! type plus every runtime trait it needs. Code generators emit these
//! invocations; hand-written types use them the same way.
//!
//! ## messgen_struct!
//!
//! ```
//! use messgen::{messgen_struct, Decode, Encode};
//!
//! messgen_struct! {
//!     #[messgen(name = "point")]
//!     pub struct Point {
//!         pub x: i32,
//!         pub y: i32,
//!         pub label: String,
//!     }
//! }
//!
//! let p = Point { x: 1, y: -1, label: "a".into() };
//! let wire = p.to_vec().unwrap();
//! assert_eq!(wire.len(), 4 + 4 + 4 + 1);
//! assert_eq!(Point::deserialize(&wire).unwrap().0, p);
//! assert_eq!(p.to_string(), "{x=1 y=-1 label=\"a\"}");
//! ```
//!
//! Structs without a lifetime decode owned in both modes. Structs with a
//! lifetime pick one mode with `decode = view` (borrow the input buffer) or
//! `decode = arena` (borrow an [`Arena`](crate::Arena)).
//!
//! ## messgen_enum!
//!
//! ```
//! use messgen::{messgen_enum, Enumeration};
//!
//! messgen_enum! {
//!     #[messgen(name = "color")]
//!     pub enum Color: u8 {
//!         Red = 0 => "red",
//!         Green = 1 => "green",
//!     }
//! }
//!
//! assert_eq!(Color::default(), Color::Red);
//! assert_eq!(Color::Green.name(), "green");
//! assert_eq!(Color::from_value(1), Some(Color::Green));
//! ```
//!
//! ## messgen_bitset!
//!
//! ```
//! use messgen::messgen_bitset;
//!
//! messgen_bitset! {
//!     #[messgen(name = "perms")]
//!     pub struct Perms: Perm(u8) {
//!         Read = 0 => "read",
//!         Write = 1 => "write",
//!     }
//! }
//!
//! let rw = Perms::from(Perm::Read).with(Perm::Write);
//! assert_eq!(rw.bits(), 0b11);
//! assert_eq!(rw.to_string(), "read|write");
//! ```
//!
//! ## messgen_protocol!
//!
//! ```
//! use messgen::{messgen_protocol, Dispatch, Protocol};
//! use messgen::envelope::{encode_message, Frame, FrameLimits};
//!
//! messgen_protocol! {
//!     #[messgen(proto_id = 7, name = "telemetry")]
//!     pub enum Telemetry {
//!         0 => heartbeat: Heartbeat(u32),
//!         1 => note: Note(String),
//!     }
//! }
//!
//! let wire = encode_message(&Telemetry::Heartbeat(9)).unwrap();
//! let (frame, _) = Frame::parse(&wire, &FrameLimits::default()).unwrap();
//! assert_eq!(frame.decode::<Telemetry>().unwrap(), Some(Telemetry::Heartbeat(9)));
//! assert_eq!(Telemetry::message_info(1).unwrap().name, "note");
//! ```

/// Picks the explicit value when one is given, the default otherwise.
#[doc(hidden)]
#[macro_export]
macro_rules! __messgen_pick {
    ($default:expr) => {
        $default
    };
    ($default:expr, $given:expr) => {
        $given
    };
}

/// Declares a schema struct.
#[macro_export]
macro_rules! messgen_struct {
    (@decode [owned $($rest:ident)*] $ident:ident [] { $($field:ident : $fty:ty),* }) => {
        impl<'de> $crate::Decode<'de> for $ident {
            #[allow(unused_variables)]
            fn decode(r: &mut $crate::Reader<'de>) -> ::core::result::Result<Self, $crate::CodecError> {
                Ok(Self {
                    $( $field: <$fty as $crate::Decode<'de>>::decode(r)?, )*
                })
            }
        }

        impl<'a> $crate::DecodeIn<'a> for $ident {
            #[allow(unused_variables)]
            fn decode_in(
                r: &mut $crate::Reader<'_>,
                arena: &'a $crate::Arena,
            ) -> ::core::result::Result<Self, $crate::CodecError> {
                Ok(Self {
                    $( $field: <$fty as $crate::DecodeIn<'a>>::decode_in(r, arena)?, )*
                })
            }
        }
    };
    (@decode [owned $($rest:ident)*] $ident:ident [$lt:lifetime] $($tail:tt)*) => {
        ::core::compile_error!("structs with a lifetime need `decode = view` or `decode = arena`");
    };
    (@decode [view $($rest:ident)*] $ident:ident [$lt:lifetime] { $($field:ident : $fty:ty),* }) => {
        impl<$lt> $crate::Decode<$lt> for $ident<$lt> {
            #[allow(unused_variables)]
            fn decode(r: &mut $crate::Reader<$lt>) -> ::core::result::Result<Self, $crate::CodecError> {
                Ok(Self {
                    $( $field: <$fty as $crate::Decode<$lt>>::decode(r)?, )*
                })
            }
        }
    };
    (@decode [arena $($rest:ident)*] $ident:ident [$lt:lifetime] { $($field:ident : $fty:ty),* }) => {
        impl<$lt> $crate::DecodeIn<$lt> for $ident<$lt> {
            #[allow(unused_variables)]
            fn decode_in(
                r: &mut $crate::Reader<'_>,
                arena: &$lt $crate::Arena,
            ) -> ::core::result::Result<Self, $crate::CodecError> {
                Ok(Self {
                    $( $field: <$fty as $crate::DecodeIn<$lt>>::decode_in(r, arena)?, )*
                })
            }
        }
    };
    (
        #[messgen(name = $name:literal $(, schema = $schema:literal)? $(, decode = $mode:ident)? $(,)?)]
        $(#[$attr:meta])*
        $vis:vis struct $ident:ident $(<$lt:lifetime>)? {
            $( $(#[$fattr:meta])* $fvis:vis $field:ident : $fty:ty ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Default)]
        #[repr(C)]
        $vis struct $ident $(<$lt>)? {
            $( $(#[$fattr])* $fvis $field: $fty, )*
        }

        impl $(<$lt>)? $crate::Type for $ident $(<$lt>)? {
            const TYPE: &'static $crate::TypeRef = &$crate::TypeRef::Named {
                name: $name,
                class: $crate::TypeClass::Struct,
                hash: $crate::hash::struct_hash(
                    $name,
                    &[ $( (::core::stringify!($field), <$fty as $crate::Type>::TYPE) ),* ],
                ),
            };
            const FIXED_SIZE: ::core::option::Option<usize> =
                $crate::types::sum_fixed_sizes(&[ $( <$fty as $crate::Type>::FIXED_SIZE ),* ]);
            const IS_FLAT: bool =
                $crate::types::all_flat(&[ $( <$fty as $crate::Type>::IS_FLAT ),* ])
                    && ::core::matches!(
                        <Self as $crate::Type>::FIXED_SIZE,
                        Some(size) if size == ::core::mem::size_of::<Self>()
                    );
            const MIN_SIZE: usize =
                $crate::types::sum_min_sizes(&[ $( <$fty as $crate::Type>::MIN_SIZE ),* ]);
        }

        impl $(<$lt>)? $crate::Schema for $ident $(<$lt>)? {
            const NAME: &'static str = $name;
            const SCHEMA: &'static str = $crate::__messgen_pick!("" $(, $schema)?);
        }

        impl $(<$lt>)? $crate::Fields for $ident $(<$lt>)? {
            const FIELDS: &'static [$crate::FieldInfo] = &[
                $( $crate::FieldInfo {
                    name: ::core::stringify!($field),
                    ty: <$fty as $crate::Type>::TYPE,
                }, )*
            ];

            #[allow(unused_variables, unused_mut)]
            fn visit_fields(
                &self,
                visitor: &mut dyn FnMut(&'static $crate::FieldInfo, &dyn $crate::Reflect),
            ) {
                let mut fields = <Self as $crate::Fields>::FIELDS.iter();
                $(
                    if let Some(info) = fields.next() {
                        visitor(info, &self.$field);
                    }
                )*
            }
        }

        impl $(<$lt>)? $crate::Reflect for $ident $(<$lt>)? {
            fn fmt_text(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                $crate::reflect::fmt_struct(self, f)
            }

            fn to_json(&self) -> $crate::__private::serde_json::Value {
                $crate::reflect::struct_to_json(self)
            }
        }

        impl $(<$lt>)? ::core::fmt::Display for $ident $(<$lt>)? {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                $crate::reflect::fmt_struct(self, f)
            }
        }

        impl $(<$lt>)? $crate::Encode for $ident $(<$lt>)? {
            fn serialized_size(&self) -> usize {
                match <Self as $crate::Type>::FIXED_SIZE {
                    Some(size) => size,
                    None => 0 $( + $crate::Encode::serialized_size(&self.$field) )*,
                }
            }

            #[allow(unused_variables)]
            fn encode(&self, w: &mut $crate::Writer<'_>) {
                $( $crate::Encode::encode(&self.$field, w); )*
            }
        }

        $crate::messgen_struct!(@decode [$($mode)? owned] $ident [$($lt)?] { $($field : $fty),* });
    };
}

/// Declares a schema enum over an integer base type.
///
/// Enumerator names default to the variant identifier; `=> "name"` sets the
/// schema spelling. The first variant is the default value.
#[macro_export]
macro_rules! messgen_enum {
    (@first $first:ident $($rest:ident)*) => {
        Self::$first
    };
    (
        #[messgen(name = $name:literal $(, schema = $schema:literal)? $(,)?)]
        $(#[$attr:meta])*
        $vis:vis enum $ident:ident : $base:ident {
            $( $(#[$vattr:meta])* $variant:ident = $value:expr $(=> $vname:literal)? ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr($base)]
        $vis enum $ident {
            $( $(#[$vattr])* $variant = $value, )+
        }

        impl ::core::default::Default for $ident {
            fn default() -> Self {
                $crate::messgen_enum!(@first $($variant)+)
            }
        }

        impl $crate::Type for $ident {
            const TYPE: &'static $crate::TypeRef = &$crate::TypeRef::Named {
                name: $name,
                class: $crate::TypeClass::Enum,
                hash: $crate::hash::enum_hash(
                    $name,
                    <$base as $crate::Type>::TYPE,
                    &[ $( (
                        $crate::__messgen_pick!(::core::stringify!($variant) $(, $vname)?),
                        $ident::$variant as i64,
                    ) ),+ ],
                ),
            };
            const FIXED_SIZE: ::core::option::Option<usize> = <$base as $crate::Type>::FIXED_SIZE;
            const IS_FLAT: bool = <$base as $crate::Type>::IS_FLAT;
        }

        impl $crate::Schema for $ident {
            const NAME: &'static str = $name;
            const SCHEMA: &'static str = $crate::__messgen_pick!("" $(, $schema)?);
        }

        impl $crate::Enumeration for $ident {
            const ENUMERATORS: &'static [(&'static str, Self)] = &[
                $( (
                    $crate::__messgen_pick!(::core::stringify!($variant) $(, $vname)?),
                    Self::$variant,
                ), )+
            ];

            #[inline]
            fn value(self) -> i64 {
                self as i64
            }

            fn from_value(value: i64) -> ::core::option::Option<Self> {
                $(
                    if value == Self::$variant as i64 {
                        return Some(Self::$variant);
                    }
                )+
                None
            }
        }

        impl $crate::Encode for $ident {
            #[inline]
            fn serialized_size(&self) -> usize {
                ::core::mem::size_of::<$base>()
            }

            #[inline]
            fn encode(&self, w: &mut $crate::Writer<'_>) {
                $crate::Encode::encode(&(*self as $base), w)
            }
        }

        impl<'de> $crate::Decode<'de> for $ident {
            fn decode(r: &mut $crate::Reader<'de>) -> ::core::result::Result<Self, $crate::CodecError> {
                let raw = <$base as $crate::Decode<'de>>::decode(r)?;
                <Self as $crate::Enumeration>::from_value(raw as i64).ok_or(
                    $crate::CodecError::InvalidEnumValue {
                        name: $name,
                        value: raw as i64,
                    },
                )
            }
        }

        impl<'a> $crate::DecodeIn<'a> for $ident {
            #[inline]
            fn decode_in(
                r: &mut $crate::Reader<'_>,
                _arena: &'a $crate::Arena,
            ) -> ::core::result::Result<Self, $crate::CodecError> {
                <Self as $crate::Decode<'_>>::decode(r)
            }
        }

        impl $crate::Reflect for $ident {
            fn fmt_text(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str($crate::Enumeration::name(*self))
            }

            fn to_json(&self) -> $crate::__private::serde_json::Value {
                $crate::__private::serde_json::Value::from($crate::Enumeration::name(*self))
            }
        }

        impl ::core::fmt::Display for $ident {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str($crate::Enumeration::name(*self))
            }
        }
    };
}

/// Declares a schema bitset: a flag enum plus a [`Bitset`](crate::Bitset)
/// alias over it.
#[macro_export]
macro_rules! messgen_bitset {
    (
        #[messgen(name = $name:literal $(, schema = $schema:literal)? $(,)?)]
        $(#[$attr:meta])*
        $vis:vis struct $ident:ident : $flag:ident ( $bits:ident ) {
            $( $(#[$vattr:meta])* $variant:ident = $offset:literal $(=> $vname:literal)? ),+ $(,)?
        }
    ) => {
        #[doc = ::core::concat!("Flags of [`", ::core::stringify!($ident), "`].")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $flag {
            $( $(#[$vattr])* $variant, )+
        }

        const _: () = {
            $( ::core::assert!(($offset as u32) < <$bits>::BITS, "bit offset exceeds the base type width"); )+
        };

        impl $crate::BitFlag for $flag {
            type Bits = $bits;
            const NAME: &'static str = $name;
            const SCHEMA: &'static str = $crate::__messgen_pick!("" $(, $schema)?);
            const BITS: &'static [(&'static str, u32)] = &[
                $( ($crate::__messgen_pick!(::core::stringify!($variant) $(, $vname)?), $offset), )+
            ];

            fn offset(self) -> u32 {
                match self {
                    $( Self::$variant => $offset, )+
                }
            }

            fn from_offset(offset: u32) -> ::core::option::Option<Self> {
                match offset {
                    $( $offset => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        $(#[$attr])*
        $vis type $ident = $crate::Bitset<$flag>;
    };
}

/// Declares a protocol: an enum with one variant per message and the
/// [`Protocol`](crate::Protocol) and dispatch impls.
///
/// Each entry reads `id => message_name: Variant(DataType)`. Message ids
/// must be unique; duplicates fail to compile.
#[macro_export]
macro_rules! messgen_protocol {
    (@dispatch [owned $($rest:ident)*] $ident:ident [] { $($id:literal => $variant:ident ( $ty:ty )),* }) => {
        impl<'de> $crate::Dispatch<'de> for $ident {
            fn decode_message(
                message_id: u8,
                payload: &'de [u8],
            ) -> ::core::result::Result<::core::option::Option<Self>, $crate::CodecError> {
                match message_id {
                    $( $id => $crate::protocol::decode_payload::<$ty>(message_id, payload)
                        .map(Self::$variant)
                        .map(Some), )*
                    _ => Ok(None),
                }
            }
        }

        impl<'a> $crate::DispatchIn<'a> for $ident {
            fn decode_message_in(
                message_id: u8,
                payload: &[u8],
                arena: &'a $crate::Arena,
            ) -> ::core::result::Result<::core::option::Option<Self>, $crate::CodecError> {
                match message_id {
                    $( $id => $crate::protocol::decode_payload_in::<$ty>(message_id, payload, arena)
                        .map(Self::$variant)
                        .map(Some), )*
                    _ => Ok(None),
                }
            }
        }
    };
    (@dispatch [owned $($rest:ident)*] $ident:ident [$lt:lifetime] $($tail:tt)*) => {
        ::core::compile_error!("protocols with a lifetime need `decode = view` or `decode = arena`");
    };
    (@dispatch [view $($rest:ident)*] $ident:ident [$lt:lifetime] { $($id:literal => $variant:ident ( $ty:ty )),* }) => {
        impl<$lt> $crate::Dispatch<$lt> for $ident<$lt> {
            fn decode_message(
                message_id: u8,
                payload: &$lt [u8],
            ) -> ::core::result::Result<::core::option::Option<Self>, $crate::CodecError> {
                match message_id {
                    $( $id => $crate::protocol::decode_payload::<$ty>(message_id, payload)
                        .map(Self::$variant)
                        .map(Some), )*
                    _ => Ok(None),
                }
            }
        }
    };
    (@dispatch [arena $($rest:ident)*] $ident:ident [$lt:lifetime] { $($id:literal => $variant:ident ( $ty:ty )),* }) => {
        impl<$lt> $crate::DispatchIn<$lt> for $ident<$lt> {
            fn decode_message_in(
                message_id: u8,
                payload: &[u8],
                arena: &$lt $crate::Arena,
            ) -> ::core::result::Result<::core::option::Option<Self>, $crate::CodecError> {
                match message_id {
                    $( $id => $crate::protocol::decode_payload_in::<$ty>(message_id, payload, arena)
                        .map(Self::$variant)
                        .map(Some), )*
                    _ => Ok(None),
                }
            }
        }
    };
    (
        #[messgen(proto_id = $proto_id:literal, name = $name:literal $(, decode = $mode:ident)? $(,)?)]
        $(#[$attr:meta])*
        $vis:vis enum $ident:ident $(<$lt:lifetime>)? {
            $( $(#[$vattr:meta])* $id:literal => $msg:ident : $variant:ident ( $ty:ty ) ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $ident $(<$lt>)? {
            $( $(#[$vattr])* $variant($ty), )+
        }

        const _: () = ::core::assert!(
            $crate::protocol::unique_ids(&[ $( $id ),+ ]),
            "duplicate message id in protocol"
        );

        impl $(<$lt>)? $crate::Protocol for $ident $(<$lt>)? {
            const PROTO_ID: u16 = $proto_id;
            const NAME: &'static str = $name;
            const MESSAGES: &'static [$crate::MessageInfo] = &[
                $( $crate::MessageInfo::new(
                    $proto_id,
                    $id,
                    ::core::stringify!($msg),
                    <$ty as $crate::Type>::TYPE,
                ), )+
            ];

            fn message_id(&self) -> u8 {
                match self {
                    $( Self::$variant(_) => $id, )+
                }
            }

            fn payload(&self) -> &dyn $crate::Encode {
                match self {
                    $( Self::$variant(data) => data as &dyn $crate::Encode, )+
                }
            }
        }

        impl $(<$lt>)? $crate::Reflect for $ident $(<$lt>)? {
            fn fmt_text(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str("{data=")?;
                match self {
                    $( Self::$variant(data) => $crate::Reflect::fmt_text(data, f)?, )+
                }
                f.write_str("}")
            }

            fn to_json(&self) -> $crate::__private::serde_json::Value {
                let data = match self {
                    $( Self::$variant(data) => $crate::Reflect::to_json(data), )+
                };
                $crate::__private::serde_json::json!({ "data": data })
            }
        }

        $crate::messgen_protocol!(@dispatch [$($mode)? owned] $ident [$($lt)?] { $($id => $variant ($ty)),+ });
    };
}
