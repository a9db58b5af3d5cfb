//! Runtime for messgen schema-driven binary messages.
//!
//! Generated code (or the [`messgen_struct!`], [`messgen_enum!`],
//! [`messgen_bitset!`] and [`messgen_protocol!`] macros) builds on the
//! pieces here:
//!
//! - [`Encode`], [`Decode`], [`DecodeIn`] - the wire codec
//! - [`ListView`], [`MapView`], [`ByteView`], [`Bytes`] - borrowed and deferred payloads
//! - [`Arena`] - bounded bump storage for arena-mode decoding
//! - [`Bitset`] - typed flag sets
//! - [`Type`], [`Reflect`], [`hash`] - static metadata, formatting and structural hashes
//! - [`Protocol`], [`envelope`] - message dispatch and framing
//!
//! # Example
//!
//! ```
//! use messgen::{Arena, Decode, DecodeIn, Encode, ListView};
//!
//! let wire = vec![1.5f64, -2.0].to_vec().unwrap();
//!
//! // View mode borrows the input.
//! let (view, _) = ListView::<f64>::deserialize(&wire).unwrap();
//! assert_eq!(view.iter().collect::<Vec<_>>(), [1.5, -2.0]);
//!
//! // Arena mode copies into the arena.
//! let arena = Arena::with_capacity(64);
//! let (values, _) = <&[f64]>::deserialize_in(&wire, &arena).unwrap();
//! assert_eq!(values, &[1.5, -2.0]);
//! ```

mod arena;
mod bitset;
mod bytes;
mod codec;
mod error;
mod impls;
mod macros;
mod view;

pub mod envelope;
pub mod hash;
pub mod protocol;
pub mod reflect;
pub mod types;

pub use arena::{AllocError, Arena};
pub use bitset::{BitFlag, Bitset};
pub use bytes::{ByteView, Bytes};
pub use codec::{
    read_bounded_count, read_count, write_count, Decode, DecodeIn, Encode, COUNT_SIZE,
    MAX_ZERO_SIZE_COUNT,
};
pub use error::CodecError;
pub use impls::MapRef;
pub use messgen_buffers::{Reader, Writer};
pub use messgen_decimal::{Decimal64, ParseDecimalError, RoundMode};
pub use protocol::{Dispatch, DispatchIn, MessageInfo, Protocol};
pub use reflect::{Enumeration, FieldInfo, Fields, Reflect};
pub use types::{Schema, Type, TypeClass, TypeRef};
pub use view::{ListIter, ListView, MapIter, MapView};

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
