//! Codec, type and reflection impls for built-in wire types.

mod containers;
mod scalar;

pub use containers::MapRef;
