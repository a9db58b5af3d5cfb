//! Static type metadata.

use std::fmt;

use crate::codec::COUNT_SIZE;
use crate::hash;

/// Classification of a schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Scalar,
    Decimal,
    String,
    Bytes,
    Vector,
    Array,
    Map,
    Enum,
    Bitset,
    Struct,
}

impl TypeClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeClass::Scalar => "scalar",
            TypeClass::Decimal => "decimal",
            TypeClass::String => "string",
            TypeClass::Bytes => "bytes",
            TypeClass::Vector => "vector",
            TypeClass::Array => "array",
            TypeClass::Map => "map",
            TypeClass::Enum => "enum",
            TypeClass::Bitset => "bitset",
            TypeClass::Struct => "struct",
        }
    }
}

impl fmt::Display for TypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural description of a schema type.
///
/// Anonymous composites (vectors, arrays, maps) reference their element
/// types; named types (enums, bitsets, structs) carry their name and their
/// precomputed structural hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRef {
    Scalar {
        name: &'static str,
        size: usize,
    },
    Decimal,
    String,
    Bytes,
    Vector {
        element: &'static TypeRef,
    },
    Array {
        element: &'static TypeRef,
        size: usize,
    },
    Map {
        key: &'static TypeRef,
        value: &'static TypeRef,
    },
    Named {
        name: &'static str,
        class: TypeClass,
        hash: u64,
    },
}

impl TypeRef {
    pub const fn class(&self) -> TypeClass {
        match self {
            TypeRef::Scalar { .. } => TypeClass::Scalar,
            TypeRef::Decimal => TypeClass::Decimal,
            TypeRef::String => TypeClass::String,
            TypeRef::Bytes => TypeClass::Bytes,
            TypeRef::Vector { .. } => TypeClass::Vector,
            TypeRef::Array { .. } => TypeClass::Array,
            TypeRef::Map { .. } => TypeClass::Map,
            TypeRef::Named { class, .. } => *class,
        }
    }

    /// Structural hash of this type, see [`crate::hash`].
    pub const fn hash(&self) -> u64 {
        hash::type_hash(self)
    }
}

/// Renders the schema spelling: `int64`, `dec64`, `int64[]`, `int64[4]`,
/// `string{int32}` (value type, then key type in braces) or the type name.
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Scalar { name, .. } | TypeRef::Named { name, .. } => f.write_str(name),
            TypeRef::Decimal => f.write_str("dec64"),
            TypeRef::String => f.write_str("string"),
            TypeRef::Bytes => f.write_str("bytes"),
            TypeRef::Vector { element } => write!(f, "{element}[]"),
            TypeRef::Array { element, size } => write!(f, "{element}[{size}]"),
            TypeRef::Map { key, value } => write!(f, "{value}{{{key}}}"),
        }
    }
}

/// Per-type static metadata every wire type provides.
pub trait Type {
    const TYPE: &'static TypeRef;

    /// Serialized size when it does not depend on the value.
    const FIXED_SIZE: Option<usize>;

    /// `true` when the serialized form is byte-identical to the in-memory
    /// representation, so a value can be copied as one block.
    const IS_FLAT: bool;

    /// Fewest bytes any value of the type occupies on the wire. Variable
    /// size types carry at least one count prefix.
    const MIN_SIZE: usize = match Self::FIXED_SIZE {
        Some(size) => size,
        None => COUNT_SIZE,
    };

    const HASH: u64 = hash::type_hash(Self::TYPE);
}

/// Metadata of a named, generated type.
pub trait Schema: Type {
    const NAME: &'static str;

    /// Source schema text, empty when the generator did not embed it.
    const SCHEMA: &'static str;
}

/// Sum of field sizes, or `None` if any field is variable-size.
pub const fn sum_fixed_sizes(sizes: &[Option<usize>]) -> Option<usize> {
    let mut total = 0;
    let mut i = 0;
    while i < sizes.len() {
        match sizes[i] {
            Some(size) => total += size,
            None => return None,
        }
        i += 1;
    }
    Some(total)
}

/// Sum of the minimum field sizes of a struct.
pub const fn sum_min_sizes(sizes: &[usize]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < sizes.len() {
        total += sizes[i];
        i += 1;
    }
    total
}

pub const fn all_flat(flags: &[bool]) -> bool {
    let mut i = 0;
    while i < flags.len() {
        if !flags[i] {
            return false;
        }
        i += 1;
    }
    true
}
