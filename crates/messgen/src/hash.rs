//! Structural type hashing.
//!
//! Every type hashes its *signature* (name plus the shape details that
//! matter on the wire) and XORs in the hashes of each distinct type it
//! depends on. Signatures are folded with a djb2 state and finished with a
//! 64-bit mixer, all in `const fn`, so `Type::HASH` is a compile-time
//! constant that is identical across builds and changes whenever a field
//! type, field name, enumerator or bit offset changes.
//!
//! | type         | signature                                       | dependencies   |
//! |--------------|-------------------------------------------------|----------------|
//! | scalar etc.  | `type`                                          | none           |
//! | array        | `type`, `element_type`, `array_size`            | element        |
//! | vector       | `type`                                          | element        |
//! | map          | `type`                                          | key, value     |
//! | enum         | `type`, `base_type`, `values` (name, value)     | none           |
//! | bitset       | `type`, `base_type`, `bits` (name, offset)      | none           |
//! | struct       | `type`, `fields` (name, type)                   | field types    |
//! | message      | `name`, `proto_id`, `message_id`                | (data type)    |

use crate::protocol::MessageInfo;
use crate::types::TypeRef;

const START_STATE: u64 = 5381;
const CONST_ARRAY: u64 = 982_452_259;
const CONST_STRING: u64 = 982_453_601;
const CONST_NUMBER: u64 = 982_454_837;

#[inline]
const fn update_num(state: u64, num: u64) -> u64 {
    (state << 5).wrapping_add(state).wrapping_add(num)
}

const fn update_bytes(mut state: u64, bytes: &[u8]) -> u64 {
    let mut i = 0;
    while i < bytes.len() {
        state = update_num(state, bytes[i] as u64);
        i += 1;
    }
    state
}

/// Feeds the decimal digits of `n`, the way the number is spelled in a
/// type name such as `int32[16]`.
const fn update_digits(mut state: u64, n: usize) -> u64 {
    let mut divisor = 1usize;
    while n / divisor >= 10 {
        divisor *= 10;
    }
    while divisor > 0 {
        state = update_num(state, b'0' as u64 + ((n / divisor) % 10) as u64);
        divisor /= 10;
    }
    state
}

/// Feeds the spelling of `ty`, byte for byte as [`TypeRef`]'s `Display`
/// renders it.
const fn update_type_name(state: u64, ty: &TypeRef) -> u64 {
    match ty {
        TypeRef::Scalar { name, .. } | TypeRef::Named { name, .. } => {
            update_bytes(state, name.as_bytes())
        }
        TypeRef::Decimal => update_bytes(state, b"dec64"),
        TypeRef::String => update_bytes(state, b"string"),
        TypeRef::Bytes => update_bytes(state, b"bytes"),
        TypeRef::Vector { element } => update_bytes(update_type_name(state, element), b"[]"),
        TypeRef::Array { element, size } => {
            let state = update_bytes(update_type_name(state, element), b"[");
            update_bytes(update_digits(state, *size), b"]")
        }
        TypeRef::Map { key, value } => {
            let state = update_bytes(update_type_name(state, value), b"{");
            update_bytes(update_type_name(state, key), b"}")
        }
    }
}

const fn update_str(state: u64, s: &str) -> u64 {
    update_bytes(update_num(state, CONST_STRING), s.as_bytes())
}

const fn update_name_of(state: u64, ty: &TypeRef) -> u64 {
    update_type_name(update_num(state, CONST_STRING), ty)
}

const fn update_int(state: u64, n: i64) -> u64 {
    update_num(update_num(state, CONST_NUMBER), n as u64)
}

const fn update_list(state: u64, len: usize) -> u64 {
    update_num(update_num(state, CONST_ARRAY), len as u64)
}

/// 64-bit finalizer so that XOR-combined hashes differ in all bit lanes.
const fn finish(mut state: u64) -> u64 {
    state ^= state >> 33;
    state = state.wrapping_mul(0xff51_afd7_ed55_8ccd);
    state ^= state >> 33;
    state = state.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    state ^ (state >> 33)
}

/// Hash of a one-entry `type` signature.
const fn type_only_signature(ty: &TypeRef) -> u64 {
    let state = update_list(START_STATE, 1);
    let state = update_str(state, "type");
    finish(update_name_of(state, ty))
}

/// XOR of `hashes`, counting repeated values once.
pub const fn xor_distinct(hashes: &[u64]) -> u64 {
    let mut acc = 0;
    let mut i = 0;
    while i < hashes.len() {
        let mut seen = false;
        let mut j = 0;
        while j < i {
            if hashes[j] == hashes[i] {
                seen = true;
            }
            j += 1;
        }
        if !seen {
            acc ^= hashes[i];
        }
        i += 1;
    }
    acc
}

/// Structural hash of any type reference. Named types return the hash
/// they were registered with.
pub const fn type_hash(ty: &TypeRef) -> u64 {
    match ty {
        TypeRef::Named { hash, .. } => *hash,
        TypeRef::Scalar { .. } | TypeRef::Decimal | TypeRef::String | TypeRef::Bytes => {
            type_only_signature(ty)
        }
        TypeRef::Vector { element } => type_only_signature(ty) ^ type_hash(element),
        TypeRef::Array { element, size } => {
            let state = update_list(START_STATE, 3);
            let state = update_name_of(update_str(state, "type"), ty);
            let state = update_name_of(update_str(state, "element_type"), element);
            let state = update_int(update_str(state, "array_size"), *size as i64);
            finish(state) ^ type_hash(element)
        }
        TypeRef::Map { key, value } => {
            type_only_signature(ty) ^ xor_distinct(&[type_hash(key), type_hash(value)])
        }
    }
}

pub const fn enum_hash(name: &str, base: &TypeRef, values: &[(&str, i64)]) -> u64 {
    let state = update_list(START_STATE, 3);
    let state = update_str(update_str(state, "type"), name);
    let state = update_name_of(update_str(state, "base_type"), base);
    let mut state = update_list(update_str(state, "values"), values.len());
    let mut i = 0;
    while i < values.len() {
        state = update_list(state, 2);
        state = update_int(update_str(state, values[i].0), values[i].1);
        i += 1;
    }
    finish(state)
}

pub const fn bitset_hash(name: &str, base: &TypeRef, bits: &[(&str, u32)]) -> u64 {
    let state = update_list(START_STATE, 3);
    let state = update_str(update_str(state, "type"), name);
    let state = update_name_of(update_str(state, "base_type"), base);
    let mut state = update_list(update_str(state, "bits"), bits.len());
    let mut i = 0;
    while i < bits.len() {
        state = update_list(state, 2);
        state = update_int(update_str(state, bits[i].0), bits[i].1 as i64);
        i += 1;
    }
    finish(state)
}

/// Hash of a struct from its ordered `(field name, field type)` list.
pub const fn struct_hash(name: &str, fields: &[(&str, &TypeRef)]) -> u64 {
    let state = update_list(START_STATE, 2);
    let state = update_str(update_str(state, "type"), name);
    let mut state = update_list(update_str(state, "fields"), fields.len());
    let mut i = 0;
    while i < fields.len() {
        state = update_list(state, 2);
        state = update_name_of(update_str(state, fields[i].0), fields[i].1);
        i += 1;
    }

    let mut deps = finish(state);
    let mut i = 0;
    while i < fields.len() {
        let dep = type_hash(fields[i].1);
        let mut seen = false;
        let mut j = 0;
        while j < i {
            if type_hash(fields[j].1) == dep {
                seen = true;
            }
            j += 1;
        }
        if !seen {
            deps ^= dep;
        }
        i += 1;
    }
    deps
}

/// Signature hash of a message; the full message hash XORs in the hash of
/// its data type.
pub const fn message_hash(name: &str, proto_id: u16, message_id: u8) -> u64 {
    let state = update_list(START_STATE, 3);
    let state = update_str(update_str(state, "name"), name);
    let state = update_int(update_str(state, "proto_id"), proto_id as i64);
    finish(update_int(update_str(state, "message_id"), message_id as i64))
}

/// XOR of every message hash of a protocol.
pub const fn protocol_hash(messages: &[MessageInfo]) -> u64 {
    let mut acc = 0;
    let mut i = 0;
    while i < messages.len() {
        acc ^= messages[i].hash;
        i += 1;
    }
    acc
}
