//! Reflection over generated types.
//!
//! Instead of language-level introspection, every generated struct carries
//! an explicit, ordered field table ([`Fields::FIELDS`]) and a visitor that
//! hands out each field as a `&dyn Reflect`. Formatters and dumpers walk
//! that table.
//!
//! Text rendering follows the compact messgen style:
//!
//! ```text
//! {f0=255 vec=[45.787] name="abc" kind=second lookup={1:"one", 2:"two"}}
//! ```

use std::fmt;

use serde_json::{Map, Value};

use crate::types::{Schema, TypeRef};

/// Runtime view of a wire value for formatting and dumping.
///
/// Object safe so heterogeneous fields can be visited uniformly.
pub trait Reflect {
    /// Compact text form (see the module docs).
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Structured dump. Struct fields keep declaration order, enums render
    /// as their enumerator name, decimals as their canonical string.
    fn to_json(&self) -> Value;
}

/// One entry of a struct's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub ty: &'static TypeRef,
}

/// Field table of a generated struct.
pub trait Fields: Schema {
    /// Fields in declaration order.
    const FIELDS: &'static [FieldInfo];

    /// Calls `visitor` with each field and its value, in declaration order.
    fn visit_fields(&self, visitor: &mut dyn FnMut(&'static FieldInfo, &dyn Reflect));
}

/// Enumerator table of a generated enum.
pub trait Enumeration: Copy + Schema + 'static {
    /// `(name, variant)` pairs in declaration order.
    const ENUMERATORS: &'static [(&'static str, Self)];

    fn value(self) -> i64;

    /// Variant for a wire value, `None` if undeclared.
    fn from_value(value: i64) -> Option<Self>;

    fn name(self) -> &'static str {
        let value = self.value();
        Self::ENUMERATORS
            .iter()
            .find(|(_, e)| e.value() == value)
            .map_or("", |&(name, _)| name)
    }
}

/// Adapter that renders any [`Reflect`] value with `{}`.
pub struct Display<'r, T: ?Sized>(&'r T);

impl<T: Reflect + ?Sized> fmt::Display for Display<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_text(f)
    }
}

/// Wraps `value` for text formatting.
///
/// ```
/// use messgen::reflect::display;
///
/// assert_eq!(display(&vec![1u8, 2]).to_string(), "[1, 2]");
/// assert_eq!(display("hi").to_string(), "\"hi\"");
/// ```
pub fn display<T: Reflect + ?Sized>(value: &T) -> Display<'_, T> {
    Display(value)
}

/// Renders a struct as `{a=1 b=2}`.
pub fn fmt_struct<T: Fields + ?Sized>(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("{")?;
    let mut result: fmt::Result = Ok(());
    let mut first = true;
    value.visit_fields(&mut |field, v| {
        if result.is_err() {
            return;
        }
        let sep = if first { "" } else { " " };
        first = false;
        result = write!(f, "{sep}{}=", field.name).and_then(|_| v.fmt_text(f));
    });
    result?;
    f.write_str("}")
}

pub fn struct_to_json<T: Fields + ?Sized>(value: &T) -> Value {
    let mut map = Map::new();
    value.visit_fields(&mut |field, v| {
        map.insert(field.name.to_owned(), v.to_json());
    });
    Value::Object(map)
}

/// Renders a sequence as `[a, b]`.
pub(crate) fn fmt_seq<'r, I>(items: I, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    I: IntoIterator<Item = &'r dyn Reflect>,
{
    f.write_str("[")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.fmt_text(f)?;
    }
    f.write_str("]")
}

pub(crate) fn seq_to_json<'r, I>(items: I) -> Value
where
    I: IntoIterator<Item = &'r dyn Reflect>,
{
    Value::Array(items.into_iter().map(|item| item.to_json()).collect())
}

/// Renders a map as `{k:v, k:v}`.
pub(crate) fn fmt_map<'r, I>(entries: I, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    I: IntoIterator<Item = (&'r dyn Reflect, &'r dyn Reflect)>,
{
    f.write_str("{")?;
    for (i, (k, v)) in entries.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        k.fmt_text(f)?;
        f.write_str(":")?;
        v.fmt_text(f)?;
    }
    f.write_str("}")
}

/// JSON objects need string keys; non-string keys use their JSON text.
pub(crate) fn map_to_json<'r, I>(entries: I) -> Value
where
    I: IntoIterator<Item = (&'r dyn Reflect, &'r dyn Reflect)>,
{
    let mut map = Map::new();
    for (k, v) in entries {
        let key = match k.to_json() {
            Value::String(s) => s,
            other => other.to_string(),
        };
        map.insert(key, v.to_json());
    }
    Value::Object(map)
}

pub(crate) fn fmt_quoted(s: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "\"{s}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_seq_and_map_text() {
        assert_eq!(display(&[1i32, -2, 3]).to_string(), "[1, -2, 3]");
        let empty: Vec<u8> = Vec::new();
        assert_eq!(display(&empty).to_string(), "[]");

        let mut map = BTreeMap::new();
        map.insert(1u8, String::from("one"));
        map.insert(2u8, String::from("two"));
        assert_eq!(display(&map).to_string(), "{1:\"one\", 2:\"two\"}");
    }

    #[test]
    fn test_map_json_keys() {
        let mut map = BTreeMap::new();
        map.insert(7i32, 1.5f64);
        map.insert(-1i32, 2.0f64);
        assert_eq!(map.to_json(), serde_json::json!({"-1": 2.0, "7": 1.5}));

        let mut named = BTreeMap::new();
        named.insert(String::from("a"), true);
        assert_eq!(named.to_json(), serde_json::json!({"a": true}));
    }
}
