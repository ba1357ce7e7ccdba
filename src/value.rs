//! The dynamic value universe that schemas inspect, recurse into, and
//! reconstruct.
//!
//! Every primitive and container kind a schema can gate on has exactly one
//! variant here — a closed tagged union standing in for "the host's native
//! any-value type" (see the Design Notes on dynamic typing of inputs).
//! `Undefined` is kept distinct from `Null` because the `optional` /
//! `nullable` / `nullish` wrappers key off exactly that distinction.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An untyped runtime value flowing through the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// The sentinel for a missing object field or an omitted argument.
    Undefined,
    /// JSON/JS `null`.
    Null,
    Bool(bool),
    /// All numbers are represented as `f64`, matching the host dynamic
    /// value's single numeric type (`bigint`/`nan` are leaf concerns, out
    /// of scope for the core).
    Number(f64),
    String(String),
    Array(Vec<Value>),
    /// A fixed-shape keyed container with string keys, used by `object`.
    /// Order-preserving so declaration order survives a round trip.
    Object(IndexMap<String, Value>),
    /// An open keyed container with arbitrary (non-string) keys, used by
    /// `record` (string-keyed, but represented the same way for symmetry
    /// with `map`) and `map` (arbitrary key schema).
    Map(Vec<(Value, Value)>),
    /// An unordered container of values, used by `set`. Uniqueness is a
    /// property of the producer; this core only iterates it.
    Set(Vec<Value>),
}

impl Value {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
        }
    }

    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map_entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_set(&self) -> Option<&[Value]> {
        match self {
            Value::Set(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<serde_json::Value> for Value {
    /// JSON has no `undefined`, `map`, or `set` — a missing object field
    /// becomes `Value::Undefined` only when read through [`Value::as_object`]
    /// lookups; a bare conversion of a JSON value itself never produces
    /// `Undefined`, `Map`, or `Set`.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = UnrepresentableValue;

    /// `Undefined`, `Map`, and `Set` have no direct JSON representation.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Undefined => return Err(UnrepresentableValue(Value::Undefined)),
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => serde_json::Value::Array(
                items
                    .into_iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| Ok((k, serde_json::Value::try_from(v)?)))
                    .collect::<Result<_, UnrepresentableValue>>()?,
            ),
            other @ (Value::Map(_) | Value::Set(_)) => return Err(UnrepresentableValue(other)),
        })
    }
}

/// A [`Value`] variant with no JSON equivalent was converted toward JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct UnrepresentableValue(pub Value);

impl fmt::Display for UnrepresentableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value has no JSON representation: {}", self.0.type_name())
    }
}

impl std::error::Error for UnrepresentableValue {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Map(entries) => {
                f.write_str("Map{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key} => {value}")?;
                }
                f.write_str("}")
            }
            Value::Set(items) => {
                f.write_str("Set{")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}
