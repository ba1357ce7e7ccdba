//! Facilities for working with paths from the root input to a failing leaf.
//!
//! Generalizes the teacher crate's `paths::JSONPointer` (a flat sequence of
//! string/index chunks) to the richer set of container descents this
//! protocol needs: object keys, array/tuple indices, map/record key-or-value
//! sides, and set positions.

use crate::value::Value;
use std::fmt;

/// Which kind of container boundary a [`PathItem`] was recorded at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathItemKind {
    ObjectKey,
    ArrayIndex,
    TupleIndex,
    MapKey,
    MapValue,
    RecordKey,
    RecordValue,
    SetIndex,
}

impl fmt::Display for PathItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PathItemKind::ObjectKey => "object-key",
            PathItemKind::ArrayIndex => "array-index",
            PathItemKind::TupleIndex => "tuple-index",
            PathItemKind::MapKey => "map-key",
            PathItemKind::MapValue => "map-value",
            PathItemKind::RecordKey => "record-key",
            PathItemKind::RecordValue => "record-value",
            PathItemKind::SetIndex => "set-index",
        };
        f.write_str(name)
    }
}

/// The key or index a [`PathItem`] was taken at. Object/record keys are
/// always strings; array/tuple/set positions are indices; map keys can be
/// any [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum PathKey {
    Name(String),
    Index(usize),
    Key(Value),
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Name(name) => f.write_str(name),
            PathKey::Index(idx) => write!(f, "{idx}"),
            PathKey::Key(value) => write!(f, "{value}"),
        }
    }
}

/// One descent from a container into one of its members.
///
/// Equality deliberately excludes `container`: per the data model, the
/// container input is a diagnostic aid, not part of a path item's identity.
#[derive(Debug, Clone)]
pub struct PathItem {
    pub kind: PathItemKind,
    /// The container value this item descended from, kept for diagnostics.
    pub container: Value,
    pub key: PathKey,
    pub value: Value,
}

impl PathItem {
    #[must_use]
    pub fn new(kind: PathItemKind, container: Value, key: PathKey, value: Value) -> Self {
        Self {
            kind,
            container,
            key,
            value,
        }
    }
}

impl PartialEq for PathItem {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.key == other.key && self.value == other.value
    }
}

/// A root-first sequence of [`PathItem`]s locating a value inside the
/// original input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path(Vec<PathItem>);

impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn items(&self) -> &[PathItem] {
        &self.0
    }

    /// Returns a new path with `item` appended, leaving `self` untouched —
    /// parse info is threaded by value, so descent never mutates an
    /// ancestor's path.
    #[must_use]
    pub fn pushed(&self, item: PathItem) -> Self {
        let mut next = self.0.clone();
        next.push(item);
        Self(next)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (idx, item) in self.0.iter().enumerate() {
            match item.kind {
                PathItemKind::ArrayIndex | PathItemKind::TupleIndex | PathItemKind::SetIndex => {
                    write!(f, "[{}]", item.key)?;
                }
                PathItemKind::MapKey | PathItemKind::RecordKey => {
                    write!(f, ".<key:{}>", item.key)?;
                }
                PathItemKind::MapValue | PathItemKind::RecordValue => {
                    if idx > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{}", item.key)?;
                }
                PathItemKind::ObjectKey => {
                    if idx > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{}", item.key)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_items_are_value_equal_regardless_of_container() {
        let a = PathItem::new(
            PathItemKind::ObjectKey,
            Value::from("container-a"),
            PathKey::Name("name".to_string()),
            Value::from("Ada"),
        );
        let b = PathItem::new(
            PathItemKind::ObjectKey,
            Value::from("container-b"),
            PathKey::Name("name".to_string()),
            Value::from("Ada"),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn path_items_differ_on_kind_key_or_value() {
        let base = PathItem::new(
            PathItemKind::ObjectKey,
            Value::Null,
            PathKey::Name("name".to_string()),
            Value::from("Ada"),
        );
        let different_kind = PathItem::new(
            PathItemKind::RecordKey,
            Value::Null,
            PathKey::Name("name".to_string()),
            Value::from("Ada"),
        );
        let different_key = PathItem::new(
            PathItemKind::ObjectKey,
            Value::Null,
            PathKey::Name("age".to_string()),
            Value::from("Ada"),
        );
        let different_value = PathItem::new(
            PathItemKind::ObjectKey,
            Value::Null,
            PathKey::Name("name".to_string()),
            Value::from("Grace"),
        );
        assert_ne!(base, different_kind);
        assert_ne!(base, different_key);
        assert_ne!(base, different_value);
    }

    #[test]
    fn pushed_leaves_the_original_path_untouched() {
        let root = Path::new();
        let item = PathItem::new(
            PathItemKind::ObjectKey,
            Value::Null,
            PathKey::Name("name".to_string()),
            Value::from("Ada"),
        );
        let descended = root.pushed(item);
        assert!(root.is_empty());
        assert_eq!(descended.len(), 1);
    }

    #[test]
    fn empty_path_displays_as_root() {
        assert_eq!(Path::new().to_string(), "(root)");
    }

    #[test]
    fn object_key_chain_displays_dot_separated() {
        let path = Path::new()
            .pushed(PathItem::new(
                PathItemKind::ObjectKey,
                Value::Null,
                PathKey::Name("address".to_string()),
                Value::Null,
            ))
            .pushed(PathItem::new(
                PathItemKind::ObjectKey,
                Value::Null,
                PathKey::Name("city".to_string()),
                Value::from("NYC"),
            ));
        assert_eq!(path.to_string(), "address.city");
    }

    #[test]
    fn array_index_displays_with_brackets() {
        let path = Path::new().pushed(PathItem::new(
            PathItemKind::ArrayIndex,
            Value::Null,
            PathKey::Index(2),
            Value::Null,
        ));
        assert_eq!(path.to_string(), "[2]");
    }

    #[test]
    fn map_key_and_value_display_distinctly() {
        let key_path = Path::new().pushed(PathItem::new(
            PathItemKind::MapKey,
            Value::Null,
            PathKey::Index(0),
            Value::from("k"),
        ));
        assert_eq!(key_path.to_string(), ".<key:0>");

        let value_path = Path::new().pushed(PathItem::new(
            PathItemKind::MapValue,
            Value::Null,
            PathKey::Index(0),
            Value::Null,
        ));
        assert_eq!(value_path.to_string(), "0");
    }
}
