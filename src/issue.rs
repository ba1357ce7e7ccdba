//! The issue model: a single validation failure with a cause tag and a
//! navigable path, plus the non-empty sequence every failed parse returns.
//!
//! Grounded in the teacher crate's `error::ValidationError` /
//! `ValidationErrorKind` pair (one struct carrying `instance` + a `kind`
//! enum), generalized so `kind` becomes the abstract `reason` family from
//! spec.md's data model and the machine-readable `validation` tag is kept
//! alongside it rather than folded into the enum, since here a single
//! `reason` (e.g. `Reason::Object`) covers many distinct `validation` tags
//! (`"object"`, `"union"` nested under it, etc).

use crate::info::ValidateInfo;
use crate::path::Path;
use crate::value::Value;
use std::fmt;

/// The abstract family of schema that produced an [`Issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Type,
    String,
    Number,
    Bigint,
    Boolean,
    Date,
    Array,
    Tuple,
    Object,
    Record,
    Map,
    Set,
    Blob,
    Any,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reason::Type => "type",
            Reason::String => "string",
            Reason::Number => "number",
            Reason::Bigint => "bigint",
            Reason::Boolean => "boolean",
            Reason::Date => "date",
            Reason::Array => "array",
            Reason::Tuple => "tuple",
            Reason::Object => "object",
            Reason::Record => "record",
            Reason::Map => "map",
            Reason::Set => "set",
            Reason::Blob => "blob",
            Reason::Any => "any",
        };
        f.write_str(name)
    }
}

/// Which side of a map/record entry an issue came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Key,
    Value,
}

/// One validation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub reason: Reason,
    pub validation: String,
    pub message: String,
    pub input: Value,
    pub path: Path,
    pub issues: Option<Vec<Issue>>,
    pub origin: Option<Origin>,
}

impl Issue {
    /// The single helper through which every issue is constructed: path
    /// (and origin) are attached from the calling `ValidateInfo`, so leaves
    /// never have to thread path state by hand.
    #[must_use]
    pub fn new(
        reason: Reason,
        validation: impl Into<String>,
        message: impl Into<String>,
        input: Value,
        info: &ValidateInfo,
    ) -> Self {
        Self {
            reason,
            validation: validation.into(),
            message: message.into(),
            input,
            path: info.path.clone(),
            issues: None,
            origin: info.origin,
        }
    }

    #[must_use]
    pub fn with_nested(mut self, nested: Vec<Issue>) -> Self {
        self.issues = Some(nested);
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.path)
    }
}

/// A non-empty sequence of [`Issue`]s — the failure half of every
/// [`crate::result::ParseOutcome`].
#[derive(Debug, Clone, PartialEq)]
pub struct Issues(Vec<Issue>);

impl Issues {
    #[must_use]
    pub fn one(issue: Issue) -> Self {
        Self(vec![issue])
    }

    /// Returns `None` when `issues` is empty, preserving the non-empty
    /// invariant at the boundary where callers assemble results.
    #[must_use]
    pub fn from_vec(issues: Vec<Issue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            Some(Self(issues))
        }
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Issue> {
        self.0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Issue] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn first(&self) -> &Issue {
        &self.0[0]
    }

    /// Appends `other`'s issues onto `self`, used when a composite
    /// accumulates failures from several children under non-abort-early.
    #[must_use]
    pub fn merge(mut self, other: Issues) -> Self {
        self.0.extend(other.0);
        self
    }
}

impl IntoIterator for Issues {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
