//! `ParseInfo` and `ValidateInfo`: the configuration and path state
//! threaded through every parse call.
//!
//! Grounded in the teacher crate's `CompilationContext`, which threads a
//! `scope`/`config`/`schema_path` triple down through compilation by value,
//! cloning on push rather than mutating a shared ancestor. `ParseInfo` plays
//! the same role at parse time instead of compile time.

use crate::issue::{Origin, Reason};
use crate::path::{Path, PathItem};

/// Caller-provided parse configuration, threaded by value and extended with
/// one more path segment on every descent into a child.
#[derive(Debug, Clone, Default)]
pub struct ParseInfo {
    /// Return on the first issue anywhere in the tree.
    pub abort_early: bool,
    /// Return from the current pipe on its first failing action; sibling
    /// subtrees are unaffected.
    pub abort_pipe_early: bool,
    pub(crate) path: Path,
    /// Set by a map/record while parsing a key or a value, so that any
    /// issue raised anywhere underneath — including by a composite schema
    /// nested inside the key/value schema — still carries which side of the
    /// entry it came from. Cleared nowhere; a key/value schema that is
    /// itself a map/record simply overwrites it for its own children.
    pub(crate) origin: Option<Origin>,
}

impl ParseInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_abort_early(mut self, abort_early: bool) -> Self {
        self.abort_early = abort_early;
        self
    }

    #[must_use]
    pub const fn with_abort_pipe_early(mut self, abort_pipe_early: bool) -> Self {
        self.abort_pipe_early = abort_pipe_early;
        self
    }

    /// Returns a copy of this info with `item` appended to its path. Used by
    /// composite schemas before recursing into a child; never mutates the
    /// caller's own info.
    #[must_use]
    pub fn descend(&self, item: PathItem) -> Self {
        Self {
            abort_early: self.abort_early,
            abort_pipe_early: self.abort_pipe_early,
            path: self.path.pushed(item),
            origin: self.origin,
        }
    }

    /// Tags this info (and everything parsed underneath it) as coming from
    /// a map/record key or value, so leaf issues raised arbitrarily deep
    /// inside still carry the side they came from.
    #[must_use]
    pub(crate) fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Builds the view passed to a pipe action or leaf validator. `origin`
    /// overrides the inherited one when a call site needs to attach its own
    /// (e.g. a record's denylisted-key issue); otherwise the origin set by
    /// the nearest enclosing map/record key/value descent is used.
    #[must_use]
    pub(crate) fn validate_info(&self, reason: Reason, origin: Option<Origin>) -> ValidateInfo {
        ValidateInfo {
            reason,
            path: self.path.clone(),
            abort_early: self.abort_early,
            abort_pipe_early: self.abort_pipe_early,
            origin: origin.or(self.origin),
        }
    }
}

/// The read-only view passed to a pipe action or leaf validator: enough
/// context to build a correctly-pathed [`crate::issue::Issue`] without
/// re-deriving it from `ParseInfo`.
#[derive(Debug, Clone)]
pub struct ValidateInfo {
    pub reason: Reason,
    pub path: Path,
    pub abort_early: bool,
    pub abort_pipe_early: bool,
    pub origin: Option<Origin>,
}
