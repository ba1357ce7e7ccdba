//! The `recursive` schema: a lazily-resolved handle standing in for a
//! schema that refers to itself. A thunk builds the real schema on first
//! use; the result is cached so later parses skip rebuilding it.
//!
//! Grounded in the teacher crate's `$ref`/`$dynamicRef` resolution, where a
//! schema node can point back into the document being compiled — here the
//! indirection is a plain closure instead of a JSON Pointer lookup, since
//! there is no document to resolve against.

use super::{AnySchema, Children, Schema, SchemaKind};
use crate::info::ParseInfo;
use crate::result::ParseOutcome;
use crate::value::Value;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// A schema resolved the first time it is needed, then reused forever.
/// Typically wraps a closure that references a `RecursiveSchema`'s own
/// `Arc` handle to build an object/array/union schema that contains itself.
pub struct RecursiveSchema {
    thunk: Arc<dyn Fn() -> AnySchema + Send + Sync>,
    resolved: OnceCell<AnySchema>,
}

impl fmt::Debug for RecursiveSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveSchema")
            .field("resolved", &self.resolved.get().is_some())
            .finish()
    }
}

impl RecursiveSchema {
    pub fn new(thunk: impl Fn() -> AnySchema + Send + Sync + 'static) -> Self {
        Self {
            thunk: Arc::new(thunk),
            resolved: OnceCell::new(),
        }
    }

    fn get(&self) -> &AnySchema {
        self.resolved.get_or_init(|| (self.thunk)())
    }
}

impl Schema for RecursiveSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Recursive
    }

    fn children(&self) -> Children<'_> {
        Children::Wrapped(self.get())
    }

    fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        self.get()
            .parse_sync(input, info)
            .expect("a synchronous RecursiveSchema's resolved schema is always sync")
    }
}

impl From<RecursiveSchema> for AnySchema {
    fn from(schema: RecursiveSchema) -> Self {
        AnySchema::Sync(Arc::new(schema))
    }
}
