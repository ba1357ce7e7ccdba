//! The schema protocol: the uniform contract every schema implements, in
//! both a synchronous and an asynchronous variant.
//!
//! Grounded in the teacher crate's `validator::Validate` trait
//! (`fn validate(...) -> ErrorIterator`, `fn is_valid(...) -> bool`) and in
//! the `grill` pack's `Keyword::Sync(Box<dyn SyncKeyword>)` /
//! `Keyword::Async(Box<dyn AsyncKeyword>)` split, chosen here because this
//! crate has no async runtime of its own to make a single unified trait's
//! latent result zero-cost.

pub mod array;
pub mod map;
pub mod object;
pub mod record;
pub mod recursive;
pub mod set;
pub mod tuple;
pub mod union;
pub mod wrappers;

use crate::info::ParseInfo;
use crate::result::ParseOutcome;
use crate::value::Value;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// The stable `kind` tag every schema exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    String,
    Number,
    Boolean,
    Literal,
    Object,
    Record,
    Array,
    Tuple,
    Map,
    Set,
    Union,
    Nullable,
    Optional,
    Nullish,
    NonNullable,
    NonOptional,
    NonNullish,
    Recursive,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaKind::String => "string",
            SchemaKind::Number => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Literal => "literal",
            SchemaKind::Object => "object",
            SchemaKind::Record => "record",
            SchemaKind::Array => "array",
            SchemaKind::Tuple => "tuple",
            SchemaKind::Map => "map",
            SchemaKind::Set => "set",
            SchemaKind::Union => "union",
            SchemaKind::Nullable => "nullable",
            SchemaKind::Optional => "optional",
            SchemaKind::Nullish => "nullish",
            SchemaKind::NonNullable => "non_nullable",
            SchemaKind::NonOptional => "non_optional",
            SchemaKind::NonNullish => "non_nullish",
            SchemaKind::Recursive => "recursive",
        };
        f.write_str(name)
    }
}

/// Structural children exposed for introspection and derived operations
/// (merge/pick/omit/…) that live outside this core — see Non-goals.
pub enum Children<'a> {
    None,
    /// A wrapper's `wrapped` schema.
    Wrapped(&'a AnySchema),
    /// An array's `item` schema or a set's `value` schema.
    Single(&'a AnySchema),
    /// An object's `shape`.
    Keyed(&'a IndexMap<String, AnySchema>),
    /// A map's `key`/`value` or a record's `key`/`value`.
    Pair(&'a AnySchema, &'a AnySchema),
    /// A union's `options`.
    Many(&'a [AnySchema]),
    /// A tuple's `items` and optional `rest`.
    Tuple {
        items: &'a [AnySchema],
        rest: Option<&'a AnySchema>,
    },
}

/// A schema whose `parse` completes without suspension.
pub trait Schema: Send + Sync + fmt::Debug {
    fn kind(&self) -> SchemaKind;

    fn children(&self) -> Children<'_> {
        Children::None
    }

    /// A pure function of `(input, parse-info)` — must not mutate `input`
    /// or `self`, and must not hold state across calls beyond a schema's own
    /// permitted structural-decomposition memoization.
    fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value>;
}

/// A schema whose `parse` returns a latent result.
#[async_trait]
pub trait AsyncSchema: Send + Sync + fmt::Debug {
    fn kind(&self) -> SchemaKind;

    fn children(&self) -> Children<'_> {
        Children::None
    }

    async fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value>;
}

/// A schema that is either synchronous or asynchronous. This is the type
/// composite schemas store for each structural child, so a single `object`
/// or `array` can (in its `_async` form) mix schemas of both disciplines.
#[derive(Clone)]
pub enum AnySchema {
    Sync(Arc<dyn Schema>),
    Async(Arc<dyn AsyncSchema>),
}

impl fmt::Debug for AnySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnySchema::Sync(s) => fmt::Debug::fmt(s, f),
            AnySchema::Async(s) => fmt::Debug::fmt(s, f),
        }
    }
}

impl AnySchema {
    #[must_use]
    pub fn kind(&self) -> SchemaKind {
        match self {
            AnySchema::Sync(s) => s.kind(),
            AnySchema::Async(s) => s.kind(),
        }
    }

    #[must_use]
    pub const fn is_async(&self) -> bool {
        matches!(self, AnySchema::Async(_))
    }

    #[must_use]
    pub fn children(&self) -> Children<'_> {
        match self {
            AnySchema::Sync(s) => s.children(),
            AnySchema::Async(s) => s.children(),
        }
    }

    /// Parses synchronously if this schema is sync; returns `None` for an
    /// async schema rather than blocking on it.
    pub fn parse_sync(&self, input: &Value, info: &ParseInfo) -> Option<ParseOutcome<Value>> {
        match self {
            AnySchema::Sync(s) => Some(s.parse(input, info)),
            AnySchema::Async(_) => None,
        }
    }

    /// Parses a sync schema immediately and awaits an async one, letting a
    /// mixed-discipline async composite treat every child uniformly.
    pub async fn parse_async(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        match self {
            AnySchema::Sync(s) => s.parse(input, info),
            AnySchema::Async(s) => s.parse(input, info).await,
        }
    }
}

impl<T: Schema + 'static> From<T> for AnySchema {
    fn from(schema: T) -> Self {
        AnySchema::Sync(Arc::new(schema))
    }
}

/// Wraps an already-type-erased sync schema. Kept distinct from the blanket
/// `From<T: Schema>` impl so call sites can write `AnySchema::from_async`
/// without a second blanket impl colliding with it (a single type cannot
/// usefully implement both `Schema` and `AsyncSchema`).
pub fn any_async<T: AsyncSchema + 'static>(schema: T) -> AnySchema {
    AnySchema::Async(Arc::new(schema))
}

use futures::future::{join_all, select_all};
use std::future::Future;
use std::pin::Pin;

pub(crate) type IndexedChildFuture = Pin<Box<dyn Future<Output = (usize, ParseOutcome<Value>)> + Send>>;

/// Concurrently await every child future (via `join_all`, so siblings are
/// polled interleaved rather than one at a time), writing each result into
/// its declared index so output order is deterministic regardless of
/// completion order.
pub(crate) async fn join_children(futures: Vec<IndexedChildFuture>) -> Vec<ParseOutcome<Value>> {
    let len = futures.len();
    let mut slots: Vec<Option<ParseOutcome<Value>>> =
        std::iter::repeat_with(|| None).take(len).collect();
    for (idx, outcome) in join_all(futures).await {
        slots[idx] = Some(outcome);
    }
    slots
        .into_iter()
        .map(|slot| slot.expect("every index was scheduled"))
        .collect()
}

/// Concurrently await every child future, returning as soon as the first
/// failure appears and discarding the remaining in-flight results — a
/// "first failure of N" combinator implementing abort-early as a race.
pub(crate) async fn join_children_abort_early(
    futures: Vec<IndexedChildFuture>,
) -> ParseOutcome<Vec<Value>> {
    let mut remaining = futures;
    let mut results: Vec<Option<Value>> =
        std::iter::repeat_with(|| None).take(remaining.len()).collect();
    while !remaining.is_empty() {
        let ((idx, outcome), _done, rest) = select_all(remaining).await;
        remaining = rest;
        match outcome {
            Ok(value) => results[idx] = Some(value),
            Err(issues) => return Err(issues),
        }
    }
    Ok(results
        .into_iter()
        .map(|slot| slot.expect("every slot is filled before the loop exits"))
        .collect())
}
