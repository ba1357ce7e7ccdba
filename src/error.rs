//! Infrastructure errors: implementer bugs such as malformed schema
//! construction, never validation failures. These are the only errors in
//! the crate that are allowed to surface as Rust `Result::Err` outside of
//! the `ParseOutcome`/`Issues` channel, mirroring the teacher crate's
//! `CompilationError` (a schema can fail to *compile*, distinct from an
//! instance failing to *validate*).

use thiserror::Error;

/// A schema could not be constructed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstructionError {
    /// A sync composite (built via the non-`_async` constructor) was handed
    /// at least one async child. A synchronous schema's children must all be
    /// synchronous too; mixing is rejected at construction rather than
    /// discovered at parse time.
    #[error("synchronous {parent} schema cannot contain an asynchronous child at {child}")]
    MixedAsyncChild { parent: &'static str, child: String },
    /// A tuple was constructed with zero declared item schemas and no rest
    /// schema, which would accept only zero-length sequences but gives the
    /// caller no signal that this was intended.
    #[error("tuple schema must declare at least one item or a rest schema")]
    EmptyTuple,
}
