//! The six wrapper schemas: `nullable`, `optional`, `nullish` widen a wrapped
//! schema to also accept `null`, `undefined`, or both, optionally
//! substituting a default value or producer in place of the sentinel before
//! delegating; `non_nullable`, `non_optional`, `non_nullish` narrow a wrapped
//! schema by rejecting one or both sentinels outright before delegating.

use super::{AnySchema, Children, Schema, SchemaKind};
use crate::info::ParseInfo;
use crate::issue::{Issue, Issues, Reason};
use crate::result::ParseOutcome;
use crate::value::Value;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Produces the value substituted for a wrapper's sentinel input. A plain
/// value is the common case; a producer lets the default depend on nothing
/// but still be computed freshly per call (avoiding a shared mutable
/// default that callers could accidentally alias).
pub enum Default_ {
    Value(Value),
    Producer(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl fmt::Debug for Default_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Default_::Value(v) => write!(f, "Default_::Value({v:?})"),
            Default_::Producer(_) => write!(f, "Default_::Producer(..)"),
        }
    }
}

impl Default_ {
    fn resolve(&self) -> Value {
        match self {
            Default_::Value(v) => v.clone(),
            Default_::Producer(f) => f(),
        }
    }
}

impl Clone for Default_ {
    fn clone(&self) -> Self {
        match self {
            Default_::Value(v) => Default_::Value(v.clone()),
            Default_::Producer(f) => Default_::Producer(Arc::clone(f)),
        }
    }
}

macro_rules! widening_wrapper {
    ($struct_name:ident, $async_name:ident, $kind:ident, $sentinel:expr) => {
        #[derive(Debug, Clone)]
        pub struct $struct_name {
            wrapped: AnySchema,
            default: Option<Default_>,
        }

        impl $struct_name {
            #[must_use]
            pub fn new(wrapped: AnySchema) -> Self {
                Self {
                    wrapped,
                    default: None,
                }
            }

            #[must_use]
            pub fn with_default(wrapped: AnySchema, default: Default_) -> Self {
                Self {
                    wrapped,
                    default: Some(default),
                }
            }
        }

        impl Schema for $struct_name {
            fn kind(&self) -> SchemaKind {
                SchemaKind::$kind
            }

            fn children(&self) -> Children<'_> {
                Children::Wrapped(&self.wrapped)
            }

            fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
                let sentinel: fn(&Value) -> bool = $sentinel;
                if sentinel(input) {
                    return match &self.default {
                        Some(default) => self
                            .wrapped
                            .parse_sync(&default.resolve(), info)
                            .expect("wrapper children are always sync"),
                        None => Ok(input.clone()),
                    };
                }
                self.wrapped
                    .parse_sync(input, info)
                    .expect("wrapper children are always sync")
            }
        }

        #[derive(Debug, Clone)]
        pub struct $async_name {
            wrapped: AnySchema,
            default: Option<Default_>,
        }

        impl $async_name {
            #[must_use]
            pub fn new(wrapped: AnySchema) -> Self {
                Self {
                    wrapped,
                    default: None,
                }
            }

            #[must_use]
            pub fn with_default(wrapped: AnySchema, default: Default_) -> Self {
                Self {
                    wrapped,
                    default: Some(default),
                }
            }
        }

        #[async_trait]
        impl super::AsyncSchema for $async_name {
            fn kind(&self) -> SchemaKind {
                SchemaKind::$kind
            }

            fn children(&self) -> Children<'_> {
                Children::Wrapped(&self.wrapped)
            }

            async fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
                let sentinel: fn(&Value) -> bool = $sentinel;
                if sentinel(input) {
                    return match &self.default {
                        Some(default) => self.wrapped.parse_async(&default.resolve(), info).await,
                        None => Ok(input.clone()),
                    };
                }
                self.wrapped.parse_async(input, info).await
            }
        }

        impl From<$struct_name> for AnySchema {
            fn from(schema: $struct_name) -> Self {
                AnySchema::Sync(Arc::new(schema))
            }
        }

        impl From<$async_name> for AnySchema {
            fn from(schema: $async_name) -> Self {
                super::any_async(schema)
            }
        }
    };
}

widening_wrapper!(NullableSchema, NullableSchemaAsync, Nullable, |v| v.is_null());
widening_wrapper!(OptionalSchema, OptionalSchemaAsync, Optional, |v| v.is_undefined());
widening_wrapper!(NullishSchema, NullishSchemaAsync, Nullish, |v| v.is_null()
    || v.is_undefined());

macro_rules! narrowing_wrapper {
    ($struct_name:ident, $async_name:ident, $kind:ident, $reason:ident, $rejects:expr, $expected:expr) => {
        #[derive(Debug, Clone)]
        pub struct $struct_name {
            wrapped: AnySchema,
        }

        impl $struct_name {
            #[must_use]
            pub fn new(wrapped: AnySchema) -> Self {
                Self { wrapped }
            }
        }

        impl Schema for $struct_name {
            fn kind(&self) -> SchemaKind {
                SchemaKind::$kind
            }

            fn children(&self) -> Children<'_> {
                Children::Wrapped(&self.wrapped)
            }

            fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
                let rejects: fn(&Value) -> bool = $rejects;
                if rejects(input) {
                    let validate_info = info.validate_info(Reason::$reason, None);
                    return Err(Issues::one(Issue::new(
                        Reason::$reason,
                        SchemaKind::$kind.to_string(),
                        format!("Invalid type: expected {}, received {}", $expected, input.type_name()),
                        input.clone(),
                        &validate_info,
                    )));
                }
                self.wrapped
                    .parse_sync(input, info)
                    .expect("wrapper children are always sync")
            }
        }

        #[derive(Debug, Clone)]
        pub struct $async_name {
            wrapped: AnySchema,
        }

        impl $async_name {
            #[must_use]
            pub fn new(wrapped: AnySchema) -> Self {
                Self { wrapped }
            }
        }

        #[async_trait]
        impl super::AsyncSchema for $async_name {
            fn kind(&self) -> SchemaKind {
                SchemaKind::$kind
            }

            fn children(&self) -> Children<'_> {
                Children::Wrapped(&self.wrapped)
            }

            async fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
                let rejects: fn(&Value) -> bool = $rejects;
                if rejects(input) {
                    let validate_info = info.validate_info(Reason::$reason, None);
                    return Err(Issues::one(Issue::new(
                        Reason::$reason,
                        SchemaKind::$kind.to_string(),
                        format!("Invalid type: expected {}, received {}", $expected, input.type_name()),
                        input.clone(),
                        &validate_info,
                    )));
                }
                self.wrapped.parse_async(input, info).await
            }
        }

        impl From<$struct_name> for AnySchema {
            fn from(schema: $struct_name) -> Self {
                AnySchema::Sync(Arc::new(schema))
            }
        }

        impl From<$async_name> for AnySchema {
            fn from(schema: $async_name) -> Self {
                super::any_async(schema)
            }
        }
    };
}

narrowing_wrapper!(
    NonNullableSchema,
    NonNullableSchemaAsync,
    NonNullable,
    Type,
    |v| v.is_null(),
    "non-null"
);
narrowing_wrapper!(
    NonOptionalSchema,
    NonOptionalSchemaAsync,
    NonOptional,
    Type,
    |v| v.is_undefined(),
    "non-undefined"
);
narrowing_wrapper!(
    NonNullishSchema,
    NonNullishSchemaAsync,
    NonNullish,
    Type,
    |v| v.is_null() || v.is_undefined(),
    "non-nullish"
);
