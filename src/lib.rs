//! # schemaval
//!
//! The core of a schema-based parser: given a schema built from the
//! composite kinds in [`schema`] (`object`, `record`, `array`, `tuple`,
//! `map`, `set`, `union`, and the nullable/optional/nullish wrapper family)
//! plus a handful of leaf schemas, `parse` an untyped [`value::Value`] into
//! a validated, possibly-transformed one, or collect every failure as a
//! navigable [`issue::Issues`] tree.
//!
//! ```rust
//! use schemaval::{convenience, leaf, schema::object::ObjectSchema, schema::AnySchema};
//! use schemaval::pipe::Pipe;
//! use schemaval::value::Value;
//! use indexmap::IndexMap;
//!
//! let mut shape = IndexMap::new();
//! shape.insert("name".to_string(), leaf::string().into());
//! shape.insert("age".to_string(), leaf::number().into());
//! let schema: AnySchema = ObjectSchema::new(shape, Pipe::new()).unwrap().into();
//!
//! let input = Value::Object(IndexMap::from([
//!     ("name".to_string(), Value::from("Ada")),
//!     ("age".to_string(), Value::Number(30.0)),
//! ]));
//! let result = convenience::parse(&schema, &input);
//! assert!(result.is_ok());
//! ```
//!
//! This crate deliberately stops at the protocol: a full primitive-type
//! library (string formats, numeric bounds, dates, …) and derived
//! operations (`merge`, `pick`, `omit`, …) are built on top of it, not
//! inside it. [`leaf`] and [`actions`] hold only enough of those to
//! exercise the composites in tests and docs.

#![warn(
    clippy::doc_markdown,
    clippy::explicit_iter_loop,
    clippy::needless_pass_by_value,
    clippy::redundant_closure,
    missing_debug_implementations,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications
)]

pub mod actions;
pub mod convenience;
pub mod error;
pub mod info;
pub mod issue;
pub mod leaf;
pub mod path;
pub mod pipe;
pub mod result;
pub mod schema;
pub mod value;

pub use convenience::{parse, parse_async, safe_parse, safe_parse_async, ParseError};
pub use error::ConstructionError;
pub use info::{ParseInfo, ValidateInfo};
pub use issue::{Issue, Issues, Origin, Reason};
pub use path::{Path, PathItem, PathItemKind, PathKey};
pub use result::ParseOutcome;
pub use schema::{AnySchema, AsyncSchema, Schema, SchemaKind};
pub use value::Value;

#[cfg(test)]
pub(crate) mod tests_util {
    use crate::info::ParseInfo;
    use crate::result::ParseOutcome;
    use crate::schema::AnySchema;
    use crate::value::Value;

    /// Asserts a synchronous schema accepts `input`, returning the parsed
    /// value for further assertions.
    pub fn assert_ok(schema: &AnySchema, input: &Value) -> Value {
        schema
            .parse_sync(input, &ParseInfo::new())
            .expect("schema must be synchronous")
            .unwrap_or_else(|issues| panic!("expected success, got issues: {:?}", issues))
    }

    /// Asserts a synchronous schema rejects `input` with exactly `count`
    /// issues.
    pub fn assert_issue_count(schema: &AnySchema, input: &Value, count: usize) {
        let outcome: ParseOutcome<Value> = schema
            .parse_sync(input, &ParseInfo::new())
            .expect("schema must be synchronous");
        match outcome {
            Ok(value) => panic!("expected failure, got success: {value:?}"),
            Err(issues) => assert_eq!(issues.len(), count),
        }
    }
}

#[cfg(test)]
mod integration_tests {
    use crate::convenience;
    use crate::info::ParseInfo;
    use crate::leaf;
    use crate::pipe::Pipe;
    use crate::schema::array::ArraySchema;
    use crate::schema::object::ObjectSchema;
    use crate::schema::union::UnionSchema;
    use crate::schema::wrappers::NullableSchema;
    use crate::schema::AnySchema;
    use crate::value::Value;
    use indexmap::IndexMap;

    fn person_schema() -> AnySchema {
        let mut shape = IndexMap::new();
        shape.insert("name".to_string(), leaf::string().into());
        shape.insert("age".to_string(), leaf::number().into());
        ObjectSchema::new(shape, Pipe::new()).unwrap().into()
    }

    #[test]
    fn s1_object_accepts_and_strips_unknown_fields() {
        let schema = person_schema();
        let input = Value::Object(IndexMap::from([
            ("name".to_string(), Value::from("Ada")),
            ("age".to_string(), Value::Number(30.0)),
            ("extra".to_string(), Value::from("dropped")),
        ]));
        let result = convenience::parse(&schema, &input).unwrap();
        let Value::Object(out) = result else { panic!("expected object") };
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn s4_array_of_objects_paths_nest_correctly() {
        let item_schema = person_schema();
        let schema: AnySchema = ArraySchema::new(item_schema, Pipe::new()).unwrap().into();
        let input = Value::Array(vec![Value::Object(IndexMap::from([
            ("name".to_string(), Value::Number(1.0)),
            ("age".to_string(), Value::Number(30.0)),
        ]))]);
        let outcome = schema.parse_sync(&input, &ParseInfo::new()).unwrap();
        let err = outcome.unwrap_err();
        assert_eq!(err.first().path.to_string(), "[0].name");
    }

    #[test]
    fn s5_union_tries_every_option_once_and_nests_on_exhaustion() {
        let schema: AnySchema = UnionSchema::new(
            vec![leaf::string().into(), leaf::number().into()],
            Pipe::new(),
        )
        .unwrap()
        .into();
        assert!(convenience::parse(&schema, &Value::from("x")).is_ok());
        let err = convenience::parse(&schema, &Value::Bool(true)).unwrap_err();
        assert_eq!(err.issues().first().issues.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn s6_nullable_wrapper_short_circuits_on_null() {
        let schema: AnySchema = NullableSchema::new(person_schema()).into();
        assert!(convenience::parse(&schema, &Value::Null).is_ok());
    }

    #[test]
    fn s7_abort_early_stops_at_the_first_object_field_issue() {
        let schema = person_schema();
        let input = Value::Object(IndexMap::from([
            ("name".to_string(), Value::Number(1.0)),
            ("age".to_string(), Value::from("nope")),
        ]));
        let info = ParseInfo::new().with_abort_early(true);
        let err = crate::convenience::safe_parse(&schema, &input, info).unwrap_err();
        assert_eq!(err.len(), 1);
    }

    mod async_s7 {
        use super::*;
        use crate::info::ValidateInfo;
        use crate::issue::{Issue, Issues, Reason};
        use crate::result::ParseOutcome;
        use crate::schema::object::ObjectSchemaAsync;
        use crate::schema::{AsyncSchema, Children, SchemaKind};
        use async_trait::async_trait;
        use std::time::Duration;

        /// Succeeds after an await, to exercise abort-early cancellation
        /// racing it against a sibling that fails immediately.
        #[derive(Debug)]
        struct SlowSuccess;

        #[async_trait]
        impl AsyncSchema for SlowSuccess {
            fn kind(&self) -> SchemaKind {
                SchemaKind::String
            }
            fn children(&self) -> Children<'_> {
                Children::None
            }
            async fn parse(&self, input: &Value, _info: &ParseInfo) -> ParseOutcome<Value> {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(input.clone())
            }
        }

        /// Fails without ever awaiting.
        #[derive(Debug)]
        struct FastFailure;

        #[async_trait]
        impl AsyncSchema for FastFailure {
            fn kind(&self) -> SchemaKind {
                SchemaKind::String
            }
            fn children(&self) -> Children<'_> {
                Children::None
            }
            async fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
                let validate_info: ValidateInfo = info.validate_info(Reason::Any, None);
                Err(Issues::one(Issue::new(
                    Reason::Any,
                    "fast_failure",
                    "rejected immediately",
                    input.clone(),
                    &validate_info,
                )))
            }
        }

        #[tokio::test]
        async fn s7_async_abort_early_is_decided_by_the_first_failure_not_the_first_completion() {
            let mut shape = IndexMap::new();
            shape.insert("a".to_string(), crate::schema::any_async(SlowSuccess));
            shape.insert("b".to_string(), crate::schema::any_async(FastFailure));
            let schema: AnySchema = ObjectSchemaAsync::new(shape, crate::pipe::AsyncPipe::new()).into();

            let input = Value::Object(IndexMap::from([
                ("a".to_string(), Value::Null),
                ("b".to_string(), Value::Null),
            ]));
            let info = ParseInfo::new().with_abort_early(true);
            let err = schema.parse_async(&input, &info).await.unwrap_err();
            assert_eq!(err.len(), 1);
            assert_eq!(err.first().validation, "fast_failure");
        }

        #[tokio::test]
        async fn async_object_runs_children_concurrently_not_one_at_a_time() {
            let mut shape = IndexMap::new();
            shape.insert("a".to_string(), crate::schema::any_async(SlowSuccess));
            shape.insert("b".to_string(), crate::schema::any_async(SlowSuccess));
            let schema: AnySchema = ObjectSchemaAsync::new(shape, crate::pipe::AsyncPipe::new()).into();

            let input = Value::Object(IndexMap::from([
                ("a".to_string(), Value::Null),
                ("b".to_string(), Value::Null),
            ]));
            let start = std::time::Instant::now();
            schema
                .parse_async(&input, &ParseInfo::new())
                .await
                .unwrap();
            // Each child sleeps 50ms; two run sequentially would take ~100ms,
            // concurrently ~50ms. 90ms leaves headroom without being so loose
            // the sequential regression would slip through.
            assert!(
                start.elapsed() < Duration::from_millis(90),
                "children did not run concurrently: took {:?}",
                start.elapsed()
            );
        }
    }
}
