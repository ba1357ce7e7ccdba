//! The `object` composite: an unordered input mapping matched against a
//! fixed, known key set.
//!
//! Grounded in the teacher crate's `keywords::properties::PropertiesValidator`
//! — iterate the declared keys, look the value up in the instance (missing
//! becomes `undefined`), recurse, and wrap any failures with an object-key
//! path item.

use super::{AnySchema, Children, Schema, SchemaKind};
use crate::error::ConstructionError;
use crate::info::ParseInfo;
use crate::issue::{Issue, Issues, Reason};
use crate::path::{PathItem, PathItemKind, PathKey};
use crate::pipe::{run_pipe, run_pipe_async, AsyncPipe, Pipe};
use crate::result::ParseOutcome;
use crate::value::Value;
use async_trait::async_trait;
use indexmap::IndexMap;

fn type_gate_issue(input: &Value, info: &ParseInfo) -> Issues {
    Issues::one(Issue::new(
        Reason::Object,
        "object",
        format!("Invalid type: expected object, received {}", input.type_name()),
        input.clone(),
        &info.validate_info(Reason::Object, None),
    ))
}

/// Declaration-order keys paired with their value schema. `IndexMap`
/// preserves this order for free, so there is nothing left to cache — the
/// map's own iteration order is already the canonical child order.
pub type Shape = IndexMap<String, AnySchema>;

/// A synchronous `object` schema. Construction rejects any async child
/// schema — see [`ConstructionError::MixedAsyncChild`].
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    shape: Shape,
    pipe: Pipe,
}

impl ObjectSchema {
    pub fn new(shape: Shape, pipe: Pipe) -> Result<Self, ConstructionError> {
        for (key, schema) in &shape {
            if schema.is_async() {
                return Err(ConstructionError::MixedAsyncChild {
                    parent: "object",
                    child: key.clone(),
                });
            }
        }
        Ok(Self { shape, pipe })
    }
}

impl Schema for ObjectSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Object
    }

    fn children(&self) -> Children<'_> {
        Children::Keyed(&self.shape)
    }

    fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        let Value::Object(map) = input else {
            return Err(type_gate_issue(input, info));
        };
        let mut output = IndexMap::with_capacity(self.shape.len());
        let mut collected: Vec<Issue> = Vec::new();
        for (key, schema) in &self.shape {
            let child_input = map.get(key).cloned().unwrap_or(Value::Undefined);
            let item = PathItem::new(
                PathItemKind::ObjectKey,
                input.clone(),
                PathKey::Name(key.clone()),
                child_input.clone(),
            );
            let child_info = info.descend(item);
            let result = schema
                .parse_sync(&child_input, &child_info)
                .expect("ObjectSchema children are always sync");
            match result {
                Ok(value) => {
                    output.insert(key.clone(), value);
                }
                Err(issues) => {
                    if info.abort_early {
                        return Err(issues);
                    }
                    collected.extend(issues.into_vec());
                }
            }
        }
        if let Some(issues) = Issues::from_vec(collected) {
            return Err(issues);
        }
        let assembled = Value::Object(output);
        let validate_info = info.validate_info(Reason::Object, None);
        run_pipe(&self.pipe, assembled, &validate_info)
    }
}

/// The asynchronous `object` schema: children may be any mix of sync and
/// async, awaited concurrently.
#[derive(Debug, Clone)]
pub struct ObjectSchemaAsync {
    shape: Shape,
    pipe: AsyncPipe,
}

impl ObjectSchemaAsync {
    #[must_use]
    pub fn new(shape: Shape, pipe: AsyncPipe) -> Self {
        Self { shape, pipe }
    }
}

#[async_trait]
impl super::AsyncSchema for ObjectSchemaAsync {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Object
    }

    fn children(&self) -> Children<'_> {
        Children::Keyed(&self.shape)
    }

    async fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        let Value::Object(map) = input else {
            return Err(type_gate_issue(input, info));
        };
        let keys: Vec<&String> = self.shape.keys().collect();
        let mut futures = Vec::with_capacity(keys.len());
        for (idx, key) in keys.iter().enumerate() {
            let schema = self.shape.get(*key).expect("key came from shape").clone();
            let child_input = map.get(*key).cloned().unwrap_or(Value::Undefined);
            let item = PathItem::new(
                PathItemKind::ObjectKey,
                input.clone(),
                PathKey::Name((*key).clone()),
                child_input.clone(),
            );
            let child_info = info.descend(item);
            futures.push(Box::pin(async move {
                (idx, schema.parse_async(&child_input, &child_info).await)
            }) as super::IndexedChildFuture);
        }

        let values = if info.abort_early {
            super::join_children_abort_early(futures).await?
        } else {
            let mut values = Vec::with_capacity(futures.len());
            let mut collected: Vec<Issue> = Vec::new();
            for outcome in super::join_children(futures).await {
                match outcome {
                    Ok(value) => values.push(value),
                    Err(issues) => collected.extend(issues.into_vec()),
                }
            }
            if let Some(issues) = Issues::from_vec(collected) {
                return Err(issues);
            }
            values
        };

        let mut output = IndexMap::with_capacity(keys.len());
        for (key, value) in keys.into_iter().zip(values.into_iter()) {
            output.insert(key.clone(), value);
        }
        let assembled = Value::Object(output);
        let validate_info = info.validate_info(Reason::Object, None);
        run_pipe_async(&self.pipe, assembled, &validate_info).await
    }
}

impl From<ObjectSchema> for AnySchema {
    fn from(schema: ObjectSchema) -> Self {
        AnySchema::Sync(std::sync::Arc::new(schema))
    }
}

impl From<ObjectSchemaAsync> for AnySchema {
    fn from(schema: ObjectSchemaAsync) -> Self {
        super::any_async(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf;
    use crate::pipe::Action;
    use crate::info::ValidateInfo;
    use test_case::test_case;

    #[derive(Debug)]
    struct MinValue(f64);
    impl Action for MinValue {
        fn name(&self) -> &'static str {
            "min_value"
        }
        fn run(&self, value: &Value, info: &ValidateInfo) -> ParseOutcome<Value> {
            match value.as_f64() {
                Some(n) if n < self.0 => Err(Issues::one(Issue::new(
                    Reason::Number,
                    "min_value",
                    format!("Invalid value: expected >= {}", self.0),
                    value.clone(),
                    info,
                ))),
                _ => Ok(value.clone()),
            }
        }
    }

    fn ada_schema() -> ObjectSchema {
        let mut shape = Shape::new();
        shape.insert("name".to_string(), leaf::string().into());
        shape.insert(
            "age".to_string(),
            AnySchema::from(leaf::number_with_pipe(vec![Box::new(MinValue(0.0))])),
        );
        ObjectSchema::new(shape, Pipe::new()).unwrap()
    }

    #[test]
    fn s1_strips_unknown_keys_and_succeeds() {
        let schema = ada_schema();
        let input = Value::Object(IndexMap::from([
            ("name".to_string(), Value::String("Ada".to_string())),
            ("age".to_string(), Value::Number(30.0)),
            ("extra".to_string(), Value::String("x".to_string())),
        ]));
        let result = schema.parse(&input, &ParseInfo::new()).unwrap();
        let Value::Object(out) = result else { panic!("expected object") };
        assert_eq!(out.len(), 2);
        assert_eq!(out.get("name"), Some(&Value::String("Ada".to_string())));
        assert_eq!(out.get("age"), Some(&Value::Number(30.0)));
    }

    #[test]
    fn s2_collects_both_issues_by_default() {
        let schema = ada_schema();
        let input = Value::Object(IndexMap::from([
            ("name".to_string(), Value::Number(42.0)),
            ("age".to_string(), Value::Number(-1.0)),
        ]));
        let err = schema.parse(&input, &ParseInfo::new()).unwrap_err();
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn s3_abort_early_returns_exactly_one_issue() {
        let schema = ada_schema();
        let input = Value::Object(IndexMap::from([
            ("name".to_string(), Value::Number(42.0)),
            ("age".to_string(), Value::Number(-1.0)),
        ]));
        let info = ParseInfo::new().with_abort_early(true);
        let err = schema.parse(&input, &info).unwrap_err();
        assert_eq!(err.len(), 1);
    }

    #[test_case(Value::Array(vec![]))]
    #[test_case(Value::Null)]
    #[test_case(Value::String("x".to_string()))]
    fn type_gate_rejects_non_objects(input: Value) {
        let schema = ada_schema();
        assert!(schema.parse(&input, &ParseInfo::new()).is_err());
    }

    #[test]
    fn rejects_async_child_at_construction() {
        let mut shape = Shape::new();
        shape.insert(
            "x".to_string(),
            super::super::any_async(crate::schema::record::RecordSchemaAsync::new(
                leaf::string().into(),
                leaf::string().into(),
            )),
        );
        let result = ObjectSchema::new(shape, Pipe::new());
        assert!(matches!(
            result,
            Err(ConstructionError::MixedAsyncChild { .. })
        ));
    }
}
