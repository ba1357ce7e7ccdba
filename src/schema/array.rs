//! The `array` composite: a homogeneous sequence validated element-by-element
//! against a single item schema.

use super::{AnySchema, Children, Schema, SchemaKind};
use crate::error::ConstructionError;
use crate::info::ParseInfo;
use crate::issue::{Issue, Issues, Reason};
use crate::path::{PathItem, PathItemKind, PathKey};
use crate::pipe::{run_pipe, run_pipe_async, AsyncPipe, Pipe};
use crate::result::ParseOutcome;
use crate::value::Value;
use async_trait::async_trait;

fn type_gate_issue(input: &Value, info: &ParseInfo) -> Issues {
    Issues::one(Issue::new(
        Reason::Array,
        "array",
        format!("Invalid type: expected array, received {}", input.type_name()),
        input.clone(),
        &info.validate_info(Reason::Array, None),
    ))
}

#[derive(Debug, Clone)]
pub struct ArraySchema {
    item: AnySchema,
    pipe: Pipe,
}

impl ArraySchema {
    pub fn new(item: AnySchema, pipe: Pipe) -> Result<Self, ConstructionError> {
        if item.is_async() {
            return Err(ConstructionError::MixedAsyncChild {
                parent: "array",
                child: "item".to_string(),
            });
        }
        Ok(Self { item, pipe })
    }
}

impl Schema for ArraySchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Array
    }

    fn children(&self) -> Children<'_> {
        Children::Single(&self.item)
    }

    fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        let Value::Array(items) = input else {
            return Err(type_gate_issue(input, info));
        };
        let mut output = Vec::with_capacity(items.len());
        let mut collected: Vec<Issue> = Vec::new();
        for (idx, item_input) in items.iter().enumerate() {
            let item = PathItem::new(
                PathItemKind::ArrayIndex,
                input.clone(),
                PathKey::Index(idx),
                item_input.clone(),
            );
            let child_info = info.descend(item);
            match self
                .item
                .parse_sync(item_input, &child_info)
                .expect("ArraySchema item is always sync")
            {
                Ok(value) => output.push(value),
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
        let assembled = Value::Array(output);
        let validate_info = info.validate_info(Reason::Array, None);
        run_pipe(&self.pipe, assembled, &validate_info)
    }
}

#[derive(Debug, Clone)]
pub struct ArraySchemaAsync {
    item: AnySchema,
    pipe: AsyncPipe,
}

impl ArraySchemaAsync {
    #[must_use]
    pub fn new(item: AnySchema, pipe: AsyncPipe) -> Self {
        Self { item, pipe }
    }
}

#[async_trait]
impl super::AsyncSchema for ArraySchemaAsync {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Array
    }

    fn children(&self) -> Children<'_> {
        Children::Single(&self.item)
    }

    async fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        let Value::Array(items) = input else {
            return Err(type_gate_issue(input, info));
        };
        let mut futures = Vec::with_capacity(items.len());
        for (idx, item_input) in items.iter().enumerate() {
            let schema = self.item.clone();
            let item = PathItem::new(
                PathItemKind::ArrayIndex,
                input.clone(),
                PathKey::Index(idx),
                item_input.clone(),
            );
            let child_info = info.descend(item);
            let child_input = item_input.clone();
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

        let assembled = Value::Array(values);
        let validate_info = info.validate_info(Reason::Array, None);
        run_pipe_async(&self.pipe, assembled, &validate_info).await
    }
}

impl From<ArraySchema> for AnySchema {
    fn from(schema: ArraySchema) -> Self {
        AnySchema::Sync(std::sync::Arc::new(schema))
    }
}

impl From<ArraySchemaAsync> for AnySchema {
    fn from(schema: ArraySchemaAsync) -> Self {
        super::any_async(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf;

    #[test]
    fn parses_every_element_against_the_item_schema() {
        let schema = ArraySchema::new(leaf::number().into(), Pipe::new()).unwrap();
        let input = Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]);
        let result = schema.parse(&input, &ParseInfo::new()).unwrap();
        assert_eq!(
            result,
            Value::Array(vec![Value::Number(1.0), Value::Number(2.0)])
        );
    }

    #[test]
    fn reports_an_issue_per_failing_index() {
        let schema = ArraySchema::new(leaf::number().into(), Pipe::new()).unwrap();
        let input = Value::Array(vec![Value::Number(1.0), Value::from("nope")]);
        let err = schema.parse(&input, &ParseInfo::new()).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.first().path.to_string(), "[1]");
    }

    #[test]
    fn type_gate_rejects_non_arrays() {
        let schema = ArraySchema::new(leaf::number().into(), Pipe::new()).unwrap();
        assert!(schema.parse(&Value::Null, &ParseInfo::new()).is_err());
    }
}
