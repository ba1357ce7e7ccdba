//! The `set` composite: an unordered container of values, all checked
//! against one value schema. Uniqueness is a property of whatever produced
//! the input [`Value::Set`]; this schema only iterates it, it does not
//! enforce or re-derive uniqueness.

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
        Reason::Set,
        "set",
        format!("Invalid type: expected set, received {}", input.type_name()),
        input.clone(),
        &info.validate_info(Reason::Set, None),
    ))
}

#[derive(Debug, Clone)]
pub struct SetSchema {
    value: AnySchema,
    pipe: Pipe,
}

impl SetSchema {
    pub fn new(value: AnySchema, pipe: Pipe) -> Result<Self, ConstructionError> {
        if value.is_async() {
            return Err(ConstructionError::MixedAsyncChild {
                parent: "set",
                child: "value".to_string(),
            });
        }
        Ok(Self { value, pipe })
    }
}

impl Schema for SetSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Set
    }

    fn children(&self) -> Children<'_> {
        Children::Single(&self.value)
    }

    fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        let Value::Set(items) = input else {
            return Err(type_gate_issue(input, info));
        };
        let mut output = Vec::with_capacity(items.len());
        let mut collected: Vec<Issue> = Vec::new();
        for (idx, item_input) in items.iter().enumerate() {
            let item = PathItem::new(
                PathItemKind::SetIndex,
                input.clone(),
                PathKey::Index(idx),
                item_input.clone(),
            );
            let child_info = info.descend(item);
            match self
                .value
                .parse_sync(item_input, &child_info)
                .expect("SetSchema value is always sync")
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
        let assembled = Value::Set(output);
        let validate_info = info.validate_info(Reason::Set, None);
        run_pipe(&self.pipe, assembled, &validate_info)
    }
}

#[derive(Debug, Clone)]
pub struct SetSchemaAsync {
    value: AnySchema,
    pipe: AsyncPipe,
}

impl SetSchemaAsync {
    #[must_use]
    pub fn new(value: AnySchema, pipe: AsyncPipe) -> Self {
        Self { value, pipe }
    }
}

#[async_trait]
impl super::AsyncSchema for SetSchemaAsync {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Set
    }

    fn children(&self) -> Children<'_> {
        Children::Single(&self.value)
    }

    async fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        let Value::Set(items) = input else {
            return Err(type_gate_issue(input, info));
        };
        let mut futures = Vec::with_capacity(items.len());
        for (idx, item_input) in items.iter().enumerate() {
            let schema = self.value.clone();
            let item = PathItem::new(
                PathItemKind::SetIndex,
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

        let assembled = Value::Set(values);
        let validate_info = info.validate_info(Reason::Set, None);
        run_pipe_async(&self.pipe, assembled, &validate_info).await
    }
}

impl From<SetSchema> for AnySchema {
    fn from(schema: SetSchema) -> Self {
        AnySchema::Sync(std::sync::Arc::new(schema))
    }
}

impl From<SetSchemaAsync> for AnySchema {
    fn from(schema: SetSchemaAsync) -> Self {
        super::any_async(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf;

    #[test]
    fn parses_every_member_and_drops_nothing() {
        let schema = SetSchema::new(leaf::number().into(), Pipe::new()).unwrap();
        let input = Value::Set(vec![Value::Number(1.0), Value::Number(2.0)]);
        let result = schema.parse(&input, &ParseInfo::new()).unwrap();
        assert_eq!(result, Value::Set(vec![Value::Number(1.0), Value::Number(2.0)]));
    }

    #[test]
    fn type_gate_rejects_non_sets() {
        let schema = SetSchema::new(leaf::number().into(), Pipe::new()).unwrap();
        assert!(schema.parse(&Value::Array(vec![]), &ParseInfo::new()).is_err());
    }
}
