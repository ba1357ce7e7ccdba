//! The `tuple` composite: a fixed-length heterogeneous sequence, each
//! position checked against its own schema, with an optional `rest` schema
//! absorbing any trailing elements beyond the declared positions.

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
        Reason::Tuple,
        "tuple",
        format!("Invalid type: expected tuple, received {}", input.type_name()),
        input.clone(),
        &info.validate_info(Reason::Tuple, None),
    ))
}

fn length_issue(expected_min: usize, has_rest: bool, received: usize, input: &Value, info: &ParseInfo) -> Issue {
    let message = if has_rest {
        format!("Invalid length: expected at least {expected_min}, received {received}")
    } else {
        format!("Invalid length: expected exactly {expected_min}, received {received}")
    };
    Issue::new(
        Reason::Tuple,
        "tuple",
        message,
        input.clone(),
        &info.validate_info(Reason::Tuple, None),
    )
}

#[derive(Debug, Clone)]
pub struct TupleSchema {
    items: Vec<AnySchema>,
    rest: Option<AnySchema>,
    pipe: Pipe,
}

impl TupleSchema {
    pub fn new(
        items: Vec<AnySchema>,
        rest: Option<AnySchema>,
        pipe: Pipe,
    ) -> Result<Self, ConstructionError> {
        if items.is_empty() && rest.is_none() {
            return Err(ConstructionError::EmptyTuple);
        }
        for (idx, item) in items.iter().enumerate() {
            if item.is_async() {
                return Err(ConstructionError::MixedAsyncChild {
                    parent: "tuple",
                    child: idx.to_string(),
                });
            }
        }
        if let Some(rest) = &rest {
            if rest.is_async() {
                return Err(ConstructionError::MixedAsyncChild {
                    parent: "tuple",
                    child: "rest".to_string(),
                });
            }
        }
        Ok(Self { items, rest, pipe })
    }
}

impl Schema for TupleSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Tuple
    }

    fn children(&self) -> Children<'_> {
        Children::Tuple {
            items: &self.items,
            rest: self.rest.as_ref(),
        }
    }

    fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        let Value::Array(elements) = input else {
            return Err(type_gate_issue(input, info));
        };
        if elements.len() < self.items.len()
            || (self.rest.is_none() && elements.len() > self.items.len())
        {
            let issue = length_issue(self.items.len(), self.rest.is_some(), elements.len(), input, info);
            return Err(Issues::one(issue));
        }

        let mut output = Vec::with_capacity(elements.len());
        let mut collected: Vec<Issue> = Vec::new();
        for (idx, schema) in self.items.iter().enumerate() {
            let element = &elements[idx];
            let item = PathItem::new(
                PathItemKind::TupleIndex,
                input.clone(),
                PathKey::Index(idx),
                element.clone(),
            );
            let child_info = info.descend(item);
            match schema
                .parse_sync(element, &child_info)
                .expect("TupleSchema items are always sync")
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
        if let Some(rest_schema) = &self.rest {
            for (idx, element) in elements.iter().enumerate().skip(self.items.len()) {
                let item = PathItem::new(
                    PathItemKind::TupleIndex,
                    input.clone(),
                    PathKey::Index(idx),
                    element.clone(),
                );
                let child_info = info.descend(item);
                match rest_schema
                    .parse_sync(element, &child_info)
                    .expect("TupleSchema rest is always sync")
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
        }
        if let Some(issues) = Issues::from_vec(collected) {
            return Err(issues);
        }
        let assembled = Value::Array(output);
        let validate_info = info.validate_info(Reason::Tuple, None);
        run_pipe(&self.pipe, assembled, &validate_info)
    }
}

#[derive(Debug, Clone)]
pub struct TupleSchemaAsync {
    items: Vec<AnySchema>,
    rest: Option<AnySchema>,
    pipe: AsyncPipe,
}

impl TupleSchemaAsync {
    pub fn new(
        items: Vec<AnySchema>,
        rest: Option<AnySchema>,
        pipe: AsyncPipe,
    ) -> Result<Self, ConstructionError> {
        if items.is_empty() && rest.is_none() {
            return Err(ConstructionError::EmptyTuple);
        }
        Ok(Self { items, rest, pipe })
    }
}

#[async_trait]
impl super::AsyncSchema for TupleSchemaAsync {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Tuple
    }

    fn children(&self) -> Children<'_> {
        Children::Tuple {
            items: &self.items,
            rest: self.rest.as_ref(),
        }
    }

    async fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        let Value::Array(elements) = input else {
            return Err(type_gate_issue(input, info));
        };
        if elements.len() < self.items.len()
            || (self.rest.is_none() && elements.len() > self.items.len())
        {
            let issue = length_issue(self.items.len(), self.rest.is_some(), elements.len(), input, info);
            return Err(Issues::one(issue));
        }

        let mut futures = Vec::with_capacity(elements.len());
        for (idx, element) in elements.iter().enumerate() {
            let schema = if idx < self.items.len() {
                self.items[idx].clone()
            } else {
                self.rest
                    .as_ref()
                    .expect("length check above guarantees rest exists for trailing indices")
                    .clone()
            };
            let item = PathItem::new(
                PathItemKind::TupleIndex,
                input.clone(),
                PathKey::Index(idx),
                element.clone(),
            );
            let child_info = info.descend(item);
            let child_input = element.clone();
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
        let validate_info = info.validate_info(Reason::Tuple, None);
        run_pipe_async(&self.pipe, assembled, &validate_info).await
    }
}

impl From<TupleSchema> for AnySchema {
    fn from(schema: TupleSchema) -> Self {
        AnySchema::Sync(std::sync::Arc::new(schema))
    }
}

impl From<TupleSchemaAsync> for AnySchema {
    fn from(schema: TupleSchemaAsync) -> Self {
        super::any_async(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf;

    #[test]
    fn parses_fixed_positions_by_their_own_schema() {
        let schema = TupleSchema::new(
            vec![leaf::string().into(), leaf::number().into()],
            None,
            Pipe::new(),
        )
        .unwrap();
        let input = Value::Array(vec![Value::from("x"), Value::Number(1.0)]);
        assert!(schema.parse(&input, &ParseInfo::new()).is_ok());
    }

    #[test]
    fn rejects_wrong_length_without_rest() {
        let schema = TupleSchema::new(vec![leaf::string().into()], None, Pipe::new()).unwrap();
        let input = Value::Array(vec![Value::from("x"), Value::from("y")]);
        assert!(schema.parse(&input, &ParseInfo::new()).is_err());
    }

    #[test]
    fn rest_schema_absorbs_trailing_elements() {
        let schema = TupleSchema::new(
            vec![leaf::string().into()],
            Some(leaf::number().into()),
            Pipe::new(),
        )
        .unwrap();
        let input = Value::Array(vec![Value::from("x"), Value::Number(1.0), Value::Number(2.0)]);
        assert!(schema.parse(&input, &ParseInfo::new()).is_ok());
    }

    #[test]
    fn construction_rejects_empty_tuple() {
        let result = TupleSchema::new(vec![], None, Pipe::new());
        assert!(matches!(result, Err(ConstructionError::EmptyTuple)));
    }
}
