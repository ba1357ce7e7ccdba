//! The `union` composite: tries each alternative in declaration order and
//! returns the first success. Each option is invoked exactly once, never
//! re-tried or speculatively probed — if every option fails, a single
//! synthetic issue is returned carrying every option's own issues nested
//! underneath it.

use super::{AnySchema, Children, Schema, SchemaKind};
use crate::error::ConstructionError;
use crate::info::ParseInfo;
use crate::issue::{Issue, Issues, Reason};
use crate::pipe::{run_pipe, run_pipe_async, AsyncPipe, Pipe};
use crate::result::ParseOutcome;
use crate::value::Value;
use async_trait::async_trait;

fn exhaustion_issue(input: &Value, info: &ParseInfo, nested: Vec<Issue>) -> Issues {
    let validate_info = info.validate_info(Reason::Any, None);
    Issues::one(
        Issue::new(
            Reason::Any,
            "union",
            "Invalid input: none of the union's options matched",
            input.clone(),
            &validate_info,
        )
        .with_nested(nested),
    )
}

#[derive(Debug, Clone)]
pub struct UnionSchema {
    options: Vec<AnySchema>,
    pipe: Pipe,
}

impl UnionSchema {
    pub fn new(options: Vec<AnySchema>, pipe: Pipe) -> Result<Self, ConstructionError> {
        for (idx, option) in options.iter().enumerate() {
            if option.is_async() {
                return Err(ConstructionError::MixedAsyncChild {
                    parent: "union",
                    child: idx.to_string(),
                });
            }
        }
        Ok(Self { options, pipe })
    }
}

impl Schema for UnionSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Union
    }

    fn children(&self) -> Children<'_> {
        Children::Many(&self.options)
    }

    fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        let mut nested = Vec::with_capacity(self.options.len());
        for option in &self.options {
            match option
                .parse_sync(input, info)
                .expect("UnionSchema options are always sync")
            {
                Ok(value) => {
                    let validate_info = info.validate_info(Reason::Any, None);
                    return run_pipe(&self.pipe, value, &validate_info);
                }
                Err(issues) => nested.extend(issues.into_vec()),
            }
        }
        Err(exhaustion_issue(input, info, nested))
    }
}

#[derive(Debug, Clone)]
pub struct UnionSchemaAsync {
    options: Vec<AnySchema>,
    pipe: AsyncPipe,
}

impl UnionSchemaAsync {
    #[must_use]
    pub fn new(options: Vec<AnySchema>, pipe: AsyncPipe) -> Self {
        Self { options, pipe }
    }
}

#[async_trait]
impl super::AsyncSchema for UnionSchemaAsync {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Union
    }

    fn children(&self) -> Children<'_> {
        Children::Many(&self.options)
    }

    async fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        let mut nested = Vec::with_capacity(self.options.len());
        for option in &self.options {
            match option.parse_async(input, info).await {
                Ok(value) => {
                    let validate_info = info.validate_info(Reason::Any, None);
                    return run_pipe_async(&self.pipe, value, &validate_info).await;
                }
                Err(issues) => nested.extend(issues.into_vec()),
            }
        }
        Err(exhaustion_issue(input, info, nested))
    }
}

impl From<UnionSchema> for AnySchema {
    fn from(schema: UnionSchema) -> Self {
        AnySchema::Sync(std::sync::Arc::new(schema))
    }
}

impl From<UnionSchemaAsync> for AnySchema {
    fn from(schema: UnionSchemaAsync) -> Self {
        super::any_async(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf;

    #[test]
    fn first_matching_option_wins() {
        let schema = UnionSchema::new(
            vec![leaf::string().into(), leaf::number().into()],
            Pipe::new(),
        )
        .unwrap();
        assert!(schema.parse(&Value::Number(1.0), &ParseInfo::new()).is_ok());
        assert!(schema.parse(&Value::from("x"), &ParseInfo::new()).is_ok());
    }

    #[test]
    fn exhaustion_nests_every_option_issue() {
        let schema = UnionSchema::new(
            vec![leaf::string().into(), leaf::number().into()],
            Pipe::new(),
        )
        .unwrap();
        let err = schema.parse(&Value::Bool(true), &ParseInfo::new()).unwrap_err();
        assert_eq!(err.len(), 1);
        let nested = err.first().issues.as_ref().unwrap();
        assert_eq!(nested.len(), 2);
    }
}
