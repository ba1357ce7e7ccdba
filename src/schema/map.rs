//! The `map` composite: a keyed container where the key need not be a
//! string, represented by [`Value::Map`] rather than [`Value::Object`].
//! Distinct from `record`, which is always string-keyed and represented as
//! an object.

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
        Reason::Map,
        "map",
        format!("Invalid type: expected map, received {}", input.type_name()),
        input.clone(),
        &info.validate_info(Reason::Map, None),
    ))
}

#[derive(Debug, Clone)]
pub struct MapSchema {
    key: AnySchema,
    value: AnySchema,
    pipe: Pipe,
}

impl MapSchema {
    pub fn new(key: AnySchema, value: AnySchema, pipe: Pipe) -> Result<Self, ConstructionError> {
        if key.is_async() {
            return Err(ConstructionError::MixedAsyncChild {
                parent: "map",
                child: "key".to_string(),
            });
        }
        if value.is_async() {
            return Err(ConstructionError::MixedAsyncChild {
                parent: "map",
                child: "value".to_string(),
            });
        }
        Ok(Self { key, value, pipe })
    }
}

impl Schema for MapSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Map
    }

    fn children(&self) -> Children<'_> {
        Children::Pair(&self.key, &self.value)
    }

    fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        let Value::Map(entries) = input else {
            return Err(type_gate_issue(input, info));
        };
        let mut output = Vec::with_capacity(entries.len());
        let mut collected: Vec<Issue> = Vec::new();
        for (idx, (raw_key, raw_value)) in entries.iter().enumerate() {
            let key_item = PathItem::new(
                PathItemKind::MapKey,
                input.clone(),
                PathKey::Index(idx),
                raw_key.clone(),
            );
            let key_info = info.descend(key_item).with_origin(crate::issue::Origin::Key);
            let key_result = self
                .key
                .parse_sync(raw_key, &key_info)
                .expect("MapSchema key is always sync");

            let value_item = PathItem::new(
                PathItemKind::MapValue,
                input.clone(),
                PathKey::Index(idx),
                raw_value.clone(),
            );
            let value_info = info.descend(value_item).with_origin(crate::issue::Origin::Value);
            let value_result = self
                .value
                .parse_sync(raw_value, &value_info)
                .expect("MapSchema value is always sync");

            match (key_result, value_result) {
                (Ok(key), Ok(value)) => output.push((key, value)),
                (key_res, value_res) => {
                    let mut issues = Vec::new();
                    if let Err(i) = key_res {
                        issues.extend(i.into_vec());
                    }
                    if let Err(i) = value_res {
                        issues.extend(i.into_vec());
                    }
                    if info.abort_early {
                        return Err(Issues::from_vec(issues).expect("at least one side failed"));
                    }
                    collected.extend(issues);
                }
            }
        }
        if let Some(issues) = Issues::from_vec(collected) {
            return Err(issues);
        }
        let assembled = Value::Map(output);
        let validate_info = info.validate_info(Reason::Map, None);
        run_pipe(&self.pipe, assembled, &validate_info)
    }
}

#[derive(Debug, Clone)]
pub struct MapSchemaAsync {
    key: AnySchema,
    value: AnySchema,
    pipe: AsyncPipe,
}

impl MapSchemaAsync {
    #[must_use]
    pub fn new(key: AnySchema, value: AnySchema, pipe: AsyncPipe) -> Self {
        Self { key, value, pipe }
    }
}

#[async_trait]
impl super::AsyncSchema for MapSchemaAsync {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Map
    }

    fn children(&self) -> Children<'_> {
        Children::Pair(&self.key, &self.value)
    }

    async fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        let Value::Map(entries) = input else {
            return Err(type_gate_issue(input, info));
        };
        let mut futures = Vec::with_capacity(entries.len() * 2);
        for (idx, (raw_key, raw_value)) in entries.iter().enumerate() {
            let key_schema = self.key.clone();
            let key_item = PathItem::new(
                PathItemKind::MapKey,
                input.clone(),
                PathKey::Index(idx),
                raw_key.clone(),
            );
            let key_info = info.descend(key_item).with_origin(crate::issue::Origin::Key);
            let key_input = raw_key.clone();
            futures.push(Box::pin(async move {
                (idx * 2, key_schema.parse_async(&key_input, &key_info).await)
            }) as super::IndexedChildFuture);

            let value_schema = self.value.clone();
            let value_item = PathItem::new(
                PathItemKind::MapValue,
                input.clone(),
                PathKey::Index(idx),
                raw_value.clone(),
            );
            let value_info = info.descend(value_item).with_origin(crate::issue::Origin::Value);
            let value_input = raw_value.clone();
            futures.push(Box::pin(async move {
                (
                    idx * 2 + 1,
                    value_schema.parse_async(&value_input, &value_info).await,
                )
            }) as super::IndexedChildFuture);
        }

        let mut slots: Vec<Option<ParseOutcome<Value>>> =
            super::join_children(futures).await.into_iter().map(Some).collect();

        let mut output = Vec::with_capacity(entries.len());
        let mut collected: Vec<Issue> = Vec::new();
        for idx in 0..entries.len() {
            let key_res = slots[idx * 2].take().expect("key slot was scheduled");
            let value_res = slots[idx * 2 + 1].take().expect("value slot was scheduled");
            match (key_res, value_res) {
                (Ok(key), Ok(value)) => output.push((key, value)),
                (key_res, value_res) => {
                    let mut issues = Vec::new();
                    if let Err(i) = key_res {
                        issues.extend(i.into_vec());
                    }
                    if let Err(i) = value_res {
                        issues.extend(i.into_vec());
                    }
                    if info.abort_early {
                        return Err(Issues::from_vec(issues).expect("at least one side failed"));
                    }
                    collected.extend(issues);
                }
            }
        }
        if let Some(issues) = Issues::from_vec(collected) {
            return Err(issues);
        }
        let assembled = Value::Map(output);
        let validate_info = info.validate_info(Reason::Map, None);
        run_pipe_async(&self.pipe, assembled, &validate_info).await
    }
}

impl From<MapSchema> for AnySchema {
    fn from(schema: MapSchema) -> Self {
        AnySchema::Sync(std::sync::Arc::new(schema))
    }
}

impl From<MapSchemaAsync> for AnySchema {
    fn from(schema: MapSchemaAsync) -> Self {
        super::any_async(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf;

    #[test]
    fn parses_keys_and_values_independently() {
        let schema = MapSchema::new(leaf::string().into(), leaf::number().into(), Pipe::new()).unwrap();
        let input = Value::Map(vec![(Value::from("a"), Value::Number(1.0))]);
        assert!(schema.parse(&input, &ParseInfo::new()).is_ok());
    }

    #[test]
    fn collects_issues_from_both_key_and_value() {
        let schema = MapSchema::new(leaf::string().into(), leaf::number().into(), Pipe::new()).unwrap();
        let input = Value::Map(vec![(Value::Number(1.0), Value::from("nope"))]);
        let err = schema.parse(&input, &ParseInfo::new()).unwrap_err();
        assert_eq!(err.len(), 2);
        let origins: Vec<_> = err.as_slice().iter().map(|i| i.origin).collect();
        assert!(origins.contains(&Some(crate::issue::Origin::Key)));
        assert!(origins.contains(&Some(crate::issue::Origin::Value)));
    }

    #[test]
    fn type_gate_rejects_non_maps() {
        let schema = MapSchema::new(leaf::string().into(), leaf::number().into(), Pipe::new()).unwrap();
        assert!(schema.parse(&Value::Null, &ParseInfo::new()).is_err());
    }
}
