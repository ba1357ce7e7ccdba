//! The `record` composite: an open string-keyed container validated against
//! a single key schema and a single value schema, rather than object's
//! fixed, known key set.
//!
//! Grounded in the teacher crate's `keywords::additional_properties` /
//! `pattern_properties` handling for open-shaped objects, generalized here
//! so the key itself also runs through a schema (not just a regex) — this
//! lets a record reject keys as well as values.

use super::{AnySchema, Children, Schema, SchemaKind};
use crate::error::ConstructionError;
use crate::info::ParseInfo;
use crate::issue::{Issue, Issues, Origin, Reason};
use crate::path::{PathItem, PathItemKind, PathKey};
use crate::pipe::{run_pipe, run_pipe_async, AsyncPipe, Pipe};
use crate::result::ParseOutcome;
use crate::value::Value;
use async_trait::async_trait;
use indexmap::IndexMap;

/// Keys that would shadow inherited prototype members on the host dynamic
/// object model. Silently skipped during iteration — never parsed, never
/// reported as an issue, never present on the output — so a record can
/// never be used to smuggle one of these onto its output.
const DENYLISTED_KEYS: [&str; 3] = ["__proto__", "prototype", "constructor"];

fn type_gate_issue(input: &Value, info: &ParseInfo) -> Issues {
    Issues::one(Issue::new(
        Reason::Record,
        "record",
        format!("Invalid type: expected record, received {}", input.type_name()),
        input.clone(),
        &info.validate_info(Reason::Record, None),
    ))
}

#[derive(Debug, Clone)]
pub struct RecordSchema {
    key: AnySchema,
    value: AnySchema,
    pipe: Pipe,
}

impl RecordSchema {
    pub fn new(key: AnySchema, value: AnySchema, pipe: Pipe) -> Result<Self, ConstructionError> {
        if key.is_async() {
            return Err(ConstructionError::MixedAsyncChild {
                parent: "record",
                child: "key".to_string(),
            });
        }
        if value.is_async() {
            return Err(ConstructionError::MixedAsyncChild {
                parent: "record",
                child: "value".to_string(),
            });
        }
        Ok(Self { key, value, pipe })
    }
}

impl Schema for RecordSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Record
    }

    fn children(&self) -> Children<'_> {
        Children::Pair(&self.key, &self.value)
    }

    fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        let Value::Object(map) = input else {
            return Err(type_gate_issue(input, info));
        };
        let mut output = IndexMap::with_capacity(map.len());
        let mut collected: Vec<Issue> = Vec::new();
        for (raw_key, raw_value) in map {
            if DENYLISTED_KEYS.contains(&raw_key.as_str()) {
                continue;
            }
            let key_item = PathItem::new(
                PathItemKind::RecordKey,
                input.clone(),
                PathKey::Name(raw_key.clone()),
                Value::from(raw_key.as_str()),
            );
            let key_info = info.descend(key_item).with_origin(Origin::Key);
            let key_result = self
                .key
                .parse_sync(&Value::from(raw_key.as_str()), &key_info)
                .expect("RecordSchema key is always sync");

            let value_item = PathItem::new(
                PathItemKind::RecordValue,
                input.clone(),
                PathKey::Name(raw_key.clone()),
                raw_value.clone(),
            );
            let value_info = info.descend(value_item).with_origin(Origin::Value);
            let value_result = self
                .value
                .parse_sync(raw_value, &value_info)
                .expect("RecordSchema value is always sync");

            match (key_result, value_result) {
                (Ok(_), Ok(parsed)) => {
                    output.insert(raw_key.clone(), parsed);
                }
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
        let assembled = Value::Object(output);
        let validate_info = info.validate_info(Reason::Record, None);
        run_pipe(&self.pipe, assembled, &validate_info)
    }
}

#[derive(Debug, Clone)]
pub struct RecordSchemaAsync {
    key: AnySchema,
    value: AnySchema,
    pipe: AsyncPipe,
}

impl RecordSchemaAsync {
    #[must_use]
    pub fn new(key: AnySchema, value: AnySchema) -> Self {
        Self {
            key,
            value,
            pipe: AsyncPipe::new(),
        }
    }

    #[must_use]
    pub fn with_pipe(key: AnySchema, value: AnySchema, pipe: AsyncPipe) -> Self {
        Self { key, value, pipe }
    }
}

#[async_trait]
impl super::AsyncSchema for RecordSchemaAsync {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Record
    }

    fn children(&self) -> Children<'_> {
        Children::Pair(&self.key, &self.value)
    }

    async fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        let Value::Object(map) = input else {
            return Err(type_gate_issue(input, info));
        };
        let entries: Vec<(&String, &Value)> = map
            .iter()
            .filter(|(key, _)| !DENYLISTED_KEYS.contains(&key.as_str()))
            .collect();
        type EntryFuture = std::pin::Pin<
            Box<dyn std::future::Future<Output = (usize, ParseOutcome<Value>, ParseOutcome<Value>)> + Send>,
        >;
        let mut futures: Vec<EntryFuture> = Vec::with_capacity(entries.len());
        for (idx, (raw_key, raw_value)) in entries.iter().enumerate() {
            let key_schema = self.key.clone();
            let value_schema = self.value.clone();
            let key_item = PathItem::new(
                PathItemKind::RecordKey,
                input.clone(),
                PathKey::Name((*raw_key).clone()),
                Value::from(raw_key.as_str()),
            );
            let key_info = info.descend(key_item).with_origin(Origin::Key);
            let value_item = PathItem::new(
                PathItemKind::RecordValue,
                input.clone(),
                PathKey::Name((*raw_key).clone()),
                (*raw_value).clone(),
            );
            let value_info = info.descend(value_item).with_origin(Origin::Value);
            let key_input = Value::from(raw_key.as_str());
            let value_input = (*raw_value).clone();
            futures.push(Box::pin(async move {
                let key_result = key_schema.parse_async(&key_input, &key_info).await;
                let value_result = value_schema.parse_async(&value_input, &value_info).await;
                (idx, key_result, value_result)
            }) as EntryFuture);
        }

        let mut slots: Vec<Option<(ParseOutcome<Value>, ParseOutcome<Value>)>> =
            std::iter::repeat_with(|| None).take(entries.len()).collect();
        for (idx, key_result, value_result) in futures::future::join_all(futures).await {
            slots[idx] = Some((key_result, value_result));
        }

        let mut output = IndexMap::with_capacity(entries.len());
        let mut collected: Vec<Issue> = Vec::new();
        for (idx, (raw_key, _)) in entries.into_iter().enumerate() {
            let (key_res, value_res) = slots[idx].take().expect("every entry was scheduled");
            match (key_res, value_res) {
                (Ok(_), Ok(parsed)) => {
                    output.insert(raw_key.clone(), parsed);
                }
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
        let assembled = Value::Object(output);
        let validate_info = info.validate_info(Reason::Record, None);
        run_pipe_async(&self.pipe, assembled, &validate_info).await
    }
}

impl From<RecordSchema> for AnySchema {
    fn from(schema: RecordSchema) -> Self {
        AnySchema::Sync(std::sync::Arc::new(schema))
    }
}

impl From<RecordSchemaAsync> for AnySchema {
    fn from(schema: RecordSchemaAsync) -> Self {
        super::any_async(schema)
    }
}
