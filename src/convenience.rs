//! One-shot convenience wrappers around [`crate::schema::AnySchema`] for
//! callers who don't want to build a [`crate::info::ParseInfo`] by hand.
//! Everything here is a thin adapter over the schema protocol; it holds no
//! validation logic of its own.

use crate::info::ParseInfo;
use crate::issue::Issues;
use crate::result::ParseOutcome;
use crate::schema::AnySchema;
use crate::value::Value;
use std::fmt;

/// The error a fallible [`parse`]/[`parse_async`] call returns. Carries the
/// full [`Issues`] sequence; [`fmt::Display`] summarizes just the first
/// issue plus a count, since most callers only want a one-line message.
#[derive(Debug, Clone)]
pub struct ParseError {
    issues: Issues,
}

impl ParseError {
    #[must_use]
    pub fn issues(&self) -> &Issues {
        &self.issues
    }

    #[must_use]
    pub fn into_issues(self) -> Issues {
        self.issues
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.issues.first();
        if self.issues.len() == 1 {
            write!(f, "{first}")
        } else {
            write!(f, "{first} (and {} more issue(s))", self.issues.len() - 1)
        }
    }
}

impl std::error::Error for ParseError {}

impl From<Issues> for ParseError {
    fn from(issues: Issues) -> Self {
        Self { issues }
    }
}

/// Parses `input` against `schema`, returning `Err` with a one-line
/// [`ParseError`] on the first validation failure rather than the full
/// [`Issues`] sequence. Panics if `schema` is asynchronous; use
/// [`parse_async`] for those.
#[tracing::instrument(level = "debug", skip_all, fields(kind = %schema.kind()))]
pub fn parse(schema: &AnySchema, input: &Value) -> Result<Value, ParseError> {
    safe_parse(schema, input, ParseInfo::new()).map_err(ParseError::from)
}

/// The non-panicking, fully-configurable counterpart to [`parse`]: runs a
/// synchronous schema with caller-supplied [`ParseInfo`], returning the raw
/// [`ParseOutcome`] instead of collapsing it into a [`ParseError`].
pub fn safe_parse(schema: &AnySchema, input: &Value, info: ParseInfo) -> ParseOutcome<Value> {
    schema
        .parse_sync(input, &info)
        .expect("safe_parse requires a synchronous schema; use safe_parse_async for async ones")
}

/// The `async` counterpart to [`parse`].
pub async fn parse_async(schema: &AnySchema, input: &Value) -> Result<Value, ParseError> {
    safe_parse_async(schema, input, ParseInfo::new())
        .await
        .map_err(ParseError::from)
}

/// The non-panicking, fully-configurable counterpart to [`parse_async`].
pub async fn safe_parse_async(
    schema: &AnySchema,
    input: &Value,
    info: ParseInfo,
) -> ParseOutcome<Value> {
    schema.parse_async(input, &info).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf;

    #[test]
    fn parse_succeeds_on_matching_input() {
        let schema: AnySchema = leaf::string().into();
        assert_eq!(parse(&schema, &Value::from("x")).unwrap(), Value::from("x"));
    }

    #[test]
    fn parse_error_display_summarizes_the_first_issue() {
        let schema: AnySchema = leaf::string().into();
        let err = parse(&schema, &Value::Number(1.0)).unwrap_err();
        assert!(err.to_string().contains("string"));
    }

    #[tokio::test]
    async fn parse_async_works_with_a_sync_schema() {
        let schema: AnySchema = leaf::number().into();
        assert!(parse_async(&schema, &Value::Number(1.0)).await.is_ok());
    }
}
