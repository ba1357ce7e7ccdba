//! Minimal leaf schemas used to exercise the composite machinery and the
//! pipe engine. A full primitive-type library (string formats, number
//! bounds, date parsing, and so on) is a separate concern built on top of
//! this protocol, not part of it — these four constructors exist only so
//! the composites and their tests have something to hold.

use crate::info::ParseInfo;
use crate::issue::{Issue, Issues, Reason};
use crate::pipe::{run_pipe, Action, Pipe};
use crate::result::ParseOutcome;
use crate::schema::{Children, Schema, SchemaKind};
use crate::value::Value;

macro_rules! leaf_schema {
    ($struct_name:ident, $kind:ident, $reason:ident, $matches:expr) => {
        #[derive(Debug, Clone, Default)]
        pub struct $struct_name {
            pipe: Pipe,
        }

        impl $struct_name {
            #[must_use]
            pub fn new() -> Self {
                Self { pipe: Pipe::new() }
            }

            #[must_use]
            pub fn with_pipe(pipe: Pipe) -> Self {
                Self { pipe }
            }
        }

        impl Schema for $struct_name {
            fn kind(&self) -> SchemaKind {
                SchemaKind::$kind
            }

            fn children(&self) -> Children<'_> {
                Children::None
            }

            fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
                let matches: fn(&Value) -> bool = $matches;
                let validate_info = info.validate_info(Reason::$reason, None);
                if !matches(input) {
                    let tag = SchemaKind::$kind.to_string();
                    return Err(Issues::one(Issue::new(
                        Reason::$reason,
                        tag.clone(),
                        format!("Invalid type: expected {tag}, received {}", input.type_name()),
                        input.clone(),
                        &validate_info,
                    )));
                }
                run_pipe(&self.pipe, input.clone(), &validate_info)
            }
        }
    };
}

leaf_schema!(StringSchema, String, String, |v| matches!(v, Value::String(_)));
leaf_schema!(NumberSchema, Number, Number, |v| matches!(v, Value::Number(_)));
leaf_schema!(BooleanSchema, Boolean, Boolean, |v| matches!(v, Value::Bool(_)));

/// A schema that accepts exactly one literal value.
#[derive(Debug, Clone)]
pub struct LiteralSchema {
    expected: Value,
}

impl LiteralSchema {
    #[must_use]
    pub fn new(expected: Value) -> Self {
        Self { expected }
    }
}

impl Schema for LiteralSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Literal
    }

    fn parse(&self, input: &Value, info: &ParseInfo) -> ParseOutcome<Value> {
        if input == &self.expected {
            return Ok(input.clone());
        }
        let validate_info = info.validate_info(Reason::Type, None);
        Err(Issues::one(Issue::new(
            Reason::Type,
            "literal",
            format!("Invalid value: expected {}, received {}", self.expected, input),
            input.clone(),
            &validate_info,
        )))
    }
}

#[must_use]
pub fn string() -> StringSchema {
    StringSchema::new()
}

#[must_use]
pub fn string_with_pipe(actions: Vec<Box<dyn Action>>) -> StringSchema {
    StringSchema::with_pipe(actions)
}

#[must_use]
pub fn number() -> NumberSchema {
    NumberSchema::new()
}

#[must_use]
pub fn number_with_pipe(actions: Vec<Box<dyn Action>>) -> NumberSchema {
    NumberSchema::with_pipe(actions)
}

#[must_use]
pub fn boolean() -> BooleanSchema {
    BooleanSchema::new()
}

#[must_use]
pub fn literal(value: impl Into<Value>) -> LiteralSchema {
    LiteralSchema::new(value.into())
}
