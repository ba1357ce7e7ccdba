//! A handful of demonstration pipe actions used to exercise the engine and
//! the composite schemas in tests. A full validator library (string
//! formats, regex, numeric ranges with exclusive bounds, and so on) is a
//! separate concern built on top of the pipe, not part of it.

use crate::info::ValidateInfo;
use crate::issue::{Issue, Issues, Reason};
use crate::pipe::Action;
use crate::result::ParseOutcome;
use crate::value::Value;

#[derive(Debug)]
pub struct MinLength(pub usize);

impl Action for MinLength {
    fn name(&self) -> &'static str {
        "min_length"
    }

    fn run(&self, value: &Value, info: &ValidateInfo) -> ParseOutcome<Value> {
        match value.as_str() {
            Some(s) if s.chars().count() < self.0 => Err(Issues::one(Issue::new(
                Reason::String,
                "min_length",
                format!("Invalid length: expected a string of at least {} characters", self.0),
                value.clone(),
                info,
            ))),
            _ => Ok(value.clone()),
        }
    }
}

#[derive(Debug)]
pub struct MaxLength(pub usize);

impl Action for MaxLength {
    fn name(&self) -> &'static str {
        "max_length"
    }

    fn run(&self, value: &Value, info: &ValidateInfo) -> ParseOutcome<Value> {
        match value.as_str() {
            Some(s) if s.chars().count() > self.0 => Err(Issues::one(Issue::new(
                Reason::String,
                "max_length",
                format!("Invalid length: expected a string of at most {} characters", self.0),
                value.clone(),
                info,
            ))),
            _ => Ok(value.clone()),
        }
    }
}

#[derive(Debug)]
pub struct MinValue(pub f64);

impl Action for MinValue {
    fn name(&self) -> &'static str {
        "min_value"
    }

    fn run(&self, value: &Value, info: &ValidateInfo) -> ParseOutcome<Value> {
        match value.as_f64() {
            Some(n) if n < self.0 => Err(Issues::one(Issue::new(
                Reason::Number,
                "min_value",
                format!("Invalid value: expected at least {}", self.0),
                value.clone(),
                info,
            ))),
            _ => Ok(value.clone()),
        }
    }
}

#[derive(Debug)]
pub struct MaxValue(pub f64);

impl Action for MaxValue {
    fn name(&self) -> &'static str {
        "max_value"
    }

    fn run(&self, value: &Value, info: &ValidateInfo) -> ParseOutcome<Value> {
        match value.as_f64() {
            Some(n) if n > self.0 => Err(Issues::one(Issue::new(
                Reason::Number,
                "max_value",
                format!("Invalid value: expected at most {}", self.0),
                value.clone(),
                info,
            ))),
            _ => Ok(value.clone()),
        }
    }
}
