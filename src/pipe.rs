//! The pipe engine: an ordered sequence of post-type-check actions,
//! each of which may transform, validate, or reject a value.
//!
//! The sync/async split mirrors the teacher pack's `grill::keyword::Keyword`
//! enum: one trait per discipline, a shared engine loop, actions composed in
//! declaration order. Unlike a JSON Schema keyword, an `Action` cannot fail
//! to apply based on the instance's type — by the time the pipe runs, the
//! owning schema's type gate has already passed.

use crate::info::ValidateInfo;
use crate::issue::Issues;
use crate::result::ParseOutcome;
use crate::value::Value;
use async_trait::async_trait;
use std::fmt;

/// One synchronous pipe step.
pub trait Action: Send + Sync + fmt::Debug {
    /// Short machine-readable name, used in the absence of a richer tag on
    /// issues this action raises (e.g. `"min_length"`).
    fn name(&self) -> &'static str;
    fn run(&self, value: &Value, info: &ValidateInfo) -> ParseOutcome<Value>;
}

pub type BoxedAction = Box<dyn Action>;

/// An ordered list of synchronous actions.
pub type Pipe = Vec<BoxedAction>;

/// One asynchronous pipe step.
#[async_trait]
pub trait AsyncAction: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;
    async fn run(&self, value: &Value, info: &ValidateInfo) -> ParseOutcome<Value>;
}

pub type BoxedAsyncAction = Box<dyn AsyncAction>;

/// An ordered list of asynchronous actions. Actions still run strictly in
/// sequence — concurrency belongs to composite schemas joining children,
/// never to a single pipe; transforms must compose in declaration order.
pub type AsyncPipe = Vec<BoxedAsyncAction>;

/// Run a synchronous pipe to completion:
///
/// 1. An empty pipe returns the value unchanged.
/// 2. Each action sees the previous action's successful output.
/// 3. A failing action either aborts the whole pipe immediately
///    (`abort_early` or `abort_pipe_early`) or is recorded and the pipe
///    continues with the last successful value.
/// 4. Accumulated issues, if any, are returned; otherwise the final value.
pub fn run_pipe(pipe: &Pipe, value: Value, info: &ValidateInfo) -> ParseOutcome<Value> {
    if pipe.is_empty() {
        return Ok(value);
    }
    let mut output = value;
    let mut collected: Vec<crate::issue::Issue> = Vec::new();
    for action in pipe {
        match action.run(&output, info) {
            Ok(next) => output = next,
            Err(issues) => {
                tracing::trace!(action = action.name(), issue_count = issues.len(), "pipe action failed");
                if info.abort_early || info.abort_pipe_early {
                    return Err(issues);
                }
                collected.extend(issues.into_vec());
            }
        }
    }
    match Issues::from_vec(collected) {
        Some(issues) => Err(issues),
        None => Ok(output),
    }
}

/// The async analogue of [`run_pipe`]. Actions are awaited sequentially, not
/// in parallel, so that a transforming action's output reaches the next
/// action and declaration order remains observable.
pub async fn run_pipe_async(
    pipe: &AsyncPipe,
    value: Value,
    info: &ValidateInfo,
) -> ParseOutcome<Value> {
    if pipe.is_empty() {
        return Ok(value);
    }
    let mut output = value;
    let mut collected: Vec<crate::issue::Issue> = Vec::new();
    for action in pipe {
        match action.run(&output, info).await {
            Ok(next) => output = next,
            Err(issues) => {
                tracing::trace!(action = action.name(), issue_count = issues.len(), "pipe action failed");
                if info.abort_early || info.abort_pipe_early {
                    return Err(issues);
                }
                collected.extend(issues.into_vec());
            }
        }
    }
    match Issues::from_vec(collected) {
        Some(issues) => Err(issues),
        None => Ok(output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{Issue, Reason};
    use crate::path::Path;

    fn info() -> ValidateInfo {
        ValidateInfo {
            reason: Reason::String,
            path: Path::new(),
            abort_early: false,
            abort_pipe_early: false,
            origin: None,
        }
    }

    #[derive(Debug)]
    struct AlwaysFails(&'static str);
    impl Action for AlwaysFails {
        fn name(&self) -> &'static str {
            self.0
        }
        fn run(&self, value: &Value, info: &ValidateInfo) -> ParseOutcome<Value> {
            Err(Issues::one(Issue::new(
                Reason::String,
                self.0,
                "always fails",
                value.clone(),
                info,
            )))
        }
    }

    #[derive(Debug)]
    struct Uppercase;
    impl Action for Uppercase {
        fn name(&self) -> &'static str {
            "uppercase"
        }
        fn run(&self, value: &Value, _info: &ValidateInfo) -> ParseOutcome<Value> {
            match value.as_str() {
                Some(s) => Ok(Value::from(s.to_uppercase())),
                None => Ok(value.clone()),
            }
        }
    }

    #[derive(Debug)]
    struct RejectIfUppercase;
    impl Action for RejectIfUppercase {
        fn name(&self) -> &'static str {
            "reject_if_uppercase"
        }
        fn run(&self, value: &Value, info: &ValidateInfo) -> ParseOutcome<Value> {
            match value.as_str() {
                Some(s) if s == s.to_uppercase() && s != s.to_lowercase() => {
                    Err(Issues::one(Issue::new(
                        Reason::String,
                        "reject_if_uppercase",
                        "already uppercase",
                        value.clone(),
                        info,
                    )))
                }
                _ => Ok(value.clone()),
            }
        }
    }

    #[test]
    fn empty_pipe_returns_the_value_unchanged() {
        let pipe: Pipe = Vec::new();
        assert_eq!(run_pipe(&pipe, Value::from("x"), &info()), Ok(Value::from("x")));
    }

    #[test]
    fn actions_run_in_declaration_order_transform_then_validate() {
        // Uppercase first, then reject-if-uppercase: the reject must see the
        // transformed value and fail.
        let pipe: Pipe = vec![Box::new(Uppercase), Box::new(RejectIfUppercase)];
        assert!(run_pipe(&pipe, Value::from("hi"), &info()).is_err());
    }

    #[test]
    fn actions_run_in_declaration_order_validate_then_transform() {
        // Reject-if-uppercase first sees the original lowercase value and
        // passes; uppercase runs after and never gets rejected.
        let pipe: Pipe = vec![Box::new(RejectIfUppercase), Box::new(Uppercase)];
        assert_eq!(
            run_pipe(&pipe, Value::from("hi"), &info()),
            Ok(Value::from("HI"))
        );
    }

    #[test]
    fn a_failing_transform_does_not_commit_its_output() {
        // AlwaysFails never produces a value; the next action must still see
        // the last successful output, not whatever AlwaysFails would have
        // produced.
        let pipe: Pipe = vec![
            Box::new(Uppercase),
            Box::new(AlwaysFails("boom")),
            Box::new(RejectIfUppercase),
        ];
        let err = run_pipe(&pipe, Value::from("hi"), &info()).unwrap_err();
        // RejectIfUppercase also fails (sees "HI" from Uppercase), so both
        // issues are collected under non-abort-pipe-early.
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn abort_pipe_early_stops_at_the_first_failing_action() {
        let mut early_info = info();
        early_info.abort_pipe_early = true;
        let pipe: Pipe = vec![
            Box::new(AlwaysFails("first")),
            Box::new(AlwaysFails("second")),
        ];
        let err = run_pipe(&pipe, Value::from("hi"), &early_info).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.first().validation, "first");
    }

    #[test]
    fn without_abort_pipe_early_every_action_runs_and_issues_accumulate() {
        let pipe: Pipe = vec![
            Box::new(AlwaysFails("first")),
            Box::new(AlwaysFails("second")),
        ];
        let err = run_pipe(&pipe, Value::from("hi"), &info()).unwrap_err();
        assert_eq!(err.len(), 2);
    }
}
