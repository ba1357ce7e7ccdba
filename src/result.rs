//! The `Result<T>` half of the protocol: two factory helpers, never an
//! exception, across the entire core.

use crate::issue::Issues;

/// The outcome of any schema parse, pipe action, or leaf validator.
pub type ParseOutcome<T> = Result<T, Issues>;

/// Build a successful outcome.
#[must_use]
pub fn ok<T>(value: T) -> ParseOutcome<T> {
    Ok(value)
}

/// Build a failed outcome from a non-empty issue sequence.
#[must_use]
pub fn err<T>(issues: Issues) -> ParseOutcome<T> {
    Err(issues)
}
