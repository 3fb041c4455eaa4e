//! Package-level failures.
//!
//! Problems inside a unit are diagnostics, not errors; these only cover
//! preconditions of the whole run.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("unknown unit `{name}`")]
    UnknownUnit { name: String },

    #[error("error limit reached: {errors} errors (limit {limit})")]
    ErrorLimitReached { limit: usize, errors: usize },

    #[error("unit `{unit}` has a fatal error: {message}")]
    Fatal { unit: String, message: String },
}
