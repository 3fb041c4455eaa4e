//! Lowering problem taxonomy.

use crate::{ErrorCode, Severity};

/// A problem found while lowering a unit.
///
/// Every variant has a local recovery: the emitter writes a placeholder
/// (comment, default value or empty text) and continues.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Problem {
    #[error("statement kind `{kind}` is not supported here")]
    UnsupportedStatementKind { kind: &'static str },

    #[error("call to `{function}` has no result terminal for its return value")]
    MissingReturnProperty { function: String },

    #[error("function `{function}` declares more than one return value")]
    DuplicateReturnProperty { function: String },

    #[error("`{kind}` statement has no resolvable jump target")]
    UnresolvedJumpTarget { kind: &'static str },

    #[error("statement kind `{kind}` cannot be rendered as an expression")]
    UnsupportedInlineStatement { kind: &'static str },

    #[error("value of type `{ty}` has no literal form")]
    UnrenderableLiteral { ty: String },

    #[error("compile error: {message}")]
    CompileErrorMarker { message: String },

    #[error("field `{field}` is not accessible from generated code")]
    InaccessibleField { field: String },
}

impl Problem {
    pub fn code(&self) -> ErrorCode {
        match self {
            Problem::UnsupportedStatementKind { .. } => ErrorCode::E5001,
            Problem::MissingReturnProperty { .. } => ErrorCode::E5002,
            Problem::DuplicateReturnProperty { .. } => ErrorCode::E5003,
            Problem::UnresolvedJumpTarget { .. } => ErrorCode::E5004,
            Problem::UnsupportedInlineStatement { .. } => ErrorCode::E5005,
            Problem::UnrenderableLiteral { .. } => ErrorCode::E5006,
            Problem::CompileErrorMarker { .. } => ErrorCode::E5007,
            Problem::InaccessibleField { .. } => ErrorCode::E5008,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Problem::CompileErrorMarker { .. } => Severity::Fatal,
            Problem::UnrenderableLiteral { .. } => Severity::Warning,
            Problem::UnsupportedStatementKind { .. }
            | Problem::MissingReturnProperty { .. }
            | Problem::DuplicateReturnProperty { .. }
            | Problem::UnresolvedJumpTarget { .. }
            | Problem::UnsupportedInlineStatement { .. }
            | Problem::InaccessibleField { .. } => Severity::Error,
        }
    }
}
