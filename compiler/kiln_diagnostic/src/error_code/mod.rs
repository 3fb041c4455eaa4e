//! Error codes for backend diagnostics.
//!
//! All lowering problems live in the E5xxx (codegen) range.

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Statement kind has no lowering
    E5001,
    /// Callee returns a value but the call has no result terminal
    E5002,
    /// Callee declares more than one return value
    E5003,
    /// Jump without a resolvable target
    E5004,
    /// Statement kind cannot be rendered as an expression
    E5005,
    /// Value has no literal form in generated source
    E5006,
    /// Compile error marker reached the backend
    E5007,
    /// Field is not accessible from generated code
    E5008,
}

impl ErrorCode {
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E5001,
        ErrorCode::E5002,
        ErrorCode::E5003,
        ErrorCode::E5004,
        ErrorCode::E5005,
        ErrorCode::E5006,
        ErrorCode::E5007,
        ErrorCode::E5008,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
            ErrorCode::E5003 => "E5003",
            ErrorCode::E5004 => "E5004",
            ErrorCode::E5005 => "E5005",
            ErrorCode::E5006 => "E5006",
            ErrorCode::E5007 => "E5007",
            ErrorCode::E5008 => "E5008",
        }
    }

    /// Parse a code like `"E5004"`. Case-insensitive.
    pub fn parse(code: &str) -> Option<ErrorCode> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
