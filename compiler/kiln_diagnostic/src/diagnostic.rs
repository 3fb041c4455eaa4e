use std::fmt;

use crate::{ErrorCode, Problem};

/// Severity level of a diagnostic, least severe first.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Severity {
    Info,
    Warning,
    Error,
    /// The generated unit must not be used.
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

/// Where a diagnostic was raised.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Origin {
    pub unit: Option<String>,
    pub function: Option<String>,
    /// Statement index within the function.
    pub statement: Option<u32>,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.unit, &self.function) {
            (Some(unit), Some(function)) => write!(f, "{unit}::{function}")?,
            (Some(unit), None) => write!(f, "{unit}")?,
            (None, Some(function)) => write!(f, "{function}")?,
            (None, None) => write!(f, "<package>")?,
        }
        if let Some(statement) = self.statement {
            write!(f, "#{statement}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    pub problem: Problem,
    pub origin: Origin,
}

impl Diagnostic {
    pub fn new(problem: Problem, origin: Origin) -> Self {
        Self {
            severity: problem.severity(),
            code: problem.code(),
            problem,
            origin,
        }
    }

    pub fn message(&self) -> String {
        self.problem.to_string()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity >= Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} ({})",
            self.severity, self.code, self.problem, self.origin
        )
    }
}
