//! Diagnostic collection.
//!
//! The sink tracks the current origin (unit, function, statement) so call
//! sites only name the problem. Every report is mirrored to `tracing` at the
//! matching level.

use crate::{Diagnostic, Origin, Problem, Severity};

#[derive(Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    origin: Origin,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a unit; clears function and statement.
    pub fn set_unit(&mut self, unit: impl Into<String>) {
        self.origin = Origin {
            unit: Some(unit.into()),
            function: None,
            statement: None,
        };
    }

    /// Enter a function of the current unit; clears the statement.
    pub fn set_function(&mut self, function: Option<String>) {
        self.origin.function = function;
        self.origin.statement = None;
    }

    pub fn set_statement(&mut self, statement: Option<u32>) {
        self.origin.statement = statement;
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn report(&mut self, problem: Problem) {
        let diagnostic = Diagnostic::new(problem, self.origin.clone());
        let origin = &diagnostic.origin;
        let code = diagnostic.code;
        match diagnostic.severity {
            Severity::Info => tracing::info!(%code, %origin, "{}", diagnostic.problem),
            Severity::Warning => tracing::warn!(%code, %origin, "{}", diagnostic.problem),
            Severity::Error | Severity::Fatal => {
                tracing::error!(%code, %origin, severity = %diagnostic.severity, "{}", diagnostic.problem);
            }
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Errors and fatals.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn has_fatal(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Fatal)
    }

    /// Drain collected diagnostics, keeping the current origin.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
