//! Diagnostics for the lowering backend.
//!
//! Lowering never aborts on a bad statement. Each problem is reported to a
//! [`DiagnosticSink`], a placeholder is emitted in its place, and the
//! emitter moves on. The driver decides afterwards whether the unit is usable.
//!
//! - [`Problem`]: what went wrong (`thiserror`-derived messages)
//! - [`ErrorCode`]: stable identifier per problem kind
//! - [`Severity`]: how bad it is
//! - [`Origin`]: where (unit, function, statement)

mod diagnostic;
mod error_code;
mod problem;
mod sink;

pub use diagnostic::{Diagnostic, Origin, Severity};
pub use error_code::ErrorCode;
pub use problem::Problem;
pub use sink::DiagnosticSink;
