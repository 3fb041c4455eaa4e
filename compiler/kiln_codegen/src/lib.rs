//! Kiln codegen: visual-script IR to C++ source.
//!
//! Lowers the statement IR of one unit (a generated class, struct, enum or
//! interface) into a declaration blob and an implementation blob.
//!
//! # Architecture
//!
//! ```text
//! UnitIr + Reflection + ObjectArena
//!        ↓
//!   FunctionLowerer     (statements → C++, one per function)
//!     ├─ term / guard   (expressions, null-safety guards)
//!     └─ state_machine  (jump targets → switch-in-a-loop)
//!        ↓
//!   DefaultValueEmitter (class defaults and sub-objects → constructor)
//!        ↓
//!   deps + decl + unit  (includes, decorations, final text)
//!        ↓
//!    UnitOutput         (declaration, implementation, dependencies)
//! ```
//!
//! Problems never stop emission. They are reported to the caller's
//! [`DiagnosticSink`](kiln_diagnostic::DiagnosticSink) and a placeholder is
//! written in their place.

mod config;
pub mod cpp_types;
pub mod decl;
pub mod defaults;
pub mod deps;
pub mod function;
mod guard;
pub mod literal;
pub mod state_machine;
mod stack;
mod stmt;
mod term;
pub mod unit;
mod writer;

#[cfg(test)]
mod test_helpers;

pub use config::EmitterConfig;
pub use deps::{Dependencies, Dependency};
pub use function::{lower_function, LoweredFunction};
pub use state_machine::StateMap;
pub use unit::{emit_unit, UnitOutput};
pub use writer::CodeWriter;

use kiln_ir::{Name, ObjectArena, Reflection, TypeId};

/// Read-only inputs shared by every emitter working on one unit.
#[derive(Copy, Clone)]
pub struct UnitContext<'a> {
    pub reflect: &'a dyn Reflection,
    pub objects: &'a ObjectArena,
    pub config: &'a EmitterConfig,
    /// The type being generated.
    pub unit: TypeId,
}

impl<'a> UnitContext<'a> {
    pub fn new(
        reflect: &'a dyn Reflection,
        objects: &'a ObjectArena,
        config: &'a EmitterConfig,
        unit: TypeId,
    ) -> Self {
        Self {
            reflect,
            objects,
            config,
            unit,
        }
    }

    #[inline]
    pub fn resolve(&self, name: Name) -> &'a str {
        self.reflect.resolve(name)
    }

    pub fn literals(&self) -> literal::LiteralRenderer<'a> {
        literal::LiteralRenderer::new(self.reflect, self.objects)
    }

    /// C++ name of the unit's own type.
    pub fn unit_cpp_name(&self) -> String {
        self.reflect.cpp_name(self.unit)
    }
}
