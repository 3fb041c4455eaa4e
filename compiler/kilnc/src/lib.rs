//! Kiln driver: compiles a package of units to C++ sources.
//!
//! Each unit gets its own [`DiagnosticSink`]; a bad unit never stops the
//! others, and a unit with a fatal diagnostic is still returned with its
//! output. The run only fails as a whole for package-level reasons or when
//! [`CompileOptions::fail_on_fatal`] is opted into (see [`CompileError`]).

mod error;
mod logging;
mod options;

pub use error::CompileError;
pub use logging::init_tracing;
pub use options::CompileOptions;

use kiln_codegen::{emit_unit, UnitContext, UnitOutput};
use kiln_diagnostic::{Diagnostic, DiagnosticSink, Severity};
use kiln_ir::{ObjectArena, Reflection, TypeRegistry, UnitIr};

/// Everything one run reads.
pub struct Package {
    pub registry: TypeRegistry,
    pub objects: ObjectArena,
    pub units: Vec<UnitIr>,
}

impl Package {
    pub fn new(registry: TypeRegistry, objects: ObjectArena) -> Self {
        Self {
            registry,
            objects,
            units: Vec::new(),
        }
    }

    /// Unit whose type is named `name`.
    pub fn unit(&self, name: &str) -> Option<&UnitIr> {
        self.units
            .iter()
            .find(|unit| self.registry.type_name(unit.ty) == name)
    }
}

/// One unit's output plus what was reported while producing it.
#[derive(Clone, Debug)]
pub struct CompiledUnit {
    pub output: UnitOutput,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledUnit {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn has_fatal(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Fatal)
    }

    /// `(file name, contents)` for the header and, if any, the source file.
    pub fn files(&self) -> Vec<(String, &str)> {
        let mut files = vec![(format!("{}.h", self.output.name), self.output.declaration.as_str())];
        if let Some(implementation) = &self.output.implementation {
            files.push((format!("{}.cpp", self.output.name), implementation.as_str()));
        }
        files
    }
}

/// Results in `Package::units` order.
#[derive(Clone, Debug, Default)]
pub struct CompiledPackage {
    pub units: Vec<CompiledUnit>,
}

impl CompiledPackage {
    pub fn error_count(&self) -> usize {
        self.units.iter().map(CompiledUnit::error_count).sum()
    }

    /// Whether any unit carries a fatal diagnostic; its output still has a
    /// compile-time error marker in place of the bad construct.
    pub fn has_fatal(&self) -> bool {
        self.units.iter().any(CompiledUnit::has_fatal)
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.units.iter().flat_map(|unit| unit.diagnostics.iter())
    }

    pub fn unit(&self, name: &str) -> Option<&CompiledUnit> {
        self.units.iter().find(|unit| unit.output.name == name)
    }

    pub fn files(&self) -> Vec<(String, &str)> {
        self.units.iter().flat_map(CompiledUnit::files).collect()
    }
}

/// Compile every unit of `package`.
///
/// # Errors
///
/// [`CompileError::Fatal`] when a unit has a fatal diagnostic and
/// `fail_on_fatal` was opted into; otherwise that unit is returned like the
/// rest with the fatal in its diagnostics. [`CompileError::ErrorLimitReached`]
/// once the running error count exceeds `error_limit`.
pub fn compile_package(
    package: &Package,
    options: &CompileOptions,
) -> Result<CompiledPackage, CompileError> {
    let _span = tracing::debug_span!("compile_package", units = package.units.len()).entered();
    let mut compiled = CompiledPackage::default();
    let mut errors = 0;
    for unit in &package.units {
        let result = compile_ir(package, unit, options)?;
        errors += result.error_count();
        compiled.units.push(result);
        if let Some(limit) = options.error_limit {
            if errors > limit {
                tracing::error!(errors, limit, "error limit reached");
                return Err(CompileError::ErrorLimitReached { limit, errors });
            }
        }
    }
    tracing::debug!(errors, "package compiled");
    Ok(compiled)
}

/// Compile the single unit named `name`.
///
/// # Errors
///
/// [`CompileError::UnknownUnit`] when no unit has that name, and
/// [`CompileError::Fatal`] as for [`compile_package`].
pub fn compile_unit(
    package: &Package,
    name: &str,
    options: &CompileOptions,
) -> Result<CompiledUnit, CompileError> {
    let unit = package.unit(name).ok_or_else(|| CompileError::UnknownUnit {
        name: name.to_owned(),
    })?;
    compile_ir(package, unit, options)
}

fn compile_ir(
    package: &Package,
    unit: &UnitIr,
    options: &CompileOptions,
) -> Result<CompiledUnit, CompileError> {
    let name = package.registry.type_name(unit.ty);
    let _span = tracing::debug_span!("compile_unit", unit = %name).entered();

    let config = options.emitter_config();
    let cx = UnitContext::new(&package.registry, &package.objects, &config, unit.ty);
    let mut sink = DiagnosticSink::new();
    let output = emit_unit(&cx, unit, &mut sink);

    if let Some(fatal) = sink
        .diagnostics()
        .iter()
        .find(|d| d.severity == Severity::Fatal)
    {
        if options.fail_on_fatal {
            return Err(CompileError::Fatal {
                unit: name.to_owned(),
                message: fatal.message(),
            });
        }
        tracing::warn!(unit = %name, message = %fatal.message(), "unit compiled with a fatal error marker");
    }
    Ok(CompiledUnit {
        output,
        diagnostics: sink.into_diagnostics(),
    })
}
