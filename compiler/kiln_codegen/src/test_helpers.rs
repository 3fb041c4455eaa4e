//! Shared builders for codegen tests.

use kiln_diagnostic::{DiagnosticSink, Problem};
use kiln_ir::{
    CoreTypes, FieldId, FunctionId, FunctionIr, ObjectArena, Reflection, TermId, TypeId,
    TypeRegistry, ValueType,
};

use crate::{lower_function, EmitterConfig, LoweredFunction, UnitContext};

/// A registry with the engine core types and one user class, `AHero`.
pub(crate) struct Fixture {
    pub reg: TypeRegistry,
    pub core: CoreTypes,
    pub objects: ObjectArena,
    pub config: EmitterConfig,
    pub hero: TypeId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut reg = TypeRegistry::new();
        let core = reg.register_core();
        reg.set_package("/Game/Heroes");
        let hero = reg.add_class("Hero", Some(core.actor));
        Self {
            reg,
            core,
            objects: ObjectArena::new(),
            config: EmitterConfig::default(),
            hero,
        }
    }

    pub fn cx(&self) -> UnitContext<'_> {
        self.cx_for(self.hero)
    }

    pub fn cx_for(&self, unit: TypeId) -> UnitContext<'_> {
        UnitContext::new(&self.reg, &self.objects, &self.config, unit)
    }

    /// Field on the hero class.
    pub fn field(&mut self, name: &str, ty: ValueType) -> FieldId {
        self.reg.add_field(self.hero, name, ty)
    }

    /// Empty function body declared on the hero class.
    pub fn function(&mut self, name: &str) -> FunctionIr {
        let id = self.reg.add_function(self.hero, name);
        FunctionIr::new(self.reg.intern(name), id)
    }

    /// Function signature declared on `owner`, without a body.
    pub fn declare(&mut self, owner: TypeId, name: &str) -> FunctionId {
        self.reg.add_function(owner, name)
    }

    /// Reference terminal for `field`, read through `context`.
    pub fn field_term(
        &self,
        ir: &mut FunctionIr,
        field: FieldId,
        context: Option<TermId>,
    ) -> TermId {
        let desc = self.reg.field(field);
        ir.field_ref(field, desc.name, desc.ty, context)
    }

    pub fn lower(&self, ir: &FunctionIr) -> (LoweredFunction, DiagnosticSink) {
        let mut sink = DiagnosticSink::new();
        let lowered = lower_function(&self.cx(), ir, None, &mut sink);
        (lowered, sink)
    }

    /// Body text, asserting nothing was reported.
    pub fn lower_clean(&self, ir: &FunctionIr) -> String {
        let (lowered, sink) = self.lower(ir);
        assert!(sink.is_empty(), "unexpected diagnostics: {:?}", sink.diagnostics());
        lowered.body
    }
}

/// Problems reported to `sink`, in order.
pub(crate) fn problems(sink: &DiagnosticSink) -> Vec<Problem> {
    sink.diagnostics().iter().map(|d| d.problem.clone()).collect()
}
