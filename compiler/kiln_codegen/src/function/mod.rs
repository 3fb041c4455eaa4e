//! Function lowering.
//!
//! `FunctionLowerer` walks one function's statements in execution order and
//! writes C++ for each. Statement handlers live in `stmt`, expression
//! rendering in `term` and `guard`; all of them are methods on the lowerer so
//! they share the writer, the state map and the diagnostic sink.

use kiln_diagnostic::DiagnosticSink;
use kiln_ir::{
    FieldFlags, FunctionFlags, FunctionId, FunctionIr, Reflection, StmtId, TypeFlags, TypeKind,
};

use crate::cpp_types::cpp_type;
use crate::state_machine::{
    begin_case, close_dispatch, open_dispatch, requires_flow_stack, requires_state_machine,
};
use crate::{CodeWriter, StateMap, UnitContext};

/// Body text of one function plus what the dispatch loop needed.
#[derive(Debug)]
pub struct LoweredFunction {
    pub body: String,
    pub states: StateMap,
    pub uses_state_machine: bool,
    pub uses_flow_stack: bool,
}

/// Lower the body of `ir`.
///
/// Calls that resume in the ubergraph number their states in
/// `ubergraph_states`; pass `None` when lowering the ubergraph itself.
pub fn lower_function(
    cx: &UnitContext<'_>,
    ir: &FunctionIr,
    ubergraph_states: Option<&mut StateMap>,
    sink: &mut DiagnosticSink,
) -> LoweredFunction {
    sink.set_function(Some(cx.resolve(ir.name).to_owned()));
    tracing::debug!(
        function = cx.resolve(ir.name),
        statements = ir.statements.len(),
        "lowering function"
    );

    let mut lowerer = FunctionLowerer {
        cx: *cx,
        ir,
        states: StateMap::new(),
        ubergraph_states,
        uses_flow_stack: requires_flow_stack(ir),
        out: CodeWriter::new(&cx.config.indent),
        sink,
    };
    let uses_state_machine = lowerer.emit_body();

    LoweredFunction {
        body: lowerer.out.into_output(),
        states: lowerer.states,
        uses_state_machine,
        uses_flow_stack: lowerer.uses_flow_stack,
    }
}

pub(crate) struct FunctionLowerer<'a, 'd> {
    pub(crate) cx: UnitContext<'a>,
    pub(crate) ir: &'a FunctionIr,
    pub(crate) states: StateMap,
    ubergraph_states: Option<&'d mut StateMap>,
    pub(crate) uses_flow_stack: bool,
    pub(crate) out: CodeWriter,
    pub(crate) sink: &'d mut DiagnosticSink,
}

impl FunctionLowerer<'_, '_> {
    fn emit_body(&mut self) -> bool {
        let ir = self.ir;
        let state_machine = requires_state_machine(ir);
        if state_machine {
            open_dispatch(&mut self.out, self.uses_flow_stack);
        }

        for id in ir.execution_order() {
            if state_machine && ir.stmt(id).is_jump_target {
                let state = self.states.state_of(id);
                begin_case(&mut self.out, state);
            }
            self.sink.set_statement(Some(id.raw()));
            self.lower_statement(id);
        }
        self.sink.set_statement(None);

        if state_machine {
            close_dispatch(&mut self.out, self.uses_flow_stack);
        }
        state_machine
    }

    /// State index of a jump target in this function.
    pub(crate) fn local_state(&mut self, target: StmtId) -> i32 {
        self.states.state_of(target)
    }

    /// State index of a label in the ubergraph.
    pub(crate) fn ubergraph_state(&mut self, target: StmtId) -> i32 {
        match self.ubergraph_states.as_deref_mut() {
            Some(states) => states.state_of(target),
            None => self.states.state_of(target),
        }
    }
}

// ── Signatures ──────────────────────────────────────────────────────

/// Overrides a native event: the body is defined as `<Name>_Implementation`.
pub fn is_native_event(reflect: &dyn Reflection, func: FunctionId) -> bool {
    let original = reflect.original_function(func);
    let desc = reflect.function(original);
    let owner = reflect.type_desc(desc.owner);
    desc.flags
        .contains(FunctionFlags::NATIVE | FunctionFlags::EVENT | FunctionFlags::BLUEPRINT_EVENT)
        || (owner.kind == TypeKind::Interface && owner.flags.contains(TypeFlags::USER_DEFINED))
}

/// Name a function is declared and defined under.
pub fn emitted_name(reflect: &dyn Reflection, func: FunctionId) -> String {
    let name = reflect.function_name(func);
    if is_native_event(reflect, func) && reflect.original_function(func) != func {
        format!("{name}_Implementation")
    } else {
        name.to_owned()
    }
}

/// `Ret Owner::Name(params)`; unqualified when `owner` is `None`.
pub fn signature(reflect: &dyn Reflection, func: FunctionId, owner: Option<&str>) -> String {
    let desc = reflect.function(func);
    let return_type = reflect
        .return_field(func)
        .map_or_else(|| String::from("void"), |ret| cpp_type(reflect, &reflect.field(ret).ty));
    let params = desc
        .params
        .iter()
        .map(|&p| reflect.field(p))
        .filter(|p| !p.is_return())
        .map(|p| {
            let ty = cpp_type(reflect, &p.ty);
            let name = reflect.resolve(p.name);
            if p.flags.contains(FieldFlags::OUT_PARAM) {
                format!("{ty}& {name}")
            } else {
                format!("{ty} {name}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let qualifier = owner.map(|o| format!("{o}::")).unwrap_or_default();
    format!(
        "{return_type} {qualifier}{}({params})",
        emitted_name(reflect, func)
    )
}

/// Full out-of-class definition: signature, locals, body and return.
pub fn emit_definition(cx: &UnitContext<'_>, ir: &FunctionIr, lowered: &LoweredFunction) -> String {
    let reflect = cx.reflect;
    let mut out = CodeWriter::new(&cx.config.indent);
    out.writeln(&signature(reflect, ir.function, Some(&cx.unit_cpp_name())));
    out.writeln("{");
    out.indent();

    let return_field = reflect.return_field(ir.function);
    if let Some(ret) = return_field {
        let field = reflect.field(ret);
        out.writeln(&format!(
            "{} {}{{}};",
            cpp_type(reflect, &field.ty),
            reflect.resolve(field.name)
        ));
    }
    for local in &ir.locals {
        out.writeln(&format!(
            "{} {}{{}};",
            cpp_type(reflect, &local.ty),
            cx.resolve(local.name)
        ));
    }
    out.write_lines(&lowered.body);
    if let Some(ret) = return_field {
        out.writeln(&format!("return {};", reflect.field_name(ret)));
    }

    out.dedent();
    out.writeln("}");
    out.into_output()
}

#[cfg(test)]
mod tests;
