use kiln_diagnostic::DiagnosticSink;
use kiln_ir::TypeId;

use super::{DefaultValueEmitter, LocalNameRegistry};
use crate::{CodeWriter, UnitContext};

/// `static FStruct GetDefaultValue()` for a user-defined struct: every member
/// is assigned its declared default.
pub fn emit_struct_default_factory(
    cx: &UnitContext<'_>,
    ty: TypeId,
    sink: &mut DiagnosticSink,
) -> String {
    let reflect = cx.reflect;
    let name = reflect.cpp_name(ty);
    let defaults = reflect.struct_default(ty);

    let mut out = CodeWriter::new(&cx.config.indent);
    out.writeln(&format!("static {name} GetDefaultValue()"));
    out.writeln("{");
    out.indent();
    out.writeln(&format!("{name} DefaultData__;"));
    {
        let mut names = LocalNameRegistry::new();
        let mut emitter = DefaultValueEmitter::new(*cx, &mut names, &mut out, sink);
        for (slot, field) in reflect.all_fields(ty).into_iter().enumerate() {
            if let Some(value) = defaults.fields.get(slot) {
                emitter.emit_field(field, value, None, "DefaultData__.", false);
            }
        }
    }
    out.blank_line();
    out.writeln("return DefaultData__;");
    out.dedent();
    out.writeln("}");
    out.into_output()
}
