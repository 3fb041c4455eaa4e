use kiln_diagnostic::DiagnosticSink;
use kiln_ir::FieldOwner;

use super::{DefaultValueEmitter, LocalNameRegistry};
use crate::{CodeWriter, UnitContext};

/// Constructor of the generated class.
///
/// Class-owned sub-objects are created once, when the class default object
/// of exactly this class is constructed, and stored in the class. Every
/// instance then re-binds them by index before assigning its own defaults,
/// diffed against the parent class default object.
pub fn emit_constructor(cx: &UnitContext<'_>, sink: &mut DiagnosticSink) -> String {
    let reflect = cx.reflect;
    let objects = cx.objects;
    let desc = reflect.type_desc(cx.unit);
    let class = cx.unit_cpp_name();
    let parent_cdo = desc
        .super_type
        .and_then(|parent| reflect.type_desc(parent).default_object);

    let mut names = LocalNameRegistry::new();
    names.set_generated_class(cx.unit, "GetClass()", "GetClass()->MiscObjects.Add({local});");
    if let Some(cdo) = desc.default_object {
        names.bind(cdo, "this", parent_cdo);
    }

    let mut out = CodeWriter::new(&cx.config.indent);
    out.writeln(&format!(
        "{class}::{class}(const FObjectInitializer& ObjectInitializer) : Super(ObjectInitializer)"
    ));
    out.writeln("{");
    out.indent();

    out.writeln(&format!(
        "if(HasAnyFlags(RF_ClassDefaultObject) && ({class}::StaticClass() == GetClass()))"
    ));
    out.writeln("{");
    out.indent();
    out.writeln("ensure(0 == GetClass()->MiscObjects.Num());");
    {
        let mut emitter = DefaultValueEmitter::new(*cx, &mut names, &mut out, sink);
        for &owned in &desc.owned_objects {
            if emitter.emit_subobject(owned).is_none() {
                tracing::warn!(
                    object = reflect.resolve(objects.get(owned).name),
                    "class-owned object is not owned by the generated class"
                );
            }
        }
    }
    out.dedent();
    out.writeln("}");

    // Locals for everything stored in the class, by storage index.
    out.writeln("{");
    out.indent();
    for (index, &object) in names.registered().iter().enumerate() {
        let local = names.find(object).unwrap_or_default();
        let object_class = reflect.cpp_name(objects.get(object).class);
        out.writeln(&format!(
            "auto {local} = CastChecked<{object_class}>(GetClass()->MiscObjects[{index}]);"
        ));
    }

    if let Some(cdo) = desc.default_object {
        out.blank_line();
        let mut emitter = DefaultValueEmitter::new(*cx, &mut names, &mut out, sink);
        for field in reflect.all_fields(cx.unit) {
            let value = objects.field_value(cdo, field, reflect);
            // Own fields have nothing to inherit from.
            let base = if reflect.field(field).owner == FieldOwner::Type(cx.unit) {
                None
            } else {
                Some(match parent_cdo {
                    Some(parent) => objects.field_value(parent, field, reflect),
                    None => reflect.field_default(field),
                })
            };
            emitter.emit_field(field, &value, base.as_ref(), "", true);
        }
    }

    out.dedent();
    out.writeln("}");
    out.dedent();
    out.writeln("}");
    out.into_output()
}
