//! Unit emission: one class, struct, enum or interface to final text.
//!
//! Classes produce a declaration and an implementation blob; the other kinds
//! are declaration-only. Function bodies are lowered ubergraph first so that
//! calls resuming in the ubergraph find its states already numbered.

use kiln_diagnostic::DiagnosticSink;
use kiln_ir::{FunctionFlags, FunctionId, TypeDesc, TypeKind, UnitIr};

use crate::decl::{
    delegate_declarations, field_declaration, lifetime_replicated_props,
    lifetime_replicated_props_declaration, metadata_tag, ufunction, uproperty,
};
use crate::defaults::{emit_constructor, emit_struct_default_factory};
use crate::deps::{gather, Dependencies, Dependency};
use crate::function::{emit_definition, emitted_name, lower_function, signature};
use crate::{CodeWriter, LoweredFunction, UnitContext};

/// Generated source for one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitOutput {
    /// Stem of the emitted files (`<name>.h`, `<name>.cpp`).
    pub name: String,
    pub declaration: String,
    pub implementation: Option<String>,
    pub header_deps: Vec<Dependency>,
    pub implementation_deps: Vec<Dependency>,
}

/// Emit `unit`, reporting problems to `sink`.
pub fn emit_unit(cx: &UnitContext<'_>, unit: &UnitIr, sink: &mut DiagnosticSink) -> UnitOutput {
    let reflect = cx.reflect;
    let desc = reflect.type_desc(unit.ty);
    let name = reflect.type_name(unit.ty).to_owned();
    sink.set_unit(name.clone());
    tracing::debug!(unit = %name, kind = ?desc.kind, functions = unit.functions.len(), "emitting unit");

    let deps = gather(cx, unit);
    let (declaration, implementation) = match desc.kind {
        TypeKind::Class => {
            let bodies = lower_bodies(cx, unit, sink);
            (
                class_declaration(cx, unit, &deps),
                Some(class_implementation(cx, unit, &deps, &bodies, sink)),
            )
        }
        TypeKind::Struct => (struct_declaration(cx, &deps, sink), None),
        TypeKind::Enum => (enum_declaration(cx, &deps), None),
        TypeKind::Interface => (interface_declaration(cx, &deps), None),
    };
    sink.set_function(None);

    UnitOutput {
        name,
        declaration,
        implementation,
        header_deps: deps.header,
        implementation_deps: deps.implementation,
    }
}

/// Lowered bodies in `unit.functions` order; the ubergraph is lowered first.
fn lower_bodies(
    cx: &UnitContext<'_>,
    unit: &UnitIr,
    sink: &mut DiagnosticSink,
) -> Vec<Option<LoweredFunction>> {
    let mut bodies: Vec<Option<LoweredFunction>> = unit.functions.iter().map(|_| None).collect();
    let uber_index = unit.functions.iter().position(|f| f.is_ubergraph);

    let mut uber = uber_index.map(|index| lower_function(cx, &unit.functions[index], None, sink));
    for (index, function) in unit.functions.iter().enumerate() {
        if Some(index) == uber_index {
            continue;
        }
        let states = uber.as_mut().map(|lowered| &mut lowered.states);
        bodies[index] = Some(lower_function(cx, function, states, sink));
    }
    if let Some(index) = uber_index {
        bodies[index] = uber.take();
    }
    bodies
}

/// `#pragma once`, header includes and the generated-code include.
fn header_prologue(out: &mut CodeWriter, cx: &UnitContext<'_>, includes: &[String]) {
    out.writeln("#pragma once");
    out.blank_line();
    for include in includes {
        out.writeln(include);
    }
    out.writeln(&format!(
        "#include \"{}.generated.h\"",
        cx.reflect.type_name(cx.unit)
    ));
    out.blank_line();
}

fn doc_comment(out: &mut CodeWriter, desc: &TypeDesc) {
    if let Some(doc) = &desc.doc {
        out.writeln(&format!("/** {} */", doc.replace('\n', " ")));
    }
}

/// Specifier list with the type's metadata appended.
fn type_tags(base: &[&str], desc: &TypeDesc) -> String {
    let mut tags: Vec<String> = base.iter().map(|t| String::from(*t)).collect();
    tags.extend(metadata_tag(&desc.metadata, false));
    tags.join(", ")
}

fn function_declaration(out: &mut CodeWriter, cx: &UnitContext<'_>, func: FunctionId) {
    let reflect = cx.reflect;
    // Native event overrides are plain virtual implementations.
    if emitted_name(reflect, func) != reflect.function_name(func) {
        out.writeln(&format!("virtual {} override;", signature(reflect, func, None)));
    } else {
        out.writeln(&ufunction(reflect, func));
        out.writeln(&format!("{};", signature(reflect, func, None)));
    }
}

fn field_declarations(out: &mut CodeWriter, cx: &UnitContext<'_>) {
    for &field in cx.reflect.own_fields(cx.unit) {
        out.writeln(&uproperty(cx.reflect, field));
        out.writeln(&field_declaration(cx.reflect, field));
    }
}

fn class_declaration(cx: &UnitContext<'_>, unit: &UnitIr, deps: &Dependencies) -> String {
    let reflect = cx.reflect;
    let desc = reflect.type_desc(cx.unit);
    let class = cx.unit_cpp_name();
    let mut out = CodeWriter::new(&cx.config.indent);
    header_prologue(&mut out, cx, &deps.header_includes(cx));

    let delegates = delegate_declarations(reflect, cx.unit);
    for declaration in &delegates {
        out.writeln(declaration);
    }
    if !delegates.is_empty() {
        out.blank_line();
    }

    doc_comment(&mut out, desc);
    out.writeln(&format!(
        "UCLASS({})",
        type_tags(&["Blueprintable", "BlueprintType"], desc)
    ));
    let mut bases = vec![format!(
        "public {}",
        desc.super_type
            .map_or_else(|| String::from("UObject"), |s| reflect.cpp_name(s))
    )];
    bases.extend(
        desc.interfaces
            .iter()
            .map(|&i| format!("public {}", reflect.interface_cpp_name(i))),
    );
    out.writeln(&format!("class {class} : {}", bases.join(", ")));
    out.writeln("{");
    out.indent();
    out.writeln("GENERATED_BODY()");
    out.dedent();
    out.writeln("public:");
    out.indent();

    field_declarations(&mut out, cx);
    out.blank_line();
    out.writeln(&format!(
        "{class}(const FObjectInitializer& ObjectInitializer = FObjectInitializer::Get());"
    ));
    if let Some(declaration) = lifetime_replicated_props_declaration(reflect, cx.unit) {
        out.writeln(declaration);
    }
    for function in &unit.functions {
        function_declaration(&mut out, cx, function.function);
    }

    out.dedent();
    out.writeln("};");
    out.into_output()
}

fn class_implementation(
    cx: &UnitContext<'_>,
    unit: &UnitIr,
    deps: &Dependencies,
    bodies: &[Option<LoweredFunction>],
    sink: &mut DiagnosticSink,
) -> String {
    let reflect = cx.reflect;
    let mut out = CodeWriter::new(&cx.config.indent);
    out.writeln(&format!("#include \"{}.h\"", reflect.type_name(cx.unit)));
    for include in deps.implementation_includes(cx) {
        out.writeln(&include);
    }
    out.blank_line();

    sink.set_function(None);
    out.write_lines(&emit_constructor(cx, sink));
    if let Some(replication) = lifetime_replicated_props(reflect, cx.unit, &cx.config.indent) {
        out.blank_line();
        out.write_lines(&replication);
    }
    for (function, lowered) in unit.functions.iter().zip(bodies) {
        if let Some(lowered) = lowered {
            out.blank_line();
            out.write_lines(&emit_definition(cx, function, lowered));
        }
    }
    out.into_output()
}

fn struct_declaration(cx: &UnitContext<'_>, deps: &Dependencies, sink: &mut DiagnosticSink) -> String {
    let desc = cx.reflect.type_desc(cx.unit);
    let mut includes = deps.header_includes(cx);
    includes.extend(deps.implementation_includes(cx));
    let mut out = CodeWriter::new(&cx.config.indent);
    header_prologue(&mut out, cx, &includes);

    doc_comment(&mut out, desc);
    out.writeln(&format!("USTRUCT({})", type_tags(&["BlueprintType"], desc)));
    out.writeln(&format!("struct {}", cx.unit_cpp_name()));
    out.writeln("{");
    out.writeln("public:");
    out.indent();
    out.writeln("GENERATED_BODY()");
    field_declarations(&mut out, cx);
    out.blank_line();
    out.write_lines(&emit_struct_default_factory(cx, cx.unit, sink));
    out.dedent();
    out.writeln("};");
    out.into_output()
}

fn enum_declaration(cx: &UnitContext<'_>, deps: &Dependencies) -> String {
    let desc = cx.reflect.type_desc(cx.unit);
    let mut out = CodeWriter::new(&cx.config.indent);
    header_prologue(&mut out, cx, &deps.header_includes(cx));

    doc_comment(&mut out, desc);
    out.writeln(&format!("UENUM({})", type_tags(&["BlueprintType"], desc)));
    out.writeln(&format!("enum class {} : uint8", cx.unit_cpp_name()));
    out.writeln("{");
    out.indent();
    for entry in &desc.enum_entries {
        let name = cx.resolve(entry.name);
        match &entry.display_name {
            Some(display) => out.writeln(&format!(
                "{name} UMETA(DisplayName=\"{}\"),",
                crate::literal::escape(display)
            )),
            None => out.writeln(&format!("{name},")),
        }
    }
    out.dedent();
    out.writeln("};");
    out.into_output()
}

fn interface_declaration(cx: &UnitContext<'_>, deps: &Dependencies) -> String {
    let reflect = cx.reflect;
    let desc = reflect.type_desc(cx.unit);
    let mut out = CodeWriter::new(&cx.config.indent);
    header_prologue(&mut out, cx, &deps.header_includes(cx));

    doc_comment(&mut out, desc);
    out.writeln(&format!("UINTERFACE({})", type_tags(&["Blueprintable"], desc)));
    out.writeln(&format!("class {} : public UInterface", cx.unit_cpp_name()));
    out.writeln("{");
    out.indent();
    out.writeln("GENERATED_BODY()");
    out.dedent();
    out.writeln("};");
    out.blank_line();

    out.writeln(&format!("class {}", reflect.interface_cpp_name(cx.unit)));
    out.writeln("{");
    out.indent();
    out.writeln("GENERATED_BODY()");
    out.dedent();
    out.writeln("public:");
    out.indent();
    for &func in &desc.functions {
        if reflect.function(func).flags.contains(FunctionFlags::DELEGATE) {
            continue;
        }
        out.writeln(&ufunction(reflect, func));
        out.writeln(&format!("{};", signature(reflect, func, None)));
    }
    out.dedent();
    out.writeln("};");
    out.into_output()
}
