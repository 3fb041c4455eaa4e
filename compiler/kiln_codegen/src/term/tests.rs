use kiln_diagnostic::Problem;
use kiln_ir::{
    FieldFlags, FunctionIr, Reflection, Statement, StatementKind, TermId, Value, ValueType,
};
use pretty_assertions::assert_eq;

use super::automatic_cast;
use crate::test_helpers::{problems, Fixture};

/// Lower `Dest = rhs;` and return the body.
fn assign(fx: &Fixture, ir: &mut FunctionIr, dest: TermId, rhs: TermId) -> String {
    ir.push_stmt(Statement::new(StatementKind::Assign).lhs(dest).rhs([rhs]));
    fx.lower_clean(ir)
}

#[test]
fn reference_on_self_is_bare_name() {
    let mut fx = Fixture::new();
    let speed = fx.field("Speed", ValueType::float());
    let health = fx.field("Health", ValueType::float());
    let mut ir = fx.function("Tick");
    let this = ir.self_ref(fx.hero);
    let dest = fx.field_term(&mut ir, speed, None);
    let src = fx.field_term(&mut ir, health, Some(this));

    assert_eq!(assign(&fx, &mut ir, dest, src), "Speed = Health;\n");
}

#[test]
fn object_context_reads_are_guarded_in_expression_position() {
    let mut fx = Fixture::new();
    let speed = fx.field("Speed", ValueType::float());
    let health = fx.field("Health", ValueType::float());
    let target = fx.field("Target", ValueType::object(fx.hero));
    let mut ir = fx.function("Tick");
    let dest = fx.field_term(&mut ir, speed, None);
    let ctx = fx.field_term(&mut ir, target, None);
    let src = fx.field_term(&mut ir, health, Some(ctx));

    assert_eq!(
        assign(&fx, &mut ir, dest, src),
        "Speed = ((IsValid(Target)) ? (Target->Health) : (0.000000));\n"
    );
}

#[test]
fn struct_context_joins_with_dot() {
    let mut fx = Fixture::new();
    let speed = fx.field("Speed", ValueType::float());
    let location = fx.field("Location", ValueType::structure(fx.core.vector));
    let x = fx.reg.own_fields(fx.core.vector)[0];
    let mut ir = fx.function("Tick");
    let dest = fx.field_term(&mut ir, speed, None);
    let ctx = fx.field_term(&mut ir, location, None);
    let src = fx.field_term(&mut ir, x, Some(ctx));

    assert_eq!(assign(&fx, &mut ir, dest, src), "Speed = Location.X;\n");
}

#[test]
fn class_context_reads_class_defaults() {
    let mut fx = Fixture::new();
    let speed = fx.field("Speed", ValueType::float());
    let health = fx.field("Health", ValueType::float());
    let class = fx.field("HeroClass", ValueType::class(fx.hero));
    let mut ir = fx.function("Tick");
    let dest = fx.field_term(&mut ir, speed, None);
    let ctx = fx.field_term(&mut ir, class, None);
    let src = fx.field_term(&mut ir, health, Some(ctx));

    assert_eq!(
        assign(&fx, &mut ir, dest, src),
        "Speed = GetDefaultValueSafe<AHero>(HeroClass)->Health;\n"
    );
}

#[test]
fn byte_literal_into_enum_names_the_entry() {
    let mut fx = Fixture::new();
    let mood = fx.reg.add_enum("EMood", &["A", "B", "C"]);
    let mut ir = fx.function("Tick");
    let name = fx.reg.intern("Mood");
    let dest = ir.local(name, ValueType::enumeration(mood));
    let src = ir.literal(ValueType::byte(), Value::Byte(2));

    assert_eq!(assign(&fx, &mut ir, dest, src), "Mood = EMood::C;\n");
}

#[test]
fn plain_byte_into_enum_is_cast() {
    let mut fx = Fixture::new();
    let mood = fx.reg.add_enum("EMood", &["A", "B", "C"]);
    let raw = fx.field("RawMood", ValueType::byte());
    let mut ir = fx.function("Tick");
    let name = fx.reg.intern("Mood");
    let dest = ir.local(name, ValueType::enumeration(mood));
    let src = fx.field_term(&mut ir, raw, None);

    assert_eq!(
        assign(&fx, &mut ir, dest, src),
        "Mood = static_cast<EMood>(RawMood);\n"
    );
}

#[test]
fn automatic_cast_rules() {
    let mut fx = Fixture::new();
    let mood = fx.reg.add_enum("EMood", &["A"]);
    let (reg, hero, actor) = (&fx.reg, fx.hero, fx.core.actor);

    let cast = |to: ValueType, from: ValueType| {
        let (begin, end) = automatic_cast(reg, &to, &from);
        format!("{begin}x{end}")
    };
    assert_eq!(cast(ValueType::enumeration(mood), ValueType::byte()), "static_cast<EMood>(x)");
    assert_eq!(cast(ValueType::byte(), ValueType::enumeration(mood)), "static_cast<uint8>(x)");
    assert_eq!(cast(ValueType::object(hero), ValueType::object(actor)), "Cast<AHero>(x)");
    // Widening and identical types need nothing.
    assert_eq!(cast(ValueType::object(actor), ValueType::object(hero)), "x");
    assert_eq!(cast(ValueType::object(hero), ValueType::object(hero)), "x");
    assert_eq!(cast(ValueType::int(), ValueType::int()), "x");
}

#[test]
fn switch_on_value_renders_every_case_in_order() {
    let mut fx = Fixture::new();
    let mut ir = fx.function("Describe");
    let index = ir.local(fx.reg.intern("Index"), ValueType::int());
    let mut operands = vec![index];
    for (key, label) in [(0, "zero"), (1, "one"), (2, "two")] {
        operands.push(ir.literal(ValueType::int(), Value::Int(key)));
        operands.push(ir.literal(ValueType::string(), Value::String(label.into())));
    }
    operands.push(ir.literal(ValueType::string(), Value::String("none".into())));
    let switch = ir.alloc_stmt(Statement::new(StatementKind::SwitchOnValue).rhs(operands));
    let value = ir.inline(switch, ValueType::string());
    let dest = ir.local(fx.reg.intern("Label"), ValueType::string());

    assert_eq!(
        assign(&fx, &mut ir, dest, value),
        "Label = TSwitchValue(Index, TEXT(\"none\"), 3, \
         TSwitchPair<int32, FString>(0, TEXT(\"zero\")), \
         TSwitchPair<int32, FString>(1, TEXT(\"one\")), \
         TSwitchPair<int32, FString>(2, TEXT(\"two\")));\n"
    );
}

#[test]
fn value_returning_call_renders_inline() {
    let mut fx = Fixture::new();
    let get_name = fx.declare(fx.hero, "GetDisplayName");
    fx.reg
        .add_param(get_name, "ReturnValue", ValueType::string(), FieldFlags::RETURN_PARAM);
    let mut ir = fx.function("Describe");
    let call = ir.alloc_stmt(Statement::new(StatementKind::Call).function(get_name));
    let value = ir.inline(call, ValueType::string());
    let dest = ir.local(fx.reg.intern("Label"), ValueType::string());

    assert_eq!(assign(&fx, &mut ir, dest, value), "Label = GetDisplayName();\n");
}

#[test]
fn other_inline_statements_render_empty() {
    let mut fx = Fixture::new();
    let mut ir = fx.function("Describe");
    let nop = ir.alloc_stmt(Statement::new(StatementKind::Nop));
    let value = ir.inline(nop, ValueType::string());
    let dest = ir.local(fx.reg.intern("Label"), ValueType::string());
    ir.push_stmt(Statement::new(StatementKind::Assign).lhs(dest).rhs([value]));

    let (lowered, sink) = fx.lower(&ir);
    assert_eq!(lowered.body, "Label = ;\n");
    assert_eq!(
        problems(&sink),
        vec![Problem::UnsupportedInlineStatement { kind: "Nop" }]
    );
}

#[test]
fn unrenderable_literal_falls_back_to_default() {
    let mut fx = Fixture::new();
    let sig = fx.declare(fx.hero, "OnHit__DelegateSignature");
    let handler = fx.field("OnHit", ValueType::delegate(sig));
    let mut ir = fx.function("Reset");
    let dest = fx.field_term(&mut ir, handler, None);
    let src = ir.literal(ValueType::delegate(sig), Value::Delegate(None));
    ir.push_stmt(Statement::new(StatementKind::Assign).lhs(dest).rhs([src]));

    let (lowered, sink) = fx.lower(&ir);
    assert_eq!(lowered.body, "OnHit = FOnHit__DelegateSignature();\n");
    assert_eq!(
        problems(&sink),
        vec![Problem::UnrenderableLiteral {
            ty: String::from("FOnHit__DelegateSignature")
        }]
    );
}
