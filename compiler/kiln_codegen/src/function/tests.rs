use kiln_diagnostic::DiagnosticSink;
use kiln_ir::{
    FieldFlags, FunctionFlags, Statement, StatementKind, Value, ValueType,
};
use pretty_assertions::assert_eq;

use super::*;
use crate::test_helpers::Fixture;

#[test]
fn signature_lists_params_and_out_refs() {
    let mut fx = Fixture::new();
    let split = fx.declare(fx.hero, "Split");
    fx.reg.add_param(split, "In", ValueType::float(), FieldFlags::empty());
    fx.reg.add_param(split, "Out", ValueType::float(), FieldFlags::OUT_PARAM);
    fx.reg
        .add_param(split, "ReturnValue", ValueType::bool(), FieldFlags::OUT_PARAM | FieldFlags::RETURN_PARAM);

    assert_eq!(
        signature(&fx.reg, split, Some("AHero")),
        "bool AHero::Split(float In, float& Out)"
    );
    assert_eq!(signature(&fx.reg, split, None), "bool Split(float In, float& Out)");
}

#[test]
fn native_event_overrides_are_implementations() {
    let mut fx = Fixture::new();
    let base = fx.reg.add_class("Base", Some(fx.core.actor));
    let child = fx.reg.add_class("Child", Some(base));
    let declared = fx.declare(base, "OnHurt");
    fx.reg.function_mut(declared).flags =
        FunctionFlags::NATIVE | FunctionFlags::EVENT | FunctionFlags::BLUEPRINT_EVENT;
    let overridden = fx.declare(child, "OnHurt");
    let plain = fx.declare(child, "Jump");

    assert!(is_native_event(&fx.reg, overridden));
    assert_eq!(emitted_name(&fx.reg, overridden), "OnHurt_Implementation");
    assert_eq!(emitted_name(&fx.reg, declared), "OnHurt");
    assert!(!is_native_event(&fx.reg, plain));
    assert_eq!(emitted_name(&fx.reg, plain), "Jump");
}

#[test]
fn user_interface_functions_are_native_events() {
    let mut fx = Fixture::new();
    let usable = fx.reg.add_interface("Usable");
    fx.declare(usable, "Use");
    fx.reg.type_mut(fx.hero).interfaces.push(usable);
    let implementation = fx.declare(fx.hero, "Use");

    assert_eq!(emitted_name(&fx.reg, implementation), "Use_Implementation");
}

#[test]
fn definition_declares_return_and_locals() {
    let mut fx = Fixture::new();
    let mut ir = fx.function("Heal");
    fx.reg
        .add_param(ir.function, "Amount", ValueType::float(), FieldFlags::empty());
    let ret = fx.reg.add_param(
        ir.function,
        "ReturnValue",
        ValueType::bool(),
        FieldFlags::OUT_PARAM | FieldFlags::RETURN_PARAM,
    );
    ir.local(fx.reg.intern("Temp"), ValueType::int());
    let dest = fx.field_term(&mut ir, ret, None);
    let value = ir.literal(ValueType::bool(), Value::Bool(true));
    ir.push_stmt(Statement::new(StatementKind::Assign).lhs(dest).rhs([value]));

    let (lowered, _) = fx.lower(&ir);
    assert_eq!(
        emit_definition(&fx.cx(), &ir, &lowered),
        "\
bool AHero::Heal(float Amount)
{
\tbool ReturnValue{};
\tint32 Temp{};
\tReturnValue = true;
\treturn ReturnValue;
}
"
    );
}

#[test]
fn ubergraph_entry_uses_ubergraph_state_numbers() {
    let mut fx = Fixture::new();
    let mut uber = fx.function("ExecuteUbergraph_Hero");
    uber.is_ubergraph = true;
    let entry_point =
        fx.reg
            .add_param(uber.function, "EntryPoint", ValueType::int(), FieldFlags::empty());
    let first = uber.alloc_stmt(Statement::new(StatementKind::Nop).jump_target());
    let second = uber.alloc_stmt(Statement::new(StatementKind::Nop).jump_target());
    let computed = fx.field_term(&mut uber, entry_point, None);
    uber.push_stmt(Statement::new(StatementKind::ComputedGoto).lhs(computed));
    uber.push_node(vec![first, second]);

    let mut event = fx.function("ReceiveBeginPlay");
    let entry = event.literal(ValueType::int(), Value::Int(0));
    event.push_stmt(
        Statement::new(StatementKind::Call)
            .function(uber.function)
            .rhs([entry])
            .target(second)
            .ubergraph_call_index(0),
    );

    let cx = fx.cx();
    let mut sink = DiagnosticSink::new();
    let mut uber_lowered = lower_function(&cx, &uber, None, &mut sink);
    assert_eq!(uber_lowered.states.get(first), Some(1));
    assert_eq!(uber_lowered.states.get(second), Some(2));

    let lowered = lower_function(&cx, &event, Some(&mut uber_lowered.states), &mut sink);
    assert!(sink.is_empty());
    assert_eq!(lowered.body, "ExecuteUbergraph_Hero(2);\n");
}
