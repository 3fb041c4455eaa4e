use kiln_ir::{
    FieldId, FunctionId, FunctionIr, Reflection, Statement, StatementKind, TermId, ValueType,
};
use pretty_assertions::assert_eq;

use crate::test_helpers::Fixture;

/// Hero and a `Slot` struct both carry an object link, a struct link and a
/// float leaf, so any chain of links can be built.
struct Chain {
    fx: Fixture,
    tick: FunctionId,
    speed: FieldId,
    hero: [FieldId; 3],
    slot: [FieldId; 3],
}

const TARGET: usize = 0;
const SLOT: usize = 1;
const LEAF: usize = 2;

impl Chain {
    fn new() -> Self {
        let mut fx = Fixture::new();
        let slot_ty = fx.reg.add_struct("Slot");
        let speed = fx.field("Speed", ValueType::float());
        let hero = [
            fx.field("Target", ValueType::object(fx.hero)),
            fx.field("Slot", ValueType::structure(slot_ty)),
            fx.field("Health", ValueType::float()),
        ];
        let slot = [
            fx.reg.add_field(slot_ty, "Target", ValueType::object(fx.hero)),
            fx.reg.add_field(slot_ty, "Slot", ValueType::structure(slot_ty)),
            fx.reg.add_field(slot_ty, "Weight", ValueType::float()),
        ];
        let tick = fx.declare(fx.hero, "Tick");
        Self {
            fx,
            tick,
            speed,
            hero,
            slot,
        }
    }

    fn ir(&self) -> FunctionIr {
        FunctionIr::new(self.fx.reg.intern("Tick"), self.tick)
    }

    /// Build `links` then the leaf; returns the leaf term, the unguarded
    /// path and the paths of the object links, base first.
    fn build(&self, ir: &mut FunctionIr, links: &[bool]) -> (TermId, String, Vec<String>) {
        let mut context: Option<TermId> = None;
        let mut in_struct = false;
        let mut path = String::new();
        let mut objects = Vec::new();
        for &is_object in links {
            let fields = if in_struct { &self.slot } else { &self.hero };
            let field = if is_object { fields[TARGET] } else { fields[SLOT] };
            path = self.extend(&path, in_struct, field);
            if is_object {
                objects.push(path.clone());
            }
            context = Some(self.fx.field_term(ir, field, context));
            in_struct = !is_object;
        }
        let leaf = if in_struct { self.slot[LEAF] } else { self.hero[LEAF] };
        path = self.extend(&path, in_struct, leaf);
        (self.fx.field_term(ir, leaf, context), path, objects)
    }

    fn extend(&self, path: &str, in_struct: bool, field: FieldId) -> String {
        let name = self.fx.reg.field_name(field);
        match (path.is_empty(), in_struct) {
            (true, _) => name.to_owned(),
            (false, true) => format!("{path}.{name}"),
            (false, false) => format!("{path}->{name}"),
        }
    }
}

#[test]
fn guards_base_first() {
    let chain = Chain::new();
    let mut ir = chain.ir();
    let (leaf, _, _) = chain.build(&mut ir, &[true, true]);
    let dest = chain.fx.field_term(&mut ir, chain.speed, None);
    ir.push_stmt(Statement::new(StatementKind::Assign).lhs(dest).rhs([leaf]));

    assert_eq!(
        chain.fx.lower_clean(&ir),
        "Speed = ((IsValid(Target) && IsValid(Target->Target)) ? (Target->Target->Health) : (0.000000));\n"
    );
}

#[test]
fn struct_links_are_not_guarded() {
    let chain = Chain::new();
    let mut ir = chain.ir();
    let (leaf, _, _) = chain.build(&mut ir, &[false, true]);
    let dest = chain.fx.field_term(&mut ir, chain.speed, None);
    ir.push_stmt(Statement::new(StatementKind::Assign).lhs(dest).rhs([leaf]));

    assert_eq!(
        chain.fx.lower_clean(&ir),
        "Speed = ((IsValid(Slot.Target)) ? (Slot.Target->Health) : (0.000000));\n"
    );
}

#[test]
fn assignment_through_object_uses_statement_form() {
    let chain = Chain::new();
    let mut ir = chain.ir();
    let (leaf, _, _) = chain.build(&mut ir, &[true]);
    let dest = chain.fx.field_term(&mut ir, chain.speed, None);
    ir.push_stmt(Statement::new(StatementKind::Assign).lhs(leaf).rhs([dest]));

    assert_eq!(
        chain.fx.lower_clean(&ir),
        "if (IsValid(Target))\n{\n\tTarget->Health = Speed;\n}\n"
    );
}

#[test]
fn interface_links_are_checked_through_their_object() {
    let mut fx = Fixture::new();
    let usable = fx.reg.add_interface("Usable");
    let reset = fx.declare(usable, "Reset");
    let target = fx.field("Target", ValueType::object(fx.hero));
    let item = fx.field("Item", ValueType::interface(usable));
    let mut ir = fx.function("Tick");
    let owner = fx.field_term(&mut ir, target, None);
    let held = fx.field_term(&mut ir, item, Some(owner));
    ir.push_stmt(Statement::new(StatementKind::Call).function(reset).context(held));

    assert_eq!(
        fx.lower_clean(&ir),
        "\
if (IsValid(Target) && IsValid(Target->Item.GetObject()))
{
\tIUsable::Execute_Reset(Target->Item.GetObject());
}
"
    );
}

mod proptest_guard_order {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn guard_lists_object_links_base_first(
            links in proptest::collection::vec(any::<bool>(), 0..6),
        ) {
            let chain = Chain::new();
            let mut ir = chain.ir();
            let (leaf, path, objects) = chain.build(&mut ir, &links);
            let dest = chain.fx.field_term(&mut ir, chain.speed, None);
            ir.push_stmt(Statement::new(StatementKind::Assign).lhs(dest).rhs([leaf]));

            let expected = if objects.is_empty() {
                format!("Speed = {path};\n")
            } else {
                let condition = objects
                    .iter()
                    .map(|p| format!("IsValid({p})"))
                    .collect::<Vec<_>>()
                    .join(" && ");
                format!("Speed = (({condition}) ? ({path}) : (0.000000));\n")
            };
            prop_assert_eq!(chain.fx.lower_clean(&ir), expected);
        }
    }
}
