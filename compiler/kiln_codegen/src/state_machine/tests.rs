use kiln_ir::{Statement, StatementKind, StmtId};
use pretty_assertions::assert_eq;

use super::*;
use crate::test_helpers::Fixture;

#[test]
fn states_start_at_one_and_are_stable() {
    let mut states = StateMap::new();
    assert!(states.is_empty());
    assert_eq!(states.state_of(StmtId::new(7)), 1);
    assert_eq!(states.state_of(StmtId::new(3)), 2);
    assert_eq!(states.state_of(StmtId::new(7)), 1);
    assert_eq!(states.get(StmtId::new(3)), Some(2));
    assert_eq!(states.get(StmtId::new(4)), None);
    assert_eq!(states.len(), 2);
    assert_eq!(
        states.iter().collect::<Vec<_>>(),
        vec![(StmtId::new(7), 1), (StmtId::new(3), 2)]
    );
}

#[test]
fn straight_line_code_has_no_dispatch_loop() {
    let mut fx = Fixture::new();
    let mut ir = fx.function("Tick");
    ir.push_stmt(Statement::new(StatementKind::Nop));

    let (lowered, _) = fx.lower(&ir);
    assert!(!lowered.uses_state_machine);
    assert_eq!(lowered.body, "//No operation.\n");
}

#[test]
fn self_jump_produces_two_cases() {
    let mut fx = Fixture::new();
    let mut ir = fx.function("Spin");
    let top = ir.push_stmt(Statement::new(StatementKind::Nop).jump_target());
    ir.push_stmt(Statement::new(StatementKind::UnconditionalGoto).target(top));

    let (lowered, sink) = fx.lower(&ir);
    assert!(sink.is_empty());
    assert!(lowered.uses_state_machine);
    assert!(!lowered.uses_flow_stack);
    assert_eq!(
        lowered.body,
        "\
int32 CurrentState = 0;
do
{
\tswitch( CurrentState )
\t{
\tcase 0:
\t\t{
\t\t}
\tcase 1:
\t\t{
\t\t\t//No operation.
\t\t\tCurrentState = 1;
\t\t\tbreak;
\t\t}
\tdefault:
\t\tbreak;
\t}
} while( CurrentState != -1 );
"
    );
}

#[test]
fn flow_stack_pushes_and_pops() {
    let mut fx = Fixture::new();
    let mut ir = fx.function("Sequence");
    let first = ir.alloc_stmt(Statement::new(StatementKind::Nop).jump_target());
    let second = ir.alloc_stmt(Statement::new(StatementKind::Nop).jump_target());
    ir.push_stmt(Statement::new(StatementKind::PushState).target(first));
    ir.push_stmt(Statement::new(StatementKind::UnconditionalGoto).target(second));
    ir.push_node(vec![first]);
    ir.push_stmt(Statement::new(StatementKind::EndOfThread));
    ir.push_node(vec![second]);
    ir.push_stmt(Statement::new(StatementKind::EndOfThread));

    let body = fx.lower_clean(&ir);
    let pop = POP_FLOW_STACK;
    assert_eq!(
        body,
        format!(
            "\
TArray< int32, TInlineAllocator<8> > StateStack;

int32 CurrentState = 0;
do
{{
\tswitch( CurrentState )
\t{{
\tcase 0:
\t\t{{
\t\t\tStateStack.Push(1);
\t\t\tCurrentState = 2;
\t\t\tbreak;
\t\t}}
\tcase 1:
\t\t{{
\t\t\t//No operation.
\t\t\t{pop}
\t\t\tbreak;
\t\t}}
\tcase 2:
\t\t{{
\t\t\t//No operation.
\t\t\t{pop}
\t\t\tbreak;
\t\t}}
\tdefault:
\t\tcheck(false); // Invalid state
\t\tbreak;
\t}}
}} while( CurrentState != -1 );
"
        )
    );
}

mod proptest_state_numbering {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn numbering_is_dense_in_first_reference_order(
            refs in proptest::collection::vec(0u32..32, 0..64),
        ) {
            let mut states = StateMap::new();
            let mut first_seen: Vec<u32> = Vec::new();
            for &raw in &refs {
                let state = states.state_of(StmtId::new(raw));
                if !first_seen.contains(&raw) {
                    first_seen.push(raw);
                }
                let expected = first_seen.iter().position(|&r| r == raw).map(|p| p + 1);
                prop_assert_eq!(usize::try_from(state).ok(), expected);
            }
            prop_assert_eq!(states.len(), first_seen.len());
            let order: Vec<u32> = states.iter().map(|(s, _)| s.raw()).collect();
            prop_assert_eq!(order, first_seen);
        }
    }
}
