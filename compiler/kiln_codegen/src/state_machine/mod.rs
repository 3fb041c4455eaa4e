//! Control-flow state machine.
//!
//! Functions with jumps are emitted as a `switch` inside a `do`/`while`
//! loop. Each jump target becomes a `case`; a jump assigns `CurrentState`
//! and breaks back to the loop head.
//!
//! ```text
//! int32 CurrentState = 0;
//! do
//! {
//!     switch( CurrentState )
//!     {
//!     case 0:
//!         { ...entry... }
//!     case 1:
//!         { ...first jump target... }
//!     default:
//!         break;
//!     }
//! } while( CurrentState != -1 );
//! ```
//!
//! State indices are assigned lazily, in order of first reference, starting
//! at 1. State 0 is the entry point and -1 ends the loop.

use rustc_hash::FxHashMap;

use kiln_ir::{FunctionIr, StmtId};

use crate::CodeWriter;

/// State of the function's entry case.
pub const ENTRY_STATE: i32 = 0;

/// State that terminates the dispatch loop.
pub const EXIT_STATE: i32 = -1;

/// Pops the execution stack or exits when it is empty.
pub const POP_FLOW_STACK: &str =
    "CurrentState = (StateStack.Num() > 0) ? StateStack.Pop(/*bAllowShrinking=*/ false) : -1;";

/// Jump-target statement → state index, for one function.
#[derive(Clone, Debug, Default)]
pub struct StateMap {
    states: FxHashMap<StmtId, i32>,
    order: Vec<StmtId>,
}

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `stmt`, assigning the next free index on first reference.
    pub fn state_of(&mut self, stmt: StmtId) -> i32 {
        if let Some(&state) = self.states.get(&stmt) {
            return state;
        }
        let state = i32::try_from(self.order.len() + 1).unwrap_or(i32::MAX);
        self.states.insert(stmt, state);
        self.order.push(stmt);
        state
    }

    pub fn get(&self, stmt: StmtId) -> Option<i32> {
        self.states.get(&stmt).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(statement, state)` pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (StmtId, i32)> + '_ {
        self.order.iter().map(|&s| (s, self.states[&s]))
    }
}

/// Any jump, execution-stack use or jump target forces the dispatch loop.
pub fn requires_state_machine(ir: &FunctionIr) -> bool {
    ir.execution_order().any(|id| {
        let stmt = ir.stmt(id);
        stmt.is_jump_target || stmt.kind.is_jump()
    })
}

/// PushState and EndOfThread need the explicit execution stack.
pub fn requires_flow_stack(ir: &FunctionIr) -> bool {
    ir.execution_order()
        .any(|id| ir.stmt(id).kind.uses_flow_stack())
}

/// Loop prologue up to and including the opening of `case 0`.
pub fn open_dispatch(out: &mut CodeWriter, uses_flow_stack: bool) {
    if uses_flow_stack {
        out.writeln("TArray< int32, TInlineAllocator<8> > StateStack;");
        out.blank_line();
    }
    out.writeln(&format!("int32 CurrentState = {ENTRY_STATE};"));
    out.writeln("do");
    out.writeln("{");
    out.indent();
    out.writeln("switch( CurrentState )");
    out.writeln("{");
    out.writeln(&format!("case {ENTRY_STATE}:"));
    out.indent();
    out.writeln("{");
    out.indent();
}

/// Close the current case body and open `case state`.
///
/// The previous body falls through when it did not break.
pub fn begin_case(out: &mut CodeWriter, state: i32) {
    out.dedent();
    out.writeln("}");
    out.dedent();
    out.writeln(&format!("case {state}:"));
    out.indent();
    out.writeln("{");
    out.indent();
}

/// Close the last case, emit `default:` and the loop condition.
pub fn close_dispatch(out: &mut CodeWriter, uses_flow_stack: bool) {
    out.dedent();
    out.writeln("}");
    out.dedent();
    out.writeln("default:");
    out.indent();
    if uses_flow_stack {
        out.writeln("check(false); // Invalid state");
    }
    out.writeln("break;");
    out.dedent();
    out.writeln("}");
    out.dedent();
    out.writeln(&format!("}} while( CurrentState != {EXIT_STATE} );"));
}

#[cfg(test)]
mod tests;
