//! Jumps inside the dispatch loop.

use kiln_diagnostic::Problem;
use kiln_ir::{StatementKind, StmtId};

use crate::function::FunctionLowerer;
use crate::state_machine::{EXIT_STATE, POP_FLOW_STACK};

impl FunctionLowerer<'_, '_> {
    pub(super) fn lower_goto(&mut self, id: StmtId) {
        let ir = self.ir;
        let stmt = ir.stmt(id);
        match stmt.kind {
            StatementKind::UnconditionalGoto => {
                let state = self.jump_state(id);
                self.jump(&state);
            }
            StatementKind::ComputedGoto => {
                let Some(lhs) = stmt.lhs else {
                    self.malformed(id);
                    return;
                };
                let state = self.render_term(lhs);
                self.jump(&state);
            }
            StatementKind::GotoIfNot => {
                let state = self.jump_state(id);
                self.unless(id, |this| this.jump(&state));
            }
            StatementKind::GotoReturn => self.jump(&EXIT_STATE.to_string()),
            StatementKind::GotoReturnIfNot => {
                self.unless(id, |this| this.jump(&EXIT_STATE.to_string()));
            }
            StatementKind::EndOfThread => self.pop_flow_stack(),
            StatementKind::EndOfThreadIfNot => self.unless(id, Self::pop_flow_stack),
            _ => self.malformed(id),
        }
    }

    pub(super) fn lower_push_state(&mut self, id: StmtId) {
        let Some(target) = self.ir.stmt(id).target else {
            self.sink.report(Problem::UnresolvedJumpTarget { kind: "PushState" });
            return;
        };
        let state = self.local_state(target);
        self.out.writeln(&format!("StateStack.Push({state});"));
    }

    /// State index of the statement's target; `-1` when it has none.
    fn jump_state(&mut self, id: StmtId) -> String {
        let stmt = self.ir.stmt(id);
        match stmt.target {
            Some(target) => self.local_state(target).to_string(),
            None => {
                tracing::warn!(statement = id.raw(), "jump without a target");
                self.sink.report(Problem::UnresolvedJumpTarget {
                    kind: stmt.kind.label(),
                });
                EXIT_STATE.to_string()
            }
        }
    }

    fn jump(&mut self, state: &str) {
        self.out.writeln(&format!("CurrentState = {state};"));
        self.out.writeln("break;");
    }

    fn pop_flow_stack(&mut self) {
        self.out.writeln(POP_FLOW_STACK);
        self.out.writeln("break;");
    }

    /// `if (!cond) { body }` with the condition taken from the LHS.
    fn unless(&mut self, id: StmtId, body: impl FnOnce(&mut Self)) {
        let Some(condition) = self.ir.stmt(id).lhs else {
            self.malformed(id);
            return;
        };
        let condition = self.render_term(condition);
        self.out.writeln(&format!("if (!{condition})"));
        self.out.writeln("{");
        self.out.indent();
        body(self);
        self.out.dedent();
        self.out.writeln("}");
    }
}
