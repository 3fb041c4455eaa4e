//! Statement lowering: one handler per statement kind.

mod call;
mod cast;
mod delegate;
mod flow;

use kiln_diagnostic::Problem;
use kiln_ir::{StatementKind, StmtId, TerminalKind};

use crate::function::FunctionLowerer;
use crate::term::automatic_cast;

impl FunctionLowerer<'_, '_> {
    pub(crate) fn lower_statement(&mut self, id: StmtId) {
        let ir = self.ir;
        let stmt = ir.stmt(id);
        match &stmt.kind {
            StatementKind::Nop => self.out.writeln("//No operation."),
            StatementKind::Call => self.lower_call(id),
            StatementKind::CallDelegate => self.lower_call_delegate(id),
            StatementKind::Assign => self.lower_assign(id),
            StatementKind::CompileError(message) => {
                self.sink.report(Problem::CompileErrorMarker {
                    message: message.clone(),
                });
                self.out.writeln(&format!(
                    "static_assert(false, \"{}\"); // CompileError",
                    crate::literal::escape(message)
                ));
            }
            StatementKind::PushState => self.lower_push_state(id),
            StatementKind::Return => {
                self.sink.report(Problem::UnsupportedStatementKind {
                    kind: stmt.kind.label(),
                });
                self.out.writeln("// Return statement.");
            }
            StatementKind::EndOfThread
            | StatementKind::EndOfThreadIfNot
            | StatementKind::UnconditionalGoto
            | StatementKind::GotoIfNot
            | StatementKind::ComputedGoto
            | StatementKind::GotoReturn
            | StatementKind::GotoReturnIfNot => self.lower_goto(id),
            StatementKind::DynamicCast => self.lower_dynamic_cast(id),
            StatementKind::MetaCast => self.lower_meta_cast(id),
            StatementKind::ObjectToInterface | StatementKind::InterfaceToInterface => {
                self.lower_interface_cast(id);
            }
            StatementKind::InterfaceToObject => self.lower_interface_to_object(id),
            StatementKind::ObjectToBool => self.lower_object_to_bool(id),
            StatementKind::AddMulticastDelegate
            | StatementKind::RemoveMulticastDelegate
            | StatementKind::ClearMulticastDelegate
            | StatementKind::BindDelegate => self.lower_delegate_op(id),
            StatementKind::CreateContainer => self.lower_create_container(id),
            StatementKind::Comment(text) => {
                if self.cx.config.emit_comments {
                    self.out.writeln(&format!("// {text}"));
                }
            }
            StatementKind::DebugSite | StatementKind::WireTraceSite => {
                if self.cx.config.emit_debug_sites {
                    self.out.writeln(&format!("// {}", stmt.kind.label()));
                }
            }
            StatementKind::SwitchOnValue | StatementKind::AssignOnPersistentFrame => {
                tracing::warn!(kind = stmt.kind.label(), "ignoring unsupported statement");
                self.sink.report(Problem::UnsupportedStatementKind {
                    kind: stmt.kind.label(),
                });
                self.out.writeln("// Warning: Ignoring unsupported statement");
            }
        }
    }

    fn lower_assign(&mut self, id: StmtId) {
        let ir = self.ir;
        let stmt = ir.stmt(id);
        let (Some(lhs), Some(&rhs)) = (stmt.lhs, stmt.rhs.first()) else {
            self.malformed(id);
            return;
        };
        let lhs_ty = ir.term(lhs).ty;
        let rhs_term = ir.term(rhs);

        let value = match &rhs_term.kind {
            // A raw byte literal stored into an enum names the entry directly.
            TerminalKind::Literal(value) if lhs_ty.is_enum() && rhs_term.ty.is_plain_byte() => {
                self.render_literal(&lhs_ty, value)
            }
            _ => {
                let (begin, end) = automatic_cast(self.cx.reflect, &lhs_ty, &rhs_term.ty);
                format!("{begin}{}{end}", self.render_term(rhs))
            }
        };

        self.assign_guarded(lhs, value);
    }

    fn lower_object_to_bool(&mut self, id: StmtId) {
        let ir = self.ir;
        let stmt = ir.stmt(id);
        let (Some(lhs), Some(&rhs)) = (stmt.lhs, stmt.rhs.first()) else {
            self.malformed(id);
            return;
        };
        let value = self.render_term(rhs);
        self.assign_guarded(lhs, format!("(nullptr != {value})"));
    }

    fn lower_create_container(&mut self, id: StmtId) {
        let ir = self.ir;
        let stmt = ir.stmt(id);
        let Some(lhs) = stmt.lhs else {
            self.malformed(id);
            return;
        };
        let array = self.render_term_unguarded(lhs);
        self.out
            .writeln(&format!("{array}.SetNum({}, true);", stmt.rhs.len()));
        for (index, &element) in stmt.rhs.iter().enumerate() {
            let value = self.render_term(element);
            self.out.writeln(&format!("{array}[{index}] = {value};"));
        }
    }

    /// Missing operands: report and leave a marker.
    pub(crate) fn malformed(&mut self, id: StmtId) {
        let kind = self.ir.stmt(id).kind.label();
        tracing::warn!(kind, statement = id.raw(), "malformed statement");
        self.sink
            .report(Problem::UnsupportedStatementKind { kind });
        self.out
            .writeln(&format!("// Warning: Ignoring malformed {kind} statement"));
    }
}
