//! Delegate binding and multicast list edits.

use kiln_ir::{StatementKind, StmtId};

use crate::function::FunctionLowerer;

impl FunctionLowerer<'_, '_> {
    pub(super) fn lower_delegate_op(&mut self, id: StmtId) {
        let ir = self.ir;
        let stmt = ir.stmt(id);
        let Some(lhs) = stmt.lhs else {
            self.malformed(id);
            return;
        };

        let call = match (&stmt.kind, stmt.rhs.as_slice()) {
            (StatementKind::AddMulticastDelegate, [handler]) => {
                format!("Add({})", self.render_term(*handler))
            }
            (StatementKind::RemoveMulticastDelegate, [handler]) => {
                format!("Remove({})", self.render_term(*handler))
            }
            (StatementKind::ClearMulticastDelegate, _) => String::from("Clear()"),
            // Operands: function name, then the object it is bound to.
            (StatementKind::BindDelegate, [name, object]) => format!(
                "BindUFunction({}, {})",
                self.render_term(*object),
                self.render_term(*name)
            ),
            _ => {
                self.malformed(id);
                return;
            }
        };

        let context = ir.term(lhs).context;
        self.guarded(context, |this| {
            let target = this.render_term_unguarded(lhs);
            this.out.writeln(&format!("{target}.{call};"));
        });
    }
}
