//! Null-safety guards.
//!
//! Reading through an object reference that may be null is wrapped in an
//! `IsValid` check of every object on the access path, base first:
//! `IsValid(A) && IsValid(A->B)`. Interface values are checked through the
//! object they wrap. Struct members and `this` never need one.

use kiln_ir::{Category, TermId, TerminalKind};

use crate::function::FunctionLowerer;

impl FunctionLowerer<'_, '_> {
    /// Object and interface references on the context chain starting at
    /// `start`, base first.
    pub(crate) fn guard_links(&self, start: Option<TermId>) -> Vec<TermId> {
        let ir = self.ir;
        let mut links = Vec::new();
        let mut cursor = start;
        while let Some(id) = cursor {
            let term = ir.term(id);
            match term.kind {
                // Inline values are computed once; guarding would evaluate
                // them twice.
                TerminalKind::SelfRef | TerminalKind::Literal(_) | TerminalKind::Inline(_) => {
                    break;
                }
                TerminalKind::Reference { .. } => {
                    let nullable =
                        matches!(term.ty.category, Category::Object | Category::Interface);
                    if nullable && !term.ty.is_array() {
                        links.push(id);
                    }
                }
            }
            cursor = term.context;
        }
        links.reverse();
        links
    }

    /// `IsValid(a) && IsValid(a->b)`, or `None` when nothing can be null.
    pub(crate) fn guard_condition(&mut self, start: Option<TermId>) -> Option<String> {
        let links = self.guard_links(start);
        if links.is_empty() {
            return None;
        }
        let checks = links
            .into_iter()
            .map(|link| {
                let path = self.render_term_unguarded(link);
                if self.ir.term(link).ty.category == Category::Interface {
                    format!("IsValid({path}.GetObject())")
                } else {
                    format!("IsValid({path})")
                }
            })
            .collect::<Vec<_>>();
        Some(checks.join(" && "))
    }

    /// Run `body` inside `if (guard) { ... }` when `context` can be null.
    pub(crate) fn guarded(&mut self, context: Option<TermId>, body: impl FnOnce(&mut Self)) {
        let Some(condition) = self.guard_condition(context) else {
            body(self);
            return;
        };
        self.out.writeln(&format!("if ({condition})"));
        self.out.writeln("{");
        self.out.indent();
        body(self);
        self.out.dedent();
        self.out.writeln("}");
    }
}

#[cfg(test)]
mod tests;
