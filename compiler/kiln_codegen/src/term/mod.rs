//! Term rendering.
//!
//! A terminal renders to an expression: literals through the literal
//! renderer, references as an access path built from their context chain,
//! inline statements as nested expressions.

use kiln_diagnostic::Problem;
use kiln_ir::{
    Category, FieldFlags, FieldOwner, Reflection, StatementKind, StmtId, TermId, TerminalKind,
    Value, ValueType,
};

use crate::cpp_types::cpp_type;
use crate::function::FunctionLowerer;

impl FunctionLowerer<'_, '_> {
    /// Expression text for `id`. References whose context can be null
    /// render as `((guard) ? (path) : (default))`.
    pub(crate) fn render_term(&mut self, id: TermId) -> String {
        self.render_term_with(id, true)
    }

    /// Expression text without the null-safety ternary; used for
    /// assignment targets and inside guards.
    pub(crate) fn render_term_unguarded(&mut self, id: TermId) -> String {
        self.render_term_with(id, false)
    }

    fn render_term_with(&mut self, id: TermId, safe: bool) -> String {
        let ir = self.ir;
        let term = ir.term(id);
        match &term.kind {
            TerminalKind::SelfRef => String::from("this"),
            TerminalKind::Literal(value) => self.render_literal(&term.ty, value),
            TerminalKind::Inline(stmt) => self.render_inline(*stmt),
            TerminalKind::Reference { .. } => {
                let path = self.reference_path(id);
                if safe {
                    if let Some(condition) = self.guard_condition(term.context) {
                        let default = self.cx.literals().default_text(&term.ty);
                        return format!("(({condition}) ? ({path}) : ({default}))");
                    }
                }
                path
            }
        }
    }

    /// Literal text; unrenderable values fall back to the type's default.
    pub(crate) fn render_literal(&mut self, ty: &ValueType, value: &Value) -> String {
        let literals = self.cx.literals();
        match literals.render(ty, value) {
            Ok(text) => text,
            Err(problem) => {
                self.sink.report(problem);
                literals.default_text(ty)
            }
        }
    }

    /// `ctx->Field`, `ctx.Field` or a class-default read, context first.
    fn reference_path(&mut self, id: TermId) -> String {
        let ir = self.ir;
        let reflect = self.cx.reflect;
        let term = ir.term(id);
        let field = match term.kind {
            TerminalKind::Reference { field } => field,
            _ => None,
        };
        let name = match field {
            Some(field) => reflect.field_name(field),
            None => self.cx.resolve(term.name),
        };

        let Some(context_id) = term.context else {
            return name.to_owned();
        };
        let context = ir.term(context_id);
        if context.is_self() {
            return name.to_owned();
        }

        let context_text = self.render_term_unguarded(context_id);
        if context.ty.is_value_type() {
            return format!("{context_text}.{name}");
        }
        if context.ty.category == Category::Class && !context.ty.is_array() {
            // Class defaults are read from the owner of the field.
            let owner = field
                .and_then(|f| match reflect.field(f).owner {
                    FieldOwner::Type(owner) => Some(owner),
                    FieldOwner::Function(_) => None,
                })
                .or(context.ty.sub_type);
            if let Some(owner) = owner {
                return format!(
                    "GetDefaultValueSafe<{}>({context_text})->{name}",
                    reflect.cpp_name(owner)
                );
            }
            tracing::warn!(field = name, "class-default read without an owner class");
        }
        format!("{context_text}->{name}")
    }

    fn render_inline(&mut self, stmt_id: StmtId) -> String {
        let ir = self.ir;
        let stmt = ir.stmt(stmt_id);
        match &stmt.kind {
            StatementKind::SwitchOnValue => self.switch_value_expression(stmt_id),
            StatementKind::Call => self.call_expression(stmt_id),
            other => {
                self.sink.report(Problem::UnsupportedInlineStatement {
                    kind: other.label(),
                });
                String::new()
            }
        }
    }

    /// `TSwitchValue(index, default, N, TSwitchPair<I, V>(k, v), ...)`.
    ///
    /// Operands: index, then `(key, value)` per case, then the default.
    fn switch_value_expression(&mut self, stmt_id: StmtId) -> String {
        let ir = self.ir;
        let stmt = ir.stmt(stmt_id);
        let (Some(&index), Some(&default), true) =
            (stmt.rhs.first(), stmt.rhs.last(), stmt.rhs.len() >= 2)
        else {
            self.sink.report(Problem::UnsupportedInlineStatement {
                kind: stmt.kind.label(),
            });
            return String::new();
        };
        let cases = &stmt.rhs[1..stmt.rhs.len() - 1];
        let case_count = cases.len() / 2;

        let index_type = cpp_type(self.cx.reflect, &ir.term(index).ty);
        let value_type = cpp_type(self.cx.reflect, &ir.term(default).ty);
        let mut result = format!(
            "TSwitchValue({}, {}, {case_count}",
            self.render_term(index),
            self.render_term(default)
        );
        for pair in cases.chunks_exact(2) {
            let key = self.render_term(pair[0]);
            let value = self.render_term(pair[1]);
            result.push_str(&format!(
                ", TSwitchPair<{index_type}, {value_type}>({key}, {value})"
            ));
        }
        result.push(')');
        result
    }

    /// Latent-action info literal with its resume state patched in.
    pub(crate) fn latent_info_text(&mut self, term_id: TermId, state: i32) -> String {
        let ir = self.ir;
        let reflect = self.cx.reflect;
        let term = ir.term(term_id);
        let TerminalKind::Literal(Value::Struct(info)) = &term.kind else {
            return self.render_term(term_id);
        };
        let mut info = info.clone();
        let fields = reflect.all_fields(info.ty);
        if let Some(slot) = fields
            .iter()
            .position(|&f| reflect.field(f).flags.contains(FieldFlags::NEEDS_LATENT_FIXUP))
        {
            if let Some(value) = info.fields.get_mut(slot) {
                *value = Value::Int(state);
            }
        }
        self.render_literal(&term.ty, &Value::Struct(info))
    }
}

/// Cast wrapped around a value of type `from` stored into `to`.
///
/// Raw bytes convert to and from enums with `static_cast`; object
/// references narrow with `Cast<T>` when `to` is a strict subclass.
pub(crate) fn automatic_cast(
    reflect: &dyn Reflection,
    to: &ValueType,
    from: &ValueType,
) -> (String, &'static str) {
    if to.is_enum() && from.is_plain_byte() {
        return (format!("static_cast<{}>(", cpp_type(reflect, to)), ")");
    }
    if to.is_plain_byte() && from.is_enum() {
        return (String::from("static_cast<uint8>("), ")");
    }
    if to.category == Category::Object && from.category == Category::Object && !to.is_array() {
        if let (Some(narrow), Some(wide)) = (to.sub_type, from.sub_type) {
            if reflect.is_strict_child_of(narrow, wide) {
                return (format!("Cast<{}>(", reflect.cpp_name(narrow)), ")");
            }
        }
    }
    (String::new(), "")
}

#[cfg(test)]
mod tests;
