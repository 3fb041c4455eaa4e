//! Object, class and interface casts.

use kiln_ir::{StatementKind, StmtId, TermId, TerminalKind};

use crate::function::FunctionLowerer;

/// Local holding an interface cast's source object.
const CAST_SOURCE: &str = "CastSource__";

impl FunctionLowerer<'_, '_> {
    /// `dst = Cast<T>(src);` with `T` taken from the destination type.
    pub(super) fn lower_dynamic_cast(&mut self, id: StmtId) {
        let ir = self.ir;
        let stmt = ir.stmt(id);
        let (Some(lhs), Some(&src)) = (stmt.lhs, stmt.rhs.last()) else {
            self.malformed(id);
            return;
        };
        let class = self.cast_class_name(lhs);
        let value = self.render_term(src);
        self.assign_guarded(lhs, format!("Cast<{class}>({value})"));
    }

    /// `dst = DynamicMetaCast(Class, src);`
    pub(super) fn lower_meta_cast(&mut self, id: StmtId) {
        let ir = self.ir;
        let stmt = ir.stmt(id);
        let (Some(lhs), [class, src]) = (stmt.lhs, stmt.rhs.as_slice()) else {
            self.malformed(id);
            return;
        };
        let class = self.render_term(*class);
        let value = self.render_term(*src);
        self.assign_guarded(lhs, format!("DynamicMetaCast({class}, {value})"));
    }

    pub(super) fn lower_interface_to_object(&mut self, id: StmtId) {
        let ir = self.ir;
        let stmt = ir.stmt(id);
        let (Some(lhs), Some(&src)) = (stmt.lhs, stmt.rhs.last()) else {
            self.malformed(id);
            return;
        };
        let class = self.cast_class_name(lhs);
        let value = self.render_term(src);
        self.assign_guarded(lhs, format!("Cast<{class}>({value}.GetObjectRef())"));
    }

    /// Checked conversion into an interface value.
    ///
    /// Operands are the interface class followed by the source. On success
    /// both the object and the interface address are stored; on failure the
    /// destination is cleared. A source that is not a plain variable is
    /// evaluated once into a scoped local.
    pub(super) fn lower_interface_cast(&mut self, id: StmtId) {
        let ir = self.ir;
        let stmt = ir.stmt(id);
        let (Some(lhs), [class, src]) = (stmt.lhs, stmt.rhs.as_slice()) else {
            self.malformed(id);
            return;
        };
        let class = self.render_term(*class);
        let source = self.render_term(*src);
        let source_term = ir.term(*src);
        let plain = match source_term.kind {
            TerminalKind::SelfRef => true,
            TerminalKind::Reference { .. } => source_term.context.is_none(),
            TerminalKind::Literal(_) | TerminalKind::Inline(_) => false,
        };
        let (object, binding) = match (stmt.kind == StatementKind::InterfaceToInterface, plain) {
            (false, true) => (source, None),
            (false, false) => (String::from(CAST_SOURCE), Some(source)),
            (true, _) => (
                String::from(CAST_SOURCE),
                Some(format!("{source}.GetObjectRef()")),
            ),
        };

        let context = ir.term(lhs).context;
        self.guarded(context, |this| {
            let target = this.render_term_unguarded(lhs);
            let out = &mut this.out;
            if let Some(binding) = &binding {
                out.writeln("{");
                out.indent();
                out.writeln(&format!("UObject* {CAST_SOURCE} = {binding};"));
            }
            out.writeln(&format!(
                "if ( IsValid({object}) && {object}->GetClass()->ImplementsInterface({class}) )"
            ));
            out.block(|out| {
                out.writeln(&format!("{target}.SetObject({object});"));
                out.writeln(&format!(
                    "void* IAddress = {object}->GetInterfaceAddress({class});"
                ));
                out.writeln(&format!("{target}.SetInterface(IAddress);"));
            });
            out.writeln("else");
            out.block(|out| out.writeln(&format!("{target}.SetObject(nullptr);")));
            if binding.is_some() {
                out.dedent();
                out.writeln("}");
            }
        });
    }

    fn cast_class_name(&self, lhs: TermId) -> String {
        let reflect = self.cx.reflect;
        self.ir
            .term(lhs)
            .ty
            .sub_type
            .map_or_else(|| String::from("UObject"), |ty| reflect.cpp_name(ty))
    }

    /// `lhs = value;` inside the guard of the destination's context.
    pub(super) fn assign_guarded(&mut self, lhs: TermId, value: String) {
        let context = self.ir.term(lhs).context;
        self.guarded(context, |this| {
            let target = this.render_term_unguarded(lhs);
            this.out.writeln(&format!("{target} = {value};"));
        });
    }
}
