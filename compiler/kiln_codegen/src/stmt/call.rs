//! Calls and delegate broadcasts.

use kiln_diagnostic::Problem;
use kiln_ir::{
    FieldFlags, FunctionFlags, FunctionId, Reflection, StmtId, TypeKind, WellKnownStruct,
};

use crate::function::{is_native_event, FunctionLowerer};
use crate::term::automatic_cast;

/// Bodies generated through `FCustomThunkTemplates` instead of the owner.
pub(crate) fn is_custom_thunk(reflect: &dyn Reflection, func: FunctionId) -> bool {
    let desc = reflect.function(func);
    desc.flags.contains(FunctionFlags::CUSTOM_THUNK)
        || ["CustomThunk", "CustomStructureParam", "ArrayParm"]
            .iter()
            .any(|key| desc.metadata.contains(key))
}

impl FunctionLowerer<'_, '_> {
    pub(super) fn lower_call(&mut self, id: StmtId) {
        let ir = self.ir;
        let reflect = self.cx.reflect;
        let stmt = ir.stmt(id);
        let Some(func) = stmt.function else {
            self.malformed(id);
            return;
        };

        let returns = reflect.return_fields(func);
        if returns.len() > 1 {
            self.sink.report(Problem::DuplicateReturnProperty {
                function: reflect.function_name(func).to_owned(),
            });
        }

        let call = self.call_expression(id);
        let assignment = match (returns.first(), stmt.lhs) {
            (Some(&ret), Some(lhs)) => {
                let (begin, end) =
                    automatic_cast(reflect, &ir.term(lhs).ty, &reflect.field(ret).ty);
                Some((lhs, format!("{begin}{call}{end}")))
            }
            (Some(_), None) => {
                self.sink.report(Problem::MissingReturnProperty {
                    function: reflect.function_name(func).to_owned(),
                });
                None
            }
            (None, _) => None,
        };

        let is_static = reflect.function(func).flags.contains(FunctionFlags::STATIC);
        let context = if is_static { None } else { stmt.context };
        self.guarded(context, |this| match assignment {
            Some((lhs, value)) => {
                let target = this.render_term_unguarded(lhs);
                this.out.writeln(&format!("{target} = {value};"));
            }
            None => this.out.writeln(&format!("{call};")),
        });
    }

    /// Call text without the trailing semicolon.
    pub(crate) fn call_expression(&mut self, id: StmtId) -> String {
        let ir = self.ir;
        let reflect = self.cx.reflect;
        let stmt = ir.stmt(id);
        let Some(func) = stmt.function else {
            self.sink.report(Problem::UnsupportedInlineStatement {
                kind: stmt.kind.label(),
            });
            return String::new();
        };
        let desc = reflect.function(func);
        let name = reflect.function_name(func);
        let args = self.call_arguments(id, func);

        if stmt.is_parent_call {
            let suffix = if is_native_event(reflect, func) {
                "_Implementation"
            } else {
                ""
            };
            return format!("Super::{name}{suffix}({args})");
        }

        if desc.flags.contains(FunctionFlags::STATIC) {
            let owner = if is_custom_thunk(reflect, func) {
                String::from("FCustomThunkTemplates")
            } else {
                reflect.cpp_name(desc.owner)
            };
            return format!("{owner}::{name}({args})");
        }

        let context = stmt.context.filter(|&c| !ir.term(c).is_self());
        if reflect.type_desc(desc.owner).kind == TypeKind::Interface {
            let object = match context {
                Some(c) => format!("{}.GetObject()", self.render_term_unguarded(c)),
                None => String::from("this"),
            };
            let separator = if args.is_empty() { "" } else { ", " };
            return format!(
                "{}::Execute_{name}({object}{separator}{args})",
                reflect.interface_cpp_name(desc.owner)
            );
        }

        match context {
            Some(c) => format!("{}->{name}({args})", self.render_term_unguarded(c)),
            None => format!("{name}({args})"),
        }
    }

    /// Arguments in declaration order, return value excluded.
    fn call_arguments(&mut self, id: StmtId, func: FunctionId) -> String {
        let ir = self.ir;
        let reflect = self.cx.reflect;
        let stmt = ir.stmt(id);
        let params = reflect
            .function(func)
            .params
            .iter()
            .copied()
            .filter(|&p| !reflect.field(p).is_return());

        let mut args = Vec::with_capacity(stmt.rhs.len());
        for (index, (param, &arg)) in params.zip(&stmt.rhs).enumerate() {
            let param = reflect.field(param);
            let resume = stmt
                .target
                .filter(|_| stmt.ubergraph_call_index == Some(index));
            let text = if let Some(label) = resume {
                let state = self.ubergraph_state(label);
                let is_latent_info = param.ty.sub_type.is_some_and(|ty| {
                    reflect.type_desc(ty).well_known == Some(WellKnownStruct::LatentActionInfo)
                });
                if is_latent_info {
                    self.latent_info_text(arg, state)
                } else {
                    state.to_string()
                }
            } else if param.flags.contains(FieldFlags::OUT_PARAM) {
                format!("/*out*/ {}", self.render_term_unguarded(arg))
            } else {
                let (begin, end) = automatic_cast(reflect, &param.ty, &ir.term(arg).ty);
                format!("{begin}{}{end}", self.render_term(arg))
            };
            args.push(text);
        }
        args.join(", ")
    }

    pub(super) fn lower_call_delegate(&mut self, id: StmtId) {
        let ir = self.ir;
        let stmt = ir.stmt(id);
        let Some(delegate) = stmt.context else {
            self.malformed(id);
            return;
        };
        let args = stmt
            .rhs
            .iter()
            .map(|&arg| self.render_term(arg))
            .collect::<Vec<_>>()
            .join(", ");
        let context = ir.term(delegate).context;
        self.guarded(context, |this| {
            let target = this.render_term_unguarded(delegate);
            this.out.writeln(&format!("{target}.Broadcast({args});"));
        });
    }
}
