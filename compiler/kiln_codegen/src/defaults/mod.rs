//! Object-graph and default-value emission.
//!
//! Reconstructs live objects as constructor code: every field whose value
//! differs from the archetype becomes one or more assignments, sub-objects
//! owned by the object (or by the generated class) are re-created and bound
//! to locals.
//!
//! ```text
//! auto __Local__ = NewObject<UCurveFloat>(GetClass(), TEXT("Fade"));
//! GetClass()->MiscObjects.Add(__Local__);
//! __Local__->Duration = 2.000000;
//! Slots.Reserve(2);
//! Slots.Add(FSlot::GetDefaultValue());
//! Slots[0].Count = 3;
//! ```

mod constructor;
mod struct_factory;

pub use constructor::emit_constructor;
pub use struct_factory::emit_struct_default_factory;

use rustc_hash::{FxHashMap, FxHashSet};

use kiln_diagnostic::{DiagnosticSink, Problem};
use kiln_ir::{
    Category, FieldFlags, FieldId, ObjectId, Outer, StructValue, TypeId, Value, ValueType,
};

use crate::stack::ensure_sufficient_stack;
use crate::{CodeWriter, UnitContext};

const LOCAL_NAME_BASE: &str = "__Local__";

/// Objects already materialized in generated code, by local name.
///
/// Also knows the generated class itself: objects whose outer is that class
/// are created with the class expression as outer and registered through
/// the after-create statement, and so is everything created under them.
#[derive(Debug, Default)]
pub struct LocalNameRegistry {
    names: FxHashMap<ObjectId, String>,
    taken: FxHashSet<String>,
    ordered: Vec<ObjectId>,
    registered: Vec<ObjectId>,
    archetypes: FxHashMap<ObjectId, ObjectId>,
    generated: Option<GeneratedClass>,
}

#[derive(Debug)]
struct GeneratedClass {
    class: TypeId,
    expression: String,
    /// Statement run after creating an object owned by the class; `{local}`
    /// is replaced by the new local's name.
    after_create: String,
}

impl LocalNameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_generated_class(
        &mut self,
        class: TypeId,
        expression: impl Into<String>,
        after_create: impl Into<String>,
    ) {
        self.generated = Some(GeneratedClass {
            class,
            expression: expression.into(),
            after_create: after_create.into(),
        });
    }

    /// Bind an existing object to a fixed expression, e.g. the class default
    /// object to `this`.
    pub fn bind(&mut self, object: ObjectId, expression: impl Into<String>, archetype: Option<ObjectId>) {
        let expression = expression.into();
        self.taken.insert(expression.clone());
        self.names.insert(object, expression);
        if let Some(archetype) = archetype {
            self.archetypes.insert(object, archetype);
        }
    }

    pub fn find(&self, object: ObjectId) -> Option<&str> {
        self.names.get(&object).map(String::as_str)
    }

    /// Expression for `outer` plus the after-create statement when the outer
    /// is the generated class.
    fn find_outer(&self, outer: Outer) -> Option<(String, Option<String>)> {
        match outer {
            Outer::Type(class) => self
                .generated
                .as_ref()
                .filter(|g| g.class == class)
                .map(|g| (g.expression.clone(), Some(g.after_create.clone()))),
            Outer::Object(object) => {
                let after_create = self
                    .generated
                    .as_ref()
                    .filter(|_| self.registered.contains(&object))
                    .map(|g| g.after_create.clone());
                self.find(object).map(|name| (name.to_owned(), after_create))
            }
            Outer::Package(_) => None,
        }
    }

    /// Register `object` under the next free `__Local__` name.
    pub fn add_new(&mut self, object: ObjectId, archetype: Option<ObjectId>) -> String {
        let mut name = String::from(LOCAL_NAME_BASE);
        let mut index = 0;
        while self.taken.contains(&name) {
            name = format!("{LOCAL_NAME_BASE}{index}");
            index += 1;
        }
        self.taken.insert(name.clone());
        self.names.insert(object, name.clone());
        self.ordered.push(object);
        if let Some(archetype) = archetype {
            self.archetypes.insert(object, archetype);
        }
        name
    }

    /// Objects created through [`add_new`](Self::add_new), in creation order.
    pub fn created(&self) -> &[ObjectId] {
        &self.ordered
    }

    /// Objects passed through the after-create statement, in the order it
    /// ran; for the generated class this is their index in its object list.
    pub fn registered(&self) -> &[ObjectId] {
        &self.registered
    }

    fn archetype_of(&self, object: ObjectId) -> Option<ObjectId> {
        self.archetypes.get(&object).copied()
    }
}

/// Result of rendering one value on a single line.
enum OneLine {
    /// The text is the whole value.
    Complete(String),
    /// A struct with no literal form: the text constructs its default and
    /// members must be assigned afterwards.
    Partial(String),
    /// Nothing can be written; already reported.
    Skip,
}

/// Writes field assignments for objects and struct values.
pub struct DefaultValueEmitter<'a, 'r> {
    cx: UnitContext<'a>,
    names: &'r mut LocalNameRegistry,
    out: &'r mut CodeWriter,
    sink: &'r mut DiagnosticSink,
}

impl<'a, 'r> DefaultValueEmitter<'a, 'r> {
    pub fn new(
        cx: UnitContext<'a>,
        names: &'r mut LocalNameRegistry,
        out: &'r mut CodeWriter,
        sink: &'r mut DiagnosticSink,
    ) -> Self {
        Self {
            cx,
            names,
            out,
            sink,
        }
    }

    /// Assign every field of `object` that differs from `archetype`, or from
    /// the field's type default when there is none.
    pub fn emit_object(
        &mut self,
        object: ObjectId,
        archetype: Option<ObjectId>,
        prefix: &str,
        allow_protected: bool,
    ) {
        let reflect = self.cx.reflect;
        let objects = self.cx.objects;
        let class = objects.get(object).class;
        for field in reflect.all_fields(class) {
            let value = objects.field_value(object, field, reflect);
            let base = match archetype {
                Some(archetype) => objects.field_value(archetype, field, reflect),
                None => reflect.field_default(field),
            };
            self.emit_field(field, &value, Some(&base), prefix, allow_protected);
        }
    }

    /// Assignments for one field; static arrays are handled element-wise.
    pub fn emit_field(
        &mut self,
        field: FieldId,
        value: &Value,
        archetype: Option<&Value>,
        prefix: &str,
        allow_protected: bool,
    ) {
        let reflect = self.cx.reflect;
        let desc = reflect.field(field);
        let name = reflect.field_name(field);
        if desc.flags.intersects(FieldFlags::EDITOR_ONLY | FieldFlags::TRANSIENT) {
            tracing::debug!(field = name, "skipping editor-only or transient field");
            return;
        }

        let dim = desc.array_dim.max(1) as usize;
        for index in 0..dim {
            let element = if dim > 1 { value.static_element(index) } else { Some(value) };
            let Some(element) = element else {
                continue;
            };
            let base = archetype.and_then(|a| if dim > 1 { a.static_element(index) } else { Some(a) });
            let instanced =
                desc.flags.contains(FieldFlags::INSTANCED) && element.as_object().is_some();
            if base.is_some_and(|b| element.identical(b)) && !instanced {
                continue;
            }

            if desc.flags.contains(FieldFlags::PRIVATE)
                || (!allow_protected && desc.flags.contains(FieldFlags::PROTECTED))
            {
                tracing::error!(field = name, "cannot write inaccessible field");
                self.sink.report(Problem::InaccessibleField {
                    field: name.to_owned(),
                });
                return;
            }

            let path = if dim > 1 {
                format!("{prefix}{name}[{index}]")
            } else {
                format!("{prefix}{name}")
            };
            self.emit_value(&desc.ty, element, base, &path);
        }
    }

    /// Assignments making `path` hold `value`.
    fn emit_value(&mut self, ty: &ValueType, value: &Value, archetype: Option<&Value>, path: &str) {
        ensure_sufficient_stack(|| {
            if ty.is_array() {
                self.emit_array(ty, value, archetype, path);
                return;
            }
            match self.one_line(ty, value) {
                OneLine::Complete(text) => self.out.writeln(&format!("{path} = {text};")),
                OneLine::Partial(text) => {
                    let Value::Struct(sv) = value else {
                        return;
                    };
                    match archetype {
                        Some(Value::Struct(base)) => self.emit_struct_fields(sv, Some(base), path),
                        _ => {
                            self.out.writeln(&format!("{path} = {text};"));
                            let default = self.cx.reflect.struct_default(sv.ty);
                            self.emit_struct_fields(sv, Some(&default), path);
                        }
                    }
                }
                OneLine::Skip => {}
            }
        });
    }

    fn emit_array(&mut self, ty: &ValueType, value: &Value, archetype: Option<&Value>, path: &str) {
        let Value::Array(items) = value else {
            return;
        };
        if matches!(archetype, Some(Value::Array(base)) if !base.is_empty()) {
            self.out.writeln(&format!("{path}.Empty();"));
        }
        if items.is_empty() {
            return;
        }
        self.out.writeln(&format!("{path}.Reserve({});", items.len()));
        let element = ty.element();
        for (index, item) in items.iter().enumerate() {
            match self.one_line(&element, item) {
                OneLine::Complete(text) => self.out.writeln(&format!("{path}.Add({text});")),
                OneLine::Partial(text) => {
                    self.out.writeln(&format!("{path}.Add({text});"));
                    if let Value::Struct(sv) = item {
                        let default = self.cx.reflect.struct_default(sv.ty);
                        self.emit_struct_fields(sv, Some(&default), &format!("{path}[{index}]"));
                    }
                }
                OneLine::Skip => {}
            }
        }
    }

    /// Member-wise assignments of a struct value under `path.`.
    fn emit_struct_fields(&mut self, value: &StructValue, archetype: Option<&StructValue>, path: &str) {
        let prefix = format!("{path}.");
        let fields = self.cx.reflect.all_fields(value.ty);
        for (slot, field) in fields.into_iter().enumerate() {
            let Some(member) = value.fields.get(slot) else {
                continue;
            };
            let base = archetype.and_then(|a| a.fields.get(slot));
            self.emit_field(field, member, base, &prefix, false);
        }
    }

    fn one_line(&mut self, ty: &ValueType, value: &Value) -> OneLine {
        if ty.category == Category::Object {
            if let Some(object) = value.as_object() {
                if let Some(name) = self.names.find(object) {
                    return OneLine::Complete(name.to_owned());
                }
                if let Some(local) = self.emit_subobject(object) {
                    return OneLine::Complete(local);
                }
            }
        }

        let literals = self.cx.literals();
        match literals.render(ty, value) {
            Ok(text) => OneLine::Complete(text),
            Err(_) if ty.category == Category::Struct => OneLine::Partial(literals.default_text(ty)),
            Err(problem) => {
                self.sink.report(problem);
                OneLine::Skip
            }
        }
    }

    /// Re-create `object` when its outer is already materialized; returns
    /// the new local.
    pub fn emit_subobject(&mut self, object: ObjectId) -> Option<String> {
        let reflect = self.cx.reflect;
        let objects = self.cx.objects;
        let data = objects.get(object);
        let (outer, after_create) = self.names.find_outer(data.outer)?;

        // Archetype: the matching sub-object of the outer's archetype, else
        // the class default object.
        let archetype = match data.outer {
            Outer::Object(owner) => self
                .names
                .archetype_of(owner)
                .and_then(|base| objects.find_subobject(base, data.name, data.class)),
            Outer::Type(_) | Outer::Package(_) => None,
        }
        .or(reflect.type_desc(data.class).default_object);

        let local = self.names.add_new(object, archetype);
        let class = reflect.cpp_name(data.class);
        let name = crate::literal::escape(reflect.resolve(data.name));
        tracing::trace!(local = %local, class = %class, "re-creating sub-object");
        if outer == "this" {
            self.out.writeln(&format!(
                "auto {local} = CreateDefaultSubobject<{class}>(TEXT(\"{name}\"));"
            ));
        } else {
            self.out.writeln(&format!(
                "auto {local} = NewObject<{class}>({outer}, TEXT(\"{name}\"));"
            ));
        }
        if let Some(after_create) = after_create {
            self.out.writeln(&after_create.replace("{local}", &local));
            self.names.registered.push(object);
        }

        self.emit_object(object, archetype, &format!("{local}->"), false);
        Some(local)
    }
}
