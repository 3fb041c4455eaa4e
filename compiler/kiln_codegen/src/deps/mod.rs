//! Dependency gathering for one unit.
//!
//! Walks everything the generated code names and splits it by where it is
//! named: the declaration surface (super type, interfaces, field, parameter
//! and return types) needs its headers in the declaration blob; anything
//! reached only from bodies and defaults (statement terminals, callee owners,
//! default-object values) is included from the implementation blob.
//!
//! Well-known core structs come with the engine prelude and are never
//! listed.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use kiln_ir::{
    FunctionId, ObjectId, Outer, TerminalKind, TypeId, UnitIr, Value, ValueType,
};

use crate::stack::ensure_sufficient_stack;
use crate::UnitContext;

/// Something the generated unit refers to by name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dependency {
    Type(TypeId),
    /// Asset loaded by path.
    Object(ObjectId),
}

impl Dependency {
    /// Package-qualified name; unique per entity and used for ordering.
    pub fn stable_name(self, cx: &UnitContext<'_>) -> String {
        match self {
            Dependency::Type(ty) => {
                let desc = cx.reflect.type_desc(ty);
                format!("{}.{}", cx.resolve(desc.package), cx.resolve(desc.name))
            }
            Dependency::Object(object) => cx.objects.path_name(object, cx.reflect),
        }
    }
}

/// Dependencies of a unit, each list sorted by stable name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub header: Vec<Dependency>,
    pub implementation: Vec<Dependency>,
}

impl Dependencies {
    /// `#include` lines for the declaration blob.
    pub fn header_includes(&self, cx: &UnitContext<'_>) -> Vec<String> {
        includes(cx, &self.header)
    }

    /// `#include` lines for the implementation blob.
    pub fn implementation_includes(&self, cx: &UnitContext<'_>) -> Vec<String> {
        includes(cx, &self.implementation)
    }
}

fn includes(cx: &UnitContext<'_>, deps: &[Dependency]) -> Vec<String> {
    deps.iter()
        .filter_map(|dep| match *dep {
            Dependency::Type(ty) => Some(format!("#include \"{}.h\"", cx.reflect.type_name(ty))),
            Dependency::Object(_) => None,
        })
        .collect()
}

/// Collect the header and implementation dependencies of `unit`.
pub fn gather(cx: &UnitContext<'_>, unit: &UnitIr) -> Dependencies {
    let reflect = cx.reflect;
    let desc = reflect.type_desc(unit.ty);

    let mut header = Collector::new(*cx);
    if let Some(parent) = desc.super_type {
        header.add(Dependency::Type(parent));
    }
    for &interface in &desc.interfaces {
        header.add(Dependency::Type(interface));
    }
    for &field in reflect.own_fields(unit.ty) {
        header.value_type(&reflect.field(field).ty);
    }
    for &func in &desc.functions {
        header.signature(func);
    }

    let mut body = Collector::new(*cx);
    for function in &unit.functions {
        for local in &function.locals {
            body.value_type(&local.ty);
        }
        for term in &function.terms {
            body.value_type(&term.ty);
            if let TerminalKind::Literal(value) = &term.kind {
                body.value(value);
            }
        }
        for stmt in &function.statements {
            if let Some(callee) = stmt.function {
                body.add(Dependency::Type(reflect.function(callee).owner));
            }
        }
    }
    if let Some(cdo) = desc.default_object {
        body.object_values(cdo);
    }
    for &owned in &desc.owned_objects {
        body.object_values(owned);
    }
    if let Some(defaults) = &desc.struct_defaults {
        for value in &defaults.fields {
            body.value(value);
        }
    }

    let header = header.finish(unit.ty, &FxHashSet::default());
    let seen: FxHashSet<Dependency> = header.iter().copied().collect();
    let implementation = body.finish(unit.ty, &seen);
    tracing::debug!(
        unit = reflect.type_name(unit.ty),
        header = header.len(),
        implementation = implementation.len(),
        "gathered dependencies"
    );
    Dependencies {
        header,
        implementation,
    }
}

/// Transitive walk with its own visited sets; one per partition.
struct Collector<'a> {
    cx: UnitContext<'a>,
    found: BTreeMap<String, Dependency>,
    types: FxHashSet<TypeId>,
    signatures: FxHashSet<FunctionId>,
    objects: FxHashSet<ObjectId>,
}

impl<'a> Collector<'a> {
    fn new(cx: UnitContext<'a>) -> Self {
        Self {
            cx,
            found: BTreeMap::new(),
            types: FxHashSet::default(),
            signatures: FxHashSet::default(),
            objects: FxHashSet::default(),
        }
    }

    fn add(&mut self, dep: Dependency) {
        if let Dependency::Type(ty) = dep {
            if self.cx.reflect.type_desc(ty).well_known.is_some() || !self.types.insert(ty) {
                return;
            }
        }
        self.found.entry(dep.stable_name(&self.cx)).or_insert(dep);
    }

    fn value_type(&mut self, ty: &ValueType) {
        if ty.is_self {
            return;
        }
        if let Some(sub) = ty.sub_type {
            self.add(Dependency::Type(sub));
        }
        if let Some(signature) = ty.signature {
            self.signature(signature);
        }
    }

    /// Parameter and return types of a function or delegate signature.
    fn signature(&mut self, func: FunctionId) {
        if !self.signatures.insert(func) {
            return;
        }
        let reflect = self.cx.reflect;
        for &param in &reflect.function(func).params {
            self.value_type(&reflect.field(param).ty);
        }
    }

    fn value(&mut self, value: &Value) {
        ensure_sufficient_stack(|| match value {
            Value::Object(Some(object)) | Value::SoftObject(Some(object)) => self.object(*object),
            Value::Delegate(Some((object, _))) => self.object(*object),
            Value::Class(Some(ty)) | Value::SoftClass(Some(ty)) => self.add(Dependency::Type(*ty)),
            Value::Struct(sv) => {
                self.add(Dependency::Type(sv.ty));
                for member in &sv.fields {
                    self.value(member);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.value(item);
                }
            }
            _ => {}
        });
    }

    /// Owned sub-objects are re-created in code, so their values matter;
    /// anything else is an asset loaded by path.
    fn object(&mut self, object: ObjectId) {
        if !self.objects.insert(object) {
            return;
        }
        let class = self.cx.objects.get(object).class;
        self.add(Dependency::Type(class));
        if self.is_owned_by_unit(object) {
            self.object_values(object);
        } else {
            self.add(Dependency::Object(object));
        }
    }

    fn object_values(&mut self, object: ObjectId) {
        self.objects.insert(object);
        let objects = self.cx.objects;
        for value in objects.get(object).values.values() {
            self.value(value);
        }
    }

    fn is_owned_by_unit(&self, object: ObjectId) -> bool {
        let unit = self.cx.unit;
        let cdo = self.cx.reflect.type_desc(unit).default_object;
        let mut cursor = self.cx.objects.get(object).outer;
        loop {
            match cursor {
                Outer::Type(ty) => return ty == unit,
                Outer::Object(outer) if Some(outer) == cdo => return true,
                Outer::Object(outer) => cursor = self.cx.objects.get(outer).outer,
                Outer::Package(_) => return false,
            }
        }
    }

    /// Sorted dependencies minus the unit itself and anything in `exclude`.
    fn finish(self, unit: TypeId, exclude: &FxHashSet<Dependency>) -> Vec<Dependency> {
        self.found
            .into_values()
            .filter(|dep| *dep != Dependency::Type(unit) && !exclude.contains(dep))
            .collect()
    }
}
