//! Literal rendering.
//!
//! Turns a typed [`Value`] into target-language literal syntax. Used by the
//! term renderer for literal terminals and by the object-graph emitter for
//! single-line field values.

use kiln_diagnostic::Problem;
use kiln_ir::{
    Category, ObjectArena, Reflection, StructValue, TypeFlags, TypeId, TypeKind, Value,
    ValueType, WellKnownStruct,
};

use crate::cpp_types::cpp_type;

pub struct LiteralRenderer<'a> {
    reflect: &'a dyn Reflection,
    objects: &'a ObjectArena,
}

impl<'a> LiteralRenderer<'a> {
    pub fn new(reflect: &'a dyn Reflection, objects: &'a ObjectArena) -> Self {
        Self { reflect, objects }
    }

    /// Literal text for `value` declared as `ty`.
    pub fn render(&self, ty: &ValueType, value: &Value) -> Result<String, Problem> {
        if ty.is_self {
            return Ok(String::from("this"));
        }
        if ty.is_array() {
            return self.render_array(ty, value);
        }
        match (ty.category, value) {
            (Category::Bool, Value::Bool(b)) => Ok(b.to_string()),
            (Category::Int, Value::Int(i)) => Ok(i.to_string()),
            (Category::Float, Value::Float(f)) => Ok(float_literal(*f)),
            (Category::Byte, Value::Byte(raw)) => match ty.sub_type {
                Some(enum_ty) if self.reflect.type_desc(enum_ty).kind == TypeKind::Enum => {
                    let entry = self
                        .reflect
                        .enum_entry_name(enum_ty, *raw)
                        .ok_or_else(|| self.unrenderable(ty))?;
                    Ok(format!("{}::{entry}", self.reflect.cpp_name(enum_ty)))
                }
                _ => Ok(raw.to_string()),
            },
            (Category::String, Value::String(s)) => Ok(format!("TEXT(\"{}\")", escape(s))),
            (Category::Text, Value::Text(s)) => {
                Ok(format!("FText::FromString(TEXT(\"{}\"))", escape(s)))
            }
            (Category::Name, Value::Name(name)) => {
                let text = self.reflect.resolve(*name);
                if text.is_empty() || text == "None" {
                    Ok(String::from("FName()"))
                } else {
                    Ok(format!("FName(TEXT(\"{}\"))", escape(text)))
                }
            }
            (Category::Struct, Value::Struct(sv)) => self.render_struct(sv),
            (Category::Class, Value::Class(class)) => Ok(class.map_or_else(
                || String::from("nullptr"),
                |c| format!("{}::StaticClass()", self.reflect.cpp_name(c)),
            )),
            (Category::Object, Value::Object(obj)) => Ok(match obj {
                Some(obj) => format!(
                    "LoadObject<{}>(nullptr, TEXT(\"{}\"))",
                    self.reflect.cpp_name(self.objects.get(*obj).class),
                    escape(&self.objects.path_name(*obj, self.reflect))
                ),
                None => String::from("nullptr"),
            }),
            (Category::Interface, Value::Object(None))
            | (Category::SoftObject, Value::SoftObject(None))
            | (Category::SoftClass, Value::SoftClass(None)) => Ok(String::from("nullptr")),
            (Category::SoftObject, Value::SoftObject(Some(obj))) => Ok(format!(
                "FStringAssetReference(TEXT(\"{}\"))",
                escape(&self.objects.path_name(*obj, self.reflect))
            )),
            (Category::SoftClass, Value::SoftClass(Some(class))) => Ok(format!(
                "FStringAssetReference(TEXT(\"{}\"))",
                escape(&self.class_path(*class))
            )),
            _ => Err(self.unrenderable(ty)),
        }
    }

    /// Literal text of the default value of `ty`; never fails.
    pub fn default_text(&self, ty: &ValueType) -> String {
        if ty.is_self {
            return String::from("this");
        }
        self.render(ty, &self.reflect.default_value(ty))
            .unwrap_or_else(|_| format!("{}()", cpp_type(self.reflect, ty)))
    }

    fn unrenderable(&self, ty: &ValueType) -> Problem {
        Problem::UnrenderableLiteral {
            ty: cpp_type(self.reflect, ty),
        }
    }

    fn class_path(&self, class: TypeId) -> String {
        let desc = self.reflect.type_desc(class);
        format!(
            "{}.{}",
            self.reflect.resolve(desc.package),
            self.reflect.resolve(desc.name)
        )
    }

    fn render_array(&self, ty: &ValueType, value: &Value) -> Result<String, Problem> {
        let Value::Array(items) = value else {
            return Err(self.unrenderable(ty));
        };
        let element = ty.element();
        if items.is_empty() {
            return Ok(format!("{}()", cpp_type(self.reflect, ty)));
        }
        let rendered = items
            .iter()
            .map(|item| self.render(&element, item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{}{{{}}}", cpp_type(self.reflect, ty), rendered.join(", ")))
    }

    /// Well-known structs spell out every component. Other structs only
    /// have a literal form when they hold their type's default value.
    pub fn render_struct(&self, sv: &StructValue) -> Result<String, Problem> {
        let desc = self.reflect.type_desc(sv.ty);
        let ty = ValueType::structure(sv.ty);
        let bad = || self.unrenderable(&ty);
        let Some(kind) = desc.well_known else {
            if !sv.identical(&self.reflect.struct_default(sv.ty)) {
                return Err(bad());
            }
            let name = self.reflect.cpp_name(sv.ty);
            return Ok(if desc.flags.contains(TypeFlags::USER_DEFINED) {
                format!("{name}::GetDefaultValue()")
            } else {
                format!("{name}{{}}")
            });
        };
        match kind {
            WellKnownStruct::Vector => {
                let [x, y, z] = floats(sv).ok_or_else(bad)?.map(float_literal);
                Ok(format!("FVector({x},{y},{z})"))
            }
            WellKnownStruct::Vector2D => {
                let [x, y] = floats(sv).ok_or_else(bad)?.map(float_literal);
                Ok(format!("FVector2D({x},{y})"))
            }
            WellKnownStruct::Rotator => {
                let [p, y, r] = floats(sv).ok_or_else(bad)?.map(float_literal);
                Ok(format!("FRotator({p},{y},{r})"))
            }
            WellKnownStruct::Quat => {
                let [x, y, z, w] = floats(sv).ok_or_else(bad)?.map(float_literal);
                Ok(format!("FQuat({x},{y},{z},{w})"))
            }
            WellKnownStruct::LinearColor => {
                let [r, g, b, a] = floats(sv).ok_or_else(bad)?.map(float_literal);
                Ok(format!("FLinearColor({r},{g},{b},{a})"))
            }
            WellKnownStruct::Transform => {
                let [Value::Struct(rot), Value::Struct(pos), Value::Struct(scale)] =
                    sv.fields.as_slice()
                else {
                    return Err(bad());
                };
                let [qx, qy, qz, qw] = floats(rot).ok_or_else(bad)?.map(float_literal);
                let [px, py, pz] = floats(pos).ok_or_else(bad)?.map(float_literal);
                let [sx, sy, sz] = floats(scale).ok_or_else(bad)?.map(float_literal);
                Ok(format!(
                    "FTransform( FQuat({qx},{qy},{qz},{qw}), FVector({px},{py},{pz}), FVector({sx},{sy},{sz}) )"
                ))
            }
            WellKnownStruct::Color => match sv.fields.as_slice() {
                [Value::Byte(r), Value::Byte(g), Value::Byte(b), Value::Byte(a)] => {
                    Ok(format!("FColor({r},{g},{b},{a})"))
                }
                _ => Err(bad()),
            },
            WellKnownStruct::Guid => match sv.fields.as_slice() {
                [Value::Int(a), Value::Int(b), Value::Int(c), Value::Int(d)] => Ok(format!(
                    "FGuid(0x{:08X}, 0x{:08X}, 0x{:08X}, 0x{:08X})",
                    bits(*a),
                    bits(*b),
                    bits(*c),
                    bits(*d)
                )),
                _ => Err(bad()),
            },
            WellKnownStruct::LatentActionInfo => match sv.fields.as_slice() {
                [Value::Int(linkage), Value::Int(uuid), Value::Name(func), _] => Ok(format!(
                    "FLatentActionInfo({linkage}, {uuid}, TEXT(\"{}\"), this)",
                    escape(self.reflect.resolve(*func))
                )),
                _ => Err(bad()),
            },
        }
    }
}

fn floats<const N: usize>(sv: &StructValue) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    if sv.fields.len() != N {
        return None;
    }
    for (slot, value) in out.iter_mut().zip(&sv.fields) {
        let Value::Float(f) = value else {
            return None;
        };
        *slot = *f;
    }
    Some(out)
}

/// `1.500000`; non-finite values use the C math macros.
pub fn float_literal(value: f32) -> String {
    if value.is_nan() {
        String::from("NAN")
    } else if value.is_infinite() {
        String::from(if value < 0.0 { "-INFINITY" } else { "INFINITY" })
    } else {
        format!("{value:.6}")
    }
}

fn bits(value: i32) -> u32 {
    u32::from_ne_bytes(value.to_ne_bytes())
}

/// Escape for a C++ string literal.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
