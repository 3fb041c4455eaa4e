//! Field values of live objects and literal terminals.

use crate::{Name, ObjectId, TypeId};

/// A value as stored in an object field, a struct member or a literal.
///
/// Enum values are `Byte`s whose declared type names the enum.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Bool(bool),
    Byte(u8),
    Int(i32),
    Float(f32),
    Name(Name),
    String(String),
    Text(String),
    Struct(StructValue),
    Array(Vec<Value>),
    Object(Option<ObjectId>),
    Class(Option<TypeId>),
    SoftObject(Option<ObjectId>),
    SoftClass(Option<TypeId>),
    /// Bound object and function name.
    Delegate(Option<(ObjectId, Name)>),
}

/// Struct value with members aligned to the struct's `all_fields` order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct StructValue {
    pub ty: TypeId,
    pub fields: Vec<Value>,
}

impl Value {
    /// Exact structural identity. Floats compare by bit pattern, so `-0.0`
    /// differs from `0.0` and a NaN is identical to the same NaN.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Struct(a), Value::Struct(b)) => a.identical(b),
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.identical(y))
            }
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Name(a), Value::Name(b)) => a == b,
            (Value::String(a), Value::String(b)) | (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Object(a), Value::Object(b)) | (Value::SoftObject(a), Value::SoftObject(b)) => {
                a == b
            }
            (Value::Class(a), Value::Class(b)) | (Value::SoftClass(a), Value::SoftClass(b)) => a == b,
            (Value::Delegate(a), Value::Delegate(b)) => a == b,
            _ => false,
        }
    }

    /// Referenced object, if this is a non-null object reference.
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Value::Object(id) => *id,
            _ => None,
        }
    }

    /// Element `index` of a static array value; scalars answer for index 0.
    pub fn static_element(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(items) => items.get(index),
            other if index == 0 => Some(other),
            _ => None,
        }
    }
}

impl StructValue {
    pub fn identical(&self, other: &StructValue) -> bool {
        self.ty == other.ty
            && self.fields.len() == other.fields.len()
            && self.fields.iter().zip(&other.fields).all(|(a, b)| a.identical(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_identity_is_bitwise() {
        assert!(Value::Float(1.5).identical(&Value::Float(1.5)));
        assert!(!Value::Float(0.0).identical(&Value::Float(-0.0)));
        assert!(Value::Float(f32::NAN).identical(&Value::Float(f32::NAN)));
    }

    #[test]
    fn nested_struct_identity() {
        let a = Value::Struct(StructValue {
            ty: TypeId::new(3),
            fields: vec![Value::Int(1), Value::Array(vec![Value::Float(2.0)])],
        });
        let mut b = a.clone();
        assert!(a.identical(&b));
        if let Value::Struct(s) = &mut b {
            s.fields[1] = Value::Array(vec![Value::Float(2.5)]);
        }
        assert!(!a.identical(&b));
    }

    #[test]
    fn mismatched_variants_differ() {
        assert!(!Value::Int(0).identical(&Value::Byte(0)));
        assert!(!Value::Object(None).identical(&Value::SoftObject(None)));
    }
}
