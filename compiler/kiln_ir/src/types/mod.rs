//! Type, field and function descriptors.
//!
//! The backend never owns reflection data; it reads it through the
//! [`Reflection`] trait. [`TypeRegistry`] is the in-memory implementation the
//! driver builds from its input package.
//!
//! # Architecture
//!
//! All descriptors live in flat arenas indexed by `TypeId`, `FieldId` and
//! `FunctionId`. Function parameters are ordinary fields owned by their
//! function, so parameter types, flags and names share one code path with
//! class fields.

mod flags;
mod registry;

pub use flags::{FieldFlags, FunctionFlags, ObjectFlags, TypeFlags};
pub use registry::{CoreTypes, Reflection, TypeRegistry};

use crate::{Name, ObjectId, StructValue};

// ── ID newtypes ─────────────────────────────────────────────────────

index_newtype! {
    /// Index into the registry's type arena.
    TypeId
}

index_newtype! {
    /// Index into the registry's field arena (class fields and parameters).
    FieldId
}

index_newtype! {
    /// Index into the registry's function arena.
    FunctionId
}

// ── Descriptors ─────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
}

/// Engine structs that render as a single constructor literal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum WellKnownStruct {
    Vector,
    Vector2D,
    Rotator,
    Quat,
    Transform,
    LinearColor,
    Color,
    Guid,
    LatentActionInfo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumEntry {
    pub name: Name,
    pub display_name: Option<String>,
}

/// Ordered key/value metadata attached to a descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`, keeping first-insertion order.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDesc {
    pub name: Name,
    /// Package path the type lives in, e.g. `/Game/Heroes`.
    pub package: Name,
    pub kind: TypeKind,
    pub flags: TypeFlags,
    pub super_type: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    /// Own fields in declaration order.
    pub fields: Vec<FieldId>,
    pub functions: Vec<FunctionId>,
    pub enum_entries: Vec<EnumEntry>,
    pub well_known: Option<WellKnownStruct>,
    /// Class default object (classes only).
    pub default_object: Option<ObjectId>,
    /// Sub-objects owned by the class itself rather than any instance.
    pub owned_objects: Vec<ObjectId>,
    /// Default member values of a struct, aligned with `all_fields`.
    pub struct_defaults: Option<StructValue>,
    pub metadata: Metadata,
    pub doc: Option<String>,
}

impl TypeDesc {
    pub fn new(name: Name, package: Name, kind: TypeKind) -> Self {
        Self {
            name,
            package,
            kind,
            flags: TypeFlags::empty(),
            super_type: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            functions: Vec::new(),
            enum_entries: Vec::new(),
            well_known: None,
            default_object: None,
            owned_objects: Vec::new(),
            struct_defaults: None,
            metadata: Metadata::new(),
            doc: None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldOwner {
    Type(TypeId),
    Function(FunctionId),
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDesc {
    pub owner: FieldOwner,
    pub name: Name,
    pub ty: ValueType,
    pub flags: FieldFlags,
    /// Static array dimension; 1 for scalars.
    pub array_dim: u32,
    /// Notify function called on replication.
    pub rep_notify: Option<Name>,
    pub metadata: Metadata,
}

impl FieldDesc {
    #[inline]
    pub fn is_return(&self) -> bool {
        self.flags.contains(FieldFlags::RETURN_PARAM)
    }

    /// Written by the callee: out parameters that are not the return value.
    #[inline]
    pub fn is_out(&self) -> bool {
        self.flags.contains(FieldFlags::OUT_PARAM) && !self.is_return()
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionDesc {
    pub owner: TypeId,
    pub name: Name,
    /// Parameters in declaration order, including the return value.
    pub params: Vec<FieldId>,
    pub flags: FunctionFlags,
    pub metadata: Metadata,
}

// ── Value types ─────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Bool,
    /// Raw byte; an enum when `sub_type` names an enum descriptor.
    Byte,
    Int,
    Float,
    Name,
    String,
    Text,
    Struct,
    Object,
    Class,
    Interface,
    SoftObject,
    SoftClass,
    Delegate,
    MulticastDelegate,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Container {
    #[default]
    None,
    Array,
}

/// The declared type of a field, parameter or terminal.
///
/// `sub_type` is the struct, enum, interface or object class for categories
/// that need one; for `Class` and `SoftClass` it is the meta class bound.
/// Delegates carry their signature function in `signature`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueType {
    pub category: Category,
    pub sub_type: Option<TypeId>,
    pub signature: Option<FunctionId>,
    pub container: Container,
    /// Refers to the instance the code runs on.
    pub is_self: bool,
}

impl ValueType {
    const fn of(category: Category, sub_type: Option<TypeId>) -> Self {
        Self {
            category,
            sub_type,
            signature: None,
            container: Container::None,
            is_self: false,
        }
    }

    pub const fn bool() -> Self {
        Self::of(Category::Bool, None)
    }

    pub const fn byte() -> Self {
        Self::of(Category::Byte, None)
    }

    pub const fn int() -> Self {
        Self::of(Category::Int, None)
    }

    pub const fn float() -> Self {
        Self::of(Category::Float, None)
    }

    pub const fn name() -> Self {
        Self::of(Category::Name, None)
    }

    pub const fn string() -> Self {
        Self::of(Category::String, None)
    }

    pub const fn text() -> Self {
        Self::of(Category::Text, None)
    }

    pub const fn enumeration(ty: TypeId) -> Self {
        Self::of(Category::Byte, Some(ty))
    }

    pub const fn structure(ty: TypeId) -> Self {
        Self::of(Category::Struct, Some(ty))
    }

    pub const fn object(class: TypeId) -> Self {
        Self::of(Category::Object, Some(class))
    }

    pub const fn class(meta: TypeId) -> Self {
        Self::of(Category::Class, Some(meta))
    }

    pub const fn interface(ty: TypeId) -> Self {
        Self::of(Category::Interface, Some(ty))
    }

    pub const fn soft_object(class: TypeId) -> Self {
        Self::of(Category::SoftObject, Some(class))
    }

    pub const fn soft_class(meta: TypeId) -> Self {
        Self::of(Category::SoftClass, Some(meta))
    }

    pub const fn delegate(signature: FunctionId) -> Self {
        let mut ty = Self::of(Category::Delegate, None);
        ty.signature = Some(signature);
        ty
    }

    pub const fn multicast_delegate(signature: FunctionId) -> Self {
        let mut ty = Self::of(Category::MulticastDelegate, None);
        ty.signature = Some(signature);
        ty
    }

    /// The `self` pin type of `class`.
    pub const fn self_ref(class: TypeId) -> Self {
        let mut ty = Self::of(Category::Object, Some(class));
        ty.is_self = true;
        ty
    }

    #[must_use]
    pub const fn array(self) -> Self {
        let mut ty = self;
        ty.container = Container::Array;
        ty
    }

    /// Element type of an array; the type itself otherwise.
    #[must_use]
    pub const fn element(self) -> Self {
        let mut ty = self;
        ty.container = Container::None;
        ty
    }

    #[inline]
    pub const fn is_array(&self) -> bool {
        matches!(self.container, Container::Array)
    }

    /// Accessed with `.` rather than `->`.
    #[inline]
    pub const fn is_value_type(&self) -> bool {
        matches!(self.category, Category::Struct) && !self.is_array()
    }

    #[inline]
    pub const fn is_enum(&self) -> bool {
        matches!(self.category, Category::Byte) && self.sub_type.is_some() && !self.is_array()
    }

    #[inline]
    pub const fn is_plain_byte(&self) -> bool {
        matches!(self.category, Category::Byte) && self.sub_type.is_none() && !self.is_array()
    }
}
