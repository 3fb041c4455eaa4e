//! The `Reflection` capability trait and its in-memory implementation.

use rustc_hash::FxHashMap;

use super::{
    Category, EnumEntry, FieldDesc, FieldFlags, FieldId, FieldOwner, FunctionDesc, FunctionId,
    Metadata, TypeDesc, TypeFlags, TypeId, TypeKind, ValueType, WellKnownStruct,
};
use crate::{Name, StringInterner, StructValue, Value};

/// Read-only access to reflection descriptors.
///
/// Required methods are plain arena lookups; everything else is derived from
/// them. Ids handed to these methods must come from the same implementation.
pub trait Reflection {
    fn type_desc(&self, id: TypeId) -> &TypeDesc;
    fn field(&self, id: FieldId) -> &FieldDesc;
    fn function(&self, id: FunctionId) -> &FunctionDesc;
    fn resolve(&self, name: Name) -> &str;

    fn type_name(&self, id: TypeId) -> &str {
        self.resolve(self.type_desc(id).name)
    }

    fn field_name(&self, id: FieldId) -> &str {
        self.resolve(self.field(id).name)
    }

    fn function_name(&self, id: FunctionId) -> &str {
        self.resolve(self.function(id).name)
    }

    fn own_fields(&self, id: TypeId) -> &[FieldId] {
        &self.type_desc(id).fields
    }

    /// Every field of `id`, super type fields first.
    fn all_fields(&self, id: TypeId) -> Vec<FieldId> {
        let mut chain = vec![id];
        let mut cursor = self.type_desc(id).super_type;
        while let Some(ty) = cursor {
            chain.push(ty);
            cursor = self.type_desc(ty).super_type;
        }
        chain
            .into_iter()
            .rev()
            .flat_map(|ty| self.own_fields(ty).iter().copied())
            .collect()
    }

    /// `id` is `base` or derives from it.
    fn is_child_of(&self, id: TypeId, base: TypeId) -> bool {
        let mut cursor = Some(id);
        while let Some(ty) = cursor {
            if ty == base {
                return true;
            }
            cursor = self.type_desc(ty).super_type;
        }
        false
    }

    fn is_strict_child_of(&self, id: TypeId, base: TypeId) -> bool {
        id != base && self.is_child_of(id, base)
    }

    fn has_type_flag(&self, id: TypeId, flag: TypeFlags) -> bool {
        let mut cursor = Some(id);
        while let Some(ty) = cursor {
            let desc = self.type_desc(ty);
            if desc.flags.contains(flag) {
                return true;
            }
            cursor = desc.super_type;
        }
        false
    }

    /// Name used in generated source: `A`/`U` for classes, `U` for the
    /// interface's reflection class, `F` for structs, bare for enums.
    fn cpp_name(&self, id: TypeId) -> String {
        let desc = self.type_desc(id);
        let name = self.resolve(desc.name);
        match desc.kind {
            TypeKind::Enum => name.to_owned(),
            TypeKind::Struct => format!("F{name}"),
            TypeKind::Interface => format!("U{name}"),
            TypeKind::Class if self.has_type_flag(id, TypeFlags::ACTOR) => format!("A{name}"),
            TypeKind::Class => format!("U{name}"),
        }
    }

    /// Native side of an interface (`IFoo`).
    fn interface_cpp_name(&self, id: TypeId) -> String {
        format!("I{}", self.type_name(id))
    }

    /// Nearest function named `name`: own functions, then interfaces, then
    /// the super type.
    fn find_function(&self, id: TypeId, name: Name) -> Option<FunctionId> {
        let mut cursor = Some(id);
        while let Some(ty) = cursor {
            let desc = self.type_desc(ty);
            let own = desc
                .functions
                .iter()
                .copied()
                .find(|&f| self.function(f).name == name);
            if own.is_some() {
                return own;
            }
            for &iface in &desc.interfaces {
                if let Some(found) = self.find_function(iface, name) {
                    return Some(found);
                }
            }
            cursor = desc.super_type;
        }
        None
    }

    /// The topmost declaration `func` overrides (itself if none).
    fn original_function(&self, func: FunctionId) -> FunctionId {
        let desc = self.function(func);
        let mut result = func;
        let mut cursor = self.type_desc(desc.owner).super_type;
        for &iface in &self.type_desc(desc.owner).interfaces {
            if let Some(found) = self.find_function(iface, desc.name) {
                return found;
            }
        }
        while let Some(ty) = cursor {
            if let Some(found) = self.find_function(ty, desc.name) {
                result = self.original_function(found);
                break;
            }
            cursor = self.type_desc(ty).super_type;
        }
        result
    }

    fn return_fields(&self, func: FunctionId) -> Vec<FieldId> {
        self.function(func)
            .params
            .iter()
            .copied()
            .filter(|&p| self.field(p).is_return())
            .collect()
    }

    fn return_field(&self, func: FunctionId) -> Option<FieldId> {
        self.return_fields(func).first().copied()
    }

    /// Entry name for a raw enum value.
    ///
    /// Out-of-range values map to the trailing `_MAX` sentinel when the enum
    /// declares one, otherwise there is no name.
    fn enum_entry_name(&self, id: TypeId, raw: u8) -> Option<&str> {
        let entries = &self.type_desc(id).enum_entries;
        if let Some(entry) = entries.get(usize::from(raw)) {
            return Some(self.resolve(entry.name));
        }
        entries
            .last()
            .map(|entry| self.resolve(entry.name))
            .filter(|name| name.ends_with("_MAX"))
    }

    /// Default-constructed value of a struct.
    fn struct_default(&self, id: TypeId) -> StructValue {
        if let Some(defaults) = &self.type_desc(id).struct_defaults {
            return defaults.clone();
        }
        StructValue {
            ty: id,
            fields: self
                .all_fields(id)
                .into_iter()
                .map(|f| self.default_value(&self.field(f).ty))
                .collect(),
        }
    }

    /// Default value of a declared type.
    fn default_value(&self, ty: &ValueType) -> Value {
        if ty.is_array() {
            return Value::Array(Vec::new());
        }
        match ty.category {
            Category::Bool => Value::Bool(false),
            Category::Byte => Value::Byte(0),
            Category::Int => Value::Int(0),
            Category::Float => Value::Float(0.0),
            Category::Name => Value::Name(Name::EMPTY),
            Category::String => Value::String(String::new()),
            Category::Text => Value::Text(String::new()),
            Category::Struct => match ty.sub_type {
                Some(id) => Value::Struct(self.struct_default(id)),
                None => Value::Object(None),
            },
            Category::Object | Category::Interface => Value::Object(None),
            Category::Class => Value::Class(None),
            Category::SoftObject => Value::SoftObject(None),
            Category::SoftClass => Value::SoftClass(None),
            Category::Delegate | Category::MulticastDelegate => Value::Delegate(None),
        }
    }

    /// Value a freshly constructed owner holds in `field`; static arrays
    /// repeat the element default.
    fn field_default(&self, field: FieldId) -> Value {
        let desc = self.field(field);
        let scalar = self.default_value(&desc.ty);
        if desc.array_dim > 1 {
            Value::Array(vec![scalar; desc.array_dim as usize])
        } else {
            scalar
        }
    }
}

// ── In-memory registry ──────────────────────────────────────────────

/// Arena-backed [`Reflection`] implementation.
pub struct TypeRegistry {
    interner: StringInterner,
    types: Vec<TypeDesc>,
    fields: Vec<FieldDesc>,
    functions: Vec<FunctionDesc>,
    by_name: FxHashMap<Name, TypeId>,
    package: Name,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let interner = StringInterner::new();
        let package = interner.intern("/Game");
        Self {
            interner,
            types: Vec::new(),
            fields: Vec::new(),
            functions: Vec::new(),
            by_name: FxHashMap::default(),
            package,
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// # Panics
    /// Panics if the interner outgrows `u32`.
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Package assigned to types added from now on.
    pub fn set_package(&mut self, package: &str) {
        self.package = self.interner.intern(package);
    }

    pub fn find_type(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(&self.interner.intern(name)).copied()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> {
        (0..self.types.len()).map(TypeId::from_usize)
    }

    pub fn type_mut(&mut self, id: TypeId) -> &mut TypeDesc {
        &mut self.types[id.index()]
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut FieldDesc {
        &mut self.fields[id.index()]
    }

    pub fn function_mut(&mut self, id: FunctionId) -> &mut FunctionDesc {
        &mut self.functions[id.index()]
    }

    /// # Panics
    /// Panics if the type table outgrows `u32`.
    pub fn add_type(&mut self, desc: TypeDesc) -> TypeId {
        let id = TypeId::from_usize(self.types.len());
        self.by_name.insert(desc.name, id);
        self.types.push(desc);
        id
    }

    fn new_desc(&self, name: &str, kind: TypeKind) -> TypeDesc {
        TypeDesc::new(self.interner.intern(name), self.package, kind)
    }

    /// # Panics
    /// Panics as [`add_type`](Self::add_type) does.
    pub fn add_class(&mut self, name: &str, super_type: Option<TypeId>) -> TypeId {
        let mut desc = self.new_desc(name, TypeKind::Class);
        desc.super_type = super_type;
        desc.flags = TypeFlags::USER_DEFINED;
        self.add_type(desc)
    }

    /// # Panics
    /// Panics as [`add_type`](Self::add_type) does.
    pub fn add_interface(&mut self, name: &str) -> TypeId {
        let mut desc = self.new_desc(name, TypeKind::Interface);
        desc.flags = TypeFlags::USER_DEFINED;
        self.add_type(desc)
    }

    /// # Panics
    /// Panics as [`add_type`](Self::add_type) does.
    pub fn add_struct(&mut self, name: &str) -> TypeId {
        let mut desc = self.new_desc(name, TypeKind::Struct);
        desc.flags = TypeFlags::USER_DEFINED;
        self.add_type(desc)
    }

    /// # Panics
    /// Panics as [`add_type`](Self::add_type) does.
    pub fn add_enum(&mut self, name: &str, entries: &[&str]) -> TypeId {
        let mut desc = self.new_desc(name, TypeKind::Enum);
        desc.flags = TypeFlags::USER_DEFINED;
        desc.enum_entries = entries
            .iter()
            .map(|e| EnumEntry {
                name: self.interner.intern(e),
                display_name: None,
            })
            .collect();
        self.add_type(desc)
    }

    /// # Panics
    /// Panics if `owner` is not a type of this registry, or if the field
    /// table outgrows `u32`.
    pub fn add_field(&mut self, owner: TypeId, name: &str, ty: ValueType) -> FieldId {
        let id = self.push_field(FieldOwner::Type(owner), name, ty, FieldFlags::empty());
        self.types[owner.index()].fields.push(id);
        id
    }

    /// # Panics
    /// Panics if `owner` is not a type of this registry, or if the function
    /// table outgrows `u32`.
    pub fn add_function(&mut self, owner: TypeId, name: &str) -> FunctionId {
        let id = FunctionId::from_usize(self.functions.len());
        self.functions.push(FunctionDesc {
            owner,
            name: self.interner.intern(name),
            params: Vec::new(),
            flags: super::FunctionFlags::empty(),
            metadata: Metadata::new(),
        });
        self.types[owner.index()].functions.push(id);
        id
    }

    /// # Panics
    /// Panics if `func` is not a function of this registry, or if the field
    /// table outgrows `u32`.
    pub fn add_param(
        &mut self,
        func: FunctionId,
        name: &str,
        ty: ValueType,
        flags: FieldFlags,
    ) -> FieldId {
        let id = self.push_field(FieldOwner::Function(func), name, ty, flags | FieldFlags::PARAM);
        self.functions[func.index()].params.push(id);
        id
    }

    fn push_field(
        &mut self,
        owner: FieldOwner,
        name: &str,
        ty: ValueType,
        flags: FieldFlags,
    ) -> FieldId {
        let id = FieldId::from_usize(self.fields.len());
        self.fields.push(FieldDesc {
            owner,
            name: self.interner.intern(name),
            ty,
            flags,
            array_dim: 1,
            rep_notify: None,
            metadata: Metadata::new(),
        });
        id
    }

    /// Register the engine base classes and well-known structs.
    pub fn register_core(&mut self) -> CoreTypes {
        let previous = self.package;
        self.set_package("/Script/CoreUObject");

        let object = self.add_native_class("Object", None, TypeFlags::empty());
        let mut iface = self.new_desc("Interface", TypeKind::Interface);
        iface.flags = TypeFlags::NATIVE;
        let interface = self.add_type(iface);

        let vector = self.add_well_known("Vector", WellKnownStruct::Vector, &["X", "Y", "Z"]);
        let vector2d = self.add_well_known("Vector2D", WellKnownStruct::Vector2D, &["X", "Y"]);
        let rotator =
            self.add_well_known("Rotator", WellKnownStruct::Rotator, &["Pitch", "Yaw", "Roll"]);
        let quat = self.add_well_known("Quat", WellKnownStruct::Quat, &["X", "Y", "Z", "W"]);
        let linear_color =
            self.add_well_known("LinearColor", WellKnownStruct::LinearColor, &["R", "G", "B", "A"]);

        let color = self.add_struct("Color");
        self.types[color.index()].flags = TypeFlags::NATIVE;
        self.types[color.index()].well_known = Some(WellKnownStruct::Color);
        for channel in ["R", "G", "B", "A"] {
            self.add_field(color, channel, ValueType::byte());
        }

        let guid = self.add_struct("Guid");
        self.types[guid.index()].flags = TypeFlags::NATIVE;
        self.types[guid.index()].well_known = Some(WellKnownStruct::Guid);
        for part in ["A", "B", "C", "D"] {
            self.add_field(guid, part, ValueType::int());
        }

        let transform = self.add_struct("Transform");
        self.types[transform.index()].flags = TypeFlags::NATIVE;
        self.types[transform.index()].well_known = Some(WellKnownStruct::Transform);
        self.add_field(transform, "Rotation", ValueType::structure(quat));
        self.add_field(transform, "Translation", ValueType::structure(vector));
        self.add_field(transform, "Scale3D", ValueType::structure(vector));
        let floats = |id, values: &[f32]| {
            Value::Struct(StructValue {
                ty: id,
                fields: values.iter().map(|&v| Value::Float(v)).collect(),
            })
        };
        self.types[transform.index()].struct_defaults = Some(StructValue {
            ty: transform,
            fields: vec![
                floats(quat, &[0.0, 0.0, 0.0, 1.0]),
                floats(vector, &[0.0, 0.0, 0.0]),
                floats(vector, &[1.0, 1.0, 1.0]),
            ],
        });

        self.set_package("/Script/Engine");
        let actor = self.add_native_class("Actor", Some(object), TypeFlags::ACTOR);
        let actor_component =
            self.add_native_class("ActorComponent", Some(object), TypeFlags::COMPONENT);

        let latent_action_info = self.add_struct("LatentActionInfo");
        self.types[latent_action_info.index()].flags = TypeFlags::NATIVE;
        self.types[latent_action_info.index()].well_known = Some(WellKnownStruct::LatentActionInfo);
        let linkage = self.add_field(latent_action_info, "Linkage", ValueType::int());
        self.fields[linkage.index()].flags |= FieldFlags::NEEDS_LATENT_FIXUP;
        self.add_field(latent_action_info, "UUID", ValueType::int());
        self.add_field(latent_action_info, "ExecutionFunction", ValueType::name());
        self.add_field(latent_action_info, "CallbackTarget", ValueType::object(object));

        self.package = previous;
        CoreTypes {
            object,
            interface,
            actor,
            actor_component,
            vector,
            vector2d,
            rotator,
            quat,
            transform,
            linear_color,
            color,
            guid,
            latent_action_info,
        }
    }

    fn add_native_class(&mut self, name: &str, super_type: Option<TypeId>, flags: TypeFlags) -> TypeId {
        let mut desc = self.new_desc(name, TypeKind::Class);
        desc.super_type = super_type;
        desc.flags = flags | TypeFlags::NATIVE;
        self.add_type(desc)
    }

    fn add_well_known(&mut self, name: &str, kind: WellKnownStruct, components: &[&str]) -> TypeId {
        let id = self.add_struct(name);
        self.types[id.index()].flags = TypeFlags::NATIVE;
        self.types[id.index()].well_known = Some(kind);
        for component in components {
            self.add_field(id, component, ValueType::float());
        }
        id
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Reflection for TypeRegistry {
    fn type_desc(&self, id: TypeId) -> &TypeDesc {
        &self.types[id.index()]
    }

    fn field(&self, id: FieldId) -> &FieldDesc {
        &self.fields[id.index()]
    }

    fn function(&self, id: FunctionId) -> &FunctionDesc {
        &self.functions[id.index()]
    }

    fn resolve(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }
}

/// Ids of the engine types registered by [`TypeRegistry::register_core`].
#[derive(Copy, Clone, Debug)]
pub struct CoreTypes {
    pub object: TypeId,
    pub interface: TypeId,
    pub actor: TypeId,
    pub actor_component: TypeId,
    pub vector: TypeId,
    pub vector2d: TypeId,
    pub rotator: TypeId,
    pub quat: TypeId,
    pub transform: TypeId,
    pub linear_color: TypeId,
    pub color: TypeId,
    pub guid: TypeId,
    pub latent_action_info: TypeId,
}
