//! Live object arena.
//!
//! Holds the instances the object-graph emitter reconstructs: class default
//! objects, sub-objects they own, class-owned helper objects and the assets
//! literals point at.

use rustc_hash::FxHashMap;

use crate::{FieldId, Name, ObjectFlags, Reflection, TypeId, Value};

index_newtype! {
    /// Index into an [`ObjectArena`].
    ObjectId
}

/// Owner of an object.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Outer {
    /// Top-level object in a package (assets).
    Package(Name),
    /// Owned by a class descriptor.
    Type(TypeId),
    Object(ObjectId),
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectData {
    pub name: Name,
    pub class: TypeId,
    pub outer: Outer,
    /// Explicitly set fields; anything missing holds its type's default.
    pub values: FxHashMap<FieldId, Value>,
    pub flags: ObjectFlags,
}

#[derive(Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectArena {
    objects: Vec<ObjectData>,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    /// Panics if the arena outgrows `u32`.
    pub fn alloc(&mut self, name: Name, class: TypeId, outer: Outer) -> ObjectId {
        let id = ObjectId::from_usize(self.objects.len());
        self.objects.push(ObjectData {
            name,
            class,
            outer,
            values: FxHashMap::default(),
            flags: ObjectFlags::empty(),
        });
        id
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> &ObjectData {
        &self.objects[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> &mut ObjectData {
        &mut self.objects[id.index()]
    }

    pub fn set(&mut self, id: ObjectId, field: FieldId, value: Value) {
        self.objects[id.index()].values.insert(field, value);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> {
        (0..self.objects.len()).map(ObjectId::from_usize)
    }

    /// Value of `field` on `id`, falling back to the default of its type.
    pub fn field_value(&self, id: ObjectId, field: FieldId, reflect: &dyn Reflection) -> Value {
        match self.get(id).values.get(&field) {
            Some(value) => value.clone(),
            None => reflect.field_default(field),
        }
    }

    /// `id` is `ancestor` or transitively owned by it.
    pub fn is_in(&self, id: ObjectId, ancestor: ObjectId) -> bool {
        let mut cursor = id;
        loop {
            if cursor == ancestor {
                return true;
            }
            match self.get(cursor).outer {
                Outer::Object(outer) => cursor = outer,
                Outer::Package(_) | Outer::Type(_) => return false,
            }
        }
    }

    /// Sub-object of `outer` named `name` with class `class`.
    pub fn find_subobject(&self, outer: ObjectId, name: Name, class: TypeId) -> Option<ObjectId> {
        self.ids().find(|&id| {
            let data = self.get(id);
            data.outer == Outer::Object(outer) && data.name == name && data.class == class
        })
    }

    /// Full path: `Package.Name` for assets, `Package.Type:Name` for
    /// class-owned objects and `Outer:Name` for sub-objects.
    pub fn path_name(&self, id: ObjectId, reflect: &dyn Reflection) -> String {
        let data = self.get(id);
        let name = reflect.resolve(data.name);
        match data.outer {
            Outer::Package(package) => format!("{}.{name}", reflect.resolve(package)),
            Outer::Type(ty) => {
                let desc = reflect.type_desc(ty);
                format!(
                    "{}.{}:{name}",
                    reflect.resolve(desc.package),
                    reflect.resolve(desc.name)
                )
            }
            Outer::Object(outer) => format!("{}:{name}", self.path_name(outer, reflect)),
        }
    }
}
