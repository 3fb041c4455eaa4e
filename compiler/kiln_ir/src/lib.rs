//! Kiln IR - inputs of the lowering backend.
//!
//! This crate contains everything the code generator reads:
//! - Names for interned identifiers
//! - Type, field and function descriptors behind the [`Reflection`] trait
//! - Values and the live object arena (class defaults, sub-objects, assets)
//! - The statement IR of compiled functions
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32)
//! - **Flatten Everything**: descriptors, objects, statements and terminals
//!   live in arenas addressed by typed `u32` indices, never by reference
//! - **Read-only**: the backend never mutates its inputs

/// Declare a `u32` arena index newtype.
macro_rules! index_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            /// Index of the next arena slot.
            ///
            /// # Panics
            /// Panics if the arena outgrows `u32`.
            #[inline]
            pub fn from_usize(index: usize) -> Self {
                Self(u32::try_from(index).unwrap_or_else(|_| {
                    panic!(concat!(stringify!($name), " arena exceeded u32::MAX entries"))
                }))
            }
        }
    };
}

mod interner;
pub mod ir;
mod name;
pub mod object;
pub mod types;
mod value;

pub use interner::StringInterner;
pub use ir::{
    FunctionIr, LocalDecl, NodeStatements, Statement, StatementKind, StmtId, TermId, Terminal,
    TerminalKind, UnitIr,
};
pub use name::Name;
pub use object::{ObjectArena, ObjectData, ObjectId, Outer};
pub use types::{
    Category, Container, CoreTypes, EnumEntry, FieldDesc, FieldFlags, FieldId, FieldOwner,
    FunctionDesc, FunctionFlags, FunctionId, Metadata, ObjectFlags, Reflection, TypeDesc,
    TypeFlags, TypeId, TypeKind, TypeRegistry, ValueType, WellKnownStruct,
};
pub use value::{StructValue, Value};
