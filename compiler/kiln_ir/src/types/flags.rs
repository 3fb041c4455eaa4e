//! Descriptor flag sets.
//!
//! Flags are copied verbatim from the reflection source and only ever
//! queried by the emitters; nothing in the backend computes or mutates them.

use bitflags::bitflags;

bitflags! {
    /// Properties of a class, struct, enum or interface descriptor.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
    pub struct TypeFlags: u32 {
        /// Placeable world entity; cpp names take the `A` prefix.
        const ACTOR = 1 << 0;
        /// Implemented natively; never emitted as a unit.
        const NATIVE = 1 << 1;
        /// Authored in the visual scripting system.
        const USER_DEFINED = 1 << 2;
        /// Attachable component class.
        const COMPONENT = 1 << 3;
    }
}

bitflags! {
    /// Properties of a field or function parameter.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
    pub struct FieldFlags: u64 {
        // === Editor visibility ===
        const EDIT = 1 << 0;
        const EDIT_CONST = 1 << 1;
        const DISABLE_EDIT_ON_INSTANCE = 1 << 2;
        const DISABLE_EDIT_ON_TEMPLATE = 1 << 3;
        const BLUEPRINT_VISIBLE = 1 << 4;
        const BLUEPRINT_READ_ONLY = 1 << 5;

        // === Persistence ===
        const CONFIG = 1 << 6;
        const GLOBAL_CONFIG = 1 << 7;
        const TRANSIENT = 1 << 8;
        const DUPLICATE_TRANSIENT = 1 << 9;
        const TEXT_EXPORT_TRANSIENT = 1 << 10;
        const NON_PIE_DUPLICATE_TRANSIENT = 1 << 11;
        const EXPORT_OBJECT = 1 << 12;
        const NO_CLEAR = 1 << 13;
        const EDIT_FIXED_SIZE = 1 << 14;
        const SAVE_GAME = 1 << 15;

        // === Replication ===
        const NET = 1 << 16;
        const REP_NOTIFY = 1 << 17;
        const REP_SKIP = 1 << 18;

        // === Misc tags ===
        const INTERP = 1 << 19;
        const NON_TRANSACTIONAL = 1 << 20;
        const BLUEPRINT_ASSIGNABLE = 1 << 21;
        const BLUEPRINT_CALLABLE = 1 << 22;
        const BLUEPRINT_AUTHORITY_ONLY = 1 << 23;
        const ASSET_REGISTRY_SEARCHABLE = 1 << 24;
        const SIMPLE_DISPLAY = 1 << 25;
        const ADVANCED_DISPLAY = 1 << 26;

        // === Backend-relevant ===
        /// Exists only in editor builds; never written by generated code.
        const EDITOR_ONLY = 1 << 32;
        const PRIVATE = 1 << 33;
        const PROTECTED = 1 << 34;
        /// Function parameter.
        const PARAM = 1 << 35;
        /// Parameter written by the callee.
        const OUT_PARAM = 1 << 36;
        const RETURN_PARAM = 1 << 37;
        /// Holds a sub-object that is always re-created per owner.
        const INSTANCED = 1 << 38;
        /// Struct member patched with the resume state of a latent call.
        const NEEDS_LATENT_FIXUP = 1 << 39;
    }
}

bitflags! {
    /// Properties of a function or delegate signature.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
    pub struct FunctionFlags: u32 {
        const STATIC = 1 << 0;
        const NATIVE = 1 << 1;
        const EVENT = 1 << 2;
        const BLUEPRINT_EVENT = 1 << 3;
        const EXEC = 1 << 4;
        const NET = 1 << 5;
        const NET_SERVER = 1 << 6;
        const NET_CLIENT = 1 << 7;
        const NET_MULTICAST = 1 << 8;
        const NET_RELIABLE = 1 << 9;
        const NET_VALIDATE = 1 << 10;
        const BLUEPRINT_CALLABLE = 1 << 11;
        const BLUEPRINT_PURE = 1 << 12;
        const BLUEPRINT_AUTHORITY_ONLY = 1 << 13;
        const BLUEPRINT_COSMETIC = 1 << 14;
        /// Resolved through hand-written thunk templates rather than the owner.
        const CUSTOM_THUNK = 1 << 15;
        const DELEGATE = 1 << 16;
        const MULTICAST_DELEGATE = 1 << 17;
    }
}

bitflags! {
    /// Properties of a live object.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
    pub struct ObjectFlags: u32 {
        /// The class default object of its class.
        const CLASS_DEFAULT = 1 << 0;
        /// Standalone asset loadable by path.
        const ASSET = 1 << 1;
        const TRANSIENT = 1 << 2;
    }
}
