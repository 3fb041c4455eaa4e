//! String interner backing [`Name`].
//!
//! A single `RwLock`-guarded table. Registries are built once and then read
//! by every unit emitter, so lookups take the read lock only.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

struct InternTable {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents.
    strings: Vec<&'static str>,
}

impl InternTable {
    fn with_empty() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, 0);
        let mut strings = Vec::with_capacity(256);
        strings.push(empty);
        Self { map, strings }
    }
}

/// String interner.
///
/// Interned strings are leaked and live for the rest of the process, which
/// lets [`lookup`](Self::lookup) hand out plain `&str`s without holding a lock.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(InternTable::with_empty()),
        }
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` strings are interned.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&index) = self.table.read().map.get(s) {
            return Name::from_raw(index);
        }
        self.insert(Box::leak(s.to_owned().into_boxed_str()))
    }

    /// Intern an owned String without re-allocating it.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` strings are interned.
    pub fn intern_owned(&self, s: String) -> Name {
        if let Some(&index) = self.table.read().map.get(s.as_str()) {
            return Name::from_raw(index);
        }
        self.insert(Box::leak(s.into_boxed_str()))
    }

    fn insert(&self, leaked: &'static str) -> Name {
        let mut table = self.table.write();
        // Double-check after acquiring write lock
        if let Some(&index) = table.map.get(leaked) {
            return Name::from_raw(index);
        }
        let index = u32::try_from(table.strings.len())
            .unwrap_or_else(|_| panic!("interner exceeded {} strings", u32::MAX));
        table.strings.push(leaked);
        table.map.insert(leaked, index);
        Name::from_raw(index)
    }

    /// Look up the string for a Name.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings, including the pre-interned empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
