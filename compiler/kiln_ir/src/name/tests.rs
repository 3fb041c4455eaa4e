use super::*;
use crate::StringInterner;
use pretty_assertions::assert_eq;

#[test]
fn test_name_empty() {
    assert!(Name::EMPTY.is_empty());
    assert_eq!(Name::default(), Name::EMPTY);
}

#[test]
fn test_name_hash() {
    use std::collections::HashSet;
    let mut set = HashSet::new();
    set.insert(Name::from_raw(1));
    set.insert(Name::from_raw(1)); // duplicate
    set.insert(Name::from_raw(2));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_intern_roundtrip() {
    let interner = StringInterner::new();
    let health = interner.intern("Health");
    let again = interner.intern("Health");
    let other = interner.intern("Armor");

    assert_eq!(health, again);
    assert_ne!(health, other);
    assert_eq!(interner.lookup(health), "Health");
    assert_eq!(interner.lookup(other), "Armor");
}

#[test]
fn test_intern_empty_is_preinterned() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
    assert_eq!(interner.len(), 1);
}

#[test]
fn test_intern_owned_shares_handle() {
    let interner = StringInterner::new();
    let a = interner.intern("ReceiveBeginPlay");
    let b = interner.intern_owned(String::from("ReceiveBeginPlay"));
    assert_eq!(a, b);
    assert_eq!(interner.len(), 2);
}
