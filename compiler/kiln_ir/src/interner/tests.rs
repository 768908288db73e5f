use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_intern_is_idempotent() {
    let interner = StringInterner::new();
    let a = interner.intern("staticassert");
    let b = interner.intern("staticassert");
    let c = interner.intern("macro");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.lookup(a), "staticassert");
    assert_eq!(interner.lookup(c), "macro");
}

#[test]
fn test_empty_string_is_preinterned() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.len(), 1);
}

#[test]
fn test_unknown_name_resolves_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.lookup(Name::from_raw(999)), "");
}

#[test]
fn test_shared_handles_see_same_table() {
    let shared = SharedInterner::new();
    let other = shared.clone();
    let name = shared.intern("context");
    assert_eq!(other.lookup(name), "context");
    assert_eq!(other.intern("context"), name);
}
