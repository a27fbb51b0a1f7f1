use super::*;

#[test]
fn interning_the_same_text_returns_the_same_atom() {
    let mut interner = Interner::new();
    let a = interner.intern("foo");
    let b = interner.intern("foo");
    assert_eq!(a, b);
    assert_eq!(interner.len(), 1);
}

#[test]
fn distinct_text_gets_distinct_atoms() {
    let mut interner = Interner::new();
    let a = interner.intern("foo");
    let b = interner.intern("bar");
    assert_ne!(a, b);
    assert_eq!(interner.resolve(a), "foo");
    assert_eq!(interner.resolve(b), "bar");
}
