use super::*;

#[test]
fn merge_widens_to_cover_both_spans() {
    let a = Span::new(4, 10);
    let b = Span::new(2, 6);
    assert_eq!(a.merge(b), Span::new(2, 10));
}

#[test]
fn dummy_span_roundtrips() {
    let dummy = Span::dummy();
    assert!(dummy.is_dummy());
    assert!(!Span::new(0, 1).is_dummy());
}

#[test]
fn empty_span_has_zero_length() {
    let s = Span::at(5);
    assert!(s.is_empty());
    assert_eq!(s.len(), 0);
}
