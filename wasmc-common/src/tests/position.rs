use super::*;

#[test]
fn first_line_starts_at_one_one() {
    let map = LineMap::new("abc\ndef\n");
    assert_eq!(map.position(0), Position { line: 1, column: 1 });
    assert_eq!(map.position(4), Position { line: 2, column: 1 });
}

#[test]
fn range_spans_two_lines() {
    let map = LineMap::new("abc\ndef\n");
    let range = map.range(Span::new(2, 5));
    assert_eq!(range.start, Position { line: 1, column: 3 });
    assert_eq!(range.end, Position { line: 2, column: 2 });
}
