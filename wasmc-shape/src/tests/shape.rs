use super::*;

#[test]
fn field_is_never_empty() {
    let field = ShapeMember::Field { offset: 1 };
    assert!(!field.is_empty());
}

#[test]
fn method_with_no_offset_or_function_is_empty() {
    let method = ShapeMember::Method { offset: None, function: None };
    assert!(method.is_empty());
}

#[test]
fn method_with_an_offset_is_not_empty() {
    let method = ShapeMember::Method { offset: Some(3), function: None };
    assert!(!method.is_empty());
}

#[test]
fn accessor_with_neither_side_is_empty() {
    let accessor = ShapeMember::Accessor { getter: None, setter: None };
    assert!(accessor.is_empty());
}

#[test]
fn accessor_with_one_side_is_not_empty() {
    let accessor = ShapeMember::Accessor { getter: Some(ShapeAccessor::Offset(2)), setter: None };
    assert!(!accessor.is_empty());
}
