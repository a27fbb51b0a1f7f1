use super::*;
use wasmc_ir::AstTypeKind;

#[test]
fn primitive_kinds_resolve_to_their_fixed_ids() {
    let mut ctx = BuildContext::new();
    assert_eq!(resolve_type(&mut ctx, "f.ts", &AstType::simple(AstTypeKind::Number)), TypeId::NUMBER);
    assert_eq!(resolve_type(&mut ctx, "f.ts", &AstType::simple(AstTypeKind::Any)), TypeId::ANY);
}

#[test]
fn array_type_interns_idempotently_over_the_same_element() {
    let mut ctx = BuildContext::new();
    let array_type = AstType { kind: AstTypeKind::Array, type_arguments: Some(vec![AstType::simple(AstTypeKind::Number)]) };
    let a = resolve_type(&mut ctx, "f.ts", &array_type);
    let b = resolve_type(&mut ctx, "f.ts", &array_type);
    assert_eq!(a, b);
}

#[test]
fn unresolved_named_type_pushes_a_fatal_diagnostic_and_returns_error() {
    let mut ctx = BuildContext::new();
    let named = AstType::simple(AstTypeKind::Named(wasmc_common::interner::Interner::new().intern("Missing")));
    let resolved = resolve_type(&mut ctx, "f.ts", &named);
    assert_eq!(resolved, TypeId::ERROR);
    assert!(ctx.has_fatal_diagnostic());
}

#[test]
fn union_widens_mixed_primitives_to_any() {
    let mut ctx = BuildContext::new();
    let union = AstType {
        kind: AstTypeKind::Union,
        type_arguments: Some(vec![AstType::simple(AstTypeKind::Number), AstType::simple(AstTypeKind::String)]),
    };
    let id = resolve_type(&mut ctx, "f.ts", &union);
    let ty = ctx.types.get(id).unwrap();
    match &ty.kind {
        ValueTypeKind::Union(data) => assert_eq!(data.wide_type, TypeId::ANY),
        _ => panic!("expected a union type"),
    }
}
