use super::*;
use wasmc_common::interner::Interner;
use wasmc_common::span::Span;

#[test]
fn arena_builder_roundtrips_node_kind_and_children() {
    let mut builder = AstArenaBuilder::new();
    let lit = builder.node(AstNodeKind::NumberLiteral(1), Span::dummy(), &[]);
    let call = builder.node(AstNodeKind::Call, Span::dummy(), &[lit]);
    let arena = builder.finish();
    assert_eq!(arena.get(call).children.as_slice(), &[lit]);
    assert!(matches!(arena.get(lit).kind, AstNodeKind::NumberLiteral(1)));
}

#[test]
fn resolve_finds_a_variable_declared_in_an_enclosing_scope() {
    let mut interner = Interner::new();
    let name = interner.intern("x");
    let mut scopes = ScopeTree::new();
    let root = scopes.root();
    let inner = scopes.push_scope(root);
    scopes.declare(root, name, AstId(0));
    let resolved = scopes.resolve(inner, name);
    assert_eq!(resolved, Some(SymbolRef { scope: root, declaration: AstId(0) }));
}

#[test]
fn resolve_returns_none_for_an_undeclared_name() {
    let mut interner = Interner::new();
    let missing = interner.intern("missing");
    let scopes = ScopeTree::new();
    assert_eq!(scopes.resolve(scopes.root(), missing), None);
}

#[test]
fn inner_scope_shadows_outer_declaration() {
    let mut interner = Interner::new();
    let name = interner.intern("x");
    let mut scopes = ScopeTree::new();
    let root = scopes.root();
    let inner = scopes.push_scope(root);
    scopes.declare(root, name, AstId(0));
    scopes.declare(inner, name, AstId(1));
    assert_eq!(scopes.resolve(inner, name), Some(SymbolRef { scope: inner, declaration: AstId(1) }));
}
