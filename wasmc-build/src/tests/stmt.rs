use super::*;
use wasmc_common::interner::Interner;
use wasmc_common::span::Span;
use wasmc_ir::{AstArenaBuilder, AstType, AstTypeKind, NodeKind, ValueKind};

fn numeric_type() -> AstType {
    AstType::simple(AstTypeKind::Number)
}

fn number_node(builder: &mut AstArenaBuilder, n: f64) -> AstId {
    builder.typed_node(AstNodeKind::NumberLiteral(n.to_bits()), Span::dummy(), &[], numeric_type())
}

#[test]
fn block_declares_a_local_and_collapses_expression_runs_into_a_basic_block() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let x = interner.intern("x");

    let mut builder = AstArenaBuilder::new();
    let init = number_node(&mut builder, 1.0);
    let decl = builder.typed_node(AstNodeKind::VariableDeclaration { name: x }, Span::dummy(), &[init], numeric_type());
    let e0 = number_node(&mut builder, 2.0);
    let e1 = number_node(&mut builder, 3.0);
    let block = builder.node(AstNodeKind::Block, Span::dummy(), &[decl, e0, e1]);
    let ast = builder.finish();

    let node_id = build_stmt(&mut ctx, &ast, "f.ts", block);

    match &ctx.nodes.get(node_id).kind {
        NodeKind::Block { label: None, body } => {
            assert_eq!(body.len(), 2);
            assert!(matches!(ctx.nodes.get(body[0]).kind, NodeKind::VarDeclare { .. }));
            match &ctx.nodes.get(body[1]).kind {
                NodeKind::BasicBlock { values } => assert_eq!(values.len(), 2),
                other => panic!("expected BasicBlock, got {other:?}"),
            }
        }
        other => panic!("expected Block, got {other:?}"),
    }
    assert!(!ctx.has_fatal_diagnostic());
}

#[test]
fn var_declare_without_initializer_has_no_init_value() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let x = interner.intern("x");

    let mut builder = AstArenaBuilder::new();
    let decl = builder.typed_node(AstNodeKind::VariableDeclaration { name: x }, Span::dummy(), &[], numeric_type());
    let ast = builder.finish();

    let node_id = build_stmt(&mut ctx, &ast, "f.ts", decl);

    match &ctx.nodes.get(node_id).kind {
        NodeKind::VarDeclare { name, ty, init } => {
            assert_eq!(*name, x);
            assert_eq!(*ty, TypeId::NUMBER);
            assert!(init.is_none());
        }
        other => panic!("expected VarDeclare, got {other:?}"),
    }
    assert_eq!(ctx.resolve_local(x), Some(0));
}

#[test]
fn var_declare_with_initializer_casts_and_records_an_init_value() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let x = interner.intern("x");

    let mut builder = AstArenaBuilder::new();
    let init = number_node(&mut builder, 5.0);
    let decl = builder.typed_node(AstNodeKind::VariableDeclaration { name: x }, Span::dummy(), &[init], numeric_type());
    let ast = builder.finish();

    let node_id = build_stmt(&mut ctx, &ast, "f.ts", decl);

    match &ctx.nodes.get(node_id).kind {
        NodeKind::VarDeclare { init: Some(_), .. } => {}
        other => panic!("expected VarDeclare with an init value, got {other:?}"),
    }
}

#[test]
fn identifier_inside_a_block_resolves_against_a_sibling_declaration() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let x = interner.intern("x");

    let mut builder = AstArenaBuilder::new();
    let init = number_node(&mut builder, 1.0);
    let decl = builder.typed_node(AstNodeKind::VariableDeclaration { name: x }, Span::dummy(), &[init], numeric_type());
    let read = builder.typed_node(AstNodeKind::Identifier(x), Span::dummy(), &[], numeric_type());
    let block = builder.node(AstNodeKind::Block, Span::dummy(), &[decl, read]);
    let ast = builder.finish();

    build_stmt(&mut ctx, &ast, "f.ts", block);

    assert!(!ctx.has_fatal_diagnostic());
}

#[test]
fn nested_named_function_declaration_becomes_a_closure_valued_local() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let f = interner.intern("helper");

    let mut builder = AstArenaBuilder::new();
    let decl = builder.node(AstNodeKind::FunctionDeclaration { name: f }, Span::dummy(), &[]);
    let ast = builder.finish();

    let node_id = build_stmt(&mut ctx, &ast, "f.ts", decl);

    match &ctx.nodes.get(node_id).kind {
        NodeKind::VarDeclare { name, init: Some(value), .. } => {
            assert_eq!(*name, f);
            assert!(matches!(ctx.values.get(*value).kind, ValueKind::NewClosureFunction { .. }));
        }
        other => panic!("expected VarDeclare with a closure init, got {other:?}"),
    }
    assert!(matches!(ctx.resolve_symbol(f), Some(GlobalSymbol::Function(_))));
}

#[test]
fn if_without_an_else_branch_leaves_it_none() {
    let mut ctx = BuildContext::new();

    let mut builder = AstArenaBuilder::new();
    let test = builder.typed_node(AstNodeKind::BooleanLiteral(true), Span::dummy(), &[], AstType::simple(AstTypeKind::Boolean));
    let then_block = builder.node(AstNodeKind::Block, Span::dummy(), &[]);
    let if_node = builder.node(AstNodeKind::If, Span::dummy(), &[test, then_block]);
    let ast = builder.finish();

    let node_id = build_stmt(&mut ctx, &ast, "f.ts", if_node);

    match &ctx.nodes.get(node_id).kind {
        NodeKind::If { else_branch: None, .. } => {}
        other => panic!("expected If with no else branch, got {other:?}"),
    }
}

#[test]
fn if_with_an_else_branch_builds_both() {
    let mut ctx = BuildContext::new();

    let mut builder = AstArenaBuilder::new();
    let test = builder.typed_node(AstNodeKind::BooleanLiteral(true), Span::dummy(), &[], AstType::simple(AstTypeKind::Boolean));
    let then_block = builder.node(AstNodeKind::Block, Span::dummy(), &[]);
    let else_block = builder.node(AstNodeKind::Block, Span::dummy(), &[]);
    let if_node = builder.node(AstNodeKind::If, Span::dummy(), &[test, then_block, else_block]);
    let ast = builder.finish();

    let node_id = build_stmt(&mut ctx, &ast, "f.ts", if_node);

    assert!(matches!(ctx.nodes.get(node_id).kind, NodeKind::If { else_branch: Some(_), .. }));
}

#[test]
fn for_loop_builds_all_four_parts_and_allocates_a_label() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let i = interner.intern("i");

    let mut builder = AstArenaBuilder::new();
    let zero = number_node(&mut builder, 0.0);
    let init = builder.typed_node(AstNodeKind::VariableDeclaration { name: i }, Span::dummy(), &[zero], numeric_type());
    let test = builder.typed_node(AstNodeKind::BooleanLiteral(true), Span::dummy(), &[], AstType::simple(AstTypeKind::Boolean));
    let update = number_node(&mut builder, 1.0);
    let body = builder.node(AstNodeKind::Block, Span::dummy(), &[]);
    let for_node = builder.node(AstNodeKind::For, Span::dummy(), &[init, test, update, body]);
    let ast = builder.finish();

    let node_id = build_stmt(&mut ctx, &ast, "f.ts", for_node);

    match &ctx.nodes.get(node_id).kind {
        NodeKind::For { init: Some(_), test: Some(_), update: Some(_), body: _, .. } => {}
        other => panic!("expected a fully-populated For, got {other:?}"),
    }
}

#[test]
fn while_and_do_while_build_distinct_node_kinds() {
    let mut ctx = BuildContext::new();

    let mut builder = AstArenaBuilder::new();
    let test = builder.typed_node(AstNodeKind::BooleanLiteral(true), Span::dummy(), &[], AstType::simple(AstTypeKind::Boolean));
    let body = builder.node(AstNodeKind::Block, Span::dummy(), &[]);
    let while_node = builder.node(AstNodeKind::While, Span::dummy(), &[test, body]);

    let body2 = builder.node(AstNodeKind::Block, Span::dummy(), &[]);
    let test2 = builder.typed_node(AstNodeKind::BooleanLiteral(false), Span::dummy(), &[], AstType::simple(AstTypeKind::Boolean));
    let do_while_node = builder.node(AstNodeKind::DoWhile, Span::dummy(), &[body2, test2]);
    let ast = builder.finish();

    let w = build_stmt(&mut ctx, &ast, "f.ts", while_node);
    let d = build_stmt(&mut ctx, &ast, "f.ts", do_while_node);

    assert!(matches!(ctx.nodes.get(w).kind, NodeKind::While { .. }));
    assert!(matches!(ctx.nodes.get(d).kind, NodeKind::DoWhile { .. }));
}

#[test]
fn switch_builds_its_case_and_default_clauses() {
    let mut ctx = BuildContext::new();

    let mut builder = AstArenaBuilder::new();
    let discriminant = number_node(&mut builder, 1.0);
    let case_test = number_node(&mut builder, 1.0);
    let case_body = number_node(&mut builder, 2.0);
    let case = builder.node(AstNodeKind::CaseClause, Span::dummy(), &[case_test, case_body]);
    let default_body = number_node(&mut builder, 3.0);
    let default = builder.node(AstNodeKind::DefaultClause, Span::dummy(), &[default_body]);
    let switch_node = builder.node(AstNodeKind::Switch, Span::dummy(), &[discriminant, case, default]);
    let ast = builder.finish();

    let node_id = build_stmt(&mut ctx, &ast, "f.ts", switch_node);

    match &ctx.nodes.get(node_id).kind {
        NodeKind::Switch { cases, .. } => {
            assert_eq!(cases.len(), 2);
            assert!(matches!(ctx.nodes.get(cases[0]).kind, NodeKind::CaseClause { .. }));
            assert!(matches!(ctx.nodes.get(cases[1]).kind, NodeKind::DefaultClause { .. }));
        }
        other => panic!("expected Switch, got {other:?}"),
    }
}

#[test]
fn return_with_and_without_a_value() {
    let mut ctx = BuildContext::new();

    let mut builder = AstArenaBuilder::new();
    let value = number_node(&mut builder, 1.0);
    let with_value = builder.node(AstNodeKind::Return, Span::dummy(), &[value]);
    let without_value = builder.node(AstNodeKind::Return, Span::dummy(), &[]);
    let ast = builder.finish();

    let with = build_stmt(&mut ctx, &ast, "f.ts", with_value);
    let without = build_stmt(&mut ctx, &ast, "f.ts", without_value);

    assert!(matches!(ctx.nodes.get(with).kind, NodeKind::Return { value: Some(_) }));
    assert!(matches!(ctx.nodes.get(without).kind, NodeKind::Return { value: None }));
}

#[test]
fn break_and_continue_pass_their_label_through() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let label = interner.intern("outer");

    let mut builder = AstArenaBuilder::new();
    let brk = builder.node(AstNodeKind::Break { label: Some(label) }, Span::dummy(), &[]);
    let cont = builder.node(AstNodeKind::Continue { label: None }, Span::dummy(), &[]);
    let ast = builder.finish();

    let b = build_stmt(&mut ctx, &ast, "f.ts", brk);
    let c = build_stmt(&mut ctx, &ast, "f.ts", cont);

    assert!(matches!(ctx.nodes.get(b).kind, NodeKind::Break { label: Some(l) } if l == label));
    assert!(matches!(ctx.nodes.get(c).kind, NodeKind::Continue { label: None }));
}

#[test]
fn throw_builds_its_value() {
    let mut ctx = BuildContext::new();

    let mut builder = AstArenaBuilder::new();
    let value = number_node(&mut builder, 1.0);
    let throw_node = builder.node(AstNodeKind::Throw, Span::dummy(), &[value]);
    let ast = builder.finish();

    let node_id = build_stmt(&mut ctx, &ast, "f.ts", throw_node);

    assert!(matches!(ctx.nodes.get(node_id).kind, NodeKind::Throw { .. }));
}

#[test]
fn try_with_only_a_block_leaves_catch_and_finally_none() {
    let mut ctx = BuildContext::new();

    let mut builder = AstArenaBuilder::new();
    let block = builder.node(AstNodeKind::Block, Span::dummy(), &[]);
    let try_node = builder.node(AstNodeKind::Try, Span::dummy(), &[block]);
    let ast = builder.finish();

    let node_id = build_stmt(&mut ctx, &ast, "f.ts", try_node);

    match &ctx.nodes.get(node_id).kind {
        NodeKind::Try { catch: None, finally: None, .. } => {}
        other => panic!("expected a bare Try, got {other:?}"),
    }
}

#[test]
fn try_catch_finally_binds_the_catch_parameter_and_builds_both_clauses() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let e = interner.intern("e");

    let mut builder = AstArenaBuilder::new();
    let block = builder.node(AstNodeKind::Block, Span::dummy(), &[]);
    let read = builder.typed_node(AstNodeKind::Identifier(e), Span::dummy(), &[], numeric_type());
    let catch_body = builder.node(AstNodeKind::Block, Span::dummy(), &[read]);
    let catch = builder.node(AstNodeKind::CatchClause { param: Some(e) }, Span::dummy(), &[catch_body]);
    let finally_body = builder.node(AstNodeKind::Block, Span::dummy(), &[]);
    let finally = builder.node(AstNodeKind::Finally, Span::dummy(), &[finally_body]);
    let try_node = builder.node(AstNodeKind::Try, Span::dummy(), &[block, catch, finally]);
    let ast = builder.finish();

    let node_id = build_stmt(&mut ctx, &ast, "f.ts", try_node);

    match &ctx.nodes.get(node_id).kind {
        NodeKind::Try { catch: Some(clause), finally: Some(_), .. } => {
            assert_eq!(clause.param, Some(e));
        }
        other => panic!("expected Try with both clauses, got {other:?}"),
    }
    assert!(!ctx.has_fatal_diagnostic());
}

#[test]
fn unsupported_statement_kind_falls_back_to_empty_with_a_warning() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let name = interner.intern("Thing");

    let mut builder = AstArenaBuilder::new();
    let id = builder.node(AstNodeKind::ClassDeclaration { name }, Span::dummy(), &[]);
    let ast = builder.finish();

    let node_id = build_stmt(&mut ctx, &ast, "f.ts", id);

    assert!(matches!(ctx.nodes.get(node_id).kind, NodeKind::Empty));
    assert!(!ctx.has_fatal_diagnostic());
    assert!(!ctx.diagnostics().is_empty());
}
