use super::*;
use wasmc_common::interner::Interner;
use wasmc_common::span::Span;
use wasmc_ir::{AstArenaBuilder, AstType, AstTypeKind, NodeKind};

fn numeric_type() -> AstType {
    AstType::simple(AstTypeKind::Number)
}

fn void_type() -> AstType {
    AstType::simple(AstTypeKind::Void)
}

#[test]
fn module_hoists_a_single_function_declaration_with_its_param() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let add_one = interner.intern("addOne");
    let x = interner.intern("x");

    let mut builder = AstArenaBuilder::new();
    let param = builder.typed_node(AstNodeKind::VariableDeclaration { name: x }, Span::dummy(), &[], numeric_type());
    let ident = builder.typed_node(AstNodeKind::Identifier(x), Span::dummy(), &[], numeric_type());
    let ret = builder.node(AstNodeKind::Return, Span::dummy(), &[ident]);
    let body = builder.node(AstNodeKind::Block, Span::dummy(), &[ret]);
    let func = builder.typed_node(AstNodeKind::FunctionDeclaration { name: add_one }, Span::dummy(), &[param, body], numeric_type());
    let module = builder.node(AstNodeKind::Module, Span::dummy(), &[func]);
    let ast = builder.finish();

    let module_id = build_module(&mut ctx, &ast, "f.ts", module);

    match &ctx.nodes.get(module_id).kind {
        NodeKind::Module { functions } => {
            assert_eq!(functions.len(), 1);
            match &ctx.nodes.get(functions[0]).kind {
                NodeKind::FunctionDeclare { name, params, return_type, .. } => {
                    assert_eq!(*name, add_one);
                    assert_eq!(params, &[TypeId::NUMBER]);
                    assert_eq!(*return_type, TypeId::NUMBER);
                }
                other => panic!("expected FunctionDeclare, got {other:?}"),
            }
        }
        other => panic!("expected Module, got {other:?}"),
    }
    assert!(!ctx.has_fatal_diagnostic());
}

#[test]
fn module_pre_declares_functions_so_forward_calls_resolve() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let first = interner.intern("first");
    let second = interner.intern("second");

    let mut builder = AstArenaBuilder::new();
    // `first` calls `second`, declared after it — forward reference.
    let callee = builder.node(AstNodeKind::Identifier(second), Span::dummy(), &[]);
    let call = builder.typed_node(AstNodeKind::Call, Span::dummy(), &[callee], numeric_type());
    let ret = builder.node(AstNodeKind::Return, Span::dummy(), &[call]);
    let body_first = builder.node(AstNodeKind::Block, Span::dummy(), &[ret]);
    let func_first = builder.typed_node(AstNodeKind::FunctionDeclaration { name: first }, Span::dummy(), &[body_first], numeric_type());

    let body_second = builder.node(AstNodeKind::Block, Span::dummy(), &[]);
    let func_second = builder.typed_node(AstNodeKind::FunctionDeclaration { name: second }, Span::dummy(), &[body_second], void_type());

    let module = builder.node(AstNodeKind::Module, Span::dummy(), &[func_first, func_second]);
    let ast = builder.finish();

    let module_id = build_module(&mut ctx, &ast, "f.ts", module);

    let NodeKind::Module { functions } = &ctx.nodes.get(module_id).kind else {
        panic!("expected Module");
    };
    let NodeKind::FunctionDeclare { body, .. } = &ctx.nodes.get(functions[0]).kind else {
        panic!("expected FunctionDeclare");
    };
    let NodeKind::Block { body: stmts, .. } = &ctx.nodes.get(*body).kind else {
        panic!("expected a Block wrapping the return statement");
    };
    assert_eq!(stmts.len(), 1);
    assert!(matches!(ctx.nodes.get(stmts[0]).kind, NodeKind::Return { value: Some(_) }));
    assert!(matches!(ctx.resolve_symbol(second), Some(GlobalSymbol::Function(_))));
}

#[test]
fn unsupported_module_scope_declaration_warns_without_a_fatal_diagnostic() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let name = interner.intern("Point");

    let mut builder = AstArenaBuilder::new();
    let class_decl = builder.node(AstNodeKind::ClassDeclaration { name }, Span::dummy(), &[]);
    let module = builder.node(AstNodeKind::Module, Span::dummy(), &[class_decl]);
    let ast = builder.finish();

    let module_id = build_module(&mut ctx, &ast, "f.ts", module);

    match &ctx.nodes.get(module_id).kind {
        NodeKind::Module { functions } => assert!(functions.is_empty()),
        other => panic!("expected Module, got {other:?}"),
    }
    assert!(!ctx.has_fatal_diagnostic(), "an unhoisted declaration is a warning, not a fatal error");
    assert_eq!(ctx.diagnostics().len(), 1);
}
