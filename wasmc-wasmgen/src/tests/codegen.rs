use super::*;
use wasm_encoder::Encode;
use wasmc_common::interner::Interner;
use wasmc_common::span::Span;

fn harness() -> (ValueArena, NodeArena, TypeArena, DescriptorArena, Interner) {
    (ValueArena::new(), NodeArena::new(), TypeArena::new(), DescriptorArena::new(), Interner::new())
}

#[test]
fn build_function_returns_a_literal() {
    let (mut values, mut nodes, types, descriptors, interner) = harness();
    let lit = values.push(Span::dummy(), TypeId::NUMBER, None, ValueKind::Literal(Literal::Number(1.0)));
    let ret = nodes.push(Span::dummy(), NodeKind::Return { value: Some(lit) });
    let body = nodes.push(Span::dummy(), NodeKind::Block { label: None, body: vec![ret] });

    let mut gen = CodeGenerator::new(&values, &nodes, &types, &descriptors, &interner, false);
    let f = gen.build_function(body);
    let mut bytes = Vec::new();
    f.encode(&mut bytes);
    assert!(!bytes.is_empty());
}

#[test]
fn build_function_lowers_a_numeric_binary_expression() {
    let (mut values, mut nodes, types, descriptors, interner) = harness();
    let one = values.push(Span::dummy(), TypeId::NUMBER, None, ValueKind::Literal(Literal::Number(1.0)));
    let two = values.push(Span::dummy(), TypeId::NUMBER, None, ValueKind::Literal(Literal::Number(2.0)));
    let sum = values.push(Span::dummy(), TypeId::NUMBER, None, ValueKind::BinaryExpr { op: BinaryOp::Add, left: one, right: two });
    let ret = nodes.push(Span::dummy(), NodeKind::Return { value: Some(sum) });
    let body = nodes.push(Span::dummy(), NodeKind::Block { label: None, body: vec![ret] });

    let mut gen = CodeGenerator::new(&values, &nodes, &types, &descriptors, &interner, false);
    let f = gen.build_function(body);
    let mut bytes = Vec::new();
    f.encode(&mut bytes);
    assert!(!bytes.is_empty());
}

#[test]
fn build_function_lowers_a_local_declaration_and_reference_to_the_same_slot() {
    let (mut values, mut nodes, types, descriptors, mut interner) = harness();
    let init = values.push(Span::dummy(), TypeId::NUMBER, None, ValueKind::Literal(Literal::Number(5.0)));
    // `VarDeclare`'s own node id doubles as its `LocalAllocator` key, so
    // `Var`'s `declaration` below just points back at this id.
    let var_decl_id = nodes.push(Span::dummy(), NodeKind::VarDeclare { name: atom(&mut interner), ty: TypeId::NUMBER, init: Some(init) });
    let var_ref = values.push(
        Span::dummy(),
        TypeId::NUMBER,
        None,
        ValueKind::Var(wasmc_ir::LocalRef { slot: 0, declaration: var_decl_id }),
    );
    let ret = nodes.push(Span::dummy(), NodeKind::Return { value: Some(var_ref) });
    let body = nodes.push(Span::dummy(), NodeKind::Block { label: None, body: vec![var_decl_id, ret] });

    let mut gen = CodeGenerator::new(&values, &nodes, &types, &descriptors, &interner, false);
    let f = gen.build_function(body);
    let mut bytes = Vec::new();
    f.encode(&mut bytes);
    assert!(!bytes.is_empty());
}

fn atom(interner: &mut Interner) -> wasmc_common::interner::Atom {
    interner.intern("x")
}

#[test]
fn try_catch_finally_emits_two_nested_try_blocks() {
    let (mut values, mut nodes, types, descriptors, interner) = harness();
    let one = values.push(Span::dummy(), TypeId::NUMBER, None, ValueKind::Literal(Literal::Number(1.0)));
    let throwing = nodes.push(Span::dummy(), NodeKind::Throw { value: one });
    let try_block = nodes.push(Span::dummy(), NodeKind::Block { label: None, body: vec![throwing] });
    let catch_body = nodes.push(Span::dummy(), NodeKind::Block { label: None, body: Vec::new() });
    let finally_body = nodes.push(Span::dummy(), NodeKind::Block { label: None, body: Vec::new() });
    let try_node = nodes.push(
        Span::dummy(),
        NodeKind::Try {
            block: try_block,
            catch: Some(wasmc_ir::CatchClause { param: None, declaration: None, body: catch_body }),
            finally: Some(finally_body),
        },
    );
    let body = nodes.push(Span::dummy(), NodeKind::Block { label: None, body: vec![try_node] });

    let mut gen = CodeGenerator::new(&values, &nodes, &types, &descriptors, &interner, false);
    let f = gen.build_function(body);
    let mut bytes = Vec::new();
    f.encode(&mut bytes);
    assert!(!bytes.is_empty());
}

#[test]
fn try_catch_binds_the_caught_value_and_suppresses_the_rethrow() {
    let (mut values, mut nodes, types, descriptors, mut interner) = harness();
    let one = values.push(Span::dummy(), TypeId::NUMBER, None, ValueKind::Literal(Literal::Number(1.0)));
    let throwing = nodes.push(Span::dummy(), NodeKind::Throw { value: one });
    let try_block = nodes.push(Span::dummy(), NodeKind::Block { label: None, body: vec![throwing] });

    let name = atom(&mut interner);
    let declaration = nodes.push(Span::dummy(), NodeKind::Empty);
    let catch_body = nodes.push(Span::dummy(), NodeKind::Block { label: None, body: Vec::new() });
    let try_node = nodes.push(
        Span::dummy(),
        NodeKind::Try {
            block: try_block,
            catch: Some(wasmc_ir::CatchClause { param: Some(name), declaration: Some(declaration), body: catch_body }),
            finally: None,
        },
    );
    let body = nodes.push(Span::dummy(), NodeKind::Block { label: None, body: vec![try_node] });

    let mut gen = CodeGenerator::new(&values, &nodes, &types, &descriptors, &interner, false);
    let f = gen.build_function(body);
    let mut bytes = Vec::new();
    f.encode(&mut bytes);
    assert!(!bytes.is_empty());
}

#[test]
fn ensure_builtin_is_memoized_across_repeated_calls() {
    let (values, nodes, types, descriptors, interner) = harness();
    let mut gen = CodeGenerator::new(&values, &nodes, &types, &descriptors, &interner, false);
    let first = gen.ensure_builtin(BuiltinId::MathSqrt);
    let second = gen.ensure_builtin(BuiltinId::MathSqrt);
    assert_eq!(first, second);
}
