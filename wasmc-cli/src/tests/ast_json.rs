use super::*;
use wasmc_ir::{AstNodeKind, AstTypeKind};

#[test]
fn parses_a_function_returning_a_number_literal() {
    let source = r#"{
        "root": {
            "kind": "Module",
            "children": [
                {
                    "kind": "FunctionDeclaration",
                    "name": "answer",
                    "ty": { "kind": "number" },
                    "children": [
                        {
                            "kind": "Return",
                            "children": [
                                { "kind": "NumberLiteral", "value": 42 }
                            ]
                        }
                    ]
                }
            ]
        }
    }"#;

    let (ast, root, interner) = parse_module(source).expect("valid wire AST");
    let module = ast.get(root);
    assert!(matches!(module.kind, AstNodeKind::Module));
    assert_eq!(module.children.len(), 1);

    let func = ast.get(module.children[0]);
    match func.kind {
        AstNodeKind::FunctionDeclaration { name } => assert_eq!(interner.resolve(name), "answer"),
        _ => panic!("expected a FunctionDeclaration"),
    }
}

#[test]
fn named_type_interns_its_name_and_carries_type_arguments() {
    let source = r#"{
        "root": {
            "kind": "VariableDeclaration",
            "name": "items",
            "ty": {
                "kind": "named",
                "name": "Array",
                "type_arguments": [{ "kind": "string" }]
            },
            "children": []
        }
    }"#;

    let (ast, root, interner) = parse_module(source).expect("valid wire AST");
    let node = ast.get(root);
    let ty = node.ty.as_ref().expect("a declared type");
    match &ty.kind {
        AstTypeKind::Named(atom) => assert_eq!(interner.resolve(*atom), "Array"),
        other => panic!("expected a Named type, got {other:?}"),
    }
    let args = ty.type_arguments.as_ref().expect("one type argument");
    assert_eq!(args.len(), 1);
    assert!(matches!(args[0].kind, AstTypeKind::String));
}

#[test]
fn unknown_node_kind_is_rejected() {
    let source = r#"{ "root": { "kind": "NotARealNode" } }"#;
    let err = parse_module(source).unwrap_err();
    assert!(err.to_string().contains("NotARealNode") || format!("{err:#}").contains("NotARealNode"));
}

#[test]
fn function_declaration_without_a_name_is_rejected() {
    let source = r#"{ "root": { "kind": "FunctionDeclaration", "children": [] } }"#;
    assert!(parse_module(source).is_err());
}
