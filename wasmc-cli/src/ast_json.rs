//! Reads the typed-AST input contract (spec §6.1) from a generic JSON tree.
//!
//! `wasmc-ir`'s `AstArena` is deliberately the only place in the workspace
//! standing in for a real parser/checker (hand-built through
//! `AstArenaBuilder` everywhere else). This module is the CLI's own bridge
//! from whatever upstream front end produced the typed AST as JSON into
//! that arena — a thin, ad hoc wire format, not part of the core crates.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use wasmc_common::interner::{Atom, Interner};
use wasmc_common::span::Span;
use wasmc_ir::{AstArena, AstArenaBuilder, AstId, AstNodeKind, AstType, AstTypeKind, BinaryOp, UnaryOp};

#[derive(Deserialize)]
struct WireType {
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    type_arguments: Option<Vec<WireType>>,
}

/// One node of the wire AST. Every shape the input contract recognizes
/// (spec §6.1) reuses this same generic struct; which fields apply depends
/// on `kind`, matched in [`build_node`].
#[derive(Deserialize)]
struct WireNode {
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default)]
    op: Option<String>,
    #[serde(default)]
    computed: bool,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    param: Option<String>,
    #[serde(default)]
    ty: Option<WireType>,
    #[serde(default)]
    children: Vec<WireNode>,
}

#[derive(Deserialize)]
struct WireModule {
    root: WireNode,
}

fn to_ast_type(wire: &WireType, interner: &mut Interner) -> Result<AstType> {
    let kind = match wire.kind.as_str() {
        "void" => AstTypeKind::Void,
        "undefined" => AstTypeKind::Undefined,
        "null" => AstTypeKind::Null,
        "never" => AstTypeKind::Never,
        "number" => AstTypeKind::Number,
        "boolean" => AstTypeKind::Boolean,
        "string" => AstTypeKind::String,
        "any" => AstTypeKind::Any,
        "array" => AstTypeKind::Array,
        "union" => AstTypeKind::Union,
        "function" => AstTypeKind::Function,
        "named" => {
            let name = wire.name.as_deref().context("a \"named\" type requires a \"name\"")?;
            AstTypeKind::Named(interner.intern(name))
        }
        other => bail!("unknown type kind \"{other}\""),
    };
    let type_arguments = match &wire.type_arguments {
        Some(args) => Some(args.iter().map(|a| to_ast_type(a, interner)).collect::<Result<Vec<_>>>()?),
        None => None,
    };
    Ok(AstType { kind, type_arguments })
}

fn binary_op(name: &str) -> Result<BinaryOp> {
    Ok(match name {
        "+" | "add" => BinaryOp::Add,
        "-" | "sub" => BinaryOp::Sub,
        "*" | "mul" => BinaryOp::Mul,
        "/" | "div" => BinaryOp::Div,
        "%" | "mod" => BinaryOp::Mod,
        "==" | "eq" => BinaryOp::Eq,
        "!=" | "notEq" => BinaryOp::NotEq,
        "<" | "lt" => BinaryOp::Lt,
        "<=" | "ltEq" => BinaryOp::LtEq,
        ">" | "gt" => BinaryOp::Gt,
        ">=" | "gtEq" => BinaryOp::GtEq,
        "&&" | "and" => BinaryOp::And,
        "||" | "or" => BinaryOp::Or,
        "=" | "assign" => BinaryOp::Assign,
        other => bail!("unknown binary operator \"{other}\""),
    })
}

fn unary_op(name: &str) -> Result<UnaryOp> {
    Ok(match name {
        "-" | "neg" => UnaryOp::Neg,
        "!" | "not" => UnaryOp::Not,
        "++" | "increment" => UnaryOp::Increment,
        "--" | "decrement" => UnaryOp::Decrement,
        other => bail!("unknown unary operator \"{other}\""),
    })
}

fn intern_opt(interner: &mut Interner, name: &Option<String>) -> Option<Atom> {
    name.as_deref().map(|n| interner.intern(n))
}

/// Lowers one [`WireNode`] (and, recursively, its children) into the
/// `AstArenaBuilder`, returning the freshly built [`AstId`].
fn build_node(builder: &mut AstArenaBuilder, interner: &mut Interner, wire: &WireNode) -> Result<AstId> {
    let mut children = Vec::with_capacity(wire.children.len());
    for child in &wire.children {
        children.push(build_node(builder, interner, child)?);
    }

    let ty = match &wire.ty {
        Some(t) => Some(to_ast_type(t, interner)?),
        None => None,
    };

    let name = |field: &Option<String>, what: &str| -> Result<Atom> {
        let raw = field.as_deref().with_context(|| format!("a \"{}\" node requires a \"{what}\"", wire.kind))?;
        Ok(interner.intern(raw))
    };

    let kind = match wire.kind.as_str() {
        "Module" => AstNodeKind::Module,
        "FunctionDeclaration" => AstNodeKind::FunctionDeclaration { name: name(&wire.name, "name")? },
        "ClassDeclaration" => AstNodeKind::ClassDeclaration { name: name(&wire.name, "name")? },
        "InterfaceDeclaration" => AstNodeKind::InterfaceDeclaration { name: name(&wire.name, "name")? },
        "PropertyDeclaration" => AstNodeKind::PropertyDeclaration { name: name(&wire.name, "name")? },
        "MethodDeclaration" => AstNodeKind::MethodDeclaration { name: name(&wire.name, "name")? },
        "VariableDeclaration" => AstNodeKind::VariableDeclaration { name: name(&wire.name, "name")? },
        "Identifier" => AstNodeKind::Identifier(name(&wire.name, "name")?),
        "This" => AstNodeKind::This,
        "Super" => AstNodeKind::Super,
        "NumberLiteral" => {
            let bits = match &wire.value {
                Some(serde_json::Value::Number(n)) => n.as_f64().context("a NumberLiteral's value must be numeric")?.to_bits(),
                _ => bail!("a NumberLiteral node requires a numeric \"value\""),
            };
            AstNodeKind::NumberLiteral(bits)
        }
        "StringLiteral" => {
            let text = match &wire.value {
                Some(serde_json::Value::String(s)) => s.as_str(),
                _ => bail!("a StringLiteral node requires a string \"value\""),
            };
            AstNodeKind::StringLiteral(interner.intern(text))
        }
        "BooleanLiteral" => {
            let b = match &wire.value {
                Some(serde_json::Value::Bool(b)) => *b,
                _ => bail!("a BooleanLiteral node requires a boolean \"value\""),
            };
            AstNodeKind::BooleanLiteral(b)
        }
        "NullLiteral" => AstNodeKind::NullLiteral,
        "UndefinedLiteral" => AstNodeKind::UndefinedLiteral,
        "BinaryExpr" => AstNodeKind::BinaryExpr(binary_op(wire.op.as_deref().context("a BinaryExpr node requires an \"op\"")?)?),
        "PrefixUnaryExpr" => AstNodeKind::PrefixUnaryExpr(unary_op(wire.op.as_deref().context("a PrefixUnaryExpr node requires an \"op\"")?)?),
        "PostfixUnaryExpr" => AstNodeKind::PostfixUnaryExpr(unary_op(wire.op.as_deref().context("a PostfixUnaryExpr node requires an \"op\"")?)?),
        "ConditionalExpr" => AstNodeKind::ConditionalExpr,
        "Call" => AstNodeKind::Call,
        "New" => AstNodeKind::New,
        "MemberAccess" => AstNodeKind::MemberAccess { name: name(&wire.name, "name")?, computed: wire.computed },
        "ArrayLiteral" => AstNodeKind::ArrayLiteral,
        "ObjectLiteral" => AstNodeKind::ObjectLiteral,
        "FunctionExpr" => AstNodeKind::FunctionExpr { name: intern_opt(interner, &wire.name) },
        "Block" => AstNodeKind::Block,
        "If" => AstNodeKind::If,
        "For" => AstNodeKind::For,
        "While" => AstNodeKind::While,
        "DoWhile" => AstNodeKind::DoWhile,
        "Switch" => AstNodeKind::Switch,
        "CaseClause" => AstNodeKind::CaseClause,
        "DefaultClause" => AstNodeKind::DefaultClause,
        "Return" => AstNodeKind::Return,
        "Break" => AstNodeKind::Break { label: intern_opt(interner, &wire.label) },
        "Continue" => AstNodeKind::Continue { label: intern_opt(interner, &wire.label) },
        "Throw" => AstNodeKind::Throw,
        "Try" => AstNodeKind::Try,
        "CatchClause" => AstNodeKind::CatchClause { param: intern_opt(interner, &wire.param) },
        "Finally" => AstNodeKind::Finally,
        "TypeOfExpr" => AstNodeKind::TypeOfExpr,
        "CastExpr" => AstNodeKind::CastExpr,
        "InstanceOfExpr" => AstNodeKind::InstanceOfExpr,
        other => bail!("unknown AST node kind \"{other}\""),
    };

    Ok(match ty {
        Some(ty) => builder.typed_node(kind, Span::dummy(), &children, ty),
        None => builder.node(kind, Span::dummy(), &children),
    })
}

/// Parses `source` (the JSON typed-AST input contract) into an [`AstArena`],
/// returning the `Module` root id and the [`Interner`] that now owns every
/// identifier the AST references.
///
/// Every node carries a dummy [`Span`]: the wire format has no source
/// positions of its own (spans only matter for this binary's diagnostic
/// output, and the `Diagnostic` type already degrades gracefully to `0..0`
/// when nothing better is known).
pub fn parse_module(source: &str) -> Result<(AstArena, AstId, Interner)> {
    let wire: WireModule = serde_json::from_str(source).context("input is not a valid typed-AST JSON document")?;
    let mut builder = AstArenaBuilder::new();
    let mut interner = Interner::new();
    let root = build_node(&mut builder, &mut interner, &wire.root)?;
    Ok((builder.finish(), root, interner))
}

#[cfg(test)]
#[path = "tests/ast_json.rs"]
mod tests;
