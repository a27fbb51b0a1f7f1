//! Module-level declarations: the handful of top-level AST shapes that
//! never appear nested inside a statement (spec §6.1a's `Module` root).
//!
//! `build_stmt`'s `FunctionDeclaration` handling is for a function declared
//! *inside* a block — it captures the function as a closure-valued local
//! (spec §4.5). A function declared at module scope instead becomes its
//! own [`wasmc_ir::NodeKind::FunctionDeclare`], hoisted ahead of the
//! bodies that call it so forward references resolve.
//!
//! Class/interface/property/method declarations at module scope aren't
//! hoisted by this pass yet — see `DESIGN.md`.

use wasmc_common::diagnostics::{codes, Diagnostic};
use wasmc_ir::{AstArena, AstId, AstNodeKind, NodeId, NodeKind};
use wasmc_types::TypeId;

use crate::context::{BuildContext, GlobalSymbol};
use crate::resolve_type::resolve_type;
use crate::stmt::build_stmt;

fn build_function_declaration(ctx: &mut BuildContext, ast: &AstArena, file: &str, id: AstId, name: wasmc_common::interner::Atom) -> NodeId {
    let node = ast.get(id);
    let span = node.span;
    let return_type = match &node.ty {
        Some(ast_ty) => resolve_type(ctx, file, ast_ty),
        None => TypeId::VOID,
    };
    let children = node.children.clone();
    let Some((&body_id, param_ids)) = children.split_last() else {
        ctx.push_diagnostic(Diagnostic::error(file, span.start, span.len(), codes::UNIMPLEMENTED, "function declaration has no body"));
        return ctx.nodes.push(span, NodeKind::Empty);
    };

    let function = match ctx.resolve_symbol(name) {
        Some(GlobalSymbol::Function(f)) => f,
        _ => {
            let f = ctx.fresh_function_ref();
            ctx.declare_symbol(name, GlobalSymbol::Function(f));
            f
        }
    };

    ctx.push_scope();
    let mut params = Vec::with_capacity(param_ids.len());
    for param_id in param_ids {
        let param_node = ast.get(*param_id);
        let AstNodeKind::VariableDeclaration { name: param_name } = param_node.kind else {
            continue;
        };
        let ty = match &param_node.ty {
            Some(ast_ty) => resolve_type(ctx, file, ast_ty),
            None => TypeId::ANY,
        };
        let slot = ctx.fresh_temp();
        let declaration = ctx.nodes.push(param_node.span, NodeKind::VarDeclare { name: param_name, ty, init: None });
        ctx.declare_local(param_name, slot);
        ctx.declare_local_node(param_name, declaration);
        params.push(ty);
    }
    let body = build_stmt(ctx, ast, file, body_id);
    ctx.pop_scope();

    ctx.nodes.push(span, NodeKind::FunctionDeclare { name, function, params, return_type, env_param_len: 0, body })
}

/// Builds the `Module` root: pre-declares every top-level function (so
/// mutually-recursive calls resolve regardless of declaration order, spec
/// §3.4's "global map of symbols"), then lowers each one in turn.
pub fn build_module(ctx: &mut BuildContext, ast: &AstArena, file: &str, root: AstId) -> NodeId {
    let node = ast.get(root);
    let span = node.span;
    let children = node.children.clone();

    for child_id in &children {
        if let AstNodeKind::FunctionDeclaration { name } = ast.get(*child_id).kind {
            if ctx.resolve_symbol(name).is_none() {
                let f = ctx.fresh_function_ref();
                ctx.declare_symbol(name, GlobalSymbol::Function(f));
            }
        }
    }

    let mut functions = Vec::new();
    for child_id in children {
        match ast.get(child_id).kind.clone() {
            AstNodeKind::FunctionDeclaration { name } => {
                functions.push(build_function_declaration(ctx, ast, file, child_id, name));
            }
            _ => {
                let decl_span = ast.get(child_id).span;
                ctx.push_diagnostic(Diagnostic::warning(
                    file,
                    decl_span.start,
                    decl_span.len(),
                    codes::UNIMPLEMENTED,
                    "module-scope declaration kind not yet hoisted",
                ));
            }
        }
    }

    ctx.nodes.push(span, NodeKind::Module { functions })
}

#[cfg(test)]
#[path = "tests/module.rs"]
mod tests;
