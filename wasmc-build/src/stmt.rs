//! The statement builder (C5): turns one typed-AST statement node into a
//! semantic-IR [`Node`](wasmc_ir::Node) (spec §4.5).
//!
//! A block pushes a scope, builds each child in order, and pops it; runs of
//! bare expression-statement children collapse into a single
//! [`NodeKind::BasicBlock`] the way the IR models "a straight-line sequence
//! of expression-statements" rather than one node per expression.

use wasmc_common::diagnostics::{codes, Diagnostic};
use wasmc_ir::{AstArena, AstId, AstNodeKind, CatchClause, NodeId, NodeKind, ValueId};
use wasmc_types::TypeId;

use crate::cast::cast_to;
use crate::context::{BuildContext, GlobalSymbol};
use crate::expr::build_expr;
use crate::resolve_type::resolve_type;

fn is_statement_kind(kind: &AstNodeKind) -> bool {
    matches!(
        kind,
        AstNodeKind::ClassDeclaration { .. }
            | AstNodeKind::InterfaceDeclaration { .. }
            | AstNodeKind::FunctionDeclaration { .. }
            | AstNodeKind::PropertyDeclaration { .. }
            | AstNodeKind::MethodDeclaration { .. }
            | AstNodeKind::VariableDeclaration { .. }
            | AstNodeKind::Block
            | AstNodeKind::If
            | AstNodeKind::For
            | AstNodeKind::While
            | AstNodeKind::DoWhile
            | AstNodeKind::Switch
            | AstNodeKind::CaseClause
            | AstNodeKind::DefaultClause
            | AstNodeKind::Return
            | AstNodeKind::Break { .. }
            | AstNodeKind::Continue { .. }
            | AstNodeKind::Throw
            | AstNodeKind::Try
            | AstNodeKind::CatchClause { .. }
            | AstNodeKind::Finally
            | AstNodeKind::Module
    )
}

fn not_yet_supported(ctx: &mut BuildContext, file: &str, ast: &AstArena, id: AstId) -> NodeId {
    let node = ast.get(id);
    ctx.push_diagnostic(Diagnostic::warning(
        file,
        node.span.start,
        node.span.len(),
        codes::UNIMPLEMENTED,
        "statement kind not yet lowered",
    ));
    ctx.nodes.push(node.span, NodeKind::Empty)
}

/// `{ ... }`: a scope boundary (spec §4.5). Consecutive bare-expression
/// children collapse into one `BasicBlock`.
fn build_block(ctx: &mut BuildContext, ast: &AstArena, file: &str, id: AstId) -> NodeId {
    let node = ast.get(id);
    let span = node.span;
    let children = node.children.clone();

    ctx.push_scope();
    let mut body = Vec::new();
    let mut pending_exprs: Vec<ValueId> = Vec::new();

    let flush = |ctx: &mut BuildContext, body: &mut Vec<NodeId>, pending: &mut Vec<ValueId>| {
        if !pending.is_empty() {
            let values = std::mem::take(pending);
            body.push(ctx.nodes.push(span, NodeKind::BasicBlock { values }));
        }
    };

    for child_id in children {
        let child_kind = ast.get(child_id).kind.clone();
        if is_statement_kind(&child_kind) {
            flush(ctx, &mut body, &mut pending_exprs);
            body.push(build_stmt(ctx, ast, file, child_id));
        } else {
            pending_exprs.push(build_expr(ctx, ast, file, child_id));
        }
    }
    flush(ctx, &mut body, &mut pending_exprs);

    ctx.pop_scope();
    ctx.nodes.push(span, NodeKind::Block { label: None, body })
}

/// A `let`/`const`/`var` statement: declares a fresh local, building the
/// initializer (if any) through the same coercion path binary-assignment
/// uses (spec §4.5).
fn build_var_declare(ctx: &mut BuildContext, ast: &AstArena, file: &str, id: AstId, name: wasmc_common::interner::Atom) -> NodeId {
    let node = ast.get(id);
    let span = node.span;
    let children = node.children.clone();

    let ty = match &node.ty {
        Some(ast_ty) => resolve_type(ctx, file, ast_ty),
        None => TypeId::ANY,
    };

    let init = children.first().map(|init_id| {
        let raw = build_expr(ctx, ast, file, *init_id);
        cast_to(ctx, file, ty, raw)
    });

    let slot = ctx.fresh_temp();
    let declaration = ctx.nodes.push(span, NodeKind::VarDeclare { name, ty, init });
    ctx.declare_local(name, slot);
    ctx.declare_local_node(name, declaration);
    declaration
}

/// A nested named function declaration: captured as a closure-valued local
/// rather than hoisted to module scope (spec §4.5).
fn build_nested_function_declare(ctx: &mut BuildContext, ast: &AstArena, id: AstId, name: wasmc_common::interner::Atom) -> NodeId {
    let span = ast.get(id).span;
    let function = match ctx.resolve_symbol(name) {
        Some(GlobalSymbol::Function(f)) => f,
        _ => {
            let f = ctx.fresh_function_ref();
            ctx.declare_symbol(name, GlobalSymbol::Function(f));
            f
        }
    };
    let value = ctx.values.push(span, TypeId::ANY, None, wasmc_ir::ValueKind::NewClosureFunction { function, captures: Vec::new() });

    let slot = ctx.fresh_temp();
    let declaration = ctx.nodes.push(span, NodeKind::VarDeclare { name, ty: TypeId::ANY, init: Some(value) });
    ctx.declare_local(name, slot);
    ctx.declare_local_node(name, declaration);
    declaration
}

fn build_if(ctx: &mut BuildContext, ast: &AstArena, file: &str, id: AstId) -> NodeId {
    let node = ast.get(id);
    let span = node.span;
    let children = node.children.clone();
    let test = build_expr(ctx, ast, file, children[0]);
    let then_branch = build_stmt(ctx, ast, file, children[1]);
    let else_branch = children.get(2).map(|c| build_stmt(ctx, ast, file, *c));
    ctx.nodes.push(span, NodeKind::If { test, then_branch, else_branch })
}

/// `for (init; test; update) body`; the typed-AST input contract always
/// supplies a canonical 4-part form (a missing test/update is normalized
/// upstream to `true` / an empty expression), so this builder never needs
/// to invent a `None` itself.
fn build_for(ctx: &mut BuildContext, ast: &AstArena, file: &str, id: AstId) -> NodeId {
    let node = ast.get(id);
    let span = node.span;
    let children = node.children.clone();
    let label = ctx.fresh_label();

    ctx.push_scope();
    let init = build_stmt(ctx, ast, file, children[0]);
    let test = build_expr(ctx, ast, file, children[1]);
    let update = build_expr(ctx, ast, file, children[2]);
    let body = build_stmt(ctx, ast, file, children[3]);
    ctx.pop_scope();

    ctx.nodes.push(span, NodeKind::For { label, init: Some(init), test: Some(test), update: Some(update), body })
}

fn build_while(ctx: &mut BuildContext, ast: &AstArena, file: &str, id: AstId) -> NodeId {
    let node = ast.get(id);
    let span = node.span;
    let children = node.children.clone();
    let label = ctx.fresh_label();
    let test = build_expr(ctx, ast, file, children[0]);
    let body = build_stmt(ctx, ast, file, children[1]);
    ctx.nodes.push(span, NodeKind::While { label, test, body })
}

fn build_do_while(ctx: &mut BuildContext, ast: &AstArena, file: &str, id: AstId) -> NodeId {
    let node = ast.get(id);
    let span = node.span;
    let children = node.children.clone();
    let label = ctx.fresh_label();
    let body = build_stmt(ctx, ast, file, children[0]);
    let test = build_expr(ctx, ast, file, children[1]);
    ctx.nodes.push(span, NodeKind::DoWhile { label, test, body })
}

fn build_switch(ctx: &mut BuildContext, ast: &AstArena, file: &str, id: AstId) -> NodeId {
    let node = ast.get(id);
    let span = node.span;
    let children = node.children.clone();
    let label = ctx.fresh_label();
    let discriminant = build_expr(ctx, ast, file, children[0]);
    let cases = children[1..].iter().map(|c| build_stmt(ctx, ast, file, *c)).collect();
    ctx.nodes.push(span, NodeKind::Switch { label, discriminant, cases })
}

fn build_case_clause(ctx: &mut BuildContext, ast: &AstArena, file: &str, id: AstId) -> NodeId {
    let node = ast.get(id);
    let span = node.span;
    let children = node.children.clone();
    let test = build_expr(ctx, ast, file, children[0]);
    let body = children[1..].iter().map(|c| build_stmt(ctx, ast, file, *c)).collect();
    ctx.nodes.push(span, NodeKind::CaseClause { test, body })
}

fn build_default_clause(ctx: &mut BuildContext, ast: &AstArena, file: &str, id: AstId) -> NodeId {
    let node = ast.get(id);
    let span = node.span;
    let body = node.children.iter().map(|c| build_stmt(ctx, ast, file, *c)).collect();
    ctx.nodes.push(span, NodeKind::DefaultClause { body })
}

fn build_return(ctx: &mut BuildContext, ast: &AstArena, file: &str, id: AstId) -> NodeId {
    let node = ast.get(id);
    let span = node.span;
    let value = node.children.first().map(|c| build_expr(ctx, ast, file, *c));
    ctx.nodes.push(span, NodeKind::Return { value })
}

fn build_throw(ctx: &mut BuildContext, ast: &AstArena, file: &str, id: AstId) -> NodeId {
    let node = ast.get(id);
    let span = node.span;
    let value = build_expr(ctx, ast, file, node.children[0]);
    ctx.nodes.push(span, NodeKind::Throw { value })
}

/// `try { block } catch (e) { ... } finally { ... }`. The catch parameter
/// has no natural `VarDeclare` node (the parameter list isn't itself an
/// expression), so a bare `Empty` node stands in as its declaration site —
/// it only needs to exist for [`crate::context::BuildContext::resolve_local_node`]
/// to have somewhere to point.
fn build_try(ctx: &mut BuildContext, ast: &AstArena, file: &str, id: AstId) -> NodeId {
    let node = ast.get(id);
    let span = node.span;
    let children = node.children.clone();

    let block = build_stmt(ctx, ast, file, children[0]);

    let mut catch = None;
    let mut finally = None;
    for clause_id in &children[1..] {
        match &ast.get(*clause_id).kind {
            AstNodeKind::CatchClause { param } => {
                let param = *param;
                let clause_span = ast.get(*clause_id).span;
                ctx.push_scope();
                let mut declaration = None;
                if let Some(name) = param {
                    let decl = ctx.nodes.push(clause_span, NodeKind::Empty);
                    let slot = ctx.fresh_temp();
                    ctx.declare_local(name, slot);
                    ctx.declare_local_node(name, decl);
                    declaration = Some(decl);
                }
                let body = build_stmt(ctx, ast, file, ast.get(*clause_id).children[0]);
                ctx.pop_scope();
                catch = Some(CatchClause { param, declaration, body });
            }
            AstNodeKind::Finally => {
                finally = Some(build_stmt(ctx, ast, file, ast.get(*clause_id).children[0]));
            }
            _ => {}
        }
    }

    ctx.nodes.push(span, NodeKind::Try { block, catch, finally })
}

pub fn build_stmt(ctx: &mut BuildContext, ast: &AstArena, file: &str, id: AstId) -> NodeId {
    match ast.get(id).kind.clone() {
        AstNodeKind::Block => build_block(ctx, ast, file, id),
        AstNodeKind::VariableDeclaration { name } => build_var_declare(ctx, ast, file, id, name),
        AstNodeKind::FunctionDeclaration { name } => build_nested_function_declare(ctx, ast, id, name),
        AstNodeKind::If => build_if(ctx, ast, file, id),
        AstNodeKind::For => build_for(ctx, ast, file, id),
        AstNodeKind::While => build_while(ctx, ast, file, id),
        AstNodeKind::DoWhile => build_do_while(ctx, ast, file, id),
        AstNodeKind::Switch => build_switch(ctx, ast, file, id),
        AstNodeKind::CaseClause => build_case_clause(ctx, ast, file, id),
        AstNodeKind::DefaultClause => build_default_clause(ctx, ast, file, id),
        AstNodeKind::Return => build_return(ctx, ast, file, id),
        AstNodeKind::Break { label } => {
            let span = ast.get(id).span;
            ctx.nodes.push(span, NodeKind::Break { label })
        }
        AstNodeKind::Continue { label } => {
            let span = ast.get(id).span;
            ctx.nodes.push(span, NodeKind::Continue { label })
        }
        AstNodeKind::Throw => build_throw(ctx, ast, file, id),
        AstNodeKind::Try => build_try(ctx, ast, file, id),
        _ => not_yet_supported(ctx, file, ast, id),
    }
}

#[cfg(test)]
#[path = "tests/stmt.rs"]
mod tests;
