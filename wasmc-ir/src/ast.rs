//! The typed-AST input contract (spec §6.1, expanded per SPEC_FULL §6.1a).
//!
//! This module is deliberately the *only* place in the workspace that
//! pretends to be the external parser/checker. Nothing downstream
//! constructs these types from source text; test fixtures build them by
//! hand through [`AstArenaBuilder`].

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use wasmc_common::interner::Atom;
use wasmc_common::span::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AstId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Assign,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    Increment,
    Decrement,
}

/// The set of node shapes the AST input contract recognizes (spec §6.1:
/// "kind (enumerated)"). Covers every construct C4/C5 need to lower.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AstNodeKind {
    NumberLiteral(u64),
    StringLiteral(Atom),
    BooleanLiteral(bool),
    NullLiteral,
    UndefinedLiteral,
    Identifier(Atom),
    This,
    Super,
    BinaryExpr(BinaryOp),
    PrefixUnaryExpr(UnaryOp),
    PostfixUnaryExpr(UnaryOp),
    ConditionalExpr,
    Call,
    New,
    MemberAccess { name: Atom, computed: bool },
    ArrayLiteral,
    ObjectLiteral,
    FunctionExpr { name: Option<Atom> },
    ClassDeclaration { name: Atom },
    InterfaceDeclaration { name: Atom },
    FunctionDeclaration { name: Atom },
    PropertyDeclaration { name: Atom },
    MethodDeclaration { name: Atom },
    VariableDeclaration { name: Atom },
    Block,
    If,
    For,
    While,
    DoWhile,
    Switch,
    CaseClause,
    DefaultClause,
    Return,
    Break { label: Option<Atom> },
    Continue { label: Option<Atom> },
    Throw,
    Try,
    CatchClause { param: Option<Atom> },
    Finally,
    TypeOfExpr,
    CastExpr,
    InstanceOfExpr,
    Module,
}

/// One node in the external typed AST. `ty` is filled in by the upstream
/// type checker for every expression-position node; statement-only nodes
/// leave it `None`.
#[derive(Clone, Debug)]
pub struct AstNode {
    pub kind: AstNodeKind,
    pub span: Span,
    pub children: SmallVec<[AstId; 4]>,
    pub ty: Option<AstType>,
}

/// Arena-of-indices storage for AST nodes, the same idiom the rest of the
/// workspace uses for IR nodes and interned types.
#[derive(Default)]
pub struct AstArena {
    nodes: Vec<AstNode>,
}

impl AstArena {
    pub fn new() -> Self {
        AstArena { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: AstNode) -> AstId {
        let id = AstId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: AstId) -> &AstNode {
        &self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Ergonomic construction helper for hand-built test fixtures; not used
/// outside tests.
#[derive(Default)]
pub struct AstArenaBuilder {
    arena: AstArena,
}

impl AstArenaBuilder {
    pub fn new() -> Self {
        AstArenaBuilder { arena: AstArena::new() }
    }

    pub fn node(&mut self, kind: AstNodeKind, span: Span, children: &[AstId]) -> AstId {
        self.arena.push(AstNode { kind, span, children: SmallVec::from_slice(children), ty: None })
    }

    pub fn typed_node(&mut self, kind: AstNodeKind, span: Span, children: &[AstId], ty: AstType) -> AstId {
        self.arena.push(AstNode { kind, span, children: SmallVec::from_slice(children), ty: Some(ty) })
    }

    pub fn finish(self) -> AstArena {
        self.arena
    }
}

/// The external checker's type representation (spec §6.1: "kind,
/// structural composition, optional `typeArguments`").
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AstTypeKind {
    Void,
    Undefined,
    Null,
    Never,
    Number,
    Boolean,
    String,
    Any,
    Named(Atom),
    Array,
    Union,
    Function,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AstType {
    pub kind: AstTypeKind,
    pub type_arguments: Option<Vec<AstType>>,
}

impl AstType {
    pub fn simple(kind: AstTypeKind) -> Self {
        AstType { kind, type_arguments: None }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SymbolRef {
    pub scope: ScopeId,
    pub declaration: AstId,
}

struct Scope {
    parent: Option<ScopeId>,
    variables: FxHashMap<Atom, SymbolRef>,
    children: Vec<ScopeId>,
}

/// Parent-pointer scope tree with identifier resolution (spec §6.1: "scope
/// tree with parent pointer, variables, nested scopes, identifier-lookup
/// operation").
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        ScopeTree { scopes: vec![Scope { parent: None, variables: FxHashMap::default(), children: Vec::new() }] }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn push_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope { parent: Some(parent), variables: FxHashMap::default(), children: Vec::new() });
        self.scopes[parent.0 as usize].children.push(id);
        id
    }

    pub fn declare(&mut self, scope: ScopeId, name: Atom, declaration: AstId) {
        self.scopes[scope.0 as usize].variables.insert(name, SymbolRef { scope, declaration });
    }

    /// Walks the parent chain from `scope` up to the module root, returning
    /// the nearest enclosing declaration of `name` (spec §6.1's
    /// "identifier-lookup operation").
    pub fn resolve(&self, scope: ScopeId, name: Atom) -> Option<SymbolRef> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let node = &self.scopes[id.0 as usize];
            if let Some(sym) = node.variables.get(&name) {
                return Some(*sym);
            }
            current = node.parent;
        }
        None
    }
}

#[cfg(test)]
#[path = "tests/ast.rs"]
mod tests;
