//! IR nodes: the statement/declaration half of the semantic IR (spec
//! §3.3). Nodes own their sub-nodes; values never own nodes.

use wasmc_common::interner::Atom;
use wasmc_common::span::Span;
use wasmc_shape::FunctionRef;
use wasmc_types::TypeId;

use crate::value::ValueId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug)]
pub struct CatchClause {
    pub param: Option<Atom>,
    /// The synthetic local declaration `param` binds to, so codegen can
    /// route the caught value into the same local reads of `param` inside
    /// `body` already resolve to. `None` when there's no `param` to bind.
    pub declaration: Option<NodeId>,
    pub body: NodeId,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Module { functions: Vec<NodeId> },
    FunctionDeclare {
        name: Atom,
        function: FunctionRef,
        params: Vec<TypeId>,
        return_type: TypeId,
        /// Leading `empty_struct` slots for captured environment and
        /// `this` (spec §4.6): the raw parameter count the signature was
        /// augmented with, kept alongside the original list.
        env_param_len: u32,
        body: NodeId,
    },
    VarDeclare { name: Atom, ty: TypeId, init: Option<ValueId> },
    /// A straight-line sequence of expression-statements.
    BasicBlock { values: Vec<ValueId> },
    /// A scope boundary; `label` is the branch-target name allocated from
    /// the scope name (spec §4.5) so nested `break`/`continue` compile to
    /// WebAssembly branches by label.
    Block { label: Option<Atom>, body: Vec<NodeId> },
    If { test: ValueId, then_branch: NodeId, else_branch: Option<NodeId> },
    For { label: Atom, init: Option<NodeId>, test: Option<ValueId>, update: Option<ValueId>, body: NodeId },
    While { label: Atom, test: ValueId, body: NodeId },
    DoWhile { label: Atom, test: ValueId, body: NodeId },
    Switch { label: Atom, discriminant: ValueId, cases: Vec<NodeId> },
    CaseClause { test: ValueId, body: Vec<NodeId> },
    DefaultClause { body: Vec<NodeId> },
    Return { value: Option<ValueId> },
    Break { label: Option<Atom> },
    Continue { label: Option<Atom> },
    Throw { value: ValueId },
    /// The IR has no exception type; `Try` just carries its (up to) three
    /// optional bodies (spec §9).
    Try { block: NodeId, catch: Option<CatchClause>, finally: Option<NodeId> },
    Empty,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub span: Span,
    pub kind: NodeKind,
}

/// Arena-of-indices storage for [`Node`]s.
#[derive(Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    pub fn push(&mut self, span: Span, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { id, span, kind });
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/node.rs"]
mod tests;
