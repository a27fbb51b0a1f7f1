//! The build context (spec §3.4): everything threaded through C4/C5 while
//! lowering a typed AST into the semantic IR.

use rustc_hash::FxHashMap;
use wasmc_common::diagnostics::Diagnostic;
use wasmc_common::interner::{Atom, Interner};
use wasmc_ir::{NodeArena, NodeId, ReferenceKind, ValueArena};
use wasmc_shape::{DescriptorArena, FunctionRef};
use wasmc_types::TypeArena;

/// One entry in the scope stack: local declarations visible in this
/// lexical scope and its own temp-variable counter (spec §3.4 "per-scope
/// temp-variable counters").
#[derive(Default)]
pub struct ScopeFrame {
    pub locals: FxHashMap<Atom, u32>,
    /// The `VarDeclare` node each local was materialized from, so an
    /// identifier reference can build a `LocalRef` pointing back to it.
    pub declaration_nodes: FxHashMap<Atom, NodeId>,
    next_temp: u32,
}

impl ScopeFrame {
    pub fn fresh_temp(&mut self) -> u32 {
        let slot = self.next_temp;
        self.next_temp += 1;
        slot
    }
}

/// A resolved top-level name: either a function or a class/interface
/// descriptor, the two things the global symbol map can hold (spec §3.4
/// "a global map of symbols").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlobalSymbol {
    Function(FunctionRef),
    Type(wasmc_types::TypeId),
}

/// Threads through the expression and statement builders: scope stack,
/// reference-kind stack, global symbol table, and the owned IR/type/shape
/// arenas that the rest of the compilation reads from afterward.
pub struct BuildContext {
    pub types: TypeArena,
    pub descriptors: DescriptorArena,
    pub values: ValueArena,
    pub nodes: NodeArena,

    scopes: Vec<ScopeFrame>,
    refkind_stack: Vec<ReferenceKind>,
    symbols: FxHashMap<Atom, GlobalSymbol>,
    diagnostics: Vec<Diagnostic>,
    next_function_ref: u32,
    /// Mints the synthetic branch-target labels the statement builder
    /// allocates for loop/switch scopes (spec §4.5 "label strings allocated
    /// from the scope name").
    label_interner: Interner,
    next_label: u32,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildContext {
    pub fn new() -> Self {
        BuildContext {
            types: TypeArena::new(),
            descriptors: DescriptorArena::new(),
            values: ValueArena::new(),
            nodes: NodeArena::new(),
            scopes: vec![ScopeFrame::default()],
            refkind_stack: vec![ReferenceKind::Right],
            symbols: FxHashMap::default(),
            diagnostics: Vec::new(),
            next_function_ref: 0,
            label_interner: Interner::new(),
            next_label: 0,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(ScopeFrame::default());
    }

    pub fn pop_scope(&mut self) {
        assert!(self.scopes.len() > 1, "cannot pop the module-level scope");
        self.scopes.pop();
    }

    pub fn current_scope_mut(&mut self) -> &mut ScopeFrame {
        self.scopes.last_mut().expect("scope stack is never empty")
    }

    pub fn declare_local(&mut self, name: Atom, slot: u32) {
        self.current_scope_mut().locals.insert(name, slot);
    }

    /// Looks up `name` from the innermost scope outward.
    pub fn resolve_local(&self, name: Atom) -> Option<u32> {
        self.scopes.iter().rev().find_map(|scope| scope.locals.get(&name).copied())
    }

    /// Records the `VarDeclare` node a local was materialized from,
    /// alongside [`BuildContext::declare_local`].
    pub fn declare_local_node(&mut self, name: Atom, declaration: NodeId) {
        self.current_scope_mut().declaration_nodes.insert(name, declaration);
    }

    pub fn resolve_local_node(&self, name: Atom) -> Option<NodeId> {
        self.scopes.iter().rev().find_map(|scope| scope.declaration_nodes.get(&name).copied())
    }

    pub fn fresh_temp(&mut self) -> u32 {
        self.current_scope_mut().fresh_temp()
    }

    pub fn push_reference_kind(&mut self, kind: ReferenceKind) {
        self.refkind_stack.push(kind);
    }

    pub fn pop_reference_kind(&mut self) {
        assert!(self.refkind_stack.len() > 1, "cannot pop the default reference kind");
        self.refkind_stack.pop();
    }

    pub fn reference_kind(&self) -> ReferenceKind {
        *self.refkind_stack.last().expect("reference-kind stack is never empty")
    }

    /// Mints a fresh [`FunctionRef`] for a function value with no top-level
    /// name of its own (an anonymous closure expression).
    pub fn fresh_function_ref(&mut self) -> FunctionRef {
        let id = self.next_function_ref;
        self.next_function_ref += 1;
        FunctionRef(id)
    }

    /// Mints a fresh branch-target label for a loop or switch scope.
    pub fn fresh_label(&mut self) -> Atom {
        let label = format!("$label{}", self.next_label);
        self.next_label += 1;
        self.label_interner.intern(&label)
    }

    pub fn declare_symbol(&mut self, name: Atom, symbol: GlobalSymbol) {
        self.symbols.insert(name, symbol);
    }

    pub fn resolve_symbol(&self, name: Atom) -> Option<GlobalSymbol> {
        self.symbols.get(&name).copied()
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_fatal() {
            tracing::error!(code = diagnostic.code, message = %diagnostic.message, "fatal diagnostic");
        } else {
            tracing::warn!(code = diagnostic.code, message = %diagnostic.message, "diagnostic");
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_fatal_diagnostic(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_fatal)
    }
}

#[cfg(test)]
#[path = "tests/context.rs"]
mod tests;
