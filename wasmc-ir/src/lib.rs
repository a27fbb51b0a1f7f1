//! The semantic IR (C3): two parallel trees — [`Value`] for expressions,
//! [`Node`] for statements and declarations — plus the typed-AST input
//! contract that stands in for the external parser/checker (spec §3.3,
//! §6.1).

pub mod ast;
pub use ast::{
    AstArena, AstArenaBuilder, AstId, AstNode, AstNodeKind, AstType, AstTypeKind, BinaryOp, ScopeId, ScopeTree,
    SymbolRef, UnaryOp,
};

pub mod value;
pub use value::{CastVariant, Literal, LocalRef, ReferenceKind, Value, ValueArena, ValueId, ValueKind};

pub mod node;
pub use node::{CatchClause, Node, NodeArena, NodeId, NodeKind};
