//! Building the semantic IR (C4/C5): the expression and statement builders
//! that turn a typed AST into [`wasmc_ir::Value`]/[`wasmc_ir::Node`] trees,
//! threaded through a single [`BuildContext`] (spec §3.4, §4).

pub mod context;
pub use context::{BuildContext, GlobalSymbol, ScopeFrame};

pub mod resolve_type;
pub use resolve_type::resolve_type;

pub mod cast;
pub use cast::cast_to;

pub mod dispatch;
pub use dispatch::{resolve_member_access, shape_ref_for, Access};

pub mod expr;
pub use expr::build_expr;

pub mod stmt;
pub use stmt::build_stmt;

pub mod module;
pub use module::build_module;
