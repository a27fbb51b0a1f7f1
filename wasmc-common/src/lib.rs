//! Shared primitives for the wasmc compiler.
//!
//! This crate provides foundational types used across all `wasmc-*` crates:
//! - String interning (`Atom`, `Interner`)
//! - Source spans (`Span`, `Spanned`, `SpanBuilder`)
//! - Compiler diagnostics (`Diagnostic`, `DiagnosticCategory`)
//! - Compiler limits and thresholds
//! - Position/range types for source locations

pub mod interner;
pub use interner::{Atom, Interner};

pub mod span;
pub use span::{Span, SpanBuilder, Spanned};

pub mod position;
pub use position::{LineMap, Position, Range};

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};

pub mod limits;
