//! The runtime bridge (C8): the fixed signatures of the host dynamic-type
//! API every emitted module imports, and the built-in functions every
//! emitted module carries (spec §6.2, §6.3).
//!
//! This crate knows nothing about `wasm_encoder` — it describes signatures
//! in its own small [`WasmPrimType`] vocabulary so `wasmc-wasmgen` (which
//! does depend on `wasm_encoder`) can translate them into concrete
//! `ValType`/heap-type pairs without `wasmc-runtime` itself pulling in the
//! binary-writer ecosystem crate.

pub mod imports;
pub use imports::{HostImportSig, IMPORTS};

pub mod builtins;
pub use builtins::{BuiltinId, BuiltinSig, BUILTINS};

/// A parameter or result type as the host ABI sees it, independent of how
/// `wasmc-wasmgen` eventually represents it as a concrete WebAssembly
/// `ValType`/heap type (spec §3.5's representation/heap-type split).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WasmPrimType {
    I32,
    F64,
    /// The boxed dynamic-value type (`anyref`, spec §6.2's `any`).
    AnyRef,
    /// `ref stringType` (spec §4.6's string heap type).
    StringRef,
    /// `ref array_struct` for whichever element type the call site needs;
    /// the host API is element-type-erased.
    ArrayRef,
}
