//! The WebAssembly type generator and code generator (C6/C7): turns the
//! semantic IR's value types and `Node`/`Value` trees into a concrete
//! WebAssembly-GC binary module via `wasm_encoder` (spec §3.5, §4.6, §4.7).
//!
//! `wasmc-wasmgen` never hand-assembles bytes; every section is built
//! through `wasm_encoder`'s own builders, matching the ecosystem's own
//! `wasm-encoder` consumers (see `DESIGN.md`).

pub mod types;
pub use types::TypeRegistry;

pub mod codegen;
pub use codegen::CodeGenerator;
