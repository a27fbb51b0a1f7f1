//! Built-in function table (spec §6.3): fixed-signature functions emitted
//! into every module, lazily, the first time something references them.

use crate::WasmPrimType::{self, ArrayRef, StringRef, F64, I32};

/// Stable identity for a built-in, used as the cache key by
/// `wasmc-wasmgen`'s lazy emission (spec §6.3 "emitted once per module the
/// first time any built-in is referenced").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinId {
    MathSqrt,
    MathAbs,
    MathCeil,
    MathFloor,
    MathTrunc,
    ArrayIsArray,
    StringConcat,
    StringSlice,
    StringEq,
    StringIndexOf,
    /// The shared substring-search primitive every other `String.*`
    /// built-in invokes (spec §6.3).
    StringIndexOfInternal,
    StringReplace,
    StringSplit,
    StringMatch,
    StringSearch,
}

#[derive(Debug, Clone, Copy)]
pub struct BuiltinSig {
    pub id: BuiltinId,
    /// The name mangled into the emitted module's function-name custom
    /// section and used as the internal function's debug name.
    pub mangled_name: &'static str,
    pub params: &'static [WasmPrimType],
    pub results: &'static [WasmPrimType],
}

const fn sig(id: BuiltinId, mangled_name: &'static str, params: &'static [WasmPrimType], results: &'static [WasmPrimType]) -> BuiltinSig {
    BuiltinSig { id, mangled_name, params, results }
}

pub static BUILTINS: &[BuiltinSig] = &[
    sig(BuiltinId::MathSqrt, "Math.sqrt", &[F64], &[F64]),
    sig(BuiltinId::MathAbs, "Math.abs", &[F64], &[F64]),
    sig(BuiltinId::MathCeil, "Math.ceil", &[F64], &[F64]),
    sig(BuiltinId::MathFloor, "Math.floor", &[F64], &[F64]),
    sig(BuiltinId::MathTrunc, "Math.trunc", &[F64], &[F64]),
    sig(BuiltinId::ArrayIsArray, "Array.isArray", &[crate::WasmPrimType::AnyRef], &[I32]),
    sig(BuiltinId::StringConcat, "String.concat", &[StringRef, StringRef], &[StringRef]),
    sig(BuiltinId::StringSlice, "String.slice", &[StringRef, I32, I32], &[StringRef]),
    sig(BuiltinId::StringEq, "String.eq", &[StringRef, StringRef], &[I32]),
    sig(BuiltinId::StringIndexOf, "String.indexOf", &[StringRef, StringRef], &[I32]),
    sig(BuiltinId::StringIndexOfInternal, "String.indexOfInternal", &[StringRef, StringRef, I32], &[I32]),
    sig(BuiltinId::StringReplace, "String.replace", &[StringRef, StringRef, StringRef], &[StringRef]),
    sig(BuiltinId::StringSplit, "String.split", &[StringRef, StringRef], &[ArrayRef]),
    sig(BuiltinId::StringMatch, "String.match", &[StringRef, StringRef], &[ArrayRef]),
    sig(BuiltinId::StringSearch, "String.search", &[StringRef, StringRef], &[I32]),
];

pub fn find(id: BuiltinId) -> &'static BuiltinSig {
    BUILTINS.iter().find(|b| b.id == id).expect("BUILTINS must cover every BuiltinId")
}

#[cfg(test)]
#[path = "tests/builtins.rs"]
mod tests;
