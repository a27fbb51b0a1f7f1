//! Host import table (spec §6.2): the `dyntype_*` API every emitted module
//! imports from the `"env"` module.

use crate::WasmPrimType::{self, AnyRef, I32, StringRef};

#[derive(Debug, Clone, Copy)]
pub struct HostImportSig {
    pub module: &'static str,
    pub name: &'static str,
    pub params: &'static [WasmPrimType],
    pub results: &'static [WasmPrimType],
}

const fn sig(name: &'static str, params: &'static [WasmPrimType], results: &'static [WasmPrimType]) -> HostImportSig {
    HostImportSig { module: "env", name, params, results }
}

/// Every host import the emitted module declares, in the order spec §6.2
/// lists them. `wasmc-wasmgen` walks this once per module and emits an
/// `ImportSection` entry per row.
pub static IMPORTS: &[HostImportSig] = &[
    sig("dyntype_context_init", &[], &[I32]),
    sig("dyntype_context_destroy", &[I32], &[]),
    sig("dyntype_new_number", &[I32, WasmPrimType::F64], &[AnyRef]),
    sig("dyntype_new_boolean", &[I32, I32], &[AnyRef]),
    sig("dyntype_new_string", &[I32, StringRef], &[AnyRef]),
    sig("dyntype_new_null", &[I32], &[AnyRef]),
    sig("dyntype_new_undefined", &[I32], &[AnyRef]),
    sig("dyntype_new_object", &[I32], &[AnyRef]),
    sig("dyntype_new_array", &[I32], &[AnyRef]),
    // `*f64` is passed as an i32 pointer into linear memory; the host
    // writes the unboxed value through it and returns a success flag.
    sig("dyntype_to_number", &[I32, AnyRef, I32], &[I32]),
    sig("dyntype_is_number", &[I32, AnyRef], &[I32]),
    sig("dyntype_is_array", &[I32, AnyRef], &[I32]),
    sig("dyntype_is_object", &[I32, AnyRef], &[I32]),
    sig("dyntype_is_extref", &[I32, AnyRef], &[I32]),
    sig("dyntype_is_undefined", &[I32, AnyRef], &[I32]),
    sig("dyntype_type_eq", &[I32, AnyRef, AnyRef], &[I32]),
    sig("dyntype_typeof", &[I32, AnyRef], &[I32]),
    sig("dyntype_get_property", &[I32, AnyRef, StringRef], &[AnyRef]),
    sig("dyntype_set_property", &[I32, AnyRef, StringRef, AnyRef], &[I32]),
    sig("dyntype_has_property", &[I32, AnyRef, StringRef], &[I32]),
    sig("dyntype_get_prototype", &[I32, AnyRef], &[AnyRef]),
    sig("dyntype_set_prototype", &[I32, AnyRef, AnyRef], &[I32]),
    // `*i32` table index is a pointer into linear memory, same convention
    // as `dyntype_to_number`'s output parameter.
    sig("dyntype_new_extref", &[I32, I32, I32], &[AnyRef]),
    sig("dyntype_to_extref", &[I32, AnyRef, I32], &[I32]),
];

#[cfg(test)]
#[path = "tests/imports.rs"]
mod tests;
