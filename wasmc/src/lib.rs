//! The facade crate: ties the build pass (C4/C5), the WebAssembly type/code
//! generator (C6/C7), and the runtime import contract (C8) into a single
//! `compile()` entry point that turns a typed AST into a finished
//! WebAssembly-GC binary module (spec §5, §8).
//!
//! Grounded on the montera renderer's top-level driver (`other_examples/...
//! gc_ops/ops.rs`'s `to_wasm_binary`: build each section independently, then
//! `Module::new().section(&x)...finish()`), generalized from one fixed
//! fuzzer-generated function to the semantic IR's module of
//! mutually-recursive top-level functions.

use wasm_encoder::{Module, NameMap, NameSection};

use wasmc_build::context::BuildContext;
use wasmc_build::module::build_module;
use wasmc_common::diagnostics::Diagnostic;
use wasmc_common::interner::{Atom, Interner};
use wasmc_ir::{AstArena, AstId, NodeId, NodeKind};
use wasmc_types::TypeId;
use wasmc_wasmgen::CodeGenerator;

pub use wasmc_common::diagnostics;

/// Tunables for one [`compile`] call (spec §5's output-contract knobs).
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Emit a WebAssembly `name` custom section for functions and types
    /// (spec §5's "readable disassembly" goal). Off by default for
    /// release-sized output.
    pub emit_names: bool,
    /// The source file path diagnostics are attributed to.
    pub file: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions { emit_names: false, file: "input.ts".to_string() }
    }
}

/// The result of a successful [`compile`] call: the finished module bytes
/// plus any non-fatal diagnostics collected along the way (spec §7's
/// "warnings never stop compilation").
#[derive(Debug, Clone)]
pub struct CompiledModule {
    pub bytes: Vec<u8>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Owns the [`BuildContext`] for one compilation. Deliberately not `Sync`:
/// its arenas are plain `Vec`/`FxHashMap` storage meant for single-threaded,
/// single-pass use (spec §3.4), never shared mid-compile.
#[derive(Default)]
pub struct CompileSession {
    ctx: BuildContext,
}

impl CompileSession {
    pub fn new() -> Self {
        CompileSession { ctx: BuildContext::new() }
    }

    /// The diagnostics accumulated so far, including from a prior failed
    /// [`compile`] call on this session.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.ctx.diagnostics()
    }
}

/// One top-level function's state threaded from the build pass into the
/// two-pass code generation below.
struct PendingFunction {
    name: Atom,
    body: NodeId,
}

/// Lowers `ast`'s `root` `Module` node into a WebAssembly-GC binary module
/// (spec §5): C4/C5's [`build_module`], then C6/C7's type and code
/// generators, then final `wasm_encoder::Module` assembly.
///
/// `interner` must be the same [`Interner`] that produced the identifiers in
/// `ast` — `wasmc-build`'s arenas only ever carry `Atom`s, never resolved
/// text, so exported function names are resolved through it here.
///
/// Returns `Err` only when the build pass raised a fatal diagnostic: an
/// unresolvable identifier, a failed generic instantiation, or a type
/// mismatch never reaches code generation (spec §7). Non-fatal diagnostics
/// (shape fallbacks, `Unimplement` markers) are instead carried on the
/// returned [`CompiledModule`].
pub fn compile(session: &mut CompileSession, ast: &AstArena, root: AstId, interner: &Interner, options: &CompileOptions) -> Result<CompiledModule, Vec<Diagnostic>> {
    let ctx = &mut session.ctx;
    let module_id = build_module(ctx, ast, &options.file, root);

    if ctx.has_fatal_diagnostic() {
        return Err(ctx.diagnostics().to_vec());
    }

    let NodeKind::Module { functions } = ctx.nodes.get(module_id).kind.clone() else {
        unreachable!("build_module always returns a Module node");
    };

    let mut codegen = CodeGenerator::new(&ctx.values, &ctx.nodes, &ctx.types, &ctx.descriptors, interner, options.emit_names);

    // Pass 1: declare every function's WebAssembly type and function index
    // up front, so a call to a function declared later in the module (or to
    // itself, recursively) resolves once its body is compiled (mirrors
    // `build_module`'s own pre-declaration of the symbol table).
    let mut pending = Vec::with_capacity(functions.len());
    for &func_node in &functions {
        let NodeKind::FunctionDeclare { name, function, params, return_type, body, .. } = ctx.nodes.get(func_node).kind.clone() else {
            continue;
        };
        let param_types = params.iter().map(|ty| codegen.registry_mut().ensure_value_type(&ctx.types, &ctx.descriptors, *ty)).collect();
        let result_types = if return_type == TypeId::VOID {
            Vec::new()
        } else {
            vec![codegen.registry_mut().ensure_value_type(&ctx.types, &ctx.descriptors, return_type)]
        };
        let type_index = codegen.registry_mut().alloc_function_type(param_types, result_types);
        let function_index = codegen.declare_function(type_index);
        codegen.register_function(function, function_index);
        pending.push((function_index, PendingFunction { name, body }));
    }

    // Pass 2: compile each body now that every callee in the module
    // resolves, exporting it under its source name (spec §5's "every
    // top-level function is exported" contract).
    let mut function_names = NameMap::new();
    for (function_index, entry) in &pending {
        let body = codegen.build_function(entry.body);
        codegen.finish_function(body);
        let name = interner.resolve(entry.name);
        codegen.export_function(name, *function_index);
        if options.emit_names {
            function_names.append(*function_index, name);
        }
    }

    let (registry, imports, wasm_functions, tables, globals, exports, tags, code, builtin_names) = codegen.into_sections();
    let (types, type_names) = registry.finish();

    let mut module = Module::new();
    module
        .section(&types)
        .section(&imports)
        .section(&wasm_functions)
        .section(&tables)
        .section(&globals)
        .section(&exports)
        .section(&tags)
        .section(&code);

    if options.emit_names {
        for (index, name) in &builtin_names {
            function_names.append(*index, name);
        }
        let mut names = NameSection::new();
        names.functions(&function_names);
        if !type_names.is_empty() {
            let mut type_name_map = NameMap::new();
            for (index, name) in &type_names {
                type_name_map.append(*index, name);
            }
            names.types(&type_name_map);
        }
        module.section(&names);
    }

    Ok(CompiledModule { bytes: module.finish(), diagnostics: ctx.diagnostics().to_vec() })
}

#[cfg(test)]
#[path = "tests/lib.rs"]
mod tests;
