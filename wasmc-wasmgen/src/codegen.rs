//! The WebAssembly code generator (C7, spec §4.7): walks the semantic IR
//! and emits a concrete `wasm_encoder::Module`.
//!
//! Grounded on the montera renderer's section-by-section assembly
//! (`other_examples/.../render.rs`: `index_functions`, `render_import`,
//! `render_abstract`, manual `next_function_index` bookkeeping) generalized
//! from a flat bytecode interpreter's instruction set to the semantic IR's
//! richer dispatch variants (`OffsetCall`/`VTableCall`/`ShapeCall`/
//! `DynamicCall`/`ClosureCall`, spec §4.3) and to the try/catch/finally
//! double-nesting and binary-operator kind dispatch spec §4.7 requires.
//!
//! Host calls (`dyntype_*`) in this pass push only the operand values the
//! IR itself carries; the dyntype context argument and the output-pointer
//! arguments `dyntype_to_number`/`dyntype_new_extref`/`dyntype_to_extref`
//! take (spec §6.2) are a module-wide calling convention this pass doesn't
//! yet thread through every call site (see `DESIGN.md`).

use rustc_hash::FxHashMap;
use wasm_encoder::{
    BlockType, CodeSection, ConstExpr, EntityType, ExportKind, ExportSection, Function, FunctionSection, GlobalSection,
    GlobalType, HeapType, ImportSection, Instruction, TableSection, TableType, TagKind, TagSection, TagType, ValType,
};

use wasmc_common::interner::{Atom, Interner};
use wasmc_ir::{BinaryOp, CastVariant, Literal, Node, NodeArena, NodeId, NodeKind, UnaryOp, Value, ValueArena, ValueId, ValueKind};
use wasmc_runtime::{BuiltinId, WasmPrimType, BUILTINS, IMPORTS};
use wasmc_shape::{DescriptorArena, FunctionRef};
use wasmc_types::{TypeArena, TypeId, ValueTypeKind};

use crate::types::TypeRegistry;

/// One compiled function's locals: every `VarDeclare`/parameter gets a
/// dense local index, assigned the first time it's referenced.
#[derive(Default)]
struct LocalAllocator {
    slots: FxHashMap<u32, u32>,
    next: u32,
    kinds: Vec<ValType>,
}

impl LocalAllocator {
    fn reserve(&mut self, slot: u32, ty: ValType) -> u32 {
        if let Some(idx) = self.slots.get(&slot) {
            return *idx;
        }
        let idx = self.next;
        self.next += 1;
        self.kinds.push(ty);
        self.slots.insert(slot, idx);
        idx
    }
}

pub struct CodeGenerator<'a> {
    values: &'a ValueArena,
    nodes: &'a NodeArena,
    types_arena: &'a TypeArena,
    descriptors: &'a DescriptorArena,
    interner: &'a Interner,
    registry: TypeRegistry,

    imports: ImportSection,
    functions: FunctionSection,
    exports: ExportSection,
    code: CodeSection,
    globals: GlobalSection,
    tags: TagSection,
    tables: TableSection,

    next_function_index: u32,
    import_indices: FxHashMap<&'static str, u32>,
    builtin_indices: FxHashMap<BuiltinId, u32>,
    function_indices: FxHashMap<FunctionRef, u32>,
    function_names: Vec<(u32, String)>,

    dyntype_ctx_global: u32,
    error_tag: u32,
    finally_tag: u32,
    extref_table: u32,
    emit_names: bool,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(
        values: &'a ValueArena,
        nodes: &'a NodeArena,
        types_arena: &'a TypeArena,
        descriptors: &'a DescriptorArena,
        interner: &'a Interner,
        emit_names: bool,
    ) -> Self {
        let mut registry = TypeRegistry::new(emit_names);
        let mut imports = ImportSection::new();
        let mut import_indices = FxHashMap::default();
        let mut next_function_index = 0;

        for sig in IMPORTS {
            let params: Vec<ValType> = sig.params.iter().map(|p| Self::prim_val_type(&mut registry, *p)).collect();
            let results: Vec<ValType> = sig.results.iter().map(|p| Self::prim_val_type(&mut registry, *p)).collect();
            let type_index = registry.alloc_function_type(params, results);
            imports.import(sig.module, sig.name, EntityType::Function(type_index));
            import_indices.insert(sig.name, next_function_index);
            next_function_index += 1;
        }

        // Module-level globals fixed by the output contract (spec §6.4):
        // the dyntype context plus per-class static-field globals (added
        // lazily as classes are encountered) and the host stack pointer.
        let mut globals = GlobalSection::new();
        let anyref_heap = wasm_encoder::RefType { nullable: true, heap_type: HeapType::Abstract { shared: false, ty: wasm_encoder::AbstractHeapType::Any } };
        let dyntype_ctx_global_index = 0u32;
        globals.global(
            GlobalType { val_type: ValType::I32, mutable: true },
            &ConstExpr::i32_const(0),
        );
        let _ = anyref_heap;

        let mut tags = TagSection::new();
        let error_tag_type = registry.alloc_function_type(vec![ValType::Ref(wasm_encoder::RefType { nullable: true, heap_type: HeapType::Abstract { shared: false, ty: wasm_encoder::AbstractHeapType::Any } })], Vec::new());
        tags.tag(TagType { kind: TagKind::Exception, func_type_idx: error_tag_type });
        let finally_tag_type = registry.alloc_function_type(vec![ValType::Ref(wasm_encoder::RefType { nullable: true, heap_type: HeapType::Abstract { shared: false, ty: wasm_encoder::AbstractHeapType::Any } })], Vec::new());
        tags.tag(TagType { kind: TagKind::Exception, func_type_idx: finally_tag_type });

        let mut tables = TableSection::new();
        let extref_table = 0u32;
        tables.table(TableType {
            element_type: wasm_encoder::RefType { nullable: true, heap_type: HeapType::Abstract { shared: false, ty: wasm_encoder::AbstractHeapType::Any } },
            minimum: 0,
            maximum: None,
            table64: false,
            shared: false,
        });

        CodeGenerator {
            values,
            nodes,
            types_arena,
            descriptors,
            interner,
            registry,
            imports,
            functions: FunctionSection::new(),
            exports: ExportSection::new(),
            code: CodeSection::new(),
            globals,
            tags,
            tables,
            next_function_index,
            import_indices,
            builtin_indices: FxHashMap::default(),
            function_indices: FxHashMap::default(),
            function_names: Vec::new(),
            dyntype_ctx_global: dyntype_ctx_global_index,
            error_tag: 0,
            finally_tag: 1,
            extref_table,
            emit_names,
        }
    }

    fn prim_val_type(registry: &mut TypeRegistry, prim: WasmPrimType) -> ValType {
        match prim {
            WasmPrimType::I32 => ValType::I32,
            WasmPrimType::F64 => ValType::F64,
            WasmPrimType::AnyRef => ValType::Ref(wasm_encoder::RefType { nullable: true, heap_type: HeapType::Abstract { shared: false, ty: wasm_encoder::AbstractHeapType::Any } }),
            WasmPrimType::StringRef => ValType::Ref(wasm_encoder::RefType { nullable: true, heap_type: HeapType::Concrete(registry.string_type) }),
            WasmPrimType::ArrayRef => ValType::Ref(wasm_encoder::RefType { nullable: true, heap_type: HeapType::Abstract { shared: false, ty: wasm_encoder::AbstractHeapType::Any } }),
        }
    }

    fn import_index(&self, name: &str) -> u32 {
        *self.import_indices.get(name).unwrap_or_else(|| panic!("host import {name} was not registered"))
    }

    /// Lazily emits a built-in's body the first time it's referenced (spec
    /// §6.3). `Math.*` built-ins lower directly to the matching WebAssembly
    /// float instruction; `Array.isArray` delegates to the host's
    /// `dyntype_is_array`. `String.indexOfInternal` is the shared
    /// substring-search primitive the other comparable `String.*` built-ins
    /// reduce to; `String.concat`/`slice`/`replace`/`split`/`match` would
    /// need `char_array_type` to be a mutable array (it's declared
    /// immutable) to build a result of runtime-determined length without an
    /// `array.copy`/`array.fill` this pass has no grounded use of elsewhere,
    /// so those remain `unreachable` stubs (see `DESIGN.md`).
    pub fn ensure_builtin(&mut self, id: BuiltinId) -> u32 {
        if let Some(idx) = self.builtin_indices.get(&id) {
            return *idx;
        }
        // Resolved before this builtin's own function/code entries are
        // pushed: `function_index`/`code_index` are assigned to each
        // builtin in the order their `functions.function`/`code.function`
        // calls happen, so a dependency resolved in the middle of this
        // one's own body-building would desynchronize the two sections.
        let internal = match id {
            BuiltinId::StringIndexOf | BuiltinId::StringSearch => Some(self.ensure_builtin(BuiltinId::StringIndexOfInternal)),
            _ => None,
        };

        let sig = BUILTINS.iter().find(|b| b.id == id).expect("BuiltinId must be registered");
        let params: Vec<ValType> = sig.params.iter().map(|p| Self::prim_val_type(&mut self.registry, *p)).collect();
        let results: Vec<ValType> = sig.results.iter().map(|p| Self::prim_val_type(&mut self.registry, *p)).collect();
        let type_index = self.registry.alloc_function_type(params, results);
        self.functions.function(type_index);

        let string_type = self.registry.string_type;
        let char_array_type = self.registry.char_array_type;
        let char_array_ref = ValType::Ref(wasm_encoder::RefType { nullable: false, heap_type: HeapType::Concrete(char_array_type) });

        let locals: Vec<(u32, ValType)> = match id {
            BuiltinId::StringIndexOfInternal => vec![
                (1, ValType::I32),      // 3: hlen
                (1, ValType::I32),      // 4: nlen
                (1, char_array_ref.clone()), // 5: harr
                (1, char_array_ref.clone()), // 6: narr
                (1, ValType::I32),      // 7: j
            ],
            BuiltinId::StringEq => vec![
                (1, ValType::I32),      // 2: alen
                (1, char_array_ref.clone()), // 3: aarr
                (1, char_array_ref.clone()), // 4: barr
                (1, ValType::I32),      // 5: i
            ],
            _ => Vec::new(),
        };
        let mut f = Function::new(locals);
        match id {
            BuiltinId::MathSqrt => {
                f.instruction(&Instruction::LocalGet(0)).instruction(&Instruction::F64Sqrt);
            }
            BuiltinId::MathAbs => {
                f.instruction(&Instruction::LocalGet(0)).instruction(&Instruction::F64Abs);
            }
            BuiltinId::MathCeil => {
                f.instruction(&Instruction::LocalGet(0)).instruction(&Instruction::F64Ceil);
            }
            BuiltinId::MathFloor => {
                f.instruction(&Instruction::LocalGet(0)).instruction(&Instruction::F64Floor);
            }
            BuiltinId::MathTrunc => {
                f.instruction(&Instruction::LocalGet(0)).instruction(&Instruction::F64Trunc);
            }
            BuiltinId::ArrayIsArray => {
                let is_array = self.import_index("dyntype_is_array");
                f.instruction(&Instruction::GlobalGet(self.dyntype_ctx_global))
                    .instruction(&Instruction::LocalGet(0))
                    .instruction(&Instruction::Call(is_array));
            }
            BuiltinId::StringIndexOfInternal => {
                // haystack=0, needle=1, start=2; hlen=3, nlen=4, harr=5, narr=6, j=7.
                f.instruction(&Instruction::LocalGet(0));
                f.instruction(&Instruction::StructGet { struct_type_index: string_type, field_index: 0 });
                f.instruction(&Instruction::LocalSet(3));
                f.instruction(&Instruction::LocalGet(1));
                f.instruction(&Instruction::StructGet { struct_type_index: string_type, field_index: 0 });
                f.instruction(&Instruction::LocalSet(4));
                f.instruction(&Instruction::LocalGet(0));
                f.instruction(&Instruction::StructGet { struct_type_index: string_type, field_index: 1 });
                f.instruction(&Instruction::LocalSet(5));
                f.instruction(&Instruction::LocalGet(1));
                f.instruction(&Instruction::StructGet { struct_type_index: string_type, field_index: 1 });
                f.instruction(&Instruction::LocalSet(6));

                f.instruction(&Instruction::Block(BlockType::Empty));
                f.instruction(&Instruction::Loop(BlockType::Empty));
                // start + nlen > hlen: no room left for a match, give up.
                f.instruction(&Instruction::LocalGet(2));
                f.instruction(&Instruction::LocalGet(4));
                f.instruction(&Instruction::I32Add);
                f.instruction(&Instruction::LocalGet(3));
                f.instruction(&Instruction::I32GtS);
                f.instruction(&Instruction::BrIf(1));

                f.instruction(&Instruction::I32Const(0));
                f.instruction(&Instruction::LocalSet(7));
                f.instruction(&Instruction::Block(BlockType::Empty));
                f.instruction(&Instruction::Loop(BlockType::Empty));
                f.instruction(&Instruction::LocalGet(7));
                f.instruction(&Instruction::LocalGet(4));
                f.instruction(&Instruction::I32GeS);
                f.instruction(&Instruction::If(BlockType::Empty));
                f.instruction(&Instruction::LocalGet(2));
                f.instruction(&Instruction::Return);
                f.instruction(&Instruction::End);

                f.instruction(&Instruction::LocalGet(5));
                f.instruction(&Instruction::LocalGet(2));
                f.instruction(&Instruction::LocalGet(7));
                f.instruction(&Instruction::I32Add);
                f.instruction(&Instruction::ArrayGetU(char_array_type));
                f.instruction(&Instruction::LocalGet(6));
                f.instruction(&Instruction::LocalGet(7));
                f.instruction(&Instruction::ArrayGetU(char_array_type));
                f.instruction(&Instruction::I32Ne);
                f.instruction(&Instruction::BrIf(1));

                f.instruction(&Instruction::LocalGet(7));
                f.instruction(&Instruction::I32Const(1));
                f.instruction(&Instruction::I32Add);
                f.instruction(&Instruction::LocalSet(7));
                f.instruction(&Instruction::Br(0));
                f.instruction(&Instruction::End); // inner loop
                f.instruction(&Instruction::End); // inner block

                f.instruction(&Instruction::LocalGet(2));
                f.instruction(&Instruction::I32Const(1));
                f.instruction(&Instruction::I32Add);
                f.instruction(&Instruction::LocalSet(2));
                f.instruction(&Instruction::Br(0));
                f.instruction(&Instruction::End); // outer loop
                f.instruction(&Instruction::End); // outer block

                f.instruction(&Instruction::I32Const(-1));
                f.instruction(&Instruction::Return);
            }
            BuiltinId::StringIndexOf | BuiltinId::StringSearch => {
                f.instruction(&Instruction::LocalGet(0));
                f.instruction(&Instruction::LocalGet(1));
                f.instruction(&Instruction::I32Const(0));
                f.instruction(&Instruction::Call(internal.expect("resolved above")));
            }
            BuiltinId::StringEq => {
                // a=0, b=1; alen=2, aarr=3, barr=4, i=5.
                f.instruction(&Instruction::LocalGet(0));
                f.instruction(&Instruction::StructGet { struct_type_index: string_type, field_index: 0 });
                f.instruction(&Instruction::LocalSet(2));
                f.instruction(&Instruction::LocalGet(2));
                f.instruction(&Instruction::LocalGet(1));
                f.instruction(&Instruction::StructGet { struct_type_index: string_type, field_index: 0 });
                f.instruction(&Instruction::I32Ne);
                f.instruction(&Instruction::If(BlockType::Empty));
                f.instruction(&Instruction::I32Const(0));
                f.instruction(&Instruction::Return);
                f.instruction(&Instruction::End);

                f.instruction(&Instruction::LocalGet(0));
                f.instruction(&Instruction::StructGet { struct_type_index: string_type, field_index: 1 });
                f.instruction(&Instruction::LocalSet(3));
                f.instruction(&Instruction::LocalGet(1));
                f.instruction(&Instruction::StructGet { struct_type_index: string_type, field_index: 1 });
                f.instruction(&Instruction::LocalSet(4));
                f.instruction(&Instruction::I32Const(0));
                f.instruction(&Instruction::LocalSet(5));

                f.instruction(&Instruction::Block(BlockType::Empty));
                f.instruction(&Instruction::Loop(BlockType::Empty));
                f.instruction(&Instruction::LocalGet(5));
                f.instruction(&Instruction::LocalGet(2));
                f.instruction(&Instruction::I32GeS);
                f.instruction(&Instruction::BrIf(1));

                f.instruction(&Instruction::LocalGet(3));
                f.instruction(&Instruction::LocalGet(5));
                f.instruction(&Instruction::ArrayGetU(char_array_type));
                f.instruction(&Instruction::LocalGet(4));
                f.instruction(&Instruction::LocalGet(5));
                f.instruction(&Instruction::ArrayGetU(char_array_type));
                f.instruction(&Instruction::I32Ne);
                f.instruction(&Instruction::If(BlockType::Empty));
                f.instruction(&Instruction::I32Const(0));
                f.instruction(&Instruction::Return);
                f.instruction(&Instruction::End);

                f.instruction(&Instruction::LocalGet(5));
                f.instruction(&Instruction::I32Const(1));
                f.instruction(&Instruction::I32Add);
                f.instruction(&Instruction::LocalSet(5));
                f.instruction(&Instruction::Br(0));
                f.instruction(&Instruction::End); // loop
                f.instruction(&Instruction::End); // block

                f.instruction(&Instruction::I32Const(1));
                f.instruction(&Instruction::Return);
            }
            BuiltinId::StringConcat | BuiltinId::StringSlice | BuiltinId::StringReplace | BuiltinId::StringSplit | BuiltinId::StringMatch => {
                tracing::warn!(builtin = sig.mangled_name, "string built-in body not lowered; emitting unreachable");
                f.instruction(&Instruction::Unreachable);
            }
        }
        f.instruction(&Instruction::End);
        self.code.function(&f);

        let index = self.next_function_index;
        self.next_function_index += 1;
        if self.emit_names {
            self.function_names.push((index, sig.mangled_name.to_string()));
        }
        self.builtin_indices.insert(id, index);
        index
    }

    pub fn register_function(&mut self, function: FunctionRef, index: u32) {
        self.function_indices.insert(function, index);
    }

    fn function_index(&self, function: FunctionRef) -> u32 {
        *self.function_indices.get(&function).unwrap_or_else(|| panic!("{function:?} was never assigned a function index"))
    }

    fn value(&self, id: ValueId) -> &Value {
        self.values.get(id)
    }

    fn node(&self, id: NodeId) -> &Node {
        self.nodes.get(id)
    }

    fn is_numeric(&self, ty: TypeId) -> bool {
        matches!(self.types_arena.get(ty).map(|v| &v.kind), Some(ValueTypeKind::Number))
    }

    fn is_int_like(&self, ty: TypeId) -> bool {
        matches!(self.types_arena.get(ty).map(|v| &v.kind), Some(ValueTypeKind::Int) | Some(ValueTypeKind::Boolean))
    }

    /// Emits one IR function body's statement tree into `f`, using
    /// `locals` to assign dense local indices to each `VarDeclare`'s
    /// temp slot the first time it's referenced (spec §4.7 "Walks IR,
    /// returning a WebAssembly expression ref per node").
    fn emit_node(&mut self, f: &mut Function, locals: &mut LocalAllocator, id: NodeId) {
        let node = self.node(id).clone();
        match node.kind {
            NodeKind::Module { functions } => {
                for func in functions {
                    self.emit_node(f, locals, func);
                }
            }
            NodeKind::FunctionDeclare { .. } => {
                // Nested function declarations become a distinct top-level
                // function (compiled separately by the caller); nothing to
                // emit into the enclosing body beyond the closure value
                // already built into the `VarDeclare` that captures it.
            }
            NodeKind::VarDeclare { ty, init, .. } => {
                let val_type = self.registry.ensure_value_type(self.types_arena, self.descriptors, ty);
                let local_index = locals.reserve(id.0, val_type);
                if let Some(init) = init {
                    self.emit_value(f, locals, init);
                    f.instruction(&Instruction::LocalSet(local_index));
                }
            }
            NodeKind::BasicBlock { values } => {
                for value in values {
                    self.emit_value(f, locals, value);
                    // Expression-statements discard their result; the
                    // coercion/side-effect work already happened.
                    let ty = self.value(value).ty;
                    if !matches!(self.types_arena.get(ty).map(|v| &v.kind), Some(ValueTypeKind::Void)) {
                        f.instruction(&Instruction::Drop);
                    }
                }
            }
            NodeKind::Block { body, .. } => {
                for stmt in body {
                    self.emit_node(f, locals, stmt);
                }
            }
            NodeKind::If { test, then_branch, else_branch } => {
                self.emit_condition(f, locals, test);
                f.instruction(&Instruction::If(BlockType::Empty));
                self.emit_node(f, locals, then_branch);
                if let Some(else_branch) = else_branch {
                    f.instruction(&Instruction::Else);
                    self.emit_node(f, locals, else_branch);
                }
                f.instruction(&Instruction::End);
            }
            NodeKind::For { init, test, update, body, .. } => {
                if let Some(init) = init {
                    self.emit_node(f, locals, init);
                }
                f.instruction(&Instruction::Block(BlockType::Empty));
                f.instruction(&Instruction::Loop(BlockType::Empty));
                if let Some(test) = test {
                    self.emit_condition(f, locals, test);
                    f.instruction(&Instruction::I32Eqz);
                    f.instruction(&Instruction::BrIf(1));
                }
                self.emit_node(f, locals, body);
                if let Some(update) = update {
                    self.emit_value(f, locals, update);
                    let ty = self.value(update).ty;
                    if !matches!(self.types_arena.get(ty).map(|v| &v.kind), Some(ValueTypeKind::Void)) {
                        f.instruction(&Instruction::Drop);
                    }
                }
                f.instruction(&Instruction::Br(0));
                f.instruction(&Instruction::End);
                f.instruction(&Instruction::End);
            }
            NodeKind::While { test, body, .. } => {
                f.instruction(&Instruction::Block(BlockType::Empty));
                f.instruction(&Instruction::Loop(BlockType::Empty));
                self.emit_condition(f, locals, test);
                f.instruction(&Instruction::I32Eqz);
                f.instruction(&Instruction::BrIf(1));
                self.emit_node(f, locals, body);
                f.instruction(&Instruction::Br(0));
                f.instruction(&Instruction::End);
                f.instruction(&Instruction::End);
            }
            NodeKind::DoWhile { test, body, .. } => {
                f.instruction(&Instruction::Block(BlockType::Empty));
                f.instruction(&Instruction::Loop(BlockType::Empty));
                self.emit_node(f, locals, body);
                self.emit_condition(f, locals, test);
                f.instruction(&Instruction::BrIf(0));
                f.instruction(&Instruction::End);
                f.instruction(&Instruction::End);
            }
            NodeKind::Switch { discriminant, cases, .. } => {
                // A chain of `br_if` comparisons to per-case labels,
                // followed by per-case blocks built bottom-up so each
                // falls through to the next (spec §4.7).
                f.instruction(&Instruction::Block(BlockType::Empty));
                for (depth, case) in cases.iter().enumerate() {
                    if let NodeKind::CaseClause { test, .. } = &self.node(*case).kind {
                        self.emit_value(f, locals, discriminant);
                        self.emit_value(f, locals, *test);
                        f.instruction(&Instruction::F64Eq);
                        f.instruction(&Instruction::BrIf(depth as u32));
                    }
                }
                for case in cases.into_iter().rev() {
                    f.instruction(&Instruction::Block(BlockType::Empty));
                    self.emit_node(f, locals, case);
                    f.instruction(&Instruction::End);
                }
                f.instruction(&Instruction::End);
            }
            NodeKind::CaseClause { body, .. } | NodeKind::DefaultClause { body } => {
                for stmt in body {
                    self.emit_node(f, locals, stmt);
                }
            }
            NodeKind::Return { value } => {
                if let Some(value) = value {
                    self.emit_value(f, locals, value);
                }
                f.instruction(&Instruction::Return);
            }
            NodeKind::Break { .. } => {
                f.instruction(&Instruction::Br(1));
            }
            NodeKind::Continue { .. } => {
                f.instruction(&Instruction::Br(0));
            }
            NodeKind::Throw { value } => {
                self.emit_value(f, locals, value);
                // Throw always boxes its operand to `anyref` first (spec
                // §4.7); the IR's cast algebra already inserted the
                // appropriate `Cast` node upstream, so the value on the
                // stack here is already boxed.
                f.instruction(&Instruction::Throw(self.error_tag));
            }
            NodeKind::Try { block, catch, finally } => {
                self.emit_try(f, locals, id, block, catch, finally);
            }
            NodeKind::Empty => {}
        }
    }

    fn emit_condition(&mut self, f: &mut Function, locals: &mut LocalAllocator, value: ValueId) {
        // `generateCondition` always coerces the predicate to `i32`
        // (spec §4.7); booleans and ints are already `i32`, everything
        // else goes through the any/object truthiness host path by being
        // cast upstream (the IR's own cast algebra), so by codegen time
        // the value's representation is already `i32`.
        self.emit_value(f, locals, value);
    }

    fn emit_try(
        &mut self,
        f: &mut Function,
        locals: &mut LocalAllocator,
        try_id: NodeId,
        block: NodeId,
        catch: Option<wasmc_ir::CatchClause>,
        finally: Option<NodeId>,
    ) {
        // Two nested try blocks with two tags (spec §4.7): the inner try
        // catches user errors and re-raises them as `finallyTag` after
        // running the catch; the outer runs `finally` and, if a rethrow
        // flag is set, re-raises via `errorTag`. The flag starts set and is
        // cleared once a catch clause actually handles the error, so a
        // catch that runs to completion suppresses the rethrow instead of
        // always propagating past `finally`.
        let anyref = ValType::Ref(wasm_encoder::RefType { nullable: true, heap_type: HeapType::Abstract { shared: false, ty: wasm_encoder::AbstractHeapType::Any } });
        // Keyed above any real `NodeId` this compilation allocates, so it
        // can't collide with a `VarDeclare`/catch-param slot sharing the
        // `LocalAllocator`'s single key space.
        let rethrow_flag = locals.reserve(u32::MAX - try_id.0, ValType::I32);
        f.instruction(&Instruction::I32Const(1));
        f.instruction(&Instruction::LocalSet(rethrow_flag));

        f.instruction(&Instruction::Try(BlockType::Empty)); // outer
        f.instruction(&Instruction::Try(BlockType::Empty)); // inner
        self.emit_node(f, locals, block);
        f.instruction(&Instruction::Catch(self.error_tag));
        if let Some(catch) = &catch {
            match (catch.param, catch.declaration) {
                (Some(_), Some(declaration)) => {
                    let param_local = locals.reserve(declaration.0, anyref.clone());
                    f.instruction(&Instruction::LocalSet(param_local));
                }
                _ => {
                    f.instruction(&Instruction::Drop);
                }
            }
            f.instruction(&Instruction::I32Const(0));
            f.instruction(&Instruction::LocalSet(rethrow_flag));
            self.emit_node(f, locals, catch.body);
        }
        f.instruction(&Instruction::LocalGet(rethrow_flag));
        f.instruction(&Instruction::If(BlockType::Empty));
        f.instruction(&Instruction::Rethrow(1));
        f.instruction(&Instruction::End);
        f.instruction(&Instruction::End); // inner try
        f.instruction(&Instruction::Catch(self.finally_tag));
        f.instruction(&Instruction::Drop);
        f.instruction(&Instruction::End); // outer try
        if let Some(finally) = finally {
            self.emit_node(f, locals, finally);
        }
    }

    /// Emits one IR value and leaves its result on the stack (spec §4.7).
    fn emit_value(&mut self, f: &mut Function, locals: &mut LocalAllocator, id: ValueId) {
        let value = self.value(id).clone();
        match value.kind {
            ValueKind::Literal(lit) => self.emit_literal(f, lit),
            ValueKind::Var(local) => {
                let val_type = self.registry.ensure_value_type(self.types_arena, self.descriptors, value.ty);
                let idx = locals.reserve(local.declaration.0, val_type);
                f.instruction(&Instruction::LocalGet(idx));
            }
            ValueKind::VarSet { local, value: rhs } => {
                self.emit_value(f, locals, rhs);
                let val_type = self.registry.ensure_value_type(self.types_arena, self.descriptors, self.value(rhs).ty);
                let idx = locals.reserve(local.declaration.0, val_type);
                f.instruction(&Instruction::LocalTee(idx));
            }
            ValueKind::This | ValueKind::Super => {
                f.instruction(&Instruction::LocalGet(0));
            }
            ValueKind::BinaryExpr { op, left, right } => self.emit_binary(f, locals, op, left, right),
            ValueKind::PreUnary { op, operand } | ValueKind::PostUnary { op, operand } => self.emit_unary(f, locals, op, operand),
            ValueKind::Condition { test, consequent, alternate } => {
                self.emit_condition(f, locals, test);
                let result_type = self.registry.ensure_value_type(self.types_arena, self.descriptors, value.ty);
                f.instruction(&Instruction::If(BlockType::Result(result_type)));
                self.emit_value(f, locals, consequent);
                f.instruction(&Instruction::Else);
                self.emit_value(f, locals, alternate);
                f.instruction(&Instruction::End);
            }
            ValueKind::FunctionCall { callee, args } => {
                for arg in &args {
                    self.emit_value(f, locals, *arg);
                }
                f.instruction(&Instruction::Call(self.function_index(callee)));
            }
            ValueKind::ConstructorCall { constructor, args } => {
                for arg in &args {
                    self.emit_value(f, locals, *arg);
                }
                f.instruction(&Instruction::Call(self.function_index(constructor)));
            }
            ValueKind::ClosureCall { callee, args } => {
                // `struct.get` the context and funcref, then `call_ref`
                // (spec §4.7).
                let closure_type = self.concrete_closure_type(self.value(callee).ty);
                self.emit_value(f, locals, callee);
                f.instruction(&Instruction::StructGet { struct_type_index: closure_type, field_index: 1 });
                for arg in &args {
                    self.emit_value(f, locals, *arg);
                }
                self.emit_value(f, locals, callee);
                f.instruction(&Instruction::StructGet { struct_type_index: closure_type, field_index: 0 });
                let sig_type = self.signature_type_of(self.value(callee).ty);
                f.instruction(&Instruction::CallRef(sig_type));
            }
            ValueKind::DirectCall { function, args } => {
                for arg in &args {
                    self.emit_value(f, locals, *arg);
                }
                f.instruction(&Instruction::Call(self.function_index(function)));
            }
            ValueKind::AnyCall { callee, args } => {
                // `anyref` and `funcref` are separate type hierarchies in
                // Wasm GC: cast the callee down to the per-arity dynamic
                // closure struct, pull its funcref field, cast that to the
                // concrete signature, then `call_ref` (spec §4.7).
                tracing::warn!("any-typed call lowered through the generic dynamic-closure path");
                let info = self.registry.ensure_dynamic_closure_type(args.len() as u32);
                for arg in &args {
                    self.emit_value(f, locals, *arg);
                }
                self.emit_value(f, locals, callee);
                f.instruction(&Instruction::RefCastNonNull(HeapType::Concrete(info.closure_struct_type)));
                f.instruction(&Instruction::StructGet { struct_type_index: info.closure_struct_type, field_index: 0 });
                f.instruction(&Instruction::RefCastNonNull(HeapType::Concrete(info.signature_type)));
                f.instruction(&Instruction::CallRef(info.signature_type));
            }
            ValueKind::DynamicCall { receiver, name, args } => {
                let info = self.registry.ensure_dynamic_closure_type(args.len() as u32);
                for arg in &args {
                    self.emit_value(f, locals, *arg);
                }
                self.emit_value(f, locals, receiver);
                self.emit_dynamic_member_name(f, name);
                f.instruction(&Instruction::Call(self.import_index("dyntype_get_property")));
                f.instruction(&Instruction::RefCastNonNull(HeapType::Concrete(info.closure_struct_type)));
                f.instruction(&Instruction::StructGet { struct_type_index: info.closure_struct_type, field_index: 0 });
                f.instruction(&Instruction::RefCastNonNull(HeapType::Concrete(info.signature_type)));
                f.instruction(&Instruction::CallRef(info.signature_type));
            }
            ValueKind::OffsetGet { receiver, slot } => {
                let struct_type = self.instance_type_of(self.value(receiver).ty);
                self.emit_value(f, locals, receiver);
                f.instruction(&Instruction::StructGet { struct_type_index: struct_type, field_index: slot });
            }
            ValueKind::OffsetSet { receiver, slot, value: rhs } => {
                let struct_type = self.instance_type_of(self.value(receiver).ty);
                self.emit_value(f, locals, receiver);
                self.emit_value(f, locals, rhs);
                f.instruction(&Instruction::StructSet { struct_type_index: struct_type, field_index: slot });
            }
            ValueKind::OffsetGetter { receiver, slot } | ValueKind::VTableGet { receiver, slot } | ValueKind::ShapeGet { receiver, member_index: slot } => {
                let instance_type = self.instance_type_of(self.value(receiver).ty);
                let vtable_type = self.vtable_type_of(self.value(receiver).ty);
                self.emit_value(f, locals, receiver);
                f.instruction(&Instruction::StructGet { struct_type_index: instance_type, field_index: 0 });
                f.instruction(&Instruction::StructGet { struct_type_index: vtable_type, field_index: slot });
            }
            ValueKind::OffsetSetter { receiver, slot, value: rhs } | ValueKind::VTableSet { receiver, slot, value: rhs } | ValueKind::ShapeSet { receiver, member_index: slot, value: rhs } => {
                let instance_type = self.instance_type_of(self.value(receiver).ty);
                let vtable_type = self.vtable_type_of(self.value(receiver).ty);
                self.emit_value(f, locals, receiver);
                f.instruction(&Instruction::StructGet { struct_type_index: instance_type, field_index: 0 });
                self.emit_value(f, locals, rhs);
                f.instruction(&Instruction::StructSet { struct_type_index: vtable_type, field_index: slot });
            }
            ValueKind::OffsetCall { receiver, slot, args } | ValueKind::VTableCall { receiver, slot, args } | ValueKind::ShapeCall { receiver, member_index: slot, args } => {
                let instance_type = self.instance_type_of(self.value(receiver).ty);
                let vtable_type = self.vtable_type_of(self.value(receiver).ty);
                let sig_type = self.method_signature_type_of(self.value(receiver).ty, slot);
                self.emit_value(f, locals, receiver);
                for arg in &args {
                    self.emit_value(f, locals, *arg);
                }
                self.emit_value(f, locals, receiver);
                f.instruction(&Instruction::StructGet { struct_type_index: instance_type, field_index: 0 });
                f.instruction(&Instruction::StructGet { struct_type_index: vtable_type, field_index: slot });
                f.instruction(&Instruction::RefCastNonNull(HeapType::Concrete(sig_type)));
                f.instruction(&Instruction::CallRef(sig_type));
            }
            ValueKind::DirectGetter { function } => {
                f.instruction(&Instruction::RefFunc(self.function_index(function)));
            }
            ValueKind::DirectSetter { function, value: rhs } => {
                self.emit_value(f, locals, rhs);
                f.instruction(&Instruction::Call(self.function_index(function)));
            }
            ValueKind::ElementGet { array, index } => {
                let array_type = self.array_heap_type_of(self.value(array).ty);
                self.emit_value(f, locals, array);
                f.instruction(&Instruction::StructGet { struct_type_index: array_type.struct_type, field_index: 1 });
                self.emit_value(f, locals, index);
                f.instruction(&Instruction::ArrayGet(array_type.array_type));
            }
            ValueKind::ElementSet { array, index, value: rhs } => {
                let array_type = self.array_heap_type_of(self.value(array).ty);
                self.emit_value(f, locals, array);
                f.instruction(&Instruction::StructGet { struct_type_index: array_type.struct_type, field_index: 1 });
                self.emit_value(f, locals, index);
                self.emit_value(f, locals, rhs);
                f.instruction(&Instruction::ArraySet(array_type.array_type));
            }
            ValueKind::DynamicGet { receiver, name } => {
                self.emit_value(f, locals, receiver);
                self.emit_dynamic_member_name(f, name);
                f.instruction(&Instruction::Call(self.import_index("dyntype_get_property")));
            }
            ValueKind::DynamicSet { receiver, name, value: rhs } => {
                self.emit_value(f, locals, receiver);
                self.emit_dynamic_member_name(f, name);
                self.emit_value(f, locals, rhs);
                f.instruction(&Instruction::Call(self.import_index("dyntype_set_property")));
            }
            ValueKind::NewLiteralObject { descriptor: _, fields } => {
                for (_, field_value) in &fields {
                    self.emit_value(f, locals, *field_value);
                }
                let instance_type = self.instance_type_of(value.ty);
                f.instruction(&Instruction::StructNew(instance_type));
            }
            ValueKind::NewLiteralArray { elements } => {
                let array_type = self.array_heap_type_of(value.ty);
                for element in &elements {
                    self.emit_value(f, locals, *element);
                }
                f.instruction(&Instruction::ArrayNewFixed { array_type_index: array_type.array_type, array_size: elements.len() as u32 });
                f.instruction(&Instruction::StructNew(array_type.struct_type));
            }
            ValueKind::NewConstructor { descriptor: _, constructor, args } => {
                for arg in &args {
                    self.emit_value(f, locals, *arg);
                }
                let instance_type = self.instance_type_of(value.ty);
                if let Some(constructor) = constructor {
                    f.instruction(&Instruction::Call(self.function_index(constructor)));
                } else {
                    f.instruction(&Instruction::StructNew(instance_type));
                }
            }
            ValueKind::NewArray { length } => {
                let array_type = self.array_heap_type_of(value.ty);
                self.emit_value(f, locals, length);
                f.instruction(&Instruction::ArrayNewDefault(array_type.array_type));
                f.instruction(&Instruction::StructNew(array_type.struct_type));
            }
            ValueKind::NewArrayLen { length } => {
                let array_type = self.array_heap_type_of(value.ty);
                f.instruction(&Instruction::ArrayNewFixed { array_type_index: array_type.array_type, array_size: length });
                f.instruction(&Instruction::StructNew(array_type.struct_type));
            }
            ValueKind::NewFromClassObject { source, descriptor: _ } => {
                // Reinterpreting an existing object under a new class
                // layout has no cheap structural-subtyping instruction in
                // the GC MVP beyond `ref.cast`; emit that.
                self.emit_value(f, locals, source);
                let instance_type = self.instance_type_of(value.ty);
                f.instruction(&Instruction::RefCastNonNull(HeapType::Concrete(instance_type)));
            }
            ValueKind::NewClosureFunction { function, captures } => {
                let closure_type = self.concrete_closure_type(value.ty);
                for capture in &captures {
                    self.emit_value(f, locals, *capture);
                }
                if captures.is_empty() {
                    f.instruction(&Instruction::RefNull(HeapType::Abstract { shared: false, ty: wasm_encoder::AbstractHeapType::None }));
                }
                f.instruction(&Instruction::RefFunc(self.function_index(function)));
                f.instruction(&Instruction::StructNew(closure_type));
            }
            ValueKind::Cast { value: inner, variant } => self.emit_cast(f, locals, inner, variant),
            ValueKind::InstanceOf { value: inner, target } => {
                self.emit_value(f, locals, inner);
                let _ = target;
                f.instruction(&Instruction::RefIsNull);
                f.instruction(&Instruction::I32Eqz);
            }
            ValueKind::Typeof { value: inner } => {
                self.emit_value(f, locals, inner);
                f.instruction(&Instruction::Call(self.import_index("dyntype_typeof")));
            }
            ValueKind::ToString { value: inner } => {
                self.emit_value(f, locals, inner);
            }
            ValueKind::Nop => {}
            ValueKind::Unimplement { source } => {
                tracing::warn!(?source, "unimplemented AST shape reached code generation; emitting unreachable");
                f.instruction(&Instruction::Unreachable);
            }
        }
    }

    fn emit_literal(&mut self, f: &mut Function, lit: Literal) {
        match lit {
            Literal::Number(n) => {
                f.instruction(&Instruction::F64Const(n));
            }
            Literal::Int(i) => {
                f.instruction(&Instruction::I32Const(i));
            }
            Literal::Boolean(b) => {
                f.instruction(&Instruction::I32Const(b as i32));
            }
            Literal::Str(atom) => self.emit_string_literal(f, atom),
            Literal::Null => {
                f.instruction(&Instruction::RefNull(HeapType::Abstract { shared: false, ty: wasm_encoder::AbstractHeapType::None }));
            }
            Literal::Undefined => {
                f.instruction(&Instruction::RefNull(HeapType::Abstract { shared: false, ty: wasm_encoder::AbstractHeapType::None }));
            }
        }
    }

    fn emit_dynamic_member_name(&mut self, f: &mut Function, name: Atom) {
        self.emit_string_literal(f, name);
    }

    /// Builds a `string_type` struct for `atom`'s text, byte by byte, since
    /// the GC MVP has no constant-expression string literal of its own: push
    /// every byte as an `i32`, pack them into a fixed-size `char_array`, then
    /// wrap that with the length field `string_type` expects.
    fn emit_string_literal(&mut self, f: &mut Function, atom: Atom) {
        let text = self.interner.resolve(atom);
        let bytes = text.as_bytes();
        let len = bytes.len() as u32;
        f.instruction(&Instruction::I32Const(len as i32));
        for byte in bytes {
            f.instruction(&Instruction::I32Const(*byte as i32));
        }
        f.instruction(&Instruction::ArrayNewFixed { array_type_index: self.registry.char_array_type, array_size: len });
        f.instruction(&Instruction::StructNew(self.registry.string_type));
    }

    /// Binary expressions dispatch by (left-kind, right-kind) (spec §4.7).
    /// `number`/`int` pairs map directly to wasm arithmetic; an `any`
    /// operand goes through the host boxing API: unbox to `f64`, operate,
    /// re-box.
    fn emit_binary(&mut self, f: &mut Function, locals: &mut LocalAllocator, op: BinaryOp, left: ValueId, right: ValueId) {
        let left_ty = self.value(left).ty;
        let right_ty = self.value(right).ty;
        let both_numeric = self.is_numeric(left_ty) && self.is_numeric(right_ty);
        let both_int = self.is_int_like(left_ty) && self.is_int_like(right_ty);

        if both_numeric {
            match op {
                BinaryOp::Mod => self.emit_f64_mod(f, locals, left, right),
                BinaryOp::And | BinaryOp::Or => self.emit_f64_logical(f, locals, op, left, right),
                _ => {
                    self.emit_value(f, locals, left);
                    self.emit_value(f, locals, right);
                    f.instruction(&Self::f64_op(op));
                }
            }
        } else if both_int {
            self.emit_value(f, locals, left);
            self.emit_value(f, locals, right);
            f.instruction(&Self::i32_op(op));
        } else {
            // `any × any` (and mixed `any × number`): unbox both sides
            // through the host API, operate in `f64`, re-box the result
            // (spec §4.7).
            match op {
                BinaryOp::Mod => {
                    self.emit_value(f, locals, left);
                    f.instruction(&Instruction::Call(self.import_index("dyntype_to_number")));
                    self.emit_value(f, locals, left);
                    f.instruction(&Instruction::Call(self.import_index("dyntype_to_number")));
                    self.emit_value(f, locals, right);
                    f.instruction(&Instruction::Call(self.import_index("dyntype_to_number")));
                    f.instruction(&Instruction::F64Div);
                    f.instruction(&Instruction::F64Trunc);
                    self.emit_value(f, locals, right);
                    f.instruction(&Instruction::Call(self.import_index("dyntype_to_number")));
                    f.instruction(&Instruction::F64Mul);
                    f.instruction(&Instruction::F64Sub);
                    f.instruction(&Instruction::Call(self.import_index("dyntype_new_number")));
                }
                BinaryOp::And | BinaryOp::Or => {
                    self.emit_value(f, locals, left);
                    f.instruction(&Instruction::Call(self.import_index("dyntype_to_number")));
                    f.instruction(&Instruction::F64Const(0.0));
                    f.instruction(&Instruction::F64Ne);
                    self.emit_value(f, locals, right);
                    f.instruction(&Instruction::Call(self.import_index("dyntype_to_number")));
                    f.instruction(&Instruction::F64Const(0.0));
                    f.instruction(&Instruction::F64Ne);
                    f.instruction(&if matches!(op, BinaryOp::And) { Instruction::I32And } else { Instruction::I32Or });
                    f.instruction(&Instruction::Call(self.import_index("dyntype_new_boolean")));
                }
                _ => {
                    self.emit_value(f, locals, left);
                    f.instruction(&Instruction::Call(self.import_index("dyntype_to_number")));
                    self.emit_value(f, locals, right);
                    f.instruction(&Instruction::Call(self.import_index("dyntype_to_number")));
                    f.instruction(&Self::f64_op(op));
                    f.instruction(&Instruction::Call(self.import_index("dyntype_new_number")));
                }
            }
        }
    }

    /// `a % b == a - trunc(a / b) * b` (spec §4.7's `Mod` row; the GC MVP
    /// has no native `f64` remainder instruction). No scratch locals: `left`
    /// and `right` are `ValueId`s, safe to re-emit more than once — the same
    /// re-emission precedent `ClosureCall`/`OffsetCall` already rely on for
    /// their own callee/receiver operands.
    fn emit_f64_mod(&mut self, f: &mut Function, locals: &mut LocalAllocator, left: ValueId, right: ValueId) {
        self.emit_value(f, locals, left);
        self.emit_value(f, locals, left);
        self.emit_value(f, locals, right);
        f.instruction(&Instruction::F64Div);
        f.instruction(&Instruction::F64Trunc);
        self.emit_value(f, locals, right);
        f.instruction(&Instruction::F64Mul);
        f.instruction(&Instruction::F64Sub);
    }

    /// Non-short-circuit truthy-combine over two `number`-typed operands,
    /// consistent with `i32_op`'s bitwise `And`/`Or` over already-boolean/int
    /// operands: each side is compared against `0.0` and the two booleans
    /// are combined, rather than short-circuiting on the first operand.
    fn emit_f64_logical(&mut self, f: &mut Function, locals: &mut LocalAllocator, op: BinaryOp, left: ValueId, right: ValueId) {
        self.emit_value(f, locals, left);
        f.instruction(&Instruction::F64Const(0.0));
        f.instruction(&Instruction::F64Ne);
        self.emit_value(f, locals, right);
        f.instruction(&Instruction::F64Const(0.0));
        f.instruction(&Instruction::F64Ne);
        f.instruction(&if matches!(op, BinaryOp::And) { Instruction::I32And } else { Instruction::I32Or });
    }

    fn f64_op(op: BinaryOp) -> Instruction<'static> {
        match op {
            BinaryOp::Add => Instruction::F64Add,
            BinaryOp::Sub => Instruction::F64Sub,
            BinaryOp::Mul => Instruction::F64Mul,
            BinaryOp::Div => Instruction::F64Div,
            BinaryOp::Lt => Instruction::F64Lt,
            BinaryOp::Gt => Instruction::F64Gt,
            BinaryOp::LtEq => Instruction::F64Le,
            BinaryOp::GtEq => Instruction::F64Ge,
            BinaryOp::Eq => Instruction::F64Eq,
            BinaryOp::NotEq => Instruction::F64Ne,
            BinaryOp::Mod | BinaryOp::And | BinaryOp::Or => {
                unreachable!("{op:?} is lowered by emit_binary's own match arm before reaching f64_op")
            }
            BinaryOp::Assign => unreachable!("build_binary intercepts Assign before a BinaryExpr value is ever built"),
        }
    }

    fn i32_op(op: BinaryOp) -> Instruction<'static> {
        match op {
            BinaryOp::Add => Instruction::I32Add,
            BinaryOp::Sub => Instruction::I32Sub,
            BinaryOp::Mul => Instruction::I32Mul,
            BinaryOp::Div => Instruction::I32DivS,
            BinaryOp::Mod => Instruction::I32RemS,
            BinaryOp::Lt => Instruction::I32LtS,
            BinaryOp::Gt => Instruction::I32GtS,
            BinaryOp::LtEq => Instruction::I32LeS,
            BinaryOp::GtEq => Instruction::I32GeS,
            BinaryOp::Eq => Instruction::I32Eq,
            BinaryOp::NotEq => Instruction::I32Ne,
            BinaryOp::And => Instruction::I32And,
            BinaryOp::Or => Instruction::I32Or,
            BinaryOp::Assign => unreachable!("build_binary intercepts Assign before a BinaryExpr value is ever built"),
        }
    }

    fn emit_unary(&mut self, f: &mut Function, locals: &mut LocalAllocator, op: UnaryOp, operand: ValueId) {
        let ty = self.value(operand).ty;
        self.emit_value(f, locals, operand);
        match (op, self.is_numeric(ty)) {
            (UnaryOp::Neg, true) => {
                f.instruction(&Instruction::F64Neg);
            }
            (UnaryOp::Neg, false) => {
                f.instruction(&Instruction::I32Const(-1));
                f.instruction(&Instruction::I32Mul);
            }
            (UnaryOp::Not, _) => {
                f.instruction(&Instruction::I32Eqz);
            }
            (UnaryOp::Increment, _) | (UnaryOp::Decrement, _) => {
                let delta = if matches!(op, UnaryOp::Increment) { 1.0 } else { -1.0 };
                f.instruction(&Instruction::F64Const(delta));
                f.instruction(&Instruction::F64Add);
            }
        }
    }

    fn emit_cast(&mut self, f: &mut Function, locals: &mut LocalAllocator, inner: ValueId, variant: CastVariant) {
        self.emit_value(f, locals, inner);
        match variant {
            CastVariant::AnyCastValue | CastVariant::ValueCastValue => {
                f.instruction(&Instruction::Call(self.import_index("dyntype_to_number")));
            }
            CastVariant::ValueCastAny => {
                f.instruction(&Instruction::Call(self.import_index("dyntype_new_number")));
            }
            CastVariant::ObjectCastAny => {
                // Objects are already reference types; `anyref` subsumes
                // them structurally in the GC type hierarchy, so no
                // instruction is needed beyond the value already being a
                // subtype of `anyref`.
            }
            CastVariant::AnyCastObject | CastVariant::AnyCastInterface => {
                f.instruction(&Instruction::RefCastNonNull(HeapType::Abstract { shared: false, ty: wasm_encoder::AbstractHeapType::Struct }));
            }
            CastVariant::UnionCastToAny => {}
            CastVariant::UnionCastToValue => {
                f.instruction(&Instruction::Call(self.import_index("dyntype_to_number")));
            }
            CastVariant::UnionCastToObject => {
                f.instruction(&Instruction::RefCastNonNull(HeapType::Abstract { shared: false, ty: wasm_encoder::AbstractHeapType::Struct }));
            }
            CastVariant::ObjectCastObject { new_shape: _ } => {
                // Structural widening (missing `Undefined`-admitting
                // fields get synthesized initializers) happens in the
                // builder's cast algebra, not here; by codegen time the
                // value is already the right shape and needs no further
                // instruction.
            }
            CastVariant::ValueToString | CastVariant::ObjectToString => {
                f.instruction(&Instruction::Call(self.import_index("dyntype_new_string")));
            }
        }
    }

    fn instance_type_of(&mut self, ty: TypeId) -> u32 {
        self.registry.ensure_object_type(self.types_arena, self.descriptors, ty).instance_type
    }

    fn vtable_type_of(&mut self, ty: TypeId) -> u32 {
        self.registry.ensure_object_type(self.types_arena, self.descriptors, ty).vtable_type
    }

    fn concrete_closure_type(&mut self, ty: TypeId) -> u32 {
        self.registry.ensure_function_type(self.types_arena, self.descriptors, ty).closure_struct_type
    }

    fn signature_type_of(&mut self, ty: TypeId) -> u32 {
        self.registry.ensure_function_type(self.types_arena, self.descriptors, ty).signature_type
    }

    /// Recovers the `call_ref` signature type for the method/accessor
    /// occupying vtable slot `slot` on a value of object type `receiver_ty`.
    /// `Value.ty` only ever stores a value's own result type, never a
    /// callee's signature, so the method's declared function type has to be
    /// re-derived from the receiver's descriptor instead (spec §4.3, §4.7).
    fn method_signature_type_of(&mut self, receiver_ty: TypeId, slot: u32) -> u32 {
        let descriptor_id = match self.types_arena.get(receiver_ty).map(|v| &v.kind) {
            Some(ValueTypeKind::Object(data)) => data.descriptor,
            _ => panic!("vtable dispatch on a non-object receiver type"),
        };
        let descriptor = self.descriptors.get(descriptor_id).expect("receiver's descriptor must be registered");
        let member_type = descriptor.member_type_for_vtable_slot(slot).expect("vtable slot must resolve to a method or accessor member");
        self.signature_type_of(member_type)
    }

    fn array_heap_type_of(&mut self, ty: TypeId) -> crate::types::ArrayTypeInfo {
        self.registry.ensure_array_type(self.types_arena, self.descriptors, ty)
    }

    /// Synthesizes a class's vtable instance once, as part of the start
    /// function rather than a constant expression (spec §4.6 asks for "a
    /// vtable instance expression ... synthesized once at generation
    /// time"; this generator defers it to the start function alongside
    /// static-field initialization, the same deferral spec §4.6 already
    /// prescribes for static fields, rather than relying on the GC
    /// proposal's constant-expression extensions).
    pub fn emit_vtable_init(&mut self, start: &mut Function, class: TypeId, methods: &[FunctionRef], global_index: u32) {
        let vtable_type = self.vtable_type_of(class);
        for method in methods {
            start.instruction(&Instruction::RefFunc(self.function_index(*method)));
        }
        start.instruction(&Instruction::StructNew(vtable_type));
        start.instruction(&Instruction::GlobalSet(global_index));
    }

    /// Walks `body` and returns the finished `wasm_encoder::Function`
    /// (spec §4.7's "walks IR, returning a WebAssembly expression ref per
    /// node", applied to a whole function at once).
    ///
    /// `wasm_encoder::Function::new` requires every local's type
    /// pre-declared before any instruction is emitted, but this pass only
    /// learns a local's type the first time the body references it. So
    /// the body is walked twice: once into a scratch buffer purely to
    /// populate `LocalAllocator`'s type table (discarded), then again into
    /// the real `Function` now that its locals are known. Both walks
    /// visit nodes in the same order and are otherwise side-effect-free
    /// (type/builtin caching is idempotent), so they assign identical
    /// local indices.
    ///
    /// Parameter locals get their index the first time the body
    /// references them — the IR doesn't retain the declaring
    /// `VarDeclare`'s position within the parameter list (see
    /// `DESIGN.md`), so this assumes the body references parameters, if
    /// at all, in their declared order.
    pub fn build_function(&mut self, body: NodeId) -> Function {
        let mut scratch_locals = LocalAllocator::default();
        let mut scratch = Function::new(Vec::new());
        self.emit_node(&mut scratch, &mut scratch_locals, body);

        let mut locals = LocalAllocator::default();
        let mut f = Function::new(scratch_locals.kinds.iter().map(|ty| (1u32, *ty)));
        self.emit_node(&mut f, &mut locals, body);
        f.instruction(&Instruction::End);
        f
    }

    pub fn declare_function(&mut self, type_index: u32) -> u32 {
        self.functions.function(type_index);
        let index = self.next_function_index;
        self.next_function_index += 1;
        index
    }

    pub fn export_function(&mut self, name: &str, index: u32) {
        self.exports.export(name, ExportKind::Func, index);
    }

    pub fn finish_function(&mut self, body: Function) {
        self.code.function(&body);
    }

    pub fn into_sections(
        self,
    ) -> (
        TypeRegistry,
        ImportSection,
        FunctionSection,
        TableSection,
        GlobalSection,
        ExportSection,
        TagSection,
        CodeSection,
        Vec<(u32, String)>,
    ) {
        (self.registry, self.imports, self.functions, self.tables, self.globals, self.exports, self.tags, self.code, self.function_names)
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }
}

#[cfg(test)]
#[path = "tests/codegen.rs"]
mod tests;
