//! The WebAssembly type generator (C6, spec §3.5 and §4.6): a lazy cache
//! from [`TypeId`] to concrete `wasm_encoder` GC types.
//!
//! Grounded on the montera renderer's `ensure_type`/index-tracking idiom
//! (`other_examples/.../render.rs`: `out.ensure_type(...)`, manual
//! `next_function_index` bookkeeping) generalized from a flat function-type
//! cache to the richer representation/heap-type/closure/array/object split
//! spec §3.5 and §4.6 require.

use rustc_hash::FxHashMap;
use wasm_encoder::{
    AbstractHeapType, CompositeInnerType, CompositeType, FieldType, HeapType, RefType, StorageType, StructType,
    SubType, TypeSection, ValType,
};

use wasmc_shape::DescriptorArena;
use wasmc_types::{DescriptorId, TypeArena, TypeId, ValueTypeKind};

fn anyref() -> RefType {
    RefType { nullable: true, heap_type: HeapType::Abstract { shared: false, ty: AbstractHeapType::Any } }
}

fn concrete_ref(index: u32, nullable: bool) -> RefType {
    RefType { nullable, heap_type: HeapType::Concrete(index) }
}

/// Everything the generator needs to know about a function value type: the
/// raw call signature (environment-prefixed, spec §4.6) and the closure
/// struct type wrapping it, plus enough of the original arity to let the
/// code generator tell a direct call's argument list from its
/// environment prefix.
#[derive(Debug, Clone, Copy)]
pub struct FunctionTypeInfo {
    pub signature_type: u32,
    pub closure_struct_type: u32,
    pub env_param_len: u32,
    pub original_param_count: u32,
}

/// An array value type's wrapping struct (`{length_hint, ref array_of_element}`)
/// plus the bare array heap type it wraps (spec §4.6's Array row).
#[derive(Debug, Clone, Copy)]
pub struct ArrayTypeInfo {
    pub array_type: u32,
    pub struct_type: u32,
}

/// An object (class) value type's three struct types plus, once computed,
/// the prebuilt vtable instance's global index (spec §4.6: "a vtable
/// instance expression is synthesized once at generation time"). The
/// global index is filled in by [`crate::codegen::CodeGenerator`] once
/// function indices are known; `TypeRegistry` only owns type shapes.
#[derive(Debug, Clone, Copy)]
pub struct ObjectTypeInfo {
    pub vtable_type: u32,
    pub instance_type: u32,
    pub static_fields_type: Option<u32>,
}

/// Interfaces share one heap type across all implementors (spec §4.6: "the
/// shared `infcType`"), so they get their own tiny cache keyed by nothing
/// but "has an interface type been created yet".
#[derive(Debug, Clone, Copy)]
pub struct InterfaceTypeInfo {
    pub interface_type: u32,
}

pub struct TypeRegistry {
    types: TypeSection,
    next_index: u32,
    type_names: Vec<(u32, String)>,
    emit_names: bool,

    pub empty_struct_type: u32,
    pub char_array_type: u32,
    pub string_type: u32,
    interface_type: Option<InterfaceTypeInfo>,

    value_cache: FxHashMap<TypeId, ValType>,
    functions: FxHashMap<TypeId, FunctionTypeInfo>,
    arrays: FxHashMap<TypeId, ArrayTypeInfo>,
    objects: FxHashMap<TypeId, ObjectTypeInfo>,
    dynamic_closures: FxHashMap<u32, FunctionTypeInfo>,
}

impl TypeRegistry {
    pub fn new(emit_names: bool) -> Self {
        let mut types = TypeSection::new();
        let mut next_index = 0;
        let mut type_names = Vec::new();

        let char_array_type = Self::push_array(&mut types, &mut next_index, StorageType::I8, false);
        if emit_names {
            type_names.push((char_array_type, "char_array".to_string()));
        }

        let string_type = Self::push_struct(
            &mut types,
            &mut next_index,
            vec![
                FieldType { element_type: StorageType::Val(ValType::I32), mutable: false },
                FieldType { element_type: StorageType::Val(ValType::Ref(concrete_ref(char_array_type, false))), mutable: false },
            ],
        );
        if emit_names {
            type_names.push((string_type, "string".to_string()));
        }

        let empty_struct_type = Self::push_struct(&mut types, &mut next_index, Vec::new());
        if emit_names {
            type_names.push((empty_struct_type, "empty_struct".to_string()));
        }

        TypeRegistry {
            types,
            next_index,
            type_names,
            emit_names,
            empty_struct_type,
            char_array_type,
            string_type,
            interface_type: None,
            value_cache: FxHashMap::default(),
            functions: FxHashMap::default(),
            arrays: FxHashMap::default(),
            objects: FxHashMap::default(),
            dynamic_closures: FxHashMap::default(),
        }
    }

    fn push_subtype(types: &mut TypeSection, next_index: &mut u32, composite: CompositeInnerType) -> u32 {
        let index = *next_index;
        types.ty().subtype(&SubType {
            is_final: true,
            supertype_idx: None,
            composite_type: CompositeType { inner: composite, shared: false },
        });
        *next_index += 1;
        index
    }

    fn push_struct(types: &mut TypeSection, next_index: &mut u32, fields: Vec<FieldType>) -> u32 {
        Self::push_subtype(types, next_index, CompositeInnerType::Struct(StructType { fields: fields.into_boxed_slice() }))
    }

    fn push_array(types: &mut TypeSection, next_index: &mut u32, element: StorageType, mutable: bool) -> u32 {
        Self::push_subtype(types, next_index, CompositeInnerType::Array(wasm_encoder::ArrayType(FieldType { element_type: element, mutable })))
    }

    fn push_func(types: &mut TypeSection, next_index: &mut u32, params: Vec<ValType>, results: Vec<ValType>) -> u32 {
        let index = *next_index;
        types.ty().function(params, results);
        *next_index += 1;
        index
    }

    fn name(&mut self, index: u32, name: impl Into<String>) {
        if self.emit_names {
            self.type_names.push((index, name.into()));
        }
    }

    /// The shared interface heap type (spec §4.6: "Object (interface) |
    /// shared `infcType`"). Every interface-typed value maps to the same
    /// struct, an empty marker supertype every class instance struct could
    /// in principle extend; kept minimal since the dispatcher never reads
    /// through it directly (access always goes through `ShapeCall`/`Get`/
    /// `Set`, not a field read on this type).
    fn ensure_interface_type(&mut self) -> InterfaceTypeInfo {
        if let Some(info) = self.interface_type {
            return info;
        }
        let interface_type = Self::push_struct(&mut self.types, &mut self.next_index, Vec::new());
        self.name(interface_type, "interface");
        let info = InterfaceTypeInfo { interface_type };
        self.interface_type = Some(info);
        info
    }

    /// Looks up (and if needed resolves) `id`'s value representation (spec
    /// §4.6's table). Primitive/any/union/type-parameter rows are direct;
    /// aggregate rows (`Function`/`Array`/`Object`) delegate to their
    /// dedicated `ensure_*` methods and just report the resulting
    /// representation here.
    pub fn ensure_value_type(&mut self, arena: &TypeArena, descriptors: &DescriptorArena, id: TypeId) -> ValType {
        let bypass = arena
            .get(id)
            .map(|v| matches!(&v.kind, ValueTypeKind::Array(_)) && v.special_type_arguments.is_some())
            .unwrap_or(false);

        if !bypass {
            if let Some(cached) = self.value_cache.get(&id) {
                return *cached;
            }
        }

        let value = arena.get(id).expect("TypeId must resolve in the supplied TypeArena");
        let repr = match &value.kind {
            ValueTypeKind::Void => ValType::I32,
            ValueTypeKind::Boolean | ValueTypeKind::Int => ValType::I32,
            ValueTypeKind::Number => ValType::F64,
            ValueTypeKind::String | ValueTypeKind::RawString => ValType::Ref(concrete_ref(self.string_type, false)),
            ValueTypeKind::Null
            | ValueTypeKind::Undefined
            | ValueTypeKind::Any
            | ValueTypeKind::Union(_)
            | ValueTypeKind::TypeParameter(_)
            | ValueTypeKind::Generic
            | ValueTypeKind::Namespace
            | ValueTypeKind::Enum(_)
            | ValueTypeKind::Never => ValType::Ref(anyref()),
            ValueTypeKind::Empty => ValType::Ref(concrete_ref(self.empty_struct_type, false)),
            ValueTypeKind::ClosureContext(_) => ValType::Ref(anyref()),
            ValueTypeKind::Function(_) => {
                let info = self.ensure_function_type(arena, descriptors, id);
                ValType::Ref(concrete_ref(info.closure_struct_type, true))
            }
            ValueTypeKind::Array(_) | ValueTypeKind::Set(_) | ValueTypeKind::Map(_) => {
                let info = self.ensure_array_type(arena, descriptors, id);
                ValType::Ref(concrete_ref(info.struct_type, true))
            }
            ValueTypeKind::Object(object) if object.is_interface => {
                let info = self.ensure_interface_type();
                ValType::Ref(concrete_ref(info.interface_type, true))
            }
            ValueTypeKind::Object(_) => {
                let info = self.ensure_object_type(arena, descriptors, id);
                ValType::Ref(concrete_ref(info.instance_type, true))
            }
        };

        if !bypass {
            self.value_cache.insert(id, repr);
        }
        repr
    }

    /// Resolves (and caches) the closure struct + raw signature for a
    /// `Function` value type, augmenting the parameter list with
    /// `envParamLen` leading `empty_struct` slots (spec §4.6).
    pub fn ensure_function_type(&mut self, arena: &TypeArena, descriptors: &DescriptorArena, id: TypeId) -> FunctionTypeInfo {
        if let Some(info) = self.functions.get(&id) {
            return *info;
        }
        let value = arena.get(id).expect("function TypeId must resolve");
        let ValueTypeKind::Function(data) = &value.kind else {
            panic!("ensure_function_type called on a non-function TypeId");
        };

        // This crate's IR always threads a closure's own captured-`this`/
        // environment through a single leading struct slot rather than one
        // slot per free variable (simpler than spec §4.6's "N leading
        // slots" phrasing; see DESIGN.md).
        let env_param_len: u32 = if data.is_closure { 1 } else { 0 };

        let mut params = Vec::with_capacity(env_param_len as usize + data.params.len());
        for _ in 0..env_param_len {
            params.push(ValType::Ref(concrete_ref(self.empty_struct_type, false)));
        }
        let original_param_count = data.params.len() as u32;
        for param_ty in &data.params {
            params.push(self.ensure_value_type(arena, descriptors, *param_ty));
        }
        let results = if matches!(arena.get(data.return_type).map(|v| &v.kind), Some(ValueTypeKind::Void)) {
            Vec::new()
        } else {
            vec![self.ensure_value_type(arena, descriptors, data.return_type)]
        };

        let signature_type = Self::push_func(&mut self.types, &mut self.next_index, params, results);
        let closure_struct_type = Self::push_struct(
            &mut self.types,
            &mut self.next_index,
            vec![
                FieldType { element_type: StorageType::Val(ValType::Ref(concrete_ref(self.empty_struct_type, true))), mutable: false },
                FieldType {
                    element_type: StorageType::Val(ValType::Ref(RefType { nullable: true, heap_type: HeapType::Concrete(signature_type) })),
                    mutable: false,
                },
            ],
        );

        let info = FunctionTypeInfo { signature_type, closure_struct_type, env_param_len, original_param_count };
        self.functions.insert(id, info);
        info
    }

    /// Resolves (and, unless the cache-bypass rule applies, caches) an
    /// `Array`/`Set`/`Map` value type's array heap type and wrapping
    /// struct (spec §4.6's Array row; §4.1's "specialize... is never
    /// deduplicated" extends here through the bypass rule on `TypeRegistry`
    /// itself, not just `TypeArena`).
    pub fn ensure_array_type(&mut self, arena: &TypeArena, descriptors: &DescriptorArena, id: TypeId) -> ArrayTypeInfo {
        let value = arena.get(id).expect("array-shaped TypeId must resolve");
        let bypass = value.special_type_arguments.is_some();
        if !bypass {
            if let Some(info) = self.arrays.get(&id) {
                return *info;
            }
        }

        let element_ty = match &value.kind {
            ValueTypeKind::Array(data) => data.element,
            ValueTypeKind::Set(data) => data.element,
            ValueTypeKind::Map(data) => data.value,
            _ => panic!("ensure_array_type called on a non-array-shaped TypeId"),
        };
        let element_repr = self.ensure_value_type(arena, descriptors, element_ty);
        let array_type = Self::push_array(&mut self.types, &mut self.next_index, StorageType::Val(element_repr), true);
        let struct_type = Self::push_struct(
            &mut self.types,
            &mut self.next_index,
            vec![
                FieldType { element_type: StorageType::Val(ValType::I32), mutable: true },
                FieldType { element_type: StorageType::Val(ValType::Ref(concrete_ref(array_type, true))), mutable: false },
            ],
        );

        let info = ArrayTypeInfo { array_type, struct_type };
        if !bypass {
            self.arrays.insert(id, info);
        }
        let _ = descriptors;
        info
    }

    /// Resolves (and caches) a class object type's vtable struct, instance
    /// struct, and optional static-fields struct (spec §4.6's Object
    /// (class) row).
    pub fn ensure_object_type(&mut self, arena: &TypeArena, descriptors: &DescriptorArena, id: TypeId) -> ObjectTypeInfo {
        if let Some(info) = self.objects.get(&id) {
            return *info;
        }
        let value = arena.get(id).expect("object TypeId must resolve");
        let ValueTypeKind::Object(data) = &value.kind else {
            panic!("ensure_object_type called on a non-object TypeId");
        };
        let descriptor = descriptors.get(data.descriptor).expect("ObjectTypeData's descriptor must be registered");

        let super_info = data.super_class.map(|super_id| self.ensure_object_type(arena, descriptors, super_id));

        let method_count = descriptor
            .this_shape
            .members
            .iter()
            .filter(|m| matches!(m, wasmc_shape::ShapeMember::Method { .. } | wasmc_shape::ShapeMember::Accessor { .. }))
            .count();
        let vtable_fields: Vec<FieldType> = (0..method_count)
            .map(|_| FieldType { element_type: StorageType::Val(ValType::Ref(RefType { nullable: true, heap_type: HeapType::Abstract { shared: false, ty: AbstractHeapType::Func } })), mutable: false })
            .collect();
        let vtable_type = Self::push_struct(&mut self.types, &mut self.next_index, vtable_fields);

        let field_count = descriptor.this_shape.members.iter().filter(|m| matches!(m, wasmc_shape::ShapeMember::Field { .. })).count();
        let mut instance_fields = Vec::with_capacity(1 + field_count);
        instance_fields.push(FieldType { element_type: StorageType::Val(ValType::Ref(concrete_ref(vtable_type, false))), mutable: false });
        for member in &descriptor.members {
            if matches!(member.kind, wasmc_shape::MemberKind::Field) {
                let field_repr = self.ensure_value_type(arena, descriptors, member.declared_type);
                instance_fields.push(FieldType { element_type: StorageType::Val(field_repr), mutable: !member.is_readonly() });
            }
        }
        let instance_type = Self::push_struct(&mut self.types, &mut self.next_index, instance_fields);
        let _ = super_info;

        let static_members: Vec<FieldType> = descriptor
            .members
            .iter()
            .filter(|m| matches!(m.kind, wasmc_shape::MemberKind::Field) && m.is_static())
            .map(|m| FieldType { element_type: StorageType::Val(self.ensure_value_type(arena, descriptors, m.declared_type)), mutable: !m.is_readonly() })
            .collect();
        let static_fields_type = if static_members.is_empty() { None } else { Some(Self::push_struct(&mut self.types, &mut self.next_index, static_members)) };

        // `data.name` is an `Atom`; resolving it to text needs the
        // `Interner` that produced it, which this registry does not own
        // (only `wasmc-build`'s `BuildContext` does). The `name` custom
        // section falls back to the stable `TypeId` instead.
        self.name(vtable_type, format!("object{}.vtable", id.0));
        self.name(instance_type, format!("object{}.instance", id.0));

        let info = ObjectTypeInfo { vtable_type, instance_type, static_fields_type };
        self.objects.insert(id, info);
        info
    }

    /// Resolves (and caches) the per-arity closure type a dynamically
    /// dispatched call (`AnyCall`/`DynamicCall`) casts its callee down to:
    /// every operand is `anyref` (the type an `any`-typed call's args and
    /// result already carry), so one signature per arity covers every
    /// callee encountered at that arity. Unlike [`Self::ensure_function_type`]
    /// this never threads a captured environment — a callee reached this
    /// way carries no upvalues through this path (see `DESIGN.md`).
    pub fn ensure_dynamic_closure_type(&mut self, arity: u32) -> FunctionTypeInfo {
        if let Some(info) = self.dynamic_closures.get(&arity) {
            return *info;
        }
        let params: Vec<ValType> = (0..arity).map(|_| ValType::Ref(anyref())).collect();
        let results = vec![ValType::Ref(anyref())];
        let signature_type = Self::push_func(&mut self.types, &mut self.next_index, params, results);
        let closure_struct_type = Self::push_struct(
            &mut self.types,
            &mut self.next_index,
            vec![FieldType {
                element_type: StorageType::Val(ValType::Ref(RefType { nullable: true, heap_type: HeapType::Abstract { shared: false, ty: AbstractHeapType::Func } })),
                mutable: false,
            }],
        );
        self.name(signature_type, format!("dynamic_call{arity}.sig"));
        self.name(closure_struct_type, format!("dynamic_call{arity}.closure"));

        let info = FunctionTypeInfo { signature_type, closure_struct_type, env_param_len: 0, original_param_count: arity };
        self.dynamic_closures.insert(arity, info);
        info
    }

    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Allocates a bare function type not tied to any [`TypeId`] — used for
    /// the host import signatures and exception tags (spec §6.2, §6.4),
    /// which describe the module's ambient ABI rather than a source-level
    /// value type.
    pub fn alloc_function_type(&mut self, params: Vec<ValType>, results: Vec<ValType>) -> u32 {
        Self::push_func(&mut self.types, &mut self.next_index, params, results)
    }

    pub fn finish(self) -> (TypeSection, Vec<(u32, String)>) {
        (self.types, self.type_names)
    }
}

#[cfg(test)]
#[path = "tests/types.rs"]
mod tests;
