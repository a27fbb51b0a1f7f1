use super::*;
use wasmc_shape::{DescriptorArena, Member, MemberFlags, MemberKind};
use wasmc_types::{ArrayTypeData, AstTypeKey, ObjectTypeData};

fn atom(n: u32) -> wasmc_common::interner::Atom {
    // Tests never resolve an `Atom` back to text (see the comment in
    // `ensure_object_type`), so any distinct value works as a key.
    let mut interner = wasmc_common::interner::Interner::new();
    interner.intern(&format!("name{n}"))
}

#[test]
fn primitive_representations_match_the_table() {
    let arena = TypeArena::new();
    let descriptors = DescriptorArena::new();
    let mut reg = TypeRegistry::new(false);

    assert_eq!(reg.ensure_value_type(&arena, &descriptors, TypeId::NUMBER), ValType::F64);
    assert_eq!(reg.ensure_value_type(&arena, &descriptors, TypeId::BOOLEAN), ValType::I32);
    assert_eq!(reg.ensure_value_type(&arena, &descriptors, TypeId::INT), ValType::I32);
    assert!(matches!(reg.ensure_value_type(&arena, &descriptors, TypeId::ANY), ValType::Ref(_)));
}

#[test]
fn string_representation_is_a_concrete_struct_ref() {
    let arena = TypeArena::new();
    let descriptors = DescriptorArena::new();
    let mut reg = TypeRegistry::new(false);
    let repr = reg.ensure_value_type(&arena, &descriptors, TypeId::STRING);
    match repr {
        ValType::Ref(r) => assert_eq!(r.heap_type, HeapType::Concrete(reg.string_type)),
        _ => panic!("expected a reference type"),
    }
}

#[test]
fn array_type_is_cached_across_repeated_lookups() {
    let mut arena = TypeArena::new();
    let descriptors = DescriptorArena::new();
    let descriptor_id = {
        let mut d = DescriptorArena::new();
        d.declare(Vec::new(), Vec::new(), None)
    };
    let array_id = arena.find_or_create(AstTypeKey::Array(TypeId::NUMBER), |_arena, _id| {
        ValueTypeKind::Array(ArrayTypeData { element: TypeId::NUMBER, descriptor: descriptor_id })
    });

    let mut reg = TypeRegistry::new(false);
    let first = reg.ensure_array_type(&arena, &descriptors, array_id);
    let second = reg.ensure_array_type(&arena, &descriptors, array_id);
    assert_eq!(first.struct_type, second.struct_type);
}

#[test]
fn array_type_with_special_arguments_bypasses_the_cache() {
    let mut arena = TypeArena::new();
    let descriptors = DescriptorArena::new();
    let mut descriptor_arena = DescriptorArena::new();
    let descriptor_id = descriptor_arena.declare(Vec::new(), Vec::new(), None);

    let generic = arena.find_or_create(AstTypeKey::Array(TypeId::ANY), |_arena, _id| {
        ValueTypeKind::Array(ArrayTypeData { element: TypeId::ANY, descriptor: descriptor_id })
    });
    let specialized = arena.specialize(generic, vec![TypeId::NUMBER], |_arena, _id, args| {
        ValueTypeKind::Array(ArrayTypeData { element: args[0], descriptor: descriptor_id })
    });

    let mut reg = TypeRegistry::new(false);
    let first = reg.ensure_array_type(&arena, &descriptors, specialized);
    let second = reg.ensure_array_type(&arena, &descriptors, specialized);
    assert_ne!(first.struct_type, second.struct_type, "specialized arrays must never be deduplicated");
}

#[test]
fn object_type_emits_a_vtable_and_instance_struct() {
    let mut arena = TypeArena::new();
    let mut descriptors = DescriptorArena::new();
    let member = Member { name: atom(1), index: 0, kind: MemberKind::Field, declared_type: TypeId::NUMBER, flags: MemberFlags::empty() };
    let descriptor_id = descriptors.declare(vec![member], vec![wasmc_shape::descriptor::MemberImpl::Field], None);

    let object_id = arena.find_or_create(AstTypeKey::Named { ast_id: 1, type_args: Vec::new() }, |_arena, _id| {
        ValueTypeKind::Object(ObjectTypeData {
            name: atom(2),
            descriptor: descriptor_id,
            type_parameters: Vec::new(),
            is_interface: false,
            super_class: None,
        })
    });

    let mut reg = TypeRegistry::new(true);
    let info = reg.ensure_object_type(&arena, &descriptors, object_id);
    assert!(info.vtable_type < info.instance_type);
    assert!(info.static_fields_type.is_none());
}

#[test]
fn function_type_augments_params_with_the_environment_slot_for_closures() {
    let mut arena = TypeArena::new();
    let descriptors = DescriptorArena::new();
    let function_id = arena.find_or_create(AstTypeKey::Named { ast_id: 3, type_args: Vec::new() }, |_arena, _id| {
        ValueTypeKind::Function(wasmc_types::FunctionTypeData {
            params: vec![TypeId::NUMBER],
            return_type: TypeId::NUMBER,
            type_parameters: Vec::new(),
            is_closure: true,
        })
    });

    let mut reg = TypeRegistry::new(false);
    let info = reg.ensure_function_type(&arena, &descriptors, function_id);
    assert_eq!(info.env_param_len, 1);
    assert_eq!(info.original_param_count, 1);
}
