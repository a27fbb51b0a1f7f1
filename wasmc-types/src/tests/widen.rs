use super::*;
use crate::arena::{AstTypeKey, TypeArena};
use crate::kind::{DescriptorId, ObjectTypeData};

fn make_class(arena: &mut TypeArena, ast_id: u64, name: &str, super_class: Option<TypeId>) -> TypeId {
    arena.find_or_create(AstTypeKey::Named { ast_id, type_args: vec![] }, |_arena, _id| {
        ValueTypeKind::Object(ObjectTypeData {
            name: wasmc_common::interner::Interner::new().intern(name),
            descriptor: DescriptorId(ast_id as u32),
            type_parameters: vec![],
            is_interface: false,
            super_class,
        })
    })
}

#[test]
fn single_member_union_widens_to_itself() {
    let arena = TypeArena::new();
    assert_eq!(wide_of(&arena, &[TypeId::NUMBER]), TypeId::NUMBER);
}

#[test]
fn identical_members_widen_to_the_shared_type() {
    let arena = TypeArena::new();
    assert_eq!(wide_of(&arena, &[TypeId::STRING, TypeId::STRING]), TypeId::STRING);
}

#[test]
fn mixed_primitives_widen_to_any() {
    let arena = TypeArena::new();
    assert_eq!(wide_of(&arena, &[TypeId::NUMBER, TypeId::STRING]), TypeId::ANY);
}

#[test]
fn siblings_sharing_a_base_class_widen_to_that_base() {
    let mut arena = TypeArena::new();
    let animal = make_class(&mut arena, 1, "Animal", None);
    let dog = make_class(&mut arena, 2, "Dog", Some(animal));
    let cat = make_class(&mut arena, 3, "Cat", Some(animal));
    assert_eq!(wide_of(&arena, &[dog, cat]), animal);
}

#[test]
fn objects_with_no_common_ancestor_widen_to_any() {
    let mut arena = TypeArena::new();
    let a = make_class(&mut arena, 4, "A", None);
    let b = make_class(&mut arena, 5, "B", None);
    assert_eq!(wide_of(&arena, &[a, b]), TypeId::ANY);
}
