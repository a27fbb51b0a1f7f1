use super::*;
use wasmc_common::interner::Interner;
use wasmc_common::span::Span;
use wasmc_ir::ReferenceKind;
use wasmc_shape::descriptor::{AccessorImpl, MemberImpl};
use wasmc_shape::{Member, MemberFlags, MemberKind};

fn push_receiver(ctx: &mut BuildContext, shape: Option<ShapeRef>) -> ValueId {
    ctx.values.push(Span::dummy(), TypeId::ANY, shape, ValueKind::This)
}

#[test]
fn no_shape_falls_back_to_dynamic_access() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let name = interner.intern("x");
    let receiver = push_receiver(&mut ctx, None);

    let result = resolve_member_access(&mut ctx, "f.ts", receiver, name, Access::Get);

    assert!(matches!(ctx.values.get(result).kind, ValueKind::DynamicGet { .. }));
}

#[test]
fn unknown_member_falls_back_to_dynamic_access_with_a_warning() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let known = interner.intern("known");
    let unknown = interner.intern("unknown");

    let member = Member { name: known, index: 0, kind: MemberKind::Field, declared_type: TypeId::NUMBER, flags: MemberFlags::empty() };
    let descriptor = ctx.descriptors.declare(vec![member], vec![MemberImpl::Field], None);
    let shape_ref = ShapeRef { descriptor, kind: ShapeKind::Origin };
    let receiver = push_receiver(&mut ctx, Some(shape_ref));

    let result = resolve_member_access(&mut ctx, "f.ts", receiver, unknown, Access::Get);

    assert!(matches!(ctx.values.get(result).kind, ValueKind::DynamicGet { .. }));
    assert!(!ctx.has_fatal_diagnostic());
    assert!(!ctx.diagnostics().is_empty());
}

#[test]
fn emit_vtable_or_shape_emits_vtable_call_for_this_shape() {
    let mut ctx = BuildContext::new();
    let receiver = push_receiver(&mut ctx, None);

    let result = emit_vtable_or_shape(&mut ctx, receiver, TypeId::ANY, ShapeKind::This, 2, Access::Call(vec![]));

    assert!(matches!(ctx.values.get(result).kind, ValueKind::VTableCall { slot: 2, .. }));
}

#[test]
fn empty_method_shape_member_falls_back_to_shape_call_on_origin_shape() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let name = interner.intern("go");

    let member = Member { name, index: 0, kind: MemberKind::Method, declared_type: TypeId::ANY, flags: MemberFlags::empty() };
    let descriptor = ctx.descriptors.declare(vec![member], vec![MemberImpl::Method { known_function: None }], None);
    let shape_ref = ShapeRef { descriptor, kind: ShapeKind::Origin };
    let receiver = push_receiver(&mut ctx, Some(shape_ref));

    let result = resolve_member_access(&mut ctx, "f.ts", receiver, name, Access::Call(vec![]));

    assert!(matches!(ctx.values.get(result).kind, ValueKind::ShapeCall { member_index: 0, .. }));
}

#[test]
fn concrete_field_resolves_to_offset_get_and_set() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let name = interner.intern("count");

    let member = Member { name, index: 0, kind: MemberKind::Field, declared_type: TypeId::NUMBER, flags: MemberFlags::empty() };
    let descriptor = ctx.descriptors.declare(vec![member], vec![MemberImpl::Field], None);
    let shape_ref = ShapeRef { descriptor, kind: ShapeKind::This };
    let receiver = push_receiver(&mut ctx, Some(shape_ref));

    let get = resolve_member_access(&mut ctx, "f.ts", receiver, name, Access::Get);
    assert!(matches!(ctx.values.get(get).kind, ValueKind::OffsetGet { .. }));

    let value = push_receiver(&mut ctx, None);
    let set = resolve_member_access(&mut ctx, "f.ts", receiver, name, Access::Set(value));
    assert!(matches!(ctx.values.get(set).kind, ValueKind::OffsetSet { .. }));
}

#[test]
fn concrete_method_with_known_function_resolves_to_direct_call() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let name = interner.intern("greet");
    let function = wasmc_shape::FunctionRef(7);

    let member = Member { name, index: 0, kind: MemberKind::Method, declared_type: TypeId::ANY, flags: MemberFlags::empty() };
    let descriptor = ctx.descriptors.declare(vec![member], vec![MemberImpl::Method { known_function: Some(function) }], None);
    let shape_ref = ShapeRef { descriptor, kind: ShapeKind::Origin };
    let receiver = push_receiver(&mut ctx, Some(shape_ref));

    let result = resolve_member_access(&mut ctx, "f.ts", receiver, name, Access::Call(vec![]));

    match ctx.values.get(result).kind {
        ValueKind::DirectCall { function: f, .. } => assert_eq!(f, function),
        ref other => panic!("expected DirectCall, got {other:?}"),
    }
}

#[test]
fn concrete_method_without_known_function_resolves_to_offset_call_on_this_shape() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let name = interner.intern("greet");

    let member = Member { name, index: 0, kind: MemberKind::Method, declared_type: TypeId::ANY, flags: MemberFlags::empty() };
    let descriptor = ctx.descriptors.declare(vec![member], vec![MemberImpl::Method { known_function: None }], None);
    let shape_ref = ShapeRef { descriptor, kind: ShapeKind::This };
    let receiver = push_receiver(&mut ctx, Some(shape_ref));

    let result = resolve_member_access(&mut ctx, "f.ts", receiver, name, Access::Call(vec![]));

    assert!(matches!(ctx.values.get(result).kind, ValueKind::OffsetCall { .. }));
}

#[test]
fn accessor_with_direct_getter_resolves_without_a_vtable_slot() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let name = interner.intern("value");
    let function = wasmc_shape::FunctionRef(3);

    let member = Member {
        name,
        index: 0,
        kind: MemberKind::Accessor,
        declared_type: TypeId::NUMBER,
        flags: MemberFlags::GETTER_PRESENT,
    };
    let descriptor = ctx.descriptors.declare(
        vec![member],
        vec![MemberImpl::Accessor { getter: Some(AccessorImpl::Direct(function)), setter: None }],
        None,
    );
    let shape_ref = ShapeRef { descriptor, kind: ShapeKind::Origin };
    let receiver = push_receiver(&mut ctx, Some(shape_ref));

    let result = resolve_member_access(&mut ctx, "f.ts", receiver, name, Access::Get);

    match ctx.values.get(result).kind {
        ValueKind::DirectGetter { function: f } => assert_eq!(f, function),
        ref other => panic!("expected DirectGetter, got {other:?}"),
    }
}

#[test]
fn accessor_with_vtable_getter_resolves_to_offset_getter_on_this_shape() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let name = interner.intern("value");

    let member = Member {
        name,
        index: 0,
        kind: MemberKind::Accessor,
        declared_type: TypeId::NUMBER,
        flags: MemberFlags::GETTER_PRESENT,
    };
    let descriptor = ctx.descriptors.declare(
        vec![member],
        vec![MemberImpl::Accessor { getter: Some(AccessorImpl::Vtable), setter: None }],
        None,
    );
    let shape_ref = ShapeRef { descriptor, kind: ShapeKind::This };
    let receiver = push_receiver(&mut ctx, Some(shape_ref));

    let result = resolve_member_access(&mut ctx, "f.ts", receiver, name, Access::Get);

    assert!(matches!(ctx.values.get(result).kind, ValueKind::OffsetGetter { .. }));
}

#[test]
fn field_accessed_as_a_call_pushes_a_fatal_diagnostic() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let name = interner.intern("count");

    let member = Member { name, index: 0, kind: MemberKind::Field, declared_type: TypeId::NUMBER, flags: MemberFlags::empty() };
    let descriptor = ctx.descriptors.declare(vec![member], vec![MemberImpl::Field], None);
    let shape_ref = ShapeRef { descriptor, kind: ShapeKind::This };
    let receiver = push_receiver(&mut ctx, Some(shape_ref));

    resolve_member_access(&mut ctx, "f.ts", receiver, name, Access::Call(vec![]));

    assert!(ctx.has_fatal_diagnostic());
}

#[test]
fn left_reference_kind_values_are_always_set_variants() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let name = interner.intern("count");

    let member = Member { name, index: 0, kind: MemberKind::Field, declared_type: TypeId::NUMBER, flags: MemberFlags::empty() };
    let descriptor = ctx.descriptors.declare(vec![member], vec![MemberImpl::Field], None);
    let shape_ref = ShapeRef { descriptor, kind: ShapeKind::This };
    let receiver = push_receiver(&mut ctx, Some(shape_ref));
    let value = push_receiver(&mut ctx, None);

    ctx.push_reference_kind(ReferenceKind::Left);
    let set = resolve_member_access(&mut ctx, "f.ts", receiver, name, Access::Set(value));
    assert!(ctx.values.get(set).kind.is_set_variant());
    ctx.pop_reference_kind();
}

#[test]
fn shape_ref_for_uses_this_shape_inside_own_class_else_origin_shape() {
    let mut ctx = BuildContext::new();
    let mut interner = Interner::new();
    let class_name = interner.intern("C");
    let descriptor = ctx.descriptors.declare(Vec::new(), Vec::new(), None);
    let object_type = ctx.types.find_or_create(
        wasmc_types::arena::AstTypeKey::Named { ast_id: 1, type_args: vec![] },
        |_arena, _id| {
            wasmc_types::kind::ValueTypeKind::Object(wasmc_types::kind::ObjectTypeData {
                name: class_name,
                descriptor,
                type_parameters: vec![],
                is_interface: false,
                super_class: None,
            })
        },
    );

    let inside = shape_ref_for(&ctx, object_type, true).expect("object type has a shape");
    let outside = shape_ref_for(&ctx, object_type, false).expect("object type has a shape");

    assert_eq!(inside.kind, ShapeKind::This);
    assert_eq!(outside.kind, ShapeKind::Origin);
}
