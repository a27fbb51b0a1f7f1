//! Member-access dispatch resolution (spec §4.3) — the heart of the
//! expression builder. Given a receiver value and a member name, decides
//! among dynamic, shape, vtable, offset, and direct dispatch.

use wasmc_common::diagnostics::{codes, Diagnostic};
use wasmc_common::interner::Atom;
use wasmc_ir::{ValueId, ValueKind};
use wasmc_shape::{ShapeAccessor, ShapeKind, ShapeMember, ShapeRef};
use wasmc_types::{TypeId, ValueTypeKind};

use crate::context::BuildContext;

/// What the access is being built for; determines which variant family
/// (`*Get`, `*Set`, `*Call`) the resolution emits.
pub enum Access {
    Get,
    Set(ValueId),
    Call(Vec<ValueId>),
}

fn call_result_type(ctx: &BuildContext, declared: TypeId) -> TypeId {
    match ctx.types.get(declared).map(|t| &t.kind) {
        Some(ValueTypeKind::Function(f)) => f.return_type,
        _ => TypeId::ANY,
    }
}

fn descriptor_member_type(ctx: &BuildContext, receiver_ty: TypeId, name: Atom, atom_eq: impl Fn(Atom) -> bool) -> TypeId {
    match ctx.types.get(receiver_ty).map(|t| &t.kind) {
        Some(ValueTypeKind::Object(o)) => ctx
            .descriptors
            .get(o.descriptor)
            .and_then(|d| d.members.iter().find(|m| atom_eq(m.name)))
            .map(|m| m.declared_type)
            .unwrap_or(TypeId::ANY),
        _ => {
            let _ = name;
            TypeId::ANY
        }
    }
}

fn emit_dynamic(ctx: &mut BuildContext, receiver: ValueId, name: Atom, access: Access) -> ValueId {
    let span = ctx.values.get(receiver).span;
    let receiver_ty = ctx.values.get(receiver).ty;
    let result_ty = descriptor_member_type(ctx, receiver_ty, name, |n| n == name);
    match access {
        Access::Get => ctx.values.push(span, result_ty, None, ValueKind::DynamicGet { receiver, name }),
        Access::Set(value) => ctx.values.push(span, result_ty, None, ValueKind::DynamicSet { receiver, name, value }),
        Access::Call(args) => ctx.values.push(span, result_ty, None, ValueKind::DynamicCall { receiver, name, args }),
    }
}

fn emit_vtable_or_shape(
    ctx: &mut BuildContext,
    receiver: ValueId,
    result_ty: TypeId,
    shape_kind: ShapeKind,
    member_index: u32,
    access: Access,
) -> ValueId {
    let span = ctx.values.get(receiver).span;
    match shape_kind {
        ShapeKind::This => match access {
            Access::Get => ctx.values.push(span, result_ty, None, ValueKind::VTableGet { receiver, slot: member_index }),
            Access::Set(value) => {
                ctx.values.push(span, result_ty, None, ValueKind::VTableSet { receiver, slot: member_index, value })
            }
            Access::Call(args) => {
                ctx.values.push(span, result_ty, None, ValueKind::VTableCall { receiver, slot: member_index, args })
            }
        },
        ShapeKind::Origin => match access {
            Access::Get => {
                ctx.values.push(span, result_ty, None, ValueKind::ShapeGet { receiver, member_index })
            }
            Access::Set(value) => {
                ctx.values.push(span, result_ty, None, ValueKind::ShapeSet { receiver, member_index, value })
            }
            Access::Call(args) => {
                ctx.values.push(span, result_ty, None, ValueKind::ShapeCall { receiver, member_index, args })
            }
        },
    }
}

/// Resolves `receiver.name` (spec §4.3 steps 3-7). `receiver` must already
/// be the right-value the caller intends to dispatch against — copying a
/// mutable variable before its shape can change is the caller's
/// responsibility (spec §9 open question 1).
pub fn resolve_member_access(ctx: &mut BuildContext, file: &str, receiver: ValueId, name: Atom, access: Access) -> ValueId {
    let receiver_value = ctx.values.get(receiver);
    let span = receiver_value.span;
    let shape_ref = receiver_value.shape;

    let Some(shape_ref) = shape_ref else {
        return emit_dynamic(ctx, receiver, name, access);
    };

    // Extract everything needed from the descriptor/shape tables as owned
    // data before any further call needs `&mut ctx` — `descriptor`/`shape`
    // below borrow through `ctx.descriptors`, which would otherwise still
    // be alive when `push_diagnostic`/`values.push` need exclusive access.
    enum Lookup {
        NoMember,
        NoShapeSlot,
        Found { index: u32, declared_type: TypeId, shape_member: ShapeMember },
    }
    let lookup = match ctx.descriptors.get(shape_ref.descriptor) {
        None => return emit_dynamic(ctx, receiver, name, access),
        Some(descriptor) => match descriptor.members.iter().find(|m| m.name == name) {
            None => Lookup::NoMember,
            Some(member) => {
                let shape = match shape_ref.kind {
                    ShapeKind::Origin => &descriptor.origin_shape,
                    ShapeKind::This => &descriptor.this_shape,
                };
                match shape.member_at(member.index) {
                    None => Lookup::NoShapeSlot,
                    Some(shape_member) => {
                        Lookup::Found { index: member.index, declared_type: member.declared_type, shape_member: shape_member.clone() }
                    }
                }
            }
        },
    };

    let (member_index, member_declared_type, shape_member) = match lookup {
        Lookup::NoMember => {
            ctx.push_diagnostic(Diagnostic::warning(file, span.start, span.len(), codes::SHAPE_FALLBACK, "unknown member; falling back to dynamic access"));
            return emit_dynamic(ctx, receiver, name, access);
        }
        Lookup::NoShapeSlot => return emit_dynamic(ctx, receiver, name, access),
        Lookup::Found { index, declared_type, shape_member } => (index, declared_type, shape_member),
    };

    if shape_member.is_empty() {
        ctx.push_diagnostic(Diagnostic::warning(
            file,
            span.start,
            span.len(),
            codes::SHAPE_FALLBACK,
            "shape member has no statically-known implementation",
        ));
        let result_ty = if matches!(access, Access::Call(_)) { call_result_type(ctx, member_declared_type) } else { member_declared_type };
        return emit_vtable_or_shape(ctx, receiver, result_ty, shape_ref.kind, member_index, access);
    }

    match shape_member.clone() {
        ShapeMember::Field { offset } => {
            let span = span;
            match access {
                Access::Get => ctx.values.push(span, member_declared_type, None, ValueKind::OffsetGet { receiver, slot: offset }),
                Access::Set(value) => ctx.values.push(span, member_declared_type, None, ValueKind::OffsetSet { receiver, slot: offset, value }),
                Access::Call(_) => {
                    ctx.push_diagnostic(Diagnostic::error(file, span.start, span.len(), codes::UNRESOLVED_MEMBER, "field is not callable"));
                    receiver
                }
            }
        }
        ShapeMember::Accessor { getter, setter } => match access {
            Access::Get => match getter {
                Some(ShapeAccessor::Offset(slot)) => ctx.values.push(span, member_declared_type, None, ValueKind::OffsetGetter { receiver, slot }),
                Some(ShapeAccessor::Direct(function)) => ctx.values.push(span, member_declared_type, None, ValueKind::DirectGetter { function }),
                None => emit_vtable_or_shape(ctx, receiver, member_declared_type, shape_ref.kind, member_index, Access::Get),
            },
            Access::Set(value) => match setter {
                Some(ShapeAccessor::Offset(slot)) => ctx.values.push(span, member_declared_type, None, ValueKind::OffsetSetter { receiver, slot, value }),
                Some(ShapeAccessor::Direct(function)) => ctx.values.push(span, member_declared_type, None, ValueKind::DirectSetter { function, value }),
                None => emit_vtable_or_shape(ctx, receiver, member_declared_type, shape_ref.kind, member_index, Access::Set(value)),
            },
            Access::Call(_) => {
                ctx.push_diagnostic(Diagnostic::error(file, span.start, span.len(), codes::UNRESOLVED_MEMBER, "accessor is not callable"));
                receiver
            }
        },
        ShapeMember::Method { offset, function } => {
            let result_ty = call_result_type(ctx, member_declared_type);
            match access {
                Access::Call(args) => match (offset, function) {
                    (Some(slot), _) => ctx.values.push(span, result_ty, None, ValueKind::OffsetCall { receiver, slot, args }),
                    (None, Some(function)) => ctx.values.push(span, result_ty, None, ValueKind::DirectCall { function, args }),
                    (None, None) => emit_vtable_or_shape(ctx, receiver, result_ty, shape_ref.kind, member_index, Access::Call(args)),
                },
                _ => {
                    ctx.push_diagnostic(Diagnostic::error(file, span.start, span.len(), codes::UNRESOLVED_MEMBER, "method used outside a call"));
                    receiver
                }
            }
        }
    }
}

/// Computes the `own.shape` a freshly-built object-typed value should
/// carry: `originShape` for every receiver except one currently being
/// evaluated from inside its own class body.
pub fn shape_ref_for(ctx: &BuildContext, ty: TypeId, inside_own_class: bool) -> Option<ShapeRef> {
    match ctx.types.get(ty).map(|t| &t.kind) {
        Some(ValueTypeKind::Object(o)) => {
            Some(ShapeRef { descriptor: o.descriptor, kind: if inside_own_class { ShapeKind::This } else { ShapeKind::Origin } })
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/dispatch.rs"]
mod tests;
