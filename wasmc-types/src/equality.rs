//! Structural equality between two types (spec §3.1 invariant 1): same
//! variant and structurally-equal constituents, independent of `TypeId`.

use std::collections::HashSet;

use crate::arena::TypeArena;
use crate::kind::{TypeParameterOwner, ValueTypeKind};
use crate::type_id::TypeId;

/// `structural_equality(arena, a, b)` holds when `a` and `b` denote the
/// same type shape even if they were interned under different ids (two
/// independently-specialized instantiations of the same generic with
/// equal type arguments, for instance).
///
/// `seen` guards against the same cyclic-type-graph case `TypeArena` stubs
/// around: a class whose field refers back to the class itself. Without
/// it, comparing two such types would recurse forever.
pub fn structural_equality(arena: &TypeArena, a: TypeId, b: TypeId) -> bool {
    equal_with_seen(arena, a, b, &mut HashSet::new())
}

fn equal_with_seen(arena: &TypeArena, a: TypeId, b: TypeId, seen: &mut HashSet<(TypeId, TypeId)>) -> bool {
    if a == b {
        return true;
    }
    if !seen.insert((a, b)) {
        // Already comparing this pair further up the call stack: assume
        // equal and let the outer comparison of sibling fields decide.
        return true;
    }

    let (Some(ta), Some(tb)) = (arena.get(a), arena.get(b)) else {
        return false;
    };

    if ta.kind.discriminant() != tb.kind.discriminant() {
        return false;
    }

    match (&ta.kind, &tb.kind) {
        (ValueTypeKind::Void, ValueTypeKind::Void)
        | (ValueTypeKind::Undefined, ValueTypeKind::Undefined)
        | (ValueTypeKind::Null, ValueTypeKind::Null)
        | (ValueTypeKind::Never, ValueTypeKind::Never)
        | (ValueTypeKind::Int, ValueTypeKind::Int)
        | (ValueTypeKind::Number, ValueTypeKind::Number)
        | (ValueTypeKind::Boolean, ValueTypeKind::Boolean)
        | (ValueTypeKind::RawString, ValueTypeKind::RawString)
        | (ValueTypeKind::String, ValueTypeKind::String)
        | (ValueTypeKind::Any, ValueTypeKind::Any)
        | (ValueTypeKind::Generic, ValueTypeKind::Generic)
        | (ValueTypeKind::Namespace, ValueTypeKind::Namespace)
        | (ValueTypeKind::Empty, ValueTypeKind::Empty) => true,

        (ValueTypeKind::TypeParameter(pa), ValueTypeKind::TypeParameter(pb)) => {
            // Type parameters belonging to the same declaration are
            // compared nominally by owner+index; otherwise fall back to
            // structural comparison of their constraints.
            match (&pa.owner, &pb.owner) {
                (TypeParameterOwner::Function(fa), TypeParameterOwner::Function(fb)) if fa == fb => {
                    pa.index == pb.index
                }
                (TypeParameterOwner::Class(ca), TypeParameterOwner::Class(cb)) if ca == cb => pa.index == pb.index,
                (TypeParameterOwner::Closure(xa), TypeParameterOwner::Closure(xb)) if xa == xb => {
                    pa.index == pb.index
                }
                _ => equal_with_seen(arena, pa.wide_type, pb.wide_type, seen),
            }
        }

        (ValueTypeKind::Enum(ea), ValueTypeKind::Enum(eb)) => {
            ea.name == eb.name
                && ea.is_const == eb.is_const
                && ea.members.len() == eb.members.len()
                && ea
                    .members
                    .iter()
                    .zip(eb.members.iter())
                    .all(|((na, ta), (nb, tb))| na == nb && equal_with_seen(arena, *ta, *tb, seen))
        }

        (ValueTypeKind::Union(ua), ValueTypeKind::Union(ub)) => {
            ua.members.len() == ub.members.len()
                && ua
                    .members
                    .iter()
                    .all(|ma| ub.members.iter().any(|mb| equal_with_seen(arena, *ma, *mb, seen)))
        }

        (ValueTypeKind::Function(fa), ValueTypeKind::Function(fb)) => {
            fa.is_closure == fb.is_closure
                && fa.params.len() == fb.params.len()
                && equal_with_seen(arena, fa.return_type, fb.return_type, seen)
                && fa
                    .params
                    .iter()
                    .zip(fb.params.iter())
                    .all(|(pa, pb)| equal_with_seen(arena, *pa, *pb, seen))
        }

        (ValueTypeKind::Array(aa), ValueTypeKind::Array(ab)) => equal_with_seen(arena, aa.element, ab.element, seen),

        (ValueTypeKind::Set(sa), ValueTypeKind::Set(sb)) => equal_with_seen(arena, sa.element, sb.element, seen),

        (ValueTypeKind::Map(ma), ValueTypeKind::Map(mb)) => {
            equal_with_seen(arena, ma.key, mb.key, seen) && equal_with_seen(arena, ma.value, mb.value, seen)
        }

        (ValueTypeKind::Object(oa), ValueTypeKind::Object(ob)) => {
            oa.descriptor == ob.descriptor
                && oa.type_parameters.len() == ob.type_parameters.len()
                && oa
                    .type_parameters
                    .iter()
                    .zip(ob.type_parameters.iter())
                    .all(|(pa, pb)| equal_with_seen(arena, *pa, *pb, seen))
        }

        (ValueTypeKind::ClosureContext(ca), ValueTypeKind::ClosureContext(cb)) => {
            ca.free_vars.len() == cb.free_vars.len()
                && match (ca.parent, cb.parent) {
                    (None, None) => true,
                    (Some(pa), Some(pb)) => equal_with_seen(arena, pa, pb, seen),
                    _ => false,
                }
                && ca
                    .free_vars
                    .iter()
                    .zip(cb.free_vars.iter())
                    .all(|(va, vb)| equal_with_seen(arena, *va, *vb, seen))
        }

        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/equality.rs"]
mod tests;
