//! Union widening (spec §4.1): picking the single type a union can always
//! be soundly treated as when a call site wants one value, not a union.

use crate::arena::TypeArena;
use crate::kind::ValueTypeKind;
use crate::type_id::TypeId;

/// The smallest single type that subsumes every member of `members`.
///
/// When every member is an object type descending from a common base
/// class, that base is the widening target (so a `Dog | Cat` union widens
/// to `Animal`, letting dispatch stay a direct `struct.get` instead of
/// falling back to dynamic lookup). Otherwise — mixed primitives, or
/// objects with no shared ancestor — the only sound answer is `any`.
pub fn wide_of(arena: &TypeArena, members: &[TypeId]) -> TypeId {
    if members.is_empty() {
        return TypeId::NEVER;
    }
    if let [only] = members {
        return *only;
    }
    if members.iter().all(|m| *m == members[0]) {
        return members[0];
    }

    if let Some(common) = common_object_ancestor(arena, members) {
        return common;
    }

    TypeId::ANY
}

fn common_object_ancestor(arena: &TypeArena, members: &[TypeId]) -> Option<TypeId> {
    let mut chains: Vec<Vec<TypeId>> = Vec::with_capacity(members.len());
    for &m in members {
        chains.push(ancestor_chain(arena, m)?);
    }
    let first = chains.first()?;
    first
        .iter()
        .rev()
        .find(|candidate| chains.iter().all(|chain| chain.contains(candidate)))
        .copied()
}

/// `[self, super, super.super, ...]` for an object type; `None` if `id`
/// isn't an object type at all (arrays/sets/maps/primitives never widen
/// to a common ancestor, only to `any`).
fn ancestor_chain(arena: &TypeArena, id: TypeId) -> Option<Vec<TypeId>> {
    let mut chain = vec![id];
    let mut current = id;
    loop {
        let ty = arena.get(current)?;
        match &ty.kind {
            ValueTypeKind::Object(o) => match o.super_class {
                Some(next) => {
                    chain.push(next);
                    current = next;
                }
                None => break,
            },
            _ => return None,
        }
    }
    Some(chain)
}

#[cfg(test)]
#[path = "tests/widen.rs"]
mod tests;
