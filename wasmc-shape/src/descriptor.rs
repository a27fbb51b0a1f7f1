//! Object descriptors: the member list every `Object`/`Array`/`Map`/`Set`
//! value type carries, plus the arena that finalizes both of a
//! descriptor's shapes at construction time (spec §3.2, §4.2).

use rustc_hash::FxHashMap;
use wasmc_types::{DescriptorId, TypeId};

use crate::member::Member;
use crate::shape::{FunctionRef, Shape, ShapeAccessor, ShapeMember};

/// How a single accessor side (getter or setter) is concretely implemented,
/// supplied by the caller at declaration time because only the builder
/// (which has seen the class body) knows this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorImpl {
    /// Implemented as a stored function pointer occupying a vtable slot.
    Vtable,
    /// Implemented as a known top-level function — no vtable slot needed.
    Direct(FunctionRef),
}

/// Per-member concrete-implementation knowledge, parallel to the
/// [`Member`] list passed to [`DescriptorArena::declare`]. This is what
/// distinguishes a field's fixed offset from a method's "is there a known
/// implementation at all" question, and what tells the accessor builder
/// which side needs a vtable slot.
#[derive(Debug, Clone)]
pub enum MemberImpl {
    Field,
    Method { known_function: Option<FunctionRef> },
    Accessor { getter: Option<AccessorImpl>, setter: Option<AccessorImpl> },
    Constructor { known_function: Option<FunctionRef> },
}

/// A descriptor's member list plus its two finalized shapes. Built once by
/// [`DescriptorArena::declare`] and immutable thereafter.
#[derive(Debug, Clone)]
pub struct ObjectDescriptor {
    pub members: Vec<Member>,
    pub super_descriptor: Option<DescriptorId>,
    pub origin_shape: Shape,
    pub this_shape: Shape,
}

impl ObjectDescriptor {
    pub fn member_by_name(&self, name_eq: impl Fn(&Member) -> bool) -> Option<&Member> {
        self.members.iter().find(|m| name_eq(m))
    }

    /// Finds the declared function type of the method or accessor side
    /// occupying vtable slot `slot` in this descriptor's `this_shape`, so a
    /// vtable dispatch site can recover a `call_ref`'s signature type from
    /// nothing but the receiver's descriptor and the slot it already reads
    /// the funcref from.
    pub fn member_type_for_vtable_slot(&self, slot: u32) -> Option<TypeId> {
        let occupies = |member: &ShapeMember| match member {
            ShapeMember::Method { offset: Some(s), .. } => *s == slot,
            ShapeMember::Accessor { getter, setter } => {
                matches!(getter, Some(ShapeAccessor::Offset(s)) if *s == slot) || matches!(setter, Some(ShapeAccessor::Offset(s)) if *s == slot)
            }
            _ => false,
        };
        self.this_shape.members.iter().position(occupies).map(|index| self.members[index].declared_type)
    }
}

/// Owns every [`ObjectDescriptor`] produced during a compilation, keyed by
/// [`DescriptorId`] (the same opaque handle `wasmc_types::ValueType`
/// stores for object-shaped types).
pub struct DescriptorArena {
    descriptors: FxHashMap<DescriptorId, ObjectDescriptor>,
    next_id: u32,
}

impl Default for DescriptorArena {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorArena {
    pub fn new() -> Self {
        DescriptorArena { descriptors: FxHashMap::default(), next_id: 0 }
    }

    pub fn get(&self, id: DescriptorId) -> Option<&ObjectDescriptor> {
        self.descriptors.get(&id)
    }

    /// Finalizes both shapes for a new descriptor. `members`/`impls` must
    /// be the same length and in declaration order; `super_descriptor`, if
    /// present, must already be registered in this arena.
    ///
    /// Subclass shapes extend the superclass shape at the same prefix
    /// (spec §4.2): a member whose `MemberFlags::OVERRIDE` flag is set
    /// replaces the inherited slot at its own index rather than appending
    /// a new one, so vtable slot numbers stay stable across the hierarchy.
    pub fn declare(
        &mut self,
        members: Vec<Member>,
        impls: Vec<MemberImpl>,
        super_descriptor: Option<DescriptorId>,
    ) -> DescriptorId {
        assert_eq!(members.len(), impls.len(), "members and impls must be declared pairwise");

        let (super_origin, super_this) = match super_descriptor {
            Some(sup) => {
                let sup = self.descriptors.get(&sup).expect("super_descriptor must already be declared");
                (sup.origin_shape.members.clone(), sup.this_shape.members.clone())
            }
            None => (Vec::new(), Vec::new()),
        };

        let mut next_vtable_slot = super_this
            .iter()
            .filter(|m| matches!(m, ShapeMember::Method { .. } | ShapeMember::Accessor { .. }))
            .count() as u32;
        let mut next_field_slot = super_this.iter().filter(|m| matches!(m, ShapeMember::Field { .. })).count() as u32;

        let mut origin_members = super_origin;
        let mut this_members = super_this;

        for (member, member_impl) in members.iter().zip(impls.iter()) {
            let index = member.index as usize;
            // An override replaces the inherited slot at the same index
            // rather than allocating a new one, so vtable slot numbers
            // stay stable across the hierarchy (spec §4.2).
            let inherited_slot = if member.is_override() && index < this_members.len() {
                match &this_members[index] {
                    ShapeMember::Method { offset: Some(slot), .. } => Some(*slot),
                    _ => None,
                }
            } else {
                None
            };

            let (origin, this) = match member_impl {
                MemberImpl::Field => {
                    let offset = 1 + next_field_slot;
                    if !member.is_override() {
                        next_field_slot += 1;
                    }
                    (ShapeMember::Field { offset }, ShapeMember::Field { offset })
                }
                MemberImpl::Method { known_function } | MemberImpl::Constructor { known_function } => {
                    let slot = match inherited_slot {
                        Some(slot) => slot,
                        None => {
                            let slot = next_vtable_slot;
                            next_vtable_slot += 1;
                            slot
                        }
                    };
                    let this = ShapeMember::Method { offset: Some(slot), function: None };
                    let origin = match known_function {
                        Some(f) => ShapeMember::Method { offset: None, function: Some(*f) },
                        None => ShapeMember::Method { offset: None, function: None },
                    };
                    (origin, this)
                }
                MemberImpl::Accessor { getter, setter } => {
                    let this_getter = getter.as_ref().map(|_| {
                        let slot = next_vtable_slot;
                        next_vtable_slot += 1;
                        ShapeAccessor::Offset(slot)
                    });
                    let this_setter = setter.as_ref().map(|_| {
                        let slot = next_vtable_slot;
                        next_vtable_slot += 1;
                        ShapeAccessor::Offset(slot)
                    });
                    let origin_getter = match getter {
                        Some(AccessorImpl::Direct(f)) => Some(ShapeAccessor::Direct(*f)),
                        _ => None,
                    };
                    let origin_setter = match setter {
                        Some(AccessorImpl::Direct(f)) => Some(ShapeAccessor::Direct(*f)),
                        _ => None,
                    };
                    (
                        ShapeMember::Accessor { getter: origin_getter, setter: origin_setter },
                        ShapeMember::Accessor { getter: this_getter, setter: this_setter },
                    )
                }
            };

            if member.is_override() && index < this_members.len() {
                origin_members[index] = origin;
                this_members[index] = this;
            } else {
                debug_assert_eq!(index, origin_members.len(), "member index must be dense and monotonic");
                origin_members.push(origin);
                this_members.push(this);
            }
        }

        let id = DescriptorId(self.next_id);
        self.next_id += 1;
        self.descriptors.insert(
            id,
            ObjectDescriptor {
                members,
                super_descriptor,
                origin_shape: Shape { members: origin_members },
                this_shape: Shape { members: this_members },
            },
        );
        id
    }
}

#[cfg(test)]
#[path = "tests/descriptor.rs"]
mod tests;
