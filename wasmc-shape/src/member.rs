//! A single declared member of an object descriptor (spec §3.2).

use bitflags::bitflags;
use wasmc_common::interner::Atom;
use wasmc_types::TypeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
    Accessor,
    Constructor,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MemberFlags: u8 {
        const STATIC          = 0b0000_0001;
        const READONLY        = 0b0000_0010;
        const GETTER_PRESENT  = 0b0000_0100;
        const SETTER_PRESENT  = 0b0000_1000;
        const OVERRIDE        = 0b0001_0000;
    }
}

/// One entry in an [`crate::ObjectDescriptor`]'s member list.
///
/// `index` is the member's stable, dense position in declaration order —
/// the same position it occupies in `ObjectDescriptor::members` (spec §8
/// invariant 4).
#[derive(Debug, Clone)]
pub struct Member {
    pub name: Atom,
    pub index: u32,
    pub kind: MemberKind,
    pub declared_type: TypeId,
    pub flags: MemberFlags,
}

impl Member {
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }

    pub fn is_readonly(&self) -> bool {
        self.flags.contains(MemberFlags::READONLY)
    }

    pub fn has_getter(&self) -> bool {
        self.flags.contains(MemberFlags::GETTER_PRESENT)
    }

    pub fn has_setter(&self) -> bool {
        self.flags.contains(MemberFlags::SETTER_PRESENT)
    }

    pub fn is_override(&self) -> bool {
        self.flags.contains(MemberFlags::OVERRIDE)
    }
}

#[cfg(test)]
#[path = "tests/member.rs"]
mod tests;
