//! `TypeId` — a small, `Copy` handle into a `TypeArena`.
//!
//! Primitive types have fixed predefined ids in `[1, 1000)` (spec §3.1);
//! user types (classes, interfaces, specialized generics, unions, ...) are
//! allocated starting at `2000` by the arena as they are interned.

use wasmc_common::limits::{PRIMITIVE_TYPE_ID_CEIL, USER_TYPE_ID_FLOOR};

/// Numeric identity of a `ValueType`. Two ids being equal does *not* imply
/// structural equality fails to hold for other ids (specializations of the
/// same generic share structure but are distinct ids); see
/// [`crate::structural_equality`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const VOID: TypeId = TypeId(1);
    pub const UNDEFINED: TypeId = TypeId(2);
    pub const NULL: TypeId = TypeId(3);
    pub const NEVER: TypeId = TypeId(4);
    pub const INT: TypeId = TypeId(5);
    pub const NUMBER: TypeId = TypeId(6);
    pub const BOOLEAN: TypeId = TypeId(7);
    pub const RAW_STRING: TypeId = TypeId(8);
    pub const STRING: TypeId = TypeId(9);
    pub const ANY: TypeId = TypeId(10);
    pub const NAMESPACE: TypeId = TypeId(11);
    pub const EMPTY: TypeId = TypeId(12);
    /// Sentinel used by recovery paths in the builder; not one of the
    /// spec's value-type variants, but needed so a failed computation can
    /// flow through the same `TypeId`-typed plumbing as a real type.
    pub const ERROR: TypeId = TypeId(13);

    pub const fn is_primitive(self) -> bool {
        self.0 > 0 && self.0 < PRIMITIVE_TYPE_ID_CEIL
    }

    pub const fn is_user_type(self) -> bool {
        self.0 >= USER_TYPE_ID_FLOOR
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}
