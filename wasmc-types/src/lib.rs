//! The value-type taxonomy (C1): a closed set of value-type variants with
//! structural equality, generic specialization, and union widening.
//!
//! See `spec.md` §3.1 and §4.1. The hard problems are: identity vs.
//! structural equality for specialized generics, and resolving cycles (a
//! class field whose type is the enclosing class) without infinite
//! recursion during construction.

pub mod type_id;
pub use type_id::TypeId;

pub mod kind;
pub use kind::{
    ArrayTypeData, ClosureContextData, DescriptorId, EnumTypeData, FunctionTypeData,
    ObjectTypeData, SetTypeData, MapTypeData, TypeParameterData, TypeParameterOwner, UnionTypeData,
    ValueType, ValueTypeKind,
};

pub mod arena;
pub use arena::{AstTypeKey, TypeArena};

pub mod equality;
pub use equality::structural_equality;

pub mod widen;
pub use widen::wide_of;
