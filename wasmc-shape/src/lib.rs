//! Object descriptors and shapes (C2): member layout and the dispatch-kind
//! projection a descriptor presents from inside vs. outside its class.
//!
//! See `spec.md` §3.2 and §4.2. `wasmc-build` asks a [`Shape`] for the
//! dispatch strategy of a member access; it never inspects an
//! [`ObjectDescriptor`] directly once shapes are finalized.

pub mod member;
pub use member::{Member, MemberFlags, MemberKind};

pub mod descriptor;
pub use descriptor::{DescriptorArena, ObjectDescriptor};

pub mod shape;
pub use shape::{FunctionRef, Shape, ShapeAccessor, ShapeKind, ShapeMember, ShapeRef};
