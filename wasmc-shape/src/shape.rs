//! Shapes: the dispatch-kind projection of an [`crate::ObjectDescriptor`]
//! (spec §3.2, §4.2).

/// An opaque reference to a known top-level (or method) function, minted by
/// whichever layer knows concrete function identities (`wasmc-ir`'s
/// function declarations). `wasmc-shape` only stores and compares these; it
/// never resolves them to code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionRef(pub u32);

/// Which concrete implementation an accessor side resolves to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeAccessor {
    /// A stored function pointer in the vtable at this slot.
    Offset(u32),
    /// A known top-level function — no indirection needed.
    Direct(FunctionRef),
}

/// The shape-level projection of one descriptor member. Field access is
/// always concrete (field layout is always statically known); methods and
/// accessors may be "empty", meaning the shape carries no usable dispatch
/// target and the caller must fall back to vtable or interface-shape
/// dispatch (spec §4.3 step 6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeMember {
    Field { offset: u32 },
    Method { offset: Option<u32>, function: Option<FunctionRef> },
    Accessor { getter: Option<ShapeAccessor>, setter: Option<ShapeAccessor> },
}

impl ShapeMember {
    /// "No statically-known concrete implementation here" (spec §3.2).
    pub fn is_empty(&self) -> bool {
        match self {
            ShapeMember::Field { .. } => false,
            ShapeMember::Method { offset, function } => offset.is_none() && function.is_none(),
            ShapeMember::Accessor { getter, setter } => getter.is_none() && setter.is_none(),
        }
    }
}

/// One of a descriptor's two canonical projections: `originShape` (as seen
/// from outside the class) or `thisShape` (as seen from inside it).
/// Indices line up 1:1 with the owning [`crate::ObjectDescriptor`]'s
/// `members`.
#[derive(Debug, Clone)]
pub struct Shape {
    pub members: Vec<ShapeMember>,
}

impl Shape {
    pub fn member_at(&self, index: u32) -> Option<&ShapeMember> {
        self.members.get(index as usize)
    }
}

/// Which of a descriptor's two shapes a [`ShapeRef`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Origin,
    This,
}

/// A lightweight handle to "the shape a value currently carries", cheap
/// enough to store on every IR value (spec §3.3: "every value carries its
/// result type and optional shape"). Resolved back to a [`Shape`] via a
/// [`crate::DescriptorArena`] lookup when the builder needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRef {
    pub descriptor: wasmc_types::DescriptorId,
    pub kind: ShapeKind,
}

#[cfg(test)]
#[path = "tests/shape.rs"]
mod tests;
