//! The closed set of value-type variants (spec §3.1) and the data each one
//! carries.

use crate::type_id::TypeId;
use wasmc_common::interner::Atom;

/// Opaque handle into the object-descriptor table owned by `wasmc-shape`.
///
/// `wasmc-types` never inspects a descriptor's contents — only `wasmc-shape`
/// (which depends on `wasmc-types` for `TypeId`) and `wasmc-build` know how
/// to look one up. This indirection breaks what would otherwise be a
/// dependency cycle between the type model and the shape model, mirroring
/// how the spec describes object types as merely "carrying" a descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DescriptorId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeParameterOwner {
    Function(u32),
    Class(u32),
    Closure(u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParameterData {
    /// Index within the owning function/class's parameter list.
    pub index: u32,
    pub owner: TypeParameterOwner,
    pub wide_type: TypeId,
    pub default_type: Option<TypeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumTypeData {
    pub name: Atom,
    pub members: Vec<(Atom, TypeId)>,
    pub is_const: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionTypeData {
    pub members: Vec<TypeId>,
    /// The smallest single type that subsumes every member; always a valid
    /// widening target (spec §3.1). Computed once at union-construction
    /// time by [`crate::widen::wide_of`].
    pub wide_type: TypeId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionTypeData {
    pub params: Vec<TypeId>,
    pub return_type: TypeId,
    pub type_parameters: Vec<TypeId>,
    /// `true` for function *values* that capture their enclosing scope
    /// (closures); `false` for unbound top-level functions. Drives whether
    /// the wasm generator wraps the signature in a closure struct (§4.6).
    pub is_closure: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayTypeData {
    pub element: TypeId,
    pub descriptor: DescriptorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetTypeData {
    pub element: TypeId,
    pub descriptor: DescriptorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapTypeData {
    pub key: TypeId,
    pub value: TypeId,
    pub descriptor: DescriptorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectTypeData {
    pub name: Atom,
    pub descriptor: DescriptorId,
    pub type_parameters: Vec<TypeId>,
    /// `true` when this object type is an interface (no `thisShape`);
    /// drives dispatch-kind selection in `wasmc-build` (spec §9: "Interfaces
    /// are modeled exactly as 'no-thisShape' descriptors").
    pub is_interface: bool,
    pub super_class: Option<TypeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClosureContextData {
    pub parent: Option<TypeId>,
    pub free_vars: Vec<TypeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueTypeKind {
    Void,
    Undefined,
    Null,
    Never,
    Int,
    Number,
    Boolean,
    RawString,
    String,
    Any,
    Generic,
    Namespace,
    Empty,
    ClosureContext(ClosureContextData),
    TypeParameter(TypeParameterData),
    Enum(EnumTypeData),
    Union(UnionTypeData),
    Function(FunctionTypeData),
    Array(ArrayTypeData),
    Set(SetTypeData),
    Map(MapTypeData),
    Object(ObjectTypeData),
}

impl ValueTypeKind {
    /// Discriminant used for the "same variant" half of structural equality
    /// (spec §3.1 invariant 1) without pulling in the constituent data.
    pub fn discriminant(&self) -> u8 {
        match self {
            ValueTypeKind::Void => 0,
            ValueTypeKind::Undefined => 1,
            ValueTypeKind::Null => 2,
            ValueTypeKind::Never => 3,
            ValueTypeKind::Int => 4,
            ValueTypeKind::Number => 5,
            ValueTypeKind::Boolean => 6,
            ValueTypeKind::RawString => 7,
            ValueTypeKind::String => 8,
            ValueTypeKind::Any => 9,
            ValueTypeKind::Generic => 10,
            ValueTypeKind::Namespace => 11,
            ValueTypeKind::Empty => 12,
            ValueTypeKind::ClosureContext(_) => 13,
            ValueTypeKind::TypeParameter(_) => 14,
            ValueTypeKind::Enum(_) => 15,
            ValueTypeKind::Union(_) => 16,
            ValueTypeKind::Function(_) => 17,
            ValueTypeKind::Array(_) => 18,
            ValueTypeKind::Set(_) => 19,
            ValueTypeKind::Map(_) => 20,
            ValueTypeKind::Object(_) => 21,
        }
    }

    pub fn is_object_shaped(&self) -> bool {
        matches!(
            self,
            ValueTypeKind::Object(_) | ValueTypeKind::Array(_) | ValueTypeKind::Set(_) | ValueTypeKind::Map(_)
        )
    }

    pub fn descriptor(&self) -> Option<DescriptorId> {
        match self {
            ValueTypeKind::Object(d) => Some(d.descriptor),
            ValueTypeKind::Array(d) => Some(d.descriptor),
            ValueTypeKind::Set(d) => Some(d.descriptor),
            ValueTypeKind::Map(d) => Some(d.descriptor),
            _ => None,
        }
    }
}

/// A fully-formed value type: a stable `id`, its variant data, and the
/// specialization bookkeeping every type carries (spec §3.1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueType {
    pub id: TypeId,
    pub kind: ValueTypeKind,
    /// The type this one was specialized from; equals `id` when this type
    /// is not a specialization of anything.
    pub generic_owner: TypeId,
    /// Type arguments used to produce this specialization, in type-parameter
    /// order. `None` for unspecialized types. The WebAssembly type generator
    /// treats the presence of this field on an `Array` as a cache-bypass
    /// signal (spec §4.6, §9 open question 2).
    pub special_type_arguments: Option<Vec<TypeId>>,
}

impl ValueType {
    pub fn is_specialized(&self) -> bool {
        self.generic_owner != self.id
    }
}

#[cfg(test)]
#[path = "tests/kind.rs"]
mod tests;
