//! IR values: the expression-position half of the semantic IR (spec §3.3).
//!
//! Every [`Value`] carries its result type and, when known, the shape its
//! receiver was resolved against — the information C6/C7 need without
//! re-walking the AST.

use wasmc_common::span::Span;
use wasmc_shape::{FunctionRef, ShapeRef};
use wasmc_types::{DescriptorId, TypeId};

use crate::ast::{AstId, BinaryOp, UnaryOp};
use crate::node::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueId(pub u32);

/// Which side of an assignment a sub-expression is being built for (spec
/// §3.4). Threaded through the build context as a stack, not stored on
/// `Value` itself — it governs which variant the *builder* emits, not a
/// property of the emitted value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceKind {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(f64),
    Int(i32),
    Boolean(bool),
    Str(wasmc_common::interner::Atom),
    Null,
    Undefined,
}

/// A variable reference: by index into the enclosing scope, plus a
/// pointer back to its declaring node — never by direct ownership (spec
/// §3.3 "Ownership").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalRef {
    pub slot: u32,
    pub declaration: NodeId,
}

/// `castTo`'s total set of outcomes (spec §4.4), tagged by the cast
/// algebra branch that produced them rather than left as untyped
/// `ValueKind::Cast { value, target }` — downstream code generation
/// dispatches on exactly this tag.
#[derive(Clone, Debug, PartialEq)]
pub enum CastVariant {
    UnionCastToAny,
    UnionCastToValue,
    UnionCastToObject,
    ObjectCastAny,
    ValueCastAny,
    AnyCastValue,
    AnyCastObject,
    AnyCastInterface,
    ObjectCastObject { new_shape: Option<ShapeRef> },
    ValueCastValue,
    ValueToString,
    ObjectToString,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
    Literal(Literal),
    Var(LocalRef),
    VarSet { local: LocalRef, value: ValueId },
    This,
    Super,

    BinaryExpr { op: BinaryOp, left: ValueId, right: ValueId },
    PreUnary { op: UnaryOp, operand: ValueId },
    PostUnary { op: UnaryOp, operand: ValueId },
    Condition { test: ValueId, consequent: ValueId, alternate: ValueId },

    FunctionCall { callee: FunctionRef, args: Vec<ValueId> },
    ClosureCall { callee: ValueId, args: Vec<ValueId> },
    ConstructorCall { constructor: FunctionRef, args: Vec<ValueId> },

    Cast { value: ValueId, variant: CastVariant },
    InstanceOf { value: ValueId, target: TypeId },

    ElementGet { array: ValueId, index: ValueId },
    ElementSet { array: ValueId, index: ValueId, value: ValueId },

    DynamicGet { receiver: ValueId, name: wasmc_common::interner::Atom },
    DynamicSet { receiver: ValueId, name: wasmc_common::interner::Atom, value: ValueId },
    DynamicCall { receiver: ValueId, name: wasmc_common::interner::Atom, args: Vec<ValueId> },

    ShapeGet { receiver: ValueId, member_index: u32 },
    ShapeSet { receiver: ValueId, member_index: u32, value: ValueId },
    ShapeCall { receiver: ValueId, member_index: u32, args: Vec<ValueId> },

    OffsetGet { receiver: ValueId, slot: u32 },
    OffsetSet { receiver: ValueId, slot: u32, value: ValueId },
    OffsetGetter { receiver: ValueId, slot: u32 },
    OffsetSetter { receiver: ValueId, slot: u32, value: ValueId },
    OffsetCall { receiver: ValueId, slot: u32, args: Vec<ValueId> },

    VTableGet { receiver: ValueId, slot: u32 },
    VTableSet { receiver: ValueId, slot: u32, value: ValueId },
    VTableCall { receiver: ValueId, slot: u32, args: Vec<ValueId> },

    DirectGetter { function: FunctionRef },
    DirectSetter { function: FunctionRef, value: ValueId },
    DirectCall { function: FunctionRef, args: Vec<ValueId> },

    NewLiteralObject { descriptor: DescriptorId, fields: Vec<(u32, ValueId)> },
    NewLiteralArray { elements: Vec<ValueId> },
    /// `new C(...)`; `constructor` is absent for interfaces / default ctors.
    NewConstructor { descriptor: DescriptorId, constructor: Option<FunctionRef>, args: Vec<ValueId> },
    NewArray { length: ValueId },
    /// An array literal (or any statically-sized array creation) of known
    /// length, including the `[]` boundary case (spec §8 boundary 8:
    /// length `0`).
    NewArrayLen { length: u32 },
    /// Reinterprets an existing object value under a class's instance
    /// layout (the convergence of `buildNewClass`/`buildNewInterface`,
    /// spec §9 open question 3).
    NewFromClassObject { source: ValueId, descriptor: DescriptorId },
    NewClosureFunction { function: FunctionRef, captures: Vec<ValueId> },

    Typeof { value: ValueId },
    ToString { value: ValueId },
    /// Invoking a callee whose static type is `any` through the host
    /// dynamic dispatcher (distinct from `DynamicCall`, which dispatches a
    /// *member* access; `AnyCall` dispatches a bare call expression).
    AnyCall { callee: ValueId, args: Vec<ValueId> },

    Nop,
    /// An AST shape recognized but not yet lowered (spec §4.8); downstream
    /// emit replaces this with `unreachable` and logs a warning.
    Unimplement { source: AstId },
}

#[derive(Clone, Debug)]
pub struct Value {
    pub id: ValueId,
    pub span: Span,
    pub ty: TypeId,
    pub shape: Option<ShapeRef>,
    pub kind: ValueKind,
}

/// Arena-of-indices storage for [`Value`]s; values form a DAG rooted at
/// statements and are never individually owned (spec §3.3).
#[derive(Default)]
pub struct ValueArena {
    values: Vec<Value>,
}

impl ValueArena {
    pub fn new() -> Self {
        ValueArena { values: Vec::new() }
    }

    pub fn push(&mut self, span: Span, ty: TypeId, shape: Option<ShapeRef>, kind: ValueKind) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(Value { id, span, ty, shape, kind });
        id
    }

    pub fn get(&self, id: ValueId) -> &Value {
        &self.values[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueKind {
    /// Used by test #3 (spec §8): every value built under `ReferenceKind::Left`
    /// must be one of the `*Set` variants.
    pub fn is_set_variant(&self) -> bool {
        matches!(
            self,
            ValueKind::ElementSet { .. }
                | ValueKind::VarSet { .. }
                | ValueKind::DynamicSet { .. }
                | ValueKind::ShapeSet { .. }
                | ValueKind::OffsetSet { .. }
                | ValueKind::OffsetSetter { .. }
                | ValueKind::VTableSet { .. }
                | ValueKind::DirectSetter { .. }
        )
    }
}

#[cfg(test)]
#[path = "tests/value.rs"]
mod tests;
