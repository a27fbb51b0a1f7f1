//! `TypeArena` — the interning table that gives every [`ValueType`] a
//! stable [`TypeId`] and makes `findOrCreate` idempotent (spec §4.1).

use rustc_hash::FxHashMap;

use crate::kind::{ValueType, ValueTypeKind};
use crate::type_id::TypeId;

/// Identifies a candidate type by where it came from in the source AST (or,
/// for compound types with no single originating node, by its structural
/// shape) so that asking for "the same type" twice returns the same
/// [`TypeId`] instead of allocating a duplicate.
///
/// `ast_id` is an opaque `u64` supplied by the caller (`wasmc-ir`'s
/// `AstId`, a type-parameter owner id, ...); this crate does not interpret
/// it, only uses it as a hash key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AstTypeKey {
    Primitive(TypeId),
    /// A named declaration (class, interface, enum, function, closure
    /// context) together with the type arguments it was instantiated with.
    Named { ast_id: u64, type_args: Vec<TypeId> },
    Union(Vec<TypeId>),
    Array(TypeId),
    Set(TypeId),
    Map(TypeId, TypeId),
}

fn next_after(id: TypeId) -> TypeId {
    TypeId(id.0 + 1)
}

/// Owns every [`ValueType`] produced during a compilation and the
/// [`AstTypeKey`] → [`TypeId`] map that makes interning idempotent.
pub struct TypeArena {
    types: FxHashMap<TypeId, ValueType>,
    keys: FxHashMap<AstTypeKey, TypeId>,
    next_id: TypeId,
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    pub fn new() -> Self {
        let mut arena = TypeArena {
            types: FxHashMap::default(),
            keys: FxHashMap::default(),
            next_id: TypeId(wasmc_common::limits::USER_TYPE_ID_FLOOR),
        };
        for (id, kind) in [
            (TypeId::VOID, ValueTypeKind::Void),
            (TypeId::UNDEFINED, ValueTypeKind::Undefined),
            (TypeId::NULL, ValueTypeKind::Null),
            (TypeId::NEVER, ValueTypeKind::Never),
            (TypeId::INT, ValueTypeKind::Int),
            (TypeId::NUMBER, ValueTypeKind::Number),
            (TypeId::BOOLEAN, ValueTypeKind::Boolean),
            (TypeId::RAW_STRING, ValueTypeKind::RawString),
            (TypeId::STRING, ValueTypeKind::String),
            (TypeId::ANY, ValueTypeKind::Any),
            (TypeId::NAMESPACE, ValueTypeKind::Namespace),
            (TypeId::EMPTY, ValueTypeKind::Empty),
        ] {
            arena.types.insert(
                id,
                ValueType {
                    id,
                    kind,
                    generic_owner: id,
                    special_type_arguments: None,
                },
            );
            arena.keys.insert(AstTypeKey::Primitive(id), id);
        }
        arena
    }

    fn alloc_id(&mut self) -> TypeId {
        let id = self.next_id;
        self.next_id = next_after(id);
        id
    }

    pub fn get(&self, id: TypeId) -> Option<&ValueType> {
        self.types.get(&id)
    }

    /// Returns the existing type for `key` if one was already interned,
    /// otherwise allocates a fresh id, inserts a provisional stub under
    /// `key` *before* calling `build`, and only then fills in the real
    /// kind. The stub-before-recurse ordering is what lets `build` recurse
    /// back into `find_or_create` with the same `key` (a class field typed
    /// as the enclosing class) and get back `id` instead of looping
    /// forever (spec §4.1, §9).
    pub fn find_or_create(
        &mut self,
        key: AstTypeKey,
        build: impl FnOnce(&mut TypeArena, TypeId) -> ValueTypeKind,
    ) -> TypeId {
        if let Some(&id) = self.keys.get(&key) {
            return id;
        }
        let id = self.alloc_id();
        self.keys.insert(key, id);
        self.types.insert(
            id,
            ValueType {
                id,
                kind: ValueTypeKind::Never,
                generic_owner: id,
                special_type_arguments: None,
            },
        );
        let kind = build(self, id);
        self.types.get_mut(&id).expect("stub inserted above").kind = kind;
        id
    }

    /// Allocates a new, distinct `TypeId` that specializes `generic`,
    /// recording `args` as its `special_type_arguments`. Unlike
    /// `find_or_create`, specializations are never deduplicated by the
    /// arena itself — the caller (which already knows the generic's
    /// identity and the argument list) is expected to memoize if needed.
    pub fn specialize(
        &mut self,
        generic: TypeId,
        args: Vec<TypeId>,
        build: impl FnOnce(&mut TypeArena, TypeId, &[TypeId]) -> ValueTypeKind,
    ) -> TypeId {
        let id = self.alloc_id();
        self.types.insert(
            id,
            ValueType {
                id,
                kind: ValueTypeKind::Never,
                generic_owner: generic,
                special_type_arguments: Some(args.clone()),
            },
        );
        let kind = build(self, id, &args);
        self.types.get_mut(&id).expect("stub inserted above").kind = kind;
        id
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/arena.rs"]
mod tests;
