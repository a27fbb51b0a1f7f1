//! Centralized limits and thresholds, kept in one place so tuning them does
//! not require touching every call site.

/// Maximum recursion depth while resolving generic instantiation chains
/// before the builder gives up and reports `GenericInstantiationFailed`.
pub const MAX_GENERIC_INSTANTIATION_DEPTH: usize = 64;

/// Maximum depth of nested scopes the statement builder will descend into
/// before aborting with a recursion-limit diagnostic (guards against
/// pathological or cyclic input from the external AST).
pub const MAX_SCOPE_DEPTH: usize = 512;

/// Primitive `typeId` values are allocated from `[1, PRIMITIVE_TYPE_ID_CEIL)`.
pub const PRIMITIVE_TYPE_ID_CEIL: u32 = 1000;

/// User-defined (class/interface/enum/...) `typeId` values start here.
pub const USER_TYPE_ID_FLOOR: u32 = 2000;
