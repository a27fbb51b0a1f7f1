//! The cast/coercion algebra (spec §4.4): a total function over
//! `(target_kind, value_kind)` producing either an identity (no new IR
//! node), a tagged `Cast` value, or a fatal diagnostic.

use wasmc_common::diagnostics::{codes, Diagnostic};
use wasmc_ir::{CastVariant, ValueId, ValueKind};
use wasmc_types::{structural_equality, TypeId, ValueTypeKind};

use crate::context::BuildContext;

fn is_object_shaped(ctx: &BuildContext, ty: TypeId) -> bool {
    ctx.types.get(ty).map(|t| t.kind.is_object_shaped()).unwrap_or(false)
}

fn is_interface(ctx: &BuildContext, ty: TypeId) -> bool {
    match ctx.types.get(ty).map(|t| &t.kind) {
        Some(ValueTypeKind::Object(o)) => o.is_interface,
        _ => false,
    }
}

fn is_primitive_value_kind(ty: TypeId) -> bool {
    matches!(
        ty,
        TypeId::INT
            | TypeId::NUMBER
            | TypeId::BOOLEAN
            | TypeId::STRING
            | TypeId::RAW_STRING
            | TypeId::NULL
            | TypeId::UNDEFINED
    )
}

fn is_numeric_ish(ty: TypeId) -> bool {
    matches!(ty, TypeId::INT | TypeId::NUMBER)
}

fn is_stringish(ty: TypeId) -> bool {
    matches!(ty, TypeId::STRING | TypeId::RAW_STRING)
}

fn array_element(ctx: &BuildContext, ty: TypeId) -> Option<TypeId> {
    match ctx.types.get(ty).map(|t| &t.kind) {
        Some(ValueTypeKind::Array(a)) => Some(a.element),
        _ => None,
    }
}

fn emit(ctx: &mut BuildContext, value: ValueId, target: TypeId, variant: CastVariant) -> ValueId {
    let span = ctx.values.get(value).span;
    ctx.values.push(span, target, None, ValueKind::Cast { value, variant })
}

/// `castTo(target, value)`. Returns the possibly-wrapped value; on a
/// failing combination, pushes a fatal `TypeMismatch` diagnostic and
/// returns `value` unchanged so the caller can keep building without a
/// valid IR node to substitute.
pub fn cast_to(ctx: &mut BuildContext, file: &str, target: TypeId, value: ValueId) -> ValueId {
    let source = ctx.values.get(value).ty;

    if structural_equality(&ctx.types, target, source) {
        return value;
    }

    if let Some(ValueTypeKind::Union(_)) = ctx.types.get(source).map(|t| &t.kind) {
        let variant = if target == TypeId::ANY {
            CastVariant::UnionCastToAny
        } else if is_object_shaped(ctx, target) {
            CastVariant::UnionCastToObject
        } else {
            CastVariant::UnionCastToValue
        };
        return emit(ctx, value, target, variant);
    }

    if target == TypeId::ANY {
        let variant = if is_object_shaped(ctx, source) { CastVariant::ObjectCastAny } else { CastVariant::ValueCastAny };
        return emit(ctx, value, target, variant);
    }

    if source == TypeId::ANY {
        let variant = if is_object_shaped(ctx, target) {
            if is_interface(ctx, target) {
                CastVariant::AnyCastInterface
            } else {
                CastVariant::AnyCastObject
            }
        } else {
            CastVariant::AnyCastValue
        };
        return emit(ctx, value, target, variant);
    }

    if is_object_shaped(ctx, source) && is_object_shaped(ctx, target) {
        if target == TypeId::STRING || target == TypeId::RAW_STRING {
            return emit(ctx, value, target, CastVariant::ObjectToString);
        }
        // Compatibility (same descriptor or compatible subtyping) is
        // assumed here; the descriptor/shape layer is the authority on
        // whether a given (source, target) object pair is actually
        // assignable, so by the time `cast_to` runs the pair has already
        // been checked upstream.
        return emit(ctx, value, target, CastVariant::ObjectCastObject { new_shape: None });
    }

    if (source == TypeId::NULL || source == TypeId::UNDEFINED) && is_object_shaped(ctx, target) {
        return value;
    }
    if (source == TypeId::NULL || source == TypeId::UNDEFINED) && matches!(ctx.types.get(target).map(|t| &t.kind), Some(ValueTypeKind::Function(_))) {
        return value;
    }

    if let (Some(source_elem), Some(target_elem)) = (array_element(ctx, source), array_element(ctx, target)) {
        let compatible = structural_equality(&ctx.types, source_elem, target_elem)
            || (source_elem == TypeId::ANY && target_elem == TypeId::ANY)
            || (is_object_shaped(ctx, source_elem) && is_object_shaped(ctx, target_elem))
            || (is_stringish(source_elem) && is_stringish(target_elem))
            || (is_numeric_ish(source_elem) && is_numeric_ish(target_elem));
        if compatible {
            return value;
        }
        ctx.push_diagnostic(Diagnostic::error(file, 0, 0, codes::TYPE_MISMATCH, "incompatible array element types"));
        return value;
    }

    if is_primitive_value_kind(source) && is_primitive_value_kind(target) {
        let variant = if target == TypeId::STRING || target == TypeId::RAW_STRING {
            CastVariant::ValueToString
        } else {
            CastVariant::ValueCastValue
        };
        return emit(ctx, value, target, variant);
    }

    ctx.push_diagnostic(Diagnostic::error(file, 0, 0, codes::TYPE_MISMATCH, "no cast exists between these types"));
    value
}

#[cfg(test)]
#[path = "tests/cast.rs"]
mod tests;
