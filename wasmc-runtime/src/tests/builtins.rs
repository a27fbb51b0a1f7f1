use super::*;

#[test]
fn every_builtin_id_is_registered_exactly_once() {
    let ids = [
        BuiltinId::MathSqrt,
        BuiltinId::MathAbs,
        BuiltinId::MathCeil,
        BuiltinId::MathFloor,
        BuiltinId::MathTrunc,
        BuiltinId::ArrayIsArray,
        BuiltinId::StringConcat,
        BuiltinId::StringSlice,
        BuiltinId::StringEq,
        BuiltinId::StringIndexOf,
        BuiltinId::StringIndexOfInternal,
        BuiltinId::StringReplace,
        BuiltinId::StringSplit,
        BuiltinId::StringMatch,
        BuiltinId::StringSearch,
    ];
    for id in ids {
        let matches = BUILTINS.iter().filter(|b| b.id == id).count();
        assert_eq!(matches, 1, "{id:?} should appear exactly once");
    }
}

#[test]
fn string_methods_other_than_index_of_internal_delegate_to_it() {
    // Not a structural property of the table itself, just documents the
    // spec's "all other string methods invoke it" contract (spec §6.3) so
    // the internal primitive's signature can't drift unnoticed: it alone
    // takes the extra start-index parameter.
    let internal = find(BuiltinId::StringIndexOfInternal);
    assert_eq!(internal.params.len(), 3);
    let index_of = find(BuiltinId::StringIndexOf);
    assert_eq!(index_of.params.len(), 2);
}

#[test]
fn math_builtins_are_all_f64_to_f64() {
    for id in [BuiltinId::MathSqrt, BuiltinId::MathAbs, BuiltinId::MathCeil, BuiltinId::MathFloor, BuiltinId::MathTrunc] {
        let b = find(id);
        assert_eq!(b.params, &[WasmPrimType::F64]);
        assert_eq!(b.results, &[WasmPrimType::F64]);
    }
}
