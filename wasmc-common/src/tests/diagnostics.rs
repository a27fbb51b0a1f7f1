use super::*;

#[test]
fn error_is_fatal_warning_is_not() {
    let err = Diagnostic::error("a.ts", 0, 1, codes::TYPE_MISMATCH, "bad");
    let warn = Diagnostic::warning("a.ts", 0, 1, codes::SHAPE_FALLBACK, "fallback");
    assert!(err.is_fatal());
    assert!(!warn.is_fatal());
}

#[test]
fn display_includes_code_and_message() {
    let err = Diagnostic::error("a.ts", 5, 3, codes::UNRESOLVED_IDENTIFIER, "cannot find name 'x'");
    let rendered = err.to_string();
    assert!(rendered.contains("TS1002"));
    assert!(rendered.contains("cannot find name 'x'"));
}
