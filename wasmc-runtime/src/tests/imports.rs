use super::*;

#[test]
fn every_import_belongs_to_the_env_module() {
    assert!(IMPORTS.iter().all(|i| i.module == "env"));
}

#[test]
fn context_init_and_destroy_are_inverse_arities() {
    let init = IMPORTS.iter().find(|i| i.name == "dyntype_context_init").unwrap();
    let destroy = IMPORTS.iter().find(|i| i.name == "dyntype_context_destroy").unwrap();
    assert!(init.params.is_empty());
    assert_eq!(init.results, &[WasmPrimType::I32]);
    assert_eq!(destroy.params, &[WasmPrimType::I32]);
    assert!(destroy.results.is_empty());
}

#[test]
fn no_duplicate_import_names() {
    let mut names: Vec<&str> = IMPORTS.iter().map(|i| i.name).collect();
    names.sort_unstable();
    let mut deduped = names.clone();
    deduped.dedup();
    assert_eq!(names.len(), deduped.len());
}
