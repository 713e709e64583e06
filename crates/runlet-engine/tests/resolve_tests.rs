// Test suite for invocation resolution
// Tests index lookup with arity checks and the loose-script fallback

use runlet_core::ExErrorKind;
use runlet_core_types::Platform;
use runlet_engine::commands::registry::command_create;
use runlet_engine::commands::resolve::{resolve_invocation, ResolvedBy};
use runlet_engine::commands::setup::setup;
use runlet_store::Layout;
use std::fs;
use tempfile::TempDir;

fn setup_home() -> (TempDir, Layout) {
    let dir = TempDir::new().unwrap();
    let layout = Layout::for_home(dir.path(), Platform::Unix);
    setup(&layout).unwrap();
    (dir, layout)
}

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_registered_command_resolves_with_args() {
    let (home, layout) = setup_home();
    let script = home.path().join("greet.sh");
    fs::write(&script, "#!/bin/sh\n").unwrap();
    command_create(
        &layout,
        &args(&["greet", &script.display().to_string(), "1", "2"]),
    )
    .unwrap();

    let inv = resolve_invocation(&layout, &args(&["greet", "world", "--loud"])).unwrap();

    assert_eq!(inv.program, script);
    assert_eq!(inv.args, vec!["world", "--loud"]);
    assert_eq!(inv.resolved_by, ResolvedBy::Index);
}

#[test]
fn test_arity_errors_read_naturally() {
    let (home, layout) = setup_home();
    let script = home.path().join("pair.sh");
    fs::write(&script, "").unwrap();
    command_create(
        &layout,
        &args(&["pair", &script.display().to_string(), "1", "2"]),
    )
    .unwrap();

    let too_few = resolve_invocation(&layout, &args(&["pair"])).unwrap_err();
    let too_many = resolve_invocation(&layout, &args(&["pair", "a", "b", "c"])).unwrap_err();

    assert_eq!(too_few.kind(), ExErrorKind::InvalidInput);
    assert_eq!(too_few.message(), "\"pair\" expects at least 1 argument.");
    assert_eq!(too_many.message(), "\"pair\" expects at most 2 arguments.");
}

#[test]
fn test_falls_back_to_script_stem() {
    let (_home, layout) = setup_home();
    let loose = layout.script_dir().join("backup.sh");
    fs::write(&loose, "#!/bin/sh\n").unwrap();

    let inv = resolve_invocation(&layout, &args(&["backup", "now"])).unwrap();

    assert_eq!(inv.program, loose);
    assert_eq!(inv.args, vec!["now"]);
    assert_eq!(inv.resolved_by, ResolvedBy::ScriptDir);
}

#[test]
fn test_index_file_is_never_a_fallback_match() {
    let (_home, layout) = setup_home();

    let err = resolve_invocation(&layout, &args(&["cmd_mappings"])).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_unknown_command_hints_at_script_dir_and_folders() {
    let (_home, layout) = setup_home();
    fs::create_dir(layout.script_dir().join("nested")).unwrap();

    let err = resolve_invocation(&layout, &args(&["nothing"])).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert!(err.message().contains("Have you forgotten to add your new script"));
    assert!(err.message().contains("should not have folders"));
}

#[test]
fn test_corrupt_index_is_not_masked_by_fallback() {
    let (_home, layout) = setup_home();
    fs::write(layout.index_file(), "not json").unwrap();
    fs::write(layout.script_dir().join("x.sh"), "").unwrap();

    let err = resolve_invocation(&layout, &args(&["x"])).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Format);
}
