// Test suite for the registry handlers
// Tests create/modify/delete/list against a temporary home, plus logging boundaries

use runlet_core::logging_facility::test_capture::init_test_capture;
use runlet_core::ExErrorKind;
use runlet_core_types::schema::{FIELD_COMMAND, FIELD_ERR_CODE};
use runlet_core_types::Platform;
use runlet_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use runlet_engine::commands::registry::{
    command_create, command_delete, command_list, command_modify,
};
use runlet_engine::commands::setup::setup;
use runlet_store::index::load_all;
use runlet_store::Layout;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Home {
    _dir: TempDir,
    layout: Layout,
    scripts: PathBuf,
}

fn setup_home() -> Home {
    let dir = TempDir::new().unwrap();
    let layout = Layout::for_home(dir.path(), Platform::Unix);
    setup(&layout).unwrap();
    let scripts = dir.path().join("src");
    fs::create_dir(&scripts).unwrap();
    Home {
        _dir: dir,
        layout,
        scripts,
    }
}

impl Home {
    fn script(&self, file: &str) -> String {
        let path = self.scripts.join(file);
        fs::write(&path, "#!/bin/sh\necho hi\n").unwrap();
        path.display().to_string()
    }
}

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_create_appends_record_with_defaults() {
    let home = setup_home();
    let script = home.script("build.sh");

    let cmd = command_create(&home.layout, &args(&["build", &script])).unwrap();

    assert_eq!(cmd.min_args, 0);
    assert_eq!(cmd.max_args, None);
    assert_eq!(load_all(home.layout.index_file()).unwrap(), vec![cmd]);
}

#[test]
fn test_create_with_bounds() {
    let home = setup_home();
    let script = home.script("deploy.sh");

    let cmd = command_create(&home.layout, &args(&["deploy", &script, "1", "2"])).unwrap();

    assert_eq!((cmd.min_args, cmd.max_args), (1, Some(2)));
}

#[test]
fn test_create_rejects_missing_script() {
    let home = setup_home();
    let missing = home.scripts.join("nope.sh").display().to_string();

    let err = command_create(&home.layout, &args(&["x", &missing])).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert!(load_all(home.layout.index_file()).unwrap().is_empty());
}

#[test]
fn test_create_rejects_taken_and_reserved_names() {
    let home = setup_home();
    let script = home.script("a.sh");
    command_create(&home.layout, &args(&["a", &script])).unwrap();

    let taken = command_create(&home.layout, &args(&["a", &script])).unwrap_err();
    let reserved = command_create(&home.layout, &args(&["list", &script])).unwrap_err();

    assert_eq!(taken.kind(), ExErrorKind::AlreadyExists);
    assert_eq!(reserved.kind(), ExErrorKind::InvalidInput);
    assert_eq!(load_all(home.layout.index_file()).unwrap().len(), 1);
}

#[test]
fn test_create_rejects_bad_bounds() {
    let home = setup_home();
    let script = home.script("a.sh");

    let err = command_create(&home.layout, &args(&["a", &script, "3", "1"])).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Validation);
}

#[test]
fn test_create_falls_back_to_full_rewrite() {
    // Given: An index with too much trailing whitespace for the tail patch
    let home = setup_home();
    fs::write(home.layout.index_file(), format!("[]{}", " ".repeat(40))).unwrap();
    let script = home.script("a.sh");

    // When: A command is created
    command_create(&home.layout, &args(&["a", &script])).unwrap();

    // Then: The record is there anyway
    assert_eq!(load_all(home.layout.index_file()).unwrap().len(), 1);
}

#[test]
fn test_create_without_init_hints_at_init() {
    let dir = TempDir::new().unwrap();
    let layout = Layout::for_home(dir.path(), Platform::Unix);
    let script = dir.path().join("a.sh");
    fs::write(&script, "").unwrap();

    let err = command_create(&layout, &args(&["a", &script.display().to_string()])).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert!(err.message().contains("run init"));
}

#[test]
fn test_modify_keeps_underscore_fields() {
    let home = setup_home();
    let script = home.script("a.sh");
    command_create(&home.layout, &args(&["a", &script, "1", "3"])).unwrap();

    let updated = command_modify(&home.layout, "a", &args(&["b", "_", "_", "5"])).unwrap();

    assert_eq!(updated.name, "b");
    assert_eq!(updated.script_path, PathBuf::from(&script));
    assert_eq!((updated.min_args, updated.max_args), (1, Some(5)));
    assert_eq!(load_all(home.layout.index_file()).unwrap(), vec![updated]);
}

#[test]
fn test_modify_all_underscores_is_identity() {
    let home = setup_home();
    let script = home.script("a.sh");
    command_create(&home.layout, &args(&["a", &script])).unwrap();
    let before = load_all(home.layout.index_file()).unwrap();

    command_modify(&home.layout, "a", &args(&["_", "_", "_", "_"])).unwrap();

    assert_eq!(load_all(home.layout.index_file()).unwrap(), before);
}

#[test]
fn test_modify_unknown_is_not_found_and_untouched() {
    let home = setup_home();
    let script = home.script("a.sh");
    command_create(&home.layout, &args(&["a", &script])).unwrap();
    let before = fs::read(home.layout.index_file()).unwrap();

    let err = command_modify(&home.layout, "zzz", &args(&["y"])).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(fs::read(home.layout.index_file()).unwrap(), before);
}

#[test]
fn test_modify_to_existing_name_is_refused() {
    let home = setup_home();
    let script = home.script("a.sh");
    command_create(&home.layout, &args(&["a", &script])).unwrap();
    command_create(&home.layout, &args(&["b", &script])).unwrap();

    let err = command_modify(&home.layout, "a", &args(&["b"])).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
}

#[test]
fn test_modify_invalid_merge_leaves_index_unchanged() {
    let home = setup_home();
    let script = home.script("a.sh");
    command_create(&home.layout, &args(&["a", &script, "2", "4"])).unwrap();
    let before = fs::read(home.layout.index_file()).unwrap();

    let err = command_modify(&home.layout, "a", &args(&["_", "_", "_", "1"])).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Validation);
    assert_eq!(fs::read(home.layout.index_file()).unwrap(), before);
}

#[test]
fn test_delete_removes_exactly_named_records() {
    let home = setup_home();
    let script = home.script("a.sh");
    for name in ["a", "b", "c"] {
        command_create(&home.layout, &args(&[name, &script])).unwrap();
    }

    let outcome = command_delete(&home.layout, &args(&["a", "c", "ghost"])).unwrap();

    assert_eq!(outcome.removed, vec!["a", "c"]);
    assert_eq!(outcome.unmatched, vec!["ghost"]);
    let names: Vec<_> = load_all(home.layout.index_file())
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["b"]);
}

#[test]
fn test_delete_unknown_only_leaves_file_byte_identical() {
    let home = setup_home();
    let script = home.script("a.sh");
    command_create(&home.layout, &args(&["a", &script])).unwrap();
    let before = fs::read(home.layout.index_file()).unwrap();

    let outcome = command_delete(&home.layout, &args(&["ghost"])).unwrap();

    assert!(!outcome.report.committed);
    assert_eq!(outcome.unmatched, vec!["ghost"]);
    assert_eq!(fs::read(home.layout.index_file()).unwrap(), before);
}

#[test]
fn test_delete_needs_a_name() {
    let home = setup_home();
    let err = command_delete(&home.layout, &[]).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}

#[test]
fn test_list_shows_builtins_and_records_in_order() {
    let home = setup_home();
    let script = home.script("a.sh");
    command_create(&home.layout, &args(&["zeta", &script])).unwrap();
    command_create(&home.layout, &args(&["alpha", &script])).unwrap();

    let listing = command_list(&home.layout).unwrap();

    assert!(listing.builtins.contains(&"tidy"));
    let names: Vec<_> = listing.commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha"]);
}

#[test]
fn test_apply_engine_command_dispatches() {
    let home = setup_home();
    let script = home.script("a.sh");

    let result = apply_engine_command(
        EngineCommand::Create {
            args: args(&["a", &script]),
        },
        &home.layout,
    )
    .unwrap();
    assert!(matches!(result, EngineCommandResult::Create(ref c) if c.name == "a"));

    let result = apply_engine_command(EngineCommand::List, &home.layout).unwrap();
    match result {
        EngineCommandResult::List(listing) => assert_eq!(listing.commands.len(), 1),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_create_logs_start_and_end() {
    let capture = init_test_capture();
    let home = setup_home();
    let script = home.script("logged.sh");

    command_create(&home.layout, &args(&["logged_create", &script])).unwrap();

    let mine: Vec<_> = capture
        .events_for("command_create")
        .into_iter()
        .filter(|e| e.field(FIELD_COMMAND) == Some("logged_create"))
        .collect();
    assert!(mine.iter().any(|e| e.event() == Some("end")));
}

#[test]
fn test_modify_failure_logs_end_error() {
    let capture = init_test_capture();
    let home = setup_home();

    let _ = command_modify(&home.layout, "logged_missing", &args(&["x"]));

    let mine: Vec<_> = capture
        .events_for("command_modify")
        .into_iter()
        .filter(|e| e.field(FIELD_COMMAND) == Some("logged_missing"))
        .collect();
    assert!(mine.iter().any(|e| e.event() == Some("start")));
    let err = mine
        .iter()
        .find(|e| e.event() == Some("end_error"))
        .expect("end_error event");
    assert_eq!(err.field(FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
    assert!(!mine.iter().any(|e| e.event() == Some("end")));
}
