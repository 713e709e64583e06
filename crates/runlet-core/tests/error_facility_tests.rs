use runlet_core::errors::{ExError, ExErrorKind, RunletError};

#[test]
fn test_not_found_verifiable_by_kind() {
    let err = RunletError::CommandNotFound {
        name: "unknown".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.code(), "ERR_NOT_FOUND");
    assert_eq!(ex_err.command(), Some("unknown"));
    assert!(ex_err.is_not_found());
}

#[test]
fn test_name_taken_is_already_exists() {
    let ex_err: ExError = RunletError::NameTaken {
        name: "build".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::AlreadyExists);
    assert_ne!(ex_err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_bound_errors_are_validation() {
    let invalid: ExError = RunletError::InvalidBound {
        field: "maxArgs".to_string(),
        value: "x".to_string(),
        reason: "invalid digit found in string".to_string(),
    }
    .into();
    let inverted: ExError = RunletError::BoundsOutOfOrder { min: 2, max: 1 }.into();

    assert_eq!(invalid.kind(), ExErrorKind::Validation);
    assert_eq!(inverted.kind(), ExErrorKind::Validation);
    assert!(invalid.message().contains("maxArgs"));
}

#[test]
fn test_missing_script_carries_path() {
    let ex_err: ExError = RunletError::ScriptMissing {
        path: "/nowhere/x.sh".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(
        ex_err.path().map(|p| p.to_string_lossy().into_owned()),
        Some("/nowhere/x.sh".to_string())
    );
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::Validation, "ERR_VALIDATION"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::AlreadyExists, "ERR_ALREADY_EXISTS"),
        (ExErrorKind::Format, "ERR_FORMAT"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::Unsupported, "ERR_UNSUPPORTED"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_display_is_human_readable() {
    let ex_err: ExError = RunletError::ReservedName {
        name: "list".to_string(),
    }
    .into();
    let text = ex_err.to_string();
    assert!(text.contains("ERR_INVALID_INPUT"));
    assert!(text.contains("reserved"));
}
