//! Registry handlers: create, modify, delete and list commands.
//!
//! Each handler validates its arguments up front, then touches the index
//! through exactly one store engine call (append, rewrite or scan).

#![allow(clippy::result_large_err)]

use runlet_core::errors::{ExError, ExErrorKind, RunletError};
use runlet_core::rules::{parse_new_args, parse_update_args, RESERVED_NAMES};
use runlet_core::{log_op_end, log_op_error, log_op_start, Command};
use runlet_store::index::{
    append_command, find_by_name, rewrite_with, scan, CommitWhen, FullRewrite, RecordAction,
    RewriteOptions, RewriteReport, TailPatch,
};
use runlet_store::{Layout, Result};
use std::collections::HashSet;
use std::ops::ControlFlow;
use std::path::Path;
use std::time::Instant;

use crate::commands::{require_index, rule_error};

const OP_CREATE: &str = "command_create";
const OP_MODIFY: &str = "command_modify";
const OP_DELETE: &str = "command_delete";
const OP_LIST: &str = "command_list";

/// Result of a delete request
#[derive(Debug, Clone, Default)]
pub struct DeleteOutcome {
    /// Requested names that matched at least one record
    pub removed: Vec<String>,
    /// Requested names with no record; reported, not fatal
    pub unmatched: Vec<String>,
    pub report: RewriteReport,
}

/// Everything `run list` shows
#[derive(Debug, Clone)]
pub struct Listing {
    pub builtins: &'static [&'static str],
    pub commands: Vec<Command>,
}

/// Register a new command: `<name> <scriptPath> [<min> [<max>]]`
///
/// # Errors
/// * `InvalidInput` - Bad argument count or name
/// * `Validation` - Bad bounds
/// * `NotFound` - Script does not exist, or the index is missing
/// * `AlreadyExists` - Name is already registered
/// * `Format` / `Io` - Index problems
pub fn command_create(layout: &Layout, args: &[String]) -> Result<Command> {
    let start = Instant::now();
    log_op_start!(OP_CREATE, arg_count = args.len());

    let result = create(layout, args);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(cmd) => {
            log_op_end!(OP_CREATE, duration_ms = duration_ms, command = cmd.name.as_str());
        }
        Err(e) => {
            log_op_error!(OP_CREATE, e.clone(), duration_ms = duration_ms);
        }
    }
    result
}

fn create(layout: &Layout, args: &[String]) -> Result<Command> {
    let cmd = parse_new_args(args).map_err(rule_error(OP_CREATE))?;
    check_script_exists(&cmd.script_path, OP_CREATE)?;
    require_index(layout, OP_CREATE)?;
    ensure_name_free(layout.index_file(), &cmd.name, OP_CREATE)?;

    let index = layout.index_file();
    match append_command(index, &cmd, &TailPatch) {
        Err(e) if e.kind() == ExErrorKind::Format => {
            tracing::warn!(
                index = %index.display(),
                error = %e,
                "tail patch rejected the index, falling back to full rewrite"
            );
            append_command(index, &cmd, &FullRewrite)?;
        }
        other => other?,
    }
    Ok(cmd)
}

/// Change a command: `<name> <newName> [<scriptPath> [<min> [<max>]]]`
///
/// `_` keeps the existing value. Every record carrying `name` is updated.
/// Returns the updated record.
///
/// # Errors
/// * `InvalidInput` - Bad argument count or name
/// * `Validation` - Merged bounds are out of order
/// * `NotFound` - No such command, a missing new script, or a missing index
/// * `AlreadyExists` - The new name belongs to another command
pub fn command_modify(layout: &Layout, name: &str, args: &[String]) -> Result<Command> {
    let start = Instant::now();
    log_op_start!(OP_MODIFY, command = name);

    let result = modify(layout, name, args);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(cmd) => {
            log_op_end!(OP_MODIFY, duration_ms = duration_ms, command = cmd.name.as_str());
        }
        Err(e) => {
            log_op_error!(OP_MODIFY, e.clone(), duration_ms = duration_ms, command = name);
        }
    }
    result
}

fn modify(layout: &Layout, name: &str, args: &[String]) -> Result<Command> {
    let update = parse_update_args(args).map_err(rule_error(OP_MODIFY))?;
    if let runlet_core::Field::Set(path) = &update.script_path {
        check_script_exists(path, OP_MODIFY)?;
    }
    require_index(layout, OP_MODIFY)?;

    let index = layout.index_file();
    if let Some(new_name) = update.new_name().filter(|n| *n != name) {
        ensure_name_free(index, new_name, OP_MODIFY)?;
    }

    let mut updated = None;
    let options = RewriteOptions {
        commit: CommitWhen::Changed,
    };
    let report = rewrite_with(index, options, |cmd| {
        if cmd.name != name {
            return Ok(RecordAction::Keep);
        }
        update.apply(cmd).map_err(rule_error(OP_MODIFY))?;
        updated = Some(cmd.clone());
        Ok(RecordAction::Modified)
    })?;

    tracing::debug!(command = name, modified = report.modified, "modify pass done");
    match updated {
        Some(cmd) if report.modified > 0 => Ok(cmd),
        _ => Err(ExError::from(RunletError::CommandNotFound {
            name: name.to_string(),
        })
        .with_op(OP_MODIFY)),
    }
}

/// Remove every record whose name is in `names`
///
/// Names that match nothing are returned in `unmatched`. When nothing
/// matches at all, the index file is left byte-identical.
///
/// # Errors
/// * `InvalidInput` - No names given
/// * `NotFound` - Index missing
/// * `Format` / `Io` - Index problems
pub fn command_delete(layout: &Layout, names: &[String]) -> Result<DeleteOutcome> {
    let start = Instant::now();
    log_op_start!(OP_DELETE, requested = names.len());

    let result = delete(layout, names);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(outcome) => {
            log_op_end!(
                OP_DELETE,
                duration_ms = duration_ms,
                dropped = outcome.report.dropped,
                unmatched = outcome.unmatched.len()
            );
        }
        Err(e) => {
            log_op_error!(OP_DELETE, e.clone(), duration_ms = duration_ms);
        }
    }
    result
}

fn delete(layout: &Layout, names: &[String]) -> Result<DeleteOutcome> {
    if names.is_empty() {
        return Err(rule_error(OP_DELETE)(RunletError::WrongArgCount {
            expected: "at least 1".to_string(),
            found: 0,
        }));
    }
    require_index(layout, OP_DELETE)?;

    let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
    let mut matched: HashSet<String> = HashSet::new();
    let options = RewriteOptions {
        commit: CommitWhen::Changed,
    };
    let report = rewrite_with(layout.index_file(), options, |cmd| {
        if wanted.contains(cmd.name.as_str()) {
            matched.insert(cmd.name.clone());
            Ok(RecordAction::Drop)
        } else {
            Ok(RecordAction::Keep)
        }
    })?;

    let mut outcome = DeleteOutcome {
        report,
        ..DeleteOutcome::default()
    };
    let mut seen = HashSet::new();
    for name in names.iter().filter(|n| seen.insert(n.as_str())) {
        if matched.contains(name) {
            outcome.removed.push(name.clone());
        } else {
            outcome.unmatched.push(name.clone());
        }
    }
    Ok(outcome)
}

/// Built-in subcommands followed by every record, in index order
///
/// # Errors
/// * `NotFound` - Index missing
/// * `Format` / `Io` - Index problems
pub fn command_list(layout: &Layout) -> Result<Listing> {
    let start = Instant::now();
    log_op_start!(OP_LIST);

    let result = list(layout);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(listing) => {
            log_op_end!(OP_LIST, duration_ms = duration_ms, count = listing.commands.len());
        }
        Err(e) => {
            log_op_error!(OP_LIST, e.clone(), duration_ms = duration_ms);
        }
    }
    result
}

fn list(layout: &Layout) -> Result<Listing> {
    require_index(layout, OP_LIST)?;

    let mut commands = Vec::new();
    scan::<(), _>(layout.index_file(), |cmd| {
        commands.push(cmd);
        Ok(ControlFlow::Continue(()))
    })?;

    Ok(Listing {
        builtins: RESERVED_NAMES,
        commands,
    })
}

fn check_script_exists(path: &Path, op: &'static str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    Err(rule_error(op)(RunletError::ScriptMissing {
        path: path.display().to_string(),
    }))
}

fn ensure_name_free(index: &Path, name: &str, op: &'static str) -> Result<()> {
    match find_by_name(index, name) {
        Ok(_) => Err(rule_error(op)(RunletError::NameTaken {
            name: name.to_string(),
        })),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}
