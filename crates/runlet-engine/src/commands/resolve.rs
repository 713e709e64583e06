//! Resolve `run <name> [args...]` to a program and its arguments.
//!
//! The index is consulted first, with the record's argument-count bounds
//! enforced. Failing that, a file in the script directory whose name minus
//! extension equals `<name>` is used as-is.

#![allow(clippy::result_large_err)]

use runlet_core::errors::{ExError, ExErrorKind, RunletError};
use runlet_core::rules::invocation_stem;
use runlet_core::{log_op_end, log_op_error, log_op_start};
use runlet_store::index::find_by_name;
use runlet_store::{Layout, Result};
use std::path::PathBuf;
use std::time::Instant;

use crate::commands::{require_index, rule_error};

const OP: &str = "resolve_invocation";

/// How an invocation was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBy {
    /// A registered record
    Index,
    /// A loose file in the script directory
    ScriptDir,
}

/// A program ready to be started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub resolved_by: ResolvedBy,
}

/// Resolve `args[0]` to a script; `args[1..]` pass through untouched
///
/// # Errors
/// * `InvalidInput` - No name given, or the argument count is out of bounds
/// * `NotFound` - Neither a record nor a script matches
/// * `Format` / `Io` - Index or directory problems
pub fn resolve_invocation(layout: &Layout, args: &[String]) -> Result<Invocation> {
    let start = Instant::now();
    let name = args.first().map(String::as_str).unwrap_or_default();
    log_op_start!(OP, command = name);

    let result = resolve(layout, args);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(inv) => {
            log_op_end!(
                OP,
                duration_ms = duration_ms,
                command = name,
                resolved_by = ?inv.resolved_by
            );
        }
        Err(e) => {
            log_op_error!(OP, e.clone(), duration_ms = duration_ms, command = name);
        }
    }
    result
}

fn resolve(layout: &Layout, args: &[String]) -> Result<Invocation> {
    let Some((name, rest)) = args.split_first() else {
        return Err(rule_error(OP)(RunletError::WrongArgCount {
            expected: "at least 1".to_string(),
            found: 0,
        }));
    };
    require_index(layout, OP)?;

    match find_by_name(layout.index_file(), name) {
        Ok(cmd) => {
            cmd.check_arity(rest.len()).map_err(rule_error(OP))?;
            return Ok(Invocation {
                program: cmd.script_path,
                args: rest.to_vec(),
                resolved_by: ResolvedBy::Index,
            });
        }
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e),
    }

    let listing = layout.scripts()?;
    let hit = listing.files.into_iter().find(|path| {
        path.file_name()
            .and_then(|f| f.to_str())
            .is_some_and(|f| invocation_stem(f) == name)
    });
    if let Some(program) = hit {
        tracing::debug!(command = name.as_str(), program = %program.display(), "matched loose script");
        return Ok(Invocation {
            program,
            args: rest.to_vec(),
            resolved_by: ResolvedBy::ScriptDir,
        });
    }

    let script_dir = layout.script_dir();
    let mut message = format!(
        "Command not found: {}\nHave you forgotten to add your new script to {:?}?",
        name, script_dir
    );
    if !listing.subdirs.is_empty() {
        message.push_str(&format!(
            "\nYou should not have folders in {:?}. It is only meant for script files.",
            script_dir
        ));
    }
    Err(ExError::new(ExErrorKind::NotFound)
        .with_op(OP)
        .with_command(name.as_str())
        .with_message(message))
}
