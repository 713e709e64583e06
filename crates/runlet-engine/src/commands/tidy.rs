//! Tidy: move every registered script into the managed script directory.
//!
//! The directory is flat, so file names must be unique inside it. Names are
//! checked against what is already there plus everything moved in earlier
//! in the same pass; a clash gets the first free `name1.ext, name2.ext, ...`.
//!
//! A script that cannot be moved is reported and keeps its old path. If the
//! index rewrite itself fails, scripts already moved are put back.

#![allow(clippy::result_large_err)]

use runlet_core::rules::collision_free_name;
use runlet_core::{log_op_end, log_op_error, log_op_start};
use runlet_store::index::{rewrite_with, CommitWhen, RecordAction, RewriteOptions, RewriteReport};
use runlet_store::{Layout, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use crate::commands::require_index;

const OP: &str = "command_tidy";

/// One script moved into the managed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub command: String,
    pub from: PathBuf,
    pub to: PathBuf,
}

impl Relocation {
    /// Whether the file had to be renamed to avoid a collision
    pub fn renamed(&self) -> bool {
        self.from.file_name() != self.to.file_name()
    }
}

/// A script that stayed where it was
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TidyFailure {
    pub command: String,
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct TidyOutcome {
    pub moved: Vec<Relocation>,
    pub failed: Vec<TidyFailure>,
    /// Records whose script was already inside the managed directory
    pub already_managed: usize,
    pub report: RewriteReport,
}

/// Move every registered script into the script directory
///
/// # Errors
/// * `NotFound` - Index missing
/// * `Format` / `Io` - Reading the directory or rewriting the index failed
pub fn command_tidy(layout: &Layout) -> Result<TidyOutcome> {
    let start = Instant::now();
    log_op_start!(OP, script_dir = %layout.script_dir().display());

    let result = tidy(layout);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(outcome) => {
            log_op_end!(
                OP,
                duration_ms = duration_ms,
                moved = outcome.moved.len(),
                failed = outcome.failed.len()
            );
        }
        Err(e) => {
            log_op_error!(OP, e.clone(), duration_ms = duration_ms);
        }
    }
    result
}

fn tidy(layout: &Layout) -> Result<TidyOutcome> {
    require_index(layout, OP)?;

    let script_dir = layout.script_dir();
    let mut taken = layout.taken_names()?;
    let mut outcome = TidyOutcome::default();
    // Several records may share one script; move it once
    let mut moved_from: HashMap<PathBuf, PathBuf> = HashMap::new();

    let options = RewriteOptions {
        commit: CommitWhen::Changed,
    };
    let result = rewrite_with(layout.index_file(), options, |cmd| {
        if cmd.is_under(script_dir) {
            outcome.already_managed += 1;
            return Ok(RecordAction::Keep);
        }
        if let Some(dest) = moved_from.get(&cmd.script_path) {
            cmd.script_path = dest.clone();
            return Ok(RecordAction::Modified);
        }

        let Some(file_name) = cmd.script_file_name() else {
            outcome.failed.push(TidyFailure {
                command: cmd.name.clone(),
                path: cmd.script_path.clone(),
                reason: "script path has no file name".to_string(),
            });
            return Ok(RecordAction::Keep);
        };

        let target_name = collision_free_name(file_name, &taken);
        let dest = script_dir.join(&target_name);
        if let Err(e) = fs::rename(&cmd.script_path, &dest) {
            tracing::warn!(
                command = cmd.name.as_str(),
                from = %cmd.script_path.display(),
                to = %dest.display(),
                error = %e,
                "failed to move script"
            );
            outcome.failed.push(TidyFailure {
                command: cmd.name.clone(),
                path: cmd.script_path.clone(),
                reason: e.to_string(),
            });
            return Ok(RecordAction::Keep);
        }

        taken.insert(target_name);
        moved_from.insert(cmd.script_path.clone(), dest.clone());
        outcome.moved.push(Relocation {
            command: cmd.name.clone(),
            from: std::mem::replace(&mut cmd.script_path, dest.clone()),
            to: dest,
        });
        Ok(RecordAction::Modified)
    });

    match result {
        Ok(report) => {
            outcome.report = report;
            Ok(outcome)
        }
        Err(e) => {
            roll_back(&moved_from);
            Err(e)
        }
    }
}

/// Best effort: put moved scripts back so they match the unchanged index
fn roll_back(moved_from: &HashMap<PathBuf, PathBuf>) {
    for (from, to) in moved_from {
        if let Err(e) = fs::rename(to, from) {
            tracing::warn!(
                from = %to.display(),
                to = %from.display(),
                error = %e,
                "could not move script back after failed tidy"
            );
        }
    }
}
