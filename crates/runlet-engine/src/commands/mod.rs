//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between
//! core validation rules and the index engines.

pub mod engine_command;
pub mod registry;
pub mod resolve;
pub mod setup;
pub mod tidy;

use runlet_core::errors::{ExError, ExErrorKind, RunletError};
use runlet_store::{Layout, Result};

/// Attach the failing operation to a rule violation
pub(crate) fn rule_error(op: &'static str) -> impl Fn(RunletError) -> ExError {
    move |err| ExError::from(err).with_op(op)
}

/// Fail early with a hint when `run init` has not been run yet
pub(crate) fn require_index(layout: &Layout, op: &'static str) -> Result<()> {
    if layout.is_initialized() {
        return Ok(());
    }
    Err(ExError::new(ExErrorKind::NotFound)
        .with_op(op)
        .with_path(layout.index_file())
        .with_message("No command index found. Run `run init` first."))
}
