//! runlet Core - record model, validation rules and shared facilities
//!
//! This crate provides:
//! - The `Command` record stored in the index file
//! - Modify requests with a "keep existing value" sentinel
//! - Argument-count and naming rules
//! - The canonical error facility (`ExError`, `RunletError`)
//! - The structured logging facility

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod rules;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, Result, RunletError};
pub use model::{Command, CommandUpdate, Field};
