//! Error handling for runlet-store
//!
//! Wraps runlet-core ExError with store-specific helpers

use runlet_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation)
        .with_path(path)
        .with_message(err.to_string())
}

/// Create an error for an index file that is not in the expected shape
pub fn format_error(operation: &str, path: &Path, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Format)
        .with_op(operation)
        .with_path(path)
        .with_message(reason)
}

/// Classify a decoder error: I/O stays I/O, anything else is a shape problem
pub fn decode_error(operation: &str, path: &Path, err: serde_json::Error) -> ExError {
    let kind = if err.is_io() {
        ExErrorKind::Io
    } else {
        ExErrorKind::Format
    };
    ExError::new(kind)
        .with_op(operation)
        .with_path(path)
        .with_message(err.to_string())
}

/// Create an error for a record that could not be encoded
pub fn encode_error(operation: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation)
        .with_message(err.to_string())
}

/// Create a lookup miss error
pub fn not_found(operation: &str, path: &Path, what: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(operation)
        .with_path(path)
        .with_message(what)
}
