pub mod exec;
pub mod init;
pub mod list;
pub mod registry;
pub mod tidy;

use runlet_core::errors::{ExError, ExErrorKind};

/// Turn an engine error into the line printed after `Error: `
///
/// The message carries the user-facing text; filesystem and format
/// failures also name the file involved.
pub fn user_error(err: ExError) -> Box<dyn std::error::Error> {
    let text = match (err.kind(), err.path()) {
        (ExErrorKind::Io | ExErrorKind::Format, Some(path)) => {
            format!("{} ({})", err.message(), path.display())
        }
        _ => err.message().to_string(),
    };
    text.into()
}
