use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using RunletError
pub type Result<T> = std::result::Result<T, RunletError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the store, the engine or the CLI is classified
/// by one of these kinds. Callers branch on the kind (for example "fall back
/// to a filename lookup when the index has no such command") instead of
/// comparing error values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Malformed user input (argument counts, names)
    InvalidInput,
    /// Argument-count bounds that do not form a valid range
    Validation,
    /// No record matched a lookup, modify or delete target
    NotFound,
    /// A record with the requested name already exists
    AlreadyExists,
    /// Index file is not a JSON array in the expected shape
    Format,
    Io,
    Serialization,
    /// Host platform has no script namespace
    Unsupported,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Validation => "ERR_VALIDATION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Format => "ERR_FORMAT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Unsupported => "ERR_UNSUPPORTED",
        }
    }
}

/// Canonical structured error type
///
/// Carries a kind for programmatic handling plus optional context about the
/// operation, the command name and the file involved.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    command: Option<String>,
    path: Option<PathBuf>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            command: None,
            path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the name of the command record involved
    pub fn with_command(mut self, name: impl Into<String>) -> Self {
        self.command = Some(name.into());
        self
    }

    /// Add the file the operation was working on
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the command name context, if any
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Get the file path context, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Shorthand for `kind() == ExErrorKind::NotFound`
    pub fn is_not_found(&self) -> bool {
        self.kind == ExErrorKind::NotFound
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(command) = &self.command {
            write!(f, " (command: {})", command)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for building and checking command records
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunletError {
    /// No command with this name is registered
    #[error("Command not found: {name}")]
    CommandNotFound { name: String },

    /// Name is already held by another record
    #[error("Command {name:?} already exists")]
    NameTaken { name: String },

    /// Name collides with a built-in subcommand
    #[error("{name:?} is reserved for a built-in command")]
    ReservedName { name: String },

    /// Name is empty or contains characters that cannot be typed as one token
    #[error("Invalid command name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Too few or too many positional arguments for a handler
    #[error("Wrong argument count: expected {expected}, got {found}")]
    WrongArgCount { expected: String, found: usize },

    /// A bound is not an integer, or is negative where not allowed
    #[error("Invalid {field} {value:?}: {reason}")]
    InvalidBound {
        field: String,
        value: String,
        reason: String,
    },

    /// maxArgs is bounded but smaller than minArgs
    #[error("maxArgs ({max}) must be -1 or at least minArgs ({min})")]
    BoundsOutOfOrder { min: u32, max: u32 },

    /// Invocation argument count outside the record's bounds
    #[error("{name:?} expects {qualifier} {limit} argument{plural}.")]
    ArgsOutOfRange {
        name: String,
        qualifier: &'static str,
        limit: u32,
        plural: &'static str,
    },

    /// Script path does not exist on disk
    #[error("There is no such script: {path}")]
    ScriptMissing { path: String },

    /// Script path could not be made absolute
    #[error("Cannot resolve script path {path}: {reason}")]
    UnresolvablePath { path: String, reason: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from RunletError to ExError
impl From<RunletError> for ExError {
    fn from(err: RunletError) -> Self {
        let message = err.to_string();
        match err {
            RunletError::CommandNotFound { name } => ExError::new(ExErrorKind::NotFound)
                .with_command(name)
                .with_message(message),

            RunletError::NameTaken { name } => ExError::new(ExErrorKind::AlreadyExists)
                .with_command(name)
                .with_message(message),

            RunletError::ReservedName { name } | RunletError::InvalidName { name, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_command(name)
                    .with_message(message)
            }

            RunletError::WrongArgCount { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            RunletError::InvalidBound { .. } | RunletError::BoundsOutOfOrder { .. } => {
                ExError::new(ExErrorKind::Validation).with_message(message)
            }

            RunletError::ArgsOutOfRange { name, .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_command(name)
                .with_message(message),

            RunletError::ScriptMissing { path } | RunletError::UnresolvablePath { path, .. } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_path(path)
                    .with_message(message)
            }

            RunletError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for RunletError {
    fn from(err: serde_json::Error) -> Self {
        RunletError::Serialization {
            message: err.to_string(),
        }
    }
}
