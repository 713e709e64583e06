//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical between the logging macros,
//! the engine handlers and the test capture layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Index and record identifiers
pub const FIELD_INDEX: &str = "index";
pub const FIELD_COMMAND: &str = "command";

// Rewrite counters
pub const FIELD_SEEN: &str = "seen";
pub const FIELD_KEPT: &str = "kept";
pub const FIELD_MODIFIED: &str = "modified";
pub const FIELD_DROPPED: &str = "dropped";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
