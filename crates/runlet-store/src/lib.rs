//! runlet Store - the index file and the directories around it
//!
//! Provides:
//! - Streaming reader for the JSON array index
//! - Append engine (tail patch, with a full-rewrite fallback)
//! - Streaming finder and rewriter with a single atomic commit point
//! - Home layout and first-run setup

pub mod errors;
pub mod index;
pub mod layout;

// Re-export key types
pub use errors::Result;
pub use layout::{Layout, ScriptListing, SetupReport};
