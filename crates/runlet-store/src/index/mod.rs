//! Index file engine
//!
//! The index is a single JSON array of command records. Every operation
//! here streams it; none loads the whole array into memory except
//! [`load_all`], which exists for listing.

pub mod append;
pub mod atomic;
pub mod finder;
pub mod reader;
pub mod rewriter;

pub use append::{append_command, append_record, AppendStrategy, FullRewrite, TailPatch};
pub use atomic::{atomic_write, temp_path_for, PendingFile};
pub use finder::{find, find_by_name, load_all, scan};
pub use reader::RecordReader;
pub use rewriter::{
    rewrite, rewrite_with, CommitWhen, RecordAction, RewriteOptions, RewriteReport,
};
