//! Streaming Rewriter
//!
//! Copies the index record by record into a sibling temp file, letting a
//! callback keep, edit, or drop each record, then renames the temp file over
//! the index. Memory use is one record regardless of index size.
//!
//! The index is only replaced by [`PendingFile::commit`]. Any error, from
//! I/O, decoding, or the callback itself, drops the pending file instead:
//! the original bytes stay exactly as they were and no temp file is left.

use runlet_core::Command;
use std::io::Write;
use std::path::Path;

use crate::errors::{encode_error, io_error, Result};
use crate::index::atomic::PendingFile;
use crate::index::reader::RecordReader;

const OP: &str = "rewrite_index";

/// What the rewrite callback decided for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAction {
    /// Copy the record through unchanged
    Keep,
    /// The callback edited the record in place; write the new value
    Modified,
    /// Leave the record out of the new index
    Drop,
    /// Stop now and leave the index untouched
    Abandon,
}

/// When the new index replaces the old one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitWhen {
    /// Always commit after a complete pass
    #[default]
    Always,
    /// Commit only if at least one record was modified or dropped
    Changed,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteOptions {
    pub commit: CommitWhen,
}

/// Outcome of a rewrite pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub seen: usize,
    pub kept: usize,
    pub modified: usize,
    pub dropped: usize,
    /// Whether the index file was replaced
    pub committed: bool,
}

impl RewriteReport {
    /// Records the callback modified or dropped
    pub fn affected(&self) -> usize {
        self.modified + self.dropped
    }
}

/// Rewrite the index, always committing after a full pass
///
/// See [`rewrite_with`].
pub fn rewrite<F>(index: &Path, edit: F) -> Result<RewriteReport>
where
    F: FnMut(&mut Command) -> Result<RecordAction>,
{
    rewrite_with(index, RewriteOptions::default(), edit)
}

/// Stream every record through `edit` into a new index
///
/// `edit` receives each record mutably; it reports what it did through the
/// returned [`RecordAction`]. Returning [`RecordAction::Abandon`] or an
/// error stops the pass without touching the index.
///
/// # Errors
/// * `Io` / `Format` - Reading, decoding, or writing fails
/// * Any error returned by `edit`, unchanged
pub fn rewrite_with<F>(index: &Path, options: RewriteOptions, mut edit: F) -> Result<RewriteReport>
where
    F: FnMut(&mut Command) -> Result<RecordAction>,
{
    // Open the source first so a missing or malformed index never creates a temp file
    let mut reader = RecordReader::open(index)?;
    let mut out = PendingFile::create(index)?;
    let mut report = RewriteReport::default();

    out.write_all(b"[").map_err(|e| io_error(OP, index, e))?;
    let mut wrote_any = false;

    while let Some(mut cmd) = reader.next_record()? {
        report.seen += 1;
        match edit(&mut cmd)? {
            RecordAction::Keep => report.kept += 1,
            RecordAction::Modified => report.modified += 1,
            RecordAction::Drop => {
                report.dropped += 1;
                continue;
            }
            RecordAction::Abandon => {
                tracing::debug!(index = %index.display(), seen = report.seen, "rewrite abandoned");
                return Ok(report);
            }
        }

        if wrote_any {
            out.write_all(b",").map_err(|e| io_error(OP, index, e))?;
        }
        serde_json::to_writer(&mut out, &cmd).map_err(|e| {
            if e.is_io() {
                io_error(OP, index, e.into())
            } else {
                encode_error(OP, e)
            }
        })?;
        wrote_any = true;
    }

    out.write_all(b"]").map_err(|e| io_error(OP, index, e))?;

    if options.commit == CommitWhen::Changed && report.affected() == 0 {
        tracing::debug!(index = %index.display(), "no records changed, keeping index");
        return Ok(report);
    }

    out.commit()?;
    report.committed = true;
    tracing::debug!(
        index = %index.display(),
        seen = report.seen,
        kept = report.kept,
        modified = report.modified,
        dropped = report.dropped,
        "index rewritten"
    );
    Ok(report)
}
