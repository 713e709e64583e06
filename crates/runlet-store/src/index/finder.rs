//! Streaming lookup over the index
//!
//! Records are decoded one at a time and handed to a callback; the scan
//! stops as soon as the callback breaks, so a hit near the front of a large
//! index never reads the rest of the file.

use runlet_core::Command;
use std::ops::ControlFlow;
use std::path::Path;

use crate::errors::{not_found, Result};
use crate::index::reader::RecordReader;

/// Visit records in file order until `visit` breaks
///
/// Returns the break value, or `None` once every record has been seen.
///
/// # Errors
/// * `Io` / `Format` - Reading or decoding the index fails
/// * Any error returned by `visit`, unchanged
pub fn scan<B, F>(index: &Path, mut visit: F) -> Result<Option<B>>
where
    F: FnMut(Command) -> Result<ControlFlow<B>>,
{
    let mut reader = RecordReader::open(index)?;
    while let Some(cmd) = reader.next_record()? {
        if let ControlFlow::Break(value) = visit(cmd)? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// First record matching `pred`
///
/// # Errors
/// * `NotFound` - No record matches
/// * `Io` / `Format` - Reading or decoding the index fails
pub fn find<P>(index: &Path, mut pred: P) -> Result<Command>
where
    P: FnMut(&Command) -> bool,
{
    let hit = scan(index, |cmd| {
        Ok(if pred(&cmd) {
            ControlFlow::Break(cmd)
        } else {
            ControlFlow::Continue(())
        })
    })?;
    hit.ok_or_else(|| not_found("find_record", index, "no matching record"))
}

/// Record registered under `name`
///
/// # Errors
/// * `NotFound` - Nothing is registered under that name
/// * `Io` / `Format` - Reading or decoding the index fails
pub fn find_by_name(index: &Path, name: &str) -> Result<Command> {
    find(index, |cmd| cmd.name == name)
        .map_err(|e| {
            if e.is_not_found() {
                e.with_command(name)
            } else {
                e
            }
        })
}

/// Every record in the index, in file order
pub fn load_all(index: &Path) -> Result<Vec<Command>> {
    RecordReader::open(index)?.collect()
}
