//! Append Engine
//!
//! Inserts one record as the last element of the index array. The default
//! [`TailPatch`] strategy rewrites only the bytes after the final element,
//! which keeps registration O(1) no matter how large the index grows. It
//! relies on the array's closing `]` sitting within the last
//! [`TAIL_WINDOW`] bytes; [`FullRewrite`] has no such requirement and is the
//! fallback when that assumption does not hold.

use runlet_core::{Command, ExError};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::errors::{format_error, io_error, Result};
use crate::index::atomic::PendingFile;
use crate::index::reader::RecordReader;

/// Bytes read from the end of the file when looking for the closing bracket
pub const TAIL_WINDOW: u64 = 10;

/// Files at most this long are treated as an empty array and overwritten
const EMPTY_INDEX_MAX_LEN: u64 = 3;

const OP: &str = "append_record";

/// How a record is added to the end of the index
pub trait AppendStrategy {
    /// Append one serialized record
    ///
    /// # Errors
    /// * `Format` - The index or the record is not in the expected shape
    /// * `Io` - Any filesystem failure
    fn append(&self, index: &Path, record: &[u8]) -> Result<()>;
}

/// Patch the tail bytes in place: `...}]` becomes `...},{new}]`
#[derive(Debug, Clone, Copy, Default)]
pub struct TailPatch;

/// Stream the whole array into a temp file with the record added, then rename
#[derive(Debug, Clone, Copy, Default)]
pub struct FullRewrite;

/// Append a serialized record using [`TailPatch`]
///
/// The bytes must decode as a [`Command`]; they are checked before anything
/// is written, so a bad record can never be spliced into the index.
///
/// # Errors
/// * `Format` - Invalid record, or no closing bracket near the end of the file
/// * `Io` - Any filesystem failure
pub fn append_record(index: &Path, record: &[u8]) -> Result<()> {
    TailPatch.append(index, record)
}

/// Serialize `cmd` and append it with `strategy`
///
/// # Errors
/// * `Serialization` - The record cannot be encoded
/// * Any error from the strategy
pub fn append_command(index: &Path, cmd: &Command, strategy: &dyn AppendStrategy) -> Result<()> {
    let record = encode(cmd)?;
    strategy.append(index, &record)
}

fn encode(cmd: &Command) -> Result<Vec<u8>> {
    cmd.to_record_bytes()
        .map_err(|e| ExError::from(e).with_op(OP).with_command(cmd.name.as_str()))
}

fn check_record(index: &Path, record: &[u8]) -> Result<()> {
    serde_json::from_slice::<Command>(record)
        .map(|_| ())
        .map_err(|e| format_error(OP, index, format!("record is not a command: {}", e)))
}

fn is_json_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

impl AppendStrategy for TailPatch {
    fn append(&self, index: &Path, record: &[u8]) -> Result<()> {
        check_record(index, record)?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(index)
            .map_err(|e| io_error(OP, index, e))?;
        let size = file.metadata().map_err(|e| io_error(OP, index, e))?.len();

        if size <= EMPTY_INDEX_MAX_LEN {
            return write_fresh_array(&mut file, index, size, record);
        }

        // Locate the closing bracket: last non-whitespace byte in the window
        let window_start = size.saturating_sub(TAIL_WINDOW);
        let tail = read_at(&mut file, index, window_start, size)?;
        let close = match tail.iter().rposition(|b| !is_json_whitespace(*b)) {
            Some(i) if tail[i] == b']' => i,
            _ => {
                return Err(format_error(
                    OP,
                    index,
                    format!(
                        "no closing ']' within the last {} bytes of the index",
                        TAIL_WINDOW
                    ),
                ))
            }
        };
        let close_offset = window_start + close as u64;

        // `[` + whitespace + `]` must not get a leading comma
        let needs_comma = previous_significant_byte(&mut file, index, close_offset)? != Some(b'[');
        tracing::debug!(
            index = %index.display(),
            offset = close_offset,
            needs_comma,
            "patching index tail"
        );

        let mut patch = Vec::with_capacity(record.len() + 2);
        if needs_comma {
            patch.push(b',');
        }
        patch.extend_from_slice(record);
        patch.push(b']');

        file.seek(SeekFrom::Start(close_offset))
            .map_err(|e| io_error(OP, index, e))?;
        file.write_all(&patch).map_err(|e| io_error(OP, index, e))?;
        file.flush().map_err(|e| io_error(OP, index, e))?;
        Ok(())
    }
}

/// Fast path for an empty (or `[]`) file: write `[record]` from offset 0
fn write_fresh_array(file: &mut File, index: &Path, size: u64, record: &[u8]) -> Result<()> {
    let existing = read_at(file, index, 0, size)?;
    let trimmed: Vec<u8> = existing
        .into_iter()
        .filter(|b| !is_json_whitespace(*b))
        .collect();
    if !trimmed.is_empty() && trimmed != b"[]" {
        return Err(format_error(OP, index, "index is too short to be a JSON array"));
    }

    tracing::debug!(index = %index.display(), "index empty, writing fresh array");
    let mut buf = Vec::with_capacity(record.len() + 2);
    buf.push(b'[');
    buf.extend_from_slice(record);
    buf.push(b']');

    file.seek(SeekFrom::Start(0))
        .map_err(|e| io_error(OP, index, e))?;
    file.write_all(&buf).map_err(|e| io_error(OP, index, e))?;
    file.flush().map_err(|e| io_error(OP, index, e))?;
    Ok(())
}

fn read_at(file: &mut File, index: &Path, start: u64, end: u64) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; (end - start) as usize];
    file.seek(SeekFrom::Start(start))
        .map_err(|e| io_error(OP, index, e))?;
    file.read_exact(&mut buf)
        .map_err(|e| io_error(OP, index, e))?;
    Ok(buf)
}

/// First non-whitespace byte before `offset`, scanning backward window by window
fn previous_significant_byte(file: &mut File, index: &Path, offset: u64) -> Result<Option<u8>> {
    let mut end = offset;
    while end > 0 {
        let start = end.saturating_sub(TAIL_WINDOW);
        let chunk = read_at(file, index, start, end)?;
        if let Some(b) = chunk.iter().rev().find(|b| !is_json_whitespace(**b)) {
            return Ok(Some(*b));
        }
        end = start;
    }
    Ok(None)
}

impl AppendStrategy for FullRewrite {
    fn append(&self, index: &Path, record: &[u8]) -> Result<()> {
        check_record(index, record)?;

        let reader = RecordReader::open(index)?;
        let mut out = PendingFile::create(index)?;
        let mut write = |bytes: &[u8]| out.write_all(bytes).map_err(|e| io_error(OP, index, e));

        write(b"[")?;
        for cmd in reader {
            let cmd = cmd?;
            let bytes = encode(&cmd)?;
            write(&bytes)?;
            write(b",")?;
        }
        write(record)?;
        write(b"]")?;

        tracing::debug!(index = %index.display(), "index rewritten with appended record");
        out.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runlet_core::ExErrorKind;
    use std::fs;
    use tempfile::TempDir;

    const REC: &[u8] = br#"{"name":"b","scriptPath":"/b.sh","minArgs":0,"maxArgs":-1}"#;

    fn index_with(content: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cmd_mappings.json");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_fast_path_on_empty_array_with_newline() {
        let (_dir, path) = index_with("[]\n");
        append_record(&path, REC).unwrap();
        let text = fs::read(&path).unwrap();
        assert!(text.starts_with(b"["));
        let parsed: Vec<Command> = serde_json::from_slice(&text).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.json");
        append_record(&path, REC).unwrap();
        let parsed: Vec<Command> = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(parsed[0].name, "b");
    }

    #[test]
    fn test_padded_empty_array_gets_no_comma() {
        let (_dir, path) = index_with("[\n\n  ]\n");
        append_record(&path, REC).unwrap();
        let parsed: Vec<Command> = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_bracket_inside_tail_string_is_not_mistaken() {
        let first = r#"[{"name":"a","scriptPath":"/x]","minArgs":0,"maxArgs":-1}]"#;
        let (_dir, path) = index_with(first);
        append_record(&path, REC).unwrap();
        let parsed: Vec<Command> = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].script_path, std::path::PathBuf::from("/x]"));
    }

    #[test]
    fn test_too_much_trailing_whitespace_is_format_error() {
        let first = format!(
            "[{}]{}",
            std::str::from_utf8(REC).unwrap(),
            " ".repeat(TAIL_WINDOW as usize)
        );
        let (_dir, path) = index_with(&first);
        let before = fs::read(&path).unwrap();
        let err = append_record(&path, REC).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Format);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_full_rewrite_handles_what_tail_patch_rejects() {
        let first = format!(
            "[{}]{}",
            std::str::from_utf8(REC).unwrap(),
            "\n".repeat(20)
        );
        let (_dir, path) = index_with(&first);
        FullRewrite.append(&path, REC).unwrap();
        let parsed: Vec<Command> = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_invalid_record_is_rejected_before_writing() {
        let (_dir, path) = index_with("[]");
        let err = append_record(&path, b"{\"name\":").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Format);
        assert_eq!(fs::read(&path).unwrap(), b"[]");
    }

    #[test]
    fn test_short_garbage_is_not_overwritten() {
        let (_dir, path) = index_with("abc");
        let err = append_record(&path, REC).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Format);
        assert_eq!(fs::read(&path).unwrap(), b"abc");
    }
}
