//! Atomic write primitives
//!
//! Uses the temp→rename pattern so the target is either the old content or
//! the complete new content, never a partial write.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::{io_error, Result};

/// Sibling temp path used while rewriting `target` (`<target>.tmp`)
pub fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("index"));
    name.push(".tmp");
    target.with_file_name(name)
}

/// Atomically write bytes to a file
///
/// Creates the parent directory if needed.
pub fn atomic_write(target: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_dir", parent, e))?;
    }

    let mut pending = PendingFile::create(target)?;
    pending
        .write_all(content)
        .map_err(|e| io_error("write_temp", target, e))?;
    pending.commit()
}

/// A buffered temp file that replaces `target` on [`commit`](PendingFile::commit)
///
/// Dropping it without committing removes the temp file, so every early
/// return or `?` leaves the target untouched and nothing behind.
pub struct PendingFile {
    target: PathBuf,
    temp: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl PendingFile {
    /// Create (or truncate) the temp file next to `target`
    pub fn create(target: &Path) -> Result<Self> {
        let temp = temp_path_for(target);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp)
            .map_err(|e| io_error("create_temp", &temp, e))?;

        // Keep the target's mode across the rename
        if let Ok(meta) = fs::metadata(target) {
            if let Err(e) = fs::set_permissions(&temp, meta.permissions()) {
                tracing::debug!(temp = %temp.display(), error = %e, "could not copy permissions");
            }
        }

        Ok(Self {
            target: target.to_path_buf(),
            temp,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    /// Flush, fsync and rename over the target
    ///
    /// This is the only point at which the target changes.
    pub fn commit(mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            let file = writer
                .into_inner()
                .map_err(|e| io_error("flush_temp", &self.temp, e.into_error()))?;
            file.sync_all()
                .map_err(|e| io_error("sync_temp", &self.temp, e))?;
        }

        fs::rename(&self.temp, &self.target)
            .map_err(|e| io_error("rename_temp", &self.target, e))?;

        // Renamed away; nothing left for Drop to clean up
        self.temp = PathBuf::new();
        Ok(())
    }
}

impl Write for PendingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.writer.as_mut() {
            Some(w) => w.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "temp file already closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        // Close before removing (required on Windows)
        drop(self.writer.take());
        if self.temp.as_os_str().is_empty() {
            return;
        }
        if let Err(e) = fs::remove_file(&self.temp) {
            tracing::warn!(temp = %self.temp.display(), error = %e, "failed to remove temp file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_files(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|s| s.ends_with(".tmp"))
                    .unwrap_or(false)
            })
            .count()
    }

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("cmd_mappings.json");

        atomic_write(&target, b"[]").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"[]");
        assert_eq!(tmp_files(temp_dir.path()), 0);
    }

    #[test]
    fn test_atomic_write_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("cmd").join("unix").join("idx.json");

        atomic_write(&target, b"[]").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"[]");
    }

    #[test]
    fn test_dropped_pending_file_leaves_target_alone() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("idx.json");
        fs::write(&target, b"[1]").unwrap();

        {
            let mut pending = PendingFile::create(&target).unwrap();
            pending.write_all(b"[2]").unwrap();
            assert!(pending.temp_path().exists());
        }

        assert_eq!(fs::read(&target).unwrap(), b"[1]");
        assert_eq!(tmp_files(temp_dir.path()), 0);
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let p = temp_path_for(Path::new("/a/b/cmd_mappings.json"));
        assert_eq!(p, PathBuf::from("/a/b/cmd_mappings.json.tmp"));
    }
}
