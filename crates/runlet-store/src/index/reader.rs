//! Streaming decoder for the index array
//!
//! Walks `[ rec , rec , ... ]` one element at a time. Delimiters are handled
//! here byte by byte; each element is handed to serde_json, which stops right
//! after the element's closing `}` and leaves the rest of the stream alone.

use runlet_core::Command;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::errors::{decode_error, format_error, io_error, Result};

/// Iterator over the records of an index file, in file order
pub struct RecordReader<R> {
    inner: R,
    path: PathBuf,
    started: bool,
    finished: bool,
}

impl RecordReader<BufReader<File>> {
    /// Open an index file and consume its opening bracket
    ///
    /// # Errors
    /// * `Io` - File cannot be opened or read
    /// * `Format` - File is empty or does not begin with `[`
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| io_error("open_index", path, e))?;
        Self::new(BufReader::new(file), path)
    }
}

impl<R: BufRead> RecordReader<R> {
    /// Wrap a reader positioned at the start of an index array
    ///
    /// `path` is only used for error context.
    ///
    /// # Errors
    /// * `Io` - Reading fails
    /// * `Format` - Stream is empty or does not begin with `[`
    pub fn new(inner: R, path: &Path) -> Result<Self> {
        let mut reader = Self {
            inner,
            path: path.to_path_buf(),
            started: false,
            finished: false,
        };
        match reader.peek_significant()? {
            Some(b'[') => reader.inner.consume(1),
            Some(other) => {
                return Err(format_error(
                    "read_index",
                    path,
                    format!(
                        "index must begin with '[', found {:?}",
                        char::from(other)
                    ),
                ))
            }
            None => return Err(format_error("read_index", path, "index file is empty")),
        }
        Ok(reader)
    }

    /// Decode the next record, or `None` after the closing bracket
    ///
    /// # Errors
    /// * `Io` - Reading fails
    /// * `Format` - Missing delimiter, malformed element, or EOF before `]`
    pub fn next_record(&mut self) -> Result<Option<Command>> {
        if self.finished {
            return Ok(None);
        }

        match self.peek_significant()? {
            Some(b']') => {
                self.inner.consume(1);
                self.finished = true;
                return Ok(None);
            }
            Some(b',') if self.started => self.inner.consume(1),
            Some(other) if self.started => {
                return Err(self.shape_error(format!(
                    "expected ',' or ']' between records, found {:?}",
                    char::from(other)
                )))
            }
            Some(_) => {}
            None => return Err(self.shape_error("unterminated array")),
        }

        let mut de = serde_json::Deserializer::from_reader(&mut self.inner);
        let record =
            Command::deserialize(&mut de).map_err(|e| decode_error("read_index", &self.path, e))?;
        self.started = true;
        Ok(Some(record))
    }

    /// Skip JSON whitespace and return the next byte without consuming it
    fn peek_significant(&mut self) -> Result<Option<u8>> {
        loop {
            let buf = self
                .inner
                .fill_buf()
                .map_err(|e| io_error("read_index", &self.path, e))?;
            match buf.first().copied() {
                None => return Ok(None),
                Some(b' ' | b'\t' | b'\n' | b'\r') => self.inner.consume(1),
                Some(b) => return Ok(Some(b)),
            }
        }
    }

    fn shape_error(&mut self, reason: impl Into<String>) -> runlet_core::ExError {
        self.finished = true;
        format_error("read_index", &self.path, reason)
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Command>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
