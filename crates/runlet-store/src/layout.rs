//! On-disk layout of a runlet home
//!
//! ```text
//! <home>/.run/
//!   What_is_this.txt
//!   cmd/<platform>/
//!     cmd_mappings.json
//!     <managed scripts>
//! ```

use runlet_core_types::Platform;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{io_error, Result};
use crate::index::{atomic_write, temp_path_for};

pub const RUN_DIR: &str = ".run";
pub const SCRIPT_DIR: &str = "cmd";
pub const INDEX_FILE: &str = "cmd_mappings.json";
pub const README_FILE: &str = "What_is_this.txt";

const README: &str = include_str!("../assets/what_is_this.txt");

/// Resolved paths for one home directory and platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    run_dir: PathBuf,
    script_dir: PathBuf,
    index_file: PathBuf,
}

/// What `setup` had to create
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupReport {
    pub created_index: bool,
    pub wrote_readme: bool,
}

/// Regular files in the script directory, minus the index and its temp file
#[derive(Debug, Clone, Default)]
pub struct ScriptListing {
    pub files: Vec<PathBuf>,
    /// Subdirectories found (they are never scripts)
    pub subdirs: Vec<PathBuf>,
}

impl Layout {
    pub fn for_home(home: &Path, platform: Platform) -> Self {
        let run_dir = home.join(RUN_DIR);
        let script_dir = run_dir.join(SCRIPT_DIR).join(platform.as_str());
        let index_file = script_dir.join(INDEX_FILE);
        Self {
            run_dir,
            script_dir,
            index_file,
        }
    }

    pub fn script_dir(&self) -> &Path {
        &self.script_dir
    }

    pub fn index_file(&self) -> &Path {
        &self.index_file
    }

    /// Create the script directory, an empty index and the readme
    ///
    /// Existing files are left alone, so running this twice is harmless.
    ///
    /// # Errors
    /// * `Io` - Any directory or file cannot be created
    pub fn setup(&self) -> Result<SetupReport> {
        create_dir_all(&self.script_dir)?;
        let mut report = SetupReport::default();

        if !self.index_file.exists() {
            atomic_write(&self.index_file, b"[]")?;
            report.created_index = true;
        }

        let readme = self.run_dir.join(README_FILE);
        if !readme.exists() {
            fs::write(&readme, README).map_err(|e| io_error("write_readme", &readme, e))?;
            report.wrote_readme = true;
        }

        Ok(report)
    }

    /// Whether `setup` has created the index
    pub fn is_initialized(&self) -> bool {
        self.index_file.is_file()
    }

    /// File names a script moved into the script directory must not take
    ///
    /// Everything currently present, plus the index and its temp file even
    /// when they do not exist yet: a rewrite creates the temp file before it
    /// reads the first record.
    ///
    /// # Errors
    /// * `Io` - The directory cannot be read
    pub fn taken_names(&self) -> Result<HashSet<String>> {
        let entries =
            fs::read_dir(&self.script_dir).map_err(|e| io_error("list_scripts", &self.script_dir, e))?;
        let mut names: HashSet<String> = [&self.index_file, &temp_path_for(&self.index_file)]
            .into_iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        for entry in entries {
            let entry = entry.map_err(|e| io_error("list_scripts", &self.script_dir, e))?;
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    /// Scripts sitting directly in the script directory
    ///
    /// # Errors
    /// * `Io` - The directory cannot be read
    pub fn scripts(&self) -> Result<ScriptListing> {
        let entries =
            fs::read_dir(&self.script_dir).map_err(|e| io_error("list_scripts", &self.script_dir, e))?;
        let temp = temp_path_for(&self.index_file);
        let mut listing = ScriptListing::default();

        for entry in entries {
            let entry = entry.map_err(|e| io_error("list_scripts", &self.script_dir, e))?;
            let path = entry.path();
            if path == self.index_file || path == temp {
                continue;
            }
            let file_type = entry
                .file_type()
                .map_err(|e| io_error("list_scripts", &path, e))?;
            if file_type.is_dir() {
                listing.subdirs.push(path);
            } else {
                listing.files.push(path);
            }
        }

        listing.files.sort();
        listing.subdirs.sort();
        Ok(listing)
    }
}

#[cfg(unix)]
fn create_dir_all(dir: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o750)
        .create(dir)
        .map_err(|e| io_error("create_dir", dir, e))
}

#[cfg(not(unix))]
fn create_dir_all(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| io_error("create_dir", dir, e))
}
