//! File naming rules for the managed script directory
//!
//! All scripts end up in one flat directory, so two scripts that share a file
//! name in different source directories must be given distinct names there.

use std::collections::HashSet;
use std::path::Path;

/// Split `file_name` into stem and extension (the extension keeps its dot)
///
/// `run.sh` -> (`run`, `.sh`), `a.tar.gz` -> (`a.tar`, `.gz`), `Makefile` -> (`Makefile`, ``)
pub fn split_extension(file_name: &str) -> (&str, &str) {
    let path = Path::new(file_name);
    match (path.file_stem().and_then(|s| s.to_str()), path.extension()) {
        (Some(stem), Some(_)) => (stem, &file_name[stem.len()..]),
        _ => (file_name, ""),
    }
}

/// Stem a script is addressed by when it is not in the index
pub fn invocation_stem(file_name: &str) -> &str {
    split_extension(file_name).0
}

/// First name in `name.ext, name1.ext, name2.ext, ...` that is not in `taken`
pub fn collision_free_name(file_name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(file_name) {
        return file_name.to_string();
    }

    let (stem, ext) = split_extension(file_name);
    let mut n: u32 = 1;
    loop {
        let candidate = format!("{}{}{}", stem, n, ext);
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
