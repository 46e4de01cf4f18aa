//! Input file discovery for the command-line driver.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension of configuration files picked up from directories.
pub const EXTENSION: &str = "tf";

/// Whether `path` names a configuration file by its extension.
#[must_use]
pub fn is_config_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == EXTENSION)
}

/// Expand one command-line path into the files to process.
///
/// A directory yields its `.tf` files, non-recursively and sorted by
/// name. Any other path is returned as given, whatever its extension.
pub fn expand(path: &Path) -> io::Result<Vec<PathBuf>> {
    if !fs::metadata(path)?.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let candidate = entry?.path();
        // Follows symlinks; dangling links are skipped.
        if is_config_file(&candidate) && candidate.is_file() {
            files.push(candidate);
        }
    }
    files.sort();
    tracing::debug!(dir = %path.display(), files = files.len(), "expanded directory");
    Ok(files)
}
