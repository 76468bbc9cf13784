//! Input file discovery.

use crate::report::ReconError;
use std::path::{Path, PathBuf};

/// Return the first regular file in `dir`, in directory-listing order.
///
/// Listing order is whatever the platform returns; it is deliberately not
/// canonicalized. Fails with [`ReconError::NoInputFile`] when the directory
/// holds no regular files.
pub fn first_file_in_dir(dir: &Path) -> Result<PathBuf, ReconError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            return Ok(entry.path());
        }
    }
    Err(ReconError::NoInputFile {
        dir: dir.to_path_buf(),
    })
}
