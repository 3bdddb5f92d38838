//! Removal of LaTeX intermediate files from a project directory.

use crate::constants::LATEX_INTERMEDIATES;
use crate::error::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds the set of LaTeX intermediate file patterns.
pub fn intermediate_patterns() -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in LATEX_INTERMEDIATES {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Deletes intermediate files at the top level of `dir`. Subdirectories and
/// their contents are left alone.
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - Removed files, sorted
pub fn clean<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let patterns = intermediate_patterns()?;
    let mut removed = Vec::new();

    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if patterns.is_match(entry.file_name()) {
            debug!("Removing {}", entry.path().display());
            fs::remove_file(entry.path())?;
            removed.push(entry.path());
        }
    }

    removed.sort();
    Ok(removed)
}
