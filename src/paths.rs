//! Path resolution for user-supplied locations.
//! Expands a leading `~` to the invoking user's home directory and
//! anchors relative paths at the current working directory.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Resolves a path string to an absolute path.
///
/// `~` and `~/rest` expand to the home directory; `~user` forms are not
/// expanded and are treated as ordinary relative paths. The result is
/// lexically absolute (no symlinks are followed), so resolving the same
/// string twice yields identical paths.
///
/// # Errors
/// * `Error::ValidationError` for an empty path
/// * `Error::ConfigError` if the home directory cannot be determined
/// * `Error::IoError` if the current directory cannot be read
pub fn resolve_path<S: AsRef<str>>(path: S) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.is_empty() {
        return Err(Error::ValidationError("empty path".to_string()));
    }

    let expanded = match path.strip_prefix('~') {
        Some("") => home_dir()?,
        Some(rest) if rest.starts_with('/') || rest.starts_with(std::path::MAIN_SEPARATOR) => {
            home_dir()?.join(&rest[1..])
        }
        _ => PathBuf::from(path),
    };

    make_absolute(&expanded)
}

/// Anchors a relative path at the current working directory without
/// touching the filesystem.
pub fn make_absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| Error::ConfigError("cannot determine the home directory".to_string()))
}
