//! Filesystem utilities.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

/// Ensure a directory exists, creating it (and parents) if necessary.
///
/// Fails if the path exists but is not a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            bail!("must be a directory: {}", path.display());
        }
        return Ok(());
    }
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_creates_nested() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/c");

        ensure_dir(&path).unwrap();
        assert!(path.is_dir());

        // Idempotent on an existing directory
        ensure_dir(&path).unwrap();
    }

    #[test]
    fn test_ensure_dir_rejects_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file");
        fs::write(&path, "x").unwrap();

        assert!(ensure_dir(&path).is_err());
    }
}
