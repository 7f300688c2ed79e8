//! Source-set resolution.
//!
//! A manifest declares sources as a mix of explicit files (recognized by
//! the `.swift` suffix) and directories (recognized by a trailing slash).
//! Directories are expanded recursively; the resulting order feeds straight
//! into compiler argument order, so it is reproduced exactly: every
//! directory's expansion first, in declaration order, then the explicit
//! files.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// Recognized source-file suffix.
pub const SOURCE_SUFFIX: &str = ".swift";

#[derive(Debug, Error)]
pub enum SourceSetError {
    /// Entries that are neither a `.swift` file nor a trailing-slash
    /// directory. All offenders are collected before failing.
    #[error("failed to parse as file or directory: {}", entries.join(", "))]
    InvalidEntries { entries: Vec<String> },

    #[error("failed to enumerate files in directory: {directory}")]
    Enumerate {
        directory: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("source directory does not exist: {0}")]
    MissingDirectory(PathBuf),
}

/// Expand declared source entries into a concrete ordered file list.
///
/// Relative entries are resolved against `root`.
pub fn resolve_sources(root: &Path, entries: &[String]) -> Result<Vec<PathBuf>, SourceSetError> {
    let mut directories = Vec::new();
    let mut files = Vec::new();
    let mut invalid = Vec::new();

    for entry in entries {
        if entry.ends_with('/') {
            directories.push(root.join(entry));
        } else if entry.ends_with(SOURCE_SUFFIX) {
            files.push(root.join(entry));
        } else {
            invalid.push(entry.clone());
        }
    }

    if !invalid.is_empty() {
        return Err(SourceSetError::InvalidEntries { entries: invalid });
    }

    let mut sources = Vec::new();
    for directory in &directories {
        scan_directory(directory, &mut sources)?;
    }
    sources.extend(files);

    Ok(sources)
}

/// Recursively collect `.swift` files under one directory.
///
/// Order is filesystem-enumeration order, not sorted; callers rely on it
/// only for determinism within a single filesystem state.
fn scan_directory(directory: &Path, out: &mut Vec<PathBuf>) -> Result<(), SourceSetError> {
    if !directory.is_dir() {
        return Err(SourceSetError::MissingDirectory(directory.to_path_buf()));
    }

    for entry in WalkDir::new(directory) {
        let entry = entry.map_err(|source| SourceSetError::Enumerate {
            directory: directory.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if entry
            .file_name()
            .to_string_lossy()
            .ends_with(SOURCE_SUFFIX)
        {
            out.push(entry.into_path());
        }
    }

    Ok(())
}
