//! Minimal read of the local package index.
//!
//! The index lives at `~/.roost/Index.bin`: one header line
//! `Roost Index Version {n}` followed by a newline-separated payload of
//! package names. Only version 1 is understood.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use regex::Regex;

use crate::util::fs::ensure_dir;

/// Supported index format version.
const INDEX_VERSION: u32 = 1;

/// The local package index.
#[derive(Debug)]
pub struct Index {
    pub version: u32,
    pub packages: Vec<String>,
}

impl Index {
    /// Locate `~/.roost/Index.bin`, creating the data directory if needed.
    ///
    /// A missing index file is an error; only the directory is created.
    pub fn default_path() -> Result<PathBuf> {
        let base = directories::BaseDirs::new().context("unable to determine home directory")?;
        let data_dir = base.home_dir().join(".roost");

        ensure_dir(&data_dir)
            .with_context(|| format!("unable to create data directory: {}", data_dir.display()))?;

        let path = data_dir.join("Index.bin");
        if !path.is_file() {
            bail!("missing index file: {}", path.display());
        }
        Ok(path)
    }

    /// Read and parse an index file.
    pub fn read(path: &Path) -> Result<Index> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read index file: {}", path.display()))?;

        let (header, payload) = contents
            .split_once('\n')
            .context("unable to find separator \"\\n\" in index")?;

        let version = parse_header(header)?;

        let packages = payload
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.trim().to_string())
            .collect();

        Ok(Index { version, packages })
    }
}

fn parse_header(header: &str) -> Result<u32> {
    let pattern = Regex::new(r"Roost Index Version (\d+)").expect("header pattern is valid");

    let captures = pattern
        .captures(header)
        .with_context(|| format!("unable to parse index header: {header:?}"))?;
    let version: u32 = captures[1].parse().context("index version is not a number")?;

    if version != INDEX_VERSION {
        bail!("unsupported index version {version}");
    }
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_index() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Index.bin");
        std::fs::write(&path, "Roost Index Version 1\nalpha\nbeta\n").unwrap();

        let index = Index::read(&path).unwrap();
        assert_eq!(index.version, 1);
        assert_eq!(index.packages, ["alpha", "beta"]);
    }

    #[test]
    fn test_rejects_bad_header() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Index.bin");
        std::fs::write(&path, "Not An Index\npayload\n").unwrap();

        assert!(Index::read(&path).is_err());
    }

    #[test]
    fn test_rejects_unsupported_version() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Index.bin");
        std::fs::write(&path, "Roost Index Version 2\npayload\n").unwrap();

        assert!(Index::read(&path).is_err());
    }

    #[test]
    fn test_missing_separator() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Index.bin");
        std::fs::write(&path, "Roost Index Version 1").unwrap();

        assert!(Index::read(&path).is_err());
    }
}
