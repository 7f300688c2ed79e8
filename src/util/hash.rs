//! Content hashing for object-file naming.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Number of hex characters kept in an object-file name.
///
/// Short enough to keep filenames readable; collision risk at 24 bits is
/// accepted for typical project sizes.
pub const SHORT_HASH_LEN: usize = 6;

/// Compute the SHA-256 hash of a file's content as a hex string.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("failed to open file for hashing: {}", path.display()))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Compute the short content hash used in object-file names.
pub fn short_content_hash(path: &Path) -> Result<String> {
    let full = sha256_file(path)?;
    Ok(full[..SHORT_HASH_LEN].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sha256_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.txt");
        std::fs::write(&path, "hello").unwrap();

        let hash = sha256_file(&path).unwrap();
        assert_eq!(
            hash,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_short_content_hash() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.txt");
        std::fs::write(&path, "hello").unwrap();

        assert_eq!(short_content_hash(&path).unwrap(), "2cf24d");
    }

    #[test]
    fn test_short_hash_changes_with_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.txt");

        std::fs::write(&path, "one").unwrap();
        let first = short_content_hash(&path).unwrap();

        std::fs::write(&path, "two").unwrap();
        let second = short_content_hash(&path).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(short_content_hash(Path::new("/no/such/file.swift")).is_err());
    }
}
