//! Modification-time lookups and comparisons.
//!
//! All staleness decisions in the builder reduce to the two questions
//! answered here: when was a path last modified, and is one time strictly
//! newer than another. Equal timestamps count as up to date; filesystems
//! with coarse mtime resolution would otherwise rebuild forever.

use std::path::Path;
use std::time::SystemTime;

use anyhow::{bail, Context, Result};

/// Last-modified time of a path, or `None` if it does not exist or cannot
/// be read.
///
/// Callers treat an absent *target* as always stale. An absent *source* is
/// a configuration error; use [`source_modification_time`] for those.
pub fn modification_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Last-modified time of a declared source file.
///
/// A source that vanished after resolution is a hard error, not a staleness
/// signal.
pub fn source_modification_time(path: &Path) -> Result<SystemTime> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("failed to stat source file: {}", path.display()))?;
    metadata
        .modified()
        .with_context(|| format!("modification time not available for: {}", path.display()))
}

/// Strict greater-than comparison. Ties are *not* newer.
pub fn is_newer_than(a: SystemTime, b: SystemTime) -> bool {
    a > b
}

/// Reduce a nonempty set of source timestamps to the newest one.
pub fn latest(times: &[SystemTime]) -> Result<SystemTime> {
    match times.iter().max() {
        Some(t) => Ok(*t),
        None => bail!("cannot compute last modification time of an empty source list"),
    }
}

/// Newest modification time over a nonempty list of source files.
pub fn latest_modification<P: AsRef<Path>>(paths: &[P]) -> Result<SystemTime> {
    let mut times = Vec::with_capacity(paths.len());
    for path in paths {
        times.push(source_modification_time(path.as_ref())?);
    }
    latest(&times)
}
