//! `roost clean` command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::CleanArgs;
use roost::Manifest;

pub fn execute(args: CleanArgs) -> Result<()> {
    let manifest = Manifest::load(&super::working_dir()?)?;

    if args.all {
        remove_dir(&manifest.build_dir())?;
        remove_dir(&manifest.bin_dir())?;
    } else {
        remove_objects(&manifest.build_dir())?;
    }

    Ok(())
}

/// Delete `*.o` files directly under the build directory, leaving module
/// libraries and interface files in place.
fn remove_objects(build_dir: &Path) -> Result<()> {
    if !build_dir.is_dir() {
        return Ok(());
    }

    let entries = fs::read_dir(build_dir)
        .with_context(|| format!("failed to enumerate directory: {}", build_dir.display()))?;

    let mut removed = 0usize;
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to enumerate directory: {}", build_dir.display()))?
            .path();

        if path.is_file() && path.extension().map(|e| e == "o").unwrap_or(false) {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove file: {}", path.display()))?;
            removed += 1;
        }
    }

    if removed > 0 {
        eprintln!("     Removed {removed} object file(s) from {}", build_dir.display());
    }
    Ok(())
}

fn remove_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Ok(());
    }
    fs::remove_dir_all(path)
        .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    eprintln!("     Removed {}", path.display());
    Ok(())
}
