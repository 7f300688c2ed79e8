//! Command implementations

pub mod build;
pub mod clean;
pub mod inspect;
pub mod list;
pub mod test;
pub mod update;

use std::path::PathBuf;

use anyhow::{Context, Result};

/// The directory whose Roostfile the command operates on.
pub fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().context("failed to determine working directory")
}
