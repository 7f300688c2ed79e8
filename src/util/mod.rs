//! Shared utilities.

pub mod config;
pub mod fs;
pub mod hash;
pub mod mtime;
pub mod process;
pub mod shell;

pub use config::BuildFlags;
pub use shell::Shell;
