//! Roost - an incremental package manager and build tool for Swift modules
//!
//! This crate provides the core library functionality for Roost: manifest
//! loading, source-set resolution, toolchain discovery, and the incremental
//! build orchestration itself.

pub mod builder;
pub mod core;
pub mod util;

pub use crate::core::{
    dependency::DependencyConfig, index::Index, manifest::Manifest, package::Package,
    target::TargetType,
};

pub use builder::toolchain::Toolchain;
pub use builder::{Builder, CompilationStatus};
pub use util::config::BuildFlags;
pub use util::shell::Shell;
