//! Core data model: manifests, packages, modules, dependencies.

pub mod dependency;
pub mod index;
pub mod manifest;
pub mod package;
pub mod sources;
pub mod target;

pub use dependency::DependencyConfig;
pub use manifest::{Manifest, ManifestError};
pub use package::{Module, Package};
pub use target::TargetType;
