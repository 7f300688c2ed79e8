//! Build target types.

use std::fmt;

use serde::Deserialize;

/// What a package builds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Not declared. Building a package with an unknown target type is a
    /// configuration error.
    #[default]
    Unknown,
    /// A binary at `bin/{name-lowercased}`.
    Executable,
    /// Reserved; not buildable yet.
    Framework,
    /// A static library `lib{Name}.a` plus a `{Name}.swiftmodule` interface.
    Module,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Unknown => "unknown",
            TargetType::Executable => "executable",
            TargetType::Framework => "framework",
            TargetType::Module => "module",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
