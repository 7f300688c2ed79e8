//! Roostfile.yaml manifest parsing and schema.
//!
//! The manifest is the central configuration file for a Roost package. It
//! is decoded as-is into this schema; resolution of source entries into
//! concrete file lists happens later, in [`crate::core::package`].

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::dependency::DependencyConfig;
use crate::core::target::TargetType;

/// Manifest file name expected at a package root.
pub const MANIFEST_FILE: &str = "Roostfile.yaml";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("missing {MANIFEST_FILE} in `{0}`")]
    Missing(PathBuf),

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("manifest at {0} is missing a package name")]
    MissingName(PathBuf),
}

/// The parsed Roostfile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Manifest {
    /// Package name. Also the module name passed to the compiler.
    pub name: String,

    /// What this package builds into.
    #[serde(default)]
    pub target_type: TargetType,

    /// Declared source entries: explicit `.swift` files or trailing-slash
    /// directories.
    #[serde(default)]
    pub sources: Vec<String>,

    /// Sub-modules compiled into static libraries before the root sources.
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,

    /// External dependencies expected under `vendor/`.
    #[serde(default)]
    pub dependencies: Vec<DependencyConfig>,

    /// Framework search paths, added to both compile and rpath arguments.
    #[serde(default)]
    pub framework_search_paths: Vec<String>,

    /// Free-form compiler options, whitespace-tokenized at build time.
    #[serde(default)]
    pub compiler_options: String,

    /// Free-form linker options, whitespace-tokenized at build time.
    #[serde(default)]
    pub linker_options: String,

    /// Shell commands run before compilation, in declared order, with the
    /// package root as working directory.
    #[serde(default)]
    pub precompile_commands: Vec<String>,

    /// Alternate source list and options for `roost test`.
    #[serde(default)]
    pub test_target: Option<TestTarget>,

    /// The directory containing this manifest. Set by [`Manifest::load`].
    #[serde(skip)]
    pub directory: PathBuf,
}

/// A named sub-unit with its own sources.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ModuleConfig {
    pub name: String,

    #[serde(default)]
    pub sources: Vec<String>,
}

/// Test-target block of the manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TestTarget {
    /// Test sources, resolved the same way as the root sources.
    #[serde(default)]
    pub sources: Vec<String>,

    /// Extra compiler options appended for test builds.
    #[serde(default)]
    pub compiler_options: String,

    /// Extra linker options appended for test builds.
    #[serde(default)]
    pub linker_options: String,
}

impl Manifest {
    /// Load and validate the manifest in `directory`.
    pub fn load(directory: &Path) -> Result<Manifest, ManifestError> {
        let path = directory.join(MANIFEST_FILE);

        if !path.is_file() {
            return Err(ManifestError::Missing(directory.to_path_buf()));
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;

        Manifest::parse(&contents, directory).map_err(|source| ManifestError::Parse {
            path,
            source,
        })
    }

    /// Parse manifest text for a package rooted at `directory`.
    pub fn parse(contents: &str, directory: &Path) -> Result<Manifest, serde_yaml::Error> {
        let mut manifest: Manifest = serde_yaml::from_str(contents)?;
        manifest.directory = directory.to_path_buf();
        Ok(manifest)
    }

    /// Validate fields that serde cannot check.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.name.trim().is_empty() {
            return Err(ManifestError::MissingName(self.directory.clone()));
        }
        Ok(())
    }

    /// `{root}/build`, home of objects, libraries and module interfaces.
    pub fn build_dir(&self) -> PathBuf {
        self.directory.join("build")
    }

    /// `{root}/vendor`, where fetched dependencies live.
    pub fn vendor_dir(&self) -> PathBuf {
        self.directory.join("vendor")
    }

    /// `{root}/bin`, home of the final executable.
    pub fn bin_dir(&self) -> PathBuf {
        self.directory.join("bin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
name: Demo
target-type: executable
sources:
  - Sources/
  - main.swift
modules:
  - name: Core
    sources:
      - Core/
dependencies:
  - github: owner/helper
  - github: owner/spec-kit
    only-test: true
framework-search-paths:
  - Frameworks
compiler-options: "-g -Onone"
linker-options: "-L{root}/lib"
precompile-commands:
  - ./generate.sh
test-target:
  sources:
    - Tests/
  compiler-options: "-DTEST"
"#;

    #[test]
    fn test_parse_full_manifest() {
        let manifest = Manifest::parse(FULL, Path::new("/proj")).unwrap();

        assert_eq!(manifest.name, "Demo");
        assert_eq!(manifest.target_type, TargetType::Executable);
        assert_eq!(manifest.sources, ["Sources/", "main.swift"]);
        assert_eq!(manifest.modules.len(), 1);
        assert_eq!(manifest.modules[0].name, "Core");
        assert_eq!(manifest.dependencies.len(), 2);
        assert!(!manifest.dependencies[0].only_test);
        assert!(manifest.dependencies[1].only_test);
        assert_eq!(manifest.framework_search_paths, ["Frameworks"]);
        assert_eq!(manifest.compiler_options, "-g -Onone");
        assert_eq!(manifest.linker_options, "-L{root}/lib");
        assert_eq!(manifest.precompile_commands, ["./generate.sh"]);

        let test_target = manifest.test_target.as_ref().unwrap();
        assert_eq!(test_target.sources, ["Tests/"]);
        assert_eq!(test_target.compiler_options, "-DTEST");
        assert_eq!(manifest.directory, Path::new("/proj"));
    }

    #[test]
    fn test_minimal_manifest_defaults() {
        let manifest =
            Manifest::parse("name: Tiny\n", Path::new("/p")).unwrap();

        assert_eq!(manifest.target_type, TargetType::Unknown);
        assert!(manifest.sources.is_empty());
        assert!(manifest.test_target.is_none());
        assert_eq!(manifest.build_dir(), Path::new("/p/build"));
        assert_eq!(manifest.vendor_dir(), Path::new("/p/vendor"));
        assert_eq!(manifest.bin_dir(), Path::new("/p/bin"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(Manifest::parse("name: X\nbogus: 1\n", Path::new("/p")).is_err());
    }

    #[test]
    fn test_validate_requires_name() {
        let manifest = Manifest::parse("name: \"\"\n", Path::new("/p")).unwrap();
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = Manifest::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ManifestError::Missing(_)));
    }
}
