//! Resolved package and module views.
//!
//! A [`Package`] is the builder's read-only input: the manifest plus its
//! source entries expanded to concrete files and reduced to a newest
//! modification time. Construction happens once per build invocation; the
//! source list is immutable afterwards.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{bail, Context, Result};

use crate::core::manifest::{Manifest, ModuleConfig};
use crate::core::sources::resolve_sources;
use crate::core::target::TargetType;
use crate::util::mtime::latest_modification;

/// The test entry-point file name.
const ENTRY_POINT: &str = "main.swift";

/// One buildable unit.
#[derive(Debug, Clone)]
pub struct Package {
    pub manifest: Manifest,

    /// Resolved, ordered source files.
    pub source_files: Vec<PathBuf>,

    /// Newest modification time over all source files.
    pub last_modification: SystemTime,

    /// Resolved sub-modules, compiled before the root sources.
    pub modules: Vec<Module>,

    /// Effective compiler options (base plus test options for test builds).
    pub compiler_options: String,

    /// Effective linker options.
    pub linker_options: String,

    /// Executable file name, `None` for library targets.
    pub bin_file_name: Option<String>,

    /// Alters dependency filtering and option assembly for `roost test`.
    pub for_test: bool,

    /// Add the SDK platform frameworks directory to loader rpaths.
    pub include_sdk_platform_in_rpath: bool,

    /// Add the SDK platform frameworks directory to framework search paths.
    pub include_sdk_platform_in_framework_path: bool,
}

/// A named sub-unit of a package, compiled independently into a static
/// library and a module-interface file.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub source_files: Vec<PathBuf>,
    pub last_modification: SystemTime,
}

impl Module {
    fn resolve(config: &ModuleConfig, root: &Path) -> Result<Module> {
        let source_files = resolve_sources(root, &config.sources)
            .with_context(|| format!("in module `{}`", config.name))?;
        let last_modification = latest_modification(&source_files)
            .with_context(|| format!("module `{}` has no sources", config.name))?;

        Ok(Module {
            name: config.name.clone(),
            source_files,
            last_modification,
        })
    }
}

impl Package {
    /// Resolve a manifest into a buildable package.
    pub fn new(manifest: Manifest) -> Result<Package> {
        manifest.validate()?;

        let source_files = resolve_sources(&manifest.directory, &manifest.sources)?;
        let last_modification = latest_modification(&source_files)
            .with_context(|| format!("package `{}` has no sources", manifest.name))?;

        let modules = manifest
            .modules
            .iter()
            .map(|m| Module::resolve(m, &manifest.directory))
            .collect::<Result<Vec<_>>>()?;

        let bin_file_name = match manifest.target_type {
            TargetType::Executable => Some(manifest.name.to_lowercase()),
            _ => None,
        };

        Ok(Package {
            compiler_options: manifest.compiler_options.clone(),
            linker_options: manifest.linker_options.clone(),
            source_files,
            last_modification,
            modules,
            bin_file_name,
            for_test: false,
            include_sdk_platform_in_rpath: false,
            include_sdk_platform_in_framework_path: false,
            manifest,
        })
    }

    /// Resolve a manifest's test target into a buildable package.
    ///
    /// The test build is always an executable, whatever the package's own
    /// target type: the primary entry-point file is excluded and exactly
    /// one `main.swift` among the test sources takes its place.
    pub fn for_test(mut manifest: Manifest) -> Result<Package> {
        manifest.validate()?;

        let test_target = match &manifest.test_target {
            Some(t) => t.clone(),
            None => bail!("package `{}` has no test target", manifest.name),
        };
        manifest.target_type = TargetType::Executable;

        let primary: Vec<PathBuf> = resolve_sources(&manifest.directory, &manifest.sources)?
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .map(|name| name != ENTRY_POINT)
                    .unwrap_or(true)
            })
            .collect();
        let test_files = resolve_sources(&manifest.directory, &test_target.sources)?;

        let entry_points = test_files
            .iter()
            .filter(|path| {
                path.file_name()
                    .map(|name| name == ENTRY_POINT)
                    .unwrap_or(false)
            })
            .count();
        if entry_points != 1 {
            bail!(
                "test target of `{}` must contain exactly one {ENTRY_POINT} (found {entry_points})",
                manifest.name
            );
        }

        let mut source_files = primary;
        source_files.extend(test_files);

        let last_modification = latest_modification(&source_files)
            .with_context(|| format!("test target of `{}` has no sources", manifest.name))?;

        let modules = manifest
            .modules
            .iter()
            .map(|m| Module::resolve(m, &manifest.directory))
            .collect::<Result<Vec<_>>>()?;

        let compiler_options = join_options(&manifest.compiler_options, &test_target.compiler_options);
        let linker_options = join_options(&manifest.linker_options, &test_target.linker_options);
        let bin_file_name = Some(format!("test-{}", manifest.name.to_lowercase()));

        Ok(Package {
            compiler_options,
            linker_options,
            source_files,
            last_modification,
            modules,
            bin_file_name,
            for_test: true,
            include_sdk_platform_in_rpath: true,
            include_sdk_platform_in_framework_path: true,
            manifest,
        })
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn target_type(&self) -> TargetType {
        self.manifest.target_type
    }

    pub fn root(&self) -> &Path {
        &self.manifest.directory
    }

    pub fn build_dir(&self) -> PathBuf {
        self.manifest.build_dir()
    }

    pub fn vendor_dir(&self) -> PathBuf {
        self.manifest.vendor_dir()
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.manifest.bin_dir()
    }
}

fn join_options(base: &str, extra: &str) -> String {
    if extra.is_empty() {
        base.to_string()
    } else if base.is_empty() {
        extra.to_string()
    } else {
        format!("{} {}", base, extra)
    }
}
