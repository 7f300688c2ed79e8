//! Incremental build orchestration.
//!
//! A [`Builder`] drives the full build of one package: dependency
//! resolution and recursive sub-builds, per-module static libraries,
//! per-source object compilation with staleness checks, and the final link
//! or archive step. Execution is strictly sequential and depth-first; a
//! failure at any stage is terminal for that package and propagates to the
//! caller.

pub mod options;
pub mod toolchain;
pub mod unit;

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::builder::options::CompileOptions;
use crate::builder::toolchain::Toolchain;
use crate::builder::unit::CompileUnit;
use crate::core::manifest::Manifest;
use crate::core::package::{Module, Package};
use crate::core::target::TargetType;
use crate::util::config::BuildFlags;
use crate::util::fs::ensure_dir;
use crate::util::mtime::{is_newer_than, modification_time, source_modification_time};
use crate::util::process::ProcessBuilder;
use crate::util::shell::Shell;

/// Outcome of attempting to build a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilationStatus {
    /// Output was already current; no work done.
    Skipped,
    /// Work was done and succeeded.
    Compiled,
    /// An external tool returned nonzero.
    Failed,
}

impl fmt::Display for CompilationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CompilationStatus::Skipped => "Skipped",
            CompilationStatus::Compiled => "Compiled",
            CompilationStatus::Failed => "Failed",
        };
        f.write_str(text)
    }
}

/// A completed dependency build, carrying the resolved package so the
/// dependent builder can extract link metadata from it.
#[derive(Debug)]
pub struct DependencyBuild {
    pub status: CompilationStatus,
    pub package: Package,
}

/// Orchestrates the build of one package.
pub struct Builder<'a> {
    package: Package,
    toolchain: &'a Toolchain,
    flags: &'a BuildFlags,
    shell: &'a Shell,
    build_dir: PathBuf,
    bin_dir: PathBuf,
}

impl<'a> Builder<'a> {
    pub fn new(
        package: Package,
        toolchain: &'a Toolchain,
        flags: &'a BuildFlags,
        shell: &'a Shell,
    ) -> Self {
        let build_dir = package.build_dir();
        let bin_dir = package.bin_dir();
        Builder {
            package,
            toolchain,
            flags,
            shell,
            build_dir,
            bin_dir,
        }
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn into_package(self) -> Package {
        self.package
    }

    /// Build the package end to end.
    ///
    /// Configuration and filesystem problems are `Err`; tool failures come
    /// back as `Ok(Failed)` so a dependent build can decide what to do
    /// (today every caller aborts).
    pub fn build(&self) -> Result<CompilationStatus> {
        validate_target(&self.package)?;

        ensure_dir(&self.build_dir)?;
        ensure_dir(&self.package.vendor_dir())?;

        let dependencies = self.build_dependencies()?;
        for dependency in &dependencies {
            if dependency.status == CompilationStatus::Failed {
                self.shell.error(&format!(
                    "dependency `{}` failed to build",
                    dependency.package.name()
                ));
                return Ok(CompilationStatus::Failed);
            }
        }

        if !self.run_precompile_commands()? {
            return Ok(CompilationStatus::Failed);
        }

        let mut modules_compiled = false;
        for module in &self.package.modules {
            match self.compile_module(module)? {
                CompilationStatus::Compiled => modules_compiled = true,
                CompilationStatus::Failed => return Ok(CompilationStatus::Failed),
                CompilationStatus::Skipped => {}
            }
        }

        let options = self.assemble_options(&dependencies)?;

        match self.package.target_type() {
            TargetType::Executable => self.build_executable(&options, modules_compiled),
            TargetType::Module => self.build_library(&options, modules_compiled),
            _ => unreachable!("target type checked above"),
        }
    }

    /// Verify and recursively build declared dependencies, in declaration
    /// order. Test-only dependencies are excluded unless this package is
    /// itself a test target.
    fn build_dependencies(&self) -> Result<Vec<DependencyBuild>> {
        let vendor_dir = self.package.vendor_dir();
        let mut results = Vec::new();

        for dependency in &self.package.manifest.dependencies {
            if dependency.only_test && !self.package.for_test {
                continue;
            }

            let directory = dependency.local_path(&vendor_dir);
            if !directory.is_dir() {
                bail!(
                    "missing dependency {} (expected at {})",
                    dependency.short_name(),
                    directory.display()
                );
            }

            let manifest = Manifest::load(&directory)
                .with_context(|| format!("in dependency {}", dependency.short_name()))?;
            let package = Package::new(manifest)?;

            tracing::debug!("building dependency {}", dependency.short_name());
            let builder = Builder::new(package, self.toolchain, self.flags, self.shell);
            let status = builder.build()?;

            results.push(DependencyBuild {
                status,
                package: builder.into_package(),
            });

            // A failed dependency is terminal; siblings are not attempted.
            if status == CompilationStatus::Failed {
                break;
            }
        }

        Ok(results)
    }

    /// Run declared precompile shell commands with the package root as
    /// working directory. Output is always surfaced. A nonzero exit fails
    /// the build.
    fn run_precompile_commands(&self) -> Result<bool> {
        for command in &self.package.manifest.precompile_commands {
            self.shell.status(&format!("Running `{command}`"));

            let output = ProcessBuilder::new("sh")
                .args(["-c", command])
                .cwd(self.package.root())
                .exec()?;

            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stdout.is_empty() {
                print!("{stdout}");
            }
            if !stderr.is_empty() {
                eprint!("{stderr}");
            }

            if !output.status.success() {
                self.shell
                    .error(&format!("precompile command failed: `{command}`"));
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn library_path_for(&self, name: &str) -> PathBuf {
        self.build_dir.join(format!("lib{name}.a"))
    }

    fn interface_path_for(&self, name: &str) -> PathBuf {
        self.build_dir.join(format!("{name}.swiftmodule"))
    }

    /// Base arguments for whole-module `swiftc` invocations.
    fn common_compiler_arguments(&self) -> Vec<String> {
        let mut arguments = vec![self.toolchain.swiftc.display().to_string()];
        if let Some(sdk) = &self.toolchain.sdk_path {
            arguments.push("-sdk".to_string());
            arguments.push(sdk.trim().to_string());
        }
        arguments
    }

    /// Compile one sub-module into `lib{name}.a` plus `{name}.swiftmodule`.
    fn compile_module(&self, module: &Module) -> Result<CompilationStatus> {
        let library = self.library_path_for(&module.name);

        if !self.flags.force_rebuild {
            if let Some(library_time) = modification_time(&library) {
                if !is_newer_than(module.last_modification, library_time) {
                    tracing::debug!("module {} is up to date", module.name);
                    return Ok(CompilationStatus::Skipped);
                }
            }
        }

        let mut base = self.common_compiler_arguments();
        base.extend(module.source_files.iter().map(|s| s.display().to_string()));

        // Module interface
        let interface = self.interface_path_for(&module.name);
        let mut arguments = base.clone();
        arguments.push("-emit-module-path".to_string());
        arguments.push(interface.display().to_string());
        arguments.push("-module-name".to_string());
        arguments.push(module.name.clone());

        let status = self.shell.run_argv(
            &format!("Compiling {}... ", interface.display()),
            &arguments,
            &format!("Compiled Swift for module {} to {}", module.name, interface.display()),
        )?;
        if status != 0 {
            self.shell
                .error(&format!("failed to compile module {}", module.name));
            return Ok(CompilationStatus::Failed);
        }

        // Native object
        let temporary_object = self.build_dir.join(format!("tmp-{}.o", module.name));
        let mut arguments = base;
        arguments.extend(
            [
                "-parse-as-library",
                "-emit-object",
                "-whole-module-optimization",
                "-module-name",
            ]
            .map(String::from),
        );
        arguments.push(module.name.clone());
        arguments.push("-o".to_string());
        arguments.push(temporary_object.display().to_string());

        let status = self.shell.run_argv(
            &format!("Compiling {}... ", temporary_object.display()),
            &arguments,
            &format!(
                "Compiled object for module {} to {}",
                module.name,
                temporary_object.display()
            ),
        )?;
        if status != 0 {
            self.shell
                .error(&format!("failed to compile module {}", module.name));
            return Ok(CompilationStatus::Failed);
        }

        // Archive, then drop the temporary object
        let archive = self
            .toolchain
            .archive_argv(std::slice::from_ref(&temporary_object), &library);
        let status = self.shell.run_argv(
            &format!("Archiving {}... ", library.display()),
            &archive,
            &format!("Archived library for module {} to {}", module.name, library.display()),
        )?;
        if status != 0 {
            self.shell
                .error(&format!("failed to archive module {}", module.name));
            return Ok(CompilationStatus::Failed);
        }

        std::fs::remove_file(&temporary_object).with_context(|| {
            format!(
                "failed to remove temporary object: {}",
                temporary_object.display()
            )
        })?;

        Ok(CompilationStatus::Compiled)
    }

    /// Merge everything the root target compiles and links against into one
    /// option set: its own sources and framework paths, built modules, and
    /// each dependency's paths, libraries and custom options.
    fn assemble_options(&self, dependencies: &[DependencyBuild]) -> Result<CompileOptions<'a>> {
        let mut options = CompileOptions::new(self.toolchain, self.package.name(), &self.build_dir);
        options.set_sources(self.package.source_files.clone())?;

        for path in &self.package.manifest.framework_search_paths {
            options.framework_search_paths.push(path.clone());
            options.rpaths.push(format!("@executable_path/../{path}"));
        }

        if self.package.include_sdk_platform_in_framework_path {
            if let Some(frameworks) = self.toolchain.platform_frameworks_dir() {
                options.framework_search_paths.push(frameworks);
            }
        }
        if self.package.include_sdk_platform_in_rpath {
            if let Some(frameworks) = self.toolchain.platform_frameworks_dir() {
                options.rpaths.push(frameworks);
            }
        }

        if !self.package.modules.is_empty() {
            options.include_paths.push(self.build_dir.clone());
            options.linker_search_directories.push(self.build_dir.clone());
            for module in &self.package.modules {
                options.link_libraries.push(module.name.clone());
            }
        }

        for dependency in dependencies {
            let dependency_build_dir = dependency.package.build_dir();
            options.include_paths.push(dependency_build_dir.clone());
            options.linker_search_directories.push(dependency_build_dir);
            options.link_libraries.push(dependency.package.name().to_string());

            let root = dependency.package.root();
            options
                .custom_compiler_options
                .extend(tokenize_options(&dependency.package.compiler_options, root));
            options
                .custom_linker_options
                .extend(tokenize_options(&dependency.package.linker_options, root));
        }

        let root = self.package.root();
        options
            .custom_compiler_options
            .extend(tokenize_options(&self.package.compiler_options, root));
        options
            .custom_linker_options
            .extend(tokenize_options(&self.package.linker_options, root));

        Ok(options)
    }

    /// Compile stale sources and link the final executable.
    fn build_executable(
        &self,
        options: &CompileOptions,
        modules_compiled: bool,
    ) -> Result<CompilationStatus> {
        ensure_dir(&self.bin_dir)?;

        let bin_name = self
            .package
            .bin_file_name
            .as_ref()
            .context("executable package has no binary name")?;
        let bin_path = self.bin_dir.join(bin_name);
        let bin_time = modification_time(&bin_path);

        let mut compiled_any = false;
        for source in options.source_files() {
            let object = options.object_file_for(source)?;

            let stale = match bin_time {
                None => true,
                Some(time) => {
                    self.flags.force_rebuild
                        || modification_time(object).is_none()
                        || is_newer_than(source_modification_time(source)?, time)
                }
            };
            if !stale {
                tracing::debug!("source {} is up to date", source.display());
                continue;
            }

            let others: Vec<PathBuf> = options
                .source_files()
                .iter()
                .filter(|s| *s != source)
                .cloned()
                .collect();

            let unit = CompileUnit::new(options, source, others, object);
            let status = unit.compile(self.shell)?;
            if status != 0 {
                self.shell
                    .error(&format!("failed to compile {}", source.display()));
                return Ok(CompilationStatus::Failed);
            }
            compiled_any = true;
        }

        if !compiled_any && !modules_compiled && !self.flags.force_rebuild {
            return Ok(CompilationStatus::Skipped);
        }

        let status = self.link_executable(options, &bin_path)?;
        if status != 0 {
            self.shell
                .error(&format!("failed to link {}", bin_path.display()));
            return Ok(CompilationStatus::Failed);
        }

        Ok(CompilationStatus::Compiled)
    }

    fn link_executable(&self, options: &CompileOptions, bin_path: &Path) -> Result<i32> {
        let mut arguments = vec![self.toolchain.linker.display().to_string()];

        arguments.extend(options.object_files().iter().map(|o| o.display().to_string()));

        for rpath in &options.rpaths {
            arguments.push("-rpath".to_string());
            arguments.push(rpath.clone());
        }
        for framework in &options.framework_search_paths {
            arguments.push("-F".to_string());
            arguments.push(framework.clone());
        }
        for directory in &options.linker_search_directories {
            arguments.push("-L".to_string());
            arguments.push(directory.display().to_string());
        }
        for library in &options.link_libraries {
            arguments.push(format!("-l{library}"));
        }
        arguments.extend(options.custom_linker_options.iter().cloned());
        arguments.extend(self.toolchain.linker_tail_args());

        arguments.push("-o".to_string());
        arguments.push(bin_path.display().to_string());

        self.shell.run_argv(
            &format!("Linking {}... ", bin_path.display()),
            &arguments,
            &format!("Compiled {} to {}", self.package.name(), bin_path.display()),
        )
    }

    /// Compile stale sources, archive them into a static library, and emit
    /// the package's module-interface file.
    fn build_library(
        &self,
        options: &CompileOptions,
        modules_compiled: bool,
    ) -> Result<CompilationStatus> {
        let interface = self.interface_path_for(self.package.name());
        let interface_time = modification_time(&interface);

        // The interface is emitted once for the whole source set, so the
        // skip check is package-wide.
        let current = match interface_time {
            Some(time) => !is_newer_than(self.package.last_modification, time),
            None => false,
        };
        if current && !modules_compiled && !self.flags.force_rebuild {
            return Ok(CompilationStatus::Skipped);
        }

        for source in options.source_files() {
            let object = options.object_file_for(source)?;

            let stale = match interface_time {
                None => true,
                Some(time) => {
                    self.flags.force_rebuild
                        || modification_time(object).is_none()
                        || is_newer_than(source_modification_time(source)?, time)
                }
            };
            if !stale {
                continue;
            }

            let others: Vec<PathBuf> = options
                .source_files()
                .iter()
                .filter(|s| *s != source)
                .cloned()
                .collect();

            let unit = CompileUnit::new(options, source, others, object);
            let status = unit.compile(self.shell)?;
            if status != 0 {
                self.shell
                    .error(&format!("failed to compile {}", source.display()));
                return Ok(CompilationStatus::Failed);
            }
        }

        let library = self.library_path_for(self.package.name());
        let archive = self.toolchain.archive_argv(&options.object_files(), &library);
        let status = self.shell.run_argv(
            &format!("Archiving {}... ", library.display()),
            &archive,
            &format!("Created {} archive at {}", self.package.name(), library.display()),
        )?;
        if status != 0 {
            self.shell
                .error(&format!("failed to archive {}", library.display()));
            return Ok(CompilationStatus::Failed);
        }

        let status = self.emit_module_interface(options, &interface)?;
        if status != 0 {
            self.shell
                .error(&format!("failed to emit module {}", interface.display()));
            return Ok(CompilationStatus::Failed);
        }

        Ok(CompilationStatus::Compiled)
    }

    /// Whole-source `swiftc` invocation producing the interface file. Takes
    /// the merged search-path and link options so the interface captures
    /// the module's external dependencies.
    fn emit_module_interface(&self, options: &CompileOptions, interface: &Path) -> Result<i32> {
        let mut arguments = self.common_compiler_arguments();
        arguments.extend(options.source_files().iter().map(|s| s.display().to_string()));

        for include in &options.include_paths {
            arguments.push("-I".to_string());
            arguments.push(include.display().to_string());
        }
        for framework in &options.framework_search_paths {
            arguments.push("-F".to_string());
            arguments.push(framework.clone());
        }
        for directory in &options.linker_search_directories {
            arguments.push("-L".to_string());
            arguments.push(directory.display().to_string());
        }
        for library in &options.link_libraries {
            arguments.push(format!("-l{library}"));
        }
        arguments.extend(options.custom_compiler_options.iter().cloned());

        arguments.push("-emit-module-path".to_string());
        arguments.push(interface.display().to_string());
        arguments.push("-module-name".to_string());
        arguments.push(self.package.name().to_string());

        self.shell.run_argv(
            &format!("Compiling {}... ", interface.display()),
            &arguments,
            &format!("Created {} module at {}", self.package.name(), interface.display()),
        )
    }
}

/// Check that a package's target type is buildable. Only executables and
/// modules can be built; anything else is a configuration error.
pub fn validate_target(package: &Package) -> Result<()> {
    match package.target_type() {
        TargetType::Executable | TargetType::Module => Ok(()),
        other => bail!(
            "cannot build package `{}` with {} target type",
            package.name(),
            other
        ),
    }
}

/// Tokenize a free-form option string, substituting the `{root}` placeholder
/// with the given package root.
fn tokenize_options(raw: &str, root: &Path) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let root = root
        .canonicalize()
        .unwrap_or_else(|_| root.to_path_buf());
    let substituted = raw.replace("{root}", &root.display().to_string());

    substituted
        .trim()
        .split_whitespace()
        .map(String::from)
        .collect()
}
