//! Compiler and linker option accumulation.
//!
//! `CompileOptions` is the per-builder mutable state: include paths,
//! framework paths, link inputs, custom tokens, and the mapping from each
//! source file to its content-addressed object path. Argument order is
//! significant everywhere here; some frontends resolve flag overrides by
//! position, and the linker resolves symbols in argument order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::builder::toolchain::Toolchain;
use crate::util::hash::short_content_hash;

/// Accumulator for compiler/linker arguments of one build.
#[derive(Debug)]
pub struct CompileOptions<'a> {
    toolchain: &'a Toolchain,
    module_name: String,
    build_dir: PathBuf,

    /// Include search paths (`-I`).
    pub include_paths: Vec<PathBuf>,

    /// Framework search paths (`-F`).
    pub framework_search_paths: Vec<String>,

    /// Raw compiler tokens, passed verbatim in order.
    pub custom_compiler_options: Vec<String>,

    /// Loader rpaths for the link step.
    pub rpaths: Vec<String>,

    /// Library search directories (`-L`).
    pub linker_search_directories: Vec<PathBuf>,

    /// Libraries to link (`-l{name}`).
    pub link_libraries: Vec<String>,

    /// Raw linker tokens, passed verbatim in order.
    pub custom_linker_options: Vec<String>,

    source_files: Vec<PathBuf>,
    source_to_object: HashMap<PathBuf, PathBuf>,
}

impl<'a> CompileOptions<'a> {
    pub fn new(toolchain: &'a Toolchain, module_name: &str, build_dir: &Path) -> Self {
        CompileOptions {
            toolchain,
            module_name: module_name.to_string(),
            build_dir: build_dir.to_path_buf(),
            include_paths: Vec::new(),
            framework_search_paths: Vec::new(),
            custom_compiler_options: Vec::new(),
            rpaths: Vec::new(),
            linker_search_directories: Vec::new(),
            link_libraries: Vec::new(),
            custom_linker_options: Vec::new(),
            source_files: Vec::new(),
            source_to_object: HashMap::new(),
        }
    }

    /// Replace the tracked source list and recompute the object map.
    ///
    /// Each object path is `{build}/{file_name}-{hash6}.o`, where the hash
    /// is a 6-hex-char prefix of the SHA-256 of the file content. Same-named
    /// files from different directories get distinct objects, and editing a
    /// file moves its object path even when mtime is ambiguous.
    pub fn set_sources(&mut self, sources: Vec<PathBuf>) -> Result<()> {
        let mut map = HashMap::with_capacity(sources.len());

        for source in &sources {
            map.insert(source.clone(), self.object_path(source)?);
        }

        self.source_files = sources;
        self.source_to_object = map;
        Ok(())
    }

    fn object_path(&self, source: &Path) -> Result<PathBuf> {
        let file_name = match source.file_name() {
            Some(name) => name.to_string_lossy(),
            None => bail!("source path has no file name: {}", source.display()),
        };
        let hash = short_content_hash(source)?;

        Ok(self.build_dir.join(format!("{file_name}-{hash}.o")))
    }

    pub fn source_files(&self) -> &[PathBuf] {
        &self.source_files
    }

    /// Object paths for all tracked sources, in source order.
    pub fn object_files(&self) -> Vec<PathBuf> {
        self.source_files
            .iter()
            .filter_map(|s| self.source_to_object.get(s).cloned())
            .collect()
    }

    /// Object path for one registered source.
    ///
    /// An unregistered source is a contract violation by the caller, not a
    /// user error.
    pub fn object_file_for(&self, source: &Path) -> Result<&Path> {
        match self.source_to_object.get(source) {
            Some(object) => Ok(object),
            None => bail!("object file not found for source file: {}", source.display()),
        }
    }

    /// Assemble the frontend argument vector, program token first.
    ///
    /// `extra` is injected right after the `-c` flag; compilation units use
    /// it for the sibling-sources-plus-primary-file framing. The remaining
    /// order is fixed and must stay that way: later flags win for
    /// order-sensitive frontends.
    pub fn frontend_arguments(&self, extra: &[String]) -> Vec<String> {
        let mut arguments = vec![
            self.toolchain.swift.display().to_string(),
            "-frontend".to_string(),
            "-c".to_string(),
        ];

        arguments.extend(extra.iter().cloned());

        arguments.push("-target".to_string());
        arguments.push(self.toolchain.target_triple.clone());
        arguments.push("-enable-objc-interop".to_string());

        if let Some(sdk) = &self.toolchain.sdk_path {
            arguments.push("-sdk".to_string());
            arguments.push(sdk.clone());
        }
        if let Some(frameworks) = self.toolchain.platform_frameworks_dir() {
            arguments.push("-F".to_string());
            arguments.push(frameworks);
        }

        for include in &self.include_paths {
            arguments.push("-I".to_string());
            arguments.push(include.display().to_string());
        }
        for framework in &self.framework_search_paths {
            arguments.push("-F".to_string());
            arguments.push(framework.clone());
        }

        arguments.extend(self.custom_compiler_options.iter().cloned());

        arguments.push("-color-diagnostics".to_string());
        arguments.push("-module-name".to_string());
        arguments.push(self.module_name.clone());

        arguments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn toolchain() -> Toolchain {
        Toolchain {
            swift: PathBuf::from("/tc/swift"),
            swiftc: PathBuf::from("/tc/swiftc"),
            archiver: PathBuf::from("/usr/bin/ar"),
            linker: PathBuf::from("/usr/bin/ld"),
            sdk_path: Some("/sdk".to_string()),
            sdk_platform_path: Some("/platform".to_string()),
            target_triple: "x86_64-apple-macosx10.10".to_string(),
            arch: "x86_64".to_string(),
        }
    }

    #[test]
    fn test_object_paths_are_content_addressed() {
        let tmp = TempDir::new().unwrap();
        let tc = toolchain();
        let build = tmp.path().join("build");

        let a = tmp.path().join("one/main.swift");
        let b = tmp.path().join("two/main.swift");
        fs::create_dir_all(a.parent().unwrap()).unwrap();
        fs::create_dir_all(b.parent().unwrap()).unwrap();
        fs::write(&a, "print(1)").unwrap();
        fs::write(&b, "print(2)").unwrap();

        let mut options = CompileOptions::new(&tc, "Demo", &build);
        options.set_sources(vec![a.clone(), b.clone()]).unwrap();

        let obj_a = options.object_file_for(&a).unwrap().to_path_buf();
        let obj_b = options.object_file_for(&b).unwrap().to_path_buf();

        // Same file name, different content, distinct objects.
        assert_ne!(obj_a, obj_b);
        assert!(obj_a.file_name().unwrap().to_string_lossy().starts_with("main.swift-"));
        assert!(obj_a.to_string_lossy().ends_with(".o"));
    }

    #[test]
    fn test_object_path_stable_until_content_changes() {
        let tmp = TempDir::new().unwrap();
        let tc = toolchain();
        let build = tmp.path().join("build");
        let source = tmp.path().join("main.swift");
        fs::write(&source, "print(1)").unwrap();

        let mut options = CompileOptions::new(&tc, "Demo", &build);
        options.set_sources(vec![source.clone()]).unwrap();
        let first = options.object_file_for(&source).unwrap().to_path_buf();

        options.set_sources(vec![source.clone()]).unwrap();
        assert_eq!(options.object_file_for(&source).unwrap(), first);

        fs::write(&source, "print(2)").unwrap();
        options.set_sources(vec![source.clone()]).unwrap();
        assert_ne!(options.object_file_for(&source).unwrap(), first);
    }

    #[test]
    fn test_unregistered_source_is_contract_error() {
        let tmp = TempDir::new().unwrap();
        let tc = toolchain();
        let options = CompileOptions::new(&tc, "Demo", tmp.path());

        assert!(options.object_file_for(Path::new("ghost.swift")).is_err());
    }

    #[test]
    fn test_object_files_in_source_order() {
        let tmp = TempDir::new().unwrap();
        let tc = toolchain();
        let build = tmp.path().join("build");

        let a = tmp.path().join("a.swift");
        let b = tmp.path().join("b.swift");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();

        let mut options = CompileOptions::new(&tc, "Demo", &build);
        options.set_sources(vec![b.clone(), a.clone()]).unwrap();

        let objects = options.object_files();
        assert_eq!(objects.len(), 2);
        assert!(objects[0].to_string_lossy().contains("b.swift-"));
        assert!(objects[1].to_string_lossy().contains("a.swift-"));
    }

    #[test]
    fn test_frontend_argument_order() {
        let tmp = TempDir::new().unwrap();
        let tc = toolchain();
        let mut options = CompileOptions::new(&tc, "Demo", tmp.path());

        options.include_paths.push(PathBuf::from("build"));
        options.framework_search_paths.push("Frameworks".to_string());
        options.custom_compiler_options.push("-g".to_string());

        let args = options.frontend_arguments(&["extra.swift".to_string()]);

        assert_eq!(args[0], "/tc/swift");
        assert_eq!(args[1], "-frontend");
        assert_eq!(args[2], "-c");
        assert_eq!(args[3], "extra.swift");

        let target = args.iter().position(|a| a == "-target").unwrap();
        let sdk = args.iter().position(|a| a == "-sdk").unwrap();
        let include = args.iter().position(|a| a == "-I").unwrap();
        let custom = args.iter().position(|a| a == "-g").unwrap();
        let module = args.iter().position(|a| a == "-module-name").unwrap();

        assert!(target < sdk);
        assert!(sdk < include);
        assert!(include < custom);
        assert!(custom < module);
        assert_eq!(args[module + 1], "Demo");
        assert_eq!(args.last().unwrap(), "Demo");
    }

    #[test]
    fn test_frontend_arguments_without_sdk() {
        let tmp = TempDir::new().unwrap();
        let mut tc = toolchain();
        tc.sdk_path = None;
        tc.sdk_platform_path = None;

        let options = CompileOptions::new(&tc, "Demo", tmp.path());
        let args = options.frontend_arguments(&[]);

        assert!(!args.contains(&"-sdk".to_string()));
    }
}
