//! Single-source compilation units.
//!
//! The frontend compiles one "primary" file at a time but must see every
//! sibling source in the module to resolve cross-file symbols, so a unit
//! carries the full source set and marks exactly one file as primary.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::options::CompileOptions;
use crate::util::shell::Shell;

/// One primary-file compile: source plus siblings in, object out.
pub struct CompileUnit<'a> {
    options: &'a CompileOptions<'a>,
    primary_source: PathBuf,
    other_sources: Vec<PathBuf>,
    target_object: PathBuf,
}

impl<'a> CompileUnit<'a> {
    pub fn new(
        options: &'a CompileOptions<'a>,
        primary_source: &Path,
        other_sources: Vec<PathBuf>,
        target_object: &Path,
    ) -> Self {
        CompileUnit {
            options,
            primary_source: primary_source.to_path_buf(),
            other_sources,
            target_object: target_object.to_path_buf(),
        }
    }

    /// Run the frontend for this unit and return its exit status.
    ///
    /// Zero means the object was produced; interpretation of nonzero is the
    /// caller's job (in practice, immediately fatal).
    pub fn compile(&self, shell: &Shell) -> Result<i32> {
        let mut framing: Vec<String> = self
            .other_sources
            .iter()
            .map(|s| s.display().to_string())
            .collect();
        framing.push("-primary-file".to_string());
        framing.push(self.primary_source.display().to_string());

        let mut arguments = self.options.frontend_arguments(&framing);
        arguments.push("-o".to_string());
        arguments.push(self.target_object.display().to_string());

        let file_name = self
            .primary_source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.primary_source.display().to_string());

        shell.run_argv(
            &format!("Compiling {file_name}... "),
            &arguments,
            &format!("Compiled {file_name}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::toolchain::Toolchain;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_argument_framing() {
        let tmp = TempDir::new().unwrap();
        let tc = Toolchain {
            swift: PathBuf::from("/tc/swift"),
            swiftc: PathBuf::from("/tc/swiftc"),
            archiver: PathBuf::from("/usr/bin/ar"),
            linker: PathBuf::from("/usr/bin/ld"),
            sdk_path: None,
            sdk_platform_path: None,
            target_triple: "x86_64-unknown-linux-gnu".to_string(),
            arch: "x86_64".to_string(),
        };

        let main = tmp.path().join("main.swift");
        let lib = tmp.path().join("lib.swift");
        fs::write(&main, "m").unwrap();
        fs::write(&lib, "l").unwrap();

        let mut options = CompileOptions::new(&tc, "Demo", tmp.path());
        options.set_sources(vec![main.clone(), lib.clone()]).unwrap();

        let object = options.object_file_for(&main).unwrap().to_path_buf();
        let unit = CompileUnit::new(&options, &main, vec![lib.clone()], &object);

        // Reconstruct the argv the unit would run (the framing goes right
        // after -c, the output flag goes last).
        let mut framing = vec![lib.display().to_string()];
        framing.push("-primary-file".to_string());
        framing.push(main.display().to_string());
        let mut expected = options.frontend_arguments(&framing);
        expected.push("-o".to_string());
        expected.push(object.display().to_string());

        assert_eq!(expected[3], lib.display().to_string());
        assert_eq!(expected[4], "-primary-file");
        assert_eq!(expected[5], main.display().to_string());
        assert_eq!(expected[expected.len() - 2], "-o");
        assert_eq!(expected.last().unwrap(), &object.display().to_string());

        // Unit fields line up with the same framing.
        assert_eq!(unit.primary_source, main);
        assert_eq!(unit.other_sources, vec![lib]);
        assert_eq!(unit.target_object, object);
    }
}
