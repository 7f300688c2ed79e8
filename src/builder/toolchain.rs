//! Toolchain detection.
//!
//! All external tool locations and SDK paths are resolved once, up front,
//! into an immutable value that the builder borrows. Nothing here is lazy
//! or global.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::process::{find_executable, ProcessBuilder};

/// Resolved compiler, linker and SDK locations for one build invocation.
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// Swift frontend driver (`swift -frontend -c` invocations).
    pub swift: PathBuf,

    /// Whole-module compiler (`swiftc`).
    pub swiftc: PathBuf,

    /// Static-library archiver (`libtool` or `ar`).
    pub archiver: PathBuf,

    /// Linker (`ld`).
    pub linker: PathBuf,

    /// SDK root, if the platform has one.
    pub sdk_path: Option<String>,

    /// SDK platform directory, if the platform has one.
    pub sdk_platform_path: Option<String>,

    /// Target triple passed to the frontend.
    pub target_triple: String,

    /// Architecture passed to the linker.
    pub arch: String,
}

impl Toolchain {
    /// Locate tools and SDK paths for this machine.
    pub fn detect() -> Result<Toolchain> {
        let swift = find_executable("swift").context("could not find `swift` in PATH")?;
        let swiftc = find_executable("swiftc").context("could not find `swiftc` in PATH")?;
        let archiver = find_executable("libtool")
            .or_else(|| find_executable("ar"))
            .context("could not find `libtool` or `ar` in PATH")?;
        let linker = find_executable("ld").context("could not find `ld` in PATH")?;

        let sdk_path = query_xcrun("--show-sdk-path");
        let sdk_platform_path = query_xcrun("--show-sdk-platform-path");

        let arch = std::env::consts::ARCH.to_string();
        let target_triple = if cfg!(target_os = "macos") {
            format!("{arch}-apple-macosx10.10")
        } else {
            format!("{arch}-unknown-linux-gnu")
        };

        Ok(Toolchain {
            swift,
            swiftc,
            archiver,
            linker,
            sdk_path,
            sdk_platform_path,
            target_triple,
            arch,
        })
    }

    /// Framework directory inside the SDK platform, if known.
    pub fn platform_frameworks_dir(&self) -> Option<String> {
        self.sdk_platform_path
            .as_ref()
            .map(|p| format!("{p}/Developer/Library/Frameworks"))
    }

    /// Swift runtime library directory next to the compiler, if resolvable.
    pub fn swift_lib_dir(&self) -> Option<PathBuf> {
        let platform = if cfg!(target_os = "macos") {
            "macosx"
        } else {
            "linux"
        };
        Some(
            self.swiftc
                .parent()?
                .parent()?
                .join("lib")
                .join("swift")
                .join(platform),
        )
    }

    /// Argument vector for archiving objects into a static library.
    ///
    /// `libtool` and `ar` want different shapes; pick by tool name.
    pub fn archive_argv(&self, objects: &[PathBuf], output: &Path) -> Vec<String> {
        let program = self.archiver.display().to_string();
        let is_libtool = self
            .archiver
            .file_name()
            .map(|n| n.to_string_lossy().contains("libtool"))
            .unwrap_or(false);

        let mut argv = vec![program];
        if is_libtool {
            argv.push("-o".to_string());
            argv.push(output.display().to_string());
        } else {
            argv.push("crs".to_string());
            argv.push(output.display().to_string());
        }
        argv.extend(objects.iter().map(|o| o.display().to_string()));
        argv
    }

    /// Fixed platform/architecture tail arguments for the link step.
    pub fn linker_tail_args(&self) -> Vec<String> {
        let mut args = vec!["-arch".to_string(), self.arch.clone()];

        if let Some(sdk) = &self.sdk_path {
            args.push("-syslibroot".to_string());
            args.push(sdk.clone());
        }
        if let Some(lib_dir) = self.swift_lib_dir() {
            args.push("-L".to_string());
            args.push(lib_dir.display().to_string());
        }
        args
    }
}

fn query_xcrun(flag: &str) -> Option<String> {
    let xcrun = find_executable("xcrun")?;
    let output = ProcessBuilder::new(xcrun).arg(flag).exec().ok()?;

    if !output.status.success() {
        return None;
    }
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_toolchain(archiver: &str) -> Toolchain {
        Toolchain {
            swift: PathBuf::from("/tc/bin/swift"),
            swiftc: PathBuf::from("/tc/bin/swiftc"),
            archiver: PathBuf::from(archiver),
            linker: PathBuf::from("/usr/bin/ld"),
            sdk_path: Some("/sdk".to_string()),
            sdk_platform_path: Some("/platform".to_string()),
            target_triple: "x86_64-apple-macosx10.10".to_string(),
            arch: "x86_64".to_string(),
        }
    }

    #[test]
    fn test_archive_argv_libtool() {
        let tc = fake_toolchain("/usr/bin/libtool");
        let argv = tc.archive_argv(
            &[PathBuf::from("a.o"), PathBuf::from("b.o")],
            Path::new("libCore.a"),
        );

        assert_eq!(argv, ["/usr/bin/libtool", "-o", "libCore.a", "a.o", "b.o"]);
    }

    #[test]
    fn test_archive_argv_ar() {
        let tc = fake_toolchain("/usr/bin/ar");
        let argv = tc.archive_argv(&[PathBuf::from("a.o")], Path::new("libCore.a"));

        assert_eq!(argv, ["/usr/bin/ar", "crs", "libCore.a", "a.o"]);
    }

    #[test]
    fn test_platform_frameworks_dir() {
        let tc = fake_toolchain("/usr/bin/ar");
        assert_eq!(
            tc.platform_frameworks_dir().unwrap(),
            "/platform/Developer/Library/Frameworks"
        );
    }

    #[test]
    fn test_linker_tail_includes_syslibroot() {
        let tc = fake_toolchain("/usr/bin/ar");
        let tail = tc.linker_tail_args();

        assert_eq!(tail[0], "-arch");
        assert!(tail.contains(&"-syslibroot".to_string()));
        assert!(tail.contains(&"/sdk".to_string()));
    }
}
