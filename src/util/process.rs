//! Subprocess execution utilities.
//!
//! Every external tool (compiler frontend, linker, archiver, git, shell
//! hooks) goes through [`ProcessBuilder`]. Execution is synchronous: the
//! builder waits for process exit and captures the full output.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};

/// Builder for one synchronous subprocess invocation.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Create a process builder from a full argument vector, where the
    /// first token is the program.
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .context("empty argument vector")?;
        Ok(ProcessBuilder::new(program).args(args))
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Execute the command, waiting for exit and capturing output.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        child
            .wait_with_output()
            .with_context(|| format!("failed to wait for `{}`", self.program.display()))
    }

    /// Display the command for progress and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_captures_output() {
        let output = ProcessBuilder::new("echo").arg("hello").exec().unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("hello"));
    }

    #[test]
    fn test_from_argv() {
        let argv = vec![
            "swiftc".to_string(),
            "-o".to_string(),
            "out".to_string(),
        ];
        let pb = ProcessBuilder::from_argv(&argv).unwrap();

        assert_eq!(pb.get_program(), Path::new("swiftc"));
        assert_eq!(pb.get_args(), ["-o", "out"]);
    }

    #[test]
    fn test_from_argv_rejects_empty() {
        assert!(ProcessBuilder::from_argv(&[]).is_err());
    }

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("swiftc").args(["-emit-object", "-o", "main.o"]);

        assert_eq!(pb.display_command(), "swiftc -emit-object -o main.o");
    }

    #[test]
    fn test_cwd() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = ProcessBuilder::new("pwd")
            .cwd(tmp.path())
            .exec()
            .unwrap();

        let stdout = String::from_utf8_lossy(&output.stdout);
        let reported = std::path::Path::new(stdout.trim()).canonicalize().unwrap();
        assert_eq!(reported, tmp.path().canonicalize().unwrap());
    }
}
