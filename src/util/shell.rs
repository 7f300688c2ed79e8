//! Progress reporting around external tool invocations.
//!
//! The shell is the sole boundary to the external toolchain: it announces a
//! step, runs one command synchronously, surfaces whatever the tool printed,
//! and hands the raw exit status back to the caller. It never decides
//! success or failure itself.

use std::io::{self, Write};

use anyhow::Result;

use crate::util::process::ProcessBuilder;

/// ANSI sequence that returns to column zero and clears the line.
const ERASE_LINE: &str = "\r\x1b[2K";

/// Announce-and-run reporter for external commands.
#[derive(Debug, Clone, Copy)]
pub struct Shell {
    verbose: bool,
}

impl Shell {
    pub fn new(verbose: bool) -> Self {
        Shell { verbose }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Run one external command.
    ///
    /// Non-verbose mode prints `announcement` without a trailing newline,
    /// executes the command, then either erases the announcement and prints
    /// `finished` (quiet tool) or drops to a new line and prints the tool's
    /// output verbatim. Verbose mode prints the announcement and the full
    /// argument vector up front. Tool diagnostics are never swallowed.
    ///
    /// Returns the process exit status; interpretation is the caller's job.
    pub fn run(&self, announcement: &str, cmd: &ProcessBuilder, finished: &str) -> Result<i32> {
        if self.verbose {
            println!("{}", announcement.trim_end());
            println!("{}", cmd.display_command());
        } else {
            print!("{}", announcement);
            io::stdout().flush().ok();
        }

        let output = cmd.exec()?;

        let mut captured = String::new();
        captured.push_str(&String::from_utf8_lossy(&output.stdout));
        captured.push_str(&String::from_utf8_lossy(&output.stderr));

        if self.verbose {
            if !captured.is_empty() {
                print!("{}", captured);
                io::stdout().flush().ok();
            }
        } else if captured.is_empty() {
            print!("{}", ERASE_LINE);
            println!("{}", finished);
        } else {
            println!();
            print!("{}", captured);
            io::stdout().flush().ok();
        }

        // A signal death has no exit code; report it as failure.
        Ok(output.status.code().unwrap_or(-1))
    }

    /// Run a command given as a full argument vector (program first).
    pub fn run_argv(&self, announcement: &str, argv: &[String], finished: &str) -> Result<i32> {
        let cmd = ProcessBuilder::from_argv(argv)?;
        self.run(announcement, &cmd, finished)
    }

    /// Print an error line to standard error.
    pub fn error(&self, message: &str) {
        eprintln!("{}", message);
    }

    /// Print a status line to standard output.
    pub fn status(&self, message: &str) {
        println!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_returns_zero_on_success() {
        let shell = Shell::new(false);
        let cmd = ProcessBuilder::new("true");

        let status = shell.run("Running... ", &cmd, "Ran").unwrap();
        assert_eq!(status, 0);
    }

    #[test]
    fn test_run_returns_nonzero_on_failure() {
        let shell = Shell::new(false);
        let cmd = ProcessBuilder::new("false");

        let status = shell.run("Running... ", &cmd, "Ran").unwrap();
        assert_ne!(status, 0);
    }

    #[test]
    fn test_run_verbose_still_returns_status() {
        let shell = Shell::new(true);
        let cmd = ProcessBuilder::new("echo").arg("diagnostics");

        let status = shell.run("Running... ", &cmd, "Ran").unwrap();
        assert_eq!(status, 0);
    }

    #[test]
    fn test_run_argv() {
        let shell = Shell::new(false);
        let argv = vec!["true".to_string()];

        let status = shell.run_argv("Running... ", &argv, "Ran").unwrap();
        assert_eq!(status, 0);
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let shell = Shell::new(false);
        let cmd = ProcessBuilder::new("/no/such/tool");

        assert!(shell.run("Running... ", &cmd, "Ran").is_err());
    }
}
