//! Dependency descriptors.
//!
//! A dependency is declared by its GitHub shorthand (`owner/repo`) and is
//! expected to already exist under the package's vendor directory when the
//! build runs. Fetching is the `update` command's job, not the builder's.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// One declared dependency.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DependencyConfig {
    /// GitHub shorthand, `owner/repo`.
    pub github: String,

    /// Only built when the package itself is a test target.
    #[serde(default)]
    pub only_test: bool,
}

impl DependencyConfig {
    /// The final path component of the shorthand; doubles as the link
    /// library / module name.
    pub fn short_name(&self) -> &str {
        self.github.rsplit('/').next().unwrap_or(&self.github)
    }

    /// Clone URL for the dependency.
    pub fn source_url(&self) -> String {
        format!("https://github.com/{}.git", self.github)
    }

    /// Where this dependency lives under a vendor directory.
    pub fn local_path(&self, vendor_dir: &Path) -> PathBuf {
        vendor_dir.join(self.short_name())
    }

    /// Argument vector that fetches this dependency into `directory`.
    pub fn clone_argv(&self, directory: &Path) -> Vec<String> {
        vec![
            "git".to_string(),
            "clone".to_string(),
            "-q".to_string(),
            self.source_url(),
            directory.display().to_string(),
        ]
    }

    /// Argument vector that updates an existing checkout (run with the
    /// checkout as working directory).
    pub fn pull_argv(&self) -> Vec<String> {
        vec![
            "git".to_string(),
            "pull".to_string(),
            "-q".to_string(),
            "origin".to_string(),
            "master".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(github: &str) -> DependencyConfig {
        DependencyConfig {
            github: github.to_string(),
            only_test: false,
        }
    }

    #[test]
    fn test_short_name() {
        assert_eq!(dep("owner/helper").short_name(), "helper");
    }

    #[test]
    fn test_source_url() {
        assert_eq!(
            dep("owner/helper").source_url(),
            "https://github.com/owner/helper.git"
        );
    }

    #[test]
    fn test_local_path() {
        assert_eq!(
            dep("owner/helper").local_path(Path::new("/proj/vendor")),
            Path::new("/proj/vendor/helper")
        );
    }

    #[test]
    fn test_clone_argv() {
        let argv = dep("owner/helper").clone_argv(Path::new("/proj/vendor/helper"));
        assert_eq!(argv[0], "git");
        assert_eq!(argv[1], "clone");
        assert!(argv.contains(&"https://github.com/owner/helper.git".to_string()));
    }
}
