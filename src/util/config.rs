//! Process-wide build flags.
//!
//! Constructed once from the CLI and passed by reference into the builder
//! and shell. There is deliberately no ambient global state here.

/// Flags that alter build behavior across the whole invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildFlags {
    /// Rebuild everything, ignoring staleness checks.
    pub force_rebuild: bool,

    /// Print full argument vectors before executing external tools.
    pub verbose: bool,
}

impl BuildFlags {
    /// Create flags for a build invocation.
    pub fn new(force_rebuild: bool, verbose: bool) -> Self {
        BuildFlags {
            force_rebuild,
            verbose,
        }
    }
}
