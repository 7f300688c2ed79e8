//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};

/// Roost - an incremental package manager and build tool for Swift modules
#[derive(Parser)]
#[command(name = "roost")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the package in the current directory
    Build(BuildArgs),

    /// Show the parsed manifest of the current package
    Inspect(InspectArgs),

    /// List packages recorded in the local index
    List(ListArgs),

    /// Fetch or refresh vendored dependencies
    Update(UpdateArgs),

    /// Build and run the package's test target
    Test(TestArgs),

    /// Remove compiled objects from the build directory
    Clean(CleanArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Rebuild everything, ignoring modification times
    #[arg(short = 'B', long)]
    pub rebuild: bool,
}

#[derive(Args)]
pub struct InspectArgs {}

#[derive(Args)]
pub struct ListArgs {}

#[derive(Args)]
pub struct UpdateArgs {}

#[derive(Args)]
pub struct TestArgs {
    /// Rebuild everything, ignoring modification times
    #[arg(short = 'B', long)]
    pub rebuild: bool,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Remove the build and bin directories entirely
    #[arg(long)]
    pub all: bool,
}
