//! Roost CLI - an incremental build tool for Swift modules

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("roost=debug")
    } else {
        EnvFilter::new("roost=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, cli.verbose),
        Commands::Inspect(args) => commands::inspect::execute(args),
        Commands::List(args) => commands::list::execute(args),
        Commands::Update(args) => commands::update::execute(args, cli.verbose),
        Commands::Test(args) => commands::test::execute(args, cli.verbose),
        Commands::Clean(args) => commands::clean::execute(args),
    }
}
