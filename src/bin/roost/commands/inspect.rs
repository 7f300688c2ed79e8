//! `roost inspect` command

use anyhow::Result;

use crate::cli::InspectArgs;
use roost::Manifest;

pub fn execute(_args: InspectArgs) -> Result<()> {
    let manifest = Manifest::load(&super::working_dir()?)?;

    println!("name: {}", manifest.name);
    println!("target-type: {}", manifest.target_type);

    println!("sources:");
    for source in &manifest.sources {
        println!("  - {source}");
    }

    if !manifest.modules.is_empty() {
        println!("modules:");
        for module in &manifest.modules {
            println!("  - {} ({})", module.name, module.sources.join(", "));
        }
    }

    if !manifest.dependencies.is_empty() {
        println!("dependencies:");
        for dependency in &manifest.dependencies {
            let suffix = if dependency.only_test { " (test only)" } else { "" };
            println!("  - {}{suffix}", dependency.github);
        }
    }

    if !manifest.framework_search_paths.is_empty() {
        println!("framework-search-paths:");
        for path in &manifest.framework_search_paths {
            println!("  - {path}");
        }
    }

    if !manifest.compiler_options.trim().is_empty() {
        println!("compiler-options: {}", manifest.compiler_options.trim());
    }
    if !manifest.linker_options.trim().is_empty() {
        println!("linker-options: {}", manifest.linker_options.trim());
    }

    if !manifest.precompile_commands.is_empty() {
        println!("precompile-commands:");
        for command in &manifest.precompile_commands {
            println!("  - {command}");
        }
    }

    if manifest.test_target.is_some() {
        println!("test-target: present");
    }

    Ok(())
}
