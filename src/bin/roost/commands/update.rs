//! `roost update` command

use anyhow::{bail, Result};

use crate::cli::UpdateArgs;
use roost::util::fs::ensure_dir;
use roost::util::process::ProcessBuilder;
use roost::{Manifest, Shell};

pub fn execute(_args: UpdateArgs, verbose: bool) -> Result<()> {
    let manifest = Manifest::load(&super::working_dir()?)?;
    manifest.validate()?;

    let vendor_dir = manifest.vendor_dir();
    ensure_dir(&vendor_dir)?;

    let shell = Shell::new(verbose);

    for dependency in &manifest.dependencies {
        let directory = dependency.local_path(&vendor_dir);

        let (announcement, command, finished) = if directory.is_dir() {
            (
                format!("Updating {}... ", dependency.short_name()),
                ProcessBuilder::from_argv(&dependency.pull_argv())?.cwd(&directory),
                format!("Updated {}", dependency.short_name()),
            )
        } else {
            (
                format!("Cloning {}... ", dependency.source_url()),
                ProcessBuilder::from_argv(&dependency.clone_argv(&directory))?,
                format!("Cloned {}", dependency.short_name()),
            )
        };

        let status = shell.run(&announcement, &command, &finished)?;
        if status != 0 {
            bail!("failed to fetch dependency {}", dependency.short_name());
        }
    }

    Ok(())
}
