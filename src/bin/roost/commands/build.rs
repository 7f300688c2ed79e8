//! `roost build` command

use anyhow::{bail, Result};

use crate::cli::BuildArgs;
use roost::{BuildFlags, Builder, CompilationStatus, Manifest, Package, Shell, Toolchain};

pub fn execute(args: BuildArgs, verbose: bool) -> Result<()> {
    let manifest = Manifest::load(&super::working_dir()?)?;
    let package = Package::new(manifest)?;
    roost::builder::validate_target(&package)?;

    let toolchain = Toolchain::detect()?;
    let flags = BuildFlags::new(args.rebuild, verbose);
    let shell = Shell::new(verbose);

    let builder = Builder::new(package, &toolchain, &flags, &shell);
    match builder.build()? {
        CompilationStatus::Failed => bail!("build failed"),
        status => {
            tracing::debug!("build finished: {status}");
            Ok(())
        }
    }
}
