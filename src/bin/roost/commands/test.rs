//! `roost test` command

use anyhow::{bail, Context, Result};

use crate::cli::TestArgs;
use roost::util::process::ProcessBuilder;
use roost::{BuildFlags, Builder, CompilationStatus, Manifest, Package, Shell, Toolchain};

pub fn execute(args: TestArgs, verbose: bool) -> Result<()> {
    let manifest = Manifest::load(&super::working_dir()?)?;
    let package = Package::for_test(manifest)?;

    let toolchain = Toolchain::detect()?;
    let flags = BuildFlags::new(args.rebuild, verbose);
    let shell = Shell::new(verbose);

    let builder = Builder::new(package, &toolchain, &flags, &shell);
    if builder.build()? == CompilationStatus::Failed {
        bail!("test build failed");
    }

    let package = builder.into_package();
    let bin_name = package
        .bin_file_name
        .as_ref()
        .context("test package has no binary name")?;
    let test_binary = package.bin_dir().join(bin_name);

    let output = ProcessBuilder::new(&test_binary)
        .cwd(package.root())
        .exec()?;

    print!("{}", String::from_utf8_lossy(&output.stdout));
    eprint!("{}", String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        bail!("tests failed");
    }

    Ok(())
}
