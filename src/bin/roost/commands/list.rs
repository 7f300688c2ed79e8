//! `roost list` command

use anyhow::Result;

use crate::cli::ListArgs;
use roost::Index;

pub fn execute(_args: ListArgs) -> Result<()> {
    let path = Index::default_path()?;
    let index = Index::read(&path)?;

    for package in &index.packages {
        println!("{package}");
    }

    Ok(())
}
