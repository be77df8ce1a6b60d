//! Clean command - remove build artifacts

use anyhow::{Context, Result};
use mortar_build::Builder;
use std::path::Path;

/// Run the clean command
pub fn run(project_dir: &Path) -> Result<()> {
    let builder = Builder::new(project_dir).context("Failed to load project")?;
    builder.clean().context("Failed to clean build artifacts")?;
    println!("Cleaned {}", builder.manifest().name());
    Ok(())
}
