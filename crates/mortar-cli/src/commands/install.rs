//! Install command - fetch a package into the per-user store

use anyhow::{bail, Context, Result};
use mortar_config::{DependencySpec, DetailedDependency};
use mortar_resolver::{DependencyLocator, GitLocator};
use std::path::Path;

/// Run the install command
pub fn run(source: &str, version: Option<&semver::Version>) -> Result<()> {
    let Some(name) = super::package_name_of(source) else {
        bail!("cannot derive a package name from '{}'", source);
    };

    let spec = DependencySpec::Detailed(DetailedDependency {
        path: None,
        git: Some(source.to_string()),
        version: version.cloned(),
        features: Vec::new(),
    });

    let locator = GitLocator::new().context("Failed to open the package store")?;
    let located = locator
        .locate(&name, &spec, Path::new("."), true)
        .with_context(|| format!("Failed to install '{}'", name))?;

    match located.version {
        Some(version) => println!("Installed {} {} at {}", name, version, located.dir.display()),
        None => println!("Installed {} at {}", name, located.dir.display()),
    }

    Ok(())
}
