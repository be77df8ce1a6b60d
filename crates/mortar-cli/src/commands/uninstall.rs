//! Uninstall command - remove a package from the per-user store

use anyhow::{bail, Context, Result};
use std::fs;

/// Run the uninstall command
pub fn run(source: &str, version: Option<&semver::Version>) -> Result<()> {
    let Some(name) = super::package_name_of(source) else {
        bail!("cannot derive a package name from '{}'", source);
    };

    let store = mortar_config::package_store()?;
    let package_dir = store.join(&name);

    let target = match version {
        Some(version) => package_dir.join(version.to_string()),
        None => package_dir.clone(),
    };

    if !target.is_dir() {
        bail!("'{}' is not installed", name);
    }

    fs::remove_dir_all(&target)
        .with_context(|| format!("Failed to remove {}", target.display()))?;

    // Removing the last version leaves an empty package directory behind.
    if version.is_some() {
        let empty = fs::read_dir(&package_dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if empty {
            let _ = fs::remove_dir(&package_dir);
        }
    }

    match version {
        Some(version) => println!("Removed {} {}", name, version),
        None => println!("Removed {}", name),
    }

    Ok(())
}
