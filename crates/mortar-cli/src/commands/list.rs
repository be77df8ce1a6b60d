//! List command - project and store information

use anyhow::{Context, Result};
use clap::Subcommand;
use mortar_build::{Builder, PluginRegistry};
use mortar_config::ManifestLoader;
use std::path::Path;

/// What `mortar list` reports on
#[derive(Subcommand)]
pub enum ListWhat {
    /// Include directories of the project and its dependencies
    Include,
    /// Resolved dependency closure
    Deps,
    /// Dependencies declared in the manifest
    Packages,
    /// Registered target-kind plugins
    Plugins,
    /// Contents of the per-user package store
    Installed,
}

/// Run the list command
pub fn run(project_dir: &Path, what: ListWhat) -> Result<()> {
    match what {
        ListWhat::Include => list_include(project_dir),
        ListWhat::Deps => list_deps(project_dir),
        ListWhat::Packages => list_packages(project_dir),
        ListWhat::Plugins => list_plugins(),
        ListWhat::Installed => list_installed(),
    }
}

fn list_include(project_dir: &Path) -> Result<()> {
    let builder = Builder::new(project_dir).context("Failed to load project")?;
    let resolution = builder.resolve().context("Failed to resolve dependencies")?;

    let loader = ManifestLoader::new();
    let own = builder
        .root_dir()
        .join(builder.manifest().build.include_dir());
    if own.is_dir() {
        println!("{}", own.display());
    }

    for node in &resolution.nodes {
        let manifest = loader.load_dir(&node.dir)?;
        let include = node.dir.join(manifest.build.include_dir());
        if include.is_dir() {
            println!("{}", include.display());
        }
    }

    Ok(())
}

fn list_deps(project_dir: &Path) -> Result<()> {
    let builder = Builder::new(project_dir).context("Failed to load project")?;
    let resolution = builder.resolve().context("Failed to resolve dependencies")?;

    let warnings: Vec<String> = resolution.warnings.iter().map(|w| w.to_string()).collect();
    super::print_warnings(&warnings);

    for node in &resolution.nodes {
        println!(
            "{} {} ({}) {}",
            node.name,
            node.version,
            node.kind,
            node.dir.display()
        );
    }

    Ok(())
}

fn list_packages(project_dir: &Path) -> Result<()> {
    let builder = Builder::new(project_dir).context("Failed to load project")?;

    for (name, spec) in &builder.manifest().dependencies {
        if let Some(path) = spec.path() {
            println!("{} (path: {})", name, path.display());
        } else if let Some(url) = spec.git_url() {
            match spec.requested_version() {
                Some(version) => println!("{} (git: {} @ {})", name, url, version),
                None => println!("{} (git: {})", name, url),
            }
        }
    }

    Ok(())
}

fn list_plugins() -> Result<()> {
    for kind in PluginRegistry::with_builtins().kinds() {
        println!("{}", kind);
    }
    Ok(())
}

fn list_installed() -> Result<()> {
    let store = mortar_config::package_store()?;
    if !store.is_dir() {
        return Ok(());
    }

    let mut entries: Vec<_> = std::fs::read_dir(&store)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let mut versions: Vec<String> = std::fs::read_dir(entry.path())?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        versions.sort();
        println!("{} [{}]", name, versions.join(", "));
    }

    Ok(())
}
