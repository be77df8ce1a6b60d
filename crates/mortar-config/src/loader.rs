//! Manifest discovery
//!
//! Finds the project manifest by walking up the directory tree, and
//! loads manifests for exact directories (used for dependencies, whose
//! location is already resolved).

use crate::manifest::{ProjectManifest, MANIFEST_FILE};
use crate::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// Manifest loader
pub struct ManifestLoader;

impl ManifestLoader {
    /// Create a new manifest loader
    pub fn new() -> Self {
        Self
    }

    /// Find the project manifest by walking up from `start_dir`.
    ///
    /// Returns the project root (the directory containing mortar.toml)
    /// and the loaded manifest.
    pub fn find_from(&self, start_dir: &Path) -> ConfigResult<(PathBuf, ProjectManifest)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let manifest_path = current.join(MANIFEST_FILE);

            if manifest_path.exists() {
                let manifest = ProjectManifest::from_file(&manifest_path)?;
                return Ok((current, manifest));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(ConfigError::NotFound(start_dir.to_path_buf())),
            }
        }
    }

    /// Load the manifest of the project rooted exactly at `dir`.
    pub fn load_dir(&self, dir: &Path) -> ConfigResult<ProjectManifest> {
        ProjectManifest::from_file(&dir.join(MANIFEST_FILE))
    }
}

impl Default for ManifestLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-user mortar directory (~/.mortar)
pub fn mortar_home() -> ConfigResult<PathBuf> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
    Ok(home.join(".mortar"))
}

/// Per-user package store (~/.mortar/packages)
pub fn package_store() -> ConfigResult<PathBuf> {
    Ok(mortar_home()?.join("packages"))
}
