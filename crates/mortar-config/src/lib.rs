//! Mortar project configuration
//!
//! Provides the typed configuration records for mortar projects:
//! - Project manifest (mortar.toml): package metadata, target kind,
//!   build settings, generator overlays, features, dependencies
//! - Manifest discovery (walking up from a working directory)
//!
//! The manifest is the unit of exchange between the CLI, the dependency
//! resolver and the build-script synthesizer: every project in a
//! dependency graph is described by exactly one `ProjectManifest`.
//!
//! # Example
//!
//! ```no_run
//! use mortar_config::ManifestLoader;
//! use std::path::Path;
//!
//! let (root, manifest) = ManifestLoader::new().find_from(Path::new(".")).unwrap();
//! println!("{} v{}", manifest.package.name, manifest.package.version);
//! ```

pub mod loader;
pub mod manifest;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No mortar.toml found in {0} or any parent directory")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: Box<toml::de::Error>,
    },

    #[error("Missing required field '{field}' in {file}")]
    MissingField { field: String, file: PathBuf },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use loader::{mortar_home, package_store, ManifestLoader};
pub use manifest::{
    BuildPaths, BuildSettings, DependencySpec, DetailedDependency, PackageConfig,
    ProjectManifest, SettingsConfig, Standards, MANIFEST_FILE,
};
