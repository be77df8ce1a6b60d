//! Mortar dependency resolution
//!
//! Walks a project's declared dependency set to its transitive closure,
//! deduplicates by name, detects cycles in both the dependency graph and
//! each project's feature-implication table, resolves version conflicts
//! under a fixed policy, and produces a deduplicated, leaf-first ordered
//! list of resolved nodes for build-script synthesis.
//!
//! The resolver performs no process or network I/O of its own: locating
//! a dependency on disk (possibly via a git fetch) goes through the
//! [`DependencyLocator`] trait.

pub mod features;
pub mod graph;
pub mod locator;
pub mod version;

use std::path::PathBuf;
use thiserror::Error;

/// Dependency resolution errors
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Circular dependency detected: {path}")]
    Cycle { path: String },

    #[error("Feature cycle detected in '{project}': {path}")]
    FeatureCycle { project: String, path: String },

    #[error("Feature '{feature}' implied by '{implied_by}' is not declared in '{project}'")]
    MissingFeature {
        project: String,
        feature: String,
        implied_by: String,
    },

    #[error(
        "Version conflict for '{name}': {existing} and {incoming} (required by '{dependent}') \
         have incompatible major versions"
    )]
    VersionConflict {
        name: String,
        existing: semver::Version,
        incoming: semver::Version,
        dependent: String,
    },

    #[error("Missing dependency '{name}' of '{dependent}': {dir} does not exist")]
    MissingDependency {
        name: String,
        dependent: String,
        dir: PathBuf,
    },

    #[error("Failed to locate '{name}': {reason}")]
    Locator { name: String, reason: String },

    #[error(transparent)]
    Config(#[from] mortar_config::ConfigError),
}

/// Result type for resolution operations
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Non-fatal diagnostic: two compatible but different versions of the
/// same dependency were requested; the preferred one was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionWarning {
    /// Dependency name
    pub name: String,
    /// Version kept after conflict resolution
    pub kept: semver::Version,
    /// Version discarded
    pub discarded: semver::Version,
    /// Project whose declaration triggered the conflict
    pub dependent: String,
}

impl std::fmt::Display for VersionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' requested at both {} and {} (by '{}'); using {}",
            self.name, self.kept, self.discarded, self.dependent, self.kept
        )
    }
}

// Re-export main types
pub use features::FeatureExpander;
pub use graph::{GraphResolver, Resolution, ResolvedNode};
pub use locator::{DependencyLocator, GitLocator, Located};
