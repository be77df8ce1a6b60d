/// Build system error types
use std::path::PathBuf;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No source files found for '{project}'")]
    MissingSources { project: String },

    #[error("'{project}' is a binary and cannot be used as a dependency")]
    BinaryAsDependency { project: String },

    #[error("No plugin registered for target kind '{kind}' (project '{project}')")]
    PluginNotFound { kind: String, project: String },

    #[error("Target not found: {target}")]
    TargetNotFound { target: String },

    #[error("Unknown profile '{0}' (expected debug or release)")]
    UnknownProfile(String),

    #[error("{program} exited with status {code}")]
    ExternalToolFailure { program: String, code: i32 },

    #[error("I/O error at {path}: {error}")]
    IoAt {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Resolve(#[from] mortar_resolver::ResolveError),

    #[error(transparent)]
    Config(#[from] mortar_config::ConfigError),
}

impl BuildError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoAt {
            path: path.into(),
            error,
        }
    }

    /// Create a missing sources error
    pub fn missing_sources(project: impl Into<String>) -> Self {
        Self::MissingSources {
            project: project.into(),
        }
    }
}
