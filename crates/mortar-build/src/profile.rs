//! Build profile management
//!
//! Selects the settings overlay layered onto the base build settings,
//! the `CMAKE_BUILD_TYPE` value handed to the generator, and the build
//! subdirectory artifacts land in.

use crate::error::{BuildError, BuildResult};

/// Build profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    /// Debug profile (default)
    Debug,
    /// Release profile (optimized)
    Release,
}

impl Profile {
    /// Parse profile from string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> BuildResult<Self> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            other => Err(BuildError::UnknownProfile(other.to_string())),
        }
    }

    /// Get profile name; doubles as the settings-overlay key in the
    /// manifest (`[settings.debug]` / `[settings.release]`)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    /// `CMAKE_BUILD_TYPE` value for this profile
    pub fn cmake_build_type(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::Debug
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
