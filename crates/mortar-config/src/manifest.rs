//! Project manifest parsing and types (mortar.toml)

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Manifest file name at every project root
pub const MANIFEST_FILE: &str = "mortar.toml";

/// Project manifest (mortar.toml)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectManifest {
    /// Package metadata
    pub package: PackageConfig,

    /// Source layout overrides
    #[serde(default)]
    pub build: BuildPaths,

    /// Per-language standard versions
    #[serde(default)]
    pub standards: Standards,

    /// Base / debug / release build settings
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Generator-specific settings, keyed by CMake generator name
    #[serde(default)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub generators: BTreeMap<String, SettingsConfig>,

    /// Feature implication table: feature -> implied features
    #[serde(default)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, Vec<String>>,

    /// Dependencies, keyed by dependency name
    #[serde(default)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, DependencySpec>,
}

/// Package metadata configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    /// Package name
    pub name: String,

    /// Package version (three-part semver)
    pub version: semver::Version,

    /// Target kind: binary, static, shared, header-only, or a plugin kind
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Package description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Package authors
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    /// License identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

fn default_kind() -> String {
    "binary".to_string()
}

/// Source layout and toolchain selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct BuildPaths {
    /// Implementation source directory (default: "src")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// Executable entry-point directory (default: "apps")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apps: Option<PathBuf>,

    /// Public header directory (default: "include")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<PathBuf>,

    /// Build output directory (default: "build")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// CMake generator to drive (default: "Unix Makefiles")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
}

impl BuildPaths {
    pub fn source_dir(&self) -> &Path {
        self.source.as_deref().unwrap_or(Path::new("src"))
    }

    pub fn apps_dir(&self) -> &Path {
        self.apps.as_deref().unwrap_or(Path::new("apps"))
    }

    pub fn include_dir(&self) -> &Path {
        self.include.as_deref().unwrap_or(Path::new("include"))
    }

    pub fn output_dir(&self) -> &Path {
        self.output.as_deref().unwrap_or(Path::new("build"))
    }
}

/// Per-language standard versions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Standards {
    /// C standard (e.g. "11", "17")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<String>,

    /// C++ standard (e.g. "14", "17", "20")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cxx: Option<String>,
}

/// Build settings split into a base layer plus profile overlays.
///
/// Used both for the project-wide `[settings]` table and for each
/// `[generators."<name>"]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SettingsConfig {
    /// Settings applied in every profile
    #[serde(flatten)]
    pub base: BuildSettings,

    /// Additional settings for debug builds
    #[serde(default)]
    #[serde(skip_serializing_if = "BuildSettings::is_empty")]
    pub debug: BuildSettings,

    /// Additional settings for release builds
    #[serde(default)]
    #[serde(skip_serializing_if = "BuildSettings::is_empty")]
    pub release: BuildSettings,
}

/// One layer of build settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BuildSettings {
    /// Extra include directories
    #[serde(default, rename = "include-dirs")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_dirs: Vec<PathBuf>,

    /// Preprocessor defines (NAME or NAME=VALUE)
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub defines: Vec<String>,

    /// Compiler options
    #[serde(default, rename = "compile-options")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub compile_options: Vec<String>,

    /// Linker options
    #[serde(default, rename = "link-options")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub link_options: Vec<String>,

    /// Extra link search directories
    #[serde(default, rename = "link-dirs")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub link_dirs: Vec<PathBuf>,

    /// Libraries to link
    #[serde(default, rename = "link-libraries")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub link_libraries: Vec<String>,
}

impl BuildSettings {
    /// True when no field carries any entry
    pub fn is_empty(&self) -> bool {
        self.include_dirs.is_empty()
            && self.defines.is_empty()
            && self.compile_options.is_empty()
            && self.link_options.is_empty()
            && self.link_dirs.is_empty()
            && self.link_libraries.is_empty()
    }

    /// Append another layer onto this one. Layers are additive; nothing
    /// is deduplicated or overridden.
    pub fn extend(&mut self, other: &BuildSettings) {
        self.include_dirs.extend(other.include_dirs.iter().cloned());
        self.defines.extend(other.defines.iter().cloned());
        self.compile_options
            .extend(other.compile_options.iter().cloned());
        self.link_options.extend(other.link_options.iter().cloned());
        self.link_dirs.extend(other.link_dirs.iter().cloned());
        self.link_libraries
            .extend(other.link_libraries.iter().cloned());
    }
}

impl SettingsConfig {
    /// Base layer plus the overlay for the named profile ("debug" or
    /// "release"), in that order.
    pub fn layered(&self, profile: &str) -> BuildSettings {
        let mut merged = self.base.clone();
        match profile {
            "debug" => merged.extend(&self.debug),
            "release" => merged.extend(&self.release),
            _ => {}
        }
        merged
    }
}

/// Dependency specification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DependencySpec {
    /// Bare remote source: a git URL or `@author/repo` shorthand
    Git(String),

    /// Detailed dependency spec
    Detailed(DetailedDependency),
}

/// Detailed dependency specification: exactly one of `path` or `git`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DetailedDependency {
    /// Local path, relative to the declaring project's directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Git repository URL or `@author/repo` shorthand
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<String>,

    /// Requested version tag (git sources only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<semver::Version>,

    /// Requested features (git sources only)
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl DependencySpec {
    /// Local path, if this is a path dependency
    pub fn path(&self) -> Option<&Path> {
        match self {
            DependencySpec::Git(_) => None,
            DependencySpec::Detailed(d) => d.path.as_deref(),
        }
    }

    /// Git URL, if this is a remote dependency
    pub fn git_url(&self) -> Option<&str> {
        match self {
            DependencySpec::Git(url) => Some(url),
            DependencySpec::Detailed(d) => d.git.as_deref(),
        }
    }

    /// Requested version, if any
    pub fn requested_version(&self) -> Option<&semver::Version> {
        match self {
            DependencySpec::Git(_) => None,
            DependencySpec::Detailed(d) => d.version.as_ref(),
        }
    }

    /// Requested features
    pub fn requested_features(&self) -> &[String] {
        match self {
            DependencySpec::Git(_) => &[],
            DependencySpec::Detailed(d) => &d.features,
        }
    }
}

impl ProjectManifest {
    /// Parse manifest from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load and validate a manifest from a file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let manifest: Self =
            Self::from_str(&content).map_err(|e| ConfigError::TomlParseError {
                file: path.to_path_buf(),
                error: Box::new(e),
            })?;

        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Validate the manifest
    pub fn validate(&self) -> ConfigResult<()> {
        if self.package.name.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "package.name".to_string(),
                reason: "name cannot be empty".to_string(),
            });
        }

        if !is_valid_name(&self.package.name) {
            return Err(ConfigError::InvalidValue {
                field: "package.name".to_string(),
                reason: format!(
                    "'{}' may only contain letters, digits, '-' and '_'",
                    self.package.name
                ),
            });
        }

        // The version ordering policy works on the (major, minor, patch)
        // triple; pre-release and build metadata would make it partial.
        if !self.package.version.pre.is_empty() || !self.package.version.build.is_empty() {
            return Err(ConfigError::InvalidVersion {
                version: self.package.version.to_string(),
                reason: "pre-release and build metadata are not supported".to_string(),
            });
        }

        if self.package.kind.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "package.kind".to_string(),
                reason: "kind cannot be empty".to_string(),
            });
        }

        for (name, spec) in &self.dependencies {
            validate_dependency(name, spec)?;
        }

        Ok(())
    }

    /// Package name
    pub fn name(&self) -> &str {
        &self.package.name
    }

    /// Package version
    pub fn version(&self) -> &semver::Version {
        &self.package.version
    }

    /// Target kind
    pub fn kind(&self) -> &str {
        &self.package.kind
    }

    /// Feature implication table, if the manifest declares one
    pub fn feature_table(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        if self.features.is_empty() {
            None
        } else {
            Some(&self.features)
        }
    }

    /// Generator overlay for the given generator name, if declared
    pub fn generator_settings(&self, generator: &str) -> Option<&SettingsConfig> {
        self.generators.get(generator)
    }
}

/// Package and dependency names: letters, digits, '-' and '_'
fn is_valid_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Validate a dependency specification
fn validate_dependency(name: &str, spec: &DependencySpec) -> ConfigResult<()> {
    if name.is_empty() || !is_valid_name(name) {
        return Err(ConfigError::InvalidValue {
            field: "dependency name".to_string(),
            reason: format!("'{}' is not a valid dependency name", name),
        });
    }

    let DependencySpec::Detailed(detail) = spec else {
        return Ok(());
    };

    match (&detail.path, &detail.git) {
        (Some(_), Some(_)) => Err(ConfigError::InvalidValue {
            field: format!("dependency '{}'", name),
            reason: "cannot specify both 'path' and 'git'".to_string(),
        }),
        (None, None) => Err(ConfigError::InvalidValue {
            field: format!("dependency '{}'", name),
            reason: "must specify either 'path' or 'git'".to_string(),
        }),
        (Some(_), None) if detail.version.is_some() || !detail.features.is_empty() => {
            Err(ConfigError::InvalidValue {
                field: format!("dependency '{}'", name),
                reason: "'version' and 'features' apply to git sources only".to_string(),
            })
        }
        _ => Ok(()),
    }
}
