//! Dependency location
//!
//! Resolving one dependency declaration to a directory on disk is the
//! resolver's only boundary with the outside world. The graph walker
//! calls [`DependencyLocator::locate`]; the production implementation
//! ([`GitLocator`]) resolves local paths against the declaring project
//! and materializes remote sources into a per-user package store by
//! shelling out to `git`.

use crate::{ResolveError, ResolveResult};
use mortar_config::DependencySpec;
use semver::Version;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A located dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Directory holding the dependency's own mortar.toml
    pub dir: PathBuf,
    /// Version the remote source resolved to; `None` for path
    /// dependencies (their manifest is authoritative)
    pub version: Option<Version>,
}

/// Resolves one dependency declaration to a local directory.
pub trait DependencyLocator {
    /// Locate `spec` relative to the project at `containing_dir`.
    ///
    /// With `allow_fetch` false a remote source must already be present
    /// locally. The returned directory is not guaranteed to exist for
    /// path dependencies; the caller checks and reports missing paths
    /// against the declaring project.
    fn locate(
        &self,
        name: &str,
        spec: &DependencySpec,
        containing_dir: &Path,
        allow_fetch: bool,
    ) -> ResolveResult<Located>;
}

/// Production locator: path joins for local dependencies, a git-backed
/// package store (`~/.mortar/packages/<name>/<version>`) for remote ones.
pub struct GitLocator {
    store: PathBuf,
}

impl GitLocator {
    /// Locator over the per-user package store
    pub fn new() -> ResolveResult<Self> {
        let store = mortar_config::package_store()?;
        Ok(Self { store })
    }

    /// Locator over an explicit store directory
    pub fn with_store(store: PathBuf) -> Self {
        Self { store }
    }

    /// The store directory for one package version
    pub fn store_entry(&self, name: &str, version: &Version) -> PathBuf {
        self.store.join(name).join(version.to_string())
    }

    fn locate_remote(
        &self,
        name: &str,
        url: &str,
        requested: Option<&Version>,
        allow_fetch: bool,
    ) -> ResolveResult<Located> {
        let url = expand_shorthand(url);

        if let Some(version) = requested {
            let entry = self.store_entry(name, version);
            if entry.is_dir() {
                return Ok(Located {
                    dir: entry,
                    version: Some(version.clone()),
                });
            }

            if !allow_fetch {
                return Err(ResolveError::Locator {
                    name: name.to_string(),
                    reason: format!(
                        "version {} is not in the package store and fetching is disabled",
                        version
                    ),
                });
            }

            let tags = self.list_version_tags(name, &url)?;
            let tag = tags
                .iter()
                .find(|(v, _)| v == version)
                .ok_or_else(|| ResolveError::Locator {
                    name: name.to_string(),
                    reason: format!("{} has no tag for version {}", url, version),
                })?;

            let entry = self.store_entry(name, version);
            self.clone_tag(name, &url, &tag.1, &entry)?;
            return Ok(Located {
                dir: entry,
                version: Some(version.clone()),
            });
        }

        // No requested version: take the highest tag when fetching is
        // allowed, otherwise the highest version already in the store.
        if allow_fetch {
            let tags = self.list_version_tags(name, &url)?;
            let (version, tag) = tags.last().cloned().ok_or_else(|| ResolveError::Locator {
                name: name.to_string(),
                reason: format!("{} has no version tags", url),
            })?;

            let entry = self.store_entry(name, &version);
            if !entry.is_dir() {
                self.clone_tag(name, &url, &tag, &entry)?;
            }
            Ok(Located {
                dir: entry,
                version: Some(version),
            })
        } else {
            let version = self.highest_in_store(name).ok_or_else(|| ResolveError::Locator {
                name: name.to_string(),
                reason: "not in the package store and fetching is disabled".to_string(),
            })?;
            Ok(Located {
                dir: self.store_entry(name, &version),
                version: Some(version),
            })
        }
    }

    /// Version tags of a remote repository, ascending
    fn list_version_tags(&self, name: &str, url: &str) -> ResolveResult<Vec<(Version, String)>> {
        let output = Command::new("git")
            .args(["ls-remote", "--tags", url])
            .output()
            .map_err(|e| ResolveError::Locator {
                name: name.to_string(),
                reason: format!("failed to run git: {}", e),
            })?;

        if !output.status.success() {
            return Err(ResolveError::Locator {
                name: name.to_string(),
                reason: format!(
                    "git ls-remote failed for {}: {}",
                    url,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(parse_version_tags(&String::from_utf8_lossy(&output.stdout)))
    }

    fn clone_tag(&self, name: &str, url: &str, tag: &str, dest: &Path) -> ResolveResult<()> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ResolveError::Locator {
                name: name.to_string(),
                reason: format!("failed to create {}: {}", parent.display(), e),
            })?;
        }

        let status = Command::new("git")
            .args(["clone", "--depth", "1", "--branch", tag, url])
            .arg(dest)
            .status()
            .map_err(|e| ResolveError::Locator {
                name: name.to_string(),
                reason: format!("failed to run git: {}", e),
            })?;

        if !status.success() {
            // A failed clone may leave a partial checkout behind.
            let _ = std::fs::remove_dir_all(dest);
            return Err(ResolveError::Locator {
                name: name.to_string(),
                reason: format!("git clone of {} (tag {}) failed", url, tag),
            });
        }

        Ok(())
    }

    /// Highest version of `name` present in the store, if any
    fn highest_in_store(&self, name: &str) -> Option<Version> {
        let entries = std::fs::read_dir(self.store.join(name)).ok()?;
        entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().to_str().and_then(|s| Version::parse(s).ok()))
            .max()
    }
}

impl DependencyLocator for GitLocator {
    fn locate(
        &self,
        name: &str,
        spec: &DependencySpec,
        containing_dir: &Path,
        allow_fetch: bool,
    ) -> ResolveResult<Located> {
        if let Some(path) = spec.path() {
            let dir = if path.is_absolute() {
                path.to_path_buf()
            } else {
                containing_dir.join(path)
            };
            return Ok(Located { dir, version: None });
        }

        let url = spec.git_url().ok_or_else(|| ResolveError::Locator {
            name: name.to_string(),
            reason: "declaration has neither a path nor a git source".to_string(),
        })?;

        self.locate_remote(name, url, spec.requested_version(), allow_fetch)
    }
}

/// Expand the `@author/repo` shorthand to a GitHub URL
pub fn expand_shorthand(url: &str) -> String {
    match url.strip_prefix('@') {
        Some(rest) => format!("https://github.com/{}", rest),
        None => url.to_string(),
    }
}

/// Parse `git ls-remote --tags` output into `(version, tag)` pairs,
/// ascending by version. Tags must name a plain `X.Y.Z` triple, with an
/// optional leading `v`; peeled `^{}` refs and anything else are ignored.
pub fn parse_version_tags(output: &str) -> Vec<(Version, String)> {
    let mut tags: Vec<(Version, String)> = output
        .lines()
        .filter_map(|line| line.split('\t').nth(1))
        .filter_map(|r| r.strip_prefix("refs/tags/"))
        .filter(|tag| !tag.ends_with("^{}"))
        .filter_map(|tag| {
            let bare = tag.strip_prefix('v').unwrap_or(tag);
            Version::parse(bare)
                .ok()
                .filter(|v| v.pre.is_empty() && v.build.is_empty())
                .map(|v| (v, tag.to_string()))
        })
        .collect();

    tags.sort();
    tags.dedup_by(|a, b| a.0 == b.0);
    tags
}
