//! Dependency graph resolution
//!
//! Depth-first, post-order walk over every dependency declaration
//! reachable from a root project. Each dependency is located on disk,
//! its own manifest loaded, and its subtree resolved *before* the node
//! itself is recorded, so the accumulator is always leaf-first. Nodes
//! deduplicate by name under the version-conflict policy in
//! [`crate::version`].
//!
//! The visiting path stack is constructed fresh for every top-level
//! `resolve` call and threaded through the recursion by parameter;
//! nothing persists between runs.

use crate::features::FeatureExpander;
use crate::locator::DependencyLocator;
use crate::version::{compatible, preferred};
use crate::{ResolveError, ResolveResult, VersionWarning};
use mortar_config::{ManifestLoader, ProjectManifest};
use semver::Version;
use std::path::{Path, PathBuf};

/// One dependency surviving resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    /// Dependency name (the declaration key)
    pub name: String,
    /// Directory holding the dependency's sources and manifest
    pub dir: PathBuf,
    /// Resolved version (from the dependency's own manifest)
    pub version: Version,
    /// Target kind declared by the dependency
    pub kind: String,
    /// Requested features after expansion through the dependency's
    /// implication table
    pub features: Vec<String>,
    /// Names of the dependency's own direct dependencies
    pub deps: Vec<String>,
}

/// Result of one resolution run
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Deduplicated dependencies, leaf-first; the root project is not
    /// included (the synthesizer appends it last)
    pub nodes: Vec<ResolvedNode>,
    /// Non-fatal version conflicts, in detection order
    pub warnings: Vec<VersionWarning>,
}

impl Resolution {
    /// Look up a resolved node by name
    pub fn get(&self, name: &str) -> Option<&ResolvedNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Names in the transitive dependency closure of `roots`,
    /// restricted to nodes that survived resolution.
    pub fn closure_of(&self, roots: &[String]) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        let mut queue: Vec<&str> = roots.iter().map(|s| s.as_str()).collect();

        while let Some(name) = queue.pop() {
            let Some(node) = self.get(name) else { continue };
            if result.iter().any(|n| n == name) {
                continue;
            }
            result.push(name.to_string());
            queue.extend(node.deps.iter().map(|s| s.as_str()));
        }

        result
    }
}

/// Recursive closure computation over dependency declarations
pub struct GraphResolver<'a, L: DependencyLocator> {
    loader: ManifestLoader,
    locator: &'a L,
    allow_fetch: bool,
}

impl<'a, L: DependencyLocator> GraphResolver<'a, L> {
    pub fn new(locator: &'a L, allow_fetch: bool) -> Self {
        Self {
            loader: ManifestLoader::new(),
            locator,
            allow_fetch,
        }
    }

    /// Resolve the full dependency closure of the project at `root_dir`.
    pub fn resolve(
        &self,
        root_dir: &Path,
        root_manifest: &ProjectManifest,
    ) -> ResolveResult<Resolution> {
        let mut resolution = Resolution::default();
        let mut visiting = vec![root_manifest.name().to_string()];

        self.visit(root_dir, root_manifest, &mut resolution, &mut visiting)?;

        Ok(resolution)
    }

    /// Resolve every dependency declared by `manifest`, post-order.
    fn visit(
        &self,
        dir: &Path,
        manifest: &ProjectManifest,
        resolution: &mut Resolution,
        visiting: &mut Vec<String>,
    ) -> ResolveResult<()> {
        for (name, spec) in &manifest.dependencies {
            let located = self.locator.locate(name, spec, dir, self.allow_fetch)?;

            if !located.dir.is_dir() {
                return Err(ResolveError::MissingDependency {
                    name: name.clone(),
                    dependent: manifest.name().to_string(),
                    dir: located.dir,
                });
            }

            let dep_manifest = self.loader.load_dir(&located.dir)?;

            if let Some(pos) = visiting.iter().position(|n| n == name) {
                let mut cycle: Vec<&str> = visiting[pos..].iter().map(|s| s.as_str()).collect();
                cycle.push(name);
                return Err(ResolveError::Cycle {
                    path: cycle.join(" -> "),
                });
            }

            visiting.push(name.clone());
            self.visit(&located.dir, &dep_manifest, resolution, visiting)?;
            visiting.pop();

            let features = FeatureExpander::new(name, dep_manifest.feature_table())
                .expand(spec.requested_features())?;

            let node = ResolvedNode {
                name: name.clone(),
                dir: located.dir,
                version: dep_manifest.version().clone(),
                kind: dep_manifest.kind().to_string(),
                features,
                deps: dep_manifest.dependencies.keys().cloned().collect(),
            };

            record(node, manifest.name(), resolution)?;
        }

        Ok(())
    }
}

/// Apply the conflict policy for one freshly resolved node.
fn record(
    node: ResolvedNode,
    dependent: &str,
    resolution: &mut Resolution,
) -> ResolveResult<()> {
    let Some(pos) = resolution.nodes.iter().position(|n| n.name == node.name) else {
        resolution.nodes.push(node);
        return Ok(());
    };

    let existing = &resolution.nodes[pos];

    if existing.version == node.version {
        return Ok(());
    }

    if !compatible(&existing.version, &node.version) {
        return Err(ResolveError::VersionConflict {
            name: node.name,
            existing: existing.version.clone(),
            incoming: node.version,
            dependent: dependent.to_string(),
        });
    }

    let winner = preferred(&existing.version, &node.version).clone();
    let (kept, discarded) = if winner == node.version {
        (node.version.clone(), existing.version.clone())
    } else {
        (existing.version.clone(), node.version.clone())
    };

    // Report each conflicting pair once, whichever direction it is
    // rediscovered from.
    let already_reported = resolution.warnings.iter().any(|w| {
        w.name == node.name
            && ((w.kept == kept && w.discarded == discarded)
                || (w.kept == discarded && w.discarded == kept))
    });
    if !already_reported {
        resolution.warnings.push(VersionWarning {
            name: node.name.clone(),
            kept: kept.clone(),
            discarded,
            dependent: dependent.to_string(),
        });
    }

    // The winner replaces in place: ordering reflects first discovery,
    // not the winning version.
    if winner == node.version {
        resolution.nodes[pos] = node;
    }

    Ok(())
}
