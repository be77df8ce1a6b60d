//! Build task synthesis
//!
//! Turns every resolved dependency node, plus the root project, into
//! exactly one [`BuildTask`]: a named, versioned unit that knows how to
//! append its build-script fragment. Synthesis runs leaf-first over the
//! resolution order and appends the root task last, so emission order
//! is leaf-before-root by construction. Kind-specific validation
//! (binary as a dependency, a library without sources, an unknown kind)
//! happens here, before anything is emitted.

use crate::error::{BuildError, BuildResult};
use crate::plugin::{EmitContext, PluginRegistry, TargetPlugin};
use crate::profile::Profile;
use crate::script::CMakeScript;
use crate::sources;
use mortar_config::{BuildSettings, ManifestLoader, ProjectManifest, Standards};
use mortar_resolver::Resolution;
use semver::Version;
use std::path::{Path, PathBuf};

/// One deferred script-generation unit
#[derive(Debug)]
pub struct BuildTask {
    /// Project name
    pub name: String,
    /// Project version
    pub version: Version,
    /// Target kind (dispatches the plugin at emission time)
    pub kind: String,

    project_dir: PathBuf,
    root_dir: PathBuf,
    is_dependency: bool,
    features: Vec<String>,
    sources: Vec<PathBuf>,
    entry_points: Vec<PathBuf>,
    source_dir: PathBuf,
    apps_dir: PathBuf,
    include_dir: PathBuf,
    standards: Standards,
    settings: BuildSettings,
    overlay: BuildSettings,
    link_targets: Vec<String>,
}

impl BuildTask {
    fn context(&self) -> EmitContext<'_> {
        EmitContext {
            name: &self.name,
            version: &self.version,
            project_dir: &self.project_dir,
            root_dir: &self.root_dir,
            is_dependency: self.is_dependency,
            features: &self.features,
            sources: &self.sources,
            entry_points: &self.entry_points,
            source_dir: &self.source_dir,
            apps_dir: &self.apps_dir,
            include_dir: &self.include_dir,
            standards: &self.standards,
            settings: &self.settings,
            overlay: &self.overlay,
            link_targets: &self.link_targets,
        }
    }

    /// Append this task's fragment to the script
    pub fn emit(&self, registry: &PluginRegistry, script: &mut CMakeScript) -> BuildResult<()> {
        self.plugin(registry)?.emit(&self.context(), script)
    }

    /// Unit to build and execute for `mortar run <target>`
    pub fn run_unit(&self, registry: &PluginRegistry, target: &str) -> BuildResult<Option<String>> {
        Ok(self.plugin(registry)?.run_unit(&self.context(), target))
    }

    /// Path of the built executable for `target`
    pub fn artifact_path(
        &self,
        registry: &PluginRegistry,
        target: &str,
        binary_dir: &Path,
    ) -> BuildResult<Option<PathBuf>> {
        Ok(self
            .plugin(registry)?
            .artifact_path(&self.context(), target, binary_dir))
    }

    fn plugin<'r>(&self, registry: &'r PluginRegistry) -> BuildResult<&'r dyn TargetPlugin> {
        registry.get(&self.kind).ok_or_else(|| BuildError::PluginNotFound {
            kind: self.kind.clone(),
            project: self.name.clone(),
        })
    }
}

/// Result of task synthesis
#[derive(Debug)]
pub struct Synthesis {
    /// Tasks in emission order: dependencies leaf-first, root last
    pub tasks: Vec<BuildTask>,
    /// Non-fatal diagnostics (unsupported-generator notes)
    pub warnings: Vec<String>,
}

/// Synthesizes the ordered task list for one build
pub struct TaskSynthesizer<'a> {
    registry: &'a PluginRegistry,
    loader: ManifestLoader,
    profile: Profile,
    generator: String,
}

impl<'a> TaskSynthesizer<'a> {
    pub fn new(registry: &'a PluginRegistry, profile: Profile, generator: impl Into<String>) -> Self {
        Self {
            registry,
            loader: ManifestLoader::new(),
            profile,
            generator: generator.into(),
        }
    }

    /// One task per resolved node plus one for the root, emission order.
    pub fn synthesize(
        &self,
        root_dir: &Path,
        root_manifest: &ProjectManifest,
        resolution: &Resolution,
    ) -> BuildResult<Synthesis> {
        let mut tasks = Vec::new();
        let mut warnings = Vec::new();

        for node in &resolution.nodes {
            let manifest = self.loader.load_dir(&node.dir)?;
            let task = self.task_for(
                &node.name,
                &manifest,
                &node.dir,
                root_dir,
                true,
                node.features.clone(),
                &node.deps,
                resolution,
                &mut warnings,
            )?;
            tasks.push(task);
        }

        let root_deps: Vec<String> = root_manifest.dependencies.keys().cloned().collect();
        let root_task = self.task_for(
            root_manifest.name(),
            root_manifest,
            root_dir,
            root_dir,
            false,
            Vec::new(),
            &root_deps,
            resolution,
            &mut warnings,
        )?;
        tasks.push(root_task);

        Ok(Synthesis { tasks, warnings })
    }

    #[allow(clippy::too_many_arguments)]
    fn task_for(
        &self,
        name: &str,
        manifest: &ProjectManifest,
        dir: &Path,
        root_dir: &Path,
        is_dependency: bool,
        features: Vec<String>,
        deps: &[String],
        resolution: &Resolution,
        warnings: &mut Vec<String>,
    ) -> BuildResult<BuildTask> {
        let kind = manifest.kind();
        let plugin = self
            .registry
            .get(kind)
            .ok_or_else(|| BuildError::PluginNotFound {
                kind: kind.to_string(),
                project: name.to_string(),
            })?;

        let settings = manifest.settings.layered(self.profile.name());
        let overlay = match manifest.generator_settings(&self.generator) {
            Some(config) => config.layered(self.profile.name()),
            None => {
                if !manifest.generators.is_empty() {
                    warnings.push(format!(
                        "'{}' declares no settings for generator '{}'; it may be unsupported",
                        name, self.generator
                    ));
                }
                BuildSettings::default()
            }
        };

        let source_dir = dir.join(manifest.build.source_dir());
        let apps_dir = dir.join(manifest.build.apps_dir());
        let include_dir = dir.join(manifest.build.include_dir());

        let task = BuildTask {
            name: name.to_string(),
            version: manifest.version().clone(),
            kind: kind.to_string(),
            project_dir: dir.to_path_buf(),
            root_dir: root_dir.to_path_buf(),
            is_dependency,
            features,
            sources: sources::discover(&source_dir)?,
            entry_points: sources::discover(&apps_dir)?,
            source_dir,
            apps_dir,
            include_dir,
            standards: manifest.standards.clone(),
            settings,
            overlay,
            link_targets: self.link_targets(deps, resolution),
        };

        // Kind-specific validation before any emission: binary used as
        // a dependency, library without sources.
        plugin.check(&task.context())?;

        Ok(task)
    }

    /// Library units in the transitive dependency closure of `deps`,
    /// ordered leaf-first like the resolution itself.
    fn link_targets(&self, deps: &[String], resolution: &Resolution) -> Vec<String> {
        let closure = resolution.closure_of(deps);

        resolution
            .nodes
            .iter()
            .filter(|node| closure.iter().any(|n| n == &node.name))
            .filter(|node| {
                self.registry
                    .get(&node.kind)
                    .map(|p| p.produces_library())
                    .unwrap_or(false)
            })
            .map(|node| sources::sanitize(&node.name))
            .collect()
    }
}
