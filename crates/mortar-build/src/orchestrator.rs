//! Build orchestration
//!
//! Sequences resolution, task synthesis and script emission, writes the
//! generated `CMakeLists.txt` into the project's build directory, and
//! hands off to the external generator and build tool. The script file
//! is written only after every task has emitted successfully; a failure
//! anywhere leaves no partial script behind.

use crate::error::{BuildError, BuildResult};
use crate::plugin::PluginRegistry;
use crate::profile::Profile;
use crate::script::CMakeScript;
use crate::tasks::{BuildTask, TaskSynthesizer};
use crate::toolchain;
use mortar_config::{ManifestLoader, ProjectManifest};
use mortar_resolver::{GitLocator, GraphResolver, Resolution};
use std::fs;
use std::path::{Path, PathBuf};

/// Generator used when the manifest does not pin one
pub const DEFAULT_GENERATOR: &str = "Unix Makefiles";

/// Result of script generation
#[derive(Debug)]
pub struct Generation {
    /// Where the script was written
    pub script_path: PathBuf,
    /// The accumulated script
    pub script: CMakeScript,
    /// Tasks in emission order
    pub tasks: Vec<BuildTask>,
    /// Resolution the tasks were synthesized from
    pub resolution: Resolution,
    /// Non-fatal diagnostics (version conflicts, generator mismatches)
    pub warnings: Vec<String>,
}

/// Main builder orchestrating one project's build
pub struct Builder {
    root_dir: PathBuf,
    manifest: ProjectManifest,
    registry: PluginRegistry,
    build_dir: PathBuf,
    profile: Profile,
    generator: String,
    jobs: Option<usize>,
    verbose: bool,
    allow_fetch: bool,
}

impl Builder {
    /// Create a builder for the project containing `project_dir`
    pub fn new(project_dir: impl AsRef<Path>) -> BuildResult<Self> {
        let (root_dir, manifest) = ManifestLoader::new().find_from(project_dir.as_ref())?;

        let build_dir = root_dir.join(manifest.build.output_dir());
        let generator = manifest
            .build
            .generator
            .clone()
            .unwrap_or_else(|| DEFAULT_GENERATOR.to_string());

        Ok(Self {
            root_dir,
            manifest,
            registry: PluginRegistry::with_builtins(),
            build_dir,
            profile: Profile::default(),
            generator,
            jobs: None,
            verbose: false,
            allow_fetch: true,
        })
    }

    /// Set the build profile
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Override the generator from the manifest
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    /// Override the build directory
    pub fn with_build_dir(mut self, build_dir: PathBuf) -> Self {
        self.build_dir = build_dir;
        self
    }

    /// Parallel job count forwarded to the build tool
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Enable/disable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Allow or forbid remote fetches during resolution
    pub fn with_fetch(mut self, allow_fetch: bool) -> Self {
        self.allow_fetch = allow_fetch;
        self
    }

    pub fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn generator(&self) -> &str {
        &self.generator
    }

    /// Extension point for externally supplied target-kind plugins
    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    /// Directory the generator writes build files into
    pub fn binary_dir(&self) -> PathBuf {
        self.build_dir.join(self.profile.name())
    }

    /// Resolve the dependency closure without generating anything
    pub fn resolve(&self) -> BuildResult<Resolution> {
        let locator = GitLocator::new()?;
        let resolver = GraphResolver::new(&locator, self.allow_fetch);
        Ok(resolver.resolve(&self.root_dir, &self.manifest)?)
    }

    /// Resolve, synthesize and emit the build script.
    ///
    /// `CMakeLists.txt` is written only after every task emitted; any
    /// failure leaves the build directory untouched.
    pub fn generate(&self) -> BuildResult<Generation> {
        let resolution = self.resolve()?;

        let synthesizer = TaskSynthesizer::new(&self.registry, self.profile, &self.generator);
        let synthesis = synthesizer.synthesize(&self.root_dir, &self.manifest, &resolution)?;

        if self.verbose {
            println!(
                "Generating script for {} v{} ({} tasks)",
                self.manifest.name(),
                self.manifest.version(),
                synthesis.tasks.len()
            );
        }

        let mut script = CMakeScript::new();
        script.project(self.manifest.name(), self.manifest.version());

        // Invoking cmake without -DCMAKE_BUILD_TYPE still gets a profile.
        script.if_block("NOT CMAKE_BUILD_TYPE");
        script.set("CMAKE_BUILD_TYPE", self.profile.cmake_build_type());
        script.end_block();

        for task in &synthesis.tasks {
            script.blank();
            script.comment(&format!("{} {}", task.name, task.version));
            task.emit(&self.registry, &mut script)?;
        }

        let mut warnings: Vec<String> =
            resolution.warnings.iter().map(|w| w.to_string()).collect();
        warnings.extend(synthesis.warnings);

        fs::create_dir_all(&self.build_dir).map_err(|e| BuildError::io(&self.build_dir, e))?;
        let script_path = self.build_dir.join("CMakeLists.txt");
        fs::write(&script_path, script.serialize()).map_err(|e| BuildError::io(&script_path, e))?;

        Ok(Generation {
            script_path,
            script,
            tasks: synthesis.tasks,
            resolution,
            warnings,
        })
    }

    /// Generate, then drive the external generator and build tool
    pub fn build(&self, target: Option<&str>) -> BuildResult<Generation> {
        let generation = self.generate()?;

        let binary_dir = self.binary_dir();
        toolchain::configure(
            &self.build_dir,
            &binary_dir,
            &self.generator,
            self.profile.cmake_build_type(),
            self.verbose,
        )?;
        toolchain::build(&binary_dir, target, self.jobs, self.verbose)?;

        Ok(generation)
    }

    /// Build one run target and execute it, forwarding its exit code
    pub fn run(&self, target: &str, args: &[String]) -> BuildResult<i32> {
        let generation = self.generate()?;
        let binary_dir = self.binary_dir();

        // Root task first (it is appended last), then dependencies.
        let mut unit = None;
        let mut artifact = None;
        for task in generation.tasks.iter().rev() {
            if let Some(found) = task.run_unit(&self.registry, target)? {
                artifact = task.artifact_path(&self.registry, target, &binary_dir)?;
                unit = Some(found);
                break;
            }
        }

        let unit = unit.ok_or_else(|| BuildError::TargetNotFound {
            target: target.to_string(),
        })?;
        let artifact = artifact.ok_or_else(|| BuildError::TargetNotFound {
            target: target.to_string(),
        })?;

        toolchain::configure(
            &self.build_dir,
            &binary_dir,
            &self.generator,
            self.profile.cmake_build_type(),
            self.verbose,
        )?;
        toolchain::build(&binary_dir, Some(&unit), self.jobs, self.verbose)?;

        toolchain::run_artifact(&artifact, args)
    }

    /// Remove the build directory
    pub fn clean(&self) -> BuildResult<()> {
        if self.build_dir.exists() {
            fs::remove_dir_all(&self.build_dir).map_err(|e| BuildError::io(&self.build_dir, e))?;
        }
        Ok(())
    }
}
