//! Target-kind plugins
//!
//! Every target kind is handled behind the [`TargetPlugin`] capability
//! interface: script-fragment emission, project scaffolding for
//! `mortar new`, and run-target/artifact lookup for `mortar run`. The
//! registry ships the built-in kinds (binary, static, shared, module,
//! header-only, interface) and accepts externally supplied
//! implementations through [`PluginRegistry::register`].

use crate::error::{BuildError, BuildResult};
use crate::script::{CMakeScript, Language, LibraryKind, Visibility};
use crate::sources;
use mortar_config::{BuildSettings, PackageConfig, ProjectManifest, Standards};
use std::path::{Path, PathBuf};

/// Everything a plugin needs to emit one project's script fragment
pub struct EmitContext<'a> {
    /// Project name (dependency declaration key, or the root's name)
    pub name: &'a str,
    /// Project version
    pub version: &'a semver::Version,
    /// Project root directory
    pub project_dir: &'a Path,
    /// Root project directory of the whole build
    pub root_dir: &'a Path,
    /// True when this project was reached as a dependency
    pub is_dependency: bool,
    /// Requested features, post-expansion
    pub features: &'a [String],
    /// Implementation sources, relative to `source_dir`, sorted
    pub sources: &'a [PathBuf],
    /// Entry points, relative to `apps_dir`, sorted
    pub entry_points: &'a [PathBuf],
    /// Absolute implementation-source directory
    pub source_dir: &'a Path,
    /// Absolute entry-point directory
    pub apps_dir: &'a Path,
    /// Absolute public-header directory
    pub include_dir: &'a Path,
    /// Per-language standards
    pub standards: &'a Standards,
    /// Project settings, base plus active profile, merged
    pub settings: &'a BuildSettings,
    /// Generator overlay for the active generator, profile-merged;
    /// empty when the project declares none
    pub overlay: &'a BuildSettings,
    /// Library units of the dependency closure, leaf-first
    pub link_targets: &'a [String],
}

impl EmitContext<'_> {
    fn absolute_sources(&self) -> Vec<PathBuf> {
        self.sources.iter().map(|s| self.source_dir.join(s)).collect()
    }

    fn library_unit(&self) -> String {
        sources::sanitize(self.name)
    }

    /// Entry point whose base name matches `target`
    fn entry_for(&self, target: &str) -> Option<&PathBuf> {
        self.entry_points
            .iter()
            .find(|e| sources::entry_name(e) == target)
    }
}

/// Capability interface for one target kind
pub trait TargetPlugin {
    /// Kind name this plugin handles
    fn kind(&self) -> &str;

    /// Whether emission defines a library unit dependents link against
    fn produces_library(&self) -> bool;

    /// Validate a project of this kind before any emission happens
    fn check(&self, ctx: &EmitContext<'_>) -> BuildResult<()>;

    /// Append this project's build-script fragment
    fn emit(&self, ctx: &EmitContext<'_>, script: &mut CMakeScript) -> BuildResult<()>;

    /// Create scaffold files for a new project of this kind
    fn scaffold(&self, name: &str, root: &Path) -> BuildResult<()>;

    /// Unit executed by `mortar run <target>`, if this kind has one
    fn run_unit(&self, ctx: &EmitContext<'_>, target: &str) -> Option<String> {
        ctx.entry_for(target)
            .map(|entry| sources::unit_id(ctx.name, entry))
    }

    /// Where the built executable for `target` lands under the
    /// generator's binary directory
    fn artifact_path(
        &self,
        ctx: &EmitContext<'_>,
        target: &str,
        binary_dir: &Path,
    ) -> Option<PathBuf> {
        let entry = ctx.entry_for(target)?;
        let mut path = binary_dir.join("bin");
        if let Some(sub) = sources::entry_subdir(entry) {
            path.push(sub);
        }
        Some(path.join(sources::entry_name(entry)))
    }
}

/// Registry of target-kind plugins
pub struct PluginRegistry {
    plugins: Vec<Box<dyn TargetPlugin>>,
}

impl PluginRegistry {
    /// Registry with the built-in kinds
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            plugins: Vec::new(),
        };
        registry.register(Box::new(BinaryPlugin));
        registry.register(Box::new(LibraryPlugin::new("static", LibraryKind::Static)));
        registry.register(Box::new(LibraryPlugin::new("shared", LibraryKind::Shared)));
        registry.register(Box::new(LibraryPlugin::new("module", LibraryKind::Static)));
        registry.register(Box::new(HeaderOnlyPlugin::new("header-only")));
        registry.register(Box::new(HeaderOnlyPlugin::new("interface")));
        registry
    }

    /// Register an externally supplied plugin; a later registration
    /// shadows an earlier one for the same kind.
    pub fn register(&mut self, plugin: Box<dyn TargetPlugin>) {
        self.plugins.push(plugin);
    }

    /// Plugin for a kind name
    pub fn get(&self, kind: &str) -> Option<&dyn TargetPlugin> {
        self.plugins
            .iter()
            .rev()
            .find(|p| p.kind() == kind)
            .map(|p| p.as_ref())
    }

    /// Registered kind names, registration order
    pub fn kinds(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.kind()).collect()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Per-unit settings shared by every compilable unit of a project:
/// include directories, standards, defines (version components always
/// included), options, then the settings-level link inputs.
fn apply_unit_settings(ctx: &EmitContext<'_>, script: &mut CMakeScript, unit: &str) {
    let include_dirs: Vec<PathBuf> = ctx
        .settings
        .include_dirs
        .iter()
        .map(|d| absolute(ctx.project_dir, d))
        .collect();
    script.include_directories(unit, Visibility::Private, &include_dirs);

    if let Some(std) = &ctx.standards.c {
        script.set_standard(unit, Language::C, std);
    }
    if let Some(std) = &ctx.standards.cxx {
        script.set_standard(unit, Language::Cxx, std);
    }

    let mut defines = version_defines(ctx.name, ctx.version);
    defines.extend(ctx.settings.defines.iter().cloned());
    script.compile_definitions(unit, Visibility::Private, &defines);

    script.compile_options(unit, Visibility::Private, &ctx.settings.compile_options);
    script.link_options(unit, Visibility::Private, &ctx.settings.link_options);

    let link_dirs: Vec<PathBuf> = ctx
        .settings
        .link_dirs
        .iter()
        .map(|d| absolute(ctx.project_dir, d))
        .collect();
    script.link_directories(unit, Visibility::Private, &link_dirs);
    script.link_libraries(unit, Visibility::Private, &ctx.settings.link_libraries);
}

/// Requested features become unit-scoped defines, ahead of the overlay
fn apply_feature_defines(ctx: &EmitContext<'_>, script: &mut CMakeScript, unit: &str) {
    script.compile_definitions(unit, Visibility::Private, &feature_defines(ctx.name, ctx.features));
}

/// Generator-specific overlay, applied last
fn apply_overlay(ctx: &EmitContext<'_>, script: &mut CMakeScript, unit: &str) {
    script.compile_options(unit, Visibility::Private, &ctx.overlay.compile_options);
    script.link_options(unit, Visibility::Private, &ctx.overlay.link_options);
    script.compile_definitions(unit, Visibility::Private, &ctx.overlay.defines);
    let link_dirs: Vec<PathBuf> = ctx
        .overlay
        .link_dirs
        .iter()
        .map(|d| absolute(ctx.project_dir, d))
        .collect();
    script.link_directories(unit, Visibility::Private, &link_dirs);
    script.link_libraries(unit, Visibility::Private, &ctx.overlay.link_libraries);
}

/// `<NAME>_VERSION_MAJOR/MINOR/PATCH` from the project's own version
pub fn version_defines(name: &str, version: &semver::Version) -> Vec<String> {
    let prefix = sources::sanitize(name).to_uppercase();
    vec![
        format!("{}_VERSION_MAJOR={}", prefix, version.major),
        format!("{}_VERSION_MINOR={}", prefix, version.minor),
        format!("{}_VERSION_PATCH={}", prefix, version.patch),
    ]
}

/// `<NAME>_FEATURE_<FEAT>` for every expanded feature
pub fn feature_defines(name: &str, features: &[String]) -> Vec<String> {
    let prefix = sources::sanitize(name).to_uppercase();
    features
        .iter()
        .map(|f| format!("{}_FEATURE_{}", prefix, sources::sanitize(f).to_uppercase()))
        .collect()
}

fn absolute(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Output directory expression mirroring an entry point's sub-path
fn entry_output_dir(entry: &Path) -> String {
    match sources::entry_subdir(entry) {
        Some(sub) => format!(
            "${{CMAKE_BINARY_DIR}}/bin/{}",
            sub.display().to_string().replace('\\', "/")
        ),
        None => "${CMAKE_BINARY_DIR}/bin".to_string(),
    }
}

/// Executable projects: one unit per entry point, root only
struct BinaryPlugin;

impl TargetPlugin for BinaryPlugin {
    fn kind(&self) -> &str {
        "binary"
    }

    fn produces_library(&self) -> bool {
        false
    }

    fn check(&self, ctx: &EmitContext<'_>) -> BuildResult<()> {
        if ctx.is_dependency {
            return Err(BuildError::BinaryAsDependency {
                project: ctx.name.to_string(),
            });
        }
        if ctx.entry_points.is_empty() {
            return Err(BuildError::missing_sources(ctx.name));
        }
        Ok(())
    }

    fn emit(&self, ctx: &EmitContext<'_>, script: &mut CMakeScript) -> BuildResult<()> {
        let shared_sources = ctx.absolute_sources();

        for entry in ctx.entry_points {
            let unit = sources::unit_id(ctx.name, entry);
            let mut unit_sources = shared_sources.clone();
            unit_sources.push(ctx.apps_dir.join(entry));

            script.add_executable(&unit, &unit_sources);
            script.set_output_name(&unit, &sources::entry_name(entry));
            script.set_output_directory(&unit, &entry_output_dir(entry));
            if ctx.include_dir.is_dir() {
                script.include_directories(&unit, Visibility::Private, &[ctx.include_dir]);
            }
            apply_unit_settings(ctx, script, &unit);
            script.link_libraries(&unit, Visibility::Private, ctx.link_targets);
            apply_feature_defines(ctx, script, &unit);
            apply_overlay(ctx, script, &unit);
        }

        Ok(())
    }

    fn scaffold(&self, name: &str, root: &Path) -> BuildResult<()> {
        write_manifest(name, self.kind(), root)?;
        create_dir(&root.join("src"))?;
        write_file(
            &root.join("apps").join("main.cpp"),
            &format!(
                "#include <cstdio>\n\nint main() {{\n    std::printf(\"hello from {}\\n\");\n    return 0;\n}}\n",
                name
            ),
        )
    }
}

/// Compiled library projects: one library unit plus demo executables
struct LibraryPlugin {
    kind_name: &'static str,
    flavor: LibraryKind,
}

impl LibraryPlugin {
    fn new(kind_name: &'static str, flavor: LibraryKind) -> Self {
        Self { kind_name, flavor }
    }
}

impl TargetPlugin for LibraryPlugin {
    fn kind(&self) -> &str {
        self.kind_name
    }

    fn produces_library(&self) -> bool {
        true
    }

    fn check(&self, ctx: &EmitContext<'_>) -> BuildResult<()> {
        if ctx.sources.is_empty() {
            return Err(BuildError::missing_sources(ctx.name));
        }
        Ok(())
    }

    fn emit(&self, ctx: &EmitContext<'_>, script: &mut CMakeScript) -> BuildResult<()> {
        let unit = ctx.library_unit();

        script.add_library(&unit, self.flavor, &ctx.absolute_sources());
        if ctx.include_dir.is_dir() {
            // Dependents compile against this library's public headers.
            script.include_directories(&unit, Visibility::Public, &[ctx.include_dir]);
        }
        apply_unit_settings(ctx, script, &unit);
        script.link_libraries(&unit, Visibility::Public, ctx.link_targets);
        apply_feature_defines(ctx, script, &unit);
        apply_overlay(ctx, script, &unit);

        for entry in ctx.entry_points {
            let demo = sources::unit_id(ctx.name, entry);
            script.add_executable(&demo, &[ctx.apps_dir.join(entry)]);
            script.set_output_name(&demo, &sources::entry_name(entry));
            script.set_output_directory(&demo, &entry_output_dir(entry));
            script.link_libraries(&demo, Visibility::Private, &[unit.clone()]);
        }

        Ok(())
    }

    fn scaffold(&self, name: &str, root: &Path) -> BuildResult<()> {
        write_manifest(name, self.kind(), root)?;
        let guard = sources::sanitize(name).to_uppercase();
        write_file(
            &root.join("include").join(name).join(format!("{}.hpp", name)),
            &format!(
                "#ifndef {guard}_HPP\n#define {guard}_HPP\n\nnamespace {ns} {{\n\nint answer();\n\n}} // namespace {ns}\n\n#endif\n",
                guard = guard,
                ns = sources::sanitize(name)
            ),
        )?;
        write_file(
            &root.join("src").join(format!("{}.cpp", name)),
            &format!(
                "#include <{name}/{name}.hpp>\n\nnamespace {ns} {{\n\nint answer() {{\n    return 42;\n}}\n\n}} // namespace {ns}\n",
                name = name,
                ns = sources::sanitize(name)
            ),
        )
    }
}

/// Header-only projects: an include directory and optional demo units
struct HeaderOnlyPlugin {
    kind_name: &'static str,
}

impl HeaderOnlyPlugin {
    fn new(kind_name: &'static str) -> Self {
        Self { kind_name }
    }
}

impl TargetPlugin for HeaderOnlyPlugin {
    fn kind(&self) -> &str {
        self.kind_name
    }

    fn produces_library(&self) -> bool {
        false
    }

    fn check(&self, _ctx: &EmitContext<'_>) -> BuildResult<()> {
        Ok(())
    }

    fn emit(&self, ctx: &EmitContext<'_>, script: &mut CMakeScript) -> BuildResult<()> {
        let include_dir = if ctx.include_dir.is_dir() {
            ctx.include_dir.to_path_buf()
        } else {
            ctx.project_dir.to_path_buf()
        };
        script.global_include_directories(&[include_dir]);
        script.global_definitions(&feature_defines(ctx.name, ctx.features));

        for entry in ctx.entry_points {
            let demo = sources::unit_id(ctx.name, entry);
            script.add_executable(&demo, &[ctx.apps_dir.join(entry)]);
            script.set_output_name(&demo, &sources::entry_name(entry));
            script.set_output_directory(&demo, &entry_output_dir(entry));
            // Nothing to link: the project has no compiled unit.
            apply_overlay(ctx, script, &demo);
        }

        Ok(())
    }

    fn scaffold(&self, name: &str, root: &Path) -> BuildResult<()> {
        write_manifest(name, self.kind(), root)?;
        let guard = sources::sanitize(name).to_uppercase();
        write_file(
            &root.join("include").join(name).join(format!("{}.hpp", name)),
            &format!(
                "#ifndef {guard}_HPP\n#define {guard}_HPP\n\nnamespace {ns} {{\n\ninline int answer() {{\n    return 42;\n}}\n\n}} // namespace {ns}\n\n#endif\n",
                guard = guard,
                ns = sources::sanitize(name)
            ),
        )
    }
}

fn write_manifest(name: &str, kind: &str, root: &Path) -> BuildResult<()> {
    let manifest = ProjectManifest {
        package: PackageConfig {
            name: name.to_string(),
            version: semver::Version::new(0, 1, 0),
            kind: kind.to_string(),
            description: None,
            authors: Vec::new(),
            license: None,
        },
        build: Default::default(),
        standards: Standards {
            c: None,
            cxx: Some("17".to_string()),
        },
        settings: Default::default(),
        generators: Default::default(),
        features: Default::default(),
        dependencies: Default::default(),
    };

    let content = manifest.to_toml().map_err(|e| {
        BuildError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            e.to_string(),
        ))
    })?;
    write_file(&root.join(mortar_config::MANIFEST_FILE), &content)
}

fn create_dir(dir: &Path) -> BuildResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))
}

fn write_file(path: &Path, content: &str) -> BuildResult<()> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    std::fs::write(path, content).map_err(|e| BuildError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context<'a>(
        name: &'a str,
        version: &'a semver::Version,
        dir: &'a Path,
        is_dependency: bool,
        sources: &'a [PathBuf],
        entry_points: &'a [PathBuf],
        dirs: &'a (PathBuf, PathBuf, PathBuf),
        standards: &'a Standards,
        settings: &'a BuildSettings,
        overlay: &'a BuildSettings,
        link_targets: &'a [String],
    ) -> EmitContext<'a> {
        EmitContext {
            name,
            version,
            project_dir: dir,
            root_dir: dir,
            is_dependency,
            features: &[],
            sources,
            entry_points,
            source_dir: &dirs.0,
            apps_dir: &dirs.1,
            include_dir: &dirs.2,
            standards,
            settings,
            overlay,
            link_targets,
        }
    }

    #[test]
    fn test_registry_builtin_kinds() {
        let registry = PluginRegistry::with_builtins();
        for kind in ["binary", "static", "shared", "module", "header-only", "interface"] {
            assert!(registry.get(kind).is_some(), "missing builtin '{kind}'");
        }
        assert!(registry.get("wasm").is_none());
    }

    #[test]
    fn test_registry_later_registration_shadows() {
        struct Custom;
        impl TargetPlugin for Custom {
            fn kind(&self) -> &str {
                "binary"
            }
            fn produces_library(&self) -> bool {
                true
            }
            fn check(&self, _: &EmitContext<'_>) -> BuildResult<()> {
                Ok(())
            }
            fn emit(&self, _: &EmitContext<'_>, _: &mut CMakeScript) -> BuildResult<()> {
                Ok(())
            }
            fn scaffold(&self, _: &str, _: &Path) -> BuildResult<()> {
                Ok(())
            }
        }

        let mut registry = PluginRegistry::with_builtins();
        registry.register(Box::new(Custom));
        assert!(registry.get("binary").unwrap().produces_library());
    }

    #[test]
    fn test_binary_rejected_as_dependency() {
        let temp = TempDir::new().unwrap();
        let version = semver::Version::new(1, 0, 0);
        let dirs = (
            temp.path().join("src"),
            temp.path().join("apps"),
            temp.path().join("include"),
        );
        let entries = vec![PathBuf::from("main.cpp")];
        let standards = Standards::default();
        let settings = BuildSettings::default();
        let overlay = BuildSettings::default();
        let ctx = context(
            "tool", &version, temp.path(), true, &[], &entries, &dirs, &standards, &settings,
            &overlay, &[],
        );

        let err = BinaryPlugin.check(&ctx).unwrap_err();
        assert!(matches!(err, BuildError::BinaryAsDependency { .. }));
    }

    #[test]
    fn test_library_without_sources_fails_check() {
        let temp = TempDir::new().unwrap();
        let version = semver::Version::new(1, 0, 0);
        let dirs = (
            temp.path().join("src"),
            temp.path().join("apps"),
            temp.path().join("include"),
        );
        let standards = Standards::default();
        let settings = BuildSettings::default();
        let overlay = BuildSettings::default();
        let ctx = context(
            "buffers", &version, temp.path(), true, &[], &[], &dirs, &standards, &settings,
            &overlay, &[],
        );

        let plugin = LibraryPlugin::new("static", LibraryKind::Static);
        let err = plugin.check(&ctx).unwrap_err();
        match err {
            BuildError::MissingSources { project } => assert_eq!(project, "buffers"),
            other => panic!("expected MissingSources, got {other:?}"),
        }
    }

    #[test]
    fn test_binary_emits_one_unit_per_entry_point() {
        let temp = TempDir::new().unwrap();
        let version = semver::Version::new(2, 1, 0);
        let dirs = (
            temp.path().join("src"),
            temp.path().join("apps"),
            temp.path().join("include"),
        );
        let srcs = vec![PathBuf::from("core.cpp")];
        let entries = vec![PathBuf::from("cli.cpp"), PathBuf::from("tools/dump.cpp")];
        let standards = Standards {
            c: None,
            cxx: Some("17".to_string()),
        };
        let settings = BuildSettings::default();
        let overlay = BuildSettings::default();
        let link_targets = ["netkit".to_string()];
        let ctx = context(
            "app", &version, temp.path(), false, &srcs, &entries, &dirs, &standards, &settings,
            &overlay, &link_targets,
        );

        let mut script = CMakeScript::new();
        BinaryPlugin.emit(&ctx, &mut script).unwrap();
        let text = script.serialize();

        assert!(text.contains("add_executable(app_cli "));
        assert!(text.contains("add_executable(app_tools_dump "));
        assert!(text.contains("OUTPUT_NAME \"dump\""));
        assert!(text.contains("RUNTIME_OUTPUT_DIRECTORY \"${CMAKE_BINARY_DIR}/bin/tools\""));
        assert!(text.contains("target_compile_definitions(app_cli PRIVATE APP_VERSION_MAJOR=2 APP_VERSION_MINOR=1 APP_VERSION_PATCH=0)"));
        assert!(text.contains("target_link_libraries(app_cli PRIVATE netkit)"));
        assert!(text.contains("CXX_STANDARD 17"));
    }

    #[test]
    fn test_library_emits_library_then_demos() {
        let temp = TempDir::new().unwrap();
        let version = semver::Version::new(1, 0, 0);
        let dirs = (
            temp.path().join("src"),
            temp.path().join("apps"),
            temp.path().join("include"),
        );
        std::fs::create_dir_all(&dirs.2).unwrap();
        let srcs = vec![PathBuf::from("lib.cpp")];
        let entries = vec![PathBuf::from("demo.cpp")];
        let standards = Standards::default();
        let settings = BuildSettings::default();
        let overlay = BuildSettings::default();
        let ctx = context(
            "netkit", &version, temp.path(), true, &srcs, &entries, &dirs, &standards, &settings,
            &overlay, &[],
        );

        let mut script = CMakeScript::new();
        LibraryPlugin::new("shared", LibraryKind::Shared)
            .emit(&ctx, &mut script)
            .unwrap();
        let text = script.serialize();

        assert!(text.contains("add_library(netkit SHARED "));
        assert!(text.contains("target_include_directories(netkit PUBLIC "));
        assert!(text.contains("add_executable(netkit_demo "));
        assert!(text.contains("target_link_libraries(netkit_demo PRIVATE netkit)"));

        let library_pos = text.find("add_library(netkit").unwrap();
        let demo_pos = text.find("add_executable(netkit_demo").unwrap();
        assert!(library_pos < demo_pos);
    }

    #[test]
    fn test_feature_defines_precede_overlay() {
        let temp = TempDir::new().unwrap();
        let version = semver::Version::new(1, 0, 0);
        let dirs = (
            temp.path().join("src"),
            temp.path().join("apps"),
            temp.path().join("include"),
        );
        let srcs = vec![PathBuf::from("lib.cpp")];
        let standards = Standards::default();
        let settings = BuildSettings::default();
        let overlay = BuildSettings {
            defines: vec!["NINJA_TUNED".to_string()],
            ..Default::default()
        };
        let features = vec!["ssl".to_string()];
        let mut ctx = context(
            "netkit", &version, temp.path(), true, &srcs, &[], &dirs, &standards, &settings,
            &overlay, &[],
        );
        ctx.features = &features;

        let mut script = CMakeScript::new();
        LibraryPlugin::new("static", LibraryKind::Static)
            .emit(&ctx, &mut script)
            .unwrap();
        let text = script.serialize();

        let feature_pos = text.find("NETKIT_FEATURE_SSL").unwrap();
        let overlay_pos = text.find("NINJA_TUNED").unwrap();
        assert!(feature_pos < overlay_pos);
    }

    #[test]
    fn test_header_only_registers_include_dir() {
        let temp = TempDir::new().unwrap();
        let version = semver::Version::new(1, 0, 0);
        let dirs = (
            temp.path().join("src"),
            temp.path().join("apps"),
            temp.path().join("include"),
        );
        std::fs::create_dir_all(&dirs.2).unwrap();
        let standards = Standards::default();
        let settings = BuildSettings::default();
        let overlay = BuildSettings::default();
        let ctx = context(
            "span-lite", &version, temp.path(), true, &[], &[], &dirs, &standards, &settings,
            &overlay, &[],
        );

        let mut script = CMakeScript::new();
        HeaderOnlyPlugin::new("header-only")
            .emit(&ctx, &mut script)
            .unwrap();
        let text = script.serialize();

        assert!(text.contains("include_directories("));
        assert!(!text.contains("add_library"));
        assert!(!text.contains("add_executable"));
    }

    #[test]
    fn test_run_unit_and_artifact_path() {
        let temp = TempDir::new().unwrap();
        let version = semver::Version::new(1, 0, 0);
        let dirs = (
            temp.path().join("src"),
            temp.path().join("apps"),
            temp.path().join("include"),
        );
        let entries = vec![PathBuf::from("cli.cpp"), PathBuf::from("tools/dump.cpp")];
        let standards = Standards::default();
        let settings = BuildSettings::default();
        let overlay = BuildSettings::default();
        let ctx = context(
            "app", &version, temp.path(), false, &[], &entries, &dirs, &standards, &settings,
            &overlay, &[],
        );

        let plugin = BinaryPlugin;
        assert_eq!(plugin.run_unit(&ctx, "dump"), Some("app_tools_dump".to_string()));
        assert_eq!(plugin.run_unit(&ctx, "missing"), None);

        let artifact = plugin
            .artifact_path(&ctx, "dump", Path::new("/b/debug"))
            .unwrap();
        assert_eq!(artifact, Path::new("/b/debug/bin/tools/dump"));
    }

    #[test]
    fn test_scaffold_binary() {
        let temp = TempDir::new().unwrap();
        BinaryPlugin.scaffold("hello", temp.path()).unwrap();

        assert!(temp.path().join("mortar.toml").exists());
        assert!(temp.path().join("apps").join("main.cpp").exists());
        assert!(temp.path().join("src").is_dir());

        let manifest = ProjectManifest::from_file(&temp.path().join("mortar.toml")).unwrap();
        assert_eq!(manifest.name(), "hello");
        assert_eq!(manifest.kind(), "binary");
    }

    #[test]
    fn test_scaffold_header_only() {
        let temp = TempDir::new().unwrap();
        HeaderOnlyPlugin::new("header-only")
            .scaffold("span-lite", temp.path())
            .unwrap();

        assert!(temp
            .path()
            .join("include")
            .join("span-lite")
            .join("span-lite.hpp")
            .exists());
    }
}
