//! Build command - resolve, generate and drive the toolchain

use anyhow::{Context, Result};
use mortar_build::{Builder, Profile};
use std::path::PathBuf;

/// Build command arguments
pub struct BuildArgs {
    /// Project directory (defaults to the current directory)
    pub project_dir: PathBuf,
    /// Specific unit to build
    pub target: Option<String>,
    /// Build in release mode
    pub release: bool,
    /// Generator override
    pub generator: Option<String>,
    /// Build directory override
    pub build_dir: Option<PathBuf>,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
    /// Forbid remote fetches
    pub no_fetch: bool,
    /// Verbose output
    pub verbose: bool,
}

/// Run the build command
pub fn run(args: BuildArgs) -> Result<()> {
    let builder = configure_builder(&args).context("Failed to load project")?;

    let generation = builder
        .build(args.target.as_deref())
        .context("Build failed")?;

    super::print_warnings(&generation.warnings);

    println!(
        "Built {} task(s); script at {}",
        generation.tasks.len(),
        generation.script_path.display()
    );

    Ok(())
}

/// Shared builder setup for build and run
pub fn configure_builder(args: &BuildArgs) -> Result<Builder> {
    let mut builder = Builder::new(&args.project_dir)?;

    if args.release {
        builder = builder.with_profile(Profile::Release);
    }
    if let Some(generator) = &args.generator {
        builder = builder.with_generator(generator.clone());
    }
    if let Some(build_dir) = &args.build_dir {
        builder = builder.with_build_dir(build_dir.clone());
    }

    Ok(builder
        .with_jobs(args.jobs)
        .with_fetch(!args.no_fetch)
        .with_verbose(args.verbose))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(root: &std::path::Path) -> PathBuf {
        let project = root.join("app");
        fs::create_dir_all(project.join("apps")).unwrap();
        fs::write(
            project.join("mortar.toml"),
            "[package]\nname = \"app\"\nversion = \"1.0.0\"\n",
        )
        .unwrap();
        fs::write(project.join("apps").join("main.cpp"), "int main() {}\n").unwrap();
        project
    }

    #[test]
    fn test_configure_builder_profile() {
        let temp = TempDir::new().unwrap();
        let project = fixture(temp.path());

        let args = BuildArgs {
            project_dir: project,
            target: None,
            release: true,
            generator: Some("Ninja".to_string()),
            build_dir: None,
            jobs: Some(4),
            no_fetch: true,
            verbose: false,
        };

        let builder = configure_builder(&args).unwrap();
        assert_eq!(builder.generator(), "Ninja");
        assert!(builder.binary_dir().ends_with("build/release"));
    }
}
