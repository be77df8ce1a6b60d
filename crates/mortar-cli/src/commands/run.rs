//! Run command - build one entry point and execute it

use anyhow::{Context, Result};
use mortar_build::{Builder, Profile};
use std::path::PathBuf;

/// Run command arguments
pub struct RunArgs {
    /// Project directory
    pub project_dir: PathBuf,
    /// Entry-point base name
    pub target: String,
    /// Build in release mode
    pub release: bool,
    /// Arguments forwarded to the program
    pub args: Vec<String>,
    /// Verbose output
    pub verbose: bool,
}

/// Run the run command; returns the program's exit code
pub fn run(args: RunArgs) -> Result<i32> {
    let mut builder = Builder::new(&args.project_dir).context("Failed to load project")?;

    if args.release {
        builder = builder.with_profile(Profile::Release);
    }
    builder = builder.with_verbose(args.verbose);

    let code = builder
        .run(&args.target, &args.args)
        .with_context(|| format!("Failed to run '{}'", args.target))?;

    Ok(code)
}
