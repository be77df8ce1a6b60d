//! External toolchain invocation
//!
//! CMake generate and build steps run as child processes with inherited
//! stdio, so compiler output reaches the user directly. A nonzero exit
//! from any invocation aborts the whole command.

use crate::error::{BuildError, BuildResult};
use std::path::Path;
use std::process::Command;

/// Generate build files: `cmake -S <script_dir> -B <binary_dir> -G <generator>`
pub fn configure(
    script_dir: &Path,
    binary_dir: &Path,
    generator: &str,
    build_type: &str,
    verbose: bool,
) -> BuildResult<()> {
    let mut command = Command::new("cmake");
    command
        .arg("-S")
        .arg(script_dir)
        .arg("-B")
        .arg(binary_dir)
        .arg("-G")
        .arg(generator)
        .arg(format!("-DCMAKE_BUILD_TYPE={}", build_type));

    run("cmake", command, verbose)
}

/// Drive the build: `cmake --build <binary_dir> [--target <t>] [--parallel <n>]`
pub fn build(
    binary_dir: &Path,
    target: Option<&str>,
    jobs: Option<usize>,
    verbose: bool,
) -> BuildResult<()> {
    let mut command = Command::new("cmake");
    command.arg("--build").arg(binary_dir);
    if let Some(target) = target {
        command.args(["--target", target]);
    }
    if let Some(jobs) = jobs {
        command.arg("--parallel").arg(jobs.to_string());
    }

    run("cmake", command, verbose)
}

/// Execute a built artifact, forwarding its exit code
pub fn run_artifact(path: &Path, args: &[String]) -> BuildResult<i32> {
    let status = Command::new(path).args(args).status().map_err(|e| {
        BuildError::io(path, e)
    })?;
    Ok(status.code().unwrap_or(1))
}

fn run(program: &str, mut command: Command, verbose: bool) -> BuildResult<()> {
    if verbose {
        println!("Running: {:?}", command);
    }

    let status = command.status().map_err(BuildError::Io)?;

    if !status.success() {
        return Err(BuildError::ExternalToolFailure {
            program: program.to_string(),
            code: status.code().unwrap_or(-1),
        });
    }

    Ok(())
}
