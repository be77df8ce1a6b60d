use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;

/// Mortar build tool for native C/C++ projects.
///
/// Mortar resolves a project's dependency declarations (local paths and
/// version-tagged git repositories), deduplicates the transitive
/// closure, and generates a single CMake build script that drives the
/// compiler toolchain.
///
/// EXAMPLES:
///     mortar new hello                Create a new binary project
///     mortar build                    Build the current project
///     mortar build -r                 Build with the release profile
///     mortar run main -- --help       Build and run an entry point
///     mortar list deps                Show the resolved dependency closure
///     mortar install @acme/buffers    Fetch a package into the store
///
/// ENVIRONMENT VARIABLES:
///     MORTAR_GENERATOR  Default CMake generator to drive
///     NO_COLOR          Set to disable colored output
#[derive(Parser)]
#[command(name = "mortar")]
#[command(version)]
#[command(propagate_version = true)]
#[command(after_help = "For more information, see: https://github.com/mortar-build/mortar")]
struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project
    ///
    /// Scaffolds a manifest and starter sources for the chosen target
    /// kind in a fresh directory named after the project.
    ///
    /// EXAMPLES:
    ///     mortar new hello                  Binary project
    ///     mortar new buffers --kind static  Static library project
    #[command(visible_alias = "n")]
    New {
        /// Project name
        name: String,
        /// Target kind: binary, static, shared, module, header-only, interface
        #[arg(long, default_value = "binary")]
        kind: String,
    },

    /// Build the project
    ///
    /// Resolves dependencies, generates the build script, and drives
    /// the external generator and build tool.
    ///
    /// EXAMPLES:
    ///     mortar build              Build everything (debug)
    ///     mortar build -r           Build everything (release)
    ///     mortar build app_main     Build one unit
    #[command(visible_alias = "b")]
    Build {
        /// Specific unit to build (default: everything)
        target: Option<String>,
        /// Build with the release profile
        #[arg(short = 'r', long)]
        release: bool,
        /// CMake generator to drive
        #[arg(long, env = "MORTAR_GENERATOR")]
        generator: Option<String>,
        /// Build output directory
        #[arg(long)]
        build_dir: Option<PathBuf>,
        /// Number of parallel jobs forwarded to the build tool
        #[arg(short, long)]
        jobs: Option<usize>,
        /// Skip remote fetches; everything must already be local
        #[arg(long)]
        no_fetch: bool,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Build one entry point and run it
    ///
    /// The target is an entry point's base name; everything after `--`
    /// is forwarded to the program.
    ///
    /// EXAMPLES:
    ///     mortar run main
    ///     mortar run dump -- --input data.bin
    #[command(visible_alias = "r")]
    Run {
        /// Entry-point base name to run
        target: String,
        /// Build with the release profile
        #[arg(short = 'r', long)]
        release: bool,
        /// Arguments forwarded to the program
        #[arg(last = true)]
        args: Vec<String>,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Remove the build directory
    Clean,

    /// List project information
    ///
    /// EXAMPLES:
    ///     mortar list deps        Resolved dependency closure
    ///     mortar list include     Include directories in play
    ///     mortar list plugins     Registered target kinds
    ///     mortar list installed   Contents of the package store
    List {
        /// What to list
        #[command(subcommand)]
        what: commands::list::ListWhat,
    },

    /// Fetch a package into the per-user store
    ///
    /// EXAMPLES:
    ///     mortar install @acme/buffers
    ///     mortar install https://github.com/acme/buffers --version 1.2.0
    Install {
        /// Git URL or @author/repo shorthand
        source: String,
        /// Version tag to fetch (default: highest)
        #[arg(long)]
        version: Option<semver::Version>,
    },

    /// Remove a package from the per-user store
    Uninstall {
        /// Git URL or @author/repo shorthand
        source: String,
        /// Version to remove (default: every version)
        #[arg(long)]
        version: Option<semver::Version>,
    },
}

fn main() {
    let cli = Cli::parse();

    match dispatch(cli) {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("{} {:#}", "error:".red().bold(), error);
            std::process::exit(1);
        }
    }
}

fn dispatch(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::New { name, kind } => {
            commands::new::run(commands::new::NewArgs {
                name,
                kind,
                parent_dir: cli.dir,
            })?;
            Ok(0)
        }
        Commands::Build {
            target,
            release,
            generator,
            build_dir,
            jobs,
            no_fetch,
            verbose,
        } => {
            commands::build::run(commands::build::BuildArgs {
                project_dir: cli.dir,
                target,
                release,
                generator,
                build_dir,
                jobs,
                no_fetch,
                verbose,
            })?;
            Ok(0)
        }
        Commands::Run {
            target,
            release,
            args,
            verbose,
        } => commands::run::run(commands::run::RunArgs {
            project_dir: cli.dir,
            target,
            release,
            args,
            verbose,
        }),
        Commands::Clean => {
            commands::clean::run(&cli.dir)?;
            Ok(0)
        }
        Commands::List { what } => {
            commands::list::run(&cli.dir, what)?;
            Ok(0)
        }
        Commands::Install { source, version } => {
            commands::install::run(&source, version.as_ref())?;
            Ok(0)
        }
        Commands::Uninstall { source, version } => {
            commands::uninstall::run(&source, version.as_ref())?;
            Ok(0)
        }
    }
}
