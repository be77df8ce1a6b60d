//! CLI command implementations

pub mod build;
pub mod clean;
pub mod install;
pub mod list;
pub mod new;
pub mod run;
pub mod uninstall;

use colored::Colorize;

/// Print non-fatal diagnostics collected during a command
pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
}

/// Derive the store package name from a git URL or `@author/repo`
/// shorthand: the last path segment, without a `.git` suffix.
pub fn package_name_of(source: &str) -> Option<String> {
    let trimmed = source.trim_end_matches('/');
    let last = trimmed.rsplit('/').next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
