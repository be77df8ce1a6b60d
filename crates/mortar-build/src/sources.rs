//! Source and entry-point discovery
//!
//! Walks a project's implementation-source and entry-point directories
//! for compilable files. Results are sorted so repeated runs of the
//! synthesizer produce byte-identical scripts.

use crate::error::BuildResult;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Compilable source extensions
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx"];

/// Recursively discover compilable files under `dir`, returned as paths
/// relative to `dir`, sorted. A missing directory yields an empty list;
/// whether that is an error depends on the target kind, so the caller
/// decides.
pub fn discover(dir: &Path) -> BuildResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_source = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
            .unwrap_or(false);
        if is_source {
            // The walk is rooted at `dir`, so the prefix always strips.
            if let Ok(rel) = path.strip_prefix(dir) {
                files.push(rel.to_path_buf());
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Deterministically unique unit identifier for an entry point.
///
/// Derived from the project name and the entry point's path relative to
/// the entry-point directory, so two entry points with the same base
/// name in different subdirectories never collide.
pub fn unit_id(project: &str, entry: &Path) -> String {
    let stem = entry.with_extension("");
    let mut id = sanitize(project);
    for component in stem.components() {
        id.push('_');
        id.push_str(&sanitize(&component.as_os_str().to_string_lossy()));
    }
    id
}

/// Human-readable base name of an entry point (its output name)
pub fn entry_name(entry: &Path) -> String {
    entry
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Sub-path of an entry point below the entry-point directory, mirrored
/// into the output directory (`None` for top-level entries)
pub fn entry_subdir(entry: &Path) -> Option<PathBuf> {
    entry
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
}

/// Replace everything but letters, digits and underscores
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
