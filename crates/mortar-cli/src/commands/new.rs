//! New command - scaffold a project for a target kind

use anyhow::{bail, Context, Result};
use mortar_build::PluginRegistry;
use std::path::PathBuf;

/// New command arguments
pub struct NewArgs {
    /// Project name (also the directory created)
    pub name: String,
    /// Target kind to scaffold
    pub kind: String,
    /// Directory the project directory is created in
    pub parent_dir: PathBuf,
}

/// Run the new command
pub fn run(args: NewArgs) -> Result<()> {
    let registry = PluginRegistry::with_builtins();
    let Some(plugin) = registry.get(&args.kind) else {
        bail!(
            "unknown target kind '{}' (available: {})",
            args.kind,
            registry.kinds().join(", ")
        );
    };

    let project_dir = args.parent_dir.join(&args.name);
    if project_dir.exists() {
        bail!("{} already exists", project_dir.display());
    }

    std::fs::create_dir_all(&project_dir)
        .with_context(|| format!("Failed to create {}", project_dir.display()))?;

    plugin
        .scaffold(&args.name, &project_dir)
        .with_context(|| format!("Failed to scaffold '{}'", args.name))?;

    println!(
        "Created {} project '{}' at {}",
        args.kind,
        args.name,
        project_dir.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_binary_project() {
        let temp = TempDir::new().unwrap();
        run(NewArgs {
            name: "hello".to_string(),
            kind: "binary".to_string(),
            parent_dir: temp.path().to_path_buf(),
        })
        .unwrap();

        let project = temp.path().join("hello");
        assert!(project.join("mortar.toml").exists());
        assert!(project.join("apps").join("main.cpp").exists());
    }

    #[test]
    fn test_new_rejects_existing_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("taken")).unwrap();

        let result = run(NewArgs {
            name: "taken".to_string(),
            kind: "binary".to_string(),
            parent_dir: temp.path().to_path_buf(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_unknown_kind() {
        let temp = TempDir::new().unwrap();
        let result = run(NewArgs {
            name: "x".to_string(),
            kind: "wasm".to_string(),
            parent_dir: temp.path().to_path_buf(),
        });
        assert!(result.is_err());
    }
}
