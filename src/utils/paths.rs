//! Path utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Manifest;

/// Locate the manifest, either the explicit one or by searching upward
pub fn locate_manifest(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Manifest not found: {}", path.display());
            }
            Ok(path.to_path_buf())
        }
        None => {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Manifest::find_from(&current_dir)
        }
    }
}

/// Make the manifest's directory the working directory
///
/// All relative paths (output directory, collections, staging sources) are
/// resolved from the project root, wherever the command was started.
pub fn enter_project_root(manifest_path: &Path) -> Result<PathBuf> {
    let manifest_path = manifest_path
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", manifest_path.display()))?;
    let root = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .context("Manifest path has no parent directory")?;

    std::env::set_current_dir(&root)
        .with_context(|| format!("Failed to enter project root {}", root.display()))?;

    Ok(root)
}

/// Ensure a directory exists
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_locate_explicit_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = temp_dir.path().join("custom.toml");

        assert!(locate_manifest(Some(&manifest)).is_err());

        std::fs::write(&manifest, "[project]\nname = \"app\"\n").unwrap();
        assert_eq!(locate_manifest(Some(&manifest)).unwrap(), manifest);
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");

        ensure_dir(&nested).unwrap();
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
