//! Asset staging into the output directory
//!
//! Each `[[stage]]` entry copies a file or a directory tree into the output
//! directory before the compiler runs. Directory copies merge into whatever
//! is already there; entries with `overwrite = false` never replace an
//! existing file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::config::StageConfig;
use crate::error::{hints, OdinBuildError};
use crate::utils::terminal::{create_progress_bar, print_warning};
use crate::utils::tools;

/// Prefix selecting a path under the compiler's vendor directory
pub const VENDOR_PREFIX: &str = "vendor:";

/// What happened to one stage entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageResult {
    /// Number of files written
    Copied(u64),
    /// The destination already existed and overwriting is off
    Kept,
    /// Optional entry whose source does not exist
    Skipped,
}

/// Copy a directory tree, merging into `dst`
///
/// Returns the number of files written. With `overwrite` off, files that
/// already exist in `dst` are left alone. The `exclude` directory, usually
/// the output directory, is never descended into, so a source such as the
/// project root does not copy the output into itself.
pub fn copy_dir_all(
    src: &Path,
    dst: &Path,
    overwrite: bool,
    exclude: Option<&Path>,
) -> Result<u64> {
    let exclude = exclude.and_then(|dir| dir.canonicalize().ok());
    let entries: Vec<_> = WalkDir::new(src)
        .into_iter()
        .filter_entry(|entry| match &exclude {
            Some(excluded) if entry.file_type().is_dir() => entry
                .path()
                .canonicalize()
                .map_or(true, |path| &path != excluded),
            _ => true,
        })
        .collect::<Result<_, _>>()
        .with_context(|| format!("Failed to read directory: {}", src.display()))?;

    let file_count = entries.iter().filter(|e| e.file_type().is_file()).count() as u64;
    let pb = create_progress_bar(file_count, &format!("Staging {}", src.display()));

    let mut copied = 0;
    for entry in entries {
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("{} is outside {}", entry.path().display(), src.display()))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory: {}", target.display()))?;
            continue;
        }

        if overwrite || !target.exists() {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            copied += 1;
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(copied)
}

/// Copy `src` to `dst` unless `dst` already exists
///
/// The copy is flushed to disk before returning. Returns whether a copy
/// happened.
pub fn copy_file_if_missing(src: &Path, dst: &Path) -> Result<bool> {
    if dst.exists() {
        return Ok(false);
    }

    copy_file(src, dst)?;
    Ok(true)
}

fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::copy(src, dst)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))?;

    fs::File::open(dst)
        .and_then(|file| file.sync_all())
        .with_context(|| format!("Failed to sync {}", dst.display()))?;

    Ok(())
}

/// Resolve a stage source to an existing path
///
/// `vendor:<rel>` is looked up next to the compiler; anything else is a path
/// relative to the project root.
pub fn resolve_source(from: &str, compiler: &str) -> Option<PathBuf> {
    match from.strip_prefix(VENDOR_PREFIX) {
        Some(rel) => tools::vendor_path(compiler, rel),
        None => {
            let path = PathBuf::from(from);
            path.exists().then_some(path)
        }
    }
}

/// Run one stage entry against an already resolved source
pub fn stage_from(source: &Path, stage: &StageConfig, output_dir: &Path) -> Result<StageResult> {
    let dst = output_dir.join(&stage.to);

    if source.is_dir() {
        let copied = copy_dir_all(source, &dst, stage.overwrite, Some(output_dir))?;
        return Ok(StageResult::Copied(copied));
    }

    if stage.overwrite {
        copy_file(source, &dst)?;
        Ok(StageResult::Copied(1))
    } else if copy_file_if_missing(source, &dst)? {
        Ok(StageResult::Copied(1))
    } else {
        Ok(StageResult::Kept)
    }
}

/// Run all stage entries in order
pub fn run_stages(
    stages: &[StageConfig],
    output_dir: &Path,
    compiler: &str,
    verbose: bool,
) -> Result<Vec<StageResult>> {
    let mut results = Vec::with_capacity(stages.len());

    for stage in stages {
        let result = match resolve_source(&stage.from, compiler) {
            Some(source) => stage_from(&source, stage, output_dir)?,
            None if stage.optional => {
                print_warning(&format!("skipping stage '{}': source not found", stage.from));
                StageResult::Skipped
            }
            None => {
                return Err(OdinBuildError::staging_error_with_hint(
                    &stage.from,
                    "source not found",
                    hints::staging_source(),
                )
                .into())
            }
        };

        if verbose {
            eprintln!("  stage {} -> {}: {:?}", stage.from, stage.to, result);
        }
        results.push(result);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stage(from: &Path, to: &str, overwrite: bool, optional: bool) -> StageConfig {
        StageConfig {
            from: from.to_string_lossy().to_string(),
            to: to.to_string(),
            overwrite,
            optional,
        }
    }

    #[test]
    fn test_copy_dir_all_merges() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("assets");
        fs::create_dir_all(src.join("shaders")).unwrap();
        fs::write(src.join("logo.png"), "new-logo").unwrap();
        fs::write(src.join("shaders").join("main.slang"), "shader").unwrap();

        let dst = temp_dir.path().join("build").join("assets");
        fs::create_dir_all(&dst).unwrap();
        fs::write(dst.join("logo.png"), "old-logo").unwrap();
        fs::write(dst.join("keep.txt"), "untouched").unwrap();

        let copied = copy_dir_all(&src, &dst, true, None).unwrap();
        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dst.join("logo.png")).unwrap(), "new-logo");
        assert_eq!(fs::read_to_string(dst.join("shaders/main.slang")).unwrap(), "shader");
        assert_eq!(fs::read_to_string(dst.join("keep.txt")).unwrap(), "untouched");
    }

    #[test]
    fn test_copy_dir_all_without_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("assets");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.txt"), "new").unwrap();
        fs::write(src.join("b.txt"), "new").unwrap();

        let dst = temp_dir.path().join("out");
        fs::create_dir_all(&dst).unwrap();
        fs::write(dst.join("a.txt"), "old").unwrap();

        let copied = copy_dir_all(&src, &dst, false, None).unwrap();
        assert_eq!(copied, 1);
        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "old");
        assert_eq!(fs::read_to_string(dst.join("b.txt")).unwrap(), "new");
    }

    #[test]
    fn test_copy_file_if_missing() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("slang.dll");
        fs::write(&src, "v2").unwrap();

        let dst = temp_dir.path().join("build").join("slang.dll");
        assert!(copy_file_if_missing(&src, &dst).unwrap());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "v2");

        fs::write(&src, "v3").unwrap();
        assert!(!copy_file_if_missing(&src, &dst).unwrap());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "v2");
    }

    #[test]
    fn test_run_stages_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let assets = root.join("assets");
        fs::create_dir_all(&assets).unwrap();
        fs::write(assets.join("font.ttf"), "font").unwrap();
        let dll = root.join("slang.dll");
        fs::write(&dll, "dll").unwrap();

        let output = root.join("build");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("slang.dll"), "existing").unwrap();

        let stages = vec![
            stage(&assets, "assets", true, false),
            stage(&dll, "slang.dll", false, false),
            stage(&root.join("missing.dll"), "missing.dll", false, true),
        ];

        let results = run_stages(&stages, &output, "odin", false).unwrap();
        assert_eq!(
            results,
            vec![StageResult::Copied(1), StageResult::Kept, StageResult::Skipped]
        );
        assert!(output.join("assets/font.ttf").is_file());
        assert_eq!(fs::read_to_string(output.join("slang.dll")).unwrap(), "existing");
        assert!(!output.join("missing.dll").exists());
    }

    #[test]
    fn test_stage_from_project_root_skips_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::write(root.join("assets").join("font.ttf"), "font").unwrap();

        let output = root.join("build");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("app"), "binary").unwrap();

        let stages = vec![stage(root, "snapshot", true, false)];
        let results = run_stages(&stages, &output, "odin", false).unwrap();

        assert_eq!(results, vec![StageResult::Copied(1)]);
        assert!(output.join("snapshot/assets/font.ttf").is_file());
        assert!(!output.join("snapshot/build").exists());
    }

    #[test]
    fn test_missing_required_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let stages = vec![stage(&temp_dir.path().join("nope"), "nope", true, false)];

        let err = run_stages(&stages, temp_dir.path(), "odin", false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OdinBuildError>(),
            Some(OdinBuildError::Staging { .. })
        ));
    }

    #[test]
    fn test_vendor_source_without_compiler() {
        assert_eq!(resolve_source("vendor:SDL2/SDL2.dll", "odin-missing-7e3d"), None);
    }
}
