//! Clean command implementation

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use walkdir::WalkDir;

use super::{GlobalArgs, Project};
use crate::utils::terminal::{format_size, print_info, print_success, print_warning};

/// Remove and recreate the output directory
#[derive(Args, Debug)]
pub struct CleanCommand {
    /// Show what would be deleted
    #[arg(long)]
    pub dry_run: bool,
}

impl CleanCommand {
    /// Execute the clean command
    pub fn execute(self, global: &GlobalArgs) -> Result<()> {
        let project = Project::open(global.manifest.as_deref())?;
        let output_dir = Path::new(&project.manifest.project.output);

        if self.dry_run {
            if output_dir.exists() {
                print_info(&format!(
                    "[DRY RUN] Would remove: {} ({})",
                    output_dir.display(),
                    format_size(dir_size(output_dir))
                ));
            } else {
                print_info(&format!("{} does not exist", output_dir.display()));
            }
            return Ok(());
        }

        let freed = clean_output_dir(output_dir)?;
        print_success(&format!(
            "Cleaned {} ({} freed)",
            output_dir.display(),
            format_size(freed)
        ));
        Ok(())
    }
}

/// Delete `output_dir` if present and create it again empty
///
/// Removal problems other than a missing directory are reported and then
/// surface through the re-creation step if they matter. Returns the number of
/// bytes removed.
pub fn clean_output_dir(output_dir: &Path) -> Result<u64> {
    let size = dir_size(output_dir);

    match fs::remove_dir_all(output_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => print_warning(&format!(
            "Failed to remove {}: {}",
            output_dir.display(),
            e
        )),
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    Ok(size)
}

fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.metadata().ok())
        .filter(|metadata| metadata.is_file())
        .map(|metadata| metadata.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("build");
        fs::create_dir_all(output.join("assets")).unwrap();
        fs::write(output.join("app"), "0123456789").unwrap();
        fs::write(output.join("assets").join("logo.png"), "png").unwrap();

        let freed = clean_output_dir(&output).unwrap();
        assert_eq!(freed, 13);
        assert!(output.is_dir());
        assert_eq!(fs::read_dir(&output).unwrap().count(), 0);
    }

    #[test]
    fn test_clean_missing_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("build");

        let freed = clean_output_dir(&output).unwrap();
        assert_eq!(freed, 0);
        assert!(output.is_dir());
    }
}
