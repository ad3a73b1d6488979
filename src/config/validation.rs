//! Manifest validation with helpful error messages
//!
//! Target support is deliberately not checked here: a manifest naming an
//! unsupported target loads fine and is only rejected when a build is
//! attempted.

use std::path::{Component, Path};

use anyhow::{Context, Result};
use regex::Regex;

use super::manifest::{Manifest, StageConfig};
use crate::error::OdinBuildError;
use crate::platform;
use crate::utils::terminal::print_warning;

/// Validate the whole manifest
pub fn validate_manifest(manifest: &Manifest) -> Result<()> {
    validate_project_name(&manifest.project.name)?;

    if manifest.project.output.trim().is_empty() {
        return Err(OdinBuildError::config_error_with_hint(
            "Output directory cannot be empty",
            None,
            "Remove `output` to use the default \"build\" directory",
        )
        .into());
    }

    for (name, _) in &manifest.collections {
        validate_identifier("collection", name)?;
    }

    for (name, _) in &manifest.defines {
        validate_identifier("define", name)?;
    }

    for stage in &manifest.stages {
        validate_stage(stage)
            .with_context(|| format!("Invalid [[stage]] entry '{}'", stage.from))?;
    }

    if let Some(os) = &manifest.target.os {
        if !platform::is_supported_os(os) {
            print_warning(&format!("unknown target os '{}'", os));
        }
    }
    if let Some(arch) = &manifest.target.arch {
        if !platform::is_supported_arch(arch) {
            print_warning(&format!("unknown target arch '{}'", arch));
        }
    }

    Ok(())
}

/// Validate the project name (a package directory, also the artifact name)
fn validate_project_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(OdinBuildError::config_error_with_hint(
            "Project name cannot be empty",
            None,
            "Set `name` in [project] to the package directory to build, e.g. \"app\"",
        )
        .into());
    }

    let valid = Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*$").context("invalid project name pattern")?;
    if !valid.is_match(name) {
        return Err(OdinBuildError::config_error_with_hint(
            format!("Project name '{}' is not a valid name", name),
            None,
            "Project name must:\n\
             • Start with a letter or underscore\n\
             • Contain only letters, digits, underscores, or hyphens\n\
             • Examples: app, game_client, my-tool",
        )
        .into());
    }

    Ok(())
}

/// Validate a collection or define name
pub fn validate_identifier(kind: &str, name: &str) -> Result<()> {
    let valid = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").context("invalid identifier pattern")?;
    if !valid.is_match(name) {
        return Err(OdinBuildError::config_error_with_hint(
            format!("{} name '{}' is not a valid identifier", kind, name),
            None,
            "Names must start with a letter or underscore and contain only\n\
             letters, digits, or underscores",
        )
        .into());
    }

    Ok(())
}

/// Validate a staging entry
fn validate_stage(stage: &StageConfig) -> Result<()> {
    if stage.from.trim().is_empty() {
        return Err(OdinBuildError::config_error("stage `from` cannot be empty").into());
    }

    let to = Path::new(&stage.to);
    let escapes = to
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if stage.to.trim().is_empty() || escapes {
        return Err(OdinBuildError::config_error_with_hint(
            format!("stage destination '{}' must stay inside the output directory", stage.to),
            None,
            "Use a relative path without `..`, e.g. \"assets\" or \"SDL2.dll\"",
        )
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(from: &str, to: &str) -> StageConfig {
        StageConfig {
            from: from.to_string(),
            to: to.to_string(),
            overwrite: true,
            optional: false,
        }
    }

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("app").is_ok());
        assert!(validate_project_name("game_client").is_ok());
        assert!(validate_project_name("my-tool").is_ok());
        assert!(validate_project_name("_private").is_ok());

        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("1app").is_err());
        assert!(validate_project_name("my app").is_err());
        assert!(validate_project_name("src/app").is_err());
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("collection", "en").is_ok());
        assert!(validate_identifier("define", "MAX_LIGHTS").is_ok());

        assert!(validate_identifier("collection", "my-lib").is_err());
        assert!(validate_identifier("define", "9LIVES").is_err());
        assert!(validate_identifier("define", "").is_err());
    }

    #[test]
    fn test_validate_stage() {
        assert!(validate_stage(&stage("assets", "assets")).is_ok());
        assert!(validate_stage(&stage("vendor:SDL2/SDL2.dll", "SDL2.dll")).is_ok());
        assert!(validate_stage(&stage("assets", "./data/assets")).is_ok());

        assert!(validate_stage(&stage("", "assets")).is_err());
        assert!(validate_stage(&stage("assets", "")).is_err());
        assert!(validate_stage(&stage("assets", "../assets")).is_err());
        assert!(validate_stage(&stage("assets", "/tmp/assets")).is_err());
    }
}
