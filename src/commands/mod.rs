//! Command implementations
//!
//! Each command module provides a clap-derived struct and execute method.

pub mod build;
pub mod clean;
pub mod run;
pub mod targets;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::Manifest;
use crate::utils::paths::{enter_project_root, locate_manifest};

/// Flags accepted by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub verbose: bool,
    pub debug: bool,
    pub manifest: Option<PathBuf>,
}

/// A loaded project, with the working directory moved to its root
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub manifest: Manifest,
}

impl Project {
    /// Locate and load the manifest, then enter the project root
    pub fn open(explicit_manifest: Option<&Path>) -> Result<Self> {
        let manifest_path = locate_manifest(explicit_manifest)?;
        let manifest = Manifest::load_from_path(&manifest_path)?;
        let root = enter_project_root(&manifest_path)?;

        Ok(Self { root, manifest })
    }
}
