//! odin-build.toml parsing
//!
//! ```toml
//! [project]
//! name = "app"
//! output = "build"
//! mode = "exe"
//!
//! [collections]
//! en = "."
//! external = "external"
//!
//! [defines]
//! VALIDATION = true
//!
//! [[stage]]
//! from = "assets"
//! to = "assets"
//!
//! [[stage]]
//! from = "vendor:SDL2/SDL2.dll"
//! to = "SDL2.dll"
//! overwrite = false
//! optional = true
//! ```
//!
//! `[collections]` and `[defines]` keep their document order, which is the
//! order they appear on the compiler command line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::validation::validate_manifest;
use crate::build::{BuildDescriptor, BuildMode, DefineValue};
use crate::error::{hints, OdinBuildError};

/// Manifest file name
pub const MANIFEST_FILE: &str = "odin-build.toml";

#[derive(Debug, Deserialize)]
struct RawManifest {
    project: ProjectConfig,
    #[serde(default)]
    target: TargetConfig,
    #[serde(default)]
    collections: toml::Table,
    #[serde(default)]
    defines: toml::Table,
    #[serde(default, rename = "stage")]
    stages: Vec<StageConfig>,
}

/// Parsed and validated project manifest
#[derive(Debug, Clone)]
pub struct Manifest {
    pub project: ProjectConfig,
    pub target: TargetConfig,
    /// Collection name → path, in document order
    pub collections: Vec<(String, String)>,
    /// Define name → value, in document order
    pub defines: Vec<(String, DefineValue)>,
    pub stages: Vec<StageConfig>,
}

/// `[project]` section
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Package directory handed to the compiler, also the artifact name
    pub name: String,

    /// Output directory
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub mode: BuildMode,

    /// Compiler program; overridden by --compiler / ODIN_BUILD_COMPILER
    pub compiler: Option<String>,

    /// Always build with debug info, even without -debug
    #[serde(default)]
    pub debug: bool,
}

/// `[target]` section; unset fields fall back to the detected host
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetConfig {
    pub os: Option<String>,
    pub arch: Option<String>,
}

/// One `[[stage]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StageConfig {
    /// Source path, or `vendor:<rel>` under the compiler's vendor directory
    pub from: String,

    /// Destination, relative to the output directory
    pub to: String,

    /// Replace existing files; `false` copies only when the destination is missing
    #[serde(default = "default_true")]
    pub overwrite: bool,

    /// Skip with a warning instead of failing when the source is missing
    #[serde(default)]
    pub optional: bool,
}

fn default_output() -> String {
    crate::build::descriptor::DEFAULT_OUTPUT_DIR.to_string()
}

fn default_true() -> bool {
    true
}

impl Manifest {
    /// Load a manifest from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest from {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse a manifest from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content).map_err(|e| {
            OdinBuildError::config_error_with_hint(
                format!("Failed to parse {}: {}", MANIFEST_FILE, e.message()),
                Some(e.into()),
                hints::invalid_manifest(),
            )
        })?;

        let mut collections = Vec::with_capacity(raw.collections.len());
        for (name, value) in raw.collections {
            let path = value.as_str().ok_or_else(|| {
                OdinBuildError::config_error_with_hint(
                    format!(
                        "Collection '{}' must be a path string, found {}",
                        name,
                        value.type_str()
                    ),
                    None,
                    hints::invalid_manifest(),
                )
            })?;
            collections.push((name, path.to_string()));
        }

        let mut defines = Vec::with_capacity(raw.defines.len());
        for (name, value) in raw.defines {
            let value = DefineValue::from_toml(&value).map_err(|e| {
                OdinBuildError::config_error_with_hint(
                    format!("Define '{}': {}", name, e),
                    None,
                    hints::invalid_manifest(),
                )
            })?;
            defines.push((name, value));
        }

        let manifest = Self {
            project: raw.project,
            target: raw.target,
            collections,
            defines,
            stages: raw.stages,
        };

        validate_manifest(&manifest)?;
        Ok(manifest)
    }

    /// Find the manifest by searching up from `start`
    pub fn find_from(start: &Path) -> Result<PathBuf> {
        let mut dir = start;
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                return Ok(candidate);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => {
                    return Err(OdinBuildError::config_error_with_hint(
                        format!(
                            "Could not find {} in {} or any parent directory",
                            MANIFEST_FILE,
                            start.display()
                        ),
                        None,
                        hints::manifest_not_found(),
                    )
                    .into())
                }
            }
        }
    }

    /// Seed a build descriptor from the manifest
    ///
    /// Target fields left unset keep the host-detected defaults.
    pub fn to_descriptor(&self) -> BuildDescriptor {
        let mut descriptor = BuildDescriptor::new(&self.project.name);

        if let Some(os) = &self.target.os {
            descriptor.os = os.clone();
        }
        if let Some(arch) = &self.target.arch {
            descriptor.arch = arch.clone();
        }
        if let Some(compiler) = &self.project.compiler {
            descriptor.compiler = compiler.clone();
        }

        descriptor.output_dir = self.project.output.clone();
        descriptor.mode = self.project.mode;
        descriptor.debug = self.project.debug;

        for (name, path) in &self.collections {
            descriptor.set_collection(name, path);
        }
        for (name, value) in &self.defines {
            descriptor.set_define(name, value.clone());
        }

        descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest = Manifest::parse(
            r#"
[project]
name = "app"
"#,
        )
        .unwrap();

        assert_eq!(manifest.project.name, "app");
        assert_eq!(manifest.project.output, "build");
        assert_eq!(manifest.project.mode, BuildMode::Executable);
        assert!(!manifest.project.debug);
        assert!(manifest.collections.is_empty());
        assert!(manifest.stages.is_empty());
    }

    #[test]
    fn test_parse_full_manifest() {
        let manifest = Manifest::parse(
            r#"
[project]
name = "app"
output = "out"
mode = "dll"
compiler = "/opt/odin/odin"

[target]
os = "windows"
arch = "amd64"

[collections]
zeta = "libs/zeta"
en = "."
external = "external"

[defines]
VALIDATION = true
MAX_LIGHTS = 16
GAMMA = 2.2
BACKEND = "vulkan"

[[stage]]
from = "assets"
to = "assets"

[[stage]]
from = "vendor:SDL2/SDL2.dll"
to = "SDL2.dll"
overwrite = false
optional = true
"#,
        )
        .unwrap();

        let names: Vec<&str> = manifest.collections.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["zeta", "en", "external"]);

        assert_eq!(
            manifest.defines,
            vec![
                ("VALIDATION".to_string(), DefineValue::Bool(true)),
                ("MAX_LIGHTS".to_string(), DefineValue::Int(16)),
                ("GAMMA".to_string(), DefineValue::Float(2.2)),
                ("BACKEND".to_string(), DefineValue::Str("vulkan".into())),
            ]
        );

        assert_eq!(manifest.stages.len(), 2);
        assert!(manifest.stages[0].overwrite);
        assert!(!manifest.stages[0].optional);
        assert!(!manifest.stages[1].overwrite);
        assert!(manifest.stages[1].optional);

        let desc = manifest.to_descriptor();
        assert_eq!(desc.target(), "windows_amd64");
        assert_eq!(desc.artifact_path(), "out/app.dll");
        assert_eq!(desc.compiler, "/opt/odin/odin");
        assert!(!desc.debug);
        assert_eq!(desc.compiler_args()[2], "-collection:zeta=libs/zeta");
    }

    #[test]
    fn test_missing_target_keeps_host_defaults() {
        let manifest = Manifest::parse(
            r#"
[project]
name = "app"

[target]
arch = "wasm32"
"#,
        )
        .unwrap();

        let desc = manifest.to_descriptor();
        assert_eq!(desc.os, crate::platform::host_os());
        assert_eq!(desc.arch, "wasm32");
    }

    #[test]
    fn test_unsupported_target_is_not_a_parse_error() {
        let manifest = Manifest::parse(
            r#"
[project]
name = "app"

[target]
os = "plan9"
arch = "amd64"
"#,
        )
        .unwrap();

        assert!(!manifest.to_descriptor().is_valid());
    }

    #[test]
    fn test_reject_bad_values() {
        assert!(Manifest::parse("[project]\n").is_err());
        assert!(Manifest::parse("[project]\nname = \"app\"\nmode = \"shared\"\n").is_err());
        assert!(Manifest::parse("[project]\nname = \"app\"\n[collections]\nen = 1\n").is_err());
        assert!(Manifest::parse("[project]\nname = \"app\"\n[defines]\nX = [1]\n").is_err());
    }

    #[test]
    fn test_parse_error_is_config_error() {
        let err = Manifest::parse("[project\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OdinBuildError>(),
            Some(OdinBuildError::Config { .. })
        ));
    }

    #[test]
    fn test_find_from_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(MANIFEST_FILE), "[project]\nname = \"app\"\n").unwrap();

        let nested = root.join("src").join("render");
        fs::create_dir_all(&nested).unwrap();

        let found = Manifest::find_from(&nested).unwrap();
        assert_eq!(found, root.join(MANIFEST_FILE));

        let manifest = Manifest::load_from_path(&found).unwrap();
        assert_eq!(manifest.project.name, "app");
    }

    #[test]
    fn test_find_from_without_manifest() {
        let temp_dir = TempDir::new().unwrap();
        // Walks up to / which is not expected to carry a manifest
        let result = Manifest::find_from(temp_dir.path());
        if let Err(err) = result {
            assert!(err.to_string().contains(MANIFEST_FILE));
        }
    }
}
