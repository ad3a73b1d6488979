//! Build descriptor: the configuration of a single compiler invocation
//!
//! A descriptor is a plain mutable record. Nothing is validated when fields
//! are set; [`BuildDescriptor::build`] checks the target right before it
//! invokes the compiler, every time it is called.
//!
//! The rendered command line has a fixed order:
//!
//! ```text
//! odin build <project> [-collection:<name>=<path>]* [-debug] -target:<os>_<arch>
//!     -out:<output>/<project><ext> -build-mode:<mode> [-define:<name>=<value>]* -vet
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::define::DefineValue;
use super::mode::BuildMode;
use crate::error::{hints, OdinBuildError};
use crate::exec::{Invocation, ProcessRunner};
use crate::platform;

/// Default compiler program
pub const DEFAULT_COMPILER: &str = "odin";

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "build";

/// Result of a build request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The compiler ran and produced the artifact
    Built { artifact: String },
    /// The `(os, arch)` pair is not a supported target; nothing was invoked
    UnsupportedTarget { target: String },
}

/// Result of a run request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The artifact ran and exited successfully
    Ran { artifact: String },
    /// The build mode does not produce a runnable artifact; nothing was invoked
    NotRunnable { mode: BuildMode },
}

/// Configuration of one build
#[derive(Debug, Clone, PartialEq)]
pub struct BuildDescriptor {
    /// Package to build, also the artifact base name
    pub project: String,
    /// Named search paths, in insertion order
    pub collections: Vec<(String, String)>,
    /// Compile-time constants, in insertion order
    pub defines: Vec<(String, DefineValue)>,
    pub output_dir: String,
    pub debug: bool,
    pub os: String,
    pub arch: String,
    pub mode: BuildMode,
    /// Compiler program (name on PATH or a path)
    pub compiler: String,
}

impl BuildDescriptor {
    /// Create a descriptor targeting the detected host
    pub fn new(project: impl Into<String>) -> Self {
        Self::for_target(project, platform::host_os(), platform::host_arch())
    }

    /// Create a descriptor for an explicit target
    pub fn for_target(
        project: impl Into<String>,
        os: impl Into<String>,
        arch: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            collections: Vec::new(),
            defines: Vec::new(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            debug: true,
            os: os.into(),
            arch: arch.into(),
            mode: BuildMode::Executable,
            compiler: DEFAULT_COMPILER.to_string(),
        }
    }

    /// Add or replace a collection, keeping the position of an existing name
    pub fn set_collection(&mut self, name: impl Into<String>, path: impl Into<String>) {
        upsert(&mut self.collections, name.into(), path.into());
    }

    /// Add or replace a define, keeping the position of an existing name
    pub fn set_define(&mut self, name: impl Into<String>, value: impl Into<DefineValue>) {
        upsert(&mut self.defines, name.into(), value.into());
    }

    /// `{os}_{arch}`
    pub fn target(&self) -> String {
        platform::target_string(&self.os, &self.arch)
    }

    pub fn is_valid(&self) -> bool {
        platform::is_supported_target(&self.os, &self.arch)
    }

    pub fn extension(&self) -> &'static str {
        self.mode.extension(&self.os)
    }

    /// `{output_dir}/{project}{ext}`
    pub fn artifact_path(&self) -> String {
        format!("{}/{}{}", self.output_dir, self.project, self.extension())
    }

    /// Compiler arguments, without the program itself
    pub fn compiler_args(&self) -> Vec<String> {
        let mut args = vec!["build".to_string(), self.project.clone()];

        for (name, path) in &self.collections {
            args.push(format!("-collection:{}={}", name, path));
        }

        if self.debug {
            args.push("-debug".to_string());
        }

        args.push(format!("-target:{}", self.target()));
        args.push(format!("-out:{}", self.artifact_path()));
        args.push(format!("-build-mode:{}", self.mode.flag_name()));

        for (name, value) in &self.defines {
            args.push(format!("-define:{}={}", name, value));
        }

        args.push("-vet".to_string());
        args
    }

    pub fn build_invocation(&self) -> Invocation {
        Invocation::new(&self.compiler).args(self.compiler_args())
    }

    /// Invoke the compiler once
    ///
    /// An unsupported target is reported through [`BuildOutcome`] without
    /// invoking anything. A non-zero compiler exit is an error.
    pub fn build(&self, runner: &dyn ProcessRunner) -> Result<BuildOutcome> {
        if !self.is_valid() {
            return Ok(BuildOutcome::UnsupportedTarget {
                target: self.target(),
            });
        }

        let invocation = self.build_invocation();
        let result = runner.run(&invocation)?;
        if !result.success {
            return Err(OdinBuildError::process_failed_with_hint(
                &self.compiler,
                result.exit_code,
                hints::compile_failed(),
            )
            .into());
        }

        Ok(BuildOutcome::Built {
            artifact: self.artifact_path(),
        })
    }

    /// Invocation that runs the built artifact inside the output directory
    ///
    /// The artifact path is made absolute first so it still resolves once the
    /// working directory has moved into `output_dir`.
    pub fn run_invocation(&self, args: &[String]) -> Result<Invocation> {
        let artifact = absolute(Path::new(&self.artifact_path()))?;
        let output_dir = absolute(Path::new(&self.output_dir))?;

        Ok(Invocation::new(artifact)
            .args(args.iter().cloned())
            .current_dir(output_dir))
    }

    /// Run the built artifact once
    pub fn run(&self, runner: &dyn ProcessRunner, args: &[String]) -> Result<RunOutcome> {
        if !self.mode.is_runnable() {
            return Ok(RunOutcome::NotRunnable { mode: self.mode });
        }

        let invocation = self.run_invocation(args)?;
        let result = runner.run(&invocation)?;
        if !result.success {
            return Err(OdinBuildError::process_failed_with_hint(
                self.artifact_path(),
                result.exit_code,
                hints::run_failed(),
            )
            .into());
        }

        Ok(RunOutcome::Ran {
            artifact: self.artifact_path(),
        })
    }
}

fn upsert<T>(entries: &mut Vec<(String, T)>, name: String, value: T) {
    match entries.iter_mut().find(|(existing, _)| *existing == name) {
        Some(entry) => entry.1 = value,
        None => entries.push((name, value)),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(cwd.join(path))
}
