//! Build command implementation

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use super::{GlobalArgs, Project};
use crate::build::{parse_define, BuildDescriptor, BuildMode, BuildOutcome, DefineValue};
use crate::exec::{ProcessRunner, SystemRunner};
use crate::staging;
use crate::utils::paths::ensure_dir;
use crate::utils::terminal::{print_info, print_success, print_warning};
use crate::utils::tools::{anchor_tool_path, require_tool, COMPILER_ENV};

/// Options shared by `build` and `run`
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Target operating system (defaults to [target] or the host)
    #[arg(long)]
    pub os: Option<String>,

    /// Target architecture (defaults to [target] or the host)
    #[arg(long)]
    pub arch: Option<String>,

    /// Artifact kind
    #[arg(long, value_enum)]
    pub mode: Option<BuildMode>,

    /// Compile-time constant, may be repeated
    ///
    /// Overrides a [defines] entry with the same name.
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", value_parser = parse_define_arg)]
    pub defines: Vec<(String, DefineValue)>,

    /// Compiler program
    #[arg(long, env = COMPILER_ENV)]
    pub compiler: Option<String>,

    /// Skip [[stage]] asset copies
    #[arg(long)]
    pub no_stage: bool,
}

fn parse_define_arg(text: &str) -> Result<(String, DefineValue), String> {
    parse_define(text).map_err(|e| format!("{:#}", e))
}

impl BuildArgs {
    /// Resolve a relative `--compiler` path against the starting directory
    ///
    /// Must run before [`Project::open`] moves into the project root.
    pub fn anchor_compiler(&mut self, start_dir: &Path) {
        if let Some(compiler) = &self.compiler {
            self.compiler = Some(anchor_tool_path(compiler, start_dir));
        }
    }

    /// Layer CLI overrides on top of the manifest
    pub fn descriptor(&self, project: &Project, debug: bool) -> BuildDescriptor {
        let mut descriptor = project.manifest.to_descriptor();

        if let Some(os) = &self.os {
            descriptor.os = os.clone();
        }
        if let Some(arch) = &self.arch {
            descriptor.arch = arch.clone();
        }
        if let Some(mode) = self.mode {
            descriptor.mode = mode;
        }
        if let Some(compiler) = &self.compiler {
            descriptor.compiler = compiler.clone();
        }

        descriptor.debug = descriptor.debug || debug;

        for (name, value) in &self.defines {
            descriptor.set_define(name, value.clone());
        }

        descriptor
    }
}

/// Build the project for one target
#[derive(Args, Debug)]
pub struct BuildCommand {
    #[command(flatten)]
    pub args: BuildArgs,
}

impl BuildCommand {
    /// Execute the build command
    pub fn execute(mut self, global: &GlobalArgs) -> Result<()> {
        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        self.args.anchor_compiler(&start_dir);

        let project = Project::open(global.manifest.as_deref())?;
        let descriptor = self.args.descriptor(&project, global.debug);
        let runner = SystemRunner::new(global.verbose);

        build_project(&project, &descriptor, &self.args, &runner, global.verbose)?;
        Ok(())
    }
}

/// Stage assets and invoke the compiler
///
/// Shared by `build` and `run`. An unsupported target is reported as a
/// warning and returned, not raised.
pub fn build_project(
    project: &Project,
    descriptor: &BuildDescriptor,
    args: &BuildArgs,
    runner: &dyn ProcessRunner,
    verbose: bool,
) -> Result<BuildOutcome> {
    let output_dir = Path::new(&descriptor.output_dir);
    ensure_dir(output_dir)?;

    if !args.no_stage && !project.manifest.stages.is_empty() {
        staging::run_stages(
            &project.manifest.stages,
            output_dir,
            &descriptor.compiler,
            verbose,
        )?;
    }

    if descriptor.is_valid() {
        let compiler = require_tool(&descriptor.compiler, "building Odin projects")?;
        if verbose {
            print_info(&format!("Project root {}", project.root.display()));
            print_info(&format!(
                "Using {} at {} ({})",
                compiler.name,
                compiler.path.display(),
                compiler.version.as_deref().unwrap_or("unknown version")
            ));
        }
        print_info(&format!(
            "Building {} for {}...",
            descriptor.project,
            descriptor.target()
        ));
    }

    let outcome = descriptor.build(runner)?;
    match &outcome {
        BuildOutcome::Built { artifact } => print_success(&format!("Built {}", artifact)),
        BuildOutcome::UnsupportedTarget { target } => {
            print_warning(&format!("Target {} is not supported.", target))
        }
    }

    Ok(outcome)
}
