//! Run command implementation
//!
//! Waits a moment, builds, then runs the executable from inside the output
//! directory.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use super::build::{build_project, BuildArgs};
use super::{GlobalArgs, Project};
use crate::build::{BuildDescriptor, BuildOutcome, RunOutcome};
use crate::exec::{ProcessRunner, SystemRunner};
use crate::utils::terminal::{print_info, print_warning};

/// Delay before building, in milliseconds
pub const DEFAULT_RUN_DELAY_MS: u64 = 1000;

/// Build and run the project executable
#[derive(Args, Debug)]
pub struct RunCommand {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Milliseconds to wait before building
    #[arg(long, default_value_t = DEFAULT_RUN_DELAY_MS)]
    pub delay_ms: u64,

    /// Arguments to pass to the executable
    #[arg(last = true)]
    pub args: Vec<String>,
}

impl RunCommand {
    /// Execute the run command
    pub fn execute(mut self, global: &GlobalArgs) -> Result<()> {
        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        self.build.anchor_compiler(&start_dir);

        let project = Project::open(global.manifest.as_deref())?;
        let descriptor = self.build.descriptor(&project, global.debug);
        let runner = SystemRunner::new(global.verbose);

        if self.delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.delay_ms));
        }

        let outcome = build_project(&project, &descriptor, &self.build, &runner, global.verbose)?;
        run_built(&descriptor, &outcome, &runner, &self.args)?;
        Ok(())
    }
}

/// Run the artifact of a finished build
///
/// Returns `None` when the build was skipped for an unsupported target, so
/// no stale artifact is started.
pub fn run_built(
    descriptor: &BuildDescriptor,
    outcome: &BuildOutcome,
    runner: &dyn ProcessRunner,
    args: &[String],
) -> Result<Option<RunOutcome>> {
    if let BuildOutcome::UnsupportedTarget { .. } = outcome {
        return Ok(None);
    }

    if descriptor.mode.is_runnable() {
        print_info(&format!("Running {}...", descriptor.project));
    }

    let run = descriptor.run(runner, args)?;
    if let RunOutcome::NotRunnable { mode } = &run {
        print_warning(&format!("Cannot run a {}.", mode));
    }

    Ok(Some(run))
}
