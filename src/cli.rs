//! CLI argument parsing using clap derive macros

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{
    build::BuildCommand, clean::CleanCommand, run::RunCommand, targets::TargetsCommand,
    GlobalArgs,
};

/// odin-build - build, run and clean Odin projects
///
/// Reads odin-build.toml from the current directory or a parent, and drives
/// the odin compiler for a supported target.
#[derive(Parser, Debug)]
#[command(name = "odin-build")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Build with debug information (also accepted as -debug)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to odin-build.toml (default: search upward from the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stage assets and build the project
    Build(BuildCommand),

    /// Build, then run the executable
    Run(RunCommand),

    /// Remove and recreate the output directory
    Clean(CleanCommand),

    /// List supported targets
    Targets(TargetsCommand),
}

/// Accept the single-dash `-debug` spelling
///
/// Arguments after `--` belong to the program started by `run` and are left
/// untouched.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            if arg == "-debug" {
                OsString::from("--debug")
            } else {
                arg
            }
        })
        .collect()
}

impl Cli {
    /// Parse the process arguments
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // Set up terminal colors
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        let global = GlobalArgs {
            verbose: self.verbose,
            debug: self.debug,
            manifest: self.manifest,
        };

        // Execute the subcommand
        match self.command {
            Commands::Build(cmd) => cmd.execute(&global),
            Commands::Run(cmd) => cmd.execute(&global),
            Commands::Clean(cmd) => cmd.execute(&global),
            Commands::Targets(cmd) => cmd.execute(&global),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{BuildMode, DefineValue};
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_args(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_single_dash_debug() {
        let cli = parse(&["odin-build", "build", "-debug"]);
        assert!(cli.debug);

        let cli = parse(&["odin-build", "-debug", "run"]);
        assert!(cli.debug);

        let cli = parse(&["odin-build", "build"]);
        assert!(!cli.debug);
    }

    #[test]
    fn test_passthrough_args_untouched() {
        let cli = parse(&["odin-build", "run", "--delay-ms", "0", "--", "-debug", "level1"]);
        assert!(!cli.debug);
        match cli.command {
            Commands::Run(cmd) => {
                assert_eq!(cmd.delay_ms, 0);
                assert_eq!(cmd.args, vec!["-debug", "level1"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_build_overrides() {
        let cli = parse(&[
            "odin-build",
            "build",
            "--os",
            "windows",
            "--arch",
            "i386",
            "--mode",
            "dll",
            "-D",
            "TRACE=true",
            "--define",
            "LEVEL=2",
        ]);

        match cli.command {
            Commands::Build(cmd) => {
                assert_eq!(cmd.args.os.as_deref(), Some("windows"));
                assert_eq!(cmd.args.arch.as_deref(), Some("i386"));
                assert_eq!(cmd.args.mode, Some(BuildMode::DynamicLibrary));
                assert_eq!(
                    cmd.args.defines,
                    vec![
                        ("TRACE".to_string(), DefineValue::Bool(true)),
                        ("LEVEL".to_string(), DefineValue::Number("2".into())),
                    ]
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_run_default_delay() {
        let cli = parse(&["odin-build", "run"]);
        match cli.command {
            Commands::Run(cmd) => assert_eq!(cmd.delay_ms, 1000),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["odin-build", "deploy"]).is_err());
        assert!(Cli::try_parse_from(["odin-build", "build", "--mode", "shared"]).is_err());
    }
}
