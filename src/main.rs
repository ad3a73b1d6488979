//! odin-build - build helper for Odin projects
//!
//! Translates `build`, `run` and `clean` into invocations of the `odin`
//! compiler for a supported `{os}_{arch}` target, plus asset staging into
//! the output directory.
//!
//! ## Architecture
//!
//! ```text
//! cli → commands/ → config (odin-build.toml) → build::BuildDescriptor → exec → odin
//!                 → staging                    ↳ platform (target registry)
//! ```

mod build;
mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod platform;
mod staging;
mod utils;

use std::process::ExitCode;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse_normalized();

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error::report(&err);
            let code = error::exit_code(&err).clamp(1, 255);
            ExitCode::from(code as u8)
        }
    }
}
