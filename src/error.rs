//! Error types and helpers for user-friendly error messages
//!
//! Only abnormal outcomes live here. An unsupported target or a run request
//! for a library are ordinary results (see [`crate::build::BuildOutcome`] and
//! [`crate::build::RunOutcome`]) and never become errors.

use thiserror::Error;

/// Errors that abort the current command
#[derive(Error, Debug)]
pub enum OdinBuildError {
    /// Manifest errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
        hint: Option<String>,
    },

    /// Tool/executable not found
    #[error("Missing tool: {tool}")]
    MissingTool {
        tool: String,
        required_for: String,
        hint: String,
    },

    /// An external process exited unsuccessfully
    #[error("{program} failed: {}", describe_exit(.exit_code))]
    ProcessFailed {
        program: String,
        exit_code: Option<i32>,
        hint: Option<String>,
    },

    /// Asset staging failure
    #[error("Staging failed for '{path}': {message}")]
    Staging {
        path: String,
        message: String,
        hint: Option<String>,
    },
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exited with code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl OdinBuildError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
            hint: None,
        }
    }

    /// Create a configuration error with source and hint
    pub fn config_error_with_hint(
        message: impl Into<String>,
        source: Option<anyhow::Error>,
        hint: impl Into<String>,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source,
            hint: Some(hint.into()),
        }
    }

    /// Create a missing tool error
    pub fn missing_tool(
        tool: impl Into<String>,
        required_for: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            required_for: required_for.into(),
            hint: hint.into(),
        }
    }

    /// Create a process failure error with hint
    pub fn process_failed_with_hint(
        program: impl Into<String>,
        exit_code: Option<i32>,
        hint: impl Into<String>,
    ) -> Self {
        Self::ProcessFailed {
            program: program.into(),
            exit_code,
            hint: Some(hint.into()),
        }
    }

    /// Create a staging error with hint
    pub fn staging_error_with_hint(
        path: impl Into<String>,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::Staging {
            path: path.into(),
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Process exit code to report for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            OdinBuildError::ProcessFailed {
                exit_code: Some(code),
                ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        match self {
            OdinBuildError::Config { hint, .. }
            | OdinBuildError::ProcessFailed { hint, .. }
            | OdinBuildError::Staging { hint, .. } => {
                if let Some(h) = hint {
                    eprintln!("\n{} {}", style("HINT:").yellow().bold(), h);
                }
            }
            OdinBuildError::MissingTool {
                hint, required_for, ..
            } => {
                eprintln!("{} {}", style("REQUIRED FOR:").cyan().bold(), required_for);
                eprintln!("\n{} {}", style("HINT:").yellow().bold(), hint);
            }
        }

        eprintln!();
    }
}

/// Print any error, using hints when it is one of ours
pub fn report(err: &anyhow::Error) {
    match err.downcast_ref::<OdinBuildError>() {
        Some(known) => known.display_with_hints(),
        None => {
            eprintln!();
            crate::utils::terminal::print_error(&err.to_string());
            for cause in err.chain().skip(1) {
                eprintln!("  caused by: {}", cause);
            }
            eprintln!();
        }
    }
}

/// Exit code for any error
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<OdinBuildError>()
        .map(OdinBuildError::exit_code)
        .unwrap_or(1)
}

/// Common error hints
pub mod hints {
    /// Get hint for a missing Odin compiler
    pub fn odin() -> &'static str {
        "Install the Odin compiler from https://odin-lang.org/docs/install/\n\
         and make sure `odin` is on your PATH, or point to it with\n\
         --compiler <path> or the ODIN_BUILD_COMPILER environment variable."
    }

    /// Get hint for odin-build.toml not found
    pub fn manifest_not_found() -> &'static str {
        "Could not find odin-build.toml in current directory or any parent directory.\n\
         \n\
         Create one next to your sources:\n\
         \n\
         [project]\n\
         name = \"app\""
    }

    /// Get hint for an invalid odin-build.toml
    pub fn invalid_manifest() -> &'static str {
        "odin-build.toml is invalid. Common issues:\n\
         • Missing [project] section or project name\n\
         • Invalid TOML syntax (check quotes, brackets, commas)\n\
         • Define values must be booleans, numbers or strings\n\
         • Build mode must be one of: exe, lib, dll, obj"
    }

    /// Get hint for a failed compile step
    pub fn compile_failed() -> &'static str {
        "The compiler reported errors. Re-run with --verbose to see the exact\n\
         command line that was executed."
    }

    /// Get hint for a failed program run
    pub fn run_failed() -> &'static str {
        "The program exited with a failure status. Its output above should\n\
         explain why."
    }

    /// Get hint for a missing staging source
    pub fn staging_source() -> &'static str {
        "Check the `from` path of this [[stage]] entry, or mark it\n\
         `optional = true` to skip it when the source is absent."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_failed_message() {
        let err = OdinBuildError::process_failed_with_hint("odin", Some(2), hints::compile_failed());
        assert_eq!(err.to_string(), "odin failed: exited with code 2");
        assert_eq!(err.exit_code(), 2);

        let err = OdinBuildError::process_failed_with_hint("build/app", None, hints::run_failed());
        assert_eq!(err.to_string(), "build/app failed: terminated by signal");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_through_anyhow() {
        let err: anyhow::Error = OdinBuildError::process_failed_with_hint("odin", Some(3), hints::compile_failed()).into();
        assert_eq!(exit_code(&err), 3);

        let err = anyhow::anyhow!("plain failure");
        assert_eq!(exit_code(&err), 1);

        let err: anyhow::Error = OdinBuildError::config_error("bad").into();
        assert_eq!(exit_code(&err), 1);
    }
}
