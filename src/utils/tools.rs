//! Tool detection
//!
//! Locates the compiler on PATH (or at an explicit path) and the vendor
//! directory that ships next to it.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use which::which;

use crate::error::{hints, OdinBuildError};

/// Environment variable overriding the compiler program
pub const COMPILER_ENV: &str = "ODIN_BUILD_COMPILER";

/// Tool detection result
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Tool name as requested
    pub name: String,
    /// Path to the tool executable
    pub path: PathBuf,
    /// Tool version string (if available)
    pub version: Option<String>,
}

/// Check if a tool exists and return its information
///
/// `tool` may be a bare program name looked up on PATH or a path to an
/// executable.
pub fn check_tool(tool: &str) -> Option<ToolInfo> {
    let path = which(tool).ok()?;
    Some(ToolInfo {
        name: tool.to_string(),
        version: get_tool_version(&path),
        path,
    })
}

/// Get tool version by running `tool version`, then `tool --version`
fn get_tool_version(path: &Path) -> Option<String> {
    for arg in ["version", "--version"] {
        if let Ok(output) = Command::new(path).arg(arg).output() {
            if output.status.success() {
                let version = String::from_utf8_lossy(&output.stdout);
                let first = version.lines().next().unwrap_or("").trim();
                if !first.is_empty() {
                    return Some(first.to_string());
                }
            }
        }
    }

    None
}

/// Require a tool to exist, return error with hint if missing
pub fn require_tool(tool: &str, required_for: &str) -> Result<ToolInfo> {
    check_tool(tool).ok_or_else(|| {
        OdinBuildError::missing_tool(tool, required_for, get_tool_hint(tool)).into()
    })
}

/// Pin a compiler given as a relative path to `start_dir`
///
/// Bare names like `odin` are left for a PATH lookup. Anything containing a
/// path separator is joined to `start_dir` unless it is already absolute.
pub fn anchor_tool_path(tool: &str, start_dir: &Path) -> String {
    let is_path = tool.chars().any(std::path::is_separator);
    if !is_path || Path::new(tool).is_absolute() {
        return tool.to_string();
    }

    start_dir.join(tool).to_string_lossy().into_owned()
}

/// Get installation hint for a tool
fn get_tool_hint(tool: &str) -> &'static str {
    let name = Path::new(tool)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(tool);

    match name {
        "odin" => hints::odin(),
        _ => "Install this tool and ensure it's in your PATH",
    }
}

/// Compiler's vendor directory entry, `<compiler dir>/vendor/<rel>`
///
/// Returns `None` when the compiler cannot be located or the entry does not
/// exist.
pub fn vendor_path(compiler: &str, rel: &str) -> Option<PathBuf> {
    let info = check_tool(compiler)?;
    vendor_path_from(&info.path, rel)
}

/// Same as [`vendor_path`] for an already resolved compiler path
pub fn vendor_path_from(compiler_path: &Path, rel: &str) -> Option<PathBuf> {
    // Resolve symlinks such as /usr/local/bin/odin -> /opt/odin/odin
    let resolved = compiler_path
        .canonicalize()
        .unwrap_or_else(|_| compiler_path.to_path_buf());
    let path = resolved.parent()?.join("vendor").join(rel);
    path.exists().then_some(path)
}
