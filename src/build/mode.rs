//! Artifact kinds and their per-OS naming conventions

use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

/// Kind of artifact the compiler produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Deserialize)]
pub enum BuildMode {
    /// Runnable program
    #[default]
    #[value(name = "exe")]
    #[serde(rename = "exe")]
    Executable,
    /// Static library archive
    #[value(name = "lib")]
    #[serde(rename = "lib")]
    StaticLibrary,
    /// Shared/dynamic library
    #[value(name = "dll")]
    #[serde(rename = "dll")]
    DynamicLibrary,
    /// Unlinked object file
    #[value(name = "obj")]
    #[serde(rename = "obj")]
    ObjectFile,
}

impl BuildMode {
    /// Value passed to `-build-mode:`
    pub fn flag_name(self) -> &'static str {
        match self {
            BuildMode::Executable => "exe",
            BuildMode::StaticLibrary => "lib",
            BuildMode::DynamicLibrary => "dll",
            BuildMode::ObjectFile => "obj",
        }
    }

    /// File extension of the artifact when targeting `os`
    pub fn extension(self, os: &str) -> &'static str {
        match (self, os) {
            (BuildMode::Executable, "windows") => ".exe",
            (BuildMode::Executable, _) => "",
            (BuildMode::StaticLibrary, "windows") => ".lib",
            (BuildMode::StaticLibrary, _) => ".a",
            (BuildMode::DynamicLibrary, "windows") => ".dll",
            (BuildMode::DynamicLibrary, "darwin") => ".dylib",
            (BuildMode::DynamicLibrary, _) => ".so",
            (BuildMode::ObjectFile, "windows") => ".obj",
            (BuildMode::ObjectFile, _) => ".o",
        }
    }

    pub fn is_runnable(self) -> bool {
        match self {
            BuildMode::Executable => true,
            BuildMode::StaticLibrary | BuildMode::DynamicLibrary | BuildMode::ObjectFile => false,
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag_name())
    }
}
