//! Targets command implementation
//!
//! Lists the supported `{os}_{arch}` targets and marks the detected host.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use serde::Serialize;

use super::GlobalArgs;
use crate::platform;

/// List supported build targets
#[derive(Args, Debug)]
pub struct TargetsCommand {
    /// Only list targets for this operating system
    #[arg(long)]
    pub os: Option<String>,

    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

/// One listed target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetEntry {
    pub target: String,
    pub os: String,
    pub arch: String,
    pub host: bool,
}

/// Collect supported targets, optionally filtered by OS
pub fn list_targets(os_filter: Option<&str>, host_os: &str, host_arch: &str) -> Vec<TargetEntry> {
    platform::supported_targets()
        .filter(|(os, _)| os_filter.map_or(true, |filter| filter == *os))
        .map(|(os, arch)| TargetEntry {
            target: platform::target_string(os, arch),
            os: os.to_string(),
            arch: arch.to_string(),
            host: os == host_os && arch == host_arch,
        })
        .collect()
}

impl TargetsCommand {
    /// Execute the targets command
    pub fn execute(self, global: &GlobalArgs) -> Result<()> {
        let host_os = platform::host_os();
        let host_arch = platform::host_arch();
        let entries = list_targets(self.os.as_deref(), &host_os, &host_arch);

        if self.json {
            let json = serde_json::to_string_pretty(&entries).context("Failed to serialize targets")?;
            println!("{}", json);
            return Ok(());
        }

        if global.verbose {
            println!(
                "Host: {} ({})",
                platform::target_string(&host_os, &host_arch),
                if platform::is_supported_target(&host_os, &host_arch) {
                    "supported"
                } else {
                    "not supported"
                }
            );
        }

        for entry in &entries {
            if entry.host {
                println!("{} {}", entry.target, style("(host)").green());
            } else {
                println!("{}", entry.target);
            }
        }

        Ok(())
    }
}
