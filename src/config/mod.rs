//! Project manifest (odin-build.toml)

pub mod manifest;
pub mod validation;

pub use manifest::{Manifest, StageConfig};
