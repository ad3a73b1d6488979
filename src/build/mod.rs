//! Build model: descriptors, modes and defines
//!
//! ## Architecture
//!
//! ```text
//! commands/ → BuildDescriptor → platform registry (validation)
//!                             → exec::ProcessRunner → odin
//! ```
//!
//! ## Modules
//!
//! - `descriptor` - Mutable build configuration, command rendering, build/run
//! - `mode` - Artifact kinds and extension conventions
//! - `define` - Compile-time constant values

pub mod define;
pub mod descriptor;
pub mod mode;

pub use define::{parse_define, DefineValue};
pub use descriptor::{BuildDescriptor, BuildOutcome, RunOutcome};
pub use mode::BuildMode;
