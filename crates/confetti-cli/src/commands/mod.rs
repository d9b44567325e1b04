//! CLI command implementations

pub mod host;
pub mod preset;
pub mod presets;
pub mod run;
