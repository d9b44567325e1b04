//! Confetti Core - Foundational types for the particle overlay
//!
//! This crate provides the types every other confetti crate depends on:
//! - `Configuration` - the immutable description of one animation run
//! - `Easing` - progress remapping and the matching time-dilation curve
//! - `Preset` - named configurations (built-in demo table or TOML file)
//! - `SceneSize`, `Vec2` - 2D geometry in scene units (origin bottom-left, y up)
//! - Error types and Result alias

mod config;
mod easing;
mod error;
mod preset;
mod types;

pub use config::{split_glyphs, Configuration, Density, DensityProfile, EffectStyle};
pub use easing::{Easing, DEFAULT_EXPONENT};
pub use error::{ConfettiError, Result};
pub use preset::{default_presets_path, Preset, PresetFile};
pub use types::{SceneSize, Vec2};
