//! Error types for confetti

use thiserror::Error;

/// The main error type for configuration and preset handling
#[derive(Debug, Error)]
pub enum ConfettiError {
    #[error("Unknown effect style: {0}")]
    UnknownStyle(String),

    #[error("Unknown density: {0}")]
    UnknownDensity(String),

    #[error("Unknown density profile: {0}")]
    UnknownDensityProfile(String),

    #[error("Unknown easing: {0}")]
    UnknownEasing(String),

    #[error("Glyph list is empty")]
    EmptyGlyphs,

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Invalid screen size: {0}")]
    InvalidScreenSize(String),

    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for confetti operations
pub type Result<T> = std::result::Result<T, ConfettiError>;

impl From<toml::de::Error> for ConfettiError {
    fn from(err: toml::de::Error) -> Self {
        ConfettiError::TomlParseError(err.to_string())
    }
}
