//! 2D scene geometry

use crate::error::{ConfettiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use glam::Vec2;

/// Size of one overlay scene in points. The origin is the bottom-left corner
/// and y grows upwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneSize {
    pub width: f32,
    pub height: f32,
}

impl SceneSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

impl Default for SceneSize {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

impl fmt::Display for SceneSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `WIDTHxHEIGHT`, e.g. `2560x1440`.
impl FromStr for SceneSize {
    type Err = ConfettiError;

    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s
            .split_once(|c| c == 'x' || c == 'X')
            .ok_or_else(|| ConfettiError::InvalidScreenSize(s.to_string()))?;
        let width: f32 = w
            .trim()
            .parse()
            .map_err(|_| ConfettiError::InvalidScreenSize(s.to_string()))?;
        let height: f32 = h
            .trim()
            .parse()
            .map_err(|_| ConfettiError::InvalidScreenSize(s.to_string()))?;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(ConfettiError::InvalidScreenSize(s.to_string()));
        }
        Ok(Self::new(width, height))
    }
}
