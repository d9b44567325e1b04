//! Named configurations: the built-in demo table and user preset files

use crate::config::{Configuration, Density, EffectStyle};
use crate::easing::Easing;
use crate::error::{ConfettiError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A titled configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub title: String,
    #[serde(flatten)]
    pub config: Configuration,
}

impl Preset {
    fn builtin(
        title: &str,
        style: EffectStyle,
        glyphs: &[&str],
        density: Density,
        speed: f64,
        easing: Easing,
        duration: f64,
    ) -> Self {
        Self {
            title: title.to_string(),
            config: Configuration {
                style,
                glyphs: glyphs.iter().map(|g| g.to_string()).collect(),
                density,
                speed,
                easing,
                easing_exponent: 3.0,
                duration,
                ..Configuration::default()
            },
        }
    }

    /// The demo grid presets, one or more per style
    pub fn builtins() -> Vec<Preset> {
        use Density::*;
        use EffectStyle::*;
        vec![
            Self::builtin("Confetti", Confetti, &["🎉", "🎁", "🍬"], Medium, 5.0, Easing::Linear, 2.5),
            Self::builtin("Cherry", FallingLeaves, &["🌸"], Low, 1.5, Easing::Linear, 5.0),
            Self::builtin("Maple", FallingLeaves, &["🍂", "🍁"], Low, 1.5, Easing::Linear, 5.0),
            Self::builtin("Snow", Snow, &["❄️", "☃️"], High, 2.5, Easing::Linear, 5.0),
            Self::builtin(
                "Fireworks",
                Fireworks,
                &["⭐", "🌟", "💫", "💥", "✨", "🔸", "🔹"],
                High,
                1.0,
                Easing::EaseOut,
                5.0,
            ),
            Self::builtin("Meteor", MeteorShower, &["⭐"], Low, 2.0, Easing::Linear, 5.0),
            Self::builtin("Bubbles", Bubbles, &["🫧"], Low, 1.0, Easing::Linear, 5.0),
            Self::builtin("Sparkler", Sparkler, &["✨", "⭐"], Medium, 1.0, Easing::Linear, 5.0),
        ]
    }
}

/// A TOML file holding `[[preset]]` tables
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetFile {
    #[serde(rename = "preset", default)]
    pub presets: Vec<Preset>,
}

impl PresetFile {
    pub fn parse(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Built-in presets followed by this file's presets. File entries shadow
    /// built-ins with the same title.
    pub fn merged_with_builtins(&self) -> Vec<Preset> {
        let mut all: Vec<Preset> = Preset::builtins()
            .into_iter()
            .filter(|b| !self.presets.iter().any(|p| p.title.eq_ignore_ascii_case(&b.title)))
            .collect();
        all.extend(self.presets.iter().cloned());
        all
    }

    /// Find a preset by case-insensitive title among this file and the built-ins
    pub fn find(&self, title: &str) -> Result<Preset> {
        self.merged_with_builtins()
            .into_iter()
            .find(|p| p.title.eq_ignore_ascii_case(title))
            .ok_or_else(|| ConfettiError::PresetNotFound(title.to_string()))
    }
}

/// `<config dir>/confetti/presets.toml`, if the platform has a config directory
pub fn default_presets_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("confetti").join("presets.toml"))
}
