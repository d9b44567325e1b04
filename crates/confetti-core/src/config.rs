//! Animation configuration: style, glyphs, density, speed, easing, duration

use crate::easing::{Easing, DEFAULT_EXPONENT};
use crate::error::{ConfettiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the seven particle animation styles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectStyle {
    #[default]
    Confetti,
    FallingLeaves,
    Fireworks,
    MeteorShower,
    Bubbles,
    Snow,
    Sparkler,
}

impl EffectStyle {
    pub const ALL: [EffectStyle; 7] = [
        EffectStyle::Confetti,
        EffectStyle::FallingLeaves,
        EffectStyle::Fireworks,
        EffectStyle::MeteorShower,
        EffectStyle::Bubbles,
        EffectStyle::Snow,
        EffectStyle::Sparkler,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EffectStyle::Confetti => "confetti",
            EffectStyle::FallingLeaves => "falling-leaves",
            EffectStyle::Fireworks => "fireworks",
            EffectStyle::MeteorShower => "meteor-shower",
            EffectStyle::Bubbles => "bubbles",
            EffectStyle::Snow => "snow",
            EffectStyle::Sparkler => "sparkler",
        }
    }
}

impl fmt::Display for EffectStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectStyle {
    type Err = ConfettiError;

    fn from_str(s: &str) -> Result<Self> {
        EffectStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| ConfettiError::UnknownStyle(s.to_string()))
    }
}

/// Discrete particle density setting
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Density {
    Low,
    #[default]
    Medium,
    High,
}

impl Density {
    /// Particle count for this density under the given lookup table
    pub fn particle_count(self, profile: DensityProfile) -> usize {
        let [low, medium, high] = profile.counts();
        match self {
            Density::Low => low,
            Density::Medium => medium,
            Density::High => high,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Density::Low => "low",
            Density::Medium => "medium",
            Density::High => "high",
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Density {
    type Err = ConfettiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Density::Low),
            "medium" => Ok(Density::Medium),
            "high" => Ok(Density::High),
            _ => Err(ConfettiError::UnknownDensity(s.to_string())),
        }
    }
}

/// Density → particle-count lookup table.
///
/// `Overlay` is the lighter table used for the full-screen overlay,
/// `Showcase` the denser one used when several styles are previewed side by side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DensityProfile {
    Overlay,
    #[default]
    Showcase,
}

impl DensityProfile {
    /// Counts for low, medium and high
    pub const fn counts(self) -> [usize; 3] {
        match self {
            DensityProfile::Overlay => [50, 100, 200],
            DensityProfile::Showcase => [100, 200, 300],
        }
    }
}

impl FromStr for DensityProfile {
    type Err = ConfettiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "overlay" => Ok(DensityProfile::Overlay),
            "showcase" => Ok(DensityProfile::Showcase),
            _ => Err(ConfettiError::UnknownDensityProfile(s.to_string())),
        }
    }
}

/// Immutable description of one animation run.
///
/// The engine assumes a configuration that already passed [`Configuration::validate`];
/// boundary layers should call [`Configuration::sanitized`] first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Configuration {
    pub style: EffectStyle,
    /// Glyph strings, assigned round-robin across particles
    #[serde(alias = "emojis")]
    pub glyphs: Vec<String>,
    pub density: Density,
    pub density_profile: DensityProfile,
    /// Global speed multiplier applied to every integration step
    pub speed: f64,
    pub easing: Easing,
    pub easing_exponent: f64,
    /// Animation length in seconds; the last 0.5s is the global fade
    pub duration: f64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            style: EffectStyle::Confetti,
            glyphs: vec!["🎉".into(), "🎊".into(), "✨".into()],
            density: Density::Medium,
            density_profile: DensityProfile::Showcase,
            speed: 1.0,
            easing: Easing::Linear,
            easing_exponent: DEFAULT_EXPONENT,
            duration: 5.0,
            seed: None,
        }
    }
}

impl Configuration {
    /// Length of the global end-of-run fade
    pub const FADE_DURATION: f64 = 0.5;

    pub const MIN_SPEED: f64 = 0.1;
    pub const MAX_SPEED: f64 = 100.0;
    pub const MIN_DURATION: f64 = 1.0;
    pub const MAX_DURATION: f64 = 3600.0;
    pub const MAX_EXPONENT: f64 = 16.0;

    pub fn new(style: EffectStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Density-derived particle count
    pub fn particle_count(&self) -> usize {
        self.density.particle_count(self.density_profile)
    }

    /// Elapsed time at which the global fade begins
    pub fn fade_start(&self) -> f64 {
        self.duration - Self::FADE_DURATION
    }

    /// Clamp numeric fields into the ranges the engine supports and drop empty glyphs.
    pub fn sanitized(mut self) -> Self {
        let finite_or = |v: f64, default: f64| if v.is_finite() { v } else { default };
        self.speed = finite_or(self.speed, 1.0).clamp(Self::MIN_SPEED, Self::MAX_SPEED);
        self.duration =
            finite_or(self.duration, 5.0).clamp(Self::MIN_DURATION, Self::MAX_DURATION);
        self.easing_exponent =
            finite_or(self.easing_exponent, DEFAULT_EXPONENT).clamp(1.0, Self::MAX_EXPONENT);
        self.glyphs.retain(|g| !g.trim().is_empty());
        self
    }

    /// Check that the configuration is well-formed.
    pub fn validate(&self) -> Result<()> {
        if self.glyphs.is_empty() {
            return Err(ConfettiError::EmptyGlyphs);
        }
        check_range("speed", self.speed, Self::MIN_SPEED, Self::MAX_SPEED)?;
        check_range(
            "duration",
            self.duration,
            Self::MIN_DURATION,
            Self::MAX_DURATION,
        )?;
        check_range(
            "easing-exponent",
            self.easing_exponent,
            1.0,
            Self::MAX_EXPONENT,
        )?;
        Ok(())
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfettiError::ValueOutOfRange {
            field: field.to_string(),
            min,
            max,
            value,
        })
    }
}

/// Split a glyph list given as one string.
///
/// A comma-separated string is split on commas. Otherwise every user-visible
/// character becomes one glyph, keeping variation selectors, skin-tone modifiers,
/// keycaps, tag sequences, flag pairs and zero-width-joiner sequences attached.
pub fn split_glyphs(input: &str) -> Vec<String> {
    if input.contains(',') {
        return input
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();
    }

    let mut glyphs: Vec<String> = Vec::new();
    for c in input.chars().filter(|c| !c.is_whitespace()) {
        let attach = match glyphs.last() {
            Some(prev) => {
                is_extender(c)
                    || prev.ends_with('\u{200D}')
                    || (is_regional_indicator(c) && is_lone_regional_indicator(prev))
            }
            None => false,
        };
        match glyphs.last_mut() {
            Some(prev) if attach => prev.push(c),
            _ => glyphs.push(c.to_string()),
        }
    }
    glyphs
}

fn is_extender(c: char) -> bool {
    matches!(c,
        '\u{FE0E}' | '\u{FE0F}' | '\u{200D}' | '\u{20E3}'
        | '\u{1F3FB}'..='\u{1F3FF}'
        | '\u{E0020}'..='\u{E007F}')
}

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

fn is_lone_regional_indicator(glyph: &str) -> bool {
    let mut chars = glyph.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if is_regional_indicator(c))
}
