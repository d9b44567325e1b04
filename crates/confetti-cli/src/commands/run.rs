//! Run an effect from command-line settings

use super::host::{self, HostOptions};
use anyhow::Result;
use confetti_core::{split_glyphs, Configuration, Density, DensityProfile, Easing, EffectStyle};

pub struct RunArgs {
    pub style: EffectStyle,
    pub emojis: Option<String>,
    pub density: Density,
    pub density_profile: DensityProfile,
    pub speed: f64,
    pub easing: Easing,
    pub easing_exponent: f64,
    pub duration: f64,
    pub seed: Option<u64>,
    pub host: HostOptions,
}

impl RunArgs {
    /// The configuration these flags describe, clamped into supported ranges
    pub fn configuration(&self) -> Configuration {
        let mut config = Configuration {
            style: self.style,
            density: self.density,
            density_profile: self.density_profile,
            speed: self.speed,
            easing: self.easing,
            easing_exponent: self.easing_exponent,
            duration: self.duration,
            seed: self.seed,
            ..Configuration::default()
        };
        if let Some(emojis) = &self.emojis {
            let glyphs = split_glyphs(emojis);
            if glyphs.is_empty() {
                log::warn!("--emojis holds no glyphs, keeping the defaults");
            } else {
                config.glyphs = glyphs;
            }
        }
        config.sanitized()
    }
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = args.configuration();
    log::debug!("configuration: {config:?}");
    host::play(config, &args.host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args() -> RunArgs {
        RunArgs {
            style: EffectStyle::Sparkler,
            emojis: Some("✨⭐".to_string()),
            density: Density::High,
            density_profile: DensityProfile::Overlay,
            speed: 0.0,
            easing: Easing::EaseIn,
            easing_exponent: 3.0,
            duration: 0.2,
            seed: Some(9),
            host: HostOptions {
                screens: Vec::new(),
                fps: 60,
                loops: None,
                report: false,
                dump: None,
            },
        }
    }

    #[test]
    fn flags_become_a_sanitized_configuration() {
        let config = args().configuration();
        assert_eq!(config.glyphs, vec!["✨".to_string(), "⭐".to_string()]);
        assert_eq!(config.speed, Configuration::MIN_SPEED);
        assert_eq!(config.duration, Configuration::MIN_DURATION);
        assert_eq!(config.particle_count(), 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_emojis_keep_defaults() {
        let mut a = args();
        a.emojis = Some("  ".to_string());
        assert_eq!(a.configuration().glyphs, Configuration::default().glyphs);
    }
}
