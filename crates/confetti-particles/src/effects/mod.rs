//! The seven particle styles

use confetti_core::Configuration;

mod bubbles;
mod confetti;
mod falling_leaves;
mod fireworks;
mod meteor_shower;
mod snow;
mod sparkler;

pub use bubbles::BubblesEffect;
pub use confetti::ConfettiEffect;
pub use falling_leaves::FallingLeavesEffect;
pub use fireworks::FireworksEffect;
pub use meteor_shower::MeteorShowerEffect;
pub use snow::SnowEffect;
pub use sparkler::SparklerEffect;

/// Particles below this height are off-screen for good
pub(crate) const OFFSCREEN_BOTTOM: f32 = -80.0;

/// Continuous emitters spread their births over this share of the duration
const EMISSION_WINDOW_FRACTION: f64 = 0.8;

/// Per-emitter birth rate so that all glyph emitters together produce
/// `count` particles over the emission window
pub(crate) fn birth_rate(count: usize, duration: f64, emitters: usize) -> f32 {
    let window = (duration * EMISSION_WINDOW_FRACTION).max(f64::EPSILON);
    (count as f64 / window / emitters.max(1) as f64) as f32
}

/// Continuous emitters stop giving birth when the global fade begins
pub(crate) fn stop_time(config: &Configuration) -> f64 {
    config.duration - Configuration::FADE_DURATION
}
