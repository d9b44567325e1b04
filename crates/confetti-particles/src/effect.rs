//! The effect contract and the per-frame clock every effect shares

use crate::curves::global_fade;
use crate::scene::SceneGraph;
use crate::texture::TextureProvider;
use confetti_core::{Configuration, EffectStyle, Easing, SceneSize};
use std::sync::Arc;

/// One style-specific particle simulation.
///
/// The host calls `setup` once, then `update` once per rendered frame with a
/// monotonically increasing `current_time` (seconds). `update` never fails: a
/// particle whose node has vanished is skipped for that frame.
pub trait ParticleEffect {
    fn style(&self) -> EffectStyle;

    /// Allocate particle nodes in `scene`, all invisible (alpha 0)
    fn setup(&mut self, scene: &mut dyn SceneGraph);

    /// Advance the simulation by one frame
    fn update(&mut self, scene: &mut dyn SceneGraph, current_time: f64, delta_time: f64);

    /// Number of particles the effect currently tracks
    fn particle_count(&self) -> usize;
}

/// Everything an effect needs at construction
#[derive(Clone)]
pub struct EffectContext {
    pub config: Arc<Configuration>,
    pub scene_size: SceneSize,
    pub textures: Arc<dyn TextureProvider>,
}

impl EffectContext {
    pub fn new(
        config: Arc<Configuration>,
        scene_size: SceneSize,
        textures: Arc<dyn TextureProvider>,
    ) -> Self {
        Self {
            config,
            scene_size,
            textures,
        }
    }
}

/// Timing for one running frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStep {
    /// Seconds since the effect's first update
    pub elapsed: f64,
    /// `elapsed / duration`, clamped to [0, 1]
    pub progress: f64,
    /// Raw frame delta
    pub dt: f32,
    /// Integration step: `dt × speed × easing speed multiplier`
    pub adt: f32,
    /// Configured speed multiplier
    pub speed: f32,
    /// Global fade cap for this frame, in [0, 1]
    pub fade: f32,
}

impl FrameStep {
    /// True once the global fade window has started
    pub fn fading(&self) -> bool {
        self.fade < 1.0
    }
}

/// Start-time latch plus the shared easing-driven time dilation.
///
/// The first `advance` only records the zero point and yields `None`.
#[derive(Clone, Debug)]
pub struct EffectClock {
    start_time: Option<f64>,
    duration: f64,
    speed: f64,
    easing: Easing,
    exponent: f64,
}

impl EffectClock {
    pub fn new(config: &Configuration) -> Self {
        Self {
            start_time: None,
            duration: config.duration,
            speed: config.speed,
            easing: config.easing,
            exponent: config.easing_exponent,
        }
    }

    pub fn is_started(&self) -> bool {
        self.start_time.is_some()
    }

    pub fn advance(&mut self, current_time: f64, delta_time: f64) -> Option<FrameStep> {
        let Some(start) = self.start_time else {
            self.start_time = Some(current_time);
            return None;
        };

        let elapsed = (current_time - start).max(0.0);
        let progress = if self.duration > 0.0 {
            (elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let curve = self.easing.speed_multiplier(progress, self.exponent);
        let dt = delta_time.max(0.0);

        Some(FrameStep {
            elapsed,
            progress,
            dt: dt as f32,
            adt: (dt * self.speed * curve) as f32,
            speed: self.speed as f32,
            fade: global_fade(elapsed, self.duration, Configuration::FADE_DURATION),
        })
    }
}
