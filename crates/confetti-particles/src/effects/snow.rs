//! Snow: a continuous fall of flakes emitted along the top edge

use super::{birth_rate, stop_time};
use crate::effect::{EffectClock, EffectContext, ParticleEffect};
use crate::emitter::{Emitter, EmitterConfig, EmitterGroup};
use crate::rand::ParticleRng;
use crate::scene::SceneGraph;
use crate::texture::glyph_drawables;
use confetti_core::EffectStyle;
use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};

const GLYPH_SIZE: f32 = 36.0;
const BASE_SPEED: f32 = 80.0;

pub struct SnowEffect {
    ctx: EffectContext,
    clock: EffectClock,
    rng: ParticleRng,
    group: EmitterGroup,
}

impl SnowEffect {
    pub fn new(ctx: EffectContext) -> Self {
        Self {
            clock: EffectClock::new(&ctx.config),
            rng: ParticleRng::for_config(&ctx.config, 6),
            group: EmitterGroup::new(Vec::new(), stop_time(&ctx.config)),
            ctx,
        }
    }

    pub fn is_emitting(&self) -> bool {
        self.group.is_emitting()
    }
}

impl ParticleEffect for SnowEffect {
    fn style(&self) -> EffectStyle {
        EffectStyle::Snow
    }

    fn setup(&mut self, scene: &mut dyn SceneGraph) {
        self.group.clear(scene);
        let config = &self.ctx.config;
        let size = self.ctx.scene_size;
        let drawables = glyph_drawables(self.ctx.textures.as_ref(), &config.glyphs, GLYPH_SIZE);
        let rate = birth_rate(config.particle_count(), config.duration, drawables.len());
        let lifetime = size.height / BASE_SPEED + 2.0;
        let rng = &mut self.rng;

        let emitters = drawables
            .iter()
            .map(|&drawable| {
                let emitter = EmitterConfig {
                    birth_rate: rate,
                    lifetime,
                    lifetime_range: lifetime * 0.3,
                    position: Vec2::new(size.width / 2.0, size.height + 20.0),
                    position_range: Vec2::new(size.width, 0.0),
                    emission_angle: -FRAC_PI_2,
                    emission_angle_range: 0.3,
                    speed: BASE_SPEED,
                    speed_range: BASE_SPEED * 0.4,
                    // each glyph drifts with its own wind
                    acceleration: Vec2::new(rng.range(-15.0, 15.0), -5.0),
                    scale: 0.6,
                    scale_range: 0.4,
                    rotation_range: TAU,
                    rotation_speed: rng.range(-0.5, 0.5),
                    alpha: 0.9,
                    alpha_range: 0.2,
                    alpha_speed: -0.05,
                };
                Emitter::new(emitter, drawable)
            })
            .collect::<Vec<_>>();
        log::debug!(
            "snow: {} emitters at {rate:.1} flakes/s each, lifetime {lifetime:.1}s",
            emitters.len()
        );
        self.group = EmitterGroup::new(emitters, stop_time(config));
    }

    fn update(&mut self, scene: &mut dyn SceneGraph, current_time: f64, delta_time: f64) {
        if let Some(step) = self.clock.advance(current_time, delta_time) {
            self.group.advance(scene, &mut self.rng, &step);
        }
    }

    fn particle_count(&self) -> usize {
        self.group.alive_count()
    }
}
