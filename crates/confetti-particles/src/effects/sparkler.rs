//! Sparkler: short-lived sparks thrown in every direction from the centre

use super::{birth_rate, stop_time};
use crate::effect::{EffectClock, EffectContext, ParticleEffect};
use crate::emitter::{Emitter, EmitterConfig, EmitterGroup};
use crate::rand::ParticleRng;
use crate::scene::SceneGraph;
use crate::texture::glyph_drawables;
use confetti_core::EffectStyle;
use glam::Vec2;
use std::f32::consts::TAU;

const GLYPH_SIZE: f32 = 36.0;

pub struct SparklerEffect {
    ctx: EffectContext,
    clock: EffectClock,
    rng: ParticleRng,
    group: EmitterGroup,
}

impl SparklerEffect {
    pub fn new(ctx: EffectContext) -> Self {
        Self {
            clock: EffectClock::new(&ctx.config),
            rng: ParticleRng::for_config(&ctx.config, 7),
            group: EmitterGroup::new(Vec::new(), stop_time(&ctx.config)),
            ctx,
        }
    }

    pub fn is_emitting(&self) -> bool {
        self.group.is_emitting()
    }
}

impl ParticleEffect for SparklerEffect {
    fn style(&self) -> EffectStyle {
        EffectStyle::Sparkler
    }

    fn setup(&mut self, scene: &mut dyn SceneGraph) {
        self.group.clear(scene);
        let config = &self.ctx.config;
        let drawables = glyph_drawables(self.ctx.textures.as_ref(), &config.glyphs, GLYPH_SIZE);
        let rate = birth_rate(config.particle_count(), config.duration, drawables.len());
        let center = self.ctx.scene_size.center();
        let rng = &mut self.rng;

        let emitters = drawables
            .iter()
            .map(|&drawable| {
                let emitter = EmitterConfig {
                    birth_rate: rate,
                    lifetime: 1.0,
                    lifetime_range: 0.5,
                    position: center,
                    position_range: Vec2::ZERO,
                    emission_angle: 0.0,
                    emission_angle_range: TAU,
                    speed: 200.0,
                    speed_range: 120.0,
                    acceleration: Vec2::new(0.0, -40.0),
                    scale: 0.5,
                    scale_range: 0.3,
                    rotation_range: TAU,
                    rotation_speed: rng.range(-1.0, 1.0),
                    alpha: 1.0,
                    alpha_range: 0.1,
                    alpha_speed: -1.0,
                };
                Emitter::new(emitter, drawable)
            })
            .collect::<Vec<_>>();
        log::debug!("sparkler: {} emitters at {rate:.1} sparks/s each", emitters.len());
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing::{self, STEP};
    use crate::scene::SceneTree;
    use confetti_core::Easing;

    fn setup() -> (SparklerEffect, SceneTree) {
        let mut scene = SceneTree::new();
        let mut effect =
            SparklerEffect::new(testing::context(testing::config(EffectStyle::Sparkler)));
        effect.setup(&mut scene);
        (effect, scene)
    }

    #[test]
    fn sparks_burst_from_the_centre() {
        let (mut effect, mut scene) = setup();
        effect.update(&mut scene, 0.0, STEP);
        let mut frame = 1;
        while scene.child_count() == 0 {
            effect.update(&mut scene, frame as f64 * STEP, STEP);
            frame += 1;
            assert!(frame < 30);
        }
        // a freshly born spark has moved at most one step from the centre
        for (_, node) in scene.iter() {
            assert!(node.position.distance(Vec2::new(400.0, 300.0)) < 300.0 * STEP as f32 + 1.0);
        }
    }

    #[test]
    fn sparks_expire_on_their_own() {
        let (mut effect, mut scene) = setup();
        for frame in 0..150 {
            effect.update(&mut scene, frame as f64 * STEP, STEP);
        }
        assert!(effect.is_emitting());
        // lifetime ≤ 1.25s at 50/2.4 births per second caps the live population
        assert!(effect.particle_count() <= 30, "{}", effect.particle_count());

        let mut frame = 150;
        while frame as f64 * STEP < 4.5 {
            effect.update(&mut scene, frame as f64 * STEP, STEP);
            frame += 1;
        }
        assert!(!effect.is_emitting());
        assert_eq!(effect.particle_count(), 0);
        assert_eq!(scene.child_count(), 0);
    }

    fn emitted_over_run(speed: f64, easing: Easing) -> usize {
        let mut config = testing::config(EffectStyle::Sparkler);
        config.speed = speed;
        config.easing = easing;
        config.easing_exponent = 3.0;
        let mut scene = SceneTree::new();
        let mut effect = SparklerEffect::new(testing::context(config));
        effect.setup(&mut scene);
        for frame in 0..240 {
            effect.update(&mut scene, frame as f64 * STEP, STEP);
        }
        effect.group.emitted()
    }

    #[test]
    fn birth_count_ignores_speed_and_easing() {
        // 50 / (0.8 × 3s) births per second until births stop at 2.5s
        let expected = 50.0 / 2.4 * 2.5;
        for (speed, easing) in [
            (1.0, Easing::Linear),
            (0.1, Easing::Linear),
            (1.0, Easing::EaseIn),
            (0.1, Easing::EaseIn),
        ] {
            let emitted = emitted_over_run(speed, easing) as f64;
            assert!(
                (emitted - expected).abs() <= 3.0,
                "speed {speed}, {easing}: emitted {emitted}, expected ~{expected:.0}"
            );
        }
    }

    #[test]
    fn fade_caps_every_spark() {
        let (mut effect, mut scene) = setup();
        for frame in 0..=168 {
            effect.update(&mut scene, frame as f64 * STEP, STEP);
        }
        // 2.8s: 0.3s into the final fade
        assert!(scene.max_alpha() <= 0.4 + 1e-3);
    }

    #[test]
    fn alpha_invariants_hold() {
        let (mut effect, mut scene) = setup();
        testing::run_checked(&mut effect, &mut scene, 200);
        assert_eq!(scene.visible_count(), 0);
    }
}
