//! Fireworks: a few rockets rise to 70–90 % height and burst into sparks

use super::OFFSCREEN_BOTTOM;
use crate::curves::lerp_f32;
use crate::effect::{EffectClock, EffectContext, FrameStep, ParticleEffect};
use crate::rand::ParticleRng;
use crate::scene::{NodeId, SceneGraph};
use crate::texture::{glyph_drawables, DrawableHandle};
use confetti_core::EffectStyle;
use glam::Vec2;
use std::sync::Arc;

const ROCKET_GLYPH_SIZE: f32 = 32.0;
const SPARK_GLYPH_SIZE: f32 = 28.0;
const LAUNCH_WINDOW_FRACTION: f64 = 0.6;
const ROCKET_DECELERATION: f32 = 100.0;
const SPARK_GRAVITY: f32 = 300.0;
const SPARK_DRAG: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
enum RocketState {
    Waiting,
    Rising { vy: f32 },
    /// Terminal: the node is gone and sparks replaced it
    Exploded,
}

struct Rocket {
    node: NodeId,
    launch_speed: f32,
    target_height: f32,
    launch_time: f64,
    state: RocketState,
}

struct Spark {
    node: NodeId,
    velocity: Vec2,
    /// Speed-scaled seconds since the explosion
    age: f32,
    lifetime: f32,
}

impl Spark {
    fn life_ratio(&self) -> f32 {
        self.age / self.lifetime
    }
}

pub struct FireworksEffect {
    ctx: EffectContext,
    clock: EffectClock,
    rng: ParticleRng,
    rockets: Vec<Rocket>,
    sparks: Vec<Spark>,
    spark_drawables: Vec<DrawableHandle>,
    explosions: usize,
}

impl FireworksEffect {
    pub fn new(ctx: EffectContext) -> Self {
        Self {
            clock: EffectClock::new(&ctx.config),
            rng: ParticleRng::for_config(&ctx.config, 3),
            rockets: Vec::new(),
            sparks: Vec::new(),
            spark_drawables: Vec::new(),
            explosions: 0,
            ctx,
        }
    }

    /// Sparks created per explosion, independent of the rocket count
    pub fn sparks_per_explosion(&self) -> usize {
        self.ctx.config.particle_count() / 3
    }

    pub fn rocket_count(&self) -> usize {
        self.rockets.len()
    }

    pub fn explosions(&self) -> usize {
        self.explosions
    }

    fn advance(&mut self, scene: &mut dyn SceneGraph, step: FrameStep) {
        let adt = step.adt;

        for i in 0..self.rockets.len() {
            let Some(rocket) = self.rockets.get_mut(i) else {
                continue;
            };
            let vy = match rocket.state {
                RocketState::Exploded => continue,
                RocketState::Waiting => {
                    if step.elapsed < rocket.launch_time {
                        continue;
                    }
                    scene.set_alpha(rocket.node, 1.0);
                    rocket.launch_speed
                }
                RocketState::Rising { vy } => vy,
            };

            let Some(node) = scene.node_mut(rocket.node) else {
                continue;
            };
            node.position.y += vy * adt;
            node.alpha = node.alpha.min(step.fade);
            let vy = vy - ROCKET_DECELERATION * adt;
            rocket.state = RocketState::Rising { vy };

            // a target above the apex bursts at the apex instead of falling back
            if node.position.y >= rocket.target_height || vy <= 0.0 {
                let center = node.position;
                rocket.state = RocketState::Exploded;
                let rocket_node = rocket.node;
                scene.remove_child(rocket_node);
                self.explode(scene, center, step.fade);
            }
        }

        let spark_adt = step.dt * step.speed;
        let fade = step.fade;
        self.sparks.retain_mut(|spark| {
            spark.age += spark_adt;
            spark.velocity.y -= SPARK_GRAVITY * adt;
            let Some(node) = scene.node_mut(spark.node) else {
                return false;
            };
            node.position += spark.velocity * adt;
            spark.velocity.x *= (1.0 - SPARK_DRAG * adt).max(0.0);

            let ratio = spark.life_ratio();
            node.alpha = node.alpha.min((1.0 - ratio).max(0.0)).min(fade);

            if ratio >= 1.0 || node.position.y < OFFSCREEN_BOTTOM {
                scene.remove_child(spark.node);
                return false;
            }
            true
        });
    }

    fn explode(&mut self, scene: &mut dyn SceneGraph, center: Vec2, fade: f32) {
        let count = self.sparks_per_explosion();
        let rng = &mut self.rng;
        for j in 0..count {
            let drawable = self.spark_drawables[j % self.spark_drawables.len()];
            let node = scene.add_child(drawable);
            if let Some(n) = scene.node_mut(node) {
                n.position = center;
                n.scale = rng.range(0.6, 1.0);
                n.rotation = rng.angle();
                n.alpha = fade;
            }
            let speed = lerp_f32(200.0, 550.0, rng.next_f32());
            self.sparks.push(Spark {
                node,
                velocity: rng.random_direction() * speed,
                age: 0.0,
                lifetime: rng.range(1.0, 2.5),
            });
        }
        self.explosions += 1;
        log::debug!(
            "fireworks: explosion {} at ({:.0}, {:.0}) with {count} sparks",
            self.explosions,
            center.x,
            center.y
        );
    }
}

impl ParticleEffect for FireworksEffect {
    fn style(&self) -> EffectStyle {
        EffectStyle::Fireworks
    }

    fn setup(&mut self, scene: &mut dyn SceneGraph) {
        let config = Arc::clone(&self.ctx.config);
        let size = self.ctx.scene_size;
        let textures = self.ctx.textures.as_ref();
        let first_glyph = &config.glyphs[..config.glyphs.len().min(1)];
        let rocket_drawable = glyph_drawables(textures, first_glyph, ROCKET_GLYPH_SIZE)[0];
        self.spark_drawables = glyph_drawables(textures, &config.glyphs, SPARK_GLYPH_SIZE);

        let rng = &mut self.rng;
        let rocket_count = rng.range_usize(3, 5);
        let launch_window = config.duration * LAUNCH_WINDOW_FRACTION;
        // even spacing with jitter so rockets don't overlap
        let segment = size.width / (rocket_count + 1) as f32;

        for i in 0..rocket_count {
            let node = scene.add_child(rocket_drawable);
            let base_x = segment * (i + 1) as f32;
            if let Some(n) = scene.node_mut(node) {
                n.position = Vec2::new(base_x + rng.range(-0.25 * segment, 0.25 * segment), -20.0);
                n.scale = rng.range(0.8, 1.1);
                n.alpha = 0.0;
            }
            self.rockets.push(Rocket {
                node,
                launch_speed: rng.range(700.0, 1000.0),
                target_height: rng.range(0.7, 0.9) * size.height,
                launch_time: i as f64 / rocket_count as f64 * launch_window
                    + rng.range_f64(0.0, launch_window * 0.15),
                state: RocketState::Waiting,
            });
        }
        log::debug!(
            "fireworks: {rocket_count} rockets over {launch_window:.2}s, {} sparks each",
            self.sparks_per_explosion()
        );
    }

    fn update(&mut self, scene: &mut dyn SceneGraph, current_time: f64, delta_time: f64) {
        if let Some(step) = self.clock.advance(current_time, delta_time) {
            self.advance(scene, step);
        }
    }

    fn particle_count(&self) -> usize {
        self.rockets
            .iter()
            .filter(|r| r.state != RocketState::Exploded)
            .count()
            + self.sparks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing::{self, STEP};
    use crate::scene::SceneTree;
    use confetti_core::Density;

    fn setup() -> (FireworksEffect, SceneTree) {
        let mut scene = SceneTree::new();
        let mut config = testing::config(EffectStyle::Fireworks);
        config.density = Density::High;
        config.duration = 4.0;
        let mut effect = FireworksEffect::new(testing::context(config));
        effect.setup(&mut scene);
        (effect, scene)
    }

    #[test]
    fn setup_creates_three_to_five_hidden_rockets() {
        let (effect, scene) = setup();
        assert!((3..=5).contains(&effect.rocket_count()));
        assert_eq!(scene.child_count(), effect.rocket_count());
        assert_eq!(scene.visible_count(), 0);
        for rocket in &effect.rockets {
            assert!(rocket.launch_time >= 0.0 && rocket.launch_time <= 4.0 * LAUNCH_WINDOW_FRACTION);
        }
    }

    #[test]
    fn each_rocket_explodes_once_with_fixed_spark_count() {
        let (mut effect, mut scene) = setup();
        // overlay high density = 200 → 66 sparks per burst
        assert_eq!(effect.sparks_per_explosion(), 66);

        for frame in 0..240 {
            effect.update(&mut scene, frame as f64 * STEP, STEP);
            assert!(effect.explosions() <= effect.rocket_count());
        }
        assert_eq!(effect.explosions(), effect.rocket_count());
        assert!(effect
            .rockets
            .iter()
            .all(|r| r.state == RocketState::Exploded));
        // exploded rockets have left the scene
        for rocket in &effect.rockets {
            assert!(scene.node(rocket.node).is_none());
        }
    }

    #[test]
    fn rocket_bursts_at_apex_when_target_is_out_of_reach() {
        use crate::texture::TextureCache;
        use confetti_core::SceneSize;
        use std::collections::HashMap;

        // 70 % of 10 000 is above the highest apex (1000² / 200 - 20)
        let ctx = EffectContext::new(
            Arc::new(testing::config(EffectStyle::Fireworks)),
            SceneSize::new(800.0, 10_000.0),
            Arc::new(TextureCache::headless()),
        );
        let mut scene = SceneTree::new();
        let mut effect = FireworksEffect::new(ctx);
        effect.setup(&mut scene);

        let mut last_y: HashMap<NodeId, f32> = HashMap::new();
        for frame in 0..800 {
            effect.update(&mut scene, frame as f64 * STEP, STEP);
            for rocket in &effect.rockets {
                if let (RocketState::Rising { .. }, Some(node)) = (rocket.state, scene.node(rocket.node)) {
                    let previous = last_y.insert(rocket.node, node.position.y);
                    assert!(previous.map_or(true, |y| node.position.y >= y), "rocket fell back");
                }
            }
        }
        assert_eq!(effect.explosions(), effect.rocket_count());
        for rocket in &effect.rockets {
            assert_eq!(rocket.state, RocketState::Exploded);
            assert!(last_y[&rocket.node] < rocket.target_height);
        }
    }

    #[test]
    fn explode_adds_exactly_one_burst() {
        let (mut effect, mut scene) = setup();
        let before = scene.child_count();
        effect.explode(&mut scene, Vec2::new(100.0, 300.0), 1.0);
        assert_eq!(effect.sparks.len(), 66);
        assert_eq!(scene.child_count(), before + 66);
        assert_eq!(effect.explosions(), 1);
    }

    #[test]
    fn sparks_expire_and_leave_scene() {
        let (mut effect, mut scene) = setup();
        for frame in 0..600 {
            effect.update(&mut scene, frame as f64 * STEP, STEP);
        }
        assert!(effect.sparks.is_empty());
        assert_eq!(scene.child_count(), 0);
    }

    #[test]
    fn rockets_wait_for_launch_time() {
        let (mut effect, mut scene) = setup();
        for frame in 0..90 {
            let elapsed = frame as f64 * STEP;
            effect.update(&mut scene, elapsed, STEP);
            for rocket in &effect.rockets {
                if elapsed < rocket.launch_time {
                    let node = scene.node(rocket.node).unwrap();
                    assert_eq!(node.position.y, -20.0);
                    assert_eq!(node.alpha, 0.0);
                }
            }
        }
    }

    #[test]
    fn alpha_invariants_hold() {
        let (mut effect, mut scene) = setup();
        testing::run_checked(&mut effect, &mut scene, 300);
        assert_eq!(scene.visible_count(), 0);
    }
}
