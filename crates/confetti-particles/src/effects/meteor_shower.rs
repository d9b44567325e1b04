//! Meteor shower: heads streak down-left from the upper right, trailed by
//! ghost copies that replay the head's recent positions

use crate::curves::late_fade;
use crate::effect::{EffectClock, EffectContext, FrameStep, ParticleEffect};
use crate::rand::ParticleRng;
use crate::scene::{NodeId, SceneGraph};
use crate::texture::glyph_drawables;
use confetti_core::EffectStyle;
use glam::Vec2;
use std::sync::Arc;

const GLYPH_SIZE: f32 = 36.0;
const TAIL_COUNT: usize = 4;
/// Frames of head history kept per meteor
const HISTORY_SIZE: usize = 20;
/// Meteors live at most this fraction of the duration and spawn in the rest
const MAX_LIFETIME_FRACTION: f64 = 0.6;
/// Share of a meteor's lifetime before it starts fading
const FADE_START: f32 = 0.3;
const OFFSCREEN_MARGIN: f32 = -100.0;

/// Fixed-capacity circular history of head positions
#[derive(Clone, Debug)]
struct TrailBuffer {
    positions: [Vec2; HISTORY_SIZE],
    write: usize,
}

impl TrailBuffer {
    fn filled(position: Vec2) -> Self {
        Self {
            positions: [position; HISTORY_SIZE],
            write: 0,
        }
    }

    fn push(&mut self, position: Vec2) {
        self.write = (self.write + 1) % HISTORY_SIZE;
        self.positions[self.write] = position;
    }

    /// Position recorded `delay` pushes ago (0 = latest)
    fn sample(&self, delay: usize) -> Vec2 {
        let delay = delay % HISTORY_SIZE;
        self.positions[(self.write + 2 * HISTORY_SIZE - delay) % HISTORY_SIZE]
    }
}

/// History delay sampled by tail `t`, evenly spaced through the buffer
fn tail_delay(t: usize) -> usize {
    (t + 1) * (HISTORY_SIZE / (TAIL_COUNT + 1))
}

/// Resting opacity of tail `t`; farther tails are fainter
fn tail_base_alpha(t: usize) -> f32 {
    let fraction = (t + 1) as f32 / (TAIL_COUNT + 1) as f32;
    0.6 * (1.0 - fraction)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MeteorState {
    Waiting,
    Streaking,
    Gone,
}

struct Meteor {
    head: NodeId,
    tails: [NodeId; TAIL_COUNT],
    velocity: Vec2,
    spawn_time: f64,
    lifetime: f32,
    age: f32,
    history: TrailBuffer,
    state: MeteorState,
}

impl Meteor {
    fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::once(self.head).chain(self.tails.iter().copied())
    }
}

pub struct MeteorShowerEffect {
    ctx: EffectContext,
    clock: EffectClock,
    rng: ParticleRng,
    meteors: Vec<Meteor>,
}

impl MeteorShowerEffect {
    pub fn new(ctx: EffectContext) -> Self {
        Self {
            clock: EffectClock::new(&ctx.config),
            rng: ParticleRng::for_config(&ctx.config, 4),
            meteors: Vec::new(),
            ctx,
        }
    }

    fn advance(&mut self, scene: &mut dyn SceneGraph, step: FrameStep) {
        for meteor in &mut self.meteors {
            match meteor.state {
                MeteorState::Gone => continue,
                MeteorState::Waiting => {
                    if step.elapsed < meteor.spawn_time {
                        continue;
                    }
                    meteor.state = MeteorState::Streaking;
                    scene.set_alpha(meteor.head, 1.0);
                    for (t, tail) in meteor.tails.iter().enumerate() {
                        scene.set_alpha(*tail, tail_base_alpha(t));
                    }
                }
                MeteorState::Streaking => {}
            }

            let Some(head) = scene.node_mut(meteor.head) else {
                continue;
            };
            meteor.age += step.adt;
            head.position += meteor.velocity * step.adt;
            let head_position = head.position;
            meteor.history.push(head_position);

            let fade = late_fade(meteor.age / meteor.lifetime, FADE_START);
            head.alpha = head.alpha.min(fade).min(step.fade);

            for (t, tail) in meteor.tails.iter().enumerate() {
                if let Some(node) = scene.node_mut(*tail) {
                    node.position = meteor.history.sample(tail_delay(t));
                    node.alpha = node.alpha.min(tail_base_alpha(t) * fade).min(step.fade);
                }
            }

            let expired = meteor.age >= meteor.lifetime;
            let offscreen = head_position.x < OFFSCREEN_MARGIN || head_position.y < OFFSCREEN_MARGIN;
            if expired || offscreen {
                meteor.state = MeteorState::Gone;
                for id in meteor.nodes() {
                    scene.set_alpha(id, 0.0);
                }
            }
        }
    }
}

impl ParticleEffect for MeteorShowerEffect {
    fn style(&self) -> EffectStyle {
        EffectStyle::MeteorShower
    }

    fn setup(&mut self, scene: &mut dyn SceneGraph) {
        let config = Arc::clone(&self.ctx.config);
        let size = self.ctx.scene_size;
        let drawables = glyph_drawables(self.ctx.textures.as_ref(), &config.glyphs, GLYPH_SIZE);
        let count = config.particle_count();
        let max_lifetime = config.duration * MAX_LIFETIME_FRACTION;
        let min_lifetime = max_lifetime * 0.5;
        let spawn_window = config.duration - max_lifetime;
        let rng = &mut self.rng;

        for i in 0..count {
            let drawable = drawables[i % drawables.len()];
            let start = Vec2::new(
                size.width + rng.range(20.0, 100.0),
                size.height * rng.range(0.6, 1.0) + rng.range(0.0, 80.0),
            );
            // 15°–35° below horizontal, heading left
            let angle = rng.range(15.0, 35.0).to_radians();
            let speed = rng.range(800.0, 1500.0);
            let velocity = Vec2::new(-angle.cos() * speed, -angle.sin() * speed);
            let heading = velocity.y.atan2(velocity.x);
            let scale = rng.range(0.7, 1.3);

            let head = scene.add_child(drawable);
            if let Some(n) = scene.node_mut(head) {
                n.position = start;
                n.rotation = heading;
                n.scale = scale;
                n.alpha = 0.0;
            }
            let tails: [NodeId; TAIL_COUNT] = std::array::from_fn(|t| {
                let tail = scene.add_child(drawable);
                if let Some(n) = scene.node_mut(tail) {
                    let fraction = (t + 1) as f32 / (TAIL_COUNT + 1) as f32;
                    n.position = start;
                    n.rotation = heading;
                    n.scale = scale * (1.0 - fraction * 0.6);
                    n.alpha = 0.0;
                }
                tail
            });

            self.meteors.push(Meteor {
                head,
                tails,
                velocity,
                spawn_time: rng.range_f64(0.0, spawn_window),
                lifetime: rng.range_f64(min_lifetime, max_lifetime) as f32,
                age: 0.0,
                history: TrailBuffer::filled(start),
                state: MeteorState::Waiting,
            });
        }
        log::debug!(
            "meteor-shower: {count} meteors × {TAIL_COUNT} tails, spawn window {spawn_window:.2}s"
        );
    }

    fn update(&mut self, scene: &mut dyn SceneGraph, current_time: f64, delta_time: f64) {
        if let Some(step) = self.clock.advance(current_time, delta_time) {
            self.advance(scene, step);
        }
    }

    fn particle_count(&self) -> usize {
        self.meteors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing::{self, STEP};
    use crate::scene::SceneTree;
    use std::collections::HashMap;

    fn setup() -> (MeteorShowerEffect, SceneTree) {
        let mut scene = SceneTree::new();
        let mut effect =
            MeteorShowerEffect::new(testing::context(testing::config(EffectStyle::MeteorShower)));
        effect.setup(&mut scene);
        (effect, scene)
    }

    #[test]
    fn ring_buffer_wraps_without_negative_index() {
        let mut buffer = TrailBuffer::filled(Vec2::ZERO);
        for i in 1..=45 {
            buffer.push(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(buffer.sample(0), Vec2::new(45.0, 0.0));
        assert_eq!(buffer.sample(4), Vec2::new(41.0, 0.0));
        assert_eq!(buffer.sample(19), Vec2::new(26.0, 0.0));
        // write index sits near the start of the array here
        assert_eq!(buffer.write, 45 % HISTORY_SIZE);
        assert_eq!(buffer.sample(16), Vec2::new(29.0, 0.0));
    }

    #[test]
    fn tail_delays_are_evenly_spaced() {
        let delays: Vec<usize> = (0..TAIL_COUNT).map(tail_delay).collect();
        assert_eq!(delays, vec![4, 8, 12, 16]);
        assert!(delays.iter().all(|d| *d < HISTORY_SIZE));
    }

    #[test]
    fn setup_allocates_head_and_tails() {
        let (effect, scene) = setup();
        assert_eq!(effect.particle_count(), 50);
        assert_eq!(scene.child_count(), 50 * (TAIL_COUNT + 1));
        assert_eq!(scene.visible_count(), 0);
        for meteor in &effect.meteors {
            assert!(meteor.spawn_time >= 0.0 && meteor.spawn_time <= 3.0 * 0.4 + 1e-9);
            assert!(meteor.lifetime >= 0.9 - 1e-6 && meteor.lifetime <= 1.8 + 1e-6);
        }
    }

    #[test]
    fn tails_replay_earlier_head_positions() {
        let (mut effect, mut scene) = setup();
        let mut head_history: HashMap<NodeId, Vec<Vec2>> = effect
            .meteors
            .iter()
            .map(|m| (m.head, vec![scene.node(m.head).unwrap().position]))
            .collect();

        for frame in 0..120 {
            effect.update(&mut scene, frame as f64 * STEP, STEP);
            for meteor in effect.meteors.iter().filter(|m| m.state == MeteorState::Streaking) {
                let head = scene.node(meteor.head).unwrap().position;
                let history = head_history.get_mut(&meteor.head).unwrap();
                for tail in &meteor.tails {
                    let tail_pos = scene.node(*tail).unwrap().position;
                    assert!(history.contains(&tail_pos), "tail not on an earlier head position");
                    assert!(tail_pos.distance(head) > 1.0, "tail overlaps the current head");
                }
                history.push(head);
            }
        }
    }

    #[test]
    fn expired_meteors_stay_dark() {
        let (mut effect, mut scene) = setup();
        testing::run_checked(&mut effect, &mut scene, 240);
        assert!(effect.meteors.iter().all(|m| m.state != MeteorState::Waiting));
        assert_eq!(scene.visible_count(), 0);
    }
}
