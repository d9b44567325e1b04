//! Falling leaves: drift down from the top, swaying around a wandering centre

use super::OFFSCREEN_BOTTOM;
use crate::effect::{EffectClock, EffectContext, FrameStep, ParticleEffect};
use crate::rand::ParticleRng;
use crate::scene::{NodeId, SceneGraph};
use crate::texture::glyph_drawables;
use confetti_core::EffectStyle;
use std::sync::Arc;

const GLYPH_SIZE: f32 = 40.0;
const SPAWN_WINDOW_FRACTION: f64 = 0.5;
/// Random-walk step of the sway centre, units per adjusted second
const WIND_JITTER: f32 = 18.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LeafState {
    Waiting,
    Falling,
    Gone,
}

struct Leaf {
    node: NodeId,
    sway_amplitude: f32,
    /// Radians per adjusted second
    sway_frequency: f32,
    sway_phase: f32,
    rotation_speed: f32,
    fall_speed: f32,
    spawn_time: f64,
    center_x: f32,
    /// Adjusted time since spawn
    age: f32,
    state: LeafState,
}

pub struct FallingLeavesEffect {
    ctx: EffectContext,
    clock: EffectClock,
    rng: ParticleRng,
    leaves: Vec<Leaf>,
}

impl FallingLeavesEffect {
    pub fn new(ctx: EffectContext) -> Self {
        Self {
            clock: EffectClock::new(&ctx.config),
            rng: ParticleRng::for_config(&ctx.config, 2),
            leaves: Vec::new(),
            ctx,
        }
    }

    fn advance(&mut self, scene: &mut dyn SceneGraph, step: FrameStep) {
        let adt = step.adt;
        for leaf in &mut self.leaves {
            match leaf.state {
                LeafState::Gone => continue,
                LeafState::Waiting => {
                    if step.elapsed < leaf.spawn_time {
                        continue;
                    }
                    leaf.state = LeafState::Falling;
                    scene.set_alpha(leaf.node, 1.0);
                }
                LeafState::Falling => {}
            }

            let Some(node) = scene.node_mut(leaf.node) else {
                continue;
            };

            leaf.age += adt;
            let sway = leaf.sway_amplitude * (leaf.age * leaf.sway_frequency + leaf.sway_phase).sin();
            node.position.x = leaf.center_x + sway;
            leaf.center_x += self.rng.range(-WIND_JITTER, WIND_JITTER) * adt;
            node.position.y -= leaf.fall_speed * adt;
            node.rotation += leaf.rotation_speed * adt;
            node.alpha = node.alpha.min(step.fade);

            if node.position.y < OFFSCREEN_BOTTOM {
                leaf.state = LeafState::Gone;
                node.alpha = 0.0;
            }
        }
    }
}

impl ParticleEffect for FallingLeavesEffect {
    fn style(&self) -> EffectStyle {
        EffectStyle::FallingLeaves
    }

    fn setup(&mut self, scene: &mut dyn SceneGraph) {
        let config = Arc::clone(&self.ctx.config);
        let size = self.ctx.scene_size;
        let drawables = glyph_drawables(self.ctx.textures.as_ref(), &config.glyphs, GLYPH_SIZE);
        let count = config.particle_count();
        let spawn_window = config.duration * SPAWN_WINDOW_FRACTION;
        let rng = &mut self.rng;

        for i in 0..count {
            let node = scene.add_child(drawables[i % drawables.len()]);
            let start_x = rng.range(0.0, size.width);
            if let Some(n) = scene.node_mut(node) {
                n.position.x = start_x;
                n.position.y = size.height + rng.range(20.0, 80.0);
                n.scale = rng.range(0.7, 1.3);
                n.alpha = 0.0;
            }

            self.leaves.push(Leaf {
                node,
                sway_amplitude: rng.range(60.0, 160.0),
                sway_frequency: rng.range(1.0, 3.0),
                sway_phase: rng.angle(),
                rotation_speed: rng.range(-2.0, 2.0),
                fall_speed: rng.range(80.0, 200.0),
                spawn_time: rng.range_f64(0.0, spawn_window),
                center_x: start_x,
                age: 0.0,
                state: LeafState::Waiting,
            });
        }
        log::debug!("falling-leaves: {count} leaves, spawn window {spawn_window:.2}s");
    }

    fn update(&mut self, scene: &mut dyn SceneGraph, current_time: f64, delta_time: f64) {
        if let Some(step) = self.clock.advance(current_time, delta_time) {
            self.advance(scene, step);
        }
    }

    fn particle_count(&self) -> usize {
        self.leaves.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing::{self, STEP};
    use crate::scene::SceneTree;
    use glam::Vec2;

    fn setup() -> (FallingLeavesEffect, SceneTree) {
        let mut scene = SceneTree::new();
        let mut effect =
            FallingLeavesEffect::new(testing::context(testing::config(EffectStyle::FallingLeaves)));
        effect.setup(&mut scene);
        (effect, scene)
    }

    #[test]
    fn spawn_times_within_window() {
        let (effect, scene) = setup();
        assert_eq!(effect.particle_count(), 50);
        assert_eq!(scene.visible_count(), 0);
        for leaf in &effect.leaves {
            assert!((0.0..=1.5).contains(&leaf.spawn_time));
        }
    }

    #[test]
    fn leaves_hold_still_until_spawned() {
        let (mut effect, mut scene) = setup();
        let start: Vec<Vec2> = effect
            .leaves
            .iter()
            .map(|l| scene.node(l.node).unwrap().position)
            .collect();
        for frame in 0..45 {
            let elapsed = frame as f64 * STEP;
            effect.update(&mut scene, elapsed, STEP);
            for (leaf, origin) in effect.leaves.iter().zip(&start) {
                if elapsed < leaf.spawn_time {
                    assert_eq!(scene.node(leaf.node).unwrap().position, *origin);
                }
            }
        }
    }

    #[test]
    fn every_active_leaf_descends() {
        let (mut effect, mut scene) = setup();
        for frame in 0..120 {
            effect.update(&mut scene, frame as f64 * STEP, STEP);
        }
        let before: Vec<(NodeId, f32)> = effect
            .leaves
            .iter()
            .filter(|l| l.state == LeafState::Falling)
            .map(|l| (l.node, scene.node(l.node).unwrap().position.y))
            .collect();
        assert_eq!(before.len(), effect.leaves.len());

        effect.update(&mut scene, 120.0 * STEP, STEP);
        for (id, y) in before {
            assert!(scene.node(id).unwrap().position.y < y);
        }
    }

    #[test]
    fn alpha_invariants_hold() {
        let (mut effect, mut scene) = setup();
        testing::run_checked(&mut effect, &mut scene, 200);
        assert_eq!(scene.visible_count(), 0);
    }
}
