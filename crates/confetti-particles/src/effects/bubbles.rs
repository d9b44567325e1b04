//! Bubbles: rise from below the screen with a gentle sway and pop near the top

use crate::curves::lerp_f32;
use crate::effect::{EffectClock, EffectContext, FrameStep, ParticleEffect};
use crate::rand::ParticleRng;
use crate::scene::{NodeId, SceneGraph};
use crate::texture::glyph_drawables;
use confetti_core::{Easing, EffectStyle};
use std::f32::consts::TAU;
use std::sync::Arc;

const GLYPH_SIZE: f32 = 36.0;
const SPAWN_WINDOW_FRACTION: f64 = 0.4;
/// Bubbles pop once they pass this share of the screen height
const POP_HEIGHT_FRACTION: f32 = 0.95;
/// Seconds of wall time a pop takes
const POP_DURATION: f32 = 0.15;
const POP_SCALE: f32 = 1.8;
/// Radians of wobble at the extremes of the sway
const MAX_TILT: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
enum BubbleState {
    Waiting,
    Rising,
    Popping {
        elapsed: f32,
        from_scale: f32,
        from_alpha: f32,
    },
    Popped,
}

struct Bubble {
    node: NodeId,
    start_x: f32,
    rise_speed: f32,
    sway_amplitude: f32,
    /// Hz
    sway_frequency: f32,
    sway_phase: f32,
    spawn_time: f64,
    age: f32,
    state: BubbleState,
}

pub struct BubblesEffect {
    ctx: EffectContext,
    clock: EffectClock,
    rng: ParticleRng,
    bubbles: Vec<Bubble>,
}

impl BubblesEffect {
    pub fn new(ctx: EffectContext) -> Self {
        Self {
            clock: EffectClock::new(&ctx.config),
            rng: ParticleRng::for_config(&ctx.config, 5),
            bubbles: Vec::new(),
            ctx,
        }
    }

    /// Bubbles that have popped or are popping
    pub fn popped_count(&self) -> usize {
        self.bubbles
            .iter()
            .filter(|b| matches!(b.state, BubbleState::Popping { .. } | BubbleState::Popped))
            .count()
    }

    fn advance(&mut self, scene: &mut dyn SceneGraph, step: FrameStep) {
        let pop_height = self.ctx.scene_size.height * POP_HEIGHT_FRACTION;
        for bubble in &mut self.bubbles {
            let Some(node) = scene.node_mut(bubble.node) else {
                continue;
            };
            if bubble.state == BubbleState::Waiting {
                if step.elapsed < bubble.spawn_time {
                    continue;
                }
                bubble.state = BubbleState::Rising;
                node.alpha = step.fade;
            }
            match bubble.state {
                BubbleState::Waiting | BubbleState::Popped => {}
                BubbleState::Rising => {
                    bubble.age += step.adt;
                    let wave =
                        (bubble.age * bubble.sway_frequency * TAU + bubble.sway_phase).sin();
                    node.position.x = bubble.start_x + bubble.sway_amplitude * wave;
                    node.position.y += bubble.rise_speed * step.adt;
                    node.rotation = wave * MAX_TILT;
                    node.alpha = node.alpha.min(step.fade);

                    if node.position.y > pop_height {
                        bubble.state = BubbleState::Popping {
                            elapsed: 0.0,
                            from_scale: node.scale,
                            from_alpha: node.alpha,
                        };
                    }
                }
                BubbleState::Popping {
                    elapsed,
                    from_scale,
                    from_alpha,
                } => {
                    let elapsed = elapsed + step.dt;
                    let t = (elapsed / POP_DURATION).min(1.0);
                    let eased = Easing::EaseOut.position(t as f64, 2.0) as f32;
                    node.scale = lerp_f32(from_scale, from_scale * POP_SCALE, eased);
                    node.alpha = node
                        .alpha
                        .min(lerp_f32(from_alpha, 0.0, eased))
                        .min(step.fade);
                    bubble.state = if t >= 1.0 {
                        node.alpha = 0.0;
                        BubbleState::Popped
                    } else {
                        BubbleState::Popping {
                            elapsed,
                            from_scale,
                            from_alpha,
                        }
                    };
                }
            }
        }
    }
}

impl ParticleEffect for BubblesEffect {
    fn style(&self) -> EffectStyle {
        EffectStyle::Bubbles
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
            let scale = rng.range(0.5, 1.4);
            if let Some(n) = scene.node_mut(node) {
                n.position.x = start_x;
                n.position.y = rng.range(-60.0, -10.0);
                n.scale = scale;
                n.alpha = 0.0;
            }

            self.bubbles.push(Bubble {
                node,
                start_x,
                // bigger bubbles rise slower
                rise_speed: rng.range(350.0, 600.0) * (1.3 - scale * 0.3),
                sway_amplitude: rng.range(20.0, 60.0),
                sway_frequency: rng.range(0.5, 1.5),
                sway_phase: rng.angle(),
                spawn_time: rng.range_f64(0.0, spawn_window),
                age: 0.0,
                state: BubbleState::Waiting,
            });
        }
        log::debug!("bubbles: {count} bubbles, spawn window {spawn_window:.2}s");
    }

    fn update(&mut self, scene: &mut dyn SceneGraph, current_time: f64, delta_time: f64) {
        if let Some(step) = self.clock.advance(current_time, delta_time) {
            self.advance(scene, step);
        }
    }

    fn particle_count(&self) -> usize {
        self.bubbles.len()
    }
}
