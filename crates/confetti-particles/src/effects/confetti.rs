//! Confetti: pieces launch from both bottom corners on a parabola, then drift down

use super::OFFSCREEN_BOTTOM;
use crate::effect::{EffectClock, EffectContext, FrameStep, ParticleEffect};
use crate::rand::ParticleRng;
use crate::scene::{NodeId, SceneGraph};
use crate::texture::glyph_drawables;
use confetti_core::EffectStyle;
use glam::Vec2;
use std::f32::consts::TAU;
use std::sync::Arc;

const GLYPH_SIZE: f32 = 36.0;
/// Launch-phase gravity (units/s²)
const GRAVITY: f32 = 100.0;
/// Gentler pull once a piece starts drifting down
const FALL_GRAVITY: f32 = 40.0;
const TERMINAL_FALL_SPEED: f32 = 220.0;
/// Horizontal drag while falling, per second
const FALL_DRAG: f32 = 0.8;
const SPAWN_WINDOW_FRACTION: f64 = 0.1;

/// Per-piece motion phase
#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Waiting,
    /// Ballistic rise; `flight` is accumulated adjusted time since launch
    Launching { flight: f32 },
    /// Sway around `anchor_x`; `sway_time` is adjusted time since the peak
    Falling { anchor_x: f32, vx: f32, vy: f32, sway_time: f32 },
    Gone,
}

struct Piece {
    node: NodeId,
    origin: Vec2,
    /// Launch velocity, vy sized to peak exactly at `target_height`
    launch: Vec2,
    target_height: f32,
    rotation_speed: f32,
    sway_amplitude: f32,
    sway_frequency: f32,
    sway_phase: f32,
    spawn_time: f64,
    phase: Phase,
}

impl Piece {
    fn time_to_peak(&self) -> f32 {
        self.launch.y / GRAVITY
    }

    /// Position during the launch phase after `flight` adjusted seconds
    fn ballistic_position(&self, flight: f32) -> Vec2 {
        Vec2::new(
            self.origin.x + self.launch.x * flight,
            self.origin.y + self.launch.y * flight - 0.5 * GRAVITY * flight * flight,
        )
    }

    /// Advance one frame and return the new position, or `None` once gone
    fn step(&mut self, position: Vec2, adt: f32) -> Option<Vec2> {
        match self.phase {
            Phase::Waiting | Phase::Gone => None,
            Phase::Launching { flight } => {
                let flight = flight + adt;
                let peak = self.time_to_peak();
                if flight >= peak {
                    let apex = Vec2::new(
                        self.origin.x + self.launch.x * peak,
                        self.origin.y + self.target_height,
                    );
                    self.phase = Phase::Falling {
                        anchor_x: apex.x,
                        vx: self.launch.x * 0.5,
                        vy: 0.0,
                        sway_time: 0.0,
                    };
                    Some(apex)
                } else {
                    self.phase = Phase::Launching { flight };
                    Some(self.ballistic_position(flight))
                }
            }
            Phase::Falling {
                anchor_x,
                vx,
                vy,
                sway_time,
            } => {
                let vy = (vy - FALL_GRAVITY * adt).max(-TERMINAL_FALL_SPEED);
                let vx = vx * (1.0 - FALL_DRAG * adt).max(0.0);
                let anchor_x = anchor_x + vx * adt;
                let sway_time = sway_time + adt;
                let wave = self.sway_frequency * TAU * sway_time + self.sway_phase;
                // offset by sin(phase) so the sway starts from the apex without a jump
                let sway = self.sway_amplitude * (wave.sin() - self.sway_phase.sin());
                let y = position.y + vy * adt;
                if y < OFFSCREEN_BOTTOM {
                    self.phase = Phase::Gone;
                    return None;
                }
                self.phase = Phase::Falling {
                    anchor_x,
                    vx,
                    vy,
                    sway_time,
                };
                Some(Vec2::new(anchor_x + sway, y))
            }
        }
    }
}

pub struct ConfettiEffect {
    ctx: EffectContext,
    clock: EffectClock,
    rng: ParticleRng,
    pieces: Vec<Piece>,
}

impl ConfettiEffect {
    pub fn new(ctx: EffectContext) -> Self {
        Self {
            clock: EffectClock::new(&ctx.config),
            rng: ParticleRng::for_config(&ctx.config, 1),
            pieces: Vec::new(),
            ctx,
        }
    }

    fn advance(&mut self, scene: &mut dyn SceneGraph, step: FrameStep) {
        for piece in &mut self.pieces {
            if piece.phase == Phase::Waiting {
                if step.elapsed < piece.spawn_time {
                    continue;
                }
                piece.phase = Phase::Launching { flight: 0.0 };
                scene.set_alpha(piece.node, 1.0);
            }

            let Some(node) = scene.node_mut(piece.node) else {
                continue;
            };
            match piece.step(node.position, step.adt) {
                Some(position) => {
                    node.position = position;
                    node.rotation += piece.rotation_speed * step.adt;
                    node.alpha = node.alpha.min(step.fade);
                }
                None => node.alpha = 0.0,
            }
        }
    }
}

impl ParticleEffect for ConfettiEffect {
    fn style(&self) -> EffectStyle {
        EffectStyle::Confetti
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
            let from_left = i % 2 == 0;
            let origin = Vec2::new(
                if from_left { -20.0 } else { size.width + 20.0 },
                rng.range(-10.0, 30.0),
            );
            let target_height = rng.range(0.5, 0.95) * size.height;
            let vx = if from_left {
                rng.range(30.0, 300.0)
            } else {
                rng.range(-300.0, -30.0)
            };
            let vy = (2.0 * GRAVITY * target_height).sqrt();

            if let Some(n) = scene.node_mut(node) {
                n.position = origin;
                n.scale = rng.range(0.7, 1.3);
                n.alpha = 0.0;
            }

            self.pieces.push(Piece {
                node,
                origin,
                launch: Vec2::new(vx, vy),
                target_height,
                rotation_speed: rng.range(-4.0, 4.0),
                sway_amplitude: rng.range(20.0, 60.0),
                sway_frequency: rng.range(0.3, 0.8),
                sway_phase: rng.angle(),
                spawn_time: rng.range_f64(0.0, spawn_window),
                phase: Phase::Waiting,
            });
        }
        log::debug!(
            "confetti: {count} pieces, spawn window {spawn_window:.2}s, scene {size}"
        );
    }

    fn update(&mut self, scene: &mut dyn SceneGraph, current_time: f64, delta_time: f64) {
        if let Some(step) = self.clock.advance(current_time, delta_time) {
            self.advance(scene, step);
        }
    }

    fn particle_count(&self) -> usize {
        self.pieces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing::{self, STEP};
    use crate::scene::SceneTree;

    fn setup() -> (ConfettiEffect, SceneTree) {
        let mut scene = SceneTree::new();
        let mut effect = ConfettiEffect::new(testing::context(testing::config(EffectStyle::Confetti)));
        effect.setup(&mut scene);
        (effect, scene)
    }

    #[test]
    fn setup_allocates_density_count_invisible() {
        let (effect, scene) = setup();
        assert_eq!(effect.particle_count(), 50);
        assert_eq!(scene.child_count(), 50);
        assert_eq!(scene.visible_count(), 0);
        for piece in &effect.pieces {
            assert!(piece.spawn_time >= 0.0 && piece.spawn_time <= 3.0 * SPAWN_WINDOW_FRACTION);
        }
    }

    #[test]
    fn first_update_does_not_move() {
        let (mut effect, mut scene) = setup();
        let before: Vec<Vec2> = scene.iter().map(|(_, n)| n.position).collect();
        effect.update(&mut scene, 100.0, STEP);
        let after: Vec<Vec2> = scene.iter().map(|(_, n)| n.position).collect();
        assert_eq!(before, after);
        assert_eq!(scene.visible_count(), 0);
    }

    #[test]
    fn pieces_wait_for_spawn_time() {
        let (mut effect, mut scene) = setup();
        let mut frame = 0;
        while (frame as f64) * STEP < 3.0 * SPAWN_WINDOW_FRACTION {
            let elapsed = frame as f64 * STEP;
            let origins: Vec<Vec2> = effect.pieces.iter().map(|p| p.origin).collect();
            effect.update(&mut scene, elapsed, STEP);
            for (piece, origin) in effect.pieces.iter().zip(origins) {
                if elapsed < piece.spawn_time {
                    let node = scene.node(piece.node).unwrap();
                    assert_eq!(node.position, origin);
                    assert_eq!(node.alpha, 0.0);
                }
            }
            frame += 1;
        }
    }

    #[test]
    fn launch_peaks_at_target_height() {
        let (mut effect, mut scene) = setup();
        let mut peaks = vec![f32::MIN; effect.pieces.len()];
        for frame in 0..600 {
            effect.update(&mut scene, frame as f64 * STEP, STEP);
            for (i, piece) in effect.pieces.iter().enumerate() {
                if matches!(piece.phase, Phase::Launching { .. } | Phase::Falling { .. }) {
                    if let Some(node) = scene.node(piece.node) {
                        peaks[i] = peaks[i].max(node.position.y - piece.origin.y);
                    }
                }
            }
        }
        for (piece, peak) in effect.pieces.iter().zip(peaks) {
            assert!(
                (peak - piece.target_height).abs() < 1e-2,
                "peak {peak} vs target {}",
                piece.target_height
            );
        }
    }

    #[test]
    fn launch_transitions_to_falling() {
        let (mut effect, mut scene) = setup();
        for frame in 0..400 {
            effect.update(&mut scene, frame as f64 * STEP, STEP);
        }
        assert!(effect
            .pieces
            .iter()
            .all(|p| !matches!(p.phase, Phase::Waiting | Phase::Launching { .. })));
    }

    #[test]
    fn alpha_invariants_hold() {
        let (mut effect, mut scene) = setup();
        testing::run_checked(&mut effect, &mut scene, 240);
        assert_eq!(scene.visible_count(), 0);
    }
}
