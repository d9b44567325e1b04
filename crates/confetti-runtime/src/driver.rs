//! Scene driver: one active effect per scene, restarted when looping

use crate::clock::FrameClock;
use confetti_core::Configuration;
use confetti_particles::{create_effect, EffectContext, ParticleEffect, SceneGraph, SceneTree};
use serde::Serialize;

/// Time after `duration` before a run counts as over
pub const GRACE_PERIOD: f64 = Configuration::FADE_DURATION;

/// What happens when a run ends
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Play once; the driver reports finished afterwards
    #[default]
    Once,
    /// Rebuild the effect and play again, `max_restarts` times (forever if `None`)
    Loop { max_restarts: Option<u32> },
}

/// Summary of the scene after one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FrameStats {
    pub frame: u64,
    /// Seconds since the current run started
    pub elapsed: f64,
    pub live_nodes: usize,
    pub visible_nodes: usize,
    pub max_alpha: f32,
    pub restarts: u32,
}

/// Owns a scene graph and the effect animating it.
///
/// Call [`SceneDriver::tick`] once per rendered frame with the host's
/// monotonic time in seconds.
pub struct SceneDriver<S: SceneGraph = SceneTree> {
    scene: S,
    ctx: EffectContext,
    effect: Box<dyn ParticleEffect>,
    clock: FrameClock,
    mode: PlaybackMode,
    /// Host time the current run started
    run_start: Option<f64>,
    last_time: f64,
    restarts: u32,
}

impl<S: SceneGraph> SceneDriver<S> {
    /// Build the configured effect and allocate its particles in `scene`
    pub fn new(mut scene: S, ctx: EffectContext, mode: PlaybackMode) -> Self {
        let mut effect = create_effect(ctx.clone());
        effect.setup(&mut scene);
        log::debug!(
            "driver: {} with {} particles on a {} scene",
            effect.style(),
            effect.particle_count(),
            ctx.scene_size
        );
        Self {
            scene,
            ctx,
            effect,
            clock: FrameClock::new(),
            mode,
            run_start: None,
            last_time: 0.0,
            restarts: 0,
        }
    }

    /// Length of one run including the grace period
    pub fn run_length(&self) -> f64 {
        self.ctx.config.duration + GRACE_PERIOD
    }

    pub fn tick(&mut self, current_time: f64) {
        self.last_time = current_time;
        let Some(delta) = self.clock.tick(current_time) else {
            // priming: the effect latches its own zero point
            self.run_start = Some(current_time);
            self.effect.update(&mut self.scene, current_time, 0.0);
            return;
        };

        if self.should_restart(current_time) {
            self.restart(current_time);
            return;
        }
        self.effect.update(&mut self.scene, current_time, delta);
    }

    fn run_elapsed(&self, current_time: f64) -> f64 {
        self.run_start.map_or(0.0, |start| current_time - start)
    }

    fn restarts_left(&self) -> bool {
        match self.mode {
            PlaybackMode::Once => false,
            PlaybackMode::Loop { max_restarts } => max_restarts.map_or(true, |max| self.restarts < max),
        }
    }

    fn should_restart(&self, current_time: f64) -> bool {
        self.restarts_left() && self.run_elapsed(current_time) > self.run_length()
    }

    fn restart(&mut self, current_time: f64) {
        self.scene.remove_all_children();
        self.effect = create_effect(self.ctx.clone());
        self.effect.setup(&mut self.scene);
        self.restarts += 1;
        self.run_start = Some(current_time);
        self.effect.update(&mut self.scene, current_time, 0.0);
        log::debug!(
            "driver: restarted {} (run {})",
            self.effect.style(),
            self.restarts + 1
        );
    }

    /// True once the final run has played out its duration and grace period
    pub fn is_finished(&self) -> bool {
        self.run_start.is_some()
            && !self.restarts_left()
            && self.run_elapsed(self.last_time) > self.run_length()
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn effect(&self) -> &dyn ParticleEffect {
        self.effect.as_ref()
    }

    pub fn config(&self) -> &Configuration {
        &self.ctx.config
    }

    pub fn into_scene(self) -> S {
        self.scene
    }
}

impl SceneDriver<SceneTree> {
    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frame: self.clock.frames(),
            elapsed: self.run_elapsed(self.last_time).max(0.0),
            live_nodes: self.scene.child_count(),
            visible_nodes: self.scene.visible_count(),
            max_alpha: self.scene.max_alpha(),
            restarts: self.restarts,
        }
    }
}
