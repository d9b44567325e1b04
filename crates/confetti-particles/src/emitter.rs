//! Continuous emission: a constant birth rate of short-lived sub-particles
//!
//! Ranges follow one convention: a value `x` with range `r` is sampled uniformly
//! from `[x - r/2, x + r/2]`.

use crate::effect::FrameStep;
use crate::particle::ParticlePool;
use crate::rand::ParticleRng;
use crate::scene::SceneGraph;
use crate::texture::DrawableHandle;
use glam::Vec2;

/// Emission parameters for one emitter
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Particles per second
    pub birth_rate: f32,
    pub lifetime: f32,
    pub lifetime_range: f32,
    pub position: Vec2,
    pub position_range: Vec2,
    /// Radians, 0 = +x, counter-clockwise
    pub emission_angle: f32,
    pub emission_angle_range: f32,
    pub speed: f32,
    pub speed_range: f32,
    pub acceleration: Vec2,
    pub scale: f32,
    pub scale_range: f32,
    pub rotation_range: f32,
    /// Spin shared by every particle of this emitter
    pub rotation_speed: f32,
    pub alpha: f32,
    pub alpha_range: f32,
    /// Alpha change per second of particle age
    pub alpha_speed: f32,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            birth_rate: 10.0,
            lifetime: 1.0,
            lifetime_range: 0.0,
            position: Vec2::ZERO,
            position_range: Vec2::ZERO,
            emission_angle: 0.0,
            emission_angle_range: 0.0,
            speed: 0.0,
            speed_range: 0.0,
            acceleration: Vec2::ZERO,
            scale: 1.0,
            scale_range: 0.0,
            rotation_range: 0.0,
            rotation_speed: 0.0,
            alpha: 1.0,
            alpha_range: 0.0,
            alpha_speed: 0.0,
        }
    }
}

impl EmitterConfig {
    /// Slots preallocated for particles alive at once when they age in real
    /// time. The pool grows past this when a slow step keeps them alive longer.
    fn pool_capacity(&self) -> usize {
        let max_lifetime = self.lifetime + 0.5 * self.lifetime_range.max(0.0);
        (self.birth_rate.max(0.0) * max_lifetime).ceil() as usize + 16
    }
}

/// Runtime state for one emitter
pub struct Emitter {
    pub config: EmitterConfig,
    drawable: DrawableHandle,
    pool: ParticlePool,
    /// Fractional particle accumulator for sub-frame emission
    accumulator: f32,
    /// Opacity applied on top of every particle's own alpha
    group_alpha: f32,
    emitted: usize,
}

impl Emitter {
    pub fn new(config: EmitterConfig, drawable: DrawableHandle) -> Self {
        let pool = ParticlePool::new(config.pool_capacity());
        Self {
            config,
            drawable,
            pool,
            accumulator: 0.0,
            group_alpha: 1.0,
            emitted: 0,
        }
    }

    pub fn alive_count(&self) -> usize {
        self.pool.alive_count()
    }

    /// Total particles born so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn is_emitting(&self) -> bool {
        self.config.birth_rate > 0.0
    }

    /// Stop births; alive particles keep running until they expire
    pub fn stop(&mut self) {
        self.config.birth_rate = 0.0;
        self.accumulator = 0.0;
    }

    pub fn group_alpha(&self) -> f32 {
        self.group_alpha
    }

    /// Lower the group opacity. It never increases again.
    pub fn cap_group_alpha(&mut self, cap: f32) {
        self.group_alpha = self.group_alpha.min(cap.clamp(0.0, 1.0));
    }

    /// Births are clocked by `emit_dt` (wall time), motion by `sim_dt`
    /// (the eased, speed-scaled step).
    pub fn update(
        &mut self,
        scene: &mut dyn SceneGraph,
        rng: &mut ParticleRng,
        emit_dt: f32,
        sim_dt: f32,
    ) {
        if self.config.birth_rate > 0.0 {
            self.accumulator += self.config.birth_rate * emit_dt.max(0.0);
            let spawn_count = self.accumulator as u32;
            self.accumulator -= spawn_count as f32;
            for _ in 0..spawn_count {
                self.spawn_particle(scene, rng);
            }
        }

        let acceleration = self.config.acceleration;
        let alpha_speed = self.config.alpha_speed;
        let group_alpha = self.group_alpha;
        for p in self.pool.alive_slice_mut() {
            p.age += sim_dt;
            p.velocity += acceleration * sim_dt;
            p.position += p.velocity * sim_dt;
            p.rotation += p.rotation_speed * sim_dt;
            p.alpha = (p.alpha + alpha_speed * sim_dt).clamp(0.0, 1.0);

            if let Some(node) = scene.node_mut(p.node) {
                node.position = p.position;
                node.rotation = p.rotation;
                node.scale = p.scale;
                node.alpha = node.alpha.min(p.alpha * group_alpha);
            }
        }

        self.pool.compact(|p| scene.remove_child(p.node));
    }

    /// Remove every alive particle's node from the scene
    pub fn clear(&mut self, scene: &mut dyn SceneGraph) {
        self.pool.clear(|p| scene.remove_child(p.node));
    }

    fn spawn_particle(&mut self, scene: &mut dyn SceneGraph, rng: &mut ParticleRng) {
        let c = &self.config;
        let p = self.pool.spawn();
        let position = Vec2::new(
            rng.spread(c.position.x, c.position_range.x),
            rng.spread(c.position.y, c.position_range.y),
        );
        let direction = rng.spread_direction(c.emission_angle, c.emission_angle_range);
        let speed = rng.spread(c.speed, c.speed_range).max(0.0);

        p.node = scene.add_child(self.drawable);
        p.position = position;
        p.velocity = direction * speed;
        p.age = 0.0;
        p.lifetime = rng.spread(c.lifetime, c.lifetime_range).max(0.05);
        p.scale = rng.spread(c.scale, c.scale_range).max(0.05);
        p.rotation = rng.spread(0.0, c.rotation_range);
        p.rotation_speed = c.rotation_speed;
        p.alpha = rng.spread(c.alpha, c.alpha_range).clamp(0.0, 1.0);

        if let Some(node) = scene.node_mut(p.node) {
            node.position = p.position;
            node.rotation = p.rotation;
            node.scale = p.scale;
            node.alpha = (p.alpha * self.group_alpha).clamp(0.0, 1.0);
        }
        self.emitted += 1;
    }
}

/// One emitter per glyph, started and stopped together.
///
/// Births stop once `elapsed` passes `stop_after`; every frame the group
/// opacity is capped by the global fade.
pub struct EmitterGroup {
    emitters: Vec<Emitter>,
    stop_after: f64,
}

impl EmitterGroup {
    pub fn new(emitters: Vec<Emitter>, stop_after: f64) -> Self {
        Self {
            emitters,
            stop_after,
        }
    }

    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    pub fn alive_count(&self) -> usize {
        self.emitters.iter().map(Emitter::alive_count).sum()
    }

    pub fn emitted(&self) -> usize {
        self.emitters.iter().map(Emitter::emitted).sum()
    }

    pub fn is_emitting(&self) -> bool {
        self.emitters.iter().any(Emitter::is_emitting)
    }

    pub fn advance(&mut self, scene: &mut dyn SceneGraph, rng: &mut ParticleRng, step: &FrameStep) {
        if step.elapsed > self.stop_after && self.is_emitting() {
            self.emitters.iter_mut().for_each(Emitter::stop);
            log::debug!(
                "emitters stopped at {:.2}s with {} particles alive",
                step.elapsed,
                self.alive_count()
            );
        }
        for emitter in &mut self.emitters {
            emitter.cap_group_alpha(step.fade);
            emitter.update(scene, rng, step.dt, step.adt);
        }
    }

    pub fn clear(&mut self, scene: &mut dyn SceneGraph) {
        for emitter in &mut self.emitters {
            emitter.clear(scene);
        }
    }
}
