//! Emitted particles and the swap-remove pool that owns them

use crate::scene::NodeId;
use glam::Vec2;

/// Simulation state of one emitter-born particle
#[derive(Clone, Debug)]
pub struct EmittedParticle {
    pub node: NodeId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub age: f32,
    pub lifetime: f32,
    pub scale: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub alpha: f32,
    pub alive: bool,
}

impl EmittedParticle {
    pub fn dead() -> Self {
        Self {
            node: NodeId(u64::MAX),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            age: 0.0,
            lifetime: 0.0,
            scale: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            alpha: 0.0,
            alive: false,
        }
    }

    /// Past its lifetime or fully transparent
    pub fn is_expired(&self) -> bool {
        !self.alive || self.age >= self.lifetime || self.alpha <= 0.0
    }
}

/// Swap-remove pool for O(1) particle kill and contiguous alive iteration.
///
/// Slots are preallocated; a spawn on a full pool appends a new slot, so no
/// birth is ever dropped.
pub struct ParticlePool {
    particles: Vec<EmittedParticle>,
    alive_count: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: vec![EmittedParticle::dead(); capacity],
            alive_count: 0,
        }
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Spawn one particle, returning a mutable ref to initialize it
    pub fn spawn(&mut self) -> &mut EmittedParticle {
        if self.alive_count == self.particles.len() {
            self.particles.push(EmittedParticle::dead());
        }
        let idx = self.alive_count;
        self.particles[idx].alive = true;
        self.alive_count += 1;
        &mut self.particles[idx]
    }

    /// Kill expired particles via swap-remove, handing each one to `on_kill`
    /// before it leaves the alive range.
    pub fn compact(&mut self, mut on_kill: impl FnMut(&EmittedParticle)) {
        let mut i = 0;
        while i < self.alive_count {
            if self.particles[i].is_expired() {
                on_kill(&self.particles[i]);
                self.particles[i].alive = false;
                self.alive_count -= 1;
                if i < self.alive_count {
                    self.particles.swap(i, self.alive_count);
                }
                // Don't increment i — the swapped-in particle needs checking
            } else {
                i += 1;
            }
        }
    }

    /// Kill every alive particle
    pub fn clear(&mut self, mut on_kill: impl FnMut(&EmittedParticle)) {
        for p in &mut self.particles[..self.alive_count] {
            on_kill(p);
            p.alive = false;
        }
        self.alive_count = 0;
    }

    pub fn alive_slice(&self) -> &[EmittedParticle] {
        &self.particles[..self.alive_count]
    }

    pub fn alive_slice_mut(&mut self) -> &mut [EmittedParticle] {
        &mut self.particles[..self.alive_count]
    }
}
