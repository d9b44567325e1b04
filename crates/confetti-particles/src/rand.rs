//! Seedable particle RNG backed by `rand`'s `StdRng`

use confetti_core::Configuration;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

pub struct ParticleRng {
    inner: StdRng,
}

impl ParticleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }

    /// Seeded from `config.seed` when set, otherwise from OS entropy.
    /// `stream` separates independent generators that share one seed.
    pub fn for_config(config: &Configuration, stream: u64) -> Self {
        match config.seed {
            Some(seed) => Self::new(seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            None => Self::from_entropy(),
        }
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Returns a float in [min, max]. A degenerate range yields `min`.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    /// Returns a float in [min, max] at double precision (used for timing)
    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    /// Returns an integer in [min, max]
    pub fn range_usize(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    /// Value centred on `base` spread uniformly over a total width of `range`
    pub fn spread(&mut self, base: f32, range: f32) -> f32 {
        base + self.range(-0.5 * range, 0.5 * range)
    }

    /// Uniform angle in [0, 2π]
    pub fn angle(&mut self) -> f32 {
        self.range(0.0, TAU)
    }

    /// Unit vector at a uniformly random angle
    pub fn random_direction(&mut self) -> Vec2 {
        Vec2::from_angle(self.angle())
    }

    /// Unit vector within `range` radians (total width) around `base_angle`
    pub fn spread_direction(&mut self, base_angle: f32, range: f32) -> Vec2 {
        if range <= 0.0 {
            return Vec2::from_angle(base_angle);
        }
        Vec2::from_angle(self.spread(base_angle, range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_range_bounds() {
        let mut rng = ParticleRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(0.0, 10.0);
            assert!((0.0..=10.0).contains(&v));
        }
    }

    #[test]
    fn degenerate_range_returns_min() {
        let mut rng = ParticleRng::new(7);
        assert_eq!(rng.range(3.0, 3.0), 3.0);
        assert_eq!(rng.range_f64(0.0, 0.0), 0.0);
        assert_eq!(rng.range_usize(4, 4), 4);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = ParticleRng::new(99);
        let mut b = ParticleRng::new(99);
        for _ in 0..32 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn direction_unit_length() {
        let mut rng = ParticleRng::new(123);
        for _ in 0..100 {
            let d = rng.random_direction();
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn spread_direction_zero_range() {
        let mut rng = ParticleRng::new(5);
        let d = rng.spread_direction(-std::f32::consts::FRAC_PI_2, 0.0);
        assert!(d.x.abs() < 1e-5);
        assert!((d.y + 1.0).abs() < 1e-5);
    }
}
