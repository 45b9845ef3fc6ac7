//! Entity spawning.
//!
//! All randomness in the simulation flows through a [`Spawner`], so tests can
//! seed it and replay exact spawn sequences. Production code uses an
//! entropy-seeded RNG; there is no reproducibility guarantee across runs.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

use crate::config::FieldConfig;
use crate::entity::{Arrow, Target};

/// Seedable source of spawn decisions and spawn parameters.
pub struct Spawner {
    rng: SmallRng,
}

impl Spawner {
    /// Spawner seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Deterministic spawner for tests and reproducible demos.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// One Bernoulli trial: true with probability `chance`.
    pub fn roll(&mut self, chance: f32) -> bool {
        self.rng.gen::<f32>() < chance
    }

    fn sample(&mut self, range: &Range<f32>) -> f32 {
        self.rng.gen_range(range.clone())
    }

    /// Create one target at a uniform position over the surface.
    ///
    /// Always succeeds; the population cap is the caller's check.
    pub fn spawn_target(&mut self, config: &FieldConfig, size: Vec2, now: f32) -> Target {
        Target {
            position: Vec2::new(
                self.rng.gen_range(0.0..size.x),
                self.rng.gen_range(0.0..size.y),
            ),
            radius: self.sample(&config.target_radius),
            born_at: now,
            lifetime: self.sample(&config.target_lifetime),
            glow: self.sample(&config.target_glow),
        }
    }

    /// Create one arrow just outside a uniformly chosen edge, headed across.
    ///
    /// The cross-axis velocity gets a jitter fraction of the speed, so
    /// trajectories are mostly axis-aligned but slightly diagonal.
    pub fn spawn_arrow(&mut self, config: &FieldConfig, size: Vec2, now: f32) -> Arrow {
        let speed = self.sample(&config.arrow_speed);
        let jitter = self.rng.gen_range(-config.arrow_jitter..config.arrow_jitter);
        let off = config.edge_offset;

        // 0=left, 1=right, 2=top, 3=bottom
        let (position, velocity) = match self.rng.gen_range(0..4u32) {
            0 => (
                Vec2::new(-off, self.rng.gen_range(0.0..size.y)),
                Vec2::new(speed, speed * jitter),
            ),
            1 => (
                Vec2::new(size.x + off, self.rng.gen_range(0.0..size.y)),
                Vec2::new(-speed, speed * jitter),
            ),
            2 => (
                Vec2::new(self.rng.gen_range(0.0..size.x), -off),
                Vec2::new(speed * jitter, speed),
            ),
            _ => (
                Vec2::new(self.rng.gen_range(0.0..size.x), size.y + off),
                Vec2::new(speed * jitter, -speed),
            ),
        };

        Arrow {
            position,
            velocity,
            length: self.sample(&config.arrow_length),
            thickness: self.sample(&config.arrow_thickness),
            born_at: now,
            lifetime: self.sample(&config.arrow_lifetime),
            fade_elapsed: 0.0,
        }
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}
