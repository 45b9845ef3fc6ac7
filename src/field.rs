//! The particle field: population management, stepping, and collisions.
//!
//! A [`Field`] owns both entity collections and advances them once per frame
//! from a monotonic clock reading. One simulation instance has exactly one
//! owner; no entity is shared outside it.

use glam::Vec2;

use crate::config::FieldConfig;
use crate::entity::{Arrow, Target};
use crate::spawn::Spawner;

/// A bounded population of arrows and targets over a logical surface.
pub struct Field {
    config: FieldConfig,
    spawner: Spawner,
    size: Vec2,
    pub(crate) arrows: Vec<Arrow>,
    pub(crate) targets: Vec<Target>,
    last_step: f32,
}

impl Field {
    /// Create an empty field over a surface of the given logical size.
    pub fn new(config: FieldConfig, spawner: Spawner, size: Vec2) -> Self {
        let arrows = Vec::with_capacity(config.max_arrows);
        let targets = Vec::with_capacity(config.max_targets);
        Self {
            config,
            spawner,
            size,
            arrows,
            targets,
            last_step: 0.0,
        }
    }

    /// Seed the initial population: half the target cap, no arrows.
    ///
    /// Also anchors the step clock so the first frame's delta starts at
    /// `now` rather than zero.
    pub fn seed(&mut self, now: f32) {
        self.last_step = now;
        for _ in 0..self.config.max_targets / 2 {
            let t = self.spawner.spawn_target(&self.config, self.size, now);
            self.targets.push(t);
        }
        tracing::debug!(targets = self.targets.len(), "field seeded");
    }

    /// Update the logical surface size. Identical dimensions are a no-op.
    ///
    /// Entities keep their absolute coordinates; anything now out of range
    /// retires through the bounds check on the next step.
    pub fn resize(&mut self, size: Vec2) {
        if size == self.size {
            return;
        }
        self.size = size;
    }

    /// Logical surface size.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Live arrows in storage order.
    #[inline]
    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    /// Live targets in storage order.
    #[inline]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Advance the simulation to clock reading `now`.
    ///
    /// The time delta is clamped to the configured ceiling before any
    /// integration, bounding worst-case jumps after a stalled frame. Order:
    /// spawn trials, arrow integration and fade/bounds retirement, target
    /// expiry, collisions.
    pub fn step(&mut self, now: f32) {
        let dt = (now - self.last_step).clamp(0.0, self.config.max_dt);
        self.last_step = now;

        self.maintain(now);
        self.advance_arrows(now, dt);
        self.expire_targets(now);
        self.collide();
    }

    /// Independent per-frame Bernoulli spawn trials, one per entity kind.
    fn maintain(&mut self, now: f32) {
        if self.targets.len() < self.config.max_targets
            && self.spawner.roll(self.config.target_spawn_chance)
        {
            let t = self.spawner.spawn_target(&self.config, self.size, now);
            self.targets.push(t);
        }
        if self.arrows.len() < self.config.max_arrows
            && self.spawner.roll(self.config.arrow_spawn_chance)
        {
            let a = self.spawner.spawn_arrow(&self.config, self.size, now);
            self.arrows.push(a);
        }
    }

    /// Integrate arrow positions, then retire faded-out and out-of-bounds
    /// arrows in the same pass.
    fn advance_arrows(&mut self, now: f32, dt: f32) {
        let size = self.size;
        let margin = self.config.bounds_margin;
        let fade_window = self.config.fade_window;

        self.arrows.retain_mut(|a| {
            a.position += a.velocity * dt;

            // fade accrues only past lifetime
            if a.age(now) > a.lifetime {
                a.fade_elapsed += dt;
                if a.fade_elapsed > fade_window {
                    return false;
                }
            }

            // the miss path: gone past the margin, removed with no fade delay
            a.position.x >= -margin
                && a.position.x <= size.x + margin
                && a.position.y >= -margin
                && a.position.y <= size.y + margin
        });
    }

    fn expire_targets(&mut self, now: f32) {
        self.targets.retain(|t| !t.expired(now));
    }

    /// Arrow-target collision pass.
    ///
    /// Arrows scan targets in storage order and die on the first target
    /// within hit radius; that target is claimed and skipped by later arrows,
    /// then compacted out after the pass. First match wins; with randomized
    /// spawn order there is no meaningful priority to preserve.
    fn collide(&mut self) {
        if self.arrows.is_empty() || self.targets.is_empty() {
            return;
        }

        let targets = &self.targets;
        let margin = self.config.hit_margin;
        let mut claimed = vec![false; targets.len()];
        let mut hits = 0u32;

        self.arrows.retain(|a| {
            for (i, t) in targets.iter().enumerate() {
                if claimed[i] {
                    continue;
                }
                let hit_radius = t.radius + margin;
                if a.position.distance_squared(t.position) < hit_radius * hit_radius {
                    claimed[i] = true;
                    hits += 1;
                    return false;
                }
            }
            true
        });

        if hits > 0 {
            let mut i = 0;
            self.targets.retain(|_| {
                let dead = claimed[i];
                i += 1;
                !dead
            });
            tracing::trace!(hits, "arrows hit targets");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Vec2 = Vec2::new(800.0, 600.0);

    /// Config with spawn trials disabled, so tests control the population.
    fn quiet_config() -> FieldConfig {
        FieldConfig {
            arrow_spawn_chance: 0.0,
            target_spawn_chance: 0.0,
            ..FieldConfig::default()
        }
    }

    fn quiet_field() -> Field {
        Field::new(quiet_config(), Spawner::with_seed(1), SIZE)
    }

    fn arrow(position: Vec2, velocity: Vec2) -> Arrow {
        Arrow {
            position,
            velocity,
            length: 12.0,
            thickness: 1.5,
            born_at: 0.0,
            lifetime: 100.0,
            fade_elapsed: 0.0,
        }
    }

    fn target(position: Vec2, radius: f32) -> Target {
        Target {
            position,
            radius,
            born_at: 0.0,
            lifetime: 100.0,
            glow: 0.4,
        }
    }

    #[test]
    fn test_seed_populates_half_target_cap() {
        let mut field = quiet_field();
        field.seed(0.0);
        assert_eq!(field.targets().len(), 4);
        assert!(field.arrows().is_empty());
    }

    #[test]
    fn test_kinematics_exact() {
        let mut field = quiet_field();
        field.arrows.push(arrow(Vec2::new(100.0, 200.0), Vec2::new(100.0, -50.0)));
        field.step(0.016);
        let a = &field.arrows()[0];
        assert_eq!(a.position.x, 100.0 + 100.0 * 0.016);
        assert_eq!(a.position.y, 200.0 + -50.0 * 0.016);
    }

    #[test]
    fn test_dt_clamped_before_integration() {
        let mut field = quiet_field();
        field.arrows.push(arrow(Vec2::new(100.0, 100.0), Vec2::new(100.0, 0.0)));
        // 0.1 s elapsed, but only the 0.033 ceiling may be integrated
        field.step(0.1);
        let a = &field.arrows()[0];
        assert_eq!(a.position.x, 100.0 + 100.0 * 0.033);
    }

    #[test]
    fn test_clock_regression_integrates_nothing() {
        let mut field = quiet_field();
        field.last_step = 5.0;
        field.arrows.push(arrow(Vec2::new(100.0, 100.0), Vec2::new(100.0, 0.0)));
        field.step(4.0);
        assert_eq!(field.arrows()[0].position.x, 100.0);
    }

    #[test]
    fn test_hit_removes_both() {
        // dist 4 < hit radius 5 + 4
        let mut field = quiet_field();
        field.targets.push(target(Vec2::new(100.0, 100.0), 5.0));
        field.arrows.push(arrow(Vec2::new(96.0, 100.0), Vec2::ZERO));
        field.step(0.016);
        assert!(field.arrows().is_empty());
        assert!(field.targets().is_empty());
    }

    #[test]
    fn test_near_miss_keeps_both() {
        let mut field = quiet_field();
        field.targets.push(target(Vec2::new(100.0, 100.0), 5.0));
        field.arrows.push(arrow(Vec2::new(100.0, 110.0), Vec2::ZERO));
        field.step(0.016);
        assert_eq!(field.arrows().len(), 1);
        assert_eq!(field.targets().len(), 1);
    }

    #[test]
    fn test_hit_ignores_fade_state() {
        let mut field = quiet_field();
        field.targets.push(target(Vec2::new(100.0, 100.0), 5.0));
        let mut a = arrow(Vec2::new(98.0, 100.0), Vec2::ZERO);
        a.lifetime = 0.001;
        a.fade_elapsed = 0.2;
        field.arrows.push(a);
        field.step(1.0);
        assert!(field.arrows().is_empty());
        assert!(field.targets().is_empty());
    }

    #[test]
    fn test_collision_first_target_in_order_wins() {
        let mut field = quiet_field();
        field.targets.push(target(Vec2::new(100.0, 100.0), 5.0));
        field.targets.push(target(Vec2::new(103.0, 100.0), 5.0));
        field.arrows.push(arrow(Vec2::new(101.0, 100.0), Vec2::ZERO));
        field.step(0.016);
        assert!(field.arrows().is_empty());
        // the arrow was closer to the second target, but the first in
        // storage order takes the hit
        assert_eq!(field.targets().len(), 1);
        assert_eq!(field.targets()[0].position.x, 103.0);
    }

    #[test]
    fn test_target_claimed_by_at_most_one_arrow() {
        let mut field = quiet_field();
        field.targets.push(target(Vec2::new(100.0, 100.0), 5.0));
        field.arrows.push(arrow(Vec2::new(98.0, 100.0), Vec2::ZERO));
        field.arrows.push(arrow(Vec2::new(102.0, 100.0), Vec2::ZERO));
        field.step(0.016);
        assert!(field.targets().is_empty());
        // second arrow found no unclaimed target and survives
        assert_eq!(field.arrows().len(), 1);
        assert_eq!(field.arrows()[0].position.x, 102.0);
    }

    #[test]
    fn test_out_of_bounds_is_an_immediate_miss() {
        let mut field = quiet_field();
        // moving left from just inside the margin; one step puts it past -20
        field.arrows.push(arrow(Vec2::new(-15.0, 50.0), Vec2::new(-200.0, 0.0)));
        field.step(0.033);
        assert!(field.arrows().is_empty());
    }

    #[test]
    fn test_in_bounds_margin_is_kept() {
        let mut field = quiet_field();
        field.arrows.push(arrow(Vec2::new(-15.0, 50.0), Vec2::new(-10.0, 0.0)));
        // x drifts to -15.33, still inside the 20 px margin
        field.step(0.033);
        assert_eq!(field.arrows().len(), 1);
    }

    #[test]
    fn test_fade_window_survival() {
        let mut field = quiet_field();
        let mut a = arrow(Vec2::new(100.0, 100.0), Vec2::ZERO);
        a.lifetime = 0.001;
        a.fade_elapsed = 0.1;
        field.arrows.push(a);
        field.step(1.0);
        // fade grew by one clamped dt, still within the 0.4 s window
        assert_eq!(field.arrows().len(), 1);
        assert!(field.arrows()[0].fade_elapsed <= 0.4);
    }

    #[test]
    fn test_fade_window_exceeded_removes() {
        let mut field = quiet_field();
        let mut a = arrow(Vec2::new(100.0, 100.0), Vec2::ZERO);
        a.lifetime = 0.001;
        a.fade_elapsed = 0.39;
        field.arrows.push(a);
        field.step(1.0);
        assert!(field.arrows().is_empty());
    }

    #[test]
    fn test_fade_only_accrues_past_lifetime() {
        let mut field = quiet_field();
        let mut a = arrow(Vec2::new(100.0, 100.0), Vec2::ZERO);
        a.lifetime = 50.0;
        field.arrows.push(a);
        for i in 1..=10 {
            field.step(i as f32 * 0.016);
        }
        assert_eq!(field.arrows()[0].fade_elapsed, 0.0);
    }

    #[test]
    fn test_target_expires_at_lifetime() {
        let mut field = quiet_field();
        let mut t = target(Vec2::new(100.0, 100.0), 5.0);
        t.lifetime = 1.0;
        field.targets.push(t);
        field.step(0.9);
        assert_eq!(field.targets().len(), 1);
        field.step(1.1);
        assert!(field.targets().is_empty());
    }

    #[test]
    fn test_population_never_exceeds_caps() {
        let config = FieldConfig {
            arrow_spawn_chance: 1.0,
            target_spawn_chance: 1.0,
            ..FieldConfig::default()
        };
        let mut field = Field::new(config, Spawner::with_seed(5), SIZE);
        field.seed(0.0);
        for i in 1..=500 {
            field.step(i as f32 * 0.016);
            assert!(field.arrows().len() <= 10);
            assert!(field.targets().len() <= 8);
        }
    }

    #[test]
    fn test_ages_never_negative() {
        let config = FieldConfig {
            arrow_spawn_chance: 1.0,
            target_spawn_chance: 1.0,
            ..FieldConfig::default()
        };
        let mut field = Field::new(config, Spawner::with_seed(8), SIZE);
        field.seed(3.0);
        for i in 1..=200 {
            let now = 3.0 + i as f32 * 0.016;
            field.step(now);
            for a in field.arrows() {
                assert!(a.age(now) >= 0.0);
            }
            for t in field.targets() {
                assert!(t.age(now) >= 0.0);
            }
        }
    }

    #[test]
    fn test_resize_is_idempotent_and_keeps_positions() {
        let mut field = quiet_field();
        field.arrows.push(arrow(Vec2::new(700.0, 500.0), Vec2::ZERO));
        field.resize(SIZE);
        assert_eq!(field.size(), SIZE);
        field.resize(Vec2::new(400.0, 300.0));
        assert_eq!(field.size(), Vec2::new(400.0, 300.0));
        // absolute coordinates untouched by the resize itself
        assert_eq!(field.arrows()[0].position, Vec2::new(700.0, 500.0));
    }

    #[test]
    fn test_shrunk_surface_retires_stranded_arrows() {
        let mut field = quiet_field();
        field.arrows.push(arrow(Vec2::new(700.0, 500.0), Vec2::ZERO));
        field.resize(Vec2::new(400.0, 300.0));
        // 700 > 400 + 20, retired as a miss on the next step
        field.step(0.016);
        assert!(field.arrows().is_empty());
    }
}
