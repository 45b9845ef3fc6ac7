//! The two entity kinds that populate the field.
//!
//! Entities are plain data. They carry no behavior beyond derived age and
//! phase queries; spawning, movement, and retirement are the
//! [`Field`](crate::Field)'s job.

use glam::Vec2;

/// Conceptual state of an arrow, derived from its age.
///
/// Arrows never store their phase; it falls out of `age` vs. `lifetime`.
/// A destroyed arrow is simply no longer in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowPhase {
    /// Still within its lifetime.
    Flying,
    /// Past its lifetime, accumulating fade time until removal.
    Fading,
}

/// A transient projectile crossing the surface.
#[derive(Debug, Clone)]
pub struct Arrow {
    /// Position in logical surface coordinates.
    pub position: Vec2,
    /// Velocity in px/s.
    pub velocity: Vec2,
    /// Shaft length, fixed at spawn.
    pub length: f32,
    /// Stroke thickness, fixed at spawn.
    pub thickness: f32,
    /// Simulation-clock timestamp at spawn.
    pub born_at: f32,
    /// Seconds before the fade window starts.
    pub lifetime: f32,
    /// Fade time accumulated once past `lifetime`.
    pub fade_elapsed: f32,
}

impl Arrow {
    /// Age in seconds at the given clock reading.
    #[inline]
    pub fn age(&self, now: f32) -> f32 {
        now - self.born_at
    }

    /// Current phase at the given clock reading.
    pub fn phase(&self, now: f32) -> ArrowPhase {
        if self.age(now) > self.lifetime {
            ArrowPhase::Fading
        } else {
            ArrowPhase::Flying
        }
    }

    /// Heading in radians, `atan2(vy, vx)`.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x)
    }
}

/// A stationary collision zone arrows can hit.
#[derive(Debug, Clone)]
pub struct Target {
    /// Position in logical surface coordinates.
    pub position: Vec2,
    /// Ring radius, fixed at spawn.
    pub radius: f32,
    /// Simulation-clock timestamp at spawn.
    pub born_at: f32,
    /// Seconds until the target vanishes. No fade state.
    pub lifetime: f32,
    /// Cosmetic glow strength, fixed at spawn.
    pub glow: f32,
}

impl Target {
    /// Age in seconds at the given clock reading.
    #[inline]
    pub fn age(&self, now: f32) -> f32 {
        now - self.born_at
    }

    /// Whether the target has outlived its lifetime.
    #[inline]
    pub fn expired(&self, now: f32) -> bool {
        self.age(now) > self.lifetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrow_at(born_at: f32, lifetime: f32) -> Arrow {
        Arrow {
            position: Vec2::ZERO,
            velocity: Vec2::new(80.0, 0.0),
            length: 12.0,
            thickness: 1.5,
            born_at,
            lifetime,
            fade_elapsed: 0.0,
        }
    }

    #[test]
    fn test_arrow_age_is_clock_difference() {
        let a = arrow_at(2.0, 4.0);
        assert_eq!(a.age(2.0), 0.0);
        assert_eq!(a.age(5.5), 3.5);
    }

    #[test]
    fn test_arrow_phase_flips_past_lifetime() {
        let a = arrow_at(0.0, 4.0);
        assert_eq!(a.phase(3.9), ArrowPhase::Flying);
        assert_eq!(a.phase(4.0), ArrowPhase::Flying);
        assert_eq!(a.phase(4.1), ArrowPhase::Fading);
    }

    #[test]
    fn test_arrow_angle_follows_velocity() {
        let mut a = arrow_at(0.0, 4.0);
        a.velocity = Vec2::new(0.0, 100.0);
        assert!((a.angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_target_expiry() {
        let t = Target {
            position: Vec2::new(10.0, 10.0),
            radius: 5.0,
            born_at: 1.0,
            lifetime: 6.0,
            glow: 0.4,
        };
        assert!(!t.expired(7.0));
        assert!(t.expired(7.1));
    }
}
