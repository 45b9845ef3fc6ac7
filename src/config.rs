//! Tunables for the particle field.
//!
//! Every numeric knob of the simulation lives here so tests can pin spawn
//! behavior down and the demo binary can run on production defaults.

use std::ops::Range;

/// Configuration for a [`Field`](crate::Field).
///
/// Defaults produce a sparse backdrop: a handful of small targets and an
/// occasional arrow crossing the surface. All ranges are sampled uniformly
/// at spawn time.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    /// Maximum simultaneous live arrows.
    pub max_arrows: usize,
    /// Maximum simultaneous live targets.
    pub max_targets: usize,
    /// Per-frame Bernoulli chance of spawning an arrow while under cap.
    pub arrow_spawn_chance: f32,
    /// Per-frame Bernoulli chance of spawning a target while under cap.
    pub target_spawn_chance: f32,
    /// Target radius in logical pixels.
    pub target_radius: Range<f32>,
    /// Target lifetime in seconds.
    pub target_lifetime: Range<f32>,
    /// Cosmetic glow strength per target.
    pub target_glow: Range<f32>,
    /// Arrow speed along its spawn edge's normal, in px/s.
    pub arrow_speed: Range<f32>,
    /// Cross-axis velocity as a fraction of speed, sampled in `[-jitter, jitter]`.
    pub arrow_jitter: f32,
    /// Arrow shaft length in logical pixels.
    pub arrow_length: Range<f32>,
    /// Arrow stroke thickness in logical pixels.
    pub arrow_thickness: Range<f32>,
    /// Arrow lifetime in seconds before the fade window starts.
    pub arrow_lifetime: Range<f32>,
    /// How far outside the chosen edge an arrow spawns, in pixels.
    pub edge_offset: f32,
    /// How far past the surface bounds an arrow may drift before it is
    /// retired as a miss.
    pub bounds_margin: f32,
    /// Added to the target radius to form the hit radius.
    pub hit_margin: f32,
    /// Grace period after an arrow's lifetime during which it is still drawn.
    pub fade_window: f32,
    /// Ceiling applied to the per-step time delta, in seconds.
    pub max_dt: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_arrows: 10,
            max_targets: 8,
            arrow_spawn_chance: 0.06,
            target_spawn_chance: 0.02,
            target_radius: 4.0..8.0,
            target_lifetime: 5.0..10.0,
            target_glow: 0.2..0.6,
            arrow_speed: 60.0..120.0,
            arrow_jitter: 0.25,
            arrow_length: 10.0..16.0,
            arrow_thickness: 1.2..1.8,
            arrow_lifetime: 3.5..6.0,
            edge_offset: 10.0,
            bounds_margin: 20.0,
            hit_margin: 4.0,
            fade_window: 0.4,
            max_dt: 0.033,
        }
    }
}
