//! Integration tests for the public simulation API.
//!
//! These tests drive a [`Field`] through its re-exported surface only, the
//! way an embedding application would: build, seed, step, compose.

use quiver::{ArrowPhase, Field, FieldConfig, Scene, Spawner, Vec2};

const SIZE: Vec2 = Vec2::new(1280.0, 720.0);

fn busy_config() -> FieldConfig {
    FieldConfig {
        arrow_spawn_chance: 1.0,
        target_spawn_chance: 1.0,
        ..FieldConfig::default()
    }
}

#[test]
fn test_seeded_runs_are_identical() {
    let mut a = Field::new(busy_config(), Spawner::with_seed(77), SIZE);
    let mut b = Field::new(busy_config(), Spawner::with_seed(77), SIZE);
    a.seed(0.0);
    b.seed(0.0);

    for i in 1..=300 {
        let now = i as f32 * 0.016;
        a.step(now);
        b.step(now);
    }

    assert_eq!(a.arrows().len(), b.arrows().len());
    assert_eq!(a.targets().len(), b.targets().len());
    for (x, y) in a.arrows().iter().zip(b.arrows()) {
        assert_eq!(x.position, y.position);
        assert_eq!(x.velocity, y.velocity);
    }
    for (x, y) in a.targets().iter().zip(b.targets()) {
        assert_eq!(x.position, y.position);
        assert_eq!(x.radius, y.radius);
    }
}

#[test]
fn test_long_run_stays_within_caps_and_bounds() {
    let config = busy_config();
    let max_arrows = config.max_arrows;
    let max_targets = config.max_targets;
    let margin = config.bounds_margin;

    let mut field = Field::new(config, Spawner::with_seed(3), SIZE);
    field.seed(0.0);

    for i in 1..=2_000 {
        let now = i as f32 * 0.016;
        field.step(now);

        assert!(field.arrows().len() <= max_arrows);
        assert!(field.targets().len() <= max_targets);
        for a in field.arrows() {
            assert!(a.position.x >= -margin && a.position.x <= SIZE.x + margin);
            assert!(a.position.y >= -margin && a.position.y <= SIZE.y + margin);
            assert!(a.fade_elapsed >= 0.0);
        }
        for t in field.targets() {
            assert!(!t.expired(now));
        }
    }
}

#[test]
fn test_flying_arrows_report_flying_phase() {
    let mut field = Field::new(busy_config(), Spawner::with_seed(13), SIZE);
    field.seed(0.0);
    // first second of life; the minimum arrow lifetime is 3.5 s
    for i in 1..=60 {
        let now = i as f32 * 0.016;
        field.step(now);
        for a in field.arrows() {
            assert_eq!(a.phase(now), ArrowPhase::Flying);
        }
    }
}

#[test]
fn test_scene_tracks_a_running_field() {
    let mut field = Field::new(busy_config(), Spawner::with_seed(55), SIZE);
    field.seed(0.0);

    for i in 1..=120 {
        let now = i as f32 * 0.016;
        field.step(now);
        let scene = Scene::compose(&field);
        assert_eq!(scene.targets.len(), field.targets().len());
        assert_eq!(scene.arrows.len(), field.arrows().len());
    }
}

#[test]
fn test_quiet_field_stays_empty() {
    let config = FieldConfig {
        arrow_spawn_chance: 0.0,
        target_spawn_chance: 0.0,
        max_targets: 0,
        ..FieldConfig::default()
    };
    let mut field = Field::new(config, Spawner::with_seed(1), SIZE);
    field.seed(0.0);
    for i in 1..=100 {
        field.step(i as f32 * 0.016);
    }
    assert!(field.arrows().is_empty());
    assert!(field.targets().is_empty());
    let scene = Scene::compose(&field);
    assert!(scene.targets.is_empty());
    assert!(scene.arrows.is_empty());
}
