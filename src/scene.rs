//! Scene composition: field state to GPU instance lists.
//!
//! [`Scene::compose`] is a pure function of the current field; it takes a
//! shared reference and cannot mutate simulation state. Draw order is encoded
//! structurally: the renderer paints background, then every target, then
//! every arrow, so arrows always land on top.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::field::Field;

/// Per-instance data for one target glyph.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct TargetInstance {
    /// Center in logical surface coordinates.
    pub position: [f32; 2],
    /// Ring radius in logical pixels.
    pub radius: f32,
    /// Cosmetic glow strength.
    pub glow: f32,
}

/// Per-instance data for one arrow glyph.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ArrowInstance {
    /// Shaft origin in logical surface coordinates.
    pub position: [f32; 2],
    /// Unit heading derived from velocity.
    pub direction: [f32; 2],
    /// Shaft length in logical pixels.
    pub length: f32,
    /// Stroke thickness in logical pixels.
    pub thickness: f32,
}

/// One frame's worth of glyph instances, in draw order.
#[derive(Debug, Default)]
pub struct Scene {
    /// Targets, drawn under the arrows.
    pub targets: Vec<TargetInstance>,
    /// Arrows, drawn last.
    pub arrows: Vec<ArrowInstance>,
}

impl Scene {
    /// Snapshot the field into instance lists.
    ///
    /// Arrows in their fade window are composed at full strength; the fade
    /// window is a lifecycle grace period, not a visual ramp.
    pub fn compose(field: &Field) -> Self {
        let targets = field
            .targets()
            .iter()
            .map(|t| TargetInstance {
                position: t.position.to_array(),
                radius: t.radius,
                glow: t.glow,
            })
            .collect();

        let arrows = field
            .arrows()
            .iter()
            .map(|a| {
                let direction = if a.velocity.length_squared() > f32::EPSILON {
                    a.velocity.normalize()
                } else {
                    Vec2::X
                };
                ArrowInstance {
                    position: a.position.to_array(),
                    direction: direction.to_array(),
                    length: a.length,
                    thickness: a.thickness,
                }
            })
            .collect();

        Self { targets, arrows }
    }
}
