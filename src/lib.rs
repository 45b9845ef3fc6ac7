//! # Quiver
//!
//! A decorative, continuously animated backdrop of small arrow and target
//! glyphs, rendered with wgpu behind other content.
//!
//! ## Quick Start
//!
//! ```ignore
//! use quiver::Backdrop;
//!
//! fn main() -> Result<(), quiver::BackdropError> {
//!     Backdrop::new()
//!         .with_title("quiver")
//!         .with_size(1280, 720)
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### The field
//!
//! A [`Field`] owns two bounded populations: arrows (transient projectiles
//! that cross the surface) and targets (stationary collision zones). Once per
//! frame it runs spawn trials, integrates arrow positions by a clamped time
//! delta, retires expired and out-of-bounds entities, and resolves
//! arrow-target collisions. A hit removes both participants.
//!
//! ### Scenes
//!
//! [`Scene::compose`] snapshots the field into GPU instance lists without
//! touching simulation state. The renderer paints background, then targets,
//! then arrows, in that fixed order.
//!
//! ### Randomness
//!
//! Spawning flows through a seedable [`Spawner`]; production runs use OS
//! entropy, tests pin a seed to replay exact spawn sequences.

mod backdrop;
pub mod config;
pub mod entity;
pub mod error;
mod field;
mod gpu;
mod scene;
mod spawn;
pub mod time;

pub use backdrop::Backdrop;
pub use config::FieldConfig;
pub use entity::{Arrow, ArrowPhase, Target};
pub use error::{BackdropError, GpuError};
pub use field::Field;
pub use glam::Vec2;
pub use scene::{ArrowInstance, Scene, TargetInstance};
pub use spawn::Spawner;
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use quiver::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backdrop::Backdrop;
    pub use crate::config::FieldConfig;
    pub use crate::entity::{Arrow, ArrowPhase, Target};
    pub use crate::error::{BackdropError, GpuError};
    pub use crate::field::Field;
    pub use crate::scene::{ArrowInstance, Scene, TargetInstance};
    pub use crate::spawn::Spawner;
    pub use crate::time::FrameClock;
    pub use crate::Vec2;
}
