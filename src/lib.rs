//! # Ornament Burst
//!
//! The motion core of an interactive ornament display: a cone of ornaments
//! that floats gently, bursts into a spherical cloud when clicked, and
//! reassembles on its own.
//!
//! The crate does the simulation only. A rendering collaborator consumes
//! [`ParticleInstance`]s and the group transform each frame and draws them
//! however it likes.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ornament_burst::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     let config = SceneConfig::load("scene.json").unwrap_or_default();
//!     Simulation::new(config)?.run()
//! }
//! ```
//!
//! Or drive it yourself:
//!
//! ```ignore
//! let mut sim = Simulation::new(SceneConfig::default())?;
//! let mut clock = FrameClock::new();
//! loop {
//!     let now = clock.tick();
//!     sim.pointer_moved(cursor_ndc, now);
//!     if clicked {
//!         sim.trigger_explosion(now);
//!     }
//!     let out = sim.frame(now);
//!     renderer.draw(&sim.instances(), out.group.matrix(), out.view);
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### States
//!
//! | State | Motion | Leaves when |
//! |-------|--------|-------------|
//! | Idle | Bob around the cone position | Click/tap |
//! | Exploding | Ease to a point in a hollow sphere, drift with the pointer | Hold time elapses, or click with reassemble-on-click |
//! | Returning | Lerp back to the cone | Every ornament is home, or click |
//!
//! ### Pools
//!
//! Two pools live side by side: the tree and a test pool for previewing
//! ornament definitions. The tree is drawn only when enabled and the test
//! pool is empty. Pools are rebuilt wholesale from [`ObjectDefinition`]s;
//! see [`pool`].
//!
//! ### Parallax
//!
//! The pointer (or device tilt, or a touch drag) rotates the whole group a
//! little. While exploded each ornament also drifts on its own, scaled by a
//! per-ornament sensitivity. See [`parallax`].
//!
//! ## Configuration
//!
//! Everything tunable lives in [`SceneConfig`], which round-trips through
//! JSON. Missing fields take their defaults.

pub mod animation;
pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod parallax;
pub mod particle;
pub mod pool;
pub mod sampler;
pub mod showcase;
mod simulation;
pub mod time;
pub mod timer;
mod window;

pub use animation::{AnimationState, Animator, GroupTransform, SceneEvent, TriggerOutcome};
pub use bytemuck;
pub use camera::{CameraRig, ViewMode};
pub use config::{FrameMode, SceneConfig};
pub use error::{ConfigError, SimulationError};
pub use glam::{Mat4, Vec2, Vec3};
pub use parallax::{ParallaxTargets, ParallaxTracker};
pub use particle::{Appearance, MeshHandle, ObjectDefinition, OrnamentShape, Particle, ParticleInstance};
pub use pool::{ParticlePool, PoolKind, PoolSet};
pub use sampler::Sampler;
pub use showcase::Showcase;
pub use simulation::{FrameOutput, Simulation};
pub use timer::Deadline;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use ornament_burst::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animation::{AnimationState, GroupTransform, SceneEvent, TriggerOutcome};
    pub use crate::camera::ViewMode;
    pub use crate::config::{FrameMode, SceneConfig};
    pub use crate::error::{ConfigError, SimulationError};
    pub use crate::input::{Input, KeyCode, MouseButton};
    pub use crate::particle::{ObjectDefinition, OrnamentShape, ParticleInstance};
    pub use crate::pool::PoolKind;
    pub use crate::simulation::{FrameOutput, Simulation};
    pub use crate::time::FrameClock;
    pub use crate::{Vec2, Vec3};
}
