//! Parallax input tracking.
//!
//! [`ParallaxTracker`] turns pointer, device-tilt and touch-drag input into
//! per-frame *targets* for the particle group's rotation and position. It
//! does not smooth its output; the animation step eases the group toward
//! these targets itself.
//!
//! # Input sources
//!
//! | Source | Feeds | Notes |
//! |--------|-------|-------|
//! | Pointer | `input()` | NDC, clamped to `[-1, 1]` |
//! | Device orientation | `input()` | Replaces the pointer once enabled and a reading arrived |
//! | Touch drag | rotation offset | Velocity based, with momentum and vertical spring-back |

use crate::animation::AnimationState;
use crate::config::{OrientationConfig, ParallaxConfig, TouchConfig};
use crate::Vec2;
use std::time::Duration;

/// Velocities below this length are treated as stopped.
const REST_EPSILON: f32 = 1e-4;

/// Rotation and position the particle group should ease toward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParallaxTargets {
    /// Rotation about X (`.x`) and Y (`.y`), radians.
    pub rotation: Vec2,
    /// Translation in X and Y.
    pub position: Vec2,
}

/// Tilt tracking with a baseline that drifts toward the live reading.
#[derive(Clone, Debug, Default)]
struct Orientation {
    baseline: Option<Vec2>,
    tilt: Vec2,
}

impl Orientation {
    fn record(&mut self, reading: Vec2, config: &OrientationConfig) {
        let baseline = match self.baseline {
            Some(baseline) => baseline + (reading - baseline) * config.recalibration_rate,
            None => {
                tracing::debug!(?reading, "orientation baseline initialized");
                reading
            }
        };
        self.baseline = Some(baseline);

        let range = if config.range_degrees.is_finite() && config.range_degrees > 0.0 {
            config.range_degrees
        } else {
            25.0
        };
        self.tilt = ((reading - baseline) / range).clamp(Vec2::NEG_ONE, Vec2::ONE);
    }
}

/// Drag-to-rotate state with momentum after release.
#[derive(Clone, Debug, Default)]
struct TouchDrag {
    active: bool,
    last: Vec2,
    /// NDC travelled since the last frame step.
    pending: Vec2,
    velocity: Vec2,
    /// Velocity left over when the current drag started.
    residual: Vec2,
    frames_into_drag: u32,
    offset: Vec2,
}

impl TouchDrag {
    fn step(&mut self, config: &TouchConfig) {
        if self.active {
            let drag_velocity = self.pending * config.sensitivity;
            self.pending = Vec2::ZERO;

            self.velocity = if self.frames_into_drag < config.blend_frames {
                let t = (self.frames_into_drag + 1) as f32 / config.blend_frames as f32;
                self.residual.lerp(drag_velocity, t)
            } else {
                drag_velocity
            };
            self.frames_into_drag += 1;
            self.offset += self.velocity;
        } else {
            self.velocity *= config.friction;
            if self.velocity.length() < REST_EPSILON {
                self.velocity = Vec2::ZERO;
            }
            self.offset += self.velocity;

            self.offset.y *= config.vertical_spring;
            if self.offset.y.abs() < REST_EPSILON {
                self.offset.y = 0.0;
            }
        }
    }
}

/// Converts raw input into parallax targets.
#[derive(Clone, Debug, Default)]
pub struct ParallaxTracker {
    pointer: Vec2,
    pointer_velocity: Vec2,
    last_moved: Option<Duration>,
    orientation: Orientation,
    touch: TouchDrag,
}

impl ParallaxTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Pointer ==========

    /// Record a pointer position in normalized device coordinates.
    pub fn pointer_moved(&mut self, ndc: Vec2, now: Duration) {
        if !ndc.is_finite() {
            return;
        }
        let ndc = ndc.clamp(Vec2::NEG_ONE, Vec2::ONE);
        self.pointer_velocity = ndc - self.pointer;
        self.pointer = ndc;
        self.last_moved = Some(now);
    }

    /// Last pointer position (NDC).
    #[inline]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Pointer movement between the last two samples.
    #[inline]
    pub fn pointer_velocity(&self) -> Vec2 {
        self.pointer_velocity
    }

    /// When the pointer last moved.
    #[inline]
    pub fn last_moved(&self) -> Option<Duration> {
        self.last_moved
    }

    // ========== Device orientation ==========

    /// Record a device-orientation reading in degrees.
    ///
    /// `beta` is front-to-back tilt, `gamma` left-to-right.
    pub fn orientation_reading(&mut self, beta: f32, gamma: f32, config: &OrientationConfig) {
        if !beta.is_finite() || !gamma.is_finite() {
            return;
        }
        self.orientation.record(Vec2::new(gamma, beta), config);
    }

    /// Recalibrated tilt, each axis in `[-1, 1]`.
    #[inline]
    pub fn tilt(&self) -> Vec2 {
        self.orientation.tilt
    }

    /// Whether tilt currently replaces the pointer.
    pub fn orientation_active(&self, config: &OrientationConfig) -> bool {
        config.enabled && self.orientation.baseline.is_some()
    }

    /// The normalized input driving parallax: tilt when active, else the pointer.
    pub fn input(&self, config: &ParallaxConfig) -> Vec2 {
        if self.orientation_active(&config.orientation) {
            self.orientation.tilt
        } else {
            self.pointer
        }
    }

    // ========== Touch ==========

    pub fn touch_start(&mut self, ndc: Vec2) {
        self.touch.active = true;
        self.touch.last = ndc;
        self.touch.pending = Vec2::ZERO;
        self.touch.residual = self.touch.velocity;
        self.touch.frames_into_drag = 0;
    }

    pub fn touch_move(&mut self, ndc: Vec2) {
        if !self.touch.active || !ndc.is_finite() {
            return;
        }
        self.touch.pending += ndc - self.touch.last;
        self.touch.last = ndc;
    }

    pub fn touch_end(&mut self) {
        self.touch.active = false;
    }

    #[inline]
    pub fn touching(&self) -> bool {
        self.touch.active
    }

    /// Accumulated drag offset (screen axes).
    #[inline]
    pub fn touch_offset(&self) -> Vec2 {
        self.touch.offset
    }

    /// Current drag or momentum velocity.
    #[inline]
    pub fn touch_velocity(&self) -> Vec2 {
        self.touch.velocity
    }

    /// Advance touch momentum by one frame.
    pub fn step(&mut self, config: &TouchConfig) {
        self.touch.step(config);
    }

    // ========== Targets ==========

    /// Targets for the group transform in `state`.
    ///
    /// Returns zeros when parallax is disabled for the state's profile.
    /// Only the exploding state uses the exploded profile.
    pub fn compute_targets(&self, state: AnimationState, config: &ParallaxConfig) -> ParallaxTargets {
        let input = self.input(config);
        let (strength_x, strength_y, position_strength) = match state {
            AnimationState::Exploding => {
                if !config.exploded.enabled {
                    return ParallaxTargets::default();
                }
                (config.exploded.strength_x, config.exploded.strength_y, 0.0)
            }
            AnimationState::Idle | AnimationState::Returning => {
                if !config.idle.enabled {
                    return ParallaxTargets::default();
                }
                (
                    config.idle.strength_x,
                    config.idle.strength_y,
                    config.idle.position_strength,
                )
            }
        };

        // Vertical drag tilts about X, horizontal drag spins about Y.
        let drag = Vec2::new(self.touch.offset.y, self.touch.offset.x);
        ParallaxTargets {
            rotation: Vec2::new(input.y * strength_x, input.x * strength_y) + drag,
            position: input * position_strength,
        }
    }
}
