//! The idle / exploding / returning cycle.
//!
//! [`Animator`] owns the animation state, the auto-return deadline and the
//! smoothed group transform. Each frame it walks every particle once:
//!
//! | State | Particle motion | Leaves when |
//! |-------|-----------------|-------------|
//! | [`AnimationState::Idle`] | Bob around the resting position | A trigger arrives |
//! | [`AnimationState::Exploding`] | Ease toward explosion target + parallax shift | Hold deadline expires, or a trigger with reassemble-on-click |
//! | [`AnimationState::Returning`] | Lerp back to rest | Every particle is within the return threshold, or a new trigger |
//!
//! Side effects for collaborators (camera, showcase) are reported as
//! [`SceneEvent`]s pushed onto a caller-provided buffer.

use crate::camera::ViewMode;
use crate::config::SceneConfig;
use crate::parallax::ParallaxTargets;
use crate::particle::Particle;
use crate::pool::PoolSet;
use crate::timer::Deadline;
use crate::{Vec2, Vec3};
use glam::{EulerRot, Mat4, Quat};
use std::fmt;
use std::time::Duration;

/// Phase step between neighbouring particles so they don't bob in unison.
const INDEX_PHASE: f32 = 0.1;

/// Animation state of the whole display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationState {
    #[default]
    Idle,
    Exploding,
    Returning,
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationState::Idle => write!(f, "idle"),
            AnimationState::Exploding => write!(f, "exploding"),
            AnimationState::Returning => write!(f, "returning"),
        }
    }
}

/// Something collaborators need to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneEvent {
    StateChanged {
        from: AnimationState,
        to: AnimationState,
    },
    /// The renderer should switch cameras.
    ViewChanged(ViewMode),
    /// An explosion started: advance the showcase image and schedule its reveal.
    ShowcaseExplode,
    /// The explosion ended: hide the showcase.
    ShowcaseHide,
    /// The delayed showcase reveal fired.
    ShowcaseRevealed,
}

/// Result of [`Animator::trigger_explosion`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Moved to [`AnimationState::Exploding`].
    Exploded,
    /// Was exploding with reassemble-on-click; now returning.
    Reassembling,
    /// Already exploding; nothing changed.
    Ignored,
}

/// Smoothed rotation/translation applied to the whole particle group.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroupTransform {
    /// Rotation about X and Y, radians.
    pub rotation: Vec2,
    pub position: Vec2,
}

impl GroupTransform {
    /// Ease toward `target` by `smoothing` (0 = frozen, 1 = snap).
    pub fn approach(&mut self, target: ParallaxTargets, smoothing: f32) {
        self.rotation += (target.rotation - self.rotation) * smoothing;
        self.position += (target.position - self.position) * smoothing;
    }

    /// Model matrix for the group.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(
            Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0),
            Vec3::new(self.position.x, self.position.y, 0.0),
        )
    }
}

/// What the state machine needs from the current frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    /// Simulation clock.
    pub now: Duration,
    /// Group parallax targets computed this frame.
    pub targets: ParallaxTargets,
    /// Normalized parallax input (pointer or tilt).
    pub pointer: Vec2,
}

/// The explosion/reassembly state machine.
#[derive(Clone, Debug, Default)]
pub struct Animator {
    state: AnimationState,
    hold: Deadline,
    group: GroupTransform,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// The pending auto-return deadline.
    #[inline]
    pub fn hold_deadline(&self) -> &Deadline {
        &self.hold
    }

    #[inline]
    pub fn group(&self) -> GroupTransform {
        self.group
    }

    /// Handle a click/tap.
    ///
    /// From idle or returning this explodes, zeroes every individual
    /// parallax shift and arms the hold deadline (replacing any stale one).
    /// While exploding it forces a return when reassemble-on-click is set,
    /// and is ignored otherwise.
    pub fn trigger_explosion(
        &mut self,
        now: Duration,
        pools: &mut PoolSet,
        config: &SceneConfig,
        events: &mut Vec<SceneEvent>,
    ) -> TriggerOutcome {
        match self.state {
            AnimationState::Exploding => {
                if config.animation.reassemble_on_click {
                    self.begin_return(events);
                    TriggerOutcome::Reassembling
                } else {
                    tracing::debug!("explosion trigger ignored: already exploding");
                    TriggerOutcome::Ignored
                }
            }
            AnimationState::Idle | AnimationState::Returning => {
                if self.hold.cancel() {
                    tracing::debug!("cancelled stale hold deadline");
                }
                let from = self.state;
                self.state = AnimationState::Exploding;
                pools.reset_parallax_shifts();
                self.hold.arm(now, config.hold_duration());

                tracing::info!(%from, particles = pools.len(), "explode");
                events.push(SceneEvent::StateChanged {
                    from,
                    to: AnimationState::Exploding,
                });
                events.push(SceneEvent::ShowcaseExplode);
                TriggerOutcome::Exploded
            }
        }
    }

    fn begin_return(&mut self, events: &mut Vec<SceneEvent>) {
        self.hold.cancel();
        let from = self.state;
        self.state = AnimationState::Returning;
        tracing::info!(%from, "reassemble");
        events.push(SceneEvent::StateChanged {
            from,
            to: AnimationState::Returning,
        });
        events.push(SceneEvent::ShowcaseHide);
    }

    /// Advance one frame.
    pub fn update(
        &mut self,
        frame: &FrameInput,
        pools: &mut PoolSet,
        config: &SceneConfig,
        events: &mut Vec<SceneEvent>,
    ) {
        if self.hold.poll(frame.now) && self.state == AnimationState::Exploding {
            self.begin_return(events);
        }

        let time = frame.now.as_secs_f32();
        self.step_particles(pools.tree.particles_mut(), time, frame.pointer, config);
        self.step_particles(pools.test.particles_mut(), time, frame.pointer, config);

        if self.state == AnimationState::Returning
            && pools.all_within(config.animation.return_threshold)
        {
            self.state = AnimationState::Idle;
            tracing::info!("settled");
            events.push(SceneEvent::StateChanged {
                from: AnimationState::Returning,
                to: AnimationState::Idle,
            });
        }

        self.group.approach(frame.targets, config.parallax.smoothing);
    }

    fn step_particles(&self, particles: &mut [Particle], time: f32, pointer: Vec2, config: &SceneConfig) {
        let anim = &config.animation;
        let parallax = &config.parallax;

        for (i, p) in particles.iter_mut().enumerate() {
            p.rotation += p.rotation_speed();
            let phase = time * anim.float_speed + i as f32 * INDEX_PHASE;

            match self.state {
                AnimationState::Idle => {
                    p.parallax_shift *= parallax.shift_decay;
                    p.position = p.resting_position() + Vec3::new(0.0, phase.sin() * anim.float_amount, 0.0);
                }
                AnimationState::Exploding => {
                    if parallax.exploded.enabled {
                        let goal = pointer * parallax.exploded.particle_strength * p.parallax_sensitivity();
                        p.parallax_shift += (goal - p.parallax_shift) * parallax.particle_smoothing;
                    } else {
                        p.parallax_shift *= parallax.shift_decay;
                    }

                    let target = p.explosion_target() + Vec3::new(p.parallax_shift.x, p.parallax_shift.y, 0.0);
                    p.position += (target - p.position) * anim.animation_speed;

                    let drift = anim.float_amount * anim.exploded_float_scale;
                    p.position.x += (phase * 0.7).sin() * drift;
                    p.position.z += (phase * 0.5).cos() * drift;

                    p.rotation.x += anim.exploded_spin;
                    p.rotation.y += anim.exploded_spin;
                }
                AnimationState::Returning => {
                    p.parallax_shift *= parallax.shift_decay;
                    p.position = p.position.lerp(p.resting_position(), anim.animation_speed);
                }
            }
        }
    }
}
