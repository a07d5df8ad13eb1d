//! The simulation context.
//!
//! [`Simulation`] owns everything that changes over time: the configuration,
//! both particle pools, the parallax tracker, the animation state machine,
//! the showcase controller and the camera rig. The host calls entry points
//! on it (input, triggers, rebuilds) and then [`Simulation::frame`] once per
//! displayed frame.
//!
//! ```ignore
//! use ornament_burst::prelude::*;
//!
//! let mut sim = Simulation::new(SceneConfig::default())?;
//! sim.pointer_moved(Vec2::new(0.2, -0.1), now);
//! sim.trigger_explosion(now);
//! let out = sim.frame(now);
//! upload(sim.instances(), out.group.matrix());
//! ```

use crate::animation::{AnimationState, Animator, FrameInput, GroupTransform, SceneEvent, TriggerOutcome};
use crate::camera::{CameraRig, ViewMode};
use crate::config::SceneConfig;
use crate::error::{ConfigError, SimulationError};
use crate::parallax::ParallaxTracker;
use crate::particle::{Particle, ParticleInstance};
use crate::pool::{ExplosionSpec, ParticlePool, PoolKind, PoolSet};
use crate::sampler::Sampler;
use crate::showcase::Showcase;
use crate::Vec2;
use std::time::Duration;

/// What one frame produced, for the rendering collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutput {
    pub state: AnimationState,
    /// Everything that happened since the previous frame, in order.
    pub events: Vec<SceneEvent>,
    pub group: GroupTransform,
    pub showcase_visible: bool,
    pub view: ViewMode,
}

/// Explicit context for the ornament display.
#[derive(Debug)]
pub struct Simulation {
    config: SceneConfig,
    sampler: Sampler,
    pools: PoolSet,
    tracker: ParallaxTracker,
    animator: Animator,
    showcase: Showcase,
    camera: CameraRig,
    /// Events raised since the last frame was reported.
    events: Vec<SceneEvent>,
}

impl Simulation {
    /// Validate `config` and build both pools with a clock-seeded sampler.
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        Self::with_sampler(config, Sampler::new())
    }

    /// Like [`new`](Self::new) but with reproducible sampling.
    pub fn with_seed(config: SceneConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_sampler(config, Sampler::from_seed(seed))
    }

    fn with_sampler(config: SceneConfig, sampler: Sampler) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut sim = Self {
            camera: CameraRig::new(&config.camera),
            pools: PoolSet::new(config.tree.visible),
            showcase: Showcase::new(0),
            tracker: ParallaxTracker::new(),
            animator: Animator::new(),
            events: Vec::new(),
            sampler,
            config,
        };
        sim.rebuild(PoolKind::Tree);
        sim.rebuild(PoolKind::Test);
        Ok(sim)
    }

    /// Open a window and drive the simulation until it closes.
    pub fn run(self) -> Result<(), SimulationError> {
        crate::window::run(self)
    }

    // ========== Pools ==========

    /// Rebuild one pool from the current config, returning the discarded particles.
    ///
    /// The explosion center is resolved once for the whole pool. The new pool
    /// replaces the old one before this returns, so the next frame never sees
    /// a mixed set.
    pub fn rebuild(&mut self, kind: PoolKind) -> Vec<Particle> {
        let spec = ExplosionSpec::resolve(&self.config.explosion, self.camera.position());
        let definitions = match kind {
            PoolKind::Tree => &self.config.tree_objects,
            PoolKind::Test => &self.config.test_objects,
        };
        let next = ParticlePool::build(definitions, &self.config.tree, &spec, &mut self.sampler);
        let count = next.len();
        let old = self.pools.pool_mut(kind).replace(next);
        self.showcase.set_position(spec.center + spec.offset);

        tracing::info!(
            pool = ?kind,
            particles = count,
            discarded = old.len(),
            center = ?spec.center,
            "rebuilt pool"
        );
        old
    }

    /// Swap in a new configuration.
    ///
    /// Pools are rebuilt only when geometry, explosion distribution or
    /// object definitions changed; every other tunable takes effect on the
    /// next frame. Returns the particles discarded by any rebuild.
    pub fn apply_config(&mut self, config: SceneConfig) -> Result<Vec<Particle>, ConfigError> {
        config.validate()?;
        let rebuild = self.config.needs_rebuild(&config);

        self.camera.configure(&config.camera);
        self.pools.set_tree_enabled(config.tree.visible);
        self.config = config;

        if let Some(view) = self.camera.select(self.animator.state()) {
            self.events.push(SceneEvent::ViewChanged(view));
        }

        let mut discarded = Vec::new();
        if rebuild {
            discarded.extend(self.rebuild(PoolKind::Tree));
            discarded.extend(self.rebuild(PoolKind::Test));
        } else {
            tracing::debug!("config applied without rebuild");
        }
        Ok(discarded)
    }

    pub fn set_tree_visible(&mut self, visible: bool) {
        self.config.tree.visible = visible;
        self.pools.set_tree_enabled(visible);
        tracing::info!(visible, "tree visibility");
    }

    pub fn toggle_tree_visible(&mut self) {
        self.set_tree_visible(!self.config.tree.visible);
    }

    /// Drop the test ornaments so the tree shows again.
    pub fn clear_test(&mut self) -> Vec<Particle> {
        self.config.test_objects.clear();
        let old = self.pools.test.clear();
        tracing::info!(discarded = old.len(), "cleared test pool");
        old
    }

    // ========== Input ==========

    /// Pointer position in normalized device coordinates.
    pub fn pointer_moved(&mut self, ndc: Vec2, now: Duration) {
        self.tracker.pointer_moved(ndc, now);
    }

    pub fn touch_start(&mut self, ndc: Vec2) {
        self.tracker.touch_start(ndc);
    }

    pub fn touch_move(&mut self, ndc: Vec2) {
        self.tracker.touch_move(ndc);
    }

    pub fn touch_end(&mut self) {
        self.tracker.touch_end();
    }

    /// Device-orientation reading in degrees.
    pub fn orientation_reading(&mut self, beta: f32, gamma: f32) {
        self.tracker
            .orientation_reading(beta, gamma, &self.config.parallax.orientation);
    }

    pub fn set_orientation_enabled(&mut self, enabled: bool) {
        self.config.parallax.orientation.enabled = enabled;
        tracing::info!(enabled, "device orientation");
    }

    /// Report how many gallery images the showcase can cycle through.
    pub fn set_image_count(&mut self, count: usize) {
        self.showcase.set_image_count(count);
    }

    /// Explosion trigger from a click, tap or key.
    pub fn trigger_explosion(&mut self, now: Duration) -> TriggerOutcome {
        let start = self.events.len();
        let outcome = self
            .animator
            .trigger_explosion(now, &mut self.pools, &self.config, &mut self.events);
        self.dispatch(start, now);
        outcome
    }

    // ========== Frame ==========

    /// Advance one frame.
    ///
    /// Parallax targets are computed from this frame's input before the
    /// state machine consumes them.
    pub fn frame(&mut self, now: Duration) -> FrameOutput {
        self.tracker.step(&self.config.parallax.touch);
        let targets = self
            .tracker
            .compute_targets(self.animator.state(), &self.config.parallax);
        let pointer = self.tracker.input(&self.config.parallax);

        let start = self.events.len();
        let input = FrameInput { now, targets, pointer };
        self.animator
            .update(&input, &mut self.pools, &self.config, &mut self.events);
        self.dispatch(start, now);

        if self
            .showcase
            .update(now, self.camera.position(), pointer, &self.config.showcase)
        {
            tracing::info!(image = ?self.showcase.current_image(), "showcase revealed");
            self.events.push(SceneEvent::ShowcaseRevealed);
        }

        let group = self.animator.group();
        tracing::trace!(
            state = %self.animator.state(),
            rotation = ?group.rotation,
            position = ?group.position,
            "frame"
        );

        FrameOutput {
            state: self.animator.state(),
            events: std::mem::take(&mut self.events),
            group,
            showcase_visible: self.showcase.visible(),
            view: self.camera.active(),
        }
    }

    /// React to events raised from `start` onward.
    fn dispatch(&mut self, start: usize, now: Duration) {
        let mut i = start;
        while i < self.events.len() {
            let event = self.events[i];
            match event {
                SceneEvent::StateChanged { to, .. } => {
                    if let Some(view) = self.camera.select(to) {
                        tracing::debug!(?view, "camera switched");
                        self.events.push(SceneEvent::ViewChanged(view));
                    }
                }
                SceneEvent::ShowcaseExplode => self.showcase.on_explode(now, &self.config.showcase),
                SceneEvent::ShowcaseHide => {
                    if self.showcase.hide() {
                        tracing::debug!("showcase hidden");
                    }
                }
                SceneEvent::ViewChanged(_) | SceneEvent::ShowcaseRevealed => {}
            }
            i += 1;
        }
    }

    // ========== Accessors ==========

    /// Instances for the pool that should be drawn (test over tree).
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.pools.visible().map(ParticlePool::instances).unwrap_or_default()
    }

    #[inline]
    pub fn state(&self) -> AnimationState {
        self.animator.state()
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[inline]
    pub fn pools(&self) -> &PoolSet {
        &self.pools
    }

    /// Mutable pool access for renderers that attach mesh handles.
    #[inline]
    pub fn pools_mut(&mut self) -> &mut PoolSet {
        &mut self.pools
    }

    #[inline]
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    #[inline]
    pub fn tracker(&self) -> &ParallaxTracker {
        &self.tracker
    }

    #[inline]
    pub fn showcase(&self) -> &Showcase {
        &self.showcase
    }

    #[inline]
    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExplosionCenterMode;
    use crate::particle::{ObjectDefinition, OrnamentShape};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn small_config() -> SceneConfig {
        SceneConfig {
            tree_objects: vec![ObjectDefinition::new("ball", OrnamentShape::Sphere, 40)],
            ..Default::default()
        }
    }

    #[test]
    fn test_new_builds_tree_pool() {
        let sim = Simulation::with_seed(small_config(), 1).unwrap();
        assert_eq!(sim.pools().tree.len(), 40);
        assert!(sim.pools().test.is_empty());
        assert_eq!(sim.instances().len(), 40);
        assert_eq!(sim.state(), AnimationState::Idle);
        assert_eq!(sim.camera().active(), ViewMode::Isometric);
    }

    #[test]
    fn test_new_rejects_invalid_geometry() {
        let mut config = small_config();
        config.tree.height = f32::NAN;
        assert!(matches!(
            Simulation::with_seed(config, 1),
            Err(ConfigError::InvalidGeometry { field: "tree.height", .. })
        ));
    }

    #[test]
    fn test_trigger_switches_camera_and_schedules_showcase() {
        let mut sim = Simulation::with_seed(small_config(), 2).unwrap();
        sim.set_image_count(3);
        assert_eq!(sim.trigger_explosion(ms(0)), TriggerOutcome::Exploded);
        assert_eq!(sim.camera().active(), ViewMode::Perspective);
        assert!(sim.showcase().reveal_deadline().is_armed());
        assert_eq!(sim.showcase().current_image(), Some(0));

        let out = sim.frame(ms(16));
        assert!(out.events.contains(&SceneEvent::ViewChanged(ViewMode::Perspective)));
        assert!(!out.showcase_visible);

        let out = sim.frame(ms(800));
        assert_eq!(out.events, vec![SceneEvent::ShowcaseRevealed]);
        assert!(out.showcase_visible);
    }

    #[test]
    fn test_auto_return_hides_showcase_and_restores_view() {
        let mut sim = Simulation::with_seed(small_config(), 3).unwrap();
        sim.trigger_explosion(ms(0));
        sim.frame(ms(900));
        assert!(sim.showcase().visible());

        let out = sim.frame(ms(5000));
        assert_eq!(out.state, AnimationState::Returning);
        assert!(!out.showcase_visible);
        assert_eq!(out.view, ViewMode::Isometric);
        assert!(out.events.contains(&SceneEvent::ShowcaseHide));
    }

    #[test]
    fn test_forced_return_cancels_pending_reveal() {
        let mut sim = Simulation::with_seed(small_config(), 4).unwrap();
        sim.trigger_explosion(ms(0));
        assert_eq!(sim.trigger_explosion(ms(100)), TriggerOutcome::Reassembling);
        let out = sim.frame(ms(2_000));
        assert!(!out.showcase_visible);
        assert!(!out.events.contains(&SceneEvent::ShowcaseRevealed));
    }

    #[test]
    fn test_test_pool_takes_precedence() {
        let mut config = small_config();
        config.test_objects = vec![ObjectDefinition::new("preview", OrnamentShape::Cube, 5)];
        let mut sim = Simulation::with_seed(config, 5).unwrap();
        assert_eq!(sim.instances().len(), 5);

        let old = sim.clear_test();
        assert_eq!(old.len(), 5);
        assert_eq!(sim.instances().len(), 40);

        sim.set_tree_visible(false);
        assert!(sim.instances().is_empty());
    }

    #[test]
    fn test_apply_config_rebuilds_only_when_needed() {
        let mut sim = Simulation::with_seed(small_config(), 6).unwrap();
        let target = sim.pools().tree.particles()[0].explosion_target();

        let mut tweak = sim.config().clone();
        tweak.animation.float_amount = 0.5;
        assert!(sim.apply_config(tweak).unwrap().is_empty());
        assert_eq!(sim.pools().tree.particles()[0].explosion_target(), target);

        let mut wider = sim.config().clone();
        wider.explosion.outer_radius = 20.0;
        let discarded = sim.apply_config(wider).unwrap();
        assert_eq!(discarded.len(), 40);
        assert_ne!(sim.pools().tree.particles()[0].explosion_target(), target);

        let mut broken = sim.config().clone();
        broken.explosion.inner_radius = 50.0;
        assert!(sim.apply_config(broken).is_err());
        assert_eq!(sim.config().explosion.outer_radius, 20.0);
    }

    #[test]
    fn test_camera_center_mode_uses_camera_position() {
        let mut config = small_config();
        config.explosion.center_mode = ExplosionCenterMode::Camera;
        let sim = Simulation::with_seed(config, 7).unwrap();
        let center = sim.camera().position();
        for p in sim.pools().tree.particles() {
            let d = p.explosion_target().distance(center);
            assert!(d >= 6.0 - 1e-3 && d <= 12.0 + 1e-3);
        }
    }

    #[test]
    fn test_frame_uses_this_frames_pointer() {
        let mut sim = Simulation::with_seed(small_config(), 8).unwrap();
        sim.pointer_moved(Vec2::new(1.0, 0.0), ms(0));
        let out = sim.frame(ms(0));
        // Idle profile: rotation.y = input.x * 0.1, smoothed once by 0.05.
        assert!((out.group.rotation.y - 0.1 * 0.05).abs() < 1e-6);
    }
}
