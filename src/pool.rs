//! Particle pools.
//!
//! A [`ParticlePool`] is built in one go from a list of
//! [`ObjectDefinition`]s: explosion targets for the whole pool are drawn up
//! front and handed out by a running index in creation order, so particle
//! `i` always owns target `i`. Pools are never patched in place; a rebuild
//! builds the replacement completely and swaps it in, returning the old
//! particles so the renderer can release their meshes.
//!
//! [`PoolSet`] holds the tree pool and the test pool side by side.

use crate::config::{ExplosionCenterMode, ExplosionConfig, TreeConfig};
use crate::particle::{ObjectDefinition, Particle, ParticleInstance};
use crate::sampler::Sampler;
use crate::Vec3;

/// Range of the per-particle exploded-parallax sensitivity.
const SENSITIVITY_RANGE: (f32, f32) = (0.5, 1.5);

/// Resolved explosion shell for one build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplosionSpec {
    /// Center before the offset is applied.
    pub center: Vec3,
    pub offset: Vec3,
    pub inner_radius: f32,
    pub outer_radius: f32,
}

impl ExplosionSpec {
    /// Resolve the configured center mode against the current camera position.
    pub fn resolve(config: &ExplosionConfig, camera_position: Vec3) -> Self {
        let center = match config.center_mode {
            ExplosionCenterMode::Origin => Vec3::ZERO,
            ExplosionCenterMode::Camera => camera_position,
        };
        Self {
            center,
            offset: config.offset,
            inner_radius: config.inner_radius,
            outer_radius: config.outer_radius,
        }
    }
}

/// An index-aligned set of particles and the definitions that made them.
#[derive(Clone, Debug, Default)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    definitions: Vec<ObjectDefinition>,
}

impl ParticlePool {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a pool of `sum(definition.count)` particles.
    pub fn build(
        definitions: &[ObjectDefinition],
        tree: &TreeConfig,
        explosion: &ExplosionSpec,
        sampler: &mut Sampler,
    ) -> Self {
        let total = ObjectDefinition::total_count(definitions);
        let targets = sampler.generate_explosion_targets(
            total,
            explosion.center,
            explosion.inner_radius,
            explosion.outer_radius,
            explosion.offset,
        );

        let mut particles = Vec::with_capacity(total);
        let mut next_target = targets.into_iter();
        for (definition_index, definition) in definitions.iter().enumerate() {
            for _ in 0..definition.count {
                let Some(target) = next_target.next() else {
                    break;
                };
                let resting = sampler.sample_resting_position(tree.height, tree.radius);
                let rotation_speed = sampler.random_rotation_speed(tree.max_rotation_speed);
                let sensitivity = sampler.random_range(SENSITIVITY_RANGE.0, SENSITIVITY_RANGE.1);
                particles.push(Particle::new(
                    resting,
                    target,
                    rotation_speed,
                    sensitivity,
                    definition_index,
                ));
            }
        }

        Self {
            particles,
            definitions: definitions.to_vec(),
        }
    }

    /// Replace this pool wholesale, returning the discarded particles.
    pub fn replace(&mut self, next: ParticlePool) -> Vec<Particle> {
        let old = std::mem::replace(self, next);
        old.particles
    }

    /// Remove every particle, returning them.
    pub fn clear(&mut self) -> Vec<Particle> {
        self.replace(ParticlePool::empty())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    #[inline]
    pub fn definitions(&self) -> &[ObjectDefinition] {
        &self.definitions
    }

    /// Zero every particle's individual parallax shift.
    pub fn reset_parallax_shifts(&mut self) {
        for p in &mut self.particles {
            p.parallax_shift = crate::Vec2::ZERO;
        }
    }

    /// Whether every particle is within `threshold` of its resting position.
    pub fn all_within(&self, threshold: f32) -> bool {
        self.particles.iter().all(|p| p.distance_to_rest() <= threshold)
    }

    /// GPU instances, scaled by each particle's definition.
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.particles
            .iter()
            .map(|p| {
                let scale = self
                    .definitions
                    .get(p.definition())
                    .map(|d| d.appearance.scale)
                    .unwrap_or(1.0);
                p.to_instance(scale)
            })
            .collect()
    }
}

/// Which pool a rebuild applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolKind {
    Tree,
    Test,
}

/// The tree pool and the test pool, with the rule for which one is drawn.
#[derive(Clone, Debug)]
pub struct PoolSet {
    pub tree: ParticlePool,
    pub test: ParticlePool,
    tree_enabled: bool,
}

impl PoolSet {
    pub fn new(tree_enabled: bool) -> Self {
        Self {
            tree: ParticlePool::empty(),
            test: ParticlePool::empty(),
            tree_enabled,
        }
    }

    pub fn pool(&self, kind: PoolKind) -> &ParticlePool {
        match kind {
            PoolKind::Tree => &self.tree,
            PoolKind::Test => &self.test,
        }
    }

    pub fn pool_mut(&mut self, kind: PoolKind) -> &mut ParticlePool {
        match kind {
            PoolKind::Tree => &mut self.tree,
            PoolKind::Test => &mut self.test,
        }
    }

    pub fn set_tree_enabled(&mut self, enabled: bool) {
        self.tree_enabled = enabled;
    }

    #[inline]
    pub fn tree_enabled(&self) -> bool {
        self.tree_enabled
    }

    /// The tree is drawn only when enabled and no test content is present.
    pub fn tree_visible(&self) -> bool {
        self.tree_enabled && self.test.is_empty()
    }

    /// The test pool is drawn whenever it has particles.
    pub fn test_visible(&self) -> bool {
        !self.test.is_empty()
    }

    /// The pool the renderer should draw, if any.
    pub fn visible(&self) -> Option<&ParticlePool> {
        if self.test_visible() {
            Some(&self.test)
        } else if self.tree_visible() {
            Some(&self.tree)
        } else {
            None
        }
    }

    /// Every particle in both pools, tree first.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.tree.particles().iter().chain(self.test.particles().iter())
    }

    /// Every particle in both pools, tree first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.tree
            .particles_mut()
            .iter_mut()
            .chain(self.test.particles_mut().iter_mut())
    }

    pub fn len(&self) -> usize {
        self.tree.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty() && self.test.is_empty()
    }

    pub fn reset_parallax_shifts(&mut self) {
        self.tree.reset_parallax_shifts();
        self.test.reset_parallax_shifts();
    }

    /// Convergence barrier over both pools.
    pub fn all_within(&self, threshold: f32) -> bool {
        self.tree.all_within(threshold) && self.test.all_within(threshold)
    }
}
