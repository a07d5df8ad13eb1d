//! Particle records and the object definitions they are built from.
//!
//! A [`Particle`] is pure simulation state. The rendering side owns meshes
//! and materials; it finds them through [`Particle::definition`] (which
//! [`ObjectDefinition`] spawned the particle) and the optional
//! [`MeshHandle`] slot it may fill in after a build.

use crate::{Vec2, Vec3};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Mesh shape used to draw an ornament.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrnamentShape {
    #[default]
    Sphere,
    Cube,
    Octahedron,
    Icosahedron,
    Torus,
    Star,
}

/// Material parameters for one kind of ornament.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Appearance {
    /// Base color (RGB, 0.0-1.0).
    pub color: Vec3,
    /// Uniform mesh scale.
    pub scale: f32,
    pub metalness: f32,
    pub roughness: f32,
    /// Emissive intensity (0 = none).
    pub emissive: f32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: Vec3::new(0.85, 0.1, 0.1),
            scale: 0.2,
            metalness: 0.6,
            roughness: 0.3,
            emissive: 0.0,
        }
    }
}

impl Appearance {
    /// Appearance with the given color and scale, defaults elsewhere.
    pub fn tinted(color: Vec3, scale: f32) -> Self {
        Self {
            color,
            scale,
            ..Default::default()
        }
    }
}

/// One group of identical ornaments in a pool.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ObjectDefinition {
    pub name: String,
    pub shape: OrnamentShape,
    /// How many particles this definition creates.
    pub count: u32,
    #[serde(default)]
    pub appearance: Appearance,
}

impl ObjectDefinition {
    pub fn new(name: impl Into<String>, shape: OrnamentShape, count: u32) -> Self {
        Self {
            name: name.into(),
            shape,
            count,
            appearance: Appearance::default(),
        }
    }

    /// Replace the appearance.
    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    /// The mixed ornament set used for the tree when nothing else is configured.
    pub fn default_tree() -> Vec<Self> {
        vec![
            Self::new("red baubles", OrnamentShape::Sphere, 120)
                .with_appearance(Appearance::tinted(Vec3::new(0.8, 0.08, 0.1), 0.22)),
            Self::new("gold baubles", OrnamentShape::Sphere, 80)
                .with_appearance(Appearance::tinted(Vec3::new(0.95, 0.75, 0.25), 0.18)),
            Self::new("green cubes", OrnamentShape::Cube, 60)
                .with_appearance(Appearance::tinted(Vec3::new(0.1, 0.55, 0.2), 0.16)),
            Self::new("silver gems", OrnamentShape::Octahedron, 50)
                .with_appearance(Appearance::tinted(Vec3::new(0.85, 0.85, 0.9), 0.15)),
            Self::new("ice crystals", OrnamentShape::Icosahedron, 40)
                .with_appearance(Appearance::tinted(Vec3::new(0.6, 0.8, 1.0), 0.14)),
            Self::new("rings", OrnamentShape::Torus, 30)
                .with_appearance(Appearance::tinted(Vec3::new(0.9, 0.4, 0.6), 0.15)),
            Self::new("stars", OrnamentShape::Star, 20).with_appearance(Appearance {
                emissive: 0.8,
                ..Appearance::tinted(Vec3::new(1.0, 0.9, 0.4), 0.2)
            }),
        ]
    }

    /// Total particle count across a set of definitions.
    pub fn total_count(definitions: &[Self]) -> usize {
        definitions.iter().map(|d| d.count as usize).sum()
    }
}

/// Opaque handle to a renderer-owned mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// One animated ornament.
#[derive(Clone, Debug)]
pub struct Particle {
    resting_position: Vec3,
    explosion_target: Vec3,
    rotation_speed: Vec3,
    parallax_sensitivity: f32,
    definition: usize,
    /// Current position, updated every frame.
    pub position: Vec3,
    /// Current Euler rotation (radians), updated every frame.
    pub rotation: Vec3,
    /// Individual drift under exploded-state parallax.
    pub parallax_shift: Vec2,
    /// Renderer-owned mesh, if the renderer has attached one.
    pub mesh: Option<MeshHandle>,
}

impl Particle {
    /// Create a particle at rest on its cone position.
    pub fn new(
        resting_position: Vec3,
        explosion_target: Vec3,
        rotation_speed: Vec3,
        parallax_sensitivity: f32,
        definition: usize,
    ) -> Self {
        Self {
            resting_position,
            explosion_target,
            rotation_speed,
            parallax_sensitivity,
            definition,
            position: resting_position,
            rotation: Vec3::ZERO,
            parallax_shift: Vec2::ZERO,
            mesh: None,
        }
    }

    /// Position on the idle cone formation.
    #[inline]
    pub fn resting_position(&self) -> Vec3 {
        self.resting_position
    }

    /// Destination in the exploded shell formation.
    #[inline]
    pub fn explosion_target(&self) -> Vec3 {
        self.explosion_target
    }

    /// Fixed angular velocity (radians per frame, per axis).
    #[inline]
    pub fn rotation_speed(&self) -> Vec3 {
        self.rotation_speed
    }

    /// How strongly this particle follows exploded parallax.
    #[inline]
    pub fn parallax_sensitivity(&self) -> f32 {
        self.parallax_sensitivity
    }

    /// Index of the [`ObjectDefinition`] that created this particle.
    #[inline]
    pub fn definition(&self) -> usize {
        self.definition
    }

    /// Distance from the current position to the resting position.
    #[inline]
    pub fn distance_to_rest(&self) -> f32 {
        self.position.distance(self.resting_position)
    }

    /// GPU-ready snapshot of this particle.
    pub fn to_instance(&self, scale: f32) -> ParticleInstance {
        ParticleInstance {
            position: self.position.to_array(),
            scale,
            rotation: self.rotation.to_array(),
            definition: self.definition as u32,
        }
    }
}

/// Per-instance data handed to the renderer each frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, PartialEq)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub rotation: [f32; 3],
    pub definition: u32,
}
