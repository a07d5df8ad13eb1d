//! Scene configuration.
//!
//! Every tunable the display uses lives in [`SceneConfig`]. The struct
//! round-trips through JSON; missing fields fall back to their defaults so a
//! config file only needs to name what it changes:
//!
//! ```json
//! {
//!   "tree": { "height": 10.0 },
//!   "animation": { "hold_duration_ms": 3000 }
//! }
//! ```

use crate::camera::ViewMode;
use crate::error::ConfigError;
use crate::particle::ObjectDefinition;
use crate::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Cone formation the tree ornaments rest on.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TreeConfig {
    pub height: f32,
    /// Base radius.
    pub radius: f32,
    /// Whether the tree pool is drawn (the test pool still takes precedence).
    pub visible: bool,
    /// Maximum per-axis idle spin, radians per frame.
    pub max_rotation_speed: f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            height: 8.0,
            radius: 3.0,
            visible: true,
            max_rotation_speed: 0.02,
        }
    }
}

/// Timing and motion of the idle/explode/return cycle.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Angular frequency of the idle bobbing.
    pub float_speed: f32,
    /// Amplitude of the idle bobbing.
    pub float_amount: f32,
    /// Per-frame interpolation factor toward the current target.
    pub animation_speed: f32,
    /// How long the explosion holds before returning on its own.
    pub hold_duration_ms: u64,
    /// Clicking while exploded forces an immediate return.
    pub reassemble_on_click: bool,
    /// Extra per-frame spin added while exploding.
    pub exploded_spin: f32,
    /// Scale of the x/z drift layered on the exploded motion.
    pub exploded_float_scale: f32,
    /// Distance to rest at which a returning particle counts as settled.
    pub return_threshold: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            float_speed: 1.0,
            float_amount: 0.1,
            animation_speed: 0.05,
            hold_duration_ms: 5000,
            reassemble_on_click: true,
            exploded_spin: 0.01,
            exploded_float_scale: 0.02,
            return_threshold: 0.1,
        }
    }
}

/// Where the explosion shell is centered.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExplosionCenterMode {
    /// World origin.
    #[default]
    Origin,
    /// The camera's position at the time the pool is built.
    Camera,
}

/// Shape of the exploded formation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplosionConfig {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub center_mode: ExplosionCenterMode,
    /// Added to the resolved center.
    pub offset: Vec3,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            inner_radius: 6.0,
            outer_radius: 12.0,
            center_mode: ExplosionCenterMode::Origin,
            offset: Vec3::ZERO,
        }
    }
}

/// Parallax profile while idle (and while returning).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IdleParallaxConfig {
    pub enabled: bool,
    /// Group rotation about X per unit of vertical input.
    pub strength_x: f32,
    /// Group rotation about Y per unit of horizontal input.
    pub strength_y: f32,
    /// Group translation per unit of input.
    pub position_strength: f32,
}

impl Default for IdleParallaxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strength_x: 0.1,
            strength_y: 0.1,
            position_strength: 0.3,
        }
    }
}

/// Parallax profile while exploded.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplodedParallaxConfig {
    pub enabled: bool,
    pub strength_x: f32,
    pub strength_y: f32,
    /// Per-particle drift per unit of input, before sensitivity.
    pub particle_strength: f32,
}

impl Default for ExplodedParallaxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strength_x: 0.2,
            strength_y: 0.2,
            particle_strength: 1.5,
        }
    }
}

/// Device-tilt input.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrientationConfig {
    /// User opt-in; tilt only replaces the pointer once this is set and a reading arrived.
    pub enabled: bool,
    /// Tilt (degrees) that maps to full deflection.
    pub range_degrees: f32,
    /// Fraction the baseline moves toward each new reading.
    pub recalibration_rate: f32,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            range_degrees: 25.0,
            recalibration_rate: 0.005,
        }
    }
}

/// Touch-drag rotation with momentum.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TouchConfig {
    /// Rotation offset per unit of NDC dragged.
    pub sensitivity: f32,
    /// Per-frame velocity retention after release.
    pub friction: f32,
    /// Per-frame retention of the vertical offset while untouched.
    pub vertical_spring: f32,
    /// Frames over which a new drag blends out of residual momentum.
    pub blend_frames: u32,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            friction: 0.95,
            vertical_spring: 0.92,
            blend_frames: 5,
        }
    }
}

/// All parallax tunables.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParallaxConfig {
    pub idle: IdleParallaxConfig,
    pub exploded: ExplodedParallaxConfig,
    /// Per-frame smoothing of the group transform toward its target.
    pub smoothing: f32,
    /// Per-frame smoothing of individual particle shifts toward their target.
    pub particle_smoothing: f32,
    /// Per-frame retention of individual shifts when they are not tracking input.
    pub shift_decay: f32,
    pub orientation: OrientationConfig,
    pub touch: TouchConfig,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            idle: IdleParallaxConfig::default(),
            exploded: ExplodedParallaxConfig::default(),
            smoothing: 0.05,
            particle_smoothing: 0.08,
            shift_decay: 0.95,
            orientation: OrientationConfig::default(),
            touch: TouchConfig::default(),
        }
    }
}

/// View mode per animation state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Used while idle and returning.
    pub idle_view: ViewMode,
    /// Used while exploding.
    pub exploded_view: ViewMode,
    /// Orbit distance from the origin.
    pub distance: f32,
    /// Orbit pitch, radians.
    pub pitch: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            idle_view: ViewMode::Isometric,
            exploded_view: ViewMode::Perspective,
            distance: 20.0,
            pitch: 0.3,
        }
    }
}

/// Showcase box shown while exploded.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShowcaseConfig {
    pub enabled: bool,
    /// Delay between the explosion and the box appearing.
    pub reveal_delay_ms: u64,
    /// Billboard drift per unit of pointer input.
    pub billboard_parallax: f32,
    /// Per-frame smoothing of the billboard drift.
    pub billboard_smoothing: f32,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reveal_delay_ms: 800,
            billboard_parallax: 0.5,
            billboard_smoothing: 0.1,
        }
    }
}

/// How frames are paced.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum FrameMode {
    /// One frame per display refresh.
    #[default]
    Vsync,
    /// Back-to-back frames with no throttling.
    Uncapped,
}

/// Complete display configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub tree: TreeConfig,
    pub animation: AnimationConfig,
    pub explosion: ExplosionConfig,
    pub parallax: ParallaxConfig,
    pub camera: CameraConfig,
    pub showcase: ShowcaseConfig,
    pub frame_mode: FrameMode,
    /// Ornaments making up the tree pool.
    pub tree_objects: Vec<ObjectDefinition>,
    /// Preview ornaments; when non-empty they are drawn instead of the tree.
    pub test_objects: Vec<ObjectDefinition>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tree: TreeConfig::default(),
            animation: AnimationConfig::default(),
            explosion: ExplosionConfig::default(),
            parallax: ParallaxConfig::default(),
            camera: CameraConfig::default(),
            showcase: ShowcaseConfig::default(),
            frame_mode: FrameMode::default(),
            tree_objects: ObjectDefinition::default_tree(),
            test_objects: Vec::new(),
        }
    }
}

fn check_extent(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidGeometry { field, value })
    }
}

fn check_rate(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { field, value })
    }
}

impl SceneConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject geometry that would turn into NaN during sampling, and blend
    /// rates that would make the per-frame lerps overshoot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_extent("tree.height", self.tree.height)?;
        check_extent("tree.radius", self.tree.radius)?;
        check_extent("explosion.inner_radius", self.explosion.inner_radius)?;
        check_extent("explosion.outer_radius", self.explosion.outer_radius)?;
        check_extent("animation.return_threshold", self.animation.return_threshold)?;
        check_extent("camera.distance", self.camera.distance)?;
        check_rate("animation.animation_speed", self.animation.animation_speed)?;
        check_rate("parallax.smoothing", self.parallax.smoothing)?;
        check_rate("parallax.particle_smoothing", self.parallax.particle_smoothing)?;
        check_rate("parallax.shift_decay", self.parallax.shift_decay)?;
        check_rate(
            "parallax.orientation.recalibration_rate",
            self.parallax.orientation.recalibration_rate,
        )?;
        check_rate("parallax.touch.friction", self.parallax.touch.friction)?;
        check_rate("showcase.billboard_smoothing", self.showcase.billboard_smoothing)?;
        if !self.explosion.offset.is_finite() {
            return Err(ConfigError::InvalidGeometry {
                field: "explosion.offset",
                value: f32::NAN,
            });
        }
        if self.explosion.inner_radius > self.explosion.outer_radius {
            return Err(ConfigError::InvertedShell {
                inner: self.explosion.inner_radius,
                outer: self.explosion.outer_radius,
            });
        }
        Ok(())
    }

    /// Whether switching from `self` to `other` requires rebuilding the pools.
    pub fn needs_rebuild(&self, other: &SceneConfig) -> bool {
        self.tree.height != other.tree.height
            || self.tree.radius != other.tree.radius
            || self.tree.max_rotation_speed != other.tree.max_rotation_speed
            || self.explosion != other.explosion
            || self.tree_objects != other.tree_objects
            || self.test_objects != other.test_objects
    }

    /// Hold duration as a [`Duration`](std::time::Duration).
    pub fn hold_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.animation.hold_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SceneConfig::from_json(
            r#"{ "tree": { "height": 10.0 }, "animation": { "hold_duration_ms": 3000 } }"#,
        )
        .unwrap();
        assert_eq!(config.tree.height, 10.0);
        assert_eq!(config.tree.radius, 3.0);
        assert_eq!(config.animation.hold_duration_ms, 3000);
        assert_eq!(config.animation.float_speed, 1.0);
        assert_eq!(config.camera.exploded_view, ViewMode::Perspective);
        assert_eq!(config.tree_objects.len(), ObjectDefinition::default_tree().len());
    }

    #[test]
    fn test_rejects_negative_height() {
        let err = SceneConfig::from_json(r#"{ "tree": { "height": -2.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidGeometry {
                field: "tree.height",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_inverted_shell() {
        let mut config = SceneConfig::default();
        config.explosion.inner_radius = 20.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedShell { .. })
        ));
    }

    #[test]
    fn test_rejects_nan_radius() {
        let mut config = SceneConfig::default();
        config.tree.radius = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_geometry_is_accepted() {
        let mut config = SceneConfig::default();
        config.tree.height = 0.0;
        config.tree.radius = 0.0;
        config.explosion.inner_radius = 0.0;
        config.explosion.outer_radius = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_rate_above_one() {
        let err = SceneConfig::from_json(r#"{ "animation": { "animation_speed": 3.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidRate {
                field: "animation.animation_speed",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_nan_and_negative_rates() {
        let mut config = SceneConfig::default();
        config.parallax.smoothing = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRate {
                field: "parallax.smoothing",
                ..
            })
        ));

        let mut config = SceneConfig::default();
        config.parallax.touch.friction = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRate {
                field: "parallax.touch.friction",
                ..
            })
        ));

        let mut config = SceneConfig::default();
        config.showcase.billboard_smoothing = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rate_bounds_are_inclusive() {
        let mut config = SceneConfig::default();
        config.animation.animation_speed = 1.0;
        config.parallax.smoothing = 0.0;
        config.parallax.particle_smoothing = 1.0;
        config.parallax.shift_decay = 0.0;
        config.parallax.orientation.recalibration_rate = 1.0;
        config.parallax.touch.friction = 0.0;
        config.showcase.billboard_smoothing = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_error_is_reported() {
        assert!(matches!(
            SceneConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_needs_rebuild() {
        let base = SceneConfig::default();
        let mut other = base.clone();
        other.animation.float_speed = 3.0;
        assert!(!base.needs_rebuild(&other));

        other.explosion.outer_radius = 15.0;
        assert!(base.needs_rebuild(&other));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!(
            "ornament_burst_config_{}.json",
            std::process::id()
        ));
        let mut config = SceneConfig::default();
        config.frame_mode = FrameMode::Uncapped;
        config.save(&path).unwrap();
        let loaded = SceneConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
