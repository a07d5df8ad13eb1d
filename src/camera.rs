//! Camera rig with a per-state view mode.

use crate::animation::AnimationState;
use crate::config::CameraConfig;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Which projection the renderer should use.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Perspective,
    /// Orthographic projection from the orbit position.
    Isometric,
}

/// Orbit camera for viewing the ornament formation.
#[derive(Clone, Debug)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
}

impl Camera {
    pub fn new(distance: f32, pitch: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch,
            distance,
            target: Vec3::ZERO,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(20.0, 0.3)
    }
}

/// Orbit camera plus the view-mode-per-state policy.
#[derive(Clone, Debug)]
pub struct CameraRig {
    pub camera: Camera,
    idle_view: ViewMode,
    exploded_view: ViewMode,
    active: ViewMode,
}

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            camera: Camera::new(config.distance, config.pitch),
            idle_view: config.idle_view,
            exploded_view: config.exploded_view,
            active: config.idle_view,
        }
    }

    /// Pick up new view modes; the active one follows on the next [`select`](Self::select).
    pub fn configure(&mut self, config: &CameraConfig) {
        self.idle_view = config.idle_view;
        self.exploded_view = config.exploded_view;
        self.camera.distance = config.distance;
        self.camera.pitch = config.pitch;
    }

    /// View mode configured for `state`.
    pub fn view_for(&self, state: AnimationState) -> ViewMode {
        match state {
            AnimationState::Exploding => self.exploded_view,
            AnimationState::Idle | AnimationState::Returning => self.idle_view,
        }
    }

    /// Switch to the view for `state`. Returns the new mode if it changed.
    pub fn select(&mut self, state: AnimationState) -> Option<ViewMode> {
        let view = self.view_for(state);
        if view == self.active {
            None
        } else {
            self.active = view;
            Some(view)
        }
    }

    #[inline]
    pub fn active(&self) -> ViewMode {
        self.active
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.camera.position()
    }

    /// Projection matrix for the active view mode.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        match self.active {
            ViewMode::Perspective => Mat4::perspective_rh(45.0_f32.to_radians(), aspect, 0.1, 200.0),
            ViewMode::Isometric => {
                let half_h = self.camera.distance * 0.5;
                let half_w = half_h * aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, 0.1, 200.0)
            }
        }
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.camera.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_follows_state() {
        let mut rig = CameraRig::new(&CameraConfig::default());
        assert_eq!(rig.active(), ViewMode::Isometric);
        assert_eq!(rig.select(AnimationState::Exploding), Some(ViewMode::Perspective));
        assert_eq!(rig.select(AnimationState::Exploding), None);
        assert_eq!(rig.select(AnimationState::Returning), Some(ViewMode::Isometric));
        assert_eq!(rig.select(AnimationState::Idle), None);
    }

    #[test]
    fn test_camera_position_distance() {
        let cam = Camera::new(5.0, 0.4);
        assert!((cam.position().length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_projection_is_finite_for_bad_aspect() {
        let rig = CameraRig::new(&CameraConfig::default());
        assert!(rig.view_proj(0.0).is_finite());
    }
}
