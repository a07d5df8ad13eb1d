//! Showcase box shown while the ornaments are exploded.
//!
//! Only the triggering contract lives here: when the box should appear,
//! when it hides, which gallery image it should display, and its billboard
//! drift. Image loading and decryption happen elsewhere and report back
//! through [`Showcase::set_image_count`].

use crate::config::ShowcaseConfig;
use crate::timer::Deadline;
use crate::{Vec2, Vec3};
use std::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct Showcase {
    visible: bool,
    reveal: Deadline,
    image_count: usize,
    current_image: Option<usize>,
    position: Vec3,
    billboard_offset: Vec2,
    facing: Vec3,
}

impl Showcase {
    pub fn new(image_count: usize) -> Self {
        Self {
            image_count,
            facing: Vec3::Z,
            ..Default::default()
        }
    }

    /// Update the number of available gallery images.
    pub fn set_image_count(&mut self, count: usize) {
        self.image_count = count;
        self.current_image = match self.current_image {
            Some(_) if count == 0 => None,
            Some(i) => Some(i % count),
            None => None,
        };
    }

    /// Place the box in world space.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// An explosion started: advance the image and (re)schedule the reveal.
    pub fn on_explode(&mut self, now: Duration, config: &ShowcaseConfig) {
        self.advance_image();
        self.reveal.cancel();
        if config.enabled {
            self.reveal.arm(now, Duration::from_millis(config.reveal_delay_ms));
            tracing::debug!(image = ?self.current_image, delay_ms = config.reveal_delay_ms, "showcase reveal scheduled");
        }
    }

    /// Hide the box and drop any pending reveal. Returns whether it was visible.
    pub fn hide(&mut self) -> bool {
        self.reveal.cancel();
        std::mem::replace(&mut self.visible, false)
    }

    fn advance_image(&mut self) {
        if self.image_count == 0 {
            self.current_image = None;
            return;
        }
        self.current_image = Some(match self.current_image {
            Some(i) => (i + 1) % self.image_count,
            None => 0,
        });
    }

    /// Per-frame step. Returns `true` on the frame the reveal fires.
    pub fn update(&mut self, now: Duration, camera_position: Vec3, pointer: Vec2, config: &ShowcaseConfig) -> bool {
        let revealed = self.reveal.poll(now);
        if revealed {
            self.visible = true;
        }

        let goal = pointer * config.billboard_parallax;
        self.billboard_offset += (goal - self.billboard_offset) * config.billboard_smoothing;

        let to_camera = (camera_position - self.position).normalize_or_zero();
        if to_camera != Vec3::ZERO {
            self.facing = to_camera;
        }
        revealed
    }

    #[inline]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Index of the gallery image to show, if there are any.
    #[inline]
    pub fn current_image(&self) -> Option<usize> {
        self.current_image
    }

    #[inline]
    pub fn reveal_deadline(&self) -> &Deadline {
        &self.reveal
    }

    #[inline]
    pub fn billboard_offset(&self) -> Vec2 {
        self.billboard_offset
    }

    /// Unit vector from the box toward the camera.
    #[inline]
    pub fn facing(&self) -> Vec3 {
        self.facing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_reveal_after_delay() {
        let config = ShowcaseConfig::default();
        let mut showcase = Showcase::new(3);
        showcase.on_explode(ms(0), &config);
        assert!(!showcase.update(ms(799), Vec3::Z, Vec2::ZERO, &config));
        assert!(!showcase.visible());
        assert!(showcase.update(ms(800), Vec3::Z, Vec2::ZERO, &config));
        assert!(showcase.visible());
        assert!(!showcase.update(ms(900), Vec3::Z, Vec2::ZERO, &config));
    }

    #[test]
    fn test_hide_cancels_pending_reveal() {
        let config = ShowcaseConfig::default();
        let mut showcase = Showcase::new(1);
        showcase.on_explode(ms(0), &config);
        assert!(!showcase.hide());
        assert!(!showcase.update(ms(2_000), Vec3::Z, Vec2::ZERO, &config));
        assert!(!showcase.visible());
    }

    #[test]
    fn test_reexplode_replaces_reveal() {
        let config = ShowcaseConfig::default();
        let mut showcase = Showcase::new(2);
        showcase.on_explode(ms(0), &config);
        showcase.on_explode(ms(500), &config);
        assert!(!showcase.update(ms(800), Vec3::Z, Vec2::ZERO, &config));
        assert!(showcase.update(ms(1_300), Vec3::Z, Vec2::ZERO, &config));
    }

    #[test]
    fn test_images_advance_and_wrap() {
        let config = ShowcaseConfig::default();
        let mut showcase = Showcase::new(2);
        assert_eq!(showcase.current_image(), None);
        showcase.on_explode(ms(0), &config);
        assert_eq!(showcase.current_image(), Some(0));
        showcase.on_explode(ms(1), &config);
        assert_eq!(showcase.current_image(), Some(1));
        showcase.on_explode(ms(2), &config);
        assert_eq!(showcase.current_image(), Some(0));

        showcase.set_image_count(0);
        assert_eq!(showcase.current_image(), None);
        showcase.on_explode(ms(3), &config);
        assert_eq!(showcase.current_image(), None);
    }

    #[test]
    fn test_disabled_never_reveals() {
        let config = ShowcaseConfig {
            enabled: false,
            ..Default::default()
        };
        let mut showcase = Showcase::new(1);
        showcase.on_explode(ms(0), &config);
        assert!(!showcase.reveal_deadline().is_armed());
        assert!(!showcase.update(ms(10_000), Vec3::Z, Vec2::ZERO, &config));
    }

    #[test]
    fn test_billboard_tracks_pointer_and_camera() {
        let config = ShowcaseConfig::default();
        let mut showcase = Showcase::new(0);
        for _ in 0..200 {
            showcase.update(ms(0), Vec3::new(10.0, 0.0, 0.0), Vec2::new(1.0, 0.0), &config);
        }
        assert!((showcase.billboard_offset().x - 0.5).abs() < 1e-3);
        assert_eq!(showcase.facing(), Vec3::X);
    }
}
