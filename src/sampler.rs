//! Sampling helpers for resting and explosion positions.
//!
//! Two distributions matter for the display:
//!
//! - the **cone shell** the ornaments rest on while idle, uniform by area
//!   over the lateral surface and restricted to the outer band of the radius;
//! - the **spherical shell** they fly out to when exploding, uniform by solid
//!   angle and uniform over the shell thickness.
//!
//! ```ignore
//! let mut sampler = Sampler::from_seed(7);
//! let rest = sampler.sample_resting_position(8.0, 3.0);
//! let targets = sampler.generate_explosion_targets(100, Vec3::ZERO, 6.0, 12.0, Vec3::ZERO);
//! ```

use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Fraction of the local radius that stays empty inside the cone shell.
const HOLLOW_INNER_FRACTION: f32 = 0.6;

/// Clamp a geometry parameter to something `sqrt`/`acos` can't turn into NaN.
///
/// Non-finite and negative values collapse to `0.0`, which yields degenerate
/// but finite point sets (everything at the apex or the shell center).
pub fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Random source plus the sampling algorithms that draw from it.
///
/// Every call draws fresh numbers; nothing is memoized.
#[derive(Clone, Debug)]
pub struct Sampler {
    rng: SmallRng,
}

impl Sampler {
    /// Create a sampler seeded from the wall clock, so every run differs.
    pub fn new() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::from_seed(seed)
    }

    /// Create a sampler with a fixed seed for reproducible draws.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random() * (max - min)
    }

    /// Random per-axis angular velocity in `[-max, max)`.
    pub fn random_rotation_speed(&mut self, max: f32) -> Vec3 {
        Vec3::new(
            self.random_range(-max, max),
            self.random_range(-max, max),
            self.random_range(-max, max),
        )
    }

    // ========== Position helpers ==========

    /// Random point on the lateral surface of a hollow cone.
    ///
    /// The apex sits at `y = +height/2`, the base at `y = -height/2`.
    /// `sqrt(u)` on the height fraction keeps the areal density uniform (a
    /// linear draw would pile points up near the apex), and the radius is
    /// drawn from the outer 40% of the local circle. A cone with zero height
    /// or zero radius has no surface; every point lands on the apex.
    pub fn sample_resting_position(&mut self, cone_height: f32, cone_radius: f32) -> Vec3 {
        let cone_height = sanitize_extent(cone_height);
        let cone_radius = sanitize_extent(cone_radius);
        if cone_height == 0.0 || cone_radius == 0.0 {
            return Vec3::new(0.0, cone_height / 2.0, 0.0);
        }

        let height_fraction = self.random().sqrt();
        let height = height_fraction * cone_height;
        let radius_at_height = height_fraction * cone_radius;

        let theta = self.random_range(0.0, TAU);
        let band = HOLLOW_INNER_FRACTION + (1.0 - HOLLOW_INNER_FRACTION) * self.random();
        let r = radius_at_height * band;

        Vec3::new(r * theta.cos(), cone_height / 2.0 - height, r * theta.sin())
    }

    /// Random point in a spherical shell, uniform by solid angle.
    ///
    /// The polar angle is measured from +Y. Radius is uniform over the shell
    /// thickness, which leaves slightly more points near the inner radius
    /// than a volume-uniform draw would.
    ///
    /// Radii are sanitized and ordered so that `inner <= outer`; a shell
    /// with both radii at zero collapses to `center`.
    pub fn sample_shell_point(&mut self, center: Vec3, inner_radius: f32, outer_radius: f32) -> Vec3 {
        let a = sanitize_extent(inner_radius);
        let b = sanitize_extent(outer_radius);
        let (inner_radius, outer_radius) = if a <= b { (a, b) } else { (b, a) };

        let theta = self.random_range(0.0, TAU);
        let phi = (2.0 * self.random() - 1.0).clamp(-1.0, 1.0).acos();
        let r = inner_radius + self.random() * (outer_radius - inner_radius);

        center
            + Vec3::new(
                r * phi.sin() * theta.cos(),
                r * phi.cos(),
                r * phi.sin() * theta.sin(),
            )
    }

    /// Generate `count` explosion targets around `center + offset`.
    ///
    /// Index `i` of the result belongs to the `i`-th particle created by the
    /// pool build that requested it. Radii are sanitized and ordered so that
    /// `inner <= outer`; `count == 0` yields an empty vec.
    pub fn generate_explosion_targets(
        &mut self,
        count: usize,
        center: Vec3,
        inner_radius: f32,
        outer_radius: f32,
        offset: Vec3,
    ) -> Vec<Vec3> {
        let shell_center = center + offset;
        (0..count)
            .map(|_| self.sample_shell_point(shell_center, inner_radius, outer_radius))
            .collect()
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const N: usize = 200_000;

    #[test]
    fn test_cone_points_stay_on_hollow_shell() {
        let mut sampler = Sampler::from_seed(1);
        let (h, r) = (8.0, 3.0);
        for _ in 0..10_000 {
            let p = sampler.sample_resting_position(h, r);
            assert!(p.y <= h / 2.0 + 1e-4 && p.y >= -h / 2.0 - 1e-4);

            let fraction = (h / 2.0 - p.y) / h;
            let local_radius = fraction * r;
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            assert!(radial <= local_radius + 1e-4);
            assert!(radial >= local_radius * HOLLOW_INNER_FRACTION - 1e-4);
        }
    }

    #[test]
    fn test_cone_height_density_follows_circumference() {
        // Depth below the apex has density 2t on [0, 1], so band [a, b]
        // should hold (b^2 - a^2) of the samples.
        let mut sampler = Sampler::from_seed(2);
        let h = 10.0;
        let bands = 10;
        let mut counts = vec![0usize; bands];
        for _ in 0..N {
            let p = sampler.sample_resting_position(h, 2.0);
            let depth = ((h / 2.0 - p.y) / h).clamp(0.0, 0.999_999);
            counts[(depth * bands as f32) as usize] += 1;
        }

        for (i, &count) in counts.iter().enumerate() {
            let a = i as f32 / bands as f32;
            let b = (i + 1) as f32 / bands as f32;
            let expected = (b * b - a * a) * N as f32;
            let observed = count as f32;
            assert!(
                (observed - expected).abs() < expected * 0.05 + 200.0,
                "band {}: observed {} expected {}",
                i,
                observed,
                expected
            );
        }
        // A linear height draw would put equal counts in the first and last band.
        assert!(counts[bands - 1] > counts[0] * 10);
    }

    #[test]
    fn test_cone_degenerate_geometry_is_finite() {
        let mut sampler = Sampler::from_seed(3);
        for _ in 0..100 {
            let p = sampler.sample_resting_position(0.0, 0.0);
            assert_eq!(p, Vec3::ZERO);

            let p = sampler.sample_resting_position(f32::NAN, -3.0);
            assert!(p.is_finite());
            assert_eq!(p, Vec3::ZERO);
        }
    }

    #[test]
    fn test_flat_or_needle_cone_collapses_to_apex() {
        let mut sampler = Sampler::from_seed(31);
        for _ in 0..1_000 {
            assert_eq!(sampler.sample_resting_position(0.0, 3.0), Vec3::ZERO);
            assert_eq!(sampler.sample_resting_position(8.0, 0.0), Vec3::new(0.0, 4.0, 0.0));
            assert_eq!(sampler.sample_resting_position(-1.0, 3.0), Vec3::ZERO);
        }
    }

    #[test]
    fn test_zero_shell_collapses_to_center() {
        let mut sampler = Sampler::from_seed(32);
        let center = Vec3::new(2.0, -1.0, 5.0);
        let offset = Vec3::new(0.0, 3.0, 0.0);
        for t in sampler.generate_explosion_targets(200, center, 0.0, 0.0, offset) {
            assert_eq!(t, center + offset);
        }
    }

    #[test]
    fn test_shell_point_sanitizes_radii() {
        let mut sampler = Sampler::from_seed(33);
        for _ in 0..500 {
            assert_eq!(sampler.sample_shell_point(Vec3::ONE, f32::NAN, f32::NAN), Vec3::ONE);

            let p = sampler.sample_shell_point(Vec3::ZERO, 9.0, 4.0);
            let d = p.length();
            assert!(d >= 4.0 - 1e-3 && d <= 9.0 + 1e-3, "distance {}", d);

            let p = sampler.sample_shell_point(Vec3::ZERO, f32::NEG_INFINITY, 2.0);
            assert!(p.is_finite() && p.length() <= 2.0 + 1e-4);
        }
    }

    #[test]
    fn test_shell_radii_within_bounds() {
        let mut sampler = Sampler::from_seed(4);
        let center = Vec3::new(1.0, -2.0, 3.0);
        let offset = Vec3::new(0.0, 1.0, 0.0);
        let targets = sampler.generate_explosion_targets(5_000, center, 6.0, 12.0, offset);
        assert_eq!(targets.len(), 5_000);
        for t in targets {
            let d = (t - (center + offset)).length();
            assert!(d >= 6.0 - 1e-3 && d <= 12.0 + 1e-3, "distance {}", d);
        }
    }

    #[test]
    fn test_shell_uniform_by_solid_angle() {
        // Polar angle density is sin(phi)/2, so band [a, b] holds
        // (cos a - cos b) / 2 of the samples.
        let mut sampler = Sampler::from_seed(5);
        let targets = sampler.generate_explosion_targets(N, Vec3::ZERO, 1.0, 1.0, Vec3::ZERO);
        let bands = 12;
        let mut counts = vec![0usize; bands];
        for t in &targets {
            let phi = (t.y / t.length()).clamp(-1.0, 1.0).acos();
            let idx = ((phi / PI) * bands as f32).min(bands as f32 - 1.0) as usize;
            counts[idx] += 1;
        }

        for (i, &count) in counts.iter().enumerate() {
            let a = i as f32 / bands as f32 * PI;
            let b = (i + 1) as f32 / bands as f32 * PI;
            let expected = (a.cos() - b.cos()) / 2.0 * N as f32;
            assert!(
                (count as f32 - expected).abs() < expected * 0.06 + 200.0,
                "band {}: observed {} expected {}",
                i,
                count,
                expected
            );
        }
        // Pole bands must be the sparsest, equator bands the densest.
        assert!(counts[0] < counts[bands / 2]);
        assert!(counts[bands - 1] < counts[bands / 2 - 1]);
    }

    #[test]
    fn test_zero_thickness_shell_single_point() {
        let mut sampler = Sampler::from_seed(6);
        let targets = sampler.generate_explosion_targets(1, Vec3::ZERO, 10.0, 10.0, Vec3::ZERO);
        assert_eq!(targets.len(), 1);
        assert!((targets[0].length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_count_yields_no_targets() {
        let mut sampler = Sampler::from_seed(7);
        let targets = sampler.generate_explosion_targets(0, Vec3::ZERO, 6.0, 12.0, Vec3::ZERO);
        assert!(targets.is_empty());
    }

    #[test]
    fn test_inverted_and_invalid_radii_are_sanitized() {
        let mut sampler = Sampler::from_seed(8);
        for t in sampler.generate_explosion_targets(500, Vec3::ZERO, 12.0, 6.0, Vec3::ZERO) {
            let d = t.length();
            assert!(d >= 6.0 - 1e-3 && d <= 12.0 + 1e-3);
        }
        for t in sampler.generate_explosion_targets(50, Vec3::ZERO, f32::NAN, f32::INFINITY, Vec3::ZERO) {
            assert_eq!(t, Vec3::ZERO);
        }
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let mut a = Sampler::from_seed(99);
        let mut b = Sampler::from_seed(99);
        for _ in 0..10 {
            assert_eq!(
                a.sample_resting_position(8.0, 3.0),
                b.sample_resting_position(8.0, 3.0)
            );
        }
    }
}
