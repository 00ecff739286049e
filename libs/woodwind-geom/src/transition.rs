//! # Transition Curves
//!
//! Curvature-continuous S-shaped joins between two diameters.
//!
//! A transition is four clothoid quarters laid end to end so curvature runs
//! `0 → k → 0 → −k → 0`. The curve leaves its start heading straight along
//! the axis, turns up to `angle` at its midpoint and comes back to the axis
//! direction at the end, so neighbouring straight spans join without a kink
//! in either slope or curvature.
//!
//! ```text
//!   quarter A   quarter B      quarter C   quarter D
//!   0 ──► k ───► 0 (midpoint) ───► −k ───► 0
//! ```
//!
//! The raw curve is scaled separately in x and y onto the join's axial and
//! diameter ranges.

use std::f64::consts::FRAC_PI_2;

use config::constants::TRANSITION_SAMPLES;

use crate::error::{GeomError, GeomResult};
use crate::fresnel::cornu;
use crate::lerp::{lerp, unlerp};
use crate::Point;

/// A smooth diameter change between `(z0, d0)` and `(z1, d1)`.
///
/// # Example
///
/// ```rust
/// use woodwind_geom::Transition;
///
/// let t = Transition::new(0.0, 10.0, 20.0, 14.0, 0.6).unwrap();
/// assert!((t.value_at(0.0) - 10.0).abs() < 1e-9);
/// assert!((t.value_at(10.0) - 12.0).abs() < 1e-6);
/// assert!((t.value_at(20.0) - 14.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    start: Point,
    end: Point,
    angle: f64,
    /// Dense normalized samples, monotonic in x.
    samples: Vec<Point>,
}

impl Transition {
    /// Creates a transition with the given maximum turning angle in radians.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `angle` is outside `(0, π/2)` or if the
    /// axial range is empty.
    pub fn new(z0: f64, d0: f64, z1: f64, d1: f64, angle: f64) -> GeomResult<Self> {
        if !(angle > 0.0 && angle < FRAC_PI_2) {
            return Err(GeomError::invalid(
                "angle",
                format!("turning angle must lie in (0, π/2), got {angle}"),
            ));
        }
        if !(z1 > z0) {
            return Err(GeomError::invalid(
                "z1",
                format!("transition end {z1} must be above start {z0}"),
            ));
        }

        let mut transition = Self {
            start: Point::new(z0, d0),
            end: Point::new(z1, d1),
            angle,
            samples: Vec::new(),
        };
        transition.samples = transition.sample(TRANSITION_SAMPLES);
        Ok(transition)
    }

    /// Maximum turning angle at the midpoint.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Start `(z, diameter)`.
    pub fn start(&self) -> Point {
        self.start
    }

    /// End `(z, diameter)`.
    pub fn end(&self) -> Point {
        self.end
    }

    /// Samples `n` points (at least two) evenly by arc length along the
    /// curve, mapped onto the join's endpoints.
    pub fn sample(&self, n: usize) -> Vec<Point> {
        let curve = UnitCurve::new(self.angle);
        let n = n.max(2);
        let far = curve.far_end();

        (0..n)
            .map(|i| {
                let raw = curve.at(curve.length() * i as f64 / (n - 1) as f64);
                Point::new(
                    lerp(self.start.x, self.end.x, raw.x / far.x),
                    lerp(self.start.y, self.end.y, raw.y / far.y),
                )
            })
            .collect()
    }

    /// Diameter at axial position `z`, clamped to the endpoints outside the
    /// join.
    pub fn value_at(&self, z: f64) -> f64 {
        if z <= self.start.x {
            return self.start.y;
        }
        if z >= self.end.x {
            return self.end.y;
        }

        let upper = self.samples.partition_point(|p| p.x < z);
        match (upper.checked_sub(1), self.samples.get(upper)) {
            (Some(lower), Some(&b)) => {
                let a = self.samples[lower];
                lerp(a.y, b.y, unlerp(a.x, b.x, z))
            }
            (None, Some(b)) => b.y,
            _ => self.end.y,
        }
    }
}

// =============================================================================
// UNNORMALIZED CURVE
// =============================================================================

/// The raw four-quarter clothoid, starting at the origin along +X.
struct UnitCurve {
    /// Arc length of one quarter.
    quarter: f64,
    /// End of quarter A.
    apex: Point,
    /// Unit tangent at `apex`, normal of the quarter-B mirror line.
    apex_tangent: Point,
    /// Midpoint of the whole curve.
    midpoint: Point,
}

impl UnitCurve {
    fn new(angle: f64) -> Self {
        let half = angle / 2.0;
        // Tangent angle of the unit clothoid at arc length t is t²/2.
        let quarter = (2.0 * half).sqrt();
        let apex = cornu(quarter);
        let apex_tangent = Point::new(half.cos(), half.sin());
        let midpoint = apex_tangent * (2.0 * apex.dot(apex_tangent));
        Self {
            quarter,
            apex,
            apex_tangent,
            midpoint,
        }
    }

    fn length(&self) -> f64 {
        4.0 * self.quarter
    }

    fn far_end(&self) -> Point {
        self.midpoint * 2.0
    }

    /// Reflects across the line through `apex` perpendicular to its tangent.
    fn mirror(&self, p: Point) -> Point {
        p - self.apex_tangent * (2.0 * (p - self.apex).dot(self.apex_tangent))
    }

    /// First half: quarter A then quarter B.
    fn first_half(&self, s: f64) -> Point {
        if s <= self.quarter {
            cornu(s)
        } else {
            self.mirror(cornu(2.0 * self.quarter - s))
        }
    }

    /// Point at arc length `s` in `[0, 4·quarter]`.
    fn at(&self, s: f64) -> Point {
        let half = 2.0 * self.quarter;
        if s <= half {
            self.first_half(s)
        } else {
            // Point reflection of the first half about the midpoint, reversed.
            self.midpoint * 2.0 - self.first_half(self.length() - s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rejects_angle_out_of_range() {
        assert!(Transition::new(0.0, 1.0, 1.0, 2.0, 0.0).is_err());
        assert!(Transition::new(0.0, 1.0, 1.0, 2.0, FRAC_PI_2).is_err());
        assert!(Transition::new(0.0, 1.0, 1.0, 2.0, -0.3).is_err());
        assert!(Transition::new(0.0, 1.0, 1.0, 2.0, f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_empty_range() {
        let err = Transition::new(5.0, 1.0, 5.0, 2.0, 0.5).unwrap_err();
        assert!(matches!(err, GeomError::InvalidParameter { name: "z1", .. }));
    }

    #[test]
    fn test_sample_hits_endpoints() {
        let t = Transition::new(2.0, 8.0, 12.0, 5.0, 1.0).unwrap();
        let points = t.sample(33);
        assert_eq!(points.len(), 33);
        assert_abs_diff_eq!(points[0].x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(points[0].y, 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(points[32].x, 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(points[32].y, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sample_is_monotonic() {
        let t = Transition::new(0.0, 0.0, 1.0, 1.0, 1.4).unwrap();
        let points = t.sample(100);
        for pair in points.windows(2) {
            assert!(pair[1].x > pair[0].x);
            assert!(pair[1].y >= pair[0].y);
        }
    }

    #[test]
    fn test_point_symmetric_about_midpoint() {
        let t = Transition::new(0.0, 0.0, 1.0, 1.0, 0.8).unwrap();
        for &z in &[0.1, 0.25, 0.4] {
            let a = t.value_at(z);
            let b = t.value_at(1.0 - z);
            assert_abs_diff_eq!(a + b, 1.0, epsilon = 1e-4);
        }
        assert_abs_diff_eq!(t.value_at(0.5), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_flat_at_both_ends() {
        let t = Transition::new(0.0, 0.0, 1.0, 1.0, 1.0).unwrap();
        // Zero slope and zero curvature at the ends: the curve stays close
        // to the end value much longer than a straight ramp would.
        assert!(t.value_at(0.05) < 0.01);
        assert!(t.value_at(0.95) > 0.99);
    }

    #[test]
    fn test_value_clamped_outside() {
        let t = Transition::new(0.0, 3.0, 1.0, 4.0, 0.5).unwrap();
        assert_eq!(t.value_at(-1.0), 3.0);
        assert_eq!(t.value_at(2.0), 4.0);
    }

    #[test]
    fn test_midpoint_tangent_matches_angle() {
        let angle = 0.9;
        let curve = UnitCurve::new(angle);
        let s = 2.0 * curve.quarter;
        let a = curve.at(s - 1e-6);
        let b = curve.at(s + 1e-6);
        let heading = (b.y - a.y).atan2(b.x - a.x);
        assert_abs_diff_eq!(heading, angle, epsilon = 1e-5);
    }
}
