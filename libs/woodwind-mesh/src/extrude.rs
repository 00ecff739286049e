//! # Cross-Section Lofting
//!
//! Builds a closed mesh by connecting stacked 2D loops along the Z axis.
//!
//! ## Algorithm
//!
//! ```text
//! level i+1:  d ──── c        for every edge j of every adjacent level pair:
//!             │ ╲    │          (a, b, c) and (a, c, d)
//! level i:    a ──── b
//! ```
//!
//! Loops are counter-clockwise seen from +Z, so the side triangles face
//! outward. Both ends are closed with triangle fans. Two consecutive levels
//! at the same Z form a flat shoulder.

use glam::DVec3;
use tracing::debug;
use woodwind_geom::{BuildConfig, GeomResult, Loop, Profile};

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;

/// How the two end loops are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapStyle {
    /// Fan from the first vertex of the end loop: `n - 2` triangles, no
    /// extra vertices. Exact for convex loops.
    #[default]
    VertexFan,
    /// Fan from an added vertex at the end loop's centroid: `n` triangles.
    /// Also correct for star-shaped non-convex loops.
    CentroidFan,
}

/// Ordered `(z, loop)` levels waiting to be lofted.
///
/// # Example
///
/// ```rust
/// use woodwind_geom::{generators, BuildConfig};
/// use woodwind_mesh::{CapStyle, CrossSectionStack};
///
/// let config = BuildConfig::draft();
/// let mut stack = CrossSectionStack::new().with_caps(CapStyle::CentroidFan);
/// stack.push(0.0, generators::circle(20.0, &config).unwrap());
/// stack.push(10.0, generators::circle(16.0, &config).unwrap());
///
/// let mesh = stack.build().unwrap();
/// assert_eq!(mesh.vertex_count(), 2 * 16 + 2);
/// assert!(mesh.is_closed());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrossSectionStack {
    levels: Vec<(f64, Loop)>,
    caps: CapStyle,
}

impl CrossSectionStack {
    /// Creates an empty stack with vertex-fan caps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the end cap style.
    #[must_use]
    pub fn with_caps(mut self, caps: CapStyle) -> Self {
        self.caps = caps;
        self
    }

    /// Appends a level.
    pub fn push(&mut self, z: f64, section: Loop) {
        self.levels.push((z, section));
    }

    /// The levels pushed so far.
    pub fn levels(&self) -> &[(f64, Loop)] {
        &self.levels
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// True when no level has been pushed.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns a copy with every loop replaced by `f(z, loop)`.
    ///
    /// Used to derive an offset or rescaled skin that lofts point for point
    /// against the original.
    pub fn map_loops<F>(&self, mut f: F) -> GeomResult<CrossSectionStack>
    where
        F: FnMut(f64, &Loop) -> GeomResult<Loop>,
    {
        let levels = self
            .levels
            .iter()
            .map(|(z, section)| -> GeomResult<(f64, Loop)> { Ok((*z, f(*z, section)?)) })
            .collect::<GeomResult<Vec<_>>>()?;
        Ok(Self {
            levels,
            caps: self.caps,
        })
    }

    /// Lofts the levels into a closed mesh.
    ///
    /// # Errors
    ///
    /// - `InvalidTopology` for fewer than two levels or decreasing Z
    /// - `TopologyMismatch` when a loop's point count differs from the first
    pub fn build(&self) -> MeshResult<Mesh> {
        let (first, last) = match (self.levels.first(), self.levels.last()) {
            (Some(first), Some(last)) if self.levels.len() >= 2 => (first, last),
            _ => {
                return Err(MeshError::invalid_topology(format!(
                    "a loft needs at least 2 levels, got {}",
                    self.levels.len()
                )))
            }
        };

        let n = first.1.len();
        for (level, pair) in self.levels.windows(2).enumerate() {
            if pair[1].0 < pair[0].0 {
                return Err(MeshError::invalid_topology(format!(
                    "level {} at z={} is below level {} at z={}",
                    level + 1,
                    pair[1].0,
                    level,
                    pair[0].0
                )));
            }
        }
        for (level, (_, section)) in self.levels.iter().enumerate() {
            if section.len() != n {
                return Err(MeshError::TopologyMismatch {
                    level,
                    expected: n,
                    found: section.len(),
                });
            }
        }

        let levels = self.levels.len();
        let extra = match self.caps {
            CapStyle::VertexFan => 0,
            CapStyle::CentroidFan => 2,
        };
        let mut mesh = Mesh::with_capacity(levels * n + extra, 2 * n * levels);

        for (z, section) in &self.levels {
            for p in section.points() {
                mesh.add_vertex(DVec3::new(p.x, p.y, *z));
            }
        }

        let index = |level: usize, j: usize| (level * n + j % n) as u32;
        for i in 0..levels - 1 {
            for j in 0..n {
                let a = index(i, j);
                let b = index(i, j + 1);
                let c = index(i + 1, j + 1);
                let d = index(i + 1, j);
                mesh.add_triangle(a, b, c);
                mesh.add_triangle(a, c, d);
            }
        }

        let top = levels - 1;
        match self.caps {
            CapStyle::VertexFan => {
                for k in 1..n - 1 {
                    mesh.add_triangle(index(0, 0), index(0, k + 1), index(0, k));
                    mesh.add_triangle(index(top, 0), index(top, k), index(top, k + 1));
                }
            }
            CapStyle::CentroidFan => {
                let bottom_center = first.1.centroid();
                let top_center = last.1.centroid();
                let bc = mesh.add_vertex(DVec3::new(bottom_center.x, bottom_center.y, first.0));
                let tc = mesh.add_vertex(DVec3::new(top_center.x, top_center.y, last.0));
                for j in 0..n {
                    mesh.add_triangle(bc, index(0, j + 1), index(0, j));
                    mesh.add_triangle(tc, index(top, j), index(top, j + 1));
                }
            }
        }

        debug!(
            levels,
            points = n,
            triangles = mesh.triangle_count(),
            "lofted cross-section stack"
        );
        Ok(mesh)
    }
}

/// Samples a [`Profile`] between `from` and `to` into a stack.
///
/// Levels are placed at `from`, `to`, every kink strictly between them and
/// `config.profile_steps` subdivisions of each span. Where the profile
/// steps (`low != high`) a kink is inserted twice, low loop first, forming
/// a flat shoulder. `cross_section` turns a diameter into a loop.
///
/// Bounds outside the profile take the diameter of the nearest end.
///
/// # Errors
///
/// `InvalidTopology` if `to <= from`; any error from `cross_section`.
pub fn profile_stack<P, F>(
    profile: &P,
    from: f64,
    to: f64,
    config: &BuildConfig,
    cross_section: F,
) -> MeshResult<CrossSectionStack>
where
    P: Profile + ?Sized,
    F: Fn(f64) -> GeomResult<Loop>,
{
    if !(to > from) {
        return Err(MeshError::invalid_topology(format!(
            "profile range [{from}, {to}] is empty"
        )));
    }

    let mut stations = vec![from];
    stations.extend(profile.kinks().iter().copied().filter(|&k| k > from && k < to));
    stations.push(to);

    let steps = config.profile_steps.max(1);
    let mut stack = CrossSectionStack::new();
    for (i, pair) in stations.windows(2).enumerate() {
        let (z0, z1) = (pair[0], pair[1]);

        let at_start = profile.diameters_at(z0);
        if i == 0 {
            stack.push(z0, cross_section(at_start.high)?);
        } else {
            stack.push(z0, cross_section(at_start.low)?);
            if at_start.is_step() {
                stack.push(z0, cross_section(at_start.high)?);
            }
        }

        for k in 1..steps {
            let z = woodwind_geom::lerp(z0, z1, f64::from(k) / f64::from(steps));
            stack.push(z, cross_section(profile.diameters_at(z).low)?);
        }
    }
    stack.push(to, cross_section(profile.diameters_at(to).low)?);

    debug!(from, to, levels = stack.len(), "sampled profile");
    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;
    use woodwind_geom::{generators, GeomError, PiecewiseProfile};

    fn circle(d: f64, quality: u32) -> Loop {
        generators::circle(d, &BuildConfig::default().with_quality(quality)).unwrap()
    }

    #[test]
    fn test_two_level_counts() {
        for n in [3, 16, 128] {
            let mut stack = CrossSectionStack::new();
            stack.push(0.0, circle(10.0, n));
            stack.push(25.0, circle(10.0, n));
            let mesh = stack.build().unwrap();

            let n = n as usize;
            assert_eq!(mesh.vertex_count(), 2 * n);
            assert_eq!(mesh.triangle_count(), 2 * n + 2 * (n - 2));
            assert!(mesh.is_closed());
            assert!(mesh.validate());
        }
    }

    #[test]
    fn test_loft_volume_is_positive() {
        let mut stack = CrossSectionStack::new();
        stack.push(0.0, circle(10.0, 64));
        stack.push(20.0, circle(10.0, 64));
        let mesh = stack.build().unwrap();
        assert_relative_eq!(mesh.signed_volume(), PI * 25.0 * 20.0, max_relative = 1e-9);
    }

    #[test]
    fn test_centroid_caps() {
        let mut stack = CrossSectionStack::new().with_caps(CapStyle::CentroidFan);
        stack.push(0.0, circle(10.0, 16));
        stack.push(5.0, circle(10.0, 16));
        let mesh = stack.build().unwrap();
        assert_eq!(mesh.vertex_count(), 34);
        assert_eq!(mesh.triangle_count(), 2 * 16 + 2 * 16);
        assert!(mesh.is_closed());
        assert!(mesh.signed_volume() > 0.0);
    }

    #[test]
    fn test_flat_shoulder() {
        let mut stack = CrossSectionStack::new();
        stack.push(0.0, circle(10.0, 32));
        stack.push(10.0, circle(10.0, 32));
        stack.push(10.0, circle(6.0, 32));
        stack.push(20.0, circle(6.0, 32));
        let mesh = stack.build().unwrap();
        assert!(mesh.is_closed());
        let expected = PI * (25.0 * 10.0 + 9.0 * 10.0);
        assert_relative_eq!(mesh.signed_volume(), expected, max_relative = 1e-9);
    }

    #[test]
    fn test_topology_mismatch_is_fatal() {
        let mut stack = CrossSectionStack::new();
        stack.push(0.0, circle(10.0, 16));
        stack.push(5.0, circle(10.0, 16));
        stack.push(9.0, circle(10.0, 12));
        let err = stack.build().unwrap_err();
        assert!(matches!(
            err,
            MeshError::TopologyMismatch {
                level: 2,
                expected: 16,
                found: 12
            }
        ));
    }

    #[test]
    fn test_rejects_decreasing_z_and_single_level() {
        let mut stack = CrossSectionStack::new();
        stack.push(0.0, circle(10.0, 8));
        assert!(matches!(stack.build(), Err(MeshError::InvalidTopology { .. })));
        stack.push(-1.0, circle(10.0, 8));
        assert!(matches!(stack.build(), Err(MeshError::InvalidTopology { .. })));
    }

    #[test]
    fn test_profile_stack_inserts_shoulders() {
        let profile = PiecewiseProfile::new(
            vec![0.0, 50.0, 100.0],
            vec![12.0, 12.0, 8.0],
            vec![12.0, 8.0, 8.0],
        )
        .unwrap();
        let config = BuildConfig::draft();
        let stack = profile_stack(&profile, 0.0, 100.0, &config, |d| {
            generators::circle(d, &config)
        })
        .unwrap();

        let zs: Vec<f64> = stack.levels().iter().map(|(z, _)| *z).collect();
        assert_eq!(zs, vec![0.0, 25.0, 50.0, 50.0, 75.0, 100.0]);

        let mesh = stack.build().unwrap();
        assert!(mesh.is_closed());
        let expected = PI * (36.0 * 50.0 + 16.0 * 50.0);
        assert_relative_eq!(mesh.signed_volume(), expected, max_relative = 1e-9);
    }

    #[test]
    fn test_profile_stack_extends_past_ends() {
        let profile = PiecewiseProfile::cylinder(40.0, 10.0).unwrap();
        let config = BuildConfig::draft();
        let stack = profile_stack(&profile, -5.0, 45.0, &config, |d| {
            generators::circle(d, &config)
        })
        .unwrap();
        let mesh = stack.build().unwrap();
        let (min, max) = mesh.bounding_box();
        assert_eq!((min.z, max.z), (-5.0, 45.0));
        assert_relative_eq!(mesh.signed_volume(), PI * 25.0 * 50.0, max_relative = 1e-9);
    }

    #[test]
    fn test_profile_stack_propagates_section_errors() {
        let profile = PiecewiseProfile::cylinder(40.0, 10.0).unwrap();
        let err = profile_stack(&profile, 0.0, 40.0, &BuildConfig::draft(), |_| {
            Err(GeomError::not_implemented("section"))
        })
        .unwrap_err();
        assert!(matches!(err, MeshError::Geometry(GeomError::NotImplemented { .. })));
    }

    #[test]
    fn test_map_loops_keeps_topology() {
        let mut stack = CrossSectionStack::new();
        stack.push(0.0, circle(10.0, 16));
        stack.push(5.0, circle(10.0, 16));
        let scaled = stack.map_loops(|_, l| Ok(l.scale(2.0))).unwrap();
        let mesh = scaled.build().unwrap();
        assert_relative_eq!(mesh.signed_volume(), PI * 100.0 * 5.0, max_relative = 1e-9);
    }
}
