//! # Primitives
//!
//! Meshes for the solid primitives: cylinders and cones along +Z, and
//! axis-aligned blocks. Both follow OpenSCAD placement (`cylinder` base on
//! z = 0, vertex 0 on +X) so the mesh and script back ends agree.

use std::f64::consts::TAU;

use config::constants::MIN_QUALITY;
use glam::DVec3;

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;

/// Creates a cylinder or cone from z = 0 to z = `height`.
///
/// # Arguments
///
/// * `height` - Height along Z axis
/// * `radius_bottom` - Radius at z = 0
/// * `radius_top` - Radius at z = height
/// * `facets` - Number of segments around circumference
///
/// # Example
///
/// ```rust
/// use woodwind_mesh::primitives::cylinder;
///
/// let mesh = cylinder(10.0, 5.0, 5.0, 32).unwrap();
/// assert_eq!(mesh.vertex_count(), 64);
///
/// // Cone (r2 = 0)
/// let cone = cylinder(10.0, 5.0, 0.0, 32).unwrap();
/// assert_eq!(cone.vertex_count(), 33);
/// ```
pub fn cylinder(height: f64, radius_bottom: f64, radius_top: f64, facets: u32) -> MeshResult<Mesh> {
    if !(height > 0.0) {
        return Err(MeshError::degenerate(format!(
            "cylinder height must be positive: {height}"
        )));
    }
    if !(radius_bottom >= 0.0 && radius_top >= 0.0) {
        return Err(MeshError::degenerate(format!(
            "cylinder radii must be non-negative: r1={radius_bottom}, r2={radius_top}"
        )));
    }
    if radius_bottom == 0.0 && radius_top == 0.0 {
        return Err(MeshError::degenerate(
            "cylinder must have at least one non-zero radius",
        ));
    }
    if facets < MIN_QUALITY {
        return Err(MeshError::degenerate(format!(
            "cylinder needs at least 3 facets: {facets}"
        )));
    }

    let segments = facets as usize;
    let mut mesh = Mesh::with_capacity(2 * segments, 4 * segments);

    // A zero radius collapses that end to a single apex vertex.
    let mut ring = |radius: f64, z: f64| -> Vec<u32> {
        if radius > 0.0 {
            (0..segments)
                .map(|j| {
                    let theta = TAU * j as f64 / segments as f64;
                    mesh.add_vertex(DVec3::new(radius * theta.cos(), radius * theta.sin(), z))
                })
                .collect()
        } else {
            vec![mesh.add_vertex(DVec3::new(0.0, 0.0, z))]
        }
    };
    let bottom = ring(radius_bottom, 0.0);
    let top = ring(radius_top, height);

    let at = |ring: &[u32], j: usize| ring[j % ring.len()];
    for j in 0..segments {
        let (b0, b1) = (at(&bottom, j), at(&bottom, j + 1));
        let (t0, t1) = (at(&top, j), at(&top, j + 1));
        if b0 != b1 {
            mesh.add_triangle(b0, b1, t1);
        }
        if t0 != t1 {
            mesh.add_triangle(b0, t1, t0);
        }
    }

    if bottom.len() > 1 {
        for j in 1..segments - 1 {
            mesh.add_triangle(bottom[0], bottom[j + 1], bottom[j]);
        }
    }
    if top.len() > 1 {
        for j in 1..segments - 1 {
            mesh.add_triangle(top[0], top[j], top[j + 1]);
        }
    }

    Ok(mesh)
}

/// Creates an axis-aligned block between two corners.
///
/// # Returns
///
/// A mesh with 8 vertices and 12 triangles (2 per face).
pub fn block(min: DVec3, max: DVec3) -> MeshResult<Mesh> {
    let size = max - min;
    if !(size.x > 0.0 && size.y > 0.0 && size.z > 0.0) {
        return Err(MeshError::degenerate(format!(
            "block size must be positive: {size:?}"
        )));
    }

    let mut mesh = Mesh::with_capacity(8, 12);

    // Bottom face (z = min.z)
    let v0 = mesh.add_vertex(DVec3::new(min.x, min.y, min.z));
    let v1 = mesh.add_vertex(DVec3::new(max.x, min.y, min.z));
    let v2 = mesh.add_vertex(DVec3::new(max.x, max.y, min.z));
    let v3 = mesh.add_vertex(DVec3::new(min.x, max.y, min.z));

    // Top face (z = max.z)
    let v4 = mesh.add_vertex(DVec3::new(min.x, min.y, max.z));
    let v5 = mesh.add_vertex(DVec3::new(max.x, min.y, max.z));
    let v6 = mesh.add_vertex(DVec3::new(max.x, max.y, max.z));
    let v7 = mesh.add_vertex(DVec3::new(min.x, max.y, max.z));

    // Counter-clockwise seen from outside each face.
    mesh.add_triangle(v0, v2, v1);
    mesh.add_triangle(v0, v3, v2);
    mesh.add_triangle(v4, v5, v6);
    mesh.add_triangle(v4, v6, v7);
    mesh.add_triangle(v0, v1, v5);
    mesh.add_triangle(v0, v5, v4);
    mesh.add_triangle(v2, v3, v7);
    mesh.add_triangle(v2, v7, v6);
    mesh.add_triangle(v3, v0, v4);
    mesh.add_triangle(v3, v4, v7);
    mesh.add_triangle(v1, v2, v6);
    mesh.add_triangle(v1, v6, v5);

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Volume of a regular n-gon prism frustum.
    fn prism_volume(height: f64, r1: f64, r2: f64, n: u32) -> f64 {
        let k = n as f64 / 2.0 * (TAU / n as f64).sin();
        height / 3.0 * k * (r1 * r1 + r1 * r2 + r2 * r2)
    }

    #[test]
    fn test_cylinder_is_closed_and_outward() {
        let mesh = cylinder(10.0, 5.0, 5.0, 32).unwrap();
        assert!(mesh.validate());
        assert!(mesh.is_closed());
        assert_relative_eq!(mesh.signed_volume(), prism_volume(10.0, 5.0, 5.0, 32), max_relative = 1e-12);
    }

    #[test]
    fn test_cylinder_bounds() {
        let mesh = cylinder(10.0, 5.0, 3.0, 16).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_eq!(min.z, 0.0);
        assert_eq!(max.z, 10.0);
        assert_eq!(max.x, 5.0);
    }

    #[test]
    fn test_cones() {
        let cone = cylinder(6.0, 2.0, 0.0, 12).unwrap();
        assert!(cone.is_closed());
        assert_eq!(cone.triangle_count(), 12 + 10);
        assert_relative_eq!(cone.signed_volume(), prism_volume(6.0, 2.0, 0.0, 12), max_relative = 1e-12);

        let inverted = cylinder(6.0, 0.0, 2.0, 12).unwrap();
        assert!(inverted.is_closed());
        assert!(inverted.signed_volume() > 0.0);
    }

    #[test]
    fn test_cylinder_validation() {
        assert!(cylinder(0.0, 1.0, 1.0, 8).is_err());
        assert!(cylinder(1.0, -1.0, 1.0, 8).is_err());
        assert!(cylinder(1.0, 0.0, 0.0, 8).is_err());
        assert!(cylinder(1.0, 1.0, 1.0, MIN_QUALITY - 1).is_err());
        assert!(cylinder(1.0, 1.0, 1.0, MIN_QUALITY).is_ok());
    }

    #[test]
    fn test_block() {
        let mesh = block(DVec3::new(-1.0, -2.0, 0.0), DVec3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.is_closed());
        assert_relative_eq!(mesh.signed_volume(), 24.0, epsilon = 1e-12);
        assert!(block(DVec3::ZERO, DVec3::new(1.0, 0.0, 1.0)).is_err());
    }
}
