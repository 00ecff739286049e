//! # Boolean Operations (CSG)
//!
//! Boolean solid operations behind the [`BooleanEngine`] capability.
//!
//! The solid renderer only needs "union / difference / intersection of two
//! closed meshes"; any engine providing that can be plugged in. The crate
//! ships [`BspEngine`], a BSP-tree engine.
//!
//! ## Algorithm
//!
//! Based on the csg.js algorithm by Evan Wallace:
//! - Union: A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); combine
//! - Difference: A.invert(); A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); combine; invert
//! - Intersection: A.invert(); B.clipTo(A); B.invert(); A.clipTo(B); B.clipTo(A); combine; invert
//!
//! The resulting polygon soup is turned back into a shared-vertex mesh by
//! the `repair` module.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use woodwind_mesh::primitives::block;
//! use woodwind_mesh::{BooleanEngine, BspEngine};
//!
//! let a = block(DVec3::ZERO, DVec3::splat(2.0)).unwrap();
//! let b = block(DVec3::splat(1.0), DVec3::splat(3.0)).unwrap();
//! let overlap = BspEngine.intersection(&a, &b).unwrap();
//! assert!((overlap.signed_volume() - 1.0).abs() < 1e-9);
//! ```

mod bsp;
mod plane;
mod polygon;
mod repair;


use tracing::debug;

use crate::error::MeshResult;
use crate::Mesh;
use bsp::BspNode;
use polygon::Polygon;
use repair::polygons_to_mesh;

// =============================================================================
// CAPABILITY
// =============================================================================

/// Boolean operations on closed, outward-wound triangle meshes.
pub trait BooleanEngine: Send + Sync {
    /// Everything inside `a` or `b`.
    fn union(&self, a: &Mesh, b: &Mesh) -> MeshResult<Mesh>;

    /// Everything inside `a` but not `b`.
    fn difference(&self, a: &Mesh, b: &Mesh) -> MeshResult<Mesh>;

    /// Everything inside both `a` and `b`.
    fn intersection(&self, a: &Mesh, b: &Mesh) -> MeshResult<Mesh>;
}

// =============================================================================
// BSP ENGINE
// =============================================================================

/// BSP-tree boolean engine.
///
/// Closed, outward-wound inputs give closed, outward-wound results:
/// fragment vertices are welded and T-junctions between neighbouring
/// fragments are split before re-triangulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BspEngine;

impl BooleanEngine for BspEngine {
    fn union(&self, a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
        let polys_a = mesh_to_polygons(a);
        let polys_b = mesh_to_polygons(b);
        debug!(a = polys_a.len(), b = polys_b.len(), "bsp union");

        if polys_a.is_empty() {
            return Ok(b.clone());
        }
        if polys_b.is_empty() {
            return Ok(a.clone());
        }

        let mut bsp_a = BspNode::new(polys_a);
        let mut bsp_b = BspNode::new(polys_b);

        bsp_a.clip_to(&bsp_b);
        bsp_b.clip_to(&bsp_a);
        bsp_b.invert();
        bsp_b.clip_to(&bsp_a);
        bsp_b.invert();

        let mut result = bsp_a.into_polygons();
        result.extend(bsp_b.into_polygons());
        Ok(polygons_to_mesh(&result))
    }

    fn difference(&self, a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
        let polys_a = mesh_to_polygons(a);
        let polys_b = mesh_to_polygons(b);
        debug!(a = polys_a.len(), b = polys_b.len(), "bsp difference");

        if polys_a.is_empty() {
            return Ok(Mesh::new());
        }
        if polys_b.is_empty() {
            return Ok(a.clone());
        }

        let mut bsp_a = BspNode::new(polys_a);
        let mut bsp_b = BspNode::new(polys_b);

        bsp_a.invert();
        bsp_a.clip_to(&bsp_b);
        bsp_b.clip_to(&bsp_a);
        bsp_b.invert();
        bsp_b.clip_to(&bsp_a);
        bsp_b.invert();

        let mut result = bsp_a.into_polygons();
        result.extend(bsp_b.into_polygons());
        invert_all(&mut result);
        Ok(polygons_to_mesh(&result))
    }

    fn intersection(&self, a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
        let polys_a = mesh_to_polygons(a);
        let polys_b = mesh_to_polygons(b);
        debug!(a = polys_a.len(), b = polys_b.len(), "bsp intersection");

        if polys_a.is_empty() || polys_b.is_empty() {
            return Ok(Mesh::new());
        }

        let mut bsp_a = BspNode::new(polys_a);
        let mut bsp_b = BspNode::new(polys_b);

        bsp_a.invert();
        bsp_b.clip_to(&bsp_a);
        bsp_b.invert();
        bsp_a.clip_to(&bsp_b);
        bsp_b.clip_to(&bsp_a);

        let mut result = bsp_a.into_polygons();
        result.extend(bsp_b.into_polygons());
        invert_all(&mut result);
        Ok(polygons_to_mesh(&result))
    }
}

// =============================================================================
// CONVERSION HELPERS
// =============================================================================

fn invert_all(polygons: &mut [Polygon]) {
    for polygon in polygons {
        polygon.flip();
    }
}

/// One polygon per non-degenerate triangle.
fn mesh_to_polygons(mesh: &Mesh) -> Vec<Polygon> {
    mesh.triangle_positions()
        .filter_map(|corners| Polygon::new(corners.to_vec()))
        .collect()
}
