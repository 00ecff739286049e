//! # Polygon for BSP Operations
//!
//! Convex planar polygon with splitting support.

use glam::DVec3;
use woodwind_geom::lerp;

use super::plane::{Classification, Plane};

/// A convex polygon and the plane it lies in.
#[derive(Debug, Clone)]
pub struct Polygon {
    /// Vertices in counter-clockwise order seen from the front.
    vertices: Vec<DVec3>,
    plane: Plane,
}

/// Destination lists for [`Polygon::split`].
#[derive(Debug, Default)]
pub struct SplitParts {
    pub coplanar_front: Vec<Polygon>,
    pub coplanar_back: Vec<Polygon>,
    pub front: Vec<Polygon>,
    pub back: Vec<Polygon>,
}

impl Polygon {
    /// Creates a polygon, deriving the plane from its first three vertices.
    ///
    /// Returns `None` for fewer than three vertices or a degenerate start.
    pub fn new(vertices: Vec<DVec3>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        Some(Self { vertices, plane })
    }

    /// Vertices in winding order.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Supporting plane.
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Reverses winding and plane in place.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane = self.plane.flip();
    }

    /// Splits this polygon by `plane` into `parts`.
    ///
    /// Coplanar polygons go to `coplanar_front` or `coplanar_back` depending
    /// on whether they face the same way as the plane. Spanning polygons are
    /// cut; fragments keep this polygon's plane.
    pub fn split(self, plane: &Plane, parts: &mut SplitParts) {
        let types: Vec<Classification> = self
            .vertices
            .iter()
            .map(|&v| plane.classify_point(v))
            .collect();
        let kind = types
            .iter()
            .fold(Classification::Coplanar, |acc, &t| acc.combine(t));

        match kind {
            Classification::Coplanar => {
                if plane.normal().dot(self.plane.normal()) > 0.0 {
                    parts.coplanar_front.push(self);
                } else {
                    parts.coplanar_back.push(self);
                }
            }
            Classification::Front => parts.front.push(self),
            Classification::Back => parts.back.push(self),
            Classification::Spanning => {
                let n = self.vertices.len();
                let mut front = Vec::with_capacity(n + 1);
                let mut back = Vec::with_capacity(n + 1);

                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (self.vertices[i], self.vertices[j]);

                    if ti != Classification::Back {
                        front.push(vi);
                    }
                    if ti != Classification::Front {
                        back.push(vi);
                    }
                    if ti.combine(tj) == Classification::Spanning {
                        let t = -plane.signed_distance(vi) / plane.normal().dot(vj - vi);
                        let v = lerp(vi, vj, t);
                        front.push(v);
                        back.push(v);
                    }
                }

                if front.len() >= 3 {
                    parts.front.push(Polygon {
                        vertices: front,
                        plane: self.plane,
                    });
                }
                if back.len() >= 3 {
                    parts.back.push(Polygon {
                        vertices: back,
                        plane: self.plane,
                    });
                }
            }
        }
    }
}
