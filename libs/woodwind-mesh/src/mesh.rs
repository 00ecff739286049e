//! # Mesh Data Structure
//!
//! Indexed triangle mesh with outward (counter-clockwise seen from outside)
//! winding.

use std::collections::HashMap;

use config::constants::DEGENERATE_AREA_EPSILON;
use glam::{DMat4, DVec3};

use crate::weld::VertexWelder;

/// A triangle mesh with vertices and indices.
///
/// Built incrementally by the loft builder and primitives, then treated as
/// a value: transformations used by the solid renderer consume and return
/// meshes.
///
/// # Example
///
/// ```rust
/// use woodwind_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    vertices: Vec<DVec3>,
    /// Triangle indices (3 indices per triangle)
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns the triangle at the given index.
    #[inline]
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        self.triangles[index]
    }

    /// Corner positions of every triangle.
    pub fn triangle_positions(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.triangles.iter().map(|&[a, b, c]| {
            [
                self.vertices[a as usize],
                self.vertices[b as usize],
                self.vertices[c as usize],
            ]
        })
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.vertices.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for v in &self.vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }

        (min, max)
    }

    /// Enclosed volume (divergence theorem); positive for outward winding.
    pub fn signed_volume(&self) -> f64 {
        self.triangle_positions()
            .map(|[a, b, c]| a.dot(b.cross(c)))
            .sum::<f64>()
            / 6.0
    }

    /// Number of directed edges whose reverse edge is missing.
    ///
    /// Zero for a closed, consistently wound mesh that shares vertices
    /// between neighbouring triangles.
    pub fn boundary_edge_count(&self) -> usize {
        let mut edges: HashMap<(u32, u32), i64> = HashMap::new();
        for &[a, b, c] in &self.triangles {
            for (from, to) in [(a, b), (b, c), (c, a)] {
                let (key, sign) = if from < to { ((from, to), 1) } else { ((to, from), -1) };
                *edges.entry(key).or_insert(0) += sign;
            }
        }
        edges.values().map(|balance| balance.unsigned_abs() as usize).sum()
    }

    /// True when every edge is matched by its reverse.
    pub fn is_closed(&self) -> bool {
        !self.is_empty() && self.boundary_edge_count() == 0
    }

    /// Transforms all vertices by a 4x4 matrix.
    ///
    /// A mirroring transform (negative determinant) would turn the mesh
    /// inside out, so triangle winding is reversed to keep normals outward.
    pub fn transform(&mut self, matrix: &DMat4) {
        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }
        if matrix.determinant() < 0.0 {
            self.flip_winding();
        }
    }

    /// Translates the mesh by a vector.
    pub fn translate(&mut self, offset: DVec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Reverses every triangle (turns the mesh inside out).
    pub fn flip_winding(&mut self) {
        for tri in &mut self.triangles {
            tri.swap(1, 2);
        }
    }

    /// Merges another mesh into this one.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&other.vertices);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|tri| [tri[0] + offset, tri[1] + offset, tri[2] + offset]),
        );
    }

    /// Merges vertices that share exactly the same position and drops
    /// vertices no triangle uses.
    pub fn weld(&mut self) {
        let mut index_of: HashMap<[u64; 3], u32> = HashMap::new();
        let mut vertices = Vec::with_capacity(self.vertices.len());
        let mut remap = Vec::with_capacity(self.vertices.len());

        let mut used = vec![false; self.vertices.len()];
        for tri in &self.triangles {
            for &i in tri {
                used[i as usize] = true;
            }
        }

        for (v, &used) in self.vertices.iter().zip(&used) {
            if !used {
                remap.push(u32::MAX);
                continue;
            }
            let key = [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()];
            let index = *index_of.entry(key).or_insert_with(|| {
                vertices.push(*v);
                (vertices.len() - 1) as u32
            });
            remap.push(index);
        }

        for tri in &mut self.triangles {
            for i in tri.iter_mut() {
                *i = remap[*i as usize];
            }
        }
        self.vertices = vertices;
    }

    /// Merges vertices closer than `epsilon`, drops triangles that collapse
    /// and vertices no triangle uses. Returns the number of triangles
    /// dropped.
    pub fn weld_within(&mut self, epsilon: f64) -> usize {
        let mut welder = VertexWelder::new(epsilon);
        let remap: Vec<u32> = self.vertices.iter().map(|&v| welder.insert(v)).collect();

        let before = self.triangles.len();
        self.triangles = self
            .triangles
            .iter()
            .map(|tri| tri.map(|i| remap[i as usize]))
            .filter(|&[a, b, c]| a != b && b != c && a != c)
            .collect();
        self.vertices = welder.into_vertices();
        self.weld();
        before - self.triangles.len()
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All triangle indices are valid
    /// - No degenerate triangles (repeated index or zero area)
    ///
    /// Returns true if valid.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        self.triangles.iter().all(|tri| {
            if tri.iter().any(|&i| i >= vertex_count) {
                return false;
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return false;
            }
            let [v0, v1, v2] = tri.map(|i| self.vertices[i as usize]);
            (v1 - v0).cross(v2 - v0).length() >= DEGENERATE_AREA_EPSILON
        })
    }
}
