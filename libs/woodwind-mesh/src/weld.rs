//! # Tolerance Welding
//!
//! Merges vertices closer than a distance, using a spatial hash with cells
//! twice the tolerance so a match is always in one of the 27 cells around a
//! query point.

use std::collections::HashMap;

use glam::DVec3;

/// Spatial hash that hands out one index per cluster of nearby positions.
///
/// The first position inserted into a cluster becomes its representative.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use woodwind_mesh::weld::VertexWelder;
///
/// let mut welder = VertexWelder::new(1e-6);
/// let a = welder.insert(DVec3::ZERO);
/// let b = welder.insert(DVec3::new(1e-8, 0.0, 0.0));
/// let c = welder.insert(DVec3::X);
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(welder.vertices().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct VertexWelder {
    epsilon: f64,
    cell_size: f64,
    cells: HashMap<(i64, i64, i64), Vec<u32>>,
    vertices: Vec<DVec3>,
}

impl VertexWelder {
    /// Creates a welder merging positions closer than `epsilon`.
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            cell_size: epsilon * 2.0,
            cells: HashMap::new(),
            vertices: Vec::new(),
        }
    }

    fn cell(&self, p: DVec3) -> (i64, i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
            (p.z / self.cell_size).floor() as i64,
        )
    }

    /// Index of an existing vertex within `epsilon` of `p`, if any.
    pub fn find(&self, p: DVec3) -> Option<u32> {
        let (cx, cy, cz) = self.cell(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &index in bucket {
                        if self.vertices[index as usize].distance(p) < self.epsilon {
                            return Some(index);
                        }
                    }
                }
            }
        }
        None
    }

    /// Returns the index of the cluster `p` belongs to, opening a new one
    /// when no vertex is within `epsilon`.
    pub fn insert(&mut self, p: DVec3) -> u32 {
        if let Some(index) = self.find(p) {
            return index;
        }
        let index = self.vertices.len() as u32;
        self.vertices.push(p);
        self.cells.entry(self.cell(p)).or_default().push(index);
        index
    }

    /// Representative positions, indexed by the values `insert` returned.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Consumes the welder, returning the representative positions.
    pub fn into_vertices(self) -> Vec<DVec3> {
        self.vertices
    }
}
