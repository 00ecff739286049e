//! # Polygon Soup to Closed Mesh
//!
//! BSP fragments of neighbouring faces are split independently, so a vertex
//! created on one side of an edge is usually missing on the other side
//! (a T-junction), and vertices produced by different splits of the same
//! point differ by rounding. Both leave the triangulated soup open.
//!
//! Conversion therefore:
//! 1. welds fragment vertices within [`WELD_EPSILON`],
//! 2. drops rings that collapse to a line or a point,
//! 3. inserts every vertex lying on a ring edge into that edge,
//! 4. triangulates each ring, by fan from a corner when that is clean and
//!    from an added centre vertex otherwise,
//! 5. fans over the small boundary loops left where the BSP dropped a
//!    sliver fragment.

use std::collections::{BTreeMap, HashMap};

use config::constants::{DEGENERATE_AREA_EPSILON, MAX_FILLED_HOLE_EDGES, WELD_EPSILON};
use glam::DVec3;
use tracing::{debug, warn};

use super::polygon::Polygon;
use crate::weld::VertexWelder;
use crate::Mesh;

/// Builds a closed indexed mesh from BSP output polygons.
pub(super) fn polygons_to_mesh(polygons: &[Polygon]) -> Mesh {
    let mut welder = VertexWelder::new(WELD_EPSILON);
    let mut rings: Vec<Vec<u32>> = Vec::with_capacity(polygons.len());

    for polygon in polygons {
        let mut ring: Vec<u32> = Vec::with_capacity(polygon.vertices().len());
        for &v in polygon.vertices() {
            let index = welder.insert(v);
            if ring.last() != Some(&index) {
                ring.push(index);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() >= 3 && ring_area(welder.vertices(), &ring) >= DEGENERATE_AREA_EPSILON {
            rings.push(ring);
        }
    }

    let mut mesh = Mesh::with_capacity(welder.vertices().len(), 2 * rings.len());
    for v in welder.into_vertices() {
        mesh.add_vertex(v);
    }

    let mut splitter = EdgeSplitter::new(mesh.vertices(), &rings);
    let expanded: Vec<(Vec<u32>, bool)> = rings
        .iter()
        .map(|ring| splitter.expand(ring))
        .collect();

    for (ring, split) in &expanded {
        triangulate(&mut mesh, ring, *split);
    }

    let filled = fill_holes(&mut mesh);
    if filled > 0 {
        debug!(filled, "closed boundary loops");
    }

    mesh.weld();
    mesh
}

/// Area of a planar ring, summed as a fan around its first corner.
fn ring_area(vertices: &[DVec3], ring: &[u32]) -> f64 {
    let origin = vertices[ring[0] as usize];
    let normal = ring[1..].windows(2).fold(DVec3::ZERO, |acc, pair| {
        let (b, c) = (vertices[pair[0] as usize], vertices[pair[1] as usize]);
        acc + (b - origin).cross(c - origin)
    });
    normal.length() / 2.0
}

// =============================================================================
// T-JUNCTIONS
// =============================================================================

/// Finds vertices lying strictly inside ring edges.
///
/// Candidates are kept sorted along each axis; an edge scans the slab of the
/// axis along which it is shortest.
struct EdgeSplitter<'a> {
    vertices: &'a [DVec3],
    axes: [Vec<(f64, u32)>; 3],
    cache: HashMap<(u32, u32), Vec<u32>>,
}

impl<'a> EdgeSplitter<'a> {
    fn new(vertices: &'a [DVec3], rings: &[Vec<u32>]) -> Self {
        let mut used = vec![false; vertices.len()];
        for &index in rings.iter().flatten() {
            used[index as usize] = true;
        }

        let axes = [0, 1, 2].map(|axis| {
            let mut sorted: Vec<(f64, u32)> = used
                .iter()
                .enumerate()
                .filter(|&(_, &used)| used)
                .map(|(index, _)| (vertices[index][axis], index as u32))
                .collect();
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
            sorted
        });

        Self {
            vertices,
            axes,
            cache: HashMap::new(),
        }
    }

    /// The ring with on-edge vertices inserted, and whether any were.
    fn expand(&mut self, ring: &[u32]) -> (Vec<u32>, bool) {
        let mut expanded = Vec::with_capacity(ring.len());
        let mut split = false;

        for (k, &a) in ring.iter().enumerate() {
            let b = ring[(k + 1) % ring.len()];
            expanded.push(a);

            let vertices = self.vertices;
            let axes = &self.axes;
            let inner = self
                .cache
                .entry((a.min(b), a.max(b)))
                .or_insert_with(|| on_edge(vertices, axes, a.min(b), a.max(b)));

            split |= !inner.is_empty();
            if a < b {
                expanded.extend_from_slice(inner);
            } else {
                expanded.extend(inner.iter().rev());
            }
        }

        (expanded, split)
    }
}

/// Vertices within [`WELD_EPSILON`] of the open segment `a`-`b`, ordered
/// from `a` to `b`.
fn on_edge(vertices: &[DVec3], axes: &[Vec<(f64, u32)>; 3], a: u32, b: u32) -> Vec<u32> {
    let (pa, pb) = (vertices[a as usize], vertices[b as usize]);
    let d = pb - pa;
    let length_sq = d.length_squared();
    if length_sq == 0.0 {
        return Vec::new();
    }

    let extent = d.abs();
    let axis = if extent.x <= extent.y && extent.x <= extent.z {
        0
    } else if extent.y <= extent.z {
        1
    } else {
        2
    };
    let lo = pa[axis].min(pb[axis]) - WELD_EPSILON;
    let hi = pa[axis].max(pb[axis]) + WELD_EPSILON;

    let sorted = &axes[axis];
    let start = sorted.partition_point(|&(key, _)| key < lo);
    let end = sorted.partition_point(|&(key, _)| key <= hi);

    let mut hits: Vec<(f64, u32)> = sorted[start..end]
        .iter()
        .filter_map(|&(_, c)| {
            if c == a || c == b {
                return None;
            }
            let pc = vertices[c as usize];
            let t = (pc - pa).dot(d) / length_sq;
            if !(t > 0.0 && t < 1.0) {
                return None;
            }
            (pc.distance(pa + d * t) < WELD_EPSILON).then_some((t, c))
        })
        .collect();

    hits.sort_by(|x, y| x.0.total_cmp(&y.0));
    hits.into_iter().map(|(_, c)| c).collect()
}

// =============================================================================
// TRIANGULATION
// =============================================================================

/// Triangulates a convex ring whose edges may carry collinear vertices.
fn triangulate(mesh: &mut Mesh, ring: &[u32], split: bool) {
    if !split && fan_is_clean(mesh.vertices(), ring) {
        for k in 1..ring.len() - 1 {
            mesh.add_triangle(ring[0], ring[k], ring[k + 1]);
        }
        return;
    }

    let sum = ring
        .iter()
        .fold(DVec3::ZERO, |acc, &i| acc + mesh.vertex(i));
    let centre = mesh.add_vertex(sum / ring.len() as f64);
    for (k, &a) in ring.iter().enumerate() {
        let b = ring[(k + 1) % ring.len()];
        mesh.add_triangle(centre, a, b);
    }
}

/// True when fanning from the first corner creates no sliver triangle.
fn fan_is_clean(vertices: &[DVec3], ring: &[u32]) -> bool {
    let origin = vertices[ring[0] as usize];
    ring[1..].windows(2).all(|pair| {
        let (b, c) = (vertices[pair[0] as usize], vertices[pair[1] as usize]);
        (b - origin).cross(c - origin).length() >= DEGENERATE_AREA_EPSILON
    })
}

// =============================================================================
// HOLES
// =============================================================================

/// Closes boundary loops of up to [`MAX_FILLED_HOLE_EDGES`] edges.
///
/// A directed edge without its reverse borders a hole that runs the other
/// way; each traced hole is fanned from its first vertex. Returns the number
/// of loops filled.
fn fill_holes(mesh: &mut Mesh) -> usize {
    let mut balance: HashMap<(u32, u32), i64> = HashMap::new();
    for &[a, b, c] in mesh.triangles() {
        for (from, to) in [(a, b), (b, c), (c, a)] {
            *balance.entry((from, to)).or_insert(0) += 1;
            *balance.entry((to, from)).or_insert(0) -= 1;
        }
    }

    let mut open: Vec<(u32, u32)> = balance
        .iter()
        .filter(|&(_, &count)| count > 0)
        .flat_map(|(&edge, &count)| std::iter::repeat(edge).take(count as usize))
        .collect();
    if open.is_empty() {
        return 0;
    }
    open.sort_unstable();

    // Hole edges run against the open mesh edges.
    let mut next: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for &(from, to) in &open {
        next.entry(to).or_default().push(from);
    }

    let starts: Vec<u32> = next.keys().copied().collect();
    let mut filled = 0;
    for start in starts {
        while next.get(&start).is_some_and(|targets| !targets.is_empty()) {
            match trace_hole(&mut next, start) {
                Some(hole) if hole.len() >= 3 => {
                    for k in 1..hole.len() - 1 {
                        mesh.add_triangle(hole[0], hole[k], hole[k + 1]);
                    }
                    filled += 1;
                }
                _ => warn!(start, "boundary loop left open"),
            }
        }
    }
    filled
}

/// Follows hole edges from `start` back to it, consuming them.
///
/// `None` when the walk dead-ends or grows past [`MAX_FILLED_HOLE_EDGES`].
fn trace_hole(next: &mut BTreeMap<u32, Vec<u32>>, start: u32) -> Option<Vec<u32>> {
    let mut hole = vec![start];
    let mut current = start;
    loop {
        let to = next.get_mut(&current)?.pop()?;
        if to == start {
            return Some(hole);
        }
        if hole.len() >= MAX_FILLED_HOLE_EDGES {
            return None;
        }
        hole.push(to);
        current = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(corners: [[f64; 3]; 4]) -> Polygon {
        Polygon::new(corners.iter().map(|&c| DVec3::from_array(c)).collect()).unwrap()
    }

    #[test]
    fn test_t_junction_is_closed_by_insertion() {
        // Unit cube whose +X face is split in two along z = 0.5 while the
        // top and bottom faces still span the whole edge.
        let polygons = vec![
            quad([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]]),
            quad([[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]]),
            quad([[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]]),
            quad([[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 0.5], [1.0, 0.0, 0.5]]),
            quad([[1.0, 0.0, 0.5], [1.0, 1.0, 0.5], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]]),
            quad([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]]),
            quad([[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]]),
        ];

        let mesh = polygons_to_mesh(&polygons);
        assert!(mesh.is_closed());
        assert_eq!(mesh.boundary_edge_count(), 0);
        assert!((mesh.signed_volume() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rounding_noise_is_welded() {
        let noise = 1e-9;
        let polygons = vec![
            Polygon::new(vec![DVec3::ZERO, DVec3::Y, DVec3::X]).unwrap(),
            Polygon::new(vec![DVec3::new(noise, 0.0, 0.0), DVec3::X, DVec3::Z]).unwrap(),
            Polygon::new(vec![DVec3::ZERO, DVec3::Z, DVec3::new(0.0, 1.0, noise)]).unwrap(),
            Polygon::new(vec![DVec3::X, DVec3::Y, DVec3::Z]).unwrap(),
        ];

        let mesh = polygons_to_mesh(&polygons);
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.is_closed());
    }

    #[test]
    fn test_missing_fragment_is_patched() {
        let tri = |corners: [[f64; 3]; 3]| {
            Polygon::new(corners.iter().map(|&c| DVec3::from_array(c)).collect()).unwrap()
        };
        // Unit cube whose top face lost one of its two triangles.
        let polygons = vec![
            quad([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]]),
            tri([[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0]]),
            quad([[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]]),
            quad([[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]]),
            quad([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]]),
            quad([[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]]),
        ];

        let mesh = polygons_to_mesh(&polygons);
        assert!(mesh.is_closed());
        assert!((mesh.signed_volume() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_collapsed_rings_are_dropped() {
        // Three points on a line up to rounding.
        let line = Polygon::new(vec![DVec3::ZERO, DVec3::X, DVec3::new(2.0, 1e-13, 0.0)]).unwrap();
        // Two corners closer than the weld distance.
        let needle = Polygon::new(vec![DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1e-8, 0.0)]).unwrap();

        let mesh = polygons_to_mesh(&[line, needle]);
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }
}
