//! # BSP Tree
//!
//! Binary Space Partitioning tree for CSG boolean operations.
//! Based on the csg.js algorithm by Evan Wallace.
//!
//! ## Algorithm
//!
//! Each BSP node contains:
//! - A dividing plane
//! - Polygons coplanar with the plane
//! - Front subtree (polygons in front of plane)
//! - Back subtree (polygons behind plane)
//!
//! ## Operations
//!
//! - `clip_to`: Remove polygons from this tree that are inside another tree
//! - `invert`: Flip all polygons and swap front/back subtrees
//! - `into_polygons`: Collect all polygons from the tree
//!
//! ## Stack Safety
//!
//! Trees over finely lofted bodies get deep, so every operation walks the
//! tree with an explicit work stack instead of recursion.

use super::plane::Plane;
use super::polygon::{Polygon, SplitParts};

/// A node in the BSP tree.
#[derive(Debug, Clone, Default)]
pub struct BspNode {
    plane: Option<Plane>,
    /// Polygons coplanar with this node's plane
    polygons: Vec<Polygon>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Creates a BSP tree from polygons.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut root = Self::default();
        root.build(polygons);
        root
    }

    /// Adds polygons to the tree, splitting them as they descend.
    ///
    /// A node's plane is taken from the first polygon that reaches it.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        let mut work: Vec<(&mut BspNode, Vec<Polygon>)> = vec![(self, polygons)];

        while let Some((node, polygons)) = work.pop() {
            let Some(first) = polygons.first() else {
                continue;
            };
            let plane = *node.plane.get_or_insert(*first.plane());

            let mut parts = SplitParts::default();
            for polygon in polygons {
                polygon.split(&plane, &mut parts);
            }
            node.polygons.append(&mut parts.coplanar_front);
            node.polygons.append(&mut parts.coplanar_back);

            if !parts.front.is_empty() {
                let child = node.front.get_or_insert_with(Box::default);
                work.push((child.as_mut(), parts.front));
            }
            if !parts.back.is_empty() {
                let child = node.back.get_or_insert_with(Box::default);
                work.push((child.as_mut(), parts.back));
            }
        }
    }

    /// Converts solid space to empty space and vice versa.
    pub fn invert(&mut self) {
        let mut stack: Vec<&mut BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            for polygon in &mut node.polygons {
                polygon.flip();
            }
            node.plane = node.plane.map(|plane| plane.flip());
            std::mem::swap(&mut node.front, &mut node.back);

            if let Some(front) = node.front.as_deref_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_deref_mut() {
                stack.push(back);
            }
        }
    }

    /// Removes the parts of `polygons` that lie inside this tree's solid.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack: Vec<(&BspNode, Vec<Polygon>)> = vec![(self, polygons)];

        while let Some((node, polygons)) = stack.pop() {
            let Some(plane) = node.plane else {
                result.extend(polygons);
                continue;
            };

            let mut parts = SplitParts::default();
            for polygon in polygons {
                polygon.split(&plane, &mut parts);
            }
            let mut front = parts.front;
            front.append(&mut parts.coplanar_front);
            let mut back = parts.back;
            back.append(&mut parts.coplanar_back);

            match node.front.as_deref() {
                Some(child) => stack.push((child, front)),
                None => result.extend(front),
            }
            // Without a back subtree the back side is solid: discard.
            if let Some(child) = node.back.as_deref() {
                stack.push((child, back));
            }
        }

        result
    }

    /// Removes every polygon of this tree that lies inside `other`.
    pub fn clip_to(&mut self, other: &BspNode) {
        let mut stack: Vec<&mut BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            node.polygons = other.clip_polygons(std::mem::take(&mut node.polygons));

            if let Some(front) = node.front.as_deref_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_deref_mut() {
                stack.push(back);
            }
        }
    }

    /// Collects copies of all polygons in this tree.
    #[cfg(test)]
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack: Vec<&BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            result.extend(node.polygons.iter().cloned());
            if let Some(front) = node.front.as_deref() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_deref() {
                stack.push(back);
            }
        }

        result
    }

    /// Moves all polygons out of this tree.
    pub fn into_polygons(self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![self];

        while let Some(mut node) = stack.pop() {
            result.append(&mut node.polygons);
            if let Some(front) = node.front.take() {
                stack.push(*front);
            }
            if let Some(back) = node.back.take() {
                stack.push(*back);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn quad(z: f64) -> Polygon {
        Polygon::new(vec![
            DVec3::new(0.0, 0.0, z),
            DVec3::new(1.0, 0.0, z),
            DVec3::new(1.0, 1.0, z),
            DVec3::new(0.0, 1.0, z),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_keeps_all_polygons() {
        let tree = BspNode::new(vec![quad(0.0), quad(1.0), quad(2.0)]);
        assert_eq!(tree.all_polygons().len(), 3);
        assert_eq!(tree.into_polygons().len(), 3);
    }

    #[test]
    fn test_empty_tree_clips_nothing() {
        let tree = BspNode::default();
        assert_eq!(tree.clip_polygons(vec![quad(0.0)]).len(), 1);
    }

    #[test]
    fn test_invert_flips_normals() {
        let mut tree = BspNode::new(vec![quad(0.0)]);
        tree.invert();
        let polygons = tree.all_polygons();
        assert_eq!(polygons[0].plane().normal(), -DVec3::Z);
    }
}
