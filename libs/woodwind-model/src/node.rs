//! # Solid Composition Tree
//!
//! Back-end independent description of a solid. Leaves are primitives,
//! interior nodes are booleans and transforms. A tree is rendered by a
//! [`SolidBackend`](crate::backend::SolidBackend) into a mesh or into
//! OpenSCAD source.

use glam::{DMat4, DVec3};
use woodwind_mesh::Mesh;

use crate::error::{ModelError, ModelResult};

/// A leaf solid.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Cylinder or cone along +Z, base on z = 0, vertex 0 on +X.
    Cylinder {
        height: f64,
        radius_bottom: f64,
        radius_top: f64,
        facets: u32,
    },

    /// Axis-aligned box between two corners.
    Block { min: DVec3, max: DVec3 },

    /// An already realized mesh, for example a lofted cross-section stack.
    Polyhedron(Mesh),
}

impl Primitive {
    /// Name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Cylinder { .. } => "cylinder",
            Primitive::Block { .. } => "block",
            Primitive::Polyhedron(_) => "polyhedron",
        }
    }
}

/// Boolean operation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperation {
    /// Combine all children into one shape.
    Union,
    /// Subtract subsequent children from the first.
    Difference,
    /// Keep only the overlapping volume.
    Intersection,
}

impl BooleanOperation {
    /// OpenSCAD module name.
    pub fn name(self) -> &'static str {
        match self {
            BooleanOperation::Union => "union",
            BooleanOperation::Difference => "difference",
            BooleanOperation::Intersection => "intersection",
        }
    }
}

/// Affine transform applied to a group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Move by an offset.
    Translate(DVec3),
    /// Rotate by Euler angles in degrees, applied X then Y then Z.
    Rotate(DVec3),
    /// Scale per axis.
    Scale(DVec3),
}

impl Transform {
    /// OpenSCAD module name.
    pub fn name(self) -> &'static str {
        match self {
            Transform::Translate(_) => "translate",
            Transform::Rotate(_) => "rotate",
            Transform::Scale(_) => "scale",
        }
    }

    /// The argument vector.
    pub fn vector(self) -> DVec3 {
        match self {
            Transform::Translate(v) | Transform::Rotate(v) | Transform::Scale(v) => v,
        }
    }

    /// Homogeneous matrix for this transform.
    ///
    /// Rotation matches OpenSCAD: `Rz * Ry * Rx`.
    pub fn matrix(self) -> DMat4 {
        match self {
            Transform::Translate(offset) => DMat4::from_translation(offset),
            Transform::Rotate(degrees) => {
                DMat4::from_rotation_z(degrees.z.to_radians())
                    * DMat4::from_rotation_y(degrees.y.to_radians())
                    * DMat4::from_rotation_x(degrees.x.to_radians())
            }
            Transform::Scale(factors) => DMat4::from_scale(factors),
        }
    }
}

/// A node in the solid composition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SolidNode {
    // =========================================================================
    // LEAVES
    // =========================================================================

    /// A primitive solid.
    Primitive(Primitive),

    // =========================================================================
    // ANNOTATION
    // =========================================================================

    /// A child carrying a human-readable name. Emitted as a comment by the
    /// script back end, transparent for meshing.
    Labelled { name: String, child: Box<SolidNode> },

    // =========================================================================
    // GROUPS
    // =========================================================================

    /// Boolean operation on children.
    Boolean {
        operation: BooleanOperation,
        children: Vec<SolidNode>,
    },

    /// Transform applied to the union of the children.
    Transform {
        transform: Transform,
        children: Vec<SolidNode>,
    },
}

impl SolidNode {
    /// Cylinder or cone along +Z.
    pub fn cylinder(height: f64, radius_bottom: f64, radius_top: f64, facets: u32) -> Self {
        SolidNode::Primitive(Primitive::Cylinder {
            height,
            radius_bottom,
            radius_top,
            facets,
        })
    }

    /// Axis-aligned box.
    pub fn block(min: DVec3, max: DVec3) -> Self {
        SolidNode::Primitive(Primitive::Block { min, max })
    }

    /// Realized mesh leaf.
    pub fn polyhedron(mesh: Mesh) -> Self {
        SolidNode::Primitive(Primitive::Polyhedron(mesh))
    }

    /// Named wrapper around `child`.
    pub fn labelled(name: impl Into<String>, child: SolidNode) -> Self {
        SolidNode::Labelled {
            name: name.into(),
            child: Box::new(child),
        }
    }

    pub fn union(children: Vec<SolidNode>) -> Self {
        Self::boolean(BooleanOperation::Union, children)
    }

    pub fn difference(children: Vec<SolidNode>) -> Self {
        Self::boolean(BooleanOperation::Difference, children)
    }

    pub fn intersection(children: Vec<SolidNode>) -> Self {
        Self::boolean(BooleanOperation::Intersection, children)
    }

    pub fn boolean(operation: BooleanOperation, children: Vec<SolidNode>) -> Self {
        SolidNode::Boolean {
            operation,
            children,
        }
    }

    pub fn translate(offset: DVec3, children: Vec<SolidNode>) -> Self {
        Self::transform(Transform::Translate(offset), children)
    }

    /// Rotation by Euler angles in degrees.
    pub fn rotate(degrees: DVec3, children: Vec<SolidNode>) -> Self {
        Self::transform(Transform::Rotate(degrees), children)
    }

    pub fn scale(factors: DVec3, children: Vec<SolidNode>) -> Self {
        Self::transform(Transform::Scale(factors), children)
    }

    pub fn transform(transform: Transform, children: Vec<SolidNode>) -> Self {
        SolidNode::Transform {
            transform,
            children,
        }
    }

    /// Node kind used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            SolidNode::Primitive(primitive) => primitive.name(),
            SolidNode::Labelled { .. } => "labelled",
            SolidNode::Boolean { operation, .. } => operation.name(),
            SolidNode::Transform { transform, .. } => transform.name(),
        }
    }

    /// Returns true for booleans and transforms.
    pub fn is_group(&self) -> bool {
        matches!(
            self,
            SolidNode::Boolean { .. } | SolidNode::Transform { .. }
        )
    }

    /// Appends a child to a group node.
    ///
    /// # Errors
    ///
    /// `NotAGroup` for primitives and labels.
    pub fn add(&mut self, child: SolidNode) -> ModelResult<()> {
        match self {
            SolidNode::Boolean { children, .. } | SolidNode::Transform { children, .. } => {
                children.push(child);
                Ok(())
            }
            other => Err(ModelError::NotAGroup { kind: other.kind() }),
        }
    }

    /// Direct children of this node.
    pub fn children(&self) -> &[SolidNode] {
        match self {
            SolidNode::Primitive(_) => &[],
            SolidNode::Labelled { child, .. } => std::slice::from_ref(child.as_ref()),
            SolidNode::Boolean { children, .. } | SolidNode::Transform { children, .. } => {
                children
            }
        }
    }

    /// Returns the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Total number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }
}
