//! # Mesh Back End
//!
//! Realizes a composition tree into a triangle mesh using a
//! [`BooleanEngine`].

use tracing::{debug, trace};
use woodwind_mesh::{primitives, BooleanEngine, BspEngine, Mesh};

use super::SolidBackend;
use crate::error::{ModelError, ModelResult};
use crate::node::{BooleanOperation, Primitive, Transform};

/// Back end producing meshes.
///
/// Booleans fold left to right: a difference subtracts every later child
/// from the first. Transform groups with several children are unioned
/// before the transform is applied.
#[derive(Debug, Clone)]
pub struct MeshBackend<E: BooleanEngine = BspEngine> {
    engine: E,
}

impl Default for MeshBackend<BspEngine> {
    fn default() -> Self {
        Self::new(BspEngine)
    }
}

impl<E: BooleanEngine> MeshBackend<E> {
    /// Creates a back end over `engine`.
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// The boolean engine in use.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn fold(
        &self,
        operation: BooleanOperation,
        kind: &'static str,
        children: Vec<Mesh>,
    ) -> ModelResult<Mesh> {
        let mut children = children.into_iter();
        let first = children.next().ok_or(ModelError::EmptyGroup { kind })?;

        let result = children.try_fold(first, |acc, next| match operation {
            BooleanOperation::Union => self.engine.union(&acc, &next),
            BooleanOperation::Difference => self.engine.difference(&acc, &next),
            BooleanOperation::Intersection => self.engine.intersection(&acc, &next),
        })?;
        Ok(result)
    }
}

impl<E: BooleanEngine> SolidBackend for MeshBackend<E> {
    type Output = Mesh;

    fn primitive(&self, primitive: &Primitive) -> ModelResult<Mesh> {
        let mesh = match primitive {
            Primitive::Cylinder {
                height,
                radius_bottom,
                radius_top,
                facets,
            } => primitives::cylinder(*height, *radius_bottom, *radius_top, *facets)?,
            Primitive::Block { min, max } => primitives::block(*min, *max)?,
            Primitive::Polyhedron(mesh) => mesh.clone(),
        };
        trace!(
            kind = primitive.name(),
            triangles = mesh.triangle_count(),
            "meshed primitive"
        );
        Ok(mesh)
    }

    fn labelled(&self, name: &str, child: Mesh) -> ModelResult<Mesh> {
        debug!(name, triangles = child.triangle_count(), "rendered part");
        Ok(child)
    }

    fn boolean(&self, operation: BooleanOperation, children: Vec<Mesh>) -> ModelResult<Mesh> {
        let count = children.len();
        let mesh = self.fold(operation, operation.name(), children)?;
        trace!(
            operation = operation.name(),
            children = count,
            triangles = mesh.triangle_count(),
            "applied boolean"
        );
        Ok(mesh)
    }

    fn transform(&self, transform: Transform, children: Vec<Mesh>) -> ModelResult<Mesh> {
        let mut mesh = self.fold(BooleanOperation::Union, transform.name(), children)?;
        mesh.transform(&transform.matrix());
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::render;
    use crate::node::SolidNode;
    use approx::assert_relative_eq;
    use glam::DVec3;

    fn backend() -> MeshBackend {
        MeshBackend::default()
    }

    fn unit_block(at: DVec3) -> SolidNode {
        SolidNode::block(at, at + DVec3::ONE)
    }

    #[test]
    fn test_difference_subtracts_all_later_children() {
        let tree = SolidNode::difference(vec![
            SolidNode::block(DVec3::ZERO, DVec3::new(3.0, 1.0, 1.0)),
            unit_block(DVec3::ZERO),
            unit_block(DVec3::new(2.0, 0.0, 0.0)),
        ]);
        let mesh = render(&backend(), &tree).unwrap();
        assert_relative_eq!(mesh.signed_volume(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_transform_unions_children() {
        let tree = SolidNode::translate(
            DVec3::new(0.0, 0.0, 5.0),
            vec![unit_block(DVec3::ZERO), unit_block(DVec3::new(0.5, 0.0, 0.0))],
        );
        let mesh = render(&backend(), &tree).unwrap();
        assert_relative_eq!(mesh.signed_volume(), 1.5, epsilon = 1e-9);
        let (min, max) = mesh.bounding_box();
        assert_relative_eq!(min.z, 5.0, epsilon = 1e-12);
        assert_relative_eq!(max.z, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mirror_scale_keeps_volume_positive() {
        let tree = SolidNode::scale(DVec3::new(-1.0, 1.0, 1.0), vec![unit_block(DVec3::ZERO)]);
        let mesh = render(&backend(), &tree).unwrap();
        assert_relative_eq!(mesh.signed_volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotated_cylinder_lies_along_x() {
        let tree = SolidNode::rotate(
            DVec3::new(0.0, 90.0, 0.0),
            vec![SolidNode::cylinder(10.0, 1.0, 1.0, 16)],
        );
        let mesh = render(&backend(), &tree).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_relative_eq!(min.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(max.x, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_labelled_is_transparent() {
        let plain = render(&backend(), &unit_block(DVec3::ZERO)).unwrap();
        let named = render(
            &backend(),
            &SolidNode::labelled("cube", unit_block(DVec3::ZERO)),
        )
        .unwrap();
        assert_eq!(plain, named);
    }

    #[test]
    fn test_empty_group_is_an_error() {
        let result = render(&backend(), &SolidNode::union(vec![]));
        assert!(matches!(
            result,
            Err(ModelError::EmptyGroup { kind: "union" })
        ));

        let result = render(
            &backend(),
            &SolidNode::rotate(DVec3::ZERO, vec![]),
        );
        assert!(matches!(
            result,
            Err(ModelError::EmptyGroup { kind: "rotate" })
        ));
    }

    #[test]
    fn test_invalid_primitive_propagates() {
        let result = render(
            &backend(),
            &SolidNode::cylinder(-1.0, 1.0, 1.0, 8),
        );
        assert!(matches!(result, Err(ModelError::Mesh(_))));
    }
}
