//! # Rendering Back Ends
//!
//! A [`SolidBackend`] turns a [`SolidNode`] tree into some output by a
//! post-order fold: children first, then the parent combines their results.
//!
//! Two back ends ship with the crate:
//!
//! - [`MeshBackend`]: realizes the tree with a boolean engine
//! - [`ScriptEmitter`]: prints the tree as OpenSCAD source
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use woodwind_model::{render, MeshBackend, ScriptEmitter, SolidNode};
//!
//! let tree = SolidNode::difference(vec![
//!     SolidNode::block(DVec3::ZERO, DVec3::splat(2.0)),
//!     SolidNode::block(DVec3::ONE, DVec3::splat(3.0)),
//! ]);
//!
//! let backend: MeshBackend = MeshBackend::default();
//! let mesh = render(&backend, &tree).unwrap();
//! assert!((mesh.signed_volume() - 7.0).abs() < 1e-9);
//!
//! let script = render(&ScriptEmitter::default(), &tree).unwrap();
//! assert!(script.starts_with("difference() {"));
//! ```

mod mesh;
mod script;

pub use mesh::MeshBackend;
pub use script::{to_script, write_script, ScriptEmitter};

use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use stacker::maybe_grow;

use crate::error::ModelResult;
use crate::node::{BooleanOperation, Primitive, SolidNode, Transform};

/// Consumer of a solid composition tree.
///
/// Implementations receive already-rendered children; [`render`] drives
/// the traversal.
pub trait SolidBackend {
    /// What a rendered subtree becomes.
    type Output;

    /// Renders a leaf.
    fn primitive(&self, primitive: &Primitive) -> ModelResult<Self::Output>;

    /// Wraps a rendered child with a name.
    fn labelled(&self, name: &str, child: Self::Output) -> ModelResult<Self::Output>;

    /// Combines rendered children with a boolean operation.
    fn boolean(
        &self,
        operation: BooleanOperation,
        children: Vec<Self::Output>,
    ) -> ModelResult<Self::Output>;

    /// Applies a transform to rendered children.
    fn transform(
        &self,
        transform: Transform,
        children: Vec<Self::Output>,
    ) -> ModelResult<Self::Output>;
}

/// Renders `node` with `backend`.
///
/// Deep trees grow the stack on demand instead of overflowing it.
pub fn render<B>(backend: &B, node: &SolidNode) -> ModelResult<B::Output>
where
    B: SolidBackend + ?Sized,
{
    maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
        render_inner(backend, node)
    })
}

fn render_inner<B>(backend: &B, node: &SolidNode) -> ModelResult<B::Output>
where
    B: SolidBackend + ?Sized,
{
    match node {
        SolidNode::Primitive(primitive) => backend.primitive(primitive),
        SolidNode::Labelled { name, child } => {
            let child = render(backend, child)?;
            backend.labelled(name, child)
        }
        SolidNode::Boolean {
            operation,
            children,
        } => {
            let children = render_children(backend, children)?;
            backend.boolean(*operation, children)
        }
        SolidNode::Transform {
            transform,
            children,
        } => {
            let children = render_children(backend, children)?;
            backend.transform(*transform, children)
        }
    }
}

fn render_children<B>(backend: &B, children: &[SolidNode]) -> ModelResult<Vec<B::Output>>
where
    B: SolidBackend + ?Sized,
{
    children.iter().map(|child| render(backend, child)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    /// Counts leaves, to check traversal without any geometry.
    struct LeafCounter;

    impl SolidBackend for LeafCounter {
        type Output = usize;

        fn primitive(&self, _: &Primitive) -> ModelResult<usize> {
            Ok(1)
        }

        fn labelled(&self, _: &str, child: usize) -> ModelResult<usize> {
            Ok(child)
        }

        fn boolean(&self, _: BooleanOperation, children: Vec<usize>) -> ModelResult<usize> {
            Ok(children.into_iter().sum())
        }

        fn transform(&self, _: Transform, children: Vec<usize>) -> ModelResult<usize> {
            Ok(children.into_iter().sum())
        }
    }

    #[test]
    fn test_render_visits_every_leaf() {
        let leaf = || SolidNode::block(DVec3::ZERO, DVec3::ONE);
        let tree = SolidNode::union(vec![
            leaf(),
            SolidNode::translate(DVec3::X, vec![leaf(), leaf()]),
            SolidNode::labelled("x", leaf()),
        ]);
        assert_eq!(render(&LeafCounter, &tree).unwrap(), 4);
    }

    #[test]
    fn test_render_deep_tree() {
        let mut tree = SolidNode::block(DVec3::ZERO, DVec3::ONE);
        for _ in 0..10_000 {
            tree = SolidNode::translate(DVec3::ZERO, vec![tree]);
        }
        assert_eq!(render(&LeafCounter, &tree).unwrap(), 1);
        // Dropping a deep Box chain recurses too; leak it instead.
        std::mem::forget(tree);
    }
}
