//! # Body Synthesis
//!
//! Turns bore and outer profiles plus tone-hole placements into a solid
//! composition tree:
//!
//! ```text
//! union
//! ├── difference
//! │   ├── union(outer, collars...)
//! │   ├── bore
//! │   ├── aperture
//! │   └── union(holes...)
//! ├── plate
//! └── cork
//! ```
//!
//! The body axis is Z, from 0 at the foot to `length`. Tone holes and the
//! embouchure are drilled along +X.

mod plate;
mod stack;

pub use plate::{CorkSpec, EmbouchureSpec};
pub use stack::{inner_stack, inner_top, outer_stack};

use config::constants::CUT_OVERSHOOT;
use glam::DVec3;
use tracing::{debug, info};
use woodwind_geom::{BuildConfig, GeomError, Profile};
use woodwind_mesh::{BspEngine, Mesh};

use crate::backend::{render, MeshBackend, SolidBackend};
use crate::error::ModelResult;
use crate::node::SolidNode;

/// A tone hole: axial position of its centre and its diameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hole {
    pub elevation: f64,
    pub diameter: f64,
}

impl Hole {
    pub fn new(elevation: f64, diameter: f64) -> Self {
        Self {
            elevation,
            diameter,
        }
    }
}

/// Everything needed to synthesize one body.
#[derive(Clone)]
pub struct BodySpec<'a> {
    pub bore: &'a dyn Profile,
    pub outer: &'a dyn Profile,
    pub holes: Vec<Hole>,
    pub length: f64,
    /// Regular-polygon outer surface with this many sides.
    pub outer_facets: Option<u32>,
    /// Collar height above the outer surface and annulus width. Zero
    /// disables collars.
    pub ring_width: f64,
    pub embouchure: Option<EmbouchureSpec>,
    pub cork: Option<CorkSpec>,
}

impl<'a> BodySpec<'a> {
    /// A plain tube of `length` with no holes.
    pub fn new(bore: &'a dyn Profile, outer: &'a dyn Profile, length: f64) -> Self {
        Self {
            bore,
            outer,
            holes: Vec::new(),
            length,
            outer_facets: None,
            ring_width: 0.0,
            embouchure: None,
            cork: None,
        }
    }

    #[must_use]
    pub fn with_holes(mut self, holes: Vec<Hole>) -> Self {
        self.holes = holes;
        self
    }

    #[must_use]
    pub fn with_outer_facets(mut self, facets: u32) -> Self {
        self.outer_facets = Some(facets);
        self
    }

    #[must_use]
    pub fn with_ring_width(mut self, width: f64) -> Self {
        self.ring_width = width;
        self
    }

    #[must_use]
    pub fn with_embouchure(mut self, embouchure: EmbouchureSpec) -> Self {
        self.embouchure = Some(embouchure);
        self
    }

    #[must_use]
    pub fn with_cork(mut self, cork: CorkSpec) -> Self {
        self.cork = Some(cork);
        self
    }

    fn validate(&self) -> ModelResult<()> {
        if !(self.length > 0.0) {
            return Err(GeomError::invalid(
                "length",
                format!("must be positive, got {}", self.length),
            )
            .into());
        }
        if !(self.ring_width >= 0.0) {
            return Err(GeomError::invalid(
                "ring width",
                format!("must not be negative, got {}", self.ring_width),
            )
            .into());
        }
        for hole in &self.holes {
            if !(hole.elevation > 0.0 && hole.elevation < self.length) {
                return Err(GeomError::invalid(
                    "hole elevation",
                    format!("{} is outside (0, {})", hole.elevation, self.length),
                )
                .into());
            }
            if !(hole.diameter > 0.0) {
                return Err(GeomError::invalid(
                    "hole diameter",
                    format!("must be positive, got {}", hole.diameter),
                )
                .into());
            }
        }
        if let Some(embouchure) = &self.embouchure {
            embouchure.validate()?;
        }
        Ok(())
    }

    fn bore_radius(&self, z: f64) -> f64 {
        let d = self.bore.diameters_at(z);
        d.low.min(d.high) / 2.0
    }

    fn outer_radius(&self, z: f64) -> f64 {
        let d = self.outer.diameters_at(z);
        d.low.max(d.high) / 2.0
    }

    /// Builds the composition tree for this body.
    ///
    /// # Errors
    ///
    /// `Geometry` for out-of-range parameters, `Mesh` if a profile cannot be
    /// lofted.
    pub fn synthesize(&self, config: &BuildConfig) -> ModelResult<BodyModel> {
        self.validate()?;
        let facets = config.samples() as u32;

        let outer_mesh = outer_stack(self, config)?.build()?;
        let mut outer = SolidNode::polyhedron(outer_mesh);
        if let Some(sides) = self.outer_facets {
            outer = SolidNode::rotate(
                DVec3::new(0.0, 0.0, 180.0 / f64::from(sides)),
                vec![outer],
            );
        }
        let bore = SolidNode::polyhedron(inner_stack(self, config)?.build()?);

        let mut shell = SolidNode::union(vec![SolidNode::labelled("outer", outer)]);
        let mut holes = SolidNode::union(vec![]);
        for (i, hole) in self.holes.iter().enumerate() {
            if self.ring_width > 0.0 {
                shell.add(SolidNode::labelled(
                    format!("collar {}", i + 1),
                    self.collar(hole, facets),
                ))?;
            }
            holes.add(SolidNode::labelled(
                format!("hole {}", i + 1),
                self.through_hole(hole, facets),
            ))?;
        }

        let mut cut = SolidNode::difference(vec![shell, SolidNode::labelled("bore", bore)]);
        let mut parts = Vec::new();

        if let Some(embouchure) = &self.embouchure {
            let z = embouchure.elevation;
            let reach = self.outer_radius(z) + embouchure.thickness + 2.0 * CUT_OVERSHOOT;
            cut.add(SolidNode::labelled(
                "aperture",
                embouchure.aperture(reach, facets),
            ))?;
            parts.push(SolidNode::labelled(
                "plate",
                embouchure.plate(self.bore, self.outer_radius(z), config)?,
            ));
        }
        if holes.child_count() > 0 {
            cut.add(holes)?;
        }

        if let Some(cork) = &self.cork {
            let start = match &self.embouchure {
                Some(embouchure) => embouchure.elevation + cork.distance,
                None => self.length - cork.length,
            };
            parts.push(SolidNode::labelled(
                "cork",
                cork.plug(start, self.bore_radius(start), config)?,
            ));
        }

        let mut body = SolidNode::union(vec![cut]);
        for part in parts {
            body.add(part)?;
        }

        info!(
            length = self.length,
            holes = self.holes.len(),
            embouchure = self.embouchure.is_some(),
            cork = self.cork.is_some(),
            nodes = body.node_count(),
            "synthesized body"
        );
        Ok(BodyModel { body })
    }

    /// Raised annulus around a hole, from the bore wall to `ring_width`
    /// above the outer surface.
    fn collar(&self, hole: &Hole, facets: u32) -> SolidNode {
        let z = hole.elevation;
        let base = self.bore_radius(z);
        let height = self.outer_radius(z) + self.ring_width - base;
        let inner = hole.diameter / 2.0;
        let outer = inner + self.ring_width;
        debug!(elevation = z, base, height, "collar");

        SolidNode::translate(
            DVec3::new(base, 0.0, z),
            vec![SolidNode::rotate(
                DVec3::new(0.0, 90.0, 0.0),
                vec![SolidNode::difference(vec![
                    SolidNode::cylinder(height, outer, outer, facets),
                    SolidNode::translate(
                        DVec3::new(0.0, 0.0, -CUT_OVERSHOOT),
                        vec![SolidNode::cylinder(
                            height + 2.0 * CUT_OVERSHOOT,
                            inner,
                            inner,
                            facets,
                        )],
                    ),
                ])],
            )],
        )
    }

    /// Cutter from the axis out through the wall and collar.
    fn through_hole(&self, hole: &Hole, facets: u32) -> SolidNode {
        let z = hole.elevation;
        let reach = self.outer_radius(z) + self.ring_width + CUT_OVERSHOOT;
        let radius = hole.diameter / 2.0;
        SolidNode::translate(
            DVec3::new(0.0, 0.0, z),
            vec![SolidNode::rotate(
                DVec3::new(0.0, 90.0, 0.0),
                vec![SolidNode::cylinder(reach, radius, radius, facets)],
            )],
        )
    }
}

/// Result of body synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyModel {
    pub body: SolidNode,
}

impl BodyModel {
    /// Renders the body with any back end.
    pub fn render<B: SolidBackend>(&self, backend: &B) -> ModelResult<B::Output> {
        render(backend, &self.body)
    }

    /// Realizes the body with the default boolean engine.
    pub fn to_mesh(&self) -> ModelResult<Mesh> {
        self.render(&MeshBackend::new(BspEngine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use woodwind_geom::PiecewiseProfile;

    fn profiles() -> (PiecewiseProfile, PiecewiseProfile) {
        (
            PiecewiseProfile::cylinder(200.0, 19.0).unwrap(),
            PiecewiseProfile::cylinder(200.0, 26.0).unwrap(),
        )
    }

    #[test]
    fn test_tree_shape_with_everything() {
        let (bore, outer) = profiles();
        let spec = BodySpec::new(&bore, &outer, 200.0)
            .with_holes(vec![Hole::new(40.0, 8.0), Hole::new(70.0, 9.0)])
            .with_ring_width(1.5)
            .with_embouchure(EmbouchureSpec::new(150.0, 10.0))
            .with_cork(CorkSpec::new(17.0, 10.0, -0.2));
        let model = spec.synthesize(&BuildConfig::draft()).unwrap();

        // union(difference, plate, cork)
        assert_eq!(model.body.kind(), "union");
        assert_eq!(model.body.child_count(), 3);
        let cut = &model.body.children()[0];
        assert_eq!(cut.kind(), "difference");
        // shell, bore, aperture, holes
        assert_eq!(cut.child_count(), 4);
        // outer plus one collar per hole
        assert_eq!(cut.children()[0].child_count(), 3);
        assert_eq!(cut.children()[3].child_count(), 2);
    }

    #[test]
    fn test_zero_holes_skip_empty_groups() {
        let (bore, outer) = profiles();
        let model = BodySpec::new(&bore, &outer, 200.0)
            .synthesize(&BuildConfig::draft())
            .unwrap();
        let cut = &model.body.children()[0];
        assert_eq!(model.body.child_count(), 1);
        assert_eq!(cut.child_count(), 2);
    }

    #[test]
    fn test_faceted_outer_is_rotated_half_a_facet() {
        let (bore, outer) = profiles();
        let model = BodySpec::new(&bore, &outer, 200.0)
            .with_outer_facets(8)
            .synthesize(&BuildConfig::draft())
            .unwrap();
        let shell = &model.body.children()[0].children()[0];
        let outer = &shell.children()[0].children()[0];
        assert_eq!(outer.kind(), "rotate");
        match outer {
            SolidNode::Transform { transform, .. } => {
                assert_eq!(transform.vector(), DVec3::new(0.0, 0.0, 22.5));
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn test_cork_without_embouchure_sits_at_the_top() {
        let (bore, outer) = profiles();
        let model = BodySpec::new(&bore, &outer, 200.0)
            .with_cork(CorkSpec::new(17.0, 10.0, 0.0))
            .synthesize(&BuildConfig::draft())
            .unwrap();
        let cork = &model.body.children()[1];
        let mesh = render(&MeshBackend::new(BspEngine), cork).unwrap();
        let (min, max) = mesh.bounding_box();
        assert!((min.z - 190.0).abs() < 1e-9);
        assert!((max.z - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_hole_outside_body_is_rejected() {
        let (bore, outer) = profiles();
        let result = BodySpec::new(&bore, &outer, 200.0)
            .with_holes(vec![Hole::new(250.0, 8.0)])
            .synthesize(&BuildConfig::draft());
        assert!(matches!(result, Err(ModelError::Geometry(_))));
    }

    #[test]
    fn test_non_positive_length_is_rejected() {
        let (bore, outer) = profiles();
        let result = BodySpec::new(&bore, &outer, 0.0).synthesize(&BuildConfig::draft());
        assert!(result.is_err());
    }
}
