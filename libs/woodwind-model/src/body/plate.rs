//! Embouchure plate, aperture and cork plug.

use config::constants::CUT_OVERSHOOT;
use glam::DVec3;
use woodwind_geom::{generators, BuildConfig, GeomError, Profile};
use woodwind_mesh::{profile_stack, CrossSectionStack};

use crate::error::ModelResult;
use crate::node::SolidNode;

/// Embouchure hole and the lip plate around it.
///
/// The aperture is drilled along +X at `elevation`. The plate is an oval
/// patch `plate_length` long (axially) and `plate_width` wide, raised
/// `thickness` above the outer surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbouchureSpec {
    pub elevation: f64,
    /// Aperture diameter across the body.
    pub diameter: f64,
    /// Axial size of the aperture over its width; 1.0 is round.
    pub eccentricity: f64,
    /// Tilt of the aperture axis in degrees, leaning toward -Z.
    pub undercut: f64,
    pub plate_length: f64,
    pub plate_width: f64,
    pub thickness: f64,
}

impl EmbouchureSpec {
    /// Round, straight aperture with a plate sized from its diameter.
    pub fn new(elevation: f64, diameter: f64) -> Self {
        Self {
            elevation,
            diameter,
            eccentricity: 1.0,
            undercut: 0.0,
            plate_length: 3.0 * diameter,
            plate_width: 2.5 * diameter,
            thickness: 3.0,
        }
    }

    #[must_use]
    pub fn with_eccentricity(mut self, eccentricity: f64) -> Self {
        self.eccentricity = eccentricity;
        self
    }

    #[must_use]
    pub fn with_undercut(mut self, degrees: f64) -> Self {
        self.undercut = degrees;
        self
    }

    #[must_use]
    pub fn with_plate(mut self, length: f64, width: f64, thickness: f64) -> Self {
        self.plate_length = length;
        self.plate_width = width;
        self.thickness = thickness;
        self
    }

    pub(crate) fn validate(&self) -> ModelResult<()> {
        for (name, value) in [
            ("embouchure diameter", self.diameter),
            ("eccentricity", self.eccentricity),
            ("plate length", self.plate_length),
            ("plate width", self.plate_width),
            ("plate thickness", self.thickness),
        ] {
            if !(value > 0.0) {
                return Err(
                    GeomError::invalid(name, format!("must be positive, got {value}")).into(),
                );
            }
        }
        if !(self.undercut.abs() < 90.0) {
            return Err(GeomError::invalid(
                "undercut",
                format!("must be within (-90, 90) degrees, got {}", self.undercut),
            )
            .into());
        }
        Ok(())
    }

    /// Cutter for the aperture, reaching from the axis to `reach` along +X.
    pub fn aperture(&self, reach: f64, facets: u32) -> SolidNode {
        let radius = self.diameter / 2.0;
        let drilled = SolidNode::rotate(
            DVec3::new(0.0, 90.0, 0.0),
            vec![SolidNode::cylinder(reach, radius, radius, facets)],
        );
        let shaped = SolidNode::scale(DVec3::new(1.0, 1.0, self.eccentricity), vec![drilled]);
        SolidNode::translate(
            DVec3::new(0.0, 0.0, self.elevation),
            vec![SolidNode::rotate(
                DVec3::new(0.0, self.undercut, 0.0),
                vec![shaped],
            )],
        )
    }

    /// Lip plate between the bore wall and `outer_radius + thickness`,
    /// trimmed to an oval and pierced by the aperture.
    ///
    /// The plate is hollowed by `bore` lofted with the same cross-sections
    /// as the bore itself, so its inner wall coincides with the bore. The
    /// oval cutter runs through the body, so it also leaves a mirror image
    /// of the plate on the -X side.
    ///
    /// # Errors
    ///
    /// `Mesh` or `Geometry` if the bore section cannot be lofted.
    pub fn plate(
        &self,
        bore: &dyn Profile,
        outer_radius: f64,
        config: &BuildConfig,
    ) -> ModelResult<SolidNode> {
        let facets = config.samples() as u32;
        let top = outer_radius + self.thickness;
        let half = self.plate_length / 2.0;

        let hollow = profile_stack(
            bore,
            self.elevation - half - 2.0 * CUT_OVERSHOOT,
            self.elevation + half + 2.0 * CUT_OVERSHOOT,
            config,
            |d| generators::circle(d, config),
        )?
        .build()?;

        let tube = SolidNode::difference(vec![
            SolidNode::translate(
                DVec3::new(0.0, 0.0, self.elevation - half - CUT_OVERSHOOT),
                vec![SolidNode::cylinder(
                    self.plate_length + 2.0 * CUT_OVERSHOOT,
                    top,
                    top,
                    facets,
                )],
            ),
            SolidNode::polyhedron(hollow),
        ]);

        let reach = top + CUT_OVERSHOOT;
        let oval = SolidNode::translate(
            DVec3::new(0.0, 0.0, self.elevation),
            vec![SolidNode::scale(
                DVec3::new(1.0, self.plate_width / self.plate_length, 1.0),
                vec![SolidNode::rotate(
                    DVec3::new(0.0, 90.0, 0.0),
                    vec![SolidNode::translate(
                        DVec3::new(0.0, 0.0, -reach),
                        vec![SolidNode::cylinder(2.0 * reach, half, half, facets)],
                    )],
                )],
            )],
        );

        Ok(SolidNode::difference(vec![
            SolidNode::intersection(vec![tube, oval]),
            self.aperture(reach + CUT_OVERSHOOT, facets),
        ]))
    }
}

/// Plug closing the bore above the embouchure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorkSpec {
    /// Distance from the embouchure centre to the cork face.
    pub distance: f64,
    pub length: f64,
    /// Added to the bore radius; negative for a sliding fit.
    pub clearance: f64,
}

impl CorkSpec {
    pub fn new(distance: f64, length: f64, clearance: f64) -> Self {
        Self {
            distance,
            length,
            clearance,
        }
    }

    /// Cork cylinder starting at `start` in a bore of `bore_radius`.
    ///
    /// The section is the bore's own circle grown by the clearance, so a
    /// zero clearance fills the bore exactly.
    pub fn plug(
        &self,
        start: f64,
        bore_radius: f64,
        config: &BuildConfig,
    ) -> ModelResult<SolidNode> {
        if !(self.length > 0.0) {
            return Err(GeomError::invalid(
                "cork length",
                format!("must be positive, got {}", self.length),
            )
            .into());
        }
        let radius = bore_radius + self.clearance;
        if !(radius > 0.0) {
            return Err(GeomError::invalid(
                "cork clearance",
                format!("leaves a radius of {radius} in a bore of radius {bore_radius}"),
            )
            .into());
        }
        let section = generators::circle(2.0 * radius, config)?;
        let mut stack = CrossSectionStack::new();
        stack.push(start, section.clone());
        stack.push(start + self.length, section);
        Ok(SolidNode::polyhedron(stack.build()?))
    }
}
