//! # Segmenting
//!
//! Cuts a realized body into printable pieces. The body axis is Z. Each
//! piece is the intersection of the body with a box spanning the requested
//! axial window plus padding, optionally restricted to one half (y >= 0 or
//! y <= 0), then re-oriented so it can be printed flat.

use config::constants::SEGMENT_TOLERANCE;
use glam::{DMat4, DVec3};
use rayon::prelude::*;
use tracing::{debug, info};
use woodwind_mesh::{primitives, BooleanEngine, BspEngine, Mesh};

use crate::error::{ModelError, ModelResult};

/// Which part of the cross-section to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    /// The half with y >= 0, laid cut face down.
    Top,
    /// The half with y <= 0, laid cut face down.
    Bottom,
    /// The full cross-section, standing upright.
    #[default]
    Whole,
}

/// One fabrication piece.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Re-oriented mesh with its bounding box minimum at the origin.
    pub mesh: Mesh,
    /// Axial start of the window, before padding.
    pub low: f64,
    /// Requested axial length, `high - low`.
    pub length: f64,
}

/// Clips bodies into segments.
#[derive(Debug, Clone)]
pub struct Segmenter<E: BooleanEngine = BspEngine> {
    engine: E,
    clip_radius: f64,
    pad: f64,
    tolerance: f64,
}

impl Segmenter<BspEngine> {
    /// Segmenter on the default engine with no padding.
    pub fn new(clip_radius: f64) -> Self {
        Self::with_engine(BspEngine, clip_radius)
    }
}

impl<E: BooleanEngine> Segmenter<E> {
    /// Segmenter on `engine`. `clip_radius` must exceed the body's distance
    /// from the axis in X and Y; [`clip`](Self::clip) checks it.
    pub fn with_engine(engine: E, clip_radius: f64) -> Self {
        Self {
            engine,
            clip_radius,
            pad: 0.0,
            tolerance: SEGMENT_TOLERANCE,
        }
    }

    /// Sets the axial padding added to both ends of every window.
    #[must_use]
    pub fn with_pad(mut self, pad: f64) -> Self {
        self.pad = pad;
        self
    }

    /// Sets the tolerance for the extent check.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn pad(&self) -> f64 {
        self.pad
    }

    /// Clips `solid` to `[low - pad, high + pad]` on `side`.
    ///
    /// # Errors
    ///
    /// - `ClipRadiusTooSmall` when the body reaches the clip radius in X
    ///   or Y
    /// - `InsufficientPadding` when the clipped piece's axial extent differs
    ///   from `high - low + 2 * pad` by more than the tolerance, which means
    ///   the window ran past the body
    pub fn clip(&self, solid: &Mesh, side: Side, low: f64, high: f64) -> ModelResult<Segment> {
        let r = self.clip_radius;
        let (solid_min, solid_max) = solid.bounding_box();
        let required = solid_min.abs().max(solid_max.abs()).truncate().max_element();
        if !(required < r) {
            return Err(ModelError::ClipRadiusTooSmall {
                required,
                clip_radius: r,
            });
        }

        let (y_min, y_max) = match side {
            Side::Top => (0.0, r),
            Side::Bottom => (-r, 0.0),
            Side::Whole => (-r, r),
        };
        let window = primitives::block(
            DVec3::new(-r, y_min, low - self.pad),
            DVec3::new(r, y_max, high + self.pad),
        )?;
        let mut mesh = self.engine.intersection(solid, &window)?;

        let expected = high - low + 2.0 * self.pad;
        let actual = if mesh.is_empty() {
            0.0
        } else {
            let (min, max) = mesh.bounding_box();
            max.z - min.z
        };
        if (actual - expected).abs() > self.tolerance {
            return Err(ModelError::InsufficientPadding { expected, actual });
        }

        // Halves rotate about X so the cut face (y = 0) lands on z = 0
        // with the material above it.
        match side {
            Side::Top => mesh.transform(&DMat4::from_rotation_x(90f64.to_radians())),
            Side::Bottom => mesh.transform(&DMat4::from_rotation_x(-90f64.to_radians())),
            Side::Whole => {}
        }
        let (min, _) = mesh.bounding_box();
        mesh.translate(-min);

        debug!(
            low,
            high,
            ?side,
            triangles = mesh.triangle_count(),
            "clipped segment"
        );
        Ok(Segment {
            mesh,
            low,
            length: high - low,
        })
    }

    /// Clips one segment per consecutive pair of `cuts`, in parallel.
    pub fn segment_all(&self, solid: &Mesh, cuts: &[f64], side: Side) -> ModelResult<Vec<Segment>> {
        let segments = cuts
            .par_windows(2)
            .map(|window| self.clip(solid, side, window[0], window[1]))
            .collect::<ModelResult<Vec<_>>>()?;
        info!(count = segments.len(), ?side, "segmented body");
        Ok(segments)
    }
}
