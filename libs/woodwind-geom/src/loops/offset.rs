//! Parallel (offset) curves.

use serde::{Deserialize, Serialize};

use super::Loop;
use crate::error::{GeomError, GeomResult};
use crate::Point;

/// How corners are treated when offsetting a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OffsetMode {
    /// Move each vertex along its corner bisector; point count is kept.
    #[default]
    Miter,
    /// Insert arc points at convex corners.
    Round,
}

impl Loop {
    /// Parallel curve at signed normal `distance`.
    ///
    /// Positive distances grow the loop outward regardless of winding.
    /// [`OffsetMode::Miter`] keeps the point count so the result can still
    /// be lofted against the original.
    ///
    /// # Errors
    ///
    /// [`OffsetMode::Round`] returns `NotImplemented`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use woodwind_geom::{Loop, OffsetMode, Point};
    ///
    /// let square = Loop::new(vec![
    ///     Point::new(-1.0, -1.0),
    ///     Point::new(1.0, -1.0),
    ///     Point::new(1.0, 1.0),
    ///     Point::new(-1.0, 1.0),
    /// ]).unwrap();
    /// let grown = square.offset_curve(0.5, OffsetMode::Miter).unwrap();
    /// assert!((grown.area() - 9.0).abs() < 1e-12);
    /// ```
    pub fn offset_curve(&self, distance: f64, mode: OffsetMode) -> GeomResult<Loop> {
        match mode {
            OffsetMode::Miter => Ok(self.miter_offset(distance)),
            OffsetMode::Round => Err(GeomError::not_implemented("round offset curves")),
        }
    }

    fn miter_offset(&self, distance: f64) -> Loop {
        let points = self.points();
        let n = points.len();
        // Right-hand edge normals point outward for counter-clockwise loops.
        let outward = if self.area() < 0.0 { -distance } else { distance };

        let normals: Vec<Point> = (0..n)
            .map(|i| {
                let edge = points[(i + 1) % n] - points[i];
                Point::new(edge.y, -edge.x).normalize_or_zero()
            })
            .collect();

        self.map_indexed(|i, p| {
            let before = normals[(i + n - 1) % n];
            let after = normals[i];
            let bisector = (before + after).normalize_or_zero();
            let cos_half = bisector.dot(after);
            if bisector == Point::ZERO || cos_half.abs() < 1e-9 {
                // Reversal or zero-length edges: fall back to one edge normal.
                let normal = if after == Point::ZERO { before } else { after };
                p + normal * outward
            } else {
                p + bisector * (outward / cos_half)
            }
        })
    }

    fn map_indexed(&self, f: impl Fn(usize, Point) -> Point) -> Loop {
        Loop {
            points: self
                .points()
                .iter()
                .enumerate()
                .map(|(i, &p)| f(i, p))
                .collect(),
        }
    }
}
