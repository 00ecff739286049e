//! # Loops
//!
//! Closed 2D polygons used as cross-sections.
//!
//! A [`Loop`] is an ordered cyclic list of at least three points; the last
//! point connects back to the first. Positive signed area means
//! counter-clockwise winding, which lofting relies on for outward normals.
//! Every derived quantity is recomputed from the points and every
//! transformation returns a new loop.

pub mod generators;
mod offset;


use std::f64::consts::PI;

use config::constants::approx_zero;
use serde::{Deserialize, Serialize};

use crate::error::{GeomError, GeomResult};
use crate::lerp::lerp;
use crate::Point;

pub use offset::OffsetMode;

/// Axis-aligned bounds of a loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Extent {
    /// Size along X.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Size along Y.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// A closed 2D polygon with at least three points.
///
/// # Example
///
/// ```rust
/// use woodwind_geom::{Loop, Point};
///
/// let square = Loop::new(vec![
///     Point::new(0.0, 0.0),
///     Point::new(2.0, 0.0),
///     Point::new(2.0, 2.0),
///     Point::new(0.0, 2.0),
/// ]).unwrap();
///
/// assert_eq!(square.area(), 4.0);
/// assert_eq!(square.circumference(), 8.0);
/// assert_eq!(square.centroid(), Point::new(1.0, 1.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loop {
    points: Vec<Point>,
}

impl Loop {
    /// Creates a loop from its points.
    ///
    /// # Errors
    ///
    /// Returns `TooFewPoints` for fewer than three points.
    pub fn new(points: Vec<Point>) -> GeomResult<Self> {
        if points.len() < 3 {
            return Err(GeomError::TooFewPoints {
                count: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Remaps every point; the count is unchanged so the invariant holds.
    fn map(&self, f: impl Fn(Point) -> Point) -> Loop {
        Loop {
            points: self.points.iter().map(|&p| f(p)).collect(),
        }
    }

    /// Iterates over the edges `(p[i], p[i + 1])`, wrapping at the end.
    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The points in order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a loop has at least three points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    // =========================================================================
    // DERIVED QUANTITIES
    // =========================================================================

    /// Perimeter length including the closing edge.
    pub fn circumference(&self) -> f64 {
        self.edges().map(|(a, b)| a.distance(b)).sum()
    }

    /// Signed shoelace area; positive for counter-clockwise loops.
    pub fn area(&self) -> f64 {
        self.edges().map(|(a, b)| a.cross(b)).sum::<f64>() / 2.0
    }

    /// Area centroid.
    ///
    /// A degenerate loop (collinear or coincident points, so the divisor
    /// `6·area` is exactly zero) falls back to the mean of its points.
    pub fn centroid(&self) -> Point {
        let (mut cx, mut cy, mut doubled_area) = (0.0, 0.0, 0.0);
        for (a, b) in self.edges() {
            let cross = a.cross(b);
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
            doubled_area += cross;
        }

        let divisor = 3.0 * doubled_area;
        if divisor == 0.0 {
            let sum = self.points.iter().fold(Point::ZERO, |acc, &p| acc + p);
            return sum * (1.0 / self.points.len() as f64);
        }
        Point::new(cx / divisor, cy / divisor)
    }

    /// Axis-aligned bounds.
    pub fn extent(&self) -> Extent {
        self.points.iter().fold(
            Extent {
                x_min: f64::INFINITY,
                x_max: f64::NEG_INFINITY,
                y_min: f64::INFINITY,
                y_max: f64::NEG_INFINITY,
            },
            |e, p| Extent {
                x_min: e.x_min.min(p.x),
                x_max: e.x_max.max(p.x),
                y_min: e.y_min.min(p.y),
                y_max: e.y_max.max(p.y),
            },
        )
    }

    /// True when the signed area is positive.
    pub fn is_counter_clockwise(&self) -> bool {
        self.area() > 0.0
    }

    // =========================================================================
    // TRANSFORMATIONS
    // =========================================================================

    /// Uniform scale about the origin.
    pub fn scale(&self, factor: f64) -> Loop {
        self.map(|p| p * factor)
    }

    /// Non-uniform scale about the origin.
    ///
    /// A negative factor mirrors the loop without reversing it; use
    /// [`Loop::flip_x`] / [`Loop::flip_y`] to keep the winding.
    pub fn scale2(&self, sx: f64, sy: f64) -> Loop {
        self.map(|p| Point::new(p.x * sx, p.y * sy))
    }

    /// Translation.
    pub fn offset(&self, dx: f64, dy: f64) -> Loop {
        let delta = Point::new(dx, dy);
        self.map(|p| p + delta)
    }

    /// Counter-clockwise rotation about the origin, in radians.
    pub fn rotate(&self, angle: f64) -> Loop {
        self.map(|p| p.rotate(angle))
    }

    /// The same points in reverse order (opposite winding).
    pub fn reversed(&self) -> Loop {
        let mut points = self.points.clone();
        points.reverse();
        Loop { points }
    }

    /// Mirrors across the Y axis (negates x), keeping the winding.
    pub fn flip_x(&self) -> Loop {
        Loop {
            points: self
                .points
                .iter()
                .rev()
                .map(|p| Point::new(-p.x, p.y))
                .collect(),
        }
    }

    /// Mirrors across the X axis (negates y), keeping the winding.
    pub fn flip_y(&self) -> Loop {
        Loop {
            points: self
                .points
                .iter()
                .rev()
                .map(|p| Point::new(p.x, -p.y))
                .collect(),
        }
    }

    /// Uniformly scales so the area becomes `target`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the target is not positive or the loop
    /// has no area to scale.
    pub fn with_area(&self, target: f64) -> GeomResult<Loop> {
        if !(target > 0.0) {
            return Err(GeomError::invalid("area", format!("must be positive, got {target}")));
        }
        let current = self.area().abs();
        if approx_zero(current) {
            return Err(GeomError::invalid("area", "loop is degenerate"));
        }
        Ok(self.scale((target / current).sqrt()))
    }

    /// Scales so the area matches a circle of diameter `diameter`.
    pub fn with_effective_diameter(&self, diameter: f64) -> GeomResult<Loop> {
        self.with_area(PI * diameter * diameter / 4.0)
    }

    /// Uniformly scales so the circumference becomes `target`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the target is not positive or every
    /// point coincides.
    pub fn with_circumference(&self, target: f64) -> GeomResult<Loop> {
        if !(target > 0.0) {
            return Err(GeomError::invalid(
                "circumference",
                format!("must be positive, got {target}"),
            ));
        }
        let current = self.circumference();
        if approx_zero(current) {
            return Err(GeomError::invalid("circumference", "loop is degenerate"));
        }
        Ok(self.scale(target / current))
    }

    /// Resamples to `count` points spaced evenly by arc length, starting at
    /// the first point.
    ///
    /// # Errors
    ///
    /// Returns `TooFewPoints` if `count < 3` and `InvalidParameter` if the
    /// loop has zero length.
    pub fn resample(&self, count: usize) -> GeomResult<Loop> {
        if count < 3 {
            return Err(GeomError::TooFewPoints { count });
        }
        let total = self.circumference();
        if approx_zero(total) {
            return Err(GeomError::invalid("loop", "cannot resample a zero-length loop"));
        }

        let step = total / count as f64;
        let mut points = Vec::with_capacity(count);
        let mut edges = self.edges();
        let (mut a, mut b) = match edges.next() {
            Some(edge) => edge,
            None => return Err(GeomError::TooFewPoints { count: 0 }),
        };
        let mut edge_start = 0.0;
        let mut edge_len = a.distance(b);

        for k in 0..count {
            let target = step * k as f64;
            while edge_start + edge_len < target {
                match edges.next() {
                    Some((na, nb)) => {
                        edge_start += edge_len;
                        a = na;
                        b = nb;
                        edge_len = a.distance(b);
                    }
                    None => break,
                }
            }
            let t = if edge_len > 0.0 {
                ((target - edge_start) / edge_len).clamp(0.0, 1.0)
            } else {
                0.0
            };
            points.push(lerp(a, b, t));
        }

        Loop::new(points)
    }
}

impl TryFrom<Vec<Point>> for Loop {
    type Error = GeomError;

    fn try_from(points: Vec<Point>) -> GeomResult<Self> {
        Loop::new(points)
    }
}
