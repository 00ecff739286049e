//! # Loop Generators
//!
//! Parametric cross-section shapes. Every generator returns a
//! counter-clockwise loop with exactly `config.quality` points.
//!
//! Shapes other than the circle are traced densely first and then resampled
//! evenly by arc length, so corners and flats get the same point spacing as
//! curved parts.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use config::constants::GENERATOR_OVERSAMPLE;
use tracing::trace;

use super::Loop;
use crate::error::{GeomError, GeomResult};
use crate::{BuildConfig, Point};

/// Rejects non-positive or non-finite sizes.
fn require_positive(name: &'static str, value: f64) -> GeomResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeomError::invalid(name, format!("must be positive, got {value}")))
    }
}

fn unit(angle: f64) -> Point {
    Point::new(angle.cos(), angle.sin())
}

/// Points on a circular arc from `from` to `to` (radians), end excluded.
fn arc(center: Point, radius: f64, from: f64, to: f64, steps: usize, out: &mut Vec<Point>) {
    let steps = steps.max(1);
    for i in 0..steps {
        let angle = from + (to - from) * i as f64 / steps as f64;
        out.push(center + unit(angle) * radius);
    }
}

/// Points on a straight run from `from` to `to`, end excluded.
fn line(from: Point, to: Point, steps: usize, out: &mut Vec<Point>) {
    let steps = steps.max(1);
    for i in 0..steps {
        out.push(crate::lerp(from, to, i as f64 / steps as f64));
    }
}

fn dense_steps(config: &BuildConfig) -> usize {
    config.samples() * GENERATOR_OVERSAMPLE
}

/// Resamples a densely traced outline to the build quality.
fn finish(outline: Vec<Point>, config: &BuildConfig) -> GeomResult<Loop> {
    trace!(dense = outline.len(), quality = config.quality, "resampling outline");
    Loop::new(outline)?.resample(config.samples())
}

/// Circle of diameter `diameter` centred on the origin.
///
/// The polygon is scaled so its area equals the true circle area `π d²/4`,
/// keeping bore volume independent of quality.
///
/// # Example
///
/// ```rust
/// use std::f64::consts::PI;
/// use woodwind_geom::{generators, BuildConfig};
///
/// let c = generators::circle(2.0, &BuildConfig::draft()).unwrap();
/// assert!((c.area() - PI).abs() < 1e-12);
/// ```
pub fn circle(diameter: f64, config: &BuildConfig) -> GeomResult<Loop> {
    require_positive("diameter", diameter)?;
    let n = config.samples();
    let mut points = Vec::with_capacity(n);
    arc(Point::ZERO, diameter / 2.0, 0.0, TAU, n, &mut points);
    Loop::new(points)?.with_effective_diameter(diameter)
}

/// Circular segment: the part of a circle of diameter `diameter` above a
/// horizontal chord, keeping `fraction` of the diameter measured from the
/// top.
///
/// `fraction` must lie in `(0, 1)`. The circle is centred on the origin, so
/// `fraction = 0.5` puts the chord on the X axis.
pub fn chord(diameter: f64, fraction: f64, config: &BuildConfig) -> GeomResult<Loop> {
    require_positive("diameter", diameter)?;
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(GeomError::invalid(
            "fraction",
            format!("must lie in (0, 1), got {fraction}"),
        ));
    }

    let radius = diameter / 2.0;
    let chord_y = radius - fraction * diameter;
    let start = (chord_y / radius).asin();
    let end = PI - start;

    let dense = dense_steps(config);
    let arc_len = radius * (end - start);
    let chord_len = 2.0 * radius * start.cos();
    let arc_steps = (dense as f64 * arc_len / (arc_len + chord_len)).ceil() as usize;
    let chord_steps = dense.saturating_sub(arc_steps).max(1);

    let mut outline = Vec::with_capacity(arc_steps + chord_steps);
    arc(Point::ZERO, radius, start, end, arc_steps, &mut outline);
    let left = Point::new(-radius * start.cos(), chord_y);
    let right = Point::new(radius * start.cos(), chord_y);
    line(left, right, chord_steps, &mut outline);

    finish(outline, config)
}

/// Upper half of a circle of diameter `diameter`, flat side on the X axis.
pub fn half_circle(diameter: f64, config: &BuildConfig) -> GeomResult<Loop> {
    chord(diameter, 0.5, config)
}

/// Axis-aligned square of side `size` centred on the origin.
pub fn square(size: f64, config: &BuildConfig) -> GeomResult<Loop> {
    require_positive("size", size)?;
    let h = size / 2.0;
    rounded_rectangle(-h, -h, h, h, 0.0, config)
}

/// Rectangle from `(x0, y0)` to `(x1, y1)` with corners rounded to `radius`.
///
/// A radius of zero gives sharp corners; the radius may not exceed half the
/// shorter side.
pub fn rounded_rectangle(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    radius: f64,
    config: &BuildConfig,
) -> GeomResult<Loop> {
    let (width, height) = (x1 - x0, y1 - y0);
    require_positive("width", width)?;
    require_positive("height", height)?;
    if !(radius >= 0.0 && radius <= width.min(height) / 2.0) {
        return Err(GeomError::invalid(
            "radius",
            format!("must lie in [0, {}], got {radius}", width.min(height) / 2.0),
        ));
    }

    let dense = dense_steps(config);
    let perimeter = 2.0 * (width + height - 4.0 * radius) + TAU * radius;
    let steps_for = |length: f64| (dense as f64 * length / perimeter).ceil() as usize;
    let corner_steps = steps_for(FRAC_PI_2 * radius);

    // Straight runs between corner tangent points, counter-clockwise from
    // the bottom edge.
    let corners = [
        (Point::new(x1 - radius, y0 + radius), -FRAC_PI_2),
        (Point::new(x1 - radius, y1 - radius), 0.0),
        (Point::new(x0 + radius, y1 - radius), FRAC_PI_2),
        (Point::new(x0 + radius, y0 + radius), PI),
    ];

    let mut outline = Vec::with_capacity(dense + 8);
    for (i, &(center, angle)) in corners.iter().enumerate() {
        let (previous, previous_angle) = corners[(i + 3) % 4];
        let run_start = previous + unit(previous_angle + FRAC_PI_2) * radius;
        let run_end = center + unit(angle) * radius;
        line(run_start, run_end, steps_for(run_start.distance(run_end)), &mut outline);
        if radius > 0.0 {
            arc(center, radius, angle, angle + FRAC_PI_2, corner_steps, &mut outline);
        }
    }

    finish(outline, config)
}

/// A rounded rectangle padded `xpad`/`ypad` beyond a circle of diameter
/// `diameter`, scaled so its area equals that circle's.
///
/// With both pads zero this is the circle itself.
pub fn squared_circle(xpad: f64, ypad: f64, diameter: f64, config: &BuildConfig) -> GeomResult<Loop> {
    require_positive("diameter", diameter)?;
    if !(xpad >= 0.0 && ypad >= 0.0) {
        return Err(GeomError::invalid(
            "pad",
            format!("pads must be non-negative, got ({xpad}, {ypad})"),
        ));
    }
    let r = diameter / 2.0;
    let (hx, hy) = (r + xpad, r + ypad);
    rounded_rectangle(-hx, -hy, hx, hy, r, config)?.with_effective_diameter(diameter)
}

/// Biconvex lens with circumference equal to a circle of diameter
/// `diameter`.
///
/// `bulge` is the height of each arc relative to the lens half-width and
/// must lie in `(0, 1]`; a bulge of 1 is a circle.
pub fn lens(bulge: f64, diameter: f64, config: &BuildConfig) -> GeomResult<Loop> {
    require_positive("diameter", diameter)?;
    if !(bulge > 0.0 && bulge <= 1.0) {
        return Err(GeomError::invalid(
            "bulge",
            format!("must lie in (0, 1], got {bulge}"),
        ));
    }

    // Arc through (±1, 0) and (0, bulge).
    let radius = (1.0 + bulge * bulge) / (2.0 * bulge);
    let center_y = bulge - radius;
    let start = (-center_y).atan2(1.0);
    let end = PI - start;

    let half = dense_steps(config) / 2;
    let mut outline = Vec::with_capacity(2 * half);
    arc(Point::new(0.0, center_y), radius, start, end, half, &mut outline);
    arc(Point::new(0.0, -center_y), radius, start + PI, end + PI, half, &mut outline);

    finish(outline, config)?.with_circumference(PI * diameter)
}
