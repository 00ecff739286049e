//! # Diameter Profiles
//!
//! A profile maps axial position to diameter. At a step change the profile
//! has two diameters at one position: `low` is the value approached from
//! below and `high` the value approached from above.
//!
//! Profiles are produced by the instrument design subsystem; the kernel only
//! reads them through the [`Profile`] trait. [`PiecewiseProfile`] is a
//! concrete implementation for callers (and tests) that supply control
//! positions directly.

use config::constants::approx_equal;
use serde::{Deserialize, Serialize};

use crate::error::{GeomError, GeomResult};
use crate::lerp::{lerp, unlerp};
use crate::transition::Transition;

/// Diameters on either side of an axial position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diameters {
    /// Diameter just below the position.
    pub low: f64,
    /// Diameter just above the position.
    pub high: f64,
}

impl Diameters {
    /// Same diameter on both sides.
    pub fn uniform(diameter: f64) -> Self {
        Self {
            low: diameter,
            high: diameter,
        }
    }

    /// True when the two sides differ (a shoulder).
    pub fn is_step(&self) -> bool {
        !approx_equal(self.low, self.high)
    }
}

/// Read-only axial diameter function.
pub trait Profile: Send + Sync {
    /// Diameters at axial position `z`.
    fn diameters_at(&self, z: f64) -> Diameters;

    /// Sorted positions where the profile is not smooth.
    fn kinks(&self) -> &[f64];

    /// Axial end of the profile.
    fn end(&self) -> f64;
}

/// Curve used between two control positions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SpanShape {
    /// Straight taper.
    #[default]
    Linear,
    /// Curvature-continuous transition with the given turning angle.
    Clothoid { angle: f64 },
}

#[derive(Debug, Clone, PartialEq)]
enum Span {
    Linear,
    Clothoid(Transition),
}

/// Profile defined by control positions joined by linear or clothoid spans.
///
/// # Example
///
/// ```rust
/// use woodwind_geom::{PiecewiseProfile, Profile};
///
/// // 19 mm bore stepping down to 17 mm at 300 mm.
/// let bore = PiecewiseProfile::new(
///     vec![0.0, 300.0, 600.0],
///     vec![19.0, 19.0, 17.0],
///     vec![19.0, 17.0, 17.0],
/// ).unwrap();
///
/// let at_step = bore.diameters_at(300.0);
/// assert_eq!((at_step.low, at_step.high), (19.0, 17.0));
/// assert_eq!(bore.diameters_at(450.0).low, 17.0);
/// assert_eq!(bore.end(), 600.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseProfile {
    positions: Vec<f64>,
    low: Vec<f64>,
    high: Vec<f64>,
    spans: Vec<Span>,
}

impl PiecewiseProfile {
    /// Creates a profile with linear spans.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` when fewer than two positions are given,
    /// positions are not strictly increasing, the lists differ in length or
    /// a diameter is not positive.
    pub fn new(positions: Vec<f64>, low: Vec<f64>, high: Vec<f64>) -> GeomResult<Self> {
        if positions.len() < 2 {
            return Err(GeomError::invalid(
                "positions",
                format!("need at least 2 control positions, got {}", positions.len()),
            ));
        }
        if low.len() != positions.len() || high.len() != positions.len() {
            return Err(GeomError::invalid(
                "diameters",
                format!(
                    "expected {} low/high diameters, got {}/{}",
                    positions.len(),
                    low.len(),
                    high.len()
                ),
            ));
        }
        if positions.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(GeomError::invalid("positions", "must be strictly increasing"));
        }
        if let Some(bad) = low.iter().chain(&high).find(|d| !(**d > 0.0)) {
            return Err(GeomError::invalid(
                "diameters",
                format!("must be positive, got {bad}"),
            ));
        }

        let spans = vec![Span::Linear; positions.len() - 1];
        Ok(Self {
            positions,
            low,
            high,
            spans,
        })
    }

    /// A constant-diameter profile from 0 to `length`.
    pub fn cylinder(length: f64, diameter: f64) -> GeomResult<Self> {
        Self::new(
            vec![0.0, length],
            vec![diameter, diameter],
            vec![diameter, diameter],
        )
    }

    /// Sets the shape of every span.
    pub fn with_shape(self, shape: SpanShape) -> GeomResult<Self> {
        (0..self.spans.len()).try_fold(self, |profile, i| profile.with_span_shape(i, shape))
    }

    /// Sets the shape of span `index` (between control `index` and
    /// `index + 1`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an out-of-range index or an invalid
    /// clothoid angle.
    pub fn with_span_shape(mut self, index: usize, shape: SpanShape) -> GeomResult<Self> {
        if index >= self.spans.len() {
            return Err(GeomError::invalid(
                "index",
                format!("span {index} out of range ({} spans)", self.spans.len()),
            ));
        }
        self.spans[index] = match shape {
            SpanShape::Linear => Span::Linear,
            SpanShape::Clothoid { angle } => Span::Clothoid(Transition::new(
                self.positions[index],
                self.high[index],
                self.positions[index + 1],
                self.low[index + 1],
                angle,
            )?),
        };
        Ok(self)
    }

    /// Control positions.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    fn span_value(&self, index: usize, z: f64) -> f64 {
        match &self.spans[index] {
            Span::Linear => {
                let t = unlerp(self.positions[index], self.positions[index + 1], z);
                lerp(self.high[index], self.low[index + 1], t)
            }
            Span::Clothoid(transition) => transition.value_at(z),
        }
    }
}

impl Profile for PiecewiseProfile {
    fn diameters_at(&self, z: f64) -> Diameters {
        let last = self.positions.len() - 1;
        if z < self.positions[0] {
            return Diameters::uniform(self.low[0]);
        }
        if z > self.positions[last] {
            return Diameters::uniform(self.high[last]);
        }

        match self.positions.binary_search_by(|p| p.total_cmp(&z)) {
            Ok(i) => Diameters {
                low: self.low[i],
                high: self.high[i],
            },
            Err(upper) => Diameters::uniform(self.span_value(upper - 1, z)),
        }
    }

    fn kinks(&self) -> &[f64] {
        &self.positions
    }

    fn end(&self) -> f64 {
        self.positions[self.positions.len() - 1]
    }
}
