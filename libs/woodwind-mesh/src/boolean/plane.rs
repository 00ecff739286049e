//! # Plane for BSP Operations
//!
//! Plane representation with point classification.

use config::constants::BSP_EPSILON;
use glam::DVec3;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classification of a point or polygon relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// On the plane within tolerance.
    Coplanar = 0,
    /// Positive side.
    Front = 1,
    /// Negative side.
    Back = 2,
    /// Polygon with vertices on both sides.
    Spanning = 3,
}

impl Classification {
    /// Combines two classifications (bitwise union of Front and Back).
    pub fn combine(self, other: Classification) -> Classification {
        match (self as u8) | (other as u8) {
            0 => Classification::Coplanar,
            1 => Classification::Front,
            2 => Classification::Back,
            _ => Classification::Spanning,
        }
    }
}

// =============================================================================
// PLANE
// =============================================================================

/// A plane `normal · p = w` with unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: DVec3,
    w: f64,
}

impl Plane {
    /// Creates a plane through three points, counter-clockwise seen from the
    /// front. Returns `None` for collinear points.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let normal = (b - a).cross(c - a).try_normalize()?;
        Some(Self {
            normal,
            w: normal.dot(a),
        })
    }

    /// Unit normal.
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Reverses the plane's orientation.
    pub fn flip(&self) -> Plane {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance from the plane; positive in front.
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.w
    }

    /// Classifies a point with [`BSP_EPSILON`] tolerance.
    pub fn classify_point(&self, point: DVec3) -> Classification {
        let distance = self.signed_distance(point);
        if distance > BSP_EPSILON {
            Classification::Front
        } else if distance < -BSP_EPSILON {
            Classification::Back
        } else {
            Classification::Coplanar
        }
    }
}
