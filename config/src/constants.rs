//! # Configuration Constants
//!
//! Centralized constants for the woodwind solid kernel.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Resolution**: Default loop sampling and profile subdivision
//! - **Limits**: Recursion and stack-growth bounds
//! - **Fabrication**: Segment clipping tolerances

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Plane-classification tolerance used by the BSP boolean engine.
///
/// Points closer than this to a splitting plane count as coplanar. Larger
/// than [`EPSILON`] because boolean results accumulate rounding from every
/// split.
pub const BSP_EPSILON: f64 = 1e-5;

/// Epsilon for rejecting degenerate (zero-area) triangles.
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-12;

/// Distance below which boolean output vertices are merged, and below which
/// a vertex counts as lying on a neighbouring polygon's edge.
///
/// Above [`BSP_EPSILON`]: points the engine treats as lying on one plane
/// can come out of separate splits this far apart.
pub const WELD_EPSILON: f64 = 1e-4;

/// Largest boundary loop, in edges, that boolean output repair closes.
///
/// Sliver fragments lost to plane-classification tolerance leave loops of
/// a handful of edges; anything larger is reported instead of patched.
pub const MAX_FILLED_HOLE_EDGES: usize = 64;

// =============================================================================
// RESOLUTION CONSTANTS
// =============================================================================

/// Default number of samples around a generated cross-section loop.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_QUALITY;
///
/// let angle_step = std::f64::consts::TAU / DEFAULT_QUALITY as f64;
/// assert!(angle_step < 0.05);
/// ```
pub const DEFAULT_QUALITY: u32 = 128;

/// Reduced sample count for draft or preview builds.
pub const DRAFT_QUALITY: u32 = 16;

/// Smallest loop sample count that still forms a polygon.
pub const MIN_QUALITY: u32 = 3;

/// Default number of axial samples taken inside each profile span.
///
/// Linear spans only need their endpoints; curved (clothoid) spans need
/// intermediate levels to follow the curve.
pub const DEFAULT_PROFILE_STEPS: u32 = 8;

/// Number of points used when densely sampling a transition curve before
/// interpolating diameters from it.
pub const TRANSITION_SAMPLES: usize = 256;

/// Dense oversampling factor used by loop generators before resampling to
/// the requested quality.
pub const GENERATOR_OVERSAMPLE: usize = 8;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Bytes of stack reserved when the solid tree renderer grows its stack.
///
/// # Example
///
/// ```rust
/// use config::constants::STACKER_STACK_SIZE_BYTES;
/// assert!(STACKER_STACK_SIZE_BYTES >= 1024 * 1024);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Remaining stack below which `stacker` allocates a new segment.
pub const STACKER_RED_ZONE_BYTES: usize = 128 * 1024;

// =============================================================================
// FABRICATION CONSTANTS
// =============================================================================

/// Allowed difference between the requested and the clipped extent of a
/// fabrication segment.
pub const SEGMENT_TOLERANCE: f64 = 1e-3;

/// Axial overshoot applied to cutting solids so they never share a face
/// with the solid they cut.
pub const CUT_OVERSHOOT: f64 = 0.5;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Clamps a requested loop quality to the supported minimum.
///
/// # Example
///
/// ```rust
/// use config::constants::{clamp_quality, MIN_QUALITY};
///
/// assert_eq!(clamp_quality(0), MIN_QUALITY);
/// assert_eq!(clamp_quality(64), 64);
/// ```
#[inline]
pub fn clamp_quality(quality: u32) -> u32 {
    quality.max(MIN_QUALITY)
}
