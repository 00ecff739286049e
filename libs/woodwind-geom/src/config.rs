//! Per-build configuration for geometry generation.
//!
//! The sampling resolution of generated loops is an explicit value carried
//! through every call rather than process-wide state, so builds running on
//! different threads never influence each other.

use config::constants::{
    clamp_quality, DEFAULT_PROFILE_STEPS, DEFAULT_QUALITY, DRAFT_QUALITY, EPSILON,
};
use serde::{Deserialize, Serialize};

/// Resolution and tolerance settings for one model build.
///
/// # Examples
/// ```
/// use woodwind_geom::BuildConfig;
///
/// let fine = BuildConfig::default();
/// assert_eq!(fine.quality, 128);
///
/// let draft = BuildConfig::draft();
/// assert_eq!(draft.quality, 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Number of points sampled around every generated loop.
    pub quality: u32,
    /// Axial samples taken inside each profile span.
    pub profile_steps: u32,
    /// Tolerance for geometric comparisons.
    pub tolerance: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            profile_steps: DEFAULT_PROFILE_STEPS,
            tolerance: EPSILON,
        }
    }
}

impl BuildConfig {
    /// Coarse settings for fast previews.
    pub fn draft() -> Self {
        Self {
            quality: DRAFT_QUALITY,
            profile_steps: 2,
            ..Self::default()
        }
    }

    /// Returns a copy with a different loop quality (at least 3).
    #[must_use]
    pub fn with_quality(self, quality: u32) -> Self {
        Self {
            quality: clamp_quality(quality),
            ..self
        }
    }

    /// Loop sample count as a `usize`.
    #[inline]
    pub fn samples(&self) -> usize {
        clamp_quality(self.quality) as usize
    }
}
