//! Generic linear interpolation.

use std::ops::{Add, Mul, Sub};

/// Linear interpolation between `a` and `b`.
///
/// Works for any value that supports subtraction, addition and scaling by
/// the parameter type: plain floats, `glam` vectors, [`crate::Point`].
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use woodwind_geom::lerp;
///
/// assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
/// assert_eq!(lerp(DVec3::ZERO, DVec3::X, 0.25), DVec3::new(0.25, 0.0, 0.0));
/// ```
#[inline]
pub fn lerp<T, S>(a: T, b: T, t: S) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<S, Output = T>,
{
    a + (b - a) * t
}

/// Position of `value` between `a` and `b` as a fraction (inverse of [`lerp`]).
///
/// Returns 0 when the interval is empty.
#[inline]
pub fn unlerp(a: f64, b: f64, value: f64) -> f64 {
    let span = b - a;
    if span == 0.0 {
        0.0
    } else {
        (value - a) / span
    }
}
