//! # Fresnel Integrals
//!
//! Double-precision Fresnel integrals and the unit-speed clothoid built on
//! them.
//!
//! ```text
//! S(x) = ∫₀ˣ sin(π t² / 2) dt        C(x) = ∫₀ˣ cos(π t² / 2) dt
//! ```
//!
//! The rational approximations and coefficient tables are those of the
//! Cephes `fresnl` routine. The tables must not be altered: transition
//! curves are built from these values and small deviations show up as
//! visible kinks in curvature.

#![allow(clippy::excessive_precision)]

use std::f64::consts::{FRAC_PI_2, PI};

use crate::Point;

// =============================================================================
// COEFFICIENT TABLES
// =============================================================================

/// S(x) for small x, numerator.
const SN: [f64; 6] = [
    -2.99181919401019853726E3,
    7.08840045257738576863E5,
    -6.29741486205862506537E7,
    2.54890880573376359104E9,
    -4.42979518059697779103E10,
    3.18016297876567817986E11,
];

/// S(x) for small x, denominator (leading coefficient 1 implied).
const SD: [f64; 6] = [
    2.81376268889994315696E2,
    4.55847810806532581675E4,
    5.17343888770096400730E6,
    4.19320245898111231129E8,
    2.24411795645340920940E10,
    6.07366389490084639049E11,
];

/// C(x) for small x, numerator.
const CN: [f64; 6] = [
    -4.98843114573573548651E-8,
    9.50428062829859605134E-6,
    -6.45191435683965050962E-4,
    1.88843319396703850064E-2,
    -2.05525900955013891793E-1,
    9.99999999999999998822E-1,
];

/// C(x) for small x, denominator.
const CD: [f64; 7] = [
    3.99982968972495980367E-12,
    9.15439215774657478799E-10,
    1.25001862479598821474E-7,
    1.22262789024179030997E-5,
    8.68029542941784300606E-4,
    4.12142090722199792936E-2,
    1.00000000000000000118E0,
];

/// Auxiliary function f for large x, numerator.
const FN: [f64; 10] = [
    4.21543555043677546506E-1,
    1.43407919780758885261E-1,
    1.15220955073585758835E-2,
    3.45017939782574027900E-4,
    4.63613749287867322088E-6,
    3.05568983790257605827E-8,
    1.02304514164907233465E-10,
    1.72010743268161828879E-13,
    1.34283276233062758925E-16,
    3.76329711269987889006E-20,
];

/// Auxiliary function f for large x, denominator (leading 1 implied).
const FD: [f64; 10] = [
    7.51586398353378947175E-1,
    1.16888925859191382142E-1,
    6.44051526508858611005E-3,
    1.55934409164153020873E-4,
    1.84627567348930545870E-6,
    1.12699224763999035261E-8,
    3.60140029589371370404E-11,
    5.88754533621578410010E-14,
    4.52001434074129701496E-17,
    1.25443237090011264384E-20,
];

/// Auxiliary function g for large x, numerator.
const GN: [f64; 11] = [
    5.04442073643383265887E-1,
    1.97102833525523411709E-1,
    1.87648584092575249293E-2,
    6.84079380915393090172E-4,
    1.15138826111884280931E-5,
    9.82852443688422223854E-8,
    4.45344415861750144738E-10,
    1.08268041139020870318E-12,
    1.37555460633261799868E-15,
    8.36354435630677421531E-19,
    1.86958710162783235106E-22,
];

/// Auxiliary function g for large x, denominator (leading 1 implied).
const GD: [f64; 11] = [
    1.47495759925128324529E0,
    3.37748989120019970451E-1,
    2.53603741420338795122E-2,
    8.14679107184306179049E-4,
    1.27545075667729118702E-5,
    1.04314589657571990585E-7,
    4.60680728146520428211E-10,
    1.10273215066240270757E-12,
    1.38796531259578871258E-15,
    8.39158816283118707363E-19,
    1.86958710162783236342E-22,
];

/// Squared argument below which the power-series ratios are used.
const SMALL_ARGUMENT_SQUARED: f64 = 2.5625;

/// Argument above which both integrals equal their limit to double precision.
const LARGE_ARGUMENT: f64 = 36974.0;

// =============================================================================
// POLYNOMIAL EVALUATION
// =============================================================================

/// Evaluates a polynomial with the given coefficients, highest power first.
#[inline]
fn polevl(x: f64, coefficients: &[f64]) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Like [`polevl`] with an implied leading coefficient of 1.
#[inline]
fn p1evl(x: f64, coefficients: &[f64]) -> f64 {
    coefficients.iter().fold(1.0, |acc, &c| acc * x + c)
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Computes the Fresnel integrals, returning `(S(x), C(x))`.
///
/// Defined for every finite input. Odd in `x`: `fresnel(-x) == (-S, -C)`.
///
/// # Example
///
/// ```rust
/// use woodwind_geom::fresnel;
///
/// let (s, c) = fresnel(1.0);
/// assert!((s - 0.438_259_147_390_354_8).abs() < 1e-12);
/// assert!((c - 0.779_893_400_376_822_8).abs() < 1e-12);
/// ```
pub fn fresnel(xxa: f64) -> (f64, f64) {
    let x = xxa.abs();
    let x2 = x * x;

    let (ss, cc) = if x2 < SMALL_ARGUMENT_SQUARED {
        let t = x2 * x2;
        let ss = x * x2 * polevl(t, &SN) / p1evl(t, &SD);
        let cc = x * polevl(t, &CN) / polevl(t, &CD);
        (ss, cc)
    } else if x > LARGE_ARGUMENT {
        (0.5, 0.5)
    } else {
        // Asymptotic regime through the auxiliary functions f and g.
        let t = PI * x2;
        let u = 1.0 / (t * t);
        let t = 1.0 / t;
        let f = 1.0 - u * polevl(u, &FN) / p1evl(u, &FD);
        let g = t * polevl(u, &GN) / p1evl(u, &GD);

        let (s, c) = (FRAC_PI_2 * x2).sin_cos();
        let t = PI * x;
        let cc = 0.5 + (f * s - g * c) / t;
        let ss = 0.5 - (f * c + g * s) / t;
        (ss, cc)
    };

    if xxa < 0.0 {
        (-ss, -cc)
    } else {
        (ss, cc)
    }
}

/// Point at arc length `t` on the unit-speed clothoid (Euler spiral).
///
/// The spiral starts at the origin heading along +X and its curvature equals
/// the arc length, so the tangent angle at `t` is `t² / 2`.
pub fn cornu(t: f64) -> Point {
    let scale = PI.sqrt();
    let (s, c) = fresnel(t / scale);
    Point::new(scale * c, scale * s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fresnel_zero() {
        assert_eq!(fresnel(0.0), (0.0, 0.0));
    }

    #[test]
    fn test_fresnel_odd_symmetry() {
        for &x in &[0.1, 0.7, 1.3, 1.6, 2.5, 7.0, 120.0, 40_000.0] {
            let (s, c) = fresnel(x);
            let (ns, nc) = fresnel(-x);
            assert_eq!(ns, -s, "S at {x}");
            assert_eq!(nc, -c, "C at {x}");
        }
    }

    #[test]
    fn test_fresnel_reference_values() {
        // Small-argument regime.
        let (s, c) = fresnel(0.5);
        assert_abs_diff_eq!(s, 0.064_732_432_859_999_29, epsilon = 1e-13);
        assert_abs_diff_eq!(c, 0.492_344_225_871_446_4, epsilon = 1e-13);

        let (s, c) = fresnel(1.0);
        assert_abs_diff_eq!(s, 0.438_259_147_390_354_8, epsilon = 1e-13);
        assert_abs_diff_eq!(c, 0.779_893_400_376_822_8, epsilon = 1e-13);

        // Auxiliary-function regime.
        let (s, c) = fresnel(2.0);
        assert_abs_diff_eq!(s, 0.343_415_678_363_698_2, epsilon = 1e-12);
        assert_abs_diff_eq!(c, 0.488_253_406_075_340_8, epsilon = 1e-12);
    }

    #[test]
    fn test_fresnel_limit() {
        assert_eq!(fresnel(1e6), (0.5, 0.5));
        let (s, c) = fresnel(1000.0);
        assert_abs_diff_eq!(s, 0.5, epsilon = 1e-3);
        assert_abs_diff_eq!(c, 0.5, epsilon = 1e-3);
    }

    #[test]
    fn test_regimes_meet() {
        let edge = SMALL_ARGUMENT_SQUARED.sqrt();
        let below = fresnel(edge - 1e-9);
        let above = fresnel(edge + 1e-9);
        assert_abs_diff_eq!(below.0, above.0, epsilon = 1e-8);
        assert_abs_diff_eq!(below.1, above.1, epsilon = 1e-8);
    }

    #[test]
    fn test_cornu_is_unit_speed() {
        let steps = 1000;
        let end = 2.0;
        let mut length = 0.0;
        let mut previous = cornu(0.0);
        for i in 1..=steps {
            let p = cornu(end * i as f64 / steps as f64);
            length += previous.distance(p);
            previous = p;
        }
        assert_abs_diff_eq!(length, end, epsilon = 1e-5);
    }

    #[test]
    fn test_cornu_starts_along_x() {
        let p = cornu(1e-3);
        assert!(p.x > 0.0);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-9);
    }
}
