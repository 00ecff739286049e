//! Lofted bore and outer surfaces.

use config::constants::CUT_OVERSHOOT;
use woodwind_geom::{generators, BuildConfig};
use woodwind_mesh::{profile_stack, CrossSectionStack};

use super::BodySpec;
use crate::error::ModelResult;

/// Outer surface from 0 to the body length.
///
/// With a facet count the cross-sections are regular polygons of that many
/// sides instead of `config.quality`-gons.
pub fn outer_stack(spec: &BodySpec<'_>, config: &BuildConfig) -> ModelResult<CrossSectionStack> {
    let sections = match spec.outer_facets {
        Some(facets) => config.with_quality(facets),
        None => *config,
    };
    let stack = profile_stack(spec.outer, 0.0, spec.length, config, |d| {
        generators::circle(d, &sections)
    })?;
    Ok(stack)
}

/// Bore surface, overshooting both end faces so they cut open.
///
/// The top runs past the end by the cork clearance as well, keeping the
/// end diameter over the whole range a cork can occupy.
pub fn inner_stack(spec: &BodySpec<'_>, config: &BuildConfig) -> ModelResult<CrossSectionStack> {
    let stack = profile_stack(
        spec.bore,
        -CUT_OVERSHOOT,
        inner_top(spec),
        config,
        |d| generators::circle(d, config),
    )?;
    Ok(stack)
}

/// Axial end of the bore loft.
pub fn inner_top(spec: &BodySpec<'_>) -> f64 {
    let clearance = spec.cork.map_or(0.0, |cork| cork.clearance.abs());
    spec.length + CUT_OVERSHOOT + clearance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::CorkSpec;
    use approx::assert_relative_eq;
    use woodwind_geom::PiecewiseProfile;

    fn top_z(stack: &CrossSectionStack) -> f64 {
        stack.levels().last().map(|(z, _)| *z).unwrap()
    }

    #[test]
    fn test_inner_stack_overshoots_both_ends() {
        let bore = PiecewiseProfile::cylinder(200.0, 19.0).unwrap();
        let outer = PiecewiseProfile::cylinder(200.0, 26.0).unwrap();
        let spec = BodySpec::new(&bore, &outer, 200.0);
        let stack = inner_stack(&spec, &BuildConfig::draft()).unwrap();

        assert_relative_eq!(stack.levels()[0].0, -CUT_OVERSHOOT);
        assert_relative_eq!(top_z(&stack), 200.0 + CUT_OVERSHOOT);
    }

    #[test]
    fn test_inner_stack_top_extends_by_cork_clearance() {
        let bore = PiecewiseProfile::cylinder(200.0, 19.0).unwrap();
        let outer = PiecewiseProfile::cylinder(200.0, 26.0).unwrap();
        let spec = BodySpec::new(&bore, &outer, 200.0).with_cork(CorkSpec::new(17.0, 10.0, -0.75));
        let stack = inner_stack(&spec, &BuildConfig::draft()).unwrap();

        assert_relative_eq!(top_z(&stack), 200.0 + CUT_OVERSHOOT + 0.75);
        assert_relative_eq!(top_z(&stack), inner_top(&spec));
        // The end diameter carries on past the last kink.
        let (_, top) = &stack.levels()[stack.len() - 1];
        assert_relative_eq!(top.area(), std::f64::consts::PI * 19.0 * 19.0 / 4.0, max_relative = 1e-12);
    }

    #[test]
    fn test_outer_stack_spans_the_body() {
        let bore = PiecewiseProfile::cylinder(200.0, 19.0).unwrap();
        let outer = PiecewiseProfile::cylinder(200.0, 26.0).unwrap();
        let spec = BodySpec::new(&bore, &outer, 200.0).with_outer_facets(8);
        let stack = outer_stack(&spec, &BuildConfig::draft()).unwrap();

        assert_relative_eq!(stack.levels()[0].0, 0.0);
        assert_relative_eq!(top_z(&stack), 200.0);
        assert_eq!(stack.levels()[0].1.len(), 8);
    }
}
