//! End-to-end body synthesis, rendering and segmenting.

use std::f64::consts::PI;

use approx::assert_relative_eq;
use woodwind_geom::{generators, BuildConfig, PiecewiseProfile, SpanShape};
use woodwind_mesh::{export, BspEngine, Mesh};
use woodwind_model::body::{inner_stack, outer_stack};
use woodwind_model::{
    render, to_script, BodySpec, CorkSpec, EmbouchureSpec, Hole, MeshBackend, Segmenter, Side,
    SolidNode,
};

fn tube_profiles(length: f64) -> (PiecewiseProfile, PiecewiseProfile) {
    (
        PiecewiseProfile::cylinder(length, 19.0).unwrap(),
        PiecewiseProfile::cylinder(length, 26.0).unwrap(),
    )
}

fn backend() -> MeshBackend {
    MeshBackend::new(BspEngine)
}

#[test]
fn zero_hole_body_is_one_closed_solid() {
    let (bore, outer) = tube_profiles(100.0);
    let spec = BodySpec::new(&bore, &outer, 100.0);
    let config = BuildConfig::draft();

    let outer_mesh = outer_stack(&spec, &config).unwrap().build().unwrap();
    let inner_mesh = inner_stack(&spec, &config).unwrap().build().unwrap();
    assert!(outer_mesh.is_closed());
    assert!(inner_mesh.is_closed());
    assert_eq!(outer_mesh.boundary_edge_count(), 0);
    assert_eq!(inner_mesh.boundary_edge_count(), 0);

    let mesh = spec.synthesize(&config).unwrap().to_mesh().unwrap();
    assert!(mesh.is_closed());
    assert_eq!(mesh.boundary_edge_count(), 0);
    let expected = PI * (13.0 * 13.0 - 9.5 * 9.5) * 100.0;
    assert!(mesh.signed_volume() > 0.0);
    assert_relative_eq!(mesh.signed_volume(), expected, max_relative = 1e-6);

    let (min, max) = mesh.bounding_box();
    assert_relative_eq!(min.z, 0.0, epsilon = 1e-9);
    assert_relative_eq!(max.z, 100.0, epsilon = 1e-9);
}

#[test]
fn stepped_bore_lofts_closed() {
    let bore = PiecewiseProfile::new(
        vec![0.0, 50.0, 100.0],
        vec![19.0, 19.0, 17.0],
        vec![19.0, 18.0, 17.0],
    )
    .unwrap()
    .with_shape(SpanShape::Clothoid { angle: 0.5 })
    .unwrap();
    let outer = PiecewiseProfile::cylinder(100.0, 26.0).unwrap();
    let spec = BodySpec::new(&bore, &outer, 100.0);

    let stack = inner_stack(&spec, &BuildConfig::draft()).unwrap();
    let z: Vec<f64> = stack.levels().iter().map(|(z, _)| *z).collect();
    assert_eq!(z.iter().filter(|&&v| v == 50.0).count(), 2);
    assert!(stack.build().unwrap().is_closed());
}

#[test]
fn cylinder_segments_cover_the_length() {
    let (bore, outer) = tube_profiles(100.0);
    let mesh = BodySpec::new(&bore, &outer, 100.0)
        .synthesize(&BuildConfig::draft())
        .unwrap()
        .to_mesh()
        .unwrap();

    let segments = Segmenter::new(20.0)
        .segment_all(&mesh, &[0.0, 50.0, 100.0], Side::Whole)
        .unwrap();
    assert_eq!(segments.len(), 2);
    let total: f64 = segments.iter().map(|s| s.length).sum();
    assert_relative_eq!(total, 100.0);

    for segment in &segments {
        let (min, max) = segment.mesh.bounding_box();
        assert_relative_eq!(min.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(max.z - min.z, segment.length, epsilon = 1e-9);
    }
}

#[test]
fn half_segments_lie_on_their_cut_face() {
    let (bore, outer) = tube_profiles(100.0);
    let mesh = BodySpec::new(&bore, &outer, 100.0)
        .synthesize(&BuildConfig::draft())
        .unwrap()
        .to_mesh()
        .unwrap();
    // Area-corrected polygon: vertices sit slightly outside r = 13.
    let height = generators::circle(26.0, &BuildConfig::draft())
        .unwrap()
        .extent()
        .y_max;

    for side in [Side::Top, Side::Bottom] {
        let segments = Segmenter::new(20.0)
            .segment_all(&mesh, &[0.0, 50.0, 100.0], side)
            .unwrap();
        for segment in &segments {
            let (min, max) = segment.mesh.bounding_box();
            assert_relative_eq!(min.z, 0.0, epsilon = 1e-12);
            assert_relative_eq!(max.z, height, epsilon = 1e-6);
            assert_relative_eq!(max.y - min.y, 50.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn round_aperture_has_circular_cross_section() {
    let spec = EmbouchureSpec::new(120.0, 10.0);
    assert_eq!(spec.eccentricity, 1.0);
    let mesh = render(&backend(), &spec.aperture(20.0, 32)).unwrap();
    for v in mesh.vertices() {
        let radial = (v.y * v.y + (v.z - 120.0) * (v.z - 120.0)).sqrt();
        assert_relative_eq!(radial, 5.0, epsilon = 1e-9);
    }
}

#[test]
fn full_body_renders_both_ways() {
    let (bore, outer) = tube_profiles(200.0);
    let model = BodySpec::new(&bore, &outer, 200.0)
        .with_holes(vec![Hole::new(40.0, 8.0), Hole::new(70.0, 9.0)])
        .with_ring_width(1.0)
        .with_outer_facets(12)
        .with_embouchure(EmbouchureSpec::new(150.0, 10.0).with_eccentricity(1.2))
        .with_cork(CorkSpec::new(17.0, 10.0, -0.2))
        .synthesize(&BuildConfig::draft())
        .unwrap();

    let mesh = model.to_mesh().unwrap();
    assert!(mesh.is_closed());
    assert_eq!(mesh.boundary_edge_count(), 0);
    assert!(mesh.signed_volume() > 0.0);
    let (_, max) = mesh.bounding_box();
    // Plate and collars stand proud of the outer surface.
    assert!(max.x > 13.0);

    let script = to_script(&model.body).unwrap();
    assert!(script.starts_with("union() {"));
    let labels = [
        "// outer",
        "// bore",
        "// hole 1",
        "// hole 2",
        "// collar 1",
        "// aperture",
        "// plate",
        "// cork",
    ];
    for label in labels {
        assert!(script.contains(label), "missing {label}");
    }
    assert!(script.contains("rotate([0, 0, 15]) {"));
}

#[test]
fn drilled_body_is_one_closed_solid() {
    let (bore, outer) = tube_profiles(60.0);
    let mesh = BodySpec::new(&bore, &outer, 60.0)
        .with_holes(vec![Hole::new(30.0, 6.0)])
        .synthesize(&BuildConfig::draft())
        .unwrap()
        .to_mesh()
        .unwrap();

    assert!(mesh.is_closed());
    assert_eq!(mesh.boundary_edge_count(), 0);
    let undrilled = PI * (13.0 * 13.0 - 9.5 * 9.5) * 60.0;
    assert!(mesh.signed_volume() > 0.0);
    assert!(mesh.signed_volume() < undrilled);
}

#[test]
fn body_exports_as_stl() {
    let (bore, outer) = tube_profiles(60.0);
    let mesh: Mesh = BodySpec::new(&bore, &outer, 60.0)
        .with_holes(vec![Hole::new(30.0, 6.0)])
        .synthesize(&BuildConfig::draft())
        .unwrap()
        .to_mesh()
        .unwrap();

    let mut bytes = Vec::new();
    export::write_stl_binary(&mesh, &mut bytes).unwrap();
    assert_eq!(
        bytes.len(),
        84 + export::TRIANGLE_RECORD_SIZE * mesh.triangle_count()
    );
}

#[test]
fn stacked_primitives_render_in_place() {
    let node = SolidNode::union(vec![
        SolidNode::cylinder(10.0, 2.0, 2.0, 16),
        SolidNode::translate(
            glam::DVec3::new(0.0, 0.0, 10.0),
            vec![SolidNode::cylinder(5.0, 2.0, 0.0, 16)],
        ),
    ]);
    let mesh = render(&backend(), &node).unwrap();
    let (min, max) = mesh.bounding_box();
    assert_relative_eq!(min.z, 0.0, epsilon = 1e-12);
    assert_relative_eq!(max.z, 15.0, epsilon = 1e-9);
}
