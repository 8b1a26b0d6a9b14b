// Host-side tests for surface geometry, the CPU height field and colour blend.

use glam::Vec2;
use ocean_core::*;

#[test]
fn plane_has_expected_vertex_and_index_counts() {
    let g = SurfaceGeometry::plane(2.0, 4, 3);
    assert_eq!(g.vertices.len(), 5 * 4);
    assert_eq!(g.indices.len(), 6 * 4 * 3);
    assert_eq!(g.triangle_count(), 2 * 4 * 3);
    assert!(g.indices.iter().all(|&i| (i as usize) < g.vertices.len()));
}

#[test]
fn plane_lies_flat_and_centred() {
    let g = SurfaceGeometry::plane(SURFACE_SIZE, 8, 8);
    let (mut min_x, mut max_x) = (f32::MAX, f32::MIN);
    for v in &g.vertices {
        assert_eq!(v.position[1], 0.0);
        min_x = min_x.min(v.position[0]);
        max_x = max_x.max(v.position[0]);
        assert!((0.0..=1.0).contains(&v.uv[0]) && (0.0..=1.0).contains(&v.uv[1]));
    }
    assert!((min_x + 1.0).abs() < 1e-6);
    assert!((max_x - 1.0).abs() < 1e-6);
}

#[test]
fn zero_elevation_means_flat_water() {
    let mut d = SurfaceDescriptor::default();
    d.big_wave.elevation = 0.0;
    d.small_wave.elevation = 0.0;
    for t in [0.0, 1.3, 47.0, 1000.5] {
        for &(x, z) in &[(0.0, 0.0), (0.37, -0.81), (-1.0, 1.0), (0.5, 0.25)] {
            assert_eq!(d.elevation_at(x, z, t).abs(), 0.0);
        }
    }
}

#[test]
fn small_waves_only_push_down() {
    let mut d = SurfaceDescriptor::default();
    d.big_wave.elevation = 0.0;
    for i in 0..200 {
        let x = (i as f32 * 0.173).sin();
        let z = (i as f32 * 0.291).cos();
        assert!(d.elevation_at(x, z, i as f32 * 0.05) <= 0.0);
    }
}

#[test]
fn big_waves_follow_the_product_of_sines() {
    let mut d = SurfaceDescriptor::default();
    d.small_wave.elevation = 0.0;
    d.big_wave.frequency = Vec2::new(1.0, 1.0);
    d.big_wave.speed = 0.0;
    let expected = (0.5f32).sin() * (0.25f32).sin() * d.big_wave.elevation;
    assert!((d.elevation_at(0.5, 0.25, 9.0) - expected).abs() < 1e-6);
}

#[test]
fn blend_factor_is_clamped_and_monotonic() {
    let mut previous = f32::MIN;
    let mut e = -2.0;
    while e <= 2.0 {
        let f = blend_factor(e, COLOR_OFFSET, COLOR_MULTIPLIER);
        assert!((0.0..=1.0).contains(&f));
        assert!(f >= previous);
        previous = f;
        e += 0.01;
    }
    assert_eq!(blend_factor(-1.0, COLOR_OFFSET, COLOR_MULTIPLIER), 0.0);
    assert_eq!(blend_factor(1.0, COLOR_OFFSET, COLOR_MULTIPLIER), 1.0);
    assert_eq!(blend_factor(0.3, 0.0, -4.0), 0.0);
}

#[test]
fn color_runs_from_depth_to_surface() {
    let d = SurfaceDescriptor::default();
    assert_eq!(d.color_at(-1.0).to_hex(), DEPTH_COLOR_HEX);
    assert_eq!(d.color_at(1.0).to_hex(), SURFACE_COLOR_HEX);
}

#[test]
fn validate_rejects_bad_descriptors() {
    assert!(SurfaceDescriptor::default().validate().is_ok());

    let mut d = SurfaceDescriptor::default();
    d.small_wave.iterations = 0;
    assert!(matches!(d.validate(), Err(SurfaceError::Iterations { got: 0, .. })));

    let mut d = SurfaceDescriptor::default();
    d.big_wave.elevation = -0.1;
    assert!(matches!(d.validate(), Err(SurfaceError::Negative(_))));

    let mut d = SurfaceDescriptor::default();
    d.width_segments = 0;
    assert_eq!(d.validate(), Err(SurfaceError::NoSegments));

    let mut d = SurfaceDescriptor::default();
    d.small_wave.frequency = f32::NAN;
    assert!(matches!(d.validate(), Err(SurfaceError::NonFinite(_))));
}

#[test]
fn validate_caps_segment_count() {
    let mut d = SurfaceDescriptor::default();
    d.width_segments = MAX_SURFACE_SEGMENTS;
    d.height_segments = MAX_SURFACE_SEGMENTS;
    assert!(d.validate().is_ok());

    d.height_segments = 70_000;
    assert_eq!(
        d.validate(),
        Err(SurfaceError::TooManySegments {
            got: 70_000,
            max: MAX_SURFACE_SEGMENTS
        })
    );
}

#[test]
fn plane_clamps_oversized_segment_counts() {
    let g = SurfaceGeometry::plane(2.0, 70_000, 1);
    let w = MAX_SURFACE_SEGMENTS as usize;
    assert_eq!(g.vertices.len(), (w + 1) * 2);
    assert_eq!(g.indices.len(), w * 6);
}

#[test]
fn big_wave_speed_slider_spans_unit_range() {
    let mut store = ParameterStore::new();
    SurfaceDescriptor::default().declare_params(&mut store).unwrap();
    let bounds = store.get(U_BIG_WAVES_SPEED).unwrap().bounds.unwrap();
    assert_eq!((bounds.min, bounds.max), (0.0, 1.0));
    store.set(U_BIG_WAVES_SPEED, ParamValue::Scalar(3.0)).unwrap();
    assert_eq!(store.scalar(U_BIG_WAVES_SPEED), Some(1.0));
}

#[test]
fn uniforms_follow_the_store() {
    let template = SurfaceDescriptor::default();
    let mut store = ParameterStore::new();
    template.declare_params(&mut store).unwrap();
    store
        .set(U_SMALL_WAVES_ITERATIONS, ParamValue::Scalar(2.4))
        .unwrap();
    store.push_clock(5.0);
    let u = SurfaceUniforms::from_params(&template, &store);
    assert_eq!(u.time, 5.0);
    assert_eq!(u.small_iterations, 2.0);
    assert_eq!(u.big_frequency, BIG_WAVES_FREQUENCY.to_array());
    assert_eq!(std::mem::size_of::<SurfaceUniforms>(), 80);
}
