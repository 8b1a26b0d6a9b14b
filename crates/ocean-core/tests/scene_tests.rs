// Host-side tests for the scene context: events in, frame plans out.

use ocean_core::*;

fn tick(index: u64, elapsed: f32) -> FrameTick {
    FrameTick {
        index,
        elapsed,
        delta: 0.0,
    }
}

fn scene(config: SceneConfig) -> Scene {
    Scene::new(config, ViewportState::new(1280, 720, 1.0)).unwrap()
}

#[test]
fn time_reaches_both_programs() {
    let mut scene = scene(SceneConfig::default());
    let plan = scene.tick(tick(0, 2.5));
    assert_eq!(plan.surface.time, 2.5);
    assert_eq!(plan.particles.time, 2.5);
    assert_eq!(plan.tick.elapsed, 2.5);
}

#[test]
fn resize_applies_on_the_next_tick() {
    let mut scene = scene(SceneConfig::default());
    let bus = scene.bus();
    bus.send(SceneEvent::Resize(ViewportState::new(801, 600, 3.0)));
    assert_eq!(scene.viewport().width, 1280);

    let plan = scene.tick(tick(0, 0.0));
    assert_eq!(plan.physical_size, (1602, 1200));
    assert_eq!(plan.viewport.pixel_ratio, 2.0);
    assert_eq!(plan.particles.viewport, [1602.0, 1200.0]);
    assert_eq!(plan.particles.pixel_ratio, 2.0);
    assert!((scene.camera().aspect - 801.0 / 600.0).abs() < 1e-6);
    assert!(bus.is_empty());
}

#[test]
fn zero_sized_viewport_is_clamped() {
    let mut scene = scene(SceneConfig::default());
    scene.resize(ViewportState::new(0, 0, 1.0));
    let plan = scene.tick(tick(0, 0.0));
    assert_eq!(plan.physical_size, (1, 1));
}

#[test]
fn parameter_events_show_up_in_the_next_plan() {
    let mut scene = scene(SceneConfig::default());
    scene.tick(tick(0, 0.0));
    scene.bus().send(SceneEvent::Param(ParamChange::new(
        U_BIG_WAVES_ELEVATION,
        ParamValue::Scalar(0.3),
    )));
    scene.bus().send(SceneEvent::Param(ParamChange::new(
        U_TOP_COLOR,
        ParamValue::Color(Color::WHITE),
    )));
    let plan = scene.tick(tick(1, 0.016));
    assert_eq!(plan.surface.big_elevation, 0.3);
    assert_eq!(plan.gradient.unwrap().top, [1.0, 1.0, 1.0, 1.0]);
    assert!(plan.changed(ParamOwner::Gradient));
}

#[test]
fn rejected_events_are_dropped() {
    let mut scene = scene(SceneConfig::default());
    let bus = scene.bus();
    bus.send(SceneEvent::Param(ParamChange::new("uMissing", ParamValue::Scalar(1.0))));
    bus.send(SceneEvent::Param(ParamChange::new(U_SIZE, ParamValue::Scalar(f32::NAN))));
    bus.send(SceneEvent::SetPassEnabled {
        kind: PassKind::Render,
        enabled: false,
    });
    let plan = scene.tick(tick(0, 0.0));
    assert_eq!(plan.particles.size, PARTICLE_SIZE);
    assert!(scene.passes().is_enabled(PassKind::Render));
    assert_eq!(plan.passes, PassChain::new().plan());
}

#[test]
fn gradient_changes_are_reported_once() {
    let mut scene = scene(SceneConfig::default());
    let first = scene.tick(tick(0, 0.0));
    assert!(first.changed(ParamOwner::Gradient));
    let second = scene.tick(tick(1, 0.1));
    assert!(!second.changed(ParamOwner::Gradient));
    assert!(second.changed(ParamOwner::Surface));
}

#[test]
fn pass_toggles_round_trip_through_the_bus() {
    let mut scene = scene(SceneConfig::default());
    let baseline = scene.tick(tick(0, 0.0)).passes;
    let bus = scene.bus();
    bus.send(SceneEvent::SetPassEnabled {
        kind: PassKind::Bloom,
        enabled: false,
    });
    let off = scene.tick(tick(1, 0.1)).passes;
    assert!(!off.runs(PassKind::Bloom));
    bus.send(SceneEvent::SetPassEnabled {
        kind: PassKind::Bloom,
        enabled: true,
    });
    assert_eq!(scene.tick(tick(2, 0.2)).passes, baseline);
}

#[test]
fn glitch_only_advances_while_enabled() {
    let mut scene = scene(SceneConfig::default());
    let plan = scene.tick(tick(0, 0.0));
    assert_eq!(plan.post.glitch.bypass, 1);

    scene.bus().send(SceneEvent::SetPassEnabled {
        kind: PassKind::Glitch,
        enabled: true,
    });
    let plan = scene.tick(tick(1, 0.1));
    assert!(plan.passes.runs(PassKind::Glitch));
    assert_eq!(plan.post.glitch.bypass, 0);
}

#[test]
fn empty_particle_field_plans_zero_instances() {
    let mut scene = scene(SceneConfig {
        particle_count: 0,
        ..SceneConfig::default()
    });
    let plan = scene.tick(tick(0, 1.0));
    assert_eq!(plan.particle_count, 0);
    assert!(scene.particle_instances().is_empty());
}

#[test]
fn plain_variant_has_no_backdrop() {
    let mut scene = scene(SceneConfig {
        variant: SceneVariant::Ocean,
        ..SceneConfig::default()
    });
    assert!(scene.tick(tick(0, 0.0)).gradient.is_none());
    assert!(scene.params().get(U_TOP_COLOR).is_none());

    let mut scene = self::scene(SceneConfig::default());
    assert!(scene.tick(tick(0, 0.0)).gradient.is_some());
}

#[test]
fn orbit_events_move_the_camera() {
    let mut scene = scene(SceneConfig::default());
    let start = scene.camera().eye;
    scene
        .bus()
        .send(SceneEvent::Orbit(OrbitInput::Rotate { dx: 40.0, dy: 10.0 }));
    let plan = scene.tick(tick(0, 0.0));
    assert!(plan.camera_moved);
    assert_ne!(scene.camera().eye, start);
}

#[test]
fn invalid_config_fails_fast() {
    let err = Scene::new(
        SceneConfig {
            surface_segments: 0,
            ..SceneConfig::default()
        },
        ViewportState::default(),
    )
    .err();
    assert_eq!(err, Some(SceneError::Surface(SurfaceError::NoSegments)));
}

#[test]
fn oversized_segment_flag_fails_fast() {
    let config = SceneConfig::from_flags(["segments=70000"]);
    let err = Scene::new(config, ViewportState::default()).err();
    assert!(matches!(
        err,
        Some(SceneError::Surface(SurfaceError::TooManySegments { got: 70_000, .. }))
    ));
}

#[test]
fn flags_configure_the_scene() {
    let config =
        SceneConfig::from_flags(["debug", "--plain", "particles=500", "seed=7", "segments=64"]);
    assert!(config.debug);
    assert_eq!(config.variant, SceneVariant::Ocean);
    assert_eq!(config.particle_count, 500);
    assert_eq!(config.seed, 7);
    assert_eq!(config.surface_segments, 64);

    let config = SceneConfig::from_flags(["#debug", "particles=lots", "bogus", ""]);
    assert!(config.debug);
    assert_eq!(config.particle_count, PARTICLE_COUNT);
    assert_eq!(config.variant, SceneVariant::OceanWithBackdrop);
}
