// Host-side tests for the perspective camera and orbit controller.

use glam::Vec3;
use ocean_core::*;
use std::f32::consts::{FRAC_PI_4, PI, TAU};

const HEIGHT: f32 = 720.0;

fn setup() -> (PerspectiveCamera, OrbitController) {
    (PerspectiveCamera::new(16.0 / 9.0), OrbitController::new(Vec3::ZERO))
}

#[test]
fn starts_at_one_one_one_looking_at_origin() {
    let (camera, _) = setup();
    assert_eq!(camera.eye, Vec3::ONE);
    assert_eq!(camera.target, Vec3::ZERO);
    assert!((camera.fovy_radians - 75f32.to_radians()).abs() < 1e-6);
    let clip = camera.view_projection() * Vec3::ZERO.extend(1.0);
    assert!((clip.x / clip.w).abs() < 1e-5 && (clip.y / clip.w).abs() < 1e-5);
}

#[test]
fn idle_controller_keeps_the_camera_still() {
    let (mut camera, mut controller) = setup();
    let start = camera.eye;
    for _ in 0..600 {
        controller.update(&mut camera);
    }
    assert!(camera.eye.distance(start) < 1e-4, "drifted to {:?}", camera.eye);
}

#[test]
fn rotation_is_damped_and_converges() {
    let (mut camera, mut controller) = setup();
    controller.apply(OrbitInput::Rotate { dx: 100.0, dy: 0.0 }, &camera, HEIGHT);
    let expected_turn = TAU * 100.0 / HEIGHT;

    assert!(controller.update(&mut camera));
    let after_one = camera.eye.x.atan2(camera.eye.z);
    assert!((after_one - (FRAC_PI_4 - expected_turn * ORBIT_DAMPING_FACTOR)).abs() < 1e-4);

    let mut last_pending = controller.pending().0.abs();
    for _ in 0..400 {
        controller.update(&mut camera);
        let pending = controller.pending().0.abs();
        assert!(pending <= last_pending);
        last_pending = pending;
    }
    assert!(last_pending < 1e-6);
    let theta = camera.eye.x.atan2(camera.eye.z);
    assert!((theta - (FRAC_PI_4 - expected_turn)).abs() < 1e-3, "theta {theta}");
    assert!((camera.eye.length() - 3f32.sqrt()).abs() < 1e-4);
}

#[test]
fn undamped_rotation_applies_at_once() {
    let (mut camera, mut controller) = setup();
    controller.enable_damping = false;
    controller.apply(OrbitInput::Rotate { dx: 0.0, dy: 0.0 }, &camera, HEIGHT);
    controller.rotate_left(0.5);
    controller.update(&mut camera);
    assert_eq!(controller.pending().0, 0.0);
    assert!((camera.eye.x.atan2(camera.eye.z) - (FRAC_PI_4 - 0.5)).abs() < 1e-5);
}

#[test]
fn wheel_dollies_in_and_out() {
    let (mut camera, mut controller) = setup();
    let start = camera.eye.length();
    controller.apply(OrbitInput::Zoom { delta: -1.0 }, &camera, HEIGHT);
    controller.update(&mut camera);
    assert!((camera.eye.length() - start * 0.95).abs() < 1e-4);
    controller.apply(OrbitInput::Zoom { delta: 1.0 }, &camera, HEIGHT);
    controller.update(&mut camera);
    assert!((camera.eye.length() - start).abs() < 1e-4);
}

#[test]
fn distance_is_clamped() {
    let (mut camera, mut controller) = setup();
    for _ in 0..500 {
        controller.apply(OrbitInput::Zoom { delta: 1.0 }, &camera, HEIGHT);
        controller.update(&mut camera);
    }
    assert!(camera.eye.length() <= ORBIT_MAX_DISTANCE + 1e-3);
    for _ in 0..500 {
        controller.apply(OrbitInput::Zoom { delta: -1.0 }, &camera, HEIGHT);
        controller.update(&mut camera);
    }
    assert!(camera.eye.length() >= ORBIT_MIN_DISTANCE - 1e-3);
}

#[test]
fn polar_angle_never_flips_over_the_pole() {
    let (mut camera, mut controller) = setup();
    controller.apply(OrbitInput::Rotate { dx: 0.0, dy: 50_000.0 }, &camera, HEIGHT);
    for _ in 0..200 {
        controller.update(&mut camera);
        assert!(camera.eye.is_finite());
        assert!(camera.eye.y > 0.0);
        assert!(camera.view_projection().is_finite());
    }
    controller.apply(OrbitInput::Rotate { dx: 0.0, dy: -50_000.0 }, &camera, HEIGHT);
    for _ in 0..200 {
        controller.update(&mut camera);
        let phi = (camera.eye.y / camera.eye.length()).clamp(-1.0, 1.0).acos();
        assert!(phi <= PI);
        assert!(camera.view_projection().is_finite());
    }
    assert!(camera.eye.y < 0.0);
}

#[test]
fn pan_moves_the_target() {
    let (mut camera, mut controller) = setup();
    controller.apply(OrbitInput::Pan { dx: 50.0, dy: 0.0 }, &camera, HEIGHT);
    for _ in 0..300 {
        controller.update(&mut camera);
    }
    assert!(controller.target.length() > 0.01);
    assert_eq!(camera.target, controller.target);
    assert!(controller.target.y.abs() < 1e-4);
}

#[test]
fn aspect_updates_ignore_garbage() {
    let (mut camera, _) = setup();
    camera.set_aspect(2.0);
    assert_eq!(camera.aspect, 2.0);
    camera.set_aspect(f32::NAN);
    camera.set_aspect(0.0);
    assert_eq!(camera.aspect, 2.0);
    assert_eq!(std::mem::size_of::<CameraUniforms>(), 128);
}

#[test]
fn drag_modes_follow_buttons() {
    assert_eq!(DragMode::for_button(0, false), Some(DragMode::Rotate));
    assert_eq!(DragMode::for_button(0, true), Some(DragMode::Pan));
    assert_eq!(DragMode::for_button(2, false), Some(DragMode::Pan));
    assert_eq!(DragMode::for_button(1, false), None);
}

#[test]
fn drag_tracker_emits_deltas_between_moves() {
    let mut drag = DragTracker::default();
    assert_eq!(drag.move_to(5.0, 5.0), None);

    drag.press(DragMode::Rotate, 10.0, 20.0);
    assert!(drag.is_dragging());
    assert_eq!(drag.move_to(14.0, 17.0), Some(OrbitInput::Rotate { dx: 4.0, dy: -3.0 }));
    assert_eq!(drag.move_to(14.0, 17.0), None);
    assert_eq!(drag.move_to(15.0, 17.0), Some(OrbitInput::Rotate { dx: 1.0, dy: 0.0 }));

    drag.release();
    assert!(!drag.is_dragging());
    assert_eq!(drag.move_to(0.0, 0.0), None);
}

#[test]
fn pan_drag_emits_pan() {
    let mut drag = DragTracker::default();
    drag.press(DragMode::Pan, 0.0, 0.0);
    assert_eq!(drag.move_to(2.0, 1.0), Some(OrbitInput::Pan { dx: 2.0, dy: 1.0 }));
}

#[test]
fn wheel_ignores_zero_and_nan() {
    assert_eq!(wheel_input(0.0), None);
    assert_eq!(wheel_input(f32::NAN), None);
    assert_eq!(wheel_input(-3.0), Some(OrbitInput::Zoom { delta: -3.0 }));
}
