//! Perspective camera and a damped orbit controller.
//!
//! These types avoid platform APIs; hosts translate pointer/wheel events into
//! `OrbitInput` and the scene calls `OrbitController::update` once per frame.

use crate::constants::*;
use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

/// Right-handed camera with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl PerspectiveCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: CAMERA_START,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOV_DEGREES.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector from eye to target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }
}

/// Matches `CameraUniforms` in the scene shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

impl CameraUniforms {
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
        }
    }
}

/// User intent in CSS pixels (drags) or wheel units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OrbitInput {
    Rotate { dx: f32, dy: f32 },
    Pan { dx: f32, dy: f32 },
    Zoom { delta: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self {
                radius,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let s = self.phi.sin() * self.radius;
        Vec3::new(s * self.theta.sin(), self.phi.cos() * self.radius, s * self.theta.cos())
    }
}

/// Orbits the camera around `target`. With damping on, each `update` moves a
/// fraction of the pending rotation/pan and decays the rest, so it has to run
/// every frame whether or not input arrived.
#[derive(Clone, Debug)]
pub struct OrbitController {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: true,
            damping_factor: ORBIT_DAMPING_FACTOR,
            rotate_speed: ORBIT_ROTATE_SPEED,
            zoom_speed: ORBIT_ZOOM_SPEED,
            pan_speed: ORBIT_PAN_SPEED,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }
}

impl OrbitController {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    pub fn dolly_in(&mut self, factor: f32) {
        self.scale *= factor;
    }

    pub fn dolly_out(&mut self, factor: f32) {
        self.scale /= factor;
    }

    fn zoom_factor(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    /// Queue user input. `viewport_height` is in the same units as the drag deltas.
    pub fn apply(&mut self, input: OrbitInput, camera: &PerspectiveCamera, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        match input {
            OrbitInput::Rotate { dx, dy } => {
                self.rotate_left(TAU * dx * self.rotate_speed / h);
                self.rotate_up(TAU * dy * self.rotate_speed / h);
            }
            OrbitInput::Zoom { delta } => {
                if delta < 0.0 {
                    self.dolly_in(self.zoom_factor());
                } else if delta > 0.0 {
                    self.dolly_out(self.zoom_factor());
                }
            }
            OrbitInput::Pan { dx, dy } => {
                let offset = camera.eye - self.target;
                let target_distance = offset.length() * (camera.fovy_radians * 0.5).tan();
                let view = camera.view_matrix().inverse();
                let right = view.x_axis.truncate();
                let up = view.y_axis.truncate();
                let left = -right * (2.0 * dx * target_distance / h) * self.pan_speed;
                let upward = up * (2.0 * dy * target_distance / h) * self.pan_speed;
                self.pan_offset += left + upward;
            }
        }
    }

    /// Advance one frame. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let previous_eye = camera.eye;
        let previous_target = self.target;
        let mut s = Spherical::from_offset(camera.eye - self.target);

        let f = if self.enable_damping { self.damping_factor } else { 1.0 };
        s.theta += self.delta_theta * f;
        s.phi += self.delta_phi * f;
        s.phi = s
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(ORBIT_EPSILON, PI - ORBIT_EPSILON);
        s.radius = (s.radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * f;

        camera.target = self.target;
        camera.eye = self.target + s.to_offset();

        if self.enable_damping {
            let keep = 1.0 - self.damping_factor;
            self.delta_theta *= keep;
            self.delta_phi *= keep;
            self.pan_offset *= keep;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        previous_eye.distance_squared(camera.eye) > ORBIT_EPSILON
            || previous_target.distance_squared(self.target) > ORBIT_EPSILON
    }

    /// Remaining queued rotation (radians) and pan (world units).
    pub fn pending(&self) -> (f32, f32, f32) {
        (self.delta_theta, self.delta_phi, self.pan_offset.length())
    }
}

/// What a pointer drag does to the orbit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

impl DragMode {
    /// Map a pointer button (0 primary, 1 middle, 2 secondary) to a mode.
    /// Shift turns a primary drag into a pan.
    pub fn for_button(button: u32, shift: bool) -> Option<DragMode> {
        match button {
            0 if shift => Some(DragMode::Pan),
            0 => Some(DragMode::Rotate),
            2 => Some(DragMode::Pan),
            _ => None,
        }
    }
}

/// Turns press/move/release pointer positions into `OrbitInput` deltas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragTracker {
    drag: Option<(DragMode, [f32; 2])>,
}

impl DragTracker {
    pub fn press(&mut self, mode: DragMode, x: f32, y: f32) {
        self.drag = Some((mode, [x, y]));
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> Option<OrbitInput> {
        let (mode, last) = self.drag?;
        let (dx, dy) = (x - last[0], y - last[1]);
        self.drag = Some((mode, [x, y]));
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        Some(match mode {
            DragMode::Rotate => OrbitInput::Rotate { dx, dy },
            DragMode::Pan => OrbitInput::Pan { dx, dy },
        })
    }

    pub fn release(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

/// Wheel or trackpad scroll; positive `delta_y` zooms out.
pub fn wheel_input(delta_y: f32) -> Option<OrbitInput> {
    (delta_y != 0.0 && delta_y.is_finite()).then_some(OrbitInput::Zoom { delta: delta_y })
}
