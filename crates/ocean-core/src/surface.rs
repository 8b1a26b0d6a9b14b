//! Ocean surface: a tessellated plane displaced on the GPU by one dominant
//! directional wave and a few octaves of finer noise, colored by elevation.

use crate::color::Color;
use crate::constants::*;
use crate::noise::classic_noise;
use crate::params::{Bounds, ParamError, ParamOwner, Parameter, ParameterStore};
use glam::{Vec2, Vec3};
use thiserror::Error;

// Uniform names (the shader-facing contract)
pub const U_WATER_TIME: &str = "water.uTime";
pub const U_BIG_WAVES_ELEVATION: &str = "uBigWavesElevation";
pub const U_BIG_WAVES_FREQUENCY: &str = "uBigWavesFrequency";
pub const U_BIG_WAVES_SPEED: &str = "uBigWavesSpeed";
pub const U_SMALL_WAVES_ELEVATION: &str = "uSmallWavesElevation";
pub const U_SMALL_WAVES_FREQUENCY: &str = "uSmallWavesFrequency";
pub const U_SMALL_WAVES_SPEED: &str = "uSmallWavesSpeed";
pub const U_SMALL_WAVES_ITERATIONS: &str = "uSmallWavesIterations";
pub const U_DEPTH_COLOR: &str = "uDepthColor";
pub const U_SURFACE_COLOR: &str = "uSurfaceColor";
pub const U_COLOR_OFFSET: &str = "uColorOffset";
pub const U_COLOR_MULTIPLIER: &str = "uColorMultiplier";

// Debug panel folders
pub const GROUP_WATER_COLORS: &str = "Water Colors";
pub const GROUP_BIG_WAVES: &str = "Big Waves";
pub const GROUP_SMALL_WAVES: &str = "Small Waves";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BigWaves {
    pub elevation: f32,
    pub frequency: Vec2,
    pub speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmallWaves {
    pub elevation: f32,
    pub frequency: f32,
    pub speed: f32,
    /// Noise octaves, 1..=MAX_SMALL_WAVES_ITERATIONS.
    pub iterations: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceDescriptor {
    pub size: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub big_wave: BigWaves,
    pub small_wave: SmallWaves,
    pub depth_color: Color,
    pub surface_color: Color,
    pub color_offset: f32,
    pub color_multiplier: f32,
}

#[derive(Debug, Error, PartialEq)]
pub enum SurfaceError {
    #[error("{0} must be non-negative")]
    Negative(&'static str),
    #[error("{0} must be finite")]
    NonFinite(&'static str),
    #[error("small wave iterations must be in 1..={max}, got {got}")]
    Iterations { got: u32, max: u32 },
    #[error("surface needs at least one segment per side")]
    NoSegments,
    #[error("surface segments must be at most {max}, got {got}")]
    TooManySegments { got: u32, max: u32 },
}

impl Default for SurfaceDescriptor {
    fn default() -> Self {
        Self {
            size: SURFACE_SIZE,
            width_segments: SURFACE_SEGMENTS,
            height_segments: SURFACE_SEGMENTS,
            big_wave: BigWaves {
                elevation: BIG_WAVES_ELEVATION,
                frequency: BIG_WAVES_FREQUENCY,
                speed: BIG_WAVES_SPEED,
            },
            small_wave: SmallWaves {
                elevation: SMALL_WAVES_ELEVATION,
                frequency: SMALL_WAVES_FREQUENCY,
                speed: SMALL_WAVES_SPEED,
                iterations: SMALL_WAVES_ITERATIONS,
            },
            depth_color: Color::from_hex(DEPTH_COLOR_HEX).unwrap_or(Color::BLACK),
            surface_color: Color::from_hex(SURFACE_COLOR_HEX).unwrap_or(Color::WHITE),
            color_offset: COLOR_OFFSET,
            color_multiplier: COLOR_MULTIPLIER,
        }
    }
}

impl SurfaceDescriptor {
    pub fn validate(&self) -> Result<(), SurfaceError> {
        if self.width_segments == 0 || self.height_segments == 0 {
            return Err(SurfaceError::NoSegments);
        }
        let most = self.width_segments.max(self.height_segments);
        if most > MAX_SURFACE_SEGMENTS {
            return Err(SurfaceError::TooManySegments {
                got: most,
                max: MAX_SURFACE_SEGMENTS,
            });
        }
        let finite = [
            ("size", self.size),
            ("big wave elevation", self.big_wave.elevation),
            ("big wave frequency", self.big_wave.frequency.x),
            ("big wave frequency", self.big_wave.frequency.y),
            ("big wave speed", self.big_wave.speed),
            ("small wave elevation", self.small_wave.elevation),
            ("small wave frequency", self.small_wave.frequency),
            ("small wave speed", self.small_wave.speed),
            ("color offset", self.color_offset),
            ("color multiplier", self.color_multiplier),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SurfaceError::NonFinite(name));
        }
        let non_negative = [
            ("size", self.size),
            ("big wave elevation", self.big_wave.elevation),
            ("big wave frequency", self.big_wave.frequency.min_element()),
            ("small wave elevation", self.small_wave.elevation),
            ("small wave frequency", self.small_wave.frequency),
            ("color multiplier", self.color_multiplier),
        ];
        if let Some((name, _)) = non_negative.iter().find(|(_, v)| *v < 0.0) {
            return Err(SurfaceError::Negative(name));
        }
        let it = self.small_wave.iterations;
        if it == 0 || it > MAX_SMALL_WAVES_ITERATIONS {
            return Err(SurfaceError::Iterations {
                got: it,
                max: MAX_SMALL_WAVES_ITERATIONS,
            });
        }
        Ok(())
    }

    /// Register this surface's uniforms, seeded with the descriptor's values.
    pub fn declare_params(&self, store: &mut ParameterStore) -> Result<(), ParamError> {
        use ParamOwner::Surface;
        store.declare(Parameter::clock(Surface, U_WATER_TIME))?;
        store.declare(Parameter::color(
            Surface,
            GROUP_WATER_COLORS,
            U_DEPTH_COLOR,
            self.depth_color,
        ))?;
        store.declare(Parameter::color(
            Surface,
            GROUP_WATER_COLORS,
            U_SURFACE_COLOR,
            self.surface_color,
        ))?;
        store.declare(Parameter::scalar(
            Surface,
            GROUP_WATER_COLORS,
            U_COLOR_OFFSET,
            self.color_offset,
            Bounds::new(0.0, 1.0, 0.01),
        ))?;
        store.declare(Parameter::scalar(
            Surface,
            GROUP_WATER_COLORS,
            U_COLOR_MULTIPLIER,
            self.color_multiplier,
            Bounds::new(0.0, 10.0, 0.01),
        ))?;
        store.declare(Parameter::scalar(
            Surface,
            GROUP_BIG_WAVES,
            U_BIG_WAVES_ELEVATION,
            self.big_wave.elevation,
            Bounds::new(0.0, 0.5, 0.01),
        ))?;
        store.declare(Parameter::vector2(
            Surface,
            GROUP_BIG_WAVES,
            U_BIG_WAVES_FREQUENCY,
            self.big_wave.frequency,
            Bounds::new(0.0, 10.0, 0.01),
        ))?;
        store.declare(Parameter::scalar(
            Surface,
            GROUP_BIG_WAVES,
            U_BIG_WAVES_SPEED,
            self.big_wave.speed,
            Bounds::new(0.0, 1.0, 0.01),
        ))?;
        store.declare(Parameter::scalar(
            Surface,
            GROUP_SMALL_WAVES,
            U_SMALL_WAVES_ELEVATION,
            self.small_wave.elevation,
            Bounds::new(0.0, 1.0, 0.01),
        ))?;
        store.declare(Parameter::scalar(
            Surface,
            GROUP_SMALL_WAVES,
            U_SMALL_WAVES_SPEED,
            self.small_wave.speed,
            Bounds::new(0.0, 4.0, 0.01),
        ))?;
        store.declare(Parameter::scalar(
            Surface,
            GROUP_SMALL_WAVES,
            U_SMALL_WAVES_FREQUENCY,
            self.small_wave.frequency,
            Bounds::new(0.0, 30.0, 0.01),
        ))?;
        store.declare(Parameter::scalar(
            Surface,
            GROUP_SMALL_WAVES,
            U_SMALL_WAVES_ITERATIONS,
            self.small_wave.iterations as f32,
            Bounds::new(1.0, MAX_SMALL_WAVES_ITERATIONS as f32, 1.0),
        ))?;
        Ok(())
    }

    /// Current values from the store; geometry fields are kept from `self`.
    pub fn with_params(&self, store: &ParameterStore) -> SurfaceDescriptor {
        let scalar = |name: &str, fallback: f32| store.scalar(name).unwrap_or(fallback);
        SurfaceDescriptor {
            size: self.size,
            width_segments: self.width_segments,
            height_segments: self.height_segments,
            big_wave: BigWaves {
                elevation: scalar(U_BIG_WAVES_ELEVATION, self.big_wave.elevation),
                frequency: store
                    .vector2(U_BIG_WAVES_FREQUENCY)
                    .unwrap_or(self.big_wave.frequency),
                speed: scalar(U_BIG_WAVES_SPEED, self.big_wave.speed),
            },
            small_wave: SmallWaves {
                elevation: scalar(U_SMALL_WAVES_ELEVATION, self.small_wave.elevation),
                frequency: scalar(U_SMALL_WAVES_FREQUENCY, self.small_wave.frequency),
                speed: scalar(U_SMALL_WAVES_SPEED, self.small_wave.speed),
                iterations: iterations_from(scalar(
                    U_SMALL_WAVES_ITERATIONS,
                    self.small_wave.iterations as f32,
                )),
            },
            depth_color: store.color(U_DEPTH_COLOR).unwrap_or(self.depth_color),
            surface_color: store.color(U_SURFACE_COLOR).unwrap_or(self.surface_color),
            color_offset: scalar(U_COLOR_OFFSET, self.color_offset),
            color_multiplier: scalar(U_COLOR_MULTIPLIER, self.color_multiplier),
        }
    }

    /// Vertical displacement at world `(x, z)` and time `t`, as computed by
    /// the vertex stage of `surface.wgsl`.
    pub fn elevation_at(&self, x: f32, z: f32, t: f32) -> f32 {
        let big = &self.big_wave;
        let mut elevation = (x * big.frequency.x + t * big.speed).sin()
            * (z * big.frequency.y + t * big.speed).sin()
            * big.elevation;
        let small = &self.small_wave;
        for i in 1..=small.iterations.min(MAX_SMALL_WAVES_ITERATIONS) {
            let i = i as f32;
            let p = Vec3::new(x * small.frequency * i, z * small.frequency * i, t * small.speed);
            elevation -= (classic_noise(p) * small.elevation / i).abs();
        }
        elevation
    }

    pub fn color_at(&self, elevation: f32) -> Color {
        let t = blend_factor(elevation, self.color_offset, self.color_multiplier);
        self.depth_color.lerp(self.surface_color, t)
    }
}

fn iterations_from(v: f32) -> u32 {
    if v.is_finite() {
        (v.round() as u32).clamp(1, MAX_SMALL_WAVES_ITERATIONS)
    } else {
        SMALL_WAVES_ITERATIONS
    }
}

/// Depth→surface mix weight. Offset shifts the midpoint, multiplier sharpens
/// the transition; the result is non-decreasing in `elevation` and in \[0, 1\].
#[inline]
pub fn blend_factor(elevation: f32, offset: f32, multiplier: f32) -> f32 {
    let f = (elevation + offset) * multiplier.max(0.0);
    if f.is_nan() {
        0.0
    } else {
        f.clamp(0.0, 1.0)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Horizontal grid in the XZ plane centred on the origin.
pub struct SurfaceGeometry {
    pub vertices: Vec<SurfaceVertex>,
    pub indices: Vec<u32>,
}

impl SurfaceGeometry {
    /// Segment counts are clamped to `1..=MAX_SURFACE_SEGMENTS`.
    pub fn plane(size: f32, width_segments: u32, height_segments: u32) -> Self {
        let w = width_segments.clamp(1, MAX_SURFACE_SEGMENTS);
        let h = height_segments.clamp(1, MAX_SURFACE_SEGMENTS);
        let half = size * 0.5;
        let seg_w = size / w as f32;
        let seg_h = size / h as f32;
        let mut vertices = Vec::with_capacity((w as usize + 1) * (h as usize + 1));
        for iy in 0..=h {
            let z = iy as f32 * seg_h - half;
            for ix in 0..=w {
                let x = ix as f32 * seg_w - half;
                vertices.push(SurfaceVertex {
                    position: [x, 0.0, z],
                    uv: [ix as f32 / w as f32, 1.0 - iy as f32 / h as f32],
                });
            }
        }
        let mut indices = Vec::with_capacity(w as usize * h as usize * 6);
        let row = w + 1;
        for iy in 0..h {
            for ix in 0..w {
                let a = ix + row * iy;
                let b = ix + row * (iy + 1);
                let c = ix + 1 + row * (iy + 1);
                let d = ix + 1 + row * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Matches `SurfaceUniforms` in `surface.wgsl` (80 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceUniforms {
    pub depth_color: [f32; 4],
    pub surface_color: [f32; 4],
    pub big_frequency: [f32; 2],
    pub big_elevation: f32,
    pub big_speed: f32,
    pub small_elevation: f32,
    pub small_frequency: f32,
    pub small_speed: f32,
    pub small_iterations: f32,
    pub color_offset: f32,
    pub color_multiplier: f32,
    pub time: f32,
    pub _pad: f32,
}

impl SurfaceUniforms {
    pub fn from_descriptor(d: &SurfaceDescriptor, time: f32) -> Self {
        Self {
            depth_color: d.depth_color.to_vec4_array(),
            surface_color: d.surface_color.to_vec4_array(),
            big_frequency: d.big_wave.frequency.to_array(),
            big_elevation: d.big_wave.elevation,
            big_speed: d.big_wave.speed,
            small_elevation: d.small_wave.elevation,
            small_frequency: d.small_wave.frequency,
            small_speed: d.small_wave.speed,
            small_iterations: d.small_wave.iterations as f32,
            color_offset: d.color_offset,
            color_multiplier: d.color_multiplier,
            time,
            _pad: 0.0,
        }
    }

    pub fn from_params(template: &SurfaceDescriptor, store: &ParameterStore) -> Self {
        let time = store.scalar(U_WATER_TIME).unwrap_or(0.0);
        Self::from_descriptor(&template.with_params(store), time)
    }
}
