use crate::constants::*;
use crate::params::{Bounds, ParamError, ParamOwner, Parameter, ParameterStore};
use rand::prelude::*;

pub const U_PARTICLES_TIME: &str = "particles.uTime";
pub const U_SIZE: &str = "uSize";
pub const U_PROGRESS_SPEED: &str = "uProgressSpeed";
pub const GROUP_PARTICLES: &str = "Particles";

/// Per-particle state, stored as parallel arrays indexed in lock-step.
///
/// Particle `i` is `positions[3i..3i+3]`, `progress[i]`, `scale[i]` and
/// `alpha[i]`. Values are randomised once at creation and never mutated; the
/// animation comes from `displayed_progress` evaluated on the GPU.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSet {
    count: usize,
    positions: Vec<f32>,
    progress: Vec<f32>,
    scale: Vec<f32>,
    alpha: Vec<f32>,
}

/// Read-only view of one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: [f32; 3],
    pub progress: f32,
    pub scale: f32,
    pub alpha: f32,
}

impl ParticleSet {
    pub fn random(count: usize, rng: &mut impl Rng) -> Self {
        let mut positions = vec![0.0; count * 3];
        let mut progress = vec![0.0; count];
        let mut scale = vec![0.0; count];
        let mut alpha = vec![0.0; count];
        for i in 0..count {
            positions[i * 3] = (rng.gen::<f32>() - 0.5) * PARTICLE_SPREAD;
            positions[i * 3 + 1] = PARTICLE_BASE_Y;
            positions[i * 3 + 2] = (rng.gen::<f32>() - 0.5) * PARTICLE_SPREAD;
            scale[i] = rng.gen();
            progress[i] = rng.gen();
            alpha[i] = rng.gen();
        }
        Self {
            count,
            positions,
            progress,
            scale,
            alpha,
        }
    }

    pub fn seeded(count: usize, seed: u64) -> Self {
        Self::random(count, &mut StdRng::seed_from_u64(seed))
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, i: usize) -> Option<Particle> {
        (i < self.count).then(|| Particle {
            position: [
                self.positions[i * 3],
                self.positions[i * 3 + 1],
                self.positions[i * 3 + 2],
            ],
            progress: self.progress[i],
            scale: self.scale[i],
            alpha: self.alpha[i],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Particle> + '_ {
        (0..self.count).filter_map(move |i| self.get(i))
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn progress(&self) -> &[f32] {
        &self.progress
    }

    pub fn scales(&self) -> &[f32] {
        &self.scale
    }

    pub fn alphas(&self) -> &[f32] {
        &self.alpha
    }

    /// Interleaved per-instance vertex data for the GPU.
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.iter()
            .map(|p| ParticleInstance {
                position: p.position,
                progress: p.progress,
                scale: p.scale,
                alpha: p.alpha,
            })
            .collect()
    }
}

pub fn declare_particle_params(store: &mut ParameterStore) -> Result<(), ParamError> {
    use ParamOwner::Particles;
    store.declare(Parameter::clock(Particles, U_PARTICLES_TIME))?;
    store.declare(Parameter::scalar(
        Particles,
        GROUP_PARTICLES,
        U_SIZE,
        PARTICLE_SIZE,
        Bounds::new(0.0, 100.0, 1.0),
    ))?;
    store.declare(Parameter::scalar(
        Particles,
        GROUP_PARTICLES,
        U_PROGRESS_SPEED,
        PARTICLE_PROGRESS_SPEED,
        Bounds::new(0.0, 1.0, 0.01),
    ))?;
    Ok(())
}

/// `fract(progress + elapsed * speed)`, always in \[0, 1).
#[inline]
pub fn displayed_progress(progress: f32, elapsed: f32, speed: f32) -> f32 {
    let p = (progress + elapsed * speed).rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if p.is_finite() && p < 1.0 {
        p
    } else {
        0.0
    }
}

/// Opacity envelope over one cycle: fades in and out, scaled by the static alpha.
#[inline]
pub fn particle_opacity(progress: f32, alpha: f32) -> f32 {
    (std::f32::consts::PI * progress).sin() * alpha
}

/// Sprite edge length in physical pixels for a particle `view_depth` units in
/// front of the camera.
#[inline]
pub fn sprite_size_px(size: f32, scale: f32, pixel_ratio: f32, view_depth: f32) -> f32 {
    if view_depth <= 0.0 {
        return 0.0;
    }
    size * scale * pixel_ratio / view_depth
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub progress: f32,
    pub scale: f32,
    pub alpha: f32,
}

/// Matches `ParticleUniforms` in `particles.wgsl` (32 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleUniforms {
    pub time: f32,
    pub size: f32,
    pub progress_speed: f32,
    pub pixel_ratio: f32,
    pub viewport: [f32; 2],
    pub rise: f32,
    pub _pad: f32,
}

impl ParticleUniforms {
    pub fn from_params(store: &ParameterStore, pixel_ratio: f32, viewport_px: [f32; 2]) -> Self {
        Self {
            time: store.scalar(U_PARTICLES_TIME).unwrap_or(0.0),
            size: store.scalar(U_SIZE).unwrap_or(PARTICLE_SIZE),
            progress_speed: store.scalar(U_PROGRESS_SPEED).unwrap_or(PARTICLE_PROGRESS_SPEED),
            pixel_ratio,
            viewport: viewport_px,
            rise: PARTICLE_RISE,
            _pad: 0.0,
        }
    }
}
