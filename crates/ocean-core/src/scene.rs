//! Scene context: owns every piece of per-scene state and turns one frame
//! tick into a `FramePlan` the renderer can execute without further input.

use crate::bus::{EventBus, SceneEvent};
use crate::camera::{CameraUniforms, OrbitController, PerspectiveCamera};
use crate::constants::*;
use crate::gradient::{GradientDescriptor, GradientUniforms};
use crate::params::{ParamError, ParamOwner, ParameterStore};
use crate::particles::{declare_particle_params, ParticleInstance, ParticleSet, ParticleUniforms};
use crate::passes::{GlitchState, PassChain, PassError, PassKind, PostUniforms, RenderPlan};
use crate::schedule::FrameTick;
use crate::surface::{SurfaceDescriptor, SurfaceError, SurfaceUniforms};
use crate::viewport::ViewportState;
use glam::Vec3;
use thiserror::Error;

/// Which layers the scene draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneVariant {
    /// Surface and particles over a cleared background.
    Ocean,
    /// Same, drawn over the full-screen gradient.
    OceanWithBackdrop,
}

impl SceneVariant {
    pub fn has_backdrop(self) -> bool {
        self == SceneVariant::OceanWithBackdrop
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub variant: SceneVariant,
    pub particle_count: usize,
    pub surface_segments: u32,
    pub seed: u64,
    /// Show the parameter panel (web host only).
    pub debug: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            variant: SceneVariant::OceanWithBackdrop,
            particle_count: PARTICLE_COUNT,
            surface_segments: SURFACE_SEGMENTS,
            seed: DEFAULT_SEED,
            debug: false,
        }
    }
}

impl SceneConfig {
    /// Parse host flags such as `debug`, `--plain` or `particles=500`.
    /// Unknown or malformed tokens are logged and skipped.
    pub fn from_flags<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        for raw in flags {
            let token = raw.as_ref().trim().trim_start_matches(['-', '#']);
            if token.is_empty() {
                continue;
            }
            let (key, value) = match token.split_once('=') {
                Some((k, v)) => (k, Some(v)),
                None => (token, None),
            };
            match (key, value) {
                ("debug", None) => config.debug = true,
                ("plain", None) => config.variant = SceneVariant::Ocean,
                ("particles", Some(v)) => match v.parse() {
                    Ok(n) => config.particle_count = n,
                    Err(e) => log::warn!("ignoring particles={}: {}", v, e),
                },
                ("seed", Some(v)) => match v.parse() {
                    Ok(n) => config.seed = n,
                    Err(e) => log::warn!("ignoring seed={}: {}", v, e),
                },
                ("segments", Some(v)) => match v.parse() {
                    Ok(n) => config.surface_segments = n,
                    Err(e) => log::warn!("ignoring segments={}: {}", v, e),
                },
                _ => log::warn!("unknown scene flag '{}'", raw.as_ref()),
            }
        }
        config
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("invalid surface: {0}")]
    Surface(#[from] SurfaceError),
    #[error("parameter setup failed: {0}")]
    Param(#[from] ParamError),
    #[error(transparent)]
    Pass(#[from] PassError),
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub tick: FrameTick,
    pub viewport: ViewportState,
    pub physical_size: (u32, u32),
    pub camera: CameraUniforms,
    pub surface: SurfaceUniforms,
    pub particles: ParticleUniforms,
    pub particle_count: u32,
    pub gradient: Option<GradientUniforms>,
    pub passes: RenderPlan,
    pub post: PostUniforms,
    pub camera_moved: bool,
    changed: [bool; 3],
}

impl FramePlan {
    /// Whether `owner`'s parameters changed since the previous plan.
    pub fn changed(&self, owner: ParamOwner) -> bool {
        ParamOwner::ALL
            .iter()
            .position(|&o| o == owner)
            .map_or(false, |i| self.changed[i])
    }
}

pub struct Scene {
    config: SceneConfig,
    store: ParameterStore,
    surface: SurfaceDescriptor,
    gradient: GradientDescriptor,
    particles: ParticleSet,
    passes: PassChain,
    glitch: GlitchState,
    camera: PerspectiveCamera,
    controller: OrbitController,
    viewport: ViewportState,
    bus: EventBus,
}

impl Scene {
    pub fn new(config: SceneConfig, viewport: ViewportState) -> Result<Self, SceneError> {
        let surface = SurfaceDescriptor {
            width_segments: config.surface_segments,
            height_segments: config.surface_segments,
            ..SurfaceDescriptor::default()
        };
        surface.validate()?;

        let gradient = GradientDescriptor::default();
        let mut store = ParameterStore::new();
        surface.declare_params(&mut store)?;
        declare_particle_params(&mut store)?;
        if config.variant.has_backdrop() {
            gradient.declare_params(&mut store)?;
        }

        let particles = ParticleSet::seeded(config.particle_count, config.seed);
        let glitch = GlitchState::new(config.seed.wrapping_add(1));
        let camera = PerspectiveCamera::new(viewport.aspect());
        log::info!(
            "scene ready: {:?}, {} particles, {}x{} surface segments",
            config.variant,
            particles.count(),
            surface.width_segments,
            surface.height_segments
        );

        Ok(Self {
            config,
            store,
            surface,
            gradient,
            particles,
            passes: PassChain::new(),
            glitch,
            camera,
            controller: OrbitController::new(Vec3::ZERO),
            viewport,
            bus: EventBus::new(),
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Handle for host callbacks; events are applied on the next `tick`.
    pub fn bus(&self) -> EventBus {
        self.bus.clone()
    }

    pub fn params(&self) -> &ParameterStore {
        &self.store
    }

    pub fn surface(&self) -> &SurfaceDescriptor {
        &self.surface
    }

    pub fn gradient(&self) -> &GradientDescriptor {
        &self.gradient
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn particle_instances(&self) -> Vec<ParticleInstance> {
        self.particles.instances()
    }

    pub fn passes(&self) -> &PassChain {
        &self.passes
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    /// RGBA8 displacement map for the glitch effect.
    pub fn glitch_noise(&mut self) -> Vec<u8> {
        self.glitch.noise_texture()
    }

    pub fn resize(&mut self, viewport: ViewportState) {
        if viewport == self.viewport {
            return;
        }
        log::debug!(
            "resize to {}x{} @{}",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
    }

    fn apply(&mut self, event: SceneEvent) {
        match event {
            SceneEvent::Param(change) => {
                if let Err(e) = self.store.apply(&change) {
                    log::warn!("dropping parameter change: {}", e);
                }
            }
            SceneEvent::SetPassEnabled { kind, enabled } => {
                match self.passes.set_enabled(kind, enabled) {
                    Ok(true) => {
                        let state = if enabled { "on" } else { "off" };
                        log::info!("{} pass {}", kind.label(), state);
                    }
                    Ok(false) => {}
                    Err(e) => log::warn!("{}", e),
                }
            }
            SceneEvent::Resize(viewport) => self.resize(viewport),
            SceneEvent::Orbit(input) => {
                self.controller
                    .apply(input, &self.camera, self.viewport.height as f32)
            }
        }
    }

    /// Apply queued events, push the clock, advance the controller and
    /// snapshot everything the renderer needs.
    pub fn tick(&mut self, tick: FrameTick) -> FramePlan {
        for event in self.bus.drain() {
            self.apply(event);
        }
        self.store.push_clock(tick.elapsed);
        let camera_moved = self.controller.update(&mut self.camera);

        let passes = self.passes.plan();
        let glitch = if passes.runs(PassKind::Glitch) {
            self.glitch.step(self.passes.glitch()).1
        } else {
            self.glitch.last()
        };

        let physical_size = self.viewport.physical_size();
        let has_backdrop = self.config.variant.has_backdrop();
        FramePlan {
            tick,
            viewport: self.viewport,
            physical_size,
            camera: CameraUniforms::from_camera(&self.camera),
            surface: SurfaceUniforms::from_params(&self.surface, &self.store),
            particles: ParticleUniforms::from_params(
                &self.store,
                self.viewport.pixel_ratio,
                [physical_size.0 as f32, physical_size.1 as f32],
            ),
            particle_count: self.particles.count() as u32,
            gradient: has_backdrop
                .then(|| GradientUniforms::from_params(&self.gradient, &self.store)),
            post: PostUniforms::new(&self.passes, glitch),
            passes,
            camera_moved,
            changed: ParamOwner::ALL.map(|o| self.store.take_dirty(o)),
        }
    }
}
