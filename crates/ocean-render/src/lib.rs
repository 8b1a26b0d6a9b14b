//! wgpu renderer for the ocean scene. It owns every GPU object and executes
//! one `FramePlan` per call to [`Renderer::render`].

pub mod asset;
mod gradient;
mod helpers;
mod particles;
mod post;
mod surface;
pub mod targets;

pub use asset::MaskImage;

use anyhow::anyhow;
use helpers::uniform_buffer;
use ocean_core::{
    FramePlan, GradientUniforms, ParamOwner, Scene, StepOp, SurfaceGeometry, SurfaceUniforms,
    SURFACE_SIZE,
};

pub struct Renderer<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    water: surface::SurfaceLayer,
    particles: particles::ParticleLayer,
    gradient: Option<gradient::GradientLayer>,
    targets: targets::RenderTargets,
    post: post::PostResources,
}

impl<'w> Renderer<'w> {
    /// Acquire a device for `surface` and build every pipeline for `scene`.
    /// Takes `scene` mutably to draw the glitch displacement map from its RNG.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'w>,
        scene: &mut Scene,
        mask: &MaskImage,
    ) -> anyhow::Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits on web avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow!("request_device error: {:?}", e))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let (width, height) = scene.viewport().physical_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("surface configured: {}x{} {:?}", width, height, format);

        let camera_buffer = uniform_buffer(
            &device,
            "camera uniforms",
            &ocean_core::CameraUniforms::from_camera(scene.camera()),
        );
        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera bgl"),
            entries: &[helpers::uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera bg"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let descriptor = scene.surface();
        let geometry = SurfaceGeometry::plane(
            SURFACE_SIZE,
            descriptor.width_segments,
            descriptor.height_segments,
        );
        let water = surface::SurfaceLayer::new(
            &device,
            &camera_layout,
            &geometry,
            &SurfaceUniforms::from_params(descriptor, scene.params()),
        );

        let mask_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("mask sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let particles = particles::ParticleLayer::new(
            &device,
            &queue,
            &camera_layout,
            &mask_sampler,
            &scene.particle_instances(),
            mask,
        );
        let gradient = scene.config().variant.has_backdrop().then(|| {
            gradient::GradientLayer::new(
                &device,
                &GradientUniforms::from_params(scene.gradient(), scene.params()),
            )
        });

        let targets = targets::RenderTargets::new(&device, (width, height));
        let initial_post = ocean_core::PostUniforms::new(scene.passes(), Default::default());
        let post = post::PostResources::new(
            &device,
            &queue,
            format,
            &targets,
            &initial_post,
            &scene.glitch_noise(),
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            camera_buffer,
            camera_bind_group,
            water,
            particles,
            gradient,
            targets,
            post,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Reallocate the swapchain and every offscreen target. No-op when the
    /// size is unchanged; zero sizes are skipped.
    pub fn resize(&mut self, (width, height): (u32, u32)) {
        if width == 0 || height == 0 {
            log::debug!("ignoring zero-sized resize {}x{}", width, height);
            return;
        }
        if (width, height) == self.size() {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
        self.targets.recreate(&self.device, (width, height));
        self.post.rebuild(&self.device, &self.queue, &self.targets);
        log::debug!("render targets now {}x{}", width, height);
    }

    /// Re-apply the current configuration, e.g. after `SurfaceError::Lost`.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn write_uniforms(&self, plan: &FramePlan) {
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&plan.camera));
        self.water.write(&self.queue, &plan.surface);
        self.particles.write(&self.queue, &plan.particles);
        if let (Some(layer), Some(uniforms)) = (&self.gradient, &plan.gradient) {
            if plan.changed(ParamOwner::Gradient) {
                layer.write(&self.queue, uniforms);
            }
        }
        self.post.write(&self.queue, &plan.post, &plan.passes);
    }

    fn encode_scene(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        resolve: &wgpu::TextureView,
        particle_count: u32,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.targets.msaa.view,
                resolve_target: Some(resolve),
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Discard,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.targets.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        if let Some(gradient) = &self.gradient {
            gradient.draw(&mut pass);
        }
        self.water.draw(&mut pass, &self.camera_bind_group);
        self.particles
            .draw(&mut pass, &self.camera_bind_group, particle_count);
    }

    /// Execute one frame plan and present it.
    pub fn render(&mut self, plan: &FramePlan) -> Result<(), wgpu::SurfaceError> {
        self.resize(plan.physical_size);
        self.write_uniforms(plan);

        let frame = self.surface.get_current_texture()?;
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("frame") });

        for step in plan.passes.steps() {
            match step.op {
                StepOp::Scene => {
                    if let Some(dest) = self.targets.view(step.dest) {
                        self.encode_scene(&mut encoder, dest, plan.particle_count);
                    }
                }
                StepOp::Effect(kind) => {
                    let dest = self.targets.view(step.dest);
                    if let (Some(source), Some(dest)) = (step.source, dest) {
                        self.post
                            .encode_effect(&mut encoder, kind, source, dest, &self.targets);
                    }
                }
                StepOp::Present => {
                    let source = step.source.unwrap_or(plan.passes.final_target());
                    self.post.present(&mut encoder, source, &frame_view);
                }
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
