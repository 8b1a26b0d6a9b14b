//! Full-screen effect passes over the ping-pong targets.
//!
//! Each effect owns a pair of bind groups, one per possible source target,
//! so executing a plan never creates GPU objects.

use crate::helpers::{
    blit, create_rgba_texture, make_post_pipeline, sampler_entry, shader_module, texture_entry,
    uniform_buffer, uniform_entry, Target, HDR_FORMAT,
};
use crate::targets::{bloom_level_size, source_slot, RenderTargets};
use ocean_core::{
    shaders, BlurUniforms, PassKind, PostUniforms, RenderPlan, TargetId, BLOOM_LEVELS,
    GLITCH_NOISE_SIZE,
};

struct Layouts {
    effect: wgpu::BindGroupLayout,
    glitch: wgpu::BindGroupLayout,
    composite: wgpu::BindGroupLayout,
    copy: wgpu::BindGroupLayout,
}

/// Source texture, sampler and uniforms, followed by any extra textures.
fn effect_entries(extra: &[wgpu::BindGroupLayoutEntry]) -> Vec<wgpu::BindGroupLayoutEntry> {
    let mut entries = vec![
        texture_entry(0),
        sampler_entry(1),
        uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
    ];
    entries.extend_from_slice(extra);
    entries
}

impl Layouts {
    fn new(device: &wgpu::Device) -> Self {
        let mips: Vec<_> = (0..BLOOM_LEVELS as u32).map(|i| texture_entry(3 + i)).collect();
        Self {
            effect: device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("effect bgl"),
                entries: &effect_entries(&[]),
            }),
            glitch: device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("glitch bgl"),
                entries: &effect_entries(&[texture_entry(3)]),
            }),
            composite: device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("bloom composite bgl"),
                entries: &effect_entries(&mips),
            }),
            copy: device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("copy bgl"),
                entries: &[texture_entry(0), sampler_entry(1)],
            }),
        }
    }
}

struct Pipelines {
    glitch: wgpu::RenderPipeline,
    dot_screen: wgpu::RenderPipeline,
    rgb_shift: wgpu::RenderPipeline,
    bright: wgpu::RenderPipeline,
    blur: wgpu::RenderPipeline,
    composite: wgpu::RenderPipeline,
    copy: wgpu::RenderPipeline,
}

impl Pipelines {
    fn new(device: &wgpu::Device, layouts: &Layouts, swap_format: wgpu::TextureFormat) -> Self {
        let build = |label: &str,
                     fragment: &str,
                     layout: &wgpu::BindGroupLayout,
                     format: wgpu::TextureFormat| {
            let shader = shader_module(device, label, shaders::compose(fragment));
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: &[layout],
                push_constant_ranges: &[],
            });
            make_post_pipeline(device, label, &pipeline_layout, &shader, format, None)
        };
        Self {
            glitch: build("glitch", shaders::GLITCH, &layouts.glitch, HDR_FORMAT),
            dot_screen: build("dot screen", shaders::DOT_SCREEN, &layouts.effect, HDR_FORMAT),
            rgb_shift: build("rgb shift", shaders::RGB_SHIFT, &layouts.effect, HDR_FORMAT),
            bright: build("bloom bright", shaders::BLOOM_BRIGHT, &layouts.effect, HDR_FORMAT),
            blur: build("bloom blur", shaders::BLOOM_BLUR, &layouts.effect, HDR_FORMAT),
            composite: build(
                "bloom composite",
                shaders::BLOOM_COMPOSITE,
                &layouts.composite,
                HDR_FORMAT,
            ),
            copy: build("present copy", shaders::COPY, &layouts.copy, swap_format),
        }
    }
}

struct Uniforms {
    glitch: wgpu::Buffer,
    dot_screen: wgpu::Buffer,
    rgb_shift: wgpu::Buffer,
    bright: wgpu::Buffer,
    composite: wgpu::Buffer,
    // One buffer per blur step; sharing one would leave every step with the last write.
    blur_h: Vec<wgpu::Buffer>,
    blur_v: Vec<wgpu::Buffer>,
}

impl Uniforms {
    fn new(device: &wgpu::Device, initial: &PostUniforms, size: (u32, u32)) -> Self {
        let blur = |horizontal: bool| -> Vec<wgpu::Buffer> {
            (0..BLOOM_LEVELS)
                .map(|level| {
                    uniform_buffer(
                        device,
                        &format!("blur {} {}", level, if horizontal { "h" } else { "v" }),
                        &BlurUniforms::new(level, horizontal, bloom_level_size(size, level)),
                    )
                })
                .collect()
        };
        Self {
            glitch: uniform_buffer(device, "glitch uniforms", &initial.glitch),
            dot_screen: uniform_buffer(device, "dot screen uniforms", &initial.dot_screen),
            rgb_shift: uniform_buffer(device, "rgb shift uniforms", &initial.rgb_shift),
            bright: uniform_buffer(device, "bloom bright uniforms", &initial.bloom_bright),
            composite: uniform_buffer(device, "bloom composite uniforms", &initial.bloom_composite),
            blur_h: blur(true),
            blur_v: blur(false),
        }
    }

    fn write_blur(&self, queue: &wgpu::Queue, size: (u32, u32)) {
        for level in 0..BLOOM_LEVELS {
            let level_size = bloom_level_size(size, level);
            queue.write_buffer(
                &self.blur_h[level],
                0,
                bytemuck::bytes_of(&BlurUniforms::new(level, true, level_size)),
            );
            queue.write_buffer(
                &self.blur_v[level],
                0,
                bytemuck::bytes_of(&BlurUniforms::new(level, false, level_size)),
            );
        }
    }
}

/// Bind groups that reference size-dependent targets. Rebuilt on resize.
struct BindGroups {
    glitch: [wgpu::BindGroup; 2],
    dot_screen: [wgpu::BindGroup; 2],
    rgb_shift: [wgpu::BindGroup; 2],
    bright: [wgpu::BindGroup; 2],
    composite: [wgpu::BindGroup; 2],
    copy: [wgpu::BindGroup; 2],
    blur_h: Vec<wgpu::BindGroup>,
    blur_v: Vec<wgpu::BindGroup>,
}

fn effect_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    source: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    uniforms: &wgpu::Buffer,
    extra: &[&wgpu::TextureView],
) -> wgpu::BindGroup {
    let mut entries = vec![
        wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::TextureView(source),
        },
        wgpu::BindGroupEntry {
            binding: 1,
            resource: wgpu::BindingResource::Sampler(sampler),
        },
        wgpu::BindGroupEntry {
            binding: 2,
            resource: uniforms.as_entire_binding(),
        },
    ];
    for (i, view) in extra.iter().enumerate() {
        entries.push(wgpu::BindGroupEntry {
            binding: 3 + i as u32,
            resource: wgpu::BindingResource::TextureView(view),
        });
    }
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &entries,
    })
}

impl BindGroups {
    fn new(
        device: &wgpu::Device,
        layouts: &Layouts,
        uniforms: &Uniforms,
        sampler: &wgpu::Sampler,
        displacement: &wgpu::TextureView,
        targets: &RenderTargets,
    ) -> Self {
        let ping = targets.ping_views();
        let per_source = |label: &str,
                          layout: &wgpu::BindGroupLayout,
                          buffer: &wgpu::Buffer,
                          extra: &[&wgpu::TextureView]| {
            [("A", ping[0]), ("B", ping[1])].map(|(tag, view)| {
                let label = format!("{} <- {}", label, tag);
                effect_group(device, &label, layout, view, sampler, buffer, extra)
            })
        };
        let mips: Vec<&wgpu::TextureView> = targets.bloom_v.iter().map(|t| &t.view).collect();
        let copy = ping.map(|view| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("present copy"),
                layout: &layouts.copy,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        });
        let blur_h = (0..BLOOM_LEVELS)
            .map(|level| {
                let input = if level == 0 {
                    &targets.bloom_bright.view
                } else {
                    &targets.bloom_v[level - 1].view
                };
                effect_group(
                    device,
                    &format!("blur h{}", level),
                    &layouts.effect,
                    input,
                    sampler,
                    &uniforms.blur_h[level],
                    &[],
                )
            })
            .collect();
        let blur_v = (0..BLOOM_LEVELS)
            .map(|level| {
                effect_group(
                    device,
                    &format!("blur v{}", level),
                    &layouts.effect,
                    &targets.bloom_h[level].view,
                    sampler,
                    &uniforms.blur_v[level],
                    &[],
                )
            })
            .collect();

        Self {
            glitch: per_source("glitch", &layouts.glitch, &uniforms.glitch, &[displacement]),
            dot_screen: per_source("dot screen", &layouts.effect, &uniforms.dot_screen, &[]),
            rgb_shift: per_source("rgb shift", &layouts.effect, &uniforms.rgb_shift, &[]),
            bright: per_source("bloom bright", &layouts.effect, &uniforms.bright, &[]),
            composite: per_source(
                "bloom composite",
                &layouts.composite,
                &uniforms.composite,
                &mips[..],
            ),
            copy,
            blur_h,
            blur_v,
        }
    }
}

pub(crate) struct PostResources {
    sampler: wgpu::Sampler,
    layouts: Layouts,
    pipelines: Pipelines,
    uniforms: Uniforms,
    displacement: Target,
    groups: BindGroups,
}

impl PostResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        swap_format: wgpu::TextureFormat,
        targets: &RenderTargets,
        initial: &PostUniforms,
        glitch_noise: &[u8],
    ) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("post sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let layouts = Layouts::new(device);
        let pipelines = Pipelines::new(device, &layouts, swap_format);
        let uniforms = Uniforms::new(device, initial, targets.size);
        let displacement = create_rgba_texture(
            device,
            queue,
            "glitch displacement",
            (GLITCH_NOISE_SIZE, GLITCH_NOISE_SIZE),
            glitch_noise,
        );
        let groups = BindGroups::new(
            device,
            &layouts,
            &uniforms,
            &sampler,
            &displacement.view,
            targets,
        );
        Self {
            sampler,
            layouts,
            pipelines,
            uniforms,
            displacement,
            groups,
        }
    }

    /// Point every bind group at freshly allocated targets.
    pub(crate) fn rebuild(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        targets: &RenderTargets,
    ) {
        self.uniforms.write_blur(queue, targets.size);
        self.groups = BindGroups::new(
            device,
            &self.layouts,
            &self.uniforms,
            &self.sampler,
            &self.displacement.view,
            targets,
        );
    }

    /// Upload uniforms for the effects this plan runs.
    pub(crate) fn write(&self, queue: &wgpu::Queue, post: &PostUniforms, plan: &RenderPlan) {
        let u = &self.uniforms;
        for kind in plan.effects() {
            match kind {
                PassKind::Glitch => {
                    queue.write_buffer(&u.glitch, 0, bytemuck::bytes_of(&post.glitch))
                }
                PassKind::DotScreen => {
                    queue.write_buffer(&u.dot_screen, 0, bytemuck::bytes_of(&post.dot_screen))
                }
                PassKind::RgbShift => {
                    queue.write_buffer(&u.rgb_shift, 0, bytemuck::bytes_of(&post.rgb_shift))
                }
                PassKind::Bloom => {
                    queue.write_buffer(&u.bright, 0, bytemuck::bytes_of(&post.bloom_bright));
                    queue.write_buffer(&u.composite, 0, bytemuck::bytes_of(&post.bloom_composite));
                }
                PassKind::Render => {}
            }
        }
    }

    pub(crate) fn encode_effect(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        kind: PassKind,
        source: TargetId,
        dest: &wgpu::TextureView,
        targets: &RenderTargets,
    ) {
        let slot = source_slot(source);
        let g = &self.groups;
        let p = &self.pipelines;
        match kind {
            PassKind::Glitch => blit(encoder, "glitch", dest, &p.glitch, &g.glitch[slot]),
            PassKind::DotScreen => {
                blit(encoder, "dot screen", dest, &p.dot_screen, &g.dot_screen[slot])
            }
            PassKind::RgbShift => {
                blit(encoder, "rgb shift", dest, &p.rgb_shift, &g.rgb_shift[slot])
            }
            PassKind::Bloom => {
                let bright = &targets.bloom_bright.view;
                blit(encoder, "bloom bright", bright, &p.bright, &g.bright[slot]);
                for level in 0..BLOOM_LEVELS {
                    let h = &targets.bloom_h[level].view;
                    let v = &targets.bloom_v[level].view;
                    blit(encoder, "bloom blur h", h, &p.blur, &g.blur_h[level]);
                    blit(encoder, "bloom blur v", v, &p.blur, &g.blur_v[level]);
                }
                blit(encoder, "bloom composite", dest, &p.composite, &g.composite[slot]);
            }
            PassKind::Render => log::debug!("render is not a post effect"),
        }
    }

    /// Copy the finished image onto the swapchain.
    pub(crate) fn present(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        source: TargetId,
        frame: &wgpu::TextureView,
    ) {
        blit(
            encoder,
            "present",
            frame,
            &self.pipelines.copy,
            &self.groups.copy[source_slot(source)],
        );
    }
}
