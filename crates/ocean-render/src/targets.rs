use crate::helpers::{
    create_color_target, create_texture, Target, DEPTH_FORMAT, HDR_FORMAT, MSAA_SAMPLES,
};
use ocean_core::{TargetId, BLOOM_LEVELS};

/// Size of bloom mip `level`: half the frame for level 0, halved again per level.
pub fn bloom_level_size((width, height): (u32, u32), level: usize) -> (u32, u32) {
    let shift = level as u32 + 1;
    ((width >> shift).max(1), (height >> shift).max(1))
}

/// Every size-dependent texture. All of them are reallocated together so
/// bind groups never mix generations.
pub(crate) struct RenderTargets {
    pub(crate) size: (u32, u32),
    pub(crate) msaa: Target,
    pub(crate) depth: Target,
    ping: [Target; 2],
    pub(crate) bloom_bright: Target,
    pub(crate) bloom_h: Vec<Target>,
    pub(crate) bloom_v: Vec<Target>,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, size: (u32, u32)) -> Self {
        let msaa = create_texture(
            device,
            "scene msaa",
            size,
            HDR_FORMAT,
            MSAA_SAMPLES,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let depth = create_texture(
            device,
            "scene depth",
            size,
            DEPTH_FORMAT,
            MSAA_SAMPLES,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let ping = [
            create_color_target(device, "ping A", size),
            create_color_target(device, "ping B", size),
        ];
        let bloom_bright = create_color_target(device, "bloom bright", bloom_level_size(size, 0));
        let mip = |name: &str, i: usize| {
            create_color_target(device, &format!("{}{}", name, i), bloom_level_size(size, i))
        };
        let bloom_h = (0..BLOOM_LEVELS).map(|i| mip("bloom h", i)).collect();
        let bloom_v = (0..BLOOM_LEVELS).map(|i| mip("bloom v", i)).collect();
        Self {
            size,
            msaa,
            depth,
            ping,
            bloom_bright,
            bloom_h,
            bloom_v,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        *self = Self::new(device, size);
    }

    /// View for an offscreen ping-pong target. `Screen` has no offscreen view.
    pub(crate) fn view(&self, id: TargetId) -> Option<&wgpu::TextureView> {
        match id {
            TargetId::A => Some(&self.ping[0].view),
            TargetId::B => Some(&self.ping[1].view),
            TargetId::Screen => None,
        }
    }

    pub(crate) fn ping_views(&self) -> [&wgpu::TextureView; 2] {
        [&self.ping[0].view, &self.ping[1].view]
    }
}

/// Index into per-source bind group pairs.
pub(crate) fn source_slot(id: TargetId) -> usize {
    match id {
        TargetId::B => 1,
        TargetId::A | TargetId::Screen => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bloom_levels_halve_from_half_resolution() {
        assert_eq!(bloom_level_size((1920, 1080), 0), (960, 540));
        assert_eq!(bloom_level_size((1920, 1080), 1), (480, 270));
        assert_eq!(bloom_level_size((1920, 1080), 4), (60, 33));
    }

    #[test]
    fn bloom_levels_never_reach_zero() {
        assert_eq!(bloom_level_size((3, 2), 4), (1, 1));
    }

    #[test]
    fn screen_reads_from_first_slot() {
        assert_eq!(source_slot(TargetId::A), 0);
        assert_eq!(source_slot(TargetId::B), 1);
        assert_eq!(source_slot(TargetId::Screen), 0);
    }
}
