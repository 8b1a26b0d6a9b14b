use crate::constants::MAX_PIXEL_RATIO;

/// Logical canvas size plus the capped device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

/// `min(device_pixel_ratio, 2)`; unusable ratios fall back to 1.
#[inline]
pub fn capped_pixel_ratio(device_pixel_ratio: f64) -> f32 {
    let dpr = device_pixel_ratio as f32;
    if dpr.is_finite() && dpr > 0.0 {
        dpr.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

impl ViewportState {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            pixel_ratio: capped_pixel_ratio(device_pixel_ratio),
        }
    }

    /// Render target size in device pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f32 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(1280, 720, 1.0)
    }
}
