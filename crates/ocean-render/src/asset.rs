//! Particle mask image. The sprite shader reads its red channel.

use anyhow::{Context, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskImage {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8, row major.
    pub rgba: Vec<u8>,
}

impl MaskImage {
    /// Decode any format the `image` crate recognises (PNG in practice).
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).context("decoding particle mask")?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    /// 1x1 opaque white: particles render as plain squares.
    pub fn solid() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }

    /// Decode, or log and fall back to [`MaskImage::solid`].
    pub fn decode_or_solid(bytes: &[u8]) -> Self {
        match Self::decode(bytes) {
            Ok(mask) => mask,
            Err(e) => {
                log::warn!("particle mask unavailable, using solid sprite: {:#}", e);
                Self::solid()
            }
        }
    }
}
