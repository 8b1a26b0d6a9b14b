use glam::Vec3;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// RGB color with components in \[0, 1\], as consumed by the shaders.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color `{0}` must look like #rrggbb")]
    Format(String),
    #[error("color `{0}` has a non-hex digit")]
    Digit(String),
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorParseError::Format(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ColorParseError::Digit(s.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", q(self.r), q(self.g), q(self.b))
    }

    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color::from(Vec3::from(self).lerp(Vec3::from(other), t))
    }

    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Packed as `vec4<f32>` with alpha 1 for uniform blocks.
    pub fn to_vec4_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }
}

impl From<Vec3> for Color {
    fn from(v: Vec3) -> Self {
        Color::rgb(v.x, v.y, v.z)
    }
}

impl From<Color> for Vec3 {
    fn from(c: Color) -> Self {
        Vec3::new(c.r, c.g, c.b)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reference_palette() {
        let depth = Color::from_hex("#18438c").unwrap();
        assert!((depth.r - 24.0 / 255.0).abs() < 1e-6);
        assert!((depth.g - 67.0 / 255.0).abs() < 1e-6);
        assert!((depth.b - 140.0 / 255.0).abs() < 1e-6);
        assert_eq!(Color::from_hex("ffffff").unwrap(), Color::WHITE);
    }

    #[test]
    fn hex_survives_formatting() {
        for hex in ["#152238", "#000000", "#18438c", "#ffffff"] {
            assert_eq!(Color::from_hex(hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(Color::from_hex("#fff"), Err(ColorParseError::Format(_))));
        assert!(matches!(Color::from_hex("#gg0000"), Err(ColorParseError::Digit(_))));
        assert!(Color::from_hex("#ééé").is_err());
    }
}
