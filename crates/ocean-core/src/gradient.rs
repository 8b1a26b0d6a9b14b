use crate::color::Color;
use crate::constants::{GRADIENT_BOTTOM_HEX, GRADIENT_TOP_HEX};
use crate::params::{ParamError, ParamOwner, Parameter, ParameterStore};

pub const U_TOP_COLOR: &str = "uTopColor";
pub const U_BOTTOM_COLOR: &str = "uBottomColor";
pub const GROUP_GRADIENT: &str = "Gradient";

/// Two-color vertical backdrop drawn behind everything else.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientDescriptor {
    pub top: Color,
    pub bottom: Color,
}

impl Default for GradientDescriptor {
    fn default() -> Self {
        Self {
            top: Color::from_hex(GRADIENT_TOP_HEX).unwrap_or(Color::BLACK),
            bottom: Color::from_hex(GRADIENT_BOTTOM_HEX).unwrap_or(Color::BLACK),
        }
    }
}

impl GradientDescriptor {
    pub fn declare_params(&self, store: &mut ParameterStore) -> Result<(), ParamError> {
        let owner = ParamOwner::Gradient;
        store.declare(Parameter::color(owner, GROUP_GRADIENT, U_TOP_COLOR, self.top))?;
        store.declare(Parameter::color(owner, GROUP_GRADIENT, U_BOTTOM_COLOR, self.bottom))?;
        Ok(())
    }

    /// Color at normalised screen height `v` (0 = bottom, 1 = top).
    pub fn color_at(&self, v: f32) -> Color {
        self.bottom.lerp(self.top, v.clamp(0.0, 1.0))
    }
}

/// Matches `GradientUniforms` in `gradient.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GradientUniforms {
    pub top: [f32; 4],
    pub bottom: [f32; 4],
}

impl GradientUniforms {
    pub fn from_params(template: &GradientDescriptor, store: &ParameterStore) -> Self {
        Self {
            top: store.color(U_TOP_COLOR).unwrap_or(template.top).to_vec4_array(),
            bottom: store
                .color(U_BOTTOM_COLOR)
                .unwrap_or(template.bottom)
                .to_vec4_array(),
        }
    }
}
