//! Post-processing chain: fixed pass order, per-pass settings and the
//! ping-pong plan the renderer executes each frame.

use crate::constants::*;
use glam::Vec2;
use rand::prelude::*;
use smallvec::SmallVec;
use std::f32::consts::PI;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassKind {
    Render,
    Glitch,
    DotScreen,
    RgbShift,
    Bloom,
}

impl PassKind {
    pub const ORDER: [PassKind; 5] = [
        PassKind::Render,
        PassKind::Glitch,
        PassKind::DotScreen,
        PassKind::RgbShift,
        PassKind::Bloom,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            PassKind::Render => "Render",
            PassKind::Glitch => "Glitch",
            PassKind::DotScreen => "Dot Screen",
            PassKind::RgbShift => "RGB Shift",
            PassKind::Bloom => "Bloom",
        }
    }

    pub fn is_optional(self) -> bool {
        self != PassKind::Render
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GlitchSettings {
    pub go_wild: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotScreenSettings {
    pub center: Vec2,
    pub angle: f32,
    pub scale: f32,
    pub pattern_size: Vec2,
}

impl Default for DotScreenSettings {
    fn default() -> Self {
        Self {
            center: DOT_SCREEN_CENTER,
            angle: DOT_SCREEN_ANGLE,
            scale: DOT_SCREEN_SCALE,
            pattern_size: DOT_SCREEN_PATTERN_SIZE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RgbShiftSettings {
    pub amount: f32,
    pub angle: f32,
}

impl Default for RgbShiftSettings {
    fn default() -> Self {
        Self {
            amount: RGB_SHIFT_AMOUNT,
            angle: RGB_SHIFT_ANGLE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomSettings {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            strength: BLOOM_STRENGTH,
            radius: BLOOM_RADIUS,
            threshold: BLOOM_THRESHOLD,
        }
    }
}

impl BloomSettings {
    /// Weight of each mip level in the composite: `mix(f, 1.2 - f, radius)`,
    /// floored at zero.
    pub fn level_weights(&self) -> [f32; BLOOM_LEVELS] {
        BLOOM_LEVEL_FACTORS.map(|f| {
            let w = f + (1.2 - f - f) * self.radius;
            if w.is_finite() {
                w.max(0.0)
            } else {
                0.0
            }
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PassSettings {
    Render,
    Glitch(GlitchSettings),
    DotScreen(DotScreenSettings),
    RgbShift(RgbShiftSettings),
    Bloom(BloomSettings),
}

impl PassSettings {
    pub fn kind(&self) -> PassKind {
        match self {
            PassSettings::Render => PassKind::Render,
            PassSettings::Glitch(_) => PassKind::Glitch,
            PassSettings::DotScreen(_) => PassKind::DotScreen,
            PassSettings::RgbShift(_) => PassKind::RgbShift,
            PassSettings::Bloom(_) => PassKind::Bloom,
        }
    }

    fn default_for(kind: PassKind) -> Self {
        match kind {
            PassKind::Render => PassSettings::Render,
            PassKind::Glitch => PassSettings::Glitch(GlitchSettings::default()),
            PassKind::DotScreen => PassSettings::DotScreen(DotScreenSettings::default()),
            PassKind::RgbShift => PassSettings::RgbShift(RgbShiftSettings::default()),
            PassKind::Bloom => PassSettings::Bloom(BloomSettings::default()),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PassError {
    #[error("the base render pass cannot be disabled")]
    BaseRequired,
    #[error("settings for {found:?} cannot be applied to {expected:?}")]
    SettingsMismatch { expected: PassKind, found: PassKind },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassChainEntry {
    pub kind: PassKind,
    pub enabled: bool,
    pub settings: PassSettings,
}

/// The five passes in their fixed order. Toggling only flips `enabled`.
#[derive(Clone, Debug, PartialEq)]
pub struct PassChain {
    entries: [PassChainEntry; 5],
}

impl Default for PassChain {
    fn default() -> Self {
        let entries = PassKind::ORDER.map(|kind| PassChainEntry {
            kind,
            enabled: matches!(kind, PassKind::Render | PassKind::RgbShift | PassKind::Bloom),
            settings: PassSettings::default_for(kind),
        });
        Self { entries }
    }
}

impl PassChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[PassChainEntry] {
        &self.entries
    }

    pub fn entry(&self, kind: PassKind) -> &PassChainEntry {
        &self.entries[kind.index()]
    }

    pub fn is_enabled(&self, kind: PassKind) -> bool {
        self.entry(kind).enabled
    }

    /// Returns whether the flag actually changed.
    pub fn set_enabled(&mut self, kind: PassKind, enabled: bool) -> Result<bool, PassError> {
        if kind == PassKind::Render && !enabled {
            return Err(PassError::BaseRequired);
        }
        let entry = &mut self.entries[kind.index()];
        let changed = entry.enabled != enabled;
        entry.enabled = enabled;
        Ok(changed)
    }

    pub fn toggle(&mut self, kind: PassKind) -> Result<bool, PassError> {
        let next = !self.is_enabled(kind);
        self.set_enabled(kind, next)?;
        Ok(next)
    }

    pub fn settings(&self, kind: PassKind) -> PassSettings {
        self.entry(kind).settings
    }

    pub fn set_settings(&mut self, settings: PassSettings) -> Result<(), PassError> {
        let kind = settings.kind();
        let entry = &mut self.entries[kind.index()];
        if entry.kind != kind {
            return Err(PassError::SettingsMismatch {
                expected: entry.kind,
                found: kind,
            });
        }
        entry.settings = settings;
        Ok(())
    }

    pub fn glitch(&self) -> GlitchSettings {
        match self.settings(PassKind::Glitch) {
            PassSettings::Glitch(s) => s,
            _ => GlitchSettings::default(),
        }
    }

    pub fn dot_screen(&self) -> DotScreenSettings {
        match self.settings(PassKind::DotScreen) {
            PassSettings::DotScreen(s) => s,
            _ => DotScreenSettings::default(),
        }
    }

    pub fn rgb_shift(&self) -> RgbShiftSettings {
        match self.settings(PassKind::RgbShift) {
            PassSettings::RgbShift(s) => s,
            _ => RgbShiftSettings::default(),
        }
    }

    pub fn bloom(&self) -> BloomSettings {
        match self.settings(PassKind::Bloom) {
            PassSettings::Bloom(s) => s,
            _ => BloomSettings::default(),
        }
    }

    /// Steps to execute this frame: scene into A, each enabled effect
    /// ping-ponging between A and B, then present.
    pub fn plan(&self) -> RenderPlan {
        let mut steps = SmallVec::new();
        let mut current = TargetId::A;
        steps.push(PassStep {
            op: StepOp::Scene,
            source: None,
            dest: current,
        });
        for entry in self.entries.iter().filter(|e| e.enabled && e.kind.is_optional()) {
            let dest = current.other();
            steps.push(PassStep {
                op: StepOp::Effect(entry.kind),
                source: Some(current),
                dest,
            });
            current = dest;
        }
        steps.push(PassStep {
            op: StepOp::Present,
            source: Some(current),
            dest: TargetId::Screen,
        });
        RenderPlan { steps }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetId {
    A,
    B,
    Screen,
}

impl TargetId {
    fn other(self) -> TargetId {
        match self {
            TargetId::A => TargetId::B,
            TargetId::B | TargetId::Screen => TargetId::A,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOp {
    Scene,
    Effect(PassKind),
    Present,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassStep {
    pub op: StepOp,
    pub source: Option<TargetId>,
    pub dest: TargetId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderPlan {
    steps: SmallVec<[PassStep; 6]>,
}

impl RenderPlan {
    pub fn steps(&self) -> &[PassStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Effects in execution order.
    pub fn effects(&self) -> impl Iterator<Item = PassKind> + '_ {
        self.steps.iter().filter_map(|s| match s.op {
            StepOp::Effect(kind) => Some(kind),
            _ => None,
        })
    }

    pub fn runs(&self, kind: PassKind) -> bool {
        kind == PassKind::Render || self.effects().any(|k| k == kind)
    }

    /// Target holding the finished image before present.
    pub fn final_target(&self) -> TargetId {
        self.steps
            .last()
            .and_then(|s| s.source)
            .unwrap_or(TargetId::A)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlitchMode {
    Bypass,
    Weak,
    Strong,
}

/// Matches `GlitchUniforms` in `glitch.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlitchUniforms {
    pub amount: f32,
    pub angle: f32,
    pub seed: f32,
    pub seed_x: f32,
    pub seed_y: f32,
    pub distortion_x: f32,
    pub distortion_y: f32,
    pub col_s: f32,
    pub bypass: u32,
    pub _pad: [u32; 3],
}

impl Default for GlitchUniforms {
    fn default() -> Self {
        Self {
            amount: 0.0,
            angle: 0.0,
            seed: 0.0,
            seed_x: 0.0,
            seed_y: 0.0,
            distortion_x: 0.0,
            distortion_y: 0.0,
            col_s: 0.05,
            bypass: 1,
            _pad: [0; 3],
        }
    }
}

/// Frame counter driving the glitch effect's bursts.
#[derive(Clone, Debug)]
pub struct GlitchState {
    rng: StdRng,
    frame: u32,
    trigger: u32,
    last: GlitchUniforms,
}

impl GlitchState {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let trigger = rng.gen_range(GLITCH_TRIGGER_MIN_FRAMES..=GLITCH_TRIGGER_MAX_FRAMES);
        Self {
            rng,
            frame: 0,
            trigger,
            last: GlitchUniforms::default(),
        }
    }

    pub fn trigger_interval(&self) -> u32 {
        self.trigger
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn last(&self) -> GlitchUniforms {
        self.last
    }

    fn mode(&self, go_wild: bool) -> GlitchMode {
        let phase = self.frame % self.trigger;
        if phase == 0 || go_wild {
            GlitchMode::Strong
        } else if phase < self.trigger / 5 {
            GlitchMode::Weak
        } else {
            GlitchMode::Bypass
        }
    }

    /// Advance one executed glitch frame.
    pub fn step(&mut self, settings: GlitchSettings) -> (GlitchMode, GlitchUniforms) {
        let mode = self.mode(settings.go_wild);
        let mut u = GlitchUniforms {
            seed: self.rng.gen(),
            bypass: 0,
            ..GlitchUniforms::default()
        };
        match mode {
            GlitchMode::Strong => {
                u.amount = self.rng.gen::<f32>() / 30.0;
                u.angle = self.rng.gen_range(-PI..PI);
                u.seed_x = self.rng.gen_range(-1.0..1.0);
                u.seed_y = self.rng.gen_range(-1.0..1.0);
                u.distortion_x = self.rng.gen();
                u.distortion_y = self.rng.gen();
                self.frame = 0;
                self.trigger = self
                    .rng
                    .gen_range(GLITCH_TRIGGER_MIN_FRAMES..=GLITCH_TRIGGER_MAX_FRAMES);
            }
            GlitchMode::Weak => {
                u.amount = self.rng.gen::<f32>() / 90.0;
                u.angle = self.rng.gen_range(-PI..PI);
                u.distortion_x = self.rng.gen();
                u.distortion_y = self.rng.gen();
                u.seed_x = self.rng.gen_range(-0.3..0.3);
                u.seed_y = self.rng.gen_range(-0.3..0.3);
            }
            GlitchMode::Bypass => u.bypass = 1,
        }
        self.frame += 1;
        self.last = u;
        (mode, u)
    }

    /// Single-channel random displacement map, replicated into RGBA8.
    pub fn noise_texture(&mut self) -> Vec<u8> {
        let n = (GLITCH_NOISE_SIZE * GLITCH_NOISE_SIZE) as usize;
        let mut data = Vec::with_capacity(n * 4);
        for _ in 0..n {
            let v: u8 = self.rng.gen();
            data.extend_from_slice(&[v, v, v, 255]);
        }
        data
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RgbShiftUniforms {
    pub amount: f32,
    pub angle: f32,
    pub _pad: [f32; 2],
}

impl From<RgbShiftSettings> for RgbShiftUniforms {
    fn from(s: RgbShiftSettings) -> Self {
        Self {
            amount: s.amount,
            angle: s.angle,
            _pad: [0.0; 2],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DotScreenUniforms {
    pub center: [f32; 2],
    pub pattern_size: [f32; 2],
    pub angle: f32,
    pub scale: f32,
    pub _pad: [f32; 2],
}

impl From<DotScreenSettings> for DotScreenUniforms {
    fn from(s: DotScreenSettings) -> Self {
        Self {
            center: s.center.to_array(),
            pattern_size: s.pattern_size.to_array(),
            angle: s.angle,
            scale: s.scale,
            _pad: [0.0; 2],
        }
    }
}

/// Luminosity high pass feeding the bloom mips.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BloomBrightUniforms {
    pub threshold: f32,
    pub smooth_width: f32,
    pub _pad: [f32; 2],
}

/// One direction of the separable gaussian at a given mip level.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlurUniforms {
    pub direction: [f32; 2],
    pub texel_size: [f32; 2],
    pub sigma: f32,
    pub radius: f32,
    pub _pad: [f32; 2],
}

impl BlurUniforms {
    pub fn new(level: usize, horizontal: bool, size: (u32, u32)) -> Self {
        let sigma = BLOOM_KERNEL_SIGMAS[level.min(BLOOM_LEVELS - 1)];
        Self {
            direction: if horizontal { [1.0, 0.0] } else { [0.0, 1.0] },
            texel_size: [1.0 / size.0.max(1) as f32, 1.0 / size.1.max(1) as f32],
            sigma,
            radius: sigma,
            _pad: [0.0; 2],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BloomCompositeUniforms {
    pub weights: [f32; 8],
    pub strength: f32,
    pub _pad: [f32; 3],
}

impl From<BloomSettings> for BloomCompositeUniforms {
    fn from(s: BloomSettings) -> Self {
        let mut weights = [0.0; 8];
        weights[..BLOOM_LEVELS].copy_from_slice(&s.level_weights());
        Self {
            weights,
            strength: s.strength,
            _pad: [0.0; 3],
        }
    }
}

/// Per-frame values for every post effect, whether or not it runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostUniforms {
    pub glitch: GlitchUniforms,
    pub dot_screen: DotScreenUniforms,
    pub rgb_shift: RgbShiftUniforms,
    pub bloom_bright: BloomBrightUniforms,
    pub bloom_composite: BloomCompositeUniforms,
}

impl PostUniforms {
    pub fn new(chain: &PassChain, glitch: GlitchUniforms) -> Self {
        let bloom = chain.bloom();
        Self {
            glitch,
            dot_screen: chain.dot_screen().into(),
            rgb_shift: chain.rgb_shift().into(),
            bloom_bright: BloomBrightUniforms {
                threshold: bloom.threshold,
                smooth_width: 0.01,
                _pad: [0.0; 2],
            },
            bloom_composite: bloom.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_radius_keeps_weights_positive() {
        let w = BloomSettings::default().level_weights();
        assert!(w.iter().all(|&x| x > 0.0));
    }

    #[test]
    fn extreme_radius_is_floored() {
        let s = BloomSettings {
            radius: 4.0,
            ..BloomSettings::default()
        };
        assert!(s.level_weights().iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn first_glitch_frame_is_strong() {
        let mut g = GlitchState::new(1);
        let (mode, u) = g.step(GlitchSettings::default());
        assert_eq!(mode, GlitchMode::Strong);
        assert_eq!(u.bypass, 0);
    }
}
