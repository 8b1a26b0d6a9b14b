//! WGSL sources. Full-screen programs only carry a fragment stage and must be
//! passed through [`compose`] to gain the shared `vs_fullscreen` entry point.

pub const FULLSCREEN: &str = include_str!("../shaders/fullscreen.wgsl");
pub const SURFACE: &str = include_str!("../shaders/surface.wgsl");
pub const PARTICLES: &str = include_str!("../shaders/particles.wgsl");
pub const GRADIENT: &str = include_str!("../shaders/gradient.wgsl");
pub const COPY: &str = include_str!("../shaders/copy.wgsl");
pub const RGB_SHIFT: &str = include_str!("../shaders/rgb_shift.wgsl");
pub const DOT_SCREEN: &str = include_str!("../shaders/dot_screen.wgsl");
pub const GLITCH: &str = include_str!("../shaders/glitch.wgsl");
pub const BLOOM_BRIGHT: &str = include_str!("../shaders/bloom_bright.wgsl");
pub const BLOOM_BLUR: &str = include_str!("../shaders/bloom_blur.wgsl");
pub const BLOOM_COMPOSITE: &str = include_str!("../shaders/bloom_composite.wgsl");

/// Every full-screen fragment program, by label.
pub const FULLSCREEN_PROGRAMS: [(&str, &str); 8] = [
    ("gradient", GRADIENT),
    ("copy", COPY),
    ("rgb_shift", RGB_SHIFT),
    ("dot_screen", DOT_SCREEN),
    ("glitch", GLITCH),
    ("bloom_bright", BLOOM_BRIGHT),
    ("bloom_blur", BLOOM_BLUR),
    ("bloom_composite", BLOOM_COMPOSITE),
];

/// Prepend the shared full-screen vertex stage to a fragment program.
pub fn compose(fragment: &str) -> String {
    let mut source = String::with_capacity(FULLSCREEN.len() + fragment.len() + 1);
    source.push_str(FULLSCREEN);
    source.push('\n');
    source.push_str(fragment);
    source
}
