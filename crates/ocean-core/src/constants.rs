use glam::{Vec2, Vec3};

// Shared scene tuning constants used by both web and native frontends.

// Viewport
pub const MAX_PIXEL_RATIO: f32 = 2.0; // caps fragment cost on high-density displays

// Camera
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_START: Vec3 = Vec3::new(1.0, 1.0, 1.0);

// Orbit controls
pub const ORBIT_DAMPING_FACTOR: f32 = 0.05;
pub const ORBIT_ROTATE_SPEED: f32 = 1.0;
pub const ORBIT_ZOOM_SPEED: f32 = 1.0;
pub const ORBIT_PAN_SPEED: f32 = 1.0;
pub const ORBIT_MIN_DISTANCE: f32 = 0.2;
pub const ORBIT_MAX_DISTANCE: f32 = 20.0;
pub const ORBIT_EPSILON: f32 = 1e-6;

// Surface
pub const SURFACE_SIZE: f32 = 2.0;
pub const SURFACE_SEGMENTS: u32 = 512;
pub const MAX_SURFACE_SEGMENTS: u32 = 1024;
pub const BIG_WAVES_ELEVATION: f32 = 0.13;
pub const BIG_WAVES_FREQUENCY: Vec2 = Vec2::new(4.0, 2.5);
pub const BIG_WAVES_SPEED: f32 = 0.5;
pub const SMALL_WAVES_ELEVATION: f32 = 0.1;
pub const SMALL_WAVES_FREQUENCY: f32 = 3.0;
pub const SMALL_WAVES_SPEED: f32 = 0.2;
pub const SMALL_WAVES_ITERATIONS: u32 = 4;
pub const MAX_SMALL_WAVES_ITERATIONS: u32 = 6; // unrolled loop bound in surface.wgsl
pub const DEPTH_COLOR_HEX: &str = "#18438c";
pub const SURFACE_COLOR_HEX: &str = "#ffffff";
pub const COLOR_OFFSET: f32 = 0.05;
pub const COLOR_MULTIPLIER: f32 = 5.0;

// Particles
pub const PARTICLE_COUNT: usize = 200;
pub const PARTICLE_SPREAD: f32 = 2.0; // x/z extent of the spawn square
pub const PARTICLE_BASE_Y: f32 = -0.2;
pub const PARTICLE_SIZE: f32 = 25.0;
pub const PARTICLE_PROGRESS_SPEED: f32 = 0.1;
pub const PARTICLE_RISE: f32 = 0.5; // world units travelled over one progress cycle
pub const PARTICLE_MASK_PATH: &str = "static/point.png";
pub const DEFAULT_SEED: u64 = 42;

// Backdrop
pub const GRADIENT_TOP_HEX: &str = "#152238";
pub const GRADIENT_BOTTOM_HEX: &str = "#000000";

// Post-processing defaults
pub const GLITCH_TRIGGER_MIN_FRAMES: u32 = 120;
pub const GLITCH_TRIGGER_MAX_FRAMES: u32 = 240;
pub const GLITCH_NOISE_SIZE: u32 = 64;
pub const DOT_SCREEN_CENTER: Vec2 = Vec2::new(0.5, 0.5);
pub const DOT_SCREEN_ANGLE: f32 = 1.57;
pub const DOT_SCREEN_SCALE: f32 = 1.0;
pub const DOT_SCREEN_PATTERN_SIZE: Vec2 = Vec2::new(256.0, 256.0);
pub const RGB_SHIFT_AMOUNT: f32 = 0.005;
pub const RGB_SHIFT_ANGLE: f32 = 0.0;
pub const BLOOM_STRENGTH: f32 = 0.25;
pub const BLOOM_RADIUS: f32 = 0.4;
pub const BLOOM_THRESHOLD: f32 = 0.0;
pub const BLOOM_LEVELS: usize = 5;
pub const BLOOM_LEVEL_FACTORS: [f32; BLOOM_LEVELS] = [1.0, 0.8, 0.6, 0.4, 0.2];
pub const BLOOM_KERNEL_SIGMAS: [f32; BLOOM_LEVELS] = [3.0, 5.0, 7.0, 9.0, 11.0];

// Scheduler
pub const FRAME_ERROR_LOG_EVERY: u64 = 600; // after the first failure, log one in N
