pub mod bus;
pub mod camera;
pub mod clock;
pub mod color;
pub mod constants;
pub mod gradient;
pub mod noise;
pub mod params;
pub mod particles;
pub mod passes;
pub mod scene;
pub mod schedule;
pub mod shaders;
pub mod surface;
pub mod viewport;

pub use bus::*;
pub use camera::*;
pub use clock::*;
pub use color::*;
pub use constants::*;
pub use gradient::*;
pub use params::*;
pub use particles::*;
pub use passes::*;
pub use scene::*;
pub use schedule::*;
pub use surface::*;
pub use viewport::*;
