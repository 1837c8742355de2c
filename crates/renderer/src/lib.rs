//! Screen-space overlay rendering using wgpu for Danger Ring.

pub mod pipeline;
pub mod renderer;
pub mod texture;
pub mod vertex;

pub use pipeline::*;
pub use renderer::*;
pub use texture::*;
pub use vertex::*;
