pub mod camera;
pub mod renderer;
pub mod texture;

pub use crate::rendering::camera::*;
pub use crate::rendering::renderer::*;
pub use crate::rendering::texture::*;
