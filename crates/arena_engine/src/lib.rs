pub mod app;
pub mod bridge;
pub mod config;
pub mod error;
pub mod physics;
pub mod rendering;
pub mod scene;
pub mod snapshot;
pub mod utils;
pub mod worker;
pub mod prelude;

pub use arena_core;
pub use glam;
pub use image;
pub use log;
