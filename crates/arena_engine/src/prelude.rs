pub use crate::arena_core;
pub use crate::glam;

pub use crate::app::{App, FIXED_DELTA_TIME};
pub use crate::app::input::{FrameState, InputEvent, KeyCode};
pub use crate::bridge::Bridge;
pub use crate::config::{ArenaConfig, ExecutionMode, PhysicsConfig, RenderSettings, SceneConfig};
pub use crate::error::{ArenaError, Result};
pub use crate::physics::{PlayerInput, Simulator};
pub use crate::rendering::{CameraControl, Framebuffer, Renderer, WallMaterial};
pub use crate::scene::{Arena, Light, Scene, SceneCommand, Sphere};
