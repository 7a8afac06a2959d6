use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunable constants of the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig
{
    pub gravity: f32,
    /// Per-step velocity multiplier applied to every body.
    pub damping: f32,
    /// Horizontal velocity multiplier for the player when no movement key is held.
    pub input_decay: f32,
    pub player_acceleration: f32,
    /// Longest step the simulator accepts; larger steps are clamped.
    pub max_dt: f32,
    pub sphere_restitution: f32,
    /// Pairs whose centres are closer than this are left alone.
    pub min_distance: f32,
    pub wall_padding: f32,
    pub side_restitution: f32,
    pub floor_restitution: f32,
    pub ceiling_restitution: f32,
    /// Upper bound on any body's speed, enforced before integration and after wall contacts.
    pub max_speed: f32,
}

impl Default for PhysicsConfig
{
    fn default() -> Self
    {
        Self
        {
            gravity: 9.8 * 0.6,
            damping: 0.995,
            input_decay: 0.9,
            player_acceleration: 3.0 * 2.0,
            max_dt: 0.03,
            sphere_restitution: 0.8,
            min_distance: 0.01,
            wall_padding: 1e-3,
            side_restitution: 0.9,
            floor_restitution: 0.5,
            ceiling_restitution: 0.6,
            max_speed: 50.0,
        }
    }
}

/// Image and shading parameters handed to the renderer every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings
{
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub soft_samples: u32,
    pub light_radius: f32,
    pub pixelation: f32,
    pub transparency: f32,
    pub ambient: f32,
    /// Render worker threads, 0 lets rayon decide.
    pub threads: usize,
    /// Image used for the side walls instead of the procedural bricks.
    pub wall_texture: Option<PathBuf>,
}

impl Default for RenderSettings
{
    fn default() -> Self
    {
        Self
        {
            width: 640,
            height: 360,
            fov: 90.0,
            soft_samples: 4,
            light_radius: 0.25,
            pixelation: 1.0,
            transparency: 0.85,
            ambient: 0.06,
            threads: 0,
            wall_texture: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig
{
    /// Total spheres including the player.
    pub sphere_count: usize,
    pub seed: Option<u64>,
    pub box_min: [f32; 3],
    pub box_max: [f32; 3],
    pub player_position: [f32; 3],
    pub player_radius: f32,
    pub player_ior: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for SceneConfig
{
    fn default() -> Self
    {
        Self
        {
            sphere_count: 10,
            seed: None,
            box_min: [-6.0, 0.0, -6.0],
            box_max: [6.0, 6.0, 6.0],
            player_position: [0.0, 1.0, 2.0],
            player_radius: 0.9,
            player_ior: 1.5,
            min_radius: 0.25,
            max_radius: 0.6,
        }
    }
}

/// Where the simulator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode
{
    /// Stepped inline by the bridge.
    #[default]
    Synchronous,
    /// Stepped on its own thread, state exchanged over channels.
    Concurrent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig
{
    pub physics: PhysicsConfig,
    pub render: RenderSettings,
    pub scene: SceneConfig,
    pub mode: ExecutionMode,
    /// Frames the headless driver runs before writing its output.
    pub frames: u32,
    pub output: PathBuf,
}

impl Default for ArenaConfig
{
    fn default() -> Self
    {
        Self
        {
            physics: PhysicsConfig::default(),
            render: RenderSettings::default(),
            scene: SceneConfig::default(),
            mode: ExecutionMode::default(),
            frames: 120,
            output: PathBuf::from("arena.png"),
        }
    }
}

impl ArenaConfig
{
    pub fn load<P>(path: P) -> Result<Self>
        where P : AsRef<Path>
    {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self>
    {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml_string(&self) -> Result<String>
    {
        Ok(serde_yaml::to_string(self)?)
    }
}
