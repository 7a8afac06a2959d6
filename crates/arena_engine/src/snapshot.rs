use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};
use crate::physics::PlayerInput;
use crate::scene::{Arena, Sphere};

pub const SNAPSHOT_VERSION: u32 = 1;

/// Physical state of one body as exchanged with the simulation worker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot
{
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
    pub is_player: bool,
}

impl From<&Sphere> for BodySnapshot
{
    fn from(sphere: &Sphere) -> Self
    {
        Self
        {
            position: sphere.position.to_array(),
            velocity: sphere.velocity.to_array(),
            radius: sphere.radius,
            color: sphere.color.to_array(),
            is_player: sphere.is_player,
        }
    }
}

impl BodySnapshot
{
    /// Physics-only sphere; shading properties take their defaults.
    pub fn to_sphere(&self) -> Sphere
    {
        Sphere
        {
            is_player: self.is_player,
            ..Sphere::new(self.position.into(), self.radius, self.color.into()).with_velocity(self.velocity.into())
        }
    }

    /// Copies the moving state onto an existing sphere, keeping its material.
    pub fn apply_to(&self, sphere: &mut Sphere)
    {
        sphere.position = self.position.into();
        sphere.velocity = self.velocity.into();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot
{
    pub version: u32,
    pub spheres: Vec<BodySnapshot>,
    pub box_min: [f32; 3],
    pub box_max: [f32; 3],
}

impl SceneSnapshot
{
    pub fn new(spheres: &[Sphere], arena: &Arena) -> Self
    {
        Self
        {
            version: SNAPSHOT_VERSION,
            spheres: spheres.iter().map(BodySnapshot::from).collect(),
            box_min: arena.min.to_array(),
            box_max: arena.max.to_array(),
        }
    }

    pub fn arena(&self) -> Arena
    {
        Arena::new(self.box_min.into(), self.box_max.into())
    }

    pub fn to_spheres(&self) -> Vec<Sphere>
    {
        self.spheres.iter().map(BodySnapshot::to_sphere).collect()
    }

    pub fn to_json(&self) -> Result<String>
    {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self>
    {
        let snapshot: Self = serde_json::from_str(text)?;
        if snapshot.version != SNAPSHOT_VERSION
        {
            return Err(ArenaError::SnapshotVersion { found: snapshot.version, expected: SNAPSHOT_VERSION });
        }
        Ok(snapshot)
    }
}

/// Requests sent to the simulation worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerMessage
{
    Init(SceneSnapshot),
    Step { dt: f32, input: PlayerInput },
    Reset(SceneSnapshot),
}

/// Body states published by the worker after every processed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateMessage
{
    /// Bumped on every reset; older epochs describe a scene that no longer exists.
    pub epoch: u64,
    pub sequence: u64,
    pub bodies: Vec<BodySnapshot>,
}

impl StateMessage
{
    pub fn is_newer_than(&self, epoch: u64, sequence: u64) -> bool
    {
        (self.epoch, self.sequence) > (epoch, sequence)
    }
}
