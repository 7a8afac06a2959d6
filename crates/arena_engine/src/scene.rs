use arena_core::{AABB, LightSlot, SphereSlot};
use glam::{Vec3, Vec3A, vec3};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;
use crate::error::{ArenaError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere
{
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub color: Vec3,
    pub is_player: bool,
    pub is_transparent: bool,
    pub refractive_index: f32,
    pub specular_strength: f32,
    pub roughness: f32,
}

impl Sphere
{
    pub fn new(position: Vec3, radius: f32, color: Vec3) -> Self
    {
        Self
        {
            position,
            velocity: Vec3::ZERO,
            radius,
            color,
            is_player: false,
            is_transparent: false,
            refractive_index: 1.0,
            specular_strength: 0.5,
            roughness: 0.5,
        }
    }

    pub fn player(position: Vec3, radius: f32, refractive_index: f32) -> Self
    {
        Self
        {
            is_player: true,
            is_transparent: true,
            refractive_index,
            specular_strength: 0.8,
            roughness: 0.05,
            ..Self::new(position, radius, Vec3::ONE)
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self
    {
        self.velocity = velocity;
        self
    }

    pub fn mass(&self) -> f32
    {
        self.radius * self.radius
    }

    pub fn to_slot(&self) -> SphereSlot
    {
        SphereSlot::new(self.position, self.radius, self.color, self.specular_strength, self.roughness)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light
{
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl Light
{
    pub fn new(position: Vec3, color: Vec3) -> Self
    {
        Self { position, color, intensity: 1.0 }
    }

    pub fn to_slot(&self) -> LightSlot
    {
        LightSlot::new(self.position, self.color, self.intensity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face
{
    Left,
    Right,
    Floor,
    Ceiling,
    Back,
    Front,
}

/// One arena wall. The normal points into the arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPlane
{
    pub face: Face,
    pub position: Vec3,
    pub normal: Vec3,
}

impl WallPlane
{
    /// Positive on the inside of the arena.
    pub fn signed_distance(&self, point: Vec3) -> f32
    {
        self.normal.dot(point - self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena
{
    pub min: Vec3,
    pub max: Vec3,
}

impl Arena
{
    pub fn new(min: Vec3, max: Vec3) -> Self
    {
        Self { min, max }
    }

    pub fn planes(&self) -> [WallPlane; 6]
    {
        [
            WallPlane { face: Face::Left, position: self.min, normal: Vec3::X },
            WallPlane { face: Face::Right, position: self.max, normal: Vec3::NEG_X },
            WallPlane { face: Face::Floor, position: self.min, normal: Vec3::Y },
            WallPlane { face: Face::Ceiling, position: self.max, normal: Vec3::NEG_Y },
            WallPlane { face: Face::Back, position: self.min, normal: Vec3::Z },
            WallPlane { face: Face::Front, position: self.max, normal: Vec3::NEG_Z },
        ]
    }

    pub fn aabb(&self) -> AABB
    {
        AABB::new(Vec3A::from(self.min), Vec3A::from(self.max))
    }

    pub fn contains_sphere(&self, center: Vec3, radius: f32) -> bool
    {
        (center - radius).cmpge(self.min).all() && (center + radius).cmple(self.max).all()
    }

    fn is_valid(&self) -> bool
    {
        self.min.is_finite() && self.max.is_finite() && self.min.cmplt(self.max).all()
    }
}

impl Default for Arena
{
    fn default() -> Self
    {
        Self::new(vec3(-6.0, 0.0, -6.0), vec3(6.0, 6.0, 6.0))
    }
}

/// Edits applied by the bridge between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneCommand
{
    AddLight(Light),
    RemoveLight { index: usize },
    MoveLight { index: usize, position: Vec3 },
    SetLightHeight { index: usize, height: f32 },
    SetLightColor { index: usize, color: Vec3 },
    SetLightIntensity { index: usize, intensity: f32 },
    SetRefractiveIndex(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene
{
    pub spheres: Vec<Sphere>,
    pub lights: Vec<Light>,
    pub arena: Arena,
}

impl Scene
{
    pub fn default_lights() -> Vec<Light>
    {
        vec![
            Light::new(vec3(4.0, 5.5, 2.0), vec3(1.0, 0.95, 0.9)),
            Light::new(vec3(-3.0, 4.0, -2.0), vec3(0.6, 0.75, 1.0)),
        ]
    }

    /// Seeded from `config.seed` when present, otherwise from entropy.
    pub fn from_config(config: &SceneConfig) -> Self
    {
        let mut rng = match config.seed
        {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self::random(config, &mut rng)
    }

    /// Player first, then `sphere_count - 1` random spheres spread over the arena.
    pub fn random<R>(config: &SceneConfig, rng: &mut R) -> Self
        where R : Rng
    {
        let arena = Arena::new(Vec3::from(config.box_min), Vec3::from(config.box_max));
        let mut spheres = Vec::with_capacity(config.sphere_count.max(1));
        spheres.push(Sphere::player(Vec3::from(config.player_position), config.player_radius, config.player_ior));

        for _ in 1..config.sphere_count
        {
            let r = range(rng, config.min_radius, config.max_radius);
            let position = vec3(
                range(rng, arena.min.x + r, arena.max.x - r),
                range(rng, arena.min.y + r + 0.1, arena.max.y - r - 0.1),
                range(rng, arena.min.z + r, arena.max.z - r),
            );
            let velocity = vec3(
                range(rng, -0.8, 0.8) * 0.2,
                range(rng, -0.2, 0.2),
                range(rng, -0.8, 0.8) * 0.2,
            );
            let color = vec3(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>()) * 0.8 + 0.2;

            spheres.push(Sphere
            {
                specular_strength: range(rng, 0.2, 0.9),
                roughness: range(rng, 0.05, 0.9),
                ..Sphere::new(position, r, color).with_velocity(velocity)
            });
        }

        log::info!("Generated scene with {} spheres", spheres.len());
        Self { spheres, lights: Self::default_lights(), arena }
    }

    pub fn validate(&self) -> Result<()>
    {
        let players = self.spheres.iter().filter(|s| s.is_player).count();
        if players != 1
        {
            return Err(ArenaError::InvalidScene(format!("expected exactly one player sphere, found {}", players)));
        }

        if !self.arena.is_valid()
        {
            return Err(ArenaError::InvalidScene(format!("arena bounds {:?}..{:?} are inverted or not finite", self.arena.min, self.arena.max)));
        }

        for (i, sphere) in self.spheres.iter().enumerate()
        {
            if !(sphere.radius > 0.0) || !sphere.radius.is_finite()
            {
                return Err(ArenaError::InvalidScene(format!("sphere {} has radius {}", i, sphere.radius)));
            }

            if !sphere.position.is_finite() || !sphere.velocity.is_finite()
            {
                return Err(ArenaError::InvalidScene(format!("sphere {} has non-finite state", i)));
            }

            if sphere.is_transparent && sphere.refractive_index < 1.0
            {
                return Err(ArenaError::InvalidScene(format!("sphere {} has refractive index {}", i, sphere.refractive_index)));
            }
        }

        Ok(())
    }

    pub fn player_index(&self) -> Option<usize>
    {
        self.spheres.iter().position(|s| s.is_player)
    }

    pub fn player(&self) -> Option<&Sphere>
    {
        self.spheres.iter().find(|s| s.is_player)
    }

    pub fn transparent_index(&self) -> Option<usize>
    {
        self.spheres.iter().position(|s| s.is_transparent)
    }

    /// Returns whether the command changed the scene.
    pub fn apply_command(&mut self, command: SceneCommand) -> bool
    {
        match command
        {
            SceneCommand::AddLight(light) =>
            {
                self.lights.push(light);
                true
            }
            SceneCommand::RemoveLight { index } =>
            {
                if self.lights.len() <= 1 || index >= self.lights.len()
                {
                    log::warn!("Refusing to remove light {} of {}", index, self.lights.len());
                    return false;
                }
                self.lights.remove(index);
                true
            }
            SceneCommand::MoveLight { index, position } => self.edit_light(index, |l| l.position = position),
            SceneCommand::SetLightHeight { index, height } => self.edit_light(index, |l| l.position.y = height),
            SceneCommand::SetLightColor { index, color } => self.edit_light(index, |l| l.color = color.clamp(Vec3::ZERO, Vec3::ONE)),
            SceneCommand::SetLightIntensity { index, intensity } => self.edit_light(index, |l| l.intensity = intensity.max(0.0)),
            SceneCommand::SetRefractiveIndex(ior) =>
            {
                let Some(index) = self.transparent_index() else
                {
                    log::warn!("No transparent sphere to set refractive index on");
                    return false;
                };
                self.spheres[index].refractive_index = ior.max(1.0);
                true
            }
        }
    }

    fn edit_light<F>(&mut self, index: usize, edit: F) -> bool
        where F : FnOnce(&mut Light)
    {
        match self.lights.get_mut(index)
        {
            Some(light) =>
            {
                edit(light);
                true
            }
            None =>
            {
                log::warn!("No light at index {}", index);
                false
            }
        }
    }
}

fn range<R>(rng: &mut R, min: f32, max: f32) -> f32
    where R : Rng
{
    if min < max { rng.gen_range(min..max) } else { min }
}

/// Parses `#rrggbb` or `#rgb` into a color in `[0, 1]`.
pub fn parse_hex_color(text: &str) -> Option<Vec3>
{
    let hex = text.trim().strip_prefix('#')?;
    if !hex.is_ascii()
    {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let (r, g, b) = match hex.len()
    {
        6 => (channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?),
        3 =>
        {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            (short(0)?, short(1)?, short(2)?)
        }
        _ => return None,
    };

    Some(vec3(r as f32, g as f32, b as f32) / 255.0)
}
