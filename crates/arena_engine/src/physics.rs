use glam::{Vec2, Vec3, vec3};
use serde::{Deserialize, Serialize};

use crate::config::PhysicsConfig;
use crate::scene::{Arena, Face, Scene, Sphere, WallPlane};

/// Movement request for the player sphere. `move_vector.y` is forward, `move_vector.x` is right,
/// both relative to the camera yaw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput
{
    pub move_vector: Vec2,
    pub yaw_degrees: f32,
}

impl PlayerInput
{
    pub fn new(move_vector: Vec2, yaw_degrees: f32) -> Self
    {
        Self { move_vector, yaw_degrees }
    }

    fn is_neutral(&self) -> bool
    {
        !self.move_vector.is_finite() || self.move_vector == Vec2::ZERO
    }
}

/// Contacts resolved during the last step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats
{
    pub sphere_contacts: usize,
    pub wall_contacts: usize,
}

pub struct Simulator
{
    spheres: Vec<Sphere>,
    arena: Arena,
    config: PhysicsConfig,
    stats: StepStats,
}

impl Simulator
{
    pub fn new(spheres: Vec<Sphere>, arena: Arena, config: PhysicsConfig) -> Self
    {
        Self { spheres, arena, config, stats: StepStats::default() }
    }

    pub fn from_scene(scene: &Scene, config: PhysicsConfig) -> Self
    {
        Self::new(scene.spheres.clone(), scene.arena, config)
    }

    /// Replaces every body and the arena.
    pub fn load(&mut self, spheres: Vec<Sphere>, arena: Arena)
    {
        self.spheres = spheres;
        self.arena = arena;
        self.stats = StepStats::default();
    }

    pub fn spheres(&self) -> &[Sphere] { &self.spheres }
    pub fn arena(&self) -> &Arena { &self.arena }
    pub fn config(&self) -> &PhysicsConfig { &self.config }
    pub fn stats(&self) -> StepStats { self.stats }

    /// Advances every body by `dt` seconds. Returns `false` when `dt` was rejected.
    pub fn advance(&mut self, dt: f32, input: &PlayerInput) -> bool
    {
        if !dt.is_finite() || dt <= 0.0
        {
            return false;
        }
        let dt = dt.min(self.config.max_dt);

        self.apply_input(dt, input);

        for sphere in self.spheres.iter_mut()
        {
            sphere.velocity *= self.config.damping;
            sphere.velocity.y -= self.config.gravity * dt;
            sphere.velocity = limit_speed(sphere.velocity, self.config.max_speed);
            sphere.position += sphere.velocity * dt;
        }

        let mut stats = StepStats::default();
        for i in 0..self.spheres.len()
        {
            let (head, tail) = self.spheres.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut()
            {
                if resolve_sphere_collision(a, b, self.config.sphere_restitution, self.config.min_distance)
                {
                    stats.sphere_contacts += 1;
                }
            }
        }

        let planes = self.arena.planes();
        for sphere in self.spheres.iter_mut()
        {
            for plane in planes.iter()
            {
                let restitution = match plane.face
                {
                    Face::Floor => self.config.floor_restitution,
                    Face::Ceiling => self.config.ceiling_restitution,
                    _ => self.config.side_restitution,
                };

                if resolve_wall_collision(sphere, plane, restitution, self.config.wall_padding)
                {
                    stats.wall_contacts += 1;
                }
            }

            sphere.velocity = limit_speed(sphere.velocity, self.config.max_speed);
            debug_assert!(sphere.position.is_finite() && sphere.velocity.is_finite(), "{:?}", sphere);
        }

        log::trace!("Step resolved {} sphere and {} wall contacts", stats.sphere_contacts, stats.wall_contacts);
        self.stats = stats;
        true
    }

    fn apply_input(&mut self, dt: f32, input: &PlayerInput)
    {
        let decay = self.config.input_decay;
        let acceleration = self.config.player_acceleration;
        let Some(player) = self.spheres.iter_mut().find(|s| s.is_player) else { return };

        if input.is_neutral()
        {
            player.velocity.x *= decay;
            player.velocity.z *= decay;
            return;
        }

        let mv = if input.move_vector.length() > 1.0 { input.move_vector.normalize() } else { input.move_vector };
        let yaw = if input.yaw_degrees.is_finite() { input.yaw_degrees.to_radians() } else { 0.0 };
        let forward = vec3(yaw.sin(), 0.0, -yaw.cos());
        let right = vec3(yaw.cos(), 0.0, yaw.sin());

        player.velocity += (forward * mv.y + right * mv.x) * acceleration * dt;
    }
}

/// Caps the length of `velocity` at `max_speed`. Components are clamped first so the
/// length itself cannot overflow.
pub fn limit_speed(velocity: Vec3, max_speed: f32) -> Vec3
{
    let max_speed = max_speed.max(0.0);
    velocity
        .clamp(Vec3::splat(-max_speed), Vec3::splat(max_speed))
        .clamp_length_max(max_speed)
}

/// Separates two overlapping spheres and exchanges momentum along the contact normal
/// (mass proportional to radius squared). Returns whether the pair was in contact.
pub fn resolve_sphere_collision(a: &mut Sphere, b: &mut Sphere, restitution: f32, min_distance: f32) -> bool
{
    let delta = b.position - a.position;
    let dist2 = delta.length_squared();
    let rsum = a.radius + b.radius;

    if dist2 >= rsum * rsum || dist2 <= min_distance * min_distance
    {
        return false;
    }

    let dist = dist2.sqrt();
    let normal = delta / dist;
    let overlap = 0.5 * (rsum - dist);
    a.position -= normal * overlap;
    b.position += normal * overlap;

    let closing = (b.velocity - a.velocity).dot(normal);
    if closing < 0.0
    {
        let inv_a = 1.0 / a.mass();
        let inv_b = 1.0 / b.mass();
        let j = -(1.0 + restitution) * closing / (inv_a + inv_b);
        a.velocity -= normal * (j * inv_a);
        b.velocity += normal * (j * inv_b);
    }

    true
}

/// Pushes `sphere` back inside `plane` and reflects the velocity component heading into it.
/// Returns whether the sphere touched the plane.
pub fn resolve_wall_collision(sphere: &mut Sphere, plane: &WallPlane, restitution: f32, padding: f32) -> bool
{
    let distance = plane.signed_distance(sphere.position);
    if distance >= sphere.radius
    {
        return false;
    }

    sphere.position += plane.normal * (sphere.radius + padding - distance);

    let vn = sphere.velocity.dot(plane.normal);
    if vn < 0.0
    {
        sphere.velocity -= plane.normal * ((1.0 + restitution) * vn);
    }

    true
}
