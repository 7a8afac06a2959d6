use arena_core::{Camera, Ray};
use glam::{Vec3, Vec3A, vec2, vec3};
use serde::{Deserialize, Serialize};

pub const DRAG_DEGREES_PER_PIXEL: f32 = 0.2;
pub const ZOOM_PER_SCROLL_UNIT: f32 = 0.01;
pub const MIN_DISTANCE: f32 = 3.0;
pub const MAX_DISTANCE: f32 = 40.0;
const MAX_PITCH: f32 = 89.0;

/// How the view is placed each frame. Orbit follows the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CameraControl
{
    Orbit { yaw: f32, pitch: f32, distance: f32 },
    Fixed { eye: Vec3, target: Vec3 },
}

impl Default for CameraControl
{
    fn default() -> Self
    {
        CameraControl::Orbit { yaw: 0.0, pitch: 20.0, distance: 12.0 }
    }
}

impl CameraControl
{
    pub fn top_down() -> Self
    {
        CameraControl::Fixed { eye: vec3(0.0, 12.0, 6.0), target: Vec3::ZERO }
    }

    /// Camera for this frame; `focus` is the player position.
    pub fn camera(&self, focus: Vec3, fov: f32) -> Camera
    {
        match *self
        {
            CameraControl::Orbit { yaw, pitch, distance } =>
            {
                let target = focus + vec3(0.0, 0.4, 0.0);
                let (y, p) = (yaw.to_radians(), pitch.to_radians());
                let offset = vec3(p.cos() * y.sin(), p.sin(), p.cos() * y.cos()) * distance;
                Camera::new(target + offset, target, fov)
            }
            CameraControl::Fixed { eye, target } => Camera::new(eye, target, fov),
        }
    }

    /// Mouse drag in pixels.
    pub fn drag(&mut self, dx: f32, dy: f32)
    {
        if let CameraControl::Orbit { yaw, pitch, .. } = self
        {
            *yaw += dx * DRAG_DEGREES_PER_PIXEL;
            *pitch = (*pitch + dy * DRAG_DEGREES_PER_PIXEL).clamp(-MAX_PITCH, MAX_PITCH);
        }
    }

    /// Scroll wheel delta.
    pub fn zoom(&mut self, delta: f32)
    {
        if let CameraControl::Orbit { distance, .. } = self
        {
            *distance = (*distance + delta * ZOOM_PER_SCROLL_UNIT).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }

    /// Yaw the player input is expressed in.
    pub fn yaw_degrees(&self) -> f32
    {
        match self
        {
            CameraControl::Orbit { yaw, .. } => *yaw,
            CameraControl::Fixed { .. } => 0.0,
        }
    }
}

/// Ray through screen position `(x, y)` in pixels, y down.
pub fn screen_ray(camera: &Camera, x: f32, y: f32, width: u32, height: u32) -> Ray
{
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    let ndc = vec2(2.0 * x / w - 1.0, 1.0 - 2.0 * y / h);
    camera.basis().ray(ndc, w / h)
}

/// Where `ray` crosses the horizontal plane `y = height`, used to drag lights around.
pub fn pick_light_plane(ray: &Ray, height: f32) -> Option<Vec3>
{
    if ray.dir.y.abs() < 1e-6
    {
        return None;
    }

    let t = (height - ray.origin.y) / ray.dir.y;
    if t <= 0.0
    {
        return None;
    }

    let hit: Vec3A = ray.at(t);
    Some(hit.into())
}
