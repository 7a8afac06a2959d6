use glam::{Mat4, Vec2, Vec3A, Vec4, vec2};
use num_traits::Float;

use crate::{Ray, math, uniforms::CameraSlot};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera
{
    pub eye: Vec3A,
    pub target: Vec3A,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl Camera
{
    pub fn new<T>(eye: T, target: T, fov: f32) -> Self
        where T : Into<Vec3A>
    {
        Self { eye: eye.into(), target: target.into(), fov }
    }

    pub fn basis(&self) -> CameraBasis
    {
        let forward = math::safe_normalize(self.target - self.eye);
        let mut right = forward.cross(Vec3A::Y);
        if right.length_squared() < 1e-8
        {
            right = Vec3A::X;
        }
        let right = right.normalize();
        let up = right.cross(forward).normalize();

        CameraBasis
        {
            position: self.eye,
            forward,
            right,
            up,
            tan_half_fov: (self.fov.to_radians() * 0.5).tan(),
        }
    }

    pub fn view_matrix(&self) -> Mat4
    {
        math::look_at(self.eye.into(), self.target.into(), glam::Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4
    {
        math::perspective(self.fov.to_radians(), aspect, 0.1, 1000.0)
    }

    /// Pixel position of a world point, `None` when it is behind the camera.
    pub fn project_to_screen(&self, point: Vec3A, width: u32, height: u32) -> Option<Vec2>
    {
        let aspect = aspect(width, height);
        let clip = math::multiply(self.projection_matrix(aspect), self.view_matrix())
            * Vec4::new(point.x, point.y, point.z, 1.0);

        if clip.w <= 0.0
        {
            return None;
        }

        let ndc = vec2(clip.x / clip.w, clip.y / clip.w);
        Some(vec2((ndc.x * 0.5 + 0.5) * width as f32, (0.5 - ndc.y * 0.5) * height as f32))
    }
}

/// Orthonormal camera frame used to build primary rays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBasis
{
    pub position: Vec3A,
    pub forward: Vec3A,
    pub right: Vec3A,
    pub up: Vec3A,
    pub tan_half_fov: f32,
}

impl CameraBasis
{
    pub fn from_slot(slot: &CameraSlot) -> Self
    {
        Self
        {
            position: Vec3A::from(slot.position),
            forward: Vec3A::from(slot.forward),
            right: Vec3A::from(slot.right),
            up: Vec3A::from(slot.up),
            tan_half_fov: slot.tan_half_fov,
        }
    }

    pub fn to_slot(&self) -> CameraSlot
    {
        CameraSlot
        {
            position: self.position.to_array(),
            tan_half_fov: self.tan_half_fov,
            forward: self.forward.to_array(),
            right: self.right.to_array(),
            up: self.up.to_array(),
            ..Default::default()
        }
    }

    /// Ray through normalized device coordinates (`[-1, 1]`, y up).
    pub fn ray(&self, ndc: Vec2, aspect: f32) -> Ray
    {
        let offset = (self.right * (ndc.x * aspect) + self.up * ndc.y) * self.tan_half_fov;
        Ray::new(self.position, math::safe_normalize(self.forward + offset))
    }

    /// Ray through the centre of pixel `(x, y)`; row 0 is the top of the image. With
    /// `pixelation > 1` every pixel of a `pixelation`-sized block shares the block centre.
    pub fn get_ray(&self, x: u32, y: u32, width: u32, height: u32, pixelation: f32) -> Ray
    {
        let ndc = pixel_to_ndc(x, y, width, height, pixelation);
        self.ray(ndc, aspect(width, height))
    }
}

pub fn pixel_to_ndc(x: u32, y: u32, width: u32, height: u32, pixelation: f32) -> Vec2
{
    let block = if pixelation > 1.0 { pixelation.floor() } else { 1.0 };
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);

    // A partial block at the right or bottom edge samples its last pixel.
    let sx = ((x as f32 / block).floor() * block + block * 0.5).min(w - 0.5);
    let sy = ((y as f32 / block).floor() * block + block * 0.5).min(h - 0.5);

    let u = sx / w;
    let v = sy / h;
    vec2(u * 2.0 - 1.0, 1.0 - v * 2.0)
}

fn aspect(width: u32, height: u32) -> f32
{
    if height == 0 { 1.0 } else { width as f32 / height as f32 }
}
