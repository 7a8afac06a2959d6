use bytemuck::{Pod, Zeroable};
use glam::{f32::Vec3A, Vec3};

use crate::{AABB, SphereShape, camera::CameraBasis};

pub const MAX_SPHERES: usize = 16;
pub const MAX_LIGHTS: usize = 8;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SphereSlot
{
    pub center: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
    pub specular: f32,
    pub roughness: f32,
    pub _padding: [f32; 3],
}

impl SphereSlot
{
    pub fn new(center: Vec3, radius: f32, color: Vec3, specular: f32, roughness: f32) -> Self
    {
        Self
        {
            center: center.to_array(),
            radius,
            color: color.to_array(),
            specular,
            roughness,
            _padding: [0.0; 3],
        }
    }

    pub fn center(&self) -> Vec3A { Vec3A::from(self.center) }
    pub fn color(&self) -> Vec3A { Vec3A::from(self.color) }
    pub fn shape(&self) -> SphereShape { SphereShape { center: self.center(), radius: self.radius } }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightSlot
{
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub _padding: f32,
}

impl LightSlot
{
    pub fn new(position: Vec3, color: Vec3, intensity: f32) -> Self
    {
        Self
        {
            position: position.to_array(),
            intensity,
            color: color.to_array(),
            _padding: 0.0,
        }
    }

    pub fn position(&self) -> Vec3A { Vec3A::from(self.position) }

    pub fn radiance(&self) -> Vec3A { Vec3A::from(self.color) * self.intensity }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct CameraSlot
{
    pub position: [f32; 3],
    pub tan_half_fov: f32,
    pub forward: [f32; 3],
    pub _pad0: f32,
    pub right: [f32; 3],
    pub _pad1: f32,
    pub up: [f32; 3],
    pub _pad2: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialParams
{
    pub ior: f32,
    pub transparency: f32,
    pub soft_samples: u32,
    pub pixelation: f32,
    pub light_radius: f32,
    pub ambient: f32,
    pub _padding: [f32; 2],
}

impl Default for MaterialParams
{
    fn default() -> Self
    {
        Self
        {
            ior: 1.5,
            transparency: 0.85,
            soft_samples: 4,
            pixelation: 1.0,
            light_radius: 0.25,
            ambient: 0.06,
            _padding: [0.0; 2],
        }
    }
}

/// Everything one frame of the kernel reads. Fixed capacity so it can be uploaded as a
/// single uniform block; slots past the live counts are zero.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms
{
    pub resolution: [u32; 2],
    pub time: f32,
    pub sphere_count: u32,
    pub light_count: u32,
    pub transparent_index: i32,
    pub _pad0: [u32; 2],
    pub camera: CameraSlot,
    pub material: MaterialParams,
    pub box_min: [f32; 3],
    pub _pad1: f32,
    pub box_max: [f32; 3],
    pub _pad2: f32,
    pub spheres: [SphereSlot; MAX_SPHERES],
    pub lights: [LightSlot; MAX_LIGHTS],
}

impl FrameUniforms
{
    pub fn width(&self) -> u32 { self.resolution[0] }
    pub fn height(&self) -> u32 { self.resolution[1] }

    pub fn spheres(&self) -> &[SphereSlot]
    {
        &self.spheres[..(self.sphere_count as usize).min(MAX_SPHERES)]
    }

    pub fn lights(&self) -> &[LightSlot]
    {
        &self.lights[..(self.light_count as usize).min(MAX_LIGHTS)]
    }

    pub fn arena(&self) -> AABB
    {
        AABB::new(Vec3A::from(self.box_min), Vec3A::from(self.box_max))
    }

    pub fn transparent_index(&self) -> Option<usize>
    {
        if self.transparent_index >= 0 && (self.transparent_index as u32) < self.sphere_count
        {
            Some(self.transparent_index as usize)
        }
        else
        {
            None
        }
    }

    pub fn camera_basis(&self) -> CameraBasis
    {
        CameraBasis::from_slot(&self.camera)
    }

    /// Copies as many spheres as fit; the rest are dropped.
    pub fn set_spheres<I>(&mut self, spheres: I)
        where I : IntoIterator<Item = SphereSlot>
    {
        self.spheres = [SphereSlot::default(); MAX_SPHERES];
        let mut count = 0;
        for (slot, sphere) in self.spheres.iter_mut().zip(spheres)
        {
            *slot = sphere;
            count += 1;
        }
        self.sphere_count = count;
    }

    /// Copies as many lights as fit; the rest are dropped.
    pub fn set_lights<I>(&mut self, lights: I)
        where I : IntoIterator<Item = LightSlot>
    {
        self.lights = [LightSlot::default(); MAX_LIGHTS];
        let mut count = 0;
        for (slot, light) in self.lights.iter_mut().zip(lights)
        {
            *slot = light;
            count += 1;
        }
        self.light_count = count;
    }

    pub fn as_bytes(&self) -> &[u8]
    {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use glam::vec3;

    #[test]
    fn excess_spheres_and_lights_are_dropped()
    {
        let mut uniforms = FrameUniforms::default();
        uniforms.set_spheres((0..MAX_SPHERES + 5).map(|i| SphereSlot::new(vec3(i as f32, 0.0, 0.0), 1.0, Vec3::ONE, 0.5, 0.5)));
        uniforms.set_lights((0..MAX_LIGHTS + 3).map(|i| LightSlot::new(vec3(0.0, i as f32, 0.0), Vec3::ONE, 1.0)));

        assert_eq!(uniforms.spheres().len(), MAX_SPHERES);
        assert_eq!(uniforms.lights().len(), MAX_LIGHTS);
        assert_eq!(uniforms.spheres()[MAX_SPHERES - 1].center[0], (MAX_SPHERES - 1) as f32);
    }

    #[test]
    fn unused_slots_are_zero_filled()
    {
        let mut uniforms = FrameUniforms::default();
        uniforms.set_lights((0..MAX_LIGHTS).map(|_| LightSlot::new(Vec3::ONE, Vec3::ONE, 2.0)));
        uniforms.set_lights([LightSlot::new(Vec3::ONE, Vec3::ONE, 1.0)]);

        assert_eq!(uniforms.light_count, 1);
        assert!(uniforms.lights[1..].iter().all(|l| *l == LightSlot::zeroed()));
    }

    #[test]
    fn transparent_index_must_be_live()
    {
        let mut uniforms = FrameUniforms::default();
        uniforms.transparent_index = 0;
        assert_eq!(uniforms.transparent_index(), None);

        uniforms.set_spheres([SphereSlot::new(Vec3::ZERO, 1.0, Vec3::ONE, 0.0, 0.0)]);
        assert_eq!(uniforms.transparent_index(), Some(0));
        assert_eq!(uniforms.as_bytes().len(), core::mem::size_of::<FrameUniforms>());
    }
}
