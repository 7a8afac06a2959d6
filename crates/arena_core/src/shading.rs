use glam::{Vec3A, vec2, vec3a};
use num_traits::Float;

use crate::{EPSILON, Hit, HitKind, Ray, math, utils};
use crate::texture::{WallTexture, floor_tiles, wall_coords};
use crate::trace::SceneView;
use crate::uniforms::{LightSlot, MaterialParams, SphereSlot};

/// Depth at which the transparent sphere stops spawning a refraction ray and is shaded
/// as an opaque sphere instead.
pub const MAX_SHADING_DEPTH: u32 = 1;

const HORIZON: Vec3A = Vec3A::new(0.6, 0.75, 0.95);
const ZENITH: Vec3A = Vec3A::new(0.9, 0.95, 1.0);
const SUN_COLOR: Vec3A = Vec3A::new(1.0, 0.95, 0.8);
const GLASS_TINT: Vec3A = Vec3A::new(0.95, 0.98, 1.0);

/// Sky seen along `dir`. Depends on nothing but the direction.
pub fn environment(dir: Vec3A) -> Vec3A
{
    let sun_dir = vec3a(0.2, 0.95, 0.1).normalize();
    let sky = math::mix(HORIZON, ZENITH, dir.y.max(0.0).sqrt());
    let sun = sun_dir.dot(dir).max(0.0).powf(200.0);
    sky + SUN_COLOR * (1.5 * sun)
}

/// Fraction of jittered samples on `light` that reach `point`. Exactly 1.0 when nothing
/// is in the way.
pub fn light_visibility(view: &SceneView, point: Vec3A, normal: Vec3A, light: &LightSlot, material: &MaterialParams, time: f32) -> f32
{
    let samples = material.soft_samples.max(1);
    let origin = point + normal * EPSILON;

    let mut blocked = 0;
    for i in 0..samples
    {
        let offset = utils::jitter(point, vec2(i as f32, time)) * material.light_radius;
        let to_light = light.position() + offset - origin;
        let dist = to_light.length();
        if dist <= EPSILON
        {
            continue;
        }

        if view.occluded(origin, to_light / dist, dist)
        {
            blocked += 1;
        }
    }

    1.0 - blocked as f32 / samples as f32
}

/// Everything the shader reads besides the hit itself.
pub struct ShadingContext<'a, T>
    where T : WallTexture + ?Sized
{
    pub view: SceneView<'a>,
    pub material: MaterialParams,
    pub time: f32,
    pub texture: &'a T,
}

impl<'a, T> ShadingContext<'a, T>
    where T : WallTexture + ?Sized
{
    pub fn new(view: SceneView<'a>, material: MaterialParams, time: f32, texture: &'a T) -> Self
    {
        Self { view, material, time, texture }
    }

    /// Linear color seen along `dir` at `hit`.
    pub fn shade(&self, hit: &Hit, dir: Vec3A, depth: u32) -> Vec3A
    {
        match hit.kind()
        {
            HitKind::Miss => environment(dir),
            HitKind::Wall => self.shade_wall(hit),
            HitKind::Sphere(index) =>
            {
                let Some(sphere) = self.view.spheres.get(index) else { return environment(dir) };

                if self.view.transparent == Some(index) && depth < MAX_SHADING_DEPTH
                {
                    self.shade_dielectric(index, hit, dir, depth)
                }
                else
                {
                    self.shade_opaque(sphere, hit, dir)
                }
            }
        }
    }

    fn shade_wall(&self, hit: &Hit) -> Vec3A
    {
        let albedo = if hit.normal.y > 0.5
        {
            floor_tiles(vec2(hit.point.x, hit.point.z))
        }
        else
        {
            self.texture.sample(wall_coords(hit.point, hit.normal))
        };

        let mut color = Vec3A::ZERO;
        for light in self.view.lights
        {
            let l = math::safe_normalize(light.position() - hit.point);
            let diffuse = hit.normal.dot(l);
            // Lights behind the surface (outside the arena) contribute nothing.
            if diffuse <= 0.0
            {
                continue;
            }

            let visibility = light_visibility(&self.view, hit.point, hit.normal, light, &self.material, self.time);
            color += albedo * light.radiance() * ((0.12 + 0.88 * diffuse) * visibility);
        }

        color
    }

    fn shade_opaque(&self, sphere: &SphereSlot, hit: &Hit, dir: Vec3A) -> Vec3A
    {
        let albedo = sphere.color();
        let shininess = math::mix_f32(8.0, 256.0, 1.0 - sphere.roughness);
        let to_eye = -dir;

        let mut color = albedo * self.material.ambient;
        for light in self.view.lights
        {
            let l = math::safe_normalize(light.position() - hit.point);
            let diffuse = hit.normal.dot(l).max(0.0);
            if diffuse <= 0.0
            {
                continue;
            }

            let r = math::reflect(-l, hit.normal);
            let specular = sphere.specular * r.dot(to_eye).max(0.0).powf(shininess);
            let visibility = light_visibility(&self.view, hit.point, hit.normal, light, &self.material, self.time);
            color += (albedo * diffuse + Vec3A::splat(specular)) * light.radiance() * visibility;
        }

        color
    }

    fn shade_dielectric(&self, index: usize, hit: &Hit, dir: Vec3A, depth: u32) -> Vec3A
    {
        let entering = dir.dot(hit.normal) < 0.0;
        let (normal, eta) = if entering
        {
            (hit.normal, 1.0 / self.material.ior)
        }
        else
        {
            (-hit.normal, self.material.ior)
        };

        let reflected = environment(math::reflect(dir, normal));

        let color = match math::refract(dir, normal, eta)
        {
            None => reflected,
            Some(refracted_dir) =>
            {
                let ray = Ray::new(hit.point, refracted_dir);
                let next = self.view.trace_excluding(&ray, Some(index));
                let refracted = self.shade(&next, refracted_dir, depth + 1);
                math::mix(reflected, refracted, self.material.transparency)
            }
        };

        math::mix(color, GLASS_TINT, 0.12)
    }
}

/// Clamp to `[0, 10]` and gamma-encode with a square root.
pub fn tone_map(color: Vec3A) -> Vec3A
{
    let c = color.clamp(Vec3A::ZERO, Vec3A::splat(10.0));
    vec3a(c.x.sqrt(), c.y.sqrt(), c.z.sqrt())
}

pub fn to_rgba8(color: Vec3A) -> [u8; 4]
{
    let c = color.clamp(Vec3A::ZERO, Vec3A::ONE) * 255.0;
    [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8, 255]
}
