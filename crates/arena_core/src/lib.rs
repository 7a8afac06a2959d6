#![cfg_attr(not(test), no_std)]

pub mod camera;
pub mod kernel;
pub mod math;
pub mod shading;
pub mod texture;
pub mod trace;
pub mod uniforms;
pub mod utils;

pub use glam;
pub use bytemuck;
pub use num_traits::Float;
use glam::{f32::Vec3A, vec3a};

pub use crate::camera::{Camera, CameraBasis};
pub use crate::trace::SceneView;
pub use crate::uniforms::{FrameUniforms, LightSlot, SphereSlot, MAX_LIGHTS, MAX_SPHERES};

/// Smallest accepted hit distance. Secondary rays start on a surface and must not re-hit it.
pub const EPSILON: f32 = 1e-3;

/// Direction components smaller than this are treated as parallel to a slab.
const PARALLEL_EPSILON: f32 = 1e-8;

pub const MISS_ID: i32 = -1;
pub const WALL_ID: i32 = -2;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray
{
    pub origin: Vec3A,
    pub dir: Vec3A
}

impl Ray
{
    pub fn new<T>(origin: T, dir: T) -> Self
        where T : Into<Vec3A>
    {
        Self
        {
            origin: origin.into(),
            dir: dir.into(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3A
    {
        self.origin + self.dir * t
    }
}

/// Distance and surface normal of a single primitive hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit
{
    pub t: f32,
    pub normal: Vec3A
}

pub trait Intersectable
{
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind
{
    Miss,
    Wall,
    Sphere(usize)
}

/// Nearest hit of one ray against the whole scene. Lives only for one pixel evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit
{
    pub t: f32,
    pub id: i32,
    pub point: Vec3A,
    pub normal: Vec3A
}

impl Hit
{
    pub const MISS: Self = Self { t: f32::INFINITY, id: MISS_ID, point: Vec3A::ZERO, normal: Vec3A::ZERO };

    pub fn kind(&self) -> HitKind
    {
        match self.id
        {
            MISS_ID => HitKind::Miss,
            WALL_ID => HitKind::Wall,
            id if id >= 0 => HitKind::Sphere(id as usize),
            _ => HitKind::Miss
        }
    }

    pub fn is_miss(&self) -> bool { self.kind() == HitKind::Miss }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereShape
{
    pub center: Vec3A,
    pub radius: f32
}

impl Intersectable for SphereShape
{
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit>
    {
        let t = intersect_sphere(ray.origin, ray.dir, self.center, self.radius)?;
        let normal = math::safe_normalize(ray.at(t) - self.center);
        Some(SurfaceHit { t, normal })
    }
}

/// Smallest root of `|o + t*d - c|^2 = r^2` beyond [`EPSILON`].
pub fn intersect_sphere(origin: Vec3A, dir: Vec3A, center: Vec3A, radius: f32) -> Option<f32>
{
    let oc = origin - center;
    let a = dir.length_squared();
    if a < PARALLEL_EPSILON
    {
        return None;
    }

    let half_b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;

    let disc = half_b * half_b - a * c;
    if !(disc >= 0.0)
    {
        return None;
    }
    let sqrtd = disc.sqrt();

    let near = (-half_b - sqrtd) / a;
    if near > EPSILON
    {
        return Some(near);
    }

    let far = (-half_b + sqrtd) / a;
    if far > EPSILON { Some(far) } else { None }
}

/// Slab test against an axis aligned box. Returns the nearest positive distance and the
/// face normal facing back along the ray.
pub fn intersect_box(origin: Vec3A, dir: Vec3A, min: Vec3A, max: Vec3A) -> Option<(f32, Vec3A)>
{
    let (near, far) = slab_interval(origin, dir, min, max)?;
    let t = if near > EPSILON { near } else { far };

    let normal = face_normal(origin + dir * t, min, max);
    let normal = if normal.dot(dir) > 0.0 { -normal } else { normal };
    Some((t, normal))
}

fn slab_interval(origin: Vec3A, dir: Vec3A, min: Vec3A, max: Vec3A) -> Option<(f32, f32)>
{
    let mut near = f32::NEG_INFINITY;
    let mut far = f32::INFINITY;

    for axis in 0..3
    {
        let o = origin[axis];
        let d = dir[axis];

        if d.abs() < PARALLEL_EPSILON
        {
            if o < min[axis] || o > max[axis]
            {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let t0 = (min[axis] - o) * inv;
        let t1 = (max[axis] - o) * inv;
        near = near.max(t0.min(t1));
        far = far.min(t0.max(t1));
    }

    if near > far || !(far > EPSILON) || !far.is_finite()
    {
        None
    }
    else
    {
        Some((near, far))
    }
}

/// Outward normal of the box face closest to `point`.
fn face_normal(point: Vec3A, min: Vec3A, max: Vec3A) -> Vec3A
{
    let candidates = [
        ((point.x - min.x).abs(), vec3a(-1.0, 0.0, 0.0)),
        ((point.x - max.x).abs(), vec3a(1.0, 0.0, 0.0)),
        ((point.y - min.y).abs(), vec3a(0.0, -1.0, 0.0)),
        ((point.y - max.y).abs(), vec3a(0.0, 1.0, 0.0)),
        ((point.z - min.z).abs(), vec3a(0.0, 0.0, -1.0)),
        ((point.z - max.z).abs(), vec3a(0.0, 0.0, 1.0)),
    ];

    let mut best = candidates[0];
    for candidate in candidates.iter().skip(1)
    {
        if candidate.0 < best.0
        {
            best = *candidate;
        }
    }

    best.1
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABB
{
    pub min: Vec3A,
    pub max: Vec3A,
}

impl AABB
{
    pub fn new<T>(min: T, max: T) -> Self
        where T : Into<Vec3A>
    {
        Self
        {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Hit on the inside of the box: the slab exit distance and the inward face normal.
    /// Arena walls are one-sided, so a ray that starts outside passes through the near
    /// faces and reports the far wall.
    pub fn intersect_interior(&self, ray: &Ray) -> Option<SurfaceHit>
    {
        let (_, far) = slab_interval(ray.origin, ray.dir, self.min, self.max)?;
        let normal = -face_normal(ray.at(far), self.min, self.max);
        Some(SurfaceHit { t: far, normal })
    }
}


#[cfg(test)]
mod tests
{
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn sphere_reports_smaller_positive_root()
    {
        let center = vec3a(0.0, 0.0, -5.0);
        let t = intersect_sphere(Vec3A::ZERO, vec3a(0.0, 0.0, -1.0), center, 1.0).unwrap();
        assert_approx_eq!(t, 4.0, 1e-5);

        for i in 0..20
        {
            let offset = i as f32 * 0.04 - 0.4;
            let origin = vec3a(offset, 0.3, 10.0);
            let dir = vec3a(0.0, 0.0, -1.0);
            let t = intersect_sphere(origin, dir, Vec3A::ZERO, 1.0).unwrap();

            let oc = origin;
            let b = oc.dot(dir);
            let c = oc.length_squared() - 1.0;
            let roots = [-b - (b * b - c).sqrt(), -b + (b * b - c).sqrt()];
            assert!(roots[0] < roots[1]);
            assert_approx_eq!(t, roots[0], 1e-4);
        }
    }

    #[test]
    fn sphere_from_inside_reports_far_root()
    {
        let t = intersect_sphere(Vec3A::ZERO, vec3a(1.0, 0.0, 0.0), Vec3A::ZERO, 2.0).unwrap();
        assert_approx_eq!(t, 2.0, 1e-5);
    }

    #[test]
    fn sphere_behind_or_beside_ray_misses()
    {
        assert!(intersect_sphere(Vec3A::ZERO, vec3a(0.0, 0.0, 1.0), vec3a(0.0, 0.0, -5.0), 1.0).is_none());
        assert!(intersect_sphere(Vec3A::ZERO, vec3a(0.0, 0.0, -1.0), vec3a(3.0, 0.0, -5.0), 1.0).is_none());
        assert!(intersect_sphere(Vec3A::ZERO, Vec3A::ZERO, vec3a(0.0, 0.0, -5.0), 1.0).is_none());
    }

    #[test]
    fn sphere_surface_origin_does_not_self_intersect()
    {
        let origin = vec3a(0.0, 0.0, 1.0);
        assert!(intersect_sphere(origin, vec3a(0.0, 0.0, 1.0), Vec3A::ZERO, 1.0).is_none());
    }

    #[test]
    fn box_slab_from_outside_and_inside()
    {
        let min = vec3a(-1.0, -1.0, -1.0);
        let max = vec3a(1.0, 1.0, 1.0);

        let (t, n) = intersect_box(vec3a(0.0, 0.0, 5.0), vec3a(0.0, 0.0, -1.0), min, max).unwrap();
        assert_approx_eq!(t, 4.0, 1e-5);
        assert_eq!(n, vec3a(0.0, 0.0, 1.0));

        let (t, n) = intersect_box(Vec3A::ZERO, vec3a(1.0, 0.0, 0.0), min, max).unwrap();
        assert_approx_eq!(t, 1.0, 1e-5);
        assert_eq!(n, vec3a(-1.0, 0.0, 0.0));
    }

    #[test]
    fn box_parallel_ray_outside_slab_misses()
    {
        let min = vec3a(-1.0, -1.0, -1.0);
        let max = vec3a(1.0, 1.0, 1.0);
        assert!(intersect_box(vec3a(0.0, 3.0, 5.0), vec3a(0.0, 0.0, -1.0), min, max).is_none());
        assert!(intersect_box(vec3a(0.0, 0.0, 5.0), vec3a(0.0, 0.0, 1.0), min, max).is_none());
        assert!(intersect_box(vec3a(1.0, 0.0, 5.0), vec3a(0.0, 0.0, -1.0), min, max).is_some());
    }

    #[test]
    fn interior_hit_reports_far_wall_with_inward_normal()
    {
        let arena = AABB::new(vec3a(-6.0, 0.0, -6.0), vec3a(6.0, 6.0, 6.0));

        let ray = Ray::new(vec3a(0.0, 1.0, 10.0), vec3a(0.0, 0.0, -1.0));
        let hit = arena.intersect_interior(&ray).unwrap();
        assert_approx_eq!(hit.t, 16.0, 1e-4);
        assert_eq!(hit.normal, vec3a(0.0, 0.0, 1.0));

        let ray = Ray::new(vec3a(0.0, 3.0, 0.0), vec3a(0.0, -1.0, 0.0));
        let hit = arena.intersect_interior(&ray).unwrap();
        assert_approx_eq!(hit.t, 3.0, 1e-5);
        assert_eq!(hit.normal, vec3a(0.0, 1.0, 0.0));
    }

    #[test]
    fn hit_kind_from_sentinels()
    {
        assert_eq!(Hit::MISS.kind(), HitKind::Miss);
        let wall = Hit { id: WALL_ID, ..Hit::MISS };
        assert_eq!(wall.kind(), HitKind::Wall);
        let sphere = Hit { id: 3, ..Hit::MISS };
        assert_eq!(sphere.kind(), HitKind::Sphere(3));
    }
}
