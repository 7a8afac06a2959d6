use glam::Vec3A;

use crate::{AABB, EPSILON, Hit, Intersectable, Ray, WALL_ID, uniforms::{FrameUniforms, LightSlot, SphereSlot}};

/// Read-only view of the live part of a frame's scene.
#[derive(Clone, Copy, Debug)]
pub struct SceneView<'a>
{
    pub spheres: &'a [SphereSlot],
    pub lights: &'a [LightSlot],
    pub arena: AABB,
    pub transparent: Option<usize>,
}

impl<'a> SceneView<'a>
{
    pub fn from_uniforms(uniforms: &'a FrameUniforms) -> Self
    {
        Self
        {
            spheres: uniforms.spheres(),
            lights: uniforms.lights(),
            arena: uniforms.arena(),
            transparent: uniforms.transparent_index(),
        }
    }

    /// Nearest hit over every live sphere and the arena walls.
    pub fn trace(&self, ray: &Ray) -> Hit
    {
        self.trace_excluding(ray, None)
    }

    /// Same as [`SceneView::trace`] but ignores sphere `exclude`, so a ray leaving a
    /// transparent sphere cannot report that sphere again.
    pub fn trace_excluding(&self, ray: &Ray, exclude: Option<usize>) -> Hit
    {
        let mut closest = Hit::MISS;

        for (i, sphere) in self.spheres.iter().enumerate()
        {
            if exclude == Some(i)
            {
                continue;
            }

            if let Some(hit) = sphere.shape().intersect(ray)
            {
                if hit.t < closest.t
                {
                    closest = Hit
                    {
                        t: hit.t,
                        id: i as i32,
                        point: ray.at(hit.t),
                        normal: hit.normal,
                    };
                }
            }
        }

        if let Some(wall) = self.arena.intersect_interior(ray)
        {
            if wall.t > EPSILON && wall.t < closest.t
            {
                closest = Hit
                {
                    t: wall.t,
                    id: WALL_ID,
                    point: ray.at(wall.t),
                    normal: wall.normal,
                };
            }
        }

        closest
    }

    /// Whether anything blocks `dir` (unit length) between `EPSILON` and `max_dist`.
    pub fn occluded(&self, origin: Vec3A, dir: Vec3A, max_dist: f32) -> bool
    {
        let ray = Ray::new(origin, dir);
        let blocked_by_sphere = self.spheres.iter().any(|sphere| {
            sphere.shape().intersect(&ray).map_or(false, |hit| hit.t < max_dist)
        });

        if blocked_by_sphere
        {
            return true;
        }

        self.arena
            .intersect_interior(&ray)
            .map_or(false, |wall| wall.t > EPSILON && wall.t < max_dist)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::{HitKind, MISS_ID};
    use assert_approx_eq::assert_approx_eq;
    use glam::{vec3, vec3a, Vec3};

    fn spheres() -> [SphereSlot; 2]
    {
        [
            SphereSlot::new(vec3(0.0, 1.0, 0.0), 1.0, Vec3::ONE, 0.5, 0.2),
            SphereSlot::new(vec3(0.0, 1.0, 3.0), 1.0, Vec3::ONE, 0.5, 0.2),
        ]
    }

    fn view(spheres: &[SphereSlot]) -> SceneView<'_>
    {
        SceneView
        {
            spheres,
            lights: &[],
            arena: AABB::new(vec3a(-6.0, 0.0, -6.0), vec3a(6.0, 6.0, 6.0)),
            transparent: Some(0),
        }
    }

    #[test]
    fn nearest_sphere_wins_along_the_axis()
    {
        let spheres = spheres();
        let ray = Ray::new(vec3a(0.0, 1.0, 10.0), vec3a(0.0, 0.0, -1.0));
        let hit = view(&spheres).trace(&ray);

        assert_eq!(hit.kind(), HitKind::Sphere(1));
        assert_approx_eq!(hit.t, 6.0, 1e-4);
        assert_approx_eq!(hit.normal.z, 1.0, 1e-5);
    }

    #[test]
    fn excluded_sphere_reveals_player_behind_it()
    {
        let spheres = spheres();
        let ray = Ray::new(vec3a(0.0, 1.0, 10.0), vec3a(0.0, 0.0, -1.0));
        let hit = view(&spheres).trace_excluding(&ray, Some(1));

        assert_eq!(hit.kind(), HitKind::Sphere(0));
        assert_approx_eq!(hit.t, 9.0, 1e-4);
        assert_approx_eq!(hit.point.z, 1.0, 1e-4);
        assert_approx_eq!(hit.normal.z, 1.0, 1e-5);
        assert_approx_eq!(hit.normal.x, 0.0, 1e-5);
    }

    #[test]
    fn player_is_hit_once_the_static_sphere_moves_aside()
    {
        let mut spheres = spheres();
        spheres[1].center = [4.0, 1.0, 3.0];
        let ray = Ray::new(vec3a(0.0, 1.0, 10.0), vec3a(0.0, 0.0, -1.0));
        let hit = view(&spheres).trace(&ray);

        assert_eq!(hit.id, 0);
        assert_approx_eq!(hit.t, 9.0, 1e-4);
        assert_approx_eq!(hit.point.z, 1.0, 1e-4);
        assert_approx_eq!(hit.normal.z, 1.0, 1e-5);
    }

    #[test]
    fn ray_leaving_the_arena_misses()
    {
        let spheres = spheres();
        let ray = Ray::new(vec3a(0.0, 20.0, 0.0), vec3a(0.0, 1.0, 0.0));
        assert_eq!(view(&spheres).trace(&ray).id, MISS_ID);
        assert!(view(&[]).trace(&Ray::new(vec3a(0.0, 20.0, 0.0), vec3a(1.0, 0.0, 0.0))).is_miss());
    }

    #[test]
    fn ray_inside_empty_arena_hits_a_wall()
    {
        let hit = view(&[]).trace(&Ray::new(vec3a(0.0, 3.0, 0.0), vec3a(0.0, -1.0, 0.0)));
        assert_eq!(hit.kind(), HitKind::Wall);
        assert_approx_eq!(hit.t, 3.0, 1e-5);
        assert_eq!(hit.normal, vec3a(0.0, 1.0, 0.0));
    }

    #[test]
    fn occlusion_respects_light_distance()
    {
        let spheres = spheres();
        let v = view(&spheres);
        let origin = vec3a(0.0, 1.0, -3.0);
        let dir = vec3a(0.0, 0.0, 1.0);

        assert!(v.occluded(origin, dir, 10.0));
        assert!(!v.occluded(origin, dir, 1.5));
        assert!(!view(&[]).occluded(vec3a(0.0, 1.0, 0.0), vec3a(0.0, 1.0, 0.0), 4.0));
        assert!(view(&[]).occluded(vec3a(0.0, 1.0, 0.0), vec3a(0.0, 1.0, 0.0), 8.0));
    }
}
