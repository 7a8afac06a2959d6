use glam::{Vec2, Vec3A, vec2, vec3a};

use crate::math::fract;

/// Cheap 2D -> [0, 1) hash.
pub fn hash12(p: Vec2) -> f32
{
    let mut p = vec2(fract(p.x * 123.34), fract(p.y * 456.21));
    p += p.dot(p + 45.32);
    fract(p.x * p.y)
}

/// Offset in [-1, 1)^3 derived from a surface point and a (sample, time) seed.
pub fn jitter(point: Vec3A, seed: Vec2) -> Vec3A
{
    let x = hash12(vec2(point.x, point.y) + seed);
    let y = hash12(vec2(point.y, point.z) + seed + 17.0);
    let z = hash12(vec2(point.z, point.x) + seed + 31.0);
    vec3a(x, y, z) * 2.0 - 1.0
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn hash_stays_in_unit_range_and_is_deterministic()
    {
        for i in 0..200
        {
            let p = vec2(i as f32 * 0.37, i as f32 * -1.13);
            let h = hash12(p);
            assert!((0.0..1.0).contains(&h));
            assert_eq!(h, hash12(p));
        }
    }

    #[test]
    fn jitter_varies_with_seed()
    {
        let point = vec3a(0.3, 1.2, -0.7);
        let a = jitter(point, vec2(0.0, 1.0));
        let b = jitter(point, vec2(1.0, 1.0));
        assert_ne!(a, b);
        assert!(a.abs().max_element() <= 1.0);
    }
}
