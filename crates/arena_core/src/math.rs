use glam::{Mat4, Vec3, Vec3A};
use num_traits::Float;

pub fn identity() -> Mat4 { Mat4::IDENTITY }

pub fn multiply(a: Mat4, b: Mat4) -> Mat4 { a * b }

pub fn translate(offset: Vec3) -> Mat4 { Mat4::from_translation(offset) }

pub fn scale(factors: Vec3) -> Mat4 { Mat4::from_scale(factors) }

pub fn rotate_x(angle: f32) -> Mat4 { Mat4::from_rotation_x(angle) }

pub fn rotate_y(angle: f32) -> Mat4 { Mat4::from_rotation_y(angle) }

pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4
{
    Mat4::look_at_rh(eye, target, up)
}

/// OpenGL style clip space (depth in [-1, 1]).
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4
{
    Mat4::perspective_rh_gl(fov_y, aspect, near, far)
}

/// Normalizes `v`, or returns it unchanged when it has no length.
pub fn safe_normalize(v: Vec3A) -> Vec3A
{
    let len = v.length();
    if len > 0.0 && len.is_finite() { v / len } else { v }
}

pub fn reflect(incident: Vec3A, normal: Vec3A) -> Vec3A
{
    incident - normal * (2.0 * normal.dot(incident))
}

/// Snell refraction of a unit `incident` through a unit `normal` facing against it.
/// `None` on total internal reflection.
pub fn refract(incident: Vec3A, normal: Vec3A, eta: f32) -> Option<Vec3A>
{
    let cos_i = normal.dot(incident);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0
    {
        return None;
    }

    Some(safe_normalize(incident * eta - normal * (eta * cos_i + k.sqrt())))
}

pub fn mix(a: Vec3A, b: Vec3A, t: f32) -> Vec3A
{
    a + (b - a) * t
}

pub fn mix_f32(a: f32, b: f32, t: f32) -> f32
{
    a + (b - a) * t
}

pub fn step(edge: f32, x: f32) -> f32
{
    if x < edge { 0.0 } else { 1.0 }
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32
{
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn fract(x: f32) -> f32
{
    x - x.floor()
}

#[cfg(test)]
mod tests
{
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use glam::{vec3, vec3a, Vec4};

    #[test]
    fn transforms_compose_in_order()
    {
        let m = multiply(translate(vec3(1.0, 2.0, 3.0)), scale(vec3(2.0, 2.0, 2.0)));
        let p = m * Vec4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(p, Vec4::new(3.0, 4.0, 5.0, 1.0));
        assert_eq!(multiply(identity(), m), m);
    }

    #[test]
    fn rotate_y_turns_x_into_negative_z()
    {
        let p = rotate_y(core::f32::consts::FRAC_PI_2) * Vec4::new(1.0, 0.0, 0.0, 0.0);
        assert_approx_eq!(p.x, 0.0, 1e-6);
        assert_approx_eq!(p.z, -1.0, 1e-6);

        let p = rotate_x(core::f32::consts::FRAC_PI_2) * Vec4::new(0.0, 1.0, 0.0, 0.0);
        assert_approx_eq!(p.z, 1.0, 1e-6);
    }

    #[test]
    fn look_at_moves_target_onto_negative_z()
    {
        let view = look_at(vec3(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let p = view * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_approx_eq!(p.z, -5.0, 1e-5);

        let proj = perspective(1.0, 1.0, 0.1, 100.0);
        let clip = proj * p;
        assert!(clip.w > 0.0);
    }

    #[test]
    fn zero_vector_normalizes_to_itself()
    {
        assert_eq!(safe_normalize(Vec3A::ZERO), Vec3A::ZERO);
        assert_approx_eq!(safe_normalize(vec3a(3.0, 4.0, 0.0)).length(), 1.0, 1e-6);
    }

    #[test]
    fn refract_straight_through_and_total_internal_reflection()
    {
        let down = vec3a(0.0, -1.0, 0.0);
        let up = vec3a(0.0, 1.0, 0.0);
        let t = refract(down, up, 1.0 / 1.5).unwrap();
        assert_approx_eq!(t.y, -1.0, 1e-6);

        let grazing = safe_normalize(vec3a(1.0, -0.1, 0.0));
        assert!(refract(grazing, up, 1.5).is_none());
        assert_eq!(reflect(down, up), up);
    }

    #[test]
    fn smoothstep_clamps_outside_edges()
    {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert_approx_eq!(smoothstep(0.0, 1.0, 0.5), 0.5, 1e-6);
        assert_approx_eq!(fract(-0.25), 0.75, 1e-6);
    }
}
