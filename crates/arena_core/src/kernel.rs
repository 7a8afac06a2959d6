use glam::Vec3A;

use crate::shading::{self, ShadingContext};
use crate::texture::WallTexture;
use crate::trace::SceneView;
use crate::uniforms::FrameUniforms;

/// Linear (pre tone map) color of pixel `(x, y)`.
pub fn trace_pixel<T>(uniforms: &FrameUniforms, texture: &T, x: u32, y: u32) -> Vec3A
    where T : WallTexture + ?Sized
{
    let view = SceneView::from_uniforms(uniforms);
    let ctx = ShadingContext::new(view, uniforms.material, uniforms.time, texture);

    let ray = uniforms
        .camera_basis()
        .get_ray(x, y, uniforms.width(), uniforms.height(), uniforms.material.pixelation);
    let hit = view.trace(&ray);
    ctx.shade(&hit, ray.dir, 0)
}

/// Final RGBA8 value of pixel `(x, y)`. Reads nothing but its arguments.
pub fn render_pixel<T>(uniforms: &FrameUniforms, texture: &T, x: u32, y: u32) -> [u8; 4]
    where T : WallTexture + ?Sized
{
    shading::to_rgba8(shading::tone_map(trace_pixel(uniforms, texture, x, y)))
}

/// Fills one RGBA8 row. `row` must hold `4 * width` bytes.
pub fn render_row<T>(uniforms: &FrameUniforms, texture: &T, y: u32, row: &mut [u8])
    where T : WallTexture + ?Sized
{
    for (x, pixel) in row.chunks_exact_mut(4).enumerate()
    {
        pixel.copy_from_slice(&render_pixel(uniforms, texture, x as u32, y));
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::{Camera, LightSlot, SphereSlot};
    use crate::texture::BrickPattern;
    use glam::{vec3, vec3a, Vec3};

    fn uniforms() -> FrameUniforms
    {
        let mut uniforms = FrameUniforms::default();
        uniforms.resolution = [16, 12];
        uniforms.material = Default::default();
        uniforms.camera = Camera::new(vec3a(0.0, 3.0, 10.0), vec3a(0.0, 1.0, 0.0), 90.0).basis().to_slot();
        uniforms.box_min = [-6.0, 0.0, -6.0];
        uniforms.box_max = [6.0, 6.0, 6.0];
        uniforms.transparent_index = 0;
        uniforms.set_spheres([
            SphereSlot::new(vec3(0.0, 1.0, 2.0), 0.9, Vec3::ONE, 0.6, 0.1),
            SphereSlot::new(vec3(2.0, 0.5, 0.0), 0.5, vec3(0.9, 0.3, 0.2), 0.4, 0.5),
        ]);
        uniforms.set_lights([LightSlot::new(vec3(4.0, 5.5, 2.0), vec3(1.0, 0.95, 0.9), 1.0)]);
        uniforms
    }

    #[test]
    fn pixels_are_deterministic_and_opaque()
    {
        let uniforms = uniforms();
        let bricks = BrickPattern::default();

        for y in 0..12
        {
            for x in 0..16
            {
                let a = render_pixel(&uniforms, &bricks, x, y);
                assert_eq!(a, render_pixel(&uniforms, &bricks, x, y));
                assert_eq!(a[3], 255);
            }
        }
    }

    #[test]
    fn row_matches_individual_pixels()
    {
        let uniforms = uniforms();
        let bricks = BrickPattern::default();
        let mut row = vec![0u8; 16 * 4];
        render_row(&uniforms, &bricks, 5, &mut row);

        for x in 0..16
        {
            assert_eq!(&row[x * 4..x * 4 + 4], &render_pixel(&uniforms, &bricks, x as u32, 5));
        }
    }

    #[test]
    fn zero_sized_frame_does_not_panic()
    {
        let mut uniforms = uniforms();
        uniforms.resolution = [0, 0];
        let _ = render_pixel(&uniforms, &BrickPattern::default(), 0, 0);
    }
}
