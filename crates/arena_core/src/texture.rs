use glam::{Vec2, Vec3A, vec2, vec3a};
use num_traits::Float;

use crate::math::{fract, mix, smoothstep, step};

/// Source of wall colors. `coords` are world-space coordinates on the wall plane.
pub trait WallTexture
{
    fn sample(&self, coords: Vec2) -> Vec3A;
}

impl<T> WallTexture for &T where T : WallTexture + ?Sized
{
    fn sample(&self, coords: Vec2) -> Vec3A
    {
        (**self).sample(coords)
    }
}

/// Running-bond brick lattice with mortar gaps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrickPattern
{
    pub scale: f32,
    pub mortar: f32,
    pub brick_a: Vec3A,
    pub brick_b: Vec3A,
    pub mortar_color: Vec3A,
}

impl Default for BrickPattern
{
    fn default() -> Self
    {
        Self
        {
            scale: 1.2,
            mortar: 0.08,
            brick_a: vec3a(0.58, 0.18, 0.12),
            brick_b: vec3a(0.45, 0.15, 0.1),
            mortar_color: vec3a(0.85, 0.85, 0.85),
        }
    }
}

impl WallTexture for BrickPattern
{
    fn sample(&self, coords: Vec2) -> Vec3A
    {
        let uv = coords * self.scale;
        let row = uv.y.floor();
        let offset = if fract(row * 0.5) > 0.25 { 0.5 } else { 0.0 };
        let column = (uv.x + offset).floor();

        let parity = fract((column + row) * 0.5) * 2.0;
        let brick = mix(self.brick_a, self.brick_b, parity);

        let cell = vec2(fract(uv.x + offset), fract(uv.y));
        let inside = step(self.mortar, cell.x) * step(self.mortar, cell.y);
        mix(self.mortar_color, brick, inside)
    }
}

/// Wood floor tiles: checker parity, plank stripes, grain and dark grout at the tile edges.
pub fn floor_tiles(coords: Vec2) -> Vec3A
{
    const LIGHT_WOOD: Vec3A = Vec3A::new(0.82, 0.7, 0.55);
    const DARK_WOOD: Vec3A = Vec3A::new(0.5, 0.35, 0.2);
    const GROUT: Vec3A = Vec3A::new(0.12, 0.12, 0.12);

    let uv = coords * 0.6;
    let cell = uv.floor();
    let local = vec2(fract(uv.x), fract(uv.y));

    let tile = fract((cell.x + cell.y) * 0.5) * 2.0;
    let stripe = step(0.5, fract(uv.y * 4.0));
    let mut color = mix(LIGHT_WOOD, DARK_WOOD, tile * 0.6 + 0.2 * stripe);

    let grain = 0.04 * (uv.x * 10.0 + uv.y * 2.0 + cell.dot(cell)).sin();
    color += Vec3A::splat(grain);

    let edge = smoothstep(0.0, 0.02, local.x.min(local.y));
    mix(GROUT, color, edge)
}

/// Plane coordinates for a wall hit, chosen from the face normal.
pub fn wall_coords(point: Vec3A, normal: Vec3A) -> Vec2
{
    if normal.x.abs() > 0.5
    {
        vec2(point.z, point.y)
    }
    else if normal.z.abs() > 0.5
    {
        vec2(point.x, point.y)
    }
    else
    {
        vec2(point.x, point.z)
    }
}
