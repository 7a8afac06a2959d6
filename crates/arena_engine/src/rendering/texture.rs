use std::path::Path;

use arena_core::texture::{BrickPattern, WallTexture};
use glam::{Vec2, Vec3A, vec3a};
use image::RgbImage;

use crate::error::Result;

/// Image mapped onto the walls with repeat wrapping and nearest sampling.
#[derive(Debug, Clone)]
pub struct ImageTexture
{
    image: RgbImage,
    /// World units covered by one repeat of the image.
    pub tile_size: f32,
    pub offset: Vec2,
}

impl ImageTexture
{
    pub fn new(image: RgbImage) -> Self
    {
        Self { image, tile_size: 20.0, offset: Vec2::splat(10.0) }
    }

    pub fn load<P>(path: P) -> Result<Self>
        where P : AsRef<Path>
    {
        let image = image::open(path.as_ref())?.to_rgb8();
        log::info!("Loaded wall texture {} ({}x{})", path.as_ref().display(), image.width(), image.height());
        Ok(Self::new(image))
    }

    pub fn width(&self) -> u32 { self.image.width() }
    pub fn height(&self) -> u32 { self.image.height() }
}

impl WallTexture for ImageTexture
{
    fn sample(&self, coords: Vec2) -> Vec3A
    {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 || !coords.is_finite()
        {
            return Vec3A::ZERO;
        }

        let uv = (coords + self.offset) / self.tile_size;
        let uv = uv - uv.floor();
        let x = ((uv.x * w as f32) as u32).min(w - 1);
        let y = ((uv.y * h as f32) as u32).min(h - 1);

        let [r, g, b] = self.image.get_pixel(x, y).0;
        vec3a(r as f32, g as f32, b as f32) / 255.0
    }
}

/// Surface used for the side walls.
#[derive(Debug, Clone)]
pub enum WallMaterial
{
    Bricks(BrickPattern),
    Image(ImageTexture),
}

impl Default for WallMaterial
{
    fn default() -> Self
    {
        WallMaterial::Bricks(BrickPattern::default())
    }
}

impl WallMaterial
{
    /// Image texture when `path` is given, procedural bricks otherwise.
    pub fn from_path<P>(path: Option<P>) -> Result<Self>
        where P : AsRef<Path>
    {
        match path
        {
            Some(path) => Ok(WallMaterial::Image(ImageTexture::load(path)?)),
            None => Ok(WallMaterial::default()),
        }
    }
}

impl WallTexture for WallMaterial
{
    fn sample(&self, coords: Vec2) -> Vec3A
    {
        match self
        {
            WallMaterial::Bricks(bricks) => bricks.sample(coords),
            WallMaterial::Image(image) => image.sample(coords),
        }
    }
}
