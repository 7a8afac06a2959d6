use std::path::Path;

use arena_core::{FrameUniforms, kernel};
use image::{ImageFormat, Rgba, RgbaImage};
use rayon::prelude::*;

use crate::config::RenderSettings;
use crate::error::Result;
use crate::rendering::texture::WallMaterial;
use crate::utils::time_call;

/// RGBA8 pixels, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer
{
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Framebuffer
{
    pub fn new(width: u32, height: u32) -> Self
    {
        Self { width, height, pixels: vec![0; width as usize * height as usize * 4] }
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn as_bytes(&self) -> &[u8] { &self.pixels }

    pub fn resize(&mut self, width: u32, height: u32)
    {
        if width != self.width || height != self.height
        {
            *self = Self::new(width, height);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]>
    {
        if x >= self.width || y >= self.height
        {
            return None;
        }

        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut pixel = [0; 4];
        pixel.copy_from_slice(&self.pixels[i..i + 4]);
        Some(pixel)
    }

    fn row_stride(&self) -> usize
    {
        self.width as usize * 4
    }

    pub fn to_image(&self) -> RgbaImage
    {
        RgbaImage::from_fn(self.width, self.height, |x, y| Rgba(self.pixel(x, y).unwrap_or_default()))
    }

    pub fn save_png<P>(&self, path: P) -> Result<()>
        where P : AsRef<Path>
    {
        self.to_image().save_with_format(path.as_ref(), ImageFormat::Png)?;
        log::info!("Wrote {}x{} frame to {}", self.width, self.height, path.as_ref().display());
        Ok(())
    }
}

/// CPU dispatch of the per-pixel kernel over a dedicated rayon pool.
pub struct Renderer
{
    pool: rayon::ThreadPool,
    material: WallMaterial,
}

impl Renderer
{
    pub fn new(settings: &RenderSettings) -> Result<Self>
    {
        let material = WallMaterial::from_path(settings.wall_texture.as_ref())?;
        Self::with_material(settings.threads, material)
    }

    pub fn with_material(threads: usize, material: WallMaterial) -> Result<Self>
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("render-{}", i))
            .build()?;

        log::info!("Renderer using {} threads", pool.current_num_threads());
        Ok(Self { pool, material })
    }

    pub fn material(&self) -> &WallMaterial { &self.material }

    /// Renders every row in parallel. `frame` is resized to the uniforms' resolution.
    pub fn render(&self, uniforms: &FrameUniforms, frame: &mut Framebuffer)
    {
        frame.resize(uniforms.width(), uniforms.height());
        let stride = frame.row_stride();
        if stride == 0
        {
            return;
        }

        let material = &self.material;
        time_call(|| {
            self.pool.install(|| {
                frame.pixels
                    .par_chunks_mut(stride)
                    .enumerate()
                    .for_each(|(y, row)| kernel::render_row(uniforms, material, y as u32, row));
            })
        }, "render frame");
    }

    /// Same output as [`Renderer::render`] on the calling thread.
    pub fn render_sequential(&self, uniforms: &FrameUniforms, frame: &mut Framebuffer)
    {
        frame.resize(uniforms.width(), uniforms.height());
        let stride = frame.row_stride();
        if stride == 0
        {
            return;
        }

        for (y, row) in frame.pixels.chunks_mut(stride).enumerate()
        {
            kernel::render_row(uniforms, &self.material, y as u32, row);
        }
    }
}
