use std::path::Path;

use rayon::prelude::*;

use crate::error::Result;

/// Depth value of an empty pixel; NDC depth is remapped into [0, 1].
pub const FAR_DEPTH: f32 = 1.0;

/// Colour buffer in minifb's `0xAARRGGBB` layout plus a matching depth buffer.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u32>,
    pub depth: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            width,
            height,
            data: vec![0; width * height],
            depth: vec![FAR_DEPTH; width * height],
        }
    }

    pub fn clear(&mut self, color: u32) {
        self.data.par_iter_mut().for_each(|c| *c = color);
        self.depth.par_iter_mut().for_each(|d| *d = FAR_DEPTH);
    }

    /// Writes `color` if `depth` is closer than what is stored. Returns whether
    /// the pixel was written.
    pub fn put_pixel(&mut self, x: usize, y: usize, color: u32, depth: f32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = y * self.width + x;
        if depth < self.depth[idx] {
            self.data[idx] = color;
            self.depth[idx] = depth;
            true
        } else {
            false
        }
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[y * self.width + x]
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.data[y * self.width + x]
    }

    /// Box-filters `factor x factor` blocks into one pixel.
    pub fn ssaa(&self, factor: usize) -> Self {
        if factor <= 1 {
            return self.clone();
        }
        let new_width = self.width / factor;
        let new_height = self.height / factor;
        let count = (factor * factor) as u32;

        let data: Vec<u32> = (0..new_width * new_height)
            .into_par_iter()
            .map(|i| {
                let (x, y) = (i % new_width, i / new_width);
                let (mut a, mut r, mut g, mut b) = (0u32, 0u32, 0u32, 0u32);
                for dy in 0..factor {
                    let row = (y * factor + dy) * self.width;
                    for dx in 0..factor {
                        let color = self.data[row + x * factor + dx];
                        a += (color >> 24) & 0xFF;
                        r += (color >> 16) & 0xFF;
                        g += (color >> 8) & 0xFF;
                        b += color & 0xFF;
                    }
                }
                (a / count) << 24 | (r / count) << 16 | (g / count) << 8 | (b / count)
            })
            .collect();

        Self {
            width: new_width,
            height: new_height,
            data,
            depth: vec![FAR_DEPTH; new_width * new_height],
        }
    }

    pub fn save_to_image(&self, path: &Path) -> Result<()> {
        use image::{ImageBuffer, Rgb};

        let img = ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            let color = self.data[y as usize * self.width + x as usize];
            Rgb([
                ((color >> 16) & 0xFF) as u8,
                ((color >> 8) & 0xFF) as u8,
                (color & 0xFF) as u8,
            ])
        });
        img.save(path)?;
        log::info!("saved {}x{} frame to {}", self.width, self.height, path.display());
        Ok(())
    }
}
