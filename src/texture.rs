use cgmath::{Vector2 as Vec2, Vector3 as Vec3};
use image::RgbaImage;
use rayon::prelude::*;
use std::path::Path;

use crate::error::{Error, Result};

pub const MAX_TEXTURE_SLOTS: usize = 16;

/// RGBA texels packed as `0xRRGGBBAA`, row 0 at the bottom of the image.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u32>,
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0xFFFFFFFF; width * height],
        }
    }

    pub fn from_file(path: &Path) -> std::result::Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let texture = Self::from_image(&img);
        log::debug!(
            "loaded {} ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );
        Ok(texture)
    }

    /// Flips vertically so UV (0, 0) lands on the bottom-left texel.
    pub fn from_image(img: &RgbaImage) -> Self {
        let flipped = image::imageops::flip_vertical(img);
        let (width, height) = flipped.dimensions();
        let data = flipped
            .pixels()
            .map(|pixel| {
                ((pixel[0] as u32) << 24)
                    | ((pixel[1] as u32) << 16)
                    | ((pixel[2] as u32) << 8)
                    | (pixel[3] as u32)
            })
            .collect();
        Texture {
            width: width as usize,
            height: height as usize,
            data,
        }
    }

    /// Bilinear sample with repeat wrapping on both axes.
    pub fn sample(&self, uv: Vec2<f32>) -> Vec3<f32> {
        if self.width == 0 || self.height == 0 {
            return Vec3::new(1.0, 1.0, 1.0);
        }
        let x = uv.x * self.width as f32 - 0.5;
        let y = uv.y * self.height as f32 - 0.5;
        if !x.is_finite() || !y.is_finite() {
            return self.get_pixel_color(0, 0);
        }
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let c00 = self.texel(x0, y0);
        let c10 = self.texel(x0 + 1, y0);
        let c01 = self.texel(x0, y0 + 1);
        let c11 = self.texel(x0 + 1, y0 + 1);

        let bottom = c00 * (1.0 - fx) + c10 * fx;
        let top = c01 * (1.0 - fx) + c11 * fx;
        bottom * (1.0 - fy) + top * fy
    }

    fn texel(&self, x: i64, y: i64) -> Vec3<f32> {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.get_pixel_color(x, y)
    }

    fn get_pixel_color(&self, x: usize, y: usize) -> Vec3<f32> {
        let color = self.data[y * self.width + x];
        Vec3::new(
            ((color >> 24) & 0xFF) as f32 / 255.0,
            ((color >> 16) & 0xFF) as f32 / 255.0,
            ((color >> 8) & 0xFF) as f32 / 255.0,
        )
    }
}

/// Tag-addressed texture slots, at most [`MAX_TEXTURE_SLOTS`].
#[derive(Default)]
pub struct TextureLibrary {
    slots: Vec<(String, Texture)>,
}

impl TextureLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `(tag, file)` pair under `dir`. Files that fail to load are
    /// reported and skipped so the scene still renders with flat colours.
    pub fn load_all(dir: &Path, manifest: &[(&str, &str)]) -> Self {
        let loaded: Vec<(&str, std::result::Result<Texture, image::ImageError>)> = manifest
            .par_iter()
            .map(|(tag, file)| (*tag, Texture::from_file(&dir.join(file))))
            .collect();

        let mut library = Self::new();
        for (tag, result) in loaded {
            match result {
                Ok(texture) => {
                    if let Err(e) = library.insert(tag, texture) {
                        log::warn!("dropping texture {tag:?}: {e}");
                    }
                }
                Err(e) => log::warn!("could not load texture {tag:?} from {}: {e}", dir.display()),
            }
        }
        log::info!("{} of {} textures loaded", library.len(), manifest.len());
        library
    }

    /// Registers `texture` under `tag`, replacing an existing slot with the same tag.
    pub fn insert(&mut self, tag: &str, texture: Texture) -> Result<usize> {
        if let Some(slot) = self.slot(tag) {
            self.slots[slot].1 = texture;
            return Ok(slot);
        }
        if self.slots.len() >= MAX_TEXTURE_SLOTS {
            return Err(Error::TextureSlotsExhausted(MAX_TEXTURE_SLOTS));
        }
        self.slots.push((tag.to_string(), texture));
        Ok(self.slots.len() - 1)
    }

    pub fn slot(&self, tag: &str) -> Option<usize> {
        self.slots.iter().position(|(t, _)| t == tag)
    }

    pub fn find(&self, tag: &str) -> Option<&Texture> {
        self.slots.iter().find(|(t, _)| t == tag).map(|(_, texture)| texture)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
