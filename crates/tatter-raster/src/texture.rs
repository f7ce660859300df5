//! Straight-alpha RGBA8 raster images

use bytemuck::{Pod, Zeroable};
use std::path::Path;
use tatter_core::{Result, TatterError};

/// One straight-alpha RGBA8 pixel
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Premultiplied float components
    pub fn premultiplied(&self) -> [f32; 4] {
        let a = self.a as f32 / 255.0;
        [
            self.r as f32 / 255.0 * a,
            self.g as f32 / 255.0 * a,
            self.b as f32 / 255.0 * a,
            a,
        ]
    }

    /// Inverse of [`Rgba::premultiplied`]
    pub fn from_premultiplied(p: [f32; 4]) -> Self {
        let a = p[3].clamp(0.0, 1.0);
        if a <= 0.0 {
            return Self::TRANSPARENT;
        }
        let q = |v: f32| ((v / a).clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(q(p[0]), q(p[1]), q(p[2]), (a * 255.0).round() as u8)
    }
}

/// An immutable-by-convention texture, e.g. the card snapshot
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl RasterImage {
    /// Fully transparent image
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, fill: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Result<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(TatterError::Image(format!(
                "expected {} pixels for {width}x{height}, got {}",
                width as usize * height as usize,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    pub fn from_rgba_image(img: &image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = bytemuck::cast_slice::<u8, Rgba>(img.as_raw()).to_vec();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn to_rgba_image(&self) -> Result<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.as_bytes().to_vec())
            .ok_or_else(|| TatterError::Image("pixel buffer size mismatch".into()))
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_rgba_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| TatterError::Image(e.to_string()))
    }
}
