// Texture pixel data
//
// The rendering layer is out of scope; the core only needs texture
// contents as a flat color buffer for pixel-accurate collision tests
// and barrier erosion.

use crate::core::math::Rect;
use image::GenericImageView;

/// RGBA color, one byte per channel
pub type Color = [u8; 4];

/// The "nothing here" sentinel used by the collision tests.
///
/// Only this exact value counts as transparent; any other color,
/// including zero-alpha tinted pixels, is treated as solid.
pub const TRANSPARENT: Color = [0, 0, 0, 0];

/// Texture loading errors
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid texture dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// A texture's pixels as a flat buffer indexable by `x + y * width`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<Color>,
}

impl PixelBuffer {
    /// Create a buffer filled with a single color
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            data: vec![color; (width * height) as usize],
        }
    }

    /// Create a fully transparent buffer
    pub fn empty(width: u32, height: u32) -> Self {
        Self::solid(width, height, TRANSPARENT)
    }

    /// Create a buffer by evaluating a function at every coordinate
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Color) -> Self {
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Decode image bytes (PNG/JPEG) into a pixel buffer
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(&img))
    }

    /// Convert a decoded image into a pixel buffer
    pub fn from_image(img: &image::DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();
        let data = rgba.pixels().map(|p| p.0).collect();
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat index of a local coordinate, or None when out of bounds
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(x as usize + y as usize * self.width as usize)
    }

    /// Pixel at a flat index
    pub fn get(&self, index: usize) -> Option<Color> {
        self.data.get(index).copied()
    }

    /// Pixel at a local coordinate
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index_of(x, y).map(|i| self.data[i])
    }

    /// Overwrite a pixel; out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index_of(x, y) {
            self.data[i] = color;
        }
    }

    /// Erase a pixel to the transparent sentinel
    pub fn erase(&mut self, x: i32, y: i32) {
        self.set_pixel(x, y, TRANSPARENT);
    }

    /// Whether the pixel at a local coordinate is solid
    pub fn is_opaque(&self, x: i32, y: i32) -> bool {
        self.pixel(x, y).is_some_and(|p| p != TRANSPARENT)
    }

    /// Number of non-transparent pixels
    pub fn opaque_count(&self) -> usize {
        self.data.iter().filter(|&&p| p != TRANSPARENT).count()
    }

    /// Copy a sub-rectangle (e.g. one sprite-sheet frame) into a new buffer.
    ///
    /// The source region is clamped to the buffer bounds.
    pub fn sub_image(&self, region: Rect) -> Result<Self, TextureError> {
        if region.is_empty() {
            return Err(TextureError::InvalidDimensions {
                width: region.w.max(0) as u32,
                height: region.h.max(0) as u32,
            });
        }
        let out = Self::from_fn(region.w as u32, region.h as u32, |x, y| {
            self.pixel(region.x + x as i32, region.y + y as i32)
                .unwrap_or(TRANSPARENT)
        });
        Ok(out)
    }
}
