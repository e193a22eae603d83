// Core pixel types shared by the compositor, the baker and the viewer.

use crate::error::{Error, Result};

/// One decoded tile pixel. Invisible pixels are never drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub visible: bool,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const HIDDEN: Pixel = Pixel { visible: false, r: 0, g: 0, b: 0 };

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { visible: true, r, g, b }
    }

    /// Pack as 0x00RRGGBB, the layout minifb expects.
    #[inline]
    pub fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// A decoded tile frame. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>, // row-major, width * height
}

impl Frame {
    pub fn new(width: usize, height: usize, pixels: Vec<Pixel>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(Error::format(format!(
                "frame {width}x{height} needs {} pixels, got {}",
                width * height,
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    /// Build a frame from a per-pixel function.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Pixel) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self { width, height, pixels }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Panics if `(x, y)` lies outside the frame, like slice indexing.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        assert!(x < self.width && y < self.height, "pixel ({x},{y}) outside frame");
        self.pixels[y * self.width + x]
    }
}

/// Anything the compositor can write pixels into.
///
/// Callers clip against `width`/`height` before calling `write`.
pub trait PixelTarget {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn write(&mut self, x: usize, y: usize, pixel: Pixel);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the image is (pixels)
    pub height: usize,     // how tall the image is (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A black buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Like `new`, but reports size overflow and allocation failure instead of aborting.
    pub fn try_new(width: usize, height: usize) -> Result<Self> {
        let len = width
            .checked_mul(height)
            .ok_or_else(|| Error::resource(format!("{width}x{height} image overflows")))?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|e| Error::resource(format!("allocating {width}x{height} image: {e}")))?;
        pixels.resize(len, 0);
        Ok(Self { width, height, pixels })
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }
}

impl PixelTarget for FrameBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn write(&mut self, x: usize, y: usize, pixel: Pixel) {
        self.pixels[y * self.width + x] = pixel.packed();
    }
}

/// A movable image with its own transparency.
/// Each entry is 0xAARRGGBB; alpha is either 0x00 (see-through) or 0xFF.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

pub const OPAQUE: u32 = 0xFF00_0000;

impl Sprite {
    /// A fully see-through sprite, ready to be drawn into.
    pub fn transparent(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    #[inline]
    pub fn is_opaque_at(&self, x: usize, y: usize) -> bool {
        self.pixels[y * self.width + x] & OPAQUE != 0
    }
}

impl PixelTarget for Sprite {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn write(&mut self, x: usize, y: usize, pixel: Pixel) {
        self.pixels[y * self.width + x] = OPAQUE | pixel.packed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_rgb_for_the_window() {
        assert_eq!(Pixel::rgb(0x12, 0x34, 0x56).packed(), 0x0012_3456);
    }

    #[test]
    fn frame_rejects_wrong_pixel_count() {
        let err = Frame::new(2, 2, vec![Pixel::HIDDEN; 3]).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn frame_from_fn_is_row_major() {
        let f = Frame::from_fn(3, 2, |x, y| Pixel::rgb(x as u8, y as u8, 0));
        assert_eq!(f.pixel(2, 1), Pixel::rgb(2, 1, 0));
        assert_eq!(f.pixel(0, 1), Pixel::rgb(0, 1, 0));
    }

    #[test]
    fn try_new_reports_overflow_as_resource_error() {
        let err = FrameBuffer::try_new(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }

    #[test]
    fn sprite_writes_are_opaque() {
        let mut s = Sprite::transparent(2, 1);
        s.write(1, 0, Pixel::rgb(1, 2, 3));
        assert!(!s.is_opaque_at(0, 0));
        assert!(s.is_opaque_at(1, 0));
        assert_eq!(s.pixels[1], 0xFF01_0203);
    }
}
