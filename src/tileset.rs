// Decoded tile frames, and the sprites pre-rendered from them.

use std::path::Path;

use image::RgbaImage;

use crate::draw::draw_frame;
use crate::error::{Error, Result};
use crate::types::{Frame, Pixel, Sprite};

/// Frames referenced by index from pillars.
#[derive(Debug, Clone, Default)]
pub struct Tileset {
    frames: Vec<Frame>,
    anim_length: usize, // passed through, never interpreted by the renderer
}

impl Tileset {
    pub fn new(frames: Vec<Frame>, anim_length: usize) -> Self {
        Self { frames, anim_length }
    }

    /// Slice a sprite sheet row-major into `frame_width x frame_height` frames.
    /// Fully transparent pixels become invisible.
    pub fn from_sheet(sheet: &RgbaImage, frame_width: usize, frame_height: usize) -> Result<Self> {
        if frame_width == 0 || frame_height == 0 {
            return Err(Error::format("frame size must be non-zero"));
        }
        let (w, h) = (sheet.width() as usize, sheet.height() as usize);
        if w % frame_width != 0 || h % frame_height != 0 {
            return Err(Error::format(format!(
                "sheet {w}x{h} is not a whole number of {frame_width}x{frame_height} frames"
            )));
        }

        let mut frames = Vec::with_capacity((w / frame_width) * (h / frame_height));
        for fy in (0..h).step_by(frame_height) {
            for fx in (0..w).step_by(frame_width) {
                frames.push(Frame::from_fn(frame_width, frame_height, |x, y| {
                    let px = sheet.get_pixel((fx + x) as u32, (fy + y) as u32);
                    if px[3] == 0 {
                        Pixel::HIDDEN
                    } else {
                        Pixel::rgb(px[0], px[1], px[2])
                    }
                }));
            }
        }

        let anim_length = frames.len();
        Ok(Self { frames, anim_length })
    }

    pub fn load_sheet(
        path: impl AsRef<Path>,
        frame_width: usize,
        frame_height: usize,
    ) -> Result<Self> {
        let sheet = image::open(path)?.to_rgba8();
        Self::from_sheet(&sheet, frame_width, frame_height)
    }

    /// The frame at `index`; an index past the end is a format error.
    pub fn frame(&self, index: usize) -> Result<&Frame> {
        self.frames.get(index).ok_or_else(|| {
            Error::format(format!(
                "tile index {index} outside tileset of {} frames",
                self.frames.len()
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn anim_length(&self) -> usize {
        self.anim_length
    }
}

/// Every frame of a tileset pre-composited onto its own transparent sprite.
#[derive(Debug, Clone)]
pub struct SpriteGroup {
    sprites: Vec<Sprite>,
    anim_length: usize,
}

impl SpriteGroup {
    pub fn from_tileset(tileset: &Tileset) -> Self {
        let sprites = tileset
            .frames
            .iter()
            .map(|frame| {
                let mut sprite = Sprite::transparent(frame.width(), frame.height());
                draw_frame(&mut sprite, 0, 0, frame);
                sprite
            })
            .collect();
        Self { sprites, anim_length: tileset.anim_length }
    }

    pub fn load(path: impl AsRef<Path>, frame_width: usize, frame_height: usize) -> Result<Self> {
        Ok(Self::from_tileset(&Tileset::load_sheet(path, frame_width, frame_height)?))
    }

    pub fn get(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn anim_length(&self) -> usize {
        self.anim_length
    }

    /// Sprite to show on animation tick `tick`, looping over the animation.
    pub fn animated(&self, tick: usize) -> Option<&Sprite> {
        let len = self.anim_length.min(self.sprites.len());
        if len == 0 {
            return None;
        }
        self.sprites.get(tick % len)
    }
}
