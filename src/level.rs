//! Pre-bakes a whole grid into one image at level load.
//!
//! Each cell's pillar is drawn at its isometric anchor ([`crate::view::project`]).
//! Pillars at different cells never overlap once projected, so cell order does not
//! matter. The result is built once and kept for the lifetime of the level; only
//! its camera anchor changes afterwards.

use std::path::PathBuf;

use image::{ImageFormat, Rgb, RgbImage};

use crate::draw::DrawStats;
use crate::error::{Error, Result};
use crate::pillar::draw_pillar;
use crate::tile::Grid;
use crate::tileset::Tileset;
use crate::types::FrameBuffer;
use crate::view::{CELL_DX, CELL_DY, GridPos, project};

/// Extra rows below the floor diamond reserved for the tallest legal pillar.
pub const PILLAR_HEADROOM: usize = 224;

/// The baked level: image, grid size and the current camera anchor.
#[derive(Debug, Clone)]
pub struct BakedLevel {
    image: FrameBuffer,
    level_width: usize,
    level_height: usize,
    view: (i32, i32),
    clipped: usize,
}

impl BakedLevel {
    pub fn image(&self) -> &FrameBuffer {
        &self.image
    }

    pub fn level_width(&self) -> usize {
        self.level_width
    }

    pub fn level_height(&self) -> usize {
        self.level_height
    }

    /// Where the image's top-left goes on screen this frame.
    pub fn view(&self) -> (i32, i32) {
        self.view
    }

    pub fn set_view(&mut self, view: (i32, i32)) {
        self.view = view;
    }

    /// Tile pixels that fell outside the image while baking.
    pub fn clipped_pixels(&self) -> usize {
        self.clipped
    }
}

/// Opt-in hook that sees the finished image before `bake_with` returns.
/// It cannot fail the bake.
pub trait BakeDiagnostics {
    fn baked(&mut self, level: &BakedLevel);
}

impl<F: FnMut(&BakedLevel)> BakeDiagnostics for F {
    fn baked(&mut self, level: &BakedLevel) {
        self(level)
    }
}

/// Writes the baked image to a BMP file.
#[derive(Debug, Clone)]
pub struct BmpDump {
    pub path: PathBuf,
}

impl BmpDump {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn to_image(fb: &FrameBuffer) -> RgbImage {
        RgbImage::from_fn(fb.width as u32, fb.height as u32, |x, y| {
            let c = fb.pixels[y as usize * fb.width + x as usize];
            Rgb([(c >> 16) as u8, (c >> 8) as u8, c as u8])
        })
    }
}

impl BakeDiagnostics for BmpDump {
    fn baked(&mut self, level: &BakedLevel) {
        match Self::to_image(&level.image).save_with_format(&self.path, ImageFormat::Bmp) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "baked level dumped"),
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "could not dump baked level"
            ),
        }
    }
}

/// `((w + h) * 32, (w + h) * 16 + 224)` for a `w x h` grid.
pub fn baked_size(width: usize, height: usize) -> Result<(usize, usize)> {
    let overflow = || Error::resource(format!("{width}x{height} grid is too large to bake"));
    let cells = width.checked_add(height).ok_or_else(overflow)?;
    let w = cells.checked_mul(CELL_DX as usize).ok_or_else(overflow)?;
    let h = cells
        .checked_mul(CELL_DY as usize)
        .and_then(|h| h.checked_add(PILLAR_HEADROOM))
        .ok_or_else(overflow)?;
    Ok((w, h))
}

/// Bake `grid` with no diagnostics.
pub fn bake(grid: &Grid, tileset: &Tileset) -> Result<BakedLevel> {
    bake_with(grid, tileset, &mut |_: &BakedLevel| {})
}

/// Bake `grid`, handing the result to `diagnostics` before returning it.
///
/// Every tile reference is checked against the tileset before anything is
/// allocated or drawn, so a bad level fails without producing an image.
#[tracing::instrument(skip_all, fields(width = grid.width(), height = grid.height()))]
pub fn bake_with(
    grid: &Grid,
    tileset: &Tileset,
    diagnostics: &mut dyn BakeDiagnostics,
) -> Result<BakedLevel> {
    for (x, y, pillar) in grid.cells() {
        if let Some(max) = pillar.max_index() {
            if max >= tileset.len() {
                return Err(Error::format(format!(
                    "cell ({x},{y}) uses tile {max}, tileset has {} frames",
                    tileset.len()
                )));
            }
        }
    }

    let (width, height) = baked_size(grid.width(), grid.height())?;
    let mut image = FrameBuffer::try_new(width, height)?;

    let level_height = i32::try_from(grid.height())
        .map_err(|_| Error::resource("grid height does not fit screen coordinates"))?;
    let mut stats = DrawStats::default();
    for (x, y, pillar) in grid.cells() {
        let (sx, sy) = project(level_height, GridPos::new(x as i32, y as i32));
        stats += draw_pillar(&mut image, sx.into(), sy.into(), pillar, tileset)?;
    }

    if stats.clipped > 0 {
        tracing::debug!(clipped = stats.clipped, "tile pixels fell outside the baked image");
    }
    tracing::info!(image_width = width, image_height = height, drawn = stats.drawn, "level baked");

    let level = BakedLevel {
        image,
        level_width: grid.width(),
        level_height: grid.height(),
        view: (0, 0),
        clipped: stats.clipped,
    };
    diagnostics.baked(&level);
    Ok(level)
}
