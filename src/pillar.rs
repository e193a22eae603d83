// Draws one grid cell's pillar: rows of (left, right) tiles stacked downward.

use crate::draw::{DrawStats, draw_frame};
use crate::error::Result;
use crate::tile::{Pillar, TileRef};
use crate::tileset::Tileset;
use crate::types::PixelTarget;

/// Height of one pillar row, and horizontal offset of the right tile.
pub const ROW_SIZE: i64 = 32;

/// Downward shift for 5-row pillars so they line up with 4-row ones.
pub const LEGACY_ROW_OFFSET: i64 = 3 * ROW_SIZE;

/// Draw `pillar` with its top-left at (x, y). Empty slots draw nothing.
pub fn draw_pillar<T: PixelTarget + ?Sized>(
    dest: &mut T,
    x: i64,
    mut y: i64,
    pillar: &Pillar,
    tileset: &Tileset,
) -> Result<DrawStats> {
    if pillar.is_legacy() {
        y += LEGACY_ROW_OFFSET;
    }

    let mut stats = DrawStats::default();
    for (left, right) in pillar.rows() {
        stats += draw_slot(dest, x, y, left, tileset)?;
        stats += draw_slot(dest, x + ROW_SIZE, y, right, tileset)?;
        y += ROW_SIZE;
    }
    Ok(stats)
}

fn draw_slot<T: PixelTarget + ?Sized>(
    dest: &mut T,
    x: i64,
    y: i64,
    tile: TileRef,
    tileset: &Tileset,
) -> Result<DrawStats> {
    match tile.index() {
        Some(index) => Ok(draw_frame(dest, x, y, tileset.frame(index)?)),
        None => Ok(DrawStats::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{Frame, FrameBuffer, Pixel};

    fn solid(shade: u8) -> Frame {
        Frame::from_fn(32, 32, |_, _| Pixel::rgb(shade, shade, shade))
    }

    fn tileset() -> Tileset {
        Tileset::new(vec![solid(10), solid(20)], 1)
    }

    fn shade_at(fb: &FrameBuffer, x: usize, y: usize) -> u32 {
        fb.get(x, y).unwrap() & 0xFF
    }

    #[test]
    fn rows_step_down_and_right_tile_sits_32_across() {
        let mut fb = FrameBuffer::new(64, 128);
        // row 0: left=frame0 right=frame1; rows 1..3 empty
        let p = Pillar::new(vec![1, 2, 0, 0, 0, 0, 0, 0]).unwrap();
        let stats = draw_pillar(&mut fb, 0, 0, &p, &tileset()).unwrap();
        assert_eq!(stats.drawn, 2 * 32 * 32);
        assert_eq!(shade_at(&fb, 0, 0), 10);
        assert_eq!(shade_at(&fb, 32, 31), 20);
        assert_eq!(shade_at(&fb, 0, 32), 0);
    }

    #[test]
    fn empty_slot_leaves_destination_untouched() {
        let mut fb = FrameBuffer::new(64, 64);
        fb.fill(0x77);
        let p = Pillar::new(vec![0, 0x0002, 0xF000, 0]).unwrap();
        draw_pillar(&mut fb, 0, 0, &p, &tileset()).unwrap();
        assert_eq!(fb.get(5, 5), Some(0x77));
        assert_eq!(shade_at(&fb, 40, 5), 20);
        assert!(fb.pixels[64 * 32..].iter().all(|&c| c == 0x77));
    }

    #[test]
    fn legacy_pillar_is_shifted_down_96() {
        let mut short = FrameBuffer::new(64, 320);
        let mut legacy = FrameBuffer::new(64, 320);
        let rows = [1u16, 0, 0, 2, 1, 1, 0, 0];
        let mut ten = rows.to_vec();
        ten.extend([0, 0]);
        draw_pillar(&mut short, 0, 0, &Pillar::new(rows.to_vec()).unwrap(), &tileset()).unwrap();
        draw_pillar(&mut legacy, 0, 0, &Pillar::new(ten).unwrap(), &tileset()).unwrap();

        for y in 0..128 {
            for x in 0..64 {
                assert_eq!(short.get(x, y), legacy.get(x, y + 96), "at ({x},{y})");
            }
        }
        assert!(legacy.pixels[..64 * 96].iter().all(|&c| c == 0));
    }

    #[test]
    fn unknown_tile_is_a_format_error() {
        let mut fb = FrameBuffer::new(64, 64);
        let p = Pillar::new(vec![3, 0]).unwrap();
        assert!(matches!(draw_pillar(&mut fb, 0, 0, &p, &tileset()), Err(Error::Format(_))));
    }
}
