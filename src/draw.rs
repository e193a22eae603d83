// Window + software drawing utilities.
// Provided here:
// 1) A window (the render context) with its own back buffer.
// 2) Per-pixel writes and frame compositing that clip silently at the edges.
// 3) Rectangle blits for the baked level and for sprites.

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::error::{Error, Result};
use crate::types::{Frame, FrameBuffer, Pixel, PixelTarget, Sprite};
use crate::view::Viewport;

/// Background colour shown where the level image does not reach.
pub const CLEAR_COLOR: u32 = 0x00_00_00_FF;

/// Counts from one drawing call. Pixels that fall outside the destination are
/// dropped and counted in `clipped`; this is never an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub drawn: usize,
    pub clipped: usize,
}

impl std::ops::AddAssign for DrawStats {
    fn add_assign(&mut self, rhs: Self) {
        self.drawn += rhs.drawn;
        self.clipped += rhs.clipped;
    }
}

pub struct Screen {
    window: Window,    // the on-screen window you see
    back: FrameBuffer, // what gets shown on the next `present`
}

impl Screen {
    /// Create a window sized to the viewport.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, viewport: Viewport) -> Result<Self> {
        let mut window = Window::new(
            title,
            viewport.width,
            viewport.height,
            WindowOptions::default(),
        )
        .map_err(|e| Error::window(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window, back: FrameBuffer::new(viewport.width, viewport.height) })
    }

    pub fn surface_mut(&mut self) -> &mut FrameBuffer {
        &mut self.back
    }

    /// Visual: the whole window turns blue until something is drawn on top.
    pub fn clear(&mut self) {
        self.back.fill(CLEAR_COLOR);
    }

    /// Push the back buffer to the window.
    pub fn present(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.back.pixels, self.back.width, self.back.height)
            .map_err(|e| Error::window(e.to_string()))
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Grid step requested by the arrow keys, if any.
    pub fn step_pressed(&self) -> Option<(i32, i32)> {
        [(Key::Up, (0, -1)), (Key::Down, (0, 1)), (Key::Left, (-1, 0)), (Key::Right, (1, 0))]
            .into_iter()
            .find(|(key, _)| self.window.is_key_down(*key))
            .map(|(_, step)| step)
    }

    pub fn space_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::Space, KeyRepeat::No)
    }
}

/* ---------- Software drawing ---------- */

/// Put a pixel on the target if (x,y) is inside bounds. Returns false when clipped.
#[inline]
pub fn draw_pixel_direct<T: PixelTarget + ?Sized>(
    target: &mut T,
    x: i64,
    y: i64,
    pixel: Pixel,
) -> bool {
    if x < 0 || y < 0 {
        return false;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= target.width() || y >= target.height() {
        return false;
    }
    target.write(x, y, pixel);
    true
}

/// Composite the visible pixels of `frame` with its top-left at (origin_x, origin_y).
/// Invisible pixels leave the destination untouched, which is how tiles overlap.
pub fn draw_frame<T: PixelTarget + ?Sized>(
    dest: &mut T,
    origin_x: i64,
    origin_y: i64,
    frame: &Frame,
) -> DrawStats {
    let mut stats = DrawStats::default();
    for py in 0..frame.height() {
        for px in 0..frame.width() {
            let pixel = frame.pixel(px, py);
            if !pixel.visible {
                continue;
            }
            if draw_pixel_direct(dest, origin_x + px as i64, origin_y + py as i64, pixel) {
                stats.drawn += 1;
            } else {
                stats.clipped += 1;
            }
        }
    }
    stats
}

/// Visible part of a `w x h` rectangle placed at (x,y) inside a `dw x dh` target:
/// (first source column, first source row, dest x, dest y, columns, rows).
type ClipRect = (usize, usize, usize, usize, usize, usize);

fn clip_rect(w: usize, h: usize, x: i64, y: i64, dw: usize, dh: usize) -> Option<ClipRect> {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w as i64).min(dw as i64);
    let y1 = (y + h as i64).min(dh as i64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((
        (x0 - x) as usize,
        (y0 - y) as usize,
        x0 as usize,
        y0 as usize,
        (x1 - x0) as usize,
        (y1 - y0) as usize,
    ))
}

/// Copy all of `src` onto `dst` with its top-left at (x,y). Opaque copy.
/// Visual: the baked level slides under the window as (x,y) changes.
pub fn blit(src: &FrameBuffer, dst: &mut FrameBuffer, x: i64, y: i64) -> DrawStats {
    let total = src.width * src.height;
    let clip = clip_rect(src.width, src.height, x, y, dst.width, dst.height);
    let Some((sx, sy, dx, dy, cols, rows)) = clip else {
        return DrawStats { drawn: 0, clipped: total };
    };
    for row in 0..rows {
        let s = (sy + row) * src.width + sx;
        let d = (dy + row) * dst.width + dx;
        dst.pixels[d..d + cols].copy_from_slice(&src.pixels[s..s + cols]);
    }
    DrawStats { drawn: cols * rows, clipped: total - cols * rows }
}

/// Draw `sprite` onto `dst` at (x,y), skipping its see-through pixels.
pub fn blit_sprite(sprite: &Sprite, dst: &mut FrameBuffer, x: i64, y: i64) -> DrawStats {
    let mut stats = DrawStats::default();
    let clip = clip_rect(sprite.width, sprite.height, x, y, dst.width, dst.height);
    let Some((sx, sy, dx, dy, cols, rows)) = clip else {
        return stats;
    };
    for row in 0..rows {
        for col in 0..cols {
            if !sprite.is_opaque_at(sx + col, sy + row) {
                continue;
            }
            let argb = sprite.pixels[(sy + row) * sprite.width + sx + col];
            dst.pixels[(dy + row) * dst.width + dx + col] = argb & 0x00FF_FFFF;
            stats.drawn += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: usize, h: usize) -> Frame {
        // visible where x + y is even
        Frame::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 { Pixel::rgb(255, 0, 0) } else { Pixel::HIDDEN }
        })
    }

    #[test]
    fn invisible_pixels_keep_destination() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.fill(0x0000_00AA);
        let stats = draw_frame(&mut fb, 1, 1, &checker(2, 2));
        assert_eq!(stats, DrawStats { drawn: 2, clipped: 0 });
        assert_eq!(fb.get(1, 1), Some(0x00FF_0000));
        assert_eq!(fb.get(2, 1), Some(0x0000_00AA));
        assert_eq!(fb.get(2, 2), Some(0x00FF_0000));
        assert_eq!(fb.get(0, 0), Some(0x0000_00AA));
    }

    #[test]
    fn frame_off_the_edge_is_clipped_and_counted() {
        let mut fb = FrameBuffer::new(2, 2);
        let solid = Frame::from_fn(2, 2, |_, _| Pixel::rgb(1, 1, 1));
        let stats = draw_frame(&mut fb, -1, 1, &solid);
        assert_eq!(stats, DrawStats { drawn: 1, clipped: 3 });
        assert_eq!(fb.get(0, 1), Some(0x0001_0101));
    }

    #[test]
    fn direct_pixel_write_rejects_negative_coords() {
        let mut fb = FrameBuffer::new(1, 1);
        assert!(!draw_pixel_direct(&mut fb, -1, 0, Pixel::rgb(1, 1, 1)));
        assert!(draw_pixel_direct(&mut fb, 0, 0, Pixel::rgb(1, 1, 1)));
    }

    #[test]
    fn blit_copies_the_overlap_only() {
        let mut src = FrameBuffer::new(3, 2);
        src.pixels = vec![1, 2, 3, 4, 5, 6];
        let mut dst = FrameBuffer::new(3, 3);
        let stats = blit(&src, &mut dst, 1, 2);
        assert_eq!(stats, DrawStats { drawn: 2, clipped: 4 });
        assert_eq!(dst.pixels, vec![0, 0, 0, 0, 0, 0, 0, 1, 2]);
    }

    #[test]
    fn blit_entirely_outside_draws_nothing() {
        let src = FrameBuffer::new(2, 2);
        let mut dst = FrameBuffer::new(2, 2);
        dst.fill(7);
        assert_eq!(blit(&src, &mut dst, 5, -9).drawn, 0);
        assert!(dst.pixels.iter().all(|&p| p == 7));
    }

    #[test]
    fn sprite_blit_skips_see_through_pixels() {
        let mut sprite = Sprite::transparent(2, 1);
        sprite.write(0, 0, Pixel::rgb(0, 0, 9));
        let mut dst = FrameBuffer::new(2, 1);
        dst.fill(5);
        let stats = blit_sprite(&sprite, &mut dst, 0, 0);
        assert_eq!(stats.drawn, 1);
        assert_eq!(dst.pixels, vec![9, 5]);
    }
}
