//! Isometric projection and camera/sprite placement.
//!
//! Grid cells map to screen space with a 2:1 diamond projection. Movement between
//! two cells is driven by an integer `progress` (0 = at `from`, 100 = at `to`).
//! Values outside 0..=100 extrapolate along the same line; they are not clamped.
//! Interpolated positions are truncated toward zero, never rounded.

use crate::level::BakedLevel;
use crate::types::Sprite;

/// Horizontal screen step per grid unit.
pub const CELL_DX: i32 = 32;
/// Vertical screen step per grid unit.
pub const CELL_DY: i32 = 16;
/// Aligns the projection's vertical origin with the pillar rows when centering the camera.
pub const VIEW_BASELINE: i32 = 160;

/// A grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Size of the window the baked level is shown through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 960)
    }
}

/// Cell -> offset inside the baked image, for a level `level_height` cells tall.
#[inline]
pub fn project(level_height: i32, cell: GridPos) -> (i32, i32) {
    let x = (cell.y * -CELL_DX) + (cell.x * CELL_DX) + (level_height * CELL_DX - CELL_DX);
    let y = (cell.y * CELL_DY) + (cell.x * CELL_DY);
    (x, y)
}

/// Where the baked image's top-left must go so that `cell` sits mid-viewport.
#[inline]
pub fn viewport_offset(level_height: i32, viewport: Viewport, cell: GridPos) -> (i32, i32) {
    let (px, py) = project(level_height, cell);
    (
        -px + viewport.width as i32 / 2,
        -(py + VIEW_BASELINE) + viewport.height as i32 / 2,
    )
}

/// `a + (b - a) * progress / 100`, truncated toward zero.
///
/// The product is formed before dividing so that progress 0 and 100 land
/// exactly on `a` and `b`.
#[inline]
pub fn lerp_truncated(a: i32, b: i32, progress: i32) -> i32 {
    let step = (f64::from(b) - f64::from(a)) * f64::from(progress) / 100.0;
    (f64::from(a) + step) as i32
}

fn lerp_point(from: (i32, i32), to: (i32, i32), progress: i32) -> (i32, i32) {
    (lerp_truncated(from.0, to.0, progress), lerp_truncated(from.1, to.1, progress))
}

/// Move the camera `progress`% of the way from `from` to `to` and store the
/// result as the level's anchor for this frame. Returns the anchor; the caller
/// blits the baked image there.
pub fn position_view(
    level: &mut BakedLevel,
    viewport: Viewport,
    from: GridPos,
    to: GridPos,
    progress: i32,
) -> (i32, i32) {
    let h = level.level_height() as i32;
    let anchor = lerp_point(
        viewport_offset(h, viewport, from),
        viewport_offset(h, viewport, to),
        progress,
    );
    level.set_view(anchor);
    tracing::debug!(?from, ?to, progress, ?anchor, "camera placed");
    anchor
}

/// Screen position for `sprite` moving `progress`% from `from` to `to`, on top of
/// the level as last placed by [`position_view`]. Horizontally centred on the cell.
///
/// `y` is `projY + viewY` with no [`VIEW_BASELINE`] term, so sprites sit 160 px
/// higher than the camera's centre line.
pub fn position_sprite(
    level: &BakedLevel,
    sprite: &Sprite,
    from: GridPos,
    to: GridPos,
    progress: i32,
) -> (i32, i32) {
    let h = level.level_height() as i32;
    let (view_x, view_y) = level.view();
    let half = sprite.width as i32 / 2;
    let place = |cell| {
        let (px, py) = project(h, cell);
        (px + view_x - half, py + view_y)
    };
    lerp_point(place(from), place(to), progress)
}
