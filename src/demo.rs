// Built-in art so the viewer runs without any asset files.
// Visual: a green diamond floor ringed by grey walls, and a small orange walker.

use isobake::{Frame, Grid, Pillar, Pixel, Result, Tileset};

const TILE: usize = 32;

// Frame indices in `tileset()`; raw pillar entries store index + 1.
const FLOOR_L: u16 = 0;
const FLOOR_R: u16 = 1;
const WALL_L: u16 = 2;
const WALL_R: u16 = 3;

fn raw(index: u16) -> u16 {
    index + 1
}

/// Left or right half of a 64x32 floor diamond.
fn floor_half(right: bool, shade: u8) -> Frame {
    Frame::from_fn(TILE, TILE, |x, y| {
        let from_centre = if right { x as i32 } else { TILE as i32 - 1 - x as i32 };
        let dy = (2 * y as i32 - (TILE as i32 - 1)).abs();
        if from_centre + dy <= TILE as i32 {
            Pixel::rgb(40, shade, 60)
        } else {
            Pixel::HIDDEN
        }
    })
}

/// Solid brick face; mortar every 8 rows.
fn wall_face(shade: u8) -> Frame {
    Frame::from_fn(TILE, TILE, |x, y| {
        if y % 8 == 0 || (x + (y / 8) * 8) % 16 == 0 {
            Pixel::rgb(shade / 2, shade / 2, shade / 2)
        } else {
            Pixel::rgb(shade, shade, shade)
        }
    })
}

pub fn tileset() -> Tileset {
    Tileset::new(
        vec![floor_half(false, 150), floor_half(true, 120), wall_face(170), wall_face(130)],
        1,
    )
}

/// Walled room, `size x size` cells, with the floor in each pillar's bottom row.
pub fn grid(size: usize) -> Result<Grid> {
    Grid::from_fn(size, size, |x, y| {
        let edge = x == 0 || y == 0 || x + 1 == size || y + 1 == size;
        let mut entries = vec![0u16; 8];
        if edge {
            for row in 1..3 {
                entries[row * 2] = raw(WALL_L);
                entries[row * 2 + 1] = raw(WALL_R);
            }
        }
        entries[6] = raw(FLOOR_L);
        entries[7] = raw(FLOOR_R);
        Pillar::new(entries).unwrap_or_default()
    })
}

/// Two-frame walker: a round body that bobs by one pixel.
pub fn actor() -> Tileset {
    let frame = |bob: i32| {
        Frame::from_fn(TILE, 48, move |x, y| {
            let dx = x as i32 - 16;
            let dy = y as i32 - 30 - bob;
            if dx * dx + dy * dy * 2 <= 140 {
                Pixel::rgb(240, 140, 40)
            } else if dx * dx + (y as i32 - 12 - bob).pow(2) <= 36 {
                Pixel::rgb(250, 220, 180)
            } else {
                Pixel::HIDDEN
            }
        })
    };
    Tileset::new(vec![frame(0), frame(1)], 2)
}
