// Level data: tile references, pillars and the grid they sit on.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Low 12 bits of a raw entry hold `index + 1`. The high 4 bits are flag bits
/// the renderer does not interpret; they are masked off here and nowhere else.
pub const TILE_INDEX_MASK: u16 = 0x0FFF;

/// Decoded value meaning "no tile in this slot".
pub const EMPTY_TILE: i16 = -1;

/// `(raw & 0x0FFF) - 1`. Yields `-1..=4094`.
#[inline]
pub fn decode(raw: u16) -> i16 {
    (raw & TILE_INDEX_MASK) as i16 - 1
}

/// A decoded tile reference: `-1` for an empty slot, otherwise a tileset frame index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRef(i16);

impl TileRef {
    pub const EMPTY: TileRef = TileRef(EMPTY_TILE);

    pub fn from_raw(raw: u16) -> Self {
        Self(decode(raw))
    }

    pub fn value(self) -> i16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == EMPTY_TILE
    }

    /// Frame index, or `None` for the empty sentinel.
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

/// One grid cell's column of (left, right) tile pairs, top row first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pillar {
    raw: Vec<u16>,
}

impl Pillar {
    /// Row count of the 5-row legacy format.
    pub const LEGACY_LEN: usize = 10;

    pub fn new(raw: Vec<u16>) -> Result<Self> {
        if raw.len() % 2 != 0 {
            return Err(Error::format(format!(
                "pillar has odd length {} (entries come in left/right pairs)",
                raw.len()
            )));
        }
        Ok(Self { raw })
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn raw(&self) -> &[u16] {
        &self.raw
    }

    /// Ten entries: the 5-row format that needs vertical compensation.
    pub fn is_legacy(&self) -> bool {
        self.raw.len() == Self::LEGACY_LEN
    }

    /// Decoded (left, right) pairs, top row first.
    pub fn rows(&self) -> impl Iterator<Item = (TileRef, TileRef)> + '_ {
        self.raw
            .chunks_exact(2)
            .map(|pair| (TileRef::from_raw(pair[0]), TileRef::from_raw(pair[1])))
    }

    /// Largest frame index this pillar references, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.raw.iter().filter_map(|&r| TileRef::from_raw(r).index()).max()
    }
}

/// `width x height` pillars, indexed `[x][y]`. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    pillars: Vec<Pillar>, // x-major: x * height + y
}

/// On-disk shape: `{"width":W,"height":H,"pillars":[[raw,...],...]}`, x outer, y inner.
#[derive(Deserialize)]
struct RawGrid {
    width: usize,
    height: usize,
    pillars: Vec<Vec<u16>>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = Error;

    fn try_from(raw: RawGrid) -> Result<Self> {
        let pillars = raw
            .pillars
            .into_iter()
            .map(Pillar::new)
            .collect::<Result<Vec<_>>>()?;
        Grid::new(raw.width, raw.height, pillars)
    }
}

impl Grid {
    /// `pillars` are listed x-major (`x` outer, `y` inner).
    pub fn new(width: usize, height: usize, pillars: Vec<Pillar>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::format(format!("grid must be at least 1x1, got {width}x{height}")));
        }
        if pillars.len() != width * height {
            return Err(Error::format(format!(
                "grid {width}x{height} needs {} pillars, got {}",
                width * height,
                pillars.len()
            )));
        }
        Ok(Self { width, height, pillars })
    }

    /// Build a grid from a per-cell function.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> Pillar,
    ) -> Result<Self> {
        let mut pillars = Vec::with_capacity(width * height);
        for x in 0..width {
            for y in 0..height {
                pillars.push(f(x, y));
            }
        }
        Self::new(width, height, pillars)
    }

    /// Malformed JSON is a `Level` error; a well-formed file describing an
    /// invalid grid is a `Format` error.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawGrid = serde_json::from_str(text)?;
        Grid::try_from(raw)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Panics if `(x, y)` lies outside the grid.
    pub fn pillar(&self, x: usize, y: usize) -> &Pillar {
        assert!(x < self.width && y < self.height, "cell ({x},{y}) outside grid");
        &self.pillars[x * self.height + y]
    }

    /// Every cell with its coordinates, x-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &Pillar)> + '_ {
        self.pillars
            .iter()
            .enumerate()
            .map(move |(i, p)| (i / self.height, i % self.height, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_boundaries() {
        assert_eq!(decode(0x0000), -1);
        assert_eq!(decode(0x0FFF), 4094);
        assert_eq!(decode(0xF000), -1);
        assert_eq!(decode(0xF001), 0);
        assert_eq!(decode(0x8006), 5);
    }

    #[test]
    fn decode_matches_formula_for_every_raw_value() {
        for raw in 0..=u16::MAX {
            assert_eq!(decode(raw) as i32, (raw & 0x0FFF) as i32 - 1);
        }
    }

    #[test]
    fn tile_ref_empty_is_not_an_index() {
        assert_eq!(TileRef::from_raw(0).index(), None);
        assert!(TileRef::from_raw(0xF000).is_empty());
        assert_eq!(TileRef::from_raw(0xF000), TileRef::EMPTY);
        assert_eq!(TileRef::EMPTY.value(), EMPTY_TILE);
        assert_eq!(TileRef::from_raw(1).index(), Some(0));
    }

    #[test]
    fn odd_pillar_is_a_format_error() {
        assert!(matches!(Pillar::new(vec![1, 2, 3]), Err(Error::Format(_))));
    }

    #[test]
    fn pillar_rows_pair_left_and_right() {
        let p = Pillar::new(vec![1, 0, 0, 3]).unwrap();
        let rows: Vec<_> = p.rows().map(|(l, r)| (l.value(), r.value())).collect();
        assert_eq!(rows, vec![(0, -1), (-1, 2)]);
        assert_eq!(p.max_index(), Some(2));
        assert!(!p.is_legacy());
    }

    #[test]
    fn grid_is_indexed_x_then_y() {
        let g = Grid::from_fn(2, 3, |x, y| Pillar::new(vec![(x * 10 + y) as u16, 0]).unwrap())
            .unwrap();
        assert_eq!(g.pillar(1, 2).raw(), &[12, 0]);
        let cells: Vec<_> = g.cells().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(cells[4], (1, 1));
        assert_eq!(cells.len(), 6);
    }

    #[test]
    fn grid_rejects_wrong_pillar_count() {
        assert!(matches!(Grid::new(2, 2, vec![Pillar::default()]), Err(Error::Format(_))));
        assert!(matches!(Grid::new(0, 1, vec![]), Err(Error::Format(_))));
    }

    #[test]
    fn grid_from_json() {
        let g = Grid::from_json(r#"{"width":1,"height":2,"pillars":[[1,0],[0,2]]}"#).unwrap();
        assert_eq!(g.width(), 1);
        assert_eq!(g.pillar(0, 1).raw(), &[0, 2]);
    }

    #[test]
    fn grid_json_with_odd_pillar_fails() {
        let err = Grid::from_json(r#"{"width":1,"height":1,"pillars":[[1,0,4]]}"#).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
        assert!(err.to_string().contains("odd length"));
    }

    #[test]
    fn grid_json_with_wrong_pillar_count_is_format_error() {
        let err = Grid::from_json(r#"{"width":2,"height":2,"pillars":[[1,0]]}"#).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn broken_json_is_level_error() {
        let err = Grid::from_json(r#"{"width":1,"height":"#).unwrap_err();
        assert!(matches!(err, Error::Level(_)));
    }
}
