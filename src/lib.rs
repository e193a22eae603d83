#![forbid(unsafe_code)]

pub mod draw;
pub mod error;
pub mod level;
pub mod pillar;
pub mod tile;
pub mod tileset;
pub mod types;
pub mod view;

pub use draw::{DrawStats, Screen, blit, blit_sprite, draw_frame, draw_pixel_direct};
pub use error::{Error, Result};
pub use level::{BakeDiagnostics, BakedLevel, BmpDump, bake, bake_with};
pub use pillar::draw_pillar;
pub use tile::{Grid, Pillar, TileRef, decode};
pub use tileset::{SpriteGroup, Tileset};
pub use types::{Frame, FrameBuffer, Pixel, PixelTarget, Sprite};
pub use view::{GridPos, Viewport, position_sprite, position_view, project};
