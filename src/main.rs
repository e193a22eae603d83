// What you SEE:
// • The whole level, pre-baked into one image, centred on the walker.
// • Arrow keys walk one cell; the camera glides along with the walker.
// • Space pins the camera to where it is (the walker keeps moving). ESC quits.

mod demo;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use isobake::{
    BakedLevel, BmpDump, Grid, GridPos, Result, Screen, SpriteGroup, Tileset, Viewport, bake_with,
    blit, blit_sprite, position_sprite, position_view,
};

#[derive(Parser, Debug)]
#[command(name = "isobake", about = "Bake an isometric tile level and walk around it")]
struct Args {
    /// Level JSON: {"width":W,"height":H,"pillars":[[raw,...],...]}, x-major
    #[arg(long)]
    level: Option<PathBuf>,

    /// Tileset sprite sheet (PNG); alpha 0 is see-through
    #[arg(long)]
    tileset: Option<PathBuf>,

    /// Walker sprite sheet (PNG), one animation frame per cell
    #[arg(long)]
    sprite: Option<PathBuf>,

    /// Frame size used to slice the sheets
    #[arg(long, default_value_t = 32)]
    frame_width: usize,
    #[arg(long, default_value_t = 32)]
    frame_height: usize,

    /// Size of the built-in room when no level is given
    #[arg(long, default_value_t = 12)]
    room: usize,

    #[arg(long, default_value_t = 1280)]
    width: usize,
    #[arg(long, default_value_t = 960)]
    height: usize,

    /// Progress points (out of 100) covered per frame while walking
    #[arg(long, default_value_t = 5)]
    speed: i32,

    /// Write the baked level image here as a BMP
    #[arg(long)]
    dump_bmp: Option<PathBuf>,

    /// Bake (and dump) without opening a window
    #[arg(long)]
    headless: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .init();

    /* --- Level data + tiles --- */
    let grid = match &args.level {
        Some(path) => Grid::load(path)?,
        None => demo::grid(args.room)?,
    };
    let tileset = match &args.tileset {
        Some(path) => Tileset::load_sheet(path, args.frame_width, args.frame_height)?,
        None => demo::tileset(),
    };
    let walker = match &args.sprite {
        Some(path) => SpriteGroup::load(path, args.frame_width, args.frame_height)?,
        None => SpriteGroup::from_tileset(&demo::actor()),
    };

    /* --- Bake once ---
       Visual: nothing yet; the whole level now lives in one big image. */
    let mut level = match &args.dump_bmp {
        Some(path) => bake_with(&grid, &tileset, &mut BmpDump::new(path))?,
        None => bake_with(&grid, &tileset, &mut |_: &BakedLevel| {})?,
    };
    if args.headless {
        return Ok(());
    }

    let viewport = Viewport::new(args.width, args.height);
    let mut screen = Screen::new("isobake", viewport)?;
    run(&mut screen, &mut level, &walker, viewport, args.speed.max(1))
}

fn run(
    screen: &mut Screen,
    level: &mut BakedLevel,
    walker: &SpriteGroup,
    viewport: Viewport,
    speed: i32,
) -> Result<()> {
    let start = GridPos::new(level.level_width() as i32 / 2, level.level_height() as i32 / 2);
    let (mut from, mut to, mut progress) = (start, start, 100);
    let (mut cam_from, mut cam_to, mut cam_progress) = (start, start, 100);
    let mut camera_pinned = false;

    let mut tick: usize = 0;
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while screen.is_open() && !screen.esc_pressed() {
        if screen.space_pressed_once() {
            camera_pinned = !camera_pinned;
        }

        /* 1) Walk: a new step starts only once the previous one has arrived. */
        if progress >= 100 {
            from = to;
            if let Some((dx, dy)) = screen.step_pressed() {
                let next = from.offset(dx, dy);
                let inside = (0..level.level_width() as i32).contains(&next.x)
                    && (0..level.level_height() as i32).contains(&next.y);
                if inside {
                    to = next;
                    progress = 0;
                }
            }
        } else {
            progress = (progress + speed).min(100);
        }
        if !camera_pinned {
            (cam_from, cam_to, cam_progress) = (from, to, progress);
        }

        /* 2) Camera first: the sprite is placed relative to it. */
        let (vx, vy) = position_view(level, viewport, cam_from, cam_to, cam_progress);

        screen.clear();
        blit(level.image(), screen.surface_mut(), vx.into(), vy.into());

        /* 3) Walker on top. */
        if let Some(sprite) = walker.animated(tick / 8) {
            let (sx, sy) = position_sprite(level, sprite, from, to, progress);
            blit_sprite(sprite, screen.surface_mut(), sx.into(), sy.into());
        }

        screen.present()?;
        tick = tick.wrapping_add(1);

        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let fps = frames_this_second as f32 / now.duration_since(last_fps_time).as_secs_f32();
            tracing::debug!(fps, "frame rate");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
