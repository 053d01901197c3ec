//! Bramble: a tile-based 2D action platformer
//!
//! Host binary. Loads `config.ron` and the `content/` directory from the
//! working directory, then runs the game into a fixed-size render target
//! that is letterboxed into the window.
//!
//! Keys: F1 toggles collider outlines, F2 reloads the room, Escape quits.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod host;

use std::error::Error;
use std::path::Path;
use std::rc::Rc;

use bramble::{Content, Game, GameConfig};
use host::MacroquadBatch;
use macroquad::prelude::*;

/// Longest frame the simulation will step at once (e.g. after a stall)
const MAX_FRAME_TIME: f32 = 1.0 / 20.0;
const CLEAR_COLOR: Color = Color::new(0.267, 0.533, 0.667, 1.0);

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Bramble v{}", VERSION),
        window_width: 960,
        window_height: 540,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = GameConfig::load_or_default(Path::new("config.ron"))?;
    let content = Rc::new(Content::load(Path::new("content"), config.tile_size)?);
    let mut batch = MacroquadBatch::new(&content);

    let (width, height) = (config.width as f32, config.height as f32);
    let mut game = Game::new(content, config)?;

    let target = render_target(width as u32, height as u32);
    target.texture.set_filter(FilterMode::Nearest);
    let mut target_camera = Camera2D::from_display_rect(Rect::new(0.0, 0.0, width, height));
    target_camera.render_target = Some(target.clone());

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::F1) {
            game.toggle_colliders();
        }
        if is_key_pressed(KeyCode::F2) {
            game.reload()?;
        }

        let raw = host::keyboard::poll();
        game.update(&raw, get_frame_time().min(MAX_FRAME_TIME))?;

        // Gameplay into the fixed-size target
        set_camera(&target_camera);
        clear_background(CLEAR_COLOR);
        game.render(&mut batch);

        // Target to the window, scaled to fit
        set_default_camera();
        clear_background(BLACK);
        let scale = (screen_width() / width).min(screen_height() / height);
        let size = vec2(width * scale, height * scale);
        draw_texture_ex(
            &target.texture,
            (screen_width() - size.x) / 2.0,
            (screen_height() - size.y) / 2.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(size),
                flip_y: true,
                ..Default::default()
            },
        );

        next_frame().await;
    }

    log::info!("Exiting");
    Ok(())
}
