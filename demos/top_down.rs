use anyhow::Context;
use macroquad::prelude::*;
use std::path::Path;
use topdown_tiles::render::MacroquadSurface;
use topdown_tiles::{Game, GameAssets, GameConfig, KeyBindings};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// Window sized so the whole configured viewport fits at the configured zoom.
fn window_conf() -> Conf {
    let cfg = GameConfig::default();
    let ts = cfg.map.tile_size as f32 * cfg.camera.zoom;
    Conf {
        window_title: "Top-down walker".into(),
        window_width: (cfg.camera.viewport_tiles_w as f32 * ts) as i32,
        window_height: (cfg.camera.viewport_tiles_h as f32 * ts) as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run().await {
        error!(error = %format!("{err:#}"), "demo failed");
    }
}

async fn run() -> anyhow::Result<()> {
    // Optional first argument: path to a JSON config.
    let cfg = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(&path).with_context(|| format!("Loading config {path}"))?,
        None => GameConfig::default(),
    };

    let assets = GameAssets::load(Path::new("."), &cfg).await?;
    let mut surface = MacroquadSurface::new(Color::from_rgba(0x0f, 0x12, 0x20, 0xff));
    let atlas = surface.upload_atlas(&assets.atlas);
    let sprites = surface.upload_sprites(&assets.sprites);
    let bindings = KeyBindings::default();

    let mut game = Game::new(cfg, assets.map)?;
    info!(tiles = atlas.len(), "starting");

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::F3) {
            let on = !game.is_debug_overlay();
            game.set_debug_overlay(on);
        }

        game.tick(get_frame_time(), bindings.poll());
        game.render(&mut surface, &atlas, &sprites);

        next_frame().await;
    }
    Ok(())
}
