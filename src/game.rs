use crate::atlas::{PlayerSprites, TileAtlas};
use crate::camera::{compute_camera, CameraTransform};
use crate::config::GameConfig;
use crate::error::MapError;
use crate::map::MapDocument;
use crate::player::{MoveIntent, Player};
use crate::render::{render_frame, Frame, RenderSurface};
use crate::spatial::CollisionIndex;
use anyhow::Context;
use macroquad::prelude::*;
use std::path::Path;
use tracing::info;

/// Decoded assets for one session, before any GPU upload.
pub struct GameAssets {
    /// Parsed map.
    pub map: MapDocument,
    /// Tileset sliced into tiles.
    pub atlas: TileAtlas<Image>,
    /// Player walk cycles.
    pub sprites: PlayerSprites<Image>,
}

impl GameAssets {
    /// Load map, tileset and sprite sheets from `root` using the paths in `cfg`.
    pub async fn load(root: &Path, cfg: &GameConfig) -> anyhow::Result<Self> {
        let assets = &cfg.assets;
        let map_path = root.join(&assets.map);
        let map = MapDocument::load(&map_path, &cfg.map)
            .with_context(|| format!("Loading map {}", map_path.display()))?;

        let tileset = load_sheet(&root.join(&assets.tileset)).await?;
        let atlas = TileAtlas::from_tileset(&tileset, cfg.map.tile_size);

        let up = load_sheet(&root.join(&assets.player_up)).await?;
        let down = load_sheet(&root.join(&assets.player_down)).await?;
        let left = load_sheet(&root.join(&assets.player_left)).await?;
        let right = load_sheet(&root.join(&assets.player_right)).await?;
        let sprites = PlayerSprites::from_sheets(
            &up,
            &down,
            &left,
            &right,
            cfg.map.tile_size,
            cfg.player.sheet_cols,
            cfg.player.sheet_rows,
        );

        Ok(GameAssets {
            map,
            atlas,
            sprites,
        })
    }
}

async fn load_sheet(path: &Path) -> anyhow::Result<Image> {
    load_image(&path.to_string_lossy())
        .await
        .with_context(|| format!("Loading image {}", path.display()))
}

/// One play session: the map, its collision index and the player.
pub struct Game {
    cfg: GameConfig,
    map: MapDocument,
    collision: CollisionIndex,
    player: Player,
    debug_overlay: bool,
}

impl Game {
    /// Start a session on `map`, spawning the player at the configured tile.
    pub fn new(cfg: GameConfig, map: MapDocument) -> Result<Self, MapError> {
        cfg.validate()?;
        if *map.dims() != cfg.map {
            return Err(MapError::Config(format!(
                "map was loaded as {}x{}@{} but the game is configured for {}x{}@{}",
                map.dims().width,
                map.dims().height,
                map.dims().tile_size,
                cfg.map.width,
                cfg.map.height,
                cfg.map.tile_size
            )));
        }

        let collision = CollisionIndex::build(&map, &cfg.collision);
        let ts = cfg.map.tile_size as f32;
        let spawn = vec2(cfg.player.spawn_tile_x * ts, cfg.player.spawn_tile_y * ts);
        let player = Player::new(spawn, cfg.player);
        info!(x = spawn.x, y = spawn.y, "player spawned");

        Ok(Game {
            cfg,
            map,
            collision,
            player,
            debug_overlay: true,
        })
    }

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32, intent: MoveIntent) {
        self.player.update(dt, intent, &self.collision);
    }

    /// Viewport size in world pixels.
    pub fn viewport(&self) -> Vec2 {
        let ts = self.cfg.map.tile_size as f32;
        vec2(
            self.cfg.camera.viewport_tiles_w as f32 * ts,
            self.cfg.camera.viewport_tiles_h as f32 * ts,
        )
    }

    /// World pixels a screen of `screen` pixels shows at the configured zoom.
    pub fn viewport_for_screen(&self, screen: Vec2) -> Vec2 {
        screen / self.cfg.camera.zoom
    }

    /// Camera centered on the player for the configured viewport.
    pub fn camera(&self) -> CameraTransform {
        self.camera_for(self.viewport())
    }

    /// Camera centered on the player, clamped so `viewport` stays on the map.
    pub fn camera_for(&self, viewport: Vec2) -> CameraTransform {
        let half_sprite = self.cfg.map.tile_size as f32 / 2.0;
        let center = self.player.position() + Vec2::splat(half_sprite);
        let map_px = vec2(self.cfg.map.pixel_width(), self.cfg.map.pixel_height());
        compute_camera(center, viewport, map_px, self.cfg.camera.zoom)
    }

    /// Draw the current state.
    ///
    /// A surface that reports its size overrides the configured viewport, so
    /// a resized window still gets a clamped camera and a full set of tiles.
    pub fn render<S: RenderSurface>(
        &self,
        surface: &mut S,
        atlas: &TileAtlas<S::Image>,
        sprites: &PlayerSprites<S::Image>,
    ) {
        let viewport = match surface.screen_size() {
            Some(screen) if screen.x > 0.0 && screen.y > 0.0 => self.viewport_for_screen(screen),
            _ => self.viewport(),
        };
        render_frame(
            surface,
            &Frame {
                map: &self.map,
                atlas,
                sprites,
                player: &self.player,
                camera: self.camera_for(viewport),
                viewport,
                debug_overlay: self.debug_overlay,
            },
        );
    }

    /// Show or hide the position readout.
    pub fn set_debug_overlay(&mut self, on: bool) {
        self.debug_overlay = on;
    }

    /// Whether the position readout is drawn.
    pub fn is_debug_overlay(&self) -> bool {
        self.debug_overlay
    }

    /// The player.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The loaded map.
    pub fn map(&self) -> &MapDocument {
        &self.map
    }

    /// Walkability index for the loaded map.
    pub fn collision(&self) -> &CollisionIndex {
        &self.collision
    }

    /// Active configuration.
    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }
}
