//! Runtime configuration. Every tunable the game uses lives here instead of
//! being compiled in, and each field falls back to its default when missing
//! from the JSON file.

use crate::error::MapError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    /// Map grid dimensions.
    pub map: MapConfig,
    /// Walkability rules.
    pub collision: CollisionConfig,
    /// Follow camera.
    pub camera: CameraConfig,
    /// Player motion and animation.
    pub player: PlayerConfig,
    /// Asset locations, relative to the asset root.
    pub assets: AssetConfig,
}

/// Fixed dimensions every loaded map is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Width in tiles.
    pub width: usize,
    /// Height in tiles.
    pub height: usize,
    /// Edge length of a square tile in pixels.
    pub tile_size: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            width: 40,
            height: 30,
            tile_size: 32,
        }
    }
}

impl MapConfig {
    /// Number of cells in one tile layer.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Map width in world pixels.
    pub fn pixel_width(&self) -> f32 {
        (self.width as u32 * self.tile_size) as f32
    }

    /// Map height in world pixels.
    pub fn pixel_height(&self) -> f32 {
        (self.height as u32 * self.tile_size) as f32
    }
}

/// Walkability rules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Inset applied to each side of the sprite box before testing.
    pub padding: f32,
    /// Tile ids that block movement in any layer.
    pub blocking_gids: Vec<u32>,
    /// Name of the object layer whose rectangles block movement.
    pub collision_layer: String,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        CollisionConfig {
            padding: 3.0,
            blocking_gids: vec![1, 2, 3],
            collision_layer: "Object Layer 1".to_owned(),
        }
    }
}

/// Follow camera.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Uniform scale applied to the world.
    pub zoom: f32,
    /// Visible width in tiles.
    pub viewport_tiles_w: u32,
    /// Visible height in tiles.
    pub viewport_tiles_h: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            zoom: 3.0,
            viewport_tiles_w: 15,
            viewport_tiles_h: 10,
        }
    }
}

/// Player motion and animation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Pixels per second.
    pub speed: f32,
    /// Seconds between animation frames.
    pub frame_period: f32,
    /// Frames per walk cycle.
    pub frame_count: usize,
    /// Spawn column (may be fractional).
    pub spawn_tile_x: f32,
    /// Spawn row (may be fractional).
    pub spawn_tile_y: f32,
    /// Columns in each direction's sprite sheet.
    pub sheet_cols: u32,
    /// Rows in each direction's sprite sheet.
    pub sheet_rows: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            speed: 4.5 * 32.0,
            frame_period: 0.120,
            frame_count: 3,
            spawn_tile_x: 1.0,
            spawn_tile_y: 15.5,
            sheet_cols: 2,
            sheet_rows: 2,
        }
    }
}

/// Where the map, tileset and sprite sheets live.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Tiled map (`.json` or `.tmj`).
    pub map: PathBuf,
    /// Tileset image; GID 1 is its top-left tile.
    pub tileset: PathBuf,
    /// Walk cycle facing up.
    pub player_up: PathBuf,
    /// Walk cycle facing down.
    pub player_down: PathBuf,
    /// Walk cycle facing left.
    pub player_left: PathBuf,
    /// Walk cycle facing right.
    pub player_right: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        AssetConfig {
            map: "assets/maps/map1.tmj".into(),
            tileset: "assets/maps/tileset.png".into(),
            player_up: "assets/player_sprites/up.png".into(),
            player_down: "assets/player_sprites/down.png".into(),
            player_left: "assets/player_sprites/left.png".into(),
            player_right: "assets/player_sprites/right.png".into(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        let cfg: GameConfig =
            serde_json::from_str(json).map_err(|source| MapError::json("<inline>", source))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let p = path.as_ref();
        let txt = std::fs::read_to_string(p).map_err(|source| MapError::Io {
            path: p.to_path_buf(),
            source,
        })?;
        let cfg: GameConfig =
            serde_json::from_str(&txt).map_err(|source| MapError::json(p, source))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the rest of the crate cannot work with.
    pub fn validate(&self) -> Result<(), MapError> {
        if self.map.tile_size == 0 {
            return Err(MapError::Config("map.tile_size must be positive".into()));
        }
        if self.map.width == 0 || self.map.height == 0 {
            return Err(MapError::Config("map dimensions must be positive".into()));
        }
        let half = self.map.tile_size as f32 / 2.0;
        if !(self.collision.padding >= 0.0 && self.collision.padding < half) {
            return Err(MapError::Config(format!(
                "collision.padding must be in [0, {half})"
            )));
        }
        if !(self.camera.zoom > 0.0) {
            return Err(MapError::Config("camera.zoom must be positive".into()));
        }
        if self.player.frame_count == 0 {
            return Err(MapError::Config("player.frame_count must be positive".into()));
        }
        if !(self.player.frame_period > 0.0) {
            return Err(MapError::Config("player.frame_period must be positive".into()));
        }
        if !(self.player.speed >= 0.0) {
            return Err(MapError::Config("player.speed must not be negative".into()));
        }
        Ok(())
    }
}
