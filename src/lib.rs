#![warn(missing_docs)]

//! Top-down tile walker for Macroquad: Tiled JSON maps, tile and object
//! collision, a clamped follow camera and a four-way walking player.

mod atlas;
mod camera;
mod config;
mod error;
mod game;
mod input;
mod loader {
    pub mod json_loader;
}
mod map;
mod player;
pub mod render;
pub mod spatial;

pub use atlas::{slice_frames, PlayerSprites, TileAtlas};
pub use camera::{clamp_axis, compute_camera, CameraTransform};
pub use config::{AssetConfig, CameraConfig, CollisionConfig, GameConfig, MapConfig, PlayerConfig};
pub use error::MapError;
pub use game::{Game, GameAssets};
pub use input::KeyBindings;
pub use map::{MapDocument, MapObject, ObjectLayer, TileLayer, FLIP_D, FLIP_H, FLIP_V, GID_MASK};
pub use player::{Direction, MoveIntent, Player};
pub use spatial::{CollisionIndex, HitBox, Walkability};
