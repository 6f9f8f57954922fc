//! Walkability queries against tile layers and collision rectangles.

mod collision;

pub use collision::{CollisionIndex, HitBox, Walkability};
