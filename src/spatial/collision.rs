use crate::config::CollisionConfig;
use crate::map::MapDocument;
use macroquad::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Anything that can say whether the player may stand at a position.
pub trait Walkability {
    /// `pos` is the candidate sprite top-left in world pixels.
    fn is_walkable(&self, pos: Vec2) -> bool;
}

/// Sprite box shrunk by `padding` on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitBox {
    /// Inset from the sprite edge.
    pub padding: f32,
    /// Inset box width.
    pub width: f32,
    /// Inset box height.
    pub height: f32,
}

impl HitBox {
    /// Hit-box for a square sprite of `sprite_size`.
    pub fn inset(sprite_size: f32, padding: f32) -> Self {
        HitBox {
            padding,
            width: sprite_size - padding * 2.0,
            height: sprite_size - padding * 2.0,
        }
    }

    /// World-space inset box for a sprite whose top-left is `pos`.
    #[inline]
    pub fn at(&self, pos: Vec2) -> Rect {
        Rect::new(pos.x + self.padding, pos.y + self.padding, self.width, self.height)
    }
}

/// Precomputed walkability for one map.
///
/// Tile layers are folded into a single solid-cell bitmap and the collision
/// object layer is resolved once, so a query is one bitmap lookup plus a scan
/// of that layer's rectangles.
#[derive(Debug, Clone)]
pub struct CollisionIndex {
    cols: usize,
    rows: usize,
    tile_size: f32,
    map_px: Vec2,
    solid: Vec<bool>,
    hitbox: HitBox,
    blockers: Vec<Rect>,
}

impl CollisionIndex {
    /// Fold `map` into an index using the configured blocking ids and layer.
    pub fn build(map: &MapDocument, cfg: &CollisionConfig) -> Self {
        let dims = map.dims();
        let blocking: HashSet<u32> = cfg.blocking_gids.iter().copied().collect();

        let mut solid = vec![false; dims.cell_count()];
        for layer in map.tile_layers() {
            for (row, col, gid) in layer.cells() {
                if col >= dims.width || !blocking.contains(&gid) {
                    continue;
                }
                if let Some(cell) = solid.get_mut(row * dims.width + col) {
                    *cell = true;
                }
            }
        }

        let blockers: Vec<Rect> = match map.object_layer(&cfg.collision_layer) {
            Some(layer) => layer.objects.iter().map(|o| o.rect).collect(),
            None => {
                debug!(layer = %cfg.collision_layer, "no collision object layer; object check disabled");
                Vec::new()
            }
        };

        debug!(
            solid_cells = solid.iter().filter(|s| **s).count(),
            blockers = blockers.len(),
            "collision index built"
        );

        CollisionIndex {
            cols: dims.width,
            rows: dims.height,
            tile_size: dims.tile_size as f32,
            map_px: vec2(dims.pixel_width(), dims.pixel_height()),
            solid,
            hitbox: HitBox::inset(dims.tile_size as f32, cfg.padding),
            blockers,
        }
    }

    /// The inset box used for every query.
    pub fn hitbox(&self) -> HitBox {
        self.hitbox
    }

    /// True if any tile layer holds a blocking id at `(col, row)`.
    pub fn is_solid_tile(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows && self.solid[row * self.cols + col]
    }

    /// Collision rectangles in effect.
    pub fn blockers(&self) -> &[Rect] {
        &self.blockers
    }

    /// The inset box stays inside the map. Touching either edge is allowed.
    fn in_bounds(&self, pos: Vec2) -> bool {
        let b = self.hitbox.at(pos);
        b.x >= 0.0 && b.y >= 0.0 && b.x + b.w <= self.map_px.x && b.y + b.h <= self.map_px.y
    }

    // The sprite corner may sit up to `padding` outside the map; it then
    // samples the edge tile.
    fn hits_solid_tile(&self, pos: Vec2) -> bool {
        let col = (pos.x.max(0.0) / self.tile_size).floor() as usize;
        let row = (pos.y.max(0.0) / self.tile_size).floor() as usize;
        self.is_solid_tile(col, row)
    }

    /// Open intervals on every edge: boxes that only touch do not overlap.
    fn hits_blocker(&self, pos: Vec2) -> bool {
        let b = self.hitbox.at(pos);
        self.blockers.iter().any(|o| {
            b.x < o.x + o.w && b.x + b.w > o.x && b.y < o.y + o.h && b.y + b.h > o.y
        })
    }
}

impl Walkability for CollisionIndex {
    fn is_walkable(&self, pos: Vec2) -> bool {
        self.in_bounds(pos) && !self.hits_solid_tile(pos) && !self.hits_blocker(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::map::{MapObject, ObjectLayer, TileLayer};

    fn dims() -> MapConfig {
        MapConfig {
            width: 4,
            height: 3,
            tile_size: 32,
        }
    }

    fn layer(cells: Vec<u32>) -> TileLayer {
        TileLayer::from_cells("l", 4, 3, cells).unwrap()
    }

    fn rect_layer(name: &str, rects: &[Rect]) -> ObjectLayer {
        ObjectLayer {
            name: name.into(),
            objects: rects
                .iter()
                .enumerate()
                .map(|(i, r)| MapObject {
                    id: i as u32 + 1,
                    name: String::new(),
                    class_name: String::new(),
                    rect: *r,
                })
                .collect(),
        }
    }

    fn open_map() -> MapDocument {
        MapDocument::new(dims(), vec![layer(vec![0; 12])], vec![])
    }

    #[test]
    fn inset_hitbox_is_26_square() {
        let idx = CollisionIndex::build(&open_map(), &CollisionConfig::default());
        assert_eq!(idx.hitbox().width, 26.0);
        assert_eq!(idx.hitbox().at(vec2(10.0, 20.0)), Rect::new(13.0, 23.0, 26.0, 26.0));
    }

    #[test]
    fn inset_box_may_touch_but_not_cross_map_edges() {
        let idx = CollisionIndex::build(&open_map(), &CollisionConfig::default());
        // map is 128 x 96 px; inset box spans pos + 3 .. pos + 29
        assert!(idx.is_walkable(vec2(0.0, 0.0)));
        assert!(idx.is_walkable(vec2(128.0 - 29.0, 96.0 - 29.0)));
        assert!(!idx.is_walkable(vec2(128.0 - 28.9, 0.0)));
        assert!(!idx.is_walkable(vec2(0.0, 96.0 - 28.9)));
        assert!(!idx.is_walkable(vec2(128.0 - 26.0, 0.0)));
        assert!(idx.is_walkable(vec2(-3.0, -3.0)));
        assert!(!idx.is_walkable(vec2(-3.1, 0.0)));
        assert!(!idx.is_walkable(vec2(0.0, -3.1)));
        assert!(!idx.is_walkable(vec2(f32::NAN, 0.0)));

        let r = idx.hitbox().at(vec2(128.0 - 29.0, 0.0));
        assert_eq!(r.x + r.w, 128.0);
    }

    #[test]
    fn corner_outside_the_map_samples_the_edge_tile() {
        let mut cells = vec![0; 12];
        cells[0] = 1;
        let map = MapDocument::new(dims(), vec![layer(cells)], vec![]);
        let idx = CollisionIndex::build(&map, &CollisionConfig::default());
        assert!(!idx.is_walkable(vec2(-2.0, -2.0)));
        assert!(idx.is_walkable(vec2(32.0, -2.0)));
    }

    #[test]
    fn any_layer_with_blocking_id_vetoes() {
        let ground = layer(vec![9; 12]);
        let mut deco_cells = vec![0; 12];
        deco_cells[5] = 2; // row 1, col 1
        let map = MapDocument::new(dims(), vec![ground, layer(deco_cells)], vec![]);
        let idx = CollisionIndex::build(&map, &CollisionConfig::default());

        assert!(idx.is_solid_tile(1, 1));
        assert!(!idx.is_walkable(vec2(32.0, 32.0)));
        assert!(!idx.is_walkable(vec2(63.0, 63.0)));
        assert!(idx.is_walkable(vec2(64.0, 32.0)));
        assert!(idx.is_walkable(vec2(0.0, 0.0)));
    }

    #[test]
    fn blocking_set_comes_from_config() {
        let map = MapDocument::new(dims(), vec![layer(vec![1; 12])], vec![]);
        let cfg = CollisionConfig {
            blocking_gids: vec![42],
            ..CollisionConfig::default()
        };
        let idx = CollisionIndex::build(&map, &cfg);
        assert!(idx.is_walkable(vec2(0.0, 0.0)));
    }

    #[test]
    fn empty_id_blocks_only_when_listed() {
        let cfg = CollisionConfig {
            blocking_gids: vec![0],
            ..CollisionConfig::default()
        };
        let idx = CollisionIndex::build(&open_map(), &cfg);
        assert!(!idx.is_walkable(vec2(0.0, 0.0)));
    }

    #[test]
    fn rectangle_in_named_layer_blocks() {
        let rocks = rect_layer("Object Layer 1", &[Rect::new(64.0, 0.0, 32.0, 32.0)]);
        let map = MapDocument::new(dims(), vec![layer(vec![0; 12])], vec![rocks]);
        let idx = CollisionIndex::build(&map, &CollisionConfig::default());

        assert!(!idx.is_walkable(vec2(64.0, 0.0)));
        assert!(!idx.is_walkable(vec2(40.0, 0.0))); // 43..69 overlaps 64..96
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let rocks = rect_layer("Object Layer 1", &[Rect::new(64.0, 0.0, 32.0, 32.0)]);
        let map = MapDocument::new(dims(), vec![layer(vec![0; 12])], vec![rocks]);
        let idx = CollisionIndex::build(&map, &CollisionConfig::default());

        // inset box right edge = 35 + 3 + 26 = 64
        assert!(idx.is_walkable(vec2(35.0, 0.0)));
        assert!(!idx.is_walkable(vec2(35.5, 0.0)));
        // inset box top = 29 + 3 = 32, rock bottom = 32
        assert!(idx.is_walkable(vec2(64.0, 29.0)));
    }

    #[test]
    fn other_object_layers_are_ignored() {
        let deco = rect_layer("Decoration", &[Rect::new(0.0, 0.0, 128.0, 96.0)]);
        let map = MapDocument::new(dims(), vec![layer(vec![0; 12])], vec![deco]);
        let idx = CollisionIndex::build(&map, &CollisionConfig::default());
        assert!(idx.blockers().is_empty());
        assert!(idx.is_walkable(vec2(10.0, 10.0)));
    }

    #[test]
    fn layer_name_match_is_exact() {
        let rocks = rect_layer("object layer 1", &[Rect::new(0.0, 0.0, 128.0, 96.0)]);
        let map = MapDocument::new(dims(), vec![layer(vec![0; 12])], vec![rocks]);
        let idx = CollisionIndex::build(&map, &CollisionConfig::default());
        assert!(idx.is_walkable(vec2(10.0, 10.0)));
    }
}
