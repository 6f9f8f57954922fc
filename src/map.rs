use crate::config::MapConfig;
use crate::error::MapError;
use crate::loader::json_loader::decode_map_file;
use macroquad::prelude::*;
use std::collections::HashMap;
use std::path::Path;

/// Tiled stores flip flags in the top three bits of a GID.
pub const FLIP_H: u32 = 0x8000_0000; // bit 31
/// Vertical flip flag.
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
/// Diagonal (anti-diagonal) flip flag.
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
/// Mask that strips the flip flags.
pub const GID_MASK: u32 = 0x1FFF_FFFF;

/// One full grid of tile ids. Row-major, `0` = empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    name: String,
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

impl TileLayer {
    /// Build a layer from a row-major cell list; the list must cover the grid exactly.
    pub fn from_cells(
        name: impl Into<String>,
        width: usize,
        height: usize,
        cells: Vec<u32>,
    ) -> Result<Self, MapError> {
        let name = name.into();
        let expected = width * height;
        if cells.len() != expected {
            return Err(MapError::InvalidLayerSize {
                layer: name,
                expected,
                actual: cells.len(),
            });
        }
        let cells = cells.into_iter().map(|gid| gid & GID_MASK).collect();
        Ok(TileLayer {
            name,
            width,
            height,
            cells,
        })
    }

    /// Layer name as written in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tile id at `(row, col)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    /// Iterate `(row, col, gid)` over every cell, empty ones included.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, gid)| (i / self.width, i % self.width, *gid))
    }

    /// Iterate `(row, col, gid)` over non-empty cells.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.cells().filter(|&(_, _, gid)| gid != 0)
    }
}

/// A rectangle from an object layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapObject {
    /// Tiled object id.
    pub id: u32,
    /// Object name (may be empty).
    pub name: String,
    /// Tiled `class`, or the legacy `type` field when `class` is absent.
    pub class_name: String,
    /// Bounds in world pixels.
    pub rect: Rect,
}

/// Named group of collision rectangles. Never drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLayer {
    /// Layer name, matched exactly.
    pub name: String,
    /// Objects in document order.
    pub objects: Vec<MapObject>,
}

/// A parsed map: tile layers in z-order plus object layers.
#[derive(Debug, Clone)]
pub struct MapDocument {
    dims: MapConfig,
    tile_layers: Vec<TileLayer>,
    object_layers: Vec<ObjectLayer>,
    object_index: HashMap<String, usize>,
}

impl MapDocument {
    /// Assemble a document from already validated layers.
    pub fn new(dims: MapConfig, tile_layers: Vec<TileLayer>, object_layers: Vec<ObjectLayer>) -> Self {
        let mut object_index = HashMap::with_capacity(object_layers.len());
        for (i, layer) in object_layers.iter().enumerate() {
            object_index.entry(layer.name.clone()).or_insert(i);
        }
        MapDocument {
            dims,
            tile_layers,
            object_layers,
            object_index,
        }
    }

    /// Parse a Tiled JSON document held in memory.
    pub fn from_json_str(json: &str, dims: &MapConfig) -> Result<Self, MapError> {
        crate::loader::json_loader::decode_map_str(json, "<inline>", dims)
    }

    /// Load a `.json` / `.tmj` map file.
    pub fn load<P: AsRef<Path>>(path: P, dims: &MapConfig) -> Result<Self, MapError> {
        decode_map_file(path.as_ref(), dims)
    }

    /// Dimensions the layers were validated against.
    pub fn dims(&self) -> &MapConfig {
        &self.dims
    }

    /// Tile layers, lowest first.
    pub fn tile_layers(&self) -> &[TileLayer] {
        &self.tile_layers
    }

    /// Object layers in document order.
    pub fn object_layers(&self) -> &[ObjectLayer] {
        &self.object_layers
    }

    /// First object layer with exactly this name.
    pub fn object_layer(&self, name: &str) -> Option<&ObjectLayer> {
        self.object_index
            .get(name)
            .map(|&i| &self.object_layers[i])
    }

    /// All objects across every object layer.
    pub fn objects(&self) -> impl Iterator<Item = &MapObject> {
        self.object_layers.iter().flat_map(|l| l.objects.iter())
    }
}
