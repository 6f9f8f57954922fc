use crate::player::Direction;
use macroquad::prelude::*;
use tracing::{info, warn};

/// Cut a sheet into `cols x rows` cells of `frame_w x frame_h`, row-major.
/// Cells that would run past the sheet edge are skipped.
pub fn slice_frames(sheet: &Image, frame_w: u32, frame_h: u32, cols: u32, rows: u32) -> Vec<Image> {
    if frame_w == 0 || frame_h == 0 {
        return Vec::new();
    }
    let sheet_w = sheet.width() as u32;
    let sheet_h = sheet.height() as u32;

    let mut frames = Vec::with_capacity((cols * rows) as usize);
    for r in 0..rows {
        for c in 0..cols {
            let x = c * frame_w;
            let y = r * frame_h;
            if x + frame_w > sheet_w || y + frame_h > sheet_h {
                continue;
            }
            frames.push(sheet.sub_image(Rect::new(
                x as f32,
                y as f32,
                frame_w as f32,
                frame_h as f32,
            )));
        }
    }
    frames
}

/// Tile images indexed by GID. GID 1 is the top-left cell of the tileset.
#[derive(Debug, Clone)]
pub struct TileAtlas<I> {
    tiles: Vec<I>,
}

impl<I> Default for TileAtlas<I> {
    fn default() -> Self {
        TileAtlas { tiles: Vec::new() }
    }
}

impl TileAtlas<Image> {
    /// Slice a tileset into square tiles. Partial trailing rows and columns
    /// are dropped; an undersized image gives an empty atlas.
    pub fn from_tileset(tileset: &Image, tile_size: u32) -> Self {
        if tile_size == 0 {
            return TileAtlas::default();
        }
        let cols = tileset.width() as u32 / tile_size;
        let rows = tileset.height() as u32 / tile_size;
        let tiles = slice_frames(tileset, tile_size, tile_size, cols, rows);

        if tiles.is_empty() {
            warn!(
                width = tileset.width(),
                height = tileset.height(),
                tile_size,
                "tileset is smaller than one tile"
            );
        } else {
            info!(tiles = tiles.len(), cols, rows, "tile atlas built");
        }
        TileAtlas { tiles }
    }
}

impl<I> TileAtlas<I> {
    /// Image for `gid`, or `None` for 0 and ids past the end.
    #[inline]
    pub fn get(&self, gid: u32) -> Option<&I> {
        let idx = (gid as usize).checked_sub(1)?;
        self.tiles.get(idx)
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True when the tileset yielded no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Convert every tile, keeping ids. Used to upload tiles as textures.
    pub fn map<J>(&self, f: impl FnMut(&I) -> J) -> TileAtlas<J> {
        TileAtlas {
            tiles: self.tiles.iter().map(f).collect(),
        }
    }
}

/// Walk-cycle frames for each facing.
#[derive(Debug, Clone)]
pub struct PlayerSprites<I> {
    up: Vec<I>,
    down: Vec<I>,
    left: Vec<I>,
    right: Vec<I>,
}

impl PlayerSprites<Image> {
    /// Slice one sheet per direction.
    pub fn from_sheets(
        up: &Image,
        down: &Image,
        left: &Image,
        right: &Image,
        frame_size: u32,
        cols: u32,
        rows: u32,
    ) -> Self {
        let cut = |sheet: &Image| slice_frames(sheet, frame_size, frame_size, cols, rows);
        PlayerSprites {
            up: cut(up),
            down: cut(down),
            left: cut(left),
            right: cut(right),
        }
    }
}

impl<I> PlayerSprites<I> {
    /// Frame `index` of the cycle for `dir`, if the sheet has that many.
    pub fn frame(&self, dir: Direction, index: usize) -> Option<&I> {
        let frames = match dir {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        };
        frames.get(index)
    }

    /// Convert every frame, keeping direction and order.
    pub fn map<J>(&self, mut f: impl FnMut(&I) -> J) -> PlayerSprites<J> {
        PlayerSprites {
            up: self.up.iter().map(&mut f).collect(),
            down: self.down.iter().map(&mut f).collect(),
            left: self.left.iter().map(&mut f).collect(),
            right: self.right.iter().map(&mut f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sheet whose every pixel encodes its own coordinates.
    fn gradient(w: u16, h: u16) -> Image {
        let mut img = Image::gen_image_color(w, h, BLACK);
        for y in 0..h as u32 {
            for x in 0..w as u32 {
                img.set_pixel(x, y, Color::from_rgba(x as u8, y as u8, 0, 255));
            }
        }
        img
    }

    #[test]
    fn exact_grid_yields_row_major_ids_from_one() {
        let sheet = gradient(96, 64);
        let atlas = TileAtlas::from_tileset(&sheet, 32);
        assert_eq!(atlas.len(), 6);
        assert!(atlas.get(0).is_none());
        assert!(atlas.get(7).is_none());

        for gid in 1..=6u32 {
            let tile = atlas.get(gid).unwrap();
            assert_eq!(tile.width(), 32);
            assert_eq!(tile.height(), 32);
            let col = (gid - 1) % 3;
            let row = (gid - 1) / 3;
            assert_eq!(tile.get_pixel(0, 0), sheet.get_pixel(col * 32, row * 32));
            assert_eq!(tile.get_pixel(31, 31), sheet.get_pixel(col * 32 + 31, row * 32 + 31));
        }
    }

    #[test]
    fn partial_cells_are_dropped() {
        let atlas = TileAtlas::from_tileset(&gradient(100, 40), 32);
        assert_eq!(atlas.len(), 3);
    }

    #[test]
    fn undersized_or_empty_image_gives_empty_atlas() {
        assert!(TileAtlas::from_tileset(&gradient(31, 64), 32).is_empty());
        assert!(TileAtlas::from_tileset(&Image::empty(), 32).is_empty());
        assert!(TileAtlas::from_tileset(&gradient(64, 64), 0).is_empty());
    }

    #[test]
    fn slice_frames_skips_cells_outside_sheet() {
        // 2x2 requested, sheet only holds one row.
        let frames = slice_frames(&gradient(64, 32), 32, 32, 2, 2);
        assert_eq!(frames.len(), 2);
    }

    #[test]
    fn map_keeps_ids() {
        let atlas = TileAtlas::from_tileset(&gradient(64, 32), 32);
        let sizes = atlas.map(|img| img.width());
        assert_eq!(sizes.get(1), Some(&32));
        assert_eq!(sizes.get(2), Some(&32));
        assert_eq!(sizes.get(3), None);
    }

    #[test]
    fn player_frames_by_direction() {
        let sheet = gradient(64, 64);
        let sprites = PlayerSprites::from_sheets(&sheet, &sheet, &sheet, &gradient(64, 32), 32, 2, 2);
        assert!(sprites.frame(Direction::Down, 3).is_some());
        assert!(sprites.frame(Direction::Right, 1).is_some());
        assert!(sprites.frame(Direction::Right, 2).is_none());
    }
}
