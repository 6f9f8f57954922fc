use macroquad::prelude::*;
use std::ops::Range;

const CULL_MARGIN_TILES: usize = 1;

/// Tile rows and columns that intersect a world rectangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSpan {
    /// Visible rows.
    pub rows: Range<usize>,
    /// Visible columns.
    pub cols: Range<usize>,
}

/// Tiles covering `view` padded by one tile, clipped to a `cols x rows` grid.
pub fn visible_tiles(view: Rect, tile_size: f32, cols: usize, rows: usize) -> TileSpan {
    let mut x_min = view.x;
    let mut y_min = view.y;
    let mut x_max = view.x + view.w;
    let mut y_max = view.y + view.h;

    if x_min > x_max {
        std::mem::swap(&mut x_min, &mut x_max);
    }
    if y_min > y_max {
        std::mem::swap(&mut y_min, &mut y_max);
    }

    let first = |v: f32| ((v / tile_size).floor().max(0.0) as usize).saturating_sub(CULL_MARGIN_TILES);
    let last = |v: f32, limit: usize| {
        ((v / tile_size).ceil().max(0.0) as usize + CULL_MARGIN_TILES).min(limit)
    };

    let col_end = last(x_max, cols);
    let row_end = last(y_max, rows);
    TileSpan {
        rows: first(y_min).min(row_end)..row_end,
        cols: first(x_min).min(col_end)..col_end,
    }
}
