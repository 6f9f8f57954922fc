//! Map compositor.
//!
//! Drawing goes through [`RenderSurface`] so the compositor does not care
//! whether it talks to macroquad or to a recorder in a test.

mod cull;
mod macroquad_surface;

pub use cull::{visible_tiles, TileSpan};
pub use macroquad_surface::MacroquadSurface;

use crate::atlas::{PlayerSprites, TileAtlas};
use crate::camera::CameraTransform;
use crate::map::MapDocument;
use crate::player::Player;
use macroquad::prelude::*;

/// Something draw calls can be issued to.
pub trait RenderSurface {
    /// Image handle the surface can draw (CPU image, GPU texture, ...).
    type Image;

    /// Fill the whole screen with the background.
    fn clear(&mut self);
    /// Apply a world transform to every following draw.
    fn set_camera(&mut self, camera: &CameraTransform);
    /// Return to screen-space drawing.
    fn reset_camera(&mut self);
    /// Draw `image` stretched over `dest`.
    fn draw_image(&mut self, image: &Self::Image, dest: Rect);
    /// Draw overlay text at a screen position.
    fn draw_text(&mut self, text: &str, x: f32, y: f32);

    /// Size of the drawable area in screen pixels, if the surface has one.
    /// The camera and the tile culling then follow it instead of the
    /// configured viewport.
    fn screen_size(&self) -> Option<Vec2> {
        None
    }
}

/// Everything needed to draw one frame.
pub struct Frame<'a, I> {
    /// Map to draw.
    pub map: &'a MapDocument,
    /// Tile images by GID.
    pub atlas: &'a TileAtlas<I>,
    /// Walk-cycle frames.
    pub sprites: &'a PlayerSprites<I>,
    /// Player to draw on top of the map.
    pub player: &'a Player,
    /// World transform for this frame.
    pub camera: CameraTransform,
    /// Viewport size in world pixels.
    pub viewport: Vec2,
    /// Draw the position readout in screen space.
    pub debug_overlay: bool,
}

/// Draw the map, then the player, under the camera; then the overlay.
pub fn render_frame<S: RenderSurface>(surface: &mut S, frame: &Frame<'_, S::Image>) {
    surface.reset_camera();
    surface.clear();

    surface.set_camera(&frame.camera);
    draw_map(surface, frame);
    draw_player(surface, frame);
    surface.reset_camera();

    if frame.debug_overlay {
        let pos = frame.player.position();
        let off = frame.camera.offset;
        surface.draw_text(
            &format!(
                "pos=({},{}) cam=({},{})",
                pos.x as i32, pos.y as i32, off.x as i32, off.y as i32
            ),
            10.0,
            20.0,
        );
    }
}

fn draw_map<S: RenderSurface>(surface: &mut S, frame: &Frame<'_, S::Image>) {
    let dims = frame.map.dims();
    let ts = dims.tile_size as f32;
    let view = frame.camera.visible_world_rect(frame.viewport);
    let span = visible_tiles(view, ts, dims.width, dims.height);

    for layer in frame.map.tile_layers() {
        for row in span.rows.clone() {
            for col in span.cols.clone() {
                let Some(gid) = layer.get(row, col) else {
                    continue;
                };
                if gid == 0 {
                    continue;
                }
                // GIDs the tileset does not cover are simply not drawn.
                if let Some(img) = frame.atlas.get(gid) {
                    surface.draw_image(img, Rect::new(col as f32 * ts, row as f32 * ts, ts, ts));
                }
            }
        }
    }
}

fn draw_player<S: RenderSurface>(surface: &mut S, frame: &Frame<'_, S::Image>) {
    let p = frame.player;
    let size = frame.map.dims().tile_size as f32;
    if let Some(img) = frame.sprites.frame(p.direction(), p.frame()) {
        let pos = p.position();
        surface.draw_image(img, Rect::new(pos.x, pos.y, size, size));
    }
}
