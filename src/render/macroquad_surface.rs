use super::RenderSurface;
use crate::atlas::{PlayerSprites, TileAtlas};
use crate::camera::CameraTransform;
use macroquad::prelude::*;

const OVERLAY_FONT_SIZE: f32 = 20.0;

/// [`RenderSurface`] backed by the macroquad window.
///
/// Needs a live macroquad context; build it inside the `#[macroquad::main]`
/// future.
pub struct MacroquadSurface {
    background: Color,
    text_color: Color,
}

impl MacroquadSurface {
    /// Surface that clears to `background`.
    pub fn new(background: Color) -> Self {
        MacroquadSurface {
            background,
            text_color: WHITE,
        }
    }

    /// Upload every tile as a nearest-filtered texture.
    pub fn upload_atlas(&self, atlas: &TileAtlas<Image>) -> TileAtlas<Texture2D> {
        atlas.map(upload)
    }

    /// Upload every walk-cycle frame.
    pub fn upload_sprites(&self, sprites: &PlayerSprites<Image>) -> PlayerSprites<Texture2D> {
        sprites.map(upload)
    }
}

fn upload(img: &Image) -> Texture2D {
    let tex = Texture2D::from_image(img);
    tex.set_filter(FilterMode::Nearest);
    tex
}

impl RenderSurface for MacroquadSurface {
    type Image = Texture2D;

    fn clear(&mut self) {
        clear_background(self.background);
    }

    fn set_camera(&mut self, camera: &CameraTransform) {
        let screen = vec2(screen_width(), screen_height());
        let zoom = camera.zoom;
        set_camera(&Camera2D {
            target: camera.screen_to_world(screen / 2.0),
            zoom: vec2(2.0 * zoom / screen.x, 2.0 * zoom / screen.y),
            ..Default::default()
        });
    }

    fn reset_camera(&mut self) {
        set_default_camera();
    }

    fn draw_image(&mut self, image: &Texture2D, dest: Rect) {
        draw_texture_ex(
            image,
            dest.x,
            dest.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(dest.w, dest.h)),
                ..Default::default()
            },
        );
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        draw_text(text, x, y, OVERLAY_FONT_SIZE, self.text_color);
    }

    fn screen_size(&self) -> Option<Vec2> {
        Some(vec2(screen_width(), screen_height()))
    }
}
