use macroquad::prelude::*;

/// World-to-screen transform for one frame: `screen = (world - offset) * zoom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    /// World position shown at the top-left of the viewport.
    pub offset: Vec2,
    /// Uniform scale.
    pub zoom: f32,
}

impl CameraTransform {
    /// Identity transform, used for screen-space overlays.
    pub const IDENTITY: CameraTransform = CameraTransform {
        offset: Vec2::ZERO,
        zoom: 1.0,
    };

    /// Map a screen pixel back into the world.
    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        p / self.zoom + self.offset
    }

    /// World rectangle covered by a viewport of `viewport` world pixels.
    pub fn visible_world_rect(&self, viewport: Vec2) -> Rect {
        Rect::new(self.offset.x, self.offset.y, viewport.x, viewport.y)
    }
}

/// Clamp `v` into `[min, max]`. When the range is inverted (map smaller than
/// the viewport) the result collapses to `min`.
#[inline]
pub fn clamp_axis(v: f32, min: f32, max: f32) -> f32 {
    if max < min || v < min || v.is_nan() {
        min
    } else if v > max {
        max
    } else {
        v
    }
}

/// Center the viewport on `target_center` while keeping it inside the map.
///
/// `viewport` and `map_px` are in world pixels.
pub fn compute_camera(target_center: Vec2, viewport: Vec2, map_px: Vec2, zoom: f32) -> CameraTransform {
    let half = viewport / 2.0;
    CameraTransform {
        offset: vec2(
            clamp_axis(target_center.x - half.x, 0.0, map_px.x - viewport.x),
            clamp_axis(target_center.y - half.y, 0.0, map_px.y - viewport.y),
        ),
        zoom,
    }
}
