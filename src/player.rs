use crate::config::PlayerConfig;
use crate::spatial::Walkability;
use macroquad::prelude::*;

/// Facing of the player sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Towards negative y.
    Up,
    /// Towards positive y.
    #[default]
    Down,
    /// Towards negative x.
    Left,
    /// Towards positive x.
    Right,
}

/// Movement keys held this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveIntent {
    /// Up is held.
    pub up: bool,
    /// Down is held.
    pub down: bool,
    /// Left is held.
    pub left: bool,
    /// Right is held.
    pub right: bool,
}

impl MoveIntent {
    /// Raw (unnormalised) step and the facing it asks for. Later intents
    /// overwrite earlier ones in the order up, down, left, right.
    fn resolve(self, current: Direction) -> (Vec2, Direction) {
        let mut step = Vec2::ZERO;
        let mut dir = current;
        if self.up {
            step.y -= 1.0;
            dir = Direction::Up;
        }
        if self.down {
            step.y += 1.0;
            dir = Direction::Down;
        }
        if self.left {
            step.x -= 1.0;
            dir = Direction::Left;
        }
        if self.right {
            step.x += 1.0;
            dir = Direction::Right;
        }
        (step, dir)
    }
}

/// The walking player: position, facing and walk-cycle frame.
#[derive(Debug, Clone)]
pub struct Player {
    pos: Vec2,
    dir: Direction,
    frame: usize,
    animating: bool,
    frame_clock: f32,
    cfg: PlayerConfig,
}

impl Player {
    /// Player at world position `pos` (sprite top-left) facing down.
    pub fn new(pos: Vec2, cfg: PlayerConfig) -> Self {
        Player {
            pos,
            dir: Direction::Down,
            frame: 0,
            animating: false,
            frame_clock: 0.0,
            cfg,
        }
    }

    /// Sprite top-left in world pixels.
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    /// Current facing.
    pub fn direction(&self) -> Direction {
        self.dir
    }

    /// Current walk-cycle frame.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// True while the walk cycle is playing.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Advance one tick of `dt` seconds.
    ///
    /// Each axis is tried on its own so the player slides along walls: x is
    /// tested against the old y, then y against the (possibly updated) x.
    pub fn update(&mut self, dt: f32, intent: MoveIntent, world: &impl Walkability) {
        if self.animating {
            self.advance_frames(dt);
        }

        let (step, new_dir) = intent.resolve(self.dir);
        if step == Vec2::ZERO {
            self.animating = false;
            self.frame = 0;
            self.frame_clock = 0.0;
            return;
        }

        let velocity = step.normalize() * self.cfg.speed * dt;
        let next_x = self.pos.x + velocity.x;
        let next_y = self.pos.y + velocity.y;

        let mut moved = false;
        if world.is_walkable(vec2(next_x, self.pos.y)) {
            self.pos.x = next_x;
            moved = true;
        }
        if world.is_walkable(vec2(self.pos.x, next_y)) {
            self.pos.y = next_y;
            moved = true;
        }

        if self.dir != new_dir {
            self.dir = new_dir;
            self.frame = 0;
            self.frame_clock = 0.0;
        }
        if moved {
            self.animating = true;
        }
    }

    /// A config with no frames or a non-positive period freezes the cycle.
    fn advance_frames(&mut self, dt: f32) {
        let period = self.cfg.frame_period;
        let count = self.cfg.frame_count;
        if count == 0 || !(period > 0.0) {
            return;
        }
        self.frame_clock += dt;
        if !self.frame_clock.is_finite() {
            self.frame_clock = 0.0;
            return;
        }
        if self.frame_clock < period {
            return;
        }
        let steps = (self.frame_clock / period).floor();
        self.frame_clock -= steps * period;
        self.frame = (self.frame + steps as usize % count) % count;
    }
}
