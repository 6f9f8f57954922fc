use crate::player::MoveIntent;
use macroquad::prelude::*;
use std::collections::HashSet;

/// Physical keys for each movement intent. Several keys may share an intent.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Keys that mean "up".
    pub up: Vec<KeyCode>,
    /// Keys that mean "down".
    pub down: Vec<KeyCode>,
    /// Keys that mean "left".
    pub left: Vec<KeyCode>,
    /// Keys that mean "right".
    pub right: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            up: vec![KeyCode::W, KeyCode::Up],
            down: vec![KeyCode::S, KeyCode::Down],
            left: vec![KeyCode::A, KeyCode::Left],
            right: vec![KeyCode::D, KeyCode::Right],
        }
    }
}

impl KeyBindings {
    /// Intents for a set of held keys.
    pub fn intent(&self, held: &HashSet<KeyCode>) -> MoveIntent {
        let any = |keys: &[KeyCode]| keys.iter().any(|k| held.contains(k));
        MoveIntent {
            up: any(&self.up),
            down: any(&self.down),
            left: any(&self.left),
            right: any(&self.right),
        }
    }

    /// Poll macroquad for the keys held this frame.
    pub fn poll(&self) -> MoveIntent {
        self.intent(&get_keys_down())
    }
}
