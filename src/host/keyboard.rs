//! Keyboard mapping
//!
//! Arrows or WASD to move, X / Space to jump, C / J to attack.

use bramble::input::RawInput;
use macroquad::prelude::*;

/// Sample the keyboard into a level-triggered snapshot.
pub fn poll() -> RawInput {
    RawInput {
        left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
        right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
        up: is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
        down: is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
        jump: is_key_down(KeyCode::X) || is_key_down(KeyCode::Space),
        attack: is_key_down(KeyCode::C) || is_key_down(KeyCode::J),
        stick: Vec2::ZERO,
    }
}
