//! Input handling
//!
//! The host polls the keyboard and hands over a level-triggered
//! `RawInput` snapshot each frame. This module turns it into the
//! action-based API gameplay code reads:
//! - `VirtualButton`: down / pressed / released with a press buffer, so a
//!   jump pressed a few frames before landing still fires on landing
//! - `VirtualStick`: digital or analog direction with a deadzone

mod button;

pub use button::{VirtualButton, VirtualStick};

use macroquad::math::Vec2;

/// Level-triggered snapshot of the physical controls.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub attack: bool,
    /// Analog stick, x right / y down, each in [-1, 1]
    pub stick: Vec2,
}

/// Resolved gameplay input.
#[derive(Debug, Clone)]
pub struct Input {
    pub movement: VirtualStick,
    pub jump: VirtualButton,
    pub attack: VirtualButton,
}

impl Input {
    pub fn new(press_buffer: f32) -> Self {
        Self {
            movement: VirtualStick::new(0.25),
            jump: VirtualButton::new().press_buffer(press_buffer),
            attack: VirtualButton::new().press_buffer(press_buffer),
        }
    }

    /// Call once per host frame with real (unpaused) time, so buffers keep
    /// expiring during hit-stop.
    pub fn update(&mut self, raw: &RawInput, raw_delta: f32) {
        let mut digital = Vec2::ZERO;
        if raw.left { digital.x -= 1.0; }
        if raw.right { digital.x += 1.0; }
        if raw.up { digital.y -= 1.0; }
        if raw.down { digital.y += 1.0; }

        // Keyboard wins when held, otherwise fall back to the stick
        let value = if digital != Vec2::ZERO { digital } else { raw.stick };
        self.movement.update(value);
        self.jump.update(raw.jump, raw_delta);
        self.attack.update(raw.attack, raw_delta);
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new(0.15)
    }
}
