//! Virtual buttons and sticks

use macroquad::math::{IVec2, Vec2};

/// Edge-detected button with an optional press buffer.
///
/// `pressed()` is true on the frame the button goes down and, with a
/// buffer, for `buffer` seconds afterwards unless the press is consumed.
#[derive(Debug, Clone, Default)]
pub struct VirtualButton {
    down: bool,
    pressed: bool,
    released: bool,
    buffer: f32,
    buffer_timer: f32,
}

impl VirtualButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_buffer(mut self, seconds: f32) -> Self {
        self.buffer = seconds.max(0.0);
        self
    }

    pub fn update(&mut self, down: bool, delta: f32) {
        let was_down = self.down;
        self.down = down;
        self.released = was_down && !down;

        if down && !was_down {
            self.pressed = true;
            self.buffer_timer = self.buffer;
        } else if self.buffer_timer > 0.0 {
            self.buffer_timer -= delta;
            self.pressed = self.buffer_timer > 0.0;
        } else {
            self.pressed = false;
        }
    }

    pub fn down(&self) -> bool {
        self.down
    }

    pub fn pressed(&self) -> bool {
        self.pressed
    }

    pub fn released(&self) -> bool {
        self.released
    }

    /// Clear a buffered press so it fires only once.
    pub fn consume_press(&mut self) {
        self.pressed = false;
        self.buffer_timer = 0.0;
    }
}

/// Direction input with a radial deadzone.
#[derive(Debug, Clone)]
pub struct VirtualStick {
    value: Vec2,
    deadzone: f32,
}

impl VirtualStick {
    pub fn new(deadzone: f32) -> Self {
        Self { value: Vec2::ZERO, deadzone }
    }

    pub fn update(&mut self, raw: Vec2) {
        self.value = if raw.length() < self.deadzone {
            Vec2::ZERO
        } else if raw.length() > 1.0 {
            raw.normalize()
        } else {
            raw
        };
    }

    pub fn value(&self) -> Vec2 {
        self.value
    }

    /// Per-axis sign of the value, after the deadzone.
    pub fn int_value(&self) -> IVec2 {
        let axis = |v: f32| {
            if v > self.deadzone {
                1
            } else if v < -self.deadzone {
                -1
            } else {
                0
            }
        };
        IVec2::new(axis(self.value.x), axis(self.value.y))
    }
}
