//! Integer geometry helpers
//!
//! Everything in the simulation lives on the pixel grid, so rectangles are
//! integer-valued. Floating point only appears in speeds and remainders.

use macroquad::math::{IVec2, Vec2};

/// An axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectI {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl RectI {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Move the rectangle by an offset
    pub fn translate(&self, offset: IVec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// True when the intersection has positive area. Rectangles that only
    /// share an edge do not overlap.
    pub fn overlaps(&self, other: &RectI) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Check if a point is inside (left/top inclusive, right/bottom exclusive)
    pub fn contains(&self, point: IVec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// -1, 0 or 1
pub fn sign(value: i32) -> i32 {
    value.signum()
}

/// Move `value` toward `target` by at most `amount`
pub fn approach(value: f32, target: f32, amount: f32) -> f32 {
    if value < target {
        (value + amount).min(target)
    } else {
        (value - amount).max(target)
    }
}

/// Cubic ease in/out over t in [0, 1]
pub fn cube_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let f = -2.0 * t + 2.0;
        1.0 - f * f * f / 2.0
    }
}

pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = RectI::new(0, 0, 8, 8);
        let b = RectI::new(8, 0, 8, 8);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
        assert!(a.overlaps(&RectI::new(7, 7, 8, 8)));
    }

    #[test]
    fn test_empty_rect_never_overlaps() {
        let a = RectI::new(0, 0, 0, 8);
        assert!(!a.overlaps(&RectI::new(-4, -4, 16, 16)));
    }

    #[test]
    fn test_approach_does_not_overshoot() {
        assert_eq!(approach(5.0, 0.0, 10.0), 0.0);
        assert_eq!(approach(-5.0, 0.0, 2.0), -3.0);
        assert_eq!(approach(1.0, 4.0, 2.0), 3.0);
    }

    #[test]
    fn test_cube_in_out_endpoints() {
        assert_eq!(cube_in_out(0.0), 0.0);
        assert_eq!(cube_in_out(1.0), 1.0);
        assert!((cube_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!(cube_in_out(0.25) < 0.25);
        assert!(cube_in_out(0.75) > 0.75);
    }
}
